//! One-shot connectivity check

use crate::core::config::Settings;
use crate::core::transport::{ChatTransport, InferenceClient};

/// Probe once and print the result. Returns the process exit code.
pub async fn check_status(settings: &Settings) -> i32 {
    let client = InferenceClient::new(settings);
    match client.probe().await {
        Ok(()) => {
            println!("✅ Connected to {}", client.base_url());
            0
        }
        Err(err) => {
            println!("❌ Not connected to {}", client.base_url());
            eprintln!("   {err}");
            1
        }
    }
}
