//! Model listing for the configured inference server

use crate::api::ModelInfo;
use crate::core::config::Settings;
use crate::core::transport::InferenceClient;
use std::error::Error;

/// Sort models newest first, falling back to id order when creation times are missing.
pub fn sort_models(models: &mut [ModelInfo]) {
    models.sort_by(|a, b| match (a.created, b.created) {
        (Some(a_created), Some(b_created)) => b_created.cmp(&a_created).then(a.id.cmp(&b.id)),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.id.cmp(&b.id),
    });
}

pub async fn list_models(settings: &Settings) -> Result<(), Box<dyn Error>> {
    let client = InferenceClient::new(settings);

    println!("🤖 Available Models at {}", client.base_url());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!();
    println!("🎯 Model sent with requests: {} (from config)", settings.model);
    println!();

    let mut models = client.list_models().await?.data;
    if models.is_empty() {
        println!("No models reported by the server. Load a model and try again.");
        return Ok(());
    }

    sort_models(&mut models);
    println!("Found {} models:", models.len());
    println!();
    for model in models {
        match model.owned_by {
            Some(owner) => println!("  • {} ({owner})", model.id),
            None => println!("  • {}", model.id),
        }
    }

    Ok(())
}
