//! TUI-less "say" command: one turn, reply printed to stdout

use std::error::Error;

use crate::core::config::Settings;
use crate::core::conversation::{ConversationController, TurnState, FALLBACK_ERROR_MESSAGE};
use crate::core::transport::InferenceClient;

/// Run a single turn. Returns the process exit code.
pub async fn run_say(prompt: Vec<String>, settings: &Settings) -> Result<i32, Box<dyn Error>> {
    let prompt = prompt.join(" ");
    if prompt.trim().is_empty() {
        eprintln!("Usage: localchat say <prompt>");
        return Ok(2);
    }

    let client = InferenceClient::new(settings);
    let mut controller = ConversationController::new(settings.persona);
    controller.set_input(prompt);

    match controller.run_turn(&client).await {
        Some(TurnState::Idle) => {
            if let Some(reply) = controller.messages().last() {
                println!("{}", reply.content);
            }
            Ok(0)
        }
        _ => {
            let error = controller.error().unwrap_or(FALLBACK_ERROR_MESSAGE);
            eprintln!("❌ Error: {error}");
            Ok(1)
        }
    }
}
