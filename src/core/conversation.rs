//! Conversation controller.
//!
//! Owns the message list, the persona, the one-shot system preamble and the
//! single in-flight request. The controller is synchronous: `submit` hands out
//! a [`TurnRequest`] and `resolve` folds the transport's outcome back in, so
//! the UI loop can run the network call elsewhere and still own all state.

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::core::message::Message;
use crate::core::persona::Persona;
use crate::core::transport::ChatTransport;
use crate::core::turn::{TurnOutcome, TurnRequest};

pub const ABORTED_MESSAGE: &str = "Request was aborted";
pub const FALLBACK_ERROR_MESSAGE: &str = "An unexpected error occurred";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    Idle,
    AwaitingReply,
    Error,
}

#[derive(Debug)]
struct PendingRequest {
    id: u64,
    cancel_token: CancellationToken,
}

#[derive(Debug, Default)]
pub struct ConversationController {
    messages: Vec<Message>,
    input: String,
    persona: Persona,
    system_message_sent: bool,
    pending: Option<PendingRequest>,
    next_request_id: u64,
    error: Option<String>,
}

impl ConversationController {
    pub fn new(persona: Persona) -> Self {
        Self {
            persona,
            ..Self::default()
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn persona(&self) -> Persona {
        self.persona
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn system_message_sent(&self) -> bool {
        self.system_message_sent
    }

    pub fn is_awaiting_reply(&self) -> bool {
        self.pending.is_some()
    }

    pub fn state(&self) -> TurnState {
        if self.pending.is_some() {
            TurnState::AwaitingReply
        } else if self.error.is_some() {
            TurnState::Error
        } else {
            TurnState::Idle
        }
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn push_input_char(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn pop_input_char(&mut self) {
        self.input.pop();
    }

    /// Start a turn from the current input.
    ///
    /// Returns `None` without touching any state when the input is blank or a
    /// request is already in flight.
    pub fn submit(&mut self) -> Option<TurnRequest> {
        if self.input.trim().is_empty() || self.pending.is_some() {
            return None;
        }

        if !self.system_message_sent {
            self.messages
                .insert(0, Message::system(self.persona.system_prompt()));
            self.system_message_sent = true;
        }

        let content = std::mem::take(&mut self.input);
        self.messages.push(Message::user(content));
        self.error = None;

        self.next_request_id += 1;
        let cancel_token = CancellationToken::new();
        self.pending = Some(PendingRequest {
            id: self.next_request_id,
            cancel_token: cancel_token.clone(),
        });
        debug!(
            request_id = self.next_request_id,
            message_count = self.messages.len(),
            "turn submitted"
        );

        Some(TurnRequest {
            id: self.next_request_id,
            messages: self.messages.clone(),
            cancel_token,
        })
    }

    /// Apply the outcome of request `id`. Returns `false` when the outcome
    /// belongs to a request that is no longer pending and was discarded.
    pub fn resolve(&mut self, id: u64, outcome: TurnOutcome) -> bool {
        match &self.pending {
            Some(pending) if pending.id == id => {}
            _ => {
                debug!(request_id = id, "discarding outcome of superseded request");
                return false;
            }
        }
        self.pending = None;

        match outcome {
            Ok(reply) => {
                self.messages.push(Message::assistant(reply));
                self.error = None;
            }
            Err(err) if err.is_cancelled() => {
                self.error = Some(ABORTED_MESSAGE.to_string());
            }
            Err(err) => {
                let text = err.to_string();
                self.error = Some(if text.trim().is_empty() {
                    FALLBACK_ERROR_MESSAGE.to_string()
                } else {
                    text
                });
            }
        }
        true
    }

    /// Signal cancellation. The in-flight call reports back through `resolve`.
    pub fn abort(&mut self) {
        if let Some(pending) = &self.pending {
            debug!(request_id = pending.id, "aborting turn");
            pending.cancel_token.cancel();
        }
    }

    pub fn new_chat(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.cancel_token.cancel();
        }
        self.messages.clear();
        self.error = None;
        self.system_message_sent = false;
    }

    pub fn set_persona(&mut self, persona: Persona) {
        self.persona = persona;
        // Only rewrites the preamble once it has been sent; before the first
        // message the change is picked up by `submit` instead. A persona
        // chosen before the first turn never produces a rewrite here, which
        // may be a latent defect rather than intended behaviour.
        if self.system_message_sent {
            self.messages.retain(|message| !message.is_system());
            self.messages
                .insert(0, Message::system(persona.system_prompt()));
        }
    }

    pub fn cycle_persona(&mut self) -> Persona {
        let next = self.persona.next();
        self.set_persona(next);
        next
    }

    /// Submit and await the transport inline. Returns `None` if the submit guard rejected the input.
    pub async fn run_turn(&mut self, transport: &dyn ChatTransport) -> Option<TurnState> {
        let request = self.submit()?;
        let outcome = transport
            .complete(&request.messages, &request.cancel_token)
            .await;
        self.resolve(request.id, outcome);
        Some(self.state())
    }
}
