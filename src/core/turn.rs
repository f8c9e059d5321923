use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::core::error::CompletionError;
use crate::core::message::Message;
use crate::core::transport::ChatTransport;

pub type TurnOutcome = Result<String, CompletionError>;

/// Everything a transport call needs for one turn, handed out by the controller on submit.
#[derive(Debug, Clone)]
pub struct TurnRequest {
    pub id: u64,
    pub messages: Vec<Message>,
    pub cancel_token: CancellationToken,
}

/// Runs turns on background tasks and reports outcomes tagged with their request id.
#[derive(Clone)]
pub struct TurnService {
    tx: mpsc::UnboundedSender<(TurnOutcome, u64)>,
}

impl TurnService {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<(TurnOutcome, u64)>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn spawn_turn(&self, transport: Arc<dyn ChatTransport>, request: TurnRequest) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let TurnRequest {
                id,
                messages,
                cancel_token,
            } = request;

            let outcome = transport.complete(&messages, &cancel_token).await;
            debug!(request_id = id, ok = outcome.is_ok(), "turn finished");
            // The receiver only disappears when the UI loop has exited.
            let _ = tx.send((outcome, id));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::{FakeReply, FakeTransport};

    #[tokio::test]
    async fn outcome_is_tagged_with_request_id() {
        let transport = Arc::new(FakeTransport::with_replies([FakeReply::Content(
            "Hi".to_string(),
        )]));
        let (service, mut rx) = TurnService::new();

        service.spawn_turn(
            transport.clone(),
            TurnRequest {
                id: 7,
                messages: vec![Message::user("Hello")],
                cancel_token: CancellationToken::new(),
            },
        );

        let (outcome, id) = rx.recv().await.expect("one outcome");
        assert_eq!(id, 7);
        assert_eq!(outcome, Ok("Hi".to_string()));
        assert_eq!(transport.calls(), vec![vec![Message::user("Hello")]]);
    }

    #[tokio::test]
    async fn cancelled_turn_still_reports() {
        let transport = Arc::new(FakeTransport::with_replies([FakeReply::Hang]));
        let (service, mut rx) = TurnService::new();
        let token = CancellationToken::new();

        service.spawn_turn(
            transport,
            TurnRequest {
                id: 1,
                messages: vec![Message::user("wait")],
                cancel_token: token.clone(),
            },
        );
        token.cancel();

        let (outcome, id) = rx.recv().await.expect("one outcome");
        assert_eq!(id, 1);
        assert!(outcome.expect_err("cancelled").is_cancelled());
    }
}
