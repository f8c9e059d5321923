//! Failure taxonomy for talking to the inference server.
//!
//! Probes fail with [`ConnectivityError`], which only ever degrades the
//! connection status. Completions fail with [`CompletionError`], which splits
//! into network-level [`TransportError`]s (including cancellation) and
//! [`ProtocolError`]s for bad statuses or malformed bodies.

use std::error::Error as StdError;
use std::fmt;

/// The model-listing probe could not confirm the server is available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectivityError {
    /// The request never produced a response.
    Unreachable { reason: String },
    /// The server answered with a non-2xx status.
    Status { status: u16 },
}

impl fmt::Display for ConnectivityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectivityError::Unreachable { reason } => {
                write!(f, "Cannot connect to the inference server: {reason}")
            }
            ConnectivityError::Status { status } => {
                write!(f, "Inference server not responding correctly (status {status})")
            }
        }
    }
}

impl StdError for ConnectivityError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The HTTP call itself failed.
    Network { message: String },
    /// The caller cancelled the request before it finished.
    Cancelled,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Network { message } => f.write_str(message),
            TransportError::Cancelled => f.write_str("Request was aborted"),
        }
    }
}

impl StdError for TransportError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Non-2xx response; the body is kept verbatim.
    Status { status: u16, body: String },
    /// 2xx response without `choices[0].message.content`.
    MalformedResponse,
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::Status { status, body } => write!(f, "API Error: {status} - {body}"),
            ProtocolError::MalformedResponse => f.write_str("Invalid response format from API"),
        }
    }
}

impl StdError for ProtocolError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionError {
    Transport(TransportError),
    Protocol(ProtocolError),
}

impl CompletionError {
    pub fn network(message: impl Into<String>) -> Self {
        CompletionError::Transport(TransportError::Network {
            message: message.into(),
        })
    }

    pub fn cancelled() -> Self {
        CompletionError::Transport(TransportError::Cancelled)
    }

    pub fn status(status: u16, body: impl Into<String>) -> Self {
        CompletionError::Protocol(ProtocolError::Status {
            status,
            body: body.into(),
        })
    }

    pub fn malformed() -> Self {
        CompletionError::Protocol(ProtocolError::MalformedResponse)
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, CompletionError::Transport(TransportError::Cancelled))
    }
}

impl fmt::Display for CompletionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompletionError::Transport(err) => err.fmt(f),
            CompletionError::Protocol(err) => err.fmt(f),
        }
    }
}

impl StdError for CompletionError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            CompletionError::Transport(err) => Some(err),
            CompletionError::Protocol(err) => Some(err),
        }
    }
}

impl From<TransportError> for CompletionError {
    fn from(value: TransportError) -> Self {
        CompletionError::Transport(value)
    }
}

impl From<ProtocolError> for CompletionError {
    fn from(value: ProtocolError) -> Self {
        CompletionError::Protocol(value)
    }
}
