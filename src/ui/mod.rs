//! Terminal UI layer for interactive chat sessions.
//!
//! - [`chat_loop`]: the event loop that feeds key presses, turn outcomes and
//!   connectivity changes into [`crate::core::conversation`].
//! - [`renderer`]: frame layout and transcript rendering.

pub mod chat_loop;
pub mod renderer;
