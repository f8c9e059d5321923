//! localchat is a terminal chat client for locally hosted language-model
//! servers that speak the OpenAI chat completions API.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the conversation controller, the turn lifecycle with its
//!   cancellation, the connection monitor, personas, and configuration.
//! - [`ui`] renders the terminal interface and runs the event loop that maps
//!   keys onto controller actions.
//! - [`api`] defines the request/response payloads exchanged with the server.
//! - [`cli`] parses arguments and dispatches to the chat loop or one-shot
//!   commands.
//!
//! The binary (`src/main.rs`) only calls [`crate::cli::main`].

pub mod api;
pub mod cli;
pub mod core;
pub mod ui;
pub mod utils;
