pub mod config;
pub mod conversation;
pub mod error;
pub mod message;
pub mod monitor;
pub mod persona;
pub mod transport;
pub mod turn;
