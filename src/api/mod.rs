pub mod cors;
pub mod error;
pub mod event;
pub mod handlers;
pub mod server;
