// Public API for integration tests and potential library usage

pub mod admin;
pub mod api;
pub mod auth;
pub mod protocol;
pub mod quiz;
pub mod server;
pub mod state;
pub mod translate;
pub mod types;
pub mod ws;

// Background tasks
pub mod broadcast;
