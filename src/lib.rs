// Public API for integration tests and potential library usage

pub mod api;
pub mod camera;
pub mod catalog;
pub mod composer;
pub mod config;
pub mod dashboard;
pub mod intake;
pub mod payload;
pub mod protocol;
pub mod queue;
pub mod state;
pub mod types;
pub mod ws;
