// Library interface for newsocial modules
// This allows tests and the client binary to import modules

pub mod client;
pub mod error;
pub mod llm;
pub mod models;
pub mod orchestrator;
pub mod prompts;
pub mod server;
