pub mod ai;
pub mod config;
pub mod error;
pub mod session;
pub mod state;

// Re-export main types for convenience
pub use ai::{ClaudeClient, CompletionClient, CompletionRequest};
pub use config::{Config, Settings};
pub use error::ConfigError;
pub use session::{ChatSession, Turn};
pub use state::{ChatMessage, ChatRole, Transcript};
