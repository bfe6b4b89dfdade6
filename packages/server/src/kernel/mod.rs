//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod openai;
pub mod test_dependencies;
pub mod traits;

pub use deps::ServerDeps;
pub use openai::OpenAIBackend;
pub use test_dependencies::TestDependencies;
pub use traits::*;

/// Default model for conversational replies and classification.
pub const GPT_4O_MINI: &str = "gpt-4o-mini";
