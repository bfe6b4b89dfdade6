// Common types and utilities shared across the application

pub mod id;
pub mod types;

pub use id::{new_message_id, MessageId};
pub use types::*;
