//! Parsing domain - derives interactive actions from assistant replies.

pub mod models;
pub mod parser;
pub mod policy;
pub mod prompts;
pub mod schema;

pub use models::*;
pub use parser::{ActionParser, ParseFailure};
pub use policy::{policy_violations, PolicyViolation, MAX_SUGGESTIONS};
pub use schema::{validate_action, validate_message_actions, validate_parsed_data, ActionSchemaError};
