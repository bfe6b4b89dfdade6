//! Chat domain - transcript messages, responders and the turn driver.

pub mod models;
pub mod prompts;
pub mod responder;
pub mod session;

pub use models::Message;
pub use responder::{ensure_not_blank, CompletionResponder, FlowResponder, Responder, ResponderError};
pub use session::{ActionClick, ChatSession, Transcript, TurnOutcome, GREETING_ID};
