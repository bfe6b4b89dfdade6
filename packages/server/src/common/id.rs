//! Message id generation.
//!
//! Ids are UUID v7 strings: unique, and ordered by creation time, so a
//! transcript sorted by id reads in the order it was written. Ids that arrive
//! from the UI are opaque strings and are never parsed.

use uuid::Uuid;

/// Identifier of a message within a transcript.
pub type MessageId = String;

/// Mint a fresh, time-ordered message id.
pub fn new_message_id() -> MessageId {
    Uuid::now_v7().to_string()
}
