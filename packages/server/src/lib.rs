// Chat backend - API Core
//
// Serves the chat UI: assistant replies from a completion service or an
// external flow server, interactive actions derived from those replies, and
// a pass-through proxy to the external flow store.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
