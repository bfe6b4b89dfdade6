//! Flows domain - flow definitions, the external store and execution proxy.

pub mod error;
pub mod executor;
pub mod extract;
pub mod models;
pub mod store;

pub use error::{FlowError, FlowResult};
pub use executor::HttpFlowExecutor;
pub use extract::{last_ai_message, MessageShape, NO_AI_MESSAGE};
pub use models::*;
pub use store::HttpFlowStore;
