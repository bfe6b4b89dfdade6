// HTTP routes
pub mod chat;
pub mod execute_flow;
pub mod flows;
pub mod health;
pub mod parse;

pub use chat::*;
pub use execute_flow::*;
pub use flows::*;
pub use health::*;
pub use parse::*;
