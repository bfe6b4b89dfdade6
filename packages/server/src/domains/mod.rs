// Business domains
pub mod chat;
pub mod flows;
pub mod parsing;
