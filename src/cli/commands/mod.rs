//! CLI command implementations

pub mod completions;
pub mod extract;
pub mod init;
pub mod labor;
pub mod quote;
pub mod rack;
pub mod rates;
