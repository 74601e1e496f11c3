//! Cross-messenger abstractions.

pub mod port;
pub mod types;
