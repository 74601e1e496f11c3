//! Core domain + application logic for the Clash Royale stats bot.
//!
//! This crate is intentionally framework-agnostic. Telegram and the statistics HTTP sources
//! live behind ports (traits) implemented in adapter crates.

pub mod config;
pub mod domain;
pub mod errors;
pub mod formatting;
pub mod logging;
pub mod lookup;
pub mod messaging;
pub mod model;
pub mod outcome;
pub mod ports;
pub mod registration;
pub mod service;
pub mod tag;
pub mod users;
pub mod utils;

pub use errors::{Error, Result};
