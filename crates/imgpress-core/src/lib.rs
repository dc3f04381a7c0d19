//! Core domain types for imgpress: configuration, the unified error type,
//! and the persistent entities (users, conversion history).

pub mod config;
pub mod error;
pub mod models;

pub use config::Config;
pub use error::{AppError, LogLevel};
