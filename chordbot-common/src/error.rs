//! Common error types for Chord-Bot

use thiserror::Error;

/// Common result type for Chord-Bot operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across Chord-Bot services
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),
}
