//! # Chord-Bot Common Library
//!
//! Shared code for the Chord-Bot services:
//! - Error and result types
//! - Service configuration defaults and validation

pub mod config;
pub mod error;

pub use config::ServiceConfig;
pub use error::{Error, Result};
