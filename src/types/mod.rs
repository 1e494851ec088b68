//! Shared types for Hearth

pub mod error;

pub use error::{HearthError, Result};
