//! Shared types for the engagement core

pub mod error;

pub use error::{EngageError, Result};
