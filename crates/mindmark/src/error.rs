//! Error types for Mindmark operations.
//!
//! This module provides the main error type [`MindmarkError`] which wraps
//! the error conditions a caller of the library can observe. Parse failures
//! and rendering surface hiccups are recovered inside the engine and never
//! reach this type.

use std::io;

use thiserror::Error;

use crate::storage::StorageError;

/// The main error type for Mindmark operations.
#[derive(Debug, Error)]
pub enum MindmarkError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}
