//! Error adapter for converting MindmarkError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error type
//! and miette's rich diagnostic formatting used in the CLI.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan};

use mindmark::{MindmarkError, StorageError};

/// Adapter rendering a [`MindmarkError`] as a miette diagnostic.
pub struct ErrorAdapter<'a>(pub &'a MindmarkError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            MindmarkError::Io(_) => "mindmark::io",
            MindmarkError::Storage(_) => "mindmark::storage",
            MindmarkError::Config(_) => "mindmark::config",
            MindmarkError::InvalidValue(_) => "mindmark::invalid_value",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match &self.0 {
            MindmarkError::Storage(StorageError::Decode { .. })
            | MindmarkError::Storage(StorageError::UnsupportedVersion(_)) => {
                "run `mindmark reset` to start over with an empty mind map"
            }
            MindmarkError::Storage(StorageError::InvalidKey(_)) => {
                "storage keys must not contain path separators"
            }
            _ => return None,
        };
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        None
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}
