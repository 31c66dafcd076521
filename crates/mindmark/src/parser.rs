//! The seam between source text and the node tree.
//!
//! The outline grammar itself lives outside this crate. Anything that can
//! turn text into a [`DiagramNode`] can be plugged in as a [`SourceParser`],
//! including a plain closure.

use async_trait::async_trait;
use log::{debug, error};
use thiserror::Error;

use mindmark_core::node::DiagramNode;

/// A parser rejected its input.
#[derive(Debug, Clone, Error)]
#[error("failed to parse source text: {message}")]
pub struct ParseFailure {
    message: String,
}

impl ParseFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Converts outline text into a tree.
///
/// `Ok(None)` means the text parsed but produced no tree.
#[async_trait]
pub trait SourceParser: Send + Sync {
    async fn parse(&self, text: &str) -> Result<Option<DiagramNode>, ParseFailure>;
}

#[async_trait]
impl<F> SourceParser for F
where
    F: Fn(&str) -> Result<Option<DiagramNode>, ParseFailure> + Send + Sync,
{
    async fn parse(&self, text: &str) -> Result<Option<DiagramNode>, ParseFailure> {
        self(text)
    }
}

/// Parses `text` into a root-level sequence.
///
/// Blank text yields an empty sequence without calling the parser. A parse
/// failure is logged and also yields an empty sequence; it never reaches the
/// caller.
pub async fn parse_source(parser: &dyn SourceParser, text: &str) -> Vec<DiagramNode> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    match parser.parse(text).await {
        Ok(Some(root)) => {
            debug!(nodes = root.subtree_len(); "Parsed source text");
            vec![root]
        }
        Ok(None) => Vec::new(),
        Err(err) => {
            error!(err:%; "Source parse failed");
            Vec::new()
        }
    }
}
