//! Mindmark - keeps a mind map's outline text, node tree and canvas in sync.
//!
//! The engine regenerates the tree from the outline text after a short
//! quiet period, pushes the user's style preferences through every tree it
//! renders, and reconciles edits made on the rendering surface back into the
//! authoritative state without letting render-only state (such as collapsed
//! subtrees) cause writes.
//!
//! Most callers only need a [`Session`]; the building blocks are public for
//! UI layers that want to wire things differently.

pub mod config;
pub mod demo;
pub mod parser;
pub mod pipeline;
pub mod render;
pub mod session;
pub mod state;
pub mod storage;
pub mod surface;
pub mod theme;

mod error;

pub use mindmark_core::{
    color, geometry, identifier, layout, node, normalize, preferences, propagate, reconcile, style,
};

pub use config::AppConfig;
pub use error::MindmarkError;
pub use session::Session;
pub use state::{AuthoritativeState, StateStore, StateUpdate};
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};
