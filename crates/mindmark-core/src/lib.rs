//! Mindmark Core Types and Algorithms
//!
//! This crate provides the synchronous foundation of Mindmark. It includes:
//!
//! - **Nodes**: The mind map tree ([`node::DiagramNode`]) and node kinds
//! - **Styles**: Branch shapes, strokes, node shapes, layouts and themes ([`style`])
//! - **Normalization**: Root anchors and flags ([`normalize`])
//! - **Propagation**: Pushing style values through subtrees ([`propagate`])
//! - **Reconciliation**: Collapse-insensitive structural comparison ([`reconcile`])
//! - **Layout**: Right-side child counts and retained layout choices ([`layout`])

pub mod color;
pub mod geometry;
pub mod identifier;
pub mod layout;
pub mod node;
pub mod normalize;
pub mod preferences;
pub mod propagate;
pub mod reconcile;
pub mod style;
