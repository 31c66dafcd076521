//! Tree normalization.
//!
//! Trees arrive from the source parser or from stored state with optional
//! root bookkeeping. Normalization fills in what the rendering surface
//! requires: every root is flagged as a root and has an anchor position.

use crate::{
    geometry::Point,
    node::{DiagramNode, NodeKind},
};

/// Anchor given to roots that arrive without one.
pub const DEFAULT_ANCHOR: Point = Point::new(400.0, 300.0);

/// Fills in root flag and anchor on a single root-level node.
///
/// Non-root nodes are left untouched. An explicit `is_root` value is kept.
pub fn normalize_root(node: &mut DiagramNode, default_anchor: Point) {
    if node.kind() != NodeKind::Root {
        return;
    }
    if node.is_root().is_none() {
        node.set_is_root(Some(true));
    }
    if node.anchor().is_none() {
        node.set_anchor(Some(default_anchor));
    }
}

/// Returns a normalized copy of a root-level sequence.
///
/// # Examples
///
/// ```
/// use mindmark_core::node::DiagramNode;
/// use mindmark_core::normalize::{normalize_roots, DEFAULT_ANCHOR};
///
/// let roots = vec![DiagramNode::root("r", "Root")];
/// let normalized = normalize_roots(&roots, DEFAULT_ANCHOR);
///
/// assert_eq!(normalized[0].anchor(), Some(DEFAULT_ANCHOR));
/// assert_eq!(normalized[0].is_root(), Some(true));
/// ```
pub fn normalize_roots(roots: &[DiagramNode], default_anchor: Point) -> Vec<DiagramNode> {
    roots
        .iter()
        .cloned()
        .map(|mut node| {
            normalize_root(&mut node, default_anchor);
            node
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_anchor_gets_default() {
        let roots = vec![DiagramNode::root("r", "Root")];
        let normalized = normalize_roots(&roots, DEFAULT_ANCHOR);
        assert_eq!(normalized[0].anchor(), Some(Point::new(400.0, 300.0)));
    }

    #[test]
    fn test_existing_anchor_is_kept() {
        let anchor = Point::new(10.0, 20.0);
        let roots = vec![DiagramNode::root("r", "Root").with_anchor(anchor)];
        let normalized = normalize_roots(&roots, DEFAULT_ANCHOR);
        assert_eq!(normalized[0].anchor(), Some(anchor));
    }

    #[test]
    fn test_explicit_root_flag_is_kept() {
        let mut root = DiagramNode::root("r", "Root");
        root.set_is_root(Some(false));
        let normalized = normalize_roots(&[root], DEFAULT_ANCHOR);
        assert_eq!(normalized[0].is_root(), Some(false));
    }

    #[test]
    fn test_non_root_nodes_untouched() {
        let roots = vec![DiagramNode::attachment("img", "picture")];
        let normalized = normalize_roots(&roots, DEFAULT_ANCHOR);
        assert_eq!(normalized, roots);
    }

    #[test]
    fn test_input_is_not_modified() {
        let roots = vec![DiagramNode::root("r", "Root")];
        let _ = normalize_roots(&roots, DEFAULT_ANCHOR);
        assert_eq!(roots[0].anchor(), None);
    }
}
