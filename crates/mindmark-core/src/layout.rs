//! Root layout bookkeeping.
//!
//! A root's right-side child count only means something for the two-column
//! [`LayoutDirection::Standard`] layout. The helpers here keep it defined
//! exactly when the layout is standard, and remember the user's layout
//! choice across tree regenerations.

use log::debug;

use crate::{
    node::{DiagramNode, NodeKind},
    style::LayoutDirection,
};

/// Number of children placed on the right side of a standard-layout root.
///
/// # Examples
///
/// ```
/// use mindmark_core::layout::right_node_count;
///
/// assert_eq!(right_node_count(0), 0);
/// assert_eq!(right_node_count(4), 2);
/// assert_eq!(right_node_count(5), 3);
/// ```
pub fn right_node_count(child_count: usize) -> usize {
    child_count.div_ceil(2)
}

/// Sets `layout` on a root, keeping the right-side child count consistent.
///
/// Switching to standard computes the count from the current children;
/// switching to anything else clears it.
pub fn set_root_layout(root: &mut DiagramNode, layout: LayoutDirection) {
    root.set_layout(Some(layout));
    let count = layout
        .is_standard()
        .then(|| right_node_count(root.children().len()));
    root.set_right_node_count(count);
}

/// Applies [`set_root_layout`] to every root in a root-level sequence.
pub fn apply_layout(roots: &mut [DiagramNode], layout: LayoutDirection) {
    for root in roots.iter_mut().filter(|n| n.kind() == NodeKind::Root) {
        set_root_layout(root, layout);
    }
}

/// Returns a repaired copy when the first root is standard but lacks a right-side count.
///
/// Returns `None` when no repair is needed.
pub fn repair_right_node_count(roots: &[DiagramNode]) -> Option<Vec<DiagramNode>> {
    let index = roots.iter().position(|n| n.kind() == NodeKind::Root)?;
    let root = &roots[index];
    if root.layout() != Some(LayoutDirection::Standard) || root.right_node_count().is_some() {
        return None;
    }

    let count = right_node_count(root.children().len());
    debug!(root = root.id().as_str(), count; "Filling in right node count");

    let mut repaired = roots.to_vec();
    repaired[index].set_right_node_count(Some(count));
    Some(repaired)
}

/// The most recent layout choice seen on a non-empty tree.
///
/// Regenerating a tree from source text discards every node, including the
/// layout the user picked on the root. The pipeline captures the choice
/// before each regeneration and reapplies it to the new root.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RetainedLayout {
    layout: Option<LayoutDirection>,
    right_node_count: Option<usize>,
}

impl RetainedLayout {
    pub fn layout(&self) -> Option<LayoutDirection> {
        self.layout
    }

    pub fn right_node_count(&self) -> Option<usize> {
        self.right_node_count
    }

    /// Captures the first root's layout if `roots` is non-empty.
    ///
    /// An empty tree leaves the previous capture in place.
    pub fn observe(&mut self, roots: &[DiagramNode]) {
        if let Some(root) = roots.iter().find(|n| n.kind() == NodeKind::Root) {
            self.layout = root.layout();
            self.right_node_count = root.right_node_count();
        }
    }

    /// Forgets any captured layout.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Reapplies the captured layout to the first root of a freshly parsed tree.
    ///
    /// The right-side count is recomputed from the new root's children when
    /// the layout is standard and omitted otherwise. Does nothing when no
    /// layout was captured.
    pub fn apply(&self, roots: &mut [DiagramNode]) {
        let Some(layout) = self.layout else {
            return;
        };
        if let Some(root) = roots.iter_mut().find(|n| n.kind() == NodeKind::Root) {
            set_root_layout(root, layout);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root_with(children: usize) -> DiagramNode {
        DiagramNode::root("r", "Root").with_children(
            (0..children).map(|i| DiagramNode::branch(format!("c{i}"), format!("Child {i}"))),
        )
    }

    #[test]
    fn test_right_node_count_formula() {
        assert_eq!(right_node_count(0), 0);
        assert_eq!(right_node_count(1), 1);
        assert_eq!(right_node_count(4), 2);
        assert_eq!(right_node_count(5), 3);
    }

    #[test]
    fn test_switching_to_standard_computes_count() {
        let mut roots = vec![root_with(5)];
        apply_layout(&mut roots, LayoutDirection::Standard);
        assert_eq!(roots[0].layout(), Some(LayoutDirection::Standard));
        assert_eq!(roots[0].right_node_count(), Some(3));
    }

    #[test]
    fn test_switching_away_clears_count() {
        let mut roots = vec![root_with(4).with_right_node_count(2)];
        apply_layout(&mut roots, LayoutDirection::Downward);
        assert_eq!(roots[0].layout(), Some(LayoutDirection::Downward));
        assert_eq!(roots[0].right_node_count(), None);
    }

    #[test]
    fn test_repair_only_when_missing() {
        let roots = vec![root_with(3).with_layout(LayoutDirection::Standard)];
        let repaired = repair_right_node_count(&roots).unwrap();
        assert_eq!(repaired[0].right_node_count(), Some(2));
        assert!(repair_right_node_count(&repaired).is_none());

        let right = vec![root_with(3).with_layout(LayoutDirection::Right)];
        assert!(repair_right_node_count(&right).is_none());
        assert!(repair_right_node_count(&[]).is_none());
    }

    #[test]
    fn test_retained_layout_survives_regeneration() {
        let mut retained = RetainedLayout::default();
        retained.observe(&[root_with(6)
            .with_layout(LayoutDirection::Right)
            .with_right_node_count(3)]);
        assert_eq!(retained.layout(), Some(LayoutDirection::Right));

        let mut regenerated = vec![root_with(2).with_layout(LayoutDirection::Standard)];
        retained.apply(&mut regenerated);
        assert_eq!(regenerated[0].layout(), Some(LayoutDirection::Right));
        assert_eq!(regenerated[0].right_node_count(), None);
    }

    #[test]
    fn test_retained_standard_recomputes_count() {
        let mut retained = RetainedLayout::default();
        retained.observe(&[root_with(6)
            .with_layout(LayoutDirection::Standard)
            .with_right_node_count(3)]);

        let mut regenerated = vec![root_with(5)];
        retained.apply(&mut regenerated);
        assert_eq!(regenerated[0].right_node_count(), Some(3));

        let mut smaller = vec![root_with(2)];
        retained.apply(&mut smaller);
        assert_eq!(smaller[0].right_node_count(), Some(1));
    }

    #[test]
    fn test_empty_observation_keeps_capture_and_clear_forgets() {
        let mut retained = RetainedLayout::default();
        retained.observe(&[root_with(1).with_layout(LayoutDirection::Left)]);
        retained.observe(&[]);
        assert_eq!(retained.layout(), Some(LayoutDirection::Left));

        retained.clear();
        assert_eq!(retained, RetainedLayout::default());

        let mut fresh = vec![root_with(1).with_layout(LayoutDirection::Upward)];
        retained.apply(&mut fresh);
        assert_eq!(fresh[0].layout(), Some(LayoutDirection::Upward));
    }
}
