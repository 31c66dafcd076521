//! Structural comparison between the rendered tree and the authoritative tree.
//!
//! The rendering surface mutates its own copy of the tree while the user
//! interacts with it. Some of those mutations are structural (dragging a
//! node, editing a topic) and must become the new authoritative tree; others
//! only affect presentation (collapsing a subtree) and must not.

use log::debug;

use crate::node::DiagramNode;

/// Outcome of reconciling a live tree against the authoritative one.
#[derive(Debug, Clone, PartialEq)]
pub enum Reconciliation {
    /// Nothing structural changed; keep the authoritative tree.
    Unchanged,
    /// The live tree differs structurally and should be adopted.
    Adopt(Vec<DiagramNode>),
}

impl Reconciliation {
    pub fn is_changed(&self) -> bool {
        matches!(self, Self::Adopt(_))
    }
}

/// Whether `live` differs from `authoritative` in anything but collapse state.
///
/// Roots are compared pairwise in order; a different number of roots is
/// always a change.
///
/// # Examples
///
/// ```
/// use mindmark_core::node::DiagramNode;
/// use mindmark_core::reconcile::has_structural_change;
///
/// let stored = vec![DiagramNode::root("r", "Root")];
/// let collapsed = vec![DiagramNode::root("r", "Root").with_collapsed(true)];
/// let renamed = vec![DiagramNode::root("r", "Renamed")];
///
/// assert!(!has_structural_change(&collapsed, &stored));
/// assert!(has_structural_change(&renamed, &stored));
/// ```
pub fn has_structural_change(live: &[DiagramNode], authoritative: &[DiagramNode]) -> bool {
    if live.len() != authoritative.len() {
        return true;
    }
    live.iter()
        .zip(authoritative)
        .any(|(live, stored)| !live.eq_ignoring_collapse(stored))
}

/// Decides whether the live tree replaces the authoritative tree.
///
/// Takes the live tree by value: the caller hands over its own copy, so the
/// adopted tree shares nothing with the rendering surface.
pub fn reconcile(live: Vec<DiagramNode>, authoritative: &[DiagramNode]) -> Reconciliation {
    if has_structural_change(&live, authoritative) {
        debug!(
            live_roots = live.len(),
            stored_roots = authoritative.len();
            "Structural change reported by rendering surface"
        );
        Reconciliation::Adopt(live)
    } else {
        Reconciliation::Unchanged
    }
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;
    use crate::node::NodeKind;

    // ===================
    // Strategies
    // ===================

    fn tree_strategy() -> impl Strategy<Value = DiagramNode> {
        let leaf = (0u32..50, any::<bool>()).prop_map(|(n, collapsed)| {
            DiagramNode::branch(format!("n{n}"), format!("t{n}")).with_collapsed(collapsed)
        });
        leaf.prop_recursive(4, 24, 4, |inner| {
            (0u32..50, any::<bool>(), prop::collection::vec(inner, 0..4)).prop_map(
                |(n, collapsed, children)| {
                    DiagramNode::new(format!("n{n}"), NodeKind::Branch, format!("t{n}"))
                        .with_collapsed(collapsed)
                        .with_children(children)
                },
            )
        })
    }

    fn flip_collapse(node: &mut DiagramNode, mask: &mut impl Iterator<Item = bool>) {
        if mask.next().unwrap_or(false) {
            node.set_collapsed(!node.is_collapsed());
        }
        for child in node.children_mut() {
            flip_collapse(child, mask);
        }
    }

    // ===================
    // Property Test Functions
    // ===================

    /// Trees that differ only in collapse flags are never reported as changed.
    fn check_collapse_insensitive(
        tree: DiagramNode,
        mask: Vec<bool>,
    ) -> Result<(), TestCaseError> {
        let mut flipped = tree.clone();
        flip_collapse(&mut flipped, &mut mask.into_iter());
        prop_assert!(!has_structural_change(&[flipped], &[tree]));
        Ok(())
    }

    /// Changing any topic is always reported as changed.
    fn check_topic_sensitive(tree: DiagramNode, pick: usize) -> Result<(), TestCaseError> {
        fn rename_nth(node: &mut DiagramNode, n: &mut usize) -> bool {
            if *n == 0 {
                let topic = format!("{} (edited)", node.topic());
                node.set_topic(topic);
                return true;
            }
            *n -= 1;
            node.children_mut().iter_mut().any(|child| rename_nth(child, n))
        }

        let mut edited = tree.clone();
        let mut n = pick % tree.subtree_len();
        prop_assert!(rename_nth(&mut edited, &mut n));
        prop_assert!(has_structural_change(&[edited], &[tree]));
        Ok(())
    }

    /// Appending a child anywhere is always reported as changed.
    fn check_child_count_sensitive(tree: DiagramNode) -> Result<(), TestCaseError> {
        let mut edited = tree.clone();
        edited
            .children_mut()
            .push(DiagramNode::branch("extra", "Extra"));
        prop_assert!(has_structural_change(&[edited], &[tree]));
        Ok(())
    }

    // ===================
    // Proptest Wrappers
    // ===================

    proptest! {
        #[test]
        fn collapse_flags_never_count(tree in tree_strategy(), mask in prop::collection::vec(any::<bool>(), 0..64)) {
            check_collapse_insensitive(tree, mask)?;
        }

        #[test]
        fn topic_edits_always_count(tree in tree_strategy(), pick in any::<usize>()) {
            check_topic_sensitive(tree, pick)?;
        }

        #[test]
        fn child_additions_always_count(tree in tree_strategy()) {
            check_child_count_sensitive(tree)?;
        }
    }
}
