//! Style propagation through mind map subtrees.
//!
//! Each pass sets one attribute family on a node and on every diagram-kind
//! descendant, leaving all other attributes alone. Attachments, and anything
//! below them, are skipped.
//!
//! All passes are idempotent: running a pass twice with the same value gives
//! the same tree as running it once.

use log::trace;

use crate::{
    color::Color,
    node::{DiagramNode, NodeKind},
    preferences::StylePreferences,
    style::{BranchShape, NodeShape, StrokeStyle},
};

/// What a line style pass does to `stroke_color`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorChange {
    /// Leave the node's color as it is.
    Keep,
    /// Set the color and its `branch_color` mirror.
    Set(Color),
    /// Remove the color and its `branch_color` mirror.
    Clear,
}

/// Values applied by [`propagate_line_style`]; `None` fields are left unchanged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    pub stroke_style: Option<StrokeStyle>,
    pub stroke_width: Option<u32>,
    pub stroke_color: ColorChange,
}

fn walk(node: &mut DiagramNode, apply: &mut impl FnMut(&mut DiagramNode)) {
    apply(node);
    for child in node.children_mut() {
        if child.kind().is_diagram() {
            walk(child, apply);
        }
    }
}

/// Sets `branch_shape` on `node` and every diagram descendant.
pub fn propagate_branch_shape(node: &mut DiagramNode, shape: BranchShape) {
    trace!(root = node.id().as_str(), shape:?; "Propagating branch shape");
    walk(node, &mut |n: &mut DiagramNode| n.style_mut().branch_shape = Some(shape));
}

/// Applies stroke style, width and color to `node` and every diagram descendant.
///
/// Width also sets the `branch_width` mirror; color sets or removes the
/// `branch_color` mirror together with `stroke_color`.
pub fn propagate_line_style(node: &mut DiagramNode, line: &LineStyle) {
    trace!(root = node.id().as_str(), line:?; "Propagating line style");
    walk(node, &mut |n: &mut DiagramNode| {
        let style = n.style_mut();
        if let Some(stroke_style) = line.stroke_style {
            style.stroke_style = Some(stroke_style);
        }
        if let Some(width) = line.stroke_width {
            style.stroke_width = Some(width);
            style.branch_width = Some(width);
        }
        match line.stroke_color {
            ColorChange::Keep => {}
            ColorChange::Set(color) => {
                style.stroke_color = Some(color);
                style.branch_color = Some(color);
            }
            ColorChange::Clear => {
                style.stroke_color = None;
                style.branch_color = None;
            }
        }
    });
}

/// Sets `shape` on `node` and every diagram descendant.
pub fn propagate_node_shape(node: &mut DiagramNode, shape: NodeShape) {
    trace!(root = node.id().as_str(), shape:?; "Propagating node shape");
    walk(node, &mut |n: &mut DiagramNode| n.style_mut().shape = Some(shape));
}

/// Whether `node` and every diagram descendant already use `shape`.
pub fn has_uniform_branch_shape(node: &DiagramNode, shape: BranchShape) -> bool {
    node.style().branch_shape == Some(shape)
        && node
            .diagram_children()
            .all(|child| has_uniform_branch_shape(child, shape))
}

/// Runs every pass implied by `prefs` over the roots of `roots`.
///
/// `line` is the line style pass to run, if any (see
/// [`StylePreferences::line_style`]). Non-root top-level nodes are skipped.
pub fn apply_preferences(
    roots: &mut [DiagramNode],
    prefs: &StylePreferences,
    line: Option<&LineStyle>,
) {
    for root in roots.iter_mut().filter(|n| n.kind() == NodeKind::Root) {
        if let Some(shape) = prefs.branch_shape() {
            propagate_branch_shape(root, shape);
        }
        if let Some(line) = line {
            propagate_line_style(root, line);
        }
        if let Some(shape) = prefs.node_shape {
            propagate_node_shape(root, shape);
        }
    }
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    // ===================
    // Strategies
    // ===================

    fn kind_strategy() -> impl Strategy<Value = NodeKind> {
        prop_oneof![
            4 => Just(NodeKind::Branch),
            1 => Just(NodeKind::Attachment),
        ]
    }

    fn subtree_strategy() -> impl Strategy<Value = DiagramNode> {
        let leaf = (0u32..1000, kind_strategy())
            .prop_map(|(n, kind)| DiagramNode::new(format!("n{n}"), kind, format!("topic {n}")));
        leaf.prop_recursive(4, 32, 4, |inner| {
            (0u32..1000, kind_strategy(), prop::collection::vec(inner, 0..4)).prop_map(
                |(n, kind, children)| {
                    DiagramNode::new(format!("n{n}"), kind, format!("topic {n}"))
                        .with_children(children)
                },
            )
        })
    }

    fn root_strategy() -> impl Strategy<Value = DiagramNode> {
        prop::collection::vec(subtree_strategy(), 0..5)
            .prop_map(|children| DiagramNode::root("root", "Root").with_children(children))
    }

    fn branch_shape_strategy() -> impl Strategy<Value = BranchShape> {
        prop_oneof![Just(BranchShape::Bight), Just(BranchShape::Polyline)]
    }

    fn line_style_strategy() -> impl Strategy<Value = LineStyle> {
        let style = prop::option::of(prop_oneof![
            Just(StrokeStyle::Solid),
            Just(StrokeStyle::Dashed),
            Just(StrokeStyle::Dotted),
        ]);
        let width = prop::option::of(1u32..=20);
        let color = prop_oneof![
            Just(ColorChange::Keep),
            Just(ColorChange::Clear),
            Just(ColorChange::Set(Color::new("teal").unwrap())),
        ];
        (style, width, color).prop_map(|(stroke_style, stroke_width, stroke_color)| LineStyle {
            stroke_style,
            stroke_width,
            stroke_color,
        })
    }

    fn diagram_nodes(node: &DiagramNode, out: &mut Vec<DiagramNode>) {
        out.push(node.clone());
        for child in node.diagram_children() {
            diagram_nodes(child, out);
        }
    }

    // ===================
    // Property Test Functions
    // ===================

    /// Every diagram node reachable from the root carries the propagated shape.
    fn check_branch_shape_complete(
        mut root: DiagramNode,
        shape: BranchShape,
    ) -> Result<(), TestCaseError> {
        propagate_branch_shape(&mut root, shape);
        let mut nodes = Vec::new();
        diagram_nodes(&root, &mut nodes);
        for node in nodes {
            prop_assert_eq!(node.style().branch_shape, Some(shape));
        }
        Ok(())
    }

    /// Applying the same line style twice equals applying it once.
    fn check_line_style_idempotent(
        root: DiagramNode,
        line: LineStyle,
    ) -> Result<(), TestCaseError> {
        let mut once = root.clone();
        propagate_line_style(&mut once, &line);
        let mut twice = once.clone();
        propagate_line_style(&mut twice, &line);
        prop_assert_eq!(once, twice);
        Ok(())
    }

    /// Node shape propagation is idempotent and complete.
    fn check_node_shape(mut root: DiagramNode) -> Result<(), TestCaseError> {
        propagate_node_shape(&mut root, NodeShape::Underline);
        let snapshot = root.clone();
        propagate_node_shape(&mut root, NodeShape::Underline);
        prop_assert_eq!(&snapshot, &root);

        let mut nodes = Vec::new();
        diagram_nodes(&root, &mut nodes);
        for node in nodes {
            prop_assert_eq!(node.style().shape, Some(NodeShape::Underline));
        }
        Ok(())
    }

    // ===================
    // Proptest Wrappers
    // ===================

    proptest! {
        #[test]
        fn branch_shape_is_complete(root in root_strategy(), shape in branch_shape_strategy()) {
            check_branch_shape_complete(root, shape)?;
        }

        #[test]
        fn line_style_is_idempotent(root in root_strategy(), line in line_style_strategy()) {
            check_line_style_idempotent(root, line)?;
        }

        #[test]
        fn node_shape_is_idempotent_and_complete(root in root_strategy()) {
            check_node_shape(root)?;
        }
    }
}
