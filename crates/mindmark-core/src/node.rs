//! The mind map node tree.
//!
//! A diagram is a sequence of root-level [`DiagramNode`]s. Each node owns its
//! children, so cloning a tree always produces an independent deep copy and
//! no two owners can observe each other's edits.
//!
//! Trees are treated as immutable values by the rest of the system: an update
//! builds a modified copy and swaps it in as a whole. The `set_*` methods are
//! meant for building such copies.

use serde::{Deserialize, Serialize};

use crate::{
    color::Color,
    geometry::Point,
    identifier::NodeId,
    style::{BranchShape, LayoutDirection, NodeShape, StrokeStyle},
};

/// The role a node plays in the diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    /// Top-level node of a mind map; owns the anchor and the layout.
    Root,
    /// Any descendant topic of a mind map.
    Branch,
    /// A foreign element embedded in the tree (image, free drawing, ...).
    ///
    /// Attachments are carried along unchanged and never receive propagated
    /// style attributes.
    Attachment,
}

impl NodeKind {
    /// Whether nodes of this kind are part of the mind map diagram itself.
    pub fn is_diagram(self) -> bool {
        match self {
            Self::Root | Self::Branch => true,
            Self::Attachment => false,
        }
    }
}

/// Per-node style attributes.
///
/// Every attribute is optional. Nothing is inherited implicitly; values reach
/// descendants only through the propagation passes in
/// [`propagate`](crate::propagate).
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_shape: Option<BranchShape>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_style: Option<StrokeStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_color: Option<Color>,
    /// Mirror of `stroke_width` read by the branch renderer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_width: Option<u32>,
    /// Mirror of `stroke_color` read by the branch renderer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<NodeShape>,
}

/// A node of the mind map tree.
///
/// # Examples
///
/// ```
/// use mindmark_core::node::{DiagramNode, NodeKind};
///
/// let root = DiagramNode::root("root", "Plan")
///     .with_child(DiagramNode::branch("a", "Research"))
///     .with_child(DiagramNode::branch("b", "Build"));
///
/// assert_eq!(root.kind(), NodeKind::Root);
/// assert_eq!(root.children().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramNode {
    id: NodeId,
    #[serde(rename = "type")]
    kind: NodeKind,
    #[serde(default)]
    topic: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    is_root: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    anchor: Option<Point>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    children: Vec<DiagramNode>,
    #[serde(flatten)]
    style: NodeStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    layout: Option<LayoutDirection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    right_node_count: Option<usize>,
    /// Render-only state; never part of structural comparison.
    #[serde(default, skip_serializing_if = "is_false")]
    collapsed: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl DiagramNode {
    /// Creates a childless node of the given kind.
    pub fn new(id: impl Into<NodeId>, kind: NodeKind, topic: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            topic: topic.into(),
            is_root: None,
            anchor: None,
            children: Vec::new(),
            style: NodeStyle::default(),
            layout: None,
            right_node_count: None,
            collapsed: false,
        }
    }

    /// Creates a root node.
    pub fn root(id: impl Into<NodeId>, topic: impl Into<String>) -> Self {
        Self::new(id, NodeKind::Root, topic)
    }

    /// Creates a branch node.
    pub fn branch(id: impl Into<NodeId>, topic: impl Into<String>) -> Self {
        Self::new(id, NodeKind::Branch, topic)
    }

    /// Creates an attachment node.
    pub fn attachment(id: impl Into<NodeId>, topic: impl Into<String>) -> Self {
        Self::new(id, NodeKind::Attachment, topic)
    }

    pub fn with_child(mut self, child: DiagramNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = DiagramNode>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn with_anchor(mut self, anchor: Point) -> Self {
        self.anchor = Some(anchor);
        self
    }

    pub fn with_layout(mut self, layout: LayoutDirection) -> Self {
        self.layout = Some(layout);
        self
    }

    pub fn with_right_node_count(mut self, count: usize) -> Self {
        self.right_node_count = Some(count);
        self
    }

    pub fn with_style(mut self, style: NodeStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_collapsed(mut self, collapsed: bool) -> Self {
        self.collapsed = collapsed;
        self
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn is_root(&self) -> Option<bool> {
        self.is_root
    }

    pub fn anchor(&self) -> Option<Point> {
        self.anchor
    }

    pub fn children(&self) -> &[DiagramNode] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut Vec<DiagramNode> {
        &mut self.children
    }

    pub fn style(&self) -> &NodeStyle {
        &self.style
    }

    pub fn style_mut(&mut self) -> &mut NodeStyle {
        &mut self.style
    }

    pub fn layout(&self) -> Option<LayoutDirection> {
        self.layout
    }

    pub fn right_node_count(&self) -> Option<usize> {
        self.right_node_count
    }

    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    pub fn set_topic(&mut self, topic: impl Into<String>) {
        self.topic = topic.into();
    }

    pub fn set_is_root(&mut self, is_root: Option<bool>) {
        self.is_root = is_root;
    }

    pub fn set_anchor(&mut self, anchor: Option<Point>) {
        self.anchor = anchor;
    }

    pub fn set_layout(&mut self, layout: Option<LayoutDirection>) {
        self.layout = layout;
    }

    pub fn set_right_node_count(&mut self, count: Option<usize>) {
        self.right_node_count = count;
    }

    pub fn set_collapsed(&mut self, collapsed: bool) {
        self.collapsed = collapsed;
    }

    /// Diagram-kind children, skipping attachments.
    pub fn diagram_children(&self) -> impl Iterator<Item = &DiagramNode> {
        self.children.iter().filter(|child| child.kind.is_diagram())
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn subtree_len(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(DiagramNode::subtree_len)
            .sum::<usize>()
    }

    /// Compares two subtrees field by field, ignoring collapse state.
    ///
    /// Children are compared pairwise in order, so reordering siblings counts
    /// as a difference.
    pub fn eq_ignoring_collapse(&self, other: &Self) -> bool {
        // Destructured so that adding a field forces a decision here.
        let Self {
            id,
            kind,
            topic,
            is_root,
            anchor,
            children,
            style,
            layout,
            right_node_count,
            collapsed: _,
        } = self;

        *id == other.id
            && *kind == other.kind
            && *topic == other.topic
            && *is_root == other.is_root
            && *anchor == other.anchor
            && *style == other.style
            && *layout == other.layout
            && *right_node_count == other.right_node_count
            && children.len() == other.children.len()
            && children
                .iter()
                .zip(&other.children)
                .all(|(a, b)| a.eq_ignoring_collapse(b))
    }

    /// Returns a copy of this subtree with every collapse flag cleared.
    pub fn without_collapse(&self) -> Self {
        let mut copy = self.clone();
        copy.clear_collapse();
        copy
    }

    fn clear_collapse(&mut self) {
        self.collapsed = false;
        for child in &mut self.children {
            child.clear_collapse();
        }
    }
}
