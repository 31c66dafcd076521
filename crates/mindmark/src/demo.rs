//! Built-in demo content shown when a session starts without any source text.

use mindmark_core::node::DiagramNode;

/// Outline text of the demo mind map.
pub const DEMO_MARKDOWN: &str = "\
# Mindmark

## Write
- Edit the outline on the left
- The map follows after a short pause

## Arrange
- Pick a layout
- Drag nodes on the canvas

## Style
- Curved or straight branches
- Stroke style, width and color
- Rounded or underlined nodes
";

/// The tree corresponding to [`DEMO_MARKDOWN`].
pub fn demo_tree() -> DiagramNode {
    fn section(id: &str, topic: &str, items: &[&str]) -> DiagramNode {
        DiagramNode::branch(id, topic).with_children(
            items
                .iter()
                .enumerate()
                .map(|(i, item)| DiagramNode::branch(format!("{id}-{i}"), *item)),
        )
    }

    DiagramNode::root("demo", "Mindmark").with_children([
        section(
            "write",
            "Write",
            &[
                "Edit the outline on the left",
                "The map follows after a short pause",
            ],
        ),
        section(
            "arrange",
            "Arrange",
            &["Pick a layout", "Drag nodes on the canvas"],
        ),
        section(
            "style",
            "Style",
            &[
                "Curved or straight branches",
                "Stroke style, width and color",
                "Rounded or underlined nodes",
            ],
        ),
    ])
}
