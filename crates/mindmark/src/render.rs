//! Derivation of the tree handed to the rendering surface.
//!
//! The rendered tree is the authoritative tree after normalization and the
//! style passes. Deriving it is pure, so the result is cached and only
//! recomputed when the authoritative tree or the preferences change.

use std::sync::Arc;

use log::trace;

use mindmark_core::{
    color::Color,
    geometry::Point,
    node::DiagramNode,
    normalize::normalize_roots,
    preferences::StylePreferences,
    propagate::apply_preferences,
};

use crate::state::AuthoritativeState;

#[derive(Debug)]
struct CachedPass {
    children: Arc<[DiagramNode]>,
    preferences: StylePreferences,
    rendered: Arc<[DiagramNode]>,
}

/// Memoized render derivation for one session.
///
/// Remembers the stroke color of the previous pass, so that clearing the
/// color preference strips the color from the tree instead of leaving the
/// old value behind.
#[derive(Debug)]
pub struct RenderPass {
    default_anchor: Point,
    previous_stroke_color: Option<Color>,
    cache: Option<CachedPass>,
}

impl RenderPass {
    pub fn new(default_anchor: Point) -> Self {
        Self {
            default_anchor,
            previous_stroke_color: None,
            cache: None,
        }
    }

    /// Returns the tree to render for `state`.
    ///
    /// The authoritative tree is never modified; the result is a separate
    /// copy.
    pub fn prepare(&mut self, state: &AuthoritativeState) -> Arc<[DiagramNode]> {
        let prefs = state.preferences();
        if let Some(cache) = &self.cache {
            if Arc::ptr_eq(&cache.children, state.children_handle()) && cache.preferences == *prefs
            {
                return Arc::clone(&cache.rendered);
            }
        }

        let mut roots = normalize_roots(state.children(), self.default_anchor);
        let line = prefs.line_style(self.previous_stroke_color.as_ref());
        apply_preferences(&mut roots, prefs, line.as_ref());
        self.previous_stroke_color = prefs.stroke_color;

        trace!(roots = roots.len(), line_pass = line.is_some(); "Prepared render tree");
        let rendered: Arc<[DiagramNode]> = roots.into();
        self.cache = Some(CachedPass {
            children: Arc::clone(state.children_handle()),
            preferences: prefs.clone(),
            rendered: Arc::clone(&rendered),
        });
        rendered
    }

    /// Drops the cached result.
    pub fn invalidate(&mut self) {
        self.cache = None;
    }
}

#[cfg(test)]
mod tests {
    use mindmark_core::style::{BranchShape, NodeShape};

    use super::*;
    use crate::state::{StateStore, StateUpdate};

    fn store_with_tree() -> StateStore {
        let store = StateStore::new();
        store.update(StateUpdate::new().children(vec![
            DiagramNode::root("r", "Root").with_child(DiagramNode::branch("a", "A")),
        ]));
        store
    }

    #[test]
    fn test_prepare_normalizes_without_touching_state() {
        let store = store_with_tree();
        let mut pass = RenderPass::new(Point::new(1.0, 2.0));

        let rendered = pass.prepare(&store.snapshot());
        assert_eq!(rendered[0].anchor(), Some(Point::new(1.0, 2.0)));
        assert_eq!(rendered[0].is_root(), Some(true));
        assert_eq!(store.snapshot().children()[0].anchor(), None);
    }

    #[test]
    fn test_prepare_is_memoized() {
        let store = store_with_tree();
        let mut pass = RenderPass::new(Point::new(0.0, 0.0));

        let first = pass.prepare(&store.snapshot());
        store.update(StateUpdate::new().markdown("unrelated"));
        let second = pass.prepare(&store.snapshot());
        assert!(Arc::ptr_eq(&first, &second));

        store.update(StateUpdate::new().node_shape(Some(NodeShape::Underline)));
        let third = pass.prepare(&store.snapshot());
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(third[0].children()[0].style().shape, Some(NodeShape::Underline));
    }

    #[test]
    fn test_cleared_color_is_removed() {
        let store = store_with_tree();
        let mut pass = RenderPass::new(Point::new(0.0, 0.0));
        let red = Color::new("red").unwrap();

        store.update(StateUpdate::new().stroke_color(Some(red)).spline(Some(true)));
        let colored = pass.prepare(&store.snapshot());
        assert_eq!(colored[0].children()[0].style().branch_color, Some(red));
        assert_eq!(
            colored[0].children()[0].style().branch_shape,
            Some(BranchShape::Bight)
        );

        // A parser-provided color must be stripped once the preference is cleared.
        let mut tree = store.snapshot().children().to_vec();
        tree[0].style_mut().stroke_color = Some(red);
        store.update(StateUpdate::new().children(tree).stroke_color(None));
        let cleared = pass.prepare(&store.snapshot());
        assert_eq!(cleared[0].style().stroke_color, None);
        assert_eq!(cleared[0].children()[0].style().branch_color, None);

        // Without a previous color there is nothing to clear.
        let mut fresh = RenderPass::new(Point::new(0.0, 0.0));
        let untouched = fresh.prepare(&store.snapshot());
        assert_eq!(untouched[0].style().stroke_color, Some(red));
    }
}
