//! The authoritative state and its store.
//!
//! [`StateStore`] owns the single authoritative copy of the session state.
//! Readers get immutable [`Arc`] snapshots; writers go through
//! [`StateStore::update`], which builds a new state from the current one and
//! a [`StateUpdate`] and swaps it in whole. A snapshot never changes after it
//! was taken, so no reader can observe a half-applied update.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use log::{debug, trace};
use tokio::sync::watch;

use mindmark_core::{
    color::Color,
    geometry::Viewport,
    node::DiagramNode,
    preferences::StylePreferences,
    style::{NodeShape, StrokeStyle, Theme},
};

use crate::demo;

/// Everything a session treats as current.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthoritativeState {
    children: Arc<[DiagramNode]>,
    viewport: Option<Viewport>,
    theme: Option<Theme>,
    markdown: String,
    preferences: StylePreferences,
}

impl AuthoritativeState {
    /// Creates a state from its parts.
    pub fn new(
        children: Vec<DiagramNode>,
        viewport: Option<Viewport>,
        theme: Option<Theme>,
        markdown: impl Into<String>,
        preferences: StylePreferences,
    ) -> Self {
        Self {
            children: children.into(),
            viewport,
            theme,
            markdown: markdown.into(),
            preferences,
        }
    }

    /// The root-level node sequence.
    pub fn children(&self) -> &[DiagramNode] {
        &self.children
    }

    /// The root-level node sequence as a shared handle.
    ///
    /// Two states share a handle exactly when neither replaced the tree, which
    /// makes the handle usable as a cheap change marker.
    pub fn children_handle(&self) -> &Arc<[DiagramNode]> {
        &self.children
    }

    /// The pinned viewport; `None` means fit to content.
    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    /// The stored theme; `None` means follow the ambient theme.
    pub fn theme(&self) -> Option<Theme> {
        self.theme
    }

    /// The raw source text.
    pub fn markdown(&self) -> &str {
        &self.markdown
    }

    pub fn preferences(&self) -> &StylePreferences {
        &self.preferences
    }

    /// Merges `update` into this state, returning whether anything changed.
    fn apply(&mut self, update: StateUpdate) -> bool {
        fn merge<T: PartialEq>(slot: &mut T, value: Option<T>) -> bool {
            match value {
                Some(value) if *slot != value => {
                    *slot = value;
                    true
                }
                _ => false,
            }
        }

        let StateUpdate {
            children,
            viewport,
            theme,
            markdown,
            spline,
            stroke_style,
            stroke_width,
            stroke_color,
            node_shape,
            presentation_mode,
        } = update;

        let mut changed = false;
        if let Some(children) = children {
            if *self.children != *children {
                self.children = children.into();
                changed = true;
            }
        }
        changed |= merge(&mut self.viewport, viewport);
        changed |= merge(&mut self.theme, theme);
        changed |= merge(&mut self.markdown, markdown);

        let prefs = &mut self.preferences;
        changed |= merge(&mut prefs.spline, spline);
        changed |= merge(&mut prefs.stroke_style, stroke_style);
        changed |= merge(&mut prefs.stroke_width, stroke_width);
        changed |= merge(&mut prefs.stroke_color, stroke_color);
        changed |= merge(&mut prefs.node_shape, node_shape);
        changed |= merge(&mut prefs.presentation_mode, presentation_mode);
        changed
    }
}

/// A partial update of [`AuthoritativeState`].
///
/// Fields that are not mentioned are left unchanged. Optional fields take an
/// `Option` so they can be cleared as well as set.
///
/// # Examples
///
/// ```
/// use mindmark::state::{StateStore, StateUpdate};
/// use mindmark::geometry::Viewport;
///
/// let store = StateStore::new();
/// store.update(StateUpdate::new().viewport(Some(Viewport::new(1.5))).spline(Some(true)));
///
/// let state = store.snapshot();
/// assert_eq!(state.viewport(), Some(Viewport::new(1.5)));
/// assert_eq!(state.preferences().spline, Some(true));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[must_use]
pub struct StateUpdate {
    children: Option<Vec<DiagramNode>>,
    viewport: Option<Option<Viewport>>,
    theme: Option<Option<Theme>>,
    markdown: Option<String>,
    spline: Option<Option<bool>>,
    stroke_style: Option<Option<StrokeStyle>>,
    stroke_width: Option<Option<u32>>,
    stroke_color: Option<Option<Color>>,
    node_shape: Option<Option<NodeShape>>,
    presentation_mode: Option<Option<bool>>,
}

impl StateUpdate {
    /// An update that changes nothing.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn children(mut self, children: Vec<DiagramNode>) -> Self {
        self.children = Some(children);
        self
    }

    pub fn viewport(mut self, viewport: Option<Viewport>) -> Self {
        self.viewport = Some(viewport);
        self
    }

    pub fn theme(mut self, theme: Option<Theme>) -> Self {
        self.theme = Some(theme);
        self
    }

    pub fn markdown(mut self, markdown: impl Into<String>) -> Self {
        self.markdown = Some(markdown.into());
        self
    }

    pub fn spline(mut self, spline: Option<bool>) -> Self {
        self.spline = Some(spline);
        self
    }

    pub fn stroke_style(mut self, style: Option<StrokeStyle>) -> Self {
        self.stroke_style = Some(style);
        self
    }

    pub fn stroke_width(mut self, width: Option<u32>) -> Self {
        self.stroke_width = Some(width);
        self
    }

    pub fn stroke_color(mut self, color: Option<Color>) -> Self {
        self.stroke_color = Some(color);
        self
    }

    pub fn node_shape(mut self, shape: Option<NodeShape>) -> Self {
        self.node_shape = Some(shape);
        self
    }

    pub fn presentation_mode(mut self, enabled: Option<bool>) -> Self {
        self.presentation_mode = Some(enabled);
        self
    }

    /// Replaces every preference with the values in `prefs`.
    pub fn preferences(self, prefs: StylePreferences) -> Self {
        self.spline(prefs.spline)
            .stroke_style(prefs.stroke_style)
            .stroke_width(prefs.stroke_width)
            .stroke_color(prefs.stroke_color)
            .node_shape(prefs.node_shape)
            .presentation_mode(prefs.presentation_mode)
    }

    /// The spline value this update sets, if it touches the preference.
    pub fn spline_change(&self) -> Option<Option<bool>> {
        self.spline
    }

    /// Whether this update mentions no field at all.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Owner of the authoritative state.
///
/// Cloning a `StateStore` yields another handle to the same state.
#[derive(Debug, Clone)]
pub struct StateStore {
    sender: Arc<watch::Sender<Arc<AuthoritativeState>>>,
    revision: Arc<AtomicU64>,
    emptied: Arc<AtomicU64>,
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StateStore {
    /// Creates a store holding the empty state.
    pub fn new() -> Self {
        Self::with_state(AuthoritativeState::default())
    }

    /// Creates a store holding `state`.
    pub fn with_state(state: AuthoritativeState) -> Self {
        let (sender, _) = watch::channel(Arc::new(state));
        Self {
            sender: Arc::new(sender),
            revision: Arc::new(AtomicU64::new(0)),
            emptied: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Returns the current state.
    pub fn snapshot(&self) -> Arc<AuthoritativeState> {
        Arc::clone(&self.sender.borrow())
    }

    /// Subscribes to state replacements.
    pub fn subscribe(&self) -> watch::Receiver<Arc<AuthoritativeState>> {
        self.sender.subscribe()
    }

    /// Number of updates that changed the state so far.
    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::SeqCst)
    }

    /// Number of times the tree went from some roots to none.
    ///
    /// Lets observers that only look at snapshots now and then notice an
    /// emptied tree that was repopulated in between.
    pub fn emptied(&self) -> u64 {
        self.emptied.load(Ordering::SeqCst)
    }

    fn count_emptied(&self, before: &AuthoritativeState, after: &AuthoritativeState) {
        if !before.children().is_empty() && after.children().is_empty() {
            self.emptied.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// Merges `update` into the state.
    ///
    /// Returns `false`, and notifies nobody, when the update leaves every
    /// field as it was.
    pub fn update(&self, update: StateUpdate) -> bool {
        if update.is_empty() {
            return false;
        }
        trace!(update:?; "Merging state update");

        let changed = self.sender.send_if_modified(|current| {
            let mut next = AuthoritativeState::clone(current);
            if !next.apply(update) {
                return false;
            }
            self.count_emptied(current, &next);
            *current = Arc::new(next);
            true
        });

        if changed {
            let revision = self.revision.fetch_add(1, Ordering::SeqCst) + 1;
            debug!(revision; "State updated");
        }
        changed
    }

    /// Replaces the whole state, e.g. after loading it from storage.
    pub fn replace(&self, state: AuthoritativeState) {
        let previous = self.sender.send_replace(Arc::new(state));
        self.count_emptied(&previous, &self.snapshot());
        self.revision.fetch_add(1, Ordering::SeqCst);
    }

    /// Clears tree, viewport, theme and source text. Preferences are kept.
    pub fn reset(&self) -> bool {
        self.update(
            StateUpdate::new()
                .children(Vec::new())
                .viewport(None)
                .theme(None)
                .markdown(String::new()),
        )
    }

    /// Loads the built-in demo outline and its tree.
    pub fn load_default(&self) -> bool {
        self.update(
            StateUpdate::new()
                .markdown(demo::DEMO_MARKDOWN)
                .children(vec![demo::demo_tree()])
                .viewport(None),
        )
    }
}
