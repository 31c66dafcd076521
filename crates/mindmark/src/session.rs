//! The session façade tying the engine together.
//!
//! A [`Session`] owns the state store, the recompute pipeline, the render
//! pass and the theme bookkeeping for one open mind map. UI layers talk to
//! the session only:
//!
//! - the text editor reports changes with [`Session::on_text_change`];
//! - the rendering surface is attached with [`Session::attach_surface`],
//!   draws what [`Session::render`] returns, and reports interactions with
//!   [`Session::on_surface_change`];
//! - tool buttons call the command methods ([`Session::set_layout`],
//!   [`Session::zoom_in`], [`Session::update`], ...).

use std::sync::Arc;

use log::{debug, info, warn};
use tokio::sync::watch;

use mindmark_core::{
    geometry::Viewport,
    layout::{apply_layout, repair_right_node_count},
    node::{DiagramNode, NodeKind},
    propagate::{has_uniform_branch_shape, propagate_branch_shape},
    style::{AmbientTheme, BranchShape, LayoutDirection, Theme},
};

use crate::{
    config::AppConfig,
    demo,
    error::MindmarkError,
    parser::SourceParser,
    pipeline::RecomputePipeline,
    render::RenderPass,
    state::{AuthoritativeState, StateStore, StateUpdate},
    storage::{self, Storage},
    surface::{RenderSurface, SurfaceChange, reconcile_change},
    theme::{ThemeSync, ViewportGuard},
};

/// One open mind map.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use mindmark::{AppConfig, Session, node::DiagramNode, parser::ParseFailure};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let parser = |text: &str| -> Result<Option<DiagramNode>, ParseFailure> {
///     Ok(Some(DiagramNode::root("root", text.trim())))
/// };
/// let mut session = Session::new(AppConfig::default(), Arc::new(parser));
/// session.on_text_change(Some("Plan"));
/// session.zoom_in();
/// assert!(session.state().viewport().is_some());
/// # }
/// ```
pub struct Session {
    config: AppConfig,
    store: StateStore,
    pipeline: RecomputePipeline,
    render: RenderPass,
    theme: ThemeSync,
    viewport_guard: ViewportGuard,
    surface: Option<Arc<dyn RenderSurface>>,
    saved_revision: Option<u64>,
}

impl Session {
    /// Creates a session over an empty state.
    pub fn new(config: AppConfig, parser: Arc<dyn SourceParser>) -> Self {
        Self::with_store(config, StateStore::new(), parser)
    }

    /// Creates a session over an existing store.
    pub fn with_store(config: AppConfig, store: StateStore, parser: Arc<dyn SourceParser>) -> Self {
        let pipeline = RecomputePipeline::new(store.clone(), parser, config.sync().debounce());
        let render = RenderPass::new(config.canvas().default_anchor());
        Self {
            config,
            store,
            pipeline,
            render,
            theme: ThemeSync::default(),
            viewport_guard: ViewportGuard::new(),
            surface: None,
            saved_revision: None,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    /// The current authoritative state.
    pub fn state(&self) -> Arc<AuthoritativeState> {
        self.store.snapshot()
    }

    /// Notifies on every state change; call [`Session::render`] in response.
    pub fn subscribe(&self) -> watch::Receiver<Arc<AuthoritativeState>> {
        self.store.subscribe()
    }

    /// Merges `update` into the state.
    ///
    /// When the update switches the spline preference, the authoritative tree
    /// is rewritten to the matching branch shape as well.
    pub fn update(&mut self, update: StateUpdate) -> bool {
        let previous_spline = self.store.snapshot().preferences().spline;
        let spline = update.spline_change().flatten();

        let changed = self.store.update(update);
        if let Some(spline) = spline {
            if previous_spline != Some(spline) {
                self.rewrite_branch_shape(BranchShape::from_spline(spline));
            }
        }
        changed
    }

    fn rewrite_branch_shape(&self, shape: BranchShape) {
        let state = self.store.snapshot();
        let roots = || state.children().iter().filter(|n| n.kind() == NodeKind::Root);
        if roots().all(|root| has_uniform_branch_shape(root, shape)) {
            return;
        }

        debug!(shape:?; "Rewriting branch shape of stored tree");
        let mut children = state.children().to_vec();
        for root in children.iter_mut().filter(|n| n.kind() == NodeKind::Root) {
            propagate_branch_shape(root, shape);
        }
        self.store.update(StateUpdate::new().children(children));
    }

    /// Handles a change of the source text.
    ///
    /// `None` counts as empty text.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn on_text_change(&mut self, text: Option<&str>) {
        let text = text.unwrap_or_default();
        self.store.update(StateUpdate::new().markdown(text));
        self.pipeline.schedule(text);
    }

    /// Loads the demo content if the source text is empty.
    ///
    /// Returns whether the demo was loaded.
    pub fn ensure_content(&mut self) -> bool {
        if !self.store.snapshot().markdown().trim().is_empty() {
            return false;
        }
        self.load_default_content();
        true
    }

    /// Replaces text and tree with the demo content and schedules a regeneration.
    pub fn load_default_content(&mut self) {
        info!("Loading default content");
        self.store.load_default();
        self.pipeline.schedule(demo::DEMO_MARKDOWN);
    }

    /// Clears tree, viewport, theme and text. Style preferences survive.
    pub fn reset(&mut self) {
        info!("Resetting session state");
        self.store.reset();
        self.pipeline.schedule("");
    }

    pub fn attach_surface(&mut self, surface: Arc<dyn RenderSurface>) {
        self.surface = Some(surface);
    }

    pub fn detach_surface(&mut self) -> Option<Arc<dyn RenderSurface>> {
        self.surface.take()
    }

    /// Produces the tree the rendering surface should draw.
    ///
    /// Also runs the bookkeeping that follows a state change: a standard
    /// layout root missing its right-side count is repaired, the viewport is
    /// cleared when content appears or the color mode changes, and a stored
    /// viewport is pushed to the surface.
    pub fn render(&mut self) -> Arc<[DiagramNode]> {
        if let Some(repaired) = repair_right_node_count(self.store.snapshot().children()) {
            self.store.update(StateUpdate::new().children(repaired));
        }
        self.apply_viewport_rules();
        self.push_viewport();

        let state = self.store.snapshot();
        self.render.prepare(&state)
    }

    fn apply_viewport_rules(&mut self) {
        let state = self.store.snapshot();
        let content_appeared = self
            .viewport_guard
            .observe(
                state.children().len(),
                self.store.emptied(),
                state.viewport().is_some(),
            );
        let effective = self.theme.effective_theme(state.theme());
        let mode_changed = self.theme.observe_mode(effective);

        if (content_appeared || mode_changed) && state.viewport().is_some() {
            debug!(content_appeared, mode_changed; "Clearing viewport");
            self.store.update(StateUpdate::new().viewport(None));
        }
    }

    fn push_viewport(&self) {
        let (Some(surface), Some(viewport)) = (&self.surface, self.store.snapshot().viewport())
        else {
            return;
        };
        if (surface.zoom() - viewport.zoom()).abs() <= f64::EPSILON {
            return;
        }
        if let Err(err) = surface.set_viewport(&viewport) {
            warn!(err:%; "Failed to apply viewport to rendering surface");
        }
    }

    /// Handles a change event from the rendering surface.
    ///
    /// Returns whether the state changed. Without an attached surface there
    /// is no live tree to reconcile, so only viewport and theme are merged.
    pub fn on_surface_change(&mut self, change: SurfaceChange) -> bool {
        let state = self.store.snapshot();
        let live = match &self.surface {
            Some(surface) => surface.live_tree(),
            None => state.children().to_vec(),
        };
        let effective = self.theme.effective_theme(state.theme());
        let update = reconcile_change(&change, effective, live, &state);
        self.store.update(update)
    }

    /// Handles a change of the ambient light/dark signal.
    pub fn on_ambient_theme(&mut self, ambient: AmbientTheme) -> bool {
        let stored = self.store.snapshot().theme();
        match self.theme.on_ambient(ambient, stored) {
            Some(theme) => {
                debug!(ambient:?, theme:?; "Following ambient theme");
                self.store.update(StateUpdate::new().theme(Some(theme)))
            }
            None => false,
        }
    }

    /// The theme the rendering surface should use.
    pub fn effective_theme(&self) -> Option<Theme> {
        self.theme.effective_theme(self.store.snapshot().theme())
    }

    /// Pins the theme to `theme`, or returns to following the ambient signal with `None`.
    pub fn set_theme(&mut self, theme: Option<Theme>) -> bool {
        self.store.update(StateUpdate::new().theme(theme))
    }

    /// Switches every root to `layout`.
    pub fn set_layout(&mut self, layout: LayoutDirection) -> bool {
        if let Some(surface) = &self.surface {
            surface.set_layout(layout);
        }
        let mut children = self.store.snapshot().children().to_vec();
        apply_layout(&mut children, layout);
        info!(layout:%; "Setting layout");
        self.store.update(StateUpdate::new().children(children))
    }

    pub fn zoom_in(&mut self) -> Viewport {
        let viewport = Viewport::zoomed_in(self.store.snapshot().viewport().as_ref());
        self.set_viewport(viewport)
    }

    pub fn zoom_out(&mut self) -> Viewport {
        let viewport = Viewport::zoomed_out(self.store.snapshot().viewport().as_ref());
        self.set_viewport(viewport)
    }

    fn set_viewport(&mut self, viewport: Viewport) -> Viewport {
        debug!(zoom = viewport.zoom(); "Setting viewport");
        self.store.update(StateUpdate::new().viewport(Some(viewport)));
        self.push_viewport();
        viewport
    }

    /// Fits the surface to the content.
    ///
    /// Falls back to an automatic viewport when there is no surface, no
    /// content, or the surface fails to fit.
    pub fn fit_to_content(&mut self) {
        let has_content = !self.store.snapshot().children().is_empty();
        let fitted = match &self.surface {
            Some(surface) if has_content => match surface.fit_viewport() {
                Ok(()) => true,
                Err(err) => {
                    warn!(err:%; "Failed to fit viewport");
                    false
                }
            },
            _ => false,
        };
        if !fitted {
            self.store.update(StateUpdate::new().viewport(None));
        }
    }

    /// Flips presentation mode, returning the new value.
    pub fn toggle_presentation_mode(&mut self) -> bool {
        let enabled = !self
            .store
            .snapshot()
            .preferences()
            .presentation_mode
            .unwrap_or(false);
        self.store
            .update(StateUpdate::new().presentation_mode(Some(enabled)));
        enabled
    }

    /// Whether the state changed since the last save or restore.
    pub fn is_dirty(&self) -> bool {
        self.saved_revision != Some(self.store.revision())
    }

    /// Writes the state to `storage`.
    pub async fn save(&mut self, storage: &dyn Storage) -> Result<(), MindmarkError> {
        let revision = self.store.revision();
        let state = self.store.snapshot();
        storage::save_state(storage, self.config.storage(), &state).await?;
        self.saved_revision = Some(revision);
        Ok(())
    }

    /// Writes the state to `storage` if it changed since the last save.
    ///
    /// Returns whether a write happened.
    pub async fn save_if_dirty(&mut self, storage: &dyn Storage) -> Result<bool, MindmarkError> {
        if !self.is_dirty() {
            return Ok(false);
        }
        self.save(storage).await?;
        Ok(true)
    }

    /// Replaces the state with the one stored in `storage`, if any.
    ///
    /// Returns whether a stored state was found. Either way the session is
    /// clean afterwards.
    pub async fn restore(&mut self, storage: &dyn Storage) -> Result<bool, MindmarkError> {
        let Some(state) = storage::load_state(storage, self.config.storage()).await? else {
            self.saved_revision = Some(self.store.revision());
            return Ok(false);
        };
        self.store.replace(state);
        self.render.invalidate();
        self.saved_revision = Some(self.store.revision());
        Ok(true)
    }

    /// Removes the stored state from `storage`.
    pub async fn clear_storage(&mut self, storage: &dyn Storage) -> Result<(), MindmarkError> {
        storage::clear_state(storage, self.config.storage()).await?;
        self.saved_revision = None;
        Ok(())
    }

    /// Cancels a regeneration that is still waiting.
    pub fn close(&mut self) {
        self.pipeline.cancel();
        self.surface = None;
    }
}
