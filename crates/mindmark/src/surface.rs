//! The seam to the rendering surface.
//!
//! The surface draws the rendered tree, lets the user interact with it, and
//! reports back what changed. Reported trees are reconciled against the
//! authoritative one before anything is written.

use log::debug;
use thiserror::Error;

use mindmark_core::{
    geometry::Viewport,
    node::DiagramNode,
    reconcile::{Reconciliation, reconcile},
    style::{LayoutDirection, Theme},
};

use crate::state::{AuthoritativeState, StateUpdate};

/// A best-effort surface operation failed.
///
/// Callers recover by falling back to an automatic viewport.
#[derive(Debug, Clone, Error)]
pub enum SurfaceError {
    #[error("nothing to fit")]
    NoContent,

    #[error("rendering surface error: {0}")]
    Failed(String),
}

/// Commands and queries a session issues to the rendering surface.
pub trait RenderSurface: Send + Sync {
    /// A deep copy of the tree the surface currently shows.
    fn live_tree(&self) -> Vec<DiagramNode>;

    /// The surface's current zoom factor.
    fn zoom(&self) -> f64;

    fn set_layout(&self, layout: LayoutDirection);

    fn set_viewport(&self, viewport: &Viewport) -> Result<(), SurfaceError>;

    /// Zooms and scrolls so that all content is visible.
    fn fit_viewport(&self) -> Result<(), SurfaceError>;
}

/// A change event from the rendering surface.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurfaceChange {
    pub viewport: Option<Viewport>,
    pub theme: Option<Theme>,
}

/// Builds the store update for a surface change event.
///
/// The viewport is always taken over. The theme is taken over only when its
/// color mode differs from `effective_theme`, and the live tree only when it
/// differs structurally from the authoritative tree.
pub fn reconcile_change(
    change: &SurfaceChange,
    effective_theme: Option<Theme>,
    live: Vec<DiagramNode>,
    state: &AuthoritativeState,
) -> StateUpdate {
    let mut update = StateUpdate::new().viewport(change.viewport);

    let theme_changed = match (change.theme, effective_theme) {
        (Some(reported), Some(effective)) => reported.color_mode() != effective.color_mode(),
        _ => false,
    };
    if theme_changed {
        update = update.theme(change.theme);
    }

    match reconcile(live, state.children()) {
        Reconciliation::Adopt(children) => update.children(children),
        Reconciliation::Unchanged => {
            debug!("Surface change without structural difference");
            update
        }
    }
}
