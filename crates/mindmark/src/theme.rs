//! Theme and viewport synchronization.
//!
//! The stored theme either follows the ambient light/dark signal of the host
//! environment or is pinned by the user. A stored theme that is absent,
//! `Default` or `Dark` follows the signal; any other color mode is a manual
//! choice and the signal is ignored until the theme is reset.
//!
//! The viewport is cleared whenever the layout of the canvas is likely to
//! change a lot: when content first appears, and when the color mode
//! changes.

use log::debug;

use mindmark_core::style::{AmbientTheme, ColorMode, Theme};

/// Who decides the current theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeMode {
    /// No theme stored.
    Unset,
    /// Following a light ambient signal.
    AutoDefault,
    /// Following a dark ambient signal.
    AutoDark,
    /// Pinned by the user.
    Manual(ColorMode),
}

impl ThemeMode {
    /// Classifies a stored theme.
    pub fn of(theme: Option<Theme>) -> Self {
        match theme.map(|theme| theme.color_mode()) {
            None => Self::Unset,
            Some(ColorMode::Default) => Self::AutoDefault,
            Some(ColorMode::Dark) => Self::AutoDark,
            Some(mode) => Self::Manual(mode),
        }
    }

    /// Whether the ambient signal may replace the stored theme.
    pub fn is_auto_sync(self) -> bool {
        !matches!(self, Self::Manual(_))
    }
}

/// Per-session theme bookkeeping.
#[derive(Debug, Default)]
pub struct ThemeSync {
    ambient: Option<AmbientTheme>,
    previous_mode: Option<ColorMode>,
}

impl ThemeSync {
    pub fn new(ambient: Option<AmbientTheme>) -> Self {
        Self {
            ambient,
            previous_mode: None,
        }
    }

    /// The latest ambient signal, if any was received.
    pub fn ambient(&self) -> Option<AmbientTheme> {
        self.ambient
    }

    /// The theme the rendering surface should use.
    ///
    /// Without an ambient signal this is the stored theme. With one, an
    /// auto-synced stored theme is replaced by the signal's theme.
    pub fn effective_theme(&self, stored: Option<Theme>) -> Option<Theme> {
        match self.ambient {
            Some(ambient) if ThemeMode::of(stored).is_auto_sync() => {
                Some(Theme::from_ambient(ambient))
            }
            _ => stored,
        }
    }

    /// Records a new ambient signal.
    ///
    /// Returns the theme to store, or `None` when the stored theme is manual
    /// or already matches the signal.
    pub fn on_ambient(&mut self, ambient: AmbientTheme, stored: Option<Theme>) -> Option<Theme> {
        self.ambient = Some(ambient);
        let mode = ThemeMode::of(stored);
        if !mode.is_auto_sync() {
            debug!(mode:?; "Ignoring ambient theme for manual theme");
            return None;
        }

        let theme = Theme::from_ambient(ambient);
        (stored != Some(theme)).then_some(theme)
    }

    /// Records the color mode currently in effect.
    ///
    /// Returns `true` when the mode changed from a previously observed one,
    /// in which case the viewport should be cleared.
    pub fn observe_mode(&mut self, effective: Option<Theme>) -> bool {
        let current = effective.map(|theme| theme.color_mode());
        let changed = self.previous_mode.is_some() && current != self.previous_mode;
        self.previous_mode = current;
        changed
    }
}

/// Decides when a content change invalidates the stored viewport.
#[derive(Debug, Default)]
pub struct ViewportGuard {
    previous_roots: Option<usize>,
    emptied: u64,
    initialized: bool,
}

impl ViewportGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the current root count, returning whether to clear the viewport.
    ///
    /// `emptied` is the store's count of transitions to an empty tree (see
    /// [`StateStore::emptied`](crate::StateStore::emptied)), so a tree that
    /// was emptied and refilled between two observations still counts as
    /// populated.
    ///
    /// Clears on every transition from zero roots to some roots, and once
    /// when the first non-empty tree is seen with a viewport already set.
    pub fn observe(&mut self, roots: usize, emptied: u64, has_viewport: bool) -> bool {
        let emptied_since = self.previous_roots.is_some() && emptied != self.emptied;
        let populated = roots > 0 && (self.previous_roots == Some(0) || emptied_since);
        let first_content = !self.initialized && roots > 0 && has_viewport;
        self.previous_roots = Some(roots);
        self.emptied = emptied;
        if roots > 0 {
            self.initialized = true;
        }

        populated || first_content
    }
}
