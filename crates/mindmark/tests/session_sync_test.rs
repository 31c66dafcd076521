//! Integration tests for the Session API
//!
//! These tests drive a session the way a UI layer would: text changes from
//! the editor, change events from a fake rendering surface, and tool commands.

use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use float_cmp::assert_approx_eq;
use parking_lot::Mutex;

use mindmark::{
    AppConfig, Session, StateUpdate,
    geometry::Viewport,
    node::DiagramNode,
    parser::{ParseFailure, SourceParser},
    style::{ColorMode, LayoutDirection, Theme},
    surface::{RenderSurface, SurfaceChange, SurfaceError},
};

/// Parses `# title` followed by `- item` lines; counts invocations.
#[derive(Default)]
struct OutlineParser {
    calls: AtomicUsize,
    last: Mutex<Option<String>>,
}

#[async_trait]
impl SourceParser for OutlineParser {
    async fn parse(&self, text: &str) -> Result<Option<DiagramNode>, ParseFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last.lock() = Some(text.to_string());

        let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());
        let title = lines
            .next()
            .and_then(|line| line.strip_prefix("# "))
            .ok_or_else(|| ParseFailure::new("outline must start with a heading"))?;
        let items = lines
            .filter_map(|line| line.strip_prefix("- "))
            .map(|item| DiagramNode::branch(item, item));
        Ok(Some(DiagramNode::root("root", title).with_children(items)))
    }
}

#[derive(Default)]
struct FakeSurface {
    live: Mutex<Vec<DiagramNode>>,
    zoom: Mutex<f64>,
    layouts: Mutex<Vec<LayoutDirection>>,
    fail_fit: bool,
}

impl RenderSurface for FakeSurface {
    fn live_tree(&self) -> Vec<DiagramNode> {
        self.live.lock().clone()
    }

    fn zoom(&self) -> f64 {
        *self.zoom.lock()
    }

    fn set_layout(&self, layout: LayoutDirection) {
        self.layouts.lock().push(layout);
    }

    fn set_viewport(&self, viewport: &Viewport) -> Result<(), SurfaceError> {
        *self.zoom.lock() = viewport.zoom();
        Ok(())
    }

    fn fit_viewport(&self) -> Result<(), SurfaceError> {
        if self.fail_fit {
            Err(SurfaceError::Failed("canvas not measured".to_string()))
        } else {
            Ok(())
        }
    }
}

const QUIET: Duration = Duration::from_millis(200);

fn session_with(parser: &Arc<OutlineParser>) -> Session {
    Session::new(AppConfig::default(), parser.clone())
}

async fn settle() {
    tokio::time::sleep(QUIET * 3).await;
}

#[tokio::test(start_paused = true)]
async fn test_rapid_typing_parses_once_on_last_value() {
    let parser = Arc::new(OutlineParser::default());
    let mut session = session_with(&parser);

    let mut text = String::from("# Plan\n");
    for item in ["a", "b", "c", "d", "e"] {
        text.push_str(&format!("- {item}\n"));
        session.on_text_change(Some(text.as_str()));
        tokio::time::sleep(QUIET / 4).await;
    }
    settle().await;

    assert_eq!(parser.calls.load(Ordering::SeqCst), 1);
    assert_eq!(parser.last.lock().as_deref(), Some(text.as_str()));
    assert_eq!(session.state().children()[0].children().len(), 5);
}

#[tokio::test(start_paused = true)]
async fn test_whitespace_text_empties_tree_without_parsing() {
    let parser = Arc::new(OutlineParser::default());
    let mut session = session_with(&parser);

    session.on_text_change(Some("# Plan\n- a"));
    settle().await;
    session.on_text_change(Some(" \n\t"));

    assert!(session.state().children().is_empty());
    settle().await;
    assert_eq!(parser.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_parse_failure_yields_empty_tree_and_keeps_preferences() {
    let parser = Arc::new(OutlineParser::default());
    let mut session = session_with(&parser);
    session.update(StateUpdate::new().stroke_width(Some(6)));

    session.on_text_change(Some("# Plan\n- a"));
    settle().await;
    session.on_text_change(Some("no heading here"));
    settle().await;

    let state = session.state();
    assert!(state.children().is_empty());
    assert_eq!(state.preferences().stroke_width, Some(6));
}

#[tokio::test(start_paused = true)]
async fn test_layout_retained_across_regeneration() {
    let parser = Arc::new(OutlineParser::default());
    let surface = Arc::new(FakeSurface::default());
    let mut session = session_with(&parser);
    session.attach_surface(surface.clone());

    session.on_text_change(Some("# Plan\n- a\n- b\n- c\n- d\n- e\n- f"));
    settle().await;
    session.set_layout(LayoutDirection::Right);
    assert_eq!(*surface.layouts.lock(), vec![LayoutDirection::Right]);

    session.on_text_change(Some("# Plan\n- a\n- b"));
    settle().await;
    let root = session.state().children()[0].clone();
    assert_eq!(root.layout(), Some(LayoutDirection::Right));
    assert_eq!(root.right_node_count(), None);

    session.set_layout(LayoutDirection::Standard);
    session.on_text_change(Some("# Plan\n- a\n- b\n- c\n- d\n- e"));
    settle().await;
    let root = session.state().children()[0].clone();
    assert_eq!(root.layout(), Some(LayoutDirection::Standard));
    assert_eq!(root.right_node_count(), Some(3));
}

#[tokio::test(start_paused = true)]
async fn test_collapse_only_surface_change_is_not_a_write() {
    let parser = Arc::new(OutlineParser::default());
    let surface = Arc::new(FakeSurface::default());
    let mut session = session_with(&parser);
    session.attach_surface(surface.clone());

    session.on_text_change(Some("# Plan\n- a\n- b"));
    settle().await;

    let mut live = session.state().children().to_vec();
    live[0].children_mut()[1].set_collapsed(true);
    *surface.live.lock() = live.clone();

    let revision = session.store().revision();
    assert!(!session.on_surface_change(SurfaceChange::default()));
    assert_eq!(session.store().revision(), revision);

    live[0].children_mut()[0].set_topic("renamed");
    *surface.live.lock() = live;
    assert!(session.on_surface_change(SurfaceChange::default()));
    assert_eq!(session.state().children()[0].children()[0].topic(), "renamed");
}

#[tokio::test(start_paused = true)]
async fn test_viewport_reset_on_population_and_zoom_push() {
    let parser = Arc::new(OutlineParser::default());
    let surface = Arc::new(FakeSurface::default());
    *surface.zoom.lock() = 1.0;
    let mut session = session_with(&parser);
    session.attach_surface(surface.clone());

    session.zoom_in();
    session.zoom_in();
    let zoom = session.state().viewport().map(|v| v.zoom()).unwrap_or_default();
    assert_approx_eq!(f64, zoom, 1.2, epsilon = 1e-9);
    assert_approx_eq!(f64, *surface.zoom.lock(), 1.2, epsilon = 1e-9);

    session.render();
    session.on_text_change(Some("# Plan\n- a"));
    settle().await;
    session.render();
    assert_eq!(session.state().viewport(), None);
}

#[tokio::test(start_paused = true)]
async fn test_viewport_reset_when_tree_refilled_between_renders() {
    let parser = Arc::new(OutlineParser::default());
    let mut session = session_with(&parser);

    session.on_text_change(Some("# Plan\n- a"));
    settle().await;
    session.render();
    session.zoom_in();
    assert!(session.state().viewport().is_some());

    session.on_text_change(Some(""));
    session.on_text_change(Some("# Other\n- b"));
    settle().await;
    assert!(session.state().viewport().is_some());

    session.render();
    assert_eq!(session.state().viewport(), None);
}

#[tokio::test(start_paused = true)]
async fn test_fit_failure_falls_back_to_auto_viewport() {
    let parser = Arc::new(OutlineParser::default());
    let surface = Arc::new(FakeSurface {
        fail_fit: true,
        ..Default::default()
    });
    let mut session = session_with(&parser);
    session.attach_surface(surface);

    session.on_text_change(Some("# Plan\n- a"));
    settle().await;
    session.zoom_out();
    session.fit_to_content();
    assert_eq!(session.state().viewport(), None);
}

#[tokio::test(start_paused = true)]
async fn test_surface_theme_pins_manual_mode() {
    let parser = Arc::new(OutlineParser::default());
    let mut session = session_with(&parser);
    session.on_ambient_theme(mindmark::style::AmbientTheme::Light);

    let change = SurfaceChange {
        viewport: None,
        theme: Some(Theme::new(ColorMode::Soft)),
    };
    session.on_surface_change(change);
    assert_eq!(session.state().theme(), Some(Theme::new(ColorMode::Soft)));

    assert!(!session.on_ambient_theme(mindmark::style::AmbientTheme::Dark));
    assert_eq!(session.effective_theme(), Some(Theme::new(ColorMode::Soft)));
}

#[tokio::test(start_paused = true)]
async fn test_rendered_tree_is_normalized_and_styled() {
    let parser = Arc::new(OutlineParser::default());
    let mut session = session_with(&parser);
    session.on_text_change(Some("# Plan\n- a\n- b"));
    settle().await;
    session.update(
        StateUpdate::new()
            .node_shape(Some(mindmark::style::NodeShape::Underline))
            .stroke_width(Some(4)),
    );

    let rendered = session.render();
    let root = &rendered[0];
    assert_eq!(root.is_root(), Some(true));
    assert!(root.anchor().is_some());
    for child in root.children() {
        assert_eq!(child.style().branch_width, Some(4));
        assert_eq!(
            child.style().shape,
            Some(mindmark::style::NodeShape::Underline)
        );
    }

    // The stored tree stays as parsed.
    assert_eq!(session.state().children()[0].anchor(), None);
}
