//! CLI logic for the Mindmark tool.
//!
//! Each invocation restores the persisted state, applies one command through
//! a [`Session`] and saves the state again if the command changed it.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, Command, StyleArgs, ThemeChoice, ZoomAction};

use std::{io::Write, sync::Arc};

use log::info;

use mindmark::{
    FileStorage, MindmarkError, Session, StateUpdate, StorageError,
    color::Color,
    node::DiagramNode,
    parser::ParseFailure,
    storage::PersistedState,
    style::Theme,
};

/// The CLI edits stored trees directly and never parses outlines.
fn no_outline_parser(_: &str) -> Result<Option<DiagramNode>, ParseFailure> {
    Err(ParseFailure::new("outline parsing is not available here"))
}

/// Run the Mindmark CLI application
///
/// Output meant for the user is written to `out`.
///
/// # Errors
///
/// Returns `MindmarkError` for:
/// - Configuration loading errors
/// - Reading or writing the persisted state
/// - Command values that cannot be applied
pub async fn run(args: &Args, out: &mut impl Write) -> Result<(), MindmarkError> {
    let app_config = config::load_config(args.config.as_ref())?;
    let state_dir = config::state_dir(args.state_dir.as_ref())?;
    info!(state_dir = state_dir.display().to_string(); "Opening state");

    let storage = FileStorage::new(state_dir);
    let mut session = Session::new(app_config, Arc::new(no_outline_parser));
    session.restore(&storage).await?;

    apply(&mut session, &args.command, out)?;

    // Nothing scheduled may run after this point.
    session.close();
    if session.save_if_dirty(&storage).await? {
        info!("State saved");
    }
    Ok(())
}

fn apply(
    session: &mut Session,
    command: &Command,
    out: &mut impl Write,
) -> Result<(), MindmarkError> {
    match command {
        Command::Show => {
            let persisted = PersistedState::capture(&session.state(), true);
            let json = serde_json::to_string_pretty(&persisted).map_err(StorageError::Encode)?;
            writeln!(out, "{json}")?;
        }
        Command::LoadDefault => session.load_default_content(),
        Command::Reset => session.reset(),
        Command::Style(style) => {
            let update = style_update(style);
            if update.is_empty() {
                return Err(MindmarkError::InvalidValue(
                    "no style option given".to_string(),
                ));
            }
            session.update(update);

            let prefs = session.state().preferences().clone();
            let color = prefs.stroke_color.unwrap_or_else(Color::default_stroke);
            writeln!(out, "stroke color: {color}")?;
        }
        Command::Layout { direction } => {
            if session.state().children().is_empty() {
                return Err(MindmarkError::InvalidValue(
                    "the mind map is empty; run `mindmark load-default` first".to_string(),
                ));
            }
            session.set_layout(*direction);
        }
        Command::Theme { mode } => {
            let theme = match mode {
                ThemeChoice::Auto => None,
                ThemeChoice::Mode(mode) => Some(Theme::new(*mode)),
            };
            session.set_theme(theme);
        }
        Command::Zoom { action } => {
            match action {
                ZoomAction::In => {
                    session.zoom_in();
                }
                ZoomAction::Out => {
                    session.zoom_out();
                }
                ZoomAction::Reset => session.fit_to_content(),
            }
            match session.state().viewport() {
                Some(viewport) => writeln!(out, "zoom: {:.0}%", viewport.zoom() * 100.0)?,
                None => writeln!(out, "zoom: fit to content")?,
            }
        }
        Command::Presentation => {
            let enabled = session.toggle_presentation_mode();
            writeln!(
                out,
                "presentation mode: {}",
                if enabled { "on" } else { "off" }
            )?;
        }
    }
    Ok(())
}

fn style_update(style: &StyleArgs) -> StateUpdate {
    let mut update = StateUpdate::new();
    if style.spline {
        update = update.spline(Some(true));
    } else if style.polyline {
        update = update.spline(Some(false));
    }
    if let Some(stroke_style) = style.stroke_style {
        update = update.stroke_style(Some(stroke_style));
    }
    if let Some(width) = style.stroke_width {
        update = update.stroke_width(Some(width));
    }
    if let Some(color) = style.stroke_color {
        update = update.stroke_color(Some(color));
    } else if style.clear_stroke_color {
        update = update.stroke_color(None);
    }
    if let Some(shape) = style.node_shape {
        update = update.node_shape(Some(shape));
    }
    update
}
