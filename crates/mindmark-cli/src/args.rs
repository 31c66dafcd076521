//! Command-line argument definitions for the Mindmark CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Every subcommand loads the persisted state, applies one
//! command to it and writes it back.

use std::str::FromStr;

use clap::{Parser, Subcommand, ValueEnum};

use mindmark::{
    color::Color,
    style::{ColorMode, LayoutDirection, NodeShape, StrokeStyle, clamp_stroke_width},
};

/// Command-line arguments for the Mindmark tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Directory holding the persisted state
    #[arg(long, global = true)]
    pub state_dir: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print the persisted state as JSON
    Show,

    /// Replace the mind map with the built-in demo
    LoadDefault,

    /// Clear mind map, viewport and theme; style preferences are kept
    Reset,

    /// Change style preferences
    Style(StyleArgs),

    /// Change the layout of every root
    Layout {
        /// standard, right, left, upward, downward, right-bottom-indented, ...
        direction: LayoutDirection,
    },

    /// Pin a color mode, or follow the environment with `auto`
    Theme { mode: ThemeChoice },

    /// Zoom in or out one step, or reset to fit the content
    Zoom {
        #[arg(value_enum)]
        action: ZoomAction,
    },

    /// Toggle presentation mode
    Presentation,
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct StyleArgs {
    /// Curved branches
    #[arg(long, conflicts_with = "polyline")]
    pub spline: bool,

    /// Straight, angled branches
    #[arg(long)]
    pub polyline: bool,

    /// solid, dashed or dotted
    #[arg(long)]
    pub stroke_style: Option<StrokeStyle>,

    /// Branch line width; clamped to 1..=20
    #[arg(long, value_parser = parse_stroke_width)]
    pub stroke_width: Option<u32>,

    /// Branch line color (any CSS color)
    #[arg(long, conflicts_with = "clear_stroke_color")]
    pub stroke_color: Option<Color>,

    /// Remove the branch line color
    #[arg(long)]
    pub clear_stroke_color: bool,

    /// round-rectangle or underline
    #[arg(long)]
    pub node_shape: Option<NodeShape>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomAction {
    In,
    Out,
    Reset,
}

/// Argument of the `theme` subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeChoice {
    Auto,
    Mode(ColorMode),
}

impl FromStr for ThemeChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "auto" {
            return Ok(Self::Auto);
        }
        s.parse().map(Self::Mode)
    }
}

fn parse_stroke_width(s: &str) -> Result<u32, String> {
    let width: u32 = s
        .parse()
        .map_err(|_| format!("invalid stroke width `{s}`"))?;
    Ok(clamp_stroke_width(width))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("mindmark").chain(args.iter().copied()))
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = parse(&["show", "--state-dir", "/tmp/x", "--log-level", "off"]).unwrap();
        assert!(matches!(args.command, Command::Show));
        assert_eq!(args.state_dir.as_deref(), Some("/tmp/x"));
        assert_eq!(args.log_level, "off");
    }

    #[test]
    fn test_style_flags() {
        let args = parse(&[
            "style",
            "--polyline",
            "--stroke-style",
            "dashed",
            "--stroke-width",
            "40",
            "--stroke-color",
            "#ff0000",
        ])
        .unwrap();
        let Command::Style(style) = args.command else {
            panic!("expected style command");
        };
        assert!(style.polyline);
        assert_eq!(style.stroke_style, Some(StrokeStyle::Dashed));
        assert_eq!(style.stroke_width, Some(20));
        assert!(style.stroke_color.is_some());
    }

    #[test]
    fn test_conflicting_flags_are_rejected() {
        assert!(parse(&["style", "--spline", "--polyline"]).is_err());
        assert!(parse(&["style", "--stroke-color", "red", "--clear-stroke-color"]).is_err());
        assert!(parse(&["style", "--stroke-width", "wide"]).is_err());
    }

    #[test]
    fn test_layout_and_theme_values() {
        let args = parse(&["layout", "right-bottom-indented"]).unwrap();
        assert!(matches!(
            args.command,
            Command::Layout {
                direction: LayoutDirection::RightBottomIndented
            }
        ));

        let args = parse(&["theme", "auto"]).unwrap();
        assert!(matches!(args.command, Command::Theme { mode: ThemeChoice::Auto }));

        let args = parse(&["theme", "retro"]).unwrap();
        assert!(matches!(
            args.command,
            Command::Theme {
                mode: ThemeChoice::Mode(ColorMode::Retro)
            }
        ));

        assert!(parse(&["layout", "sideways"]).is_err());
    }
}
