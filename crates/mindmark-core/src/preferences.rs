//! User style preferences that apply across the whole diagram.
//!
//! Preferences live next to the tree in the authoritative state but are
//! independent of tree content: regenerating the tree from source text never
//! changes them, and they are pushed into each new tree by the propagation
//! passes.

use serde::{Deserialize, Serialize};

use crate::{
    color::Color,
    propagate::{ColorChange, LineStyle},
    style::{BranchShape, NodeShape, StrokeStyle},
};

/// Cross-cutting style settings chosen by the user.
///
/// `None` means "not chosen"; the tree keeps whatever the parser produced for
/// that attribute.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StylePreferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spline: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_style: Option<StrokeStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_shape: Option<NodeShape>,
    /// Hides the text editor; has no effect on the tree.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presentation_mode: Option<bool>,
}

impl StylePreferences {
    /// The branch shape implied by the spline preference, if set.
    pub fn branch_shape(&self) -> Option<BranchShape> {
        self.spline.map(BranchShape::from_spline)
    }

    /// The line style pass to run, given the stroke color seen on the previous pass.
    ///
    /// Returns `None` when no line preference is set and no color was just
    /// cleared. Whenever a pass runs, an unset color means "clear": nodes lose
    /// both `stroke_color` and its `branch_color` mirror.
    ///
    /// # Examples
    ///
    /// ```
    /// use mindmark_core::color::Color;
    /// use mindmark_core::preferences::StylePreferences;
    /// use mindmark_core::propagate::ColorChange;
    ///
    /// let prefs = StylePreferences::default();
    /// assert!(prefs.line_style(None).is_none());
    ///
    /// // A color that was set on the previous pass and is now gone triggers a clearing pass.
    /// let previous = Color::new("red").unwrap();
    /// let pass = prefs.line_style(Some(&previous)).unwrap();
    /// assert_eq!(pass.stroke_color, ColorChange::Clear);
    /// ```
    pub fn line_style(&self, previous_color: Option<&Color>) -> Option<LineStyle> {
        let color_cleared = previous_color.is_some() && self.stroke_color.is_none();
        let triggered = self.stroke_style.is_some()
            || self.stroke_width.is_some()
            || self.stroke_color.is_some()
            || color_cleared;
        if !triggered {
            return None;
        }

        Some(LineStyle {
            stroke_style: self.stroke_style,
            stroke_width: self.stroke_width,
            stroke_color: match self.stroke_color {
                Some(color) => ColorChange::Set(color),
                None => ColorChange::Clear,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::StrokeStyle;

    #[test]
    fn test_branch_shape_follows_spline() {
        let mut prefs = StylePreferences::default();
        assert_eq!(prefs.branch_shape(), None);

        prefs.spline = Some(true);
        assert_eq!(prefs.branch_shape(), Some(BranchShape::Bight));

        prefs.spline = Some(false);
        assert_eq!(prefs.branch_shape(), Some(BranchShape::Polyline));
    }

    #[test]
    fn test_line_style_with_width_only_clears_color() {
        let prefs = StylePreferences {
            stroke_width: Some(4),
            ..Default::default()
        };
        let pass = prefs.line_style(None).unwrap();
        assert_eq!(pass.stroke_width, Some(4));
        assert_eq!(pass.stroke_style, None);
        assert_eq!(pass.stroke_color, ColorChange::Clear);
    }

    #[test]
    fn test_line_style_sets_color() {
        let color = Color::new("green").unwrap();
        let prefs = StylePreferences {
            stroke_style: Some(StrokeStyle::Dashed),
            stroke_color: Some(color),
            ..Default::default()
        };
        let pass = prefs.line_style(None).unwrap();
        assert_eq!(pass.stroke_color, ColorChange::Set(color));
        assert_eq!(pass.stroke_style, Some(StrokeStyle::Dashed));
    }

    #[test]
    fn test_presentation_mode_does_not_trigger_line_pass() {
        let prefs = StylePreferences {
            presentation_mode: Some(true),
            ..Default::default()
        };
        assert!(prefs.line_style(None).is_none());
    }
}
