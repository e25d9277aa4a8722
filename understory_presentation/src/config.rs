// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-presentation configuration and the stock presets.

use kurbo::Insets;

use crate::backdrop::BackdropPolicy;
use crate::gesture::DragConfig;
use crate::guide::{Edges, HeightPolicy, LayoutGuide, Placement, WidthPolicy};

/// Outer width of an alert.
pub const ALERT_WIDTH: f64 = 270.0;
/// Corner radius of alerts.
pub const ALERT_CORNER_RADIUS: f64 = 14.0;
/// Corner radius of the top corners of sheets.
pub const SHEET_CORNER_RADIUS: f64 = 16.0;
/// Margin around action sheets.
pub const ACTION_SHEET_MARGIN: f64 = 8.0;

/// Everything a controller needs to know besides its surface and animator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PresentationConfig {
    /// Sizing policy.
    pub layout_guide: LayoutGuide,
    /// Where the surface sits in its container.
    pub placement: Placement,
    /// Backdrop behavior.
    pub backdrop: BackdropPolicy,
    /// Corner radius of the content shape, used for hit testing.
    pub corner_radius: f64,
    /// Whether drag-to-dismiss is enabled.
    pub is_interactive: bool,
    /// Drag thresholds.
    pub drag: DragConfig,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            layout_guide: LayoutGuide::default(),
            placement: Placement::Center,
            backdrop: BackdropPolicy::default(),
            corner_radius: 0.0,
            is_interactive: false,
            drag: DragConfig::default(),
        }
    }
}

impl PresentationConfig {
    /// A centered alert of fixed width that hugs its content.
    pub fn alert() -> Self {
        Self {
            layout_guide: LayoutGuide::new(WidthPolicy::Fixed(ALERT_WIDTH), HeightPolicy::Flexible),
            placement: Placement::Center,
            corner_radius: ALERT_CORNER_RADIUS,
            ..Self::default()
        }
    }

    /// A full-width, drag-dismissable sheet pinned to the bottom edge.
    ///
    /// The sheet extends under the bottom safe area and dismisses on
    /// background taps.
    pub fn sheet() -> Self {
        Self {
            layout_guide: LayoutGuide::new(WidthPolicy::Fractional { fraction: 1.0, max: None }, HeightPolicy::Flexible)
                .ignoring_safe_area(Edges::BOTTOM),
            placement: Placement::Bottom,
            backdrop: BackdropPolicy::default().dismiss_on_background_tap(true),
            corner_radius: SHEET_CORNER_RADIUS,
            is_interactive: true,
            ..Self::default()
        }
    }

    /// A bottom action sheet inset by a margin on every side.
    pub fn action_sheet() -> Self {
        Self {
            layout_guide: LayoutGuide::new(WidthPolicy::Flexible, HeightPolicy::Flexible)
                .with_insets(Insets::uniform(ACTION_SHEET_MARGIN)),
            placement: Placement::Bottom,
            backdrop: BackdropPolicy::default().dismiss_on_background_tap(true),
            corner_radius: ALERT_CORNER_RADIUS,
            is_interactive: true,
            ..Self::default()
        }
    }

    /// A non-blocking toast at the top edge.
    pub fn toast() -> Self {
        Self {
            layout_guide: LayoutGuide::new(WidthPolicy::Flexible, HeightPolicy::Flexible)
                .with_insets(Insets::uniform_xy(16.0, 12.0)),
            placement: Placement::Top,
            backdrop: BackdropPolicy::passthrough(),
            corner_radius: 22.0,
            ..Self::default()
        }
    }

    /// Replace the layout guide.
    pub fn with_layout_guide(mut self, guide: LayoutGuide) -> Self {
        self.layout_guide = guide;
        self
    }

    /// Replace the backdrop policy.
    pub fn with_backdrop(mut self, backdrop: BackdropPolicy) -> Self {
        self.backdrop = backdrop;
        self
    }

    /// Enable or disable drag-to-dismiss.
    pub fn interactive(mut self, is_interactive: bool) -> Self {
        self.is_interactive = is_interactive;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backdrop::InteractionScope;
    use crate::layout::LayoutEngine;
    use kurbo::{Rect, Size};

    const SCREEN: Rect = Rect::new(0.0, 0.0, 390.0, 844.0);
    const SAFE: Insets = Insets::new(0.0, 47.0, 0.0, 34.0);

    fn frame_of(config: &PresentationConfig, content: Size) -> Rect {
        LayoutEngine::new()
            .apply(Some(SCREEN), SAFE, &config.layout_guide, config.placement, |_| content)
            .unwrap()
    }

    #[test]
    fn alert_is_centered_with_fixed_width() {
        let frame = frame_of(&PresentationConfig::alert(), Size::new(500.0, 140.0));
        assert_eq!(frame.width(), ALERT_WIDTH);
        assert_eq!(frame.height(), 140.0);
        assert_eq!(frame.center().x, 195.0);
    }

    #[test]
    fn sheet_spans_the_width_and_sits_on_the_bottom_edge() {
        let config = PresentationConfig::sheet();
        let frame = frame_of(&config, Size::new(100.0, 300.0));
        assert_eq!(frame.width(), 390.0);
        assert_eq!(frame.y1, 844.0);
        assert!(config.is_interactive);
        assert!(config.backdrop.allow_dismiss_when_background_touch);
    }

    #[test]
    fn action_sheet_keeps_its_margin() {
        let frame = frame_of(&PresentationConfig::action_sheet(), Size::new(1000.0, 200.0));
        assert_eq!(frame.width(), 390.0 - 16.0);
        assert_eq!(frame.y1, 844.0 - 34.0 - ACTION_SHEET_MARGIN);
    }

    #[test]
    fn toast_is_top_pinned_and_non_blocking() {
        let config = PresentationConfig::toast();
        let frame = frame_of(&config, Size::new(200.0, 44.0));
        assert_eq!(frame.y0, 47.0 + 12.0);
        assert_eq!(config.backdrop.interaction_scope, InteractionScope::All);
        assert!(!config.is_interactive);
    }
}
