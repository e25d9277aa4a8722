// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Platform contracts consumed by the presentation engine.
//!
//! A host implements [`PresentationSurface`] once per platform (or per
//! concrete alert/sheet type). Interactive presentations additionally
//! implement [`DragHost`], which answers the hit queries the drag gesture
//! needs: action buttons under a point and nested scroll views.
//!
//! Handles ([`PresentationSurface::View`]) are small copyable keys; nested
//! scroll views are views too. The engine never holds platform objects; it looks
//! handles up through these traits when it needs them, and tolerates a
//! handle that no longer resolves.

use kurbo::{Insets, Point, Rect, Size};

use crate::action::ActionId;
use crate::visuals::Visuals;

/// Device orientation as reported by the platform.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Orientation not known yet.
    #[default]
    Unknown,
    /// Upright portrait.
    Portrait,
    /// Portrait, upside down.
    PortraitUpsideDown,
    /// Landscape, home edge on the right.
    LandscapeLeft,
    /// Landscape, home edge on the left.
    LandscapeRight,
}

impl Orientation {
    /// `true` for both landscape orientations.
    pub fn is_landscape(self) -> bool {
        matches!(self, Self::LandscapeLeft | Self::LandscapeRight)
    }
}

/// Haptic feedback requests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HapticFeedback {
    /// A light impact.
    Light,
    /// A medium impact.
    Medium,
    /// A heavy impact.
    Heavy,
}

/// The view-tree services a presentation needs.
///
/// The lifecycle hooks (`will_show` …) run before registered listeners at
/// each hook point; concrete presentation types override them.
pub trait PresentationSurface {
    /// Handle of a view, window, or container in the host's view tree.
    type View: Copy + Eq + core::fmt::Debug;

    /// The presented surface (content plus its chrome).
    fn presented_view(&self) -> Self::View;

    /// The dimming view behind the presented surface.
    fn dimming_view(&self) -> Self::View;

    /// Create a covering window to present in when no container was given.
    fn make_covering_window(&mut self) -> Self::View;

    /// Hide and release a window created by [`Self::make_covering_window`].
    fn tear_down_window(&mut self, window: Self::View);

    /// Insert the dimming and presented views into `container`.
    fn attach(&mut self, container: Self::View);

    /// Remove the dimming and presented views from their container.
    fn detach(&mut self);

    /// Bounds of the current container, or `None` when detached.
    fn container_bounds(&self) -> Option<Rect>;

    /// Current device orientation.
    fn orientation(&self) -> Orientation;

    /// Safe-area insets of the container.
    fn safe_area_insets(&self) -> Insets;

    /// Intrinsic size of the content within `proposal`.
    fn measure(&self, proposal: Size) -> Size;

    /// Push the current visual state to the platform views.
    fn apply_visuals(&mut self, visuals: &Visuals);

    /// Play haptic feedback. Defaults to doing nothing.
    fn trigger_haptic(&mut self, _feedback: HapticFeedback) {}

    /// Called before the show transition starts.
    fn will_show(&mut self) {}

    /// Called after the show transition completed.
    fn did_show(&mut self) {}

    /// Called before the dismiss transition starts.
    fn will_dismiss(&mut self) {}

    /// Called after the dismiss transition completed and the views were detached.
    fn did_dismiss(&mut self) {}
}

/// Scroll position of a nested scroll view, in its content coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollMetrics {
    /// Vertical content offset.
    pub offset_y: f64,
    /// Adjusted top content inset; the top boundary is at `-top_inset`.
    pub top_inset: f64,
    /// Whether the scroll view currently scrolls on its own.
    pub is_scroll_enabled: bool,
}

impl ScrollMetrics {
    /// The offset at which the content rests against its top.
    pub fn top_boundary(&self) -> f64 {
        -self.top_inset
    }

    /// `true` when the offset is at or past the top boundary, within `epsilon`.
    pub fn is_at_top(&self, epsilon: f64) -> bool {
        self.offset_y <= self.top_boundary() + epsilon
    }
}

/// Hit queries used by the interactive dismiss gesture.
pub trait DragHost: PresentationSurface {
    /// The action whose hit region contains `point` (container coordinates).
    fn action_at(&self, point: Point) -> Option<ActionId>;

    /// The nearest scroll view under `point` (container coordinates).
    fn scroll_view_at(&self, point: Point) -> Option<Self::View>;

    /// Current metrics of `scroll`, or `None` if it is gone.
    fn scroll_metrics(&self, scroll: Self::View) -> Option<ScrollMetrics>;

    /// Move `scroll`'s vertical content offset.
    fn set_scroll_offset(&mut self, scroll: Self::View, offset_y: f64);

    /// Enable or disable `scroll`'s own scrolling.
    fn set_scroll_enabled(&mut self, scroll: Self::View, enabled: bool);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_boundary_accounts_for_inset() {
        let m = ScrollMetrics {
            offset_y: -20.0,
            top_inset: 20.0,
            is_scroll_enabled: true,
        };
        assert!(m.is_at_top(0.5));
        let scrolled = ScrollMetrics {
            offset_y: 50.0,
            ..m
        };
        assert!(!scrolled.is_at_top(0.5));
        let nearly = ScrollMetrics {
            offset_y: -19.7,
            ..m
        };
        assert!(nearly.is_at_top(0.5));
        let overscrolled = ScrollMetrics {
            offset_y: -60.0,
            ..m
        };
        assert!(overscrolled.is_at_top(0.5));
    }

    #[test]
    fn landscape_orientations() {
        assert!(Orientation::LandscapeLeft.is_landscape());
        assert!(!Orientation::Portrait.is_landscape());
        assert!(!Orientation::default().is_landscape());
    }
}
