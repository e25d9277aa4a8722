// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout guides: the sizing and placement policy of a presented surface.

use kurbo::{Insets, Rect};

bitflags::bitflags! {
    /// A set of rectangle edges.
    ///
    /// Used by [`LayoutGuide::ignores_safe_area_edges`] to let a surface extend
    /// into the unsafe regions of its container (notches, home indicators).
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Edges: u8 {
        /// The top edge.
        const TOP    = 0b0000_0001;
        /// The left edge.
        const LEFT   = 0b0000_0010;
        /// The bottom edge.
        const BOTTOM = 0b0000_0100;
        /// The right edge.
        const RIGHT  = 0b0000_1000;
        /// Left and right.
        const HORIZONTAL = Self::LEFT.bits() | Self::RIGHT.bits();
        /// Top and bottom.
        const VERTICAL = Self::TOP.bits() | Self::BOTTOM.bits();
    }
}

impl Edges {
    /// Inset `rect` by `insets` on every edge that is *not* in `self`.
    pub fn inset_unless_ignored(self, rect: Rect, insets: Insets) -> Rect {
        let pick = |edge: Self, v: f64| if self.contains(edge) { 0.0 } else { v };
        Rect::new(
            rect.x0 + pick(Self::LEFT, insets.x0),
            rect.y0 + pick(Self::TOP, insets.y0),
            rect.x1 - pick(Self::RIGHT, insets.x1),
            rect.y1 - pick(Self::BOTTOM, insets.y1),
        )
    }
}

/// Horizontal sizing policy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WidthPolicy {
    /// A fixed outer width; the content insets are taken out of it.
    Fixed(f64),
    /// Hug the content, bounded by the usable container width.
    Flexible,
    /// A fraction of the usable container width, optionally capped.
    Fractional {
        /// Fraction of the usable width, typically in `(0, 1]`.
        fraction: f64,
        /// Upper bound that wins over the fraction when both apply.
        max: Option<f64>,
    },
}

/// Vertical sizing policy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HeightPolicy {
    /// A fixed outer height; the content insets are taken out of it.
    Fixed(f64),
    /// Hug the content, bounded by the usable container height.
    Flexible,
    /// At least this tall, growing with the content up to the usable height.
    ///
    /// Message-style alerts use this to guarantee a minimum height.
    AtLeast(f64),
    /// A fraction of the usable container height, optionally capped.
    Fractional {
        /// Fraction of the usable height, typically in `(0, 1]`.
        fraction: f64,
        /// Upper bound that wins over the fraction when both apply.
        max: Option<f64>,
    },
}

/// Where a presented surface sits inside its container.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Placement {
    /// Centered on both axes (alerts).
    #[default]
    Center,
    /// Pinned to the bottom edge (sheets and action sheets).
    Bottom,
    /// Pinned to the top edge (toasts).
    Top,
}

/// Sizing policy for a presented surface.
///
/// A guide is a value: a layout pass reads it, and replacing it means
/// handing the controller a whole new guide.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutGuide {
    /// Width policy.
    pub width: WidthPolicy,
    /// Height policy.
    pub height: HeightPolicy,
    /// Margins between the usable container region and the surface.
    pub content_insets: Insets,
    /// Safe-area edges the surface extends past.
    pub ignores_safe_area_edges: Edges,
}

impl Default for LayoutGuide {
    fn default() -> Self {
        Self {
            width: WidthPolicy::Flexible,
            height: HeightPolicy::Flexible,
            content_insets: Insets::ZERO,
            ignores_safe_area_edges: Edges::empty(),
        }
    }
}

impl LayoutGuide {
    /// Create a guide with the given policies, no insets, and full safe-area respect.
    pub fn new(width: WidthPolicy, height: HeightPolicy) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Replace the content insets.
    pub fn with_insets(mut self, insets: Insets) -> Self {
        self.content_insets = insets;
        self
    }

    /// Replace the set of ignored safe-area edges.
    pub fn ignoring_safe_area(mut self, edges: Edges) -> Self {
        self.ignores_safe_area_edges = edges;
        self
    }

    /// Horizontal inset total (left + right).
    pub fn horizontal_insets(&self) -> f64 {
        self.content_insets.x0 + self.content_insets.x1
    }

    /// Vertical inset total (top + bottom).
    pub fn vertical_insets(&self) -> f64 {
        self.content_insets.y0 + self.content_insets.y1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inset_respects_ignored_edges() {
        let rect = Rect::new(0.0, 0.0, 400.0, 800.0);
        let safe = Insets::new(0.0, 47.0, 0.0, 34.0);
        assert_eq!(
            Edges::empty().inset_unless_ignored(rect, safe),
            Rect::new(0.0, 47.0, 400.0, 766.0)
        );
        assert_eq!(
            Edges::BOTTOM.inset_unless_ignored(rect, safe),
            Rect::new(0.0, 47.0, 400.0, 800.0)
        );
        assert_eq!(Edges::all().inset_unless_ignored(rect, safe), rect);
    }

    #[test]
    fn builders_replace_fields() {
        let guide = LayoutGuide::new(WidthPolicy::Fixed(270.0), HeightPolicy::AtLeast(120.0))
            .with_insets(Insets::new(8.0, 4.0, 12.0, 6.0))
            .ignoring_safe_area(Edges::VERTICAL);
        assert_eq!(guide.horizontal_insets(), 20.0);
        assert_eq!(guide.vertical_insets(), 10.0);
        assert!(guide.ignores_safe_area_edges.contains(Edges::TOP));
        assert!(!guide.ignores_safe_area_edges.contains(Edges::LEFT));
    }
}
