// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backdrop policy: dimming, background-tap dismissal, and touch pass-through.
//!
//! [`BackdropPolicy::hit_test`] classifies a point against the presented
//! content's shape into a [`BackdropHit`]. The controller uses the result to
//! decide whether a touch belongs to the content, the backdrop (and may
//! dismiss), or should fall through to whatever lies below the presentation.
//!
//! [`BackdropTap`] recognizes a tap on the backdrop. A tap is lost when the
//! touch moves past its slop, and when a drag gesture claims the touch.

use kurbo::{Point, Rect, RoundedRect, Shape};

/// Movement allowed between touch down and up for a tap, in layout units.
pub const TAP_SLOP: f64 = 8.0;

/// A straight RGBA color, components in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red.
    pub r: f32,
    /// Green.
    pub g: f32,
    /// Blue.
    pub b: f32,
    /// Alpha.
    pub a: f32,
}

impl Color {
    /// Fully transparent.
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);
    /// Opaque black.
    pub const BLACK: Self = Self::rgba(0.0, 0.0, 0.0, 1.0);

    /// Create a color from components.
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with a different alpha.
    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }
}

/// Material of a blurred backdrop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BlurStyle {
    /// Light material.
    Light,
    /// Dark material.
    Dark,
    /// Adapts to the platform appearance.
    #[default]
    Regular,
}

/// What the dimming view shows.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Dimming {
    /// A flat color.
    Color(Color),
    /// A host-provided view; the host owns it.
    CustomView,
    /// A blur.
    Blur {
        /// Blur material.
        style: BlurStyle,
        /// Blur radius.
        radius: f64,
    },
}

impl Dimming {
    /// `true` when the dimming draws anything at all.
    pub fn is_visible(&self) -> bool {
        match *self {
            Self::Color(c) => c.a > 0.0,
            Self::CustomView => true,
            Self::Blur { radius, .. } => radius > 0.0,
        }
    }
}

impl Default for Dimming {
    fn default() -> Self {
        Self::Color(Color::BLACK.with_alpha(0.4))
    }
}

/// Which touches outside the content the presentation lets through.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum InteractionScope {
    /// Intercept every touch outside the content.
    #[default]
    None,
    /// Intercept outside touches only while the dimming is visible.
    DimmingOnly,
    /// Let every touch through; the presentation is visual only.
    All,
}

/// Classification of a touch location.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BackdropHit {
    /// Inside the presented content.
    Content,
    /// On the backdrop, intercepted by the presentation.
    Backdrop,
    /// Not handled; deliver to the views below.
    PassThrough,
}

/// Backdrop configuration of one presentation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BackdropPolicy {
    /// Dimming appearance.
    pub dimming: Dimming,
    /// Whether a tap on the backdrop dismisses the presentation.
    pub allow_dismiss_when_background_touch: bool,
    /// Touch pass-through behavior.
    pub interaction_scope: InteractionScope,
}

impl Default for BackdropPolicy {
    fn default() -> Self {
        Self {
            dimming: Dimming::default(),
            allow_dismiss_when_background_touch: false,
            interaction_scope: InteractionScope::None,
        }
    }
}

impl BackdropPolicy {
    /// A transparent, non-blocking backdrop (toasts).
    pub fn passthrough() -> Self {
        Self {
            dimming: Dimming::Color(Color::TRANSPARENT),
            allow_dismiss_when_background_touch: false,
            interaction_scope: InteractionScope::All,
        }
    }

    /// Replace the dimming.
    pub fn with_dimming(mut self, dimming: Dimming) -> Self {
        self.dimming = dimming;
        self
    }

    /// Enable or disable dismissal on background taps.
    pub fn dismiss_on_background_tap(mut self, allow: bool) -> Self {
        self.allow_dismiss_when_background_touch = allow;
        self
    }

    /// Replace the interaction scope.
    pub fn with_interaction_scope(mut self, scope: InteractionScope) -> Self {
        self.interaction_scope = scope;
        self
    }

    /// Classify `point` against the content shape.
    ///
    /// `content` is the on-screen content rectangle, rounded by
    /// `corner_radius`; `dimming_alpha` is the dimming view's current opacity.
    pub fn hit_test(
        &self,
        point: Point,
        content: Rect,
        corner_radius: f64,
        dimming_alpha: f64,
    ) -> BackdropHit {
        if self.interaction_scope == InteractionScope::All {
            return BackdropHit::PassThrough;
        }
        if RoundedRect::from_rect(content, corner_radius).contains(point) {
            return BackdropHit::Content;
        }
        match self.interaction_scope {
            InteractionScope::DimmingOnly if !(self.dimming.is_visible() && dimming_alpha > 0.0) => {
                BackdropHit::PassThrough
            }
            _ => BackdropHit::Backdrop,
        }
    }

    /// Whether a completed tap classified as `hit` dismisses the presentation.
    pub fn dismisses_on(&self, hit: BackdropHit) -> bool {
        hit == BackdropHit::Backdrop && self.allow_dismiss_when_background_touch
    }
}

/// Recognizes a single tap on the backdrop.
#[derive(Clone, Copy, Debug)]
pub struct BackdropTap {
    down: Option<Point>,
    slop: f64,
    exceeded: bool,
}

impl Default for BackdropTap {
    fn default() -> Self {
        Self::new()
    }
}

impl BackdropTap {
    /// Create a recognizer with [`TAP_SLOP`].
    pub fn new() -> Self {
        Self::with_slop(TAP_SLOP)
    }

    /// Create a recognizer with a custom slop.
    pub fn with_slop(slop: f64) -> Self {
        Self {
            down: None,
            slop,
            exceeded: false,
        }
    }

    /// Record a touch down.
    pub fn on_down(&mut self, position: Point) {
        self.down = Some(position);
        self.exceeded = false;
    }

    /// Track movement. Returns `true` when the slop was newly exceeded.
    pub fn on_move(&mut self, position: Point) -> bool {
        let Some(down) = self.down else {
            return false;
        };
        if !self.exceeded && down.distance(position) > self.slop {
            self.exceeded = true;
            return true;
        }
        false
    }

    /// Give the touch to another recognizer. Returns `true` if a tap was pending.
    pub fn claim(&mut self) -> bool {
        self.down.take().is_some()
    }

    /// `true` while a touch is down and unclaimed.
    pub fn is_pending(&self) -> bool {
        self.down.is_some()
    }

    /// Finish the touch. Returns `true` when it was a tap.
    pub fn on_up(&mut self, position: Point) -> bool {
        let Some(down) = self.down.take() else {
            return false;
        };
        !self.exceeded && down.distance(position) <= self.slop
    }
}
