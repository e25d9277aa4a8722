// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Interactive drag-to-dismiss.
//!
//! [`GestureCoordinator`] turns the pan events of one drag into transforms
//! for the presented surface and, when the drag ends, a [`DragResolution`].
//! It has to share the touch with two other consumers:
//!
//! - **Action buttons.** A drag never begins on an action's hit region, so
//!   taps on buttons stay taps.
//! - **Nested scroll views.** While a scroll view under the touch can still
//!   scroll towards its top, the drag leaves it alone. Once the content rests
//!   at its top boundary and the finger keeps moving down, the coordinator
//!   *captures* the scroll view: its own scrolling is switched off, its
//!   offset is pinned to the top, and the drag moves the surface instead.
//!   Scrolling is restored when the drag ends, however it ends.
//!
//! ## Per-drag phases
//!
//! `None → Tracking → (CapturedScroll) → Resolved`. A drag that never moved
//! the surface resolves to [`DragResolution::Ignored`]: no dismissal and no
//! spring-back.
//!
//! ## Motion
//!
//! With `distance` the downward translation since the surface started
//! following the finger (never negative):
//!
//! - `progress = min(1, distance / max_drag_distance)`
//! - `transform = origin · translate(0, distance) · scale(1 − scale_factor · progress)`
//! - `dimming_alpha = max(0.1, 1 − 0.8 · progress)`
//!
//! The drag commits when `distance > distance_threshold` or the downward
//! release velocity exceeds `velocity_threshold`.

use kurbo::{Affine, Point, Vec2};

use crate::spring::{Spring, SpringTiming};
use crate::surface::DragHost;
use crate::visuals::{Visuals, offset_and_scale};

/// Translation past which a released drag dismisses, in layout units.
pub const DISMISS_DISTANCE_THRESHOLD: f64 = 100.0;
/// Downward release velocity past which a drag dismisses, in units per second.
pub const DISMISS_VELOCITY_THRESHOLD: f64 = 500.0;
/// Translation that maps to full drag progress.
pub const MAX_DRAG_DISTANCE: f64 = 200.0;
/// Scale reduction at full progress (the surface shrinks to 95%).
pub const DRAG_SCALE_FACTOR: f64 = 0.05;
/// Dimming opacity never drops below this while dragging.
pub const MIN_DRAG_DIMMING_ALPHA: f64 = 0.1;
/// Dimming opacity lost at full progress.
pub const DRAG_DIMMING_FADE: f64 = 0.8;
/// Tolerance for a scroll view's offset to count as resting at its top.
pub const SCROLL_TOP_EPSILON: f64 = 0.5;

/// Thresholds and scales of the interactive dismissal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragConfig {
    /// See [`DISMISS_DISTANCE_THRESHOLD`].
    pub distance_threshold: f64,
    /// See [`DISMISS_VELOCITY_THRESHOLD`].
    pub velocity_threshold: f64,
    /// See [`MAX_DRAG_DISTANCE`].
    pub max_drag_distance: f64,
    /// See [`DRAG_SCALE_FACTOR`].
    pub scale_factor: f64,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            distance_threshold: DISMISS_DISTANCE_THRESHOLD,
            velocity_threshold: DISMISS_VELOCITY_THRESHOLD,
            max_drag_distance: MAX_DRAG_DISTANCE,
            scale_factor: DRAG_SCALE_FACTOR,
        }
    }
}

impl DragConfig {
    /// Progress for a downward distance.
    pub fn progress(&self, distance: f64) -> f64 {
        (distance / self.max_drag_distance).clamp(0.0, 1.0)
    }

    /// Dimming opacity for a progress.
    pub fn dimming_alpha(&self, progress: f64) -> f64 {
        (1.0 - progress * DRAG_DIMMING_FADE).max(MIN_DRAG_DIMMING_ALPHA)
    }

    /// Whether a release with this distance and velocity dismisses.
    pub fn commits(&self, distance: f64, velocity_y: f64) -> bool {
        distance > self.distance_threshold || velocity_y > self.velocity_threshold
    }
}

/// Phase of the current drag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DragPhase {
    /// No drag.
    #[default]
    None,
    /// Following the finger, or waiting for a nested scroll view to reach its top.
    Tracking,
    /// A nested scroll view was captured; the surface follows the finger.
    CapturedScroll,
    /// The last drag ended.
    Resolved,
}

/// State of one drag. Lives from gesture begin to gesture end.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragSession<S> {
    /// Surface transform when the drag began.
    pub origin_transform: Affine,
    /// Scroll view under the initial touch; captured once `has_captured_scroll`.
    pub captured_scroll: Option<S>,
    /// Whether `captured_scroll` has been taken over.
    pub has_captured_scroll: bool,
    /// Downward distance the surface currently follows.
    pub translation_y: f64,
    /// Drag progress in `[0, 1]`.
    pub progress: f64,
    original_scroll_enabled: Option<bool>,
    baseline_y: f64,
    last_translation_y: f64,
    applied: bool,
}

impl<S> DragSession<S> {
    /// `true` once the drag moved the surface.
    pub fn has_moved_surface(&self) -> bool {
        self.applied
    }
}

/// Visual update produced by a drag movement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragUpdate {
    /// New surface transform.
    pub transform: Affine,
    /// New dimming opacity.
    pub dimming_alpha: f64,
    /// Drag progress in `[0, 1]`.
    pub progress: f64,
}

/// Outcome of a finished drag.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DragResolution {
    /// The drag never moved the surface; nothing to do.
    Ignored,
    /// Dismiss the presentation.
    Commit,
    /// Animate back to `transform` with full dimming.
    SpringBack {
        /// Transform to settle at.
        transform: Affine,
    },
}

/// Drag-to-dismiss state machine.
#[derive(Clone, Debug, Default)]
pub struct GestureCoordinator<S> {
    config: DragConfig,
    phase: DragPhase,
    session: Option<DragSession<S>>,
}

impl<S: Copy + Eq + core::fmt::Debug> GestureCoordinator<S> {
    /// Create a coordinator.
    pub fn new(config: DragConfig) -> Self {
        Self {
            config,
            phase: DragPhase::None,
            session: None,
        }
    }

    /// Thresholds in use.
    pub fn config(&self) -> &DragConfig {
        &self.config
    }

    /// Current phase.
    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    /// The live drag session, if any.
    pub fn session(&self) -> Option<&DragSession<S>> {
        self.session.as_ref()
    }

    /// `true` while a drag is moving the surface.
    pub fn is_dragging(&self) -> bool {
        self.session.as_ref().is_some_and(DragSession::has_moved_surface)
    }

    /// Whether a drag may begin at `location`: not on an action button.
    pub fn should_begin<H>(&self, host: &H, location: Point) -> bool
    where
        H: DragHost<View = S>,
    {
        host.action_at(location).is_none()
    }

    /// Begin a drag at `location`. Returns `false` when vetoed.
    pub fn begin<H>(&mut self, host: &H, location: Point, origin_transform: Affine) -> bool
    where
        H: DragHost<View = S>,
    {
        if !self.should_begin(host, location) {
            #[cfg(feature = "tracing")]
            tracing::trace!(?location, "drag vetoed by action hit region");
            return false;
        }
        self.session = Some(DragSession {
            origin_transform,
            captured_scroll: host.scroll_view_at(location),
            has_captured_scroll: false,
            translation_y: 0.0,
            progress: 0.0,
            original_scroll_enabled: None,
            baseline_y: 0.0,
            last_translation_y: 0.0,
            applied: false,
        });
        self.phase = DragPhase::Tracking;
        true
    }

    /// Feed the gesture's cumulative translation.
    ///
    /// Returns the visual update to apply, or `None` when the movement
    /// belongs to a nested scroll view (or nothing moved yet).
    pub fn update<H>(&mut self, host: &mut H, translation: Vec2) -> Option<DragUpdate>
    where
        H: DragHost<View = S>,
    {
        let config = self.config;
        let session = self.session.as_mut()?;
        let delta = translation.y - session.last_translation_y;
        let previous_y = session.last_translation_y;
        session.last_translation_y = translation.y;

        match self.phase {
            DragPhase::Tracking => {
                let scroll = session.captured_scroll;
                if let Some(scroll) = scroll
                    && let Some(metrics) = host.scroll_metrics(scroll)
                {
                    if !(delta > 0.0 && metrics.is_at_top(SCROLL_TOP_EPSILON)) {
                        // The scroll view consumes this movement natively.
                        return None;
                    }
                    session.original_scroll_enabled = Some(metrics.is_scroll_enabled);
                    session.has_captured_scroll = true;
                    session.baseline_y = previous_y;
                    host.set_scroll_enabled(scroll, false);
                    host.set_scroll_offset(scroll, metrics.top_boundary());
                    self.phase = DragPhase::CapturedScroll;
                    #[cfg(feature = "tracing")]
                    tracing::debug!(?scroll, baseline = previous_y, "captured nested scroll view");
                }
            }
            DragPhase::CapturedScroll => {
                if let Some(scroll) = session.captured_scroll
                    && let Some(metrics) = host.scroll_metrics(scroll)
                {
                    host.set_scroll_offset(scroll, metrics.top_boundary());
                }
            }
            DragPhase::None | DragPhase::Resolved => return None,
        }

        let distance = (translation.y - session.baseline_y).max(0.0);
        if distance <= 0.0 && !session.applied {
            return None;
        }
        let progress = config.progress(distance);
        session.translation_y = distance;
        session.progress = progress;
        session.applied = true;
        Some(DragUpdate {
            transform: session.origin_transform
                * offset_and_scale(distance, 1.0 - config.scale_factor * progress),
            dimming_alpha: config.dimming_alpha(progress),
            progress,
        })
    }

    /// End (or cancel) the drag and decide its outcome.
    ///
    /// Always releases a captured scroll view, restoring its scrolling.
    pub fn end<H>(&mut self, host: &mut H, translation: Vec2, velocity: Vec2) -> DragResolution
    where
        H: DragHost<View = S>,
    {
        let Some(session) = self.session.take() else {
            return DragResolution::Ignored;
        };
        self.phase = DragPhase::Resolved;
        if let (Some(scroll), Some(enabled)) = (session.captured_scroll, session.original_scroll_enabled) {
            host.set_scroll_enabled(scroll, enabled);
        }
        if !session.applied {
            return DragResolution::Ignored;
        }
        let distance = (translation.y - session.baseline_y).max(0.0);
        let resolution = if self.config.commits(distance, velocity.y) {
            DragResolution::Commit
        } else {
            DragResolution::SpringBack {
                transform: session.origin_transform,
            }
        };
        #[cfg(feature = "tracing")]
        tracing::debug!(distance, velocity_y = velocity.y, ?resolution, "drag resolved");
        resolution
    }

    /// Drop any live session, restoring a captured scroll view.
    pub fn reset<H>(&mut self, host: &mut H)
    where
        H: DragHost<View = S>,
    {
        if let Some((scroll, enabled)) = self.abandon() {
            host.set_scroll_enabled(scroll, enabled);
        }
    }

    /// Drop any live session without a host at hand.
    ///
    /// Returns the captured scroll view and the enablement it must get back,
    /// if the session had taken one over. Later pan events are ignored until
    /// the next [`begin`](Self::begin).
    pub fn abandon(&mut self) -> Option<(S, bool)> {
        self.phase = DragPhase::None;
        let session = self.session.take()?;
        session.captured_scroll.zip(session.original_scroll_enabled)
    }
}

/// Settles a released drag back to its resting transform.
#[derive(Clone, Copy, Debug)]
pub struct SpringBack {
    from: Visuals,
    to: Visuals,
    spring: Spring,
}

impl SpringBack {
    /// Start from `current` towards `transform` with full dimming.
    pub fn new(current: Visuals, transform: Affine, timing: SpringTiming) -> Self {
        Self {
            from: current,
            to: Visuals {
                transform,
                dimming_alpha: 1.0,
                ..current
            },
            spring: Spring::new(timing),
        }
    }

    /// Advance and write into `visuals`. Returns `true` once settled.
    pub fn step(&mut self, dt: f64, visuals: &mut Visuals) -> bool {
        let done = self.spring.step(dt);
        let target = if done {
            self.to
        } else {
            self.from.lerp(&self.to, self.spring.position())
        };
        *visuals = visuals.with_appearance_of(&target);
        done
    }

    /// Jump to the end state.
    pub fn finish(&mut self, visuals: &mut Visuals) {
        *visuals = visuals.with_appearance_of(&self.to);
    }
}
