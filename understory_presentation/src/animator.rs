// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Show and dismiss transitions.
//!
//! A [`TransitionAnimator`] receives a [`TransitionContext`] snapshot when a
//! transition starts, writes the transition's pre-state into the
//! [`Visuals`] immediately, and then advances on every [`step`]. Each call
//! to [`show`] or [`dismiss`] produces exactly one completion, delivered
//! through the `on_complete` callback of a later [`step`]. A transition
//! replaced by a newer one still reports its completion (on the next step),
//! so callers can rely on one completion per request.
//!
//! Three strategies are provided, all driven by [`SpringTiming::standard`]:
//!
//! - [`AlertTransition`]: scale-down from 1.2× with fade; dismiss is a pure fade.
//! - [`SheetTransition`]: slide up from below the container; dismiss slides
//!   down from wherever the surface currently is. Supports scrubbing via
//!   [`TransitionAnimator::update_progress`].
//! - [`ToastTransition`]: scale-up from 0.9× with fade; dimming is untouched.
//!
//! [`show`]: TransitionAnimator::show
//! [`dismiss`]: TransitionAnimator::dismiss
//! [`step`]: TransitionAnimator::step

use alloc::boxed::Box;

use kurbo::{Affine, Insets, Rect};
use smallvec::SmallVec;

use crate::spring::{Spring, SpringTiming};
use crate::visuals::{Visuals, offset_and_scale};

/// Initial scale of an alert's show transition.
pub const ALERT_INITIAL_SCALE: f64 = 1.2;
/// Initial scale of a toast's show transition (and final scale of its dismissal).
pub const TOAST_INITIAL_SCALE: f64 = 0.9;

/// Which transition finished.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransitionKind {
    /// A show transition.
    Show,
    /// A dismiss transition.
    Dismiss,
}

/// Geometry snapshot handed to an animator when a transition starts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransitionContext {
    /// Container bounds.
    pub container: Rect,
    /// Safe-area insets of the container.
    pub safe_area: Insets,
    /// Visual state at the start of the transition.
    pub visuals: Visuals,
}

/// Performs show and dismiss transitions.
pub trait TransitionAnimator {
    /// Start a show transition.
    fn show(&mut self, cx: &TransitionContext, visuals: &mut Visuals);

    /// Start a dismiss transition.
    fn dismiss(&mut self, cx: &TransitionContext, visuals: &mut Visuals);

    /// Advance by `dt` seconds, calling `on_complete` for every transition that finished.
    fn step(&mut self, dt: f64, visuals: &mut Visuals, on_complete: &mut dyn FnMut(TransitionKind));

    /// `true` while a transition is in flight.
    fn is_animating(&self) -> bool;

    /// Scrub the in-flight transition to `progress` (clamped to `[0, 1]`).
    ///
    /// Returns `false`, leaving `visuals` untouched, when nothing is running
    /// or the strategy does not support scrubbing.
    fn update_progress(&mut self, _progress: f64, _visuals: &mut Visuals) -> bool {
        false
    }
}

impl<T: TransitionAnimator + ?Sized> TransitionAnimator for Box<T> {
    fn show(&mut self, cx: &TransitionContext, visuals: &mut Visuals) {
        (**self).show(cx, visuals);
    }

    fn dismiss(&mut self, cx: &TransitionContext, visuals: &mut Visuals) {
        (**self).dismiss(cx, visuals);
    }

    fn step(&mut self, dt: f64, visuals: &mut Visuals, on_complete: &mut dyn FnMut(TransitionKind)) {
        (**self).step(dt, visuals, on_complete);
    }

    fn is_animating(&self) -> bool {
        (**self).is_animating()
    }

    fn update_progress(&mut self, progress: f64, visuals: &mut Visuals) -> bool {
        (**self).update_progress(progress, visuals)
    }
}

#[derive(Clone, Copy, Debug)]
struct Running {
    kind: TransitionKind,
    from: Visuals,
    to: Visuals,
    spring: Spring,
}

/// Spring-driven interpolation between two visual states.
///
/// The building block of the provided strategies; custom animators can use
/// it as well.
#[derive(Clone, Debug)]
pub struct TransitionRunner {
    timing: SpringTiming,
    running: Option<Running>,
    superseded: SmallVec<[TransitionKind; 1]>,
}

impl TransitionRunner {
    /// Create an idle runner.
    pub fn new(timing: SpringTiming) -> Self {
        Self {
            timing,
            running: None,
            superseded: SmallVec::new(),
        }
    }

    /// Start interpolating from `from` to `to`, writing `from` into `visuals`.
    pub fn start(&mut self, kind: TransitionKind, from: Visuals, to: Visuals, visuals: &mut Visuals) {
        if let Some(previous) = self.running.take() {
            self.superseded.push(previous.kind);
        }
        *visuals = visuals.with_appearance_of(&from);
        self.running = Some(Running {
            kind,
            from,
            to,
            spring: Spring::new(self.timing),
        });
    }

    /// Advance the running transition.
    pub fn step(&mut self, dt: f64, visuals: &mut Visuals, on_complete: &mut dyn FnMut(TransitionKind)) {
        for kind in self.superseded.drain(..) {
            on_complete(kind);
        }
        let Some(run) = self.running.as_mut() else {
            return;
        };
        let done = run.spring.step(dt);
        let kind = run.kind;
        let target = if done {
            run.to
        } else {
            run.from.lerp(&run.to, run.spring.position())
        };
        *visuals = visuals.with_appearance_of(&target);
        if done {
            self.running = None;
            on_complete(kind);
        }
    }

    /// Jump the running transition to `progress`.
    pub fn scrub(&mut self, progress: f64, visuals: &mut Visuals) -> bool {
        let Some(run) = self.running.as_mut() else {
            return false;
        };
        let progress = progress.clamp(0.0, 1.0);
        run.spring.jump_to(progress);
        *visuals = visuals.with_appearance_of(&run.from.lerp(&run.to, progress));
        true
    }

    /// `true` while a transition is in flight or a completion is pending.
    pub fn is_running(&self) -> bool {
        self.running.is_some() || !self.superseded.is_empty()
    }
}

impl Default for TransitionRunner {
    fn default() -> Self {
        Self::new(SpringTiming::standard())
    }
}

/// Alert transition: scale and fade in, fade out.
#[derive(Clone, Debug, Default)]
pub struct AlertTransition {
    runner: TransitionRunner,
}

impl AlertTransition {
    /// Create an alert transition with the standard spring.
    pub fn new() -> Self {
        Self::default()
    }
}

impl TransitionAnimator for AlertTransition {
    fn show(&mut self, cx: &TransitionContext, visuals: &mut Visuals) {
        let from = Visuals {
            transform: Affine::scale(ALERT_INITIAL_SCALE),
            alpha: 0.0,
            dimming_alpha: 0.0,
            ..cx.visuals
        };
        let to = Visuals {
            transform: Affine::IDENTITY,
            alpha: 1.0,
            dimming_alpha: 1.0,
            ..cx.visuals
        };
        self.runner.start(TransitionKind::Show, from, to, visuals);
    }

    fn dismiss(&mut self, cx: &TransitionContext, visuals: &mut Visuals) {
        let from = cx.visuals;
        let to = Visuals {
            alpha: 0.0,
            dimming_alpha: 0.0,
            ..from
        };
        self.runner.start(TransitionKind::Dismiss, from, to, visuals);
    }

    fn step(&mut self, dt: f64, visuals: &mut Visuals, on_complete: &mut dyn FnMut(TransitionKind)) {
        self.runner.step(dt, visuals, on_complete);
    }

    fn is_animating(&self) -> bool {
        self.runner.is_running()
    }
}

/// Sheet transition: slide from the bottom edge, with the dimming fading alongside.
#[derive(Clone, Debug, Default)]
pub struct SheetTransition {
    runner: TransitionRunner,
}

impl SheetTransition {
    /// Create a sheet transition with the standard spring.
    pub fn new() -> Self {
        Self::default()
    }
}

impl TransitionAnimator for SheetTransition {
    fn show(&mut self, cx: &TransitionContext, visuals: &mut Visuals) {
        let offscreen = cx.visuals.frame.height() + cx.safe_area.y1;
        let from = Visuals {
            transform: offset_and_scale(offscreen, 1.0),
            alpha: 1.0,
            dimming_alpha: 0.0,
            ..cx.visuals
        };
        let to = Visuals {
            transform: Affine::IDENTITY,
            alpha: 1.0,
            dimming_alpha: 1.0,
            ..cx.visuals
        };
        self.runner.start(TransitionKind::Show, from, to, visuals);
    }

    fn dismiss(&mut self, cx: &TransitionContext, visuals: &mut Visuals) {
        // Measured from the current top edge so a released drag keeps going
        // from where the finger left the surface.
        let from = cx.visuals;
        let remaining = (cx.container.y1 - from.visual_rect().y0).max(0.0);
        let to = Visuals {
            transform: offset_and_scale(from.translation_y() + remaining, from.scale()),
            dimming_alpha: 0.0,
            ..from
        };
        self.runner.start(TransitionKind::Dismiss, from, to, visuals);
    }

    fn step(&mut self, dt: f64, visuals: &mut Visuals, on_complete: &mut dyn FnMut(TransitionKind)) {
        self.runner.step(dt, visuals, on_complete);
    }

    fn is_animating(&self) -> bool {
        self.runner.is_running()
    }

    fn update_progress(&mut self, progress: f64, visuals: &mut Visuals) -> bool {
        self.runner.scrub(progress, visuals)
    }
}

/// Toast transition: scale and fade, leaving the dimming alone.
#[derive(Clone, Debug, Default)]
pub struct ToastTransition {
    runner: TransitionRunner,
}

impl ToastTransition {
    /// Create a toast transition with the standard spring.
    pub fn new() -> Self {
        Self::default()
    }
}

impl TransitionAnimator for ToastTransition {
    fn show(&mut self, cx: &TransitionContext, visuals: &mut Visuals) {
        let from = Visuals {
            transform: Affine::scale(TOAST_INITIAL_SCALE),
            alpha: 0.0,
            ..cx.visuals
        };
        let to = Visuals {
            transform: Affine::IDENTITY,
            alpha: 1.0,
            ..cx.visuals
        };
        self.runner.start(TransitionKind::Show, from, to, visuals);
    }

    fn dismiss(&mut self, cx: &TransitionContext, visuals: &mut Visuals) {
        let from = cx.visuals;
        let to = Visuals {
            transform: Affine::scale(TOAST_INITIAL_SCALE),
            alpha: 0.0,
            ..from
        };
        self.runner.start(TransitionKind::Dismiss, from, to, visuals);
    }

    fn step(&mut self, dt: f64, visuals: &mut Visuals, on_complete: &mut dyn FnMut(TransitionKind)) {
        self.runner.step(dt, visuals, on_complete);
    }

    fn is_animating(&self) -> bool {
        self.runner.is_running()
    }
}

/// One of the provided strategies, chosen at runtime.
#[derive(Clone, Debug)]
pub enum Transition {
    /// See [`AlertTransition`].
    Alert(AlertTransition),
    /// See [`SheetTransition`].
    Sheet(SheetTransition),
    /// See [`ToastTransition`].
    Toast(ToastTransition),
}

impl Transition {
    /// Alert strategy.
    pub fn alert() -> Self {
        Self::Alert(AlertTransition::new())
    }

    /// Sheet strategy.
    pub fn sheet() -> Self {
        Self::Sheet(SheetTransition::new())
    }

    /// Toast strategy.
    pub fn toast() -> Self {
        Self::Toast(ToastTransition::new())
    }

    fn as_dyn(&mut self) -> &mut dyn TransitionAnimator {
        match self {
            Self::Alert(t) => t,
            Self::Sheet(t) => t,
            Self::Toast(t) => t,
        }
    }
}

impl TransitionAnimator for Transition {
    fn show(&mut self, cx: &TransitionContext, visuals: &mut Visuals) {
        self.as_dyn().show(cx, visuals);
    }

    fn dismiss(&mut self, cx: &TransitionContext, visuals: &mut Visuals) {
        self.as_dyn().dismiss(cx, visuals);
    }

    fn step(&mut self, dt: f64, visuals: &mut Visuals, on_complete: &mut dyn FnMut(TransitionKind)) {
        self.as_dyn().step(dt, visuals, on_complete);
    }

    fn is_animating(&self) -> bool {
        match self {
            Self::Alert(t) => t.is_animating(),
            Self::Sheet(t) => t.is_animating(),
            Self::Toast(t) => t.is_animating(),
        }
    }

    fn update_progress(&mut self, progress: f64, visuals: &mut Visuals) -> bool {
        self.as_dyn().update_progress(progress, visuals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn context(frame: Rect) -> TransitionContext {
        TransitionContext {
            container: Rect::new(0.0, 0.0, 390.0, 844.0),
            safe_area: Insets::new(0.0, 47.0, 0.0, 34.0),
            visuals: Visuals {
                frame,
                ..Visuals::default()
            },
        }
    }

    fn run_to_end(animator: &mut dyn TransitionAnimator, visuals: &mut Visuals) -> Vec<TransitionKind> {
        let mut done = Vec::new();
        for _ in 0..600 {
            animator.step(1.0 / 60.0, visuals, &mut |k| done.push(k));
            if !animator.is_animating() {
                break;
            }
        }
        done
    }

    #[test]
    fn alert_show_starts_enlarged_and_transparent() {
        let cx = context(Rect::new(60.0, 350.0, 330.0, 490.0));
        let mut visuals = cx.visuals;
        let mut alert = AlertTransition::new();
        alert.show(&cx, &mut visuals);
        assert_eq!(visuals.scale(), ALERT_INITIAL_SCALE);
        assert_eq!(visuals.alpha, 0.0);
        assert_eq!(visuals.dimming_alpha, 0.0);

        assert_eq!(run_to_end(&mut alert, &mut visuals), [TransitionKind::Show]);
        assert_eq!(visuals.transform, Affine::IDENTITY);
        assert_eq!(visuals.alpha, 1.0);
        assert_eq!(visuals.dimming_alpha, 1.0);
    }

    #[test]
    fn alert_dismiss_is_a_pure_fade() {
        let cx = context(Rect::new(60.0, 350.0, 330.0, 490.0));
        let mut visuals = cx.visuals;
        let mut alert = AlertTransition::new();
        alert.dismiss(&cx, &mut visuals);
        alert.step(0.05, &mut visuals, &mut |_| {});
        assert_eq!(visuals.transform, Affine::IDENTITY);
        assert!(visuals.alpha < 1.0);
        assert_eq!(run_to_end(&mut alert, &mut visuals), [TransitionKind::Dismiss]);
        assert_eq!(visuals.alpha, 0.0);
        assert_eq!(visuals.dimming_alpha, 0.0);
    }

    #[test]
    fn sheet_show_starts_below_the_safe_area() {
        let cx = context(Rect::new(0.0, 510.0, 390.0, 810.0));
        let mut visuals = cx.visuals;
        let mut sheet = SheetTransition::new();
        sheet.show(&cx, &mut visuals);
        assert_eq!(visuals.translation_y(), 300.0 + 34.0);
        assert_eq!(visuals.dimming_alpha, 0.0);
        run_to_end(&mut sheet, &mut visuals);
        assert_eq!(visuals.translation_y(), 0.0);
    }

    #[test]
    fn sheet_dismiss_continues_from_the_current_edge() {
        let mut cx = context(Rect::new(0.0, 510.0, 390.0, 810.0));
        cx.visuals.transform = offset_and_scale(150.0, 0.9625);
        let mut visuals = cx.visuals;
        let top = visuals.visual_rect().y0;
        let mut sheet = SheetTransition::new();
        sheet.dismiss(&cx, &mut visuals);
        // Starts exactly where the drag left it.
        assert_eq!(visuals.transform, cx.visuals.transform);
        run_to_end(&mut sheet, &mut visuals);
        assert!((visuals.visual_rect().y0 - 844.0).abs() < 1e-9);
        assert!((visuals.translation_y() - (150.0 + 844.0 - top)).abs() < 1e-9);
        assert_eq!(visuals.scale(), 0.9625);
    }

    #[test]
    fn toast_leaves_dimming_alone() {
        let mut cx = context(Rect::new(95.0, 59.0, 295.0, 103.0));
        cx.visuals.dimming_alpha = 0.3;
        let mut visuals = cx.visuals;
        let mut toast = ToastTransition::new();
        toast.show(&cx, &mut visuals);
        assert_eq!(visuals.scale(), TOAST_INITIAL_SCALE);
        assert_eq!(visuals.dimming_alpha, 0.3);
        run_to_end(&mut toast, &mut visuals);
        assert_eq!(visuals.dimming_alpha, 0.3);
        assert_eq!(visuals.alpha, 1.0);
    }

    #[test]
    fn superseded_transition_still_completes_once() {
        let cx = context(Rect::new(0.0, 510.0, 390.0, 810.0));
        let mut visuals = cx.visuals;
        let mut sheet = Transition::sheet();
        sheet.show(&cx, &mut visuals);
        sheet.dismiss(&cx, &mut visuals);
        let done = run_to_end(&mut sheet, &mut visuals);
        assert_eq!(done, [TransitionKind::Show, TransitionKind::Dismiss]);
        assert!(run_to_end(&mut sheet, &mut visuals).is_empty());
    }

    #[test]
    fn scrubbing_clamps_and_requires_a_running_transition() {
        let cx = context(Rect::new(0.0, 510.0, 390.0, 810.0));
        let mut visuals = cx.visuals;
        let mut sheet = SheetTransition::new();
        assert!(!sheet.update_progress(0.5, &mut visuals));
        assert_eq!(visuals, cx.visuals);

        sheet.show(&cx, &mut visuals);
        assert!(sheet.update_progress(7.0, &mut visuals));
        assert_eq!(visuals.translation_y(), 0.0);
        assert!(sheet.update_progress(-3.0, &mut visuals));
        assert_eq!(visuals.translation_y(), 334.0);

        run_to_end(&mut sheet, &mut visuals);
        let settled = visuals;
        assert!(!sheet.update_progress(0.2, &mut visuals));
        assert_eq!(visuals, settled);
    }

    #[test]
    fn alert_does_not_scrub() {
        let cx = context(Rect::new(60.0, 350.0, 330.0, 490.0));
        let mut visuals = cx.visuals;
        let mut alert = Transition::alert();
        alert.show(&cx, &mut visuals);
        let before = visuals;
        assert!(!alert.update_progress(0.5, &mut visuals));
        assert_eq!(visuals, before);
    }
}
