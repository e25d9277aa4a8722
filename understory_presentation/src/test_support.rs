// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording host doubles shared by the unit tests.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

use kurbo::{Insets, Point, Rect, Size, Vec2};

use crate::action::{ActionId, ActionRegions};
use crate::animator::{TransitionAnimator, TransitionContext, TransitionKind};
use crate::controller::LifecycleEvent;
use crate::gesture::{DragPhase, DragUpdate, GestureCoordinator};
use crate::surface::{DragHost, HapticFeedback, Orientation, PresentationSurface, ScrollMetrics};
use crate::visuals::Visuals;

pub(crate) const SCREEN: Rect = Rect::new(0.0, 0.0, 390.0, 844.0);
pub(crate) const SAFE_AREA: Insets = Insets::new(0.0, 47.0, 0.0, 34.0);
pub(crate) const PRESENTED: u32 = 1;
pub(crate) const DIMMING: u32 = 2;
pub(crate) const SCROLL: u32 = 7;
pub(crate) const CONTAINER: u32 = 50;
const FIRST_WINDOW: u32 = 100;

/// One observable side effect, in the order it happened.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Call {
    MakeWindow(u32),
    TearDown(u32),
    Attach(u32),
    Detach,
    Hook(LifecycleEvent),
    Listener(u8, LifecycleEvent),
    Haptic(HapticFeedback),
}

pub(crate) type CallLog = Rc<RefCell<Vec<Call>>>;

#[derive(Debug)]
pub(crate) struct MockSurface {
    pub(crate) log: CallLog,
    pub(crate) bounds: Option<Rect>,
    pub(crate) safe_area: Insets,
    pub(crate) orientation: Orientation,
    pub(crate) content: Size,
    pub(crate) attached_to: Option<u32>,
    pub(crate) last_applied: Option<Visuals>,
    pub(crate) apply_count: usize,
    pub(crate) actions: ActionRegions,
    pub(crate) scroll: Option<ScrollMetrics>,
    pub(crate) scroll_enabled_writes: usize,
    pub(crate) last_pan_y: f64,
    next_window: u32,
}

impl MockSurface {
    pub(crate) fn new(content: Size) -> Self {
        Self {
            log: CallLog::default(),
            bounds: Some(SCREEN),
            safe_area: SAFE_AREA,
            orientation: Orientation::Portrait,
            content,
            attached_to: None,
            last_applied: None,
            apply_count: 0,
            actions: ActionRegions::new(),
            scroll: None,
            scroll_enabled_writes: 0,
            last_pan_y: 0.0,
            next_window: FIRST_WINDOW,
        }
    }

    pub(crate) fn alert() -> Self {
        Self::new(Size::new(270.0, 140.0))
    }

    pub(crate) fn sheet() -> Self {
        Self::new(Size::new(390.0, 300.0))
    }

    pub(crate) fn with_scroll(mut self, offset_y: f64) -> Self {
        self.scroll = Some(ScrollMetrics {
            offset_y,
            top_inset: 0.0,
            is_scroll_enabled: true,
        });
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.log.borrow().clone()
    }

    /// What an enabled scroll view does with a finger movement on its own.
    pub(crate) fn scroll_natively(&mut self, delta_y: f64) {
        if let Some(scroll) = self.scroll.as_mut()
            && scroll.is_scroll_enabled
        {
            scroll.offset_y = (scroll.offset_y - delta_y).max(scroll.top_boundary());
        }
    }

    /// Deliver a pan movement to both the coordinator and the scroll view.
    pub(crate) fn pan(&mut self, gc: &mut GestureCoordinator<u32>, y: f64) -> Option<DragUpdate> {
        let delta = y - self.last_pan_y;
        self.last_pan_y = y;
        let update = gc.update(self, Vec2::new(0.0, y));
        if gc.phase() != DragPhase::CapturedScroll {
            self.scroll_natively(delta);
        }
        update
    }

    fn record(&self, call: Call) {
        self.log.borrow_mut().push(call);
    }
}

impl PresentationSurface for MockSurface {
    type View = u32;

    fn presented_view(&self) -> u32 {
        PRESENTED
    }

    fn dimming_view(&self) -> u32 {
        DIMMING
    }

    fn make_covering_window(&mut self) -> u32 {
        let window = self.next_window;
        self.next_window += 1;
        self.record(Call::MakeWindow(window));
        window
    }

    fn tear_down_window(&mut self, window: u32) {
        self.record(Call::TearDown(window));
    }

    fn attach(&mut self, container: u32) {
        self.attached_to = Some(container);
        self.record(Call::Attach(container));
    }

    fn detach(&mut self) {
        self.attached_to = None;
        self.record(Call::Detach);
    }

    fn container_bounds(&self) -> Option<Rect> {
        self.bounds
    }

    fn orientation(&self) -> Orientation {
        self.orientation
    }

    fn safe_area_insets(&self) -> Insets {
        self.safe_area
    }

    fn measure(&self, proposal: Size) -> Size {
        Size::new(
            self.content.width.min(proposal.width),
            self.content.height.min(proposal.height),
        )
    }

    fn apply_visuals(&mut self, visuals: &Visuals) {
        self.last_applied = Some(*visuals);
        self.apply_count += 1;
    }

    fn trigger_haptic(&mut self, feedback: HapticFeedback) {
        self.record(Call::Haptic(feedback));
    }

    fn will_show(&mut self) {
        self.record(Call::Hook(LifecycleEvent::WillShow));
    }

    fn did_show(&mut self) {
        self.record(Call::Hook(LifecycleEvent::DidShow));
    }

    fn will_dismiss(&mut self) {
        self.record(Call::Hook(LifecycleEvent::WillDismiss));
    }

    fn did_dismiss(&mut self) {
        self.record(Call::Hook(LifecycleEvent::DidDismiss));
    }
}

impl DragHost for MockSurface {
    fn action_at(&self, point: Point) -> Option<ActionId> {
        self.actions.hit(point)
    }

    fn scroll_view_at(&self, _point: Point) -> Option<u32> {
        self.scroll.map(|_| SCROLL)
    }

    fn scroll_metrics(&self, scroll: u32) -> Option<ScrollMetrics> {
        if scroll == SCROLL { self.scroll } else { None }
    }

    fn set_scroll_offset(&mut self, scroll: u32, offset_y: f64) {
        if scroll == SCROLL
            && let Some(metrics) = self.scroll.as_mut()
        {
            metrics.offset_y = offset_y;
        }
    }

    fn set_scroll_enabled(&mut self, scroll: u32, enabled: bool) {
        self.scroll_enabled_writes += 1;
        if scroll == SCROLL
            && let Some(metrics) = self.scroll.as_mut()
        {
            metrics.is_scroll_enabled = enabled;
        }
    }
}

/// Wraps an animator and counts how often transitions were started.
#[derive(Clone, Debug, Default)]
pub(crate) struct CountingAnimator<A> {
    pub(crate) inner: A,
    pub(crate) shows: usize,
    pub(crate) dismisses: usize,
    pub(crate) scrubs: usize,
}

impl<A> CountingAnimator<A> {
    pub(crate) fn new(inner: A) -> Self {
        Self {
            inner,
            shows: 0,
            dismisses: 0,
            scrubs: 0,
        }
    }
}

impl<A: TransitionAnimator> TransitionAnimator for CountingAnimator<A> {
    fn show(&mut self, cx: &TransitionContext, visuals: &mut Visuals) {
        self.shows += 1;
        self.inner.show(cx, visuals);
    }

    fn dismiss(&mut self, cx: &TransitionContext, visuals: &mut Visuals) {
        self.dismisses += 1;
        self.inner.dismiss(cx, visuals);
    }

    fn step(&mut self, dt: f64, visuals: &mut Visuals, on_complete: &mut dyn FnMut(TransitionKind)) {
        self.inner.step(dt, visuals, on_complete);
    }

    fn is_animating(&self) -> bool {
        self.inner.is_animating()
    }

    fn update_progress(&mut self, progress: f64, visuals: &mut Visuals) -> bool {
        self.scrubs += 1;
        self.inner.update_progress(progress, visuals)
    }
}
