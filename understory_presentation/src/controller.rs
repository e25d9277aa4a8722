// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The presentation state machine.
//!
//! [`PresentationController`] owns one presented surface and walks it through
//! `Idle → Presenting → Active → Dismissing → Idle`. Requests that do not fit
//! the current state are rejected (the method returns `false`), never queued,
//! so at most one transition is ever in flight.
//!
//! ## Driving the controller
//!
//! The host forwards three kinds of input:
//!
//! - **Requests**: [`show`](PresentationController::show),
//!   [`dismiss`](PresentationController::dismiss), action triggers, layout
//!   guide changes, and orientation changes.
//! - **Frames**: [`tick`](PresentationController::tick) with the elapsed time,
//!   once per display refresh while it returns `true`. Transition completions
//!   (and therefore `did_show`/`did_dismiss`) are delivered from `tick`.
//! - **Touches**: backdrop touches and, for surfaces implementing
//!   [`DragHost`], the pan events of the drag-to-dismiss gesture.
//!
//! ## Ordering
//!
//! At every hook point the surface's own hook runs first, then the
//! registered listeners in registration order. A full cycle is observed as
//! `will_show, did_show, will_dismiss, did_dismiss`.
//!
//! ## Threading
//!
//! Listeners and completions are plain (non-`Send`) closures, so a
//! controller stays on the thread that created it.

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::RefCell;
use core::fmt;
use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll, Waker};

use kurbo::{Point, Rect, Vec2};
use smallvec::SmallVec;

use crate::action::{Action, ActionId, ActionList};
use crate::animator::{Transition, TransitionAnimator, TransitionContext, TransitionKind};
use crate::backdrop::{BackdropHit, BackdropTap};
use crate::config::PresentationConfig;
use crate::gesture::{DragResolution, GestureCoordinator, SpringBack};
use crate::guide::LayoutGuide;
use crate::layout::LayoutEngine;
use crate::spring::SpringTiming;
use crate::surface::{DragHost, HapticFeedback, PresentationSurface};
use crate::visuals::Visuals;

/// Lifecycle state of a presentation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PresentationState {
    /// Not shown.
    #[default]
    Idle,
    /// The show transition is running.
    Presenting,
    /// Shown and settled.
    Active,
    /// The dismiss transition is running.
    Dismissing,
}

/// The four lifecycle hook points.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LifecycleEvent {
    /// Before the show transition starts.
    WillShow,
    /// After the show transition completed.
    DidShow,
    /// Before the dismiss transition starts.
    WillDismiss,
    /// After the dismiss transition completed and the views were detached.
    DidDismiss,
}

/// Observer of a presentation's lifecycle.
///
/// Every method defaults to doing nothing. Closures taking a
/// [`LifecycleEvent`] are listeners too.
pub trait LifecycleListener {
    /// See [`LifecycleEvent::WillShow`].
    fn will_show(&mut self) {}
    /// See [`LifecycleEvent::DidShow`].
    fn did_show(&mut self) {}
    /// See [`LifecycleEvent::WillDismiss`].
    fn will_dismiss(&mut self) {}
    /// See [`LifecycleEvent::DidDismiss`].
    fn did_dismiss(&mut self) {}
}

impl<F: FnMut(LifecycleEvent)> LifecycleListener for F {
    fn will_show(&mut self) {
        self(LifecycleEvent::WillShow);
    }

    fn did_show(&mut self) {
        self(LifecycleEvent::DidShow);
    }

    fn will_dismiss(&mut self) {
        self(LifecycleEvent::WillDismiss);
    }

    fn did_dismiss(&mut self) {
        self(LifecycleEvent::DidDismiss);
    }
}

type Callback = Option<Box<dyn FnMut()>>;

/// A listener assembled from optional per-event closures.
#[derive(Default)]
pub struct LifecycleCallbacks {
    will_show: Callback,
    did_show: Callback,
    will_dismiss: Callback,
    did_dismiss: Callback,
}

impl fmt::Debug for LifecycleCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifecycleCallbacks")
            .field("will_show", &self.will_show.is_some())
            .field("did_show", &self.did_show.is_some())
            .field("will_dismiss", &self.will_dismiss.is_some())
            .field("did_dismiss", &self.did_dismiss.is_some())
            .finish()
    }
}

impl LifecycleCallbacks {
    /// No callbacks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the `will_show` callback.
    pub fn on_will_show(mut self, f: impl FnMut() + 'static) -> Self {
        self.will_show = Some(Box::new(f));
        self
    }

    /// Set the `did_show` callback.
    pub fn on_did_show(mut self, f: impl FnMut() + 'static) -> Self {
        self.did_show = Some(Box::new(f));
        self
    }

    /// Set the `will_dismiss` callback.
    pub fn on_will_dismiss(mut self, f: impl FnMut() + 'static) -> Self {
        self.will_dismiss = Some(Box::new(f));
        self
    }

    /// Set the `did_dismiss` callback.
    pub fn on_did_dismiss(mut self, f: impl FnMut() + 'static) -> Self {
        self.did_dismiss = Some(Box::new(f));
        self
    }
}

impl LifecycleListener for LifecycleCallbacks {
    fn will_show(&mut self) {
        if let Some(f) = self.will_show.as_mut() {
            f();
        }
    }

    fn did_show(&mut self) {
        if let Some(f) = self.did_show.as_mut() {
            f();
        }
    }

    fn will_dismiss(&mut self) {
        if let Some(f) = self.will_dismiss.as_mut() {
            f();
        }
    }

    fn did_dismiss(&mut self) {
        if let Some(f) = self.did_dismiss.as_mut() {
            f();
        }
    }
}

fn dispatch(listener: &mut dyn LifecycleListener, event: LifecycleEvent) {
    match event {
        LifecycleEvent::WillShow => listener.will_show(),
        LifecycleEvent::DidShow => listener.did_show(),
        LifecycleEvent::WillDismiss => listener.will_dismiss(),
        LifecycleEvent::DidDismiss => listener.did_dismiss(),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DismissTrigger {
    Request,
    Drag,
}

/// Owns a presented surface and sequences its lifecycle.
///
/// `S` is the host's surface, `A` the transition strategy.
pub struct PresentationController<S: PresentationSurface, A = Transition> {
    surface: S,
    animator: A,
    config: PresentationConfig,
    state: PresentationState,
    layout: LayoutEngine,
    visuals: Visuals,
    listeners: SmallVec<[Box<dyn LifecycleListener>; 2]>,
    container: Option<S::View>,
    owned_window: Option<S::View>,
    dismiss_completion: Option<Box<dyn FnOnce()>>,
    actions: ActionList,
    drag: GestureCoordinator<S::View>,
    scroll_restore: Option<(S::View, bool)>,
    spring_back: Option<SpringBack>,
    backdrop_tap: BackdropTap,
}

impl<S: PresentationSurface, A> fmt::Debug for PresentationController<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PresentationController")
            .field("state", &self.state)
            .field("container", &self.container)
            .field("owned_window", &self.owned_window)
            .field("visuals", &self.visuals)
            .field("listeners", &self.listeners.len())
            .field("actions", &self.actions.len())
            .field("drag_phase", &self.drag.phase())
            .finish_non_exhaustive()
    }
}

impl<S: PresentationSurface> PresentationController<S, Transition> {
    /// A centered alert with the alert transition.
    pub fn alert(surface: S) -> Self {
        Self::new(surface, Transition::alert(), PresentationConfig::alert())
    }

    /// A bottom sheet with the sheet transition and drag-to-dismiss.
    pub fn sheet(surface: S) -> Self {
        Self::new(surface, Transition::sheet(), PresentationConfig::sheet())
    }

    /// A bottom action sheet with the sheet transition.
    pub fn action_sheet(surface: S) -> Self {
        Self::new(surface, Transition::sheet(), PresentationConfig::action_sheet())
    }

    /// A top toast with the toast transition.
    pub fn toast(surface: S) -> Self {
        Self::new(surface, Transition::toast(), PresentationConfig::toast())
    }
}

impl<S: PresentationSurface, A: TransitionAnimator> PresentationController<S, A> {
    /// Create an idle controller.
    pub fn new(surface: S, animator: A, config: PresentationConfig) -> Self {
        Self {
            surface,
            animator,
            config,
            state: PresentationState::Idle,
            layout: LayoutEngine::new(),
            visuals: Visuals::default(),
            listeners: SmallVec::new(),
            container: None,
            owned_window: None,
            dismiss_completion: None,
            actions: ActionList::new(),
            drag: GestureCoordinator::new(config.drag),
            scroll_restore: None,
            spring_back: None,
            backdrop_tap: BackdropTap::new(),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> PresentationState {
        self.state
    }

    /// The host surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// The host surface, mutably.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// The transition strategy.
    pub fn animator(&self) -> &A {
        &self.animator
    }

    /// The configuration.
    pub fn config(&self) -> &PresentationConfig {
        &self.config
    }

    /// The current visual state.
    pub fn visuals(&self) -> &Visuals {
        &self.visuals
    }

    /// The layout engine.
    pub fn layout(&self) -> &LayoutEngine {
        &self.layout
    }

    /// The container the surface is attached to while presented.
    pub fn container(&self) -> Option<S::View> {
        self.container
    }

    /// The covering window created by [`show`](Self::show), if any.
    pub fn owned_window(&self) -> Option<S::View> {
        self.owned_window
    }

    /// The actions of this presentation.
    pub fn actions(&self) -> &ActionList {
        &self.actions
    }

    /// The drag-to-dismiss state.
    pub fn gesture(&self) -> &GestureCoordinator<S::View> {
        &self.drag
    }

    /// `true` while a transition, a spring-back, or a pending completion needs frames.
    pub fn is_animating(&self) -> bool {
        self.animator.is_animating() || self.spring_back.is_some()
    }

    /// Register a lifecycle listener. Listeners are called in registration order.
    pub fn add_listener(&mut self, listener: impl LifecycleListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Add an action.
    ///
    /// Actions can only be added while the presentation is idle; anything
    /// else (and a second cancel action) is a programming error that trips a
    /// debug assertion and is rejected in release builds. Re-runs layout,
    /// since actions change the content size.
    pub fn add_action(&mut self, action: Action) -> Option<ActionId> {
        debug_assert!(
            self.state == PresentationState::Idle,
            "actions can only be added while the presentation is idle"
        );
        if self.state != PresentationState::Idle {
            return None;
        }
        let id = self.actions.push(action)?;
        self.relayout();
        Some(id)
    }

    /// Run `id`'s handler and, for auto-dismissing actions, dismiss.
    ///
    /// Returns `false` when the action does not exist or the presentation
    /// is not active.
    pub fn trigger_action(&mut self, id: ActionId) -> bool {
        if self.state != PresentationState::Active {
            return false;
        }
        let Some(action) = self.actions.get_mut(id) else {
            return false;
        };
        if let Some(handler) = action.handler.as_mut() {
            handler();
        }
        if action.auto_dismiss {
            self.dismiss();
        }
        true
    }

    /// Replace the layout guide. Lays out again right away while active.
    pub fn set_layout_guide(&mut self, guide: LayoutGuide) {
        self.config.layout_guide = guide;
        if self.state == PresentationState::Active && self.relayout() {
            self.surface.apply_visuals(&self.visuals);
        }
    }

    /// React to a device orientation change.
    ///
    /// Re-runs layout (no transition) while active; ignored in every other
    /// state so layout never races a running transition.
    pub fn orientation_changed(&mut self) -> bool {
        if self.state != PresentationState::Active {
            #[cfg(feature = "tracing")]
            tracing::trace!(state = ?self.state, "orientation change ignored");
            return false;
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(orientation = ?self.surface.orientation(), "relayout after orientation change");
        if self.relayout() {
            self.surface.apply_visuals(&self.visuals);
            return true;
        }
        false
    }

    /// Present in `container`, or in a new covering window when `None`.
    ///
    /// Rejected (returns `false`) unless idle.
    pub fn show(&mut self, container: Option<S::View>) -> bool {
        if self.state != PresentationState::Idle {
            #[cfg(feature = "tracing")]
            tracing::debug!(state = ?self.state, "show rejected");
            return false;
        }
        let container = match container {
            Some(container) => container,
            None => {
                let window = self.surface.make_covering_window();
                self.owned_window = Some(window);
                window
            }
        };
        self.surface.attach(container);
        self.container = Some(container);
        self.visuals = Visuals {
            frame: self.visuals.frame,
            ..Visuals::default()
        };
        self.relayout();

        self.set_state(PresentationState::Presenting);
        self.notify(LifecycleEvent::WillShow);
        let cx = self.transition_context();
        self.animator.show(&cx, &mut self.visuals);
        self.surface.apply_visuals(&self.visuals);
        true
    }

    /// Dismiss.
    ///
    /// Rejected (returns `false`) unless active, and while a drag is moving
    /// the surface.
    pub fn dismiss(&mut self) -> bool {
        self.begin_dismiss(DismissTrigger::Request, None)
    }

    /// Dismiss and call `completion` once the surface is gone.
    ///
    /// When the request is rejected, `completion` is dropped without being called.
    pub fn dismiss_with(&mut self, completion: impl FnOnce() + 'static) -> bool {
        self.begin_dismiss(DismissTrigger::Request, Some(Box::new(completion)))
    }

    /// Dismiss, resolving the returned future once the surface is gone.
    ///
    /// The future resolves to `true` after `did_dismiss`, or to `false`
    /// right away when the request was rejected.
    pub fn dismiss_async(&mut self) -> DismissFuture {
        let shared = Rc::new(RefCell::new(DismissShared::default()));
        let handle = Rc::clone(&shared);
        let accepted = self.begin_dismiss(
            DismissTrigger::Request,
            Some(Box::new(move || handle.borrow_mut().resolve(true))),
        );
        if !accepted {
            shared.borrow_mut().resolve(false);
        }
        DismissFuture { shared }
    }

    /// Advance animations by `dt` seconds and deliver completions.
    ///
    /// Returns `true` while more frames are needed.
    pub fn tick(&mut self, dt: f64) -> bool {
        let mut changed = false;
        if let Some(back) = self.spring_back.as_mut() {
            if back.step(dt, &mut self.visuals) {
                self.spring_back = None;
            }
            changed = true;
        }

        let mut finished: SmallVec<[TransitionKind; 2]> = SmallVec::new();
        if self.animator.is_animating() {
            self.animator
                .step(dt, &mut self.visuals, &mut |kind| finished.push(kind));
            changed = true;
        }
        if changed {
            self.surface.apply_visuals(&self.visuals);
        }
        for kind in finished {
            match kind {
                TransitionKind::Show => self.finish_show(),
                TransitionKind::Dismiss => self.finish_dismiss(),
            }
        }
        self.is_animating()
    }

    /// Classify a touch at `point` against the content and backdrop.
    pub fn hit_test(&self, point: Point) -> BackdropHit {
        if self.state == PresentationState::Idle {
            return BackdropHit::PassThrough;
        }
        self.config.backdrop.hit_test(
            point,
            self.visuals.visual_rect(),
            self.config.corner_radius,
            self.visuals.dimming_alpha,
        )
    }

    /// A touch went down. Starts tracking a backdrop tap when it hit the backdrop.
    pub fn backdrop_touch_down(&mut self, point: Point) -> BackdropHit {
        let hit = self.hit_test(point);
        if hit == BackdropHit::Backdrop {
            self.backdrop_tap.on_down(point);
        }
        hit
    }

    /// A touch moved.
    pub fn backdrop_touch_moved(&mut self, point: Point) {
        self.backdrop_tap.on_move(point);
    }

    /// A touch was cancelled by the platform.
    pub fn backdrop_touch_cancelled(&mut self) {
        self.backdrop_tap.claim();
    }

    /// A touch went up. Returns `true` when the tap dismissed the presentation.
    pub fn backdrop_touch_up(&mut self, point: Point) -> bool {
        if !self.backdrop_tap.on_up(point) {
            return false;
        }
        if !self.config.backdrop.dismisses_on(self.hit_test(point)) {
            return false;
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(?point, "backdrop tap");
        self.dismiss()
    }

    fn begin_dismiss(&mut self, trigger: DismissTrigger, completion: Option<Box<dyn FnOnce()>>) -> bool {
        if self.state != PresentationState::Active {
            #[cfg(feature = "tracing")]
            tracing::debug!(state = ?self.state, "dismiss rejected");
            return false;
        }
        if trigger == DismissTrigger::Request && self.drag.is_dragging() {
            #[cfg(feature = "tracing")]
            tracing::debug!("dismiss rejected during drag");
            return false;
        }
        self.spring_back = None;
        // A drag session never outlives the presentation cycle it began in.
        if let Some(restore) = self.drag.abandon() {
            self.scroll_restore = Some(restore);
        }
        self.dismiss_completion = completion;
        self.set_state(PresentationState::Dismissing);
        self.notify(LifecycleEvent::WillDismiss);
        let cx = self.transition_context();
        self.animator.dismiss(&cx, &mut self.visuals);
        self.surface.apply_visuals(&self.visuals);
        true
    }

    fn finish_show(&mut self) {
        if self.state != PresentationState::Presenting {
            return;
        }
        self.set_state(PresentationState::Active);
        self.notify(LifecycleEvent::DidShow);
    }

    fn finish_dismiss(&mut self) {
        if self.state != PresentationState::Dismissing {
            return;
        }
        self.surface.detach();
        if let Some(window) = self.owned_window.take() {
            self.surface.tear_down_window(window);
        }
        self.container = None;
        self.layout.deactivate();
        self.set_state(PresentationState::Idle);
        self.notify(LifecycleEvent::DidDismiss);
        if let Some(completion) = self.dismiss_completion.take() {
            completion();
        }
    }

    fn relayout(&mut self) -> bool {
        let bounds = self.surface.container_bounds();
        let safe_area = self.surface.safe_area_insets();
        let surface = &self.surface;
        let frame = self.layout.apply(
            bounds,
            safe_area,
            &self.config.layout_guide,
            self.config.placement,
            |proposal| surface.measure(proposal),
        );
        match frame {
            Some(frame) => {
                self.visuals.frame = frame;
                true
            }
            None => {
                #[cfg(feature = "tracing")]
                tracing::trace!("layout skipped: container detached");
                false
            }
        }
    }

    fn transition_context(&self) -> TransitionContext {
        TransitionContext {
            container: self
                .surface
                .container_bounds()
                .unwrap_or(self.visuals.frame),
            safe_area: self.surface.safe_area_insets(),
            visuals: self.visuals,
        }
    }

    fn notify(&mut self, event: LifecycleEvent) {
        match event {
            LifecycleEvent::WillShow => self.surface.will_show(),
            LifecycleEvent::DidShow => self.surface.did_show(),
            LifecycleEvent::WillDismiss => self.surface.will_dismiss(),
            LifecycleEvent::DidDismiss => self.surface.did_dismiss(),
        }
        for listener in &mut self.listeners {
            dispatch(&mut **listener, event);
        }
    }

    fn set_state(&mut self, state: PresentationState) {
        #[cfg(feature = "tracing")]
        tracing::debug!(from = ?self.state, to = ?state, "presentation state");
        self.state = state;
    }
}

impl<S: DragHost, A: TransitionAnimator> PresentationController<S, A> {
    /// A pan gesture began at `location`.
    ///
    /// Returns `false` when the presentation is not active, not interactive,
    /// or the touch started on an action. A started pan claims any pending
    /// backdrop tap.
    pub fn pan_began(&mut self, location: Point) -> bool {
        self.restore_scroll();
        if self.state != PresentationState::Active || !self.config.is_interactive {
            return false;
        }
        if let Some(mut back) = self.spring_back.take() {
            back.finish(&mut self.visuals);
        }
        if !self.drag.begin(&self.surface, location, self.visuals.transform) {
            return false;
        }
        self.backdrop_tap.claim();
        true
    }

    /// The pan moved; `translation` is cumulative since [`pan_began`](Self::pan_began).
    ///
    /// Returns `true` when the surface moved.
    pub fn pan_changed(&mut self, translation: Vec2) -> bool {
        self.restore_scroll();
        if self.state != PresentationState::Active {
            return false;
        }
        let Some(update) = self.drag.update(&mut self.surface, translation) else {
            return false;
        };
        if !self.animator.update_progress(update.progress, &mut self.visuals) {
            self.visuals.transform = update.transform;
            self.visuals.dimming_alpha = update.dimming_alpha;
        }
        self.surface.apply_visuals(&self.visuals);
        true
    }

    /// The pan ended with the given cumulative translation and velocity.
    pub fn pan_ended(&mut self, translation: Vec2, velocity: Vec2) -> DragResolution {
        self.restore_scroll();
        let resolution = self.drag.end(&mut self.surface, translation, velocity);
        if self.state != PresentationState::Active {
            return DragResolution::Ignored;
        }
        match resolution {
            DragResolution::Ignored => {}
            DragResolution::Commit => {
                self.surface.trigger_haptic(HapticFeedback::Light);
                self.begin_dismiss(DismissTrigger::Drag, None);
            }
            DragResolution::SpringBack { transform } => {
                self.spring_back = Some(SpringBack::new(
                    self.visuals,
                    transform,
                    SpringTiming::spring_back(),
                ));
            }
        }
        resolution
    }

    /// The platform cancelled the pan. Resolves exactly like [`pan_ended`](Self::pan_ended).
    pub fn pan_cancelled(&mut self, translation: Vec2, velocity: Vec2) -> DragResolution {
        self.pan_ended(translation, velocity)
    }

    /// Give back scrolling to a scroll view whose drag was cut short by a dismissal.
    fn restore_scroll(&mut self) {
        if let Some((scroll, enabled)) = self.scroll_restore.take() {
            self.surface.set_scroll_enabled(scroll, enabled);
        }
    }
}

#[derive(Debug, Default)]
struct DismissShared {
    result: Option<bool>,
    waker: Option<Waker>,
}

impl DismissShared {
    fn resolve(&mut self, dismissed: bool) {
        self.result = Some(dismissed);
        if let Some(waker) = self.waker.take() {
            waker.wake();
        }
    }
}

/// Resolves when a [`dismiss_async`](PresentationController::dismiss_async) request finished.
#[derive(Debug)]
#[must_use = "futures do nothing unless polled"]
pub struct DismissFuture {
    shared: Rc<RefCell<DismissShared>>,
}

impl Future for DismissFuture {
    type Output = bool;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<bool> {
        let mut shared = self.shared.borrow_mut();
        match shared.result {
            Some(dismissed) => Poll::Ready(dismissed),
            None => {
                shared.waker = Some(cx.waker().clone());
                Poll::Pending
            }
        }
    }
}

impl<S: PresentationSurface, A> PresentationController<S, A> {
    /// The frame of the presented surface from the last layout pass.
    pub fn frame(&self) -> Option<Rect> {
        self.layout.frame()
    }
}
