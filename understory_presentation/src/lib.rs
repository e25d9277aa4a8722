// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Presentation: lifecycle, layout, and interaction core for alerts, sheets, and toasts.
//!
//! This crate sequences a presented surface through its life without knowing
//! anything about how the surface is drawn. A host framework implements a
//! narrow [`PresentationSurface`] contract (attach and detach views, report
//! container bounds and safe-area insets, measure content, render
//! [`Visuals`]) and drives a [`PresentationController`] with requests, frame
//! ticks, and touches.
//!
//! The pieces:
//!
//! - [`PresentationController`]: the `Idle → Presenting → Active → Dismissing`
//!   state machine. Out-of-state requests are rejected, never queued.
//! - [`LayoutEngine`]: turns a [`LayoutGuide`] (width and height policies,
//!   content insets, ignored safe-area [`Edges`]) into a [`ConstraintSet`]
//!   and resolves it into a frame.
//! - [`TransitionAnimator`]: show and dismiss transitions with exactly one
//!   completion per request. [`AlertTransition`], [`SheetTransition`], and
//!   [`ToastTransition`] are provided, all spring-driven.
//! - [`GestureCoordinator`]: drag-to-dismiss that cooperates with action
//!   buttons and hands off nested scroll views at their top edge.
//! - [`BackdropPolicy`]: dimming, background-tap dismissal, and touch
//!   pass-through.
//! - [`PresentationRegistry`]: side tables from containers and views back
//!   to presentations, for hosts that need those lookups.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Insets, Rect, Size};
//! use understory_presentation::{
//!     Orientation, PresentationController, PresentationState, PresentationSurface, Visuals,
//! };
//!
//! /// A host with a single 390×844 screen and a 270×140 alert body.
//! #[derive(Default)]
//! struct Screen {
//!     rendered: Option<Visuals>,
//! }
//!
//! impl PresentationSurface for Screen {
//!     type View = u32;
//!
//!     fn presented_view(&self) -> u32 { 1 }
//!     fn dimming_view(&self) -> u32 { 2 }
//!     fn make_covering_window(&mut self) -> u32 { 3 }
//!     fn tear_down_window(&mut self, _window: u32) {}
//!     fn attach(&mut self, _container: u32) {}
//!     fn detach(&mut self) {}
//!     fn container_bounds(&self) -> Option<Rect> { Some(Rect::new(0.0, 0.0, 390.0, 844.0)) }
//!     fn orientation(&self) -> Orientation { Orientation::Portrait }
//!     fn safe_area_insets(&self) -> Insets { Insets::new(0.0, 47.0, 0.0, 34.0) }
//!     fn measure(&self, _proposal: Size) -> Size { Size::new(270.0, 140.0) }
//!     fn apply_visuals(&mut self, visuals: &Visuals) { self.rendered = Some(*visuals); }
//! }
//!
//! let mut alert = PresentationController::alert(Screen::default());
//! assert!(alert.show(None));
//! assert!(!alert.show(None)); // Already presenting.
//!
//! // Drive frames until the transition settles.
//! while alert.tick(1.0 / 60.0) {}
//! assert_eq!(alert.state(), PresentationState::Active);
//! assert_eq!(alert.frame().unwrap().width(), 270.0);
//!
//! assert!(alert.dismiss());
//! while alert.tick(1.0 / 60.0) {}
//! assert_eq!(alert.state(), PresentationState::Idle);
//! ```
//!
//! ## Features
//!
//! - `std` *(default)*: use `std` float math through `kurbo`.
//! - `libm`: use `libm` float math instead, for `no_std` targets.
//! - `tracing`: emit `tracing` events for state changes, rejected requests,
//!   skipped layout passes, scroll capture, and drag resolution.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod action;
pub mod animator;
pub mod backdrop;
pub mod config;
pub mod controller;
pub mod gesture;
pub mod guide;
pub mod layout;
pub mod registry;
pub mod spring;
pub mod surface;
pub mod visuals;

#[cfg(test)]
mod test_support;

pub use action::{Action, ActionId, ActionList, ActionRegions, ActionStyle};
pub use animator::{
    AlertTransition, SheetTransition, ToastTransition, Transition, TransitionAnimator,
    TransitionContext, TransitionKind, TransitionRunner,
};
pub use backdrop::{BackdropHit, BackdropPolicy, BackdropTap, BlurStyle, Color, Dimming, InteractionScope};
pub use config::PresentationConfig;
pub use controller::{
    DismissFuture, LifecycleCallbacks, LifecycleEvent, LifecycleListener, PresentationController,
    PresentationState,
};
pub use gesture::{DragConfig, DragPhase, DragResolution, DragSession, DragUpdate, GestureCoordinator, SpringBack};
pub use guide::{Edges, HeightPolicy, LayoutGuide, Placement, WidthPolicy};
pub use layout::{Attribute, Constraint, ConstraintSet, LayoutEngine, Priority, Relation};
pub use registry::PresentationRegistry;
pub use spring::{Spring, SpringTiming};
pub use surface::{DragHost, HapticFeedback, Orientation, PresentationSurface, ScrollMetrics};
pub use visuals::Visuals;
