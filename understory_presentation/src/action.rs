// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Actions (buttons) of an alert or action sheet, and their hit regions.
//!
//! The presentation engine only cares about actions in two places: a drag
//! must not start on top of an action button, and triggering an action may
//! dismiss the presentation. Rendering the buttons is up to the host.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use kurbo::{Point, Rect, RoundedRect, Shape};
use smallvec::SmallVec;

/// Identifier of an action within one presentation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ActionId(pub u32);

/// Semantic style of an action.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ActionStyle {
    /// A regular action.
    #[default]
    Default,
    /// Cancels the presentation. At most one per presentation.
    Cancel,
    /// A destructive action.
    Destructive,
}

/// A button of an alert or action sheet.
pub struct Action {
    /// Button title.
    pub title: String,
    /// Semantic style.
    pub style: ActionStyle,
    /// Called when the action is triggered.
    pub handler: Option<Box<dyn FnMut()>>,
    /// Dismiss the presentation after the handler ran.
    pub auto_dismiss: bool,
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("title", &self.title)
            .field("style", &self.style)
            .field("has_handler", &self.handler.is_some())
            .field("auto_dismiss", &self.auto_dismiss)
            .finish()
    }
}

impl Action {
    /// Create an auto-dismissing action without a handler.
    pub fn new(title: impl Into<String>, style: ActionStyle) -> Self {
        Self {
            title: title.into(),
            style,
            handler: None,
            auto_dismiss: true,
        }
    }

    /// Attach a handler.
    pub fn with_handler(mut self, handler: impl FnMut() + 'static) -> Self {
        self.handler = Some(Box::new(handler));
        self
    }

    /// Choose whether triggering the action dismisses the presentation.
    pub fn with_auto_dismiss(mut self, auto_dismiss: bool) -> Self {
        self.auto_dismiss = auto_dismiss;
        self
    }
}

/// The actions of one presentation, in insertion order.
#[derive(Debug, Default)]
pub struct ActionList {
    actions: Vec<Action>,
}

impl ActionList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an action and return its id.
    ///
    /// A second [`ActionStyle::Cancel`] action is a programming error: it
    /// trips a debug assertion and is rejected (`None`) in release builds.
    pub fn push(&mut self, action: Action) -> Option<ActionId> {
        let duplicate_cancel =
            action.style == ActionStyle::Cancel && self.actions.iter().any(|a| a.style == ActionStyle::Cancel);
        debug_assert!(!duplicate_cancel, "a presentation can only have one cancel action");
        if duplicate_cancel {
            return None;
        }
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Action ids are 32-bit; presentations hold a handful of actions."
        )]
        let id = ActionId(self.actions.len() as u32);
        self.actions.push(action);
        Some(id)
    }

    /// Look up an action.
    pub fn get(&self, id: ActionId) -> Option<&Action> {
        self.actions.get(id.0 as usize)
    }

    /// Look up an action mutably.
    pub fn get_mut(&mut self, id: ActionId) -> Option<&mut Action> {
        self.actions.get_mut(id.0 as usize)
    }

    /// Iterate over `(id, action)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (ActionId, &Action)> {
        self.actions.iter().enumerate().map(|(i, a)| {
            #[allow(
                clippy::cast_possible_truncation,
                reason = "Indices were assigned from u32 ids in `push`."
            )]
            let id = ActionId(i as u32);
            (id, a)
        })
    }

    /// Number of actions.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// `true` when there are no actions.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// The cancel action, if any.
    pub fn cancel_action(&self) -> Option<ActionId> {
        self.iter().find(|(_, a)| a.style == ActionStyle::Cancel).map(|(id, _)| id)
    }
}

/// On-screen hit regions of action buttons, in container coordinates.
///
/// Hosts update these after layout and answer [`DragHost::action_at`] from
/// them. Later regions win when regions overlap.
///
/// [`DragHost::action_at`]: crate::surface::DragHost::action_at
#[derive(Clone, Debug, Default)]
pub struct ActionRegions {
    regions: SmallVec<[(ActionId, RoundedRect); 4]>,
}

impl ActionRegions {
    /// Create an empty set of regions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set (or replace) the region of `id`.
    pub fn set(&mut self, id: ActionId, rect: Rect, corner_radius: f64) {
        let shape = RoundedRect::from_rect(rect, corner_radius);
        if let Some(slot) = self.regions.iter_mut().find(|(existing, _)| *existing == id) {
            slot.1 = shape;
        } else {
            self.regions.push((id, shape));
        }
    }

    /// Remove every region.
    pub fn clear(&mut self) {
        self.regions.clear();
    }

    /// The action whose region contains `point`.
    pub fn hit(&self, point: Point) -> Option<ActionId> {
        self.regions
            .iter()
            .rev()
            .find(|(_, shape)| shape.bounding_box().contains(point) && shape.contains(point))
            .map(|(id, _)| *id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use core::cell::Cell;

    #[test]
    fn ids_follow_insertion_order() {
        let mut list = ActionList::new();
        let ok = list.push(Action::new("OK", ActionStyle::Default)).unwrap();
        let delete = list.push(Action::new("Delete", ActionStyle::Destructive)).unwrap();
        assert_eq!(ok, ActionId(0));
        assert_eq!(delete, ActionId(1));
        assert_eq!(list.get(delete).unwrap().title, "Delete");
        assert_eq!(list.len(), 2);
        assert!(list.cancel_action().is_none());
    }

    #[test]
    #[cfg_attr(
        debug_assertions,
        should_panic(expected = "a presentation can only have one cancel action")
    )]
    fn second_cancel_action_is_rejected() {
        let mut list = ActionList::new();
        assert!(list.push(Action::new("Cancel", ActionStyle::Cancel)).is_some());
        assert!(list.push(Action::new("Never mind", ActionStyle::Cancel)).is_none());
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn handlers_are_stored() {
        let hits = Rc::new(Cell::new(0));
        let counter = hits.clone();
        let mut list = ActionList::new();
        let id = list
            .push(Action::new("OK", ActionStyle::Default).with_handler(move || counter.set(counter.get() + 1)))
            .unwrap();
        if let Some(handler) = list.get_mut(id).and_then(|a| a.handler.as_mut()) {
            handler();
        }
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn regions_hit_rounded_shapes() {
        let mut regions = ActionRegions::new();
        regions.set(ActionId(0), Rect::new(60.0, 446.0, 195.0, 490.0), 0.0);
        regions.set(ActionId(1), Rect::new(195.0, 446.0, 330.0, 490.0), 12.0);
        assert_eq!(regions.hit(Point::new(100.0, 460.0)), Some(ActionId(0)));
        assert_eq!(regions.hit(Point::new(250.0, 460.0)), Some(ActionId(1)));
        // Inside the bounding box, outside the rounded corner.
        assert_eq!(regions.hit(Point::new(329.5, 489.5)), None);
        assert_eq!(regions.hit(Point::new(10.0, 10.0)), None);

        regions.set(ActionId(0), Rect::new(0.0, 0.0, 20.0, 20.0), 0.0);
        assert_eq!(regions.hit(Point::new(10.0, 10.0)), Some(ActionId(0)));
        regions.clear();
        assert_eq!(regions.hit(Point::new(10.0, 10.0)), None);
    }
}
