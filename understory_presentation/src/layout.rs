// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Constraint generation and resolution for presented surfaces.
//!
//! [`LayoutEngine::compute_constraints`] turns a [`LayoutGuide`] and the
//! container geometry into a small [`ConstraintSet`]. The set is plain data:
//! two computations over equal inputs compare equal, which is what makes a
//! relayout idempotent. [`ConstraintSet::resolve`] then produces a frame,
//! consulting a measurement callback for the content's intrinsic size.
//!
//! ## Resolution rules
//!
//! Per axis:
//! - A [`Priority::REQUIRED`] equality wins outright.
//! - Otherwise the highest-priority equality (or, without one, the measured
//!   intrinsic size) is clamped into the bounds of the required inequalities.
//!   This is how a `max` cap beats a fractional width.
//! - Sizes never go negative.

use kurbo::{Insets, Point, Rect, Size};
use smallvec::SmallVec;

use crate::guide::{HeightPolicy, LayoutGuide, Placement, WidthPolicy};

/// The attribute of the presented frame a [`Constraint`] talks about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Attribute {
    /// Frame width.
    Width,
    /// Frame height.
    Height,
    /// Horizontal center.
    CenterX,
    /// Vertical center.
    CenterY,
    /// Top edge.
    Top,
    /// Bottom edge.
    Bottom,
}

/// How a constraint relates its attribute to its constant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Relation {
    /// `attribute == constant`
    Equal,
    /// `attribute <= constant`
    LessOrEqual,
    /// `attribute >= constant`
    GreaterOrEqual,
}

/// Constraint priority. Higher wins.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Priority(pub u16);

impl Priority {
    /// Must hold.
    pub const REQUIRED: Self = Self(1000);
    /// Used for fractional sizes so that a required cap wins ties.
    pub const FRACTIONAL: Self = Self(999);
}

/// A single linear constraint on the presented frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Constraint {
    /// Constrained attribute.
    pub attribute: Attribute,
    /// Relation to `constant`.
    pub relation: Relation,
    /// Value in container coordinates.
    pub constant: f64,
    /// Priority.
    pub priority: Priority,
}

impl Constraint {
    /// A required constraint.
    pub const fn required(attribute: Attribute, relation: Relation, constant: f64) -> Self {
        Self {
            attribute,
            relation,
            constant,
            priority: Priority::REQUIRED,
        }
    }

    /// Same constraint at a different priority.
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }
}

/// The constraints produced by one layout computation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConstraintSet {
    constraints: SmallVec<[Constraint; 8]>,
}

impl ConstraintSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a constraint.
    pub fn push(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    /// All constraints, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Constraint> {
        self.constraints.iter()
    }

    /// Number of constraints.
    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    /// `true` when the set holds no constraints.
    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Resolve the set into a frame.
    ///
    /// `measure` is asked for the content's intrinsic size twice: once with
    /// the upper size bounds to settle the width, and once with the settled
    /// width to settle the height.
    pub fn resolve(&self, mut measure: impl FnMut(Size) -> Size) -> Rect {
        let width_cap = self.upper_bound(Attribute::Width);
        let height_cap = self.upper_bound(Attribute::Height);
        let first = measure(Size::new(width_cap, height_cap));
        let width = self.resolve_axis(Attribute::Width, first.width);
        let second = measure(Size::new(width, height_cap));
        let height = self.resolve_axis(Attribute::Height, second.height);

        let x0 = self
            .equality(Attribute::CenterX)
            .map_or(0.0, |cx| cx - width / 2.0);
        let y0 = if let Some(cy) = self.equality(Attribute::CenterY) {
            cy - height / 2.0
        } else if let Some(bottom) = self.equality(Attribute::Bottom) {
            bottom - height
        } else {
            self.equality(Attribute::Top).unwrap_or(0.0)
        };
        Rect::from_origin_size(Point::new(x0, y0), Size::new(width, height))
    }

    fn equality(&self, attribute: Attribute) -> Option<f64> {
        self.constraints
            .iter()
            .filter(|c| c.attribute == attribute && c.relation == Relation::Equal)
            .max_by_key(|c| c.priority)
            .map(|c| c.constant)
    }

    fn upper_bound(&self, attribute: Attribute) -> f64 {
        self.constraints
            .iter()
            .filter(|c| c.attribute == attribute && c.priority == Priority::REQUIRED)
            .fold(f64::INFINITY, |hi, c| match c.relation {
                Relation::Equal | Relation::LessOrEqual => hi.min(c.constant),
                Relation::GreaterOrEqual => hi,
            })
    }

    fn resolve_axis(&self, attribute: Attribute, intrinsic: f64) -> f64 {
        let mut lo = 0.0_f64;
        let mut hi = f64::INFINITY;
        let mut preferred: Option<&Constraint> = None;
        for c in self.constraints.iter().filter(|c| c.attribute == attribute) {
            match c.relation {
                Relation::Equal => {
                    if preferred.is_none_or(|p| c.priority > p.priority) {
                        preferred = Some(c);
                    }
                }
                Relation::LessOrEqual if c.priority == Priority::REQUIRED => {
                    hi = hi.min(c.constant);
                }
                Relation::GreaterOrEqual if c.priority == Priority::REQUIRED => {
                    lo = lo.max(c.constant);
                }
                _ => {}
            }
        }
        let value = match preferred {
            Some(c) if c.priority == Priority::REQUIRED => return c.constant.max(0.0),
            Some(c) => c.constant,
            None => intrinsic,
        };
        let value = if lo > hi { lo } else { value.clamp(lo, hi) };
        value.max(0.0)
    }
}

/// Owns the active constraint set of one presentation.
///
/// Applying a new set deactivates the previous one; the generation counter
/// records how many passes actually ran.
#[derive(Clone, Debug, Default)]
pub struct LayoutEngine {
    active: Option<ConstraintSet>,
    frame: Option<Rect>,
    generation: u64,
}

impl LayoutEngine {
    /// Create an engine with no active constraints.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute the constraints for `guide` inside `container`.
    ///
    /// This is a pure function of its inputs.
    pub fn compute_constraints(
        container: Rect,
        safe_area: Insets,
        guide: &LayoutGuide,
        placement: Placement,
    ) -> ConstraintSet {
        use Attribute::*;
        use Relation::*;

        let usable = guide
            .ignores_safe_area_edges
            .inset_unless_ignored(container, safe_area);
        let insets = guide.content_insets;
        let avail_w = usable.width() - guide.horizontal_insets();
        let avail_h = usable.height() - guide.vertical_insets();

        let mut set = ConstraintSet::new();
        match guide.width {
            WidthPolicy::Fixed(v) => {
                set.push(Constraint::required(Width, Equal, v - guide.horizontal_insets()));
            }
            WidthPolicy::Flexible => set.push(Constraint::required(Width, LessOrEqual, avail_w)),
            WidthPolicy::Fractional { fraction, max } => {
                set.push(
                    Constraint::required(Width, Equal, usable.width() * fraction - guide.horizontal_insets())
                        .with_priority(Priority::FRACTIONAL),
                );
                if let Some(max) = max {
                    set.push(Constraint::required(Width, LessOrEqual, max));
                }
            }
        }
        match guide.height {
            HeightPolicy::Fixed(v) => {
                set.push(Constraint::required(Height, Equal, v - guide.vertical_insets()));
            }
            HeightPolicy::Flexible => set.push(Constraint::required(Height, LessOrEqual, avail_h)),
            HeightPolicy::AtLeast(v) => {
                set.push(Constraint::required(Height, GreaterOrEqual, v));
                set.push(Constraint::required(Height, LessOrEqual, avail_h));
            }
            HeightPolicy::Fractional { fraction, max } => {
                set.push(
                    Constraint::required(Height, Equal, usable.height() * fraction - guide.vertical_insets())
                        .with_priority(Priority::FRACTIONAL),
                );
                if let Some(max) = max {
                    set.push(Constraint::required(Height, LessOrEqual, max));
                }
            }
        }

        let center = usable.center();
        set.push(Constraint::required(
            CenterX,
            Equal,
            center.x + (insets.x0 - insets.x1) / 2.0,
        ));
        match placement {
            Placement::Center => set.push(Constraint::required(
                CenterY,
                Equal,
                center.y + (insets.y0 - insets.y1) / 2.0,
            )),
            Placement::Bottom => set.push(Constraint::required(Bottom, Equal, usable.y1 - insets.y1)),
            Placement::Top => set.push(Constraint::required(Top, Equal, usable.y0 + insets.y0)),
        }
        set
    }

    /// Run a layout pass.
    ///
    /// Returns `None` without touching the active set when `container` is
    /// `None` (the presentation is detached from any view tree).
    pub fn apply(
        &mut self,
        container: Option<Rect>,
        safe_area: Insets,
        guide: &LayoutGuide,
        placement: Placement,
        measure: impl FnMut(Size) -> Size,
    ) -> Option<Rect> {
        let container = container?;
        let set = Self::compute_constraints(container, safe_area, guide, placement);
        let frame = set.resolve(measure);
        self.active = Some(set);
        self.frame = Some(frame);
        self.generation += 1;
        Some(frame)
    }

    /// Drop the active constraint set.
    pub fn deactivate(&mut self) {
        self.active = None;
        self.frame = None;
    }

    /// The active constraint set, if any.
    pub fn active(&self) -> Option<&ConstraintSet> {
        self.active.as_ref()
    }

    /// The frame produced by the last pass, while its constraints are active.
    pub fn frame(&self) -> Option<Rect> {
        self.frame
    }

    /// Number of layout passes that ran.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guide::Edges;

    const SCREEN: Rect = Rect::new(0.0, 0.0, 390.0, 844.0);
    const SAFE: Insets = Insets::new(0.0, 47.0, 0.0, 34.0);

    fn content(size: Size) -> impl FnMut(Size) -> Size {
        move |proposal: Size| Size::new(size.width.min(proposal.width), size.height)
    }

    #[test]
    fn fixed_width_alert_is_centered() {
        let guide = LayoutGuide::new(WidthPolicy::Fixed(270.0), HeightPolicy::Flexible);
        let set = LayoutEngine::compute_constraints(SCREEN, SAFE, &guide, Placement::Center);
        let frame = set.resolve(content(Size::new(100.0, 140.0)));
        assert_eq!(frame.width(), 270.0);
        assert_eq!(frame.height(), 140.0);
        assert_eq!(frame.center().x, 195.0);
        // Centered in the safe region: (47 + 810) / 2.
        assert_eq!(frame.center().y, 428.5);
    }

    #[test]
    fn flexible_width_hugs_content_up_to_the_container() {
        let guide = LayoutGuide::new(WidthPolicy::Flexible, HeightPolicy::Flexible)
            .with_insets(Insets::uniform(16.0));
        let set = LayoutEngine::compute_constraints(SCREEN, SAFE, &guide, Placement::Center);
        assert_eq!(set.resolve(content(Size::new(120.0, 40.0))).width(), 120.0);
        assert_eq!(set.resolve(content(Size::new(1000.0, 40.0))).width(), 358.0);
    }

    #[test]
    fn fractional_width_yields_to_its_cap() {
        let guide = LayoutGuide::new(
            WidthPolicy::Fractional {
                fraction: 0.9,
                max: Some(300.0),
            },
            HeightPolicy::Flexible,
        );
        let set = LayoutEngine::compute_constraints(SCREEN, SAFE, &guide, Placement::Center);
        assert_eq!(set.resolve(content(Size::new(10.0, 10.0))).width(), 300.0);

        let uncapped = LayoutGuide::new(
            WidthPolicy::Fractional {
                fraction: 0.5,
                max: Some(300.0),
            },
            HeightPolicy::Flexible,
        );
        let set = LayoutEngine::compute_constraints(SCREEN, SAFE, &uncapped, Placement::Center);
        assert_eq!(set.resolve(content(Size::new(10.0, 10.0))).width(), 195.0);
    }

    #[test]
    fn at_least_height_grows_with_content() {
        let guide = LayoutGuide::new(WidthPolicy::Fixed(270.0), HeightPolicy::AtLeast(120.0));
        let set = LayoutEngine::compute_constraints(SCREEN, SAFE, &guide, Placement::Center);
        assert_eq!(set.resolve(content(Size::new(100.0, 60.0))).height(), 120.0);
        assert_eq!(set.resolve(content(Size::new(100.0, 200.0))).height(), 200.0);
        // Never taller than the safe region.
        assert_eq!(set.resolve(content(Size::new(100.0, 5000.0))).height(), 763.0);
    }

    #[test]
    fn sheet_pins_to_bottom_respecting_safe_area() {
        let guide = LayoutGuide::new(WidthPolicy::Flexible, HeightPolicy::Flexible)
            .with_insets(Insets::new(0.0, 0.0, 0.0, 8.0));
        let set = LayoutEngine::compute_constraints(SCREEN, SAFE, &guide, Placement::Bottom);
        let frame = set.resolve(content(Size::new(390.0, 300.0)));
        assert_eq!(frame.y1, 844.0 - 34.0 - 8.0);
        assert_eq!(frame.height(), 300.0);

        let edge_to_edge = guide.ignoring_safe_area(Edges::BOTTOM);
        let set = LayoutEngine::compute_constraints(SCREEN, SAFE, &edge_to_edge, Placement::Bottom);
        assert_eq!(set.resolve(content(Size::new(390.0, 300.0))).y1, 836.0);
    }

    #[test]
    fn asymmetric_insets_shift_the_center() {
        let guide = LayoutGuide::new(WidthPolicy::Fixed(200.0), HeightPolicy::Fixed(100.0))
            .with_insets(Insets::new(40.0, 0.0, 0.0, 0.0));
        let set = LayoutEngine::compute_constraints(SCREEN, Insets::ZERO, &guide, Placement::Center);
        let frame = set.resolve(content(Size::ZERO));
        assert_eq!(frame.width(), 160.0);
        assert_eq!(frame.center().x, 215.0);
    }

    #[test]
    fn top_placement_for_toasts() {
        let guide = LayoutGuide::new(WidthPolicy::Flexible, HeightPolicy::Flexible)
            .with_insets(Insets::new(16.0, 12.0, 16.0, 0.0));
        let set = LayoutEngine::compute_constraints(SCREEN, SAFE, &guide, Placement::Top);
        let frame = set.resolve(content(Size::new(200.0, 44.0)));
        assert_eq!(frame.y0, 59.0);
    }

    #[test]
    fn detached_container_is_a_no_op() {
        let mut engine = LayoutEngine::new();
        let guide = LayoutGuide::default();
        assert!(
            engine
                .apply(None, SAFE, &guide, Placement::Center, content(Size::ZERO))
                .is_none()
        );
        assert!(engine.active().is_none());
        assert_eq!(engine.generation(), 0);
    }

    #[test]
    fn relayout_replaces_the_active_set() {
        let mut engine = LayoutEngine::new();
        let guide = LayoutGuide::new(WidthPolicy::Fixed(270.0), HeightPolicy::Flexible);
        let a = engine.apply(Some(SCREEN), SAFE, &guide, Placement::Center, content(Size::new(1.0, 80.0)));
        let first = engine.active().cloned();
        let b = engine.apply(Some(SCREEN), SAFE, &guide, Placement::Center, content(Size::new(1.0, 80.0)));
        assert_eq!(a, b);
        assert_eq!(engine.active(), first.as_ref());
        assert_eq!(engine.generation(), 2);

        let landscape = Rect::new(0.0, 0.0, 844.0, 390.0);
        let c = engine
            .apply(Some(landscape), Insets::ZERO, &guide, Placement::Center, content(Size::new(1.0, 80.0)))
            .unwrap();
        assert_eq!(c.center(), landscape.center());
        engine.deactivate();
        assert!(engine.active().is_none());
        assert!(engine.frame().is_none());
    }
}
