// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The visual state a host renders for one presentation.

use kurbo::{Affine, Rect, Vec2};

/// Frame, transform, and opacities of a presented surface and its dimming view.
///
/// Layout writes [`Visuals::frame`]; transitions and drags write the
/// transform and opacities on top of it. The transform is applied about the
/// center of the frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Visuals {
    /// Layout frame in container coordinates.
    pub frame: Rect,
    /// Transform about the frame center.
    pub transform: Affine,
    /// Opacity of the presented surface.
    pub alpha: f64,
    /// Opacity of the dimming view.
    pub dimming_alpha: f64,
}

impl Default for Visuals {
    fn default() -> Self {
        Self {
            frame: Rect::ZERO,
            transform: Affine::IDENTITY,
            alpha: 1.0,
            dimming_alpha: 1.0,
        }
    }
}

impl Visuals {
    /// The transform mapping frame-local points into container space.
    pub fn world_transform(&self) -> Affine {
        let c = self.frame.center().to_vec2();
        Affine::translate(c) * self.transform * Affine::translate(-c)
    }

    /// Axis-aligned bounds of the frame after the transform.
    pub fn visual_rect(&self) -> Rect {
        transform_rect_bbox(self.world_transform(), self.frame)
    }

    /// Vertical translation component of the transform.
    pub fn translation_y(&self) -> f64 {
        self.transform.as_coeffs()[5]
    }

    /// Uniform scale component of the transform (assumes no rotation or shear).
    pub fn scale(&self) -> f64 {
        self.transform.as_coeffs()[0]
    }

    /// Interpolate transform and opacities towards `to`; `frame` is kept.
    ///
    /// `t` may leave `[0, 1]` for spring overshoot; opacities are clamped.
    pub fn lerp(&self, to: &Self, t: f64) -> Self {
        let a = self.transform.as_coeffs();
        let b = to.transform.as_coeffs();
        let mut coeffs = [0.0; 6];
        for (i, c) in coeffs.iter_mut().enumerate() {
            *c = a[i] + (b[i] - a[i]) * t;
        }
        Self {
            frame: self.frame,
            transform: Affine::new(coeffs),
            alpha: lerp_unit(self.alpha, to.alpha, t),
            dimming_alpha: lerp_unit(self.dimming_alpha, to.dimming_alpha, t),
        }
    }

    /// Same visuals with `transform`, `alpha`, and `dimming_alpha` taken from `other`.
    pub(crate) fn with_appearance_of(mut self, other: &Self) -> Self {
        self.transform = other.transform;
        self.alpha = other.alpha;
        self.dimming_alpha = other.dimming_alpha;
        self
    }
}

/// A translate-then-scale transform used by drags and sheet transitions.
pub(crate) fn offset_and_scale(offset_y: f64, scale: f64) -> Affine {
    Affine::translate(Vec2::new(0.0, offset_y)) * Affine::scale(scale)
}

fn lerp_unit(a: f64, b: f64, t: f64) -> f64 {
    (a + (b - a) * t).clamp(0.0, 1.0)
}

fn transform_rect_bbox(affine: Affine, rect: Rect) -> Rect {
    let [a, b, c, d, e, f] = affine.as_coeffs();
    let min_x = (a * rect.x0).min(a * rect.x1) + (c * rect.y0).min(c * rect.y1);
    let max_x = (a * rect.x0).max(a * rect.x1) + (c * rect.y0).max(c * rect.y1);
    let min_y = (b * rect.x0).min(b * rect.x1) + (d * rect.y0).min(d * rect.y1);
    let max_y = (b * rect.x0).max(b * rect.x1) + (d * rect.y0).max(d * rect.y1);
    Rect::new(min_x + e, min_y + f, max_x + e, max_y + f)
}
