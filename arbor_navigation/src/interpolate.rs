// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Smooth pan-and-zoom paths between views.

use kurbo::Point;
use serde::Serialize;

/// Curvature of the zoom path; larger values zoom out further mid-flight.
const RHO: f64 = core::f64::consts::SQRT_2;

/// A viewport: the layout-space point at the center of the screen and the
/// layout-space diameter that fills it.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct View {
    /// Center in layout coordinates.
    pub center: Point,
    /// Visible diameter in layout units.
    pub diameter: f64,
}

impl View {
    /// Construct a view.
    pub fn new(center: Point, diameter: f64) -> Self {
        Self { center, diameter }
    }
}

/// Optimal path between two views after van Wijk and Nuij, "Smooth and
/// efficient zooming and panning".
///
/// The path zooms out while panning so that the perceived velocity stays
/// constant; [`ZoomPath::at`] maps `t` in `[0, 1]` to a view along it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ZoomPath {
    from: View,
    to: View,
    shape: Shape,
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum Shape {
    /// Centers coincide; only the diameter changes, exponentially.
    Scale { s: f64 },
    /// General case, parameterized by the hyperbolic path constants.
    Arc { d1: f64, r0: f64, s: f64 },
}

impl ZoomPath {
    /// Path from `from` to `to`.
    pub fn new(from: View, to: View) -> Self {
        let (w0, w1) = (from.diameter, to.diameter);
        let d = to.center - from.center;
        let d2 = d.hypot2();
        let shape = if d2 < 1e-12 {
            Shape::Scale {
                s: (w1 / w0).ln() / RHO,
            }
        } else {
            let rho2 = RHO * RHO;
            let rho4 = rho2 * rho2;
            let d1 = d2.sqrt();
            let b0 = (w1 * w1 - w0 * w0 + rho4 * d2) / (2.0 * w0 * rho2 * d1);
            let b1 = (w1 * w1 - w0 * w0 - rho4 * d2) / (2.0 * w1 * rho2 * d1);
            let r0 = ((b0 * b0 + 1.0).sqrt() - b0).ln();
            let r1 = ((b1 * b1 + 1.0).sqrt() - b1).ln();
            Shape::Arc {
                d1,
                r0,
                s: (r1 - r0) / RHO,
            }
        };
        Self { from, to, shape }
    }

    /// Start of the path.
    pub fn from(&self) -> View {
        self.from
    }

    /// End of the path.
    pub fn to(&self) -> View {
        self.to
    }

    /// Arc length of the path in the metric of the zoom space.
    ///
    /// Useful for choosing a duration proportional to the distance travelled.
    pub fn length(&self) -> f64 {
        match self.shape {
            Shape::Scale { s } | Shape::Arc { s, .. } => s.abs(),
        }
    }

    /// View at parameter `t`, where `0` is the start and `1` the end.
    pub fn at(&self, t: f64) -> View {
        let d = self.to.center - self.from.center;
        let w0 = self.from.diameter;
        match self.shape {
            Shape::Scale { s } => View::new(
                self.from.center + d * t,
                w0 * (RHO * t * s).exp(),
            ),
            Shape::Arc { d1, r0, s } => {
                let s = t * s;
                let u = w0 / (RHO * RHO * d1) * (r0.cosh() * (RHO * s + r0).tanh() - r0.sinh());
                View::new(
                    self.from.center + d * u,
                    w0 * r0.cosh() / (RHO * s + r0).cosh(),
                )
            }
        }
    }
}

/// Cubic ease-in-out on `[0, 1]`.
pub(crate) fn ease_cubic_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0) * 2.0;
    if t <= 1.0 {
        t * t * t / 2.0
    } else {
        let t = t - 2.0;
        (t * t * t + 2.0) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: View, b: View) -> bool {
        (a.center - b.center).hypot() < 1e-9 && (a.diameter - b.diameter).abs() < 1e-9
    }

    #[test]
    fn endpoints_match() {
        let from = View::new(Point::new(0.0, 0.0), 100.0);
        let to = View::new(Point::new(300.0, -40.0), 20.0);
        let path = ZoomPath::new(from, to);
        assert!(close(path.at(0.0), from));
        assert!(close(path.at(1.0), to));
    }

    #[test]
    fn long_pans_zoom_out_midway() {
        let from = View::new(Point::new(0.0, 0.0), 10.0);
        let to = View::new(Point::new(1000.0, 0.0), 10.0);
        let mid = ZoomPath::new(from, to).at(0.5);
        assert!(mid.diameter > 10.0);
        assert!((mid.center.x - 500.0).abs() < 1e-6);
    }

    #[test]
    fn pure_zoom_keeps_the_center() {
        let from = View::new(Point::new(5.0, 5.0), 100.0);
        let to = View::new(Point::new(5.0, 5.0), 25.0);
        let path = ZoomPath::new(from, to);
        let mid = path.at(0.5);
        assert_eq!(mid.center, Point::new(5.0, 5.0));
        assert!((mid.diameter - 50.0).abs() < 1e-9);
        assert!(close(path.at(1.0), to));
    }

    #[test]
    fn identical_views_have_zero_length() {
        let v = View::new(Point::new(1.0, 2.0), 3.0);
        let path = ZoomPath::new(v, v);
        assert_eq!(path.length(), 0.0);
        assert_eq!(path.at(0.7), v);
    }

    #[test]
    fn easing_is_symmetric() {
        assert_eq!(ease_cubic_in_out(0.0), 0.0);
        assert_eq!(ease_cubic_in_out(0.5), 0.5);
        assert_eq!(ease_cubic_in_out(1.0), 1.0);
        assert!((ease_cubic_in_out(0.25) + ease_cubic_in_out(0.75) - 1.0).abs() < 1e-12);
    }
}
