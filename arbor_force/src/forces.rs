// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The three forces, applied to bodies as velocity (or position) updates.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Vec2};

/// Per-node simulation state.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct Body {
    pub(crate) position: Point,
    pub(crate) velocity: Vec2,
    pub(crate) pin: Option<Point>,
}

impl Body {
    pub(crate) fn at(position: Point) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            pin: None,
        }
    }
}

/// Linear congruential generator; keeps runs reproducible.
#[derive(Clone, Debug)]
pub(crate) struct Lcg(u32);

impl Lcg {
    pub(crate) fn new() -> Self {
        Self(1)
    }

    /// Uniform in `[0, 1)`.
    fn next_unit(&mut self) -> f64 {
        self.0 = self.0.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        f64::from(self.0) / 4_294_967_296.0
    }

    /// Tiny nonzero offset used to separate coincident nodes.
    pub(crate) fn jiggle(&mut self) -> f64 {
        (self.next_unit() - 0.5) * 1e-6
    }
}

/// Spring along each link toward `distance`.
///
/// The correction is split between the endpoints by degree, so a hub moves
/// less than a leaf hanging off it. Positions are extrapolated by one step of
/// velocity before measuring, which damps oscillation.
pub(crate) fn apply_links(
    bodies: &mut [Body],
    edges: &[(usize, usize)],
    degree: &[usize],
    distance: f64,
    alpha: f64,
    random: &mut Lcg,
) {
    for &(s, t) in edges {
        let (ds, dt) = (degree[s], degree[t]);
        #[allow(
            clippy::cast_precision_loss,
            reason = "degrees are far below 2^52."
        )]
        let (strength, bias) = (
            1.0 / ds.min(dt) as f64,
            ds as f64 / (ds + dt) as f64,
        );
        let source = bodies[s];
        let target = bodies[t];
        let mut d = (target.position + target.velocity) - (source.position + source.velocity);
        if d.x == 0.0 {
            d.x = random.jiggle();
        }
        if d.y == 0.0 {
            d.y = random.jiggle();
        }
        let l = d.hypot();
        let d = d * ((l - distance) / l * alpha * strength);
        bodies[t].velocity -= d * bias;
        bodies[s].velocity += d * (1.0 - bias);
    }
}

/// Pairwise repulsion (or attraction, for positive `strength`) between all nodes.
pub(crate) fn apply_many_body(
    bodies: &mut [Body],
    strength: f64,
    distance_min: f64,
    alpha: f64,
    random: &mut Lcg,
) {
    let min2 = distance_min * distance_min;
    for i in 0..bodies.len() {
        let mut dv = Vec2::ZERO;
        for j in 0..bodies.len() {
            if i == j {
                continue;
            }
            let mut d = bodies[j].position - bodies[i].position;
            let mut l = d.hypot2();
            if d.x == 0.0 {
                d.x = random.jiggle();
                l += d.x * d.x;
            }
            if d.y == 0.0 {
                d.y = random.jiggle();
                l += d.y * d.y;
            }
            if l < min2 {
                l = (min2 * l).sqrt();
            }
            dv += d * (strength * alpha / l);
        }
        bodies[i].velocity += dv;
    }
}

/// Translate every body so the centroid sits on `center`.
pub(crate) fn apply_center(bodies: &mut [Body], center: Point) {
    if bodies.is_empty() {
        return;
    }
    let sum = bodies
        .iter()
        .fold(Vec2::ZERO, |acc, b| acc + b.position.to_vec2());
    #[allow(
        clippy::cast_precision_loss,
        reason = "node counts are far below 2^52."
    )]
    let mean = sum / bodies.len() as f64;
    let shift = mean - center.to_vec2();
    for body in bodies {
        body.position -= shift;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repulsion_pushes_apart_symmetrically() {
        let mut bodies = [
            Body::at(Point::new(-5.0, 0.0)),
            Body::at(Point::new(5.0, 0.0)),
        ];
        apply_many_body(&mut bodies, -30.0, 1.0, 1.0, &mut Lcg::new());
        assert!(bodies[0].velocity.x < 0.0);
        assert!(bodies[1].velocity.x > 0.0);
        // strength * alpha / distance^2 * offset = -30 / 100 * 10
        assert!((bodies[0].velocity.x + 3.0).abs() < 1e-12);
        assert!((bodies[1].velocity.x - 3.0).abs() < 1e-12);
        assert!(bodies[1].velocity.y.abs() < 1e-6);
    }

    #[test]
    fn stretched_link_pulls_together() {
        let mut bodies = [
            Body::at(Point::new(0.0, 0.0)),
            Body::at(Point::new(60.0, 0.0)),
        ];
        apply_links(&mut bodies, &[(0, 1)], &[1, 1], 30.0, 1.0, &mut Lcg::new());
        // Half of the 30 unit excess goes to each end.
        assert!((bodies[0].velocity.x - 15.0).abs() < 1e-12);
        assert!((bodies[1].velocity.x + 15.0).abs() < 1e-12);
    }

    #[test]
    fn coincident_nodes_are_separated() {
        let mut bodies = [Body::at(Point::ORIGIN), Body::at(Point::ORIGIN)];
        apply_many_body(&mut bodies, -30.0, 1.0, 1.0, &mut Lcg::new());
        assert!(bodies.iter().all(|b| b.velocity.x.is_finite() && b.velocity.y.is_finite()));
        assert_ne!(bodies[0].velocity, Vec2::ZERO);
    }

    #[test]
    fn centering_moves_the_centroid() {
        let mut bodies = [
            Body::at(Point::new(0.0, 0.0)),
            Body::at(Point::new(10.0, 4.0)),
        ];
        apply_center(&mut bodies, Point::new(100.0, 100.0));
        assert_eq!(bodies[0].position, Point::new(95.0, 98.0));
        assert_eq!(bodies[1].position, Point::new(105.0, 102.0));
    }
}
