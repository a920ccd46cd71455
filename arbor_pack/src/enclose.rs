// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Smallest circle enclosing a set of circles (Welzl's algorithm, move-to-front form).

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Circle, Point, Shape};
use smallvec::{SmallVec, smallvec};
use tracing::warn;

/// Support set of the current enclosing circle; never more than three circles.
type Basis = SmallVec<[Circle; 3]>;

/// Return the smallest circle enclosing every circle in `circles`.
///
/// The input is visited in a fixed pseudo-random order so the expected running
/// time stays linear while results remain reproducible.
pub(crate) fn enclose(circles: &[Circle]) -> Option<Circle> {
    let mut order = circles.to_vec();
    shuffle(&mut order);

    let mut basis = Basis::new();
    let mut enclosing: Option<Circle> = None;
    let mut i = 0;
    while i < order.len() {
        let p = order[i];
        if let Some(e) = enclosing
            && encloses_weak(e, p)
        {
            i += 1;
            continue;
        }
        let Some(extended) = extend_basis(&basis, p) else {
            warn!(circles = circles.len(), "no enclosing basis found; using bounding circle");
            return Some(bounding_circle(circles));
        };
        basis = extended;
        enclosing = Some(enclose_basis(&basis));
        i = 0;
    }
    enclosing
}

/// Fisher-Yates shuffle driven by a fixed linear congruential generator.
fn shuffle(items: &mut [Circle]) {
    const A: u64 = 1_664_525;
    const C: u64 = 1_013_904_223;
    const M: u64 = 1 << 32;
    let mut state: u64 = 1;
    let mut m = items.len();
    while m > 0 {
        state = (A * state + C) % M;
        #[allow(
            clippy::cast_possible_truncation,
            reason = "the product is below 2^64 and the shifted result is below m."
        )]
        let i = ((state * m as u64) >> 32) as usize;
        m -= 1;
        items.swap(m, i);
    }
}

fn extend_basis(basis: &[Circle], p: Circle) -> Option<Basis> {
    if encloses_weak_all(p, basis) {
        return Some(smallvec![p]);
    }

    for &b in basis {
        if encloses_not(p, b) && encloses_weak_all(enclose_basis2(b, p), basis) {
            return Some(smallvec![b, p]);
        }
    }

    for (i, &bi) in basis.iter().enumerate() {
        for &bj in &basis[i + 1..] {
            if encloses_not(enclose_basis2(bi, bj), p)
                && encloses_not(enclose_basis2(bi, p), bj)
                && encloses_not(enclose_basis2(bj, p), bi)
                && encloses_weak_all(enclose_basis3(bi, bj, p), basis)
            {
                return Some(smallvec![bi, bj, p]);
            }
        }
    }

    None
}

/// True when `a` fails to contain `b`.
fn encloses_not(a: Circle, b: Circle) -> bool {
    let dr = a.radius - b.radius;
    let d = b.center - a.center;
    dr < 0.0 || dr * dr < d.hypot2()
}

/// True when `a` contains `b`, up to a small relative tolerance.
fn encloses_weak(a: Circle, b: Circle) -> bool {
    let dr = a.radius - b.radius + a.radius.max(b.radius).max(1.0) * 1e-9;
    let d = b.center - a.center;
    dr > 0.0 && dr * dr > d.hypot2()
}

fn encloses_weak_all(a: Circle, basis: &[Circle]) -> bool {
    basis.iter().all(|&b| encloses_weak(a, b))
}

fn enclose_basis(basis: &[Circle]) -> Circle {
    match *basis {
        [a] => a,
        [a, b] => enclose_basis2(a, b),
        [a, b, c] => enclose_basis3(a, b, c),
        _ => unreachable!("a basis holds one to three circles"),
    }
}

fn enclose_basis2(a: Circle, b: Circle) -> Circle {
    let d = b.center - a.center;
    let dr = b.radius - a.radius;
    let l = d.hypot();
    Circle::new(
        Point::new(
            (a.center.x + b.center.x + d.x / l * dr) / 2.0,
            (a.center.y + b.center.y + d.y / l * dr) / 2.0,
        ),
        (l + a.radius + b.radius) / 2.0,
    )
}

/// Circle internally tangent to three circles (Apollonius).
fn enclose_basis3(a: Circle, b: Circle, c: Circle) -> Circle {
    let (x1, y1, r1) = (a.center.x, a.center.y, a.radius);
    let (x2, y2, r2) = (b.center.x, b.center.y, b.radius);
    let (x3, y3, r3) = (c.center.x, c.center.y, c.radius);
    let a2 = x1 - x2;
    let a3 = x1 - x3;
    let b2 = y1 - y2;
    let b3 = y1 - y3;
    let c2 = r2 - r1;
    let c3 = r3 - r1;
    let d1 = x1 * x1 + y1 * y1 - r1 * r1;
    let d2 = d1 - x2 * x2 - y2 * y2 + r2 * r2;
    let d3 = d1 - x3 * x3 - y3 * y3 + r3 * r3;
    let ab = a3 * b2 - a2 * b3;
    let xa = (b2 * d3 - b3 * d2) / (ab * 2.0) - x1;
    let xb = (b3 * c2 - b2 * c3) / ab;
    let ya = (a3 * d2 - a2 * d3) / (ab * 2.0) - y1;
    let yb = (a2 * c3 - a3 * c2) / ab;
    let qa = xb * xb + yb * yb - 1.0;
    let qb = 2.0 * (r1 + xa * xb + ya * yb);
    let qc = xa * xa + ya * ya - r1 * r1;
    let r = -(if qa.abs() > 1e-6 {
        (qb + (qb * qb - 4.0 * qa * qc).sqrt()) / (2.0 * qa)
    } else {
        qc / qb
    });
    Circle::new(Point::new(x1 + xa + xb * r, y1 + ya + yb * r), r)
}

/// Enclosing circle around the bounding box; loose, but always valid.
fn bounding_circle(circles: &[Circle]) -> Circle {
    let Some(first) = circles.first() else {
        return Circle::new(Point::ORIGIN, 0.0);
    };
    let bounds = circles
        .iter()
        .fold(first.bounding_box(), |acc, c| acc.union(c.bounding_box()));
    let center = bounds.center();
    let radius = circles
        .iter()
        .map(|c| (c.center - center).hypot() + c.radius)
        .fold(0.0, f64::max);
    Circle::new(center, radius)
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;

    fn contains(outer: Circle, inner: Circle) -> bool {
        (inner.center - outer.center).hypot() + inner.radius <= outer.radius + 1e-9
    }

    #[test]
    fn single_circle_encloses_itself() {
        let c = Circle::new((3.0, 4.0), 2.0);
        assert_eq!(enclose(&[c]), Some(c));
        assert_eq!(enclose(&[]), None);
    }

    #[test]
    fn two_circles_are_spanned_end_to_end() {
        let e = enclose(&[
            Circle::new((-1.0, 0.0), 1.0),
            Circle::new((3.0, 0.0), 1.0),
        ])
        .unwrap();
        assert!((e.radius - 3.0).abs() < 1e-12);
        assert!((e.center.x - 1.0).abs() < 1e-12);
        assert!(e.center.y.abs() < 1e-12);
    }

    #[test]
    fn nested_circle_does_not_grow_the_result() {
        let big = Circle::new((0.0, 0.0), 10.0);
        let small = Circle::new((2.0, 1.0), 1.0);
        let e = enclose(&[small, big]).unwrap();
        assert!((e.radius - 10.0).abs() < 1e-9);
    }

    #[test]
    fn three_tangent_unit_circles() {
        let h = 3.0_f64.sqrt();
        let circles = [
            Circle::new((-1.0, 0.0), 1.0),
            Circle::new((1.0, 0.0), 1.0),
            Circle::new((0.0, h), 1.0),
        ];
        let e = enclose(&circles).unwrap();
        // Circumradius of the centers plus the unit radius.
        let expected = 2.0 / h + 1.0;
        assert!((e.radius - expected).abs() < 1e-9, "{e:?}");
        for c in circles {
            assert!(contains(e, c));
        }
    }

    #[test]
    fn encloses_a_scatter() {
        let circles: Vec<_> = (0..40)
            .map(|i| {
                let t = f64::from(i) * 0.7;
                Circle::new((t.cos() * f64::from(i), t.sin() * 3.0), 0.5 + f64::from(i % 5))
            })
            .collect();
        let e = enclose(&circles).unwrap();
        for &c in &circles {
            assert!(contains(e, c), "{c:?} escapes {e:?}");
        }
        assert!(e.radius <= bounding_circle(&circles).radius + 1e-9);
    }

    #[test]
    fn shuffle_is_deterministic() {
        let circles: Vec<_> = (0..8)
            .map(|i| Circle::new((f64::from(i), 0.0), 1.0))
            .collect();
        let mut a = circles.clone();
        let mut b = circles;
        shuffle(&mut a);
        shuffle(&mut b);
        assert_eq!(a, b);
    }
}
