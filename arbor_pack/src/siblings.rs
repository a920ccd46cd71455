// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Front-chain packing of sibling circles.
//!
//! Circles are placed in input order, each tangent to two neighbours on the
//! current front chain. When a placement collides with the chain, the chain is
//! cut back and the same circle is retried against the new neighbours.

use alloc::vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Circle, Point, Vec2};

use crate::enclose::enclose;

/// Pack `circles` in place so that no two overlap.
///
/// Only radii are read; centers are overwritten. On return the circles are
/// translated so that their smallest enclosing circle is centered at the
/// origin, and that circle's radius is returned.
pub(crate) fn pack_siblings(circles: &mut [Circle]) -> f64 {
    let n = circles.len();
    if n == 0 {
        return 0.0;
    }

    circles[0].center = Point::ORIGIN;
    if n == 1 {
        return circles[0].radius;
    }

    let (r0, r1) = (circles[0].radius, circles[1].radius);
    circles[0].center = Point::new(-r1, 0.0);
    circles[1].center = Point::new(r0, 0.0);
    if n == 2 {
        return r0 + r1;
    }

    circles[2].center = place(circles[1], circles[0], circles[2].radius);

    // Doubly linked front chain over circle indices: 0 -> 1 -> 2 -> 0.
    let mut next = vec![0_usize; n];
    let mut prev = vec![0_usize; n];
    next[0] = 1;
    prev[1] = 0;
    next[1] = 2;
    prev[2] = 1;
    next[2] = 0;
    prev[0] = 2;

    let (mut a, mut b) = (0_usize, 1_usize);
    let mut i = 3;
    'pack: while i < n {
        circles[i].center = place(circles[a], circles[b], circles[i].radius);
        let c = circles[i];

        // Walk outward from the a-b gap in both directions, always advancing
        // the side with less accumulated arc so the nearest collision wins.
        let (mut j, mut k) = (next[b], prev[a]);
        let (mut sj, mut sk) = (circles[b].radius, circles[a].radius);
        loop {
            if sj <= sk {
                if intersects(circles[j], c) {
                    b = j;
                    next[a] = b;
                    prev[b] = a;
                    continue 'pack;
                }
                sj += circles[j].radius;
                j = next[j];
            } else {
                if intersects(circles[k], c) {
                    a = k;
                    next[a] = b;
                    prev[b] = a;
                    continue 'pack;
                }
                sk += circles[k].radius;
                k = prev[k];
            }
            if j == next[k] {
                break;
            }
        }

        prev[i] = a;
        next[i] = b;
        next[a] = i;
        prev[b] = i;

        // Next gap: the chain pair whose weighted midpoint is closest to the
        // origin. The link leaving the new circle is not a candidate.
        let mut best = score(circles, &next, a);
        let mut cursor = next[i];
        while cursor != i {
            let s = score(circles, &next, cursor);
            if s < best {
                a = cursor;
                best = s;
            }
            cursor = next[cursor];
        }
        b = next[a];
        i += 1;
    }

    let mut chain = vec![circles[b]];
    let mut cursor = next[b];
    while cursor != b {
        chain.push(circles[cursor]);
        cursor = next[cursor];
    }
    let Some(enclosing) = enclose(&chain) else {
        return 0.0;
    };
    let shift = enclosing.center.to_vec2();
    for circle in circles.iter_mut() {
        circle.center -= shift;
    }
    enclosing.radius
}

/// Center for a circle of radius `r` tangent to both `a` and `b`.
///
/// The result lies on the side of the directed line from `b` to `a` that keeps
/// the front chain turning consistently.
fn place(b: Circle, a: Circle, r: f64) -> Point {
    let d = b.center - a.center;
    let d2 = d.hypot2();
    if d2 == 0.0 {
        return a.center + Vec2::new(r, 0.0);
    }
    let a2 = (a.radius + r).powi(2);
    let b2 = (b.radius + r).powi(2);
    if a2 > b2 {
        let x = (d2 + b2 - a2) / (2.0 * d2);
        let y = (b2 / d2 - x * x).max(0.0).sqrt();
        Point::new(
            b.center.x - x * d.x - y * d.y,
            b.center.y - x * d.y + y * d.x,
        )
    } else {
        let x = (d2 + a2 - b2) / (2.0 * d2);
        let y = (a2 / d2 - x * x).max(0.0).sqrt();
        Point::new(
            a.center.x + x * d.x - y * d.y,
            a.center.y + x * d.y + y * d.x,
        )
    }
}

/// True when the circles overlap by more than a small slack.
fn intersects(a: Circle, b: Circle) -> bool {
    let dr = a.radius + b.radius - 1e-6;
    dr > 0.0 && dr * dr > (b.center - a.center).hypot2()
}

/// Squared distance from the origin to the radius-weighted midpoint of a chain link.
fn score(circles: &[Circle], next: &[usize], node: usize) -> f64 {
    let a = circles[node];
    let b = circles[next[node]];
    let ab = a.radius + b.radius;
    if ab == 0.0 {
        return a.center.midpoint(b.center).to_vec2().hypot2();
    }
    let x = (a.center.x * b.radius + b.center.x * a.radius) / ab;
    let y = (a.center.y * b.radius + b.center.y * a.radius) / ab;
    x * x + y * y
}
