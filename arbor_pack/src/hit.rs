// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Point queries against packed circles.

use arbor_hierarchy::NodeId;
use kurbo::{Circle, Point};

use crate::layout::PackGeometry;

/// Distance from `point` to the disk, or `None` when it is farther than `tolerance`.
///
/// Points inside the disk score zero.
fn disk_distance(circle: Circle, point: Point, tolerance: f64) -> Option<f64> {
    let dist = (point - circle.center).hypot();
    if dist <= circle.radius {
        Some(0.0)
    } else if dist <= circle.radius + tolerance {
        Some(dist - circle.radius)
    } else {
        None
    }
}

impl PackGeometry {
    /// The deepest node whose circle contains `point`, inflated by `fill_tolerance`.
    ///
    /// Among hits at the same depth the closest wins. Returns `None` for
    /// background points outside the root circle.
    pub fn hit_test(&self, point: Point, fill_tolerance: f64) -> Option<NodeId> {
        let mut best: Option<(u32, f64, NodeId)> = None;
        // Level order puts the deepest nodes last.
        for node in self.nodes.iter().rev() {
            if let Some((depth, ..)) = best
                && node.depth < depth
            {
                break;
            }
            let Some(distance) = disk_distance(node.circle, point, fill_tolerance) else {
                continue;
            };
            if best.is_none_or(|(_, d, _)| distance < d) {
                best = Some((node.depth, distance, node.id));
            }
        }
        best.map(|(.., id)| id)
    }
}
