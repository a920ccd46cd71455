// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pack configuration and the layout pass.

use alloc::string::String;
use alloc::{vec, vec::Vec};

use arbor_hierarchy::{LayoutError, NodeId, Tree};
#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Circle, Point};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::siblings::pack_siblings;

/// Upper bound on padding refinement passes.
const MAX_PADDING_PASSES: usize = 64;

/// Relative change in inflation below which the padding is considered solved.
const PADDING_TOLERANCE: f64 = 1e-9;

/// Circle-packing layout configuration.
///
/// Lays a [`Tree`] out inside a square of side `side`. The root circle is
/// centered in the square with radius `(side - margin) / 2`; every other
/// visible node is packed inside its parent, leaf areas proportional to value.
///
/// Configuration is `Copy` and can be loaded from JSON; missing fields take
/// their defaults.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackLayout {
    side: f64,
    margin: f64,
    padding: f64,
    equal_fallback: bool,
}

impl Default for PackLayout {
    fn default() -> Self {
        Self {
            side: 960.0,
            margin: 20.0,
            padding: 2.0,
            equal_fallback: false,
        }
    }
}

impl PackLayout {
    /// Default configuration for a square of the given side.
    pub fn new(side: f64) -> Self {
        Self {
            side,
            ..Self::default()
        }
    }

    /// Space left between the root circle and the edge of the square, in total.
    #[must_use]
    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    /// Minimum gap between sibling circles and between a circle and its parent's outline.
    #[must_use]
    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding.max(0.0);
        self
    }

    /// Give every leaf of a zero-value sibling group unit weight instead of
    /// failing on a zero-value root.
    #[must_use]
    pub fn with_equal_fallback(mut self, enabled: bool) -> Self {
        self.equal_fallback = enabled;
        self
    }

    /// Side of the bounding square.
    pub fn side(&self) -> f64 {
        self.side
    }

    /// Total margin around the root circle.
    pub fn margin(&self) -> f64 {
        self.margin
    }

    /// Pack the visible nodes of `tree`.
    ///
    /// Fails with [`LayoutError::InvalidExtent`] when the root circle would be
    /// empty, and with [`LayoutError::ZeroValue`] when the root value is zero
    /// and the equal fallback is off. Fails with
    /// [`LayoutError::PaddingTooLarge`] when no packing keeps every gap at
    /// `padding` inside the root circle.
    pub fn layout(&self, tree: &Tree) -> Result<PackGeometry, LayoutError> {
        let radius = (self.side - self.margin) / 2.0;
        if !self.side.is_finite() || !radius.is_finite() || radius <= 0.0 {
            return Err(LayoutError::InvalidExtent {
                width: self.side,
                height: self.side,
            });
        }

        let root = tree.root();
        let root_value = tree.value(root);
        if !root_value.is_finite() {
            return Err(LayoutError::NonFiniteValue {
                id: tree.datum(root).id.clone(),
            });
        }
        if root_value <= 0.0 && !self.equal_fallback {
            return Err(LayoutError::ZeroValue {
                id: tree.datum(root).id.clone(),
            });
        }

        let order = tree.descendants();
        let weights = self.leaf_weights(tree, &order)?;
        let mut relative = vec![Circle::new(Point::ORIGIN, 0.0); tree.len()];

        let mut root_radius = pack_pass(tree, &order, &weights, 0.0, &mut relative);
        let mut passes = 1;
        if self.padding > 0.0 {
            // The inflation is chosen in unit space, but the padding is a
            // pixel quantity, so it depends on the scale it produces.
            // Each pass grows the root by the slope of the packing in the
            // inflation; once that slope reaches `2 * radius / padding` the
            // steps stop shrinking and no positive inflation exists.
            let mut inflation = 0.0;
            let mut last_step = f64::INFINITY;
            let mut settled = false;
            for _ in 0..MAX_PADDING_PASSES {
                let next = self.padding * root_radius / (2.0 * radius);
                let step = (next - inflation).abs();
                if !next.is_finite() || step >= last_step {
                    break;
                }
                inflation = next;
                root_radius = pack_pass(tree, &order, &weights, inflation, &mut relative);
                passes += 1;
                if step <= next * PADDING_TOLERANCE {
                    settled = true;
                    break;
                }
                last_step = step;
            }
            if !settled {
                debug!(padding = self.padding, passes, inflation, "padding did not settle");
                return Err(LayoutError::PaddingTooLarge {
                    padding: self.padding,
                    side: self.side,
                });
            }
        }

        let scale = radius / root_radius;
        let center = Point::new(self.side / 2.0, self.side / 2.0);
        let mut slots = vec![None; tree.len()];
        let mut nodes: Vec<PackedNode> = Vec::with_capacity(order.len());
        for &id in &order {
            let origin = tree
                .parent_of(id)
                .and_then(|parent| slots[parent.index()])
                .map_or(center, |slot: usize| nodes[slot].circle.center);
            let local = relative[id.index()];
            let circle = Circle::new(origin + local.center.to_vec2() * scale, local.radius * scale);
            trace!(
                id = %tree.datum(id).id,
                x = circle.center.x,
                y = circle.center.y,
                r = circle.radius,
                "packed"
            );
            slots[id.index()] = Some(nodes.len());
            nodes.push(PackedNode {
                id,
                depth: tree.depth(id),
                circle,
            });
        }

        debug!(nodes = nodes.len(), radius, passes, "pack layout");
        Ok(PackGeometry { nodes, slots })
    }

    fn leaf_weights(&self, tree: &Tree, order: &[NodeId]) -> Result<Vec<f64>, LayoutError> {
        let mut weights = vec![0.0; tree.len()];
        for &id in order {
            if !tree.is_leaf(id) {
                continue;
            }
            let value = tree.value(id);
            if !value.is_finite() {
                return Err(LayoutError::NonFiniteValue {
                    id: tree.datum(id).id.clone(),
                });
            }
            let empty_group = tree
                .parent_of(id)
                .map_or(value <= 0.0, |parent| tree.value(parent) <= 0.0);
            weights[id.index()] = if self.equal_fallback && empty_group {
                1.0
            } else {
                value.max(0.0)
            };
        }
        Ok(weights)
    }
}

/// One bottom-up pass: leaf radii from weights, then each parent packs its
/// children (inflated by `inflation`) and encloses them.
///
/// Centers are left relative to the parent's center. Returns the root radius.
fn pack_pass(
    tree: &Tree,
    order: &[NodeId],
    weights: &[f64],
    inflation: f64,
    relative: &mut [Circle],
) -> f64 {
    let mut scratch = Vec::new();
    for &id in order.iter().rev() {
        let children = tree.children_of(id);
        if children.is_empty() {
            relative[id.index()] = Circle::new(Point::ORIGIN, weights[id.index()].sqrt());
            continue;
        }
        scratch.clear();
        scratch.extend(children.iter().map(|child| {
            let mut circle = relative[child.index()];
            circle.radius += inflation;
            circle
        }));
        let enclosing = pack_siblings(&mut scratch);
        for (child, placed) in children.iter().zip(&scratch) {
            relative[child.index()] = Circle::new(placed.center, placed.radius - inflation);
        }
        relative[id.index()] = Circle::new(Point::ORIGIN, enclosing + inflation);
    }
    relative[tree.root().index()].radius
}

/// A visible node with its circle in output coordinates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PackedNode {
    /// The node.
    pub id: NodeId,
    /// Depth in the tree.
    pub depth: u32,
    /// Circle in the coordinate space of the bounding square.
    pub circle: Circle,
}

/// Output of [`PackLayout::layout`].
#[derive(Clone, Debug)]
pub struct PackGeometry {
    /// Visible nodes in level order, which is also a valid paint order.
    pub(crate) nodes: Vec<PackedNode>,
    /// Position in `nodes`, indexed by [`NodeId::index`]; `None` for hidden nodes.
    slots: Vec<Option<usize>>,
}

impl PackGeometry {
    /// Circle of a node, or `None` if it was not visible when laid out.
    pub fn circle(&self, id: NodeId) -> Option<Circle> {
        let slot = (*self.slots.get(id.index())?)?;
        Some(self.nodes[slot].circle)
    }

    /// All packed nodes, parents before children.
    pub fn nodes(&self) -> &[PackedNode] {
        &self.nodes
    }

    /// Serializable records for every packed node.
    pub fn records(&self, tree: &Tree) -> Vec<CircleRecord> {
        self.nodes
            .iter()
            .map(|node| CircleRecord {
                id: tree.datum(node.id).id.clone(),
                depth: node.depth,
                leaf: tree.is_leaf(node.id),
                x: node.circle.center.x,
                y: node.circle.center.y,
                r: node.circle.radius,
            })
            .collect()
    }
}

/// Flat circle record for renderers.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CircleRecord {
    /// Node id.
    pub id: String,
    /// Node depth.
    pub depth: u32,
    /// Whether the node is drawn without children; collapsed nodes count as leaves.
    pub leaf: bool,
    /// Center x.
    pub x: f64,
    /// Center y.
    pub y: f64,
    /// Radius.
    pub r: f64,
}

#[cfg(test)]
mod tests {
    use alloc::format;

    use super::*;
    use serde_json::json;

    const EPS: f64 = 1e-3;

    fn sample() -> Tree {
        Tree::from_json_value(&json!({
            "id": "root",
            "children": [
                {"id": "a", "children": [
                    {"id": "a1", "size": 10},
                    {"id": "a2", "size": 5},
                    {"id": "a3", "size": 3},
                    {"id": "a4", "size": 8}
                ]},
                {"id": "b", "children": [
                    {"id": "b1", "size": 20},
                    {"id": "b2", "children": [
                        {"id": "b21", "size": 1},
                        {"id": "b22", "size": 2},
                        {"id": "b23", "size": 4}
                    ]}
                ]},
                {"id": "c", "size": 12},
                {"id": "d", "size": 6}
            ]
        }))
        .unwrap()
    }

    fn check_nesting(tree: &Tree, geometry: &PackGeometry, padding: f64) {
        for &parent in &tree.descendants() {
            let outer = geometry.circle(parent).unwrap();
            let children = tree.children_of(parent);
            for (i, &a) in children.iter().enumerate() {
                let ca = geometry.circle(a).unwrap();
                let reach = (ca.center - outer.center).hypot() + ca.radius + padding;
                assert!(reach <= outer.radius + EPS, "{a:?} escapes {parent:?}");
                for &b in &children[i + 1..] {
                    let cb = geometry.circle(b).unwrap();
                    let gap = (cb.center - ca.center).hypot() - ca.radius - cb.radius;
                    assert!(gap >= padding - EPS, "{a:?} and {b:?} gap {gap}");
                }
            }
        }
    }

    /// A full tree of `fan` children per node, `depth` levels below the root.
    fn fan_tree(depth: u32, fan: u32) -> Tree {
        fn node(id: String, depth: u32, fan: u32) -> serde_json::Value {
            if depth == 0 {
                return json!({"id": id, "size": 1});
            }
            let children: Vec<_> = (0..fan)
                .map(|i| node(format!("{id}.{i}"), depth - 1, fan))
                .collect();
            json!({"id": id, "children": children})
        }
        Tree::from_json_value(&node("n".into(), depth, fan)).unwrap()
    }

    #[test]
    fn root_is_centered_in_the_square() {
        let tree = sample();
        let geometry = PackLayout::new(500.0).with_margin(20.0).layout(&tree).unwrap();
        let root = geometry.circle(tree.root()).unwrap();
        assert!((root.center - Point::new(250.0, 250.0)).hypot() < 1e-9);
        assert!((root.radius - 240.0).abs() < 1e-9);
    }

    #[test]
    fn children_nest_and_siblings_keep_padding() {
        let tree = sample();
        for padding in [0.0, 2.0, 7.5] {
            let geometry = PackLayout::new(800.0)
                .with_padding(padding)
                .layout(&tree)
                .unwrap();
            check_nesting(&tree, &geometry, padding);
        }
    }

    #[test]
    fn padding_that_cannot_fit_is_an_error() {
        let tree = fan_tree(5, 3);
        for (side, padding) in [(200.0, 6.0), (300.0, 10.0)] {
            let err = PackLayout::new(side)
                .with_padding(padding)
                .layout(&tree)
                .unwrap_err();
            assert_eq!(err, LayoutError::PaddingTooLarge { padding, side });
        }

        // The same tree with room to spare keeps the full gap.
        let geometry = PackLayout::new(2000.0)
            .with_padding(1.0)
            .layout(&tree)
            .unwrap();
        check_nesting(&tree, &geometry, 1.0);
    }

    #[test]
    fn leaf_area_is_proportional_to_value() {
        let tree = sample();
        let geometry = PackLayout::new(600.0).layout(&tree).unwrap();
        let leaves = tree.leaves();
        let ratios: Vec<f64> = leaves
            .iter()
            .map(|&id| geometry.circle(id).unwrap().radius.powi(2) / tree.value(id))
            .collect();
        for r in &ratios {
            assert!((r / ratios[0] - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn single_leaf_fills_the_allotted_radius() {
        let tree = Tree::from_json_value(&json!({"id": "only", "size": 3})).unwrap();
        let geometry = PackLayout::new(100.0).with_margin(10.0).layout(&tree).unwrap();
        assert_eq!(geometry.nodes().len(), 1);
        let root = geometry.circle(tree.root()).unwrap();
        assert!((root.radius - 45.0).abs() < 1e-9);
    }

    #[test]
    fn zero_value_root_fails_without_fallback() {
        let tree = Tree::from_json_value(&json!({
            "id": "empty", "children": [{"id": "x", "size": 0}, {"id": "y"}]
        }))
        .unwrap();
        let err = PackLayout::default().layout(&tree).unwrap_err();
        assert_eq!(
            err,
            LayoutError::ZeroValue {
                id: "empty".into()
            }
        );

        let geometry = PackLayout::default()
            .with_equal_fallback(true)
            .layout(&tree)
            .unwrap();
        let x = geometry.circle(tree.find("x").unwrap()).unwrap();
        let y = geometry.circle(tree.find("y").unwrap()).unwrap();
        assert!(x.radius > 0.0);
        assert!((x.radius - y.radius).abs() < 1e-9);
        assert!(geometry.nodes().iter().all(|n| n.circle.radius.is_finite()));
    }

    #[test]
    fn invalid_extent_is_rejected() {
        let tree = sample();
        let err = PackLayout::new(10.0).with_margin(10.0).layout(&tree).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidExtent { .. }));
        assert!(PackLayout::new(f64::NAN).layout(&tree).is_err());
    }

    #[test]
    fn layout_is_deterministic() {
        let tree = sample();
        let layout = PackLayout::new(700.0).with_padding(3.0);
        let a = layout.layout(&tree).unwrap();
        let b = layout.layout(&tree).unwrap();
        assert_eq!(a.nodes(), b.nodes());
    }

    #[test]
    fn collapsed_children_are_not_packed() {
        let mut tree = sample();
        let b = tree.find("b").unwrap();
        assert!(tree.collapse(b));
        let geometry = PackLayout::default().layout(&tree).unwrap();
        assert!(geometry.circle(b).is_some());
        assert!(geometry.circle(tree.find("b1").unwrap()).is_none());
        assert_eq!(geometry.nodes().len(), tree.descendants().len());
    }

    #[test]
    fn nodes_are_in_level_order() {
        let tree = sample();
        let geometry = PackLayout::default().layout(&tree).unwrap();
        let ids: Vec<NodeId> = geometry.nodes().iter().map(|n| n.id).collect();
        assert_eq!(ids, tree.descendants());
        assert!(geometry.nodes().windows(2).all(|w| w[0].depth <= w[1].depth));
    }

    #[test]
    fn records_serialize() {
        let tree = Tree::from_json_value(&json!({"id": "r", "size": 1})).unwrap();
        let geometry = PackLayout::new(100.0).with_margin(0.0).layout(&tree).unwrap();
        let value = serde_json::to_value(geometry.records(&tree)).unwrap();
        assert_eq!(
            value,
            json!([{"id": "r", "depth": 0, "leaf": true, "x": 50.0, "y": 50.0, "r": 50.0}])
        );

        let tree = sample();
        let geometry = PackLayout::default().layout(&tree).unwrap();
        let records = geometry.records(&tree);
        assert!(!records[0].leaf, "root has children");
        let leaf_ids: Vec<&str> = records
            .iter()
            .filter(|r| r.leaf)
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(leaf_ids.len(), tree.leaves().len());
        assert!(leaf_ids.contains(&"b21") && !leaf_ids.contains(&"b2"));
    }

    #[test]
    fn config_loads_with_defaults() {
        let layout: PackLayout = serde_json::from_value(json!({"side": 400.0})).unwrap();
        assert_eq!(layout, PackLayout::new(400.0));
    }
}
