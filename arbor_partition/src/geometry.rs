// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Partition output: per-node rectangles and queries over them.

use alloc::format;
use alloc::string::String;
use alloc::{vec, vec::Vec};

use arbor_hierarchy::{NodeId, Tree, format_value};
use kurbo::{Point, Rect};
use serde::Serialize;

use crate::layout::Orientation;

/// A visible node with its rectangle in screen coordinates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PartitionNode {
    /// The node.
    pub id: NodeId,
    /// Depth in the tree.
    pub depth: u32,
    /// Rectangle; `x` grows rightwards and `y` downwards.
    pub rect: Rect,
}

/// Output of [`PartitionLayout::layout`](crate::PartitionLayout::layout).
#[derive(Clone, Debug)]
pub struct PartitionGeometry {
    orientation: Orientation,
    nodes: Vec<PartitionNode>,
    slots: Vec<Option<usize>>,
}

impl PartitionGeometry {
    pub(crate) fn new(orientation: Orientation, nodes: Vec<PartitionNode>, len: usize) -> Self {
        let mut slots = vec![None; len];
        for (slot, node) in nodes.iter().enumerate() {
            slots[node.id.index()] = Some(slot);
        }
        Self {
            orientation,
            nodes,
            slots,
        }
    }

    /// Screen rectangle of a node, or `None` if it was hidden.
    pub fn rect(&self, id: NodeId) -> Option<Rect> {
        let slot = (*self.slots.get(id.index())?)?;
        Some(self.nodes[slot].rect)
    }

    /// All laid-out nodes in level order.
    pub fn nodes(&self) -> &[PartitionNode] {
        &self.nodes
    }

    /// Orientation the geometry was produced with.
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// The `(start, end)` interval of a node along the value axis.
    pub fn value_extent(&self, id: NodeId) -> Option<(f64, f64)> {
        let rect = self.rect(id)?;
        Some(match self.orientation {
            Orientation::DepthAlongX => (rect.y0, rect.y1),
            Orientation::DepthAlongY => (rect.x0, rect.x1),
        })
    }

    /// The `(start, end)` interval of a node along the depth axis.
    pub fn depth_extent(&self, id: NodeId) -> Option<(f64, f64)> {
        let rect = self.rect(id)?;
        Some(match self.orientation {
            Orientation::DepthAlongX => (rect.x0, rect.x1),
            Orientation::DepthAlongY => (rect.y0, rect.y1),
        })
    }

    /// The node whose rectangle contains `point`.
    ///
    /// Rectangles of a partition never overlap, so at most one node matches.
    pub fn hit_test(&self, point: Point) -> Option<NodeId> {
        self.nodes
            .iter()
            .rev()
            .find(|node| node.rect.contains(point))
            .map(|node| node.id)
    }

    /// Serializable records, each carrying the two-line label `"{id}\n{value}"`.
    pub fn records(&self, tree: &Tree) -> Vec<RectRecord> {
        self.nodes
            .iter()
            .map(|node| {
                let id = tree.datum(node.id).id.clone();
                let label = format!("{id}\n{}", format_value(tree.value(node.id)));
                RectRecord {
                    id,
                    depth: node.depth,
                    leaf: tree.is_leaf(node.id),
                    x0: node.rect.x0,
                    y0: node.rect.y0,
                    x1: node.rect.x1,
                    y1: node.rect.y1,
                    label,
                }
            })
            .collect()
    }
}

/// Flat rectangle record for renderers.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RectRecord {
    /// Node id.
    pub id: String,
    /// Node depth.
    pub depth: u32,
    /// True for nodes drawn without children.
    pub leaf: bool,
    /// Left edge.
    pub x0: f64,
    /// Top edge.
    pub y0: f64,
    /// Right edge.
    pub x1: f64,
    /// Bottom edge.
    pub y1: f64,
    /// Id and formatted value on two lines.
    pub label: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::PartitionLayout;

    fn tree() -> Tree {
        Tree::from_json_value(&json!({
            "id": "R",
            "children": [{"id": "A", "size": 1000}, {"id": "B", "size": 3000}]
        }))
        .unwrap()
    }

    #[test]
    fn hit_test_finds_the_band() {
        let tree = tree();
        let geometry = PartitionLayout::new(100.0, 100.0)
            .with_padding(0.0)
            .layout(&tree)
            .unwrap();
        assert_eq!(geometry.hit_test(Point::new(10.0, 90.0)), Some(tree.root()));
        assert_eq!(geometry.hit_test(Point::new(60.0, 10.0)), tree.find("A"));
        assert_eq!(geometry.hit_test(Point::new(60.0, 90.0)), tree.find("B"));
        assert_eq!(geometry.hit_test(Point::new(150.0, 10.0)), None);
    }

    #[test]
    fn records_carry_labels() {
        let tree = tree();
        let geometry = PartitionLayout::new(100.0, 100.0)
            .with_padding(0.0)
            .layout(&tree)
            .unwrap();
        let records = geometry.records(&tree);
        assert_eq!(records[0].label, "R\n4,000");
        assert!(!records[0].leaf);
        assert_eq!(
            serde_json::to_value(&records[1]).unwrap(),
            json!({
                "id": "A", "depth": 1, "leaf": true,
                "x0": 50.0, "y0": 0.0, "x1": 100.0, "y1": 25.0,
                "label": "A\n1,000"
            })
        );
    }
}
