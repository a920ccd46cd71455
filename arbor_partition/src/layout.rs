// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Partition configuration and the layout pass.

use alloc::{vec, vec::Vec};

use arbor_hierarchy::{LayoutError, Tree};
use kurbo::Rect;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::geometry::{PartitionGeometry, PartitionNode};

/// Which screen axis carries depth.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// Depth runs left to right; values divide the vertical axis.
    #[default]
    DepthAlongX,
    /// Depth runs top to bottom; values divide the horizontal axis.
    DepthAlongY,
}

/// Partition (icicle) layout configuration.
///
/// Each depth level occupies one band of thickness `depth extent / levels`,
/// where `levels` counts the visible depths. Within its band a node spans the
/// share of its parent's value interval given by its own value, in sibling
/// order. Every node then gives up `padding` on the trailing edge of both axes.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartitionLayout {
    width: f64,
    height: f64,
    padding: f64,
    round: bool,
    orientation: Orientation,
    equal_fallback: bool,
}

impl Default for PartitionLayout {
    fn default() -> Self {
        Self {
            width: 960.0,
            height: 500.0,
            padding: 1.0,
            round: true,
            orientation: Orientation::DepthAlongX,
            equal_fallback: false,
        }
    }
}

impl PartitionLayout {
    /// Default configuration for a `width` x `height` area.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Trailing gap each node gives up on both axes.
    #[must_use]
    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding.max(0.0);
        self
    }

    /// Round every coordinate to the nearest integer after all divisions.
    #[must_use]
    pub fn with_round(mut self, round: bool) -> Self {
        self.round = round;
        self
    }

    /// Choose the depth axis.
    #[must_use]
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Split a zero-value node's interval equally among its children instead
    /// of failing on a zero-value root.
    #[must_use]
    pub fn with_equal_fallback(mut self, enabled: bool) -> Self {
        self.equal_fallback = enabled;
        self
    }

    /// The configured orientation.
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Extents along the value axis and the depth axis.
    fn extents(&self) -> (f64, f64) {
        match self.orientation {
            Orientation::DepthAlongX => (self.height, self.width),
            Orientation::DepthAlongY => (self.width, self.height),
        }
    }

    /// Partition the visible nodes of `tree`.
    pub fn layout(&self, tree: &Tree) -> Result<PartitionGeometry, LayoutError> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(self.width) || !valid(self.height) {
            return Err(LayoutError::InvalidExtent {
                width: self.width,
                height: self.height,
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
        let levels = order.iter().map(|&id| tree.depth(id)).max().unwrap_or(0) + 1;
        let levels = f64::from(levels);
        let (value_extent, depth_extent) = self.extents();
        let pad = self.padding;

        // Bands use `x` for the value axis and `y` for the depth axis.
        let mut bands: Vec<Option<Rect>> = vec![None; tree.len()];
        bands[root.index()] = Some(Rect::new(pad, pad, value_extent, depth_extent / levels));

        for &id in &order {
            let Some(band) = bands[id.index()] else {
                continue;
            };
            let children = tree.children_of(id);
            if !children.is_empty() {
                let depth = f64::from(tree.depth(id));
                let y0 = depth_extent * (depth + 1.0) / levels;
                let y1 = depth_extent * (depth + 2.0) / levels;
                let value = tree.value(id);
                let equal = self.equal_fallback && value <= 0.0;
                #[allow(
                    clippy::cast_precision_loss,
                    reason = "sibling counts are far below 2^52."
                )]
                let k = if equal {
                    band.width() / children.len() as f64
                } else if value > 0.0 {
                    band.width() / value
                } else {
                    0.0
                };
                let mut x = band.x0;
                for &child in children {
                    let share = if equal { 1.0 } else { tree.value(child) };
                    let next = x + share * k;
                    bands[child.index()] = Some(Rect::new(x, y0, next, y1));
                    x = next;
                }
            }
            bands[id.index()] = Some(shrink(band, pad));
        }

        let mut nodes = Vec::with_capacity(order.len());
        for &id in &order {
            let Some(mut band) = bands[id.index()] else {
                continue;
            };
            if self.round {
                band = band.round();
            }
            let rect = match self.orientation {
                Orientation::DepthAlongX => Rect::new(band.y0, band.x0, band.y1, band.x1),
                Orientation::DepthAlongY => band,
            };
            trace!(id = %tree.datum(id).id, ?rect, "partitioned");
            nodes.push(PartitionNode {
                id,
                depth: tree.depth(id),
                rect,
            });
        }

        debug!(
            nodes = nodes.len(),
            levels,
            width = self.width,
            height = self.height,
            "partition layout"
        );
        Ok(PartitionGeometry::new(self.orientation, nodes, tree.len()))
    }
}

/// Pull the trailing edges in by `pad`, collapsing an axis to its midpoint
/// when the padding exceeds it.
fn shrink(band: Rect, pad: f64) -> Rect {
    let (mut x0, mut y0) = (band.x0, band.y0);
    let (mut x1, mut y1) = (band.x1 - pad, band.y1 - pad);
    if x1 < x0 {
        x0 = (x0 + x1) / 2.0;
        x1 = x0;
    }
    if y1 < y0 {
        y0 = (y0 + y1) / 2.0;
        y1 = y0;
    }
    Rect::new(x0, y0, x1, y1)
}
