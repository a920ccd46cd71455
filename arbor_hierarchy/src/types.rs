// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the hierarchy: node identifiers, payloads, and branch state.

use serde::Serialize;

/// Identifier for a node in a [`Tree`](crate::Tree).
///
/// Identifiers are dense indices into the tree's arena. A parent always has a
/// smaller index than any of its children, so iterating indices in reverse
/// visits every child before its parent.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// The root of every tree.
    pub const ROOT: Self = Self(0);

    pub(crate) fn new(idx: usize) -> Self {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "NodeId stores 32-bit indices."
        )]
        Self(idx as u32)
    }

    /// Position of this node in the arena, suitable for indexing per-node layout vectors.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Payload carried by a node, as decoded from the input document.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Datum {
    /// Identifier: the `id` field, else the `name` field, else a synthesized path.
    pub id: String,
    /// Optional display name.
    pub name: Option<String>,
    /// Optional non-negative weight. Only meaningful on leaves.
    pub size: Option<f64>,
}

impl Datum {
    /// Display text: the name when present, otherwise the id.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

/// Whether a node's children take part in layout.
///
/// A collapsed node keeps its children in a hidden slot; nothing is ever
/// removed from the arena.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Branch {
    /// The node has no children at all.
    Leaf,
    /// Children are attached and visible.
    Expanded(Vec<NodeId>),
    /// Children are detached into a hidden slot; the node lays out as a leaf.
    Collapsed(Vec<NodeId>),
}

impl Branch {
    pub(crate) fn from_children(children: Vec<NodeId>) -> Self {
        if children.is_empty() {
            Self::Leaf
        } else {
            Self::Expanded(children)
        }
    }

    /// Children that take part in layout.
    pub fn visible(&self) -> &[NodeId] {
        match self {
            Self::Expanded(children) => children,
            Self::Leaf | Self::Collapsed(_) => &[],
        }
    }

    /// Children regardless of collapse state.
    pub fn all(&self) -> &[NodeId] {
        match self {
            Self::Expanded(children) | Self::Collapsed(children) => children,
            Self::Leaf => &[],
        }
    }

    pub(crate) fn all_mut(&mut self) -> Option<&mut Vec<NodeId>> {
        match self {
            Self::Expanded(children) | Self::Collapsed(children) => Some(children),
            Self::Leaf => None,
        }
    }

    /// Coarse classification, handy for styling.
    pub fn kind(&self) -> BranchKind {
        match self {
            Self::Leaf => BranchKind::Leaf,
            Self::Expanded(_) => BranchKind::Expanded,
            Self::Collapsed(_) => BranchKind::Collapsed,
        }
    }
}

/// Payload-free view of a [`Branch`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BranchKind {
    /// A true leaf.
    Leaf,
    /// Children visible.
    Expanded,
    /// Children hidden.
    Collapsed,
}

/// Sibling ordering presets for [`Tree::sort`](crate::Tree::sort).
///
/// Every preset sorts stably, so ties keep their insertion order.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum SortOrder {
    /// Descending value, ties by descending height.
    #[default]
    ValueThenHeight,
    /// Descending value only. Used by the packed-circle chart.
    ValueDescending,
    /// Descending height, ties by descending value. Used by the partition chart,
    /// so that deep branches come first.
    HeightThenValue,
    /// Leave sibling order as decoded.
    Insertion,
}
