// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arbor Partition: rectangular partition (icicle) layout.
//!
//! [`PartitionLayout`] divides a rectangle into one band per depth level and
//! splits each band among siblings in proportion to their values. The root
//! fills the first band; every child sits in the next band, spanning its share
//! of the parent's interval along the value axis.
//!
//! - Depth runs along x by default ([`Orientation::DepthAlongX`]), matching a
//!   left-to-right icicle; [`Orientation::DepthAlongY`] stacks levels vertically.
//! - Padding is taken from the trailing edge of each node on both axes, so
//!   children line up flush with the leading edge of their parent.
//! - With rounding enabled (the default) all coordinates are integers, which
//!   keeps adjacent rectangles crisp on pixel grids.
//!
//! ## Example
//!
//! ```rust
//! use arbor_hierarchy::Tree;
//! use arbor_partition::PartitionLayout;
//!
//! let tree = Tree::from_json_str(
//!     r#"{"id": "R", "children": [{"id": "A", "size": 10}, {"id": "B", "size": 30}]}"#,
//! )
//! .unwrap();
//! let geometry = PartitionLayout::new(100.0, 100.0)
//!     .with_padding(0.0)
//!     .layout(&tree)
//!     .unwrap();
//!
//! let b = tree.find("B").unwrap();
//! assert_eq!(geometry.value_extent(b), Some((25.0, 100.0)));
//! assert_eq!(geometry.depth_extent(b), Some((50.0, 100.0)));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod geometry;
mod layout;

pub use geometry::{PartitionGeometry, PartitionNode, RectRecord};
pub use layout::{Orientation, PartitionLayout};
