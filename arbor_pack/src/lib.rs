// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arbor Pack: circle-packing layout for weighted hierarchies.
//!
//! [`PackLayout`] turns a [`Tree`](arbor_hierarchy::Tree) into nested circles:
//! every leaf gets a circle whose area is proportional to its value, and every
//! parent gets the smallest circle enclosing its packed children.
//!
//! Siblings are packed with a front chain: the first two circles touch, and
//! each subsequent circle is placed tangent to the pair of chain neighbours
//! closest to the centroid, backtracking along the chain whenever the placement
//! collides. The parent circle is then found with Welzl's algorithm, visiting
//! circles in a fixed pseudo-random order so results are reproducible.
//!
//! Padding is measured in output units. Because the unit-space packing is
//! scaled to fit the bounding square afterwards, the layout refines the
//! unit-space gap until the scaled gap matches the request. A padding too large
//! for the square is reported as
//! [`LayoutError::PaddingTooLarge`](arbor_hierarchy::LayoutError::PaddingTooLarge).
//!
//! ## Example
//!
//! ```rust
//! use arbor_hierarchy::{SortOrder, Tree};
//! use arbor_pack::PackLayout;
//! use kurbo::Point;
//!
//! let mut tree = Tree::from_json_str(
//!     r#"{"id": "root", "children": [
//!         {"id": "a", "size": 4},
//!         {"id": "b", "size": 1},
//!         {"id": "c", "size": 1}
//!     ]}"#,
//! )
//! .unwrap();
//! tree.sort(SortOrder::ValueDescending);
//!
//! let geometry = PackLayout::new(400.0).with_margin(0.0).layout(&tree).unwrap();
//! let root = geometry.circle(tree.root()).unwrap();
//! assert_eq!(root.center, Point::new(200.0, 200.0));
//! assert!((root.radius - 200.0).abs() < 1e-9);
//!
//! // Clicking the middle of `a` selects `a`; clicking outside the root selects nothing.
//! let a = tree.find("a").unwrap();
//! let center = geometry.circle(a).unwrap().center;
//! assert_eq!(geometry.hit_test(center, 0.0), Some(a));
//! assert_eq!(geometry.hit_test(Point::new(0.0, 0.0), 0.0), None);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod enclose;
mod hit;
mod layout;
mod siblings;

pub use layout::{CircleRecord, PackGeometry, PackLayout, PackedNode};
