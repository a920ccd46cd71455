// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arbor Hierarchy: weighted, labeled trees for hierarchical charts.
//!
//! This crate is the data model shared by the Arbor layout and navigation crates.
//!
//! - Decodes nested JSON documents (`{ id?, name?, size?, children? }`) and flat
//!   parent-link tables into a [`Tree`], rejecting malformed input with a
//!   [`ValidationError`] before any layout runs.
//! - Derives each node's aggregate `value`, `depth` and `height` once at construction.
//! - Orders siblings deterministically with [`Tree::sort`] or [`Tree::sort_by`].
//! - Tracks per-node [`Branch`] state so charts can collapse and expand subtrees
//!   without ever deleting nodes.
//!
//! ## Not a layout engine
//!
//! The tree does not know about geometry. Layout crates (`arbor_pack`,
//! `arbor_partition`, `arbor_force`) read it and produce per-node geometry in
//! vectors indexed by [`NodeId::index`], so a single tree can feed any number of
//! layout passes.
//!
//! ## Example
//!
//! ```rust
//! use arbor_hierarchy::{SortOrder, Tree};
//!
//! let mut tree = Tree::from_json_str(
//!     r#"{"name": "flare", "children": [
//!         {"name": "analytics", "children": [{"name": "graph", "size": 3938}]},
//!         {"name": "util", "size": 1200}
//!     ]}"#,
//! )
//! .unwrap();
//! tree.sort(SortOrder::default());
//!
//! let graph = tree.find("graph").unwrap();
//! assert_eq!(tree.depth(graph), 2);
//! assert_eq!(tree.value(tree.root()), 5138.0);
//! assert_eq!(
//!     tree.ancestors(graph).map(|n| tree.label(n)).collect::<Vec<_>>(),
//!     ["graph", "analytics", "flare"],
//! );
//! ```

mod error;
mod parse;
mod tree;
mod types;
mod util;

pub use error::{LayoutError, ValidationError};
pub use parse::LinkRecord;
pub use tree::{NodeRef, Tree};
pub use types::{Branch, BranchKind, Datum, NodeId, SortOrder};
pub use util::format_value;
