// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arbor Navigation: interaction state machines for hierarchical charts.
//!
//! Three independent navigators, one per chart style, each a plain owned value
//! driven by explicit method calls and [`PointerEvent`]s:
//!
//! - [`ZoomNavigator`] animates a packed-circle chart between focus nodes along
//!   a smooth pan-and-zoom path, fading labels in and out with the focus.
//! - [`DrillNavigator`] keeps a history of partition layouts: clicking a branch
//!   lays out its subtree on its own, and going back pops the history.
//! - [`ExpandCollapseController`] toggles branches of a force-directed tree and
//!   reheats the simulation, ignoring clicks that end a drag.
//!
//! Requests that do not apply return [`Outcome::Noop`] rather than an error.
//! Time is always passed in explicitly (milliseconds), so navigators can be
//! driven from any frame loop and replayed deterministically in tests.
//!
//! ## Example
//!
//! ```rust
//! use arbor_hierarchy::Tree;
//! use arbor_navigation::{DrillNavigator, Outcome};
//! use arbor_partition::PartitionLayout;
//!
//! let tree = Tree::from_json_str(
//!     r#"{"id": "R", "children": [
//!         {"id": "A", "size": 10},
//!         {"id": "B", "children": [{"id": "B1", "size": 30}]}
//!     ]}"#,
//! )
//! .unwrap();
//! let mut nav = DrillNavigator::new(tree, PartitionLayout::new(100.0, 100.0)).unwrap();
//!
//! let b = nav.current().tree().find("B").unwrap();
//! assert_eq!(nav.drill_into(b), Ok(Outcome::Changed));
//! assert!(nav.can_go_back());
//! assert_eq!(nav.go_back(), Outcome::Changed);
//! assert!(!nav.can_go_back());
//! ```

mod drill;
mod event;
mod expand;
mod gesture;
mod interpolate;
mod label;
mod zoom;

pub use drill::{DrillFrame, DrillNavigator};
pub use event::{Modifiers, Outcome, PointerEvent, PointerEventKind};
pub use expand::ExpandCollapseController;
pub use gesture::{DragConfig, DragTracker, Press, Release};
pub use interpolate::{View, ZoomPath};
pub use label::{LabelDisplay, LabelState};
pub use zoom::{ZoomConfig, ZoomNavigator};
