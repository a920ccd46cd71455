// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arbor Force: a deterministic force-directed simulation for node-link diagrams.
//!
//! A [`Simulation`] moves the nodes of a [`Graph`] under three forces:
//!
//! - **Links** act as springs toward a rest length, split between endpoints by degree.
//! - **Many-body** charge repels every pair of nodes.
//! - **Centering** translates the whole layout so its centroid stays put.
//!
//! Forces are scaled by `alpha`, which decays geometrically toward a target on
//! every [`tick`](Simulation::tick); the simulation stops itself once alpha is
//! negligible. Ticks are explicit so hosts drive the simulation from their own
//! frame loop, and all randomness comes from a fixed generator so identical
//! inputs give identical layouts.
//!
//! Keys are any small copyable, hashable type. The simulation knows nothing
//! about hierarchies; a tree view feeds it the visible nodes and parent links
//! and rebuilds the graph with [`Simulation::set_graph`] when branches are
//! expanded or collapsed. Kept nodes carry their state across rebuilds.
//!
//! ## Dragging
//!
//! [`Simulation::drag_start`], [`Simulation::drag`] and [`Simulation::drag_end`]
//! implement the usual protocol: the dragged node is pinned under the pointer
//! while the alpha target is raised so the rest of the layout keeps reacting,
//! and released afterwards.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod config;
mod forces;
mod graph;
mod simulation;

pub use config::ForceConfig;
pub use graph::Graph;
pub use simulation::{LinkRecord, PointRecord, Simulation, Snapshot};
