// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Expand/collapse toggling for a force-directed tree.

use arbor_force::{ForceConfig, Graph, Simulation, Snapshot};
use arbor_hierarchy::{BranchKind, NodeId, Tree};
use tracing::{debug, trace};

use crate::event::{Outcome, PointerEvent, PointerEventKind};
use crate::gesture::{DragConfig, DragTracker, Release};

/// Graph of the nodes and parent links currently visible in `tree`.
fn visible_graph(tree: &Tree) -> Graph<NodeId> {
    Graph::new(tree.descendants(), tree.links())
}

/// Owns a tree and the simulation laying out its visible part.
///
/// Toggling a branch moves its children in or out of the hidden slot, rebuilds
/// the simulation graph from the visible nodes and reheats the simulation.
/// Nodes that stay visible keep their positions.
#[derive(Clone, Debug)]
pub struct ExpandCollapseController {
    tree: Tree,
    simulation: Simulation<NodeId>,
    drag: DragTracker<NodeId>,
}

impl ExpandCollapseController {
    /// Start simulating the visible part of `tree`.
    pub fn new(tree: Tree, force: ForceConfig, drag: DragConfig) -> Self {
        let simulation = Simulation::new(visible_graph(&tree), force);
        Self {
            tree,
            simulation,
            drag: DragTracker::with_click_distance(drag.click_distance),
        }
    }

    /// The tree, with its current branch states.
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// The simulation.
    pub fn simulation(&self) -> &Simulation<NodeId> {
        &self.simulation
    }

    /// Mutable access to the simulation, e.g. to stop it.
    pub fn simulation_mut(&mut self) -> &mut Simulation<NodeId> {
        &mut self.simulation
    }

    /// Whether a node is a true leaf, expanded, or collapsed.
    ///
    /// Collapsed nodes have no visible children yet are not leaves; renderers
    /// usually color them differently.
    pub fn node_kind(&self, id: NodeId) -> BranchKind {
        self.tree.branch(id).kind()
    }

    /// Collapse an expanded node or expand a collapsed one.
    ///
    /// True leaves are left alone.
    pub fn toggle(&mut self, id: NodeId) -> Outcome {
        if !self.tree.contains(id) {
            return Outcome::Noop;
        }
        let changed = match self.node_kind(id) {
            BranchKind::Leaf => false,
            BranchKind::Expanded => self.tree.collapse(id),
            BranchKind::Collapsed => self.tree.expand(id),
        };
        if !changed {
            return Outcome::Noop;
        }
        debug!(node = %self.tree.datum(id).id, kind = ?self.node_kind(id), "toggled");
        self.simulation.set_graph(visible_graph(&self.tree));
        self.simulation.restart();
        Outcome::Changed
    }

    /// Route a pointer event.
    ///
    /// Drags move the node under the pointer through the simulation's drag
    /// protocol. Clicks toggle, unless they conclude a drag.
    pub fn handle(&mut self, event: &PointerEvent<NodeId>) -> Outcome {
        let Some(node) = event.target else {
            return Outcome::Noop;
        };
        let changed = match event.kind {
            PointerEventKind::DragStart => {
                self.drag.on_down(node, event.pointer, event.time);
                self.simulation.drag_start(node)
            }
            PointerEventKind::Drag => {
                self.drag.on_move(event.pointer);
                self.simulation.drag(node, event.pointer)
            }
            PointerEventKind::DragEnd => {
                let held = self
                    .drag
                    .press()
                    .map(|press| event.time.saturating_sub(press.down_time));
                match self.drag.on_up(event.pointer) {
                    Release::Drag(target) => debug!(?target, ?held, "drag released"),
                    Release::Click(target) => trace!(?target, ?held, "press released in place"),
                    Release::NoPress => debug!(?node, "release without a tracked press"),
                }
                self.simulation.drag_end(node)
            }
            PointerEventKind::Click => {
                if !self.drag.take_click(&node) {
                    debug!(?node, "click after drag ignored");
                    return Outcome::Noop;
                }
                return self.toggle(node);
            }
        };
        if changed {
            Outcome::Changed
        } else {
            Outcome::Noop
        }
    }

    /// Advance the simulation one step.
    pub fn tick(&mut self) -> bool {
        self.simulation.tick()
    }

    /// Positions and links of the visible nodes.
    pub fn snapshot(&self) -> Snapshot<NodeId> {
        self.simulation.snapshot()
    }
}
