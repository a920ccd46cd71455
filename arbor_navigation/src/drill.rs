// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drill-down history over a partition chart.

use arbor_hierarchy::{LayoutError, NodeId, Tree};
use arbor_partition::{PartitionGeometry, PartitionLayout};
use tracing::debug;

use crate::event::{Outcome, PointerEvent, PointerEventKind};

/// One entry of the drill-down history: a detached subtree and its layout.
#[derive(Clone, Debug)]
pub struct DrillFrame {
    tree: Tree,
    geometry: PartitionGeometry,
}

impl DrillFrame {
    fn new(tree: Tree, layout: &PartitionLayout) -> Result<Self, LayoutError> {
        let geometry = layout.layout(&tree)?;
        Ok(Self { tree, geometry })
    }

    /// The subtree shown by this frame, re-rooted at its top node.
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Partition of [`tree`](Self::tree).
    pub fn geometry(&self) -> &PartitionGeometry {
        &self.geometry
    }

    /// Id of the frame's root node.
    pub fn root_id(&self) -> &str {
        &self.tree.datum(self.tree.root()).id
    }
}

/// History stack for a drill-down partition chart.
///
/// The bottom frame always shows the full tree. Drilling into a node lays out
/// a detached copy of its subtree and pushes it; going back pops. The back
/// control should be enabled exactly when [`can_go_back`](Self::can_go_back).
#[derive(Clone, Debug)]
pub struct DrillNavigator {
    layout: PartitionLayout,
    stack: Vec<DrillFrame>,
}

impl DrillNavigator {
    /// Lay out `tree` and make it the bottom of the history.
    pub fn new(tree: Tree, layout: PartitionLayout) -> Result<Self, LayoutError> {
        let root = DrillFrame::new(tree, &layout)?;
        Ok(Self {
            layout,
            stack: vec![root],
        })
    }

    /// The frame on screen.
    pub fn current(&self) -> &DrillFrame {
        // The stack is never empty: `go_back` keeps the bottom frame.
        &self.stack[self.stack.len() - 1]
    }

    /// Number of frames in the history.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Returns true when there is a frame to go back to.
    pub fn can_go_back(&self) -> bool {
        self.stack.len() > 1
    }

    /// Root ids of every frame, bottom first.
    pub fn breadcrumbs(&self) -> impl Iterator<Item = &str> + '_ {
        self.stack.iter().map(DrillFrame::root_id)
    }

    /// Drill into `node` of the current frame.
    ///
    /// Leaves are ignored. Re-entering the subtree already on top lays it out
    /// again but does not grow the history. Layout failures leave the history
    /// untouched.
    pub fn drill_into(&mut self, node: NodeId) -> Result<Outcome, LayoutError> {
        let current = self.current();
        if !current.tree.contains(node) || current.tree.is_leaf(node) {
            return Ok(Outcome::Noop);
        }
        let frame = DrillFrame::new(current.tree.copy_subtree(node), &self.layout)?;
        if frame.root_id() == current.root_id() {
            return Ok(Outcome::Noop);
        }
        debug!(root = frame.root_id(), depth = self.stack.len() + 1, "drill into");
        self.stack.push(frame);
        Ok(Outcome::Changed)
    }

    /// Return to the previous frame. A no-op at the bottom of the history.
    pub fn go_back(&mut self) -> Outcome {
        if !self.can_go_back() {
            return Outcome::Noop;
        }
        self.stack.pop();
        debug!(root = self.current().root_id(), depth = self.stack.len(), "go back");
        Outcome::Changed
    }

    /// Route a pointer event: clicks on nodes of the current frame drill in.
    pub fn handle(&mut self, event: &PointerEvent<NodeId>) -> Result<Outcome, LayoutError> {
        match (event.kind, event.target) {
            (PointerEventKind::Click, Some(node)) => self.drill_into(node),
            _ => Ok(Outcome::Noop),
        }
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Point;
    use serde_json::json;

    use super::*;

    fn navigator() -> DrillNavigator {
        let tree = Tree::from_json_value(&json!({
            "id": "R",
            "children": [
                {"id": "A", "size": 10},
                {"id": "B", "children": [{"id": "B1", "size": 20}, {"id": "B2", "size": 10}]}
            ]
        }))
        .unwrap();
        DrillNavigator::new(tree, PartitionLayout::new(100.0, 100.0).with_padding(0.0)).unwrap()
    }

    #[test]
    fn drill_and_back_round_trip() {
        let mut nav = navigator();
        let before = nav.current().geometry().nodes().to_vec();
        assert!(!nav.can_go_back());

        let b = nav.current().tree().find("B").unwrap();
        assert_eq!(nav.drill_into(b), Ok(Outcome::Changed));
        assert_eq!(nav.depth(), 2);
        assert!(nav.can_go_back());
        assert_eq!(nav.current().root_id(), "B");
        // The subtree now fills the whole chart.
        let frame = nav.current();
        assert_eq!(frame.geometry().value_extent(frame.tree().root()), Some((0.0, 100.0)));

        assert_eq!(nav.go_back(), Outcome::Changed);
        assert_eq!(nav.current().root_id(), "R");
        assert_eq!(nav.current().geometry().nodes(), &before[..]);
        assert!(!nav.can_go_back());
    }

    #[test]
    fn going_back_unwinds_every_level() {
        let tree = Tree::from_json_value(&json!({
            "id": "root",
            "children": [
                {"id": "a", "children": [
                    {"id": "a1", "children": [
                        {"id": "a1x", "children": [
                            {"id": "a1x1", "size": 2},
                            {"id": "a1x2", "size": 1}
                        ]},
                        {"id": "a1y", "size": 4}
                    ]},
                    {"id": "a2", "size": 3}
                ]},
                {"id": "b", "size": 5}
            ]
        }))
        .unwrap();
        let mut nav = DrillNavigator::new(tree, PartitionLayout::new(200.0, 100.0)).unwrap();
        let bottom = nav.current().geometry().nodes().to_vec();

        for (step, id) in ["a", "a1", "a1x"].into_iter().enumerate() {
            let node = nav.current().tree().find(id).unwrap();
            assert_eq!(nav.drill_into(node), Ok(Outcome::Changed));
            assert_eq!(nav.depth(), step + 2);
            assert_eq!(nav.current().root_id(), id);
        }
        assert_eq!(
            nav.breadcrumbs().collect::<Vec<_>>(),
            ["root", "a", "a1", "a1x"]
        );

        for expected in ["a1", "a", "root"] {
            assert!(nav.can_go_back());
            assert_eq!(nav.go_back(), Outcome::Changed);
            assert_eq!(nav.current().root_id(), expected);
        }
        assert!(!nav.can_go_back());
        assert_eq!(nav.current().geometry().nodes(), &bottom[..]);

        assert_eq!(nav.go_back(), Outcome::Noop);
        assert_eq!(nav.depth(), 1);
        assert_eq!(nav.current().root_id(), "root");
    }

    #[test]
    fn reentering_the_top_does_not_push() {
        let mut nav = navigator();
        let b = nav.current().tree().find("B").unwrap();
        let _ = nav.drill_into(b).unwrap();
        let top = nav.current().tree().root();
        assert_eq!(nav.drill_into(top), Ok(Outcome::Noop));
        assert_eq!(nav.depth(), 2);
        assert_eq!(nav.breadcrumbs().collect::<Vec<_>>(), ["R", "B"]);
    }

    #[test]
    fn leaves_and_bottom_are_noops() {
        let mut nav = navigator();
        let a = nav.current().tree().find("A").unwrap();
        assert_eq!(nav.drill_into(a), Ok(Outcome::Noop));
        assert_eq!(nav.go_back(), Outcome::Noop);
        assert_eq!(nav.depth(), 1);
    }

    #[test]
    fn clicking_the_root_at_the_bottom_is_idempotent() {
        let mut nav = navigator();
        let root = nav.current().tree().root();
        let click = PointerEvent::click(Some(root), Point::ORIGIN, 0);
        assert_eq!(nav.handle(&click), Ok(Outcome::Noop));
        assert_eq!(nav.handle(&PointerEvent::click(None, Point::ORIGIN, 0)), Ok(Outcome::Noop));
        assert_eq!(nav.depth(), 1);
    }

    #[test]
    fn layout_errors_leave_history_alone() {
        let tree = Tree::from_json_value(&json!({
            "id": "R",
            "children": [{"id": "A", "size": 1}, {"id": "Z", "children": [{"id": "Z1"}]}]
        }))
        .unwrap();
        let mut nav = DrillNavigator::new(tree, PartitionLayout::new(50.0, 50.0)).unwrap();
        let z = nav.current().tree().find("Z").unwrap();
        assert!(matches!(nav.drill_into(z), Err(LayoutError::ZeroValue { .. })));
        assert_eq!(nav.depth(), 1);
    }
}
