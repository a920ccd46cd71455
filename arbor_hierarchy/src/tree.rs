// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: arena, derived values, ordering, traversal.

use std::cmp::Ordering;
use std::collections::VecDeque;

use tracing::{debug, trace};

use crate::types::{Branch, Datum, NodeId, SortOrder};

/// A weighted, labeled hierarchy.
///
/// Nodes live in an arena addressed by [`NodeId`]; the root is always
/// [`NodeId::ROOT`]. The shape is fixed once built: the only structural change
/// allowed afterwards is moving a node's children in and out of its hidden
/// slot with [`Tree::collapse`] and [`Tree::expand`].
///
/// Every node carries three derived quantities, computed at construction:
/// - `value`: the node's `size` for leaves, the sum of its children's values otherwise.
/// - `depth`: distance from the root.
/// - `height`: greatest distance to a descendant leaf.
///
/// Values and heights always account for hidden children, so collapsing a
/// branch never changes any aggregate.
///
/// ## Example
///
/// ```rust
/// use arbor_hierarchy::{SortOrder, Tree};
///
/// let mut tree = Tree::from_json_str(
///     r#"{"id": "R", "children": [{"id": "A", "size": 10}, {"id": "B", "size": 30}]}"#,
/// )
/// .unwrap();
/// tree.sort(SortOrder::ValueDescending);
///
/// assert_eq!(tree.value(tree.root()), 40.0);
/// let first = tree.children_of(tree.root())[0];
/// assert_eq!(tree.datum(first).id, "B");
/// ```
#[derive(Clone, Debug)]
pub struct Tree {
    nodes: Vec<Node>,
}

#[derive(Clone, Debug)]
struct Node {
    datum: Datum,
    parent: Option<NodeId>,
    /// Position in the parent's child list.
    sibling: usize,
    branch: Branch,
    depth: u32,
    height: u32,
    value: f64,
}

/// Borrowed view of one node, passed to sort comparators.
#[derive(Copy, Clone, Debug)]
pub struct NodeRef<'a> {
    tree: &'a Tree,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    /// The node's identifier.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The decoded payload.
    pub fn datum(&self) -> &'a Datum {
        &self.tree.node(self.id).datum
    }

    /// Aggregated value.
    pub fn value(&self) -> f64 {
        self.tree.node(self.id).value
    }

    /// Distance from the root.
    pub fn depth(&self) -> u32 {
        self.tree.node(self.id).depth
    }

    /// Distance to the deepest descendant leaf.
    pub fn height(&self) -> u32 {
        self.tree.node(self.id).height
    }
}

impl Tree {
    /// Start an arena with a single root.
    pub(crate) fn with_root(datum: Datum) -> Self {
        Self {
            nodes: vec![Node {
                datum,
                parent: None,
                sibling: 0,
                branch: Branch::Leaf,
                depth: 0,
                height: 0,
                value: 0.0,
            }],
        }
    }

    /// Append a child under `parent`, keeping the parent-before-child index order.
    pub(crate) fn push_child(&mut self, parent: NodeId, datum: Datum) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        let depth = self.node(parent).depth + 1;
        let sibling = self.node(parent).branch.all().len();
        self.nodes.push(Node {
            datum,
            parent: Some(parent),
            sibling,
            branch: Branch::Leaf,
            depth,
            height: 0,
            value: 0.0,
        });
        let branch = &mut self.node_mut(parent).branch;
        match branch {
            Branch::Leaf => *branch = Branch::from_children(vec![id]),
            Branch::Expanded(children) | Branch::Collapsed(children) => children.push(id),
        }
        id
    }

    /// Compute heights and sizes-based values once the arena is complete.
    pub(crate) fn finish(&mut self) {
        self.update_heights();
        self.sum(|datum| datum.size.unwrap_or(0.0));
        debug!(
            nodes = self.nodes.len(),
            height = self.node(NodeId::ROOT).height,
            value = self.node(NodeId::ROOT).value,
            "built hierarchy"
        );
    }

    fn update_heights(&mut self) {
        for idx in (0..self.nodes.len()).rev() {
            let height = self.nodes[idx]
                .branch
                .all()
                .iter()
                .map(|c| self.nodes[c.index()].height + 1)
                .max()
                .unwrap_or(0);
            self.nodes[idx].height = height;
        }
    }

    /// Recompute every value bottom-up from a leaf weight accessor.
    ///
    /// Leaves take `weight(datum)`; internal nodes (collapsed or not) take the
    /// sum of their children. Negative or non-finite weights are treated as zero.
    /// Applying the same accessor twice yields the same values.
    pub fn sum(&mut self, mut weight: impl FnMut(&Datum) -> f64) {
        for idx in (0..self.nodes.len()).rev() {
            let value = match &self.nodes[idx].branch {
                Branch::Leaf => {
                    let w = weight(&self.nodes[idx].datum);
                    if w.is_finite() && w > 0.0 { w } else { 0.0 }
                }
                Branch::Expanded(children) | Branch::Collapsed(children) => {
                    children.iter().map(|c| self.nodes[c.index()].value).sum()
                }
            };
            self.nodes[idx].value = value;
        }
    }

    /// Reorder every sibling list with a comparator.
    ///
    /// The sort is stable: siblings the comparator considers equal keep their
    /// current relative order. Hidden children are sorted too, so expanding a
    /// branch later reveals them in the same order.
    pub fn sort_by(&mut self, mut compare: impl FnMut(NodeRef<'_>, NodeRef<'_>) -> Ordering) {
        for idx in 0..self.nodes.len() {
            let Some(children) = self.nodes[idx].branch.all_mut() else {
                continue;
            };
            let mut children = std::mem::take(children);
            {
                let tree: &Self = self;
                children.sort_by(|&a, &b| compare(NodeRef { tree, id: a }, NodeRef { tree, id: b }));
            }
            for (pos, child) in children.iter().enumerate() {
                self.nodes[child.index()].sibling = pos;
            }
            if let Some(slot) = self.nodes[idx].branch.all_mut() {
                *slot = children;
            }
        }
    }

    /// Reorder every sibling list using a preset.
    pub fn sort(&mut self, order: SortOrder) {
        trace!(?order, "sorting siblings");
        match order {
            SortOrder::ValueThenHeight => self.sort_by(|a, b| {
                desc(a.value(), b.value()).then_with(|| b.height().cmp(&a.height()))
            }),
            SortOrder::ValueDescending => self.sort_by(|a, b| desc(a.value(), b.value())),
            SortOrder::HeightThenValue => self.sort_by(|a, b| {
                b.height()
                    .cmp(&a.height())
                    .then_with(|| desc(a.value(), b.value()))
            }),
            SortOrder::Insertion => {}
        }
    }

    /// The root node.
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Number of nodes, hidden ones included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a tree has at least its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns true if `id` belongs to this tree's arena.
    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    /// Borrowed view of a node, or `None` for an identifier from another tree.
    pub fn get(&self, id: NodeId) -> Option<NodeRef<'_>> {
        self.contains(id).then_some(NodeRef { tree: self, id })
    }

    /// Decoded payload of a node.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this tree.
    pub fn datum(&self, id: NodeId) -> &Datum {
        &self.node(id).datum
    }

    /// Display text of a node.
    pub fn label(&self, id: NodeId) -> &str {
        self.datum(id).label()
    }

    /// Aggregated value of a node.
    pub fn value(&self, id: NodeId) -> f64 {
        self.node(id).value
    }

    /// Distance from the root.
    pub fn depth(&self, id: NodeId) -> u32 {
        self.node(id).depth
    }

    /// Distance to the deepest descendant leaf, hidden ones included.
    pub fn height(&self, id: NodeId) -> u32 {
        self.node(id).height
    }

    /// Branch state of a node.
    pub fn branch(&self, id: NodeId) -> &Branch {
        &self.node(id).branch
    }

    /// Returns the parent of a node, or `None` for the root and foreign ids.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.index()).and_then(|n| n.parent)
    }

    /// Visible children of a node, or an empty slice for leaves, collapsed
    /// nodes and foreign ids.
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id.index())
            .map(|n| n.branch.visible())
            .unwrap_or(&[])
    }

    /// Children parked in the hidden slot of a collapsed node.
    pub fn hidden_children_of(&self, id: NodeId) -> &[NodeId] {
        match self.nodes.get(id.index()).map(|n| &n.branch) {
            Some(Branch::Collapsed(children)) => children,
            _ => &[],
        }
    }

    /// Returns true if a node has no visible children.
    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.children_of(id).is_empty()
    }

    /// Visible nodes in level order: by depth, then sibling order.
    pub fn descendants(&self) -> Vec<NodeId> {
        self.descendants_of(NodeId::ROOT)
    }

    /// Visible nodes of the subtree rooted at `id`, in level order.
    pub fn descendants_of(&self, id: NodeId) -> Vec<NodeId> {
        if !self.contains(id) {
            return Vec::new();
        }
        let mut out = Vec::new();
        let mut queue = VecDeque::from([id]);
        while let Some(next) = queue.pop_front() {
            out.push(next);
            queue.extend(self.children_of(next).iter().copied());
        }
        out
    }

    /// Visible nodes in pre-order, starting at the root.
    pub fn pre_order(&self) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(NodeId::ROOT), |&id| self.next_depth_first(id))
    }

    /// Next visible node in pre-order, or `None` at the end.
    pub fn next_depth_first(&self, current: NodeId) -> Option<NodeId> {
        if !self.contains(current) {
            return None;
        }
        if let Some(&first_child) = self.children_of(current).first() {
            return Some(first_child);
        }
        let mut node = current;
        while let Some(parent) = self.parent_of(node) {
            if let Some(next_sibling) = self.next_sibling(node) {
                return Some(next_sibling);
            }
            node = parent;
        }
        None
    }

    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.parent_of(node)?;
        let pos = self.node(node).sibling;
        self.node(parent).branch.all().get(pos + 1).copied()
    }

    /// The node itself followed by each ancestor up to the root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let start = self.contains(id).then_some(id);
        std::iter::successors(start, |&n| self.parent_of(n))
    }

    /// Visible nodes without visible children, in pre-order.
    pub fn leaves(&self) -> Vec<NodeId> {
        self.pre_order().filter(|&id| self.is_leaf(id)).collect()
    }

    /// Parent-to-child edges between visible nodes, in level order of the child.
    pub fn links(&self) -> Vec<(NodeId, NodeId)> {
        self.descendants()
            .into_iter()
            .filter_map(|child| self.parent_of(child).map(|parent| (parent, child)))
            .collect()
    }

    /// The ancestor of `id` at depth one, or the node itself when it is the
    /// root or a direct child of it.
    ///
    /// Charts color every node of a top-level branch alike.
    pub fn top_ancestor(&self, id: NodeId) -> NodeId {
        self.ancestors(id)
            .find(|&n| self.node(n).depth <= 1)
            .unwrap_or(id)
    }

    /// First node, in arena order, whose id matches.
    pub fn find(&self, id: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.datum.id == id)
            .map(NodeId::new)
    }

    /// Detached copy of the subtree rooted at `id`.
    ///
    /// The copy is re-rooted: depths restart at zero, heights are recomputed,
    /// and values and sibling order are carried over unchanged. Branch state
    /// (collapsed or expanded) is preserved.
    pub fn copy_subtree(&self, id: NodeId) -> Self {
        let mut copy = Self::with_root(self.datum(id).clone());
        let mut collapsed = Vec::new();
        let mut queue = VecDeque::from([(id, NodeId::ROOT)]);
        while let Some((source, target)) = queue.pop_front() {
            copy.node_mut(target).value = self.node(source).value;
            if matches!(self.node(source).branch, Branch::Collapsed(_)) {
                collapsed.push(target);
            }
            for &child in self.node(source).branch.all() {
                let new_child = copy.push_child(target, self.node(child).datum.clone());
                queue.push_back((child, new_child));
            }
        }
        for target in collapsed {
            copy.collapse(target);
        }
        copy.update_heights();
        debug!(
            root = %copy.node(NodeId::ROOT).datum.id,
            nodes = copy.nodes.len(),
            "copied subtree"
        );
        copy
    }

    /// Move a node's children into its hidden slot.
    ///
    /// Returns false, and changes nothing, unless the node is expanded.
    pub fn collapse(&mut self, id: NodeId) -> bool {
        let Some(node) = self.nodes.get_mut(id.index()) else {
            return false;
        };
        if let Branch::Expanded(children) = &mut node.branch {
            let children = std::mem::take(children);
            node.branch = Branch::Collapsed(children);
            true
        } else {
            false
        }
    }

    /// Restore a collapsed node's children from its hidden slot.
    ///
    /// Returns false, and changes nothing, unless the node is collapsed.
    pub fn expand(&mut self, id: NodeId) -> bool {
        let Some(node) = self.nodes.get_mut(id.index()) else {
            return false;
        };
        if let Branch::Collapsed(children) = &mut node.branch {
            let children = std::mem::take(children);
            node.branch = Branch::Expanded(children);
            true
        } else {
            false
        }
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }
}

/// Descending comparison for values that are never NaN.
fn desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Tree {
        Tree::from_json_value(&json!({
            "name": "flare",
            "children": [
                {"name": "a", "children": [
                    {"name": "a1", "size": 3},
                    {"name": "a2", "size": 5}
                ]},
                {"name": "b", "size": 20},
                {"name": "c", "children": [
                    {"name": "c1", "children": [{"name": "c11", "size": 1}]}
                ]}
            ]
        }))
        .unwrap()
    }

    fn ids(tree: &Tree, nodes: &[NodeId]) -> Vec<String> {
        nodes.iter().map(|&n| tree.datum(n).id.clone()).collect()
    }

    #[test]
    fn root_value_is_sum_of_leaf_sizes() {
        let tree = sample();
        let leaves: f64 = tree
            .leaves()
            .iter()
            .map(|&n| tree.datum(n).size.unwrap_or(0.0))
            .sum();
        assert_eq!(tree.value(tree.root()), 29.0);
        assert_eq!(tree.value(tree.root()), leaves);
    }

    #[test]
    fn internal_values_sum_children() {
        let tree = sample();
        for id in tree.descendants() {
            let children = tree.children_of(id);
            if !children.is_empty() {
                let sum: f64 = children.iter().map(|&c| tree.value(c)).sum();
                assert_eq!(tree.value(id), sum, "node {}", tree.datum(id).id);
            }
        }
    }

    #[test]
    fn depth_and_height() {
        let tree = sample();
        let c11 = tree.find("c11").unwrap();
        assert_eq!(tree.depth(c11), 3);
        assert_eq!(tree.height(tree.root()), 3);
        assert_eq!(tree.height(tree.find("a").unwrap()), 1);
        assert_eq!(tree.height(c11), 0);
    }

    #[test]
    fn descendants_are_level_order() {
        let tree = sample();
        assert_eq!(
            ids(&tree, &tree.descendants()),
            ["flare", "a", "b", "c", "a1", "a2", "c1", "c11"]
        );
    }

    #[test]
    fn pre_order_walks_depth_first() {
        let tree = sample();
        let order: Vec<_> = tree.pre_order().collect();
        assert_eq!(
            ids(&tree, &order),
            ["flare", "a", "a1", "a2", "b", "c", "c1", "c11"]
        );
    }

    #[test]
    fn pre_order_follows_sorted_wide_levels() {
        let children: Vec<_> = (0..500)
            .map(|i| json!({"id": format!("n{i}"), "size": (i * 37) % 101}))
            .collect();
        let mut tree = Tree::from_json_value(&json!({"id": "r", "children": children})).unwrap();
        tree.sort(SortOrder::ValueDescending);

        let order: Vec<_> = tree.pre_order().collect();
        assert_eq!(order.len(), 501);
        assert_eq!(order[0], tree.root());
        assert_eq!(&order[1..], tree.children_of(tree.root()));
        assert!(
            order[1..].windows(2).all(|w| tree.value(w[0]) >= tree.value(w[1])),
            "siblings visited in sorted order"
        );

        let copy = tree.copy_subtree(tree.root());
        let copied: Vec<_> = copy.pre_order().map(|n| copy.datum(n).id.clone()).collect();
        assert_eq!(copied, ids(&tree, &order));
    }

    #[test]
    fn default_sort_is_value_then_height() {
        let mut tree = sample();
        tree.sort(SortOrder::default());
        assert_eq!(
            ids(&tree, tree.children_of(tree.root())),
            ["b", "a", "c"]
        );
        let a = tree.find("a").unwrap();
        assert_eq!(ids(&tree, tree.children_of(a)), ["a2", "a1"]);
    }

    #[test]
    fn height_then_value_puts_deep_branches_first() {
        let mut tree = sample();
        tree.sort(SortOrder::HeightThenValue);
        assert_eq!(
            ids(&tree, tree.children_of(tree.root())),
            ["c", "a", "b"]
        );
    }

    #[test]
    fn value_ties_break_by_height_then_insertion() {
        let mut tree = Tree::from_json_value(&json!({
            "id": "r",
            "children": [
                {"id": "x", "size": 4},
                {"id": "y", "children": [{"id": "y1", "size": 4}]},
                {"id": "z", "size": 4}
            ]
        }))
        .unwrap();
        tree.sort(SortOrder::ValueThenHeight);
        assert_eq!(ids(&tree, tree.children_of(tree.root())), ["y", "x", "z"]);
    }

    #[test]
    fn sum_and_sort_are_idempotent() {
        let mut tree = sample();
        tree.sum(|d| d.size.unwrap_or(0.0));
        tree.sort(SortOrder::default());
        let once: Vec<_> = tree.pre_order().map(|n| (n, tree.value(n))).collect();
        tree.sum(|d| d.size.unwrap_or(0.0));
        tree.sort(SortOrder::default());
        let twice: Vec<_> = tree.pre_order().map(|n| (n, tree.value(n))).collect();
        assert_eq!(once, twice);
    }

    #[test]
    fn sum_with_custom_accessor() {
        let mut tree = sample();
        tree.sum(|_| 1.0);
        assert_eq!(tree.value(tree.root()), 4.0, "one per leaf");
    }

    #[test]
    fn links_connect_parents_to_children() {
        let tree = sample();
        let links = tree.links();
        assert_eq!(links.len(), tree.len() - 1);
        for (parent, child) in links {
            assert_eq!(tree.parent_of(child), Some(parent));
        }
    }

    #[test]
    fn top_ancestor_stops_below_root() {
        let tree = sample();
        let c11 = tree.find("c11").unwrap();
        let c = tree.find("c").unwrap();
        assert_eq!(tree.top_ancestor(c11), c);
        assert_eq!(tree.top_ancestor(c), c);
        assert_eq!(tree.top_ancestor(tree.root()), tree.root());
    }

    #[test]
    fn collapse_hides_children_without_changing_values() {
        let mut tree = sample();
        let a = tree.find("a").unwrap();
        assert!(tree.collapse(a));
        assert!(tree.children_of(a).is_empty());
        assert_eq!(tree.hidden_children_of(a).len(), 2);
        assert!(tree.is_leaf(a));
        assert_eq!(tree.value(a), 8.0);
        assert_eq!(tree.descendants().len(), tree.len() - 2);
        assert!(!tree.collapse(a), "already collapsed");

        assert!(tree.expand(a));
        assert_eq!(ids(&tree, tree.children_of(a)), ["a1", "a2"]);
        assert!(!tree.expand(a), "already expanded");
    }

    #[test]
    fn leaves_cannot_collapse() {
        let mut tree = sample();
        let b = tree.find("b").unwrap();
        assert!(!tree.collapse(b));
        assert!(!tree.expand(b));
        assert_eq!(*tree.branch(b), Branch::Leaf);
    }

    #[test]
    fn copy_subtree_rebases_depth() {
        let mut tree = sample();
        tree.sort(SortOrder::default());
        let c = tree.find("c").unwrap();
        let copy = tree.copy_subtree(c);
        assert_eq!(copy.datum(copy.root()).id, "c");
        assert_eq!(copy.len(), 3);
        assert_eq!(copy.value(copy.root()), 1.0);
        assert_eq!(copy.height(copy.root()), 2);
        let c11 = copy.find("c11").unwrap();
        assert_eq!(copy.depth(c11), 2);
        assert_eq!(copy.parent_of(copy.root()), None);
    }

    #[test]
    fn copy_subtree_keeps_order_and_collapse_state() {
        let mut tree = sample();
        tree.sort(SortOrder::default());
        let a = tree.find("a").unwrap();
        let c1 = tree.find("c1").unwrap();
        tree.collapse(c1);
        let copy = tree.copy_subtree(tree.root());
        let copy_a = copy.find("a").unwrap();
        assert_eq!(ids(&copy, copy.children_of(copy_a)), ids(&tree, tree.children_of(a)));
        let copy_c1 = copy.find("c1").unwrap();
        assert!(copy.children_of(copy_c1).is_empty());
        assert_eq!(copy.hidden_children_of(copy_c1).len(), 1);
    }

    #[test]
    fn foreign_ids_are_tolerated_by_queries() {
        let tree = sample();
        let stranger = NodeId::new(1000);
        assert!(!tree.contains(stranger));
        assert!(tree.get(stranger).is_none());
        assert!(tree.children_of(stranger).is_empty());
        assert_eq!(tree.parent_of(stranger), None);
        assert_eq!(tree.ancestors(stranger).count(), 0);
        assert!(tree.descendants_of(stranger).is_empty());
    }
}
