// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The simulation state machine: alpha schedule, integration, pins and drags.

use alloc::vec::Vec;
use core::f64::consts::PI;
use core::fmt::Debug;
use core::hash::Hash;

use hashbrown::HashMap;
#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Vec2};
use serde::Serialize;
use tracing::{debug, trace};

use crate::config::ForceConfig;
use crate::forces::{Body, Lcg, apply_center, apply_links, apply_many_body};
use crate::graph::Graph;

/// Radius scale of the initial phyllotaxis spiral.
const INITIAL_RADIUS: f64 = 10.0;

#[allow(
    clippy::cast_precision_loss,
    reason = "node counts are far below 2^52."
)]
fn index_f64(i: usize) -> f64 {
    i as f64
}

/// Direction of the `i`-th spiral point; consecutive points are a golden angle apart.
fn golden_direction(i: usize) -> Vec2 {
    Vec2::from_angle(index_f64(i) * PI * (3.0 - 5.0_f64.sqrt()))
}

/// Offset of the `i`-th point on the initial phyllotaxis spiral.
fn spiral(i: usize) -> Vec2 {
    golden_direction(i) * (INITIAL_RADIUS * (0.5 + index_f64(i)).sqrt())
}

/// A force-directed layout over a [`Graph`].
///
/// Each [`tick`](Self::tick) decays `alpha` toward `alpha_target`, applies the
/// link, many-body and centering forces scaled by `alpha`, then integrates:
/// pinned bodies jump to their pin with zero velocity, free bodies move by
/// their damped velocity. Once alpha drops below `alpha_min` the simulation
/// stops and further ticks do nothing until it is restarted.
///
/// ## Example
///
/// ```rust
/// use arbor_force::{ForceConfig, Graph, Simulation};
/// use kurbo::Point;
///
/// let graph = Graph::new(["hub", "a", "b"], [("hub", "a"), ("hub", "b")]);
/// let mut sim = Simulation::new(graph, ForceConfig::centered(Point::new(200.0, 200.0)));
///
/// sim.pin("hub", Point::new(200.0, 200.0));
/// let ticks = sim.run(1_000);
/// assert!(!sim.is_running());
/// assert!(ticks < 1_000);
/// assert_eq!(sim.position("hub"), Some(Point::new(200.0, 200.0)));
/// ```
#[derive(Clone, Debug)]
pub struct Simulation<K> {
    config: ForceConfig,
    graph: Graph<K>,
    bodies: Vec<Body>,
    alpha: f64,
    alpha_target: f64,
    running: bool,
    random: Lcg,
}

impl<K: Copy + Eq + Hash + Debug> Simulation<K> {
    /// Place the graph's nodes on a spiral around the center and start running.
    pub fn new(graph: Graph<K>, config: ForceConfig) -> Self {
        let bodies = (0..graph.len())
            .map(|i| Body::at(config.center + spiral(i)))
            .collect();
        Self {
            config,
            graph,
            bodies,
            alpha: config.alpha_restart,
            alpha_target: 0.0,
            running: true,
            random: Lcg::new(),
        }
    }

    /// Parameters in use.
    pub fn config(&self) -> &ForceConfig {
        &self.config
    }

    /// The current graph.
    pub fn graph(&self) -> &Graph<K> {
        &self.graph
    }

    /// Replace the graph.
    ///
    /// Nodes present in both graphs keep their position, velocity and pin.
    /// A new node starts beside its first neighbour that was already placed,
    /// or on the initial spiral when it has none. Alpha is left unchanged;
    /// call [`restart`](Self::restart) to reheat.
    pub fn set_graph(&mut self, graph: Graph<K>) {
        let previous: HashMap<K, Body> = self
            .graph
            .keys()
            .iter()
            .copied()
            .zip(self.bodies.iter().copied())
            .collect();

        let mut bodies: Vec<Option<Body>> = graph
            .keys()
            .iter()
            .map(|key| previous.get(key).copied())
            .collect();
        let kept = bodies.iter().filter(|b| b.is_some()).count();

        for i in 0..bodies.len() {
            if bodies[i].is_some() {
                continue;
            }
            let anchor = graph.edges.iter().find_map(|&(s, t)| {
                let other = if s == i {
                    t
                } else if t == i {
                    s
                } else {
                    return None;
                };
                bodies[other].map(|b| b.position)
            });
            let position = match anchor {
                Some(anchor) => anchor + golden_direction(i) * INITIAL_RADIUS,
                None => self.config.center + spiral(i),
            };
            bodies[i] = Some(Body::at(position));
        }

        debug!(
            nodes = graph.len(),
            links = graph.link_count(),
            kept,
            "simulation graph replaced"
        );
        self.bodies = bodies.into_iter().flatten().collect();
        self.graph = graph;
    }

    /// Current alpha.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Set alpha directly; zero settles the simulation on its next tick.
    pub fn set_alpha(&mut self, alpha: f64) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }

    /// Value alpha decays toward.
    pub fn alpha_target(&self) -> f64 {
        self.alpha_target
    }

    /// Set the value alpha decays toward.
    pub fn set_alpha_target(&mut self, target: f64) {
        self.alpha_target = target.clamp(0.0, 1.0);
    }

    /// Returns true while ticks still advance the layout.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Reset alpha to the active level and resume ticking.
    pub fn restart(&mut self) {
        self.alpha = self.config.alpha_restart;
        self.running = true;
        debug!(alpha = self.alpha, "simulation restarted");
    }

    /// Halt ticking without touching alpha.
    pub fn stop(&mut self) {
        if self.running {
            self.running = false;
            debug!(alpha = self.alpha, "simulation stopped");
        }
    }

    /// Advance one step. Returns false, doing nothing, when stopped.
    pub fn tick(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.alpha += (self.alpha_target - self.alpha) * self.config.alpha_decay;
        let alpha = self.alpha;

        apply_links(
            &mut self.bodies,
            &self.graph.edges,
            &self.graph.degree,
            self.config.link_distance,
            alpha,
            &mut self.random,
        );
        apply_many_body(
            &mut self.bodies,
            self.config.charge_strength,
            self.config.distance_min,
            alpha,
            &mut self.random,
        );
        apply_center(&mut self.bodies, self.config.center);

        let keep = 1.0 - self.config.velocity_decay;
        for body in &mut self.bodies {
            if let Some(pin) = body.pin {
                body.position = pin;
                body.velocity = Vec2::ZERO;
            } else {
                body.velocity *= keep;
                body.position += body.velocity;
            }
        }
        trace!(alpha, "tick");

        if self.alpha < self.config.alpha_min {
            self.running = false;
            debug!(alpha, "simulation settled");
        }
        true
    }

    /// Tick until stopped or `max_ticks` steps have run; returns the steps taken.
    pub fn run(&mut self, max_ticks: usize) -> usize {
        let mut ticks = 0;
        while ticks < max_ticks && self.tick() {
            ticks += 1;
        }
        ticks
    }

    /// Position of a node.
    pub fn position(&self, key: K) -> Option<Point> {
        Some(self.bodies[self.graph.index_of(key)?].position)
    }

    /// Every node with its position, in graph order.
    pub fn positions(&self) -> impl Iterator<Item = (K, Point)> + '_ {
        self.graph
            .keys()
            .iter()
            .copied()
            .zip(self.bodies.iter().map(|b| b.position))
    }

    /// Hold a node at `at`. It still repels others. Returns false for unknown keys.
    pub fn pin(&mut self, key: K, at: Point) -> bool {
        let Some(i) = self.graph.index_of(key) else {
            return false;
        };
        self.bodies[i].pin = Some(at);
        true
    }

    /// Release a pinned node. Returns false if it was not pinned.
    pub fn unpin(&mut self, key: K) -> bool {
        self.graph
            .index_of(key)
            .and_then(|i| self.bodies[i].pin.take())
            .is_some()
    }

    /// Returns true if the node is pinned.
    pub fn is_pinned(&self, key: K) -> bool {
        self.graph
            .index_of(key)
            .is_some_and(|i| self.bodies[i].pin.is_some())
    }

    /// Begin dragging a node: raise the alpha target, resume if idle, and pin
    /// the node where it is.
    pub fn drag_start(&mut self, key: K) -> bool {
        let Some(at) = self.position(key) else {
            return false;
        };
        self.alpha_target = self.config.drag_alpha_target;
        if !self.running {
            self.running = true;
        }
        debug!(?key, "drag start");
        self.pin(key, at)
    }

    /// Move the dragged node's pin to the pointer.
    pub fn drag(&mut self, key: K, pointer: Point) -> bool {
        self.pin(key, pointer)
    }

    /// Finish dragging: drop the alpha target and release the node.
    pub fn drag_end(&mut self, key: K) -> bool {
        self.alpha_target = 0.0;
        debug!(?key, "drag end");
        self.unpin(key)
    }

    /// Serializable snapshot of positions and links.
    pub fn snapshot(&self) -> Snapshot<K>
    where
        K: Serialize,
    {
        Snapshot {
            nodes: self
                .graph
                .keys()
                .iter()
                .zip(&self.bodies)
                .map(|(&id, body)| PointRecord {
                    id,
                    x: body.position.x,
                    y: body.position.y,
                    pinned: body.pin.is_some(),
                })
                .collect(),
            links: self
                .graph
                .links()
                .map(|(source, target)| LinkRecord { source, target })
                .collect(),
        }
    }
}

/// Node position record.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PointRecord<K> {
    /// Node key.
    pub id: K,
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
    /// Whether the node is pinned.
    pub pinned: bool,
}

/// Link record.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LinkRecord<K> {
    /// Source key.
    pub source: K,
    /// Target key.
    pub target: K,
}

/// Output of [`Simulation::snapshot`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Snapshot<K> {
    /// Nodes in graph order.
    pub nodes: Vec<PointRecord<K>>,
    /// Kept links.
    pub links: Vec<LinkRecord<K>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn star() -> Simulation<u32> {
        let graph = Graph::new(0..5, (1..5).map(|i| (0, i)));
        Simulation::new(graph, ForceConfig::centered(Point::new(50.0, 50.0)))
    }

    #[test]
    fn restart_resets_alpha_and_decay_is_monotonic() {
        let mut sim = star();
        sim.run(40);
        assert!(sim.alpha() < 1.0);
        sim.restart();
        assert_eq!(sim.alpha(), 1.0);
        let mut last = sim.alpha();
        for _ in 0..100 {
            assert!(sim.tick());
            assert!(sim.alpha() < last);
            last = sim.alpha();
        }
    }

    #[test]
    fn settles_after_about_three_hundred_ticks() {
        let mut sim = star();
        let ticks = sim.run(10_000);
        assert!((299..=302).contains(&ticks), "{ticks}");
        assert!(!sim.is_running());
        assert!(!sim.tick());
    }

    #[test]
    fn pinned_nodes_stay_put() {
        let mut sim = star();
        let here = sim.position(3).unwrap();
        assert!(sim.pin(3, here));
        for _ in 0..50 {
            sim.tick();
            assert_eq!(sim.position(3), Some(here));
        }
        assert!(sim.unpin(3));
        assert!(!sim.unpin(3));
    }

    #[test]
    fn stop_halts_ticking() {
        let mut sim = star();
        sim.stop();
        let before: Vec<_> = sim.positions().collect();
        assert!(!sim.tick());
        assert_eq!(sim.positions().collect::<Vec<_>>(), before);
    }

    #[test]
    fn zero_alpha_settles() {
        let mut sim = star();
        sim.set_alpha(0.0);
        assert!(sim.tick());
        assert!(!sim.is_running());
    }

    #[test]
    fn symmetric_pair_keeps_its_centroid() {
        let center = Point::new(10.0, -20.0);
        let mut sim = Simulation::new(Graph::new([1, 2], [(1, 2)]), ForceConfig::centered(center));
        sim.run(500);
        let a = sim.position(1).unwrap();
        let b = sim.position(2).unwrap();
        assert!((a.midpoint(b) - center).hypot() < 1e-6);
        assert!((a - b).hypot() > 1.0);
    }

    #[test]
    fn rebuild_keeps_old_nodes_and_places_new_ones_nearby() {
        let mut sim = Simulation::new(
            Graph::new([0_u32, 1], [(0, 1)]),
            ForceConfig::centered(Point::new(100.0, 100.0)),
        );
        sim.run(50);
        let p0 = sim.position(0).unwrap();
        let p1 = sim.position(1).unwrap();

        sim.set_graph(Graph::new([0, 1, 2, 3], [(0, 1), (1, 2), (2, 3)]));
        assert_eq!(sim.position(0), Some(p0));
        assert_eq!(sim.position(1), Some(p1));
        let p2 = sim.position(2).unwrap();
        assert!((p2 - p1).hypot() <= INITIAL_RADIUS + 1e-9);
        // Node 3 only touches node 2, which was placed just before it.
        let p3 = sim.position(3).unwrap();
        assert!((p3 - p2).hypot() <= INITIAL_RADIUS + 1e-9);
    }

    #[test]
    fn drag_protocol() {
        let mut sim = star();
        sim.run(10_000);
        assert!(!sim.is_running());

        assert!(sim.drag_start(2));
        assert!(sim.is_running());
        assert!(sim.is_pinned(2));
        assert_eq!(sim.alpha_target(), 0.3);

        let pointer = Point::new(-40.0, 7.0);
        assert!(sim.drag(2, pointer));
        sim.tick();
        assert_eq!(sim.position(2), Some(pointer));
        assert!(sim.is_running());

        assert!(sim.drag_end(2));
        assert!(!sim.is_pinned(2));
        assert_eq!(sim.alpha_target(), 0.0);
        assert!(!sim.drag_start(99));
    }

    #[test]
    fn snapshot_lists_nodes_and_links() {
        let sim = Simulation::new(Graph::new(["a", "b"], [("a", "b"), ("b", "a")]), ForceConfig::default());
        let snapshot = sim.snapshot();
        assert_eq!(snapshot.nodes.len(), 2);
        assert_eq!(snapshot.links, [LinkRecord { source: "a", target: "b" }]);
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["links"][0]["source"], "a");
    }
}
