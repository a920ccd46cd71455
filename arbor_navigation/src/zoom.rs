// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Animated focus navigation over a packed-circle chart.

use arbor_hierarchy::{NodeId, Tree};
use arbor_pack::PackGeometry;
use kurbo::{Circle, Point};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::event::{Modifiers, Outcome, PointerEvent, PointerEventKind};
use crate::interpolate::{View, ZoomPath, ease_cubic_in_out};
use crate::label::{LabelDisplay, LabelState};

/// Zoom timing and framing.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomConfig {
    /// Screen diameter, in pixels, that the focused view fills.
    pub diameter: f64,
    /// Layout-space margin added around the focused circle.
    pub margin: f64,
    /// Transition length in milliseconds.
    pub duration_ms: u64,
    /// Transition length in milliseconds while [`Modifiers::ALT`] is held.
    pub slow_duration_ms: u64,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            diameter: 960.0,
            margin: 20.0,
            duration_ms: 750,
            slow_duration_ms: 7_500,
        }
    }
}

#[derive(Copy, Clone, Debug)]
struct Transition {
    path: ZoomPath,
    start: u64,
    duration: u64,
}

/// Focus and viewport state of a zoomable circle-packing chart.
///
/// The navigator owns the packed geometry and one [`LabelState`] per visible
/// node. [`zoom`](Self::zoom) starts a transition toward a node's circle;
/// [`tick`](Self::tick) advances it to a given time. A zoom issued while a
/// transition is running starts from wherever the view currently is.
#[derive(Clone, Debug)]
pub struct ZoomNavigator {
    config: ZoomConfig,
    geometry: PackGeometry,
    parents: Vec<Option<NodeId>>,
    labels: Vec<Option<LabelState>>,
    root: NodeId,
    focus: NodeId,
    view: View,
    transition: Option<Transition>,
}

impl ZoomNavigator {
    /// Focus the root of a packed tree.
    ///
    /// Labels of the root's children start shown; all others start hidden.
    pub fn new(tree: &Tree, geometry: PackGeometry, config: ZoomConfig) -> Self {
        let root = tree.root();
        let mut parents = vec![None; tree.len()];
        let mut labels = vec![None; tree.len()];
        for node in geometry.nodes() {
            let parent = tree.parent_of(node.id);
            parents[node.id.index()] = parent;
            labels[node.id.index()] = Some(if parent == Some(root) {
                LabelState::shown()
            } else {
                LabelState::hidden()
            });
        }
        let mut navigator = Self {
            config,
            geometry,
            parents,
            labels,
            root,
            focus: root,
            view: View::new(Point::ORIGIN, 1.0),
            transition: None,
        };
        if let Some(view) = navigator.view_of(root) {
            navigator.view = view;
        }
        navigator
    }

    /// The node currently focused (or being zoomed toward).
    pub fn focus(&self) -> NodeId {
        self.focus
    }

    /// The current viewport.
    pub fn view(&self) -> View {
        self.view
    }

    /// Returns true while a transition is in progress.
    pub fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    /// The packed geometry being navigated.
    pub fn geometry(&self) -> &PackGeometry {
        &self.geometry
    }

    /// Label state of a visible node.
    pub fn label(&self, id: NodeId) -> Option<&LabelState> {
        self.labels.get(id.index())?.as_ref()
    }

    /// Viewport that frames `id`, or `None` if it has nothing to frame.
    fn view_of(&self, id: NodeId) -> Option<View> {
        let circle = self.geometry.circle(id)?;
        let diameter = circle.radius * 2.0 + self.config.margin;
        (diameter.is_finite() && diameter > 0.0).then(|| View::new(circle.center, diameter))
    }

    /// Start zooming to `target` at time `now`.
    ///
    /// Holding [`Modifiers::ALT`] selects the slow duration. Zooming to the
    /// current focus, to a node that was not packed, or to a zero-size circle
    /// with no margin around it is a no-op.
    pub fn zoom(&mut self, target: NodeId, modifiers: Modifiers, now: u64) -> Outcome {
        if target == self.focus {
            return Outcome::Noop;
        }
        let Some(to) = self.view_of(target) else {
            return Outcome::Noop;
        };
        // Bring an in-flight transition up to date so the new one starts from
        // the view actually on screen.
        self.tick(now);

        self.focus = target;
        let duration = if modifiers.contains(Modifiers::ALT) {
            self.config.slow_duration_ms
        } else {
            self.config.duration_ms
        };
        let path = ZoomPath::new(self.view, to);
        self.transition = Some(Transition {
            path,
            start: now,
            duration,
        });

        for (parent, label) in self.parents.iter().zip(&mut self.labels) {
            let Some(label) = label else {
                continue;
            };
            let child_of_focus = *parent == Some(target);
            if child_of_focus || label.display() == LabelDisplay::Inline {
                label.begin(child_of_focus);
            }
        }

        debug!(focus = ?target, duration, length = path.length(), "zoom start");
        Outcome::Changed
    }

    /// Route a pointer event.
    ///
    /// A click on any node but the focus zooms to it; a click on the focus or
    /// on the background zooms back out to the root.
    pub fn handle(&mut self, event: &PointerEvent<NodeId>) -> Outcome {
        if event.kind != PointerEventKind::Click {
            return Outcome::Noop;
        }
        let target = match event.target {
            Some(node) if node != self.focus => node,
            _ => self.root,
        };
        self.zoom(target, event.modifiers, event.time)
    }

    /// Advance the transition to time `now`.
    ///
    /// Returns true if the view or any label changed.
    pub fn tick(&mut self, now: u64) -> bool {
        let Some(transition) = self.transition else {
            return false;
        };
        let elapsed = now.saturating_sub(transition.start);
        if elapsed >= transition.duration {
            self.view = transition.path.to();
            for label in self.labels.iter_mut().flatten() {
                label.finish();
            }
            self.transition = None;
            debug!(focus = ?self.focus, "zoom end");
            return true;
        }

        #[allow(
            clippy::cast_precision_loss,
            reason = "durations are far below 2^52 milliseconds."
        )]
        let t = ease_cubic_in_out(elapsed as f64 / transition.duration as f64);
        self.view = transition.path.at(t);
        for label in self.labels.iter_mut().flatten() {
            label.update(t);
        }
        trace!(t, diameter = self.view.diameter, "zoom tick");
        true
    }

    /// Map a layout-space circle to screen space.
    ///
    /// The result is relative to the center of the chart: the viewport center
    /// lands on the origin and the viewport diameter spans
    /// [`ZoomConfig::diameter`] pixels.
    pub fn project(&self, circle: Circle) -> Circle {
        let k = self.config.diameter / self.view.diameter;
        Circle::new(
            ((circle.center - self.view.center) * k).to_point(),
            circle.radius * k,
        )
    }

    /// Screen-space circle of a node.
    pub fn project_node(&self, id: NodeId) -> Option<Circle> {
        Some(self.project(self.geometry.circle(id)?))
    }
}
