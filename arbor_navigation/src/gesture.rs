// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Telling clicks apart from drags.
//!
//! Hosts usually report a click after every release, including the release
//! that ends a drag. [`DragTracker`] follows one press from down to up and
//! remembers whether the pointer travelled further than
//! [`click_distance`](DragTracker::click_distance) on the way; if it did, the
//! click that follows is swallowed.
//!
//! ```
//! use arbor_navigation::{DragTracker, Release};
//! use kurbo::Point;
//!
//! let mut tracker: DragTracker<u32> = DragTracker::with_click_distance(3.0);
//!
//! tracker.on_down(7, Point::new(10.0, 10.0), 0);
//! assert_eq!(tracker.on_move(Point::new(30.0, 10.0)), Some(7));
//! assert_eq!(tracker.on_up(Point::new(30.0, 10.0)), Release::Drag(7));
//!
//! // The click the host sends after the drag is not a real click.
//! assert!(!tracker.take_click(&7));
//! // The next one is.
//! assert!(tracker.take_click(&7));
//! ```

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Drag recognition settings.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragConfig {
    /// Pointer travel, in pixels, beyond which a press counts as a drag.
    pub click_distance: f64,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            click_distance: 0.0,
        }
    }
}

/// State of the press being tracked.
#[derive(Clone, Debug, PartialEq)]
pub struct Press<K> {
    /// Node the press started on.
    pub target: K,
    /// Pointer position at press time.
    pub down_position: Point,
    /// Timestamp when the press occurred, in milliseconds.
    pub down_time: u64,
    /// True once the pointer has moved beyond the click distance.
    pub distance_exceeded: bool,
}

/// How a press ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Release<K> {
    /// The press stayed put; the following click should go through.
    Click(K),
    /// The press moved; the following click on this target is suppressed.
    Drag(K),
    /// There was no press to end.
    NoPress,
}

/// Click-versus-drag recogniser for a single pointer.
#[derive(Clone, Debug)]
pub struct DragTracker<K> {
    press: Option<Press<K>>,
    suppressed: Option<K>,
    /// Travel beyond which a press is a drag.
    pub click_distance: f64,
}

impl<K: PartialEq + Clone> DragTracker<K> {
    /// A tracker treating any movement as a drag.
    pub fn new() -> Self {
        Self::with_click_distance(DragConfig::default().click_distance)
    }

    /// A tracker tolerating `click_distance` pixels of travel.
    pub fn with_click_distance(click_distance: f64) -> Self {
        Self {
            press: None,
            suppressed: None,
            click_distance,
        }
    }

    /// Record a press on `target`. Any pending suppression is dropped.
    pub fn on_down(&mut self, target: K, position: Point, timestamp: u64) {
        self.suppressed = None;
        self.press = Some(Press {
            target,
            down_position: position,
            down_time: timestamp,
            distance_exceeded: false,
        });
    }

    /// Record pointer movement.
    ///
    /// Returns the press target the first time the click distance is exceeded.
    pub fn on_move(&mut self, position: Point) -> Option<K> {
        let press = self.press.as_mut()?;
        if press.distance_exceeded || press.down_position.distance(position) <= self.click_distance {
            return None;
        }
        press.distance_exceeded = true;
        Some(press.target.clone())
    }

    /// Record the release and classify the press.
    pub fn on_up(&mut self, position: Point) -> Release<K> {
        let Some(press) = self.press.take() else {
            return Release::NoPress;
        };
        if press.distance_exceeded || press.down_position.distance(position) > self.click_distance
        {
            self.suppressed = Some(press.target.clone());
            Release::Drag(press.target)
        } else {
            Release::Click(press.target)
        }
    }

    /// Consume a click on `target`, returning false if it concludes a drag.
    ///
    /// Any pending suppression is cleared either way, so at most one click is
    /// swallowed per drag.
    pub fn take_click(&mut self, target: &K) -> bool {
        self.suppressed.take().as_ref() != Some(target)
    }

    /// Forget the current press without classifying it.
    pub fn cancel(&mut self) -> bool {
        self.press.take().is_some()
    }

    /// The press being tracked, if any.
    pub fn press(&self) -> Option<&Press<K>> {
        self.press.as_ref()
    }

    /// Returns true while a press is active.
    pub fn is_pressed(&self) -> bool {
        self.press.is_some()
    }
}

impl<K: PartialEq + Clone> Default for DragTracker<K> {
    fn default() -> Self {
        Self::new()
    }
}
