// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulation parameters.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Parameters of a [`Simulation`](crate::Simulation).
///
/// The defaults reproduce the conventional force-directed setup: alpha decays
/// from 1 to `alpha_min` in about 300 ticks, velocities lose 40% per tick,
/// every node repels every other with strength -30, and links pull toward a
/// length of 30.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForceConfig {
    /// Alpha assigned by [`Simulation::restart`](crate::Simulation::restart).
    pub alpha_restart: f64,
    /// The simulation stops once alpha falls below this.
    pub alpha_min: f64,
    /// Fraction of the gap to the alpha target closed per tick.
    pub alpha_decay: f64,
    /// Fraction of velocity lost per tick.
    pub velocity_decay: f64,
    /// Many-body strength; negative repels.
    pub charge_strength: f64,
    /// Distances below this are clamped when computing repulsion.
    pub distance_min: f64,
    /// Rest length of every link.
    pub link_distance: f64,
    /// Point the centroid is held at.
    pub center: Point,
    /// Alpha target while a node is being dragged.
    pub drag_alpha_target: f64,
}

impl Default for ForceConfig {
    fn default() -> Self {
        let alpha_min = 0.001;
        Self {
            alpha_restart: 1.0,
            alpha_min,
            alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
            velocity_decay: 0.4,
            charge_strength: -30.0,
            distance_min: 1.0,
            link_distance: 30.0,
            center: Point::ORIGIN,
            drag_alpha_target: 0.3,
        }
    }
}

impl ForceConfig {
    /// Default parameters centered on `center`.
    pub fn centered(center: Point) -> Self {
        Self {
            center,
            ..Self::default()
        }
    }

    /// Set the many-body strength.
    #[must_use]
    pub fn with_charge_strength(mut self, strength: f64) -> Self {
        self.charge_strength = strength;
        self
    }

    /// Set the link rest length.
    #[must_use]
    pub fn with_link_distance(mut self, distance: f64) -> Self {
        self.link_distance = distance;
        self
    }

    /// Set the per-tick velocity loss.
    #[must_use]
    pub fn with_velocity_decay(mut self, decay: f64) -> Self {
        self.velocity_decay = decay.clamp(0.0, 1.0);
        self
    }

    /// Set the per-tick alpha decay.
    #[must_use]
    pub fn with_alpha_decay(mut self, decay: f64) -> Self {
        self.alpha_decay = decay.clamp(0.0, 1.0);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alpha_reaches_min_in_three_hundred_ticks() {
        let config = ForceConfig::default();
        let alpha = (1.0 - config.alpha_decay).powi(300);
        assert!((alpha - config.alpha_min).abs() < 1e-12);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: ForceConfig =
            serde_json::from_str(r#"{"link_distance": 60.0, "center": {"x": 5.0, "y": 6.0}}"#)
                .unwrap();
        assert_eq!(config.link_distance, 60.0);
        assert_eq!(config.center, Point::new(5.0, 6.0));
        assert_eq!(config.charge_strength, -30.0);
    }
}
