// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Collapsible force-directed tree: settle the layout, collapse a branch, settle again.
//!
//! Run:
//! - `cargo run -p arbor_demos --example force_tree`

use arbor_force::ForceConfig;
use arbor_navigation::{DragConfig, ExpandCollapseController, PointerEvent};
use kurbo::Point;
use tracing::info;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    arbor_demos::init_tracing();

    let tree = arbor_demos::flare()?;
    let config = ForceConfig::centered(Point::new(480.0, 250.0));
    let mut chart = ExpandCollapseController::new(tree, config, DragConfig::default());

    let ticks = chart.simulation_mut().run(1_000);
    info!(ticks, nodes = chart.simulation().graph().len(), "settled");

    if let Some(util) = chart.tree().find("util") {
        let at = chart.simulation().position(util).unwrap_or(Point::ORIGIN);
        let _ = chart.handle(&PointerEvent::click(Some(util), at, 0));
        info!(kind = ?chart.node_kind(util), "toggled util");
    }

    let ticks = chart.simulation_mut().run(1_000);
    info!(ticks, nodes = chart.simulation().graph().len(), "settled again");

    println!("{}", serde_json::to_string_pretty(&chart.snapshot())?);
    Ok(())
}
