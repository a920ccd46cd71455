// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Zoomable circle packing: pack the sample tree, then click into a branch and back out.
//!
//! Run:
//! - `cargo run -p arbor_demos --example pack_zoom`

use arbor_hierarchy::SortOrder;
use arbor_navigation::{Modifiers, PointerEvent, ZoomConfig, ZoomNavigator};
use arbor_pack::PackLayout;
use tracing::info;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    arbor_demos::init_tracing();

    let mut tree = arbor_demos::flare()?;
    tree.sort(SortOrder::ValueDescending);
    let layout = PackLayout::new(960.0).with_margin(20.0).with_padding(2.0);
    let geometry = layout.layout(&tree)?;
    info!(circles = geometry.nodes().len(), "packed");

    let mut nav = ZoomNavigator::new(&tree, geometry, ZoomConfig::default());

    // Click the middle of the largest top-level branch.
    let branch = tree.children_of(tree.root())[0];
    let center = nav
        .geometry()
        .circle(branch)
        .map(|c| c.center)
        .unwrap_or_default();
    let hit = nav.geometry().hit_test(center, 0.0);
    let _ = nav.handle(&PointerEvent::click(hit, center, 0));
    info!(focus = tree.label(nav.focus()), "zooming");

    for now in (0..=750).step_by(125) {
        nav.tick(now);
        let view = nav.view();
        println!(
            "t={now:>4}ms  view=({:7.1}, {:7.1})  diameter={:6.1}",
            view.center.x, view.center.y, view.diameter
        );
    }

    for &child in tree.children_of(branch) {
        if let (Some(screen), Some(label)) = (nav.project_node(child), nav.label(child)) {
            println!(
                "{:<12} screen r={:6.1}  label={:?} opacity={:.2}",
                tree.label(child),
                screen.radius,
                label.display(),
                label.opacity()
            );
        }
    }

    // A background click with Alt held slowly zooms back out to the root.
    let _ = nav.zoom(tree.root(), Modifiers::ALT, 1_000);
    nav.tick(8_500);
    info!(focus = tree.label(nav.focus()), "back at the root");
    Ok(())
}
