// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drill-down icicle: partition the sample tree, drill into a branch, and go back.
//!
//! Run:
//! - `cargo run -p arbor_demos --example drill_partition`

use arbor_hierarchy::SortOrder;
use arbor_navigation::DrillNavigator;
use arbor_partition::PartitionLayout;

fn print_frame(nav: &DrillNavigator) {
    let frame = nav.current();
    let crumbs: Vec<&str> = nav.breadcrumbs().collect();
    println!("== {} (back enabled: {})", crumbs.join(" / "), nav.can_go_back());
    for record in frame.geometry().records(frame.tree()).iter().take(8) {
        println!(
            "  [{:>4} {:>4} {:>4} {:>4}] {}",
            record.x0,
            record.y0,
            record.x1,
            record.y1,
            record.label.replace('\n', " = ")
        );
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    arbor_demos::init_tracing();

    let mut tree = arbor_demos::flare()?;
    tree.sort(SortOrder::HeightThenValue);
    let layout = PartitionLayout::new(960.0, 500.0).with_padding(1.0);
    let mut nav = DrillNavigator::new(tree, layout)?;
    print_frame(&nav);

    let analytics = nav.current().tree().find("analytics");
    if let Some(node) = analytics {
        let _ = nav.drill_into(node)?;
        print_frame(&nav);
    }

    let _ = nav.go_back();
    print_frame(&nav);
    Ok(())
}
