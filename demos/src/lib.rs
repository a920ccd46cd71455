// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared setup for the Arbor demos.
//!
//! Run:
//! - `cargo run -p arbor_demos --example pack_zoom`
//! - `cargo run -p arbor_demos --example drill_partition`
//! - `cargo run -p arbor_demos --example force_tree`
//!
//! Set `RUST_LOG=debug` (or `trace`) to watch layout passes and navigation
//! transitions.

use arbor_hierarchy::{Tree, ValidationError};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Sample hierarchy: a slice of the Flare class tree, sized by source bytes.
pub const FLARE: &str = include_str!("../data/flare.json");

/// Install a stderr subscriber filtered by `RUST_LOG` (default `info`).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_filter(filter),
    );
    if let Err(e) = subscriber.try_init() {
        eprintln!("Error: Failed to set up logging: {e}");
    }
}

/// Parse the bundled sample.
pub fn flare() -> Result<Tree, ValidationError> {
    Tree::from_json_str(FLARE)
}
