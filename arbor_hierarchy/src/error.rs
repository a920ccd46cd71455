// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors raised while decoding a hierarchy or laying it out.

use thiserror::Error;

/// The input document does not describe a valid weighted tree.
///
/// Paths use a JSON-pointer-like notation rooted at `$`, for example
/// `$.children[2].children[0]`.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The text is not JSON at all.
    #[error("invalid JSON document: {0}")]
    Json(#[from] serde_json::Error),
    /// A node is not a JSON object.
    #[error("node at {path} is not an object")]
    NotAnObject {
        /// Location of the node.
        path: String,
    },
    /// A node's `children` field is present but not an array.
    #[error("`children` of node at {path} is not an array")]
    ChildrenNotArray {
        /// Location of the node.
        path: String,
    },
    /// A string field holds something other than a string.
    #[error("`{field}` of node at {path} is not a string")]
    FieldNotString {
        /// Location of the node.
        path: String,
        /// Offending field.
        field: &'static str,
    },
    /// A node's `size` is present but not a number.
    #[error("`size` of node at {path} is not a number")]
    SizeNotNumber {
        /// Location of the node.
        path: String,
    },
    /// A node's `size` is below zero.
    #[error("`size` of node at {path} is negative: {size}")]
    NegativeSize {
        /// Location of the node.
        path: String,
        /// The offending size.
        size: f64,
    },
    /// A node's `size` is NaN or infinite.
    #[error("`size` of node at {path} is not finite")]
    NonFiniteSize {
        /// Location of the node.
        path: String,
    },
    /// Two link records share an id.
    #[error("duplicate node id `{0}`")]
    DuplicateId(String),
    /// A link record names a parent that does not exist.
    #[error("node `{id}` references missing parent `{parent}`")]
    MissingParent {
        /// The child record.
        id: String,
        /// The parent it names.
        parent: String,
    },
    /// No link record lacks a parent.
    #[error("no root record")]
    NoRoot,
    /// More than one link record lacks a parent.
    #[error("multiple roots: `{first}` and `{second}`")]
    MultipleRoots {
        /// First root found.
        first: String,
        /// Second root found.
        second: String,
    },
    /// Link records form a cycle that is unreachable from the root.
    #[error("cycle detected through node `{0}`")]
    Cycle(String),
}

/// Numeric input for which a layout is undefined.
///
/// These errors are recoverable: the layouts offer an equal-share fallback
/// that allocates space evenly among the affected siblings instead.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum LayoutError {
    /// A node whose area must be divided has zero total value.
    #[error("node `{id}` has zero total value; its area cannot be divided")]
    ZeroValue {
        /// Id of the node.
        id: String,
    },
    /// A node's value is NaN or infinite.
    #[error("node `{id}` has a non-finite value")]
    NonFiniteValue {
        /// Id of the node.
        id: String,
    },
    /// The target extent is empty, negative, or not finite.
    #[error("layout extent must be finite and positive, got {width} x {height}")]
    InvalidExtent {
        /// Requested width.
        width: f64,
        /// Requested height.
        height: f64,
    },
    /// The requested padding leaves no room for the circles themselves.
    #[error("padding {padding} does not fit inside a square of side {side}")]
    PaddingTooLarge {
        /// Requested padding.
        padding: f64,
        /// Side of the bounding square.
        side: f64,
    },
}
