// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input events and navigation outcomes.

use kurbo::Point;

bitflags::bitflags! {
    /// Keyboard modifiers held during a pointer event.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Alt (Option) key; slows zoom transitions down tenfold.
        const ALT = 0b0000_0001;
    }
}

/// What happened under the pointer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerEventKind {
    /// Press and release without a drag in between.
    Click,
    /// A press that started a drag.
    DragStart,
    /// Pointer movement while dragging.
    Drag,
    /// Release that ended a drag.
    DragEnd,
}

/// A pointer event routed to a chart.
///
/// `target` is the node under the pointer, or `None` for the background.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent<K> {
    /// Event kind.
    pub kind: PointerEventKind,
    /// Node hit, if any.
    pub target: Option<K>,
    /// Pointer position in chart coordinates.
    pub pointer: Point,
    /// Modifier keys held.
    pub modifiers: Modifiers,
    /// Event time in milliseconds.
    pub time: u64,
}

impl<K> PointerEvent<K> {
    /// A click on `target` (or the background) without modifiers.
    pub fn click(target: Option<K>, pointer: Point, time: u64) -> Self {
        Self {
            kind: PointerEventKind::Click,
            target,
            pointer,
            modifiers: Modifiers::empty(),
            time,
        }
    }

    /// A drag event of the given kind on `target`.
    pub fn drag(kind: PointerEventKind, target: K, pointer: Point, time: u64) -> Self {
        Self {
            kind,
            target: Some(target),
            pointer,
            modifiers: Modifiers::empty(),
            time,
        }
    }

    /// The same event with `modifiers` held.
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// Result of a navigation request.
///
/// Requests that do not apply (drilling into a leaf, going back from the
/// root, toggling a leaf, zooming to the current focus) are not errors; they
/// report [`Outcome::Noop`] and leave all state untouched.
#[must_use]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// View state changed; re-render.
    Changed,
    /// Nothing changed.
    Noop,
}

impl Outcome {
    /// Returns true for [`Outcome::Changed`].
    pub fn changed(self) -> bool {
        matches!(self, Self::Changed)
    }
}
