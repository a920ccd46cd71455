// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-label visibility state driven by zoom transitions.

use serde::Serialize;

/// Whether a label takes part in layout at all.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelDisplay {
    /// Rendered (possibly fully transparent).
    Inline,
    /// Not rendered.
    #[default]
    Hidden,
}

#[derive(Copy, Clone, Debug, PartialEq)]
struct Fade {
    from: f64,
    to: f64,
    hide_on_end: bool,
}

/// Display mode and opacity of one label, plus any fade in progress.
///
/// A fade toward visibility switches the label inline as soon as it starts; a
/// fade toward transparency hides it only when it ends. Starting a new fade
/// abandons the previous one, whose end never takes effect.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LabelState {
    display: LabelDisplay,
    opacity: f64,
    fade: Option<Fade>,
}

impl LabelState {
    /// An inline, opaque label.
    pub fn shown() -> Self {
        Self {
            display: LabelDisplay::Inline,
            opacity: 1.0,
            fade: None,
        }
    }

    /// A hidden, transparent label.
    pub fn hidden() -> Self {
        Self {
            display: LabelDisplay::Hidden,
            opacity: 0.0,
            fade: None,
        }
    }

    /// Current display mode.
    pub fn display(&self) -> LabelDisplay {
        self.display
    }

    /// Current opacity in `[0, 1]`.
    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    /// Returns true while a fade is in progress.
    pub fn is_fading(&self) -> bool {
        self.fade.is_some()
    }

    /// Start fading toward visible (`show`) or transparent.
    pub(crate) fn begin(&mut self, show: bool) {
        if show {
            self.display = LabelDisplay::Inline;
        }
        self.fade = Some(Fade {
            from: self.opacity,
            to: if show { 1.0 } else { 0.0 },
            hide_on_end: !show,
        });
    }

    /// Apply eased progress `t` of the current fade.
    pub(crate) fn update(&mut self, t: f64) {
        if let Some(fade) = self.fade {
            self.opacity = fade.from + (fade.to - fade.from) * t;
        }
    }

    /// Complete the current fade.
    pub(crate) fn finish(&mut self) {
        if let Some(fade) = self.fade.take() {
            self.opacity = fade.to;
            if fade.hide_on_end {
                self.display = LabelDisplay::Hidden;
            }
        }
    }
}
