//! Application mode state machine.
//!
//! ```text
//!            open               pinch
//!   TREE ──────────▶ SPREAD ──────────▶ ZOOM
//!    ▲                 ▲  ◀──────────────┘
//!    │                 │    release
//!    └──── fist ───────┴──── fist ───────┘
//! ```
//!
//! Rules are evaluated in a fixed priority order and at most one fires per
//! tick.  The two-hand heart never changes mode.

use hand_landmarks::GestureState;
use tracing::debug;

use crate::items::ItemId;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Photos hang on the tree.
    #[default]
    Tree,
    /// Photos spread into a scrollable row.
    Spread,
    /// One photo fills the view.
    Zoom,
}

impl Mode {
    pub fn label(self) -> &'static str {
        match self {
            Mode::Tree   => "TREE",
            Mode::Spread => "SPREAD",
            Mode::Zoom   => "ZOOM",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModeTransition {
    pub from: Mode,
    pub to:   Mode,
}

/// Owns the current mode, the zoomed item and the arrival energy pulse.
#[derive(Clone, Debug)]
pub struct ModeMachine {
    mode:        Mode,
    selected:    Option<ItemId>,
    energy:      f32,
    pulse_decay: f32,
}

impl ModeMachine {
    /// A negative or non-finite `pulse_decay` is treated as its magnitude
    /// or as no decay.
    pub fn new(pulse_decay: f32) -> Self {
        let pulse_decay = if pulse_decay.is_finite() { pulse_decay.abs() } else { 0.0 };
        ModeMachine { mode: Mode::Tree, selected: None, energy: 0.0, pulse_decay }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Item shown in zoom, if any.
    pub fn selected(&self) -> Option<ItemId> {
        self.selected
    }

    pub fn energy(&self) -> f32 {
        self.energy
    }

    /// Apply one tick of gesture input.  `focused` is the carousel's focused
    /// item, captured as the selection when a pinch opens zoom.
    pub fn step(&mut self, g: &GestureState, focused: Option<ItemId>) -> Option<ModeTransition> {
        let from = self.mode;
        let to = if g.is_fist {
            self.selected = None;
            Mode::Tree
        } else if g.is_open && from == Mode::Tree {
            Mode::Spread
        } else if g.is_pinching && from == Mode::Spread {
            self.selected = focused;
            Mode::Zoom
        } else if !g.is_pinching && from == Mode::Zoom {
            Mode::Spread
        } else {
            from
        };

        if to == from {
            return None;
        }
        self.mode = to;
        debug!(target: "mode", %from, %to, selected = ?self.selected, "mode transition");
        Some(ModeTransition { from, to })
    }

    /// Keep the zoom selection on the carousel's focus while zoomed.
    pub fn track_focus(&mut self, focused: Option<ItemId>) {
        if self.mode == Mode::Zoom && self.selected != focused {
            debug!(target: "mode", from = ?self.selected, to = ?focused, "zoom selection follows focus");
            self.selected = focused;
        }
    }

    /// A wish reached the tree top.
    pub fn on_arrival(&mut self) {
        self.energy = 1.0;
    }

    pub fn decay(&mut self, dt: f32) {
        self.energy = (self.energy - self.pulse_decay * dt).clamp(0.0, 1.0);
    }
}

impl Default for ModeMachine {
    fn default() -> Self {
        ModeMachine::new(1.5)
    }
}
