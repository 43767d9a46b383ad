//! Inertial carousel over the photo row.
//!
//! Horizontal hand motion is integrated into a velocity that decays every
//! tick, so a quick swipe coasts across several photos and a still hand
//! lets the row settle.  Position is continuous; the focused photo is the
//! nearest index.
//!
//! Per tick in `Spread`/`Zoom`:
//!
//! ```text
//!   dx        = pointer_x − previous pointer_x
//!   velocity += dx · gain
//!   velocity *= damping
//!   position += velocity · dt          (then clamped to [0, count − 1])
//! ```
//!
//! Only the position is clamped; velocity carries on and is damped away.

use tracing::debug;

use crate::config::CarouselConfig;
use crate::mode::{Mode, ModeTransition};

/// Focus moved from `previous` to `current`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FocusEvent {
    pub previous: Option<usize>,
    pub current:  Option<usize>,
}

#[derive(Clone, Debug)]
pub struct Carousel {
    position:   f32,
    velocity:   f32,
    prev_x:     f32,
    last_focus: Option<usize>,
    tree_focus: Option<usize>,
    cfg:        CarouselConfig,
}

fn max_position(count: usize) -> f32 {
    count.saturating_sub(1) as f32
}

impl Carousel {
    pub fn new(cfg: CarouselConfig) -> Self {
        Carousel {
            position:   0.0,
            velocity:   0.0,
            prev_x:     0.5,
            last_focus: None,
            tree_focus: None,
            cfg,
        }
    }

    pub fn position(&self) -> f32 {
        self.position
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    /// Nearest index to the scroll position, `None` when there are no items.
    pub fn focused_index(&self, count: usize) -> Option<usize> {
        if count == 0 {
            return None;
        }
        let i = self.position.round().max(0.0) as usize;
        Some(i.min(count - 1))
    }

    /// Photo the hand pointed at while in tree mode, if pre-locking is on.
    pub fn tree_focus(&self) -> Option<usize> {
        self.tree_focus
    }

    /// Reset motion on a mode change so the first tick in the new mode sees
    /// no pointer jump.  Position is kept.
    pub fn on_mode_change(&mut self, t: ModeTransition, pointer_x: f32, count: usize) {
        self.velocity = 0.0;
        self.prev_x = pointer_x;

        match (t.from, t.to) {
            (Mode::Tree, Mode::Spread) => {
                if let Some(i) = self.tree_focus.take() {
                    self.position = (i as f32).min(max_position(count));
                    debug!(target: "carousel", index = i, "gallery opened at tree focus");
                }
            }
            (_, Mode::Tree) => self.tree_focus = None,
            _ => {}
        }
    }

    /// Snap to `target`, clamped to the collection.  Calling twice with the
    /// same target leaves the same state.
    pub fn on_jump(&mut self, target: usize, count: usize) {
        self.position = (target as f32).min(max_position(count));
        self.velocity = 0.0;
    }

    /// Advance one tick.  Returns the focus change, if any.
    pub fn tick(
        &mut self,
        mode:         Mode,
        pointer_x:    f32,
        hand_present: bool,
        count:        usize,
        dt:           f32,
    ) -> Option<FocusEvent> {
        match mode {
            Mode::Tree => {
                if self.cfg.inherit_tree_focus && hand_present && count > 0 {
                    let i = (pointer_x * count as f32).floor().max(0.0) as usize;
                    self.tree_focus = Some(i.min(count - 1));
                }
            }
            Mode::Spread | Mode::Zoom => {
                if count == 0 {
                    self.velocity = 0.0;
                } else {
                    let dx = pointer_x - self.prev_x;
                    self.velocity += dx * self.cfg.gain;
                    self.velocity *= self.cfg.damping;
                    self.position += self.velocity * dt;
                }
                self.prev_x = pointer_x;
            }
        }
        self.position = self.position.clamp(0.0, max_position(count));

        let focus = self.focused_index(count);
        if focus == self.last_focus {
            return None;
        }
        let ev = FocusEvent { previous: self.last_focus, current: focus };
        self.last_focus = focus;
        debug!(target: "carousel", previous = ?ev.previous, current = ?ev.current, "focus changed");
        Some(ev)
    }
}

impl Default for Carousel {
    fn default() -> Self {
        Carousel::new(CarouselConfig::default())
    }
}
