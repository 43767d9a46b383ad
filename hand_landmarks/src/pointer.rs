//! What the pointer means while no hand is visible.

use serde::Deserialize;

use crate::classifier::{GestureState, SENTINEL_POINTER};
use crate::landmark::Point2;

/// Behaviour of the effective pointer on hand loss.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerPolicy {
    /// Keep reporting the last pointer seen with a hand present.
    #[default]
    Freeze,
    /// Report the centre sentinel, so parallax and carousel drift back.
    Recenter,
}

/// Resolves the pointer that downstream motion should follow.
#[derive(Clone, Copy, Debug)]
pub struct PointerTracker {
    policy: PointerPolicy,
    last:   Point2,
}

impl PointerTracker {
    pub fn new(policy: PointerPolicy) -> Self {
        PointerTracker { policy, last: SENTINEL_POINTER }
    }

    pub fn policy(&self) -> PointerPolicy {
        self.policy
    }

    /// Feed the latest gesture and get the pointer to act on.
    pub fn effective(&mut self, gesture: &GestureState) -> Point2 {
        if gesture.hand_present() {
            self.last = gesture.pointer;
            return gesture.pointer;
        }
        match self.policy {
            PointerPolicy::Freeze   => self.last,
            PointerPolicy::Recenter => SENTINEL_POINTER,
        }
    }

    /// Last pointer observed with a hand present.
    pub fn last_live(&self) -> Point2 {
        self.last
    }
}

impl Default for PointerTracker {
    fn default() -> Self {
        PointerTracker::new(PointerPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn live(x: f32, y: f32) -> GestureState {
        GestureState { pointer: Point2::new(x, y), hands: 1, ..GestureState::no_input() }
    }

    #[test]
    fn freeze_holds_last_pointer() {
        let mut t = PointerTracker::new(PointerPolicy::Freeze);
        assert_eq!(t.effective(&live(0.2, 0.3)), Point2::new(0.2, 0.3));
        assert_eq!(t.effective(&GestureState::no_input()), Point2::new(0.2, 0.3));
    }

    #[test]
    fn recenter_returns_sentinel() {
        let mut t = PointerTracker::new(PointerPolicy::Recenter);
        t.effective(&live(0.9, 0.9));
        assert_eq!(t.effective(&GestureState::no_input()), SENTINEL_POINTER);
        assert_eq!(t.last_live(), Point2::new(0.9, 0.9));
    }

    #[test]
    fn default_policy_is_freeze() {
        assert_eq!(PointerTracker::default().policy(), PointerPolicy::Freeze);
    }
}
