//! Gesture classifier — one [`LandmarkFrame`] in, one [`GestureState`] out.
//!
//! Stateless: every call recomputes the whole [`GestureState`] from the
//! frame it is given.

use crate::landmark::{HandLandmarks, Landmark, LandmarkFrame, Point2};

// ════════════════════════════════════════════════════════════════════════════
// Thresholds (normalized image space)
// ════════════════════════════════════════════════════════════════════════════

/// Mean wrist → fingertip distance above which the hand is open.
pub const OPEN_THRESHOLD:  f32 = 0.4;
/// Mean wrist → fingertip distance below which the hand is a fist.
pub const FIST_THRESHOLD:  f32 = 0.25;
/// Thumb tip ↔ index tip distance below which the hand pinches.
pub const PINCH_THRESHOLD: f32 = 0.05;
/// Cross-hand index-tip and thumb-tip distance below which two hands form a heart.
pub const HEART_THRESHOLD: f32 = 0.1;

/// Pointer reported when no hand is present.  A "no input" marker, not a
/// command to recenter anything.
pub const SENTINEL_POINTER: Point2 = Point2::new(0.5, 0.5);

// ════════════════════════════════════════════════════════════════════════════
// GestureState
// ════════════════════════════════════════════════════════════════════════════

/// Per-frame gesture classification.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureState {
    pub is_open:     bool,
    pub is_fist:     bool,
    pub is_pinching: bool,
    pub is_heart:    bool,
    /// Wrist of the first hand, or [`SENTINEL_POINTER`] when `hands == 0`.
    pub pointer:     Point2,
    /// Number of hands the frame carried.
    pub hands:       u8,
}

impl GestureState {
    /// The "no hand detected" state.
    pub const fn no_input() -> Self {
        GestureState {
            is_open:     false,
            is_fist:     false,
            is_pinching: false,
            is_heart:    false,
            pointer:     SENTINEL_POINTER,
            hands:       0,
        }
    }

    pub fn hand_present(&self) -> bool {
        self.hands > 0
    }

    /// Short label for status lines.
    pub fn label(&self) -> &'static str {
        if self.is_heart          { "Heart" }
        else if self.is_fist      { "Fist" }
        else if self.is_pinching  { "Pinch" }
        else if self.is_open      { "Palm" }
        else if self.hand_present() { "Hand" }
        else                      { "None" }
    }
}

impl Default for GestureState {
    fn default() -> Self {
        GestureState::no_input()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// classify
// ════════════════════════════════════════════════════════════════════════════

/// Mean distance from the wrist to the four non-thumb fingertips.
pub fn openness(hand: &HandLandmarks) -> f32 {
    let wrist = hand.wrist();
    let sum: f32 = Landmark::FINGERTIPS
        .iter()
        .map(|&tip| wrist.distance(&hand.get(tip)))
        .sum();
    sum / Landmark::FINGERTIPS.len() as f32
}

fn is_pinching(hand: &HandLandmarks) -> bool {
    hand.get(Landmark::ThumbTip).distance(&hand.get(Landmark::IndexTip)) < PINCH_THRESHOLD
}

fn is_heart(frame: &LandmarkFrame) -> bool {
    let (a, b) = match frame.hands() {
        [a, b] => (a, b),
        _      => return false,
    };
    let index_gap = a.get(Landmark::IndexTip).distance(&b.get(Landmark::IndexTip));
    let thumb_gap = a.get(Landmark::ThumbTip).distance(&b.get(Landmark::ThumbTip));
    index_gap < HEART_THRESHOLD && thumb_gap < HEART_THRESHOLD
}

/// Classify one frame.
pub fn classify(frame: &LandmarkFrame) -> GestureState {
    let first = match frame.first() {
        Some(h) => h,
        None    => return GestureState::no_input(),
    };

    let open = openness(first);

    GestureState {
        is_open:     open > OPEN_THRESHOLD,
        is_fist:     open < FIST_THRESHOLD,
        is_pinching: is_pinching(first),
        is_heart:    is_heart(frame),
        pointer:     first.wrist(),
        hands:       frame.hand_count() as u8,
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poses;

    fn frame(hands: Vec<HandLandmarks>) -> LandmarkFrame {
        LandmarkFrame::new(0, hands).unwrap()
    }

    #[test]
    fn no_hands_is_sentinel() {
        let g = classify(&LandmarkFrame::empty(3));
        assert_eq!(g, GestureState::no_input());
        assert_eq!(g.pointer, SENTINEL_POINTER);
        assert!(!g.is_open && !g.is_fist && !g.is_pinching && !g.is_heart);
    }

    #[test]
    fn pointer_is_first_wrist() {
        let w = Point2::new(0.31, 0.72);
        let g = classify(&frame(vec![poses::relaxed(w)]));
        assert_eq!(g.pointer, w);
        assert_eq!(g.hands, 1);
    }

    #[test]
    fn open_palm_detected() {
        let g = classify(&frame(vec![poses::open_palm(Point2::new(0.5, 0.8))]));
        assert!(g.is_open);
        assert!(!g.is_fist);
    }

    #[test]
    fn fist_detected() {
        let g = classify(&frame(vec![poses::fist(Point2::new(0.5, 0.8))]));
        assert!(g.is_fist);
        assert!(!g.is_open);
    }

    #[test]
    fn hysteresis_band_is_neither() {
        let hand = poses::relaxed(Point2::new(0.5, 0.8));
        let o = openness(&hand);
        assert!(o > FIST_THRESHOLD && o < OPEN_THRESHOLD, "openness {o}");
        let g = classify(&frame(vec![hand]));
        assert!(!g.is_open && !g.is_fist);
    }

    #[test]
    fn pinch_detected_on_first_hand_only() {
        let pinch = poses::pinch(Point2::new(0.5, 0.8));
        let relaxed = poses::relaxed(Point2::new(0.3, 0.8));
        assert!(classify(&frame(vec![pinch.clone()])).is_pinching);
        assert!(!classify(&frame(vec![relaxed, pinch])).is_pinching);
    }

    #[test]
    fn heart_needs_two_hands() {
        let (a, b) = poses::heart_pair(Point2::new(0.5, 0.5));
        assert!(classify(&frame(vec![a.clone(), b])).is_heart);
        // One hand of the pair alone can never be a heart.
        assert!(!classify(&frame(vec![a])).is_heart);
    }

    #[test]
    fn two_apart_hands_are_not_heart() {
        let a = poses::relaxed(Point2::new(0.2, 0.8));
        let b = poses::relaxed(Point2::new(0.8, 0.8));
        assert!(!classify(&frame(vec![a, b])).is_heart);
    }

    #[test]
    fn labels() {
        assert_eq!(GestureState::no_input().label(), "None");
        let g = classify(&frame(vec![poses::fist(Point2::new(0.5, 0.5))]));
        assert_eq!(g.label(), "Fist");
    }
}
