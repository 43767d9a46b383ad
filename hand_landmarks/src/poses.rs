//! Synthetic hand poses.
//!
//! Used by the keyboard/mouse simulation source and by tests.  Each pose
//! fans the four fingers upward from the wrist at a fixed reach, so the
//! openness metric of a pose equals its reach exactly.

use crate::landmark::{HandLandmarks, Landmark, Point2};

/// Reach of each pose (wrist → fingertip, normalized units).
pub const OPEN_REACH:    f32 = 0.45;
pub const RELAXED_REACH: f32 = 0.32;
pub const FIST_REACH:    f32 = 0.15;

/// Finger fan angles in radians from straight up (index, middle, ring, pinky).
const FAN: [f32; 4] = [-0.35, -0.10, 0.15, 0.40];
const THUMB_ANGLE: f32 = -1.0;
const THUMB_RATIO: f32 = 0.6;

/// A named pose the simulator can hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pose {
    Open,
    Relaxed,
    Fist,
    Pinch,
}

impl Pose {
    pub fn build(self, wrist: Point2) -> HandLandmarks {
        match self {
            Pose::Open    => open_palm(wrist),
            Pose::Relaxed => relaxed(wrist),
            Pose::Fist    => fist(wrist),
            Pose::Pinch   => pinch(wrist),
        }
    }
}

fn along(wrist: Point2, angle: f32, dist: f32) -> Point2 {
    Point2::new(wrist.x + angle.sin() * dist, wrist.y - angle.cos() * dist)
}

/// Hand with every finger at `reach` from the wrist.
pub fn with_reach(wrist: Point2, reach: f32) -> HandLandmarks {
    use Landmark::*;
    let thumb = reach * THUMB_RATIO;
    HandLandmarks::from_fn(|role| match role {
        Wrist     => wrist,
        ThumbCmc  => along(wrist, THUMB_ANGLE, thumb * 0.25),
        ThumbMcp  => along(wrist, THUMB_ANGLE, thumb * 0.50),
        ThumbIp   => along(wrist, THUMB_ANGLE, thumb * 0.75),
        ThumbTip  => along(wrist, THUMB_ANGLE, thumb),
        IndexMcp  => along(wrist, FAN[0], reach * 0.35),
        IndexPip  => along(wrist, FAN[0], reach * 0.55),
        IndexDip  => along(wrist, FAN[0], reach * 0.75),
        IndexTip  => along(wrist, FAN[0], reach),
        MiddleMcp => along(wrist, FAN[1], reach * 0.35),
        MiddlePip => along(wrist, FAN[1], reach * 0.55),
        MiddleDip => along(wrist, FAN[1], reach * 0.75),
        MiddleTip => along(wrist, FAN[1], reach),
        RingMcp   => along(wrist, FAN[2], reach * 0.35),
        RingPip   => along(wrist, FAN[2], reach * 0.55),
        RingDip   => along(wrist, FAN[2], reach * 0.75),
        RingTip   => along(wrist, FAN[2], reach),
        PinkyMcp  => along(wrist, FAN[3], reach * 0.35),
        PinkyPip  => along(wrist, FAN[3], reach * 0.55),
        PinkyDip  => along(wrist, FAN[3], reach * 0.75),
        PinkyTip  => along(wrist, FAN[3], reach),
    })
}

pub fn open_palm(wrist: Point2) -> HandLandmarks {
    with_reach(wrist, OPEN_REACH)
}

pub fn relaxed(wrist: Point2) -> HandLandmarks {
    with_reach(wrist, RELAXED_REACH)
}

pub fn fist(wrist: Point2) -> HandLandmarks {
    with_reach(wrist, FIST_REACH)
}

/// Relaxed hand with the thumb tip brought against the index tip.
pub fn pinch(wrist: Point2) -> HandLandmarks {
    let mut hand = relaxed(wrist);
    let index = hand.get(Landmark::IndexTip);
    hand.set(Landmark::ThumbTip, Point2::new(index.x + 0.02, index.y));
    hand
}

/// Two hands whose index tips and thumb tips meet around `center`.
pub fn heart_pair(center: Point2) -> (HandLandmarks, HandLandmarks) {
    let mut left  = relaxed(Point2::new(center.x - 0.15, center.y + 0.25));
    let mut right = relaxed(Point2::new(center.x + 0.15, center.y + 0.25));
    left.set(Landmark::IndexTip,  Point2::new(center.x - 0.02, center.y - 0.05));
    right.set(Landmark::IndexTip, Point2::new(center.x + 0.02, center.y - 0.05));
    left.set(Landmark::ThumbTip,  Point2::new(center.x - 0.02, center.y + 0.08));
    right.set(Landmark::ThumbTip, Point2::new(center.x + 0.02, center.y + 0.08));
    (left, right)
}
