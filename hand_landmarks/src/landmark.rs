//! Landmark roles, points, and per-frame hand data.

use thiserror::Error;
use tracing::warn;

/// Number of landmarks tracked per hand.
pub const LANDMARK_COUNT: usize = 21;

/// Maximum number of hands carried by one frame.
pub const MAX_HANDS: usize = 2;

// ════════════════════════════════════════════════════════════════════════════
// Landmark — named roles mapped once to detector indices
// ════════════════════════════════════════════════════════════════════════════

/// Skeletal role of one hand landmark.
///
/// The discriminant is the detector's fixed index for that role; nothing
/// else in the workspace indexes a hand by raw number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Landmark {
    Wrist      = 0,
    ThumbCmc   = 1,
    ThumbMcp   = 2,
    ThumbIp    = 3,
    ThumbTip   = 4,
    IndexMcp   = 5,
    IndexPip   = 6,
    IndexDip   = 7,
    IndexTip   = 8,
    MiddleMcp  = 9,
    MiddlePip  = 10,
    MiddleDip  = 11,
    MiddleTip  = 12,
    RingMcp    = 13,
    RingPip    = 14,
    RingDip    = 15,
    RingTip    = 16,
    PinkyMcp   = 17,
    PinkyPip   = 18,
    PinkyDip   = 19,
    PinkyTip   = 20,
}

impl Landmark {
    /// All roles in index order.
    pub const ALL: [Landmark; LANDMARK_COUNT] = [
        Landmark::Wrist,
        Landmark::ThumbCmc, Landmark::ThumbMcp, Landmark::ThumbIp, Landmark::ThumbTip,
        Landmark::IndexMcp, Landmark::IndexPip, Landmark::IndexDip, Landmark::IndexTip,
        Landmark::MiddleMcp, Landmark::MiddlePip, Landmark::MiddleDip, Landmark::MiddleTip,
        Landmark::RingMcp, Landmark::RingPip, Landmark::RingDip, Landmark::RingTip,
        Landmark::PinkyMcp, Landmark::PinkyPip, Landmark::PinkyDip, Landmark::PinkyTip,
    ];

    /// The four non-thumb fingertips used for the openness metric.
    pub const FINGERTIPS: [Landmark; 4] = [
        Landmark::IndexTip,
        Landmark::MiddleTip,
        Landmark::RingTip,
        Landmark::PinkyTip,
    ];

    /// Detector index of this role.
    pub fn index(self) -> usize {
        self as usize
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Point2
// ════════════════════════════════════════════════════════════════════════════

/// A normalized 2-D landmark position (x, y nominally in `[0, 1]`).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point2 {
    pub x: f32,
    pub y: f32,
}

impl Point2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Point2 { x, y }
    }

    /// Euclidean distance in normalized space.
    pub fn distance(&self, other: &Point2) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn lerp(&self, other: &Point2, t: f32) -> Point2 {
        Point2 {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Errors
// ════════════════════════════════════════════════════════════════════════════

/// Why a hand or frame was rejected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LandmarkError {
    #[error("hand has {0} landmarks, expected 21")]
    WrongPointCount(usize),

    #[error("landmark {0:?} is not finite")]
    NonFinite(Landmark),

    #[error("frame carries {0} hands, at most 2 supported")]
    TooManyHands(usize),
}

// ════════════════════════════════════════════════════════════════════════════
// HandLandmarks
// ════════════════════════════════════════════════════════════════════════════

/// The 21 landmarks of one detected hand.
#[derive(Clone, Debug, PartialEq)]
pub struct HandLandmarks {
    points: [Point2; LANDMARK_COUNT],
}

impl HandLandmarks {
    /// Build from a detector slice; must hold exactly 21 finite points.
    pub fn from_slice(points: &[Point2]) -> Result<Self, LandmarkError> {
        if points.len() != LANDMARK_COUNT {
            return Err(LandmarkError::WrongPointCount(points.len()));
        }
        let mut out = [Point2::default(); LANDMARK_COUNT];
        for (role, p) in Landmark::ALL.iter().zip(points) {
            if !p.is_finite() {
                return Err(LandmarkError::NonFinite(*role));
            }
            out[role.index()] = *p;
        }
        Ok(HandLandmarks { points: out })
    }

    /// Build by computing each role's position.
    pub fn from_fn(mut f: impl FnMut(Landmark) -> Point2) -> Self {
        let mut points = [Point2::default(); LANDMARK_COUNT];
        for role in Landmark::ALL {
            points[role.index()] = f(role);
        }
        HandLandmarks { points }
    }

    pub fn get(&self, role: Landmark) -> Point2 {
        self.points[role.index()]
    }

    pub fn set(&mut self, role: Landmark, p: Point2) {
        self.points[role.index()] = p;
    }

    pub fn wrist(&self) -> Point2 {
        self.get(Landmark::Wrist)
    }

    pub fn points(&self) -> &[Point2; LANDMARK_COUNT] {
        &self.points
    }
}

// ════════════════════════════════════════════════════════════════════════════
// LandmarkFrame
// ════════════════════════════════════════════════════════════════════════════

/// Zero, one, or two hands captured in one detector tick.
#[derive(Clone, Debug, PartialEq)]
pub struct LandmarkFrame {
    /// Monotonic capture counter assigned by the source.
    pub sequence: u64,
    hands: Vec<HandLandmarks>,
}

impl LandmarkFrame {
    /// A frame in which no hand was detected.
    pub fn empty(sequence: u64) -> Self {
        LandmarkFrame { sequence, hands: Vec::new() }
    }

    /// Strict constructor: more than two hands is an error.
    pub fn new(sequence: u64, hands: Vec<HandLandmarks>) -> Result<Self, LandmarkError> {
        if hands.len() > MAX_HANDS {
            return Err(LandmarkError::TooManyHands(hands.len()));
        }
        Ok(LandmarkFrame { sequence, hands })
    }

    /// Lenient constructor for raw detector output.
    ///
    /// Malformed hands are dropped and extra hands truncated; the frame
    /// itself never fails, since bad input must degrade to "fewer hands".
    pub fn from_raw(sequence: u64, raw: &[Vec<Point2>]) -> Self {
        let mut hands = Vec::with_capacity(MAX_HANDS);
        for (i, pts) in raw.iter().enumerate() {
            match HandLandmarks::from_slice(pts) {
                Ok(h) if hands.len() < MAX_HANDS => hands.push(h),
                Ok(_) => {
                    warn!(target: "landmarks", sequence, hand = i, "extra hand ignored");
                }
                Err(e) => {
                    warn!(target: "landmarks", sequence, hand = i, error = %e, "malformed hand dropped");
                }
            }
        }
        LandmarkFrame { sequence, hands }
    }

    pub fn hands(&self) -> &[HandLandmarks] {
        &self.hands
    }

    pub fn first(&self) -> Option<&HandLandmarks> {
        self.hands.first()
    }

    pub fn hand_count(&self) -> usize {
        self.hands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hands.is_empty()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(n: usize) -> Vec<Point2> {
        (0..n).map(|i| Point2::new(i as f32 / 20.0, 0.5)).collect()
    }

    #[test]
    fn roles_map_to_detector_indices() {
        for (i, role) in Landmark::ALL.iter().enumerate() {
            assert_eq!(role.index(), i);
        }
        assert_eq!(Landmark::Wrist.index(), 0);
        assert_eq!(Landmark::ThumbTip.index(), 4);
        assert_eq!(Landmark::IndexTip.index(), 8);
        assert_eq!(Landmark::PinkyTip.index(), 20);
    }

    #[test]
    fn from_slice_requires_21_points() {
        assert_eq!(
            HandLandmarks::from_slice(&flat(20)),
            Err(LandmarkError::WrongPointCount(20))
        );
        assert!(HandLandmarks::from_slice(&flat(21)).is_ok());
    }

    #[test]
    fn from_slice_rejects_nan() {
        let mut pts = flat(21);
        pts[8].x = f32::NAN;
        assert_eq!(
            HandLandmarks::from_slice(&pts),
            Err(LandmarkError::NonFinite(Landmark::IndexTip))
        );
    }

    #[test]
    fn strict_frame_rejects_three_hands() {
        let h = HandLandmarks::from_slice(&flat(21)).unwrap();
        let err = LandmarkFrame::new(0, vec![h.clone(), h.clone(), h]).unwrap_err();
        assert_eq!(err, LandmarkError::TooManyHands(3));
    }

    #[test]
    fn raw_frame_drops_bad_hands_and_truncates() {
        let raw = vec![flat(3), flat(21), flat(21), flat(21)];
        let f = LandmarkFrame::from_raw(7, &raw);
        assert_eq!(f.sequence, 7);
        assert_eq!(f.hand_count(), 2);
    }

    #[test]
    fn point_distance() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(0.3, 0.4);
        assert!((a.distance(&b) - 0.5).abs() < 1e-6);
    }
}
