//! Landmark sources — real LeapMotion hardware or keyboard/mouse simulation.
//!
//! A source runs on its own thread and posts [`LandmarkFrame`]s into a
//! [`FrameMailbox`].  The frame loop takes whatever is newest; frames it
//! never got to are overwritten.  Consumers don't need to know whether
//! frames came from hardware or the simulator.

use std::sync::mpsc::Receiver;
use std::thread;

use hand_landmarks::poses::{self, Pose};
use hand_landmarks::{FrameMailbox, HandLandmarks, LandmarkFrame, Point2};
use tracing::debug;

// ════════════════════════════════════════════════════════════════════════════
// LandmarkSource trait — unified interface for hw and sim
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can deliver landmark frames into a mailbox.
pub trait LandmarkSource: Send + 'static {
    fn run(self: Box<Self>, mailbox: FrameMailbox);
}

/// Spawn a source on its own thread and return the mailbox it posts to.
pub fn spawn_landmark_source<S: LandmarkSource>(source: S) -> FrameMailbox {
    let mailbox = FrameMailbox::new();
    let tx = mailbox.clone();
    thread::spawn(move || Box::new(source).run(tx));
    mailbox
}

// ════════════════════════════════════════════════════════════════════════════
// LeapLandmarkSource — real hardware (feature = "leap")
// ════════════════════════════════════════════════════════════════════════════

/// Landmark source backed by a LeapMotion controller.
///
/// Requires the `leap` feature flag and the LeapC shared library installed.
///
/// Leap reports joints in millimetres above the device.  The interaction
/// box below is mapped onto the unit square so the thresholds tuned for
/// camera landmarks apply unchanged:
///
/// | Leap axis | Range (mm)   | Landmark axis |
/// |-----------|--------------|---------------|
/// | x         | −200 … 200   | x  0 … 1      |
/// | y         |  100 … 500   | y  1 … 0      |
///
/// Joint mapping per digit: base of the metacarpal for the wrist (middle
/// finger), then the far end of metacarpal, proximal, intermediate and
/// distal bones for the four landmarks of each finger.
#[cfg(feature = "leap")]
pub struct LeapLandmarkSource;

#[cfg(feature = "leap")]
impl LandmarkSource for LeapLandmarkSource {
    fn run(self: Box<Self>, mailbox: FrameMailbox) {
        use leaprs::*;
        use tracing::{error, info};

        let mut connection = match Connection::create(ConnectionConfig::default()) {
            Ok(c) => c,
            Err(e) => {
                error!(target: "source", error = ?e, "failed to create LeapC connection");
                return;
            }
        };
        if let Err(e) = connection.open() {
            error!(target: "source", error = ?e, "failed to open LeapMotion device");
            return;
        }
        info!(target: "source", "LeapMotion connected");

        let mut sequence = 0u64;
        loop {
            let msg = match connection.poll(100) {
                Ok(m)  => m,
                Err(_) => continue,
            };
            if let Event::Tracking(frame) = msg.event() {
                sequence += 1;
                let hands: Vec<HandLandmarks> = frame
                    .hands()
                    .take(hand_landmarks::MAX_HANDS)
                    .filter_map(|h| leap_hand(&h))
                    .collect();
                match LandmarkFrame::new(sequence, hands) {
                    Ok(f)  => mailbox.post(f),
                    Err(e) => debug!(target: "source", error = %e, "leap frame discarded"),
                }
            }
        }
    }
}

#[cfg(feature = "leap")]
fn leap_point(x: f32, y: f32) -> Point2 {
    Point2::new((x + 200.0) / 400.0, 1.0 - (y - 100.0) / 400.0)
}

#[cfg(feature = "leap")]
fn leap_hand(hand: &leaprs::Hand) -> Option<HandLandmarks> {
    let digits: Vec<_> = hand.digits().collect();
    if digits.len() < 5 {
        return None;
    }
    let wrist = digits[2].metacarpal().prev_joint();
    let mut points = vec![leap_point(wrist.x, wrist.y)];
    for d in &digits[..5] {
        for joint in [
            d.metacarpal().next_joint(),
            d.proximal().next_joint(),
            d.intermediate().next_joint(),
            d.distal().next_joint(),
        ] {
            points.push(leap_point(joint.x, joint.y));
        }
    }
    HandLandmarks::from_slice(&points).ok()
}

// ════════════════════════════════════════════════════════════════════════════
// SimLandmarkSource — keyboard/mouse simulation (always available)
// ════════════════════════════════════════════════════════════════════════════

/// Raw input event from the simulation window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SimInput {
    /// Hold a hand shape.
    Pose(Pose),
    /// Mouse moved; normalized window coordinates.
    Pointer(Point2),
    /// Show or hide the hand entirely.
    HandVisible(bool),
    /// Two hands making a heart (overrides the pose while on).
    Heart(bool),
    Quit,
}

/// Landmark source driven by [`SimInput`] events from the visualizer.
///
/// Keeps a simulated hand (pose, wrist position, visibility) and posts a
/// fresh frame whenever any of it changes.
pub struct SimLandmarkSource {
    pub rx: Receiver<SimInput>,
}

/// Simulated hand state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimHand {
    pub pose:    Pose,
    pub wrist:   Point2,
    pub visible: bool,
    pub heart:   bool,
}

impl Default for SimHand {
    fn default() -> Self {
        SimHand { pose: Pose::Relaxed, wrist: Point2::new(0.5, 0.6), visible: true, heart: false }
    }
}

impl SimHand {
    /// Apply one input.  Returns false on quit.
    pub fn apply(&mut self, input: SimInput) -> bool {
        match input {
            SimInput::Pose(p)        => self.pose = p,
            SimInput::Pointer(p)     => self.wrist = p,
            SimInput::HandVisible(v) => self.visible = v,
            SimInput::Heart(h)       => self.heart = h,
            SimInput::Quit           => return false,
        }
        true
    }

    pub fn frame(&self, sequence: u64) -> LandmarkFrame {
        if !self.visible {
            return LandmarkFrame::empty(sequence);
        }
        let hands = if self.heart {
            let (a, b) = poses::heart_pair(self.wrist);
            vec![a, b]
        } else {
            vec![self.pose.build(self.wrist)]
        };
        LandmarkFrame::new(sequence, hands).unwrap_or_else(|_| LandmarkFrame::empty(sequence))
    }
}

impl LandmarkSource for SimLandmarkSource {
    fn run(self: Box<Self>, mailbox: FrameMailbox) {
        let mut hand = SimHand::default();
        let mut sequence = 0u64;
        mailbox.post(hand.frame(sequence));

        for input in self.rx {
            if !hand.apply(input) {
                break;
            }
            sequence += 1;
            mailbox.post(hand.frame(sequence));
        }
        debug!(target: "source", "simulation source stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hand_landmarks::classify;
    use std::sync::mpsc;
    use std::time::{Duration, Instant};

    fn wait_for(mailbox: &FrameMailbox, pred: impl Fn(&LandmarkFrame) -> bool) -> Option<LandmarkFrame> {
        let deadline = Instant::now() + Duration::from_secs(2);
        while Instant::now() < deadline {
            if let Some(f) = mailbox.take_latest() {
                if pred(&f) {
                    return Some(f);
                }
            }
            thread::sleep(Duration::from_millis(2));
        }
        None
    }

    #[test]
    fn hidden_hand_posts_empty_frame() {
        let hand = SimHand { visible: false, ..SimHand::default() };
        assert!(hand.frame(3).is_empty());
    }

    #[test]
    fn heart_posts_two_hands() {
        let hand = SimHand { heart: true, ..SimHand::default() };
        let g = classify(&hand.frame(0));
        assert!(g.is_heart);
        assert_eq!(g.hands, 2);
    }

    #[test]
    fn pose_follows_pointer() {
        let mut hand = SimHand::default();
        hand.apply(SimInput::Pose(Pose::Open));
        hand.apply(SimInput::Pointer(Point2::new(0.2, 0.4)));
        let g = classify(&hand.frame(1));
        assert!(g.is_open);
        assert_eq!(g.pointer, Point2::new(0.2, 0.4));
    }

    #[test]
    fn quit_stops_applying() {
        let mut hand = SimHand::default();
        assert!(!hand.apply(SimInput::Quit));
    }

    #[test]
    fn sim_source_posts_latest_state() {
        let (tx, rx) = mpsc::channel();
        let mailbox = spawn_landmark_source(SimLandmarkSource { rx });
        tx.send(SimInput::Pose(Pose::Fist)).unwrap();
        tx.send(SimInput::Pointer(Point2::new(0.9, 0.1))).unwrap();

        let f = wait_for(&mailbox, |f| f.sequence == 2).expect("frame 2 posted");
        let g = classify(&f);
        assert!(g.is_fist);
        assert_eq!(g.pointer, Point2::new(0.9, 0.1));
        tx.send(SimInput::Quit).unwrap();
    }
}
