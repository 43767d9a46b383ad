//! # hand_landmarks
//!
//! Turns one frame of 21-point hand landmarks into a [`GestureState`]:
//! four gesture booleans plus a continuous pointer.
//!
//! ## Gesture thresholds
//!
//! | Gesture | Hands | Rule |
//! |---|---|---|
//! | Open palm | first | mean wrist → fingertip distance > 0.4 |
//! | Fist | first | mean wrist → fingertip distance < 0.25 |
//! | Pinch | first | thumb tip ↔ index tip < 0.05 |
//! | Heart | exactly two | index tips < 0.1 apart **and** thumb tips < 0.1 apart |
//!
//! Between 0.25 and 0.4 the hand is neither open nor a fist.  No temporal
//! smoothing happens here; debouncing belongs to the mode machine.
//!
//! ## Capture boundary
//!
//! Landmark sources run on their own thread and [`FrameMailbox::post`]
//! frames into a single slot.  The render loop calls
//! [`FrameMailbox::take_latest`] once per tick and never waits; frames it
//! did not get to are simply overwritten.
//!
//! ```rust
//! use hand_landmarks::{classify, poses, FrameMailbox, LandmarkFrame, Point2};
//!
//! let mailbox = FrameMailbox::new();
//! let hand = poses::open_palm(Point2::new(0.4, 0.8));
//! mailbox.post(LandmarkFrame::new(1, vec![hand]).unwrap());
//!
//! let frame = mailbox.take_latest().unwrap();
//! let g = classify(&frame);
//! assert!(g.is_open && !g.is_fist);
//! ```

pub mod landmark;
pub mod classifier;
pub mod mailbox;
pub mod pointer;
pub mod poses;

pub use landmark::{HandLandmarks, Landmark, LandmarkError, LandmarkFrame, Point2, LANDMARK_COUNT, MAX_HANDS};
pub use classifier::{
    classify, openness, GestureState,
    FIST_THRESHOLD, HEART_THRESHOLD, OPEN_THRESHOLD, PINCH_THRESHOLD, SENTINEL_POINTER,
};
pub use mailbox::FrameMailbox;
pub use pointer::{PointerPolicy, PointerTracker};
