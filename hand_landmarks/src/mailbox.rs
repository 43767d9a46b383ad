//! Single-slot mailbox between a landmark source thread and the render loop.
//!
//! The slot holds at most one unread frame.  Posting over an unread frame
//! replaces it; reading never blocks.  There is no queue, so a slow render
//! loop sees the newest hand pose rather than a backlog of stale ones.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::trace;

use crate::landmark::LandmarkFrame;

#[derive(Debug, Default)]
struct Slot {
    frame:   Mutex<Option<LandmarkFrame>>,
    posted:  AtomicU64,
    dropped: AtomicU64,
}

/// Cloneable handle to a shared latest-frame slot.
#[derive(Clone, Debug, Default)]
pub struct FrameMailbox {
    slot: Arc<Slot>,
}

impl FrameMailbox {
    pub fn new() -> Self {
        FrameMailbox::default()
    }

    /// Deliver a frame, overwriting any frame the reader has not taken yet.
    pub fn post(&self, frame: LandmarkFrame) {
        let sequence = frame.sequence;
        let replaced = self.slot.frame.lock().replace(frame);
        self.slot.posted.fetch_add(1, Ordering::Relaxed);
        if let Some(old) = replaced {
            self.slot.dropped.fetch_add(1, Ordering::Relaxed);
            trace!(target: "mailbox", dropped = old.sequence, kept = sequence, "unread frame overwritten");
        }
    }

    /// Take the newest unread frame, if any.  Never blocks on the source.
    pub fn take_latest(&self) -> Option<LandmarkFrame> {
        self.slot.frame.lock().take()
    }

    /// True when a frame is waiting.
    pub fn has_pending(&self) -> bool {
        self.slot.frame.lock().is_some()
    }

    /// Frames posted since creation.
    pub fn posted(&self) -> u64 {
        self.slot.posted.load(Ordering::Relaxed)
    }

    /// Frames overwritten before the reader took them.
    pub fn dropped(&self) -> u64 {
        self.slot.dropped.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn empty_mailbox_yields_none() {
        let mb = FrameMailbox::new();
        assert!(mb.take_latest().is_none());
        assert!(!mb.has_pending());
    }

    #[test]
    fn newest_frame_wins() {
        let mb = FrameMailbox::new();
        for seq in 1..=5 {
            mb.post(LandmarkFrame::empty(seq));
        }
        assert_eq!(mb.take_latest().map(|f| f.sequence), Some(5));
        assert!(mb.take_latest().is_none());
        assert_eq!(mb.posted(), 5);
        assert_eq!(mb.dropped(), 4);
    }

    #[test]
    fn clones_share_the_slot() {
        let reader = FrameMailbox::new();
        let writer = reader.clone();
        let handle = thread::spawn(move || {
            for seq in 0..100 {
                writer.post(LandmarkFrame::empty(seq));
            }
        });
        handle.join().unwrap();
        assert_eq!(reader.take_latest().map(|f| f.sequence), Some(99));
    }
}
