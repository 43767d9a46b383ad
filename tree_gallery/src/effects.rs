//! Wish flights and arrival bursts.
//!
//! A sent wish travels along a quadratic Bezier from below the viewer up to
//! the tree top.  When it gets there it emits exactly one [`Arrival`] and
//! is replaced by a burst at the same point.  Both pools are bounded:
//!
//! | Pool   | Capacity (default) | When full |
//! |--------|--------------------|-----------|
//! | Travel | 8                  | new wish rejected with [`EffectError::TravelPoolFull`] |
//! | Burst  | 16                 | oldest burst dropped |

use std::collections::VecDeque;

use glam::Vec3;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::EffectConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EffectId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectKind {
    Travel,
    Burst,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EffectOrigin {
    /// Quadratic Bezier control points.
    Curve { start: Vec3, control: Vec3, end: Vec3 },
    /// Fixed burst centre.
    Point(Vec3),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Effect {
    pub id:       EffectId,
    pub kind:     EffectKind,
    /// Monotonic, in `[0, 1]`.
    pub progress: f32,
    pub origin:   EffectOrigin,
}

impl Effect {
    pub fn position(&self) -> Vec3 {
        self.point_at(self.progress)
    }

    fn point_at(&self, t: f32) -> Vec3 {
        match self.origin {
            EffectOrigin::Curve { start, control, end } => bezier(start, control, end, t),
            EffectOrigin::Point(p) => p,
        }
    }

    /// `n` points trailing behind the head, newest first, spread over
    /// `length` of the path.
    pub fn trail(&self, n: usize, length: f32) -> Vec<Vec3> {
        (0..n)
            .map(|k| {
                let t = (self.progress - k as f32 / n as f32 * length).clamp(0.0, 1.0);
                self.point_at(t)
            })
            .collect()
    }
}

fn bezier(a: Vec3, b: Vec3, c: Vec3, t: f32) -> Vec3 {
    let t = t.clamp(0.0, 1.0);
    let u = 1.0 - t;
    a * (u * u) + b * (2.0 * u * t) + c * (t * t)
}

/// A wish reached the tree top.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Arrival {
    pub effect_id: EffectId,
    pub at:        Vec3,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EffectError {
    #[error("{capacity} wishes already in flight")]
    TravelPoolFull { capacity: usize },
}

// ════════════════════════════════════════════════════════════════════════════
// EffectScheduler
// ════════════════════════════════════════════════════════════════════════════

pub struct EffectScheduler {
    travels: VecDeque<Effect>,
    bursts:  VecDeque<Effect>,
    next_id: u64,
    start:   Vec3,
    target:  Vec3,
    cfg:     EffectConfig,
}

impl EffectScheduler {
    /// `target` is where wishes land (the tree top).
    pub fn new(cfg: EffectConfig, target: Vec3) -> Self {
        EffectScheduler {
            travels: VecDeque::with_capacity(cfg.travel_capacity),
            bursts:  VecDeque::with_capacity(cfg.burst_capacity),
            next_id: 1,
            start:   Vec3::new(0.0, -10.0, 15.0),
            target,
            cfg,
        }
    }

    fn alloc_id(&mut self) -> EffectId {
        let id = EffectId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Launch a wish whose path swings out to `side` on x.
    pub fn spawn_travel(&mut self, side: f32) -> Result<EffectId, EffectError> {
        if self.travels.len() >= self.cfg.travel_capacity {
            warn!(target: "effects", capacity = self.cfg.travel_capacity, "wish rejected: pool full");
            return Err(EffectError::TravelPoolFull { capacity: self.cfg.travel_capacity });
        }
        let id = self.alloc_id();
        let limit = self.cfg.swing_limit();
        let side = if side.is_finite() { side.clamp(-limit, limit) } else { 0.0 };
        self.travels.push_back(Effect {
            id,
            kind: EffectKind::Travel,
            progress: 0.0,
            origin: EffectOrigin::Curve {
                start:   self.start,
                control: Vec3::new(side, 8.0, 5.0),
                end:     self.target,
            },
        });
        debug!(target: "effects", id = id.0, side, "wish launched");
        Ok(id)
    }

    /// Start a burst at `at`, evicting the oldest if the pool is full.
    pub fn spawn_burst(&mut self, at: Vec3) -> EffectId {
        if self.cfg.burst_capacity == 0 {
            return self.alloc_id();
        }
        while self.bursts.len() >= self.cfg.burst_capacity {
            if let Some(old) = self.bursts.pop_front() {
                debug!(target: "effects", id = old.id.0, "burst evicted");
            }
        }
        let id = self.alloc_id();
        self.bursts.push_back(Effect {
            id,
            kind: EffectKind::Burst,
            progress: 0.0,
            origin: EffectOrigin::Point(at),
        });
        id
    }

    /// Advance every effect by `dt`.  Finished wishes are removed, reported
    /// once, and replaced by a burst that starts ticking next call.
    pub fn advance(&mut self, dt: f32) -> Vec<Arrival> {
        let dt = dt.max(0.0);

        let burst_step = if self.cfg.burst_duration > 0.0 { dt / self.cfg.burst_duration } else { 1.0 };
        for b in &mut self.bursts {
            b.progress = (b.progress + burst_step).min(1.0);
        }
        self.bursts.retain(|b| b.progress < 1.0);

        let mut arrivals = Vec::new();
        for t in &mut self.travels {
            t.progress = (t.progress + self.cfg.travel_rate * dt).min(1.0);
            if t.progress >= 1.0 {
                arrivals.push(Arrival { effect_id: t.id, at: t.position() });
            }
        }
        self.travels.retain(|t| t.progress < 1.0);

        for a in &arrivals {
            debug!(target: "effects", id = a.effect_id.0, "wish arrived");
            self.spawn_burst(a.at);
        }
        arrivals
    }

    pub fn travels(&self) -> impl Iterator<Item = &Effect> {
        self.travels.iter()
    }

    pub fn bursts(&self) -> impl Iterator<Item = &Effect> {
        self.bursts.iter()
    }

    pub fn len(&self) -> usize {
        self.travels.len() + self.bursts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn trail_length(&self) -> f32 {
        self.cfg.trail_length
    }
}
