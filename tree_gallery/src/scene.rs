//! Scene group parallax and the tree layer's shrink-and-sink.
//!
//! All motion here is eased with per-frame factors tuned at 60 Hz and
//! converted through [`frame_factor_alpha`] so other tick rates behave the
//! same.

use glam::Vec3;
use hand_landmarks::Point2;

use crate::config::LayoutConfig;
use crate::mode::Mode;
use crate::smoothing::frame_factor_alpha;

struct Parallax {
    shift: f32,
    yaw:   f32,
    ease:  f32,
}

const SPREAD_PARALLAX: Parallax = Parallax { shift: 4.5, yaw: 0.8, ease: 0.06 };
const ZOOM_PARALLAX: Parallax = Parallax { shift: 0.4, yaw: 0.05, ease: 0.02 };

/// Yaw reached at the edge of the frame while a fist spins the tree.
const FIST_SPIN: f32 = 2.0;
const FIST_EASE: f32 = 0.1;

const TREE_EASE: f32 = 0.08;
const TREE_SHRUNK_SCALE: f32 = 0.4;
const TREE_SINK: f32 = 8.0;

/// Idle spin of the tree while nobody is holding it, radians per second.
const IDLE_SPIN: f32 = 0.05;

#[derive(Clone, Debug, PartialEq)]
pub struct SceneRig {
    /// Translation of the whole scene group.
    pub offset:     Vec3,
    /// Rotation of the scene group about y.
    pub yaw:        f32,
    pub tree_scale: f32,
    pub tree_y:     f32,
    /// Accumulated idle rotation of the tree layer.
    pub tree_spin:  f32,
    rest_y:         f32,
}

impl SceneRig {
    pub fn new(layout: &LayoutConfig) -> Self {
        let rest_y = -layout.tree_height / 2.0;
        SceneRig {
            offset:     Vec3::ZERO,
            yaw:        0.0,
            tree_scale: 1.0,
            tree_y:     rest_y,
            tree_spin:  0.0,
            rest_y,
        }
    }

    pub fn tick(&mut self, mode: Mode, pointer: Point2, is_fist: bool, dt: f32) {
        let dx = pointer.x - 0.5;
        let dy = pointer.y - 0.5;

        match mode {
            Mode::Tree => {
                self.offset = Vec3::ZERO;
                if is_fist {
                    let a = frame_factor_alpha(FIST_EASE, dt);
                    self.yaw += (dx * FIST_SPIN - self.yaw) * a;
                } else {
                    self.tree_spin = (self.tree_spin + IDLE_SPIN * dt) % std::f32::consts::TAU;
                }
            }
            Mode::Spread | Mode::Zoom => {
                let p = if mode == Mode::Spread { &SPREAD_PARALLAX } else { &ZOOM_PARALLAX };
                let a = frame_factor_alpha(p.ease, dt);
                let target = Vec3::new(dx * p.shift, -dy * p.shift, 0.0);
                self.offset = self.offset.lerp(target, a);
                self.yaw += (dx * p.yaw - self.yaw) * a;
            }
        }

        let (scale, y) = if mode == Mode::Tree {
            (1.0, self.rest_y)
        } else {
            (TREE_SHRUNK_SCALE, self.rest_y - TREE_SINK)
        };
        let a = frame_factor_alpha(TREE_EASE, dt);
        self.tree_scale += (scale - self.tree_scale) * a;
        self.tree_y += (y - self.tree_y) * a;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn run(rig: &mut SceneRig, mode: Mode, p: Point2, fist: bool, ticks: usize) {
        for _ in 0..ticks {
            rig.tick(mode, p, fist, DT);
        }
    }

    #[test]
    fn spread_parallax_follows_pointer() {
        let mut rig = SceneRig::new(&LayoutConfig::default());
        run(&mut rig, Mode::Spread, Point2::new(1.0, 0.0), false, 600);
        assert!((rig.offset - Vec3::new(2.25, 2.25, 0.0)).length() < 1e-3);
        assert!((rig.yaw - 0.4).abs() < 1e-3);
    }

    #[test]
    fn zoom_parallax_is_subtle() {
        let mut rig = SceneRig::new(&LayoutConfig::default());
        run(&mut rig, Mode::Zoom, Point2::new(1.0, 0.5), false, 2000);
        assert!((rig.offset.x - 0.2).abs() < 1e-3);
        assert!(rig.offset.y.abs() < 1e-6);
    }

    #[test]
    fn first_spread_tick_moves_six_percent() {
        let mut rig = SceneRig::new(&LayoutConfig::default());
        rig.tick(Mode::Spread, Point2::new(1.0, 0.5), false, DT);
        assert!((rig.offset.x - 2.25 * 0.06).abs() < 1e-4);
    }

    #[test]
    fn tree_snaps_offset_and_fist_spins() {
        let mut rig = SceneRig::new(&LayoutConfig::default());
        run(&mut rig, Mode::Spread, Point2::new(0.9, 0.9), false, 30);
        rig.tick(Mode::Tree, Point2::new(0.9, 0.9), true, DT);
        assert_eq!(rig.offset, Vec3::ZERO);

        run(&mut rig, Mode::Tree, Point2::new(1.0, 0.5), true, 300);
        assert!((rig.yaw - 1.0).abs() < 1e-3);
    }

    #[test]
    fn tree_layer_shrinks_and_sinks_outside_tree() {
        let mut rig = SceneRig::new(&LayoutConfig::default());
        assert_eq!((rig.tree_scale, rig.tree_y), (1.0, -6.0));
        run(&mut rig, Mode::Spread, Point2::new(0.5, 0.5), false, 400);
        assert!((rig.tree_scale - 0.4).abs() < 1e-3);
        assert!((rig.tree_y + 14.0).abs() < 1e-3);
        run(&mut rig, Mode::Tree, Point2::new(0.5, 0.5), false, 400);
        assert!((rig.tree_scale - 1.0).abs() < 1e-3);
    }

    #[test]
    fn idle_spin_only_without_fist() {
        let mut rig = SceneRig::new(&LayoutConfig::default());
        run(&mut rig, Mode::Tree, Point2::new(0.5, 0.5), true, 60);
        assert_eq!(rig.tree_spin, 0.0);
        run(&mut rig, Mode::Tree, Point2::new(0.5, 0.5), false, 60);
        assert!((rig.tree_spin - IDLE_SPIN).abs() < 1e-4);
    }
}
