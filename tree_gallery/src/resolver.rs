//! Per-item target placement.
//!
//! [`resolve`] is a pure function of the mode, the item's index, the scroll
//! position and the viewpoint.  It is evaluated for every item every tick;
//! the result is a target that [`smoothing`](crate::smoothing) eases toward.
//!
//! | Mode   | Placement |
//! |--------|-----------|
//! | Tree   | banded helix around the tree, facing outward |
//! | Spread | row at fixed depth, facing the viewer, focused photo enlarged |
//! | Zoom   | focused photo in front of the viewer, others sunk and hidden   |

use std::f32::consts::{FRAC_PI_2, TAU};

use glam::{EulerRot, Quat, Vec3};

use crate::config::LayoutConfig;
use crate::mode::Mode;
use crate::smoothing::ItemTransform;

/// Photos per turn of the tree helix.
const HELIX_STEPS: f32 = 5.0;

/// Polaroid border around the photo, in world units.
const FRAME_WIDTH: f32 = 1.4 + 0.2;
const PHOTO_WIDTH: f32 = 1.4;
const FRAME_BOTTOM: f32 = 0.5;

/// Where the scene is looked at from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewpoint {
    pub position:    Vec3,
    pub orientation: Quat,
    /// Vertical field of view in radians.
    pub fov_y:       f32,
    /// Viewport width / height.
    pub aspect:      f32,
}

impl Viewpoint {
    pub fn forward(&self) -> Vec3 {
        self.orientation * Vec3::NEG_Z
    }

    /// Visible (width, height) of the view frustum at `distance`.
    pub fn visible_extent(&self, distance: f32) -> (f32, f32) {
        let h = 2.0 * distance * (self.fov_y / 2.0).tan();
        (h * self.aspect, h)
    }
}

impl Default for Viewpoint {
    fn default() -> Self {
        crate::config::ViewpointConfig::default().to_viewpoint()
    }
}

#[derive(Clone, Copy, Debug)]
pub struct ResolveInput {
    pub index:        usize,
    pub count:        usize,
    pub mode:         Mode,
    pub scroll:       f32,
    /// Nearest to the scroll position.
    pub focused:      bool,
    /// Zoom mode and this item is focused.
    pub zoomed:       bool,
    pub aspect_ratio: f32,
    /// Current parallax offset of the scene group; zoomed photos
    /// compensate for it so they stay centred on the viewer.
    pub rig_offset:   Vec3,
    /// Current parallax yaw of the scene group, undone the same way.
    pub rig_yaw:      f32,
}

/// Target transform for one item.
pub fn resolve(input: &ResolveInput, layout: &LayoutConfig, view: &Viewpoint) -> ItemTransform {
    debug_assert!(input.index < input.count.max(1));
    match input.mode {
        Mode::Tree => tree_slot(input.index, layout),
        Mode::Spread => spread_slot(input, layout, view),
        Mode::Zoom if input.zoomed => {
            // Group space is `yaw * p + offset` in world space.
            let unyaw = Quat::from_rotation_y(-input.rig_yaw);
            let world = view.position + view.forward() * layout.zoom_distance;
            ItemTransform {
                position:    unyaw * (world - input.rig_offset),
                orientation: unyaw * view.orientation,
                scale:       zoom_scale(input.aspect_ratio, layout, view),
                opacity:     1.0,
            }
        }
        Mode::Zoom => {
            let row = spread_slot(&ResolveInput { focused: false, ..*input }, layout, view);
            ItemTransform {
                position: row.position - Vec3::Y * layout.zoom_sink,
                scale:    0.01,
                opacity:  0.0,
                ..row
            }
        }
    }
}

/// Position on the tree: photos climb in bands of 0.15 of the height,
/// wrapping every four, with radius shrinking toward the top.
pub fn tree_slot(index: usize, layout: &LayoutConfig) -> ItemTransform {
    let i = index as f32;
    let height_frac = 0.2 + (i * 0.15) % 0.6;
    let y = height_frac * layout.tree_height - layout.tree_height / 2.0;
    let radius = (1.0 - height_frac) * layout.tree_base_radius + 0.3;
    let angle = i * TAU / HELIX_STEPS;
    ItemTransform {
        position:    Vec3::new(angle.cos() * radius, y, angle.sin() * radius),
        orientation: Quat::from_rotation_y(FRAC_PI_2 - angle),
        scale:       1.0,
        opacity:     1.0,
    }
}

fn spread_slot(input: &ResolveInput, layout: &LayoutConfig, view: &Viewpoint) -> ItemTransform {
    let f = if input.focused { 1.0 } else { 0.0 };
    let position = Vec3::new(
        (input.index as f32 - input.scroll) * layout.spread_spacing,
        0.0,
        layout.spread_depth + layout.focus_push * f,
    );
    ItemTransform {
        position,
        orientation: facing(position, view.position),
        scale:       lerp(layout.idle_scale, layout.focus_scale, f),
        opacity:     lerp(layout.idle_opacity, 1.0, f),
    }
}

/// Orientation that turns a +Z-facing plane at `from` toward `to`.
pub fn facing(from: Vec3, to: Vec3) -> Quat {
    let dir = (to - from).normalize_or_zero();
    if dir == Vec3::ZERO {
        return Quat::IDENTITY;
    }
    let yaw = dir.x.atan2(dir.z);
    let pitch = -dir.y.clamp(-1.0, 1.0).asin();
    Quat::from_euler(EulerRot::YXZ, yaw, pitch, 0.0)
}

/// Polaroid (width, height) for a photo of the given aspect ratio.
pub fn polaroid_size(aspect_ratio: f32) -> (f32, f32) {
    let aspect = if aspect_ratio.is_finite() && aspect_ratio > 0.0 { aspect_ratio } else { 1.0 };
    (FRAME_WIDTH, PHOTO_WIDTH / aspect + FRAME_BOTTOM)
}

/// Scale that fits the polaroid into the view at zoom distance.
pub fn zoom_scale(aspect_ratio: f32, layout: &LayoutConfig, view: &Viewpoint) -> f32 {
    let (frame_w, frame_h) = polaroid_size(aspect_ratio);
    let (vis_w, vis_h) = view.visible_extent(layout.zoom_distance);
    layout.zoom_fill * (vis_h / frame_h).min(vis_w / frame_w)
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
