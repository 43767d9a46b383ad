//! Item transforms and frame-rate independent smoothing toward targets.

use glam::{Quat, Vec3};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ItemTransform {
    pub position:    Vec3,
    pub orientation: Quat,
    pub scale:       f32,
    pub opacity:     f32,
}

impl ItemTransform {
    /// Where a newly added item starts: at the origin, invisible.
    pub const HIDDEN: ItemTransform = ItemTransform {
        position:    Vec3::ZERO,
        orientation: Quat::IDENTITY,
        scale:       0.0,
        opacity:     0.0,
    };

    /// Interpolate from `self` to `other` by `t` in `[0, 1]`.
    pub fn blend(&self, other: &ItemTransform, t: f32) -> ItemTransform {
        let t = t.clamp(0.0, 1.0);
        ItemTransform {
            position:    self.position.lerp(other.position, t),
            orientation: self.orientation.slerp(other.orientation, t).normalize(),
            scale:       self.scale + (other.scale - self.scale) * t,
            opacity:     self.opacity + (other.opacity - self.opacity) * t,
        }
    }

    /// Move toward `target` by `alpha` of the remaining distance.
    pub fn approach(&mut self, target: &ItemTransform, alpha: f32) {
        *self = self.blend(target, alpha);
    }
}

impl Default for ItemTransform {
    fn default() -> Self {
        ItemTransform::HIDDEN
    }
}

/// Blend factor for one tick of exponential approach at `rate` per unit
/// time.  Two ticks of `dt/2` land where one tick of `dt` does.
pub fn smoothing_alpha(rate: f32, dt: f32) -> f32 {
    if dt <= 0.0 {
        return 0.0;
    }
    1.0 - (-rate * dt).exp()
}

/// Converts a per-frame lerp factor tuned at 60 Hz into the alpha for `dt`.
pub fn frame_factor_alpha(per_frame: f32, dt: f32) -> f32 {
    if dt <= 0.0 {
        return 0.0;
    }
    1.0 - (1.0 - per_frame.clamp(0.0, 1.0)).powf(dt * 60.0)
}
