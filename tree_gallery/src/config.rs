//! Tunables for the interaction core.
//!
//! Every struct is `#[serde(default)]`, so a TOML file only needs the keys
//! it wants to change.

use glam::{Quat, Vec3};
use serde::Deserialize;

use hand_landmarks::PointerPolicy;

use crate::mode::Mode;
use crate::resolver::Viewpoint;

/// Top-level configuration for [`InteractionState`](crate::InteractionState).
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    pub carousel:       CarouselConfig,
    pub layout:         LayoutConfig,
    pub smoothing:      SmoothingConfig,
    pub effects:        EffectConfig,
    pub viewpoint:      ViewpointConfig,
    pub pointer_policy: PointerPolicy,
    /// Energy lost per unit time after a wish arrives.
    pub pulse_decay:    f32,
}

impl GalleryConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for GalleryConfig {
    fn default() -> Self {
        GalleryConfig {
            carousel:       CarouselConfig::default(),
            layout:         LayoutConfig::default(),
            smoothing:      SmoothingConfig::default(),
            effects:        EffectConfig::default(),
            viewpoint:      ViewpointConfig::default(),
            pointer_policy: PointerPolicy::default(),
            pulse_decay:    1.5,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Carousel
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct CarouselConfig {
    /// Velocity added per unit of pointer x travel.
    pub gain:    f32,
    /// Velocity multiplier applied every tick.
    pub damping: f32,
    /// Jump to the photo pointed at in tree mode when the gallery opens.
    pub inherit_tree_focus: bool,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        CarouselConfig { gain: 60.0, damping: 0.85, inherit_tree_focus: false }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Layout
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub tree_height:      f32,
    pub tree_base_radius: f32,
    /// Horizontal distance between neighbouring photos in the gallery row.
    pub spread_spacing:   f32,
    /// Depth of the gallery row.
    pub spread_depth:     f32,
    /// Extra depth toward the viewer for the focused photo.
    pub focus_push:       f32,
    pub focus_scale:      f32,
    pub idle_scale:       f32,
    pub idle_opacity:     f32,
    /// Distance in front of the viewpoint where a zoomed photo sits.
    pub zoom_distance:    f32,
    /// Fraction of the visible frame a zoomed photo fills.
    pub zoom_fill:        f32,
    /// How far non-zoomed photos sink below the row.
    pub zoom_sink:        f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            tree_height:      12.0,
            tree_base_radius: 5.0,
            spread_spacing:   4.5,
            spread_depth:     8.0,
            focus_push:       1.5,
            focus_scale:      1.6,
            idle_scale:       0.9,
            idle_opacity:     0.75,
            zoom_distance:    6.0,
            zoom_fill:        0.85,
            zoom_sink:        15.0,
        }
    }
}

impl LayoutConfig {
    /// World-space point just above the tree top where wishes land.
    pub fn topper(&self) -> Vec3 {
        Vec3::new(0.0, self.tree_height / 2.0 + 0.2, 0.0)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Smoothing
// ════════════════════════════════════════════════════════════════════════════

/// Exponential approach rates (per unit time) for item transforms.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    pub tree_rate:   f32,
    pub spread_rate: f32,
    pub zoom_rate:   f32,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        SmoothingConfig { tree_rate: 6.3, spread_rate: 9.0, zoom_rate: 3.5 }
    }
}

impl SmoothingConfig {
    pub fn rate_for(&self, mode: Mode) -> f32 {
        match mode {
            Mode::Tree   => self.tree_rate,
            Mode::Spread => self.spread_rate,
            Mode::Zoom   => self.zoom_rate,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Effects
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct EffectConfig {
    /// Travel progress gained per unit time.
    pub travel_rate:     f32,
    /// Lifetime of an arrival burst.
    pub burst_duration:  f32,
    /// Maximum concurrent travelling wishes; further sends are rejected.
    pub travel_capacity: usize,
    /// Maximum concurrent bursts; the oldest is dropped to make room.
    pub burst_capacity:  usize,
    /// Fraction of the path covered by a wish's trail.
    pub trail_length:    f32,
    /// Half-width of the random sideways swing of a wish's path.
    pub max_swing:       f32,
}

impl Default for EffectConfig {
    fn default() -> Self {
        EffectConfig {
            travel_rate:     0.95,
            burst_duration:  1.5,
            travel_capacity: 8,
            burst_capacity:  16,
            trail_length:    0.35,
            max_swing:       10.0,
        }
    }
}

impl EffectConfig {
    /// `max_swing` as a usable half-width: sign ignored, non-finite is 0.
    pub fn swing_limit(&self) -> f32 {
        if self.max_swing.is_finite() { self.max_swing.abs() } else { 0.0 }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Viewpoint
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewpointConfig {
    pub position:  [f32; 3],
    /// Vertical field of view in degrees.
    pub fov_y_deg: f32,
    /// Viewport width / height.
    pub aspect:    f32,
}

impl Default for ViewpointConfig {
    fn default() -> Self {
        ViewpointConfig { position: [0.0, 0.0, 20.0], fov_y_deg: 40.0, aspect: 16.0 / 9.0 }
    }
}

impl ViewpointConfig {
    pub fn to_viewpoint(&self) -> Viewpoint {
        Viewpoint {
            position:    Vec3::from_array(self.position),
            orientation: Quat::IDENTITY,
            fov_y:       self.fov_y_deg.to_radians(),
            aspect:      self.aspect,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_tuned_values() {
        let cfg = GalleryConfig::new();
        assert_eq!(cfg.carousel.gain, 60.0);
        assert_eq!(cfg.carousel.damping, 0.85);
        assert_eq!(cfg.effects.travel_rate, 0.95);
        assert_eq!(cfg.effects.burst_duration, 1.5);
        assert_eq!(cfg.pulse_decay, 1.5);
        assert_eq!(cfg.pointer_policy, PointerPolicy::Freeze);
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let cfg: GalleryConfig = toml::from_str(
            r#"
            pulse_decay = 2.0
            pointer_policy = "recenter"

            [carousel]
            gain = 30.0

            [effects]
            travel_capacity = 2
            "#,
        )
        .unwrap();
        assert_eq!(cfg.carousel.gain, 30.0);
        assert_eq!(cfg.carousel.damping, 0.85);
        assert_eq!(cfg.effects.travel_capacity, 2);
        assert_eq!(cfg.effects.burst_capacity, 16);
        assert_eq!(cfg.pointer_policy, PointerPolicy::Recenter);
        assert_eq!(cfg.layout.spread_spacing, 4.5);
    }

    #[test]
    fn topper_sits_above_tree() {
        let l = LayoutConfig::default();
        assert!((l.topper().y - 6.2).abs() < 1e-6);
    }
}
