//! The interaction core as one owned value.
//!
//! [`InteractionState::tick`] runs the whole per-frame pipeline:
//!
//! ```text
//!   LandmarkFrame ─▶ classify ─▶ PointerTracker ─▶ ModeMachine ─▶ Carousel
//!                                                               │
//!        SceneRig ◀── EffectScheduler ◀─────────────────────────┘
//!           │
//!           ▼
//!     resolve + smooth every item
//! ```
//!
//! No frame this tick means the previous gesture is held.

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use hand_landmarks::{classify, GestureState, LandmarkFrame, Point2, PointerTracker};

use crate::carousel::{Carousel, FocusEvent};
use crate::config::GalleryConfig;
use crate::effects::{Arrival, EffectError, EffectId, EffectScheduler};
use crate::items::{Item, ItemId};
use crate::mode::{Mode, ModeMachine, ModeTransition};
use crate::resolver::{resolve, ResolveInput, Viewpoint};
use crate::scene::SceneRig;
use crate::smoothing::{smoothing_alpha, ItemTransform};

/// An item together with its eased transform.
#[derive(Clone, Debug)]
pub struct SceneItem {
    pub item:    Item,
    pub current: ItemTransform,
}

/// What changed during one tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
    pub transition:    Option<ModeTransition>,
    pub focus_changed: Option<FocusEvent>,
    pub arrivals:      Vec<Arrival>,
}

/// Everything a renderer needs for one frame.
pub struct FrameView<'a> {
    pub mode:     Mode,
    pub gesture:  &'a GestureState,
    pub pointer:  Point2,
    pub items:    &'a [SceneItem],
    pub focused:  Option<usize>,
    pub selected: Option<ItemId>,
    pub effects:  &'a EffectScheduler,
    pub energy:   f32,
    pub rig:      &'a SceneRig,
    pub view:     &'a Viewpoint,
}

impl FrameView<'_> {
    pub fn heart_visible(&self) -> bool {
        self.gesture.is_heart
    }
}

pub struct InteractionState {
    cfg:      GalleryConfig,
    view:     Viewpoint,
    tracker:  PointerTracker,
    gesture:  GestureState,
    pointer:  Point2,
    modes:    ModeMachine,
    carousel: Carousel,
    items:    Vec<SceneItem>,
    effects:  EffectScheduler,
    rig:      SceneRig,
    rng:      StdRng,
}

impl InteractionState {
    pub fn new(cfg: GalleryConfig) -> Self {
        Self::with_rng(cfg, StdRng::from_entropy())
    }

    /// Deterministic wish paths, for tests and replays.
    pub fn with_seed(cfg: GalleryConfig, seed: u64) -> Self {
        Self::with_rng(cfg, StdRng::seed_from_u64(seed))
    }

    fn with_rng(cfg: GalleryConfig, rng: StdRng) -> Self {
        let tracker = PointerTracker::new(cfg.pointer_policy);
        InteractionState {
            view:     cfg.viewpoint.to_viewpoint(),
            gesture:  GestureState::no_input(),
            pointer:  tracker.last_live(),
            tracker,
            modes:    ModeMachine::new(cfg.pulse_decay),
            carousel: Carousel::new(cfg.carousel.clone()),
            items:    Vec::new(),
            effects:  EffectScheduler::new(cfg.effects.clone(), cfg.layout.topper()),
            rig:      SceneRig::new(&cfg.layout),
            rng,
            cfg,
        }
    }

    // ── Controls ────────────────────────────────────────────────────────

    /// Append a photo.  It appears at the origin and eases into place.
    pub fn add_item(&mut self, item: Item) {
        info!(target: "gallery", id = %item.id, caption = %item.caption, count = self.items.len() + 1, "photo added");
        self.items.push(SceneItem { item, current: ItemTransform::HIDDEN });
    }

    /// Launch a wish.  Blank text sends nothing.
    pub fn send_wish(&mut self, text: &str) -> Result<Option<EffectId>, EffectError> {
        if text.trim().is_empty() {
            return Ok(None);
        }
        let swing = self.cfg.effects.swing_limit();
        let side = if swing > 0.0 { self.rng.gen_range(-swing..=swing) } else { 0.0 };
        let id = self.effects.spawn_travel(side)?;
        info!(target: "gallery", wish = text.trim(), "wish sent");
        Ok(Some(id))
    }

    pub fn jump_to(&mut self, index: usize) {
        self.carousel.on_jump(index, self.items.len());
    }

    /// Set the viewport aspect, e.g. after a window resize.
    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.view.aspect = aspect;
        }
    }

    // ── Frame pipeline ──────────────────────────────────────────────────

    pub fn tick(&mut self, frame: Option<LandmarkFrame>, dt: f32) -> TickReport {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

        if let Some(frame) = frame {
            self.gesture = classify(&frame);
        }
        self.pointer = self.tracker.effective(&self.gesture);
        let count = self.items.len();

        let focused_id = self.focused_id();
        let transition = self.modes.step(&self.gesture, focused_id);
        if let Some(t) = transition {
            self.carousel.on_mode_change(t, self.pointer.x, count);
        }
        let mode = self.modes.mode();
        let focus_changed =
            self.carousel.tick(mode, self.pointer.x, self.gesture.hand_present(), count, dt);
        if mode == Mode::Zoom {
            let focused_id = self.focused_id();
            self.modes.track_focus(focused_id);
        }

        self.modes.decay(dt);
        let arrivals = self.effects.advance(dt);
        if !arrivals.is_empty() {
            self.modes.on_arrival();
        }

        self.rig.tick(mode, self.pointer, self.gesture.is_fist, dt);
        self.settle_items(dt);

        if let Some(ev) = focus_changed {
            debug!(target: "gallery", current = ?ev.current, "focus reported");
        }
        TickReport { transition, focus_changed, arrivals }
    }

    fn settle_items(&mut self, dt: f32) {
        let mode = self.modes.mode();
        let count = self.items.len();
        let focused = self.carousel.focused_index(count);
        let alpha = smoothing_alpha(self.cfg.smoothing.rate_for(mode), dt);
        let scroll = self.carousel.position();
        let rig_offset = self.rig.offset;
        let rig_yaw = self.rig.yaw;

        for (index, si) in self.items.iter_mut().enumerate() {
            let input = ResolveInput {
                index,
                count,
                mode,
                scroll,
                focused: focused == Some(index),
                zoomed: mode == Mode::Zoom && focused == Some(index),
                aspect_ratio: si.item.aspect_ratio,
                rig_offset,
                rig_yaw,
            };
            let target = resolve(&input, &self.cfg.layout, &self.view);
            si.current.approach(&target, alpha);
        }
    }

    fn focused_id(&self) -> Option<ItemId> {
        self.carousel
            .focused_index(self.items.len())
            .and_then(|i| self.items.get(i))
            .map(|si| si.item.id)
    }

    // ── Accessors ───────────────────────────────────────────────────────

    pub fn mode(&self) -> Mode {
        self.modes.mode()
    }

    pub fn gesture(&self) -> &GestureState {
        &self.gesture
    }

    pub fn pointer(&self) -> Point2 {
        self.pointer
    }

    pub fn items(&self) -> &[SceneItem] {
        &self.items
    }

    pub fn carousel(&self) -> &Carousel {
        &self.carousel
    }

    pub fn focused_index(&self) -> Option<usize> {
        self.carousel.focused_index(self.items.len())
    }

    pub fn selected(&self) -> Option<ItemId> {
        self.modes.selected()
    }

    pub fn energy(&self) -> f32 {
        self.modes.energy()
    }

    pub fn effects(&self) -> &EffectScheduler {
        &self.effects
    }

    pub fn rig(&self) -> &SceneRig {
        &self.rig
    }

    pub fn viewpoint(&self) -> &Viewpoint {
        &self.view
    }

    pub fn config(&self) -> &GalleryConfig {
        &self.cfg
    }

    /// World position where wishes land.
    pub fn topper(&self) -> Vec3 {
        self.cfg.layout.topper()
    }

    pub fn frame_view(&self) -> FrameView<'_> {
        FrameView {
            mode:     self.modes.mode(),
            gesture:  &self.gesture,
            pointer:  self.pointer,
            items:    &self.items,
            focused:  self.focused_index(),
            selected: self.modes.selected(),
            effects:  &self.effects,
            energy:   self.modes.energy(),
            rig:      &self.rig,
            view:     &self.view,
        }
    }
}

impl Default for InteractionState {
    fn default() -> Self {
        InteractionState::new(GalleryConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;
    use hand_landmarks::poses;

    const DT: f32 = 1.0 / 60.0;

    fn state_with(n: u64) -> InteractionState {
        let mut s = InteractionState::with_seed(GalleryConfig::default(), 7);
        for i in 0..n {
            s.add_item(Item::placeholder(ItemId(i + 1), 400, 300, "").unwrap());
        }
        s
    }

    fn frame(hand: hand_landmarks::HandLandmarks) -> Option<LandmarkFrame> {
        Some(LandmarkFrame::new(0, vec![hand]).unwrap())
    }

    fn at(x: f32) -> Point2 {
        Point2::new(x, 0.6)
    }

    #[test]
    fn open_palm_spreads_and_fist_returns() {
        let mut s = state_with(3);
        let r = s.tick(frame(poses::open_palm(at(0.5))), DT);
        assert_eq!(r.transition, Some(ModeTransition { from: Mode::Tree, to: Mode::Spread }));
        assert_eq!(s.mode(), Mode::Spread);

        let r = s.tick(frame(poses::fist(at(0.5))), DT);
        assert_eq!(r.transition.map(|t| t.to), Some(Mode::Tree));
    }

    #[test]
    fn pinch_zooms_the_focused_photo() {
        let mut s = state_with(4);
        s.tick(frame(poses::open_palm(at(0.5))), DT);
        s.jump_to(2);
        s.tick(frame(poses::relaxed(at(0.5))), DT);
        let r = s.tick(frame(poses::pinch(at(0.5))), DT);
        assert_eq!(r.transition.map(|t| t.to), Some(Mode::Zoom));
        assert_eq!(s.selected(), Some(ItemId(3)));

        let r = s.tick(frame(poses::relaxed(at(0.5))), DT);
        assert_eq!(r.transition.map(|t| t.to), Some(Mode::Spread));
    }

    #[test]
    fn missing_frames_hold_previous_gesture() {
        let mut s = state_with(2);
        s.tick(frame(poses::open_palm(at(0.3))), DT);
        let held = *s.gesture();
        for _ in 0..10 {
            s.tick(None, DT);
        }
        assert_eq!(*s.gesture(), held);
        assert_eq!(s.mode(), Mode::Spread);
    }

    #[test]
    fn empty_frame_freezes_pointer() {
        let mut s = state_with(2);
        s.tick(frame(poses::relaxed(at(0.8))), DT);
        s.tick(Some(LandmarkFrame::empty(1)), DT);
        assert!(!s.gesture().hand_present());
        assert_eq!(s.pointer(), at(0.8));
    }

    #[test]
    fn first_item_reports_focus() {
        let mut s = state_with(0);
        assert_eq!(s.tick(None, DT).focus_changed, None);
        s.add_item(Item::placeholder(ItemId(1), 10, 10, "").unwrap());
        let r = s.tick(None, DT);
        assert_eq!(r.focus_changed, Some(FocusEvent { previous: None, current: Some(0) }));
        assert_eq!(s.tick(None, DT).focus_changed, None);
    }

    #[test]
    fn new_items_start_hidden_and_ease_in() {
        let mut s = state_with(1);
        assert_eq!(s.items()[0].current, ItemTransform::HIDDEN);
        for _ in 0..600 {
            s.tick(None, DT);
        }
        let t = s.items()[0].current;
        assert!((t.scale - 1.0).abs() < 1e-3);
        assert!((t.opacity - 1.0).abs() < 1e-3);
    }

    #[test]
    fn swipe_scrolls_the_row() {
        let mut s = state_with(6);
        s.tick(frame(poses::open_palm(at(0.2))), DT);
        for k in 0..20 {
            s.tick(frame(poses::relaxed(at(0.2 + k as f32 * 0.02))), DT);
        }
        assert!(s.carousel().position() > 0.5);
        let p = s.carousel().position();
        assert!(p >= 0.0 && p <= 5.0);
    }

    #[test]
    fn wish_arrival_pulses_energy() {
        let mut s = state_with(0);
        assert_eq!(s.send_wish("   "), Ok(None));
        let id = s.send_wish("snow").unwrap().unwrap();

        let mut arrived = None;
        for _ in 0..200 {
            let r = s.tick(None, DT);
            if let Some(a) = r.arrivals.first() {
                arrived = Some(a.effect_id);
                break;
            }
        }
        assert_eq!(arrived, Some(id));
        assert_eq!(s.energy(), 1.0);
        assert_eq!(s.effects().bursts().count(), 1);
        s.tick(None, DT);
        assert!(s.energy() < 1.0);
    }

    #[test]
    fn wishes_beyond_capacity_are_rejected() {
        let mut s = state_with(0);
        for _ in 0..8 {
            assert!(s.send_wish("w").is_ok());
        }
        assert!(matches!(s.send_wish("w"), Err(EffectError::TravelPoolFull { .. })));
    }

    #[test]
    fn heart_shows_overlay_without_mode_change() {
        let mut s = state_with(1);
        let (a, b) = poses::heart_pair(Point2::new(0.5, 0.5));
        let r = s.tick(Some(LandmarkFrame::new(0, vec![a, b]).unwrap()), DT);
        assert_eq!(r.transition, None);
        assert!(s.frame_view().heart_visible());
    }

    fn world_of(s: &InteractionState, index: usize) -> Vec3 {
        Quat::from_rotation_y(s.rig().yaw) * s.items()[index].current.position + s.rig().offset
    }

    fn zoom_in(s: &mut InteractionState, x: f32) {
        s.tick(frame(poses::open_palm(at(x))), DT);
        s.tick(frame(poses::pinch(at(x))), DT);
        assert_eq!(s.mode(), Mode::Zoom);
    }

    #[test]
    fn zoomed_photo_tracks_viewer_despite_parallax() {
        let mut s = state_with(3);
        zoom_in(&mut s, 0.9);
        for _ in 0..900 {
            s.tick(frame(poses::pinch(at(0.9))), DT);
        }
        let id = s.selected().unwrap();
        let index = s.items().iter().position(|si| si.item.id == id).unwrap();
        let world = world_of(&s, index);
        assert!((world - Vec3::new(0.0, 0.0, 14.0)).length() < 0.05, "world {world:?}");
    }

    #[test]
    fn jump_during_zoom_moves_the_zoomed_photo() {
        let mut s = state_with(4);
        zoom_in(&mut s, 0.5);
        assert_eq!(s.selected(), Some(ItemId(1)));

        s.jump_to(3);
        for _ in 0..900 {
            s.tick(frame(poses::pinch(at(0.5))), DT);
        }
        assert_eq!(s.mode(), Mode::Zoom);
        assert_eq!(s.focused_index(), Some(3));
        assert_eq!(s.selected(), Some(ItemId(4)));

        let shown = world_of(&s, 3);
        assert!((shown - Vec3::new(0.0, 0.0, 14.0)).length() < 0.05, "shown {shown:?}");
        assert!(s.items()[3].current.scale > 1.0);

        let old = &s.items()[0].current;
        assert!(old.scale < 0.05 && old.opacity < 0.05);
    }

    #[test]
    fn zoom_on_empty_gallery_shows_first_upload() {
        let mut s = state_with(0);
        zoom_in(&mut s, 0.5);
        assert_eq!(s.selected(), None);

        s.add_item(Item::placeholder(ItemId(1), 400, 300, "").unwrap());
        for _ in 0..900 {
            s.tick(frame(poses::pinch(at(0.5))), DT);
        }
        assert_eq!(s.mode(), Mode::Zoom);
        assert_eq!(s.selected(), Some(ItemId(1)));
        let t = s.items()[0].current;
        assert!(t.opacity > 0.99 && t.scale > 1.0, "{t:?}");
    }

    #[test]
    fn negative_swing_config_still_sends() {
        let mut cfg = GalleryConfig::default();
        cfg.effects.max_swing = -5.0;
        let mut s = InteractionState::with_seed(cfg, 3);
        assert!(matches!(s.send_wish("hi"), Ok(Some(_))));
    }
}
