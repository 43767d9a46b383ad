use hand_landmarks::{poses, GestureState, LandmarkFrame, Point2};
use proptest::prelude::*;
use tree_gallery::{
    Carousel, EffectConfig, EffectScheduler, GalleryConfig, InteractionState, Item, ItemId, Mode,
    ModeMachine, ModeTransition,
};

const DT: f32 = 1.0 / 60.0;

fn arb_gesture() -> impl Strategy<Value = GestureState> {
    (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(|(o, f, p, h)| GestureState {
        is_open: o && !f,
        is_fist: f,
        is_pinching: p,
        is_heart: h,
        hands: 1,
        ..GestureState::no_input()
    })
}

fn arb_mode() -> impl Strategy<Value = Mode> {
    prop_oneof![Just(Mode::Tree), Just(Mode::Spread), Just(Mode::Zoom)]
}

#[derive(Clone, Copy, Debug)]
enum Pose {
    Open,
    Relaxed,
    Fist,
    Pinch,
    None,
}

fn arb_pose() -> impl Strategy<Value = Pose> {
    prop_oneof![
        Just(Pose::Open),
        Just(Pose::Relaxed),
        Just(Pose::Fist),
        Just(Pose::Pinch),
        Just(Pose::None),
    ]
}

fn frame_for(pose: Pose, x: f32) -> Option<LandmarkFrame> {
    let w = Point2::new(x, 0.7);
    let hand = match pose {
        Pose::Open    => poses::open_palm(w),
        Pose::Relaxed => poses::relaxed(w),
        Pose::Fist    => poses::fist(w),
        Pose::Pinch   => poses::pinch(w),
        Pose::None    => return None,
    };
    LandmarkFrame::new(0, vec![hand]).ok()
}

proptest! {
    #[test]
    fn fist_always_lands_in_tree(gestures in prop::collection::vec(arb_gesture(), 0..20)) {
        let mut m = ModeMachine::default();
        for g in &gestures {
            m.step(g, Some(ItemId(1)));
        }
        let fist = GestureState { is_fist: true, hands: 1, ..GestureState::no_input() };
        m.step(&fist, None);
        prop_assert_eq!(m.mode(), Mode::Tree);
        prop_assert_eq!(m.selected(), None);
    }

    #[test]
    fn carousel_stays_in_bounds(
        count in 0usize..12,
        xs in prop::collection::vec(-0.5f32..1.5, 1..120),
        modes in prop::collection::vec(arb_mode(), 1..120),
        jump in prop::option::of(0usize..40),
    ) {
        let mut c = Carousel::default();
        let mut prev = Mode::Tree;
        for (i, &x) in xs.iter().enumerate() {
            let mode = modes[i % modes.len()];
            if mode != prev {
                c.on_mode_change(ModeTransition { from: prev, to: mode }, x, count);
                prev = mode;
            }
            if i == xs.len() / 2 {
                if let Some(j) = jump {
                    c.on_jump(j, count);
                }
            }
            c.tick(mode, x, true, count, DT);
            let max = count.saturating_sub(1) as f32;
            prop_assert!(c.position() >= 0.0 && c.position() <= max);
            match c.focused_index(count) {
                None => prop_assert_eq!(count, 0),
                Some(f) => prop_assert!(f < count),
            }
        }
    }

    #[test]
    fn jump_twice_equals_once(count in 1usize..20, target in 0usize..40, pos in 0usize..20) {
        let mut c = Carousel::default();
        c.on_jump(pos, count);
        c.on_jump(target, count);
        let once = (c.position(), c.velocity());
        c.on_jump(target, count);
        prop_assert_eq!((c.position(), c.velocity()), once);
    }

    #[test]
    fn effect_progress_is_bounded(
        sides in prop::collection::vec(-20f32..20.0, 1..12),
        steps in prop::collection::vec(0f32..0.2, 1..200),
    ) {
        let mut s = EffectScheduler::new(EffectConfig::default(), glam::Vec3::new(0.0, 6.2, 0.0));
        let mut launched = 0;
        for &side in &sides {
            if s.spawn_travel(side).is_ok() {
                launched += 1;
            }
        }
        prop_assert!(launched <= 8);
        let mut arrived = 0;
        for &dt in &steps {
            arrived += s.advance(dt).len();
            for e in s.travels().chain(s.bursts()) {
                prop_assert!((0.0..=1.0).contains(&e.progress));
            }
            prop_assert!(s.bursts().count() <= 16);
        }
        prop_assert!(arrived <= launched);
    }

    #[test]
    fn whole_pipeline_keeps_invariants(
        items in 0u64..6,
        script in prop::collection::vec((arb_pose(), 0.0f32..1.0), 1..150),
    ) {
        let mut s = InteractionState::with_seed(GalleryConfig::default(), 3);
        for i in 0..items {
            s.add_item(Item::placeholder(ItemId(i + 1), 320, 240, "").unwrap());
        }
        for (k, &(pose, x)) in script.iter().enumerate() {
            if k % 37 == 0 {
                let _ = s.send_wish("wish");
            }
            let fist = matches!(pose, Pose::Fist);
            s.tick(frame_for(pose, x), DT);
            if fist {
                prop_assert_eq!(s.mode(), Mode::Tree);
            }
            let max = (items as usize).saturating_sub(1) as f32;
            let p = s.carousel().position();
            prop_assert!(p >= 0.0 && p <= max);
            prop_assert!((0.0..=1.0).contains(&s.energy()));
            for si in s.items() {
                prop_assert!(si.current.position.is_finite());
                prop_assert!(si.current.opacity >= -1e-6 && si.current.opacity <= 1.0 + 1e-6);
            }
        }
    }
}
