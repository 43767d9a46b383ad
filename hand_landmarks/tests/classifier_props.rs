use hand_landmarks::{
    classify, poses, GestureState, HandLandmarks, LandmarkFrame, Point2, LANDMARK_COUNT,
    SENTINEL_POINTER,
};
use proptest::prelude::*;

fn arb_point() -> impl Strategy<Value = Point2> {
    (-0.2f32..1.2, -0.2f32..1.2).prop_map(|(x, y)| Point2::new(x, y))
}

fn arb_hand() -> impl Strategy<Value = HandLandmarks> {
    prop::collection::vec(arb_point(), LANDMARK_COUNT)
        .prop_map(|pts| HandLandmarks::from_slice(&pts).unwrap())
}

proptest! {
    #[test]
    fn empty_frames_are_always_sentinel(seq in any::<u64>()) {
        let g = classify(&LandmarkFrame::empty(seq));
        prop_assert_eq!(g, GestureState::no_input());
        prop_assert_eq!(g.pointer, SENTINEL_POINTER);
    }

    #[test]
    fn one_hand_is_never_a_heart(hand in arb_hand()) {
        let g = classify(&LandmarkFrame::new(0, vec![hand]).unwrap());
        prop_assert!(!g.is_heart);
    }

    #[test]
    fn open_and_fist_are_exclusive(a in arb_hand(), b in prop::option::of(arb_hand())) {
        let mut hands = vec![a];
        hands.extend(b);
        let g = classify(&LandmarkFrame::new(0, hands).unwrap());
        prop_assert!(!(g.is_open && g.is_fist));
    }

    #[test]
    fn pointer_tracks_first_wrist(x in 0.0f32..1.0, y in 0.0f32..1.0) {
        let w = Point2::new(x, y);
        let g = classify(&LandmarkFrame::new(0, vec![poses::relaxed(w)]).unwrap());
        prop_assert_eq!(g.pointer, w);
    }

    #[test]
    fn raw_frames_never_exceed_two_hands(n in 0usize..6) {
        let raw: Vec<Vec<Point2>> = (0..n)
            .map(|_| vec![Point2::new(0.5, 0.5); LANDMARK_COUNT])
            .collect();
        prop_assert!(LandmarkFrame::from_raw(1, &raw).hand_count() <= 2);
    }
}
