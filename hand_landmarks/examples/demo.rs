//! Classifies each synthetic pose and prints the resulting gesture state.

use hand_landmarks::{classify, openness, poses, LandmarkFrame, Point2};
use hand_landmarks::poses::Pose;

fn show(label: &str, frame: &LandmarkFrame) {
    let g = classify(frame);
    let open = frame.first().map(openness).unwrap_or(0.0);
    println!(
        "   {:<14} hands={}  open={:.3}  [open={:<5} fist={:<5} pinch={:<5} heart={:<5}]  ptr=({:.2}, {:.2})",
        label, g.hands, open, g.is_open, g.is_fist, g.is_pinching, g.is_heart,
        g.pointer.x, g.pointer.y,
    );
}

fn main() {
    println!("\n=== Hand Landmark Classifier Demo ===\n");

    let wrist = Point2::new(0.45, 0.8);

    show("no hand", &LandmarkFrame::empty(0));
    for (i, pose) in [Pose::Open, Pose::Relaxed, Pose::Fist, Pose::Pinch].into_iter().enumerate() {
        let frame = LandmarkFrame::from_raw(i as u64 + 1, &[pose.build(wrist).points().to_vec()]);
        show(&format!("{:?}", pose), &frame);
    }

    let (a, b) = poses::heart_pair(Point2::new(0.5, 0.5));
    show("heart pair", &LandmarkFrame::from_raw(9, &[a.points().to_vec(), b.points().to_vec()]));

    // A detector glitch: one hand with a truncated landmark list.
    show("glitched hand", &LandmarkFrame::from_raw(10, &[vec![wrist; 5]]));
    println!();
}
