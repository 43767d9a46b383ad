//! Scripted session: open the gallery, swipe, zoom, send a wish, fist back.

use hand_landmarks::{poses, HandLandmarks, LandmarkFrame, Point2};
use tree_gallery::{GalleryConfig, InteractionState, Item, ItemId};

const DT: f32 = 1.0 / 60.0;

fn frame(seq: u64, hand: HandLandmarks) -> Option<LandmarkFrame> {
    LandmarkFrame::new(seq, vec![hand]).ok()
}

fn main() {
    println!("\n=== Tree Gallery Demo ===\n");

    let mut state = InteractionState::with_seed(GalleryConfig::default(), 42);
    for (i, (w, h)) in [(640, 480), (480, 640), (800, 800), (1200, 600), (500, 700)].into_iter().enumerate() {
        if let Ok(item) = Item::placeholder(ItemId(i as u64 + 1), w, h, "") {
            state.add_item(item);
        }
    }

    let mut script: Vec<(&str, HandLandmarks)> = Vec::new();
    script.push(("open", poses::open_palm(Point2::new(0.3, 0.7))));
    for k in 0..30 {
        script.push(("swipe", poses::relaxed(Point2::new(0.3 + k as f32 * 0.01, 0.7))));
    }
    for _ in 0..60 {
        script.push(("hold", poses::relaxed(Point2::new(0.6, 0.7))));
    }
    script.push(("pinch", poses::pinch(Point2::new(0.6, 0.7))));
    script.push(("release", poses::relaxed(Point2::new(0.6, 0.7))));
    script.push(("fist", poses::fist(Point2::new(0.6, 0.7))));

    if let Ok(Some(id)) = state.send_wish("let it snow") {
        println!("   wish {:?} launched", id);
    }

    for (seq, (label, hand)) in script.into_iter().enumerate() {
        let report = state.tick(frame(seq as u64, hand), DT);
        if let Some(t) = report.transition {
            println!("   [{:>3}] {:<8} {} → {}", seq, label, t.from, t.to);
        }
        if let Some(f) = report.focus_changed {
            println!("   [{:>3}] {:<8} focus {:?} → {:?}  (scroll {:.2})",
                seq, label, f.previous, f.current, state.carousel().position());
        }
        for a in &report.arrivals {
            println!("   [{:>3}] wish {:?} arrived at {:?}, energy {:.2}", seq, a.effect_id, a.at, state.energy());
        }
    }

    for _ in 0..60 {
        for a in state.tick(None, DT).arrivals {
            println!("   [idle] wish {:?} arrived at {:?}, energy {:.2}", a.effect_id, a.at, state.energy());
        }
    }

    println!("\n   final mode {}, {} items", state.mode(), state.items().len());
    for (i, si) in state.items().iter().enumerate() {
        let t = si.current;
        println!("   {} {:<16} pos ({:>6.2}, {:>6.2}, {:>6.2}) scale {:.2} opacity {:.2}",
            i, si.item.caption, t.position.x, t.position.y, t.position.z, t.scale, t.opacity);
    }
    println!();
}
