//! Software-rendered view of the interaction core using `minifb`.
//!
//! Flat shapes only: the tree is a cone of dots, photos are framed
//! rectangles with their thumbnails, wishes are dotted trails.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                           ✦ topper                               │
//! │                          ·  ·                                    │
//! │            ┌────┐      ·  ··  ·       ┌────┐                     │
//! │            │ ▒▒ │     ·  ·  ·  ·      │ ▒▒ │    ← photos         │
//! │            └────┘    ·  ·  · ·  ·     └────┘                     │
//! │                                                                  │
//! │  status bar: mode · gesture · focus · energy · last event        │
//! │  key legend                                                      │
//! └──────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::mpsc::Sender;
use std::time::Duration;

use anyhow::anyhow;
use glam::{Quat, Vec3};
use minifb::{Key, KeyRepeat, MouseMode, Window, WindowOptions};

use hand_landmarks::poses::Pose;
use hand_landmarks::Point2;
use tree_gallery::{polaroid_size, EffectScheduler, FrameView, Mode, SceneItem, SceneRig, Viewpoint};

use crate::app::Control;
use crate::source::{SimHand, SimInput};

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

pub const WIN_W:      usize = 1200;
pub const WIN_H:      usize = 700;
const STATUS_H:       usize = 40;
const BG_COLOR:       u32   = 0xFF0B1026;
const TREE_COLOR:     u32   = 0xFF2E8B57;
const GOLD:           u32   = 0xFFFFD700;
const FRAME_COLOR:    u32   = 0xFFF4F1EA;
const TEXT_BG:        u32   = 0xFF0F3460;
const HEART_COLOR:    u32   = 0xFFE0245E;
const WISH_COLOR:     u32   = 0xFFFFF4C2;

const TREE_DOTS:      usize = 700;
const TREE_RADIUS:    f32   = 5.5;
const TRAIL_DOTS:     usize = 12;
const BURST_DOTS:     usize = 24;

// ════════════════════════════════════════════════════════════════════════════
// Projection
// ════════════════════════════════════════════════════════════════════════════

/// A point on screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projected {
    pub x:           f32,
    pub y:           f32,
    /// Distance in front of the viewer.
    pub depth:       f32,
    /// Screen pixels per world unit at this depth.
    pub px_per_unit: f32,
}

/// Pinhole projection through the viewpoint, with the scene group's
/// parallax applied first.
pub struct Projector {
    view:   Viewpoint,
    inv:    Quat,
    yaw:    Quat,
    offset: Vec3,
    width:  f32,
    height: f32,
}

impl Projector {
    pub fn new(view: &Viewpoint, rig: &SceneRig, width: usize, height: usize) -> Self {
        Projector {
            view:   *view,
            inv:    view.orientation.inverse(),
            yaw:    Quat::from_rotation_y(rig.yaw),
            offset: rig.offset,
            width:  width as f32,
            height: height as f32,
        }
    }

    /// Scene-group space to world space.
    pub fn to_world(&self, p: Vec3) -> Vec3 {
        self.yaw * p + self.offset
    }

    pub fn project_group(&self, p: Vec3) -> Option<Projected> {
        self.project_world(self.to_world(p))
    }

    pub fn project_world(&self, w: Vec3) -> Option<Projected> {
        let rel = self.inv * (w - self.view.position);
        let depth = -rel.z;
        if depth < 0.1 {
            return None;
        }
        let half_h = depth * (self.view.fov_y / 2.0).tan();
        let half_w = half_h * self.view.aspect;
        let nx = rel.x / half_w;
        let ny = rel.y / half_h;
        Some(Projected {
            x:           (nx + 1.0) * 0.5 * self.width,
            y:           (1.0 - ny) * 0.5 * self.height,
            depth,
            px_per_unit: self.height * 0.5 / half_h,
        })
    }

    /// How squarely a plane with group-space orientation `q` faces the viewer
    /// at group-space point `p`; 1 is head-on.
    pub fn facing_factor(&self, q: Quat, p: Vec3) -> f32 {
        let normal = self.yaw * (q * Vec3::Z);
        let to_view = (self.view.position - self.to_world(p)).normalize_or_zero();
        normal.dot(to_view).abs().max(0.15)
    }
}

/// Dots of the tree cone in tree-layer space, base at y = 0.
pub fn tree_points(height: f32) -> Vec<Vec3> {
    const GOLDEN_ANGLE: f32 = 2.399_963;
    (0..TREE_DOTS)
        .map(|i| {
            let t = i as f32 / TREE_DOTS as f32;
            let r = (1.0 - t) * TREE_RADIUS;
            let a = i as f32 * GOLDEN_ANGLE;
            Vec3::new(a.cos() * r, t * height, a.sin() * r)
        })
        .collect()
}

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window:     Window,
    buf:        Vec<u32>,
    sim_tx:     Sender<SimInput>,
    hand:       SimHand,
    tree:       Vec<Vec3>,
    tree_h:     f32,
}

impl Visualizer {
    pub fn new(sim_tx: Sender<SimInput>, tree_height: f32) -> anyhow::Result<Self> {
        let mut window = Window::new(
            "Gesture Tree — wishes & photos",
            WIN_W, WIN_H,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        ).map_err(|e| anyhow!("opening visualizer window: {e}"))?;

        window.limit_update_rate(Some(Duration::from_millis(16))); // ~60fps

        Ok(Visualizer {
            window,
            buf: vec![BG_COLOR; WIN_W * WIN_H],
            sim_tx,
            hand: SimHand::default(),
            tree: tree_points(tree_height),
            tree_h: tree_height,
        })
    }

    pub fn is_open(&self) -> bool { self.window.is_open() }

    pub fn aspect(&self) -> f32 {
        WIN_W as f32 / (WIN_H - STATUS_H) as f32
    }

    /// Poll keyboard and mouse.  Hand changes go to the simulation source;
    /// everything else comes back as [`Control`]s.  `None` once the window
    /// should close.
    pub fn poll_input(&mut self) -> Option<Vec<Control>> {
        if !self.window.is_open() { return None; }
        let mut controls = Vec::new();
        let mut sim = Vec::new();

        let one_shot = |k: Key| self.window.is_key_pressed(k, KeyRepeat::No);

        if one_shot(Key::Q) || one_shot(Key::Escape) {
            let _ = self.sim_tx.send(SimInput::Quit);
            return None;
        }

        for (key, pose) in [
            (Key::Key1, Pose::Open),
            (Key::Key2, Pose::Relaxed),
            (Key::Key3, Pose::Fist),
            (Key::Key4, Pose::Pinch),
        ] {
            if one_shot(key) {
                sim.push(SimInput::Pose(pose));
            }
        }
        if one_shot(Key::H) {
            sim.push(SimInput::Heart(!self.hand.heart));
        }
        if one_shot(Key::V) {
            sim.push(SimInput::HandVisible(!self.hand.visible));
        }

        if one_shot(Key::Left)  { controls.push(Control::JumpBy(-1)); }
        if one_shot(Key::Right) { controls.push(Control::JumpBy(1)); }
        if one_shot(Key::U)     { controls.push(Control::UploadPhoto(None)); }
        if one_shot(Key::W)     { controls.push(Control::SendWish(String::new())); }
        if one_shot(Key::R)     { controls.push(Control::SetRecipient(None)); }

        if let Some((mx, my)) = self.window.get_mouse_pos(MouseMode::Clamp) {
            let p = Point2::new(mx / WIN_W as f32, my / (WIN_H - STATUS_H) as f32);
            if p != self.hand.wrist {
                sim.push(SimInput::Pointer(p));
            }
        }

        for input in sim {
            self.hand.apply(input);
            let _ = self.sim_tx.send(input);
        }
        Some(controls)
    }

    /// Render one frame.
    pub fn render(&mut self, view: &FrameView<'_>, recipient: &str, status: &str) {
        self.buf.fill(BG_COLOR);
        let proj = Projector::new(view.view, view.rig, WIN_W, WIN_H - STATUS_H);

        self.draw_tree(&proj, view.rig, view.energy);
        self.draw_items(&proj, view);
        self.draw_effects(&proj, view.effects);

        if view.heart_visible() {
            self.draw_heart(recipient);
        }

        // ── Status bar ────────────────────────────────────────────────────
        let status_y = WIN_H - STATUS_H;
        self.fill_rect(0, status_y, WIN_W, STATUS_H, TEXT_BG);
        let focus = match view.focused {
            Some(i) => format!("{}/{}", i + 1, view.items.len()),
            None    => "-".to_string(),
        };
        let line = format!(
            "{}  hand={}  photo={}  energy={:.2}  {}",
            view.mode, view.gesture.label(), focus, view.energy, status
        );
        self.draw_label(&line, 10, status_y + 8, 0xFFEEEEEE);
        self.draw_label(
            "1=open 2=relax 3=fist 4=pinch h=heart v=hide mouse=move  left/right=jump u=photo w=wish r=name q=quit",
            10, WIN_H - 14, 0xFF888888,
        );

        self.window.update_with_buffer(&self.buf, WIN_W, WIN_H).ok();
    }

    // ── Tree ──────────────────────────────────────────────────────────────

    fn draw_tree(&mut self, proj: &Projector, rig: &SceneRig, energy: f32) {
        let spin = Quat::from_rotation_y(rig.tree_spin);
        let lift = Vec3::new(0.0, rig.tree_y, 0.0);
        let color = blend(TREE_COLOR, GOLD, energy * 0.6);

        for i in 0..self.tree.len() {
            let p = spin * (self.tree[i] * rig.tree_scale) + lift;
            if let Some(s) = proj.project_group(p) {
                let shade = blend(BG_COLOR, color, (1.0 - (s.depth - 12.0) / 20.0).clamp(0.35, 1.0));
                self.fill_rect_f(s.x - 1.0, s.y - 1.0, 2.0, 2.0, shade);
            }
        }

        let top = Vec3::new(0.0, self.tree_h * rig.tree_scale + 0.2, 0.0) + lift;
        if let Some(s) = proj.project_group(top) {
            let r = (0.35 * s.px_per_unit).max(3.0) as usize;
            self.draw_diamond(s.x as usize, s.y as usize, r, blend(GOLD, 0xFFFFFFFF, energy));
        }
    }

    // ── Photos ────────────────────────────────────────────────────────────

    fn draw_items(&mut self, proj: &Projector, view: &FrameView<'_>) {
        let mut order: Vec<(usize, Projected)> = view
            .items
            .iter()
            .enumerate()
            .filter(|(_, si)| si.current.opacity > 0.01 && si.current.scale > 0.01)
            .filter_map(|(i, si)| proj.project_group(si.current.position).map(|p| (i, p)))
            .collect();
        order.sort_by(|a, b| b.1.depth.total_cmp(&a.1.depth));

        for (i, at) in order {
            let si = &view.items[i];
            let highlight = view.mode != Mode::Tree && view.focused == Some(i);
            self.draw_polaroid(proj, si, at, highlight);
        }
    }

    fn draw_polaroid(&mut self, proj: &Projector, si: &SceneItem, at: Projected, highlight: bool) {
        let t = &si.current;
        let squash = proj.facing_factor(t.orientation, t.position);
        let unit = at.px_per_unit * t.scale;
        let (fw, fh) = polaroid_size(si.item.aspect_ratio);
        let w = fw * unit * squash;
        let h = fh * unit;
        if w < 2.0 || h < 2.0 {
            return;
        }
        let x0 = at.x - w / 2.0;
        let y0 = at.y - h / 2.0;

        let frame = blend(BG_COLOR, FRAME_COLOR, t.opacity);
        self.fill_rect_f(x0, y0, w, h, frame);

        // Photo area inset 0.1 units from the top and sides.
        let inset = 0.1 * unit;
        let pw = w - 2.0 * inset * squash;
        let ph = 1.4 / si.item.aspect_ratio.max(0.01) * unit;
        self.blit_thumbnail(si, x0 + inset * squash, y0 + inset, pw, ph, t.opacity);

        if h > 60.0 {
            let ty = (y0 + inset + ph + 0.12 * unit).max(0.0) as usize;
            let tx = (x0 + inset).max(0.0) as usize;
            self.draw_label(&si.item.caption, tx, ty, blend(frame, 0xFF202020, t.opacity));
        }
        if highlight {
            self.draw_border(x0.max(0.0) as usize, y0.max(0.0) as usize, w as usize, h as usize, GOLD);
        }
    }

    fn blit_thumbnail(&mut self, si: &SceneItem, x: f32, y: f32, w: f32, h: f32, opacity: f32) {
        let thumb = &si.item.image.thumbnail;
        if w < 1.0 || h < 1.0 || thumb.width == 0 || thumb.height == 0 {
            return;
        }
        let (x0, y0) = (x.max(0.0) as usize, y.max(0.0) as usize);
        let x1 = ((x + w) as usize).min(WIN_W);
        let y1 = ((y + h) as usize).min(WIN_H - STATUS_H);
        for py in y0..y1 {
            let v = ((py as f32 - y) / h * thumb.height as f32) as u32;
            for px in x0..x1 {
                let u = ((px as f32 - x) / w * thumb.width as f32) as u32;
                if let Some(c) = thumb.pixel(u.min(thumb.width - 1), v.min(thumb.height - 1)) {
                    let under = self.buf[py * WIN_W + px];
                    self.buf[py * WIN_W + px] = blend(under, c, opacity);
                }
            }
        }
    }

    // ── Wishes ────────────────────────────────────────────────────────────

    fn draw_effects(&mut self, proj: &Projector, effects: &EffectScheduler) {
        let trail_len = effects.trail_length();
        for travel in effects.travels() {
            for (k, p) in travel.trail(TRAIL_DOTS, trail_len).into_iter().enumerate() {
                if let Some(s) = proj.project_group(p) {
                    let fade = 1.0 - k as f32 / TRAIL_DOTS as f32;
                    let size = if k == 0 { 5.0 } else { 2.0 + 2.0 * fade };
                    self.fill_rect_f(s.x - size / 2.0, s.y - size / 2.0, size, size, blend(BG_COLOR, WISH_COLOR, fade));
                }
            }
        }
        for burst in effects.bursts() {
            let centre = burst.position();
            let radius = 0.3 + burst.progress * 2.5;
            let color = blend(GOLD, BG_COLOR, burst.progress);
            for k in 0..BURST_DOTS {
                let a = k as f32 / BURST_DOTS as f32 * std::f32::consts::TAU;
                let p = centre + Vec3::new(a.cos(), a.sin(), 0.0) * radius;
                if let Some(s) = proj.project_group(p) {
                    self.fill_rect_f(s.x - 1.0, s.y - 1.0, 3.0, 3.0, color);
                }
            }
        }
    }

    // ── Heart overlay ─────────────────────────────────────────────────────

    fn draw_heart(&mut self, recipient: &str) {
        let cx = WIN_W as f32 / 2.0;
        let cy = (WIN_H - STATUS_H) as f32 / 2.0 - 40.0;
        let size = 90.0;
        for py in (cy - size * 1.4) as usize..(cy + size * 1.4) as usize {
            for px in (cx - size * 1.4) as usize..(cx + size * 1.4) as usize {
                let x = (px as f32 - cx) / size;
                let y = (cy - py as f32) / size;
                let f = (x * x + y * y - 1.0).powi(3) - x * x * y * y * y;
                if f <= 0.0 {
                    self.set_pixel(px, py, HEART_COLOR);
                }
            }
        }
        let text = format!("I LOVE {}", recipient.to_uppercase());
        let tx = (cx as usize).saturating_sub(text.len() * 2);
        self.draw_label(&text, tx, (cy + size * 1.5) as usize, 0xFFFFFFFF);
    }

    // ── Primitive drawing helpers ─────────────────────────────────────────

    fn fill_rect_f(&mut self, x: f32, y: f32, w: f32, h: f32, color: u32) {
        let x0 = x.max(0.0) as usize;
        let y0 = y.max(0.0) as usize;
        let x1 = (x + w).max(0.0) as usize;
        let y1 = (y + h).max(0.0) as usize;
        if x1 > x0 && y1 > y0 {
            self.fill_rect(x0, y0, x1 - x0, y1 - y0, color);
        }
    }

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y+h).min(WIN_H) {
            for col in x..(x+w).min(WIN_W) {
                self.buf[row * WIN_W + col] = color;
            }
        }
    }

    fn draw_border(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        if w == 0 || h == 0 { return; }
        for col in x..(x+w).min(WIN_W) {
            if y < WIN_H           { self.buf[y           * WIN_W + col] = color; }
            if y+h-1 < WIN_H       { self.buf[(y+h-1)     * WIN_W + col] = color; }
        }
        for row in y..(y+h).min(WIN_H) {
            if x < WIN_W           { self.buf[row * WIN_W + x    ] = color; }
            if x+w-1 < WIN_W       { self.buf[row * WIN_W + x+w-1] = color; }
        }
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        if x < WIN_W && y < WIN_H {
            self.buf[y * WIN_W + x] = color;
        }
    }

    fn draw_diamond(&mut self, cx: usize, cy: usize, r: usize, color: u32) {
        for dy in 0..=r as isize {
            for dx in 0..=(r as isize - dy) {
                for &(sx, sy) in &[
                    (cx as isize + dx, cy as isize + dy),
                    (cx as isize - dx, cy as isize + dy),
                    (cx as isize + dx, cy as isize - dy),
                    (cx as isize - dx, cy as isize - dy),
                ] {
                    if sx >= 0 && sy >= 0 {
                        self.set_pixel(sx as usize, sy as usize, color);
                    }
                }
            }
        }
    }

    /// Minimal bitmap font — 3×5 characters, each encoded as 5 rows × 3 bits.
    fn draw_label(&mut self, text: &str, x: usize, y: usize, color: u32) {
        let mut cx = x;
        for ch in text.chars() {
            let glyph = char_glyph(ch);
            for (row, &bits) in glyph.iter().enumerate() {
                for col in 0..3usize {
                    if bits & (1 << (2 - col)) != 0 {
                        self.set_pixel(cx + col, y + row, color);
                    }
                }
            }
            cx += 4; // 3 wide + 1 gap
            if cx + 4 > WIN_W { break; }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Minimal 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────────────

fn char_glyph(c: char) -> [u8; 5] {
    match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'a' | 'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'b' | 'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'c' | 'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'd' | 'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'e' | 'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'f' | 'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'g' | 'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'h' | 'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'i' | 'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'j' | 'J' => [0b001, 0b001, 0b001, 0b101, 0b111],
        'k' | 'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'l' | 'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'm' | 'M' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'n' | 'N' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'o' | 'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'p' | 'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'q' | 'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'r' | 'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        's' | 'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        't' | 'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'u' | 'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'v' | 'V' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'w' | 'W' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'x' | 'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'y' | 'Y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        'z' | 'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        '+' => [0b000, 0b010, 0b111, 0b010, 0b000],
        '!' => [0b010, 0b010, 0b010, 0b000, 0b010],
        '#' => [0b101, 0b111, 0b101, 0b111, 0b101],
        '(' => [0b001, 0b010, 0b010, 0b010, 0b001],
        ')' => [0b100, 0b010, 0b010, 0b010, 0b100],
        '\'' => [0b010, 0b010, 0b000, 0b000, 0b000],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _   => [0b000, 0b000, 0b010, 0b000, 0b000], // fallback dot
    }
}

/// Alpha-blend two ARGB colors. `t` = 0.0 → all `a`, `t` = 1.0 → all `b`.
fn blend(a: u32, b: u32, t: f32) -> u32 {
    let t = t.clamp(0.0, 1.0);
    let lerp = |ca: u32, cb: u32| (ca as f32 * (1.0-t) + cb as f32 * t) as u32;
    let ar = (a >> 16) & 0xFF; let br = (b >> 16) & 0xFF;
    let ag = (a >>  8) & 0xFF; let bg = (b >>  8) & 0xFF;
    let ab =  a        & 0xFF; let bb =  b        & 0xFF;
    0xFF000000 | (lerp(ar,br) << 16) | (lerp(ag,bg) << 8) | lerp(ab,bb)
}
