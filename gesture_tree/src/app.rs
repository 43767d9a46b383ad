//! Top-level application state.
//!
//! `AppState` owns the interaction core, the photo decode worker and the
//! mailbox the landmark source posts into.  It applies UI [`Control`]s and
//! drives the visualizer each frame.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Instant;

use anyhow::Context;
use serde::Deserialize;
use tracing::{debug, info, warn};

use hand_landmarks::FrameMailbox;
use tree_gallery::{GalleryConfig, InteractionState, PhotoIntake, TickReport, DEFAULT_CAPTION};

use crate::source::{spawn_landmark_source, SimInput};
use crate::visualizer::Visualizer;

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

/// Configuration for the full application, loadable from TOML.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub gallery:      GalleryConfig,
    /// Name shown in the heart overlay.
    pub recipient:    String,
    /// Photos queued for decoding at startup.
    pub photos:       Vec<PathBuf>,
    /// Wish text used when prompts are skipped.
    pub default_wish: String,
    /// Largest tick step; longer stalls are treated as this long.
    pub max_dt:       f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            gallery:      GalleryConfig::default(),
            recipient:    "U".to_string(),
            photos:       Vec::new(),
            default_wish: DEFAULT_CAPTION.to_string(),
            max_dt:       0.1,
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(text: &str) -> anyhow::Result<Self> {
        toml::from_str(text).context("parsing config")
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("in {}", path.display()))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Controls
// ════════════════════════════════════════════════════════════════════════════

/// Discrete UI actions, independent of gestures.
///
/// Empty payloads mean "ask the user"; the run loop prompts on stdin.
#[derive(Clone, Debug, PartialEq)]
pub enum Control {
    UploadPhoto(Option<PathBuf>),
    SendWish(String),
    JumpTo(usize),
    JumpBy(isize),
    SetRecipient(Option<String>),
}

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

pub struct AppState {
    core:      InteractionState,
    mailbox:   FrameMailbox,
    intake:    PhotoIntake,
    recipient: String,
    default_wish: String,
    max_dt:    f32,
    pub status: String,
}

impl AppState {
    pub fn new(cfg: AppConfig, mailbox: FrameMailbox) -> Self {
        let mut intake = PhotoIntake::spawn();
        for path in &cfg.photos {
            intake.request(path.clone(), "");
        }
        let status = format!("Ready. {} photo(s) loading", cfg.photos.len());
        AppState {
            core: InteractionState::new(cfg.gallery),
            mailbox,
            intake,
            recipient: cfg.recipient,
            default_wish: cfg.default_wish,
            max_dt: cfg.max_dt,
            status,
        }
    }

    // ── process one Control ──────────────────────────────────────────────

    pub fn handle_control(&mut self, control: Control) {
        match control {
            Control::UploadPhoto(Some(path)) => {
                let id = self.intake.request(path.clone(), "");
                self.status = format!("Loading {} as {}", path.display(), id);
            }
            Control::UploadPhoto(None) => {}

            Control::SendWish(text) => {
                let text = if text.trim().is_empty() { self.default_wish.clone() } else { text };
                match self.core.send_wish(&text) {
                    Ok(Some(_)) => self.status = format!("Wish sent: {}", text.trim()),
                    Ok(None)    => {}
                    Err(e)      => self.status = format!("Wish not sent: {e}"),
                }
            }

            Control::JumpTo(i) => self.core.jump_to(i),
            Control::JumpBy(step) => {
                let here = self.core.focused_index().unwrap_or(0) as isize;
                self.core.jump_to((here + step).max(0) as usize);
            }

            Control::SetRecipient(Some(name)) => {
                let name = name.trim();
                if !name.is_empty() {
                    self.recipient = name.to_string();
                }
            }
            Control::SetRecipient(None) => {}
        }
    }

    // ── Per-frame tick ────────────────────────────────────────────────────

    pub fn tick(&mut self, dt: f32) -> TickReport {
        for item in self.intake.drain() {
            self.status = format!("Photo {} added", item.id);
            self.core.add_item(item);
        }

        let frame = self.mailbox.take_latest();
        let report = self.core.tick(frame, dt.min(self.max_dt));

        if let Some(t) = report.transition {
            self.status = format!("{} -> {}", t.from, t.to);
        }
        if let Some(f) = report.focus_changed {
            debug!(target: "app", focus = ?f.current, "focus");
        }
        if !report.arrivals.is_empty() {
            self.status = "A wish reached the star!".to_string();
        }
        report
    }

    // ── Accessors for the render loop ─────────────────────────────────────

    pub fn core(&self)      -> &InteractionState { &self.core }
    pub fn recipient(&self) -> &str              { &self.recipient }
}

// ════════════════════════════════════════════════════════════════════════════
// run() — the main application loop
// ════════════════════════════════════════════════════════════════════════════

/// Run the full application.
///
/// Creates the visualizer and the landmark source (simulation by default,
/// hardware with `--features leap`) and drives the frame loop at ~60 fps.
/// With `quick`, controls that would prompt on stdin use defaults instead.
pub fn run(cfg: AppConfig, quick: bool) -> anyhow::Result<()> {
    // ── Sim input channel (window keys → simulated hand) ─────────────────
    let (sim_tx, sim_rx) = mpsc::channel::<SimInput>();

    #[cfg(feature = "leap")]
    let mailbox = {
        drop(sim_rx);
        spawn_landmark_source(crate::source::LeapLandmarkSource)
    };
    #[cfg(not(feature = "leap"))]
    let mailbox = spawn_landmark_source(crate::source::SimLandmarkSource { rx: sim_rx });

    let mut vis = Visualizer::new(sim_tx, cfg.gallery.layout.tree_height)?;
    let mut app = AppState::new(cfg, mailbox);
    app.core.set_aspect(vis.aspect());
    info!(target: "app", "frame loop started");

    let mut last = Instant::now();
    while vis.is_open() {
        let Some(controls) = vis.poll_input() else { break };

        for control in controls {
            let control = if quick { control } else { fill_from_prompt(control) };
            app.handle_control(control);
        }

        let now = Instant::now();
        let dt = now.duration_since(last).as_secs_f32();
        last = now;
        app.tick(dt);

        vis.render(&app.core.frame_view(), &app.recipient, &app.status);
    }

    let dropped = app.mailbox.dropped();
    if dropped > 0 {
        warn!(target: "app", dropped, "landmark frames were overwritten before use");
    }
    Ok(())
}

/// Replace an empty payload with text typed on stdin.
fn fill_from_prompt(control: Control) -> Control {
    match control {
        Control::UploadPhoto(None) => {
            let path = prompt("Photo path");
            if path.is_empty() { Control::UploadPhoto(None) } else { Control::UploadPhoto(Some(path.into())) }
        }
        Control::SendWish(text) if text.trim().is_empty() => Control::SendWish(prompt("Wish")),
        Control::SetRecipient(None) => {
            let name = prompt("Recipient name");
            Control::SetRecipient(if name.is_empty() { None } else { Some(name) })
        }
        other => other,
    }
}

/// Prompt on stdout/stdin.  This briefly pauses the frame loop.
fn prompt(label: &str) -> String {
    print!("  {label}: ");
    io::stdout().flush().ok();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
