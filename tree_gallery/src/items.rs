//! Photo items and background decoding.
//!
//! The item list is append-only for a session.  Decoding happens on a
//! worker thread so the frame tick never waits on disk or codec work; the
//! tick picks up finished items with [`PhotoIntake::drain`].

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;

use thiserror::Error;
use tracing::{debug, info, warn};

/// Caption used when the wish text at upload time is blank.
pub const DEFAULT_CAPTION: &str = "Merry Christmas";

/// Longest edge of the thumbnail kept for drawing.
pub const THUMBNAIL_EDGE: u32 = 96;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub u64);

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Small downscaled copy of a photo, packed `0xFFRRGGBB` row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct Thumbnail {
    pub width:  u32,
    pub height: u32,
    pub pixels: Vec<u32>,
}

impl Thumbnail {
    /// Flat grey tile, used for items created without an image file.
    pub fn solid(width: u32, height: u32, argb: u32) -> Self {
        Thumbnail { width, height, pixels: vec![argb; (width * height) as usize] }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get((y * self.width + x) as usize).copied()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ImageHandle {
    pub source:    PathBuf,
    pub width:     u32,
    pub height:    u32,
    pub thumbnail: Thumbnail,
}

/// One photo in the gallery.  Immutable after creation.
#[derive(Clone, Debug, PartialEq)]
pub struct Item {
    pub id:           ItemId,
    pub image:        ImageHandle,
    /// width / height, always finite and positive.
    pub aspect_ratio: f32,
    pub caption:      String,
}

impl Item {
    /// Build an item from an already-decoded image.
    pub fn new(id: ItemId, image: ImageHandle, caption: &str) -> Result<Self, PhotoError> {
        if image.height == 0 || image.width == 0 {
            return Err(PhotoError::ZeroHeight { path: image.source.clone() });
        }
        let aspect_ratio = image.width as f32 / image.height as f32;
        Ok(Item { id, image, aspect_ratio, caption: caption_for(caption) })
    }

    /// Item backed by a flat tile instead of a file; used by the simulator
    /// and tests.
    pub fn placeholder(id: ItemId, width: u32, height: u32, caption: &str) -> Result<Self, PhotoError> {
        let longest = u64::from(width.max(height).max(1));
        let edge = u64::from(THUMBNAIL_EDGE);
        // At most THUMBNAIL_EDGE after the division, so the casts are lossless.
        let tw = (u64::from(width) * edge / longest).max(1) as u32;
        let th = (u64::from(height) * edge / longest).max(1) as u32;
        let image = ImageHandle {
            source:    PathBuf::from(format!("placeholder-{}", id.0)),
            width,
            height,
            thumbnail: Thumbnail::solid(tw, th, 0xFF_80_80_80),
        };
        Item::new(id, image, caption)
    }
}

/// Blank or whitespace-only text becomes [`DEFAULT_CAPTION`].
pub fn caption_for(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        DEFAULT_CAPTION.to_string()
    } else {
        trimmed.to_string()
    }
}

#[derive(Debug, Error)]
pub enum PhotoError {
    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        path:   PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("{} has a zero dimension", path.display())]
    ZeroHeight { path: PathBuf },
}

/// Decode a file into an [`Item`] with a thumbnail.
pub fn decode_photo(id: ItemId, path: &Path, caption: &str) -> Result<Item, PhotoError> {
    let img = image::open(path).map_err(|source| PhotoError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    let (width, height) = (img.width(), img.height());
    if width == 0 || height == 0 {
        return Err(PhotoError::ZeroHeight { path: path.to_path_buf() });
    }

    let thumb = img.thumbnail(THUMBNAIL_EDGE, THUMBNAIL_EDGE).to_rgba8();
    let pixels = thumb
        .pixels()
        .map(|p| {
            let [r, g, b, _] = p.0;
            0xFF00_0000 | ((r as u32) << 16) | ((g as u32) << 8) | b as u32
        })
        .collect();

    let image = ImageHandle {
        source: path.to_path_buf(),
        width,
        height,
        thumbnail: Thumbnail { width: thumb.width(), height: thumb.height(), pixels },
    };
    Item::new(id, image, caption)
}

// ════════════════════════════════════════════════════════════════════════════
// PhotoIntake — worker thread
// ════════════════════════════════════════════════════════════════════════════

struct PhotoRequest {
    id:      ItemId,
    path:    PathBuf,
    caption: String,
}

/// Handle to the decode worker.  Dropping it stops the worker once its
/// queue is empty.
pub struct PhotoIntake {
    req_tx:  Sender<PhotoRequest>,
    done_rx: Receiver<Result<Item, PhotoError>>,
    next_id: u64,
    pending: usize,
}

impl PhotoIntake {
    pub fn spawn() -> Self {
        Self::spawn_from(1)
    }

    /// Start the worker with ids beginning at `first_id`.
    pub fn spawn_from(first_id: u64) -> Self {
        let (req_tx, req_rx) = mpsc::channel::<PhotoRequest>();
        let (done_tx, done_rx) = mpsc::channel();
        thread::spawn(move || decode_thread(req_rx, done_tx));
        PhotoIntake { req_tx, done_rx, next_id: first_id, pending: 0 }
    }

    /// Queue a file for decoding.  Never blocks.
    pub fn request(&mut self, path: impl Into<PathBuf>, caption: &str) -> ItemId {
        let id = ItemId(self.next_id);
        self.next_id += 1;
        let path = path.into();
        debug!(target: "photos", %id, path = %path.display(), "decode requested");
        let req = PhotoRequest { id, path, caption: caption.to_string() };
        if self.req_tx.send(req).is_err() {
            warn!(target: "photos", %id, "decode worker is gone; request dropped");
        } else {
            self.pending += 1;
        }
        id
    }

    /// Collect every decode finished since the last call.  Failures are
    /// logged and produce no item.
    pub fn drain(&mut self) -> Vec<Item> {
        let mut items = Vec::new();
        loop {
            match self.done_rx.try_recv() {
                Ok(Ok(item)) => {
                    self.pending = self.pending.saturating_sub(1);
                    info!(target: "photos", id = %item.id, aspect = item.aspect_ratio, "photo ready");
                    items.push(item);
                }
                Ok(Err(e)) => {
                    self.pending = self.pending.saturating_sub(1);
                    warn!(target: "photos", error = %e, "photo skipped");
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        items
    }

    /// Requests sent but not yet drained.
    pub fn pending(&self) -> usize {
        self.pending
    }
}

fn decode_thread(rx: Receiver<PhotoRequest>, tx: Sender<Result<Item, PhotoError>>) {
    for req in rx {
        let result = decode_photo(req.id, &req.path, &req.caption);
        if tx.send(result).is_err() {
            break;
        }
    }
    debug!(target: "photos", "decode worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn drain_until(intake: &mut PhotoIntake, want_pending: usize) -> Vec<Item> {
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut out = Vec::new();
        while intake.pending() > want_pending && Instant::now() < deadline {
            out.extend(intake.drain());
            thread::sleep(Duration::from_millis(5));
        }
        out
    }

    #[test]
    fn blank_caption_gets_default() {
        assert_eq!(caption_for(""), DEFAULT_CAPTION);
        assert_eq!(caption_for("   "), DEFAULT_CAPTION);
        assert_eq!(caption_for(" hi "), "hi");
    }

    #[test]
    fn placeholder_aspect() {
        let item = Item::placeholder(ItemId(3), 400, 200, "").unwrap();
        assert!((item.aspect_ratio - 2.0).abs() < 1e-6);
        assert_eq!(item.caption, DEFAULT_CAPTION);
        assert_eq!(item.image.thumbnail.width, THUMBNAIL_EDGE);
        assert_eq!(item.image.thumbnail.height, THUMBNAIL_EDGE / 2);
    }

    #[test]
    fn huge_placeholder_keeps_thumbnail_small() {
        let item = Item::placeholder(ItemId(4), u32::MAX, u32::MAX / 2, "").unwrap();
        assert_eq!(item.image.thumbnail.width, THUMBNAIL_EDGE);
        assert!((47..=48).contains(&item.image.thumbnail.height));
        assert!((item.aspect_ratio - 2.0).abs() < 1e-3);
    }

    #[test]
    fn zero_dimension_rejected() {
        assert!(matches!(
            Item::placeholder(ItemId(1), 10, 0, "x"),
            Err(PhotoError::ZeroHeight { .. })
        ));
    }

    #[test]
    fn missing_file_yields_no_item() {
        let mut intake = PhotoIntake::spawn();
        intake.request("/definitely/not/here.png", "wish");
        let items = drain_until(&mut intake, 0);
        assert!(items.is_empty());
        assert_eq!(intake.pending(), 0);
    }

    #[test]
    fn decodes_real_png() {
        let path = std::env::temp_dir().join(format!("tree_gallery_{}.png", std::process::id()));
        let img = image::RgbaImage::from_pixel(192, 128, image::Rgba([200, 10, 10, 255]));
        img.save(&path).unwrap();

        let mut intake = PhotoIntake::spawn();
        let id = intake.request(&path, "");
        let items = drain_until(&mut intake, 0);
        let _ = std::fs::remove_file(&path);

        assert_eq!(items.len(), 1);
        let item = &items[0];
        assert_eq!(item.id, id);
        assert_eq!((item.image.width, item.image.height), (192, 128));
        assert!((item.aspect_ratio - 1.5).abs() < 1e-6);
        assert_eq!(item.caption, DEFAULT_CAPTION);
        assert_eq!(item.image.thumbnail.pixel(0, 0), Some(0xFF_C8_0A_0A));
    }

    #[test]
    fn ids_are_sequential() {
        let mut intake = PhotoIntake::spawn_from(10);
        let a = intake.request("/nope/a.png", "");
        let b = intake.request("/nope/b.png", "");
        assert_eq!((a, b), (ItemId(10), ItemId(11)));
        drain_until(&mut intake, 0);
    }
}
