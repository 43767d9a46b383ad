//! # Tree Gallery
//!
//! The interaction core behind the gesture-driven wish tree.  Hand gestures
//! move the scene between three modes:
//!
//! | Gesture            | Effect |
//! |--------------------|--------|
//! | Fist               | back to the tree (any mode) |
//! | Open palm          | tree → spread gallery |
//! | Pinch              | spread → zoom on the focused photo |
//! | Release pinch      | zoom → spread |
//! | Sideways hand move | scroll the gallery with inertia |
//! | Two-hand heart     | overlay only, no mode change |
//!
//! Everything is owned by [`InteractionState`]; a host feeds it landmark
//! frames and reads back a [`FrameView`] to draw.
//!
//! ```
//! use hand_landmarks::{poses, LandmarkFrame, Point2};
//! use tree_gallery::{GalleryConfig, InteractionState, Item, ItemId, Mode};
//!
//! let mut state = InteractionState::with_seed(GalleryConfig::default(), 1);
//! state.add_item(Item::placeholder(ItemId(1), 640, 480, "hello").unwrap());
//!
//! let open = LandmarkFrame::new(0, vec![poses::open_palm(Point2::new(0.5, 0.7))]).unwrap();
//! let report = state.tick(Some(open), 1.0 / 60.0);
//! assert_eq!(report.transition.map(|t| t.to), Some(Mode::Spread));
//! ```

pub mod carousel;
pub mod config;
pub mod effects;
pub mod interaction;
pub mod items;
pub mod mode;
pub mod resolver;
pub mod scene;
pub mod smoothing;

pub use carousel::{Carousel, FocusEvent};
pub use config::{
    CarouselConfig, EffectConfig, GalleryConfig, LayoutConfig, SmoothingConfig, ViewpointConfig,
};
pub use effects::{Arrival, Effect, EffectError, EffectId, EffectKind, EffectOrigin, EffectScheduler};
pub use interaction::{FrameView, InteractionState, SceneItem, TickReport};
pub use items::{
    caption_for, decode_photo, ImageHandle, Item, ItemId, PhotoError, PhotoIntake, Thumbnail,
    DEFAULT_CAPTION,
};
pub use mode::{Mode, ModeMachine, ModeTransition};
pub use resolver::{facing, polaroid_size, resolve, tree_slot, zoom_scale, ResolveInput, Viewpoint};
pub use scene::SceneRig;
pub use smoothing::{smoothing_alpha, ItemTransform};
