//! # gesture_tree
//!
//! Hand-gesture controller for the wish tree and photo gallery, with a
//! software-rendered visualizer.
//!
//! ## Gesture → Action mapping
//!
//! | Gesture | Hands | Action |
//! |---|---|---|
//! | Open palm | one | Tree → gallery spread |
//! | Fist | one | Back to the tree from anywhere; hold and move to spin it |
//! | Move sideways | one | Scroll the gallery with inertia |
//! | Pinch (thumb to index) | one | Zoom the focused photo; release to return |
//! | Heart (index and thumb tips touching) | two | "I LOVE …" overlay |
//!
//! ## Feature flags
//!
//! * (default) — **Simulation mode**: keyboard and mouse drive a synthetic hand.
//! * `leap` — **Hardware mode**: polls a real LeapMotion controller via LeapC.
//!
//! ### Simulation controls
//!
//! | Key | Action |
//! |---|---|
//! | mouse | Move the hand |
//! | `1` / `2` / `3` / `4` | Open / relaxed / fist / pinch |
//! | `H` | Toggle two-hand heart |
//! | `V` | Toggle hand visibility |
//! | `←` / `→` | Jump to previous / next photo |
//! | `U` | Upload a photo (path typed on stdin) |
//! | `W` | Send a wish (text typed on stdin) |
//! | `R` | Set the heart overlay name |
//! | `Q` / `Esc` | Quit |

pub mod app;
pub mod source;
pub mod visualizer;
