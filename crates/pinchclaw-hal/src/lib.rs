//! `pinchclaw-hal` – the claw gantry.
//!
//! Converts hand readings into claw motion.  The gantry is simulated, so the
//! "hardware" here is the smoothed, bounded claw position that the grab logic
//! and the renderer read every frame.
//!
//! # Modules
//!
//! - [`cursor`] – [`CursorMapper`][cursor::CursorMapper]: affine remap of a
//!   [`HandSignal`][pinchclaw_types::HandSignal] into play-field coordinates,
//!   per-axis clamping, and a first-order low-pass filter on the claw
//!   position.

pub mod cursor;

pub use cursor::{AxisMap, CursorMapper, CursorMapping, PARKED_POSITION};
