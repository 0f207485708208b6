//! `pinchclaw-perception` – hand tracking front end.
//!
//! Turns raw, noisy hand-landmark frames into the compact
//! [`HandSignal`][pinchclaw_types::HandSignal] that the claw consumes.
//!
//! # Modules
//!
//! - [`gesture`] – [`GestureNormalizer`][gesture::GestureNormalizer]: reduces
//!   a landmark set to wrist position, depth proxy and a pinch flag, falling
//!   back to the neutral signal for missing or malformed input.
//! - [`signal_slot`] – [`SignalSlot`][signal_slot::SignalSlot]: single-slot,
//!   last-writer-wins cell shared between the tracker thread and the frame
//!   loop.
//! - [`source`] – [`HandSource`][source::HandSource]: the producer trait plus
//!   a JSON-lines [`ReplaySource`][source::ReplaySource].
//! - [`sim`] – synthetic landmark generation and the deterministic
//!   [`SweepSource`][sim::SweepSource] for headless play without a camera.

pub mod gesture;
pub mod signal_slot;
pub mod sim;
pub mod source;

pub use gesture::{GestureNormalizer, HandDetection, Landmark};
pub use signal_slot::SignalSlot;
pub use source::{HandSource, ReplaySource};
