//! `pinchclaw-runtime` – threads, pacing and process-wide logging.
//!
//! Wires the hand tracker to the game session.
//!
//! # Modules
//!
//! - [`tracker`] – [`spawn_tracker`][tracker::spawn_tracker]: runs a
//!   [`HandSource`][pinchclaw_perception::HandSource] on its own thread and
//!   publishes normalized readings into a
//!   [`SignalSlot`][pinchclaw_perception::SignalSlot].
//! - [`frame_loop`] – [`FrameLoop`][frame_loop::FrameLoop]: the fixed-rate
//!   game tick, in realtime or deterministic lockstep mode, returning a
//!   [`FrameLoopReport`][frame_loop::FrameLoopReport].
//! - [`telemetry`] – [`init_tracing`][telemetry::init_tracing]: initialises
//!   the global `tracing` subscriber with an optional OTLP span exporter.
//!   Set `OTEL_EXPORTER_OTLP_ENDPOINT` to enable trace export.

pub mod frame_loop;
pub mod telemetry;
pub mod tracker;

pub use frame_loop::{FrameLoop, FrameLoopConfig, FrameLoopReport, StopReason};
pub use telemetry::{TracerProviderGuard, init_tracing};
pub use tracker::{Tracker, TrackerHandle, spawn_tracker};
