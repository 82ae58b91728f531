//! Hardware Abstraction Layer (HAL) for the WM8731 WAV player
//!
//! This crate provides trait-based abstractions for every collaborator the
//! audio pipeline touches, enabling development and testing without the board.
//!
//! # Architecture Layers
//!
//! ```text
//! Application Layer (firmware crate: sequencer, codec driver, status screen)
//!         ↓
//! Feature Layer (playback: ring buffer, feeder, frame emitter)
//!         ↓
//! Platform HAL (this crate - trait abstractions)
//!         ↓
//! Hardware Layer (Embassy HAL + PAC, embedded-sdmmc)
//! ```
//!
//! # Abstractions
//!
//! - [`Storage`] / [`File`] - random-access byte storage (SD card, local disk)
//! - [`AudioCodec`] - codec control bus (reset/configure, activate, volume)
//! - [`FramePort`] / [`FrameHandler`] / [`FrameIrq`] - serial audio bus and
//!   its "frame needed" interrupt
//! - [`StatusDisplay`] - progress text sink
//!
//! # Features
//!
//! - `std`: local filesystem storage and mocks (host tests, desktop player)
//! - `sdmmc`: SD card storage via `embedded-sdmmc`
//! - `defmt`: `defmt::Format` derives for hardware logging

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(clippy::unreachable)] // no unreachable!() that isn't documented
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)] // unsafe fn body is not implicitly unsafe block
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
// Pedantic lints suppressed for this hardware HAL crate:
#![allow(clippy::doc_markdown)] // hex addresses and register names in doc comments
#![allow(clippy::must_use_candidate)] // hardware accessors: callers decide
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(async_fn_in_trait)] // Embassy no_std: single-threaded, Send bounds not needed

pub mod audio;
pub mod audio_types;
pub mod config;
pub mod display;
pub mod frame;
pub mod storage;

#[cfg(feature = "std")]
pub mod storage_local;

#[cfg(feature = "sdmmc")]
pub mod storage_sdmmc;

#[cfg(any(test, feature = "std"))]
pub mod mocks;

// Re-export main high-level traits
pub use audio::{AudioCodec, CodecState};
pub use audio_types::{HeadphoneVolume, OutOfRangeError, VolumeLevel};
pub use display::{StatusDisplay, StatusRow};
pub use frame::{FrameHandler, FrameIrq, FramePort};
pub use storage::{File, Storage};
