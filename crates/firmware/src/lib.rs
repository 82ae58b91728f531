//! WM8731 WAV player firmware
//!
//! Streams one PCM WAV file from an SD card to a WM8731 codec on STM32H7.
//!
//! # Architecture
//!
//! ```text
//! Sequencer (player)              status output (ui)
//!         ↓
//! Pipeline (playback crate): feeder ─► ring ─► frame emitter
//!         ↓                                        ↓
//! Codec control (audio::codec)          Frame port (audio::frame_port)
//!         ↓                                        ↓
//! Platform HAL (Embassy, STM32 PAC, embedded-sdmmc)
//! ```
//!
//! # Features
//!
//! - `hardware` - Build for STM32H7 target (embassy, defmt, SD over SPI)
//! - `emulator` - Desktop player (tokio, tracing, simulated frame clock)
//! - `std` - Enable standard library (for emulator and testing)
//!
//! # Examples
//!
//! ## Hardware Target
//!
//! ```bash
//! cargo build --release --target thumbv7em-none-eabihf --features hardware
//! ```
//!
//! ## Desktop Player
//!
//! ```bash
//! MUSIC_PATH=./music cargo run --example desktop_player --features emulator
//! ```

#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
// Upgrade relevant warns to deny; keep pedantic as warn (too noisy for firmware)
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::await_holding_lock)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::print_stdout)]
#![warn(clippy::dbg_macro)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::unused_async)]
#![allow(async_fn_in_trait)]

pub mod audio;
pub mod boot;
pub mod player;
pub mod ui;

pub use audio::Wm8731;
pub use player::{Player, PlayerConfig, RunOutcome};
pub use ui::{LogStatus, StatusScreen};
