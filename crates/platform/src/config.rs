//! Application configuration and constants
//!
//! This module defines central configuration values used across the application.
//! Naming, file locations and buffer geometry should reference these constants
//! rather than hardcoding values.

/// The application name
pub const APP_NAME: &str = "WM8731 Player";

/// Title drawn at the top of the status screen
pub const SCREEN_TITLE: &str = "WM8731  TEST";

/// Application version (synchronized with Cargo.toml)
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// File played at start-up, in the storage root.
///
/// FAT short names are case-insensitive; the SD backend upper-cases it.
pub const SOUND_FILE_NAME: &str = "sound.wav";

/// Size of the canonical PCM WAV header; audio data starts right after it.
pub const WAV_HEADER_LEN: u64 = 44;

/// Ring buffer capacity in bytes. Must be a power of two.
pub const RING_CAPACITY: usize = 1024;

/// Bytes packed into one serial audio word.
pub const FRAME_WORD_BYTES: usize = 4;

/// Largest single storage read issued by the feeder.
pub const FEED_CHUNK: usize = 64;

/// Control bus (I²C) clock.
pub const CONTROL_BUS_HZ: u32 = 100_000;

/// WM8731 7-bit I²C address (CSB tied low). 8-bit write address is 0x34.
pub const CODEC_I2C_ADDR: u8 = 0x1A;

/// Sample rate the codec is configured for (sampling control register).
pub const FIXED_SAMPLE_RATE_HZ: u32 = 44_100;

const _: () = assert!(RING_CAPACITY.is_power_of_two());
const _: () = assert!(FRAME_WORD_BYTES <= 4);
const _: () = assert!(FEED_CHUNK <= RING_CAPACITY);
