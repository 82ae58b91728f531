//! Audio subsystem: codec control and the serial audio frame port
//!
//! # Structure
//!
//! - `codec/`: codec drivers (`Wm8731`, host-testable over any async I²C)
//! - `frame_port`: SPI2 TI-frame slave port and its interrupt (hardware)
//! - `emulator`: frame clock thread standing in for the port (desktop)
//!
//! # Dependency Injection
//!
//! The sequencer targets [`platform::AudioCodec`] and [`platform::FrameIrq`].
//! Concrete types are injected at the call site:
//!
//! ```rust,ignore
//! // Hardware:
//! player.run(&mut pipeline, &mut Spi2FrameIrq::new()).await;
//! // Desktop:
//! player.run(&mut pipeline, &mut EmulatorFrameIrq::new()).await;
//! ```

pub mod codec;

#[cfg(feature = "hardware")]
pub mod frame_port;

#[cfg(feature = "emulator")]
pub mod emulator;

pub use codec::wm8731::Wm8731;
