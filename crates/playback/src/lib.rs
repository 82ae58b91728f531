//! WAV streaming pipeline: storage → ring buffer → frame interrupt
//!
//! Two timing domains meet in a fixed 1 KiB byte ring:
//!
//! - the [`feeder`] runs in the foreground, reading the file as fast as
//!   storage allows and yielding whenever the ring is full;
//! - the [`emitter`] runs in the frame interrupt at the codec's sample clock,
//!   popping four bytes per frame and writing them MSB first to the port.
//!
//! [`pipeline::Pipeline`] sequences one file through both, and
//! [`wav_header`] / [`session`] describe the file being played.
#![cfg_attr(not(test), no_std)]
#![deny(clippy::unwrap_used)]
#![allow(async_fn_in_trait)]

pub mod emitter;
pub mod feeder;
pub mod pipeline;
pub mod ring_buffer;
pub mod session;
pub mod wav_header;

pub use emitter::{EmitterStats, FrameEmitter};
pub use feeder::{FeedError, Feeder};
pub use pipeline::{PlayError, PlayReport, Pipeline};
pub use ring_buffer::{Consumer, Producer, RingBuffer};
pub use session::{PlaybackSession, SessionError};
pub use wav_header::{AudioHeaderInfo, HeaderError};
