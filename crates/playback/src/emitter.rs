//! Interrupt-side consumer: ring buffer → serial audio port.
//!
//! Runs once per frame request, in interrupt context. Never touches storage,
//! never allocates, never blocks, never logs.

use platform::config::FRAME_WORD_BYTES;
use platform::{FrameHandler, FramePort};

use crate::ring_buffer::Consumer;

/// Counters kept by the emitter across one playback.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EmitterStats {
    /// Words written to the port (data and silence)
    pub frames: u32,
    /// Frames that found fewer than four queued bytes mid-stream and sent
    /// silence
    pub underruns: u32,
    /// Silent frames sent after the producer closed the stream
    pub idle: u32,
}

/// Frame handler packing four ring bytes into each port word.
pub struct FrameEmitter<'a, P, const N: usize> {
    consumer: Consumer<'a, N>,
    port: P,
    stats: EmitterStats,
}

impl<'a, P: FramePort, const N: usize> FrameEmitter<'a, P, N> {
    /// Bind the ring's consumer handle to a port.
    pub fn new(consumer: Consumer<'a, N>, port: P) -> Self {
        Self { consumer, port, stats: EmitterStats::default() }
    }

    /// Counters since the last [`FrameEmitter::reset_stats`].
    pub fn stats(&self) -> EmitterStats {
        self.stats
    }

    /// Zero the counters.
    pub fn reset_stats(&mut self) {
        self.stats = EmitterStats::default();
    }

    /// The serial port.
    pub fn port(&self) -> &P {
        &self.port
    }

    /// Mutable access to the serial port.
    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }

    /// Mutable access for [`crate::ring_buffer::reset`].
    pub fn consumer_mut(&mut self) -> &mut Consumer<'a, N> {
        &mut self.consumer
    }
}

impl<P: FramePort, const N: usize> FrameHandler for FrameEmitter<'_, P, N> {
    fn on_frame(&mut self) {
        if !self.port.frame_requested() {
            return;
        }
        self.port.acknowledge();
        let word = match self.consumer.pop_group(FRAME_WORD_BYTES) {
            Some(word) => word,
            None if self.consumer.is_closed() => {
                self.stats.idle = self.stats.idle.wrapping_add(1);
                0
            }
            None => {
                self.stats.underruns = self.stats.underruns.wrapping_add(1);
                0
            }
        };
        self.port.write_word(word);
        self.stats.frames = self.stats.frames.wrapping_add(1);
    }
}
