//! One-file playback: prime, enable, feed, drain, tear down.
//!
//! `Pipeline` owns both halves of the ring. The [`FrameEmitter`] is parked
//! inside the pipeline between playbacks and lent to the frame interrupt
//! (via [`FrameIrq::attach`]) only while a file is playing.
//!
//! ```text
//!  reset ring ─► prime ─► attach irq ─► codec.activate
//!                                            │
//!                          feed until session finished
//!                                            │
//!                          drain whole frame words
//!                                            │
//!              detach irq ◄─ codec.deactivate
//! ```
//!
//! Teardown (deactivate + detach) runs whenever attach happened, whatever
//! the outcome of feeding.

use platform::{AudioCodec, File, FrameIrq, FramePort};

use crate::emitter::{EmitterStats, FrameEmitter};
use crate::feeder::{FeedError, Feeder};
use crate::ring_buffer::{self, RingBuffer};
use crate::session::PlaybackSession;

/// Errors from [`Pipeline::play`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlayError<FE, CE> {
    /// Storage read failure while feeding
    Storage(FE),
    /// File ended before the session's byte count
    UnexpectedEof {
        /// Bytes the session still expected
        remaining: u64,
    },
    /// Codec control bus failure
    Codec(CE),
    /// The interrupt slot did not hand the emitter back
    HandlerLost,
}

impl<FE, CE> From<FeedError<FE>> for PlayError<FE, CE> {
    fn from(e: FeedError<FE>) -> Self {
        match e {
            FeedError::Storage(e) => Self::Storage(e),
            FeedError::UnexpectedEof { remaining } => Self::UnexpectedEof { remaining },
        }
    }
}

impl<FE: core::fmt::Debug, CE: core::fmt::Debug> core::fmt::Display for PlayError<FE, CE> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Storage(e) => write!(f, "storage read failed: {e:?}"),
            Self::UnexpectedEof { remaining } => {
                write!(f, "file ended with {remaining} audio bytes outstanding")
            }
            Self::Codec(e) => write!(f, "codec control failed: {e:?}"),
            Self::HandlerLost => f.write_str("frame handler not returned by interrupt slot"),
        }
    }
}

/// Summary of a finished playback.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PlayReport {
    /// Bytes queued before the interrupt was enabled
    pub primed: usize,
    /// Payload bytes moved from storage into the ring
    pub bytes_fed: u64,
    /// Frame interrupt counters
    pub emitter: EmitterStats,
    /// Trailing bytes shorter than one frame word, never sent
    pub residual: usize,
}

/// Ring buffer, feeder and (parked) emitter for one output port.
pub struct Pipeline<'a, P, const N: usize> {
    feeder: Feeder<'a, N>,
    emitter: Option<FrameEmitter<'a, P, N>>,
}

impl<'a, P: FramePort, const N: usize> Pipeline<'a, P, N> {
    /// Split `ring` and bind its consumer to `port`.
    pub fn new(ring: &'a mut RingBuffer<N>, port: P) -> Self {
        let (producer, consumer) = ring.split();
        Self { feeder: Feeder::new(producer), emitter: Some(FrameEmitter::new(consumer, port)) }
    }

    /// The parked emitter; `None` while attached or after a lost handler.
    pub fn emitter(&self) -> Option<&FrameEmitter<'a, P, N>> {
        self.emitter.as_ref()
    }

    /// Play the payload of `file`, which must already sit on the first audio
    /// byte, until `session` is exhausted.
    ///
    /// The codec must be configured (`init`) beforehand; this only toggles
    /// its digital interface around the stream.
    pub async fn play<F, I, C>(
        &mut self,
        file: &mut F,
        session: &mut PlaybackSession,
        irq: &mut I,
        codec: &mut C,
    ) -> Result<PlayReport, PlayError<F::Error, C::Error>>
    where
        F: File,
        I: FrameIrq<FrameEmitter<'a, P, N>>,
        C: AudioCodec,
    {
        let mut emitter = self.emitter.take().ok_or(PlayError::HandlerLost)?;
        ring_buffer::reset(self.feeder.producer_mut(), emitter.consumer_mut());
        emitter.reset_stats();

        let primed = match self.feeder.prime(file, session).await {
            Ok(n) => n,
            Err(e) => {
                self.emitter = Some(emitter);
                return Err(e.into());
            }
        };
        #[cfg(feature = "defmt")]
        defmt::debug!("ring primed with {} bytes", primed);
        #[cfg(feature = "tracing")]
        tracing::debug!(primed, "ring primed");

        irq.attach(emitter);
        let streamed = match codec.activate().await {
            Ok(()) => self.stream(file, session).await,
            Err(e) => Err(PlayError::Codec(e)),
        };
        let deactivated = codec.deactivate().await.map_err(PlayError::Codec);
        self.emitter = irq.detach();

        let residual = streamed?;
        deactivated?;
        let emitter = self.emitter.as_ref().ok_or(PlayError::HandlerLost)?;

        let report = PlayReport {
            primed,
            bytes_fed: session.consumed(),
            emitter: emitter.stats(),
            residual,
        };
        #[cfg(feature = "defmt")]
        defmt::info!(
            "playback done: {} bytes, {} frames, {} underruns, {} idle",
            report.bytes_fed,
            report.emitter.frames,
            report.emitter.underruns,
            report.emitter.idle
        );
        #[cfg(feature = "tracing")]
        tracing::info!(
            bytes = report.bytes_fed,
            frames = report.emitter.frames,
            underruns = report.emitter.underruns,
            idle = report.emitter.idle,
            "playback done"
        );
        Ok(report)
    }

    async fn stream<F: File, CE>(
        &mut self,
        file: &mut F,
        session: &mut PlaybackSession,
    ) -> Result<usize, PlayError<F::Error, CE>> {
        self.feeder.run(file, session).await?;
        Ok(self.feeder.drain().await)
    }
}
