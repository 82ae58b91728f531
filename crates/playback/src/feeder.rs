//! Foreground producer: storage → ring buffer.
//!
//! The feeder reads the payload in small chunks sized by the free space in the
//! ring, the session's remaining count and [`FEED_CHUNK`]. When the ring is
//! full it yields and polls again; the frame interrupt frees space
//! asynchronously. There is no timeout anywhere in the loop.

use embassy_futures::yield_now;
use platform::config::{FEED_CHUNK, FRAME_WORD_BYTES};
use platform::File;

use crate::ring_buffer::Producer;
use crate::session::PlaybackSession;

/// Errors that end feeding early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FeedError<E> {
    /// Storage read failure
    Storage(E),
    /// File ended while the session still expected bytes
    UnexpectedEof {
        /// Bytes the session still expected
        remaining: u64,
    },
}

impl<E: core::fmt::Debug> core::fmt::Display for FeedError<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Storage(e) => write!(f, "storage read failed: {e:?}"),
            Self::UnexpectedEof { remaining } => {
                write!(f, "file ended with {remaining} audio bytes outstanding")
            }
        }
    }
}

/// Producer side of the pipeline.
pub struct Feeder<'a, const N: usize> {
    producer: Producer<'a, N>,
}

impl<'a, const N: usize> Feeder<'a, N> {
    /// Wrap the ring's producer handle.
    pub fn new(producer: Producer<'a, N>) -> Self {
        Self { producer }
    }

    /// The underlying producer handle.
    pub fn producer(&self) -> &Producer<'a, N> {
        &self.producer
    }

    /// Mutable access for [`crate::ring_buffer::reset`].
    pub fn producer_mut(&mut self) -> &mut Producer<'a, N> {
        &mut self.producer
    }

    /// Fill the ring until it is full or the session is exhausted.
    ///
    /// Run before the frame interrupt is enabled. Returns the bytes pushed.
    pub async fn prime<F: File>(
        &mut self,
        file: &mut F,
        session: &mut PlaybackSession,
    ) -> Result<usize, FeedError<F::Error>> {
        let mut pushed = 0usize;
        while !session.is_finished() && !self.producer.is_full() {
            pushed = pushed.saturating_add(self.fill_once(file, session).await?);
        }
        Ok(pushed)
    }

    /// Feed until the session is exhausted, yielding while the ring is full.
    ///
    /// Returns the bytes pushed.
    pub async fn run<F: File>(
        &mut self,
        file: &mut F,
        session: &mut PlaybackSession,
    ) -> Result<usize, FeedError<F::Error>> {
        let mut pushed = 0usize;
        while !session.is_finished() {
            if self.producer.is_full() {
                yield_now().await;
                continue;
            }
            pushed = pushed.saturating_add(self.fill_once(file, session).await?);
        }
        Ok(pushed)
    }

    /// Close the ring and wait until the consumer has taken every complete
    /// frame word.
    ///
    /// A trailing fragment shorter than one word is never popped; it is
    /// returned so the caller can report it.
    pub async fn drain(&mut self) -> usize {
        self.producer.close();
        while self.producer.pending() >= FRAME_WORD_BYTES {
            yield_now().await;
        }
        self.producer.pending()
    }

    /// One storage read of at most `min(free, remaining, FEED_CHUNK)` bytes.
    async fn fill_once<F: File>(
        &mut self,
        file: &mut F,
        session: &mut PlaybackSession,
    ) -> Result<usize, FeedError<F::Error>> {
        let mut chunk = [0u8; FEED_CHUNK];
        let want = session.budget(self.producer.free().min(FEED_CHUNK));
        let Some(dst) = chunk.get_mut(..want).filter(|d| !d.is_empty()) else {
            return Ok(0);
        };
        let n = file.read(dst).await.map_err(FeedError::Storage)?;
        if n == 0 {
            return Err(FeedError::UnexpectedEof { remaining: session.remaining() });
        }
        // n <= want <= free, so everything fits.
        let pushed = chunk.get(..n).map_or(0, |data| self.producer.push_slice(data));
        session.consume(pushed);
        Ok(pushed)
    }
}
