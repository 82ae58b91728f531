//! Byte budget for one playback.
//!
//! A `PlaybackSession` counts the audio payload bytes still to be read from
//! storage: file size minus the fixed header. The feeder decrements it; it
//! saturates at zero and is finished there.

use platform::config::WAV_HEADER_LEN;

/// Errors when starting a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionError {
    /// The file cannot even hold the header.
    TooShort {
        /// Actual file size in bytes
        size: u64,
    },
}

impl core::fmt::Display for SessionError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::TooShort { size } => {
                write!(f, "file of {size} bytes is shorter than the {WAV_HEADER_LEN}-byte header")
            }
        }
    }
}

/// Remaining-byte counter for a single file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PlaybackSession {
    total: u64,
    remaining: u64,
}

impl PlaybackSession {
    /// Session for a file of `file_size` bytes, header included.
    ///
    /// # Errors
    ///
    /// [`SessionError::TooShort`] when `file_size` is below the header length.
    pub fn new(file_size: u64) -> Result<Self, SessionError> {
        let total = file_size
            .checked_sub(WAV_HEADER_LEN)
            .ok_or(SessionError::TooShort { size: file_size })?;
        Ok(Self::from_audio_len(total))
    }

    /// Session over exactly `audio_len` payload bytes.
    pub const fn from_audio_len(audio_len: u64) -> Self {
        Self { total: audio_len, remaining: audio_len }
    }

    /// Payload bytes still to be read.
    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    /// Payload size the session started with.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Payload bytes read so far.
    pub fn consumed(&self) -> u64 {
        self.total.saturating_sub(self.remaining)
    }

    /// Record `n` bytes read. Never goes below zero.
    pub fn consume(&mut self, n: usize) {
        self.remaining = self.remaining.saturating_sub(n as u64);
    }

    /// Largest read allowed right now: `limit` capped by the remaining count.
    pub fn budget(&self, limit: usize) -> usize {
        usize::try_from(self.remaining).map_or(limit, |rem| rem.min(limit))
    }

    /// `true` once every payload byte has been read.
    pub fn is_finished(&self) -> bool {
        self.remaining == 0
    }
}
