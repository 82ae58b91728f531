//! Status output abstraction
//!
//! The player reports progress as short text lines. Each line belongs to a
//! fixed [`StatusRow`], so a panel implementation can place it at a fixed
//! position and a log implementation can simply print it.

/// Sink for progress text.
pub trait StatusDisplay {
    /// Error type for status output
    type Error: core::fmt::Debug;

    /// Show `text` on `row`, replacing whatever that row held before.
    fn show(&mut self, row: StatusRow, text: &str) -> Result<(), Self::Error>;
}

/// Progress rows, in the order the player fills them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StatusRow {
    /// Storage initialisation result
    Storage,
    /// File lookup result
    File,
    /// Header section caption
    Header,
    /// Channel count
    Channels,
    /// Sample rate
    SampleRate,
    /// Bits per sample
    BitsPerSample,
    /// Playback started
    Playback,
    /// Playback finished
    Done,
}

impl StatusRow {
    /// All rows in display order.
    pub const ALL: [StatusRow; 8] = [
        Self::Storage,
        Self::File,
        Self::Header,
        Self::Channels,
        Self::SampleRate,
        Self::BitsPerSample,
        Self::Playback,
        Self::Done,
    ];

    /// Whether the row is one of the indented header detail lines.
    pub const fn is_detail(self) -> bool {
        matches!(self, Self::Channels | Self::SampleRate | Self::BitsPerSample)
    }
}
