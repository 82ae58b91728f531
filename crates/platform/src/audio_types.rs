//! Audio domain newtypes for compile-time safety.
//!
//! These zero-cost abstractions prevent common errors:
//! - `VolumeLevel`: clamps 0–80, the logical headphone volume range
//! - `HeadphoneVolume`: WM8731 headphone register value, derived from
//!   `VolumeLevel` only

// ── Error type ───────────────────────────────────────────────────────────────

/// Error returned when a value is out of the valid range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OutOfRangeError {
    /// The value that was out of range.
    pub value: u32,
    /// The inclusive minimum allowed value.
    pub min: u32,
    /// The inclusive maximum allowed value.
    pub max: u32,
}

impl core::fmt::Display for OutOfRangeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "value {} out of range {}..={}",
            self.value, self.min, self.max
        )
    }
}

// ── VolumeLevel ──────────────────────────────────────────────────────────────

/// Logical headphone volume, clamped to 0–80.
///
/// | Level | Output            |
/// |-------|-------------------|
/// | 0     | mute              |
/// | 1     | −73 dB            |
/// | 80    | +6 dB             |
///
/// Steps are 1 dB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct VolumeLevel(u8);

impl VolumeLevel {
    /// Maximum logical level (+6 dB).
    pub const MAX: u8 = 80;

    /// Create a `VolumeLevel`, clamping values above 80 to 80.
    #[must_use]
    pub fn new(value: u8) -> Self {
        Self(value.min(Self::MAX))
    }

    /// Create a `VolumeLevel`, returning an error if `value > 80`.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRangeError`] if `value > 80`.
    pub fn try_new(value: u8) -> Result<Self, OutOfRangeError> {
        if value > Self::MAX {
            Err(OutOfRangeError {
                value: u32::from(value),
                min: 0,
                max: u32::from(Self::MAX),
            })
        } else {
            Ok(Self(value))
        }
    }

    /// Return the inner level (0–80).
    #[must_use]
    pub fn get(self) -> u8 {
        self.0
    }
}

// ── HeadphoneVolume ──────────────────────────────────────────────────────────

/// WM8731 headphone output register value (9-bit).
///
/// The device register carries a zero-cross enable bit (bit 7) and a 7-bit
/// gain field where `0x30` is −73 dB, `0x7F` is +6 dB and anything below
/// `0x30` mutes. Adding the fixed bias `0xAF` (zero-cross + `0x2F`) to a
/// [`VolumeLevel`] maps level 0 onto mute and level 80 onto +6 dB.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct HeadphoneVolume(u16);

impl HeadphoneVolume {
    /// Bias added to the logical level before transmission.
    pub const BIAS: u16 = 0x00AF;

    /// Convert a [`VolumeLevel`] to the headphone register value.
    ///
    /// - level 0  → `0x00AF`
    /// - level 80 → `0x00FF`
    #[must_use]
    pub fn from_level(level: VolumeLevel) -> Self {
        // level <= 80, so the sum stays below 0x100 and inside the 9-bit field.
        Self(Self::BIAS.saturating_add(u16::from(level.get())))
    }

    /// Return the raw 9-bit register value.
    #[must_use]
    pub fn get(self) -> u16 {
        self.0
    }
}
