//! Audio codec control abstraction

/// Codec control trait.
///
/// Covers the control bus only. Sample data reaches the codec over the serial
/// audio bus (see [`crate::frame`]), which does not go through this trait.
pub trait AudioCodec {
    /// Error type
    type Error: core::fmt::Debug;

    /// Reset the codec and send the full configuration table.
    ///
    /// Leaves the codec in [`CodecState::Configured`] (not yet producing sound).
    fn init(&mut self) -> impl core::future::Future<Output = Result<(), Self::Error>>;

    /// Enable the digital audio interface. Idempotent.
    fn activate(&mut self) -> impl core::future::Future<Output = Result<(), Self::Error>>;

    /// Disable the digital audio interface. Idempotent.
    fn deactivate(&mut self) -> impl core::future::Future<Output = Result<(), Self::Error>>;

    /// Set headphone volume per channel (0 = mute, 80 = maximum).
    ///
    /// Values above 80 are clamped.
    fn set_volume(
        &mut self,
        left: u8,
        right: u8,
    ) -> impl core::future::Future<Output = Result<(), Self::Error>>;

    /// Current logical state, as driven by the calls above.
    fn state(&self) -> CodecState;
}

/// Logical codec state.
///
/// Transitions are driven only by [`AudioCodec`] calls, never inferred from
/// the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CodecState {
    /// Power-on state; no configuration sent yet.
    Reset,
    /// Configuration table sent, digital interface inactive.
    Configured,
    /// Digital interface active; the codec consumes frames.
    Active,
}
