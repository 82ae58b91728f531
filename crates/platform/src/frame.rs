//! Serial audio bus abstraction
//!
//! The codec clocks the serial audio bus and raises a "frame needed" request
//! once per frame-sync pulse. The request is serviced in interrupt context by
//! a [`FrameHandler`], which writes exactly one 32-bit word per request into a
//! [`FramePort`].
//!
//! ```text
//! codec frame sync ──► FramePort::frame_requested()
//!                           │
//!               FrameIrq ──► FrameHandler::on_frame()
//!                           │
//!                      FramePort::write_word(u32) ──► codec DAC
//! ```
//!
//! Handlers are registered with [`FrameIrq::attach`], which also enables the
//! interrupt source, and removed with [`FrameIrq::detach`], which disables it
//! and hands the handler back.

/// Transmit side of the serial audio bus.
///
/// All methods run in interrupt context and must not block.
pub trait FramePort {
    /// Whether the port is asking for the next word.
    fn frame_requested(&self) -> bool;

    /// Clear the pending request.
    fn acknowledge(&mut self);

    /// Queue one word, transmitted MSB first during the next frame.
    fn write_word(&mut self, word: u32);
}

/// Interrupt-context callback serviced once per frame request.
pub trait FrameHandler {
    /// Service one frame interrupt.
    fn on_frame(&mut self);
}

/// Registration point for the frame interrupt.
pub trait FrameIrq<H: FrameHandler> {
    /// Install `handler` and enable the interrupt source.
    ///
    /// Replaces (and drops) any handler that was still attached.
    fn attach(&mut self, handler: H);

    /// Disable the interrupt source and return the installed handler.
    ///
    /// After this returns the handler is never called again.
    fn detach(&mut self) -> Option<H>;
}
