//! Mock implementations for testing
//!
//! This module provides mock implementations of all platform traits
//! for use in unit and integration tests and in the desktop player.

#![cfg(any(test, feature = "std"))]

use core::cell::{Cell, RefCell};

use embedded_graphics::{pixelcolor::BinaryColor, prelude::*};

use crate::*;

// ── Storage ──────────────────────────────────────────────────────────────────

/// Errors raised by [`MockStorage`] and [`MockFile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockStorageError {
    /// `mount` failed or was never called
    NotMounted,
    /// No file with that name
    NotFound,
    /// Injected read failure
    Io,
}

impl core::fmt::Display for MockStorageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotMounted => f.write_str("mock storage not mounted"),
            Self::NotFound => f.write_str("mock file not found"),
            Self::Io => f.write_str("mock read error"),
        }
    }
}

/// In-memory file
#[derive(Debug, Clone)]
pub struct MockFile {
    data: Vec<u8>,
    pos: usize,
    max_read: Option<usize>,
    fail_at: Option<usize>,
}

impl MockFile {
    /// Create a file holding `data`
    pub fn new(data: Vec<u8>) -> Self {
        Self { data, pos: 0, max_read: None, fail_at: None }
    }

    /// Return at most `n` bytes per `read` call
    #[must_use]
    pub fn with_short_reads(mut self, n: usize) -> Self {
        self.max_read = Some(n);
        self
    }

    /// Fail any `read` issued at or after byte offset `pos`
    #[must_use]
    pub fn with_read_error_at(mut self, pos: usize) -> Self {
        self.fail_at = Some(pos);
        self
    }
}

impl File for MockFile {
    type Error = MockStorageError;

    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if self.fail_at.is_some_and(|at| self.pos >= at) {
            return Err(MockStorageError::Io);
        }
        let rest = self.data.get(self.pos..).unwrap_or_default();
        let n = rest.len().min(buf.len()).min(self.max_read.unwrap_or(usize::MAX));
        if let (Some(dst), Some(src)) = (buf.get_mut(..n), rest.get(..n)) {
            dst.copy_from_slice(src);
        }
        self.pos = self.pos.saturating_add(n);
        Ok(n)
    }

    async fn seek(&mut self, pos: u64) -> Result<u64, Self::Error> {
        self.pos = usize::try_from(pos).unwrap_or(usize::MAX).min(self.data.len());
        Ok(self.pos as u64)
    }

    fn tell(&self) -> u64 {
        self.pos as u64
    }

    fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// In-memory storage holding named files
#[derive(Debug, Default)]
pub struct MockStorage {
    files: Vec<(String, MockFile)>,
    mountable: bool,
    mounted: bool,
    mount_calls: usize,
}

impl MockStorage {
    /// Create an empty, mountable storage
    pub fn new() -> Self {
        Self { mountable: true, ..Self::default() }
    }

    /// Storage whose `mount` always fails
    pub fn unmountable() -> Self {
        Self::default()
    }

    /// Add a file
    #[must_use]
    pub fn with_file(mut self, name: &str, file: MockFile) -> Self {
        self.files.push((name.to_string(), file));
        self
    }

    /// Number of `mount` calls so far
    pub fn mount_calls(&self) -> usize {
        self.mount_calls
    }

    fn lookup(&self, path: &str) -> Result<Option<&MockFile>, MockStorageError> {
        if !self.mounted {
            return Err(MockStorageError::NotMounted);
        }
        Ok(self
            .files
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(path))
            .map(|(_, file)| file))
    }
}

impl Storage for MockStorage {
    type Error = MockStorageError;
    type File<'a> = MockFile;

    async fn mount(&mut self) -> Result<(), Self::Error> {
        self.mount_calls = self.mount_calls.saturating_add(1);
        self.mounted = self.mountable;
        if self.mounted {
            Ok(())
        } else {
            Err(MockStorageError::NotMounted)
        }
    }

    async fn open_file<'a>(&'a mut self, path: &str) -> Result<MockFile, Self::Error> {
        self.lookup(path)?.cloned().ok_or(MockStorageError::NotFound)
    }

    async fn exists(&mut self, path: &str) -> Result<bool, Self::Error> {
        Ok(self.lookup(path)?.is_some())
    }
}

// ── Codec ────────────────────────────────────────────────────────────────────

/// Calls recorded by [`MockCodec`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecCall {
    /// `init()`
    Init,
    /// `activate()`
    Activate,
    /// `deactivate()`
    Deactivate,
    /// `set_volume(left, right)` after clamping
    SetVolume(u8, u8),
}

/// Mock codec error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockCodecError;

/// Mock audio codec recording every call
#[derive(Debug)]
pub struct MockCodec {
    state: CodecState,
    calls: Vec<CodecCall>,
    fail_init: bool,
    fail_activate: bool,
}

impl MockCodec {
    /// Create new mock codec in [`CodecState::Reset`]
    pub fn new() -> Self {
        Self {
            state: CodecState::Reset,
            calls: Vec::new(),
            fail_init: false,
            fail_activate: false,
        }
    }

    /// Make `init()` return an error, leaving the codec in reset
    #[must_use]
    pub fn failing_init(mut self) -> Self {
        self.fail_init = true;
        self
    }

    /// Make `activate()` return an error
    #[must_use]
    pub fn failing_activate(mut self) -> Self {
        self.fail_activate = true;
        self
    }

    /// All calls so far, in order
    pub fn calls(&self) -> &[CodecCall] {
        &self.calls
    }
}

impl Default for MockCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioCodec for MockCodec {
    type Error = MockCodecError;

    async fn init(&mut self) -> Result<(), Self::Error> {
        self.calls.push(CodecCall::Init);
        if self.fail_init {
            return Err(MockCodecError);
        }
        self.state = CodecState::Configured;
        Ok(())
    }

    async fn activate(&mut self) -> Result<(), Self::Error> {
        self.calls.push(CodecCall::Activate);
        if self.fail_activate {
            return Err(MockCodecError);
        }
        self.state = CodecState::Active;
        Ok(())
    }

    async fn deactivate(&mut self) -> Result<(), Self::Error> {
        self.calls.push(CodecCall::Deactivate);
        if self.state == CodecState::Active {
            self.state = CodecState::Configured;
        }
        Ok(())
    }

    async fn set_volume(&mut self, left: u8, right: u8) -> Result<(), Self::Error> {
        self.calls.push(CodecCall::SetVolume(
            VolumeLevel::new(left).get(),
            VolumeLevel::new(right).get(),
        ));
        Ok(())
    }

    fn state(&self) -> CodecState {
        self.state
    }
}

// ── Frame port / interrupt ───────────────────────────────────────────────────

/// Serial port recording every transmitted word
///
/// The request latch is set by [`MockFramePort::request`] and cleared by
/// `acknowledge`. A free-running port (`new`) also reports a request on
/// every frame, as a port clocked by the codec does.
#[derive(Debug, Default)]
pub struct MockFramePort {
    free_running: bool,
    latched: bool,
    acknowledged: usize,
    words: Vec<u32>,
}

impl MockFramePort {
    /// Port requesting a word on every frame
    pub fn new() -> Self {
        Self { free_running: true, ..Self::default() }
    }

    /// Port with no pending request
    pub fn idle() -> Self {
        Self::default()
    }

    /// Latch a frame request
    pub fn request(&mut self) {
        self.latched = true;
    }

    /// Whether a latched request is still pending
    pub fn is_latched(&self) -> bool {
        self.latched
    }

    /// Words written so far
    pub fn words(&self) -> &[u32] {
        &self.words
    }

    /// Number of acknowledged requests
    pub fn acknowledged(&self) -> usize {
        self.acknowledged
    }
}

impl FramePort for MockFramePort {
    fn frame_requested(&self) -> bool {
        self.free_running || self.latched
    }

    fn acknowledge(&mut self) {
        self.latched = false;
        self.acknowledged = self.acknowledged.saturating_add(1);
    }

    fn write_word(&mut self, word: u32) {
        self.words.push(word);
    }
}

/// Shared handler slot standing in for the interrupt vector.
///
/// Tests hand [`MockFrameSlot::irq`] to the code under test and call
/// [`MockFrameSlot::fire`] from a concurrently joined future to simulate
/// interrupts arriving between the foreground's await points.
#[derive(Debug)]
pub struct MockFrameSlot<H> {
    handler: RefCell<Option<H>>,
    attaches: Cell<usize>,
    detaches: Cell<usize>,
}

impl<H: FrameHandler> MockFrameSlot<H> {
    /// Create an empty slot (interrupt disabled)
    pub fn new() -> Self {
        Self { handler: RefCell::new(None), attaches: Cell::new(0), detaches: Cell::new(0) }
    }

    /// Registration handle for this slot
    pub fn irq(&self) -> MockFrameIrq<'_, H> {
        MockFrameIrq { slot: self }
    }

    /// Deliver one interrupt. Returns `false` when no handler is attached.
    pub fn fire(&self) -> bool {
        match self.handler.borrow_mut().as_mut() {
            Some(handler) => {
                handler.on_frame();
                true
            }
            None => false,
        }
    }

    /// Whether a handler is installed
    pub fn is_attached(&self) -> bool {
        self.handler.borrow().is_some()
    }

    /// Number of `attach` calls
    pub fn attaches(&self) -> usize {
        self.attaches.get()
    }

    /// Number of `detach` calls
    pub fn detaches(&self) -> usize {
        self.detaches.get()
    }
}

impl<H: FrameHandler> Default for MockFrameSlot<H> {
    fn default() -> Self {
        Self::new()
    }
}

/// [`FrameIrq`] backed by a [`MockFrameSlot`]
#[derive(Debug)]
pub struct MockFrameIrq<'a, H> {
    slot: &'a MockFrameSlot<H>,
}

impl<H: FrameHandler> FrameIrq<H> for MockFrameIrq<'_, H> {
    fn attach(&mut self, handler: H) {
        self.slot.attaches.set(self.slot.attaches.get().saturating_add(1));
        *self.slot.handler.borrow_mut() = Some(handler);
    }

    fn detach(&mut self) -> Option<H> {
        self.slot.detaches.set(self.slot.detaches.get().saturating_add(1));
        self.slot.handler.borrow_mut().take()
    }
}

// ── Status output ────────────────────────────────────────────────────────────

/// Status sink recording every line
#[derive(Debug, Default)]
pub struct MockStatus {
    lines: Vec<(StatusRow, String)>,
}

impl MockStatus {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// All lines shown, in order
    pub fn lines(&self) -> &[(StatusRow, String)] {
        &self.lines
    }

    /// Latest text on `row`
    pub fn text(&self, row: StatusRow) -> Option<&str> {
        self.lines
            .iter()
            .rev()
            .find(|(r, _)| *r == row)
            .map(|(_, text)| text.as_str())
    }
}

impl StatusDisplay for MockStatus {
    type Error = core::convert::Infallible;

    fn show(&mut self, row: StatusRow, text: &str) -> Result<(), Self::Error> {
        self.lines.push((row, text.to_string()));
        Ok(())
    }
}

/// Monochrome draw target counting lit pixels
pub struct MockDisplay {
    width: u32,
    height: u32,
    lit: usize,
    clears: usize,
}

impl MockDisplay {
    /// Create new mock display
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, lit: 0, clears: 0 }
    }

    /// Pixels drawn `On` so far
    pub fn lit_pixels(&self) -> usize {
        self.lit
    }

    /// Number of `clear` calls
    pub fn clears(&self) -> usize {
        self.clears
    }
}

impl DrawTarget for MockDisplay {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let lit = pixels.into_iter().filter(|Pixel(_, c)| c.is_on()).count();
        self.lit = self.lit.saturating_add(lit);
        Ok(())
    }

    fn clear(&mut self, _color: Self::Color) -> Result<(), Self::Error> {
        self.clears = self.clears.saturating_add(1);
        Ok(())
    }
}

impl OriginDimensions for MockDisplay {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}
