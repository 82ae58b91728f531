//! Desktop stand-in for the serial audio port and its frame interrupt.
//!
//! A [`FrameClock`] thread plays the role of the codec's frame sync: it
//! calls the attached handler at the configured rate, in bursts of whatever
//! frames fell due since the last wake-up. The pipeline sees the same
//! attach/detach contract it gets on hardware.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use platform::{FrameHandler, FrameIrq, FramePort};

/// Clock thread wake-up period.
const TICK: Duration = Duration::from_millis(1);

/// Port that records what would have gone out on the wire.
#[derive(Debug, Default, Clone)]
pub struct EmulatorFramePort {
    words: u64,
    silent: u64,
    peak: u16,
}

impl EmulatorFramePort {
    /// Fresh port with zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Words written.
    pub fn words(&self) -> u64 {
        self.words
    }

    /// Words that were all zero.
    pub fn silent_words(&self) -> u64 {
        self.silent
    }

    /// Largest absolute 16-bit sample seen in either half of a word.
    pub fn peak(&self) -> u16 {
        self.peak
    }
}

impl FramePort for EmulatorFramePort {
    fn frame_requested(&self) -> bool {
        // The clock only calls the handler when a frame is due.
        true
    }

    fn acknowledge(&mut self) {}

    fn write_word(&mut self, word: u32) {
        self.words = self.words.wrapping_add(1);
        if word == 0 {
            self.silent = self.silent.wrapping_add(1);
        }
        let [a, b, c, d] = word.to_be_bytes();
        // Bytes arrive in file order: each 16-bit sample is little-endian.
        for sample in [i16::from_le_bytes([a, b]), i16::from_le_bytes([c, d])] {
            self.peak = self.peak.max(sample.unsigned_abs());
        }
    }
}

type Slot<H> = Arc<Mutex<Option<H>>>;

fn lock<H>(slot: &Mutex<Option<H>>) -> MutexGuard<'_, Option<H>> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Handler slot shared with a [`FrameClock`].
pub struct EmulatorFrameIrq<H> {
    slot: Slot<H>,
}

impl<H> EmulatorFrameIrq<H> {
    /// Empty slot.
    pub fn new() -> Self {
        Self { slot: Arc::new(Mutex::new(None)) }
    }

    /// Whether a handler is installed.
    pub fn is_attached(&self) -> bool {
        lock(&self.slot).is_some()
    }
}

impl<H> Default for EmulatorFrameIrq<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: FrameHandler> FrameIrq<H> for EmulatorFrameIrq<H> {
    fn attach(&mut self, handler: H) {
        *lock(&self.slot) = Some(handler);
    }

    fn detach(&mut self) -> Option<H> {
        lock(&self.slot).take()
    }
}

/// Thread firing the attached handler at a fixed frame rate.
///
/// Stops and joins on drop.
pub struct FrameClock {
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<u64>>,
}

impl FrameClock {
    /// Start firing frames for `irq` at `rate_hz`.
    pub fn start<H>(irq: &EmulatorFrameIrq<H>, rate_hz: u32) -> Self
    where
        H: FrameHandler + Send + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let slot = Arc::clone(&irq.slot);
        let flag = Arc::clone(&stop);
        let thread = thread::spawn(move || run_clock(&slot, &flag, rate_hz));
        Self { stop, thread: Some(thread) }
    }

    /// Stop the clock and return how many frames it fired.
    pub fn stop(mut self) -> u64 {
        self.halt()
    }

    fn halt(&mut self) -> u64 {
        self.stop.store(true, Ordering::Release);
        self.thread.take().and_then(|t| t.join().ok()).unwrap_or(0)
    }
}

impl Drop for FrameClock {
    fn drop(&mut self) {
        self.halt();
    }
}

fn run_clock<H: FrameHandler>(slot: &Mutex<Option<H>>, stop: &AtomicBool, rate_hz: u32) -> u64 {
    let start = Instant::now();
    let mut fired: u64 = 0;
    while !stop.load(Ordering::Acquire) {
        thread::sleep(TICK);
        let due = frames_due(start.elapsed(), rate_hz);
        let mut guard = lock(slot);
        if let Some(handler) = guard.as_mut() {
            while fired < due {
                handler.on_frame();
                fired = fired.saturating_add(1);
            }
        } else {
            // Nothing attached: frames are lost, as on hardware.
            fired = due;
        }
    }
    fired
}

/// Frames that a `rate_hz` clock has produced after `elapsed`.
fn frames_due(elapsed: Duration, rate_hz: u32) -> u64 {
    let micros = elapsed.as_micros().saturating_mul(u128::from(rate_hz));
    u64::try_from(micros / 1_000_000).unwrap_or(u64::MAX)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU32;

    struct Counter(Arc<AtomicU32>);

    impl FrameHandler for Counter {
        fn on_frame(&mut self) {
            self.0.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[test]
    fn test_frames_due() {
        assert_eq!(frames_due(Duration::from_secs(1), 44_100), 44_100);
        assert_eq!(frames_due(Duration::from_millis(10), 44_100), 441);
        assert_eq!(frames_due(Duration::ZERO, 44_100), 0);
    }

    #[test]
    fn test_port_tracks_peak_and_silence() {
        let mut port = EmulatorFramePort::new();
        port.write_word(0);
        // Left sample 0x0100 (256), right sample 0xFF80 (-128), little-endian.
        port.write_word(u32::from_be_bytes([0x00, 0x01, 0x80, 0xFF]));
        assert_eq!(port.words(), 2);
        assert_eq!(port.silent_words(), 1);
        assert_eq!(port.peak(), 256);
    }

    #[test]
    fn test_clock_calls_attached_handler() {
        let count = Arc::new(AtomicU32::new(0));
        let mut irq = EmulatorFrameIrq::new();
        irq.attach(Counter(Arc::clone(&count)));
        let clock = FrameClock::start(&irq, 10_000);

        let deadline = Instant::now() + Duration::from_secs(2);
        while count.load(Ordering::Relaxed) < 10 && Instant::now() < deadline {
            thread::sleep(TICK);
        }
        clock.stop();
        assert!(count.load(Ordering::Relaxed) >= 10);

        assert!(irq.detach().is_some());
        assert!(!irq.is_attached());
    }
}
