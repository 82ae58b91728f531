//! Lock-free SPSC byte ring between the feeder and the frame interrupt.
//!
//! `RingBuffer<N>` owns `N` bytes of storage and two free-running cursors.
//! [`RingBuffer::split`] hands out exactly one [`Producer`] (foreground feeder)
//! and one [`Consumer`] (frame interrupt). Each cursor has a single writer:
//!
//! | Cursor  | Written by | Read by            |
//! |---------|------------|--------------------|
//! | `write` | Producer   | Producer, Consumer |
//! | `read`  | Consumer   | Producer, Consumer |
//!
//! Cursors are never masked in place. Occupancy is `write - read` (wrapping),
//! and the storage index is `cursor & (N - 1)`. An empty ring has equal
//! cursors, a full one has `write - read == N`, so all `N` bytes are usable.
//!
//! The producer may [`Producer::close`] the ring once the last byte is in.
//! The consumer uses this to tell the end of the stream from a starved ring.
//!
//! # Constraints
//!
//! - `N` must be a non-zero power of two (checked at compile time).
//! - `no_std`, no allocation. The ring lives in a `static` on hardware and on
//!   the stack in host tests.

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Fixed-capacity byte ring with split producer/consumer handles.
pub struct RingBuffer<const N: usize> {
    buf: UnsafeCell<[u8; N]>,
    /// Total bytes ever pushed (wrapping).
    write: AtomicUsize,
    /// Total bytes ever popped (wrapping).
    read: AtomicUsize,
    /// No more bytes will be pushed until the next reset.
    closed: AtomicBool,
}

// SAFETY: the producer only writes slots in `[write, read + N)` and publishes
// them with a Release store of `write`; the consumer only reads slots in
// `[read, write)` after an Acquire load of `write`, and frees them with a
// Release store of `read`. The two regions never overlap, and `split` takes
// `&mut self` so at most one handle of each kind exists.
unsafe impl<const N: usize> Sync for RingBuffer<N> {}

impl<const N: usize> RingBuffer<N> {
    const VALID_CAPACITY: () = assert!(N.is_power_of_two(), "capacity must be a power of two");
    const MASK: usize = N.wrapping_sub(1);

    /// Create a new, empty ring buffer.
    ///
    /// `const` so that rings may live in `static` storage.
    pub const fn new() -> Self {
        #[allow(clippy::let_unit_value)] // forces the capacity check
        let () = Self::VALID_CAPACITY;
        Self {
            buf: UnsafeCell::new([0u8; N]),
            write: AtomicUsize::new(0),
            read: AtomicUsize::new(0),
            closed: AtomicBool::new(false),
        }
    }

    /// Split into the producer and consumer handles.
    pub fn split(&mut self) -> (Producer<'_, N>, Consumer<'_, N>) {
        let ring: &Self = self;
        (Producer { ring }, Consumer { ring })
    }

    /// Empty the ring. Exclusive access means neither handle is alive.
    pub fn reset(&mut self) {
        *self.write.get_mut() = 0;
        *self.read.get_mut() = 0;
        *self.closed.get_mut() = false;
    }

    /// Maximum number of bytes the ring can hold.
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Bytes currently queued.
    fn occupancy(&self) -> usize {
        self.write
            .load(Ordering::Acquire)
            .wrapping_sub(self.read.load(Ordering::Acquire))
    }

    fn slot(&self, cursor: usize) -> *mut u8 {
        // SAFETY: `cursor & MASK < N`, so the offset stays inside the array.
        unsafe { self.buf.get().cast::<u8>().add(cursor & Self::MASK) }
    }
}

impl<const N: usize> Default for RingBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Reset both cursors through the split handles.
///
/// Only call while the consumer is not reachable from interrupt context
/// (handler detached); each handle rewinds its own cursor.
pub fn reset<const N: usize>(producer: &mut Producer<'_, N>, consumer: &mut Consumer<'_, N>) {
    consumer.ring.read.store(0, Ordering::Release);
    producer.ring.write.store(0, Ordering::Release);
    producer.ring.closed.store(false, Ordering::Release);
}

// ── Producer ─────────────────────────────────────────────────────────────────

/// Write half, owned by the feeder.
pub struct Producer<'a, const N: usize> {
    ring: &'a RingBuffer<N>,
}

impl<const N: usize> Producer<'_, N> {
    /// Bytes that can be pushed right now.
    pub fn free(&self) -> usize {
        N.saturating_sub(self.ring.occupancy())
    }

    /// Bytes pushed but not yet popped.
    pub fn pending(&self) -> usize {
        self.ring.occupancy()
    }

    /// `true` when no byte can be pushed.
    pub fn is_full(&self) -> bool {
        self.free() == 0
    }

    /// Append one byte. Returns `false` and writes nothing when full.
    pub fn try_push(&mut self, byte: u8) -> bool {
        if self.is_full() {
            return false;
        }
        let write = self.ring.write.load(Ordering::Relaxed);
        // SAFETY: the slot is free (occupancy < N) so the consumer does not
        // read it until the Release store below publishes it.
        unsafe { self.ring.slot(write).write(byte) };
        self.ring.write.store(write.wrapping_add(1), Ordering::Release);
        true
    }

    /// Append as many leading bytes of `data` as fit. Returns the count pushed.
    pub fn push_slice(&mut self, data: &[u8]) -> usize {
        let n = data.len().min(self.free());
        let write = self.ring.write.load(Ordering::Relaxed);
        let mut cursor = write;
        for &byte in data.iter().take(n) {
            // SAFETY: `n <= free`, so every slot in `[write, write + n)` is
            // free and unpublished until the Release store below.
            unsafe { self.ring.slot(cursor).write(byte) };
            cursor = cursor.wrapping_add(1);
        }
        self.ring.write.store(cursor, Ordering::Release);
        n
    }

    /// Mark the end of the stream. Bytes already queued stay readable.
    pub fn close(&mut self) {
        self.ring.closed.store(true, Ordering::Release);
    }

    /// Maximum number of bytes the ring can hold.
    pub const fn capacity(&self) -> usize {
        N
    }
}

// ── Consumer ─────────────────────────────────────────────────────────────────

/// Read half, owned by the frame interrupt handler.
pub struct Consumer<'a, const N: usize> {
    ring: &'a RingBuffer<N>,
}

impl<const N: usize> Consumer<'_, N> {
    /// Bytes ready to pop.
    pub fn available(&self) -> usize {
        self.ring.occupancy()
    }

    /// `true` when nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.available() == 0
    }

    /// `true` once the producer has pushed its last byte.
    pub fn is_closed(&self) -> bool {
        self.ring.closed.load(Ordering::Acquire)
    }

    /// Pop `n` bytes (1..=4) and pack them MSB first into a word.
    ///
    /// `[0x01, 0x02, 0x03, 0x04]` yields `0x0102_0304`; shorter groups are
    /// right-aligned. Returns `None` without moving the cursor when `n` is out
    /// of range or fewer than `n` bytes are queued.
    pub fn pop_group(&mut self, n: usize) -> Option<u32> {
        if !(1..=4).contains(&n) || self.available() < n {
            return None;
        }
        let read = self.ring.read.load(Ordering::Relaxed);
        let mut bytes = [0u8; 4];
        let mut cursor = read;
        for out in bytes.iter_mut().skip(4usize.saturating_sub(n)) {
            // SAFETY: the Acquire load in `available` observed at least `n`
            // published bytes starting at `read`.
            *out = unsafe { self.ring.slot(cursor).read() };
            cursor = cursor.wrapping_add(1);
        }
        self.ring.read.store(cursor, Ordering::Release);
        Some(u32::from_be_bytes(bytes))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_new_ring_is_empty() {
        let mut rb: RingBuffer<16> = RingBuffer::new();
        assert_eq!(rb.capacity(), 16);
        let (producer, consumer) = rb.split();
        assert_eq!(producer.free(), 16);
        assert!(consumer.is_empty());
    }

    #[test]
    fn test_pop_group_packs_msb_first() {
        let mut rb: RingBuffer<16> = RingBuffer::new();
        let (mut producer, mut consumer) = rb.split();
        assert_eq!(producer.push_slice(&[0x01, 0x02, 0x03, 0x04]), 4);
        assert_eq!(consumer.pop_group(4), Some(0x0102_0304));
        assert!(consumer.is_empty());
    }

    #[test]
    fn test_short_group_is_right_aligned() {
        let mut rb: RingBuffer<16> = RingBuffer::new();
        let (mut producer, mut consumer) = rb.split();
        producer.push_slice(&[0xAB, 0xCD]);
        assert_eq!(consumer.pop_group(2), Some(0x0000_ABCD));
    }

    #[test]
    fn test_pop_group_underrun_leaves_cursor() {
        let mut rb: RingBuffer<16> = RingBuffer::new();
        let (mut producer, mut consumer) = rb.split();
        producer.push_slice(&[1, 2, 3]);
        assert_eq!(consumer.pop_group(4), None);
        assert_eq!(consumer.available(), 3);
        assert!(producer.try_push(4));
        assert_eq!(consumer.pop_group(4), Some(0x0102_0304));
    }

    #[test]
    fn test_pop_group_rejects_bad_width() {
        let mut rb: RingBuffer<16> = RingBuffer::new();
        let (mut producer, mut consumer) = rb.split();
        producer.push_slice(&[0; 8]);
        assert_eq!(consumer.pop_group(0), None);
        assert_eq!(consumer.pop_group(5), None);
        assert_eq!(consumer.available(), 8);
    }

    #[test]
    fn test_full_ring_refuses_push() {
        let mut rb: RingBuffer<8> = RingBuffer::new();
        let (mut producer, mut consumer) = rb.split();
        let data: [u8; 8] = core::array::from_fn(|i| i as u8 + 1);
        assert_eq!(producer.push_slice(&data), 8);
        assert!(producer.is_full());
        assert_eq!(producer.free(), 0);
        assert!(!producer.try_push(0xFF), "push past capacity must fail");
        assert_eq!(producer.push_slice(&[0xFF; 4]), 0);

        // Unread data survived the refused pushes.
        assert_eq!(consumer.pop_group(4), Some(0x0102_0304));
        assert_eq!(consumer.pop_group(4), Some(0x0506_0708));
    }

    #[test]
    fn test_ring_wraps_around() {
        let mut rb: RingBuffer<8> = RingBuffer::new();
        let (mut producer, mut consumer) = rb.split();
        producer.push_slice(&[1; 8]);
        assert_eq!(consumer.pop_group(4), Some(0x0101_0101));
        // Write 4 more (wrapping)
        assert_eq!(producer.push_slice(&[2; 4]), 4);
        assert_eq!(consumer.pop_group(4), Some(0x0101_0101));
        assert_eq!(consumer.pop_group(4), Some(0x0202_0202));
        assert!(consumer.is_empty());
    }

    #[test]
    fn test_group_straddling_wrap_point() {
        let mut rb: RingBuffer<8> = RingBuffer::new();
        let (mut producer, mut consumer) = rb.split();
        producer.push_slice(&[0; 6]);
        consumer.pop_group(4);
        consumer.pop_group(2);
        // Cursors now sit at 6; the next group spans slots 6, 7, 0, 1.
        producer.push_slice(&[0xDE, 0xAD, 0xBE, 0xEF]);
        assert_eq!(consumer.pop_group(4), Some(0xDEAD_BEEF));
    }

    #[test]
    fn test_reset_through_handles() {
        let mut rb: RingBuffer<8> = RingBuffer::new();
        let (mut producer, mut consumer) = rb.split();
        producer.push_slice(&[9; 5]);
        consumer.pop_group(1);
        producer.close();
        reset(&mut producer, &mut consumer);
        assert_eq!(producer.free(), 8);
        assert!(consumer.is_empty());
        assert!(!consumer.is_closed());
    }

    #[test]
    fn test_close_keeps_queued_bytes() {
        let mut rb: RingBuffer<8> = RingBuffer::new();
        let (mut producer, mut consumer) = rb.split();
        producer.push_slice(&[1, 2, 3, 4, 5]);
        assert!(!consumer.is_closed());
        producer.close();
        assert!(consumer.is_closed());
        assert_eq!(consumer.pop_group(4), Some(0x0102_0304));
        assert_eq!(consumer.available(), 1);
    }

    #[test]
    fn test_reset_with_exclusive_access() {
        let mut rb: RingBuffer<8> = RingBuffer::new();
        {
            let (mut producer, _) = rb.split();
            producer.push_slice(&[1; 8]);
            producer.close();
        }
        rb.reset();
        let (producer, consumer) = rb.split();
        assert_eq!(producer.pending(), 0);
        assert!(consumer.is_empty());
        assert!(!consumer.is_closed());
    }
}
