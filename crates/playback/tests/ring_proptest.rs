//! Property-based tests for the byte ring.
//! FIFO order and capacity accounting must hold for every push/pop mix.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use playback::RingBuffer;
use proptest::prelude::*;

proptest! {
    /// N pushes then M single-byte pops return the first M bytes in order.
    #[test]
    fn fifo_prefix(data in proptest::collection::vec(any::<u8>(), 0..=256), m in 0usize..=256) {
        let mut rb: RingBuffer<256> = RingBuffer::new();
        let (mut producer, mut consumer) = rb.split();
        prop_assert_eq!(producer.push_slice(&data), data.len());

        let m = m.min(data.len());
        let popped: Vec<u8> = (0..m)
            .map(|_| consumer.pop_group(1).map(|w| w as u8))
            .collect::<Option<_>>()
            .expect("bytes were pushed");
        prop_assert_eq!(&popped[..], &data[..m]);
        prop_assert_eq!(consumer.available(), data.len() - m);
    }

    /// Interleaved pushes and 4-byte pops behave like a VecDeque.
    #[test]
    fn matches_reference_queue(ops in proptest::collection::vec((any::<bool>(), 0usize..24), 1..200)) {
        let mut rb: RingBuffer<32> = RingBuffer::new();
        let (mut producer, mut consumer) = rb.split();
        let mut model = std::collections::VecDeque::new();
        let mut next = 0u8;

        for (push, len) in ops {
            if push {
                let chunk: Vec<u8> = (0..len).map(|_| { next = next.wrapping_add(1); next }).collect();
                let n = producer.push_slice(&chunk);
                prop_assert_eq!(n, chunk.len().min(32 - model.len()));
                model.extend(chunk.iter().take(n));
            } else {
                let word = consumer.pop_group(4);
                if model.len() >= 4 {
                    let bytes: Vec<u8> = model.drain(..4).collect();
                    prop_assert_eq!(word, Some(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])));
                } else {
                    prop_assert_eq!(word, None);
                }
            }
            prop_assert_eq!(producer.free(), 32 - model.len());
            prop_assert_eq!(producer.is_full(), model.len() == 32);
        }
    }
}
