//! Header + payload through the whole pipeline on mock platform parts.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use std::cell::Cell;

use embassy_futures::{join::join, yield_now};
use platform::mocks::{MockCodec, MockFile, MockFramePort, MockFrameSlot};
use platform::{AudioCodec, CodecState};
use playback::wav_header::{read_header, seek_to_audio};
use playback::{FrameEmitter, PlaybackSession, Pipeline, RingBuffer};

const AUDIO_LEN: usize = 4096;

fn wav_file() -> Vec<u8> {
    let mut bytes = vec![0u8; 44];
    bytes[22..24].copy_from_slice(&2u16.to_le_bytes());
    bytes[24..28].copy_from_slice(&44_100u32.to_le_bytes());
    bytes[34..36].copy_from_slice(&16u16.to_le_bytes());
    bytes.extend((0..AUDIO_LEN).map(|i| (i % 199) as u8 + 1));
    bytes
}

#[tokio::test]
async fn drains_exactly_the_payload() {
    let bytes = wav_file();
    let mut file = MockFile::new(bytes.clone()).with_short_reads(48);

    let info = read_header(&mut file).await.unwrap();
    assert_eq!(info.channels, 2);
    assert!(info.matches_codec());

    let mut session = PlaybackSession::new(bytes.len() as u64).unwrap();
    assert_eq!(session.remaining(), AUDIO_LEN as u64);
    seek_to_audio(&mut file).await.unwrap();

    let mut ring: RingBuffer<1024> = RingBuffer::new();
    let slot: MockFrameSlot<FrameEmitter<'_, MockFramePort, 1024>> = MockFrameSlot::new();
    let mut pipeline = Pipeline::new(&mut ring, MockFramePort::new());
    let mut irq = slot.irq();
    let mut codec = MockCodec::new();
    codec.init().await.unwrap();
    codec.set_volume(60, 60).await.unwrap();

    let done = Cell::new(false);
    let (result, ()) = join(
        async {
            let r = pipeline.play(&mut file, &mut session, &mut irq, &mut codec).await;
            done.set(true);
            r
        },
        async {
            while !done.get() {
                slot.fire();
                yield_now().await;
            }
        },
    )
    .await;

    let report = result.unwrap();
    assert_eq!(report.bytes_fed, AUDIO_LEN as u64);
    assert_eq!(session.remaining(), 0);
    assert_eq!(report.residual, 0);

    let words = pipeline.emitter().unwrap().port().words();
    let sent: Vec<u8> = words.iter().filter(|&&w| w != 0).flat_map(|w| w.to_be_bytes()).collect();
    assert_eq!(sent.len(), AUDIO_LEN);
    assert_eq!(&sent[..], &bytes[44..]);

    assert_eq!(codec.state(), CodecState::Configured);
    assert!(!slot.is_attached());
}
