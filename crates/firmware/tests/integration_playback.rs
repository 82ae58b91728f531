//! Player integration tests: full stack from storage to frame words.
//!
//! Drives `Player::run` with the real WM8731 driver over a mocked I²C bus,
//! the status screen over a mock panel, and a mock frame port fired between
//! every foreground await point.
//!
//! Run with: cargo test -p firmware --test integration_playback

// Integration test file: expect/unwrap/panic are intentional test mechanisms.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::cast_possible_truncation,
    clippy::arithmetic_side_effects,
)]

use core::cell::Cell;

use embassy_futures::join::join;
use embassy_futures::yield_now;
use embedded_hal_mock::eh1::delay::NoopDelay;
use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};
use firmware::{Player, PlayerConfig, RunOutcome, StatusScreen, Wm8731};
use platform::mocks::{MockDisplay, MockFile, MockFramePort, MockFrameSlot, MockStatus, MockStorage};
use platform::storage_local::LocalFileStorage;
use platform::{AudioCodec, FrameIrq, StatusDisplay, Storage};
use playback::{FrameEmitter, Pipeline, RingBuffer};

const CODEC_ADDR: u8 = 0x1A;

fn wav(audio: &[u8]) -> Vec<u8> {
    let mut bytes = vec![0u8; 44];
    bytes[0..4].copy_from_slice(b"RIFF");
    bytes[8..12].copy_from_slice(b"WAVE");
    bytes[22..24].copy_from_slice(&2u16.to_le_bytes());
    bytes[24..28].copy_from_slice(&44_100u32.to_le_bytes());
    bytes[34..36].copy_from_slice(&16u16.to_le_bytes());
    bytes[36..40].copy_from_slice(b"data");
    bytes[40..44].copy_from_slice(&(audio.len() as u32).to_le_bytes());
    bytes.extend_from_slice(audio);
    bytes
}

fn audio(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 253) as u8 + 1).collect()
}

fn codec_writes(pairs: &[[u8; 2]]) -> Vec<I2cTransaction> {
    pairs.iter().map(|b| I2cTransaction::write(CODEC_ADDR, b.to_vec())).collect()
}

/// Reset, configuration table, activate, deactivate.
fn full_run_transactions() -> Vec<I2cTransaction> {
    codec_writes(&[
        [0x1E, 0x00],
        [0x01, 0x80],
        [0x03, 0x80],
        [0x04, 0xF0],
        [0x06, 0xF0],
        [0x08, 0xD0],
        [0x0A, 0x06],
        [0x0C, 0x00],
        [0x0E, 0x43],
        [0x10, 0x23],
        [0x12, 0x01],
        [0x12, 0x00],
    ])
}

type Emitter<'a> = FrameEmitter<'a, MockFramePort, 1024>;

/// Run the player with the frame interrupt fired between await points and
/// return the outcome plus the payload bytes that reached the port.
async fn play<S, C, D>(player: &mut Player<S, C, D>) -> (RunOutcome, Vec<u8>)
where
    S: Storage,
    C: AudioCodec,
    D: StatusDisplay,
{
    let mut ring: RingBuffer<1024> = RingBuffer::new();
    let slot: MockFrameSlot<Emitter<'_>> = MockFrameSlot::new();
    let mut pipeline = Pipeline::new(&mut ring, MockFramePort::new());
    let mut irq = slot.irq();
    let done = Cell::new(false);

    let (outcome, ()) = join(
        async {
            let outcome = player.run(&mut pipeline, &mut irq).await;
            done.set(true);
            outcome
        },
        async {
            while !done.get() {
                slot.fire();
                yield_now().await;
            }
        },
    )
    .await;

    assert!(irq.detach().is_none(), "handler must be detached after a run");
    let sent = pipeline
        .emitter()
        .map(|e| {
            e.port()
                .words()
                .iter()
                .filter(|&&w| w != 0)
                .flat_map(|w| w.to_be_bytes())
                .collect()
        })
        .unwrap_or_default();
    (outcome, sent)
}

#[tokio::test]
async fn test_wm8731_wire_sequence_for_one_file() {
    let payload = audio(4096);
    let storage = MockStorage::new()
        .with_file("SOUND.WAV", MockFile::new(wav(&payload)).with_short_reads(48));
    let mut i2c = I2cMock::new(&full_run_transactions());
    let codec = Wm8731::new(i2c.clone(), NoopDelay);
    let screen = StatusScreen::new(MockDisplay::new(320, 240));

    let mut player = Player::new(storage, codec, screen, PlayerConfig::default());
    let (outcome, sent) = play(&mut player).await;

    assert_eq!(outcome, RunOutcome::Passed);
    assert_eq!(sent, payload);
    assert!(player.status().display().lit_pixels() > 0);
    i2c.done();
}

#[tokio::test]
async fn test_volume_is_written_between_init_and_activate() {
    let mut transactions = full_run_transactions();
    let tail = transactions.split_off(10);
    transactions.extend(codec_writes(&[[0x04, 0xD3], [0x06, 0xD3]]));
    transactions.extend(tail);

    let storage = MockStorage::new().with_file("sound.wav", MockFile::new(wav(&audio(64))));
    let mut i2c = I2cMock::new(&transactions);
    let codec = Wm8731::new(i2c.clone(), NoopDelay);
    let config = PlayerConfig { volume: Some(36), ..PlayerConfig::default() };

    let mut player = Player::new(storage, codec, MockStatus::new(), config);
    let (outcome, sent) = play(&mut player).await;

    assert_eq!(outcome, RunOutcome::Passed);
    assert_eq!(sent.len(), 64);
    i2c.done();
}

#[tokio::test]
async fn test_local_file_plays_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let payload = audio(3000);
    std::fs::write(dir.path().join("sound.wav"), wav(&payload)).unwrap();

    let storage = LocalFileStorage::new(dir.path().to_str().unwrap());
    let mut i2c = I2cMock::new(&full_run_transactions());
    let codec = Wm8731::new(i2c.clone(), NoopDelay);

    let mut player = Player::new(storage, codec, MockStatus::new(), PlayerConfig::default());
    let (outcome, sent) = play(&mut player).await;

    assert_eq!(outcome, RunOutcome::Passed);
    assert_eq!(sent, payload);
    assert_eq!(player.status().lines().len(), 8);
    i2c.done();
}

#[tokio::test]
async fn test_missing_local_directory_is_skipped_without_codec_traffic() {
    let storage = LocalFileStorage::new("/nonexistent/music/root");
    let mut i2c = I2cMock::new(&[]);
    let codec = Wm8731::new(i2c.clone(), NoopDelay);

    let mut player = Player::new(storage, codec, MockStatus::new(), PlayerConfig::default());
    let (outcome, sent) = play(&mut player).await;

    assert_eq!(outcome, RunOutcome::Skipped);
    assert!(sent.is_empty());
    i2c.done();
}
