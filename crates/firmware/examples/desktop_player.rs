//! Desktop Player
//!
//! Plays a WAV file from a local directory through the full streaming
//! pipeline: local storage → feeder → 1 KiB ring → frame emitter, with a
//! clock thread standing in for the codec's frame sync and a mock codec on
//! the control side.
//!
//! Run with:
//!   MUSIC_PATH=./music RUST_LOG=debug cargo run --example desktop_player --features emulator
//!   cargo run --example desktop_player --features emulator -- other.wav

use firmware::audio::emulator::{EmulatorFrameIrq, EmulatorFramePort, FrameClock};
use firmware::{LogStatus, Player, PlayerConfig};
use platform::config::{self, FIXED_SAMPLE_RATE_HZ, RING_CAPACITY};
use platform::mocks::MockCodec;
use platform::storage_local::LocalFileStorage;
use playback::{Pipeline, RingBuffer};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("{} - Desktop Player", config::APP_NAME);

    let storage = LocalFileStorage::from_env().unwrap_or_else(|| LocalFileStorage::new("."));
    let file_name: &'static str = match std::env::args().nth(1) {
        Some(name) => Box::leak(name.into_boxed_str()),
        None => config::SOUND_FILE_NAME,
    };

    // The frame clock thread needs the ring for the life of the process.
    let ring: &'static mut RingBuffer<RING_CAPACITY> = Box::leak(Box::new(RingBuffer::new()));
    let mut pipeline = Pipeline::new(ring, EmulatorFramePort::new());
    let mut irq = EmulatorFrameIrq::new();
    let clock = FrameClock::start(&irq, FIXED_SAMPLE_RATE_HZ);

    let config = PlayerConfig { file_name, volume: None };
    let mut player = Player::new(storage, MockCodec::new(), LogStatus, config);
    let outcome = player.run(&mut pipeline, &mut irq).await;
    let fired = clock.stop();

    if let Some(emitter) = pipeline.emitter() {
        let port = emitter.port();
        tracing::info!(
            words = port.words(),
            silent = port.silent_words(),
            peak = port.peak(),
            fired,
            "frame port summary"
        );
    }
    println!("Finished: {outcome:?} (status {})", outcome.code());
    Ok(())
}
