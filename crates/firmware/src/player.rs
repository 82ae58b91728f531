//! Top-level sequencer: mount, find, describe and play one WAV file.
//!
//! ```text
//! mount storage ─► init codec ─► find file ─► open ─► header ─► session
//!                                                                 │
//!                   5. End. ◄── pipeline.play ◄── seek to audio ◄─┘
//! ```
//!
//! Every step reports a status line. A failed step ends the run with a
//! [`RunOutcome`]; nothing is retried.

use core::fmt::Write as _;

use heapless::String;
use platform::config::SOUND_FILE_NAME;
use platform::{AudioCodec, File, FrameIrq, FramePort, StatusDisplay, StatusRow, Storage};
use playback::wav_header::{read_header, seek_to_audio};
use playback::{FrameEmitter, Pipeline, PlaybackSession};

/// Status texts, in the order they appear.
pub mod text {
    /// Storage mount attempted
    pub const STORAGE_INIT: &str = "1. Initializing storage";
    /// Storage could not be mounted
    pub const STORAGE_FAILED: &str = "2. Storage not initialized";
    /// File not present in the storage root
    pub const FILE_NOT_FOUND: &str = "2. File Not Found";
    /// File found and opened
    pub const FILE_ASSIGNED: &str = "2. File Assigned";
    /// Codec did not accept its configuration
    pub const CODEC_FAILED: &str = "2. Codec not initialized";
    /// Header section caption
    pub const HEADER: &str = "3. Get file header:";
    /// Header could not be read
    pub const HEADER_FAILED: &str = "4. Header unreadable";
    /// File ends inside the header
    pub const FILE_TOO_SHORT: &str = "4. File too short";
    /// Seek to the first audio byte failed
    pub const SEEK_FAILED: &str = "4. Audio data unreachable";
    /// Playback started
    pub const PLAYING: &str = "4. Play audio...";
    /// Playback ended early
    pub const PLAY_FAILED: &str = "5. Playback aborted";
    /// Playback finished
    pub const END: &str = "5. End.";
}

/// Outcome of one [`Player::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RunOutcome {
    /// Storage unavailable; nothing attempted
    Skipped,
    /// File played to the end
    Passed,
    /// A step after mounting failed
    Failed,
}

impl RunOutcome {
    /// Numeric status code: 0 skipped, 1 passed, 2 failed.
    pub fn code(self) -> u8 {
        match self {
            Self::Skipped => 0,
            Self::Passed => 1,
            Self::Failed => 2,
        }
    }
}

/// Runtime options for the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerConfig {
    /// File in the storage root to play
    pub file_name: &'static str,
    /// Headphone volume (0..=80) applied after codec init; `None` keeps the
    /// power-on level from the configuration table
    pub volume: Option<u8>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self { file_name: SOUND_FILE_NAME, volume: None }
    }
}

/// Sequencer owning storage, codec and status output.
pub struct Player<S, C, D> {
    storage: S,
    codec: C,
    status: D,
    config: PlayerConfig,
}

impl<S, C, D> Player<S, C, D>
where
    S: Storage,
    C: AudioCodec,
    D: StatusDisplay,
{
    /// Assemble a player.
    pub fn new(storage: S, codec: C, status: D, config: PlayerConfig) -> Self {
        Self { storage, codec, status, config }
    }

    /// Status sink.
    pub fn status(&self) -> &D {
        &self.status
    }

    /// Codec driver.
    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Storage backend.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Take the parts back.
    pub fn into_parts(self) -> (S, C, D) {
        (self.storage, self.codec, self.status)
    }

    /// Run the whole sequence once.
    ///
    /// `irq` must hand the emitter to the frame interrupt of the port the
    /// codec's audio interface is wired to.
    pub async fn run<'a, P, I, const N: usize>(
        &mut self,
        pipeline: &mut Pipeline<'a, P, N>,
        irq: &mut I,
    ) -> RunOutcome
    where
        P: FramePort,
        I: FrameIrq<FrameEmitter<'a, P, N>>,
    {
        let Self { storage, codec, status, config } = self;

        show(status, StatusRow::Storage, text::STORAGE_INIT);
        if let Err(_e) = storage.mount().await {
            #[cfg(feature = "defmt")]
            defmt::warn!("storage mount failed: {}", defmt::Debug2Format(&_e));
            #[cfg(feature = "tracing")]
            tracing::warn!(error = ?_e, "storage mount failed");
            show(status, StatusRow::File, text::STORAGE_FAILED);
            return RunOutcome::Skipped;
        }

        if let Err(_e) = codec.init().await {
            #[cfg(feature = "defmt")]
            defmt::error!("codec init failed: {}", defmt::Debug2Format(&_e));
            #[cfg(feature = "tracing")]
            tracing::error!(error = ?_e, "codec init failed");
            show(status, StatusRow::File, text::CODEC_FAILED);
            return RunOutcome::Failed;
        }
        if let Some(volume) = config.volume {
            if let Err(_e) = codec.set_volume(volume, volume).await {
                #[cfg(feature = "defmt")]
                defmt::warn!("volume not applied: {}", defmt::Debug2Format(&_e));
                #[cfg(feature = "tracing")]
                tracing::warn!(error = ?_e, "volume not applied");
            }
        }

        match storage.exists(config.file_name).await {
            Ok(true) => {}
            Ok(false) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("{=str} not found", config.file_name);
                #[cfg(feature = "tracing")]
                tracing::warn!(file = config.file_name, "file not found");
                show(status, StatusRow::File, text::FILE_NOT_FOUND);
                return RunOutcome::Failed;
            }
            Err(_e) => {
                #[cfg(feature = "defmt")]
                defmt::error!("lookup failed: {}", defmt::Debug2Format(&_e));
                #[cfg(feature = "tracing")]
                tracing::error!(error = ?_e, file = config.file_name, "lookup failed");
                show(status, StatusRow::File, text::FILE_NOT_FOUND);
                return RunOutcome::Failed;
            }
        }
        let mut file = match storage.open_file(config.file_name).await {
            Ok(file) => file,
            Err(_e) => {
                #[cfg(feature = "defmt")]
                defmt::error!("open failed: {}", defmt::Debug2Format(&_e));
                #[cfg(feature = "tracing")]
                tracing::error!(error = ?_e, file = config.file_name, "open failed");
                show(status, StatusRow::File, text::FILE_NOT_FOUND);
                return RunOutcome::Failed;
            }
        };
        show(status, StatusRow::File, text::FILE_ASSIGNED);

        show(status, StatusRow::Header, text::HEADER);
        let info = match read_header(&mut file).await {
            Ok(info) => info,
            Err(_e) => {
                #[cfg(feature = "defmt")]
                defmt::error!("header unreadable: {}", defmt::Debug2Format(&_e));
                #[cfg(feature = "tracing")]
                tracing::error!(error = ?_e, "header unreadable");
                show(status, StatusRow::Playback, text::HEADER_FAILED);
                return RunOutcome::Failed;
            }
        };
        show_value(status, StatusRow::Channels, "No. of channels: ", info.channels.into());
        show_value(status, StatusRow::SampleRate, "sample rate: ", info.sample_rate);
        show_value(status, StatusRow::BitsPerSample, "bits per sample: ", info.bits_per_sample.into());
        if !info.matches_codec() {
            #[cfg(feature = "defmt")]
            defmt::warn!("{} does not match the codec setup, playing anyway", info);
            #[cfg(feature = "tracing")]
            tracing::warn!(?info, "file does not match the codec setup, playing anyway");
        }

        let mut session = match PlaybackSession::new(file.size()) {
            Ok(session) => session,
            Err(_e) => {
                #[cfg(feature = "defmt")]
                defmt::error!("{}", _e);
                #[cfg(feature = "tracing")]
                tracing::error!(error = %_e, "cannot start session");
                show(status, StatusRow::Playback, text::FILE_TOO_SHORT);
                return RunOutcome::Failed;
            }
        };
        if let Err(_e) = seek_to_audio(&mut file).await {
            #[cfg(feature = "defmt")]
            defmt::error!("seek to audio failed: {}", defmt::Debug2Format(&_e));
            #[cfg(feature = "tracing")]
            tracing::error!(error = ?_e, "seek to audio failed");
            show(status, StatusRow::Playback, text::SEEK_FAILED);
            return RunOutcome::Failed;
        }

        show(status, StatusRow::Playback, text::PLAYING);
        match pipeline.play(&mut file, &mut session, irq, codec).await {
            Ok(report) => {
                if report.emitter.underruns > 0 {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("{} underrun frames sent as silence", report.emitter.underruns);
                    #[cfg(feature = "tracing")]
                    tracing::warn!(underruns = report.emitter.underruns, "silence sent on underrun");
                }
            }
            Err(_e) => {
                #[cfg(feature = "defmt")]
                defmt::error!("playback aborted: {}", defmt::Debug2Format(&_e));
                #[cfg(feature = "tracing")]
                tracing::error!(error = %_e, "playback aborted");
                show(status, StatusRow::Done, text::PLAY_FAILED);
                return RunOutcome::Failed;
            }
        }

        show(status, StatusRow::Done, text::END);
        RunOutcome::Passed
    }
}

/// Show a line; a failing status sink never stops playback.
fn show<D: StatusDisplay>(status: &mut D, row: StatusRow, line: &str) {
    if let Err(_e) = status.show(row, line) {
        #[cfg(feature = "defmt")]
        defmt::warn!("status output failed: {}", defmt::Debug2Format(&_e));
        #[cfg(feature = "tracing")]
        tracing::warn!(error = ?_e, "status output failed");
    }
}

fn show_value<D: StatusDisplay>(status: &mut D, row: StatusRow, label: &str, value: u32) {
    let mut line: String<32> = String::new();
    // 32 bytes hold the longest label plus ten digits.
    let _ = write!(line, "{label}{value}");
    show(status, row, &line);
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use core::cell::Cell;
    use embassy_futures::{join::join, yield_now};
    use platform::mocks::{
        CodecCall, MockCodec, MockFile, MockFramePort, MockFrameSlot, MockStatus, MockStorage,
    };
    use platform::CodecState;
    use playback::RingBuffer;

    fn wav(audio: &[u8]) -> Vec<u8> {
        let mut bytes = vec![0u8; 44];
        bytes[22..24].copy_from_slice(&2u16.to_le_bytes());
        bytes[24..28].copy_from_slice(&44_100u32.to_le_bytes());
        bytes[34..36].copy_from_slice(&16u16.to_le_bytes());
        bytes.extend_from_slice(audio);
        bytes
    }

    type Emitter<'a> = FrameEmitter<'a, MockFramePort, 64>;

    async fn run_player(
        player: &mut Player<MockStorage, MockCodec, MockStatus>,
    ) -> (RunOutcome, Vec<u32>) {
        let mut ring: RingBuffer<64> = RingBuffer::new();
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
        let words = pipeline.emitter().map(|e| e.port().words().to_vec()).unwrap_or_default();
        (outcome, words)
    }

    #[tokio::test]
    async fn test_plays_file_and_reports_each_step() {
        let audio: Vec<u8> = (1..=200u8).collect();
        let storage = MockStorage::new().with_file("SOUND.WAV", MockFile::new(wav(&audio)));
        let mut player =
            Player::new(storage, MockCodec::new(), MockStatus::new(), PlayerConfig::default());

        let (outcome, words) = run_player(&mut player).await;
        assert_eq!(outcome, RunOutcome::Passed);
        assert_eq!(outcome.code(), 1);

        let sent: Vec<u8> =
            words.iter().filter(|&&w| w != 0).flat_map(|w| w.to_be_bytes()).collect();
        assert_eq!(sent, audio);

        let status = player.status();
        assert_eq!(status.text(StatusRow::Storage), Some(text::STORAGE_INIT));
        assert_eq!(status.text(StatusRow::File), Some(text::FILE_ASSIGNED));
        assert_eq!(status.text(StatusRow::Header), Some(text::HEADER));
        assert_eq!(status.text(StatusRow::Channels), Some("No. of channels: 2"));
        assert_eq!(status.text(StatusRow::SampleRate), Some("sample rate: 44100"));
        assert_eq!(status.text(StatusRow::BitsPerSample), Some("bits per sample: 16"));
        assert_eq!(status.text(StatusRow::Playback), Some(text::PLAYING));
        assert_eq!(status.text(StatusRow::Done), Some(text::END));

        assert_eq!(
            player.codec().calls(),
            &[CodecCall::Init, CodecCall::Activate, CodecCall::Deactivate]
        );
        assert_eq!(player.codec().state(), CodecState::Configured);
    }

    #[tokio::test]
    async fn test_unmountable_storage_is_skipped() {
        let mut player = Player::new(
            MockStorage::unmountable(),
            MockCodec::new(),
            MockStatus::new(),
            PlayerConfig::default(),
        );
        let (outcome, _) = run_player(&mut player).await;
        assert_eq!(outcome, RunOutcome::Skipped);
        assert_eq!(outcome.code(), 0);
        assert_eq!(player.status().text(StatusRow::File), Some(text::STORAGE_FAILED));
        assert!(player.codec().calls().is_empty());
    }

    #[tokio::test]
    async fn test_missing_file_fails() {
        let storage = MockStorage::new().with_file("OTHER.WAV", MockFile::new(wav(&[0; 8])));
        let mut player =
            Player::new(storage, MockCodec::new(), MockStatus::new(), PlayerConfig::default());
        let (outcome, _) = run_player(&mut player).await;
        assert_eq!(outcome, RunOutcome::Failed);
        assert_eq!(outcome.code(), 2);
        assert_eq!(player.status().text(StatusRow::File), Some(text::FILE_NOT_FOUND));
        assert_eq!(player.status().text(StatusRow::Playback), None);
    }

    #[tokio::test]
    async fn test_file_shorter_than_header_fails_before_playback() {
        let storage = MockStorage::new().with_file("sound.wav", MockFile::new(vec![0u8; 40]));
        let mut player =
            Player::new(storage, MockCodec::new(), MockStatus::new(), PlayerConfig::default());
        let (outcome, _) = run_player(&mut player).await;
        assert_eq!(outcome, RunOutcome::Failed);
        assert_eq!(player.codec().calls(), &[CodecCall::Init]);
        assert_eq!(player.status().text(StatusRow::Playback), Some(text::FILE_TOO_SHORT));
        assert_eq!(player.status().text(StatusRow::Done), None);
    }

    #[tokio::test]
    async fn test_codec_init_failure_is_reported() {
        let storage = MockStorage::new().with_file("sound.wav", MockFile::new(wav(&[1; 8])));
        let mut player = Player::new(
            storage,
            MockCodec::new().failing_init(),
            MockStatus::new(),
            PlayerConfig::default(),
        );
        let (outcome, _) = run_player(&mut player).await;
        assert_eq!(outcome, RunOutcome::Failed);
        assert_eq!(player.status().text(StatusRow::File), Some(text::CODEC_FAILED));
        assert_eq!(player.codec().calls(), &[CodecCall::Init]);
    }

    #[tokio::test]
    async fn test_truncated_header_is_reported() {
        let storage = MockStorage::new().with_file("sound.wav", MockFile::new(vec![0u8; 30]));
        let mut player =
            Player::new(storage, MockCodec::new(), MockStatus::new(), PlayerConfig::default());
        let (outcome, _) = run_player(&mut player).await;
        assert_eq!(outcome, RunOutcome::Failed);
        assert_eq!(player.status().text(StatusRow::Header), Some(text::HEADER));
        assert_eq!(player.status().text(StatusRow::Channels), None);
        assert_eq!(player.status().text(StatusRow::Playback), Some(text::HEADER_FAILED));
    }

    #[tokio::test]
    async fn test_payload_inside_one_ring_sends_every_word() {
        let storage = MockStorage::new().with_file("sound.wav", MockFile::new(wav(&[3u8; 48])));
        let mut player =
            Player::new(storage, MockCodec::new(), MockStatus::new(), PlayerConfig::default());
        let (outcome, words) = run_player(&mut player).await;
        assert_eq!(outcome, RunOutcome::Passed);
        assert_eq!(words.iter().filter(|&&w| w != 0).count(), 12);
        assert_eq!(player.status().text(StatusRow::Done), Some(text::END));
    }

    #[tokio::test]
    async fn test_volume_applied_after_init() {
        let storage = MockStorage::new().with_file("sound.wav", MockFile::new(wav(&[9; 16])));
        let config = PlayerConfig { volume: Some(120), ..PlayerConfig::default() };
        let mut player = Player::new(storage, MockCodec::new(), MockStatus::new(), config);
        let (outcome, _) = run_player(&mut player).await;
        assert_eq!(outcome, RunOutcome::Passed);
        assert_eq!(
            player.codec().calls().get(..2),
            Some(&[CodecCall::Init, CodecCall::SetVolume(80, 80)][..])
        );
    }

    #[tokio::test]
    async fn test_read_error_mid_stream_fails_after_teardown() {
        let file = MockFile::new(wav(&[5u8; 400])).with_read_error_at(300);
        let storage = MockStorage::new().with_file("sound.wav", file);
        let mut player =
            Player::new(storage, MockCodec::new(), MockStatus::new(), PlayerConfig::default());
        let (outcome, _) = run_player(&mut player).await;
        assert_eq!(outcome, RunOutcome::Failed);
        assert_eq!(player.status().text(StatusRow::Done), Some(text::PLAY_FAILED));
        assert_eq!(player.codec().state(), CodecState::Configured);
    }
}
