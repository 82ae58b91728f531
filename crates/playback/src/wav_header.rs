//! Canonical PCM WAV header fields.
//!
//! Only three fields are read, each from its fixed offset in the 44-byte
//! canonical header:
//!
//! | Offset | Size | Field           |
//! |--------|------|-----------------|
//! | 22     | 2    | channels        |
//! | 24     | 4    | sample rate     |
//! | 34     | 2    | bits per sample |
//!
//! All little-endian. No chunk walking: files with extra chunks before `data`
//! are not supported. The values are reported for display; codec setup and
//! buffer sizing are fixed and never derived from them.

use platform::config::{FIXED_SAMPLE_RATE_HZ, WAV_HEADER_LEN};
use platform::File;

const CHANNELS_OFFSET: u64 = 22;
/// Gap between the end of the sample rate and bits per sample
/// (byte rate + block align).
const SKIP_TO_BITS: u64 = 6;

/// Errors while reading the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HeaderError<E> {
    /// Storage failure
    Storage(E),
    /// File ended inside the header
    Truncated,
}

impl<E: core::fmt::Debug> core::fmt::Display for HeaderError<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Storage(e) => write!(f, "storage error reading header: {e:?}"),
            Self::Truncated => f.write_str("file ends inside the WAV header"),
        }
    }
}

/// Snapshot of the header fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AudioHeaderInfo {
    /// Channel count
    pub channels: u16,
    /// Samples per second per channel
    pub sample_rate: u32,
    /// Bits per sample
    pub bits_per_sample: u16,
}

impl AudioHeaderInfo {
    /// Whether the file matches the fixed codec setup (16-bit stereo at
    /// 44.1 kHz, one 32-bit word per frame). Other layouts still play, at the
    /// wrong speed or pitch.
    pub fn matches_codec(&self) -> bool {
        self.channels == 2
            && self.bits_per_sample == 16
            && self.sample_rate == FIXED_SAMPLE_RATE_HZ
    }
}

/// Read the header fields. Leaves the file positioned just after them.
///
/// # Errors
///
/// [`HeaderError::Truncated`] if the file ends early,
/// [`HeaderError::Storage`] on read or seek failure.
pub async fn read_header<F: File>(file: &mut F) -> Result<AudioHeaderInfo, HeaderError<F::Error>> {
    file.seek(CHANNELS_OFFSET).await.map_err(HeaderError::Storage)?;
    let channels = u16::from_le_bytes(read_array(file).await?);
    let sample_rate = u32::from_le_bytes(read_array(file).await?);

    let bits_at = file.tell().saturating_add(SKIP_TO_BITS);
    file.seek(bits_at).await.map_err(HeaderError::Storage)?;
    let bits_per_sample = u16::from_le_bytes(read_array(file).await?);

    Ok(AudioHeaderInfo { channels, sample_rate, bits_per_sample })
}

/// Position `file` on the first audio byte.
///
/// # Errors
///
/// Propagates the storage seek error.
pub async fn seek_to_audio<F: File>(file: &mut F) -> Result<(), F::Error> {
    file.seek(WAV_HEADER_LEN).await.map(|_| ())
}

/// Fill a `K`-byte array, tolerating short reads.
async fn read_array<F: File, const K: usize>(
    file: &mut F,
) -> Result<[u8; K], HeaderError<F::Error>> {
    let mut out = [0u8; K];
    let mut filled = 0;
    while let Some(rest) = out.get_mut(filled..).filter(|r| !r.is_empty()) {
        match file.read(rest).await.map_err(HeaderError::Storage)? {
            0 => return Err(HeaderError::Truncated),
            n => filled = filled.saturating_add(n),
        }
    }
    Ok(out)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use platform::mocks::{MockFile, MockStorageError};

    fn header(channels: u16, rate: u32, bits: u16) -> Vec<u8> {
        let mut h = vec![0u8; 44];
        h[22..24].copy_from_slice(&channels.to_le_bytes());
        h[24..28].copy_from_slice(&rate.to_le_bytes());
        h[34..36].copy_from_slice(&bits.to_le_bytes());
        h
    }

    #[tokio::test]
    async fn test_reads_stereo_header() {
        let mut file = MockFile::new(header(2, 44_100, 16));
        let info = read_header(&mut file).await.unwrap();
        assert_eq!(
            info,
            AudioHeaderInfo { channels: 2, sample_rate: 44_100, bits_per_sample: 16 }
        );
        assert!(info.matches_codec());
        assert_eq!(file.tell(), 36);
    }

    #[tokio::test]
    async fn test_channel_bytes_02_00_mean_stereo() {
        let mut bytes = vec![0u8; 44];
        bytes[22] = 0x02;
        bytes[23] = 0x00;
        let info = read_header(&mut MockFile::new(bytes)).await.unwrap();
        assert_eq!(info.channels, 2);
        assert!(!info.matches_codec());
    }

    #[tokio::test]
    async fn test_short_reads_are_reassembled() {
        let mut file = MockFile::new(header(1, 48_000, 24)).with_short_reads(1);
        let info = read_header(&mut file).await.unwrap();
        assert_eq!(info.channels, 1);
        assert_eq!(info.sample_rate, 48_000);
        assert_eq!(info.bits_per_sample, 24);
    }

    #[tokio::test]
    async fn test_truncated_header() {
        let mut file = MockFile::new(vec![0u8; 30]);
        assert_eq!(read_header(&mut file).await, Err(HeaderError::Truncated));
    }

    #[tokio::test]
    async fn test_storage_error_propagates() {
        let mut file = MockFile::new(header(2, 44_100, 16)).with_read_error_at(24);
        assert_eq!(
            read_header(&mut file).await,
            Err(HeaderError::Storage(MockStorageError::Io))
        );
    }

    #[tokio::test]
    async fn test_seek_to_audio() {
        let mut file = MockFile::new(header(2, 44_100, 16));
        read_header(&mut file).await.unwrap();
        seek_to_audio(&mut file).await.unwrap();
        assert_eq!(file.tell(), 44);
    }
}
