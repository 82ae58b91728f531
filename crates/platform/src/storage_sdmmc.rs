//! SD card Storage implementation for the hardware target.
//!
//! Wraps an `embedded-sdmmc` [`VolumeManager`] over any [`BlockDevice`]
//! (in firmware: `SdCard` on an SPI bus). Only the first FAT volume and its
//! root directory are used, and files are opened read-only.
//!
//! The volume manager uses interior mutability, so open files hold a shared
//! borrow of it and multiple reads never need `&mut` access to the storage.

use embedded_sdmmc::{
    BlockDevice, Mode, RawDirectory, RawFile, TimeSource, Timestamp, VolumeIdx, VolumeManager,
};

use crate::storage::{File, Storage};

/// Error type for SD card storage operations.
#[derive(Debug)]
pub enum SdmmcError<E: core::fmt::Debug> {
    /// `exists` / `open_file` called before a successful `mount`.
    NotMounted,
    /// Path does not fit an 8.3 short name.
    NameTooLong,
    /// Error from the FAT layer or the block device beneath it.
    Fs(embedded_sdmmc::Error<E>),
}

impl<E: core::fmt::Debug> core::fmt::Display for SdmmcError<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotMounted => f.write_str("SD card not mounted"),
            Self::NameTooLong => f.write_str("file name longer than 8.3"),
            Self::Fs(e) => write!(f, "SD card error: {e:?}"),
        }
    }
}

impl<E: core::fmt::Debug> From<embedded_sdmmc::Error<E>> for SdmmcError<E> {
    fn from(e: embedded_sdmmc::Error<E>) -> Self {
        Self::Fs(e)
    }
}

/// Fixed timestamp source.
///
/// The player never writes, so file times are irrelevant; the board has no
/// battery-backed RTC wired up either.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedTimeSource;

impl TimeSource for FixedTimeSource {
    fn get_timestamp(&self) -> Timestamp {
        Timestamp {
            year_since_1970: 0,
            zero_indexed_month: 0,
            zero_indexed_day: 0,
            hours: 0,
            minutes: 0,
            seconds: 0,
        }
    }
}

/// A read-only file on the SD card.
///
/// Closed on drop.
pub struct SdmmcFile<'a, D: BlockDevice, T: TimeSource> {
    volume_mgr: &'a VolumeManager<D, T>,
    raw: RawFile,
}

impl<D: BlockDevice, T: TimeSource> File for SdmmcFile<'_, D, T> {
    type Error = SdmmcError<D::Error>;

    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if self.volume_mgr.file_eof(self.raw)? {
            return Ok(0);
        }
        Ok(self.volume_mgr.read(self.raw, buf)?)
    }

    async fn seek(&mut self, pos: u64) -> Result<u64, Self::Error> {
        // FAT32 file sizes fit in u32; clamp instead of truncating.
        let offset = u32::try_from(pos).unwrap_or(u32::MAX);
        self.volume_mgr.file_seek_from_start(self.raw, offset)?;
        Ok(u64::from(self.volume_mgr.file_offset(self.raw)?))
    }

    fn tell(&self) -> u64 {
        self.volume_mgr.file_offset(self.raw).map_or(0, u64::from)
    }

    fn size(&self) -> u64 {
        self.volume_mgr.file_length(self.raw).map_or(0, u64::from)
    }
}

impl<D: BlockDevice, T: TimeSource> Drop for SdmmcFile<'_, D, T> {
    fn drop(&mut self) {
        // Nothing to flush on a read-only handle; a close failure leaks one
        // file slot at worst.
        let _ = self.volume_mgr.close_file(self.raw);
    }
}

/// SD card backed Storage.
///
/// Construct with `SdmmcStorage::new(sd_card, FixedTimeSource)`, then call
/// [`Storage::mount`] once before opening files.
pub struct SdmmcStorage<D: BlockDevice, T: TimeSource> {
    volume_mgr: VolumeManager<D, T>,
    root: Option<RawDirectory>,
}

impl<D: BlockDevice, T: TimeSource> SdmmcStorage<D, T> {
    /// Wrap a block device. No card access happens until [`Storage::mount`].
    pub fn new(block_device: D, time_source: T) -> Self {
        Self { volume_mgr: VolumeManager::new(block_device, time_source), root: None }
    }

    /// Whether [`Storage::mount`] succeeded.
    pub fn is_mounted(&self) -> bool {
        self.root.is_some()
    }

    fn root(&self) -> Result<RawDirectory, SdmmcError<D::Error>> {
        self.root.ok_or(SdmmcError::NotMounted)
    }
}

/// Upper-case an 8.3 name for the FAT directory lookup.
fn short_name<E: core::fmt::Debug>(path: &str) -> Result<heapless::String<12>, SdmmcError<E>> {
    let mut name = heapless::String::new();
    for ch in path.chars() {
        name.push(ch.to_ascii_uppercase()).map_err(|_| SdmmcError::NameTooLong)?;
    }
    Ok(name)
}

impl<D: BlockDevice, T: TimeSource> Storage for SdmmcStorage<D, T> {
    type Error = SdmmcError<D::Error>;
    type File<'a>
        = SdmmcFile<'a, D, T>
    where
        Self: 'a;

    async fn mount(&mut self) -> Result<(), Self::Error> {
        if self.root.is_some() {
            return Ok(());
        }
        let volume = self.volume_mgr.open_raw_volume(VolumeIdx(0))?;
        let root = self.volume_mgr.open_root_dir(volume)?;
        self.root = Some(root);
        Ok(())
    }

    async fn open_file<'a>(&'a mut self, path: &str) -> Result<Self::File<'a>, Self::Error> {
        let root = self.root()?;
        let name = short_name(path)?;
        let raw = self.volume_mgr.open_file_in_dir(root, name.as_str(), Mode::ReadOnly)?;
        Ok(SdmmcFile { volume_mgr: &self.volume_mgr, raw })
    }

    async fn exists(&mut self, path: &str) -> Result<bool, Self::Error> {
        let root = self.root()?;
        let name = short_name(path)?;
        match self.volume_mgr.find_directory_entry(root, name.as_str()) {
            Ok(_) => Ok(true),
            Err(embedded_sdmmc::Error::NotFound) => Ok(false),
            Err(e) => Err(SdmmcError::Fs(e)),
        }
    }
}
