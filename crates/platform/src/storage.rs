//! Storage abstraction for file systems

/// Storage trait for file system access.
///
/// Open files may borrow the storage (an SD card volume manager hands out
/// handles that refer back to it), hence the generic associated `File` type.
pub trait Storage {
    /// Error type
    type Error: core::fmt::Debug;
    /// File type
    type File<'a>: File<Error = Self::Error>
    where
        Self: 'a;

    /// Bring up the medium and mount its file system.
    ///
    /// Must succeed before [`Storage::exists`] or [`Storage::open_file`].
    fn mount(&mut self) -> impl core::future::Future<Output = Result<(), Self::Error>>;

    /// Open file for reading
    fn open_file<'a>(
        &'a mut self,
        path: &str,
    ) -> impl core::future::Future<Output = Result<Self::File<'a>, Self::Error>>;

    /// Check if path exists
    fn exists(
        &mut self,
        path: &str,
    ) -> impl core::future::Future<Output = Result<bool, Self::Error>>;
}

/// File trait for reading files
pub trait File {
    /// Error type
    type Error: core::fmt::Debug;

    /// Read from current position.
    ///
    /// Returns the number of bytes read; `0` means end of file.
    fn read(
        &mut self,
        buf: &mut [u8],
    ) -> impl core::future::Future<Output = Result<usize, Self::Error>>;

    /// Seek to an absolute position
    fn seek(&mut self, pos: u64) -> impl core::future::Future<Output = Result<u64, Self::Error>>;

    /// Current position
    fn tell(&self) -> u64;

    /// Get file size
    fn size(&self) -> u64;

    /// Read a single byte; `None` at end of file.
    async fn read_byte(&mut self) -> Result<Option<u8>, Self::Error> {
        let mut b = [0u8; 1];
        match self.read(&mut b).await? {
            0 => Ok(None),
            _ => {
                let [byte] = b;
                Ok(Some(byte))
            }
        }
    }
}
