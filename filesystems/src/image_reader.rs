// Seek + read cursor over a raw disk image

use fatrec_core::RecoveryError;
use log::debug;
use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

/// Random-access reader over an image. Holds the single cursor the directory
/// walk saves and restores around each descent.
pub struct ImageReader<R> {
    inner: R,
}

impl ImageReader<BufReader<File>> {
    /// Open an image file. Any failure to open is reported as `ImageNotFound`.
    pub fn open(path: &Path) -> Result<Self, RecoveryError> {
        let file = File::open(path).map_err(|e| {
            debug!("Cannot open {}: {}", path.display(), e);
            RecoveryError::ImageNotFound { path: path.to_path_buf() }
        })?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: Read + Seek> ImageReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn seek_to(&mut self, offset: u64) -> Result<(), RecoveryError> {
        self.inner.seek(SeekFrom::Start(offset))?;
        Ok(())
    }

    pub fn position(&mut self) -> Result<u64, RecoveryError> {
        Ok(self.inner.stream_position()?)
    }

    /// Fill `buf` from the cursor. Returns `false` if the image ends first.
    pub fn read_record(&mut self, buf: &mut [u8]) -> Result<bool, RecoveryError> {
        match self.inner.read_exact(buf) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Read `len` bytes starting at `offset`. Returns `None` on a short read.
    /// The buffer grows with the data actually present, so a corrupt size
    /// field cannot force a huge allocation up front.
    pub fn read_at(&mut self, offset: u64, len: u64) -> Result<Option<Vec<u8>>, RecoveryError> {
        self.seek_to(offset)?;
        let mut data = Vec::new();
        (&mut self.inner).take(len).read_to_end(&mut data)?;
        if (data.len() as u64) < len {
            return Ok(None);
        }
        Ok(Some(data))
    }
}
