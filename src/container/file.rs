//! File-backed store.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::compress::Compressor;
use crate::error::OdsError;

use super::{Image, Store};

/// A store over a single file, decompressed on read and recompressed on
/// write. Writes land in a sibling temp file first and are renamed into
/// place, so an interrupted write leaves the old image intact.
pub(crate) struct FileStore {
    path: PathBuf,
    compressor: Arc<dyn Compressor>,
}

impl FileStore {
    pub fn new(path: &Path, compressor: Arc<dyn Compressor>) -> Self {
        Self {
            path: path.to_path_buf(),
            compressor,
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl Store for FileStore {
    fn read_image(&self) -> Result<Option<Image>, OdsError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let file = File::open(&self.path)?;
        if file.metadata()?.len() == 0 {
            // A truncated container is absent under any compressor.
            return Ok(None);
        }
        if self.compressor.is_passthrough() {
            // Identity compression: map the file instead of copying it.
            let map = unsafe { memmap2::Mmap::map(&file)? };
            return Ok(Some(Image::Mapped(map)));
        }
        let mut source = self.compressor.wrap_reader(Box::new(file))?;
        let mut image = Vec::new();
        source.read_to_end(&mut image)?;
        Ok(Some(Image::Owned(image)))
    }

    fn write_image(&mut self, image: &[u8]) -> Result<(), OdsError> {
        let tmp = self.temp_path();
        let file = File::create(&tmp)?;
        let mut sink = self.compressor.wrap_writer(Box::new(file))?;
        sink.write_all(image)?;
        sink.finish()?;
        fs::rename(&tmp, &self.path)?;
        tracing::debug!(path = %self.path.display(), bytes = image.len(), "wrote container image");
        Ok(())
    }

    fn clear(&mut self) -> Result<(), OdsError> {
        File::create(&self.path)?;
        Ok(())
    }
}
