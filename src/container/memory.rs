//! Memory-backed store.

use crate::compress::{decompress_bytes, Compressor};
use crate::error::OdsError;

use super::{Image, Store};

/// A store over an in-memory byte image. The image is held decompressed;
/// compression only applies when bytes enter or leave the container.
pub(crate) struct MemStore {
    image: Vec<u8>,
}

impl MemStore {
    pub fn new() -> Self {
        Self { image: Vec::new() }
    }

    /// Decompresses pre-existing data into the buffer.
    pub fn from_bytes(data: &[u8], compressor: &dyn Compressor) -> Result<Self, OdsError> {
        Ok(Self {
            image: decompress_bytes(compressor, data)?,
        })
    }
}

impl Store for MemStore {
    fn read_image(&self) -> Result<Option<Image>, OdsError> {
        if self.image.is_empty() {
            return Ok(None);
        }
        Ok(Some(Image::Owned(self.image.clone())))
    }

    fn write_image(&mut self, image: &[u8]) -> Result<(), OdsError> {
        self.image = image.to_vec();
        Ok(())
    }

    fn clear(&mut self) -> Result<(), OdsError> {
        self.image.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compress::{GzipCompression, NoCompression};

    #[test]
    fn empty_store_reads_absent() {
        let store = MemStore::new();
        assert!(store.read_image().unwrap().is_none());
    }

    #[test]
    fn write_then_read_round_trips() {
        let mut store = MemStore::new();
        store.write_image(&[1, 2, 3]).unwrap();
        let image = store.read_image().unwrap().unwrap();
        assert_eq!(&image[..], &[1, 2, 3]);
    }

    #[test]
    fn from_bytes_decompresses_eagerly() {
        let packed = crate::compress::compress_bytes(&GzipCompression, &[9, 9, 9]).unwrap();
        let store = MemStore::from_bytes(&packed, &GzipCompression).unwrap();
        let image = store.read_image().unwrap().unwrap();
        assert_eq!(&image[..], &[9, 9, 9]);
    }

    #[test]
    fn from_bytes_with_identity_is_verbatim() {
        let store = MemStore::from_bytes(&[5, 6], &NoCompression).unwrap();
        let image = store.read_image().unwrap().unwrap();
        assert_eq!(&image[..], &[5, 6]);
    }

    #[test]
    fn clear_empties_the_buffer() {
        let mut store = MemStore::new();
        store.write_image(&[1]).unwrap();
        store.clear().unwrap();
        assert!(store.read_image().unwrap().is_none());
    }
}
