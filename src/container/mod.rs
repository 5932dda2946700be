//! Container facade: uniform keyed operations over a file or memory store.
//!
//! An [`Ods`] owns a backing store and a registry. Read paths hand the
//! decompressed byte image to the navigator; edit paths scout the key,
//! splice a new image, and persist it back through the store.

mod file;
mod memory;

use std::ops::Deref;
use std::path::Path;
use std::sync::Arc;

use bytes::BytesMut;

use crate::codec::{decode_tags, encode_tag, encode_tags};
use crate::compress::{compress_bytes, Compressor, GzipCompression};
use crate::error::OdsError;
use crate::image::{edit, navigate, scout::scout};
use crate::registry::Registry;
use crate::tag::Tag;

use file::FileStore;
use memory::MemStore;

/// A decompressed byte image, either owned or mapped from a file.
pub(crate) enum Image {
    Owned(Vec<u8>),
    Mapped(memmap2::Mmap),
}

impl Deref for Image {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            Self::Owned(v) => v,
            Self::Mapped(m) => m,
        }
    }
}

/// The seam between the facade and its backing.
pub(crate) trait Store {
    /// The decompressed byte image, or `None` when no backing data exists.
    fn read_image(&self) -> Result<Option<Image>, OdsError>;

    /// Replaces the backing data with a new image.
    fn write_image(&mut self, image: &[u8]) -> Result<(), OdsError>;

    /// Truncates the backing data to empty.
    fn clear(&mut self) -> Result<(), OdsError>;
}

/// An Object Data Structure container.
///
/// Most operations take a dotted key addressing a tag anywhere in the
/// nested structure, e.g. `"Car.Owner.age"`. Names containing `.` remain
/// storable but unaddressable.
pub struct Ods {
    store: Box<dyn Store>,
    registry: Arc<Registry>,
}

impl Ods {
    /// A file-backed container using GZIP compression and the default
    /// registry.
    pub fn file(path: impl AsRef<Path>) -> Self {
        Self::file_with(
            path,
            Arc::new(GzipCompression),
            Arc::new(Registry::default()),
        )
    }

    /// A file-backed container with an explicit compressor and registry.
    pub fn file_with(
        path: impl AsRef<Path>,
        compressor: Arc<dyn Compressor>,
        registry: Arc<Registry>,
    ) -> Self {
        Self {
            store: Box::new(FileStore::new(path.as_ref(), compressor)),
            registry,
        }
    }

    /// An empty memory-backed container with the default registry.
    pub fn memory() -> Self {
        Self::memory_with(Arc::new(Registry::default()))
    }

    /// An empty memory-backed container with an explicit registry.
    pub fn memory_with(registry: Arc<Registry>) -> Self {
        Self {
            store: Box::new(MemStore::new()),
            registry,
        }
    }

    /// A memory-backed container initialized from compressed bytes.
    pub fn from_bytes(data: &[u8], compressor: &dyn Compressor) -> Result<Self, OdsError> {
        Self::from_bytes_with(data, compressor, Arc::new(Registry::default()))
    }

    /// A memory-backed container initialized from compressed bytes, with an
    /// explicit registry.
    pub fn from_bytes_with(
        data: &[u8],
        compressor: &dyn Compressor,
        registry: Arc<Registry>,
    ) -> Result<Self, OdsError> {
        Ok(Self {
            store: Box::new(MemStore::from_bytes(data, compressor)?),
            registry,
        })
    }

    /// The registry this container resolves custom tags and compressors
    /// through.
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Resolves a key to a tag, or `None` when the key or the backing data
    /// is absent.
    pub fn get(&self, key: &str) -> Result<Option<Tag>, OdsError> {
        match self.store.read_image()? {
            Some(image) => navigate::get(&image, key, &self.registry),
            None => Ok(None),
        }
    }

    /// All top-level tags in order, or `None` when the backing data is
    /// absent.
    pub fn get_all(&self) -> Result<Option<Vec<Tag>>, OdsError> {
        match self.store.read_image()? {
            Some(image) => decode_tags(&image, &self.registry).map(Some),
            None => Ok(None),
        }
    }

    /// Whether a key resolves. I/O failures report `false`.
    pub fn find(&self, key: &str) -> Result<bool, OdsError> {
        match self.store.read_image() {
            Ok(Some(image)) => navigate::find(&image, key),
            Ok(None) => Ok(false),
            Err(OdsError::Io(e)) => {
                tracing::warn!(error = %e, "find could not read the store");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Writes the tags, replacing any existing contents.
    pub fn save(&mut self, tags: &[Tag]) -> Result<(), OdsError> {
        let mut buf = BytesMut::new();
        encode_tags(&mut buf, tags, &self.registry)?;
        self.store.write_image(&buf)
    }

    /// Appends one tag after the existing contents.
    pub fn append(&mut self, tag: &Tag) -> Result<(), OdsError> {
        self.append_all(std::slice::from_ref(tag))
    }

    /// Appends tags after the existing contents. The whole image is
    /// rewritten; a missing file yields a fresh valid stream.
    pub fn append_all(&mut self, tags: &[Tag]) -> Result<(), OdsError> {
        let mut image = match self.store.read_image()? {
            Some(image) => image.to_vec(),
            None => Vec::new(),
        };
        let mut buf = BytesMut::new();
        encode_tags(&mut buf, tags, &self.registry)?;
        image.extend_from_slice(&buf);
        self.store.write_image(&image)
    }

    /// Removes the tag at `key`. Reports whether anything was removed;
    /// nothing is written when the key does not resolve. I/O failures
    /// report `false`.
    pub fn delete(&mut self, key: &str) -> Result<bool, OdsError> {
        match self.delete_inner(key) {
            Err(OdsError::Io(e)) => {
                tracing::warn!(key, error = %e, "delete failed on I/O");
                Ok(false)
            }
            other => other,
        }
    }

    fn delete_inner(&mut self, key: &str) -> Result<bool, OdsError> {
        let Some(image) = self.store.read_image()? else {
            return Ok(false);
        };
        let trail = scout(&image, key)?;
        let Some(end) = &trail.end else {
            return Ok(false);
        };
        let out = edit::delete(&image, end, &trail.ancestors);
        self.store.write_image(&out)?;
        tracing::debug!(key, removed = end.body_size + 5, "deleted tag");
        Ok(true)
    }

    /// Replaces the tag at `key` with `replacement`. Reports whether the
    /// key resolved. I/O failures report `false`.
    pub fn replace(&mut self, key: &str, replacement: &Tag) -> Result<bool, OdsError> {
        match self.replace_inner(key, replacement) {
            Err(OdsError::Io(e)) => {
                tracing::warn!(key, error = %e, "replace failed on I/O");
                Ok(false)
            }
            other => other,
        }
    }

    fn replace_inner(&mut self, key: &str, replacement: &Tag) -> Result<bool, OdsError> {
        let Some(image) = self.store.read_image()? else {
            return Ok(false);
        };
        let trail = scout(&image, key)?;
        let Some(end) = &trail.end else {
            return Ok(false);
        };
        let mut buf = BytesMut::new();
        encode_tag(&mut buf, replacement, &self.registry)?;
        let out = edit::replace(&image, end, &trail.ancestors, &buf);
        self.store.write_image(&out)?;
        tracing::debug!(key, "replaced tag");
        Ok(true)
    }

    /// Sets, replaces, or deletes the tag at `key`.
    ///
    /// With `None` the key is deleted and must exist. With an empty key the
    /// whole container is overwritten with the single tag. Otherwise a
    /// resolving key is replaced in place; missing parent objects are
    /// created, and the stored leaf name is the tag's own name, not the
    /// trailing key segment.
    pub fn set(&mut self, key: &str, value: Option<Tag>) -> Result<(), OdsError> {
        let Some(tag) = value else {
            return self.set_delete(key);
        };
        if key.is_empty() {
            return self.save(std::slice::from_ref(&tag));
        }

        let image = match self.store.read_image()? {
            Some(image) => image.to_vec(),
            None => Vec::new(),
        };
        let trail = scout(&image, key)?;

        let out = if let Some(end) = &trail.end {
            let mut buf = BytesMut::new();
            encode_tag(&mut buf, &tag, &self.registry)?;
            edit::replace(&image, end, &trail.ancestors, &buf)
        } else {
            let chain = if trail.ancestors.is_empty() {
                tag
            } else {
                let matched = trail.matched_key();
                build_missing_chain(&key[matched.len() + 1..], tag)
            };
            let mut buf = BytesMut::new();
            encode_tag(&mut buf, &chain, &self.registry)?;
            edit::insert(&image, &trail.ancestors, &buf)
        };
        self.store.write_image(&out)?;
        tracing::debug!(key, "set tag");
        Ok(())
    }

    fn set_delete(&mut self, key: &str) -> Result<(), OdsError> {
        let Some(image) = self.store.read_image()? else {
            return Err(OdsError::KeyNotFound(key.to_owned()));
        };
        let trail = scout(&image, key)?;
        let Some(end) = &trail.end else {
            return Err(OdsError::KeyNotFound(key.to_owned()));
        };
        let out = edit::delete(&image, end, &trail.ancestors);
        self.store.write_image(&out)?;
        tracing::debug!(key, "set deleted tag");
        Ok(())
    }

    /// The container contents compressed with another algorithm, for bulk
    /// transcoding.
    pub fn export(&self, compressor: &dyn Compressor) -> Result<Vec<u8>, OdsError> {
        let image = match self.store.read_image()? {
            Some(image) => image.to_vec(),
            None => Vec::new(),
        };
        Ok(compress_bytes(compressor, &image)?)
    }

    /// Replaces the contents with another file's, decoded with the given
    /// compressor.
    pub fn import_file(
        &mut self,
        path: impl AsRef<Path>,
        compressor: &dyn Compressor,
    ) -> Result<(), OdsError> {
        let file = std::fs::File::open(path.as_ref())?;
        let mut source = compressor.wrap_reader(Box::new(file))?;
        let mut image = Vec::new();
        std::io::Read::read_to_end(&mut source, &mut image)?;
        self.store.write_image(&image)
    }

    /// Copies the contents into another file with the given compressor.
    pub fn save_to_file(
        &self,
        path: impl AsRef<Path>,
        compressor: &dyn Compressor,
    ) -> Result<(), OdsError> {
        let image = match self.store.read_image()? {
            Some(image) => image.to_vec(),
            None => Vec::new(),
        };
        let file = std::fs::File::create(path.as_ref())?;
        let mut sink = compressor.wrap_writer(Box::new(file))?;
        std::io::Write::write_all(&mut sink, &image)?;
        sink.finish()?;
        Ok(())
    }

    /// Truncates the container to empty.
    pub fn clear(&mut self) -> Result<(), OdsError> {
        self.store.clear()
    }
}

/// Builds the object chain for the unmatched tail of a key. Every segment
/// but the last becomes a nested object; the last segment is ignored and
/// the tag keeps its own name.
fn build_missing_chain(remaining: &str, tag: Tag) -> Tag {
    let segments: Vec<&str> = remaining.split('.').collect();
    let mut chain = tag;
    for segment in segments[..segments.len() - 1].iter().rev() {
        chain = Tag::object(*segment, vec![chain]);
    }
    chain
}
