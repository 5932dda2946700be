//! Extension registry: custom tag codecs, named compressors, and the
//! tolerant-parsing flag.
//!
//! The registry is built once, then shared read-only (typically behind an
//! `Arc`) by every container and codec call that needs it.

use std::collections::HashMap;
use std::sync::Arc;

use crate::compress::{Compressor, GzipCompression, NoCompression, ZlibCompression};
use crate::error::OdsError;
use crate::tag::{type_id, Tag};

/// Decodes the value region of tags carrying a user-defined type id.
///
/// Codecs signal unusable payloads with [`OdsError::InvalidCustomTag`].
pub trait CustomTagCodec: Send + Sync {
    /// Materializes a tag from its name and raw value bytes.
    fn decode(&self, name: String, payload: &[u8]) -> Result<Tag, OdsError>;
}

/// Registered extensions and parse settings for one family of containers.
pub struct Registry {
    custom_tags: HashMap<u8, Arc<dyn CustomTagCodec>>,
    compressors: HashMap<String, Arc<dyn Compressor>>,
    tolerant: bool,
}

impl Registry {
    /// Creates an empty registry with no compressors and strict parsing.
    pub fn new() -> Self {
        Self {
            custom_tags: HashMap::new(),
            compressors: HashMap::new(),
            tolerant: false,
        }
    }

    /// Registers a codec for a user-defined type id.
    ///
    /// Ids 0..=15 are reserved for built-in and future tag kinds.
    pub fn register_custom_tag(
        &mut self,
        id: u8,
        codec: Arc<dyn CustomTagCodec>,
    ) -> Result<(), OdsError> {
        if id <= type_id::RESERVED_MAX {
            return Err(OdsError::ReservedTypeId(id));
        }
        self.custom_tags.insert(id, codec);
        Ok(())
    }

    /// Looks up the codec registered for a type id.
    pub fn custom_tag(&self, id: u8) -> Option<&Arc<dyn CustomTagCodec>> {
        self.custom_tags.get(&id)
    }

    /// Registers a compressor under a name referencable from compressed
    /// object tags.
    pub fn register_compressor(&mut self, name: impl Into<String>, compressor: Arc<dyn Compressor>) {
        self.compressors.insert(name.into(), compressor);
    }

    /// Looks up a compressor by registered name.
    pub fn compressor(&self, name: &str) -> Option<&Arc<dyn Compressor>> {
        self.compressors.get(name)
    }

    /// Downgrades unknown type ids during decode from an error to a
    /// materialized `Invalid` tag.
    pub fn set_tolerant(&mut self, tolerant: bool) {
        self.tolerant = tolerant;
    }

    /// Whether tolerant parsing is enabled.
    pub fn tolerant(&self) -> bool {
        self.tolerant
    }
}

impl Default for Registry {
    /// A registry with the built-in compressors under their canonical names
    /// ("NONE", "GZIP", "ZLIB") and strict parsing.
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register_compressor("NONE", Arc::new(NoCompression));
        registry.register_compressor("GZIP", Arc::new(GzipCompression));
        registry.register_compressor("ZLIB", Arc::new(ZlibCompression));
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag::TagValue;

    struct EchoCodec;

    impl CustomTagCodec for EchoCodec {
        fn decode(&self, name: String, payload: &[u8]) -> Result<Tag, OdsError> {
            Ok(Tag::custom(name, 40, payload.to_vec()))
        }
    }

    #[test]
    fn reserved_ids_are_rejected() {
        let mut registry = Registry::new();
        for id in [0u8, 1, 12, 15] {
            let err = registry.register_custom_tag(id, Arc::new(EchoCodec)).unwrap_err();
            assert!(matches!(err, OdsError::ReservedTypeId(i) if i == id));
        }
        registry.register_custom_tag(16, Arc::new(EchoCodec)).unwrap();
        assert!(registry.custom_tag(16).is_some());
    }

    #[test]
    fn default_registry_has_builtin_compressors() {
        let registry = Registry::default();
        assert!(registry.compressor("NONE").is_some());
        assert!(registry.compressor("GZIP").is_some());
        assert!(registry.compressor("ZLIB").is_some());
        assert!(registry.compressor("LZ4").is_none());
        assert!(!registry.tolerant());
    }

    #[test]
    fn custom_codec_round_trips_payload() {
        let codec = EchoCodec;
        let tag = codec.decode("n".into(), &[1, 2, 3]).unwrap();
        assert_eq!(tag.name, "n");
        assert_eq!(tag.value, TagValue::Custom(crate::tag::CustomValue {
            type_id: 40,
            bytes: vec![1, 2, 3],
        }));
    }
}
