//! Tag decoding: bytes → `Tag`.

use std::collections::HashMap;

use crate::compress::decompress_bytes;
use crate::error::OdsError;
use crate::registry::Registry;
use crate::tag::{type_id, CompressedObject, Tag, TagValue};

use super::PROLOGUE_LEN;

/// The fixed header fields of one encoded tag, with offsets into the
/// surrounding buffer. Nothing past the name length is read.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RawHeader {
    pub type_id: u8,
    pub body_size: usize,
    pub name_len: usize,
    /// Offset of the first body byte (the name-length field).
    pub body_start: usize,
}

impl RawHeader {
    /// Offset of the body-size field itself.
    pub fn size_index(&self) -> usize {
        self.body_start - 4
    }

    pub fn name_start(&self) -> usize {
        self.body_start + 2
    }

    pub fn value_start(&self) -> usize {
        self.body_start + 2 + self.name_len
    }

    /// Offset one past the last byte of this tag.
    pub fn end(&self) -> usize {
        self.body_start + self.body_size
    }
}

/// Reads and validates the header of the tag starting at `pos`.
///
/// Fails with `Malformed` when the prologue underflows, `body_size` cannot
/// cover the name-length field, the body overruns the buffer, or the name
/// overruns the body.
pub(crate) fn read_header(data: &[u8], pos: usize) -> Result<RawHeader, OdsError> {
    if data.len() - pos < PROLOGUE_LEN + 2 {
        return Err(OdsError::Malformed(format!(
            "truncated tag header at offset {pos}"
        )));
    }
    let type_id = data[pos];
    let body_size = i32::from_be_bytes(data[pos + 1..pos + 5].try_into().unwrap());
    if body_size < 2 {
        return Err(OdsError::Malformed(format!(
            "body size {body_size} cannot hold a name length field"
        )));
    }
    let body_size = body_size as usize;
    let body_start = pos + PROLOGUE_LEN;
    if data.len() - body_start < body_size {
        return Err(OdsError::Malformed(format!(
            "tag body of {body_size} bytes overruns the buffer at offset {pos}"
        )));
    }
    let name_len = usize::from(u16::from_be_bytes(
        data[body_start..body_start + 2].try_into().unwrap(),
    ));
    if name_len > body_size - 2 {
        return Err(OdsError::Malformed(format!(
            "name of {name_len} bytes overruns a {body_size}-byte body"
        )));
    }
    Ok(RawHeader {
        type_id,
        body_size,
        name_len,
        body_start,
    })
}

/// Reads the UTF-8 name of a tag whose header was already validated.
pub(crate) fn read_name<'a>(data: &'a [u8], header: &RawHeader) -> Result<&'a str, OdsError> {
    std::str::from_utf8(&data[header.name_start()..header.value_start()])
        .map_err(|e| OdsError::malformed(format!("tag name is not UTF-8: {e}")))
}

/// Decodes one tag from the front of `data`, returning it together with the
/// number of bytes consumed.
pub fn decode_tag(data: &[u8], registry: &Registry) -> Result<(Tag, usize), OdsError> {
    let header = read_header(data, 0)?;
    let name = read_name(data, &header)?;
    let value = &data[header.value_start()..header.end()];
    let tag = decode_value(header.type_id, name, value, registry)?;
    Ok((tag, header.end()))
}

/// Decodes the complete list-of-tags region. The loop terminates when the
/// position reaches the region end, not on any outer-stream condition.
pub fn decode_tags(data: &[u8], registry: &Registry) -> Result<Vec<Tag>, OdsError> {
    let mut tags = Vec::new();
    let mut pos = 0;
    while pos < data.len() {
        let (tag, used) = decode_tag(&data[pos..], registry)?;
        tags.push(tag);
        pos += used;
    }
    Ok(tags)
}

/// Materializes a tag from its type id, name, and value region.
pub(crate) fn decode_value(
    id: u8,
    name: &str,
    value: &[u8],
    registry: &Registry,
) -> Result<Tag, OdsError> {
    let decoded = match id {
        type_id::STRING => TagValue::String(
            std::str::from_utf8(value)
                .map_err(|e| OdsError::malformed(format!("string value is not UTF-8: {e}")))?
                .to_owned(),
        ),
        type_id::INT => TagValue::Int(i32::from_be_bytes(fixed(value)?)),
        type_id::FLOAT => TagValue::Float(f32::from_be_bytes(fixed(value)?)),
        type_id::DOUBLE => TagValue::Double(f64::from_be_bytes(fixed(value)?)),
        type_id::SHORT => TagValue::Short(i16::from_be_bytes(fixed(value)?)),
        type_id::LONG => TagValue::Long(i64::from_be_bytes(fixed(value)?)),
        type_id::CHAR => TagValue::Char(u16::from_be_bytes(fixed(value)?)),
        type_id::BYTE => TagValue::Byte(i8::from_be_bytes(fixed(value)?)),
        type_id::LIST => TagValue::List(decode_tags(value, registry)?),
        type_id::MAP => {
            // Each child's name is the map key; clear it so the key is not
            // stored twice. The encoder writes it back.
            let children = decode_tags(value, registry)?;
            let mut entries = HashMap::with_capacity(children.len());
            for mut child in children {
                let key = std::mem::take(&mut child.name);
                entries.insert(key, child);
            }
            TagValue::Map(entries)
        }
        type_id::OBJECT => TagValue::Object(decode_tags(value, registry)?),
        type_id::COMPRESSED_OBJECT => decode_compressed(value, registry)?,
        other => {
            if let Some(codec) = registry.custom_tag(other) {
                return codec.decode(name.to_owned(), value);
            }
            if registry.tolerant() {
                TagValue::Invalid(value.to_vec())
            } else {
                return Err(OdsError::UnknownType(other));
            }
        }
    };
    Ok(Tag {
        name: name.to_owned(),
        value: decoded,
    })
}

fn decode_compressed(value: &[u8], registry: &Registry) -> Result<TagValue, OdsError> {
    if value.len() < 2 {
        return Err(OdsError::Malformed(
            "compressed object value lacks a compressor name length".into(),
        ));
    }
    let name_len = usize::from(u16::from_be_bytes(value[0..2].try_into().unwrap()));
    if value.len() - 2 < name_len {
        return Err(OdsError::Malformed(format!(
            "compressor name of {name_len} bytes overruns the value region"
        )));
    }
    let compressor_name = std::str::from_utf8(&value[2..2 + name_len])
        .map_err(|e| OdsError::malformed(format!("compressor name is not UTF-8: {e}")))?;
    let compressor = registry
        .compressor(compressor_name)
        .ok_or_else(|| OdsError::UnknownCompressor(compressor_name.to_owned()))?;

    let raw = decompress_bytes(compressor.as_ref(), &value[2 + name_len..])?;
    Ok(TagValue::Compressed(CompressedObject {
        compressor: compressor_name.to_owned(),
        tags: decode_tags(&raw, registry)?,
    }))
}

fn fixed<const N: usize>(value: &[u8]) -> Result<[u8; N], OdsError> {
    value.try_into().map_err(|_| {
        OdsError::Malformed(format!(
            "expected a {N}-byte payload, got {} bytes",
            value.len()
        ))
    })
}
