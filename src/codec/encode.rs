//! Tag encoding: `Tag` → bytes.

use bytes::{BufMut, BytesMut};

use crate::compress::compress_bytes;
use crate::error::OdsError;
use crate::registry::Registry;
use crate::tag::{Tag, TagValue};

/// Encodes a single tag into the buffer.
pub fn encode_tag(buf: &mut BytesMut, tag: &Tag, registry: &Registry) -> Result<(), OdsError> {
    encode_named(buf, &tag.name, &tag.value, registry)
}

/// Encodes a sequence of tags back to back.
pub fn encode_tags(buf: &mut BytesMut, tags: &[Tag], registry: &Registry) -> Result<(), OdsError> {
    for tag in tags {
        encode_tag(buf, tag, registry)?;
    }
    Ok(())
}

/// Encodes a value under an explicit name. List children are written with
/// an empty name and map entries with their key, without touching the
/// caller's tree.
fn encode_named(
    buf: &mut BytesMut,
    name: &str,
    value: &TagValue,
    registry: &Registry,
) -> Result<(), OdsError> {
    if name.len() > usize::from(u16::MAX) {
        return Err(OdsError::Malformed(format!(
            "tag name exceeds 65535 bytes: {} bytes",
            name.len()
        )));
    }

    buf.put_u8(value.type_id());

    // Assemble the body in a scratch buffer so its length is known before
    // the size field is written.
    let mut body = BytesMut::new();
    body.put_u16(name.len() as u16);
    body.put_slice(name.as_bytes());
    encode_value(&mut body, value, registry)?;

    buf.put_i32(body.len() as i32);
    buf.put_slice(&body);
    Ok(())
}

fn encode_value(
    buf: &mut BytesMut,
    value: &TagValue,
    registry: &Registry,
) -> Result<(), OdsError> {
    match value {
        TagValue::Invalid(bytes) => buf.put_slice(bytes),
        TagValue::String(s) => buf.put_slice(s.as_bytes()),
        TagValue::Int(i) => buf.put_i32(*i),
        TagValue::Float(f) => buf.put_f32(*f),
        TagValue::Double(d) => buf.put_f64(*d),
        TagValue::Short(s) => buf.put_i16(*s),
        TagValue::Long(l) => buf.put_i64(*l),
        TagValue::Char(c) => buf.put_u16(*c),
        TagValue::Byte(b) => buf.put_i8(*b),
        TagValue::List(items) => {
            for item in items {
                encode_named(buf, "", &item.value, registry)?;
            }
        }
        TagValue::Map(entries) => {
            for (key, entry) in entries {
                encode_named(buf, key, &entry.value, registry)?;
            }
        }
        TagValue::Object(children) => {
            for child in children {
                encode_named(buf, &child.name, &child.value, registry)?;
            }
        }
        TagValue::Compressed(c) => {
            let compressor = registry
                .compressor(&c.compressor)
                .ok_or_else(|| OdsError::UnknownCompressor(c.compressor.clone()))?;

            if c.compressor.len() > usize::from(u16::MAX) {
                return Err(OdsError::Malformed(format!(
                    "compressor name exceeds 65535 bytes: {} bytes",
                    c.compressor.len()
                )));
            }
            buf.put_u16(c.compressor.len() as u16);
            buf.put_slice(c.compressor.as_bytes());

            let mut inner = BytesMut::new();
            encode_tags(&mut inner, &c.tags, registry)?;
            let packed = compress_bytes(compressor.as_ref(), &inner)?;
            buf.put_slice(&packed);
        }
        TagValue::Custom(c) => buf.put_slice(&c.bytes),
    }
    Ok(())
}
