//! Keyed get/find over an encoded byte image.

use crate::codec::decode::{decode_value, read_name, RawHeader};
use crate::error::OdsError;
use crate::registry::Registry;
use crate::tag::{type_id, Tag};

use super::find_segment;

/// Resolves a dotted key to a materialized tag, or `None` when any segment
/// is absent. Duplicate sibling names resolve to the first match.
pub fn get(data: &[u8], key: &str, registry: &Registry) -> Result<Option<Tag>, OdsError> {
    match resolve(data, key)? {
        Some(header) => {
            let name = read_name(data, &header)?;
            let value = &data[header.value_start()..header.end()];
            decode_value(header.type_id, name, value, registry).map(Some)
        }
        None => Ok(None),
    }
}

/// Resolves a dotted key to a boolean without materializing anything.
pub fn find(data: &[u8], key: &str) -> Result<bool, OdsError> {
    resolve(data, key).map(|header| header.is_some())
}

/// Walks the key segments, descending into matched composite bodies, and
/// returns the header of the final tag if every segment resolves.
fn resolve(data: &[u8], key: &str) -> Result<Option<RawHeader>, OdsError> {
    let segments: Vec<&str> = key.split('.').collect();
    let mut start = 0;
    let mut end = data.len();
    for (i, segment) in segments.iter().enumerate() {
        let Some(header) = find_segment(data, start, end, segment)? else {
            return Ok(None);
        };
        if i + 1 == segments.len() {
            return Ok(Some(header));
        }
        if header.type_id == type_id::COMPRESSED_OBJECT {
            return Err(OdsError::CompressedTraversal((*segment).to_owned()));
        }
        start = header.value_start();
        end = header.end();
    }
    Ok(None)
}
