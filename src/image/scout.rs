//! Key reconnaissance: offset/size breadcrumbs for the in-place editor.

use crate::error::OdsError;
use crate::tag::type_id;

use super::find_segment;

/// One tag along a scouted key: its name, body size, and the absolute
/// offset of its body-size field (one past the type byte).
#[derive(Debug, Clone)]
pub struct ScoutFrame {
    pub name: String,
    pub body_size: usize,
    pub start_index: usize,
}

/// The result of scouting a key.
///
/// When the full key resolves, `end` holds the final tag and `ancestors`
/// its enclosing composites, outermost first. When only a prefix resolves,
/// `end` is `None` and `ancestors` holds exactly the matched prefix.
#[derive(Debug, Default)]
pub struct ScoutTrail {
    pub ancestors: Vec<ScoutFrame>,
    pub end: Option<ScoutFrame>,
}

impl ScoutTrail {
    /// The dotted join of the matched ancestor names.
    pub fn matched_key(&self) -> String {
        self.ancestors
            .iter()
            .map(|frame| frame.name.as_str())
            .collect::<Vec<_>>()
            .join(".")
    }
}

/// Walks the key over the byte image, recording offsets and sizes without
/// ever reading value payloads as values.
pub fn scout(data: &[u8], key: &str) -> Result<ScoutTrail, OdsError> {
    let segments: Vec<&str> = key.split('.').collect();
    let mut trail = ScoutTrail::default();
    let mut start = 0;
    let mut end = data.len();
    for (i, segment) in segments.iter().enumerate() {
        let Some(header) = find_segment(data, start, end, segment)? else {
            return Ok(trail);
        };
        let frame = ScoutFrame {
            name: (*segment).to_owned(),
            body_size: header.body_size,
            start_index: header.size_index(),
        };
        if i + 1 == segments.len() {
            trail.end = Some(frame);
            return Ok(trail);
        }
        if header.type_id == type_id::COMPRESSED_OBJECT {
            return Err(OdsError::CompressedTraversal((*segment).to_owned()));
        }
        trail.ancestors.push(frame);
        start = header.value_start();
        end = header.end();
    }
    Ok(trail)
}
