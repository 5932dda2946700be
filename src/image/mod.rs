//! Operations directly over an encoded byte image.
//!
//! Keys are `.`-separated names. The walkers here never materialize tags
//! they skip: a sibling whose name length differs from the current segment
//! is stepped over without reading its name, and composite bodies are only
//! entered on a match.

pub mod edit;
pub mod navigate;
pub mod scout;

pub use navigate::{find, get};
pub use scout::{scout, ScoutFrame, ScoutTrail};

use crate::codec::decode::{read_header, RawHeader};
use crate::error::OdsError;

/// Scans the region `[start, end)` of `data` for the first tag named
/// `segment`. Offsets in the returned header are absolute within `data`.
pub(crate) fn find_segment(
    data: &[u8],
    start: usize,
    end: usize,
    segment: &str,
) -> Result<Option<RawHeader>, OdsError> {
    let region = &data[..end];
    let mut pos = start;
    while pos < end {
        let header = read_header(region, pos)?;
        // A mismatched length rules the tag out without reading the name.
        if header.name_len != segment.len() {
            pos = header.end();
            continue;
        }
        if &region[header.name_start()..header.value_start()] == segment.as_bytes() {
            return Ok(Some(header));
        }
        pos = header.end();
    }
    Ok(None)
}
