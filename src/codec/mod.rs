//! Binary tag codec.
//!
//! Every tag is laid out as:
//!
//! ```text
//! [type: u8][body_size: i32][name_len: u16][name: UTF-8][value bytes]
//! ```
//!
//! `body_size` counts everything after itself, so a full tag occupies
//! `body_size + 5` bytes. All integers are big-endian.

pub mod decode;
pub mod encode;

pub use decode::{decode_tag, decode_tags};
pub use encode::{encode_tag, encode_tags};

/// Byte length of the type + body-size prologue.
pub(crate) const PROLOGUE_LEN: usize = 5;
