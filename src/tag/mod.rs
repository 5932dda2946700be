//! ODS tag data model.

mod value;

pub use value::{CompressedObject, CustomValue, Tag, TagValue};

/// Wire type ids for the built-in tag kinds.
pub mod type_id {
    pub const INVALID: u8 = 0;
    pub const STRING: u8 = 1;
    pub const INT: u8 = 2;
    pub const FLOAT: u8 = 3;
    pub const DOUBLE: u8 = 4;
    pub const SHORT: u8 = 5;
    pub const LONG: u8 = 6;
    pub const CHAR: u8 = 7;
    pub const BYTE: u8 = 8;
    pub const LIST: u8 = 9;
    pub const MAP: u8 = 10;
    pub const OBJECT: u8 = 11;
    pub const COMPRESSED_OBJECT: u8 = 12;

    /// Ids 0..=15 are reserved for built-in and future tag kinds.
    pub const RESERVED_MAX: u8 = 15;
}
