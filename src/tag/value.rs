//! Tag and tag value types.

use std::collections::HashMap;
use std::fmt;

use super::type_id;

/// A typed, named unit of encoded data; the atomic element of the format.
#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
    pub name: String,
    pub value: TagValue,
}

impl Tag {
    /// Creates a tag from a name and anything convertible into a value.
    pub fn new(name: impl Into<String>, value: impl Into<TagValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Creates an object tag holding the given children.
    pub fn object(name: impl Into<String>, children: Vec<Tag>) -> Self {
        Self {
            name: name.into(),
            value: TagValue::Object(children),
        }
    }

    /// Creates a list tag. Child names are forced empty on encode.
    pub fn list(name: impl Into<String>, items: Vec<Tag>) -> Self {
        Self {
            name: name.into(),
            value: TagValue::List(items),
        }
    }

    /// Creates a map tag. Keys are written as child names on encode.
    pub fn map(name: impl Into<String>, entries: HashMap<String, Tag>) -> Self {
        Self {
            name: name.into(),
            value: TagValue::Map(entries),
        }
    }

    /// Creates a compressed object tag referencing a registered compressor
    /// by name.
    pub fn compressed(
        name: impl Into<String>,
        compressor: impl Into<String>,
        tags: Vec<Tag>,
    ) -> Self {
        Self {
            name: name.into(),
            value: TagValue::Compressed(CompressedObject {
                compressor: compressor.into(),
                tags,
            }),
        }
    }

    /// Creates a custom tag carrying an opaque wire payload.
    pub fn custom(name: impl Into<String>, type_id: u8, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            value: TagValue::Custom(CustomValue { type_id, bytes }),
        }
    }

    /// The wire type id of this tag's value.
    pub fn type_id(&self) -> u8 {
        self.value.type_id()
    }

    /// Returns the first child with the given name, for object-like values.
    pub fn child(&self, name: &str) -> Option<&Tag> {
        self.value.children()?.iter().find(|t| t.name == name)
    }

    /// Returns whether an object-like value contains a child with the name.
    pub fn has_child(&self, name: &str) -> bool {
        self.child(name).is_some()
    }

    /// Appends a child to an object-like value. Returns false if this tag
    /// cannot hold named children.
    pub fn push_child(&mut self, tag: Tag) -> bool {
        match &mut self.value {
            TagValue::Object(children) | TagValue::List(children) => {
                children.push(tag);
                true
            }
            TagValue::Compressed(c) => {
                c.tags.push(tag);
                true
            }
            _ => false,
        }
    }

    /// Removes every child with the given name from an object-like value.
    pub fn remove_children(&mut self, name: &str) {
        match &mut self.value {
            TagValue::Object(children) | TagValue::List(children) => {
                children.retain(|t| t.name != name);
            }
            TagValue::Compressed(c) => c.tags.retain(|t| t.name != name),
            _ => {}
        }
    }
}

/// A value in the ODS format, one variant per wire type.
#[derive(Debug, Clone, PartialEq)]
pub enum TagValue {
    /// Reserved type 0; carries the raw payload. Only materialized from the
    /// wire when tolerant mode is set.
    Invalid(Vec<u8>),
    String(String),
    Int(i32),
    Float(f32),
    Double(f64),
    Short(i16),
    Long(i64),
    /// A single UTF-16 code unit. Surrogate pairs are not representable.
    Char(u16),
    Byte(i8),
    List(Vec<Tag>),
    Map(HashMap<String, Tag>),
    Object(Vec<Tag>),
    Compressed(CompressedObject),
    Custom(CustomValue),
}

/// The value of a compressed object tag: a named compressor plus the child
/// tags it compresses.
#[derive(Debug, Clone, PartialEq)]
pub struct CompressedObject {
    /// Registered name of the compressor applied to the child stream.
    pub compressor: String,
    pub tags: Vec<Tag>,
}

/// A user-extension value: a type id outside the reserved range and its
/// payload in wire form.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomValue {
    pub type_id: u8,
    pub bytes: Vec<u8>,
}

impl TagValue {
    /// The wire type id of this value.
    pub fn type_id(&self) -> u8 {
        match self {
            Self::Invalid(_) => type_id::INVALID,
            Self::String(_) => type_id::STRING,
            Self::Int(_) => type_id::INT,
            Self::Float(_) => type_id::FLOAT,
            Self::Double(_) => type_id::DOUBLE,
            Self::Short(_) => type_id::SHORT,
            Self::Long(_) => type_id::LONG,
            Self::Char(_) => type_id::CHAR,
            Self::Byte(_) => type_id::BYTE,
            Self::List(_) => type_id::LIST,
            Self::Map(_) => type_id::MAP,
            Self::Object(_) => type_id::OBJECT,
            Self::Compressed(_) => type_id::COMPRESSED_OBJECT,
            Self::Custom(c) => c.type_id,
        }
    }

    /// Returns the value as a string reference, if it is a `String` variant.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value as an i32, if it is an `Int` variant.
    pub fn as_int(&self) -> Option<i32> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the value as an f32, if it is a `Float` variant.
    pub fn as_float(&self) -> Option<f32> {
        match self {
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns the value as an f64, if it is a `Double` variant.
    pub fn as_double(&self) -> Option<f64> {
        match self {
            Self::Double(d) => Some(*d),
            _ => None,
        }
    }

    /// Returns the value as an i16, if it is a `Short` variant.
    pub fn as_short(&self) -> Option<i16> {
        match self {
            Self::Short(s) => Some(*s),
            _ => None,
        }
    }

    /// Returns the value as an i64, if it is a `Long` variant.
    pub fn as_long(&self) -> Option<i64> {
        match self {
            Self::Long(l) => Some(*l),
            _ => None,
        }
    }

    /// Returns the `Char` code unit as a `char`, if it is not a surrogate.
    pub fn as_char(&self) -> Option<char> {
        match self {
            Self::Char(c) => char::from_u32(u32::from(*c)),
            _ => None,
        }
    }

    /// Returns the value as an i8, if it is a `Byte` variant.
    pub fn as_byte(&self) -> Option<i8> {
        match self {
            Self::Byte(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the map entries, if it is a `Map` variant.
    pub fn as_map(&self) -> Option<&HashMap<String, Tag>> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Returns the child tags of a `List`, `Object`, or `Compressed` value.
    pub fn children(&self) -> Option<&[Tag]> {
        match self {
            Self::List(tags) | Self::Object(tags) => Some(tags),
            Self::Compressed(c) => Some(&c.tags),
            _ => None,
        }
    }
}

// -- Wrap conversions --

impl From<&str> for TagValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for TagValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i32> for TagValue {
    fn from(i: i32) -> Self {
        Self::Int(i)
    }
}

impl From<f32> for TagValue {
    fn from(f: f32) -> Self {
        Self::Float(f)
    }
}

impl From<f64> for TagValue {
    fn from(d: f64) -> Self {
        Self::Double(d)
    }
}

impl From<i16> for TagValue {
    fn from(s: i16) -> Self {
        Self::Short(s)
    }
}

impl From<i64> for TagValue {
    fn from(l: i64) -> Self {
        Self::Long(l)
    }
}

impl From<char> for TagValue {
    /// Truncates to a 16-bit code unit; code points above U+FFFF lose their
    /// high bits.
    fn from(c: char) -> Self {
        Self::Char(c as u32 as u16)
    }
}

impl From<i8> for TagValue {
    fn from(b: i8) -> Self {
        Self::Byte(b)
    }
}

impl From<Vec<Tag>> for TagValue {
    fn from(tags: Vec<Tag>) -> Self {
        Self::Object(tags)
    }
}

impl From<HashMap<String, Tag>> for TagValue {
    fn from(m: HashMap<String, Tag>) -> Self {
        Self::Map(m)
    }
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalid(b) => write!(f, "<invalid, {} bytes>", b.len()),
            Self::String(s) => write!(f, "\"{s}\""),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}f"),
            Self::Double(v) => write!(f, "{v}"),
            Self::Short(s) => write!(f, "{s}s"),
            Self::Long(l) => write!(f, "{l}L"),
            Self::Char(c) => match char::from_u32(u32::from(*c)) {
                Some(ch) => write!(f, "'{ch}'"),
                None => write!(f, "'\\u{c:04X}'"),
            },
            Self::Byte(b) => write!(f, "{b}b"),
            Self::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item.value)?;
                }
                write!(f, "]")
            }
            Self::Map(entries) => {
                write!(f, "{{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k}: {}", v.value)?;
                }
                write!(f, "}}")
            }
            Self::Object(children) => write!(f, "<object, {} tags>", children.len()),
            Self::Compressed(c) => {
                write!(f, "<compressed[{}], {} tags>", c.compressor, c.tags.len())
            }
            Self::Custom(c) => write!(f, "<custom #{}, {} bytes>", c.type_id, c.bytes.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_ids_match_wire_values() {
        assert_eq!(Tag::new("a", "s").type_id(), 1);
        assert_eq!(Tag::new("a", 1i32).type_id(), 2);
        assert_eq!(Tag::new("a", 1.0f32).type_id(), 3);
        assert_eq!(Tag::new("a", 1.0f64).type_id(), 4);
        assert_eq!(Tag::new("a", 1i16).type_id(), 5);
        assert_eq!(Tag::new("a", 1i64).type_id(), 6);
        assert_eq!(Tag::new("a", 'x').type_id(), 7);
        assert_eq!(Tag::new("a", 1i8).type_id(), 8);
        assert_eq!(Tag::list("a", vec![]).type_id(), 9);
        assert_eq!(Tag::map("a", HashMap::new()).type_id(), 10);
        assert_eq!(Tag::object("a", vec![]).type_id(), 11);
        assert_eq!(Tag::compressed("a", "GZIP", vec![]).type_id(), 12);
        assert_eq!(Tag::custom("a", 42, vec![]).type_id(), 42);
    }

    #[test]
    fn char_wrap_truncates_to_code_unit() {
        assert_eq!(TagValue::from('A'), TagValue::Char(0x41));
        // U+1F600 GRINNING FACE truncates to its low 16 bits.
        assert_eq!(TagValue::from('\u{1F600}'), TagValue::Char(0xF600));
    }

    #[test]
    fn child_lookup_finds_first_match() {
        let obj = Tag::object(
            "o",
            vec![
                Tag::new("dup", 1i32),
                Tag::new("dup", 2i32),
                Tag::new("other", 3i32),
            ],
        );
        assert_eq!(obj.child("dup").unwrap().value.as_int(), Some(1));
        assert!(obj.has_child("other"));
        assert!(!obj.has_child("missing"));
    }

    #[test]
    fn push_and_remove_children() {
        let mut obj = Tag::object("o", vec![]);
        assert!(obj.push_child(Tag::new("a", 1i32)));
        assert!(obj.push_child(Tag::new("a", 2i32)));
        obj.remove_children("a");
        assert!(!obj.has_child("a"));

        let mut leaf = Tag::new("n", 5i32);
        assert!(!leaf.push_child(Tag::new("x", 1i32)));
    }
}
