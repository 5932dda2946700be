//! ODS — a self-describing, nested, tagged binary container format.
//!
//! A container holds a sequence of typed, named tags; composite tags
//! (object, map, list, compressed object) recursively contain more tags.
//! Beyond plain encode/decode, the library navigates dotted keys directly
//! over the encoded byte image and performs in-place structural edits that
//! patch the length prefixes of every ancestor without re-encoding
//! untouched siblings.
//!
//! # Architecture
//!
//! - **`tag`** — the in-memory data model (`Tag`, `TagValue`, type ids)
//! - **`codec`** — binary encoding/decoding of the tag grammar
//! - **`image`** — keyed get/find, scouting, and splice edits over encoded bytes
//! - **`compress`** — the compressor port (identity, GZIP, ZLIB)
//! - **`registry`** — custom tag codecs, named compressors, tolerant mode
//! - **`container`** — the `Ods` facade over a file or memory store
//!
//! # Example
//!
//! ```no_run
//! use ods::{Ods, Tag};
//!
//! let mut ods = Ods::file("save.ods");
//! let car = Tag::object("Car", vec![
//!     Tag::new("type", "Jeep"),
//!     Tag::object("Owner", vec![Tag::new("firstName", "Jeff")]),
//! ]);
//! ods.save(&[car])?;
//!
//! let first = ods.get("Car.Owner.firstName")?.unwrap();
//! assert_eq!(first.value.as_str(), Some("Jeff"));
//! # Ok::<(), ods::OdsError>(())
//! ```

pub mod codec;
pub mod compress;
pub mod container;
pub mod error;
pub mod image;
pub mod registry;
pub mod tag;

pub use compress::{Compressor, FinishWrite, GzipCompression, NoCompression, ZlibCompression};
pub use container::Ods;
pub use error::OdsError;
pub use registry::{CustomTagCodec, Registry};
pub use tag::{CompressedObject, CustomValue, Tag, TagValue};
