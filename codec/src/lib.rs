//! Serialize structured data into compact binary or Base64 streams.
//!
//! # Overview
//!
//! A wire-format engine designed to:
//! - Serialize typed records into a compact binary form, field by field, with no tags
//! - Deserialize that form back, failing as a whole on malformed or truncated input
//! - Keep payloads written by older schema versions decodable after the schema evolves
//!
//! # Layers
//!
//! - [stream]: the [Sink] and [Source] byte ports every layer reads from and writes to.
//!   A transfer moves every requested byte or fails.
//! - [varint]: LEB128-style variable-length integers, with ZigZag for signed values.
//! - [codec] and [types]: the [Write] and [Read] traits and their implementations for
//!   primitives, sequences, strings, bytes, options and tuples.
//! - [base64]: a streaming transcoder usable as a [Sink] or [Source] in front of any
//!   other port, with a URL-safe variant.
//! - [field] and [structure](mod@structure): typed field slots, [structure!] and [versioned_structure!].
//!
//! # Sizing
//!
//! [Encode::encode] serializes twice: once into a [SizeCounter] to learn the exact size,
//! then into a buffer of exactly that size. Implementations of [Write] must therefore be a
//! pure function of the value.
//!
//! # Example
//!
//! ```
//! use lattice_codec::{
//!     structure, Alphabet, Decode, Encode, Int32Field, StringField, VectorField,
//! };
//!
//! structure! {
//!     pub struct Item {
//!         pub name: StringField,
//!         pub offset: Int32Field,
//!         pub samples: VectorField<u16>,
//!     }
//! }
//!
//! let item = Item {
//!     name: StringField::new("probe".into()),
//!     offset: Int32Field::new(-2),
//!     samples: VectorField::new(vec![1, 2, 3]),
//! };
//!
//! // Binary
//! let encoded = item.encode().unwrap();
//! assert_eq!(encoded.len(), item.encode_size().unwrap());
//! assert_eq!(Item::decode(&encoded).unwrap(), item);
//!
//! // Base64
//! let text = item.encode_base64(Alphabet::Standard).unwrap();
//! assert_eq!(Item::decode_base64(&text, Alphabet::Standard).unwrap(), item);
//! ```

pub mod base64;
pub mod codec;
pub mod error;
pub mod field;
pub mod stream;
pub mod structure;
pub mod types;
pub mod varint;

// Re-export main types and traits
pub use base64::{Alphabet, Base64Reader, Base64Writer, UrlSafeReader, UrlSafeWriter};
pub use codec::{Codec, Decode, Encode, Read, Write};
pub use error::Error;
pub use field::{
    BoolField, Compact, Field, Int32Field, Int64Field, Native, OptionalField, StringField,
    UInt32Field, UInt64Field, VectorField,
};
pub use stream::{
    CallbackReader, CallbackWriter, IoReader, IoWriter, MemoryReader, MemoryWriter, SizeCounter,
    Sink, Source,
};
pub use structure::{Structure, Versioned};
pub use varint::{Varint, Varint32, Varint64};
