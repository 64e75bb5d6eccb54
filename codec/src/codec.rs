//! Core codec traits and implementations

use crate::{
    base64::{self, Alphabet},
    error::Error,
    stream::{MemoryReader, MemoryWriter, SizeCounter, Sink, Source},
};
use bytes::BytesMut;
use tracing::error;

/// Trait for types that can be written (encoded) to a [Sink].
///
/// Implementations must be a pure function of `self`: two writes of an unmodified value must
/// produce identical bytes, or the two-pass sizing protocol breaks.
pub trait Write {
    /// Encodes this value, returning the number of bytes written.
    fn write(&self, sink: &mut impl Sink) -> Result<usize, Error>;

    /// Encodes a contiguous run of values, back to back.
    ///
    /// Writes element by element unless the type can copy its backing storage directly. Either
    /// way the output must be readable element by element with [Read::read].
    fn write_slice(items: &[Self], sink: &mut impl Sink) -> Result<usize, Error>
    where
        Self: Sized,
    {
        let mut written = 0;
        for item in items {
            written += item.write(sink)?;
        }
        Ok(written)
    }
}

/// Trait for types that can be read (decoded) from a [Source].
pub trait Read: Sized {
    /// Reads a value, consuming exactly the bytes it occupies.
    ///
    /// Fails as a whole: no partially decoded value is ever returned.
    fn read(source: &mut impl Source) -> Result<Self, Error>;
}

/// Trait for types that can be encoded to a buffer.
pub trait Encode: Write {
    /// Returns the encoded length of this value (the measure pass).
    fn encode_size(&self) -> Result<usize, Error> {
        let mut counter = SizeCounter::new();
        self.write(&mut counter)?;
        Ok(counter.size())
    }

    /// Encodes a value into a buffer of exactly its encoded size.
    ///
    /// Measures into a [SizeCounter], allocates, then writes into a fixed-capacity
    /// [MemoryWriter]. Fails with [Error::SizeMismatch] if the two passes disagree.
    ///
    /// (Provided method).
    fn encode(&self) -> Result<BytesMut, Error> {
        let len = self.encode_size()?;
        fill_exact(len, |writer| self.write(writer))
    }

    /// Encodes a value as Base64 text, using the same two-pass protocol through the transcoder.
    ///
    /// (Provided method).
    fn encode_base64(&self, alphabet: Alphabet) -> Result<String, Error> {
        base64::encode(self, alphabet)
    }
}

// Every writable type can be encoded.
impl<T: Write + ?Sized> Encode for T {}

/// Trait for types that can be decoded from a buffer, ensuring the entire buffer is consumed.
pub trait Decode: Read {
    /// Decodes a value from `bytes`, ensuring `bytes` is fully consumed.
    ///
    /// (Provided method).
    fn decode(bytes: &[u8]) -> Result<Self, Error> {
        let mut reader = MemoryReader::new(bytes);
        let result = Self::read(&mut reader)?;

        // Check that the buffer is fully consumed.
        let remaining = reader.remaining();
        if remaining > 0 {
            return Err(Error::ExtraData(remaining));
        }

        Ok(result)
    }

    /// Decodes a value from Base64 text.
    ///
    /// (Provided method).
    fn decode_base64(text: &str, alphabet: Alphabet) -> Result<Self, Error> {
        base64::decode(text, alphabet)
    }
}

// Every readable type can be decoded.
impl<T: Read> Decode for T {}

/// Trait for types that can be encoded and decoded.
pub trait Codec: Encode + Decode {}

/// Automatically implement `Codec` for types that implement `Encode` and `Decode`.
impl<T: Encode + Decode> Codec for T {}

/// Allocates exactly `len` bytes and lets `write` fill them (the second pass).
///
/// Anything other than filling the buffer exactly is reported as [Error::SizeMismatch].
pub(crate) fn fill_exact<F>(len: usize, write: F) -> Result<BytesMut, Error>
where
    F: FnOnce(&mut MemoryWriter<'_>) -> Result<usize, Error>,
{
    let mut buffer = BytesMut::zeroed(len);
    let mut writer = MemoryWriter::new(&mut buffer);
    let written = match write(&mut writer) {
        Ok(_) => writer.position(),
        Err(Error::ShortWrite(requested)) => writer.position() + requested,
        Err(err) => return Err(err),
    };
    if written != len {
        error!(measured = len, written, "measure and write passes disagree");
        return Err(Error::SizeMismatch {
            measured: len,
            written,
        });
    }
    Ok(buffer)
}
