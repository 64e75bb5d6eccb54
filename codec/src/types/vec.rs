//! Codec implementations for sequences.
//!
//! Every sequence is a [crate::varint::Varint64] count followed by its elements. Strings count
//! bytes, not characters.

use crate::{varint, Error, Read, Sink, Source, Write};

/// Upper bound on the number of elements reserved before any of them has been read.
const MAX_PREALLOCATED: usize = 4096;

/// Writes a sequence count.
#[inline]
pub(crate) fn write_len(len: usize, sink: &mut impl Sink) -> Result<usize, Error> {
    varint::write(len as u64, sink)
}

/// Reads a sequence count, failing if it cannot be addressed on this host.
#[inline]
pub(crate) fn read_len(source: &mut impl Source) -> Result<usize, Error> {
    let len: u64 = varint::read(source)?;
    usize::try_from(len).map_err(|_| Error::LengthOverflow(len))
}

/// Reads `len` raw bytes, growing the buffer as the data arrives.
pub(crate) fn read_bytes(source: &mut impl Source, len: usize) -> Result<Vec<u8>, Error> {
    let mut bytes = Vec::with_capacity(len.min(MAX_PREALLOCATED));
    while bytes.len() < len {
        let start = bytes.len();
        let chunk = (len - start).min(MAX_PREALLOCATED);
        bytes.resize(start + chunk, 0);
        source.read(&mut bytes[start..])?;
    }
    Ok(bytes)
}

// Slice implementation
impl<T: Write> Write for [T] {
    #[inline]
    fn write(&self, sink: &mut impl Sink) -> Result<usize, Error> {
        let written = write_len(self.len(), sink)?;
        Ok(written + T::write_slice(self, sink)?)
    }
}

// Vec implementation
impl<T: Write> Write for Vec<T> {
    #[inline]
    fn write(&self, sink: &mut impl Sink) -> Result<usize, Error> {
        self.as_slice().write(sink)
    }
}

impl<T: Read> Read for Vec<T> {
    fn read(source: &mut impl Source) -> Result<Self, Error> {
        let len = read_len(source)?;

        // The count is untrusted until the elements arrive.
        let mut items = Vec::with_capacity(len.min(MAX_PREALLOCATED));
        for _ in 0..len {
            items.push(T::read(source)?);
        }
        Ok(items)
    }
}

// String implementation
impl Write for str {
    #[inline]
    fn write(&self, sink: &mut impl Sink) -> Result<usize, Error> {
        self.as_bytes().write(sink)
    }
}

impl Write for String {
    #[inline]
    fn write(&self, sink: &mut impl Sink) -> Result<usize, Error> {
        self.as_str().write(sink)
    }
}

impl Read for String {
    fn read(source: &mut impl Source) -> Result<Self, Error> {
        let len = read_len(source)?;
        let bytes = read_bytes(source, len)?;
        String::from_utf8(bytes).map_err(|_| Error::InvalidUtf8)
    }
}
