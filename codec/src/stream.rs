//! Byte sinks and sources that every codec layer reads from and writes to.
//!
//! A transfer either moves every requested byte and returns that count, or fails. There is
//! no partial success: a [Sink] that cannot accept all of `bytes` returns
//! [Error::ShortWrite] and a [Source] that cannot fill all of `bytes` returns
//! [Error::ShortRead]. Callers treat either as fatal for the current operation.
//!
//! Ports never seek and never report their length. Codecs borrow a port for the duration of
//! a single operation and never own it.

use crate::Error;
use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::io;

/// A destination for encoded bytes.
pub trait Sink {
    /// Writes all of `bytes`, returning `bytes.len()`.
    fn write(&mut self, bytes: &[u8]) -> Result<usize, Error>;
}

/// An origin of encoded bytes.
pub trait Source {
    /// Fills all of `bytes`, returning `bytes.len()`.
    fn read(&mut self, bytes: &mut [u8]) -> Result<usize, Error>;
}

// Reborrowing and boxing

impl<S: Sink + ?Sized> Sink for &mut S {
    #[inline]
    fn write(&mut self, bytes: &[u8]) -> Result<usize, Error> {
        (**self).write(bytes)
    }
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    #[inline]
    fn write(&mut self, bytes: &[u8]) -> Result<usize, Error> {
        (**self).write(bytes)
    }
}

impl<S: Source + ?Sized> Source for &mut S {
    #[inline]
    fn read(&mut self, bytes: &mut [u8]) -> Result<usize, Error> {
        (**self).read(bytes)
    }
}

impl<S: Source + ?Sized> Source for Box<S> {
    #[inline]
    fn read(&mut self, bytes: &mut [u8]) -> Result<usize, Error> {
        (**self).read(bytes)
    }
}

// Growable in-memory ports

impl Sink for Vec<u8> {
    #[inline]
    fn write(&mut self, bytes: &[u8]) -> Result<usize, Error> {
        self.extend_from_slice(bytes);
        Ok(bytes.len())
    }
}

impl Sink for BytesMut {
    #[inline]
    fn write(&mut self, bytes: &[u8]) -> Result<usize, Error> {
        self.put_slice(bytes);
        Ok(bytes.len())
    }
}

impl Source for &[u8] {
    #[inline]
    fn read(&mut self, bytes: &mut [u8]) -> Result<usize, Error> {
        let (head, rest) = self
            .split_at_checked(bytes.len())
            .ok_or(Error::ShortRead(bytes.len()))?;
        bytes.copy_from_slice(head);
        *self = rest;
        Ok(bytes.len())
    }
}

impl Source for Bytes {
    #[inline]
    fn read(&mut self, bytes: &mut [u8]) -> Result<usize, Error> {
        if self.remaining() < bytes.len() {
            return Err(Error::ShortRead(bytes.len()));
        }
        self.copy_to_slice(bytes);
        Ok(bytes.len())
    }
}

/// Writes into caller-owned memory of fixed capacity.
///
/// A write that does not fit in the remaining capacity fails without copying anything.
#[derive(Debug)]
pub struct MemoryWriter<'a> {
    buffer: &'a mut [u8],
    position: usize,
}

impl<'a> MemoryWriter<'a> {
    pub fn new(buffer: &'a mut [u8]) -> Self {
        Self {
            buffer,
            position: 0,
        }
    }

    /// Number of bytes written so far.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Capacity left before writes start failing.
    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.position
    }
}

impl Sink for MemoryWriter<'_> {
    fn write(&mut self, bytes: &[u8]) -> Result<usize, Error> {
        if bytes.len() > self.remaining() {
            return Err(Error::ShortWrite(bytes.len()));
        }
        let end = self.position + bytes.len();
        self.buffer[self.position..end].copy_from_slice(bytes);
        self.position = end;
        Ok(bytes.len())
    }
}

/// Reads from borrowed memory.
#[derive(Debug)]
pub struct MemoryReader<'a> {
    buffer: &'a [u8],
    position: usize,
}

impl<'a> MemoryReader<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            position: 0,
        }
    }

    /// Rebinds the reader to `buffer` and rewinds to its start.
    pub fn reset(&mut self, buffer: &'a [u8]) {
        self.buffer = buffer;
        self.position = 0;
    }

    /// Number of bytes consumed so far.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Bytes left to read.
    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.position
    }
}

impl Source for MemoryReader<'_> {
    fn read(&mut self, bytes: &mut [u8]) -> Result<usize, Error> {
        if bytes.len() > self.remaining() {
            return Err(Error::ShortRead(bytes.len()));
        }
        let end = self.position + bytes.len();
        bytes.copy_from_slice(&self.buffer[self.position..end]);
        self.position = end;
        Ok(bytes.len())
    }
}

/// Accepts any write and only counts the bytes.
///
/// This is the measure pass of the two-pass sizing protocol: serialize into a counter to learn
/// the exact encoded size, allocate exactly that much, then serialize again into memory.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SizeCounter {
    total: usize,
}

impl SizeCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of bytes written so far.
    pub fn size(&self) -> usize {
        self.total
    }
}

impl Sink for SizeCounter {
    #[inline]
    fn write(&mut self, bytes: &[u8]) -> Result<usize, Error> {
        self.total += bytes.len();
        Ok(bytes.len())
    }
}

/// Delegates writes to a caller-supplied function.
///
/// The function returns `true` if it accepted every byte.
pub struct CallbackWriter<F> {
    write: F,
}

impl<F: FnMut(&[u8]) -> bool> CallbackWriter<F> {
    pub fn new(write: F) -> Self {
        Self { write }
    }
}

impl<F: FnMut(&[u8]) -> bool> Sink for CallbackWriter<F> {
    fn write(&mut self, bytes: &[u8]) -> Result<usize, Error> {
        if (self.write)(bytes) {
            Ok(bytes.len())
        } else {
            Err(Error::ShortWrite(bytes.len()))
        }
    }
}

/// Delegates reads to a caller-supplied function.
///
/// The function returns `true` if it filled every byte.
pub struct CallbackReader<F> {
    read: F,
}

impl<F: FnMut(&mut [u8]) -> bool> CallbackReader<F> {
    pub fn new(read: F) -> Self {
        Self { read }
    }
}

impl<F: FnMut(&mut [u8]) -> bool> Source for CallbackReader<F> {
    fn read(&mut self, bytes: &mut [u8]) -> Result<usize, Error> {
        if (self.read)(bytes) {
            Ok(bytes.len())
        } else {
            Err(Error::ShortRead(bytes.len()))
        }
    }
}

/// Adapts an [io::Write] into a [Sink].
#[derive(Debug)]
pub struct IoWriter<W> {
    inner: W,
}

impl<W: io::Write> IoWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: io::Write> Sink for IoWriter<W> {
    fn write(&mut self, bytes: &[u8]) -> Result<usize, Error> {
        match self.inner.write_all(bytes) {
            Ok(()) => Ok(bytes.len()),
            Err(err) if err.kind() == io::ErrorKind::WriteZero => {
                Err(Error::ShortWrite(bytes.len()))
            }
            Err(err) => Err(err.into()),
        }
    }
}

/// Adapts an [io::Read] into a [Source].
#[derive(Debug)]
pub struct IoReader<R> {
    inner: R,
}

impl<R: io::Read> IoReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: io::Read> Source for IoReader<R> {
    fn read(&mut self, bytes: &mut [u8]) -> Result<usize, Error> {
        match self.inner.read_exact(bytes) {
            Ok(()) => Ok(bytes.len()),
            Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => {
                Err(Error::ShortRead(bytes.len()))
            }
            Err(err) => Err(err.into()),
        }
    }
}
