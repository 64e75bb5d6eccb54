//! Streaming Base64 transcoding.
//!
//! [Base64Writer] is a [Sink] that regroups every three bytes written to it into four 6-bit
//! symbols on the wrapped sink, and [Base64Reader] is the [Source] that reverses it. Both are
//! filters: any codec can write through or read through them without knowing about Base64.
//!
//! # Sessions
//!
//! A writer carries the partial group across calls, so a value may be written with any number
//! of calls. The session ends with [Base64Writer::finish], which emits the pending bits and
//! the `=` padding. `finish` consumes the writer, so a finished session cannot be written to.
//!
//! A reader pulls only the symbols needed for the bytes requested. Trailing padding is never
//! consumed unless a read actually needs the bytes it stands for, in which case the read fails
//! with [Error::ShortRead]. [Base64Reader::finish] ends the session by consuming the rest of
//! the current group, padding included.
//!
//! # URL-safe alphabet
//!
//! [UrlSafeWriter] and [UrlSafeReader] substitute `+`/`/` with `-`/`_` on the wire. The
//! writer also drops padding. The 6-bit grouping is unaware of the substitution.

use crate::{
    codec::fill_exact,
    stream::{SizeCounter, Sink, Source},
    Error, Read, Write,
};
use tracing::trace;

/// Symbols of the standard alphabet, indexed by value.
const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// Appended to incomplete trailing groups.
const PADDING: u8 = b'=';

/// Pairs of (standard, URL-safe) symbols.
const URL_SAFE_SUBSTITUTIONS: [(u8, u8); 2] = [(b'+', b'-'), (b'/', b'_')];

/// Input bytes transcoded per batch. Exactly 32 groups, so a batch never produces more than
/// [BATCH_SYMBOLS] symbols whatever the alignment.
const BATCH_INPUT: usize = 96;
const BATCH_SYMBOLS: usize = 128;

/// Returns the value of a standard alphabet symbol.
fn symbol_value(symbol: u8) -> Option<u8> {
    match symbol {
        b'A'..=b'Z' => Some(symbol - b'A'),
        b'a'..=b'z' => Some(symbol - b'a' + 26),
        b'0'..=b'9' => Some(symbol - b'0' + 52),
        b'+' => Some(62),
        b'/' => Some(63),
        _ => None,
    }
}

/// The symbol set used on the wire.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Alphabet {
    /// `A-Z a-z 0-9 + /`, padded with `=`.
    #[default]
    Standard,
    /// `A-Z a-z 0-9 - _`, unpadded.
    UrlSafe,
}

/// Partial-group state of an encoding session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EncodeState {
    /// Input bytes consumed.
    position: usize,
    /// Last input byte, holding bits not yet emitted.
    saved: u8,
    /// Symbols accepted by the wrapped sink, padding included.
    symbols: usize,
}

impl EncodeState {
    /// Consumes one input byte and stores the symbols it completes in `out`.
    ///
    /// Returns the number of symbols stored (one or two).
    #[inline]
    fn push(&mut self, byte: u8, out: &mut [u8]) -> usize {
        let emitted = match self.position % 3 {
            0 => {
                out[0] = ALPHABET[(byte >> 2) as usize];
                1
            }
            1 => {
                out[0] = ALPHABET[(((self.saved & 0x03) << 4) | (byte >> 4)) as usize];
                1
            }
            _ => {
                out[0] = ALPHABET[(((self.saved & 0x0F) << 2) | (byte >> 6)) as usize];
                out[1] = ALPHABET[(byte & 0x3F) as usize];
                2
            }
        };
        self.saved = byte;
        self.position += 1;
        emitted
    }

    /// Stores the pending bits and padding that complete the last group in `out`.
    ///
    /// Returns the number of symbols stored (zero, two or three).
    fn close(&mut self, out: &mut [u8; 4]) -> usize {
        let emitted = match self.position % 3 {
            0 => 0,
            1 => {
                out[0] = ALPHABET[((self.saved & 0x03) << 4) as usize];
                out[1] = PADDING;
                out[2] = PADDING;
                3
            }
            _ => {
                out[0] = ALPHABET[((self.saved & 0x0F) << 2) as usize];
                out[1] = PADDING;
                2
            }
        };
        self.saved = 0;
        emitted
    }
}

/// Encodes everything written to it as Base64 on the wrapped [Sink].
///
/// Errors from the wrapped sink are returned unchanged.
#[derive(Debug)]
pub struct Base64Writer<S> {
    inner: S,
    state: EncodeState,
}

impl<S: Sink> Base64Writer<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            state: EncodeState::default(),
        }
    }

    /// Symbols emitted on the wrapped sink so far.
    pub fn symbols_written(&self) -> usize {
        self.state.symbols
    }

    /// Ends the session: emits the last partial group and its padding, then returns the
    /// wrapped sink.
    ///
    /// The total number of symbols is then a multiple of four (zero for empty input).
    pub fn finish(mut self) -> Result<S, Error> {
        let mut tail = [0u8; 4];
        let len = self.state.close(&mut tail);
        if len > 0 {
            self.inner.write(&tail[..len])?;
            self.state.symbols += len;
        }
        trace!(
            bytes = self.state.position,
            symbols = self.state.symbols,
            "finished base64 session"
        );
        Ok(self.inner)
    }
}

impl<S: Sink> Sink for Base64Writer<S> {
    fn write(&mut self, bytes: &[u8]) -> Result<usize, Error> {
        let mut symbols = [0u8; BATCH_SYMBOLS];
        for chunk in bytes.chunks(BATCH_INPUT) {
            let mut len = 0;
            for &byte in chunk {
                len += self.state.push(byte, &mut symbols[len..]);
            }
            self.inner.write(&symbols[..len])?;
            self.state.symbols += len;
        }
        Ok(bytes.len())
    }
}

/// Partial-group state of a decoding session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DecodeState {
    /// Bytes produced.
    position: usize,
    /// Last symbol value, holding bits not yet produced.
    saved: u8,
    /// Set once the session has failed.
    stopped: bool,
}

/// Decodes Base64 read from the wrapped [Source].
///
/// Once a read fails the reader stays stopped: every later read fails with
/// [Error::ShortRead].
#[derive(Debug)]
pub struct Base64Reader<S> {
    inner: S,
    state: DecodeState,
}

impl<S: Source> Base64Reader<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            state: DecodeState::default(),
        }
    }

    /// Bytes produced so far.
    pub fn position(&self) -> usize {
        self.state.position
    }

    /// Whether a previous read failed.
    pub fn is_stopped(&self) -> bool {
        self.state.stopped
    }

    pub fn into_inner(self) -> S {
        self.inner
    }

    /// Ends the session: consumes the rest of the current group, then returns the wrapped
    /// source.
    ///
    /// When `padded`, an incomplete last group must be followed by exactly the `=` symbols
    /// that complete it. Anything else in their place fails with
    /// [Error::InvalidBase64Symbol], and missing padding with [Error::ShortRead]. Unpadded
    /// sessions (the URL-safe form) end right after the last symbol.
    pub fn finish(mut self, padded: bool) -> Result<S, Error> {
        let missing = match self.state.position % 3 {
            0 => 0,
            1 => 2,
            _ => 1,
        };
        if self.state.stopped {
            return Err(Error::ShortRead(missing));
        }
        if padded && missing > 0 {
            let mut tail = [0u8; 2];
            let tail = &mut tail[..missing];
            self.inner.read(tail).map_err(|err| match err {
                Error::ShortRead(_) => Error::ShortRead(missing),
                err => err,
            })?;
            if let Some(&symbol) = tail.iter().find(|&&symbol| symbol != PADDING) {
                return Err(Error::InvalidBase64Symbol(symbol));
            }
        }
        trace!(bytes = self.state.position, "finished base64 session");
        Ok(self.inner)
    }

    /// Reads the next symbol and returns its value.
    fn next_value(&mut self) -> Result<u8, Error> {
        let mut symbol = [0u8; 1];
        self.inner.read(&mut symbol)?;
        let [symbol] = symbol;
        match symbol_value(symbol) {
            Some(value) => Ok(value),
            None if symbol == PADDING => {
                trace!(position = self.state.position, "base64 padding reached");
                Err(Error::ShortRead(1))
            }
            None => Err(Error::InvalidBase64Symbol(symbol)),
        }
    }

    /// Produces the next byte, pulling one or two symbols.
    fn next_byte(&mut self) -> Result<u8, Error> {
        let byte = match self.state.position % 3 {
            0 => {
                let first = self.next_value()?;
                let second = self.next_value()?;
                self.state.saved = second;
                (first << 2) | (second >> 4)
            }
            1 => {
                let value = self.next_value()?;
                let byte = (self.state.saved << 4) | (value >> 2);
                self.state.saved = value;
                byte
            }
            _ => {
                let value = self.next_value()?;
                let byte = (self.state.saved << 6) | value;
                self.state.saved = 0;
                byte
            }
        };
        self.state.position += 1;
        Ok(byte)
    }
}

impl<S: Source> Source for Base64Reader<S> {
    fn read(&mut self, bytes: &mut [u8]) -> Result<usize, Error> {
        if self.state.stopped {
            return Err(Error::ShortRead(bytes.len()));
        }
        for slot in bytes.iter_mut() {
            match self.next_byte() {
                Ok(byte) => *slot = byte,
                Err(err) => {
                    self.state.stopped = true;
                    trace!(position = self.state.position, ?err, "base64 session stopped");
                    return Err(match err {
                        Error::ShortRead(_) => Error::ShortRead(bytes.len()),
                        err => err,
                    });
                }
            }
        }
        Ok(bytes.len())
    }
}

/// Rewrites standard symbols to their URL-safe form and drops padding.
#[derive(Debug)]
pub struct UrlSafeWriter<S> {
    inner: S,
}

impl<S: Sink> UrlSafeWriter<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: Sink> Sink for UrlSafeWriter<S> {
    fn write(&mut self, bytes: &[u8]) -> Result<usize, Error> {
        let mut symbols = [0u8; BATCH_SYMBOLS];
        for chunk in bytes.chunks(BATCH_SYMBOLS) {
            let mut len = 0;
            for &symbol in chunk.iter().filter(|&&symbol| symbol != PADDING) {
                symbols[len] = URL_SAFE_SUBSTITUTIONS
                    .iter()
                    .find(|(standard, _)| *standard == symbol)
                    .map_or(symbol, |&(_, url_safe)| url_safe);
                len += 1;
            }
            self.inner.write(&symbols[..len])?;
        }
        Ok(bytes.len())
    }
}

/// Rewrites URL-safe symbols to their standard form.
///
/// Every other byte passes through unchanged.
#[derive(Debug)]
pub struct UrlSafeReader<S> {
    inner: S,
}

impl<S: Source> UrlSafeReader<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: Source> Source for UrlSafeReader<S> {
    fn read(&mut self, bytes: &mut [u8]) -> Result<usize, Error> {
        let read = self.inner.read(bytes)?;
        for symbol in bytes.iter_mut() {
            if let Some(&(standard, _)) = URL_SAFE_SUBSTITUTIONS
                .iter()
                .find(|(_, url_safe)| *url_safe == *symbol)
            {
                *symbol = standard;
            }
        }
        Ok(read)
    }
}

/// Writes `value` through a complete Base64 session on `sink`.
fn write_symbols<T: Write + ?Sized>(
    value: &T,
    alphabet: Alphabet,
    sink: &mut impl Sink,
) -> Result<(), Error> {
    match alphabet {
        Alphabet::Standard => {
            let mut writer = Base64Writer::new(sink);
            value.write(&mut writer)?;
            writer.finish()?;
        }
        Alphabet::UrlSafe => {
            let mut writer = Base64Writer::new(UrlSafeWriter::new(sink));
            value.write(&mut writer)?;
            writer.finish()?;
        }
    }
    Ok(())
}

/// Encodes `value` as Base64 text.
///
/// Measures the symbol count first, then writes into a buffer of exactly that size, failing
/// with [Error::SizeMismatch] if the two passes disagree.
pub fn encode<T: Write + ?Sized>(value: &T, alphabet: Alphabet) -> Result<String, Error> {
    let mut counter = SizeCounter::new();
    write_symbols(value, alphabet, &mut counter)?;
    let symbols = fill_exact(counter.size(), |writer| {
        write_symbols(value, alphabet, writer)?;
        Ok(writer.position())
    })?;
    Ok(symbols.iter().copied().map(char::from).collect())
}

/// Reads a value through a complete Base64 session on `reader`.
fn read_symbols<T: Read, S: Source>(
    mut reader: Base64Reader<S>,
    padded: bool,
) -> Result<T, Error> {
    let value = T::read(&mut reader)?;
    reader.finish(padded)?;
    Ok(value)
}

/// Decodes a value from Base64 text, ensuring the text is fully consumed.
///
/// The last group must be padded for [Alphabet::Standard] and unpadded for
/// [Alphabet::UrlSafe]. Symbols left after it fail with [Error::ExtraData].
pub fn decode<T: Read>(text: &str, alphabet: Alphabet) -> Result<T, Error> {
    let mut symbols = text.as_bytes();
    let value = match alphabet {
        Alphabet::Standard => read_symbols::<T, _>(Base64Reader::new(&mut symbols), true)?,
        Alphabet::UrlSafe => read_symbols::<T, _>(
            Base64Reader::new(UrlSafeReader::new(&mut symbols)),
            false,
        )?,
    };

    // Check that the text is fully consumed.
    if !symbols.is_empty() {
        return Err(Error::ExtraData(symbols.len()));
    }

    Ok(value)
}
