//! Error types for codec operations

use thiserror::Error;

/// Error type for codec operations
///
/// Every transfer either moves exactly the requested number of bytes or fails with one of
/// these kinds. No layer retries on its own.
#[derive(Error, Debug)]
pub enum Error {
    #[error("short write: {0} bytes requested")]
    ShortWrite(usize),
    #[error("short read: {0} bytes requested")]
    ShortRead(usize),
    #[error("invalid base64 symbol: {0:#04x}")]
    InvalidBase64Symbol(u8),
    #[error("unsupported version: {0}")]
    UnsupportedVersion(u64),
    /// The measure pass and the write pass of an encode disagreed.
    ///
    /// This is a contract violation by a [crate::Write] implementation (its output depends on
    /// something other than the value), never a recoverable condition.
    #[error("size mismatch: measured {measured} bytes, wrote {written}")]
    SizeMismatch { measured: usize, written: usize },
    #[error("invalid varint")]
    InvalidVarint,
    #[error("invalid bool")]
    InvalidBool,
    #[error("invalid utf-8 in string")]
    InvalidUtf8,
    #[error("length does not fit in memory: {0}")]
    LengthOverflow(u64),
    #[error("extra data found: {0} bytes")]
    ExtraData(usize),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
