//! Variable-length integer encoding and decoding
//!
//! Each byte uses:
//! - 7 bits for the value
//! - 1 "continuation" bit to indicate if more bytes follow
//!
//! Groups are written least-significant first. The encoding works on values rather than on
//! their in-memory bytes, so it is identical on little- and big-endian hosts.
//!
//! Signed integers are first mapped to unsigned integers with ZigZag encoding so that values
//! close to zero stay short even when negative.

use crate::{Error, Read, Sink, Source, Write};
use std::ops::{BitOrAssign, Shl, ShrAssign};

const BITS_PER_BYTE: usize = 8;
const DATA_BITS_PER_BYTE: usize = 7;
const DATA_BITS_MASK: u8 = 0x7F;
const CONTINUATION_BIT_MASK: u8 = 0x80;

/// Longest possible encoding (a `u128`).
const MAX_ENCODED_LEN: usize = 19;

/// A trait for unsigned integers that can be varint encoded.
pub trait UInt:
    Copy
    + From<u8>
    + Sized
    + ShrAssign<usize>
    + Shl<usize, Output = Self>
    + BitOrAssign<Self>
    + PartialOrd
{
    /// Returns the number of leading zeros in the integer.
    fn leading_zeros(self) -> u32;

    /// Returns the least significant byte of the integer.
    fn as_u8(self) -> u8;
}

// Implements the `UInt` trait for all unsigned integer types.
macro_rules! impl_uint {
    ($type:ty) => {
        impl UInt for $type {
            #[inline]
            fn leading_zeros(self) -> u32 {
                self.leading_zeros()
            }

            #[inline]
            fn as_u8(self) -> u8 {
                self as u8
            }
        }
    };
}
impl_uint!(u8);
impl_uint!(u16);
impl_uint!(u32);
impl_uint!(u64);
impl_uint!(u128);

/// A trait for signed integers that can be converted to and from unsigned integers of the
/// equivalent size.
///
/// `0, -1, 1, -2, 2, ...` map to `0, 1, 2, 3, 4, ...`.
pub trait SInt<UEq: UInt> {
    /// Converts the signed integer to an unsigned integer using ZigZag encoding.
    fn as_zigzag(&self) -> UEq;

    /// Converts a (ZigZag'ed) unsigned integer back to a signed integer.
    fn un_zigzag(value: UEq) -> Self;
}

// Implements the `SInt` trait for all signed integer types.
macro_rules! impl_sint {
    ($type:ty, $utype:ty) => {
        impl SInt<$utype> for $type {
            #[inline]
            fn as_zigzag(&self) -> $utype {
                let shr = std::mem::size_of::<$utype>() * 8 - 1;
                ((self << 1) ^ (self >> shr)) as $utype
            }
            #[inline]
            fn un_zigzag(value: $utype) -> Self {
                ((value >> 1) as $type) ^ (-((value & 1) as $type))
            }
        }
    };
}
impl_sint!(i8, u8);
impl_sint!(i16, u16);
impl_sint!(i32, u32);
impl_sint!(i64, u64);
impl_sint!(i128, u128);

/// Encodes an unsigned integer as a varint
pub fn write<T: UInt>(value: T, sink: &mut impl Sink) -> Result<usize, Error> {
    let continuation_threshold = T::from(CONTINUATION_BIT_MASK);
    if value < continuation_threshold {
        // Fast path for small values (common case for lengths).
        // `as_u8()` does not truncate the value or leave a continuation bit.
        return sink.write(&[value.as_u8()]);
    }

    let mut encoded = [0u8; MAX_ENCODED_LEN];
    let mut len = 0;
    let mut val = value;
    while val >= continuation_threshold {
        encoded[len] = val.as_u8() | CONTINUATION_BIT_MASK;
        val >>= DATA_BITS_PER_BYTE;
        len += 1;
    }
    encoded[len] = val.as_u8();
    len += 1;
    sink.write(&encoded[..len])
}

/// Decodes an unsigned integer from a varint
pub fn read<T: UInt>(source: &mut impl Source) -> Result<T, Error> {
    let max_bits = std::mem::size_of::<T>() * 8;
    let mut result: T = T::from(0);
    let mut shift = 0;

    // Loop over all the bytes.
    loop {
        // Read the next byte.
        let mut byte = [0u8; 1];
        source.read(&mut byte)?;
        let [byte] = byte;

        // If this must be the last byte, check for overflow (i.e. set bits beyond the size of T).
        // Because the continuation bit is the most-significant bit, this check also rejects a
        // continuation bit here, so `shift` never reaches `max_bits`.
        let remaining_bits = max_bits - shift;
        if remaining_bits <= DATA_BITS_PER_BYTE {
            let relevant_bits = BITS_PER_BYTE - byte.leading_zeros() as usize;
            if relevant_bits > remaining_bits {
                return Err(Error::InvalidVarint);
            }
        }

        // Write the 7 bits of data to the result.
        result |= T::from(byte & DATA_BITS_MASK) << shift;

        // If the continuation bit is not set, return.
        if byte & CONTINUATION_BIT_MASK == 0 {
            return Ok(result);
        }

        // Each byte has 7 bits of data.
        shift += DATA_BITS_PER_BYTE;
    }
}

/// Calculates the number of bytes needed to encode an unsigned integer as a varint.
///
/// Equals `1 + floor(log_128(value))`, with `0` taking one byte.
pub fn size<T: UInt>(value: T) -> usize {
    let total_bits = std::mem::size_of::<T>() * 8;
    let leading_zeros = value.leading_zeros() as usize;
    let data_bits = total_bits - leading_zeros;
    usize::max(1, data_bits.div_ceil(DATA_BITS_PER_BYTE))
}

/// Encodes a signed integer as a varint using ZigZag encoding.
pub fn write_signed<U: UInt, S: SInt<U>>(value: S, sink: &mut impl Sink) -> Result<usize, Error> {
    write(value.as_zigzag(), sink)
}

/// Decodes a signed integer from ZigZag encoding
pub fn read_signed<U: UInt, S: SInt<U>>(source: &mut impl Source) -> Result<S, Error> {
    Ok(S::un_zigzag(read(source)?))
}

/// Calculates the number of bytes needed to encode a signed integer as a varint.
pub fn size_signed<U: UInt, S: SInt<U>>(value: S) -> usize {
    size(value.as_zigzag())
}

/// An integer with a varint wire form.
///
/// Unsigned integers are written as they are; signed integers go through ZigZag first.
pub trait VarInt: Copy {
    /// The unsigned integer actually put on the wire.
    type Wire: UInt;

    fn into_wire(self) -> Self::Wire;
    fn from_wire(wire: Self::Wire) -> Self;
}

macro_rules! impl_varint_unsigned {
    ($($type:ty),*) => {
        $(
            impl VarInt for $type {
                type Wire = $type;

                #[inline]
                fn into_wire(self) -> Self::Wire {
                    self
                }

                #[inline]
                fn from_wire(wire: Self::Wire) -> Self {
                    wire
                }
            }
        )*
    };
}

macro_rules! impl_varint_signed {
    ($($type:ty => $utype:ty),*) => {
        $(
            impl VarInt for $type {
                type Wire = $utype;

                #[inline]
                fn into_wire(self) -> Self::Wire {
                    self.as_zigzag()
                }

                #[inline]
                fn from_wire(wire: Self::Wire) -> Self {
                    <$type as SInt<$utype>>::un_zigzag(wire)
                }
            }
        )*
    };
}

impl_varint_unsigned!(u8, u16, u32, u64, u128);
impl_varint_signed!(i8 => u8, i16 => u16, i32 => u32, i64 => u64, i128 => u128);

/// Writes any [VarInt] in its varint form.
#[inline]
pub fn write_any<T: VarInt>(value: T, sink: &mut impl Sink) -> Result<usize, Error> {
    write(value.into_wire(), sink)
}

/// Reads any [VarInt] from its varint form.
#[inline]
pub fn read_any<T: VarInt>(source: &mut impl Source) -> Result<T, Error> {
    read(source).map(T::from_wire)
}

/// An integer value paired with its variable-length wire representation.
///
/// Encoding then decoding is the identity for every value of `T`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Varint<T>(pub T);

/// Unsigned 32-bit varint.
pub type Varint32 = Varint<u32>;

/// Unsigned 64-bit varint. Used for lengths and version tags.
pub type Varint64 = Varint<u64>;

impl<T: VarInt> Varint<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }

    pub fn get(&self) -> T {
        self.0
    }

    pub fn get_mut(&mut self) -> &mut T {
        &mut self.0
    }

    pub fn set(&mut self, value: T) {
        self.0 = value;
    }

    /// Number of bytes the value occupies on the wire.
    pub fn size(&self) -> usize {
        size(self.0.into_wire())
    }
}

impl<T: VarInt> From<T> for Varint<T> {
    fn from(value: T) -> Self {
        Self(value)
    }
}

impl<T: VarInt> Write for Varint<T> {
    #[inline]
    fn write(&self, sink: &mut impl Sink) -> Result<usize, Error> {
        write_any(self.0, sink)
    }
}

impl<T: VarInt> Read for Varint<T> {
    #[inline]
    fn read(source: &mut impl Source) -> Result<Self, Error> {
        read_any(source).map(Varint)
    }
}
