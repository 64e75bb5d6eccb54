//! Codec implementations for Rust primitive types.
//!
//! # Fixed-width scalars
//!
//! Integers and floats are written at their native width in little-endian byte order with no
//! length prefix. Little-endian hosts write their memory as-is; big-endian hosts swap first, so
//! the wire format does not depend on the host.
//!
//! These are the raw primitives. Integers that should be compact on the wire are wrapped in
//! [crate::varint::Varint] (or declared through a [crate::field::Compact] field) instead.
//!
//! # Bulk copy
//!
//! On little-endian targets a slice of fixed-width scalars already is its wire form, so
//! [Write::write_slice] copies the backing storage in one transfer. Decoding never relies on
//! this: elements are always read back one at a time.

use crate::{Error, Read, Sink, Source, Write};

// Numeric types implementation
macro_rules! impl_numeric {
    ($type:ty) => {
        impl Write for $type {
            #[inline]
            fn write(&self, sink: &mut impl Sink) -> Result<usize, Error> {
                sink.write(&self.to_le_bytes())
            }

            #[cfg(target_endian = "little")]
            #[inline]
            fn write_slice(items: &[Self], sink: &mut impl Sink) -> Result<usize, Error> {
                sink.write(bytemuck::cast_slice::<$type, u8>(items))
            }
        }

        impl Read for $type {
            #[inline]
            fn read(source: &mut impl Source) -> Result<Self, Error> {
                let mut bytes = [0u8; std::mem::size_of::<$type>()];
                source.read(&mut bytes)?;
                Ok(<$type>::from_le_bytes(bytes))
            }
        }
    };
}

impl_numeric!(u8);
impl_numeric!(u16);
impl_numeric!(u32);
impl_numeric!(u64);
impl_numeric!(u128);
impl_numeric!(i8);
impl_numeric!(i16);
impl_numeric!(i32);
impl_numeric!(i64);
impl_numeric!(i128);
impl_numeric!(f32);
impl_numeric!(f64);

// Bool implementation
impl Write for bool {
    #[inline]
    fn write(&self, sink: &mut impl Sink) -> Result<usize, Error> {
        u8::from(*self).write(sink)
    }
}

impl Read for bool {
    #[inline]
    fn read(source: &mut impl Source) -> Result<Self, Error> {
        match u8::read(source)? {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(Error::InvalidBool),
        }
    }
}

// Option implementation
impl<T: Write> Write for Option<T> {
    #[inline]
    fn write(&self, sink: &mut impl Sink) -> Result<usize, Error> {
        let written = self.is_some().write(sink)?;
        match self {
            Some(inner) => Ok(written + inner.write(sink)?),
            None => Ok(written),
        }
    }
}

impl<T: Read> Read for Option<T> {
    #[inline]
    fn read(source: &mut impl Source) -> Result<Self, Error> {
        if bool::read(source)? {
            Ok(Some(T::read(source)?))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Decode, Encode};
    use paste::paste;

    // Numeric tests
    macro_rules! impl_num_test {
        ($type:ty, $size:expr) => {
            paste! {
                #[test]
                fn [<test_ $type>]() {
                    let expected_len: usize = $size;
                    assert_eq!(expected_len, std::mem::size_of::<$type>());
                    let values: [$type; 5] =
                        [0 as $type, 1 as $type, 42 as $type, <$type>::MAX, <$type>::MIN];
                    for value in values.iter() {
                        let encoded = value.encode().unwrap();
                        assert_eq!(encoded.len(), expected_len);
                        let decoded = <$type>::decode(&encoded).unwrap();
                        assert_eq!(*value, decoded);
                        assert_eq!(value.encode_size().unwrap(), expected_len);
                    }
                }
            }
        };
    }
    impl_num_test!(u8, 1);
    impl_num_test!(u16, 2);
    impl_num_test!(u32, 4);
    impl_num_test!(u64, 8);
    impl_num_test!(u128, 16);
    impl_num_test!(i8, 1);
    impl_num_test!(i16, 2);
    impl_num_test!(i32, 4);
    impl_num_test!(i64, 8);
    impl_num_test!(i128, 16);
    impl_num_test!(f32, 4);
    impl_num_test!(f64, 8);

    #[test]
    fn test_endianness() {
        assert_eq!(0xABCDu16.encode().unwrap(), &[0xCD, 0xAB][..]);
        assert_eq!(0xABCDEF01u32.encode().unwrap(), &[0x01, 0xEF, 0xCD, 0xAB][..]);
        assert_eq!((-1i32).encode().unwrap(), &[0xFF, 0xFF, 0xFF, 0xFF][..]);
        assert_eq!(
            0x0123456789ABCDEFu64.encode().unwrap(),
            &[0xEF, 0xCD, 0xAB, 0x89, 0x67, 0x45, 0x23, 0x01][..]
        );
        assert_eq!(1.0f32.encode().unwrap(), &[0x00, 0x00, 0x80, 0x3F][..]);
        assert_eq!(
            (-1.0f64).encode().unwrap(),
            &[0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xF0, 0xBF][..]
        );
    }

    #[test]
    fn test_slice_matches_elementwise() {
        let items = [1i32, -2, 0x01020304];
        let mut bulk: Vec<u8> = Vec::new();
        assert_eq!(i32::write_slice(&items, &mut bulk).unwrap(), 12);

        let mut single: Vec<u8> = Vec::new();
        for item in &items {
            item.write(&mut single).unwrap();
        }
        assert_eq!(bulk, single);
    }

    #[test]
    fn test_bool() {
        let values = [true, false];
        for value in values.iter() {
            let encoded = value.encode().unwrap();
            assert_eq!(encoded.len(), 1);
            let decoded = bool::decode(&encoded).unwrap();
            assert_eq!(*value, decoded);
        }
        assert!(matches!(bool::decode(&[2]), Err(Error::InvalidBool)));
    }

    #[test]
    fn test_option() {
        let option_values = [Some(42u32), None];
        for value in option_values {
            let encoded = value.encode().unwrap();
            let decoded = Option::<u32>::decode(&encoded).unwrap();
            assert_eq!(value, decoded);
        }
        assert_eq!(
            Some(42u32).encode().unwrap(),
            &[0x01, 0x2A, 0x00, 0x00, 0x00][..]
        );
        assert_eq!(None::<u32>.encode().unwrap(), &[0][..]);
    }
}
