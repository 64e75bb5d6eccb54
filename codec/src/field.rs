//! Typed value slots that make up a structure.
//!
//! A [Field] holds one value and a representation marker that picks its wire form:
//! [Native] writes the value with its own codec, [Compact] writes an integer as a varint
//! (ZigZag first if signed). The marker exists only at the type level.

use crate::{
    varint::{self, VarInt},
    Error, Read, Sink, Source, Write,
};
use std::{fmt, marker::PhantomData};

/// Selects how a field value of type `T` is put on the wire.
pub trait Representation<T> {
    fn write(value: &T, sink: &mut impl Sink) -> Result<usize, Error>;
    fn read(source: &mut impl Source) -> Result<T, Error>;
}

/// The value's own codec.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Native;

impl<T: Write + Read> Representation<T> for Native {
    #[inline]
    fn write(value: &T, sink: &mut impl Sink) -> Result<usize, Error> {
        value.write(sink)
    }

    #[inline]
    fn read(source: &mut impl Source) -> Result<T, Error> {
        T::read(source)
    }
}

/// Varint, with ZigZag for signed integers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Compact;

impl<T: VarInt> Representation<T> for Compact {
    #[inline]
    fn write(value: &T, sink: &mut impl Sink) -> Result<usize, Error> {
        varint::write_any(*value, sink)
    }

    #[inline]
    fn read(source: &mut impl Source) -> Result<T, Error> {
        varint::read_any(source)
    }
}

/// A required value.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Field<T, R = Native> {
    value: T,
    _representation: PhantomData<R>,
}

impl<T, R> Field<T, R> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            _representation: PhantomData,
        }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn get_mut(&mut self) -> &mut T {
        &mut self.value
    }

    pub fn set(&mut self, value: T) {
        self.value = value;
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T, R> From<T> for Field<T, R> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T: fmt::Debug, R> fmt::Debug for Field<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.fmt(f)
    }
}

impl<T, R: Representation<T>> Write for Field<T, R> {
    #[inline]
    fn write(&self, sink: &mut impl Sink) -> Result<usize, Error> {
        R::write(&self.value, sink)
    }
}

impl<T, R: Representation<T>> Read for Field<T, R> {
    #[inline]
    fn read(source: &mut impl Source) -> Result<Self, Error> {
        R::read(source).map(Self::new)
    }
}

/// A value that may be absent.
///
/// On the wire: an existence `bool`, then the value if it exists.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct OptionalField<T, R = Native> {
    value: Option<T>,
    _representation: PhantomData<R>,
}

impl<T, R> OptionalField<T, R> {
    pub fn new(value: Option<T>) -> Self {
        Self {
            value,
            _representation: PhantomData,
        }
    }

    pub fn exists(&self) -> bool {
        self.value.is_some()
    }

    pub fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.value.as_mut()
    }

    /// Stores `value` and marks the field present.
    pub fn set(&mut self, value: T) {
        self.value = Some(value);
    }

    /// Marks the field absent.
    pub fn clear(&mut self) {
        self.value = None;
    }

    pub fn into_inner(self) -> Option<T> {
        self.value
    }
}

impl<T, R> From<Option<T>> for OptionalField<T, R> {
    fn from(value: Option<T>) -> Self {
        Self::new(value)
    }
}

impl<T: fmt::Debug, R> fmt::Debug for OptionalField<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.fmt(f)
    }
}

impl<T, R: Representation<T>> Write for OptionalField<T, R> {
    fn write(&self, sink: &mut impl Sink) -> Result<usize, Error> {
        let written = self.exists().write(sink)?;
        match &self.value {
            Some(value) => Ok(written + R::write(value, sink)?),
            None => Ok(written),
        }
    }
}

impl<T, R: Representation<T>> Read for OptionalField<T, R> {
    fn read(source: &mut impl Source) -> Result<Self, Error> {
        if bool::read(source)? {
            Ok(Self::new(Some(R::read(source)?)))
        } else {
            Ok(Self::new(None))
        }
    }
}

pub type Int32Field = Field<i32, Compact>;
pub type Int64Field = Field<i64, Compact>;
pub type UInt32Field = Field<u32, Compact>;
pub type UInt64Field = Field<u64, Compact>;
pub type BoolField = Field<bool>;
pub type StringField = Field<String>;
pub type VectorField<T> = Field<Vec<T>>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Decode, Encode};
    use test_case::test_case;

    #[test_case(0, &[0x00]; "zero")]
    #[test_case(-1, &[0x01]; "minus one")]
    #[test_case(1, &[0x02]; "one")]
    #[test_case(-5, &[0x09]; "minus five")]
    #[test_case(i32::MIN, &[0xFF, 0xFF, 0xFF, 0xFF, 0x0F]; "min")]
    fn test_int32_field(value: i32, expected: &[u8]) {
        let field = Int32Field::new(value);
        let encoded = field.encode().unwrap();
        assert_eq!(encoded, expected);
        assert_eq!(*Int32Field::decode(&encoded).unwrap().get(), value);
    }

    #[test]
    fn test_native_field_is_fixed_width() {
        let field = Field::<i32>::new(-5);
        assert_eq!(field.encode().unwrap(), &[0xFB, 0xFF, 0xFF, 0xFF][..]);
    }

    #[test]
    fn test_unsigned_fields() {
        assert_eq!(
            UInt32Field::new(300).encode().unwrap(),
            &[0xAC, 0x02][..]
        );
        let field = UInt64Field::new(u64::MAX);
        let encoded = field.encode().unwrap();
        assert_eq!(encoded.len(), 10);
        assert_eq!(UInt64Field::decode(&encoded).unwrap(), field);

        let field = Int64Field::new(i64::MIN);
        assert_eq!(Int64Field::decode(&field.encode().unwrap()).unwrap(), field);
    }

    #[test]
    fn test_accessors() {
        let mut field = StringField::default();
        assert!(field.get().is_empty());
        field.set("Env0".into());
        field.get_mut().push('!');
        assert_eq!(field.into_inner(), "Env0!");

        let field: VectorField<u8> = vec![1, 2].into();
        assert_eq!(field.get(), &[1, 2]);
        assert_eq!(format!("{field:?}"), "[1, 2]");
    }

    #[test]
    fn test_optional_field() {
        let mut field = OptionalField::<String>::default();
        assert!(!field.exists());
        assert_eq!(field.get(), None);
        assert_eq!(field.encode().unwrap(), &[0x00][..]);

        field.set("Env0".into());
        assert!(field.exists());
        let encoded = field.encode().unwrap();
        assert_eq!(encoded, &[0x01, 0x04, b'E', b'n', b'v', b'0'][..]);
        let decoded = OptionalField::<String>::decode(&encoded).unwrap();
        assert_eq!(decoded.get().map(String::as_str), Some("Env0"));

        field.clear();
        assert!(!field.exists());
        assert_eq!(field.into_inner(), None);
    }

    #[test]
    fn test_optional_compact_field() {
        let field = OptionalField::<i64, Compact>::new(Some(-1));
        assert_eq!(field.encode().unwrap(), &[0x01, 0x01][..]);
    }

    #[test]
    fn test_bool_field() {
        let field = BoolField::new(true);
        assert_eq!(field.encode().unwrap(), &[0x01][..]);
        assert!(matches!(BoolField::decode(&[0x07]), Err(Error::InvalidBool)));
    }
}
