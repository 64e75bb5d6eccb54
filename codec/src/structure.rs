//! Records declared as ordered sets of named fields.
//!
//! [structure!](crate::structure!) declares a plain struct whose members are written and read
//! in declaration order, with no tags: the reader must know the exact shape.
//!
//! [versioned_structure!](crate::versioned_structure!) additionally prefixes the record with a
//! [Varint64](crate::varint::Varint64) version tag. A payload tagged with an older version is
//! decoded as the previous structure in the chain (recursively) and mapped forward through
//! `From<Previous>`. A tag no structure in the chain declares fails with
//! [Error::UnsupportedVersion].
//!
//! ```
//! use lattice_codec::{structure, versioned_structure, Decode, Encode, Int32Field, OptionalField};
//!
//! structure! {
//!     pub struct Point {
//!         pub x: Int32Field,
//!         pub y: Int32Field,
//!     }
//! }
//!
//! versioned_structure! {
//!     pub struct ShapeV0(version = 0) {
//!         pub label: OptionalField<String>,
//!         pub points: Vec<Point>,
//!     }
//! }
//!
//! versioned_structure! {
//!     pub struct Shape(version = 1, previous = ShapeV0) {
//!         pub closed: bool,
//!         pub points: Vec<Point>,
//!     }
//! }
//!
//! impl From<ShapeV0> for Shape {
//!     fn from(previous: ShapeV0) -> Self {
//!         Self {
//!             closed: false,
//!             points: previous.points,
//!         }
//!     }
//! }
//!
//! let old = ShapeV0 {
//!     points: vec![Point { x: 1.into(), y: (-1).into() }],
//!     ..Default::default()
//! };
//! let shape = Shape::decode(&old.encode().unwrap()).unwrap();
//! assert!(!shape.closed);
//! assert_eq!(shape.points, old.points);
//! ```

use crate::{Error, Read, Sink, Source, Write};
use tracing::{debug, warn};

/// A record with a fixed field order.
pub trait Structure: Write + Read {
    /// Field names, in wire order.
    const FIELDS: &'static [&'static str];
}

/// A structure carrying a version tag and an upgrade path from older versions.
pub trait Versioned: Sized {
    /// Tag written before the body.
    const VERSION: u64;

    /// Writes the fields, without the tag.
    fn write_body(&self, sink: &mut impl Sink) -> Result<usize, Error>;

    /// Reads the fields of a body tagged [Versioned::VERSION].
    fn read_body(source: &mut impl Source) -> Result<Self, Error>;

    /// Reads a body tagged with some other `version`.
    fn upgrade(version: u64, source: &mut impl Source) -> Result<Self, Error>;

    /// Reads a body whose tag has already been consumed.
    fn read_versioned(version: u64, source: &mut impl Source) -> Result<Self, Error> {
        if version == Self::VERSION {
            Self::read_body(source)
        } else {
            Self::upgrade(version, source)
        }
    }
}

/// Decodes a body as `Previous` and maps it forward to `Current`.
#[doc(hidden)]
pub fn upgrade_from<Previous, Current>(
    version: u64,
    source: &mut impl Source,
) -> Result<Current, Error>
where
    Previous: Versioned,
    Current: Versioned + From<Previous>,
{
    debug!(
        version,
        from = Previous::VERSION,
        to = Current::VERSION,
        "upgrading structure"
    );
    Previous::read_versioned(version, source).map(Current::from)
}

/// Fails a decode whose tag is older than every structure in the chain (or newer than all).
#[doc(hidden)]
pub fn unsupported<T: Versioned>(version: u64) -> Result<T, Error> {
    warn!(version, oldest = T::VERSION, "no upgrade path for version");
    Err(Error::UnsupportedVersion(version))
}

/// Declares a structure.
///
/// Fields are written and read in declaration order. Each field type must implement
/// [Write](crate::Write) and [Read](crate::Read); the struct derives `Clone`, `Debug`,
/// `Default` and `PartialEq`, so field types must too.
#[macro_export]
macro_rules! structure {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $( $(#[$field_meta:meta])* $field_vis:vis $field:ident : $ty:ty ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default, PartialEq)]
        $vis struct $name {
            $( $(#[$field_meta])* $field_vis $field: $ty, )+
        }

        impl $crate::Write for $name {
            fn write(
                &self,
                sink: &mut impl $crate::Sink,
            ) -> ::core::result::Result<usize, $crate::Error> {
                let mut written = 0;
                $( written += $crate::Write::write(&self.$field, sink)?; )+
                Ok(written)
            }
        }

        impl $crate::Read for $name {
            fn read(
                source: &mut impl $crate::Source,
            ) -> ::core::result::Result<Self, $crate::Error> {
                $( let $field = <$ty as $crate::Read>::read(source)?; )+
                Ok(Self { $( $field, )+ })
            }
        }

        impl $crate::Structure for $name {
            const FIELDS: &'static [&'static str] = &[ $( ::core::stringify!($field), )+ ];
        }
    };
}

/// Declares a versioned structure.
///
/// `version` is the tag this declaration writes. `previous` names the structure that
/// decodes older tags; the declared struct must implement `From<previous>`. Without
/// `previous`, any other tag fails with [Error::UnsupportedVersion].
#[macro_export]
macro_rules! versioned_structure {
    (@upgrade $version:ident, $source:ident $(,)?) => {
        $crate::structure::unsupported::<Self>($version)
    };
    (@upgrade $version:ident, $source:ident, $previous:ty) => {
        $crate::structure::upgrade_from::<$previous, Self>($version, $source)
    };
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident (version = $tag:literal $(, previous = $previous:ty)?) {
            $( $(#[$field_meta:meta])* $field_vis:vis $field:ident : $ty:ty ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default, PartialEq)]
        $vis struct $name {
            $( $(#[$field_meta])* $field_vis $field: $ty, )+
        }

        impl $crate::Versioned for $name {
            const VERSION: u64 = $tag;

            fn write_body(
                &self,
                sink: &mut impl $crate::Sink,
            ) -> ::core::result::Result<usize, $crate::Error> {
                let mut written = 0;
                $( written += $crate::Write::write(&self.$field, sink)?; )+
                Ok(written)
            }

            fn read_body(
                source: &mut impl $crate::Source,
            ) -> ::core::result::Result<Self, $crate::Error> {
                $( let $field = <$ty as $crate::Read>::read(source)?; )+
                Ok(Self { $( $field, )+ })
            }

            #[allow(unused_variables)]
            fn upgrade(
                version: u64,
                source: &mut impl $crate::Source,
            ) -> ::core::result::Result<Self, $crate::Error> {
                $crate::versioned_structure!(@upgrade version, source, $($previous)?)
            }
        }

        impl $crate::Write for $name {
            fn write(
                &self,
                sink: &mut impl $crate::Sink,
            ) -> ::core::result::Result<usize, $crate::Error> {
                let tag = $crate::varint::Varint64::new(<Self as $crate::Versioned>::VERSION);
                let written = $crate::Write::write(&tag, sink)?;
                Ok(written + <Self as $crate::Versioned>::write_body(self, sink)?)
            }
        }

        impl $crate::Read for $name {
            fn read(
                source: &mut impl $crate::Source,
            ) -> ::core::result::Result<Self, $crate::Error> {
                let tag = <$crate::varint::Varint64 as $crate::Read>::read(source)?;
                <Self as $crate::Versioned>::read_versioned(tag.get(), source)
            }
        }

        impl $crate::Structure for $name {
            const FIELDS: &'static [&'static str] = &[ $( ::core::stringify!($field), )+ ];
        }
    };
}
