//! Codec implementations for tuples.
//!
//! A tuple is an anonymous structure: its elements back to back, with no count or tag.

use crate::{Error, Read, Sink, Source, Write};
use paste::paste;

macro_rules! impl_codec_for_tuple {
    ($($index:literal),*) => {
        paste! {
            impl<$( [<T $index>]: Write ),*> Write for ( $( [<T $index>], )* ) {
                #[inline]
                fn write(&self, sink: &mut impl Sink) -> Result<usize, Error> {
                    Ok(0 $( + self.$index.write(sink)? )*)
                }
            }

            impl<$( [<T $index>]: Read ),*> Read for ( $( [<T $index>], )* ) {
                #[inline]
                fn read(source: &mut impl Source) -> Result<Self, Error> {
                    Ok(( $( [<T $index>]::read(source)?, )* ))
                }
            }
        }
    };
}

// Generate implementations for tuple sizes 1 through 8
impl_codec_for_tuple!(0);
impl_codec_for_tuple!(0, 1);
impl_codec_for_tuple!(0, 1, 2);
impl_codec_for_tuple!(0, 1, 2, 3);
impl_codec_for_tuple!(0, 1, 2, 3, 4);
impl_codec_for_tuple!(0, 1, 2, 3, 4, 5);
impl_codec_for_tuple!(0, 1, 2, 3, 4, 5, 6);
impl_codec_for_tuple!(0, 1, 2, 3, 4, 5, 6, 7);
