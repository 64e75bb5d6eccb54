//! Codec implementation for [Bytes].
//!
//! Identical on the wire to a `Vec<u8>`: a count, then the raw bytes.

use super::vec::{read_bytes, read_len, write_len};
use crate::{Error, Read, Sink, Source, Write};
use bytes::Bytes;

impl Write for Bytes {
    #[inline]
    fn write(&self, sink: &mut impl Sink) -> Result<usize, Error> {
        let written = write_len(self.len(), sink)?;
        Ok(written + sink.write(self)?)
    }
}

impl Read for Bytes {
    #[inline]
    fn read(source: &mut impl Source) -> Result<Self, Error> {
        let len = read_len(source)?;
        read_bytes(source, len).map(Bytes::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{varint, Decode, Encode};

    #[test]
    fn test_bytes() {
        let values = [
            Bytes::new(),
            Bytes::from_static(&[1, 2, 3]),
            Bytes::from(vec![0; 300]),
            Bytes::from(vec![0xAB; 10_000]),
        ];
        for value in values {
            let encoded = value.encode().unwrap();
            assert_eq!(
                encoded.len(),
                varint::size(value.len() as u64) + value.len()
            );
            let decoded = Bytes::decode(&encoded).unwrap();
            assert_eq!(value, decoded);

            // Same wire form as a byte vector
            assert_eq!(Vec::<u8>::decode(&encoded).unwrap(), value.to_vec());
        }
    }

    #[test]
    fn test_bytes_truncated() {
        let encoded = [5u8, 1, 2, 3];
        assert!(matches!(Bytes::decode(&encoded), Err(Error::ShortRead(5))));
    }
}
