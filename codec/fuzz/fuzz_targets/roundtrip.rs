#![no_main]

use arbitrary::Arbitrary;
use bytes::Bytes;
use lattice_codec::{
    structure, Alphabet, Compact, Decode, Encode, Field, Int64Field, OptionalField, StringField,
    Varint, VectorField,
};
use libfuzzer_sys::fuzz_target;

structure! {
    struct Record {
        id: Int64Field,
        label: OptionalField<String>,
        flags: Field<u16, Compact>,
        samples: VectorField<f64>,
        names: VectorField<StringField>,
    }
}

#[derive(Arbitrary, Debug)]
enum Input {
    U8(u8),
    U32(u32),
    I64(i64),
    U128(u128),
    F32(f32),
    Bool(bool),
    VarintU64(u64),
    VarintI32(i32),
    VarintI128(i128),
    String(String),
    Bytes(Vec<u8>),
    Option(Option<u32>),
    Tuple((u16, Option<bool>, String)),
    Nested(Vec<Vec<i16>>),
    Record {
        id: i64,
        label: Option<String>,
        flags: u16,
        samples: Vec<f64>,
        names: Vec<String>,
    },
}

fn roundtrip<T>(value: &T)
where
    T: Encode + Decode + PartialEq + std::fmt::Debug,
{
    let size = value.encode_size().unwrap();
    let encoded = value.encode().unwrap();
    assert_eq!(encoded.len(), size);
    assert_eq!(&T::decode(&encoded).unwrap(), value);

    for alphabet in [Alphabet::Standard, Alphabet::UrlSafe] {
        let text = value.encode_base64(alphabet).unwrap();
        assert_eq!(&T::decode_base64(&text, alphabet).unwrap(), value);
    }
}

/// Floats compare by bits so NaN payloads still round trip.
fn roundtrip_bits<T: Encode + Decode>(value: &T, bits: impl Fn(&T) -> Vec<u8>) {
    let encoded = value.encode().unwrap();
    assert_eq!(bits(&T::decode(&encoded).unwrap()), bits(value));
}

fuzz_target!(|input: Input| {
    match input {
        Input::U8(v) => roundtrip(&v),
        Input::U32(v) => roundtrip(&v),
        Input::I64(v) => roundtrip(&v),
        Input::U128(v) => roundtrip(&v),
        Input::F32(v) => roundtrip_bits(&v, |v| v.to_le_bytes().to_vec()),
        Input::Bool(v) => roundtrip(&v),
        Input::VarintU64(v) => {
            let value = Varint::new(v);
            assert_eq!(value.encode_size().unwrap(), value.size());
            roundtrip(&value);
        }
        Input::VarintI32(v) => roundtrip(&Varint::new(v)),
        Input::VarintI128(v) => roundtrip(&Varint::new(v)),
        Input::String(v) => roundtrip(&v),
        Input::Bytes(v) => roundtrip(&Bytes::from(v)),
        Input::Option(v) => roundtrip(&v),
        Input::Tuple(v) => roundtrip(&v),
        Input::Nested(v) => roundtrip(&v),
        Input::Record {
            id,
            label,
            flags,
            samples,
            names,
        } => {
            let record = Record {
                id: id.into(),
                label: label.into(),
                flags: flags.into(),
                samples: VectorField::new(samples),
                names: VectorField::new(names.into_iter().map(StringField::new).collect()),
            };
            roundtrip_bits(&record, |record| {
                record.samples.get().iter().flat_map(|s| s.to_le_bytes()).collect()
            });
        }
    }
});
