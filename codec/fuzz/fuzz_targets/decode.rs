#![no_main]

use lattice_codec::{
    base64, structure, versioned_structure, Alphabet, Base64Reader, Decode, Int32Field,
    MemoryReader, OptionalField, Read, Source, Varint, VectorField,
};
use libfuzzer_sys::fuzz_target;

structure! {
    struct Bar {
        x: Int32Field,
        y: Int32Field,
    }
}

versioned_structure! {
    struct SceneV0(version = 0) {
        name: OptionalField<String>,
        bars: VectorField<Bar>,
    }
}

versioned_structure! {
    struct Scene(version = 2, previous = SceneV0) {
        kind: Int32Field,
        bars: VectorField<Bar>,
    }
}

impl From<SceneV0> for Scene {
    fn from(previous: SceneV0) -> Self {
        Self {
            kind: Int32Field::new(0),
            bars: previous.bars,
        }
    }
}

// Arbitrary input must fail cleanly, never panic.
fuzz_target!(|data: &[u8]| {
    let _ = Varint::<u64>::decode(data);
    let _ = Varint::<i128>::decode(data);
    let _ = String::decode(data);
    let _ = Vec::<u16>::decode(data);
    let _ = Scene::decode(data);

    if let Ok(text) = std::str::from_utf8(data) {
        let _ = base64::decode::<Scene>(text, Alphabet::Standard);
        let _ = base64::decode::<Vec<u8>>(text, Alphabet::UrlSafe);
    }

    // A stopped reader stays stopped
    let mut reader = Base64Reader::new(MemoryReader::new(data));
    if Vec::<u8>::read(&mut reader).is_err() {
        let mut byte = [0u8; 1];
        assert!(reader.read(&mut byte).is_err());
    }
});
