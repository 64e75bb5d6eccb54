//! Integration tests for encoding through the different ports.

mod common;

use common::{environment_v0, EnvironmentV0, EnvironmentV1};
use lattice_codec::{
    Alphabet, Base64Reader, Base64Writer, CallbackReader, CallbackWriter, Decode, Encode, Error,
    IoReader, IoWriter, MemoryReader, MemoryWriter, Read, SizeCounter, UrlSafeReader,
    UrlSafeWriter, Write,
};
use proptest::prelude::*;
use std::cell::RefCell;

#[test]
fn test_binary_two_pass() {
    let environment = environment_v0("Enviroment0", 16, 12, 5);

    // Measure
    let mut counter = SizeCounter::new();
    let measured = environment.write(&mut counter).unwrap();
    assert_eq!(measured, counter.size());

    // Write into exactly that much memory
    let mut buffer = vec![0u8; counter.size()];
    let mut writer = MemoryWriter::new(&mut buffer);
    assert_eq!(environment.write(&mut writer).unwrap(), measured);
    assert_eq!(writer.remaining(), 0);

    // Read back through the newer schema
    let mut reader = MemoryReader::new(&buffer);
    let migrated = EnvironmentV1::read(&mut reader).unwrap();
    assert_eq!(reader.remaining(), 0);
    assert_eq!(migrated, EnvironmentV1::from(environment));
}

#[test]
fn test_binary_buffer_too_small() {
    let environment = environment_v0("Env0", 16, 12, 5);
    let size = environment.encode_size().unwrap();
    let mut buffer = vec![0u8; size - 1];
    let mut writer = MemoryWriter::new(&mut buffer);
    assert!(matches!(
        environment.write(&mut writer),
        Err(Error::ShortWrite(_))
    ));
}

#[test]
fn test_base64_two_pass() {
    let environment = environment_v0("Enviroment0", 16, 12, 5);

    // Measure the symbols
    let mut counter = Base64Writer::new(SizeCounter::new());
    environment.write(&mut counter).unwrap();
    let size = counter.finish().unwrap().size();
    assert_eq!(size % 4, 0);
    assert_eq!(size, environment.encode_size().unwrap().div_ceil(3) * 4);

    // Write them into exactly that much memory
    let mut buffer = vec![0u8; size];
    let mut writer = Base64Writer::new(MemoryWriter::new(&mut buffer));
    environment.write(&mut writer).unwrap();
    assert_eq!(writer.finish().unwrap().remaining(), 0);

    let mut reader = Base64Reader::new(MemoryReader::new(&buffer));
    let migrated = EnvironmentV1::read(&mut reader).unwrap();
    assert_eq!(migrated, EnvironmentV1::from(environment.clone()));

    // Same text as the convenience path
    let text = environment.encode_base64(Alphabet::Standard).unwrap();
    assert_eq!(text.as_bytes(), &buffer[..]);
}

#[test]
fn test_base64_url_safe() {
    let environment = environment_v0("Env0?>>", 16, 12, 5);
    let text = environment.encode_base64(Alphabet::UrlSafe).unwrap();
    assert!(text
        .bytes()
        .all(|symbol| symbol.is_ascii_alphanumeric() || symbol == b'-' || symbol == b'_'));

    let migrated = EnvironmentV1::decode_base64(&text, Alphabet::UrlSafe).unwrap();
    assert_eq!(migrated, EnvironmentV1::from(environment.clone()));

    // The filters compose by hand too
    let mut writer = Base64Writer::new(UrlSafeWriter::new(Vec::<u8>::new()));
    environment.write(&mut writer).unwrap();
    let symbols = writer.finish().unwrap().into_inner();
    assert_eq!(symbols, text.as_bytes());
    let mut reader = Base64Reader::new(UrlSafeReader::new(&symbols[..]));
    assert_eq!(EnvironmentV0::read(&mut reader).unwrap(), environment);
}

#[test]
fn test_base64_corrupted() {
    let environment = environment_v0("Env0", 16, 12, 5);
    let mut text = environment.encode_base64(Alphabet::Standard).unwrap();
    text.replace_range(8..9, "*");
    assert!(matches!(
        EnvironmentV1::decode_base64(&text, Alphabet::Standard),
        Err(Error::InvalidBase64Symbol(b'*'))
    ));
}

#[test]
fn test_base64_trailing_text() {
    let environment = environment_v0("Env0", 16, 12, 5);
    let text = environment.encode_base64(Alphabet::Standard).unwrap();
    assert!(matches!(
        EnvironmentV1::decode_base64(&format!("{text}AAAA"), Alphabet::Standard),
        Err(Error::ExtraData(4))
    ));

    // Padding is part of the standard form
    let unpadded = text.trim_end_matches('=');
    assert_ne!(unpadded, text);
    assert!(matches!(
        EnvironmentV1::decode_base64(unpadded, Alphabet::Standard),
        Err(Error::ShortRead(_))
    ));
}

#[test]
fn test_callback_streams() {
    let environment = environment_v0("Enviroment0", 16, 12, 5);

    let data = RefCell::new(Vec::new());
    let mut writer = CallbackWriter::new(|bytes: &[u8]| {
        data.borrow_mut().extend_from_slice(bytes);
        true
    });
    let written = environment.write(&mut writer).unwrap();
    let data = data.into_inner();
    assert_eq!(written, data.len());

    let mut index = 0;
    let mut reader = CallbackReader::new(|bytes: &mut [u8]| {
        let Some(chunk) = data.get(index..index + bytes.len()) else {
            return false;
        };
        bytes.copy_from_slice(chunk);
        index += bytes.len();
        true
    });
    let migrated = EnvironmentV1::read(&mut reader).unwrap();
    assert_eq!(migrated, EnvironmentV1::from(environment));
}

#[test]
fn test_callback_refusal() {
    let environment = environment_v0("Env0", 16, 12, 5);
    let mut writer = CallbackWriter::new(|_: &[u8]| false);
    assert!(matches!(
        environment.write(&mut writer),
        Err(Error::ShortWrite(1))
    ));

    let mut reader = CallbackReader::new(|_: &mut [u8]| false);
    assert!(matches!(
        EnvironmentV0::read(&mut reader),
        Err(Error::ShortRead(1))
    ));
}

#[test]
fn test_io_streams() {
    let environment = environment_v0("Env0", 16, 12, 5);
    let mut writer = IoWriter::new(Vec::<u8>::new());
    environment.write(&mut writer).unwrap();
    let data = writer.into_inner();
    assert_eq!(data, &environment.encode().unwrap()[..]);

    let mut reader = IoReader::new(std::io::Cursor::new(data));
    assert_eq!(EnvironmentV0::read(&mut reader).unwrap(), environment);
}

proptest! {
    #[test]
    fn prop_two_pass_determinism(
        name in "[a-zA-Z0-9 ]{0,32}",
        width in any::<i32>(),
        height in any::<i32>(),
        bars in 0usize..64,
    ) {
        let environment = environment_v0(&name, width, height, bars);
        let size = environment.encode_size().unwrap();
        let encoded = environment.encode().unwrap();
        prop_assert_eq!(encoded.len(), size);
        prop_assert_eq!(EnvironmentV0::decode(&encoded).unwrap(), environment.clone());

        let text = environment.encode_base64(Alphabet::Standard).unwrap();
        prop_assert_eq!(text.len(), size.div_ceil(3) * 4);
        prop_assert_eq!(
            EnvironmentV1::decode_base64(&text, Alphabet::Standard).unwrap(),
            EnvironmentV1::from(environment)
        );
    }
}
