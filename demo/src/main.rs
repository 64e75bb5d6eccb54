//! Encode a versioned environment through binary, Base64 and callback streams.
//!
//! An `EnvironmentV0` is written through each pipeline and read back as the current
//! `EnvironmentV1`, exercising the upgrade chain. The size of each payload is printed.
//!
//! # Usage
//!
//! ```sh
//! cargo run --release --bin lattice-demo -- --name Enviroment0 --width 16 --height 12 --bars 5 --alphabet url-safe
//! ```

use clap::{value_parser, Arg, Command};
use lattice_codec::{
    Alphabet, CallbackReader, CallbackWriter, Decode, Encode, Error, MemoryReader, MemoryWriter,
    Read, SizeCounter, Write,
};
use std::{cell::RefCell, process::ExitCode};
use tracing::{debug, error, info, Level};

mod environment;

use environment::{EnvironmentV0, EnvironmentV1};

/// Returns the version of the crate.
pub const fn crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

const NAME: &str = "name";
const WIDTH: &str = "width";
const HEIGHT: &str = "height";
const BARS: &str = "bars";
const ALPHABET: &str = "alphabet";
const LOG_LEVEL: &str = "log-level";

const STANDARD: &str = "standard";
const URL_SAFE: &str = "url-safe";

/// Writes through a counter, then into memory of exactly the counted size.
fn binary(environment: &EnvironmentV0) -> Result<(usize, EnvironmentV1), Error> {
    let mut counter = SizeCounter::new();
    environment.write(&mut counter)?;
    debug!(size = counter.size(), "measured binary payload");

    let mut buffer = vec![0u8; counter.size()];
    let mut writer = MemoryWriter::new(&mut buffer);
    environment.write(&mut writer)?;

    let mut reader = MemoryReader::new(&buffer);
    let decoded = EnvironmentV1::read(&mut reader)?;
    Ok((buffer.len(), decoded))
}

/// Writes Base64 text through the same two passes.
fn base64(
    environment: &EnvironmentV0,
    alphabet: Alphabet,
) -> Result<(usize, EnvironmentV1), Error> {
    let text = environment.encode_base64(alphabet)?;
    info!(%text, ?alphabet, "encoded base64 payload");
    let decoded = EnvironmentV1::decode_base64(&text, alphabet)?;
    Ok((text.len(), decoded))
}

/// Writes into a growable vector through callbacks, then reads it back the same way.
fn user_stream(environment: &EnvironmentV0) -> Result<(usize, EnvironmentV1), Error> {
    let data = RefCell::new(Vec::new());
    let mut writer = CallbackWriter::new(|bytes: &[u8]| {
        data.borrow_mut().extend_from_slice(bytes);
        true
    });
    environment.write(&mut writer)?;
    let data = data.into_inner();

    let mut index = 0;
    let mut reader = CallbackReader::new(|bytes: &mut [u8]| {
        let Some(chunk) = data.get(index..index + bytes.len()) else {
            return false;
        };
        bytes.copy_from_slice(chunk);
        index += bytes.len();
        true
    });
    let decoded = EnvironmentV1::read(&mut reader)?;
    Ok((data.len(), decoded))
}

fn run(environment: &EnvironmentV0, alphabet: Alphabet) -> Result<(), Error> {
    info!(size = environment.encode_size()?, "built environment");
    println!("{environment:?}");

    let (size, decoded) = binary(environment)?;
    println!("{decoded:?}");
    println!("Binary size = {size}\n");

    let (size, decoded) = base64(environment, alphabet)?;
    println!("{decoded:?}");
    println!("Base64 size = {size}\n");

    let (size, decoded) = user_stream(environment)?;
    println!("{decoded:?}");
    println!("User stream size = {size}\n");
    Ok(())
}

fn main() -> ExitCode {
    // Define application
    let matches = Command::new("lattice-demo")
        .version(crate_version())
        .about("Encode a versioned environment through binary, Base64 and callback streams.")
        .arg(
            Arg::new(NAME)
                .long(NAME)
                .default_value("Enviroment0")
                .help("Name of the environment (empty for none)"),
        )
        .arg(
            Arg::new(WIDTH)
                .long(WIDTH)
                .default_value("16")
                .value_parser(value_parser!(i32)),
        )
        .arg(
            Arg::new(HEIGHT)
                .long(HEIGHT)
                .default_value("12")
                .value_parser(value_parser!(i32)),
        )
        .arg(
            Arg::new(BARS)
                .long(BARS)
                .default_value("5")
                .help("Number of bars to place")
                .value_parser(clap::builder::RangedU64ValueParser::<usize>::new().range(0..=4096)),
        )
        .arg(
            Arg::new(ALPHABET)
                .long(ALPHABET)
                .default_value(STANDARD)
                .value_parser([STANDARD, URL_SAFE]),
        )
        .arg(
            Arg::new(LOG_LEVEL)
                .long(LOG_LEVEL)
                .default_value("info")
                .value_parser(value_parser!(Level)),
        )
        .get_matches();

    // Create logger
    let level = matches
        .get_one::<Level>(LOG_LEVEL)
        .copied()
        .unwrap_or(Level::INFO);
    tracing_subscriber::fmt().with_max_level(level).init();

    // Build environment
    let name = matches.get_one::<String>(NAME).map_or("", String::as_str);
    let width = matches.get_one::<i32>(WIDTH).copied().unwrap_or_default();
    let height = matches.get_one::<i32>(HEIGHT).copied().unwrap_or_default();
    let bars = matches.get_one::<usize>(BARS).copied().unwrap_or_default();
    let alphabet = match matches.get_one::<String>(ALPHABET).map(String::as_str) {
        Some(URL_SAFE) => Alphabet::UrlSafe,
        _ => Alphabet::Standard,
    };
    let environment = environment::build(name, width, height, bars);

    match run(&environment, alphabet) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(?err, "pipeline failed");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipelines_agree() {
        let environment = environment::build("Enviroment0", 16, 12, 5);
        let expected = EnvironmentV1::from(environment.clone());

        let (binary_size, decoded) = binary(&environment).unwrap();
        assert_eq!(decoded, expected);
        assert_eq!(binary_size, environment.encode_size().unwrap());

        let (base64_size, decoded) = base64(&environment, Alphabet::Standard).unwrap();
        assert_eq!(decoded, expected);
        assert_eq!(base64_size, binary_size.div_ceil(3) * 4);

        let (user_size, decoded) = user_stream(&environment).unwrap();
        assert_eq!(decoded, expected);
        assert_eq!(user_size, binary_size);
    }

    #[test]
    fn test_unnamed_environment() {
        let environment = environment::build("", 1, 1, 0);
        assert!(!environment.name.exists());
        let (_, decoded) = base64(&environment, Alphabet::UrlSafe).unwrap();
        assert_eq!(*decoded.kind.get(), 0);
    }
}
