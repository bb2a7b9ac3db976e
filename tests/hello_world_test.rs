//! Byte-exact single-entry archive scenario

use std::io::Read;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tarstream_rs::{block_checksum, EntryOptions, TarSource, TarStream, BLOCK_SIZE};

fn at(epoch_secs: u64) -> SystemTime {
    UNIX_EPOCH + Duration::from_secs(epoch_secs)
}

fn hello_world_options() -> EntryOptions {
    EntryOptions::new("hello-world.txt")
        .with_mode(644)
        .with_owner(1750, 1750)
        .with_user_name("jbsulli")
        .with_modified(at(1607152885))
        .with_accessed(at(1607152882))
        .with_created(at(1607152885))
}

fn build_archive() -> Vec<u8> {
    TarStream::new(vec![TarSource::from_text(
        hello_world_options(),
        "Hello world!",
    )])
    .into_bytes()
    .unwrap()
}

/// The numeric template: zero-digit fill, trailing space + NUL
fn numeric_field(digits: &str, width: usize) -> Vec<u8> {
    let mut buf = vec![b'0'; width];
    buf[width - 2] = b' ';
    buf[width - 1] = 0;
    let start = if digits.len() == width - 1 {
        0
    } else {
        width - 2 - digits.len()
    };
    buf[start..start + digits.len()].copy_from_slice(digits.as_bytes());
    buf
}

#[test]
fn test_archive_is_2048_bytes() {
    let bytes = build_archive();
    // 512 header + 12 body + 500 padding + 1024 trailer
    assert_eq!(bytes.len(), 2048);
    assert_eq!(&bytes[512..524], b"Hello world!");
    assert!(bytes[524..1024].iter().all(|&b| b == 0));
    assert!(bytes[1024..].iter().all(|&b| b == 0));
}

#[test]
fn test_header_fields_byte_exact() {
    let bytes = build_archive();

    assert_eq!(&bytes[..15], b"hello-world.txt");
    assert!(bytes[15..100].iter().all(|&b| b == 0));

    assert_eq!(&bytes[100..108], &numeric_field("644", 8)[..]); // mode
    assert_eq!(&bytes[108..116], &numeric_field("1750", 8)[..]); // uid
    assert_eq!(&bytes[116..124], &numeric_field("1750", 8)[..]); // gid
    assert_eq!(&bytes[124..136], &numeric_field("14", 12)[..]); // size: 12 -> octal

    let mtime = format!("{:o}", 1607152885u64);
    let atime = format!("{:o}", 1607152882u64);
    assert_eq!(&bytes[136..148], &numeric_field(&mtime, 12)[..]);
    assert_eq!(&bytes[476..488], &numeric_field(&atime, 12)[..]);
    assert_eq!(&bytes[488..500], &numeric_field(&mtime, 12)[..]);

    assert_eq!(bytes[156], b'0'); // regular file
    assert_eq!(&bytes[257..263], b"ustar\0");
    assert_eq!(&bytes[263..265], b"00");
    assert_eq!(&bytes[265..272], b"jbsulli");
    assert!(bytes[272..297].iter().all(|&b| b == 0));
    assert_eq!(&bytes[329..337], &numeric_field("0", 8)[..]); // devmajor
    assert_eq!(&bytes[337..345], &numeric_field("0", 8)[..]); // devminor
    assert!(bytes[500..512].iter().all(|&b| b == 0)); // pad region
}

#[test]
fn test_checksum_recomputes_independently() {
    let bytes = build_archive();

    let mut block = [0u8; BLOCK_SIZE];
    block.copy_from_slice(&bytes[..BLOCK_SIZE]);

    let digits: String = bytes[148..156]
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .map(|&b| b as char)
        .collect();
    let encoded = u64::from_str_radix(&digits, 8).unwrap();

    assert_eq!(encoded, block_checksum(&block));
}

#[test]
fn test_identical_inputs_identical_output() {
    assert_eq!(build_archive(), build_archive());
}

#[test]
fn test_byte_at_a_time_consumer_sees_same_archive() {
    let mut stream = TarStream::new(vec![TarSource::from_text(
        hello_world_options(),
        "Hello world!",
    )]);

    let mut bytes = Vec::new();
    let mut one = [0u8; 1];
    while stream.read(&mut one).unwrap() == 1 {
        bytes.push(one[0]);
    }

    assert_eq!(bytes, build_archive());
}
