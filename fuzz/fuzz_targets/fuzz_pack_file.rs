#![no_main]

use libfuzzer_sys::fuzz_target;
use tarstream_rs::{pack_file, pack_header, EntryOptions, BLOCK_SIZE};

fuzz_target!(|data: &[u8]| {
    // First byte picks the name length, the next slice is the name, the
    // remainder is the body
    if data.is_empty() {
        return;
    }

    let name_len = (data[0] as usize).min(data.len() - 1);
    let (name_bytes, body) = data[1..].split_at(name_len);
    let name = String::from_utf8_lossy(name_bytes).into_owned();

    let options = EntryOptions::new(name);

    // Packing must never panic; on success the output is whole blocks
    if let Ok(packed) = pack_file(body, &options) {
        assert_eq!(packed.len() % BLOCK_SIZE, 0);
        assert!(packed.len() >= BLOCK_SIZE + body.len());
    }

    // A header alone is always exactly one block when it encodes at all
    if let Ok(block) = pack_header(&options) {
        assert_eq!(block.len(), BLOCK_SIZE);
        assert_eq!(&block[257..263], b"ustar\0");
    }
});
