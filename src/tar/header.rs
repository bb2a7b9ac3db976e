//! Header packer: one entry's metadata -> one validated 512-byte block.

use std::time::SystemTime;

use crate::error::Result;
use crate::tar::entry::{EntryOptions, EntryType};
use crate::tar::field;
use crate::tar::layout::{
    FieldKind, BLOCK_SIZE, CHECKSUM_OFFSET, CHECKSUM_WIDTH, HEADER_LAYOUT,
};

/// Default permission bits (`rw-r--r--`, written as the octal numeral 644)
pub const DEFAULT_MODE: u32 = 644;

/// Pack entry metadata into a checksummed 512-byte USTAR header block.
///
/// Walks [`HEADER_LAYOUT`], applying defaults (mode 644, uid/gid/device 0,
/// type file, timestamps "now") and encoding each field in place; the
/// checksum is computed over the assembled block and written last. The first
/// codec failure aborts packing, annotated `"<entry-name>:<field-name>"` —
/// no partial header is ever returned.
pub fn pack_header(options: &EntryOptions) -> Result<[u8; BLOCK_SIZE]> {
    let now = SystemTime::now();
    let mut block = [0u8; BLOCK_SIZE];

    for column in HEADER_LAYOUT.iter() {
        if matches!(column.kind, FieldKind::Checksum) {
            continue;
        }

        let label = format!("{}:{}", options.name, column.name);
        let encoded = match column.kind {
            FieldKind::Str => {
                field::encode_string(str_value(column.name, options), &label, column.width)?
            }
            FieldKind::Number => {
                field::encode_number(number_value(column.name, options), &label, column.width)?
            }
            FieldKind::Octal => {
                field::encode_octal(options.size.unwrap_or(0), &label, column.width)?
            }
            FieldKind::Mode => {
                field::encode_mode(options.mode.unwrap_or(DEFAULT_MODE), &label, column.width)?
            }
            FieldKind::Time => {
                field::encode_time(time_value(column.name, options, now), &label, column.width)?
            }
            FieldKind::Enum(allowed) => field::encode_enum(
                options.entry_type.unwrap_or(EntryType::File).code(),
                allowed,
                &label,
                column.width,
            )?,
            FieldKind::Constant(bytes) => field::encode_constant(bytes, column.width),
            FieldKind::Checksum => unreachable!(),
        };

        block[column.offset..column.offset + column.width].copy_from_slice(&encoded);
    }

    let sum = field::block_checksum(&block);
    let label = format!("{}:chksum", options.name);
    let encoded = field::encode_octal(sum, &label, CHECKSUM_WIDTH)?;
    block[CHECKSUM_OFFSET..CHECKSUM_OFFSET + CHECKSUM_WIDTH].copy_from_slice(&encoded);

    Ok(block)
}

fn str_value<'a>(name: &str, options: &'a EntryOptions) -> &'a str {
    match name {
        "name" => &options.name,
        "linkname" => options.link.as_deref().unwrap_or(""),
        "uname" => options.user_name.as_deref().unwrap_or(""),
        "gname" => options.group_name.as_deref().unwrap_or(""),
        "prefix" => options.prefix.as_deref().unwrap_or(""),
        "pad" => "",
        other => unreachable!("no string accessor for header field {other}"),
    }
}

fn number_value(name: &str, options: &EntryOptions) -> u64 {
    match name {
        "uid" => options.uid.unwrap_or(0),
        "gid" => options.gid.unwrap_or(0),
        "devmajor" => options.device_major.unwrap_or(0),
        "devminor" => options.device_minor.unwrap_or(0),
        other => unreachable!("no numeric accessor for header field {other}"),
    }
}

fn time_value(name: &str, options: &EntryOptions, now: SystemTime) -> SystemTime {
    match name {
        "mtime" => options.modified.unwrap_or(now),
        "atime" => options.accessed.unwrap_or(now),
        "ctime" => options.created.unwrap_or(now),
        other => unreachable!("no time accessor for header field {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TarError;
    use std::time::{Duration, UNIX_EPOCH};

    fn fixed_options(name: &str) -> EntryOptions {
        let when = UNIX_EPOCH + Duration::from_secs(1607152885);
        EntryOptions::new(name)
            .with_size(12)
            .with_modified(when)
            .with_accessed(when)
            .with_created(when)
    }

    /// Decode the checksum field back into its numeric value
    fn parse_checksum(block: &[u8; BLOCK_SIZE]) -> u64 {
        let digits: String = block[CHECKSUM_OFFSET..CHECKSUM_OFFSET + CHECKSUM_WIDTH]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .map(|&b| b as char)
            .collect();
        u64::from_str_radix(&digits, 8).unwrap()
    }

    #[test]
    fn test_pack_header_is_one_block() {
        let block = pack_header(&fixed_options("hello.txt")).unwrap();
        assert_eq!(block.len(), BLOCK_SIZE);
    }

    #[test]
    fn test_checksum_recomputes() {
        let block = pack_header(&fixed_options("hello.txt")).unwrap();
        assert_eq!(parse_checksum(&block), field::block_checksum(&block));
    }

    #[test]
    fn test_magic_and_version() {
        let block = pack_header(&fixed_options("hello.txt")).unwrap();
        assert_eq!(&block[257..263], b"ustar\0");
        assert_eq!(&block[263..265], b"00");
    }

    #[test]
    fn test_defaults_applied() {
        let block = pack_header(&fixed_options("hello.txt")).unwrap();
        assert_eq!(&block[100..108], b"000644 \0"); // mode
        assert_eq!(&block[108..116], b"000000 \0"); // uid
        assert_eq!(&block[116..124], b"000000 \0"); // gid
        assert_eq!(block[156], b'0'); // typeflag: regular file
    }

    #[test]
    fn test_optional_fields_placed() {
        let options = fixed_options("hello.txt")
            .with_owner(1750, 1750)
            .with_user_name("jbsulli");
        let block = pack_header(&options).unwrap();

        assert_eq!(&block[..9], b"hello.txt");
        assert_eq!(&block[108..116], b"001750 \0");
        assert_eq!(&block[116..124], b"001750 \0");
        assert_eq!(&block[124..136], b"0000000014 \0"); // size 12 -> octal 14
        assert_eq!(&block[265..272], b"jbsulli");
        assert!(block[272..297].iter().all(|&b| b == 0));
        // absent group name stays zeroed
        assert!(block[297..329].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_errors_carry_entry_and_field_name() {
        let options = fixed_options("bad\u{e9}.txt");
        let err = pack_header(&options).unwrap_err();
        match err {
            TarError::NonAsciiValue { field, .. } => {
                assert_eq!(field, "bad\u{e9}.txt:name");
            }
            other => panic!("unexpected error: {other}"),
        }

        let options = fixed_options(&"x".repeat(100));
        let err = pack_header(&options).unwrap_err();
        assert!(matches!(err, TarError::FieldTooLong { len: 100, max: 100, .. }));
    }

    #[test]
    fn test_prefix_and_linkname_placed() {
        let mut options = fixed_options("hello.txt").with_prefix("very/long/parent/path");
        options.link = Some("target.txt".to_string());
        let block = pack_header(&options).unwrap();

        assert_eq!(&block[157..167], b"target.txt");
        assert!(block[167..257].iter().all(|&b| b == 0));
        assert_eq!(&block[345..366], b"very/long/parent/path");
        assert!(block[366..476].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_prefix_and_linkname_width_limits() {
        // prefix: 131-byte field, one byte reserved for the terminator
        let options = fixed_options("hello.txt").with_prefix("p".repeat(131));
        let err = pack_header(&options).unwrap_err();
        assert!(matches!(err, TarError::FieldTooLong { len: 131, max: 131, .. }));
        let options = fixed_options("hello.txt").with_prefix("p".repeat(130));
        assert!(pack_header(&options).is_ok());

        // linkname: 100-byte field
        let mut options = fixed_options("hello.txt");
        options.link = Some("l".repeat(100));
        let err = pack_header(&options).unwrap_err();
        match err {
            TarError::FieldTooLong { field, len, max } => {
                assert_eq!(field, "hello.txt:linkname");
                assert_eq!(len, 100);
                assert_eq!(max, 100);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_invalid_mode_fails() {
        let options = fixed_options("hello.txt").with_mode(8);
        let err = pack_header(&options).unwrap_err();
        assert!(matches!(err, TarError::InvalidMode { mode: 8, .. }));
    }

    #[test]
    fn test_deterministic_with_fixed_timestamps() {
        let a = pack_header(&fixed_options("hello.txt")).unwrap();
        let b = pack_header(&fixed_options("hello.txt")).unwrap();
        assert_eq!(a, b);
    }
}
