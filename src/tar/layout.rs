//! Static layout of the 512-byte USTAR header block.
//!
//! Every header field is described by one [`HeaderField`] row; the table
//! spans exactly [`BLOCK_SIZE`] bytes including the trailing pad region.

/// Size of one tar block; headers are one block, bodies pad up to the next
pub const BLOCK_SIZE: usize = 512;

/// End-of-archive trailer: two consecutive all-zero blocks
pub const TRAILER_SIZE: usize = 1024;

/// Magic bytes at offset 257 marking a USTAR header
pub const USTAR_MAGIC: &[u8] = b"ustar\0";

/// USTAR version marker at offset 263
pub const USTAR_VERSION: &[u8] = b"00";

/// Permitted type-flag codes (regular file, hard link, symlink, directory)
pub const ENTRY_TYPE_CODES: [&str; 4] = ["0", "1", "2", "5"];

/// Byte range the checksum is computed over: the checksum field itself
/// (offsets 148..156) is treated as eight ASCII spaces.
pub const CHECKSUM_OFFSET: usize = 148;
pub const CHECKSUM_WIDTH: usize = 8;

/// Encoding applied to a header field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// ASCII string, NUL-padded; one byte reserved for the terminator
    Str,
    /// Decimal digit string in the shared numeric template
    Number,
    /// Base-8 digit string in the shared numeric template
    Octal,
    /// Permission bits; octal-valid digits, delegates to `Number`
    Mode,
    /// Unix timestamp, floored to whole seconds, encoded as `Octal`
    Time,
    /// Member of a fixed permitted set of codes
    Enum(&'static [&'static str]),
    /// Fixed magic bytes; ignores the entry value
    Constant(&'static [u8]),
    /// Byte sum of the block, written after every other field
    Checksum,
}

/// One column of the header layout table
#[derive(Debug, Clone, Copy)]
pub struct HeaderField {
    pub name: &'static str,
    pub offset: usize,
    pub width: usize,
    pub kind: FieldKind,
}

/// The USTAR header layout. Fields are disjoint, in ascending offset order,
/// and cover the full block: the final `pad` region reserves 500..512.
pub const HEADER_LAYOUT: [HeaderField; 19] = [
    HeaderField { name: "name", offset: 0, width: 100, kind: FieldKind::Str },
    HeaderField { name: "mode", offset: 100, width: 8, kind: FieldKind::Mode },
    HeaderField { name: "uid", offset: 108, width: 8, kind: FieldKind::Number },
    HeaderField { name: "gid", offset: 116, width: 8, kind: FieldKind::Number },
    HeaderField { name: "size", offset: 124, width: 12, kind: FieldKind::Octal },
    HeaderField { name: "mtime", offset: 136, width: 12, kind: FieldKind::Time },
    HeaderField { name: "chksum", offset: 148, width: 8, kind: FieldKind::Checksum },
    HeaderField { name: "typeflag", offset: 156, width: 1, kind: FieldKind::Enum(&ENTRY_TYPE_CODES) },
    HeaderField { name: "linkname", offset: 157, width: 100, kind: FieldKind::Str },
    HeaderField { name: "magic", offset: 257, width: 6, kind: FieldKind::Constant(USTAR_MAGIC) },
    HeaderField { name: "version", offset: 263, width: 2, kind: FieldKind::Constant(USTAR_VERSION) },
    HeaderField { name: "uname", offset: 265, width: 32, kind: FieldKind::Str },
    HeaderField { name: "gname", offset: 297, width: 32, kind: FieldKind::Str },
    HeaderField { name: "devmajor", offset: 329, width: 8, kind: FieldKind::Number },
    HeaderField { name: "devminor", offset: 337, width: 8, kind: FieldKind::Number },
    HeaderField { name: "prefix", offset: 345, width: 131, kind: FieldKind::Str },
    HeaderField { name: "atime", offset: 476, width: 12, kind: FieldKind::Time },
    HeaderField { name: "ctime", offset: 488, width: 12, kind: FieldKind::Time },
    HeaderField { name: "pad", offset: 500, width: 12, kind: FieldKind::Str },
];

/// Zero padding needed to reach the next block boundary from `size` bytes
pub fn padding_for(size: u64) -> usize {
    let rem = (size % BLOCK_SIZE as u64) as usize;
    if rem == 0 {
        0
    } else {
        BLOCK_SIZE - rem
    }
}
