mod entry;
mod field;
mod header;
mod layout;
mod stream;

pub use entry::{
    pack_file, pack_stream, EntryBody, EntryOptions, EntryType, StreamEntry, TarSource,
};
pub use field::{
    block_checksum, encode_constant, encode_enum, encode_mode, encode_number, encode_octal,
    encode_string, encode_time,
};
pub use header::{pack_header, DEFAULT_MODE};
pub use layout::{
    padding_for, FieldKind, HeaderField, BLOCK_SIZE, HEADER_LAYOUT, TRAILER_SIZE, USTAR_MAGIC,
    USTAR_VERSION,
};
pub use stream::TarStream;
