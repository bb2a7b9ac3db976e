//! Tarstream-rs: streaming USTAR tar encoder
//!
//! This library serializes an ordered sequence of logical file entries into
//! a byte-exact USTAR-format tar archive, pulled by the consumer through
//! `std::io::Read`:
//! - Validated, checksummed 512-byte header blocks
//! - In-memory and live-streamed entry bodies
//! - Strict per-entry serialization and the two-block zero trailer
//!
//! # Example
//!
//! ```
//! use std::io::Read;
//! use tarstream_rs::{EntryOptions, TarSource, TarStream};
//!
//! let entry = TarSource::from_text(EntryOptions::new("hello.txt"), "Hello world!\n");
//! let mut archive = TarStream::new(vec![entry]);
//!
//! let mut bytes = Vec::new();
//! archive.read_to_end(&mut bytes)?;
//! assert_eq!(bytes.len() % 512, 0);
//! # Ok::<(), std::io::Error>(())
//! ```

// Core modules
pub mod error;
pub mod tar;

// Re-export commonly used types
pub use error::{Result, TarError};
pub use tar::{
    block_checksum, pack_file, pack_header, pack_stream, EntryBody, EntryOptions, EntryType,
    StreamEntry, TarSource, TarStream, BLOCK_SIZE, HEADER_LAYOUT, TRAILER_SIZE, USTAR_MAGIC,
    USTAR_VERSION,
};
