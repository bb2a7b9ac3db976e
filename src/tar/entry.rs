//! Entry metadata and the entry packer.
//!
//! An entry is packed in one of two forms: in-memory ([`pack_file`]), where
//! the body is already materialized and its exact length wins over any
//! caller-supplied size, or streamed ([`pack_stream`]), where the caller's
//! declared size is authoritative for the header and the body is relayed
//! chunk-by-chunk from a live reader.

use std::fmt;
use std::io::{self, Read};
use std::time::SystemTime;

use tracing::trace;

use crate::error::{Result, TarError};
use crate::tar::header::pack_header;
use crate::tar::layout::{padding_for, BLOCK_SIZE};

/// Logical kind of an archive entry.
///
/// All four codes are valid in the type-flag field, but only `File` is
/// supported end-to-end; packing any other kind fails with
/// [`TarError::UnsupportedEntryKind`] before a single byte is emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryType {
    File,
    HardLink,
    SymbolicLink,
    Directory,
}

impl EntryType {
    /// USTAR type-flag code for this kind
    pub fn code(self) -> &'static str {
        match self {
            Self::File => "0",
            Self::HardLink => "1",
            Self::SymbolicLink => "2",
            Self::Directory => "5",
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::File => "file",
            Self::HardLink => "hard-link",
            Self::SymbolicLink => "symbolic-link",
            Self::Directory => "directory",
        };
        f.write_str(label)
    }
}

/// Logical file metadata for one entry.
///
/// Constructed per entry and consumed once by the header packer. Unset
/// fields take their defaults at pack time: mode 644, uid/gid 0, device
/// numbers 0, type file, all three timestamps "now".
#[derive(Debug, Clone, Default)]
pub struct EntryOptions {
    pub name: String,
    pub mode: Option<u32>,
    pub uid: Option<u64>,
    pub gid: Option<u64>,
    pub size: Option<u64>,
    pub modified: Option<SystemTime>,
    pub accessed: Option<SystemTime>,
    pub created: Option<SystemTime>,
    pub entry_type: Option<EntryType>,
    pub link: Option<String>,
    pub user_name: Option<String>,
    pub group_name: Option<String>,
    pub device_major: Option<u64>,
    pub device_minor: Option<u64>,
    pub prefix: Option<String>,
}

impl EntryOptions {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_mode(mut self, mode: u32) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn with_owner(mut self, uid: u64, gid: u64) -> Self {
        self.uid = Some(uid);
        self.gid = Some(gid);
        self
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_modified(mut self, time: SystemTime) -> Self {
        self.modified = Some(time);
        self
    }

    pub fn with_accessed(mut self, time: SystemTime) -> Self {
        self.accessed = Some(time);
        self
    }

    pub fn with_created(mut self, time: SystemTime) -> Self {
        self.created = Some(time);
        self
    }

    pub fn with_type(mut self, entry_type: EntryType) -> Self {
        self.entry_type = Some(entry_type);
        self
    }

    pub fn with_user_name(mut self, name: impl Into<String>) -> Self {
        self.user_name = Some(name.into());
        self
    }

    pub fn with_group_name(mut self, name: impl Into<String>) -> Self {
        self.group_name = Some(name.into());
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }
}

/// Body-producing capability of one entry
pub enum EntryBody {
    /// UTF-8 text, converted to bytes at pack time
    Text(String),
    /// Raw bytes, already materialized
    Bytes(Vec<u8>),
    /// Live byte source of length unknown to the codec; `EntryOptions::size`
    /// must be supplied by the caller
    Stream(Box<dyn Read>),
}

impl fmt::Debug for EntryBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.debug_tuple("Text").field(&text.len()).finish(),
            Self::Bytes(bytes) => f.debug_tuple("Bytes").field(&bytes.len()).finish(),
            Self::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

/// One logical file destined for an archive: metadata plus its body
#[derive(Debug)]
pub struct TarSource {
    pub options: EntryOptions,
    pub body: EntryBody,
}

impl TarSource {
    pub fn from_text(options: EntryOptions, text: impl Into<String>) -> Self {
        Self {
            options,
            body: EntryBody::Text(text.into()),
        }
    }

    pub fn from_bytes(options: EntryOptions, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            options,
            body: EntryBody::Bytes(bytes.into()),
        }
    }

    /// Streamed body; `options.size` is required and trusted for the header
    pub fn from_reader(options: EntryOptions, reader: impl Read + 'static) -> Self {
        Self {
            options,
            body: EntryBody::Stream(Box::new(reader)),
        }
    }

    pub fn name(&self) -> &str {
        &self.options.name
    }
}

fn ensure_regular_file(options: &EntryOptions) -> Result<()> {
    let kind = options.entry_type.unwrap_or(EntryType::File);
    if kind != EntryType::File {
        return Err(TarError::UnsupportedEntryKind {
            name: options.name.clone(),
            kind,
        });
    }
    Ok(())
}

/// Pack an in-memory entry: header + body + zero padding to a block boundary.
///
/// The size recorded in the header is the exact byte length of `body`; a
/// caller-supplied `options.size` is overridden.
pub fn pack_file(body: &[u8], options: &EntryOptions) -> Result<Vec<u8>> {
    ensure_regular_file(options)?;

    let size = body.len() as u64;
    let mut sized = options.clone();
    sized.size = Some(size);

    let header = pack_header(&sized)?;
    let pad = padding_for(size);
    trace!(entry = %options.name, size, pad, "packed in-memory entry");

    let mut out = Vec::with_capacity(BLOCK_SIZE + body.len() + pad);
    out.extend_from_slice(&header);
    out.extend_from_slice(body);
    out.resize(out.len() + pad, 0);
    Ok(out)
}

/// Pack a streamed entry around a live byte source.
///
/// The caller-declared `options.size` is authoritative for the header; the
/// returned [`StreamEntry`] yields the header block, relays upstream chunks
/// verbatim, then emits zero padding. Size accounting is strict: a source
/// that ends early or produces surplus bytes fails with
/// [`TarError::SizeMismatch`].
pub fn pack_stream<R: Read>(source: R, options: &EntryOptions) -> Result<StreamEntry<R>> {
    ensure_regular_file(options)?;

    let declared = options.size.ok_or_else(|| TarError::MissingSize {
        name: options.name.clone(),
    })?;
    let header = pack_header(options)?;
    trace!(entry = %options.name, size = declared, "packed streamed entry header");

    Ok(StreamEntry {
        name: options.name.clone(),
        source,
        header,
        header_pos: 0,
        declared,
        relayed: 0,
        phase: Phase::Header,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Header,
    Body,
    Padding { remaining: usize },
    Done,
}

/// Pull-readable packed form of one streamed entry
pub struct StreamEntry<R> {
    name: String,
    source: R,
    header: [u8; BLOCK_SIZE],
    header_pos: usize,
    declared: u64,
    relayed: u64,
    phase: Phase,
}

impl<R> fmt::Debug for StreamEntry<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamEntry")
            .field("name", &self.name)
            .field("declared", &self.declared)
            .field("relayed", &self.relayed)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

impl<R: Read> Read for StreamEntry<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        loop {
            match self.phase {
                Phase::Header => {
                    if self.header_pos == BLOCK_SIZE {
                        self.phase = Phase::Body;
                        continue;
                    }
                    let rest = &self.header[self.header_pos..];
                    let n = buf.len().min(rest.len());
                    buf[..n].copy_from_slice(&rest[..n]);
                    self.header_pos += n;
                    return Ok(n);
                }

                Phase::Body => {
                    if self.relayed == self.declared {
                        // declared size reached: the source must be exhausted
                        let mut probe = [0u8; 1];
                        match self.source.read(&mut probe) {
                            Ok(0) => {
                                self.phase = Phase::Padding {
                                    remaining: padding_for(self.declared),
                                };
                                continue;
                            }
                            Ok(n) => {
                                // count the rest of the overrun so the error
                                // reports the size the source actually produced
                                let mut surplus = n as u64;
                                let mut scratch = [0u8; BLOCK_SIZE];
                                loop {
                                    match self.source.read(&mut scratch) {
                                        Ok(0) => break,
                                        Ok(n) => surplus += n as u64,
                                        Err(err)
                                            if err.kind() == io::ErrorKind::Interrupted =>
                                        {
                                            continue
                                        }
                                        // the mismatch is the primary failure
                                        Err(_) => break,
                                    }
                                }
                                self.phase = Phase::Done;
                                return Err(TarError::SizeMismatch {
                                    name: self.name.clone(),
                                    declared: self.declared,
                                    actual: self.declared + surplus,
                                }
                                .into());
                            }
                            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                            Err(err) if err.kind() == io::ErrorKind::WouldBlock => {
                                return Err(err);
                            }
                            Err(err) => {
                                self.phase = Phase::Done;
                                return Err(TarError::SourceRead {
                                    name: self.name.clone(),
                                    source: err,
                                }
                                .into());
                            }
                        }
                    }

                    let left = self.declared - self.relayed;
                    let want = buf.len().min(left.min(usize::MAX as u64) as usize);
                    match self.source.read(&mut buf[..want]) {
                        Ok(0) => {
                            self.phase = Phase::Done;
                            return Err(TarError::SizeMismatch {
                                name: self.name.clone(),
                                declared: self.declared,
                                actual: self.relayed,
                            }
                            .into());
                        }
                        Ok(n) => {
                            self.relayed += n as u64;
                            return Ok(n);
                        }
                        Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                        Err(err) if err.kind() == io::ErrorKind::WouldBlock => {
                            // no data yet: suspend without failing the entry
                            return Err(err);
                        }
                        Err(err) => {
                            self.phase = Phase::Done;
                            return Err(TarError::SourceRead {
                                name: self.name.clone(),
                                source: err,
                            }
                            .into());
                        }
                    }
                }

                Phase::Padding { remaining } => {
                    if remaining == 0 {
                        self.phase = Phase::Done;
                        continue;
                    }
                    let n = buf.len().min(remaining);
                    buf[..n].fill(0);
                    self.phase = Phase::Padding {
                        remaining: remaining - n,
                    };
                    return Ok(n);
                }

                Phase::Done => return Ok(0),
            }
        }
    }
}
