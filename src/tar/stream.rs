//! Archive stream: pull-driven generator over a sequence of entries.
//!
//! The consumer drives the stream through `std::io::Read`; each call returns
//! at most the requested byte count and may return fewer. Entries are
//! strictly serialized (tar is a linear, position-dependent format) and the
//! two-block zero trailer is emitted only after the last entry's padding.

use std::io::{self, Cursor, Read};

use tracing::{debug, trace};

use crate::error::Result;
use crate::tar::entry::{pack_file, pack_stream, EntryBody, StreamEntry, TarSource};
use crate::tar::layout::TRAILER_SIZE;

/// Packed byte source for the entry currently being emitted
enum EntryReader {
    Buffered(Cursor<Vec<u8>>),
    Streamed(StreamEntry<Box<dyn Read>>),
}

impl Read for EntryReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::Buffered(cursor) => cursor.read(buf),
            Self::Streamed(entry) => entry.read(buf),
        }
    }
}

enum State {
    /// No entry open; pull the next source from the sequence
    Advancing,
    /// Delivering the current entry's packed bytes
    Emitting(EntryReader),
    /// Sequence exhausted; delivering the end-of-archive zero blocks
    Trailer { remaining: usize },
    /// Trailer delivered; every further read returns 0
    Done,
    /// A terminal failure was returned; no further packing or reads
    Failed,
}

/// Streaming tar archive over an ordered sequence of [`TarSource`] records.
///
/// Implements [`Read`]: bytes for entry *i* are fully emitted (header, body,
/// padding) before any byte of entry *i+1*, and an empty sequence produces
/// exactly the 1024-byte trailer. The first failure is terminal: it is
/// returned once with its cause, and every subsequent read fails without
/// packing further entries, so a partially delivered archive is never
/// silently completed.
pub struct TarStream<I: Iterator<Item = TarSource>> {
    sources: I,
    state: State,
}

impl<I: Iterator<Item = TarSource>> TarStream<I> {
    pub fn new(sources: impl IntoIterator<Item = TarSource, IntoIter = I>) -> Self {
        Self {
            sources: sources.into_iter(),
            state: State::Advancing,
        }
    }

    /// Drain the whole archive into one buffer
    pub fn into_bytes(mut self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.read_to_end(&mut out)?;
        Ok(out)
    }

    fn open_entry(source: TarSource) -> Result<EntryReader> {
        trace!(entry = %source.name(), "advancing to next entry");
        match source.body {
            EntryBody::Text(text) => {
                let packed = pack_file(text.as_bytes(), &source.options)?;
                Ok(EntryReader::Buffered(Cursor::new(packed)))
            }
            EntryBody::Bytes(bytes) => {
                let packed = pack_file(&bytes, &source.options)?;
                Ok(EntryReader::Buffered(Cursor::new(packed)))
            }
            EntryBody::Stream(reader) => {
                let entry = pack_stream(reader, &source.options)?;
                Ok(EntryReader::Streamed(entry))
            }
        }
    }
}

impl<I: Iterator<Item = TarSource>> Read for TarStream<I> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        loop {
            match &mut self.state {
                State::Advancing => match self.sources.next() {
                    Some(source) => match Self::open_entry(source) {
                        Ok(reader) => self.state = State::Emitting(reader),
                        Err(err) => {
                            self.state = State::Failed;
                            return Err(err.into());
                        }
                    },
                    None => {
                        debug!("entries exhausted, emitting trailer");
                        self.state = State::Trailer {
                            remaining: TRAILER_SIZE,
                        };
                    }
                },

                State::Emitting(reader) => match reader.read(buf) {
                    Ok(0) => self.state = State::Advancing,
                    Ok(n) => return Ok(n),
                    Err(err) if err.kind() == io::ErrorKind::WouldBlock => {
                        // upstream has no data yet; the entry stays open
                        return Err(err);
                    }
                    Err(err) => {
                        self.state = State::Failed;
                        return Err(err);
                    }
                },

                State::Trailer { remaining } => {
                    let n = buf.len().min(*remaining);
                    buf[..n].fill(0);
                    *remaining -= n;
                    if *remaining == 0 {
                        debug!("archive complete");
                        self.state = State::Done;
                    }
                    return Ok(n);
                }

                State::Done => return Ok(0),

                State::Failed => {
                    return Err(io::Error::other("tar stream already failed"));
                }
            }
        }
    }
}
