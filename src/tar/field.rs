//! Field codec: encodes one typed value into a fixed-width header field.
//!
//! Numeric fields share a template of `width - 2` ASCII zeros followed by a
//! space and a NUL terminator; the digit string is placed so it ends at the
//! space, or at offset 0 when it fills all of `width - 1` bytes. This keeps
//! the emitted bytes identical for every width/value combination.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{Result, TarError};
use crate::tar::layout::{BLOCK_SIZE, CHECKSUM_OFFSET, CHECKSUM_WIDTH};

/// Encode an ASCII string, NUL-padded to `width`. An empty value yields an
/// all-zero field. One byte is reserved for the implicit terminator, so the
/// string must be strictly shorter than `width`.
pub fn encode_string(value: &str, field: &str, width: usize) -> Result<Vec<u8>> {
    if value.is_empty() {
        return Ok(vec![0; width]);
    }

    if !value.is_ascii() {
        return Err(TarError::NonAsciiValue {
            field: field.to_string(),
            value: value.to_string(),
        });
    }

    if value.len() >= width {
        return Err(TarError::FieldTooLong {
            field: field.to_string(),
            len: value.len(),
            max: width,
        });
    }

    let mut buf = vec![0; width];
    buf[..value.len()].copy_from_slice(value.as_bytes());
    Ok(buf)
}

/// Encode a non-negative integer as decimal digits
pub fn encode_number(value: u64, field: &str, width: usize) -> Result<Vec<u8>> {
    encode_digits(&value.to_string(), field, value as i128, width)
}

/// Encode a non-negative integer as base-8 digits
pub fn encode_octal(value: u64, field: &str, width: usize) -> Result<Vec<u8>> {
    encode_digits(&format!("{value:o}"), field, value as i128, width)
}

/// Encode POSIX permission bits. The value is the octal numeral written out
/// in decimal (`644` means `rw-r--r--`), so every digit must be 0-7 and the
/// numeral may not exceed `7777`; encoding then delegates to [`encode_number`].
pub fn encode_mode(mode: u32, field: &str, width: usize) -> Result<Vec<u8>> {
    let invalid = || TarError::InvalidMode {
        field: field.to_string(),
        mode,
    };

    if mode > 7777 {
        return Err(invalid());
    }

    if mode.to_string().bytes().any(|d| !(b'0'..=b'7').contains(&d)) {
        return Err(invalid());
    }

    encode_number(mode as u64, field, width)
}

/// Encode a point in time as whole Unix-epoch seconds (floored), base-8
pub fn encode_time(time: SystemTime, field: &str, width: usize) -> Result<Vec<u8>> {
    let secs = time
        .duration_since(UNIX_EPOCH)
        .map_err(|err| TarError::ValueOutOfRange {
            field: field.to_string(),
            value: -(err.duration().as_secs() as i128),
        })?
        .as_secs();

    encode_octal(secs, field, width)
}

/// Encode a member of a fixed permitted set, NUL-padded to `width`
pub fn encode_enum(
    value: &str,
    allowed: &'static [&'static str],
    field: &str,
    width: usize,
) -> Result<Vec<u8>> {
    if !allowed.contains(&value) {
        return Err(TarError::InvalidEnumValue {
            field: field.to_string(),
            value: value.to_string(),
        });
    }

    debug_assert!(value.len() <= width);
    let mut buf = vec![0; width];
    buf[..value.len()].copy_from_slice(value.as_bytes());
    Ok(buf)
}

/// Emit fixed magic bytes, NUL-padded to `width`; the entry value is ignored
pub fn encode_constant(bytes: &'static [u8], width: usize) -> Vec<u8> {
    debug_assert!(bytes.len() <= width);
    let mut buf = vec![0; width];
    buf[..bytes.len()].copy_from_slice(bytes);
    buf
}

/// Arithmetic checksum over an assembled header block: the sum of all 512
/// byte values with the checksum field itself counted as eight ASCII spaces.
pub fn block_checksum(block: &[u8; BLOCK_SIZE]) -> u64 {
    let mut sum = (CHECKSUM_WIDTH as u64) * (b' ' as u64);
    for &byte in &block[..CHECKSUM_OFFSET] {
        sum += byte as u64;
    }
    for &byte in &block[CHECKSUM_OFFSET + CHECKSUM_WIDTH..] {
        sum += byte as u64;
    }
    sum
}

/// Place a digit string into the shared numeric template
fn encode_digits(digits: &str, field: &str, value: i128, width: usize) -> Result<Vec<u8>> {
    debug_assert!(width >= 2);
    let allowed = width - 1;

    if digits.len() > allowed {
        return Err(TarError::ValueOutOfRange {
            field: field.to_string(),
            value,
        });
    }

    let mut buf = vec![b'0'; width];
    buf[width - 2] = b' ';
    buf[width - 1] = 0;

    let start = if digits.len() == allowed {
        0
    } else {
        width - 2 - digits.len()
    };
    buf[start..start + digits.len()].copy_from_slice(digits.as_bytes());

    Ok(buf)
}
