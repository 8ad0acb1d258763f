// Archive binary format: header parsing, validation

use crate::FstError;

/// Archive header magic constants (little-endian).
pub const COOKIE1: u32 = 0x544D_4F52;
pub const COOKIE2: u32 = 0x4641_5231;

/// Only supported archive layout version.
pub const VERSION: u16 = 1;

/// Size of the archive header in bytes.
pub const HEADER_SIZE: usize = 16;

/// Alignment of the state and arc record tables within an entry.
pub const RECORD_ALIGN: usize = 16;

/// Parsed archive header.
///
/// The header occupies the first 16 bytes of an archive:
/// - bytes 0..4: cookie1 (magic number)
/// - bytes 4..8: cookie2 (magic number)
/// - bytes 8..10: layout version
/// - bytes 10..12: reserved (must be zero)
/// - bytes 12..16: number of automata in the archive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveHeader {
    pub version: u16,
    pub entry_count: u32,
}

/// Parses and validates the 16-byte archive header.
pub fn parse_header(data: &[u8]) -> Result<ArchiveHeader, FstError> {
    if data.len() < HEADER_SIZE {
        return Err(FstError::TooShort {
            expected: HEADER_SIZE,
            actual: data.len(),
        });
    }

    let cookie1 = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);
    let cookie2 = u32::from_le_bytes([data[4], data[5], data[6], data[7]]);
    if cookie1 != COOKIE1 || cookie2 != COOKIE2 {
        return Err(FstError::InvalidMagic);
    }

    let version = u16::from_le_bytes([data[8], data[9]]);
    if version != VERSION {
        return Err(FstError::UnsupportedVersion(version));
    }

    let entry_count = u32::from_le_bytes([data[12], data[13], data[14], data[15]]);
    Ok(ArchiveHeader {
        version,
        entry_count,
    })
}

/// Serializes an archive header.
pub fn write_header(entry_count: u32) -> [u8; HEADER_SIZE] {
    let mut buf = [0u8; HEADER_SIZE];
    buf[..4].copy_from_slice(&COOKIE1.to_le_bytes());
    buf[4..8].copy_from_slice(&COOKIE2.to_le_bytes());
    buf[8..10].copy_from_slice(&VERSION.to_le_bytes());
    buf[12..16].copy_from_slice(&entry_count.to_le_bytes());
    buf
}

/// Round `offset` up to the next multiple of [`RECORD_ALIGN`].
#[inline]
pub fn align(offset: usize) -> usize {
    let partial = offset % RECORD_ALIGN;
    if partial > 0 {
        offset + (RECORD_ALIGN - partial)
    } else {
        offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_round_trip() {
        let data = write_header(3);
        let header = parse_header(&data).unwrap();
        assert_eq!(header.version, VERSION);
        assert_eq!(header.entry_count, 3);
    }

    #[test]
    fn reject_too_short() {
        let data = [0u8; 8];
        let err = parse_header(&data).unwrap_err();
        assert!(matches!(
            err,
            FstError::TooShort {
                expected: 16,
                actual: 8
            }
        ));
    }

    #[test]
    fn reject_invalid_magic() {
        let mut data = write_header(1);
        data[0] = 0xFF; // corrupt cookie1
        let err = parse_header(&data).unwrap_err();
        assert!(matches!(err, FstError::InvalidMagic));
    }

    #[test]
    fn reject_unknown_version() {
        let mut data = write_header(1);
        data[8] = 9;
        let err = parse_header(&data).unwrap_err();
        assert!(matches!(err, FstError::UnsupportedVersion(9)));
    }

    #[test]
    fn header_with_trailing_data() {
        let mut data = write_header(0).to_vec();
        data.extend_from_slice(&[0u8; 100]); // entry data after header is fine
        let header = parse_header(&data).unwrap();
        assert_eq!(header.entry_count, 0);
    }

    #[test]
    fn align_rounds_up() {
        assert_eq!(align(0), 0);
        assert_eq!(align(1), 16);
        assert_eq!(align(16), 16);
        assert_eq!(align(17), 32);
    }
}
