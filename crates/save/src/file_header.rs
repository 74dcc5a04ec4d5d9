// ---------------------------------------------------------------------------
// file_header – Blueprint file header with magic bytes, version, and checksum
// ---------------------------------------------------------------------------
//
// Header format (28 bytes, fixed-size, little-endian):
//   [0..4]   Magic bytes: "SCHM"
//   [4..8]   Format version (u32)
//   [8..12]  Flags (u32: bit 0 = lz4-compressed payload)
//   [12..20] Timestamp (Unix epoch seconds, u64)
//   [20..24] Uncompressed payload size (u32)
//   [24..28] xxHash32 checksum of the stored payload (everything after the header)

use xxhash_rust::xxh32::xxh32;

use crate::save_error::SaveError;

/// Magic bytes identifying a blueprint file.
pub const MAGIC: [u8; 4] = *b"SCHM";

/// Size of the file header in bytes.
pub const HEADER_SIZE: usize = 28;

/// Current header layout version.
pub const HEADER_FORMAT_VERSION: u32 = 1;

/// Payload is lz4 block-compressed.
pub const FLAG_COMPRESSED: u32 = 1;

const XXHASH_SEED: u32 = 0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHeader {
    pub format_version: u32,
    pub flags: u32,
    pub timestamp: u64,
    pub uncompressed_size: u32,
    pub checksum: u32,
}

impl FileHeader {
    /// Header for `stored` bytes that expand to `uncompressed_size` bytes.
    pub fn new(stored: &[u8], uncompressed_size: usize, flags: u32) -> Self {
        let timestamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        Self {
            format_version: HEADER_FORMAT_VERSION,
            flags,
            timestamp,
            uncompressed_size: uncompressed_size as u32,
            checksum: xxh32(stored, XXHASH_SEED),
        }
    }

    pub fn is_compressed(&self) -> bool {
        self.flags & FLAG_COMPRESSED != 0
    }

    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut out = [0u8; HEADER_SIZE];
        out[0..4].copy_from_slice(&MAGIC);
        out[4..8].copy_from_slice(&self.format_version.to_le_bytes());
        out[8..12].copy_from_slice(&self.flags.to_le_bytes());
        out[12..20].copy_from_slice(&self.timestamp.to_le_bytes());
        out[20..24].copy_from_slice(&self.uncompressed_size.to_le_bytes());
        out[24..28].copy_from_slice(&self.checksum.to_le_bytes());
        out
    }
}

/// Prepend a header to `stored`.
pub fn wrap_with_header(stored: &[u8], uncompressed_size: usize, flags: u32) -> Vec<u8> {
    let header = FileHeader::new(stored, uncompressed_size, flags);
    let mut out = Vec::with_capacity(HEADER_SIZE + stored.len());
    out.extend_from_slice(&header.to_bytes());
    out.extend_from_slice(stored);
    out
}

fn le_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

/// Parse and validate the header, returning it with the stored payload.
///
/// Unlike game saves there is no legacy headerless format: anything without
/// the magic bytes is rejected.
pub fn unwrap_header(bytes: &[u8]) -> Result<(FileHeader, &[u8]), SaveError> {
    if bytes.len() < 4 || bytes[..4] != MAGIC {
        return Err(SaveError::BadHeader("missing SCHM magic bytes".into()));
    }
    if bytes.len() < HEADER_SIZE {
        return Err(SaveError::BadHeader(format!(
            "file is too short ({} bytes, need at least {HEADER_SIZE} for header)",
            bytes.len()
        )));
    }

    let format_version = le_u32(bytes, 4);
    let flags = le_u32(bytes, 8);
    let mut ts = [0u8; 8];
    ts.copy_from_slice(&bytes[12..20]);
    let timestamp = u64::from_le_bytes(ts);
    let uncompressed_size = le_u32(bytes, 20);
    let checksum = le_u32(bytes, 24);

    if format_version > HEADER_FORMAT_VERSION {
        return Err(SaveError::VersionMismatch {
            expected_max: HEADER_FORMAT_VERSION,
            found: format_version,
        });
    }

    let payload = &bytes[HEADER_SIZE..];
    let computed = xxh32(payload, XXHASH_SEED);
    if computed != checksum {
        return Err(SaveError::ChecksumMismatch {
            expected: checksum,
            found: computed,
        });
    }

    Ok((
        FileHeader {
            format_version,
            flags,
            timestamp,
            uncompressed_size,
            checksum,
        },
        payload,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_and_unwrap() {
        let data = b"blueprint payload";
        let wrapped = wrap_with_header(data, data.len(), 0);
        assert_eq!(&wrapped[..4], b"SCHM");
        assert_eq!(wrapped.len(), HEADER_SIZE + data.len());

        let (header, payload) = unwrap_header(&wrapped).expect("unwrap should succeed");
        assert_eq!(header.format_version, HEADER_FORMAT_VERSION);
        assert!(!header.is_compressed());
        assert_eq!(header.uncompressed_size, data.len() as u32);
        assert_eq!(payload, data);
    }

    #[test]
    fn test_compressed_flag_survives() {
        let wrapped = wrap_with_header(b"abc", 100, FLAG_COMPRESSED);
        let (header, _) = unwrap_header(&wrapped).unwrap();
        assert!(header.is_compressed());
        assert_eq!(header.uncompressed_size, 100);
    }

    #[test]
    fn test_missing_magic_rejected() {
        let err = unwrap_header(b"MEGA-not-a-blueprint").unwrap_err();
        assert!(matches!(err, SaveError::BadHeader(_)));
        assert!(matches!(unwrap_header(b""), Err(SaveError::BadHeader(_))));
    }

    #[test]
    fn test_truncated_header_rejected() {
        let wrapped = wrap_with_header(b"data", 4, 0);
        let err = unwrap_header(&wrapped[..10]).unwrap_err();
        assert!(matches!(err, SaveError::BadHeader(_)), "got: {err}");
    }

    #[test]
    fn test_corrupted_payload_detected() {
        let mut wrapped = wrap_with_header(b"important data here", 19, 0);
        let last = wrapped.len() - 1;
        wrapped[last] ^= 0xFF;
        assert!(matches!(
            unwrap_header(&wrapped),
            Err(SaveError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn test_future_version_rejected() {
        let mut wrapped = wrap_with_header(b"data", 4, 0);
        wrapped[4..8].copy_from_slice(&99u32.to_le_bytes());
        match unwrap_header(&wrapped) {
            Err(SaveError::VersionMismatch {
                expected_max,
                found,
            }) => {
                assert_eq!(expected_max, HEADER_FORMAT_VERSION);
                assert_eq!(found, 99);
            }
            other => panic!("expected VersionMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_timestamp_is_recent() {
        let wrapped = wrap_with_header(b"x", 1, 0);
        let (header, _) = unwrap_header(&wrapped).unwrap();
        // 2020-01-01T00:00:00Z
        assert!(header.timestamp > 1_577_836_800);
    }
}
