// ---------------------------------------------------------------------------
// SaveError: error type for blueprint file operations
// ---------------------------------------------------------------------------

use std::fmt;

use schematic::codec::CodecError;

/// Errors that can occur while writing or reading blueprint files.
#[derive(Debug)]
pub enum SaveError {
    /// I/O error (permission denied, disk full, etc.)
    Io(std::io::Error),
    /// The blueprint could not be turned into bytes.
    Encode(String),
    /// The payload could not be turned back into a valid blueprint.
    Decode(String),
    /// The file does not start with a well-formed header.
    BadHeader(String),
    /// The stored checksum does not match the payload.
    ChecksumMismatch { expected: u32, found: u32 },
    /// The file was written by a newer header format.
    VersionMismatch { expected_max: u32, found: u32 },
    /// The requested blueprint name has no usable file stem.
    InvalidName(String),
    /// No stored blueprint has this name.
    NotFound(String),
}

impl fmt::Display for SaveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveError::Io(e) => write!(f, "I/O error: {e}"),
            SaveError::Encode(msg) => write!(f, "Encoding error: {msg}"),
            SaveError::Decode(msg) => write!(f, "Decoding error: {msg}"),
            SaveError::BadHeader(msg) => write!(f, "Bad file header: {msg}"),
            SaveError::ChecksumMismatch { expected, found } => write!(
                f,
                "Blueprint file is corrupted: checksum mismatch (expected {expected:#010X}, got {found:#010X})"
            ),
            SaveError::VersionMismatch {
                expected_max,
                found,
            } => write!(
                f,
                "Version mismatch: file is v{found}, but this build only supports up to v{expected_max}"
            ),
            SaveError::InvalidName(name) => write!(f, "Invalid blueprint name: {name:?}"),
            SaveError::NotFound(name) => write!(f, "No stored blueprint named {name:?}"),
        }
    }
}

impl std::error::Error for SaveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SaveError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SaveError {
    fn from(e: std::io::Error) -> Self {
        SaveError::Io(e)
    }
}

impl From<CodecError> for SaveError {
    fn from(e: CodecError) -> Self {
        SaveError::Decode(e.to_string())
    }
}

impl From<lz4_flex::block::DecompressError> for SaveError {
    fn from(e: lz4_flex::block::DecompressError) -> Self {
        SaveError::Decode(format!("lz4: {e}"))
    }
}
