// ---------------------------------------------------------------------------
// SaveError: failures of the snapshot file
// ---------------------------------------------------------------------------

use std::fmt;

use territory::error::{CorruptRecord, PersistenceFailure, RepositoryError};
use territory::DomainsError;

/// Errors that can occur while reading or writing the snapshot file.
#[derive(Debug)]
pub enum SaveError {
    /// I/O error (permission denied, disk full, etc.)
    Io(std::io::Error),
    /// The file is shorter than its header.
    Truncated { len: usize },
    /// The file does not start with the snapshot magic bytes.
    BadMagic,
    /// Snapshot header version is newer than this build supports.
    VersionMismatch { expected_max: u32, found: u32 },
    /// The payload does not match the checksum in the header.
    Checksum { expected: u32, found: u32 },
    /// LZ4 decompression failed or produced the wrong number of bytes.
    Compression(String),
    /// Bitcode decoding of the tables failed.
    Decode(String),
}

impl fmt::Display for SaveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveError::Io(e) => write!(f, "I/O error: {e}"),
            SaveError::Truncated { len } => {
                write!(f, "snapshot is truncated ({len} bytes)")
            }
            SaveError::BadMagic => write!(f, "not a domain snapshot file"),
            SaveError::VersionMismatch {
                expected_max,
                found,
            } => write!(
                f,
                "version mismatch: snapshot is v{found}, but this build only supports up to v{expected_max}"
            ),
            SaveError::Checksum { expected, found } => write!(
                f,
                "checksum mismatch (expected {expected:#010X}, got {found:#010X})"
            ),
            SaveError::Compression(msg) => write!(f, "decompression error: {msg}"),
            SaveError::Decode(msg) => write!(f, "decoding error: {msg}"),
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

impl SaveError {
    /// Whether the bytes themselves are bad, as opposed to the file not
    /// being readable or writable.
    pub fn is_corruption(&self) -> bool {
        !matches!(self, SaveError::Io(_))
    }
}

impl From<std::io::Error> for SaveError {
    fn from(e: std::io::Error) -> Self {
        SaveError::Io(e)
    }
}

impl From<bitcode::Error> for SaveError {
    fn from(e: bitcode::Error) -> Self {
        SaveError::Decode(e.to_string())
    }
}

impl From<lz4_flex::block::DecompressError> for SaveError {
    fn from(e: lz4_flex::block::DecompressError) -> Self {
        SaveError::Compression(e.to_string())
    }
}

impl From<SaveError> for RepositoryError {
    fn from(e: SaveError) -> Self {
        if e.is_corruption() {
            RepositoryError::Corrupt(CorruptRecord::new("snapshot", e.to_string()))
        } else {
            RepositoryError::Persistence(PersistenceFailure::with_source("snapshot file", e))
        }
    }
}

impl From<SaveError> for DomainsError {
    fn from(e: SaveError) -> Self {
        RepositoryError::from(e).into()
    }
}
