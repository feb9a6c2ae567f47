//! Error types that can be emitted from this library

use displaydoc::Display;
use thiserror::Error;

use std::error::Error;
use std::io;

/// Generic result type with [`ZipError`] as its error variant
pub type ZipResult<T> = Result<T, ZipError>;

/// The error type for all archive parsing and extraction operations.
///
/// Parse-time errors ([`BadHeader`](ZipError::BadHeader),
/// [`BadTrailer`](ZipError::BadTrailer), [`NotAnArchive`](ZipError::NotAnArchive))
/// are fatal for the archive. Extraction-time errors halt the current
/// extraction call only; the [`ZipArchive`](crate::ZipArchive) stays valid and
/// may be reused with a different filter set.
#[derive(Debug, Display, Error)]
#[non_exhaustive]
pub enum ZipError {
    /// i/o error: {0}
    Io(#[from] io::Error),

    /// invalid file header: {0}
    BadHeader(&'static str),

    /// invalid archive trailer: {0}
    BadTrailer(&'static str),

    /// source is empty or contains no end-of-central-directory record
    NotAnArchive,

    /// unsupported compression method {0}
    UnsupportedCompression(u16),

    /// unsupported encryption: {0}
    UnsupportedEncryption(&'static str),

    /// checksum mismatch: expected {expected:#010x}, got {actual:#010x}
    WrongChecksum {
        /// CRC32 recorded in the entry's authoritative header fields.
        expected: u32,
        /// CRC32 computed over the decompressed bytes.
        actual: u32,
    },

    /// content receiver rejected an entry: {0}
    Receiver(#[source] Box<dyn Error + Send + Sync>),
}

impl From<ZipError> for io::Error {
    fn from(err: ZipError) -> io::Error {
        let kind = match &err {
            ZipError::Io(err) => err.kind(),
            ZipError::BadHeader(_) | ZipError::BadTrailer(_) | ZipError::NotAnArchive => {
                io::ErrorKind::InvalidData
            }
            ZipError::UnsupportedCompression(_) | ZipError::UnsupportedEncryption(_) => {
                io::ErrorKind::Unsupported
            }
            ZipError::WrongChecksum { .. } => io::ErrorKind::InvalidData,
            ZipError::Receiver(_) => io::ErrorKind::Other,
        };

        io::Error::new(kind, err)
    }
}

/// Recover a typed [`ZipError`] smuggled through an `io::Error`, as produced
/// by the reader adapters in [`crate::crc32`].
pub(crate) fn unpack_io_error(err: io::Error) -> ZipError {
    match err.downcast::<ZipError>() {
        Ok(zip_err) => zip_err,
        Err(err) => ZipError::Io(err),
    }
}
