//! A library for random-access reading of ZIP archives.
//!
//! Given any seekable byte source, `seekzip` hunts down the archive trailer,
//! reconstructs the central directory and streams decompressed entry contents
//! to a caller-provided receiver, optionally filtered by filename substring
//! and optionally decrypted with the legacy PKWARE "traditional" cipher.
//!
//! Supported compression methods are Stored and Deflated; everything else is
//! reported as [`ZipError::UnsupportedCompression`]. Strong (AES/X.509)
//! encryption is recognized but not implemented. Writing archives and
//! multi-disk archives are out of scope.
//!
//! ```no_run
//! use std::fs::File;
//! use seekzip::{ReadOptions, ZipArchive};
//!
//! fn main() -> seekzip::ZipResult<()> {
//!     let file = File::open("archive.zip")?;
//!     let mut archive = ZipArchive::new(file)?;
//!
//!     for name in archive.file_names() {
//!         println!("{name}");
//!     }
//!
//!     archive.extract_all(
//!         &ReadOptions::default(),
//!         &mut |name: &[u8],
//!               contents: &[u8]|
//!          -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!             println!("{}: {} bytes", String::from_utf8_lossy(name), contents.len());
//!             Ok(())
//!         },
//!     )?;
//!     Ok(())
//! }
//! ```

mod crc32;
mod zipcrypto;

pub mod extra_fields;
pub mod read;
pub mod result;
pub mod source;
pub mod spec;
pub mod types;

pub use crate::read::{ContentReceiver, EncryptionMethod, ReadOptions, ZipArchive};
pub use crate::result::{ZipError, ZipResult};
pub use crate::source::ByteSource;
pub use crate::types::{CentralDirectoryHeader, CompressionMethod, DataDescriptor, LocalFileEntry};
