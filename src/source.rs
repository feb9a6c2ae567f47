//! The byte-source contract the reader depends on.
//!
//! Everything in this crate reads from a [`ByteSource`]: an addressable blob
//! of bytes with a cursor. The trait is implemented for every
//! `Read + Seek` type, so files, `Cursor<Vec<u8>>` and custom range readers
//! all work without adapters. The parser never writes through the source.

use std::io::{self, Read, Seek, SeekFrom};

/// Random-access view over a byte blob, little-endian throughout.
///
/// All methods are provided; implementors only supply `Read + Seek`.
/// A short read surfaces as [`io::ErrorKind::UnexpectedEof`].
pub trait ByteSource: Read + Seek {
    /// Read a single byte at the cursor.
    fn read_u8(&mut self) -> io::Result<u8> {
        let mut buf = [0u8; 1];
        self.read_exact(&mut buf)?;
        Ok(buf[0])
    }

    /// Read a little-endian `u16` at the cursor.
    fn read_u16_le(&mut self) -> io::Result<u16> {
        let mut buf = [0u8; 2];
        self.read_exact(&mut buf)?;
        Ok(u16::from_le_bytes(buf))
    }

    /// Read a little-endian `u32` at the cursor.
    fn read_u32_le(&mut self) -> io::Result<u32> {
        let mut buf = [0u8; 4];
        self.read_exact(&mut buf)?;
        Ok(u32::from_le_bytes(buf))
    }

    /// Read a little-endian `u64` at the cursor.
    fn read_u64_le(&mut self) -> io::Result<u64> {
        let mut buf = [0u8; 8];
        self.read_exact(&mut buf)?;
        Ok(u64::from_le_bytes(buf))
    }

    /// Read exactly `len` bytes into a fresh buffer.
    fn read_exact_vec(&mut self, len: usize) -> io::Result<Vec<u8>> {
        let mut buf = vec![0u8; len];
        self.read_exact(&mut buf)?;
        Ok(buf)
    }

    /// Move the cursor to an absolute offset.
    fn seek_to(&mut self, offset: u64) -> io::Result<u64> {
        self.seek(SeekFrom::Start(offset))
    }

    /// Current cursor position.
    fn pos(&mut self) -> io::Result<u64> {
        self.stream_position()
    }

    /// Offset one past the last byte of the source. The cursor is restored
    /// before returning.
    fn end_pos(&mut self) -> io::Result<u64> {
        let current = self.stream_position()?;
        let end = self.seek(SeekFrom::End(0))?;
        if current != end {
            self.seek(SeekFrom::Start(current))?;
        }
        Ok(end)
    }
}

impl<R: Read + Seek + ?Sized> ByteSource for R {}
