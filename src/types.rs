//! The parsed data model: central directory headers, local file entries and
//! the small enums they hang off.

use crate::extra_fields::{self, ExtraField};
use crate::result::{ZipError, ZipResult};
use crate::spec::{self, FixedSizeBlock, Magic, from_le};
use std::fmt;
use std::io::Read;

/// Bit 0 of the general-purpose flags: entry payload is encrypted.
const FLAG_ENCRYPTED: u16 = 1 << 0;
/// Bit 3: sizes and CRC follow the payload in a data descriptor.
const FLAG_DATA_DESCRIPTOR: u16 = 1 << 3;
/// Bit 6: strong (certificate-based) encryption.
const FLAG_STRONG_ENCRYPTION: u16 = 1 << 6;
/// Bit 11: file name and comment are UTF-8.
const FLAG_UTF8: u16 = 1 << 11;

/// Identifies the algorithm a payload was compressed with.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CompressionMethod {
    /// The payload is stored verbatim.
    Stored,
    /// Raw DEFLATE, no zlib wrapper.
    Deflated,
    /// Any method this crate cannot decompress.
    Unsupported(u16),
}

impl CompressionMethod {
    pub const fn parse_from_u16(value: u16) -> Self {
        match value {
            0 => CompressionMethod::Stored,
            8 => CompressionMethod::Deflated,
            other => CompressionMethod::Unsupported(other),
        }
    }

    pub const fn serialize_to_u16(self) -> u16 {
        match self {
            CompressionMethod::Stored => 0,
            CompressionMethod::Deflated => 8,
            CompressionMethod::Unsupported(other) => other,
        }
    }
}

impl fmt::Display for CompressionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompressionMethod::Stored => write!(f, "Stored"),
            CompressionMethod::Deflated => write!(f, "Deflated"),
            CompressionMethod::Unsupported(id) => write!(f, "Unsupported({id})"),
        }
    }
}

/// Sizes and checksum recorded after a streamed payload.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DataDescriptor {
    pub crc32: u32,
    pub compressed_size: u32,
    pub uncompressed_size: u32,
}

#[derive(Copy, Clone, Debug)]
#[repr(packed)]
pub(crate) struct ZipCentralEntryBlock {
    pub magic: Magic,
    pub version_made_by: u16,
    pub version_to_extract: u16,
    pub flags: u16,
    pub compression_method: u16,
    pub last_mod_time: u16,
    pub last_mod_date: u16,
    pub crc32: u32,
    pub compressed_size: u32,
    pub uncompressed_size: u32,
    pub file_name_length: u16,
    pub extra_field_length: u16,
    pub file_comment_length: u16,
    pub disk_number: u16,
    pub internal_file_attributes: u16,
    pub external_file_attributes: u32,
    pub offset: u32,
}

impl FixedSizeBlock for ZipCentralEntryBlock {
    const MAGIC: Magic = spec::CENTRAL_DIRECTORY_HEADER_SIGNATURE;
    const WRONG_MAGIC_ERROR: ZipError =
        ZipError::BadHeader("invalid central directory header signature");

    fn magic(self) -> Magic {
        self.magic
    }

    #[inline(always)]
    fn from_le(mut self) -> Self {
        from_le![
            self,
            [
                (magic, Magic),
                (version_made_by, u16),
                (version_to_extract, u16),
                (flags, u16),
                (compression_method, u16),
                (last_mod_time, u16),
                (last_mod_date, u16),
                (crc32, u32),
                (compressed_size, u32),
                (uncompressed_size, u32),
                (file_name_length, u16),
                (extra_field_length, u16),
                (file_comment_length, u16),
                (disk_number, u16),
                (internal_file_attributes, u16),
                (external_file_attributes, u32),
                (offset, u32),
            ]
        ];
        self
    }
}

#[derive(Copy, Clone, Debug)]
#[repr(packed)]
pub(crate) struct ZipLocalEntryBlock {
    pub magic: Magic,
    pub version_to_extract: u16,
    pub flags: u16,
    pub compression_method: u16,
    pub last_mod_time: u16,
    pub last_mod_date: u16,
    pub crc32: u32,
    pub compressed_size: u32,
    pub uncompressed_size: u32,
    pub file_name_length: u16,
    pub extra_field_length: u16,
}

impl FixedSizeBlock for ZipLocalEntryBlock {
    const MAGIC: Magic = spec::LOCAL_FILE_HEADER_SIGNATURE;
    const WRONG_MAGIC_ERROR: ZipError = ZipError::BadHeader("invalid local file header signature");

    fn magic(self) -> Magic {
        self.magic
    }

    #[inline(always)]
    fn from_le(mut self) -> Self {
        from_le![
            self,
            [
                (magic, Magic),
                (version_to_extract, u16),
                (flags, u16),
                (compression_method, u16),
                (last_mod_time, u16),
                (last_mod_date, u16),
                (crc32, u32),
                (compressed_size, u32),
                (uncompressed_size, u32),
                (file_name_length, u16),
                (extra_field_length, u16),
            ]
        ];
        self
    }
}

pub(crate) fn read_variable_length_byte_field<R: Read>(
    reader: &mut R,
    len: usize,
) -> ZipResult<Box<[u8]>> {
    let mut data = vec![0; len];
    reader.read_exact(&mut data)?;
    Ok(data.into_boxed_slice())
}

/// One entry of the central directory, fully parsed.
#[derive(Debug, Clone)]
pub struct CentralDirectoryHeader {
    pub version_made_by: u16,
    pub version_to_extract: u16,
    pub flags: u16,
    pub compression_method: CompressionMethod,
    pub last_mod_time: u16,
    pub last_mod_date: u16,
    pub crc32: u32,
    pub compressed_size: u32,
    pub uncompressed_size: u32,
    pub disk_number: u16,
    pub internal_file_attributes: u16,
    pub external_file_attributes: u32,
    /// Offset of the entry's local file header from the start of the source.
    pub header_start: u64,
    /// Offset of this header from the start of the source.
    pub central_header_start: u64,
    /// File name exactly as stored.
    pub file_name_raw: Box<[u8]>,
    /// Decoded extra fields, in storage order.
    pub extra_fields: Vec<ExtraField>,
    pub file_comment_raw: Box<[u8]>,
}

impl CentralDirectoryHeader {
    /// Parse one header from the captured central directory bytes.
    /// `central_header_start` is its absolute offset in the source.
    pub(crate) fn parse<R: Read>(reader: &mut R, central_header_start: u64) -> ZipResult<Self> {
        let block = ZipCentralEntryBlock::parse(reader)?;
        let file_name_raw = read_variable_length_byte_field(reader, block.file_name_length as usize)?;
        let extra_field_raw =
            read_variable_length_byte_field(reader, block.extra_field_length as usize)?;
        let file_comment_raw =
            read_variable_length_byte_field(reader, block.file_comment_length as usize)?;

        let mut fields = Vec::new();
        extra_fields::walk(&extra_field_raw, &mut |field: ExtraField| -> ZipResult<()> {
            fields.push(field);
            Ok(())
        })?;

        let ZipCentralEntryBlock {
            version_made_by,
            version_to_extract,
            flags,
            compression_method,
            last_mod_time,
            last_mod_date,
            crc32,
            compressed_size,
            uncompressed_size,
            disk_number,
            internal_file_attributes,
            external_file_attributes,
            offset,
            ..
        } = block;

        Ok(Self {
            version_made_by,
            version_to_extract,
            flags,
            compression_method: CompressionMethod::parse_from_u16(compression_method),
            last_mod_time,
            last_mod_date,
            crc32,
            compressed_size,
            uncompressed_size,
            disk_number,
            internal_file_attributes,
            external_file_attributes,
            header_start: offset as u64,
            central_header_start,
            file_name_raw,
            extra_fields: fields,
            file_comment_raw,
        })
    }

    /// File name as text; undecodable bytes are replaced.
    pub fn file_name(&self) -> String {
        String::from_utf8_lossy(&self.file_name_raw).into_owned()
    }

    /// Directory entries carry a trailing `/` and no payload.
    pub fn is_dir(&self) -> bool {
        self.file_name_raw.last() == Some(&b'/')
    }

    pub fn is_encrypted(&self) -> bool {
        self.flags & FLAG_ENCRYPTED != 0
    }

    pub fn uses_data_descriptor(&self) -> bool {
        self.flags & FLAG_DATA_DESCRIPTOR != 0
    }

    pub fn uses_strong_encryption(&self) -> bool {
        self.flags & FLAG_STRONG_ENCRYPTION != 0
    }

    pub fn is_utf8(&self) -> bool {
        self.flags & FLAG_UTF8 != 0
    }

    /// MS-DOS date split: `(year, month, day)`.
    pub fn mod_date(&self) -> (u16, u8, u8) {
        let date = self.last_mod_date;
        (1980 + (date >> 9), ((date >> 5) & 0xf) as u8, (date & 0x1f) as u8)
    }

    /// MS-DOS time split: `(hour, minute, second)`. Seconds have two-second
    /// resolution.
    pub fn mod_time(&self) -> (u8, u8, u8) {
        let time = self.last_mod_time;
        (
            (time >> 11) as u8,
            ((time >> 5) & 0x3f) as u8,
            ((time & 0x1f) * 2) as u8,
        )
    }
}

/// An entry's local file header re-read from the source, with sizes resolved
/// against the central directory and the payload located.
#[derive(Debug, Clone)]
pub struct LocalFileEntry {
    pub version_to_extract: u16,
    pub flags: u16,
    pub compression_method: CompressionMethod,
    pub last_mod_time: u16,
    pub last_mod_date: u16,
    /// CRC from the local header; zero when deferred to a data descriptor.
    pub crc32: u32,
    /// On-disk payload size, encryption preamble excluded. Equals
    /// `uncompressed_size` for Stored entries.
    pub compressed_size: u64,
    pub uncompressed_size: u64,
    pub file_name_raw: Box<[u8]>,
    pub extra_fields: Vec<ExtraField>,
    /// The 12 cipher-stream initialization bytes of an encrypted entry.
    pub encryption_preamble: Option<[u8; 12]>,
    /// Absolute offset of the first payload byte.
    pub content_start: u64,
    /// The trailing record, when flag bit 3 announced one.
    pub data_descriptor: Option<DataDescriptor>,
    /// CRC recorded in the central directory for this entry.
    pub central_crc32: u32,
}

impl LocalFileEntry {
    pub fn is_encrypted(&self) -> bool {
        self.flags & FLAG_ENCRYPTED != 0
    }

    pub fn uses_strong_encryption(&self) -> bool {
        self.flags & FLAG_STRONG_ENCRYPTION != 0
    }

    /// The checksum the payload must match. A data descriptor wins over the
    /// local header; a zeroed local header value defers to the central
    /// directory.
    pub fn authoritative_crc32(&self) -> u32 {
        if let Some(descriptor) = &self.data_descriptor {
            descriptor.crc32
        } else if self.crc32 != 0 {
            self.crc32
        } else {
            self.central_crc32
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Cursor;

    fn cdfh_bytes(name: &[u8], extra: &[u8], comment: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&spec::CENTRAL_DIRECTORY_HEADER_SIGNATURE.to_le_bytes());
        out.extend_from_slice(&20u16.to_le_bytes()); // version_made_by
        out.extend_from_slice(&20u16.to_le_bytes()); // version_to_extract
        out.extend_from_slice(&0u16.to_le_bytes()); // flags
        out.extend_from_slice(&0u16.to_le_bytes()); // stored
        out.extend_from_slice(&0x6318u16.to_le_bytes()); // 12:24:48
        out.extend_from_slice(&0x5b41u16.to_le_bytes()); // 2025-10-01
        out.extend_from_slice(&0x363a3020u32.to_le_bytes());
        out.extend_from_slice(&6u32.to_le_bytes());
        out.extend_from_slice(&6u32.to_le_bytes());
        out.extend_from_slice(&(name.len() as u16).to_le_bytes());
        out.extend_from_slice(&(extra.len() as u16).to_le_bytes());
        out.extend_from_slice(&(comment.len() as u16).to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes()); // text file
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes()); // header at offset 0
        out.extend_from_slice(name);
        out.extend_from_slice(extra);
        out.extend_from_slice(comment);
        out
    }

    #[test]
    fn block_layouts_match_the_wire() {
        assert_eq!(size_of::<ZipCentralEntryBlock>(), 46);
        assert_eq!(size_of::<ZipLocalEntryBlock>(), 30);
    }

    #[test]
    fn parses_central_header() {
        let bytes = cdfh_bytes(b"hello.txt", b"", b"first entry");
        let mut cursor = Cursor::new(&bytes);
        let header = CentralDirectoryHeader::parse(&mut cursor, 512).unwrap();
        assert_eq!(header.file_name(), "hello.txt");
        assert_eq!(header.compression_method, CompressionMethod::Stored);
        assert_eq!(header.crc32, 0x363a3020);
        assert_eq!(header.header_start, 0);
        assert_eq!(header.central_header_start, 512);
        assert_eq!(&*header.file_comment_raw, b"first entry");
        assert!(!header.is_dir());
        assert!(!header.is_encrypted());
    }

    #[test]
    fn rejects_wrong_central_signature() {
        let mut bytes = cdfh_bytes(b"x", b"", b"");
        bytes[0] ^= 0xff;
        let mut cursor = Cursor::new(&bytes);
        assert!(matches!(
            CentralDirectoryHeader::parse(&mut cursor, 0),
            Err(ZipError::BadHeader(_))
        ));
    }

    #[test]
    fn dos_date_and_time_split() {
        let bytes = cdfh_bytes(b"a", b"", b"");
        let mut cursor = Cursor::new(&bytes);
        let header = CentralDirectoryHeader::parse(&mut cursor, 0).unwrap();
        assert_eq!(header.mod_date(), (2025, 10, 1));
        assert_eq!(header.mod_time(), (12, 24, 48));
    }

    #[test]
    fn directory_entries_end_with_slash() {
        let bytes = cdfh_bytes(b"docs/", b"", b"");
        let mut cursor = Cursor::new(&bytes);
        let header = CentralDirectoryHeader::parse(&mut cursor, 0).unwrap();
        assert!(header.is_dir());
    }

    #[test]
    fn compression_method_round_trip() {
        assert_eq!(CompressionMethod::parse_from_u16(0), CompressionMethod::Stored);
        assert_eq!(CompressionMethod::parse_from_u16(8), CompressionMethod::Deflated);
        assert_eq!(
            CompressionMethod::parse_from_u16(14),
            CompressionMethod::Unsupported(14)
        );
        assert_eq!(CompressionMethod::Deflated.serialize_to_u16(), 8);
    }

    #[test]
    fn authoritative_crc_prefers_descriptor() {
        let entry = LocalFileEntry {
            version_to_extract: 20,
            flags: FLAG_DATA_DESCRIPTOR,
            compression_method: CompressionMethod::Stored,
            last_mod_time: 0,
            last_mod_date: 0,
            crc32: 0,
            compressed_size: 4,
            uncompressed_size: 4,
            file_name_raw: b"x".to_vec().into_boxed_slice(),
            extra_fields: Vec::new(),
            encryption_preamble: None,
            content_start: 30,
            data_descriptor: Some(DataDescriptor {
                crc32: 0xdead_beef,
                compressed_size: 4,
                uncompressed_size: 4,
            }),
            central_crc32: 0x1111_1111,
        };
        assert_eq!(entry.authoritative_crc32(), 0xdead_beef);

        let no_descriptor = LocalFileEntry {
            data_descriptor: None,
            ..entry.clone()
        };
        assert_eq!(no_descriptor.authoritative_crc32(), 0x1111_1111);

        let local_crc = LocalFileEntry {
            data_descriptor: None,
            crc32: 0x2222_2222,
            ..entry
        };
        assert_eq!(local_crc.authoritative_crc32(), 0x2222_2222);
    }
}
