//! On-disk record layouts and the archive trailer parser.
//!
//! Every multi-byte integer in a ZIP archive is little-endian and every
//! record opens with a 32-bit magic constant. The fixed-size portion of each
//! record is modeled as a `#[repr(packed)]` struct read straight out of the
//! byte stream; variable-length tails (comments, hash data, extensible data)
//! are captured into owned buffers.

#![allow(clippy::wrong_self_convention)]

use crate::result::{ZipError, ZipResult};
use crate::source::ByteSource;
use memchr::memmem::FinderRev;
use std::io::Read;

pub type Magic = u32;

pub const LOCAL_FILE_HEADER_SIGNATURE: Magic = 0x04034b50;
pub const CENTRAL_DIRECTORY_HEADER_SIGNATURE: Magic = 0x02014b50;
pub const CENTRAL_DIRECTORY_END_SIGNATURE: Magic = 0x06054b50;
pub const ZIP64_CENTRAL_DIRECTORY_END_SIGNATURE: Magic = 0x06064b50;
pub const ZIP64_CENTRAL_DIRECTORY_END_LOCATOR_SIGNATURE: Magic = 0x07064b50;
pub const DIGITAL_SIGNATURE_SIGNATURE: Magic = 0x05054b50;
pub const ARCHIVE_EXTRA_DATA_SIGNATURE: Magic = 0x08064b50;
pub const DATA_DESCRIPTOR_SIGNATURE: Magic = 0x08074b50;

/// Length of the whole-archive decryption header preceding an archive
/// extra-data record.
pub const ARCHIVE_DECRYPTION_HEADER_LEN: usize = 12;

/// The end-of-central-directory record is 22 fixed bytes plus a comment of at
/// most `u16::MAX` bytes, so the trailer always lies within the last 65 557
/// bytes of the source.
pub const MAX_TRAILER_SPAN: u64 = (u16::MAX as u64) + 22;

/// Convert all the fields of a struct *from* little-endian representations.
macro_rules! from_le {
    ($obj:ident, $field:ident, $type:ty) => {
        $obj.$field = <$type>::from_le($obj.$field);
    };
    ($obj:ident, [($field:ident, $type:ty) $(,)?]) => {
        from_le![$obj, $field, $type];
    };
    ($obj:ident, [($field:ident, $type:ty), $($rest:tt),+ $(,)?]) => {
        from_le![$obj, $field, $type];
        from_le!($obj, [$($rest),+]);
    };
}
pub(crate) use from_le;

/// A record whose fixed-size portion can be reinterpreted directly from a
/// byte slice of exactly `size_of::<Self>()` bytes.
pub(crate) trait FixedSizeBlock: Sized + Copy {
    const MAGIC: Magic;
    const WRONG_MAGIC_ERROR: ZipError;

    fn magic(self) -> Magic;

    fn from_le(self) -> Self;

    fn deserialize(block: &[u8]) -> Self {
        assert_eq!(block.len(), size_of::<Self>());
        let block_ptr: *const Self = block.as_ptr().cast();
        // Blocks are repr(packed), so the read is alignment-free.
        unsafe { block_ptr.read() }
    }

    fn interpret(bytes: &[u8]) -> ZipResult<Self> {
        let block = Self::deserialize(bytes).from_le();
        if block.magic() != Self::MAGIC {
            return Err(Self::WRONG_MAGIC_ERROR);
        }
        Ok(block)
    }

    fn parse<T: Read>(reader: &mut T) -> ZipResult<Self> {
        let mut block = vec![0u8; size_of::<Self>()];
        reader.read_exact(&mut block)?;
        Self::interpret(&block)
    }
}

#[derive(Copy, Clone, Debug)]
#[repr(packed)]
pub(crate) struct EocdBlock {
    pub magic: Magic,
    pub disk_number: u16,
    pub disk_with_central_directory: u16,
    pub number_of_files_on_this_disk: u16,
    pub number_of_files: u16,
    pub central_directory_size: u32,
    pub central_directory_offset: u32,
    pub zip_file_comment_length: u16,
}

impl FixedSizeBlock for EocdBlock {
    const MAGIC: Magic = CENTRAL_DIRECTORY_END_SIGNATURE;
    const WRONG_MAGIC_ERROR: ZipError =
        ZipError::BadTrailer("invalid end-of-central-directory signature");

    fn magic(self) -> Magic {
        self.magic
    }

    #[inline(always)]
    fn from_le(mut self) -> Self {
        from_le![
            self,
            [
                (magic, Magic),
                (disk_number, u16),
                (disk_with_central_directory, u16),
                (number_of_files_on_this_disk, u16),
                (number_of_files, u16),
                (central_directory_size, u32),
                (central_directory_offset, u32),
                (zip_file_comment_length, u16),
            ]
        ];
        self
    }
}

/// The end-of-central-directory record, comment included.
#[derive(Debug, Clone)]
pub struct EndOfCentralDirectory {
    pub disk_number: u16,
    pub disk_with_central_directory: u16,
    pub number_of_files_on_this_disk: u16,
    pub number_of_files: u16,
    pub central_directory_size: u32,
    pub central_directory_offset: u32,
    pub zip_file_comment: Box<[u8]>,
}

impl EndOfCentralDirectory {
    fn from_parts(block: EocdBlock, zip_file_comment: Box<[u8]>) -> Self {
        let EocdBlock {
            disk_number,
            disk_with_central_directory,
            number_of_files_on_this_disk,
            number_of_files,
            central_directory_size,
            central_directory_offset,
            ..
        } = block;
        Self {
            disk_number,
            disk_with_central_directory,
            number_of_files_on_this_disk,
            number_of_files,
            central_directory_size,
            central_directory_offset,
            zip_file_comment,
        }
    }

    /// Whether any field carries the "use ZIP64" sentinel value.
    pub fn needs_zip64(&self) -> bool {
        self.disk_number == u16::MAX
            || self.number_of_files_on_this_disk == u16::MAX
            || self.number_of_files == u16::MAX
            || self.central_directory_size == u32::MAX
            || self.central_directory_offset == u32::MAX
    }
}

#[derive(Copy, Clone, Debug)]
#[repr(packed)]
pub(crate) struct Zip64LocatorBlock {
    pub magic: Magic,
    pub disk_with_central_directory: u32,
    pub end_of_central_directory_offset: u64,
    pub number_of_disks: u32,
}

impl FixedSizeBlock for Zip64LocatorBlock {
    const MAGIC: Magic = ZIP64_CENTRAL_DIRECTORY_END_LOCATOR_SIGNATURE;
    const WRONG_MAGIC_ERROR: ZipError = ZipError::BadTrailer("invalid zip64 locator signature");

    fn magic(self) -> Magic {
        self.magic
    }

    #[inline(always)]
    fn from_le(mut self) -> Self {
        from_le![
            self,
            [
                (magic, Magic),
                (disk_with_central_directory, u32),
                (end_of_central_directory_offset, u64),
                (number_of_disks, u32),
            ]
        ];
        self
    }
}

/// The ZIP64 end-of-central-directory locator.
#[derive(Debug, Clone, Copy)]
pub struct Zip64EndOfCentralDirectoryLocator {
    pub disk_with_central_directory: u32,
    pub end_of_central_directory_offset: u64,
    pub number_of_disks: u32,
}

impl Zip64EndOfCentralDirectoryLocator {
    pub(crate) fn parse<T: Read>(reader: &mut T) -> ZipResult<Self> {
        let Zip64LocatorBlock {
            disk_with_central_directory,
            end_of_central_directory_offset,
            number_of_disks,
            ..
        } = Zip64LocatorBlock::parse(reader)?;
        Ok(Self {
            disk_with_central_directory,
            end_of_central_directory_offset,
            number_of_disks,
        })
    }
}

#[derive(Copy, Clone, Debug)]
#[repr(packed)]
pub(crate) struct Zip64EocdBlock {
    pub magic: Magic,
    pub record_size: u64,
    pub version_made_by: u16,
    pub version_needed_to_extract: u16,
    pub disk_number: u32,
    pub disk_with_central_directory: u32,
    pub number_of_files_on_this_disk: u64,
    pub number_of_files: u64,
    pub central_directory_size: u64,
    pub central_directory_offset: u64,
}

impl FixedSizeBlock for Zip64EocdBlock {
    const MAGIC: Magic = ZIP64_CENTRAL_DIRECTORY_END_SIGNATURE;
    const WRONG_MAGIC_ERROR: ZipError =
        ZipError::BadTrailer("invalid zip64 end-of-central-directory signature");

    fn magic(self) -> Magic {
        self.magic
    }

    #[inline(always)]
    fn from_le(mut self) -> Self {
        from_le![
            self,
            [
                (magic, Magic),
                (record_size, u64),
                (version_made_by, u16),
                (version_needed_to_extract, u16),
                (disk_number, u32),
                (disk_with_central_directory, u32),
                (number_of_files_on_this_disk, u64),
                (number_of_files, u64),
                (central_directory_size, u64),
                (central_directory_offset, u64),
            ]
        ];
        self
    }
}

/// The central-directory-encryption block appended to a version-2 ZIP64
/// end-of-central-directory record.
#[derive(Debug, Clone)]
pub struct Zip64EocdVersion2 {
    pub compression_method: u64,
    pub compressed_size: u64,
    pub original_size: u64,
    pub alg_id: u16,
    pub bit_len: u16,
    pub flags: u16,
    pub hash_id: u16,
    pub hash_data: Box<[u8]>,
}

/// Fixed bytes of the version-2 block, excluding the trailing hash data.
const ZIP64_EOCD_V2_FIXED_LEN: u64 = 34;
/// Fixed bytes of the ZIP64 end record counted by its `record_size` field
/// (everything after the magic and the size field itself).
const ZIP64_EOCD_FIXED_LEN: u64 = 44;

impl Zip64EocdVersion2 {
    fn parse<S: ByteSource>(source: &mut S) -> ZipResult<Self> {
        let compression_method = source.read_u64_le()?;
        let compressed_size = source.read_u64_le()?;
        let original_size = source.read_u64_le()?;
        let alg_id = source.read_u16_le()?;
        let bit_len = source.read_u16_le()?;
        let flags = source.read_u16_le()?;
        let hash_id = source.read_u16_le()?;
        let hash_length = source.read_u16_le()?;
        let hash_data = source.read_exact_vec(hash_length as usize)?.into();
        Ok(Self {
            compression_method,
            compressed_size,
            original_size,
            alg_id,
            bit_len,
            flags,
            hash_id,
            hash_data,
        })
    }
}

/// The ZIP64 end-of-central-directory record, including the version-2
/// extension block and the extensible data sector when present.
#[derive(Debug, Clone)]
pub struct Zip64EndOfCentralDirectory {
    pub record_size: u64,
    pub version_made_by: u16,
    pub version_needed_to_extract: u16,
    pub disk_number: u32,
    pub disk_with_central_directory: u32,
    pub number_of_files_on_this_disk: u64,
    pub number_of_files: u64,
    pub central_directory_size: u64,
    pub central_directory_offset: u64,
    pub version_2: Option<Zip64EocdVersion2>,
    pub extensible_data: Box<[u8]>,
}

impl Zip64EndOfCentralDirectory {
    pub(crate) fn parse<S: ByteSource>(source: &mut S) -> ZipResult<Self> {
        let Zip64EocdBlock {
            record_size,
            version_made_by,
            version_needed_to_extract,
            disk_number,
            disk_with_central_directory,
            number_of_files_on_this_disk,
            number_of_files,
            central_directory_size,
            central_directory_offset,
            ..
        } = Zip64EocdBlock::parse(source)?;

        let version_2 = if version_made_by == 2 {
            Some(Zip64EocdVersion2::parse(source)?)
        } else {
            None
        };

        // record_size counts everything after the first 12 bytes, so the
        // extensible data sector is whatever it covers beyond the fixed
        // fields (and beyond the version-2 block, when present).
        let extensible_len = match version_made_by {
            1 => record_size
                .checked_sub(ZIP64_EOCD_FIXED_LEN)
                .ok_or(ZipError::BadTrailer("zip64 end record size too small"))?,
            2 => {
                let hash_len = version_2.as_ref().map_or(0, |v2| v2.hash_data.len() as u64);
                record_size
                    .checked_sub(ZIP64_EOCD_FIXED_LEN + ZIP64_EOCD_V2_FIXED_LEN + hash_len)
                    .ok_or(ZipError::BadTrailer("zip64 end record size too small"))?
            }
            _ => 0,
        };
        if extensible_len > MAX_TRAILER_SPAN {
            return Err(ZipError::BadTrailer(
                "zip64 extensible data unreasonably large",
            ));
        }
        let extensible_data = source.read_exact_vec(extensible_len as usize)?.into();

        Ok(Self {
            record_size,
            version_made_by,
            version_needed_to_extract,
            disk_number,
            disk_with_central_directory,
            number_of_files_on_this_disk,
            number_of_files,
            central_directory_size,
            central_directory_offset,
            version_2,
            extensible_data,
        })
    }
}

/// An opaque signed blob over the central directory. Captured, never
/// verified.
#[derive(Debug, Clone)]
pub struct DigitalSignature {
    pub data: Box<[u8]>,
}

/// The whole-archive extra-data record together with the 12-byte archive
/// decryption header that precedes it.
#[derive(Debug, Clone)]
pub struct ArchiveExtraData {
    pub decryption_header: Box<[u8]>,
    pub extra_field_data: Box<[u8]>,
}

/// Everything found at the tail of an archive: the end record itself, the
/// optional ZIP64 pair, and the optional signature/extra-data companions.
#[derive(Debug, Clone)]
pub struct Trailer {
    pub eocd: EndOfCentralDirectory,
    pub eocd_start: u64,
    pub zip64_locator: Option<Zip64EndOfCentralDirectoryLocator>,
    pub zip64_eocd: Option<Zip64EndOfCentralDirectory>,
    pub digital_signature: Option<DigitalSignature>,
    pub archive_extra_data: Option<ArchiveExtraData>,
    cd_start: u64,
    cd_size: u64,
    cd_records: u64,
}

impl Trailer {
    /// Locate and parse the archive trailer.
    ///
    /// The end-of-central-directory signature is hunted backwards through the
    /// last [`MAX_TRAILER_SPAN`] bytes. A candidate is only accepted if its
    /// comment-length field makes the record run exactly to the end of the
    /// source; this disambiguates signatures embedded in the comment itself.
    pub fn find_and_parse<S: ByteSource>(source: &mut S) -> ZipResult<Trailer> {
        let end = source.end_pos()?;
        if end < size_of::<EocdBlock>() as u64 {
            return Err(ZipError::NotAnArchive);
        }

        let span = end.min(MAX_TRAILER_SPAN);
        let window_start = end - span;
        source.seek_to(window_start)?;
        let window = source.read_exact_vec(span as usize)?;

        let sig_bytes = CENTRAL_DIRECTORY_END_SIGNATURE.to_le_bytes();
        let finder = FinderRev::new(&sig_bytes);

        let mut saw_candidate = false;
        let mut found = None;
        for offset in finder.rfind_iter(&window) {
            saw_candidate = true;
            let fixed_end = offset + size_of::<EocdBlock>();
            if fixed_end > window.len() {
                continue;
            }
            let Ok(block) = EocdBlock::interpret(&window[offset..fixed_end]) else {
                continue;
            };
            if window.len() - fixed_end != block.zip_file_comment_length as usize {
                continue;
            }
            let comment = window[fixed_end..].to_vec().into_boxed_slice();
            found = Some((
                EndOfCentralDirectory::from_parts(block, comment),
                window_start + offset as u64,
            ));
            break;
        }
        let Some((eocd, eocd_start)) = found else {
            return Err(if saw_candidate {
                ZipError::BadTrailer("end-of-central-directory comment does not reach end of file")
            } else {
                ZipError::NotAnArchive
            });
        };

        let (zip64_locator, zip64_eocd) = if eocd.needs_zip64() {
            let locator_start = eocd_start
                .checked_sub(size_of::<Zip64LocatorBlock>() as u64)
                .ok_or(ZipError::BadTrailer(
                    "no room for zip64 locator before end record",
                ))?;
            source.seek_to(locator_start)?;
            let locator = Zip64EndOfCentralDirectoryLocator::parse(source)?;
            if locator.end_of_central_directory_offset >= locator_start {
                return Err(ZipError::BadTrailer("zip64 end record offset out of bounds"));
            }
            source.seek_to(locator.end_of_central_directory_offset)?;
            let record = Zip64EndOfCentralDirectory::parse(source)?;
            (Some(locator), Some(record))
        } else {
            (None, None)
        };

        let (cd_offset, cd_size, cd_records) = match &zip64_eocd {
            Some(record) => (
                record.central_directory_offset,
                record.central_directory_size,
                record.number_of_files,
            ),
            None => (
                eocd.central_directory_offset as u64,
                eocd.central_directory_size as u64,
                eocd.number_of_files as u64,
            ),
        };
        if cd_offset.checked_add(cd_size).is_none_or(|cd_end| cd_end > end) {
            return Err(ZipError::BadTrailer(
                "central directory extends past end of file",
            ));
        }

        // Whole-archive encryption: an extra-data record at the recorded
        // directory offset, preceded by a 12-byte decryption header. The
        // directory headers themselves then follow the record.
        let mut archive_extra_data = None;
        let mut cd_start = cd_offset;
        if cd_offset + 8 <= end {
            source.seek_to(cd_offset)?;
            if source.read_u32_le()? == ARCHIVE_EXTRA_DATA_SIGNATURE {
                let header_start = cd_offset
                    .checked_sub(ARCHIVE_DECRYPTION_HEADER_LEN as u64)
                    .ok_or(ZipError::BadTrailer(
                        "archive extra-data record without preceding decryption header",
                    ))?;
                source.seek_to(header_start)?;
                let decryption_header =
                    source.read_exact_vec(ARCHIVE_DECRYPTION_HEADER_LEN)?.into();
                source.seek_to(cd_offset + 4)?;
                let data_len = source.read_u32_le()? as u64;
                if cd_offset + 8 + data_len > end {
                    return Err(ZipError::BadTrailer("archive extra-data record truncated"));
                }
                let extra_field_data = source.read_exact_vec(data_len as usize)?.into();
                cd_start = source.pos()?;
                archive_extra_data = Some(ArchiveExtraData {
                    decryption_header,
                    extra_field_data,
                });
            }
        }

        // An optional signed blob sits between the last directory header and
        // the trailer records.
        let mut digital_signature = None;
        if let Some(sig_pos) = cd_start.checked_add(cd_size) {
            if sig_pos + 6 <= end {
                source.seek_to(sig_pos)?;
                if source.read_u32_le()? == DIGITAL_SIGNATURE_SIGNATURE {
                    let data_len = source.read_u16_le()? as u64;
                    if sig_pos + 6 + data_len <= end {
                        digital_signature = Some(DigitalSignature {
                            data: source.read_exact_vec(data_len as usize)?.into(),
                        });
                    }
                }
            }
        }

        Ok(Trailer {
            eocd,
            eocd_start,
            zip64_locator,
            zip64_eocd,
            digital_signature,
            archive_extra_data,
            cd_start,
            cd_size,
            cd_records,
        })
    }

    /// Resolved location of the central directory headers:
    /// `(start offset, size in bytes, record count)`.
    pub fn central_directory(&self) -> (u64, u64, u64) {
        (self.cd_start, self.cd_size, self.cd_records)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Cursor;

    fn eocd_bytes(records: u16, cd_size: u32, cd_offset: u32, comment: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&CENTRAL_DIRECTORY_END_SIGNATURE.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(&records.to_le_bytes());
        out.extend_from_slice(&records.to_le_bytes());
        out.extend_from_slice(&cd_size.to_le_bytes());
        out.extend_from_slice(&cd_offset.to_le_bytes());
        out.extend_from_slice(&(comment.len() as u16).to_le_bytes());
        out.extend_from_slice(comment);
        out
    }

    #[test]
    fn block_layouts_match_the_wire() {
        assert_eq!(size_of::<EocdBlock>(), 22);
        assert_eq!(size_of::<Zip64LocatorBlock>(), 20);
        assert_eq!(size_of::<Zip64EocdBlock>(), 56);
    }

    #[test]
    fn parses_plain_eocd() {
        let bytes = eocd_bytes(1, 47, 31, b"");
        // Destructure to copy out of the packed block.
        let EocdBlock {
            number_of_files,
            central_directory_size,
            central_directory_offset,
            zip_file_comment_length,
            ..
        } = EocdBlock::interpret(&bytes).unwrap();
        assert_eq!(number_of_files, 1);
        assert_eq!(central_directory_size, 47);
        assert_eq!(central_directory_offset, 31);
        assert_eq!(zip_file_comment_length, 0);
    }

    #[test]
    fn rejects_wrong_magic() {
        let mut bytes = eocd_bytes(0, 0, 0, b"");
        bytes[0] = b'Q';
        assert!(matches!(
            EocdBlock::interpret(&bytes[..22]),
            Err(ZipError::BadTrailer(_))
        ));
    }

    #[test]
    fn tiny_source_is_not_an_archive() {
        let mut source = Cursor::new(vec![0u8; 10]);
        assert!(matches!(
            Trailer::find_and_parse(&mut source),
            Err(ZipError::NotAnArchive)
        ));
    }

    #[test]
    fn garbage_source_is_not_an_archive() {
        let mut source = Cursor::new(vec![0xa5u8; 256]);
        assert!(matches!(
            Trailer::find_and_parse(&mut source),
            Err(ZipError::NotAnArchive)
        ));
    }

    #[test]
    fn finds_eocd_with_comment() {
        let mut source = Cursor::new(eocd_bytes(0, 0, 0, b"hello trailer"));
        let trailer = Trailer::find_and_parse(&mut source).unwrap();
        assert_eq!(&*trailer.eocd.zip_file_comment, b"hello trailer");
        assert_eq!(trailer.eocd_start, 0);
        assert_eq!(trailer.central_directory(), (0, 0, 0));
    }

    #[test]
    fn skips_misaligned_signature_inside_comment() {
        // The comment embeds a fake end record whose comment-length field
        // cannot reach the end of the file.
        let mut comment = Vec::new();
        comment.extend_from_slice(&CENTRAL_DIRECTORY_END_SIGNATURE.to_le_bytes());
        comment.extend_from_slice(b" definitely not the real trailer");
        let mut source = Cursor::new(eocd_bytes(0, 0, 0, &comment));
        let trailer = Trailer::find_and_parse(&mut source).unwrap();
        assert_eq!(trailer.eocd_start, 0);
        assert_eq!(&*trailer.eocd.zip_file_comment, &comment[..]);
    }

    #[test]
    fn truncated_comment_is_a_bad_trailer() {
        let mut bytes = eocd_bytes(0, 0, 0, b"");
        // Claim a comment that is not actually there.
        bytes[20] = 5;
        let mut source = Cursor::new(bytes);
        assert!(matches!(
            Trailer::find_and_parse(&mut source),
            Err(ZipError::BadTrailer(_))
        ));
    }

    #[test]
    fn central_directory_past_eof_is_rejected() {
        let mut source = Cursor::new(eocd_bytes(1, 4096, 4096, b""));
        assert!(matches!(
            Trailer::find_and_parse(&mut source),
            Err(ZipError::BadTrailer(_))
        ));
    }

    #[test]
    fn parses_zip64_version_2_block() {
        let hash = b"\x01\x02\x03\x04";
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&ZIP64_CENTRAL_DIRECTORY_END_SIGNATURE.to_le_bytes());
        let record_size = 44 + 34 + hash.len() as u64;
        bytes.extend_from_slice(&record_size.to_le_bytes());
        bytes.extend_from_slice(&2u16.to_le_bytes()); // version_made_by: 2
        bytes.extend_from_slice(&62u16.to_le_bytes());
        bytes.extend_from_slice(&0u32.to_le_bytes());
        bytes.extend_from_slice(&0u32.to_le_bytes());
        bytes.extend_from_slice(&3u64.to_le_bytes());
        bytes.extend_from_slice(&3u64.to_le_bytes());
        bytes.extend_from_slice(&160u64.to_le_bytes());
        bytes.extend_from_slice(&8192u64.to_le_bytes());
        // version-2 block
        bytes.extend_from_slice(&8u64.to_le_bytes()); // compression_method
        bytes.extend_from_slice(&100u64.to_le_bytes()); // compressed_size
        bytes.extend_from_slice(&200u64.to_le_bytes()); // original_size
        bytes.extend_from_slice(&0x660eu16.to_le_bytes()); // alg_id: AES-256
        bytes.extend_from_slice(&256u16.to_le_bytes()); // bit_len
        bytes.extend_from_slice(&1u16.to_le_bytes()); // flags
        bytes.extend_from_slice(&0x8004u16.to_le_bytes()); // hash_id: SHA-1
        bytes.extend_from_slice(&(hash.len() as u16).to_le_bytes());
        bytes.extend_from_slice(hash);

        let mut source = Cursor::new(bytes);
        let record = Zip64EndOfCentralDirectory::parse(&mut source).unwrap();
        assert_eq!(record.number_of_files, 3);
        assert_eq!(record.central_directory_offset, 8192);
        let v2 = record.version_2.unwrap();
        assert_eq!(v2.compression_method, 8);
        assert_eq!(v2.alg_id, 0x660e);
        assert_eq!(&*v2.hash_data, hash);
        assert!(record.extensible_data.is_empty());
    }

    #[test]
    fn zip64_version_1_extensible_data() {
        let extensible = b"vendor-data";
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&ZIP64_CENTRAL_DIRECTORY_END_SIGNATURE.to_le_bytes());
        bytes.extend_from_slice(&(44 + extensible.len() as u64).to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes()); // version_made_by: 1
        bytes.extend_from_slice(&45u16.to_le_bytes());
        bytes.extend_from_slice(&0u32.to_le_bytes());
        bytes.extend_from_slice(&0u32.to_le_bytes());
        bytes.extend_from_slice(&1u64.to_le_bytes());
        bytes.extend_from_slice(&1u64.to_le_bytes());
        bytes.extend_from_slice(&47u64.to_le_bytes());
        bytes.extend_from_slice(&31u64.to_le_bytes());
        bytes.extend_from_slice(extensible);

        let mut source = Cursor::new(bytes);
        let record = Zip64EndOfCentralDirectory::parse(&mut source).unwrap();
        assert!(record.version_2.is_none());
        assert_eq!(&*record.extensible_data, extensible);
    }
}
