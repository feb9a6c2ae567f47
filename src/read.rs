//! Types for reading ZIP archives

use crate::crc32::Crc32Reader;
use crate::extra_fields::{self, ExtraField};
use crate::result::{ZipError, ZipResult, unpack_io_error};
use crate::source::ByteSource;
use crate::spec::{self, FixedSizeBlock, Trailer};
use crate::types::{
    CentralDirectoryHeader, CompressionMethod, DataDescriptor, LocalFileEntry, ZipLocalEntryBlock,
    read_variable_length_byte_field,
};
use crate::zipcrypto::ZipCryptoKeys;
use flate2::read::DeflateDecoder;
use indexmap::IndexMap;
use memchr::memmem;
use std::error::Error;
use std::io::{Cursor, Read};

/// How entry payloads should be decrypted during extraction.
#[derive(Debug, Clone, Default)]
pub enum EncryptionMethod {
    /// Encrypted entries are an error.
    #[default]
    None,
    /// Decrypt with the legacy PKWARE stream cipher using this password.
    Password(Vec<u8>),
    /// Certificate-based decryption. Recognized, never supported: extracting
    /// an encrypted entry with this method reports
    /// [`ZipError::UnsupportedEncryption`].
    X509,
}

/// Per-call extraction options.
#[derive(Debug, Clone, Default)]
pub struct ReadOptions {
    pub encryption: EncryptionMethod,
}

impl ReadOptions {
    pub fn with_password(password: impl Into<Vec<u8>>) -> Self {
        Self {
            encryption: EncryptionMethod::Password(password.into()),
        }
    }
}

/// Callback receiving each extracted entry: the stored file name and the
/// fully decompressed contents. Returning an error halts the extraction
/// call; the error comes back as [`ZipError::Receiver`].
///
/// Implemented for every matching `FnMut` closure.
pub trait ContentReceiver {
    fn receive(
        &mut self,
        name: &[u8],
        contents: &[u8],
    ) -> Result<(), Box<dyn Error + Send + Sync>>;
}

impl<F> ContentReceiver for F
where
    F: FnMut(&[u8], &[u8]) -> Result<(), Box<dyn Error + Send + Sync>>,
{
    fn receive(
        &mut self,
        name: &[u8],
        contents: &[u8],
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        self(name, contents)
    }
}

/// ZIP archive reader over any seekable byte source.
///
/// Construction parses the trailer and the whole central directory; entry
/// payloads are only touched during extraction.
#[derive(Debug)]
pub struct ZipArchive<R> {
    reader: R,
    trailer: Trailer,
    entries: Vec<CentralDirectoryHeader>,
    names: IndexMap<Box<str>, usize>,
}

impl<R: ByteSource> ZipArchive<R> {
    /// Read an archive's trailer and central directory from `reader`.
    pub fn new(mut reader: R) -> ZipResult<Self> {
        let trailer = Trailer::find_and_parse(&mut reader)?;
        let (cd_start, cd_size, cd_records) = trailer.central_directory();

        // The directory is captured in one read, then parsed from memory.
        reader.seek_to(cd_start)?;
        let cd_len = usize::try_from(cd_size)
            .map_err(|_| ZipError::BadTrailer("central directory too large for this platform"))?;
        let cd_bytes = reader.read_exact_vec(cd_len)?;
        let mut directory = Cursor::new(cd_bytes);

        let capacity = (cd_records as usize).min(cd_len / 46 + 1);
        let mut entries = Vec::with_capacity(capacity);
        let mut names = IndexMap::with_capacity(capacity);
        for _ in 0..cd_records {
            let header_offset = cd_start + directory.position();
            let header = CentralDirectoryHeader::parse(&mut directory, header_offset)?;
            names.insert(header.file_name().into_boxed_str(), entries.len());
            entries.push(header);
        }

        Ok(Self {
            reader,
            trailer,
            entries,
            names,
        })
    }

    /// Number of entries in the central directory.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The archive comment stored after the end-of-central-directory record.
    pub fn comment(&self) -> &[u8] {
        &self.trailer.eocd.zip_file_comment
    }

    /// Entry names in central directory order.
    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.names.keys().map(Box::as_ref)
    }

    pub fn index_for_name(&self, name: &str) -> Option<usize> {
        self.names.get(name).copied()
    }

    pub fn name_for_index(&self, index: usize) -> Option<&str> {
        self.names
            .get_index(index)
            .map(|(name, _)| Box::as_ref(name))
    }

    /// Parsed central directory metadata for one entry.
    pub fn entry(&self, index: usize) -> Option<&CentralDirectoryHeader> {
        self.entries.get(index)
    }

    /// The records found at the tail of the archive.
    pub fn trailer(&self) -> &Trailer {
        &self.trailer
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Re-read an entry's local file header from the source and locate its
    /// payload.
    ///
    /// Sizes zeroed in the local header fall back to the central directory
    /// values; a trailing data descriptor, when announced, overrides both.
    /// A Stored payload is sized by its uncompressed size. For entries under
    /// the legacy cipher the 12-byte preamble is captured and excluded from
    /// `compressed_size`.
    pub fn read_local_entry(&mut self, index: usize) -> ZipResult<LocalFileEntry> {
        let header = self
            .entries
            .get(index)
            .ok_or(ZipError::BadHeader("no such entry"))?
            .clone();
        let reader = &mut self.reader;

        reader.seek_to(header.header_start)?;
        let block = ZipLocalEntryBlock::parse(reader)?;
        let file_name_raw =
            read_variable_length_byte_field(reader, block.file_name_length as usize)?;
        let extra_field_raw =
            read_variable_length_byte_field(reader, block.extra_field_length as usize)?;
        let mut fields = Vec::new();
        extra_fields::walk(&extra_field_raw, &mut |field: ExtraField| -> ZipResult<()> {
            fields.push(field);
            Ok(())
        })?;

        let method = CompressionMethod::parse_from_u16(block.compression_method);
        let stored_compressed = if block.compressed_size != 0 {
            block.compressed_size as u64
        } else {
            header.compressed_size as u64
        };
        let mut uncompressed_size = if block.uncompressed_size != 0 {
            block.uncompressed_size as u64
        } else {
            header.uncompressed_size as u64
        };

        // The 12-byte preamble belongs to the legacy cipher only; entries
        // under strong encryption (bit 6) carry their own headers inside
        // the payload and are rejected later during extraction.
        let mut encryption_preamble = None;
        if block.flags & 0b1 != 0 && block.flags & 0b100_0000 == 0 {
            let mut preamble = [0u8; 12];
            reader.read_exact(&mut preamble)?;
            encryption_preamble = Some(preamble);
        }
        let content_start = reader.pos()?;

        // On-disk payload window: a Stored payload occupies exactly its
        // uncompressed size; anything else occupies the compressed size,
        // minus the preamble those 32-bit fields also count.
        let payload_window = |compressed: u64, uncompressed: u64| -> ZipResult<u64> {
            match method {
                CompressionMethod::Stored => Ok(uncompressed),
                _ if encryption_preamble.is_some() => {
                    compressed.checked_sub(12).ok_or(ZipError::BadHeader(
                        "encrypted entry shorter than its cipher preamble",
                    ))
                }
                _ => Ok(compressed),
            }
        };
        let mut compressed_size = payload_window(stored_compressed, uncompressed_size)?;

        let mut data_descriptor = None;
        if block.flags & 0b1000 != 0 {
            reader.seek_to(content_start + compressed_size)?;
            // The descriptor's leading signature is optional; a first word
            // matching it is taken as the signature.
            let first = reader.read_u32_le()?;
            let crc32 = if first == spec::DATA_DESCRIPTOR_SIGNATURE {
                reader.read_u32_le()?
            } else {
                first
            };
            let descriptor = DataDescriptor {
                crc32,
                compressed_size: reader.read_u32_le()?,
                uncompressed_size: reader.read_u32_le()?,
            };
            uncompressed_size = descriptor.uncompressed_size as u64;
            compressed_size =
                payload_window(descriptor.compressed_size as u64, uncompressed_size)?;
            data_descriptor = Some(descriptor);
        }

        Ok(LocalFileEntry {
            version_to_extract: block.version_to_extract,
            flags: block.flags,
            compression_method: method,
            last_mod_time: block.last_mod_time,
            last_mod_date: block.last_mod_date,
            crc32: block.crc32,
            compressed_size,
            uncompressed_size,
            file_name_raw,
            extra_fields: fields,
            encryption_preamble,
            content_start,
            data_descriptor,
            central_crc32: header.crc32,
        })
    }

    /// Extract every entry whose stored name contains at least one of the
    /// `filters` as a byte substring (no filters: every entry), delivering
    /// each decompressed payload to `receiver` in central directory order.
    ///
    /// Any error halts the call. Entries already delivered stay delivered,
    /// and the archive remains usable for further calls.
    pub fn extract<F: AsRef<[u8]>, C: ContentReceiver + ?Sized>(
        &mut self,
        filters: &[F],
        options: &ReadOptions,
        receiver: &mut C,
    ) -> ZipResult<()> {
        let mut compressed_buf = Vec::new();
        let mut contents_buf = Vec::new();

        for index in 0..self.entries.len() {
            let name = &self.entries[index].file_name_raw;
            if !filters.is_empty()
                && !filters
                    .iter()
                    .any(|filter| memmem::find(name, filter.as_ref()).is_some())
            {
                continue;
            }
            let name = name.clone();

            let entry = self.read_local_entry(index)?;
            if entry.uses_strong_encryption() {
                return Err(ZipError::UnsupportedEncryption(
                    "strong encryption is not supported",
                ));
            }
            let password = if entry.is_encrypted() {
                match &options.encryption {
                    EncryptionMethod::Password(password) => Some(password.as_slice()),
                    EncryptionMethod::None => {
                        return Err(ZipError::UnsupportedEncryption(
                            "entry is encrypted and no password was supplied",
                        ));
                    }
                    EncryptionMethod::X509 => {
                        return Err(ZipError::UnsupportedEncryption(
                            "certificate-based decryption is not supported",
                        ));
                    }
                }
            } else {
                None
            };

            self.reader.seek_to(entry.content_start)?;
            compressed_buf.clear();
            compressed_buf.resize(entry.compressed_size as usize, 0);
            self.reader.read_exact(&mut compressed_buf)?;

            if let (Some(preamble), Some(password)) = (entry.encryption_preamble, password) {
                let mut keys = ZipCryptoKeys::derive(password);
                let mut preamble = preamble;
                keys.decrypt_in_place(&mut preamble);
                keys.decrypt_in_place(&mut compressed_buf);
            }

            let crc32 = entry.authoritative_crc32();
            contents_buf.clear();
            match entry.compression_method {
                CompressionMethod::Stored => {
                    let mut checked = Crc32Reader::new(compressed_buf.as_slice(), crc32);
                    checked
                        .read_to_end(&mut contents_buf)
                        .map_err(unpack_io_error)?;
                }
                CompressionMethod::Deflated => {
                    let decoder = DeflateDecoder::new(compressed_buf.as_slice());
                    let mut checked = Crc32Reader::new(decoder, crc32);
                    checked
                        .read_to_end(&mut contents_buf)
                        .map_err(unpack_io_error)?;
                }
                CompressionMethod::Unsupported(id) => {
                    return Err(ZipError::UnsupportedCompression(id));
                }
            }

            receiver
                .receive(&name, &contents_buf)
                .map_err(ZipError::Receiver)?;
        }
        Ok(())
    }

    /// [`Self::extract`] with no name filters.
    pub fn extract_all<C: ContentReceiver + ?Sized>(
        &mut self,
        options: &ReadOptions,
        receiver: &mut C,
    ) -> ZipResult<()> {
        self.extract::<&[u8], C>(&[], options, receiver)
    }
}
