//! Types for extra fields
//!
//! Both header variants carry an opaque blob of type-length-value records.
//! [`walk`] decodes the blob record by record and hands each one to a
//! handler; IDs this crate does not model are reported as
//! [`ExtraField::Unknown`] and skipped, so a single exotic field never sinks
//! the whole entry.

mod extended_timestamp;
mod unix_uid_gid;

pub use extended_timestamp::ExtendedTimestamp;
pub use unix_uid_gid::UnixUidGid;

use crate::result::ZipResult;

/// extended timestamp, as described in <https://libzip.org/specifications/extrafld.txt>
pub const EXTENDED_TIMESTAMP_ID: u16 = 0x5455;
/// Info-ZIP "new" Unix uid/gid field
pub const UNIX_UID_GID_ID: u16 = 0x7875;

/// contains one extra field
#[derive(Debug, Clone)]
pub enum ExtraField {
    /// extended timestamp, as described in <https://libzip.org/specifications/extrafld.txt>
    ExtendedTimestamp(ExtendedTimestamp),

    /// Info-ZIP "new" Unix field carrying uid/gid
    UnixUidGid(UnixUidGid),

    /// any field this crate does not model, kept verbatim
    Unknown {
        /// the header ID as stored
        id: u16,
        /// the field body as stored
        data: Box<[u8]>,
    },
}

/// Receives decoded fields during a [`walk`]. Implemented for every
/// `FnMut(ExtraField) -> ZipResult<()>`.
pub trait ExtraFieldHandler {
    fn handle(&mut self, field: ExtraField) -> ZipResult<()>;
}

impl<F: FnMut(ExtraField) -> ZipResult<()>> ExtraFieldHandler for F {
    fn handle(&mut self, field: ExtraField) -> ZipResult<()> {
        self(field)
    }
}

/// Decode every record in an extra-field blob.
///
/// A record needs a 4-byte ID/length prefix and `length` bytes of body;
/// whenever the remaining blob is shorter than that, the walk ends cleanly.
/// Handler errors abort the walk and propagate.
pub fn walk<H: ExtraFieldHandler + ?Sized>(blob: &[u8], handler: &mut H) -> ZipResult<()> {
    let mut rest = blob;
    while rest.len() >= 4 {
        let id = u16::from_le_bytes([rest[0], rest[1]]);
        let len = u16::from_le_bytes([rest[2], rest[3]]) as usize;
        rest = &rest[4..];
        if rest.len() < len {
            break;
        }
        let (body, tail) = rest.split_at(len);
        rest = tail;

        let field = match id {
            EXTENDED_TIMESTAMP_ID => {
                ExtraField::ExtendedTimestamp(ExtendedTimestamp::try_from_slice(body)?)
            }
            UNIX_UID_GID_ID => ExtraField::UnixUidGid(UnixUidGid::try_from_slice(body)?),
            _ => ExtraField::Unknown {
                id,
                data: body.to_vec().into_boxed_slice(),
            },
        };
        handler.handle(field)?;
    }
    Ok(())
}
