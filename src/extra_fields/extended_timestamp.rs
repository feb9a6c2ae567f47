use crate::result::ZipResult;

/// extended timestamp, as described in <https://libzip.org/specifications/extrafld.txt>
#[derive(Debug, Clone, Copy)]
pub struct ExtendedTimestamp {
    mod_time: Option<u32>,
    ac_time: Option<u32>,
    cr_time: Option<u32>,
}

impl ExtendedTimestamp {
    /// Decode the field body. The flags byte describes the local-header
    /// variant; the central-directory copy usually carries only the
    /// modification time, so each timestamp is read only while bytes remain.
    pub(crate) fn try_from_slice(body: &[u8]) -> ZipResult<Self> {
        let (&flags, mut rest) = match body.split_first() {
            Some(parts) => parts,
            None => {
                // An empty body has nothing to offer but is not worth
                // failing the entry over.
                return Ok(Self {
                    mod_time: None,
                    ac_time: None,
                    cr_time: None,
                });
            }
        };

        let mut take_u32 = |wanted: bool| -> Option<u32> {
            if !wanted || rest.len() < 4 {
                return None;
            }
            let (bytes, tail) = rest.split_at(4);
            rest = tail;
            Some(u32::from_le_bytes(bytes.try_into().unwrap()))
        };

        let mod_time = take_u32(flags & 0b0000_0001 != 0);
        let ac_time = take_u32(flags & 0b0000_0010 != 0);
        let cr_time = take_u32(flags & 0b0000_0100 != 0);
        // Undocumented trailing bytes are ignored.

        Ok(Self {
            mod_time,
            ac_time,
            cr_time,
        })
    }

    /// returns the last modification timestamp, if defined, as UNIX epoch seconds
    #[must_use]
    pub fn mod_time(&self) -> Option<u32> {
        self.mod_time
    }

    /// returns the last access timestamp, if defined, as UNIX epoch seconds
    #[must_use]
    pub fn ac_time(&self) -> Option<u32> {
        self.ac_time
    }

    /// returns the creation timestamp, if defined, as UNIX epoch seconds
    #[must_use]
    pub fn cr_time(&self) -> Option<u32> {
        self.cr_time
    }
}
