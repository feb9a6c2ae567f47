use crate::result::{ZipError, ZipResult};

/// Info-ZIP "new" Unix extra field: variable-width uid and gid.
#[derive(Debug, Clone, Copy)]
pub struct UnixUidGid {
    uid: u64,
    gid: u64,
}

fn take_int(rest: &mut &[u8]) -> ZipResult<u64> {
    let (&size, tail) = rest
        .split_first()
        .ok_or(ZipError::BadHeader("unix uid/gid field truncated"))?;
    let size = size as usize;
    if size > 8 || tail.len() < size {
        return Err(ZipError::BadHeader("unix uid/gid field truncated"));
    }
    let (bytes, tail) = tail.split_at(size);
    *rest = tail;
    let mut buf = [0u8; 8];
    buf[..size].copy_from_slice(bytes);
    Ok(u64::from_le_bytes(buf))
}

impl UnixUidGid {
    pub(crate) fn try_from_slice(body: &[u8]) -> ZipResult<Self> {
        let (&version, mut rest) = body
            .split_first()
            .ok_or(ZipError::BadHeader("unix uid/gid field is empty"))?;
        if version != 1 {
            return Err(ZipError::BadHeader("unsupported unix uid/gid field version"));
        }
        let uid = take_int(&mut rest)?;
        let gid = take_int(&mut rest)?;
        Ok(Self { uid, gid })
    }

    #[must_use]
    pub fn uid(&self) -> u64 {
        self.uid
    }

    #[must_use]
    pub fn gid(&self) -> u64 {
        self.gid
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn four_byte_ids() {
        let body = [1u8, 4, 0xe8, 0x03, 0, 0, 4, 0x64, 0, 0, 0];
        let field = UnixUidGid::try_from_slice(&body).unwrap();
        assert_eq!(field.uid(), 1000);
        assert_eq!(field.gid(), 100);
    }

    #[test]
    fn mixed_width_ids() {
        let body = [1u8, 2, 0xe8, 0x03, 8, 1, 0, 0, 0, 0, 0, 0, 0];
        let field = UnixUidGid::try_from_slice(&body).unwrap();
        assert_eq!(field.uid(), 1000);
        assert_eq!(field.gid(), 1);
    }

    #[test]
    fn wrong_version_is_rejected() {
        let body = [2u8, 1, 0, 1, 0];
        assert!(matches!(
            UnixUidGid::try_from_slice(&body),
            Err(ZipError::BadHeader(_))
        ));
    }

    #[test]
    fn truncated_gid_is_rejected() {
        let body = [1u8, 4, 0xe8, 0x03, 0, 0, 4, 0x64];
        assert!(matches!(
            UnixUidGid::try_from_slice(&body),
            Err(ZipError::BadHeader(_))
        ));
    }
}
