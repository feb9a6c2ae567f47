//! Implementation of the ZipCrypto algorithm
//!
//! The following paper was used to implement the ZipCrypto algorithm:
//! [https://courses.cs.ut.ee/MTAT.07.022/2015_fall/uploads/Main/dmitri-report-f15-16.pdf](https://courses.cs.ut.ee/MTAT.07.022/2015_fall/uploads/Main/dmitri-report-f15-16.pdf)

/// ZipCrypto key derivation and byte-table CRC32, independent of the
/// payload-checksum path.
const fn make_crc32_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = i as u32;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 1 != 0 {
                (crc >> 1) ^ 0xedb8_8320
            } else {
                crc >> 1
            };
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
}

const CRC32_TABLE: [u32; 256] = make_crc32_table();

fn crc32_byte(crc: u32, byte: u8) -> u32 {
    (crc >> 8) ^ CRC32_TABLE[((crc ^ byte as u32) & 0xff) as usize]
}

/// The three-word cipher state. Derive from a password, then feed every
/// plaintext byte back through [`Self::update`].
#[derive(Clone, Copy)]
pub(crate) struct ZipCryptoKeys {
    key_0: u32,
    key_1: u32,
    key_2: u32,
}

impl std::fmt::Debug for ZipCryptoKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Leaking key state in logs would hand an attacker the keystream.
        f.write_str("ZipCryptoKeys(..)")
    }
}

impl ZipCryptoKeys {
    fn new() -> ZipCryptoKeys {
        ZipCryptoKeys {
            key_0: 0x1234_5678,
            key_1: 0x2345_6789,
            key_2: 0x3456_7890,
        }
    }

    /// Initialize the state from the raw password bytes.
    pub(crate) fn derive(password: &[u8]) -> ZipCryptoKeys {
        let mut keys = ZipCryptoKeys::new();
        for &byte in password {
            keys.update(byte);
        }
        keys
    }

    fn update(&mut self, plain_byte: u8) {
        self.key_0 = crc32_byte(self.key_0, plain_byte);
        self.key_1 = self
            .key_1
            .wrapping_add(self.key_0 & 0xff)
            .wrapping_mul(0x0808_8405)
            .wrapping_add(1);
        self.key_2 = crc32_byte(self.key_2, (self.key_1 >> 24) as u8);
    }

    fn stream_byte(&self) -> u8 {
        let temp = (self.key_2 | 2) as u16;
        (temp.wrapping_mul(temp ^ 1) >> 8) as u8
    }

    /// Decrypt one byte and advance the state with the recovered plaintext.
    pub(crate) fn decrypt_byte(&mut self, cipher_byte: u8) -> u8 {
        let plain_byte = cipher_byte ^ self.stream_byte();
        self.update(plain_byte);
        plain_byte
    }

    /// Decrypt a buffer in place.
    pub(crate) fn decrypt_in_place(&mut self, buffer: &mut [u8]) {
        for byte in buffer {
            *byte = self.decrypt_byte(*byte);
        }
    }

    /// Encrypt one byte; the state advances with the plaintext, exactly
    /// mirroring decryption.
    #[cfg(test)]
    pub(crate) fn encrypt_byte(&mut self, plain_byte: u8) -> u8 {
        let cipher_byte = plain_byte ^ self.stream_byte();
        self.update(plain_byte);
        cipher_byte
    }

    #[cfg(test)]
    pub(crate) fn encrypt_in_place(&mut self, buffer: &mut [u8]) {
        for byte in buffer {
            *byte = self.encrypt_byte(*byte);
        }
    }
}
