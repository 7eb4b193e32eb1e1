//! CRC-16 used by both framings.
//!
//! This is the "hqx" CRC: polynomial `0x1021`, processed MSB-first, no final
//! XOR. Only the initial register differs between framings. Seeded with
//! `0x0000` it matches CRC-16/XMODEM; seeded with `0xFFFF` it matches
//! CRC-16/IBM-3740.

use ::crc::{CRC_16_XMODEM, Crc};

const HQX: Crc<u16> = Crc::<u16>::new(&CRC_16_XMODEM);

/// CRC-16 of `bytes` starting from `seed`.
pub fn crc16(seed: u16, bytes: &[u8]) -> u16 {
    crc16_parts(seed, &[bytes])
}

/// CRC-16 over several slices as if they were concatenated.
pub fn crc16_parts(seed: u16, parts: &[&[u8]]) -> u16 {
    let mut digest = HQX.digest_with_initial(seed);
    for part in parts {
        digest.update(part);
    }
    digest.finalize()
}
