//! Table-driven cyclic redundancy checks.
//!
//! FIT documents carry a 16-bit CRC (generator `0x8005`, bit-reflected) over
//! the header and record sections. The tables here process eight input bytes
//! per lookup: level zero is the ordinary byte-wise table, and each further
//! level folds the previous one back through level zero.

use std::io::{self, Read};

/// Bit-reflected form of the generator polynomial `0x8005`.
const POLYNOMIAL: u16 = 0xA001;

const LEVELS: usize = 8;

static TABLE: [[u16; 256]; LEVELS] = build_table();

const fn build_table() -> [[u16; 256]; LEVELS] {
    let mut table = [[0u16; 256]; LEVELS];

    let mut i = 0;
    while i < 256 {
        let mut crc = i as u16;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 1 != 0 {
                (crc >> 1) ^ POLYNOMIAL
            } else {
                crc >> 1
            };
            bit += 1;
        }
        table[0][i] = crc;
        i += 1;
    }

    let mut level = 1;
    while level < LEVELS {
        let mut i = 0;
        while i < 256 {
            let prior = table[level - 1][i];
            table[level][i] = (prior >> 8) ^ table[0][(prior & 0xFF) as usize];
            i += 1;
        }
        level += 1;
    }

    table
}

/// Compute the checksum of a slice of bytes.
pub fn checksum(data: &[u8]) -> u16 {
    update(0, data)
}

/// Accumulate a slice of bytes into a running checksum value.
pub fn update(mut crc: u16, mut data: &[u8]) -> u16 {
    while let Some((chunk, rest)) = data.split_first_chunk::<8>() {
        let word = u64::from_le_bytes(*chunk) ^ u64::from(crc);

        crc = TABLE[7][(word & 0xFF) as usize]
            ^ TABLE[6][(word >> 8 & 0xFF) as usize]
            ^ TABLE[5][(word >> 16 & 0xFF) as usize]
            ^ TABLE[4][(word >> 24 & 0xFF) as usize]
            ^ TABLE[3][(word >> 32 & 0xFF) as usize]
            ^ TABLE[2][(word >> 40 & 0xFF) as usize]
            ^ TABLE[1][(word >> 48 & 0xFF) as usize]
            ^ TABLE[0][(word >> 56) as usize];

        data = rest;
    }

    for &byte in data {
        crc = (crc >> 8) ^ TABLE[0][usize::from((crc ^ u16::from(byte)) & 0xFF)];
    }

    crc
}

/// Compute the checksum of the next `len` bytes of a reader.
///
/// Advances the reader by exactly `len` bytes.
pub fn compute(source: &mut impl Read, len: u64) -> io::Result<u16> {
    let mut crc = 0;
    let mut remaining = len;
    let mut buf = [0u8; 8192];

    while remaining > 0 {
        let take = remaining.min(buf.len() as u64) as usize;
        source.read_exact(&mut buf[..take])?;
        crc = update(crc, &buf[..take]);
        remaining -= take as u64;
    }

    Ok(crc)
}
