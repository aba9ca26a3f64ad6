//! File header parsing.

use std::io::{self, Read};

use thiserror::Error;
use zerocopy::FromBytes;

/// An error reading a file header.
#[derive(Debug, Error)]
pub enum HeaderError {
    /// An error from the supplied reader.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// Incorrect filetype marker.
    #[error("Incorrect file type marker.")]
    NotFitData,
    /// Unknown header length.
    #[error("Unknown header length ({0}).")]
    UnknownHeaderLength(u8),
}

/// The fixed-layout preamble of a FIT document.
///
/// All multi-byte header fields are little-endian, regardless of the
/// architecture declared by later definition records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHeader {
    /// Total length of the header, including this byte.
    pub header_size: u8,
    pub protocol_version: u8,
    pub profile_version: u16,
    /// Length of the record section following the header, excluding the
    /// trailing checksum.
    pub payload_size: u32,
    /// Stored header checksum, present only in extended headers.
    pub checksum: Option<u16>,
}

impl FileHeader {
    /// Read a file header, consuming exactly `header_size` bytes.
    pub fn read(r: &mut impl Read) -> Result<Self, HeaderError> {
        #[repr(C, packed)]
        #[derive(FromBytes)]
        struct RawHeader {
            header_size: u8,
            protocol_version: u8,
            profile_version: [u8; 2],
            payload_size: [u8; 4],
            signature: [u8; 4],
        }

        let mut fixed = [0u8; 12];
        r.read_exact(&mut fixed)?;

        let RawHeader {
            header_size,
            protocol_version,
            profile_version,
            payload_size,
            signature,
        } = zerocopy::transmute!(fixed);

        if &signature != b".FIT" {
            Err(HeaderError::NotFitData)?;
        }

        // A 13-byte header cannot hold the two checksum bytes it promises.
        let checksum = match header_size {
            12 => None,
            14.. => {
                let mut stored = [0u8; 2];
                r.read_exact(&mut stored)?;

                let mut extension = vec![0u8; usize::from(header_size) - 14];
                r.read_exact(&mut extension)?;

                Some(u16::from_le_bytes(stored))
            }
            _ => Err(HeaderError::UnknownHeaderLength(header_size))?,
        };

        Ok(Self {
            header_size,
            protocol_version,
            profile_version: u16::from_le_bytes(profile_version),
            payload_size: u32::from_le_bytes(payload_size),
            checksum,
        })
    }
}
