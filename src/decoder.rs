//! The streaming decoder.

use std::io::{self, Read, Seek, SeekFrom};
use std::rc::Rc;

use either::Either::{self, Left, Right};
use tartan_bitfield::bitfield;
use thiserror::Error;
use tracing::trace;

use crate::crc;
use crate::definition::MessageDefinition;
use crate::header::{FileHeader, HeaderError};
use crate::message::Message;

bitfield! {
    struct RecordHeader(u8) {
        [0..4] local_slot: u8,
        [5] is_developer,
        [6] is_definition,
        [7] is_compressed,
    }
}

/// An error decoding the record section.
///
/// Truncation is reported distinctly from structural violations, so callers
/// can choose to keep partial results from a cut-short file.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// An error from the supplied reader.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// The source ended before the declared payload size was reached.
    #[error("Stream ended {remaining} bytes short of the declared payload size.")]
    Truncated { remaining: u32 },
    /// A data record referenced a slot with no active definition.
    #[error("Data record references undefined local slot {0}.")]
    UndefinedSlot(u8),
    /// Found a compressed timestamp header (not supported).
    #[error("Found a compressed timestamp header.")]
    CompressedTimestamp,
    /// Found developer data (not supported).
    #[error("Found developer data.")]
    DeveloperData,
}

/// A single-pass decoder over one FIT document.
///
/// Construct with [`Decoder::open`], then pull data records from
/// [`Decoder::messages`]. Definition records are consumed internally to
/// maintain the sixteen-slot definition table; only data records are yielded,
/// in file order.
pub struct Decoder<R> {
    source: R,
    header: FileHeader,
    slots: [Option<Rc<MessageDefinition>>; 16],
    /// Record-section bytes consumed so far.
    consumed: u32,
    finished: bool,
}

impl<R: Read> Decoder<R> {
    /// Read the file header and prepare to decode the record section.
    pub fn open(mut source: R) -> Result<Self, HeaderError> {
        let header = FileHeader::read(&mut source)?;
        trace!(payload_size = header.payload_size, "opened stream");

        Ok(Self {
            source,
            header,
            slots: Default::default(),
            consumed: 0,
            finished: false,
        })
    }

    pub fn file_header(&self) -> &FileHeader {
        &self.header
    }

    /// Lazily decode the data records, in file order.
    ///
    /// The sequence is forward-only and not restartable; after it yields an
    /// error it is exhausted.
    pub fn messages(&mut self) -> Messages<'_, R> {
        Messages { decoder: self }
    }

    /// Return the underlying byte source.
    pub fn into_inner(self) -> R {
        self.source
    }

    fn next_message(&mut self) -> Option<Result<Message, DecodeError>> {
        if self.finished {
            return None;
        }

        while self.consumed < self.header.payload_size {
            match self.read_frame() {
                Ok(Left(_)) => continue,
                Ok(Right(message)) => return Some(Ok(message)),
                Err(err) => {
                    self.finished = true;
                    return Some(Err(err));
                }
            }
        }

        self.finished = true;
        None
    }

    /// Decode one record, returning the slot number for a definition or the
    /// decoded message for data.
    fn read_frame(&mut self) -> Result<Either<u8, Message>, DecodeError> {
        let byte = self.read_byte()?;
        let header = RecordHeader(byte);

        if header.is_compressed() {
            Err(DecodeError::CompressedTimestamp)?;
        }
        if header.is_developer() {
            Err(DecodeError::DeveloperData)?;
        }

        let slot = header.local_slot();

        if header.is_definition() {
            let definition =
                MessageDefinition::read(byte, &mut self.source).map_err(|e| self.classify(e))?;

            trace!(
                slot,
                global = definition.global_message_number,
                fields = definition.fields.len(),
                "stored definition"
            );

            self.consumed += 1 + definition.wire_size();
            self.slots[usize::from(slot)] = Some(Rc::new(definition));

            Ok(Left(slot))
        } else {
            let definition = self.slots[usize::from(slot)]
                .clone()
                .ok_or(DecodeError::UndefinedSlot(slot))?;

            let mut data = vec![0u8; definition.total_size as usize].into_boxed_slice();
            self.source
                .read_exact(&mut data)
                .map_err(|e| self.classify(e))?;

            self.consumed += 1 + definition.total_size;

            Ok(Right(Message::new(definition, data)))
        }
    }

    fn read_byte(&mut self) -> Result<u8, DecodeError> {
        let mut buf = [0u8; 1];
        self.source
            .read_exact(&mut buf)
            .map_err(|e| self.classify(e))?;
        Ok(buf[0])
    }

    /// Separate running out of bytes from other reader failures.
    fn classify(&self, err: io::Error) -> DecodeError {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            DecodeError::Truncated {
                remaining: self.header.payload_size - self.consumed,
            }
        } else {
            err.into()
        }
    }
}

impl<R: Read + Seek> Decoder<R> {
    /// Recompute the whole-file checksum and compare it to the stored trailer.
    ///
    /// Makes an independent pass over the source from offset zero; the stream
    /// position is restored before returning. A mismatch is advisory, and
    /// decoding may proceed regardless.
    pub fn verify_checksum(&mut self) -> io::Result<bool> {
        let resume = self.source.stream_position()?;
        self.source.seek(SeekFrom::Start(0))?;

        let span = u64::from(self.header.header_size) + u64::from(self.header.payload_size);
        let calculated = crc::compute(&mut self.source, span)?;

        let mut stored = [0u8; 2];
        self.source.read_exact(&mut stored)?;
        let stored = u16::from_le_bytes(stored);

        self.source.seek(SeekFrom::Start(resume))?;

        trace!(calculated, stored, "verified checksum");
        Ok(calculated == stored)
    }
}

/// Lazy iterator over the data records of a document.
pub struct Messages<'a, R> {
    decoder: &'a mut Decoder<R>,
}

impl<R: Read> Iterator for Messages<'_, R> {
    type Item = Result<Message, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.decoder.next_message()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(payload: &[u8]) -> Vec<u8> {
        let mut bytes = vec![12u8, 0x10];
        bytes.extend(2195u16.to_le_bytes());
        bytes.extend((payload.len() as u32).to_le_bytes());
        bytes.extend(b".FIT");
        bytes.extend(payload);
        bytes.extend(crc::checksum(&bytes).to_le_bytes());
        bytes
    }

    #[test]
    fn undefined_slot_is_fatal() {
        let bytes = document(&[0x03, 0xAA]);
        let mut decoder = Decoder::open(bytes.as_slice()).unwrap();
        let mut messages = decoder.messages();

        assert!(matches!(
            messages.next(),
            Some(Err(DecodeError::UndefinedSlot(3)))
        ));
        assert!(messages.next().is_none());
    }

    #[test]
    fn compressed_header_is_fatal() {
        let bytes = document(&[0x85]);
        let mut decoder = Decoder::open(bytes.as_slice()).unwrap();

        assert!(matches!(
            decoder.messages().next(),
            Some(Err(DecodeError::CompressedTimestamp))
        ));
    }

    #[test]
    fn developer_data_is_fatal() {
        let bytes = document(&[0x60]);
        let mut decoder = Decoder::open(bytes.as_slice()).unwrap();

        assert!(matches!(
            decoder.messages().next(),
            Some(Err(DecodeError::DeveloperData))
        ));
    }

    #[test]
    fn truncation_is_distinguished() {
        // Declares four payload bytes but carries none.
        let mut bytes = vec![12u8, 0x10];
        bytes.extend(2195u16.to_le_bytes());
        bytes.extend(4u32.to_le_bytes());
        bytes.extend(b".FIT");

        let mut decoder = Decoder::open(bytes.as_slice()).unwrap();
        assert!(matches!(
            decoder.messages().next(),
            Some(Err(DecodeError::Truncated { remaining: 4 }))
        ));
    }
}
