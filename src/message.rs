//! Decoded data records and typed field access.

use std::rc::Rc;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::base_type::BaseType;
use crate::definition::{FieldDescriptor, MessageDefinition};

/// Seconds from the Unix epoch to the FIT epoch, 1989-12-31T00:00:00Z.
const EPOCH_OFFSET: i64 = 631_065_600;

/// Raw timestamps below this value predate the epoch rollover, and have no
/// defined interpretation.
const EPOCH_ROLLOVER: u32 = 0x1000_0000;

/// A raw timestamp below the epoch rollover threshold.
#[derive(Debug, Error)]
#[error("Raw timestamp {0:#010x} is below the epoch rollover threshold.")]
pub struct TimestampRangeError(pub u32);

/// Convert stored bytes to a primitive, honoring the record's endianness.
macro_rules! read_scalar {
    ($t:ty, $bytes:expr, $is_big_endian:expr) => {{
        let raw = <[u8; size_of::<$t>()]>::try_from($bytes).ok()?;
        if $is_big_endian {
            <$t>::from_be_bytes(raw)
        } else {
            <$t>::from_le_bytes(raw)
        }
    }};
}

/// One decoded data record.
///
/// Accessors look fields up by their record-relative number. A field that is
/// absent from the record's definition, carries its base type's 'invalid'
/// marker value, or has a type the accessor cannot produce, is uniformly
/// reported as no value.
pub struct Message {
    definition: Rc<MessageDefinition>,
    data: Box<[u8]>,
}

impl Message {
    pub(crate) fn new(definition: Rc<MessageDefinition>, data: Box<[u8]>) -> Self {
        Self { definition, data }
    }

    pub fn global_message_number(&self) -> u16 {
        self.definition.global_message_number
    }

    /// The definition this record was decoded against.
    pub fn definition(&self) -> &MessageDefinition {
        &self.definition
    }

    fn bytes(&self, descriptor: &FieldDescriptor, width: u8) -> Option<&[u8]> {
        let start = descriptor.offset as usize;
        self.data.get(start..start + usize::from(width))
    }

    /// Retrieve a numeric field, widened to an `f64`.
    ///
    /// For array fields, reads the first element.
    pub fn get_number(&self, field_id: u8) -> Option<f64> {
        let descriptor = self.definition.field(field_id)?;
        let base = BaseType::from_code(descriptor.base_type)?;
        let bytes = self.bytes(descriptor, base.size()?)?;
        let is_be = self.definition.is_big_endian;

        match base {
            BaseType::SInt8 => valid(read_scalar!(i8, bytes, is_be), i8::MAX).map(f64::from),
            BaseType::UInt8 => valid(read_scalar!(u8, bytes, is_be), u8::MAX).map(f64::from),
            BaseType::SInt16 => valid(read_scalar!(i16, bytes, is_be), i16::MAX).map(f64::from),
            BaseType::UInt16 => valid(read_scalar!(u16, bytes, is_be), u16::MAX).map(f64::from),
            BaseType::SInt32 => valid(read_scalar!(i32, bytes, is_be), i32::MAX).map(f64::from),
            BaseType::UInt32 => valid(read_scalar!(u32, bytes, is_be), u32::MAX).map(f64::from),
            BaseType::Float32 => Some(f64::from(read_scalar!(f32, bytes, is_be))),
            BaseType::Float64 => Some(read_scalar!(f64, bytes, is_be)),
            BaseType::Enum | BaseType::String => None,
        }
    }

    /// Retrieve an enumeration field (base type `enum`).
    pub fn get_enum(&self, field_id: u8) -> Option<u8> {
        let descriptor = self.definition.field(field_id)?;
        if BaseType::from_code(descriptor.base_type) != Some(BaseType::Enum) {
            return None;
        }

        let byte = *self.data.get(descriptor.offset as usize)?;
        valid(byte, u8::MAX)
    }

    /// Retrieve a text field (base type `string`).
    ///
    /// Strings run to the field's declared size and are NUL-padded; the value
    /// ends at the first NUL byte.
    pub fn get_text(&self, field_id: u8) -> Option<String> {
        let descriptor = self.definition.field(field_id)?;
        if BaseType::from_code(descriptor.base_type) != Some(BaseType::String) {
            return None;
        }

        let bytes = self.bytes(descriptor, descriptor.size)?;
        let bytes = &bytes[..bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len())];
        if bytes.is_empty() {
            return None;
        }

        String::from_utf8(bytes.to_vec()).ok()
    }

    /// Retrieve a timestamp field (base type `uint32`), as seconds since the
    /// FIT epoch.
    ///
    /// Raw values below the epoch rollover threshold are a hard error rather
    /// than a missing value: interpreting them is undefined, and silently
    /// producing a wrong instant would be worse than failing.
    pub fn get_timestamp(
        &self,
        field_id: u8,
    ) -> Result<Option<DateTime<Utc>>, TimestampRangeError> {
        let Some(raw) = self.raw_timestamp(field_id) else {
            return Ok(None);
        };

        if raw == u32::MAX {
            return Ok(None);
        }
        if raw < EPOCH_ROLLOVER {
            return Err(TimestampRangeError(raw));
        }

        match DateTime::from_timestamp(EPOCH_OFFSET + i64::from(raw), 0) {
            Some(timestamp) => Ok(Some(timestamp)),
            // The offset plus a u32 of seconds stays far inside chrono's range.
            None => unreachable!(),
        }
    }

    fn raw_timestamp(&self, field_id: u8) -> Option<u32> {
        let descriptor = self.definition.field(field_id)?;
        if descriptor.base_type != 0x86 {
            return None;
        }

        let bytes = self.bytes(descriptor, 4)?;
        Some(read_scalar!(u32, bytes, self.definition.is_big_endian))
    }
}

fn valid<T: PartialEq>(value: T, invalid: T) -> Option<T> {
    (value != invalid).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definition(is_big_endian: bool, fields: &[(u8, u8, u8)]) -> Rc<MessageDefinition> {
        let mut offset = 0;
        let fields = fields
            .iter()
            .map(|&(field_id, size, base_type)| {
                let descriptor = FieldDescriptor {
                    field_id,
                    offset,
                    size,
                    base_type,
                };
                offset += u32::from(size);
                descriptor
            })
            .collect();

        Rc::new(MessageDefinition {
            local_slot: 0,
            is_big_endian,
            global_message_number: 20,
            fields,
            total_size: offset,
        })
    }

    fn message(definition: Rc<MessageDefinition>, data: &[u8]) -> Message {
        Message::new(definition, data.into())
    }

    #[test]
    fn numeric_widening() {
        let definition = definition(
            false,
            &[
                (0, 1, 0x01), // sint8
                (1, 2, 0x84), // uint16
                (2, 4, 0x85), // sint32
                (3, 4, 0x88), // float32
            ],
        );

        let mut data = vec![0xFEu8];
        data.extend(1234u16.to_le_bytes());
        data.extend((-56789i32).to_le_bytes());
        data.extend(2.5f32.to_le_bytes());

        let message = message(definition, &data);
        assert_eq!(message.get_number(0), Some(-2.0));
        assert_eq!(message.get_number(1), Some(1234.0));
        assert_eq!(message.get_number(2), Some(-56789.0));
        assert_eq!(message.get_number(3), Some(2.5));
    }

    #[test]
    fn sentinels_read_as_missing() {
        let definition = definition(
            false,
            &[
                (0, 1, 0x01),
                (1, 1, 0x02),
                (2, 2, 0x83),
                (3, 2, 0x8B),
                (4, 4, 0x85),
                (5, 4, 0x8C),
            ],
        );

        let mut data = vec![0x7Fu8, 0xFF];
        data.extend(0x7FFFu16.to_le_bytes());
        data.extend(0xFFFFu16.to_le_bytes());
        data.extend(0x7FFF_FFFFu32.to_le_bytes());
        data.extend(0xFFFF_FFFFu32.to_le_bytes());

        let message = message(definition, &data);
        for field_id in 0..6 {
            assert_eq!(message.get_number(field_id), None, "field {field_id}");
        }
    }

    #[test]
    fn big_endian_values() {
        let definition = definition(true, &[(6, 2, 0x84), (7, 4, 0x86)]);

        let mut data = Vec::new();
        data.extend(8765u16.to_be_bytes());
        data.extend(0x2000_0000u32.to_be_bytes());

        let message = message(definition, &data);
        assert_eq!(message.get_number(6), Some(8765.0));
        assert_eq!(message.get_number(7), Some(f64::from(0x2000_0000u32)));
    }

    #[test]
    fn absent_and_mismatched_fields() {
        let definition = definition(false, &[(0, 1, 0x00), (1, 4, 0x07)]);
        let message = message(definition, b"\x02abc\0");

        // Not in the definition at all.
        assert_eq!(message.get_number(9), None);
        assert_eq!(message.get_enum(9), None);
        assert_eq!(message.get_text(9), None);

        // Present, but not the accessor's kind.
        assert_eq!(message.get_number(0), None);
        assert_eq!(message.get_number(1), None);
        assert_eq!(message.get_enum(1), None);
        assert_eq!(message.get_text(0), None);
    }

    #[test]
    fn enum_values() {
        let definition = definition(false, &[(0, 1, 0x00), (1, 1, 0x00)]);
        let message = message(definition, &[0x09, 0xFF]);

        assert_eq!(message.get_enum(0), Some(9));
        assert_eq!(message.get_enum(1), None); // Invalid marker.
    }

    #[test]
    fn duplicate_field_ids_first_wins() {
        let definition = definition(false, &[(4, 1, 0x02), (4, 1, 0x02)]);
        let message = message(definition, &[17, 99]);

        assert_eq!(message.get_number(4), Some(17.0));
    }

    #[test]
    fn array_fields_read_first_element() {
        let definition = definition(false, &[(8, 3, 0x02)]);
        let message = message(definition, &[5, 6, 7]);

        assert_eq!(message.get_number(8), Some(5.0));
    }

    #[test]
    fn text_runs_to_first_nul() {
        let definition = definition(false, &[(5, 8, 0x07), (6, 4, 0x07)]);
        let message = message(definition, b"Alpe\0\0\0\0\0\0\0\0");

        assert_eq!(message.get_text(5).as_deref(), Some("Alpe"));
        assert_eq!(message.get_text(6), None); // Empty string.
    }

    #[test]
    fn text_rejects_invalid_utf8() {
        let definition = definition(false, &[(5, 2, 0x07)]);
        let message = message(definition, &[0xC3, 0x28]);

        assert_eq!(message.get_text(5), None);
    }

    #[test]
    fn timestamps() {
        let definition = definition(false, &[(253, 4, 0x86), (1, 4, 0x8C)]);

        let mut data = Vec::new();
        data.extend(1_000_000_000u32.to_le_bytes());
        data.extend(0u32.to_le_bytes());

        let message = message(definition, &data);
        let timestamp = message.get_timestamp(253).unwrap().unwrap();
        assert_eq!(timestamp.timestamp(), EPOCH_OFFSET + 1_000_000_000);

        // Wrong base type (uint32z, not uint32) reads as missing.
        assert!(message.get_timestamp(1).unwrap().is_none());
        assert!(message.get_timestamp(77).unwrap().is_none());
    }

    #[test]
    fn pre_rollover_timestamp_is_fatal() {
        let definition = definition(false, &[(253, 4, 0x86)]);
        let message = message(definition, &0x0FFF_FFFFu32.to_le_bytes());

        assert!(matches!(
            message.get_timestamp(253),
            Err(TimestampRangeError(0x0FFF_FFFF))
        ));
    }

    #[test]
    fn invalid_timestamp_reads_as_missing() {
        let definition = definition(false, &[(253, 4, 0x86)]);
        let message = message(definition, &u32::MAX.to_le_bytes());

        assert!(message.get_timestamp(253).unwrap().is_none());
    }

    #[test]
    fn undersized_buffer_reads_as_missing() {
        // A malformed definition can declare a size narrower than the type.
        let definition = definition(false, &[(0, 2, 0x86)]);
        let message = message(definition, &[0x01, 0x02]);

        assert_eq!(message.get_number(0), None);
        assert!(message.get_timestamp(0).unwrap().is_none());
    }
}
