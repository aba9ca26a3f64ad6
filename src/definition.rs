//! Definition records and the field descriptors they carry.

use std::io::{self, Read};

use zerocopy::FromBytes;

/// One field of a definition record.
///
/// Field numbers are record-relative: they are only unique within a single
/// definition, never across message kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub field_id: u8,
    /// Byte offset of this field within a data record.
    pub offset: u32,
    /// Declared size in bytes. May be a multiple of the base type width for
    /// array fields.
    pub size: u8,
    pub base_type: u8,
}

/// The decoded shape of the data records for one local slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDefinition {
    pub local_slot: u8,
    pub is_big_endian: bool,
    pub global_message_number: u16,
    pub fields: Vec<FieldDescriptor>,
    /// Total length in bytes of a matching data record.
    pub total_size: u32,
}

impl MessageDefinition {
    /// Parse the body of a definition record, given its header byte.
    ///
    /// Consumes exactly [`Self::wire_size`] bytes from the reader.
    pub(crate) fn read(header: u8, r: &mut impl Read) -> io::Result<Self> {
        #[repr(C, packed)]
        #[derive(FromBytes)]
        struct DefinitionMessage {
            _reserved: u8,
            architecture: u8,
            global_message: [u8; 2],
            field_count: u8,
        }

        let mut fixed = [0u8; 5];
        r.read_exact(&mut fixed)?;

        let DefinitionMessage {
            architecture,
            global_message,
            field_count,
            ..
        } = zerocopy::transmute!(fixed);

        let is_big_endian = architecture != 0;
        let global_message_number = if is_big_endian {
            u16::from_be_bytes(global_message)
        } else {
            u16::from_le_bytes(global_message)
        };

        let mut fields = Vec::with_capacity(usize::from(field_count));
        let mut offset = 0u32;
        for _ in 0..field_count {
            let mut triple = [0u8; 3];
            r.read_exact(&mut triple)?;
            let [field_id, size, base_type] = triple;

            fields.push(FieldDescriptor {
                field_id,
                offset,
                size,
                base_type,
            });
            offset += u32::from(size);
        }

        Ok(Self {
            local_slot: header & 0xF,
            is_big_endian,
            global_message_number,
            fields,
            total_size: offset,
        })
    }

    /// Bytes this definition occupied on the wire, excluding its header byte.
    pub fn wire_size(&self) -> u32 {
        5 + 3 * self.fields.len() as u32
    }

    /// Find the first descriptor with a field number, if any.
    pub fn field(&self, field_id: u8) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.field_id == field_id)
    }
}
