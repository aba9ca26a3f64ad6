//! The FIT base types.

/// Interpretation class of a field's base type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseType {
    /// `enum` (0x00)
    Enum,
    /// `sint8` (0x01)
    SInt8,
    /// `uint8` (0x02), `uint8z` (0x0A)
    UInt8,
    /// `string` (0x07)
    String,
    /// `sint16` (0x83)
    SInt16,
    /// `uint16` (0x84), `uint16z` (0x8B)
    UInt16,
    /// `sint32` (0x85)
    SInt32,
    /// `uint32` (0x86), `uint32z` (0x8C)
    UInt32,
    /// `float32` (0x88)
    Float32,
    /// `float64` (0x89)
    Float64,
}

impl BaseType {
    /// Classify a base type code, if known.
    pub fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            0x00 => Self::Enum,
            0x01 => Self::SInt8,
            0x02 | 0x0A => Self::UInt8,
            0x07 => Self::String,
            0x83 => Self::SInt16,
            0x84 | 0x8B => Self::UInt16,
            0x85 => Self::SInt32,
            0x86 | 0x8C => Self::UInt32,
            0x88 => Self::Float32,
            0x89 => Self::Float64,
            _ => return None,
        })
    }

    /// Width in bytes of a single value, or `None` for variable-length types.
    pub fn size(self) -> Option<u8> {
        Some(match self {
            Self::Enum | Self::SInt8 | Self::UInt8 => 1,
            Self::SInt16 | Self::UInt16 => 2,
            Self::SInt32 | Self::UInt32 | Self::Float32 => 4,
            Self::Float64 => 8,
            Self::String => return None,
        })
    }
}
