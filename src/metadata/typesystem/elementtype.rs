//! Element type codes, the leading byte of every type in a signature blob.
//!
//! # Reference
//! - [ECMA-335 II.23.1.16](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf)

use strum::{Display, EnumIter};

use crate::{Error, Result};

/// An `ELEMENT_TYPE_*` code.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[allow(missing_docs)]
pub enum ElementType {
    /// Marks the end of a list
    End = 0x00,
    Void = 0x01,
    Boolean = 0x02,
    Char = 0x03,
    I1 = 0x04,
    U1 = 0x05,
    I2 = 0x06,
    U2 = 0x07,
    I4 = 0x08,
    U4 = 0x09,
    I8 = 0x0A,
    U8 = 0x0B,
    R4 = 0x0C,
    R8 = 0x0D,
    String = 0x0E,
    /// Followed by a type
    Ptr = 0x0F,
    /// Followed by a type
    ByRef = 0x10,
    /// Followed by a `TypeDefOrRef` token
    ValueType = 0x11,
    /// Followed by a `TypeDefOrRef` token
    Class = 0x12,
    /// Generic parameter of a type
    Var = 0x13,
    /// Multi-dimensional array
    Array = 0x14,
    /// Generic instantiation
    GenericInst = 0x15,
    TypedByRef = 0x16,
    /// `System.IntPtr`
    I = 0x18,
    /// `System.UIntPtr`
    U = 0x19,
    /// Followed by a method signature
    FnPtr = 0x1B,
    /// `System.Object`
    Object = 0x1C,
    /// Single-dimensional, zero-based array
    SzArray = 0x1D,
    /// Generic parameter of a method
    MVar = 0x1E,
    /// Required modifier, followed by a `TypeDefOrRef` token
    CModReqd = 0x1F,
    /// Optional modifier, followed by a `TypeDefOrRef` token
    CModOpt = 0x20,
    Internal = 0x21,
    Modifier = 0x40,
    /// Start of the variable arguments of a call site
    Sentinel = 0x41,
    Pinned = 0x45,
}

impl ElementType {
    /// Returns `true` for the codes that stand for a type on their own: void, boolean, char,
    /// the integers and floats, native integers, string and object.
    #[must_use]
    pub fn is_primitive(self) -> bool {
        matches!(
            self,
            ElementType::Void
                | ElementType::Boolean
                | ElementType::Char
                | ElementType::I1
                | ElementType::U1
                | ElementType::I2
                | ElementType::U2
                | ElementType::I4
                | ElementType::U4
                | ElementType::I8
                | ElementType::U8
                | ElementType::R4
                | ElementType::R8
                | ElementType::String
                | ElementType::I
                | ElementType::U
                | ElementType::Object
        )
    }

    /// Returns `true` for the signed and unsigned integers of 1 to 8 bytes
    #[must_use]
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            ElementType::I1
                | ElementType::U1
                | ElementType::I2
                | ElementType::U2
                | ElementType::I4
                | ElementType::U4
                | ElementType::I8
                | ElementType::U8
        )
    }
}

impl TryFrom<u8> for ElementType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        Ok(match value {
            0x00 => ElementType::End,
            0x01 => ElementType::Void,
            0x02 => ElementType::Boolean,
            0x03 => ElementType::Char,
            0x04 => ElementType::I1,
            0x05 => ElementType::U1,
            0x06 => ElementType::I2,
            0x07 => ElementType::U2,
            0x08 => ElementType::I4,
            0x09 => ElementType::U4,
            0x0A => ElementType::I8,
            0x0B => ElementType::U8,
            0x0C => ElementType::R4,
            0x0D => ElementType::R8,
            0x0E => ElementType::String,
            0x0F => ElementType::Ptr,
            0x10 => ElementType::ByRef,
            0x11 => ElementType::ValueType,
            0x12 => ElementType::Class,
            0x13 => ElementType::Var,
            0x14 => ElementType::Array,
            0x15 => ElementType::GenericInst,
            0x16 => ElementType::TypedByRef,
            0x18 => ElementType::I,
            0x19 => ElementType::U,
            0x1B => ElementType::FnPtr,
            0x1C => ElementType::Object,
            0x1D => ElementType::SzArray,
            0x1E => ElementType::MVar,
            0x1F => ElementType::CModReqd,
            0x20 => ElementType::CModOpt,
            0x21 => ElementType::Internal,
            0x40 => ElementType::Modifier,
            0x41 => ElementType::Sentinel,
            0x45 => ElementType::Pinned,
            _ => return Err(format_error!("Unknown element type {:#04x}", value)),
        })
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn codes_roundtrip() {
        for element in ElementType::iter() {
            assert_eq!(ElementType::try_from(element as u8).unwrap(), element);
        }

        assert!(ElementType::try_from(0x17).is_err());
        assert!(ElementType::try_from(0x50).is_err());
    }

    #[test]
    fn classification() {
        assert!(ElementType::String.is_primitive());
        assert!(ElementType::Object.is_primitive());
        assert!(!ElementType::ValueType.is_primitive());
        assert!(ElementType::U8.is_integer());
        assert!(!ElementType::R8.is_integer());
        assert!(!ElementType::Boolean.is_integer());
    }
}
