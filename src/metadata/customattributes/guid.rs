//! GUIDs encoded as attribute arguments.
//!
//! `GuidAttribute` spells out a GUID as eleven integer arguments: the 32-bit `Data1`, the
//! 16-bit `Data2` and `Data3`, then the eight bytes of `Data4`. The first three fields are
//! stored little-endian in the binary GUID layout, `Data4` in argument order.

use crate::{metadata::customattributes::CustomAttributeValue, Result};

/// Number of fixed arguments of a GUID attribute
pub const GUID_ARGUMENT_COUNT: usize = 11;

/// Rebuild the GUID spelled out by the arguments of a `GuidAttribute`.
///
/// Each argument is truncated to the width of its field.
///
/// # Errors
/// Returns [`crate::Error::Format`] unless there are exactly eleven integer arguments.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn guid_from_value(value: &CustomAttributeValue<'_>) -> Result<uguid::Guid> {
    if value.len() != GUID_ARGUMENT_COUNT {
        return Err(format_error!(
            "GUID needs {} arguments, found {}",
            GUID_ARGUMENT_COUNT,
            value.len()
        ));
    }

    let mut fields = [0_i64; GUID_ARGUMENT_COUNT];
    for (index, argument) in value.fixed_args.iter().enumerate() {
        fields[index] = argument.value.as_i64().ok_or_else(|| {
            format_error!(
                "GUID argument {} is {}, not an integer",
                index,
                argument.value.kind()
            )
        })?;
    }

    let mut bytes = [0_u8; 16];
    bytes[0..4].copy_from_slice(&(fields[0] as u32).to_le_bytes());
    bytes[4..6].copy_from_slice(&(fields[1] as u16).to_le_bytes());
    bytes[6..8].copy_from_slice(&(fields[2] as u16).to_le_bytes());
    for (byte, field) in bytes[8..].iter_mut().zip(&fields[3..]) {
        *byte = *field as u8;
    }

    Ok(uguid::Guid::from_bytes(bytes))
}
