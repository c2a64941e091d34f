//! Bounds-checked little-endian reads of fixed-width primitives.
//!
//! Every multi-byte value in ECMA-335 metadata is stored little-endian. The [`CilIO`] trait
//! ties each primitive to its byte representation so that [`read_le_at`] can be written once
//! for all of them. Failed reads report a [`crate::Error::Format`] carrying the offset that
//! was requested, relative to the slice that was passed in.

use crate::Result;

/// Trait for implementing type-specific safe binary data reading operations.
///
/// Implemented for the integer and floating point types that appear in metadata tables,
/// signatures and custom attribute blobs.
pub trait CilIO: Sized {
    /// Associated type representing the byte array type for this primitive
    type Bytes: Sized + for<'a> TryFrom<&'a [u8]>;

    /// Read a value from little-endian bytes
    fn from_le_bytes(bytes: Self::Bytes) -> Self;
}

macro_rules! impl_cilio {
    ($($ty:ty),* $(,)?) => {
        $(
            impl CilIO for $ty {
                type Bytes = [u8; std::mem::size_of::<$ty>()];

                fn from_le_bytes(bytes: Self::Bytes) -> Self {
                    <$ty>::from_le_bytes(bytes)
                }
            }
        )*
    };
}

impl_cilio!(u8, i8, u16, i16, u32, i32, u64, i64, f32, f64);

/// Read `T` from the start of `data`.
///
/// # Errors
/// Returns [`crate::Error::Format`] if `data` is shorter than `T`.
pub fn read_le<T: CilIO>(data: &[u8]) -> Result<T> {
    let mut offset = 0_usize;
    read_le_at(data, &mut offset)
}

/// Read `T` at `offset` and advance `offset` past it.
///
/// # Errors
/// Returns [`crate::Error::Format`] if fewer than `size_of::<T>()` bytes remain at `offset`.
pub fn read_le_at<T: CilIO>(data: &[u8], offset: &mut usize) -> Result<T> {
    let type_len = std::mem::size_of::<T>();
    let Some(end) = offset.checked_add(type_len) else {
        return Err(format_error!(at *offset, "Read of {} bytes overflows", type_len));
    };

    if end > data.len() {
        return Err(format_error!(
            at *offset,
            "Read of {} bytes past the end of a {} byte region",
            type_len,
            data.len()
        ));
    }

    let Ok(bytes) = T::Bytes::try_from(&data[*offset..end]) else {
        return Err(format_error!(at *offset, "Failed to convert {} bytes", type_len));
    };

    *offset = end;
    Ok(T::from_le_bytes(bytes))
}

/// Read a heap or table index that is either 2 or 4 bytes wide.
///
/// # Errors
/// Returns [`crate::Error::Format`] if the index does not fit into the remaining data.
pub fn read_le_at_dyn(data: &[u8], offset: &mut usize, is_large: bool) -> Result<u32> {
    if is_large {
        read_le_at::<u32>(data, offset)
    } else {
        Ok(u32::from(read_le_at::<u16>(data, offset)?))
    }
}
