//! Sequential byte cursor for heaps, signatures and custom attribute blobs.
//!
//! [`Parser`] reads from a window of one backing buffer. Positions reported by
//! [`Parser::offset`] and carried in errors are absolute offsets into that buffer, so a
//! failure deep inside a blob can be traced back to the exact byte of the input file.
//! Sub-cursors created with [`Parser::slice`] share the backing buffer and never copy.
//!
//! # Examples
//!
//! ```rust
//! use winmdscope::Parser;
//!
//! let data = [0x01, 0x02, 0x80, 0x80, 0xC0, 0x00, 0x40, 0x00];
//! let mut parser = Parser::new(&data);
//!
//! assert_eq!(parser.read_le::<u16>()?, 0x0201);
//! assert_eq!(parser.read_compressed_uint()?, 0x80);
//! assert_eq!(parser.read_compressed_uint()?, 0x4000);
//! assert!(parser.is_exhausted());
//! # Ok::<(), winmdscope::Error>(())
//! ```

use crate::{
    file::io::{read_le_at, CilIO},
    metadata::tables::{CodedIndex, CodedIndexKind},
    Result,
};

/// Largest value representable by the compressed unsigned integer encoding.
pub const COMPRESSED_UINT_MAX: u32 = 0x1FFF_FFFF;

/// A cursor over an immutable window of a backing buffer.
#[derive(Clone, Copy, Debug)]
pub struct Parser<'a> {
    /// The complete backing buffer
    data: &'a [u8],
    /// Absolute offset of the first byte of the window
    start: usize,
    /// Absolute offset one past the last byte of the window
    end: usize,
    /// Absolute offset of the next byte to read
    position: usize,
}

impl<'a> Parser<'a> {
    /// Create a new [`Parser`] covering all of `data`.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Parser {
            data,
            start: 0,
            end: data.len(),
            position: 0,
        }
    }

    /// Create a [`Parser`] over `len` bytes of `data` starting at `offset`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Format`] if the window does not lie inside `data`.
    pub fn with_window(data: &'a [u8], offset: usize, len: usize) -> Result<Self> {
        match offset.checked_add(len) {
            Some(end) if end <= data.len() => Ok(Parser {
                data,
                start: offset,
                end,
                position: offset,
            }),
            _ => Err(format_error!(
                at offset,
                "Window of {} bytes exceeds buffer of {} bytes",
                len,
                data.len()
            )),
        }
    }

    /// Returns the length of the window.
    #[must_use]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns `true` if the window is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns `true` if there is more data available to parse.
    #[must_use]
    pub fn has_more_data(&self) -> bool {
        self.position < self.end
    }

    /// Returns `true` once every byte of the window has been consumed.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        !self.has_more_data()
    }

    /// Number of bytes left in the window.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.end - self.position
    }

    /// Position relative to the start of the window.
    #[must_use]
    pub fn pos(&self) -> usize {
        self.position - self.start
    }

    /// Absolute offset of the next byte in the backing buffer.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.position
    }

    /// The complete backing buffer, independent of the window.
    #[must_use]
    pub fn buffer(&self) -> &'a [u8] {
        self.data
    }

    /// The unread part of the window.
    #[must_use]
    pub fn data(&self) -> &'a [u8] {
        &self.data[self.position..self.end]
    }

    /// Move to `pos`, relative to the start of the window.
    ///
    /// # Errors
    /// Returns [`crate::Error::Format`] if `pos` lies beyond the window.
    pub fn seek(&mut self, pos: usize) -> Result<()> {
        if pos > self.len() {
            return Err(format_error!(
                at self.position,
                "Seek to {} beyond window of {} bytes",
                pos,
                self.len()
            ));
        }

        self.position = self.start + pos;
        Ok(())
    }

    /// Skip `step` bytes.
    ///
    /// # Errors
    /// Returns [`crate::Error::Format`] if fewer than `step` bytes remain.
    pub fn skip(&mut self, step: usize) -> Result<()> {
        if step > self.remaining() {
            return Err(format_error!(
                at self.position,
                "Skip of {} bytes with only {} remaining",
                step,
                self.remaining()
            ));
        }

        self.position += step;
        Ok(())
    }

    /// Skip padding until the relative position is a multiple of `alignment`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Format`] if `alignment` is zero or the padding runs past
    /// the window.
    pub fn align(&mut self, alignment: usize) -> Result<()> {
        if alignment == 0 {
            return Err(format_error!(at self.offset(), "Alignment of zero bytes"));
        }

        let padding = (alignment - (self.pos() % alignment)) % alignment;
        self.skip(padding)
    }

    /// Read the next byte without consuming it.
    ///
    /// # Errors
    /// Returns [`crate::Error::Format`] if the window is exhausted.
    pub fn peek_byte(&self) -> Result<u8> {
        if self.position >= self.end {
            return Err(format_error!(at self.position, "Peek past the end of the data"));
        }
        Ok(self.data[self.position])
    }

    /// Read a fixed-width little-endian value.
    ///
    /// # Errors
    /// Returns [`crate::Error::Format`] if the value does not fit into the remaining window.
    pub fn read_le<T: CilIO>(&mut self) -> Result<T> {
        read_le_at::<T>(&self.data[..self.end], &mut self.position)
    }

    /// Read `len` raw bytes.
    ///
    /// # Errors
    /// Returns [`crate::Error::Format`] if fewer than `len` bytes remain.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        let start = self.position;
        self.skip(len)?;
        Ok(&self.data[start..self.position])
    }

    /// Carve an independent cursor over the next `len` bytes and skip them here.
    ///
    /// # Errors
    /// Returns [`crate::Error::Format`] if fewer than `len` bytes remain.
    pub fn slice(&mut self, len: usize) -> Result<Parser<'a>> {
        let start = self.position;
        self.skip(len)?;
        Ok(Parser {
            data: self.data,
            start,
            end: self.position,
            position: start,
        })
    }

    /// Read a compressed unsigned integer (ECMA-335 II.23.2).
    ///
    /// The top bits of the first byte select the width: `0xxxxxxx` is one byte,
    /// `10xxxxxx` two bytes and `110xxxxx` four bytes, all big-endian.
    ///
    /// # Errors
    /// Returns [`crate::Error::Format`] on a truncated value or an invalid leading byte.
    pub fn read_compressed_uint(&mut self) -> Result<u32> {
        let offset = self.position;
        let first_byte = self.read_le::<u8>()?;

        // 1-byte encoding: 0xxxxxxx
        if (first_byte & 0x80) == 0 {
            return Ok(u32::from(first_byte));
        }

        // 2-byte encoding: 10xxxxxx xxxxxxxx
        if (first_byte & 0xC0) == 0x80 {
            let second_byte = self.read_le::<u8>()?;
            let value = ((u32::from(first_byte) & 0x3F) << 8) | u32::from(second_byte);
            return Ok(value);
        }

        // 4-byte encoding: 110xxxxx xxxxxxxx xxxxxxxx xxxxxxxx
        if (first_byte & 0xE0) == 0xC0 {
            let b1 = u32::from(self.read_le::<u8>()?);
            let b2 = u32::from(self.read_le::<u8>()?);
            let b3 = u32::from(self.read_le::<u8>()?);
            let value = ((u32::from(first_byte) & 0x1F) << 24) | (b1 << 16) | (b2 << 8) | b3;
            return Ok(value);
        }

        self.position = offset;
        Err(format_error!(
            at offset,
            "Invalid compressed uint leading byte - {:#04x}",
            first_byte
        ))
    }

    /// Read a compressed signed integer (ECMA-335 II.23.2).
    ///
    /// The sign bit is rotated into the least significant bit of the unsigned encoding,
    /// and the value is sign-extended from the width the encoding used.
    ///
    /// # Errors
    /// Returns [`crate::Error::Format`] on a truncated value or an invalid leading byte.
    pub fn read_compressed_int(&mut self) -> Result<i32> {
        let start = self.position;
        let unsigned = self.read_compressed_uint()?;
        let bits = match self.position - start {
            1 => 7,
            2 => 14,
            _ => 29,
        };

        let magnitude = unsigned >> 1;
        #[allow(clippy::cast_possible_wrap)]
        let signed = if (unsigned & 1) == 0 {
            magnitude as i32
        } else {
            (magnitude as i32) - (1 << (bits - 1))
        };

        Ok(signed)
    }

    /// Read a compressed `TypeDefOrRef` reference, as used inside signatures.
    ///
    /// Returns `None` for the null reference.
    ///
    /// # Errors
    /// Returns [`crate::Error::Format`] on an invalid encoding or a tag outside TypeDef,
    /// TypeRef and TypeSpec.
    pub fn read_compressed_token(&mut self) -> Result<Option<CodedIndex>> {
        let offset = self.position;
        let value = self.read_compressed_uint()?;
        CodedIndexKind::TypeDefOrRef
            .decode(value)
            .map_err(|_| format_error!(at offset, "Invalid compressed token - {:#x}", value))
    }
}

/// Encode `value` as a compressed unsigned integer.
///
/// # Errors
/// Returns [`crate::Error::Format`] if `value` exceeds [`COMPRESSED_UINT_MAX`].
#[allow(clippy::cast_possible_truncation)]
pub fn encode_compressed_uint(value: u32) -> Result<Vec<u8>> {
    match value {
        0..=0x7F => Ok(vec![value as u8]),
        0x80..=0x3FFF => Ok(vec![0x80 | (value >> 8) as u8, value as u8]),
        0x4000..=COMPRESSED_UINT_MAX => Ok(vec![
            0xC0 | (value >> 24) as u8,
            (value >> 16) as u8,
            (value >> 8) as u8,
            value as u8,
        ]),
        _ => Err(format_error!(
            "Value {:#x} exceeds the compressed integer range",
            value
        )),
    }
}
