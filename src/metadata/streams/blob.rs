//! The `#Blob` heap: signatures, attribute values and other length-prefixed byte runs.
//!
//! Every entry starts with a compressed length. [`Blob::get`] hands out a [`Parser`]
//! windowed to exactly that entry, with absolute offsets preserved for error reporting.
//!
//! # Reference
//! - [ECMA-335 II.24.2.4](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf)

use crate::{file::parser::Parser, Result};

/// View over the `#Blob` heap.
#[derive(Debug, Clone, Copy)]
pub struct Blob<'a> {
    buffer: &'a [u8],
    start: usize,
    len: usize,
}

impl<'a> Blob<'a> {
    /// Create a view over `len` bytes of `buffer` starting at `start`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Format`] if the range is outside `buffer` or the heap does not
    /// start with the empty blob.
    pub fn from(buffer: &'a [u8], start: usize, len: usize) -> Result<Blob<'a>> {
        let heap = Parser::with_window(buffer, start, len)?;
        if heap.peek_byte().ok() != Some(0) {
            return Err(format_error!(at start, "Invalid memory for #Blob heap"));
        }

        Ok(Blob { buffer, start, len })
    }

    /// Get a cursor over the blob at byte `index` of the heap.
    ///
    /// # Errors
    /// Returns [`crate::Error::Format`] if the index or the declared length run past the
    /// end of the heap.
    pub fn get(&self, index: usize) -> Result<Parser<'a>> {
        if index >= self.len {
            return Err(format_error!(
                at self.start,
                "#Blob index {:#x} outside heap of {} bytes",
                index,
                self.len
            ));
        }

        let mut heap = Parser::with_window(self.buffer, self.start, self.len)?;
        heap.seek(index)?;

        let len = heap.read_compressed_uint()? as usize;
        heap.slice(len)
    }

    /// Size of the heap in bytes
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always `false` for a heap that passed [`Blob::from`]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crafted() {
        #[rustfmt::skip]
        let data = [
            0xEE, 0xEE,
            0x00,
            0x03, 0x20, 0x01, 0x01,
            0x04, 0x01, 0x00, 0x00, 0x00,
            0x80, 0x02, 0xAA, 0xBB,
        ];

        let heap = Blob::from(&data, 2, 14).unwrap();

        let empty = heap.get(0).unwrap();
        assert!(empty.is_empty());

        let mut signature = heap.get(1).unwrap();
        assert_eq!(signature.len(), 3);
        assert_eq!(signature.offset(), 4);
        assert_eq!(signature.read_le::<u8>().unwrap(), 0x20);

        let value = heap.get(5).unwrap();
        assert_eq!(value.data(), &[0x01, 0x00, 0x00, 0x00]);

        let two_byte_len = heap.get(10).unwrap();
        assert_eq!(two_byte_len.data(), &[0xAA, 0xBB]);
    }

    #[test]
    fn invalid() {
        let data = [0x00, 0x05, 0x01];

        assert!(Blob::from(&data, 1, 2).is_err());
        assert!(Blob::from(&data, 0, 4).is_err());

        let heap = Blob::from(&data, 0, 3).unwrap();
        assert!(heap.get(1).is_err());
        assert!(heap.get(3).is_err());
    }
}
