//! The `#US` heap of UTF-16 string literals.
//!
//! Entries are a compressed byte length followed by UTF-16LE code units and one trailing
//! flag byte. Windows metadata rarely references this heap, but it is read like any other.
//!
//! # Reference
//! - [ECMA-335 II.24.2.4](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf)

use widestring::U16String;

use crate::{file::parser::Parser, Result};

/// View over the `#US` heap.
#[derive(Debug, Clone, Copy)]
pub struct UserStrings<'a> {
    buffer: &'a [u8],
    start: usize,
    len: usize,
}

impl<'a> UserStrings<'a> {
    /// Create a view over `len` bytes of `buffer` starting at `start`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Format`] if the range is outside `buffer` or the heap does not
    /// start with the empty string.
    pub fn from(buffer: &'a [u8], start: usize, len: usize) -> Result<UserStrings<'a>> {
        let heap = Parser::with_window(buffer, start, len)?;
        if heap.peek_byte().ok() != Some(0) {
            return Err(format_error!(at start, "Invalid memory for #US heap"));
        }

        Ok(UserStrings { buffer, start, len })
    }

    /// Decode the string at byte `index` of the heap.
    ///
    /// # Errors
    /// Returns [`crate::Error::Format`] if the entry runs past the heap or is not valid UTF-16.
    pub fn get(&self, index: usize) -> Result<String> {
        if index >= self.len {
            return Err(format_error!(
                at self.start,
                "#US index {:#x} outside heap of {} bytes",
                index,
                self.len
            ));
        }

        let mut heap = Parser::with_window(self.buffer, self.start, self.len)?;
        heap.seek(index)?;

        let offset = heap.offset();
        let byte_len = heap.read_compressed_uint()? as usize;
        let bytes = heap.read_bytes(byte_len)?;

        // The last byte is a flag, not part of the text
        let units: Vec<u16> = bytes[..byte_len & !1]
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();

        U16String::from_vec(units)
            .to_string()
            .map_err(|_| format_error!(at offset, "Invalid UTF-16 in #US entry"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crafted() {
        #[rustfmt::skip]
        let data = [
            0x00,
            0x1b, 0x48, 0x00, 0x65, 0x00, 0x6c, 0x00, 0x6c, 0x00, 0x6f, 0x00, 0x2c, 0x00, 0x20, 0x00, 0x57, 0x00, 0x6f, 0x00, 0x72, 0x00, 0x6c, 0x00, 0x64, 0x00, 0x21, 0x00, 0x00,
            0x01, 0x00,
        ];

        let heap = UserStrings::from(&data, 0, data.len()).unwrap();

        assert_eq!(heap.get(1).unwrap(), "Hello, World!");
        assert_eq!(heap.get(29).unwrap(), "");
    }

    #[test]
    fn invalid() {
        assert!(UserStrings::from(&[], 0, 0).is_err());
        assert!(UserStrings::from(&[0x22, 0x00], 0, 2).is_err());

        let unpaired = [0x00, 0x03, 0x00, 0xD8, 0x00];
        let heap = UserStrings::from(&unpaired, 0, unpaired.len()).unwrap();
        assert!(heap.get(1).is_err());
        assert!(heap.get(5).is_err());
    }
}
