//! The `#Strings` heap, NUL-terminated UTF-8 identifiers referenced by byte offset.
//!
//! # Reference
//! - [ECMA-335 II.24.2.3](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf)

use std::{ffi::CStr, str};

use crate::Result;

/// View over the `#Strings` heap.
///
/// ```rust
/// use winmdscope::metadata::streams::Strings;
/// let heap = Strings::from(&[0x00, b'F', b'o', b'o', 0x00], 0)?;
/// assert_eq!(heap.get(1)?, "Foo");
/// assert_eq!(heap.get(0)?, "");
/// # Ok::<(), winmdscope::Error>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Strings<'a> {
    data: &'a [u8],
    base: usize,
}

impl<'a> Strings<'a> {
    /// Create a view over `data`, which starts at absolute offset `base` of the input.
    ///
    /// # Errors
    /// Returns [`crate::Error::Format`] if the heap is empty or does not start with the
    /// empty string.
    pub fn from(data: &'a [u8], base: usize) -> Result<Strings<'a>> {
        if data.first() != Some(&0) {
            return Err(format_error!(at base, "Provided #Strings heap is invalid"));
        }

        Ok(Strings { data, base })
    }

    /// Get the string starting at byte `index` of the heap.
    ///
    /// # Errors
    /// Returns [`crate::Error::Format`] if the index lies outside the heap, or the string is
    /// not terminated or not valid UTF-8.
    pub fn get(&self, index: usize) -> Result<&'a str> {
        let Some(tail) = self.data.get(index..) else {
            return Err(format_error!(
                at self.base,
                "#Strings index {:#x} outside heap of {} bytes",
                index,
                self.data.len()
            ));
        };

        CStr::from_bytes_until_nul(tail)
            .ok()
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| format_error!(at self.base + index, "Invalid #Strings entry"))
    }

    /// Size of the heap in bytes
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always `false` for a heap that passed [`Strings::from`]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
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
            b'W', b'i', b'n', b'd', b'o', b'w', b's', b'.', b'W', b'i', b'n', b'3', b'2', 0x00,
            b'G', b'u', b'i', b'd', b'A', b't', b't', b'r', b'i', b'b', b'u', b't', b'e', 0x00,
            b'H', b'W', b'N', b'D', 0x00,
        ];

        let heap = Strings::from(&data, 0x100).unwrap();

        assert_eq!(heap.get(0).unwrap(), "");
        assert_eq!(heap.get(1).unwrap(), "Windows.Win32");
        assert_eq!(heap.get(15).unwrap(), "GuidAttribute");
        assert_eq!(heap.get(19).unwrap(), "Attribute");
        assert_eq!(heap.get(29).unwrap(), "HWND");
    }

    #[test]
    fn invalid() {
        assert!(Strings::from(&[], 0).is_err());
        assert!(Strings::from(&[0x41, 0x00], 0).is_err());

        let heap = Strings::from(&[0x00, 0x41, 0x42], 0x20).unwrap();
        assert_eq!(heap.get(1).unwrap_err().offset(), Some(0x21));
        assert!(heap.get(4).is_err());

        let heap = Strings::from(&[0x00, 0xC3, 0x28, 0x00], 0).unwrap();
        assert!(heap.get(1).is_err());
    }
}
