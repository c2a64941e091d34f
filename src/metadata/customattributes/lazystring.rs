use std::{fmt, str};

use crate::Result;

/// A string inside the backing buffer that is decoded only when asked for.
///
/// Holds the buffer, the absolute offset and the byte length of a UTF-8 string from an
/// attribute value blob. Nothing is copied or validated until [`LazyString::decode`].
///
/// ```rust
/// use winmdscope::metadata::customattributes::LazyString;
///
/// let blob = b"\x01\x00\x05Hello\x00\x00";
/// let text = LazyString::new(blob, 3, 5)?;
/// assert_eq!(text.decode()?, "Hello");
/// assert_eq!(text.decode()?, text.decode()?);
/// # Ok::<(), winmdscope::Error>(())
/// ```
#[derive(Clone, Copy)]
pub struct LazyString<'a> {
    data: &'a [u8],
    offset: usize,
    len: usize,
}

impl<'a> LazyString<'a> {
    /// Reference `len` bytes of `data` at `offset`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Format`] if the range lies outside `data`.
    pub fn new(data: &'a [u8], offset: usize, len: usize) -> Result<Self> {
        match offset.checked_add(len) {
            Some(end) if end <= data.len() => Ok(LazyString { data, offset, len }),
            _ => Err(format_error!(
                at offset,
                "String of {} bytes exceeds the buffer",
                len
            )),
        }
    }

    /// Absolute offset of the first byte
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Length in bytes
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` for the empty string
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The undecoded bytes
    #[must_use]
    pub fn bytes(&self) -> &'a [u8] {
        &self.data[self.offset..self.offset + self.len]
    }

    /// Decode the string.
    ///
    /// # Errors
    /// Returns [`crate::Error::Format`] if the bytes are not valid UTF-8.
    pub fn decode(&self) -> Result<&'a str> {
        str::from_utf8(self.bytes()).map_err(|error| {
            format_error!(
                at self.offset + error.valid_up_to(),
                "String is not valid UTF-8"
            )
        })
    }
}

impl PartialEq for LazyString<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.bytes() == other.bytes()
    }
}

impl Eq for LazyString<'_> {}

impl fmt::Debug for LazyString<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LazyString({:#x}, {:?})", self.offset, String::from_utf8_lossy(self.bytes()))
    }
}

impl fmt::Display for LazyString<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(self.bytes()))
    }
}
