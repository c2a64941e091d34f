//! The `#GUID` heap, an array of 16-byte GUIDs addressed by 1-based index.
//!
//! # Reference
//! - [ECMA-335 II.24.2.5](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf)

use crate::Result;

/// Size of one heap entry
const GUID_SIZE: usize = 16;

/// View over the `#GUID` heap.
#[derive(Debug, Clone, Copy)]
pub struct Guid<'a> {
    data: &'a [u8],
    base: usize,
}

impl<'a> Guid<'a> {
    /// Create a view over `data`, which starts at absolute offset `base` of the input.
    ///
    /// An empty heap is valid; images without a Module GUID may carry one.
    ///
    /// # Errors
    /// Returns [`crate::Error::Format`] if the size is not a multiple of 16.
    pub fn from(data: &'a [u8], base: usize) -> Result<Guid<'a>> {
        if data.len() % GUID_SIZE != 0 {
            return Err(format_error!(
                at base,
                "#GUID heap size {} is not a multiple of 16",
                data.len()
            ));
        }

        Ok(Guid { data, base })
    }

    /// Get the GUID at the 1-based `index`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Format`] for index 0 or an index past the end of the heap.
    pub fn get(&self, index: usize) -> Result<uguid::Guid> {
        let entry = index
            .checked_sub(1)
            .and_then(|slot| slot.checked_mul(GUID_SIZE))
            .and_then(|start| self.data.get(start..start + GUID_SIZE));

        let Some(entry) = entry else {
            return Err(format_error!(
                at self.base,
                "#GUID index {} outside heap of {} entries",
                index,
                self.count()
            ));
        };

        let mut buffer = [0u8; GUID_SIZE];
        buffer.copy_from_slice(entry);
        Ok(uguid::Guid::from_bytes(buffer))
    }

    /// Number of GUIDs in the heap
    #[must_use]
    pub fn count(&self) -> usize {
        self.data.len() / GUID_SIZE
    }
}
