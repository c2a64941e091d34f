//! The CLI header (`IMAGE_COR20_HEADER`) of a PE image.
//!
//! Only the fields needed to find the metadata root are kept. The header is located through
//! data directory 14 of the optional header, see ECMA-335 II.25.3.3.

use crate::{file::parser::Parser, Result};

/// Size of the CLI header in bytes
pub const COR20_HEADER_SIZE: usize = 72;

/// The parts of the CLI header that locate the metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cor20Header {
    /// Size of the header in bytes, always 72
    pub cb: u32,
    /// Major version of the runtime required to run the image
    pub major_runtime_version: u16,
    /// Minor version of the runtime required to run the image
    pub minor_runtime_version: u16,
    /// RVA of the metadata root
    pub meta_data_rva: u32,
    /// Size of the metadata in bytes
    pub meta_data_size: u32,
    /// `COMIMAGE_FLAGS_*` bitmask
    pub flags: u32,
}

impl Cor20Header {
    /// Read the header from the start of `data`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Format`] if `data` is too short, the size field is not 72, or
    /// the metadata directory is empty.
    pub fn read(data: &[u8]) -> Result<Cor20Header> {
        let mut parser = Parser::new(data);

        let cb = parser.read_le::<u32>()?;
        if cb as usize != COR20_HEADER_SIZE {
            return Err(format_error!(
                "Invalid CLI header size: expected 72, got {}",
                cb
            ));
        }

        if data.len() < COR20_HEADER_SIZE {
            return Err(format_error!(
                "CLI header truncated to {} bytes",
                data.len()
            ));
        }

        let major_runtime_version = parser.read_le::<u16>()?;
        let minor_runtime_version = parser.read_le::<u16>()?;
        let meta_data_rva = parser.read_le::<u32>()?;
        let meta_data_size = parser.read_le::<u32>()?;
        if meta_data_rva == 0 || meta_data_size == 0 {
            return Err(format_error!("CLI header has no metadata directory"));
        }

        Ok(Cor20Header {
            cb,
            major_runtime_version,
            minor_runtime_version,
            meta_data_rva,
            meta_data_size,
            flags: parser.read_le::<u32>()?,
        })
    }
}
