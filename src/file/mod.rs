//! Input handling: backends that own the raw bytes and the lookup of the metadata root.
//!
//! A `.winmd` file is either a PE image whose CLI header points at the metadata, or, for
//! tooling that already extracted it, the bare metadata root starting with `BSJB`. Both are
//! accepted; [`locate_metadata`] tells them apart and returns the window that the metadata
//! occupies.
//!
//! # Key Components
//!
//! - [`Backend`] - Trait for data sources (memory-mapped files, owned buffers)
//! - [`parser::Parser`] - Sequential cursor used by every heap and blob reader
//! - [`io`] - Bounds-checked little-endian primitives

pub mod io;
pub mod parser;

mod memory;
mod physical;

pub(crate) use memory::Memory;
pub(crate) use physical::Physical;

use crate::{
    metadata::{cor20header::Cor20Header, root::CIL_HEADER_MAGIC},
    Error::{Empty, GoblinErr, NotSupported},
    Result,
};
use goblin::pe::{section_table::SectionTable, PE};

/// Backend trait for file data sources.
///
/// Abstracts over where the bytes live so that the metadata store can hold either a mapped
/// file or an owned buffer. All implementations must be thread-safe.
pub trait Backend: Send + Sync {
    /// Returns the entire data buffer.
    fn data(&self) -> &[u8];

    /// Returns a bounds-checked slice of `len` bytes at `offset`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Format`] if the requested range is out of bounds.
    fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]> {
        let data = self.data();
        let Some(end) = offset.checked_add(len) else {
            return Err(format_error!(
                "Offset overflow - {} + {} bytes",
                offset,
                len
            ));
        };

        if end > data.len() {
            return Err(format_error!(
                at offset,
                "Slice of {} bytes exceeds data of {} bytes",
                len,
                data.len()
            ));
        }

        Ok(&data[offset..end])
    }

    /// Returns the total length of the data buffer.
    fn len(&self) -> usize {
        self.data().len()
    }
}

/// Find the metadata root inside `data` and return its `(offset, len)`.
///
/// # Errors
/// - [`crate::Error::Empty`] for empty input
/// - [`crate::Error::NotSupported`] if `data` is neither a PE image nor a metadata root
/// - [`crate::Error::GoblinErr`] if the PE headers cannot be parsed
/// - [`crate::Error::Format`] if the PE image carries no usable CLI header
pub(crate) fn locate_metadata(data: &[u8]) -> Result<(usize, usize)> {
    if data.is_empty() {
        return Err(Empty);
    }

    if data.len() >= 4 && io::read_le::<u32>(data)? == CIL_HEADER_MAGIC {
        log::trace!("input is a bare metadata root of {} bytes", data.len());
        return Ok((0, data.len()));
    }

    if !data.starts_with(b"MZ") {
        return Err(NotSupported);
    }

    let pe = PE::parse(data).map_err(GoblinErr)?;
    let Some(optional_header) = pe.header.optional_header else {
        return Err(format_error!("File does not have an OptionalHeader"));
    };
    let Some(clr) = optional_header.data_directories.get_clr_runtime_header() else {
        return Err(format_error!(
            "File does not have a CLR runtime header directory"
        ));
    };

    let clr_offset = rva_to_offset(&pe.sections, clr.virtual_address)?;
    let clr_len = clr.size as usize;
    let clr_data = data
        .get(clr_offset..)
        .map(|rest| &rest[..rest.len().min(clr_len)])
        .ok_or_else(|| format_error!(at clr_offset, "CLI header lies outside of the file"))?;
    let header = Cor20Header::read(clr_data)?;

    let offset = rva_to_offset(&pe.sections, header.meta_data_rva)?;
    let len = header.meta_data_size as usize;
    match offset.checked_add(len) {
        Some(end) if end <= data.len() => {
            log::trace!("metadata root at {offset:#x}, {len} bytes");
            Ok((offset, len))
        }
        _ => Err(format_error!(
            at offset,
            "Metadata of {} bytes exceeds the file",
            len
        )),
    }
}

/// Convert a relative virtual address to a file offset using the section table.
fn rva_to_offset(sections: &[SectionTable], rva: u32) -> Result<usize> {
    for section in sections {
        let extent = section.virtual_size.max(section.size_of_raw_data);
        let Some(section_max) = section.virtual_address.checked_add(extent) else {
            return Err(format_error!(
                "Section malformed, causing integer overflow - {} + {}",
                section.virtual_address,
                extent
            ));
        };

        if section.virtual_address <= rva && rva < section_max {
            return Ok((rva - section.virtual_address) as usize
                + section.pointer_to_raw_data as usize);
        }
    }

    Err(format_error!(
        "RVA could not be converted to offset - {:#x}",
        rva
    ))
}
