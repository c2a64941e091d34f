//! Metadata root header and stream directory.
//!
//! The root is the first structure of the metadata: the `BSJB` magic, a version string and
//! the directory of named streams. Stream offsets in the directory are relative to the start
//! of the root.
//!
//! # Example
//!
//! ```rust
//! use winmdscope::metadata::root::Root;
//! let root = Root::read(&[
//!            0x42, 0x53, 0x4A, 0x42,
//!            0x01, 0x00,
//!            0x01, 0x00,
//!            0x00, 0x00, 0x00, 0x00,
//!            0x04, 0x00, 0x00, 0x00,
//!            b'v', b'4', 0x00, 0x00,
//!            0x00, 0x00,
//!            0x01, 0x00,
//!            0x20, 0x00, 0x00, 0x00,
//!            0x04, 0x00, 0x00, 0x00,
//!            0x23, 0x7E, 0x00, 0x00,
//!        ])?;
//! assert_eq!(root.version, "v4");
//! assert_eq!(root.stream_headers[0].name, "#~");
//! # Ok::<(), winmdscope::Error>(())
//! ```
//!
//! # References
//!
//! - [ECMA-335 II.24.2.1: Metadata root](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf)

use crate::{file::parser::Parser, metadata::streams::StreamHeader, Result};

/// The MAGIC value indicating the CIL header
pub const CIL_HEADER_MAGIC: u32 = 0x424A_5342;

/// Longest version string the root may declare, ECMA-335 II.24.2.1
const MAX_VERSION_LENGTH: u32 = 255;

/// The header of the present metadata and its stream directory.
#[derive(Debug, Clone)]
pub struct Root {
    /// `MajorVersion`, 1 for all known producers
    pub major_version: u16,
    /// `MinorVersion`, 1 for all known producers
    pub minor_version: u16,
    /// Reserved, always 0
    pub reserved: u32,
    /// The runtime version string, without padding
    pub version: String,
    /// Reserved, always 0
    pub flags: u16,
    /// The stream directory, in file order
    pub stream_headers: Vec<StreamHeader>,
}

impl Root {
    /// Reads a [`Root`] from the start of the metadata.
    ///
    /// # Arguments
    /// * `data` - The metadata, starting at the magic value
    ///
    /// # Errors
    /// Returns [`crate::Error::Format`] on a wrong magic, a truncated header or a stream
    /// that extends past the end of `data`.
    pub fn read(data: &[u8]) -> Result<Root> {
        let mut parser = Parser::new(data);

        let signature = parser.read_le::<u32>()?;
        if signature != CIL_HEADER_MAGIC {
            return Err(format_error!(
                at 0,
                "CIL_HEADER_MAGIC does not match - {:#010x}",
                signature
            ));
        }

        let major_version = parser.read_le::<u16>()?;
        let minor_version = parser.read_le::<u16>()?;
        let reserved = parser.read_le::<u32>()?;

        let version_length = parser.read_le::<u32>()?;
        if version_length > MAX_VERSION_LENGTH {
            return Err(format_error!(
                at 12,
                "Version string length {} exceeds {}",
                version_length,
                MAX_VERSION_LENGTH
            ));
        }

        let version_bytes = parser.read_bytes(version_length as usize)?;
        let version_end = version_bytes
            .iter()
            .position(|byte| *byte == 0)
            .unwrap_or(version_bytes.len());
        let version = std::str::from_utf8(&version_bytes[..version_end])
            .map_err(|_| format_error!(at 16, "Version string is not valid UTF-8"))?
            .to_string();
        parser.align(4)?;

        let flags = parser.read_le::<u16>()?;
        let stream_count = parser.read_le::<u16>()?;

        let mut stream_headers = Vec::with_capacity(usize::from(stream_count));
        for _ in 0..stream_count {
            let header = StreamHeader::read(&mut parser)?;

            match header.offset.checked_add(header.size) {
                Some(end) if end as usize <= data.len() => {}
                _ => {
                    return Err(format_error!(
                        "Stream {} ({:#x} + {:#x}) exceeds metadata of {} bytes",
                        header.name,
                        header.offset,
                        header.size,
                        data.len()
                    ))
                }
            }

            if stream_headers
                .iter()
                .any(|known: &StreamHeader| known.name == header.name)
            {
                return Err(format_error!("Duplicate stream {}", header.name));
            }

            stream_headers.push(header);
        }

        log::debug!(
            "metadata root {}.{} '{}' with {} streams",
            major_version,
            minor_version,
            version,
            stream_headers.len()
        );

        Ok(Root {
            major_version,
            minor_version,
            reserved,
            version,
            flags,
            stream_headers,
        })
    }

    /// Returns the header of the stream called `name`, if present.
    #[must_use]
    pub fn stream(&self, name: &str) -> Option<&StreamHeader> {
        self.stream_headers.iter().find(|header| header.name == name)
    }
}
