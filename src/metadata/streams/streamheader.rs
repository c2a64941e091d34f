//! Stream headers of the metadata root's stream directory.
//!
//! # Reference
//! - [ECMA-335 II.24.2.2](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf)

use crate::{file::parser::Parser, Result};

/// Names of the streams a metadata image may carry. `#-` is the uncompressed table stream.
pub const VALID_STREAM_NAMES: [&str; 6] = ["#~", "#-", "#Strings", "#US", "#Blob", "#GUID"];

/// Longest stream name, including the terminating NUL
const MAX_NAME_LENGTH: usize = 32;

/// Location and name of one stream, relative to the metadata root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamHeader {
    /// Offset of the stream from the start of the metadata root
    pub offset: u32,
    /// Size of the stream in bytes
    pub size: u32,
    /// Name of the stream
    pub name: String,
}

impl StreamHeader {
    /// Read one header and skip the padding after its name.
    ///
    /// # Errors
    /// Returns [`crate::Error::Format`] if the header is truncated, the name is not terminated
    /// within 32 bytes or is not a known stream name.
    pub fn read(parser: &mut Parser) -> Result<StreamHeader> {
        let offset = parser.read_le::<u32>()?;
        let size = parser.read_le::<u32>()?;

        let name_start = parser.offset();
        let candidate = &parser.data()[..parser.remaining().min(MAX_NAME_LENGTH)];
        let Some(name_len) = candidate.iter().position(|byte| *byte == 0) else {
            return Err(format_error!(at name_start, "Unterminated stream name"));
        };

        let name = std::str::from_utf8(&candidate[..name_len])
            .ok()
            .filter(|name| VALID_STREAM_NAMES.contains(name))
            .ok_or_else(|| {
                format_error!(
                    at name_start,
                    "Invalid stream header name - {}",
                    String::from_utf8_lossy(&candidate[..name_len])
                )
            })?
            .to_string();

        // The name is padded to the next 4-byte boundary, including its NUL
        parser.skip((name_len + 1 + 3) & !3)?;

        Ok(StreamHeader { offset, size, name })
    }
}
