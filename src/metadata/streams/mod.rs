//! The streams of the metadata root: the four heaps and the table stream.
//!
//! - [`Strings`] - `#Strings`, identifiers
//! - [`Blob`] - `#Blob`, signatures and attribute values
//! - [`Guid`] - `#GUID`
//! - [`UserStrings`] - `#US`, UTF-16 literals
//! - [`TablesHeader`] - `#~` / `#-`, the row tables

mod blob;
mod guid;
mod streamheader;
mod strings;
mod tablesheader;
mod userstrings;

pub use blob::Blob;
pub use guid::Guid;
pub use streamheader::{StreamHeader, VALID_STREAM_NAMES};
pub use strings::Strings;
pub use tablesheader::TablesHeader;
pub use userstrings::UserStrings;
