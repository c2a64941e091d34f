use thiserror::Error;

use crate::metadata::tables::CodedIndex;

/// Builds an [`Error::Format`], optionally anchored at an absolute byte offset.
///
/// ```rust, ignore
/// return Err(format_error!(at cursor.offset(), "Invalid prolog - {:#06x}", prolog));
/// return Err(format_error!("Missing #Strings heap"));
/// ```
macro_rules! format_error {
    (at $offset:expr, $($arg:tt)+) => {
        crate::Error::Format {
            message: format!($($arg)+),
            offset: Some($offset),
            file: file!(),
            line: line!(),
        }
    };

    ($($arg:tt)+) => {
        crate::Error::Format {
            message: format!($($arg)+),
            offset: None,
            file: file!(),
            line: line!(),
        }
    };
}

/// Builds an [`Error::UnsupportedFeature`], optionally anchored at an absolute byte offset.
macro_rules! unsupported_error {
    (at $offset:expr, $($arg:tt)+) => {
        crate::Error::UnsupportedFeature {
            message: format!($($arg)+),
            offset: Some($offset),
        }
    };

    ($($arg:tt)+) => {
        crate::Error::UnsupportedFeature {
            message: format!($($arg)+),
            offset: None,
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// # Error Categories
///
/// ## Decoding Errors
/// - [`Error::Format`] - malformed or unexpected binary shape
/// - [`Error::UnknownAttribute`] - an attribute outside the category's known and ignored catalogs
/// - [`Error::UnsupportedFeature`] - a valid encoding this decoder deliberately rejects
/// - [`Error::Decode`] - any of the above, annotated with the entity being decoded
///
/// ## Input Errors
/// - [`Error::Empty`] - empty input provided
/// - [`Error::NotSupported`] - input is neither a PE image nor a metadata root
/// - [`Error::FileError`] - filesystem I/O errors
/// - [`Error::GoblinErr`] - PE parsing errors from the goblin crate
///
/// Use [`Error::kind`] to classify an error regardless of the context wrapped around it.
#[derive(Error, Debug)]
pub enum Error {
    /// The metadata is damaged or has a shape this decoder does not expect.
    ///
    /// Covers bad magic values, truncated heaps and tables, invalid coded index tags,
    /// invalid compressed integers, attribute blobs with a wrong prolog, named arguments
    /// or trailing bytes, and argument values whose type differs from the declared one.
    #[error(
        "Malformed metadata{} - {message} ({file}:{line})",
        .offset.map_or_else(String::new, |offset| format!(" at {offset:#x}"))
    )]
    Format {
        /// Description of what was malformed
        message: String,
        /// Absolute offset into the backing buffer, if known
        offset: Option<usize>,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// A syntactically valid attribute that is neither extracted nor ignored for its category.
    #[error("Unknown custom attribute {attribute} on {entity}")]
    UnknownAttribute {
        /// The row the attribute is attached to
        entity: CodedIndex,
        /// Qualified name of the attribute type
        attribute: String,
    },

    /// A valid encoding that this decoder rejects on purpose.
    ///
    /// Variable-argument constructors, array-valued fixed arguments and constructors that are
    /// not references into another module all end up here.
    #[error(
        "Unsupported feature{} - {message}",
        .offset.map_or_else(String::new, |offset| format!(" at {offset:#x}"))
    )]
    UnsupportedFeature {
        /// Description of the unsupported construct
        message: String,
        /// Absolute offset into the backing buffer, if known
        offset: Option<usize>,
    },

    /// Decoding the attributes of an entity failed.
    #[error(
        "Failed to decode {}{entity} - {source}",
        .attribute.as_ref().map_or_else(String::new, |name| format!("{name} on "))
    )]
    Decode {
        /// The row whose attributes were being decoded
        entity: CodedIndex,
        /// Qualified name of the attribute, once it was resolved
        attribute: Option<String>,
        /// The underlying failure
        #[source]
        source: Box<Error>,
    },

    /// This input is neither a PE image nor a bare metadata root.
    #[error("This file type is not supported")]
    NotSupported,

    /// Provided input was empty.
    #[error("Provided input was empty")]
    Empty,

    /// File I/O error.
    #[error("{0}")]
    FileError(#[from] std::io::Error),

    /// Error from the goblin crate during PE parsing.
    #[error("{0}")]
    GoblinErr(#[from] goblin::error::Error),
}

/// Coarse classification of an [`Error`], looking through [`Error::Decode`] context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed or unexpected binary shape
    Format,
    /// Attribute absent from both the extractor and the ignore catalog
    UnknownAttribute,
    /// Deliberately unsupported encoding
    UnsupportedFeature,
    /// Problems with the input itself (I/O, PE container, empty or unknown file)
    Input,
}

impl Error {
    /// Returns the classification of the innermost error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Format { .. } => ErrorKind::Format,
            Error::UnknownAttribute { .. } => ErrorKind::UnknownAttribute,
            Error::UnsupportedFeature { .. } => ErrorKind::UnsupportedFeature,
            Error::Decode { source, .. } => source.kind(),
            Error::NotSupported | Error::Empty | Error::FileError(_) | Error::GoblinErr(_) => {
                ErrorKind::Input
            }
        }
    }

    /// Returns the innermost error, skipping any [`Error::Decode`] context.
    #[must_use]
    pub fn root_cause(&self) -> &Error {
        match self {
            Error::Decode { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Returns the absolute byte offset of the innermost error, if it has one.
    #[must_use]
    pub fn offset(&self) -> Option<usize> {
        match self.root_cause() {
            Error::Format { offset, .. } | Error::UnsupportedFeature { offset, .. } => *offset,
            _ => None,
        }
    }

    /// Wraps this error with the entity (and attribute, if known) that was being decoded.
    ///
    /// [`Error::UnknownAttribute`] already names both and is returned unchanged.
    pub(crate) fn in_entity(self, entity: CodedIndex, attribute: Option<String>) -> Error {
        match self {
            Error::UnknownAttribute { .. } | Error::Decode { .. } => self,
            other => Error::Decode {
                entity,
                attribute,
                source: Box::new(other),
            },
        }
    }
}
