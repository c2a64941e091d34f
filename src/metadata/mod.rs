//! Parsing of ECMA-335 metadata as found in Windows metadata files.
//!
//! A `.winmd` file is a PE image whose CLI header points at a metadata root. The root
//! names a handful of streams: three or four heaps and the table stream holding every row.
//! This module decodes all of them without copying and layers the type system and the
//! custom attribute decoder on top.
//!
//! # Key Components
//!
//! - [`store::MetadataStore`] - owns the input and the parsed view
//! - [`view::MetadataView`] - heap and row accessors over one buffer
//! - [`tables`] - table ids, coded indices, column layouts and typed rows
//! - [`streams`] - the `#Strings`, `#Blob`, `#GUID`, `#US` heaps and the table stream header
//! - [`typesystem`] - element types and the memoizing type resolver
//! - [`customattributes`] - attribute values and the per-category records
//!
//! # Examples
//!
//! ```rust,no_run
//! use winmdscope::{metadata::tables::TableId, MetadataStore};
//!
//! let store = MetadataStore::from_file("Windows.Win32.winmd".as_ref())?;
//! let view = store.view();
//!
//! for index in 0..view.row_count(TableId::TypeDef) {
//!     println!("{}", view.type_def_name(index)?);
//! }
//! # Ok::<(), winmdscope::Error>(())
//! ```

/// The CLI header of a PE image
pub mod cor20header;
/// Custom attribute values and the per-category records
pub mod customattributes;
/// The metadata root and its stream directory
pub mod root;
/// The owning entry point
pub mod store;
/// Heaps and the table stream header
pub mod streams;
/// Table identifiers, coded indices and typed rows
pub mod tables;
/// Element types, qualified names and type resolution
pub mod typesystem;
/// The parsed metadata, borrowing from its input
pub mod view;
