// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![allow(clippy::too_many_arguments)]
// - 'file/physical.rs' uses mmap to map a file into memory

//! # winmdscope
//!
//! A zero-copy decoder for Windows metadata files (`.winmd`), the ECMA-335 encoded
//! description of the Win32 API surface. `winmdscope` reads the metadata root, the
//! `#Strings`, `#Blob`, `#GUID` and `#US` heaps and every row table, and turns the custom
//! attributes attached to types, methods, fields and parameters into strongly typed
//! records that a binding generator can consume directly.
//!
//! ## Features
//!
//! - **Zero-copy access** - heaps, rows and attribute strings are views into one backing buffer
//! - **Complete table layout** - every ECMA-335 table is sized, so any image can be walked
//! - **Strict attribute decoding** - unknown attributes and unexpected encodings are errors, never guesses
//! - **Thread friendly** - the store is immutable after parsing and can be shared across workers
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use winmdscope::prelude::*;
//!
//! let store = MetadataStore::from_file("Windows.Win32.winmd".as_ref())?;
//! let decoder = CustomAttributeDecoder::new(store.view())?;
//!
//! for index in 0..store.view().row_count(TableId::TypeDef) {
//!     let attributes = decoder.type_def_attributes(index)?;
//!     if let Some(guid) = attributes.guid {
//!         println!("type #{index} has interface id {guid}");
//!     }
//! }
//! # Ok::<(), winmdscope::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`metadata::store`] - owning entry point, loads PE images and bare metadata blobs
//! - [`metadata::view`] - the parsed metadata with heap and row accessors
//! - [`metadata::tables`] - table ids, coded indices and raw row structures
//! - [`metadata::typesystem`] - element types, qualified names and the memoizing type resolver
//! - [`metadata::customattributes`] - the attribute decoder and per-category records
//! - [`events`] - progress and diagnostic events raised by tools built on top of this crate

#[macro_use]
pub(crate) mod error;
pub(crate) mod file;

/// Shared functionality which is used in unit- and integration-tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust,no_run
/// use winmdscope::prelude::*;
///
/// let store = MetadataStore::from_file("Windows.Win32.winmd".as_ref())?;
/// println!("{} types", store.view().row_count(TableId::TypeDef));
/// # Ok::<(), winmdscope::Error>(())
/// ```
pub mod prelude;

/// Events raised by generation pipelines built on top of the decoder.
///
/// The decoder itself never raises events; it reports exclusively through return values.
pub mod events;

/// Parsing of ECMA-335 metadata: the root, heaps, tables, type system and custom attributes.
pub mod metadata;

/// `winmdscope` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `winmdscope` Error type
///
/// # Examples
///
/// ```rust,no_run
/// use winmdscope::{Error, ErrorKind, MetadataStore};
///
/// match MetadataStore::from_file(std::path::Path::new("Windows.Win32.winmd")) {
///     Ok(_) => println!("Loaded successfully"),
///     Err(e) if e.kind() == ErrorKind::Format => println!("Malformed: {e}"),
///     Err(e) => println!("Error: {e}"),
/// }
/// ```
pub use error::{Error, ErrorKind};

/// The byte cursor used for every heap, blob and signature read.
pub use file::parser::Parser;

/// Main entry point for loading metadata. See [`metadata::store::MetadataStore`].
pub use metadata::store::MetadataStore;
