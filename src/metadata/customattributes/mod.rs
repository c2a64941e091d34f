//! Custom attribute decoding for Windows metadata.
//!
//! Win32 metadata describes most of what a binding generator needs (interface ids,
//! architecture restrictions, documentation links, enum semantics) through custom
//! attributes. This module turns them into one record per entity category:
//!
//! - [`TypeCustomAttributeData`] for `TypeDef` rows
//! - [`MethodCustomAttributeData`] for `MethodDef` rows
//! - [`FieldCustomAttributeData`] for `Field` rows
//! - [`ParamCustomAttributeData`] for `Param` rows
//!
//! Which attributes feed which record is fixed by the catalogs in [`AttributeRecord`]
//! implementations. An attribute missing from both the extractors and the ignore list of
//! its category fails the decode with [`crate::Error::UnknownAttribute`].
//!
//! # Examples
//!
//! ```rust,no_run
//! use winmdscope::{
//!     metadata::{customattributes::CustomAttributeDecoder, tables::TableId},
//!     MetadataStore,
//! };
//!
//! let store = MetadataStore::from_file("Windows.Win32.winmd".as_ref())?;
//! let decoder = CustomAttributeDecoder::new(store.view())?;
//!
//! for index in 0..store.view().row_count(TableId::Field) {
//!     let field = decoder.field_attributes(index)?;
//!     if let Some(constant) = field.constant {
//!         println!("field #{index} = {constant}");
//!     }
//! }
//! # Ok::<(), winmdscope::Error>(())
//! ```

mod catalog;
mod decoder;
mod guid;
mod lazystring;
mod records;
mod types;

pub use catalog::{AttributeRecord, Extractor, METADATA_NAMESPACE};
pub use decoder::{CustomAttributeDecoder, DecodedAttribute, ExtractionContext};
pub use guid::{guid_from_value, GUID_ARGUMENT_COUNT};
pub use lazystring::LazyString;
pub use records::{
    Architecture, FieldCustomAttributeData, MethodCustomAttributeData, ParamCustomAttributeData,
    TypeCustomAttributeData,
};
pub use types::{ArgumentData, ArgumentValue, CustomAttributeValue};
