//! Metadata tables: identifiers, coded indices, column layouts and typed rows.
//!
//! Only the tables the attribute decoder reads have typed row structures. Every other table
//! is described by [`schema`] so its rows can be skipped with the exact width.
//!
//! # Key Components
//!
//! - [`TableId`] / [`TableInfo`] - table numbers, row counts, column widths
//! - [`CodedIndex`] / [`CodedIndexKind`] - packed references into one of several tables
//! - [`MetadataTable`] / [`RowReadable`] - lazily decoded typed rows
//! - [`TypeDefRaw`], [`TypeRefRaw`], [`MethodDefRaw`], [`FieldRaw`], [`ParamRaw`],
//!   [`MemberRefRaw`], [`CustomAttributeRaw`] - the typed rows
//!
//! # Reference
//! - [ECMA-335 II.22](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf)

mod customattribute;
mod field;
mod memberref;
mod methoddef;
mod param;
mod typedef;
mod typeref;
mod types;

pub use customattribute::*;
pub use field::*;
pub use memberref::*;
pub use methoddef::*;
pub use param::*;
pub use typedef::*;
pub use typeref::*;
pub use types::*;
