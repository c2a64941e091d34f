//! The `TypeRef` table (0x01), references to types defined in other images.
//!
//! Most attribute types of a `.winmd` (`GuidAttribute`, `FlagsAttribute`, ...) are reached
//! through this table from the parent of an attribute constructor's `MemberRef`.
//!
//! # Reference
//! - [ECMA-335 II.22.38](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf)

mod raw;

pub use raw::*;
