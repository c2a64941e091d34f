//! The `MemberRef` table (0x0A), references to members of other types.
//!
//! Every attribute constructor from another image is a `MemberRef` named `.ctor` whose
//! `class` is the attribute type.
//!
//! # Reference
//! - [ECMA-335 II.22.25](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf)

mod raw;

pub use raw::*;
