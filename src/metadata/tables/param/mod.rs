//! The `Param` table (0x08).
//!
//! Sequence 0 names the return value; parameters proper start at sequence 1.
//!
//! # Reference
//! - [ECMA-335 II.22.33](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf)

mod raw;

pub use raw::*;

#[allow(non_snake_case)]
/// `ParamAttributes` flag constants of the `flags` column, ECMA-335 II.23.1.13
pub mod ParamAttributes {
    /// Parameter is an input
    pub const IN: u16 = 0x0001;
    /// Parameter is an output
    pub const OUT: u16 = 0x0002;
    /// Parameter is optional
    pub const OPTIONAL: u16 = 0x0010;
    /// Parameter has a default value
    pub const HAS_DEFAULT: u16 = 0x1000;
    /// Parameter has marshalling information
    pub const HAS_FIELD_MARSHAL: u16 = 0x2000;
}
