//! The `Field` table (0x04): struct members, enum values and `Apis` constants.
//!
//! # Reference
//! - [ECMA-335 II.22.15](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf)

mod raw;

pub use raw::*;

#[allow(non_snake_case)]
/// `FieldAttributes` flag constants of the `flags` column, ECMA-335 II.23.1.5
pub mod FieldAttributes {
    /// Field is static, set on enum members and constants
    pub const STATIC: u16 = 0x0010;
    /// Field is a compile-time constant with a `Constant` row
    pub const LITERAL: u16 = 0x0040;
    /// Field has a special name, set on the `value__` field of enums
    pub const SPECIAL_NAME: u16 = 0x0200;
    /// Field has a default value
    pub const HAS_DEFAULT: u16 = 0x8000;
}
