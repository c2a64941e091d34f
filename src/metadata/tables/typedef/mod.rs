//! The `TypeDef` table (0x02), one row per type defined in the image.
//!
//! In a `.winmd` every Win32 struct, enum, interface, delegate and the per-namespace `Apis`
//! class holding functions and constants is a `TypeDef`. The `field_list` and `method_list`
//! columns open a run of rows in the `Field` and `MethodDef` tables that lasts until the
//! next `TypeDef`'s run begins.
//!
//! # Reference
//! - [ECMA-335 II.22.37](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf)

mod raw;

pub use raw::*;

#[allow(non_snake_case)]
/// `TypeAttributes` flag constants of the `flags` column, ECMA-335 II.23.1.15
pub mod TypeAttributes {
    /// Mask for the visibility bits
    pub const VISIBILITY_MASK: u32 = 0x0000_0007;
    /// Type is visible outside the image
    pub const PUBLIC: u32 = 0x0000_0001;
    /// Mask for the layout bits
    pub const LAYOUT_MASK: u32 = 0x0000_0018;
    /// Fields are laid out sequentially
    pub const SEQUENTIAL_LAYOUT: u32 = 0x0000_0008;
    /// Field offsets are given explicitly, used for unions
    pub const EXPLICIT_LAYOUT: u32 = 0x0000_0010;
    /// Type is an interface
    pub const INTERFACE: u32 = 0x0000_0020;
    /// Type is abstract
    pub const ABSTRACT: u32 = 0x0000_0080;
    /// Type cannot be derived from
    pub const SEALED: u32 = 0x0000_0100;
    /// Type is imported, set on COM interfaces
    pub const IMPORT: u32 = 0x0000_1000;
    /// Windows Runtime type
    pub const WINDOWS_RUNTIME: u32 = 0x0000_4000;
}
