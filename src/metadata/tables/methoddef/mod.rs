//! The `MethodDef` table (0x06).
//!
//! Win32 functions are static `PInvokeImpl` methods on the per-namespace `Apis` class. COM
//! methods are abstract virtual methods on interface types. Attribute constructors defined
//! in the same image are also `MethodDef` rows.
//!
//! # Reference
//! - [ECMA-335 II.22.26](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf)

mod raw;

pub use raw::*;

#[allow(non_snake_case)]
/// `MethodAttributes` flag constants of the `flags` column, ECMA-335 II.23.1.10
pub mod MethodAttributes {
    /// Method is static
    pub const STATIC: u16 = 0x0010;
    /// Method is virtual
    pub const VIRTUAL: u16 = 0x0040;
    /// Method has no implementation
    pub const ABSTRACT: u16 = 0x0400;
    /// Method has a special name, constructors and accessors
    pub const SPECIAL_NAME: u16 = 0x0800;
    /// Method is implemented through P/Invoke
    pub const PINVOKE_IMPL: u16 = 0x2000;
}
