//! The per-category results of attribute extraction.
//!
//! Every record starts from its documented defaults and is filled in by the extractors of
//! its category. The decoder hands out the finished record by value.

use bitflags::bitflags;

use crate::metadata::customattributes::{ArgumentData, LazyString};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    /// Processor architectures an API is available on, `SupportedArchitectureAttribute`
    pub struct Architecture: u32 {
        /// 32-bit x86
        const X86 = 0x0001;
        /// x86-64
        const X64 = 0x0002;
        /// 64-bit ARM
        const ARM64 = 0x0004;
    }
}

impl Default for Architecture {
    fn default() -> Self {
        Architecture::all()
    }
}

/// Attributes of a `TypeDef`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TypeCustomAttributeData<'a> {
    /// Architectures the type exists on, all by default
    pub supported_architecture: Architecture,
    /// Link to the documentation
    pub documentation_url: Option<LazyString<'a>>,
    /// Interface or class id
    pub guid: Option<uguid::Guid>,
    /// The type is a native typedef, a struct wrapping a single value
    pub is_typedef: bool,
    /// The enum's values are bit flags
    pub is_enum_flags: bool,
    /// Name of the field that has to be set to the struct size
    pub struct_size_field: Option<&'a str>,
}

/// Attributes of a `MethodDef`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MethodCustomAttributeData<'a> {
    /// Architectures the function exists on, all by default
    pub supported_architecture: Architecture,
    /// Link to the documentation
    pub documentation_url: Option<LazyString<'a>>,
    /// Value of a constant
    pub constant: Option<ArgumentData<'a>>,
}

/// Attributes of a `Field`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldCustomAttributeData<'a> {
    /// Architectures the field exists on, all by default
    pub supported_architecture: Architecture,
    /// Link to the documentation
    pub documentation_url: Option<LazyString<'a>>,
    /// GUID constant
    pub guid: Option<uguid::Guid>,
    /// String data is ANSI encoded
    pub is_ansi_encoding: bool,
    /// The field is a variable-length array at the end of its struct
    pub is_flexible_array: bool,
    /// Value of a constant
    pub constant: Option<ArgumentData<'a>>,
}

/// Attributes of a `Param`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParamCustomAttributeData<'a> {
    /// Name of the enum whose values the parameter takes
    pub associated_enum: Option<&'a str>,
}
