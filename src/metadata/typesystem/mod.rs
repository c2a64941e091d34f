//! The type model that signatures and attribute arguments are decoded into.
//!
//! - [`ElementType`] - the `ELEMENT_TYPE_*` codes
//! - [`QualifiedName`] - namespace and name, the key of all type lookups
//! - [`Type`] - primitives, enums, arrays and opaque named types
//! - [`TypeResolver`] - decodes signatures and memoizes named types

mod elementtype;
mod qualifiedname;
mod resolver;
mod types;

pub use elementtype::ElementType;
pub use qualifiedname::QualifiedName;
pub use resolver::TypeResolver;
pub use types::{EnumType, MethodSignature, Type, TypeReference};
