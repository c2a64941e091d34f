use std::{fmt, sync::Arc};

use crate::metadata::{
    tables::CodedIndex,
    typesystem::{ElementType, QualifiedName},
};

/// A resolved type, as it appears in signatures.
///
/// Named types are handed out by [`crate::metadata::typesystem::TypeResolver`], which
/// returns the same shared allocation for every occurrence of a name.
#[derive(Debug, Clone, PartialEq)]
pub enum Type<'a> {
    /// A built-in type, one of the codes for which [`ElementType::is_primitive`] holds
    Primitive(ElementType),
    /// A type deriving from `System.Enum`
    Enum(Arc<EnumType<'a>>),
    /// A single-dimensional, zero-based array
    Array(Arc<Type<'a>>),
    /// Any other named type: structs, interfaces, delegates, classes
    Reference(Arc<TypeReference<'a>>),
}

impl<'a> Type<'a> {
    /// The qualified name of a named type
    #[must_use]
    pub fn name(&self) -> Option<QualifiedName<'a>> {
        match self {
            Type::Enum(enum_type) => Some(enum_type.name),
            Type::Reference(reference) => Some(reference.name),
            Type::Primitive(_) | Type::Array(_) => None,
        }
    }

    /// Returns `true` if both values share one resolver allocation, or are equal primitives
    #[must_use]
    pub fn is_same(&self, other: &Type<'a>) -> bool {
        match (self, other) {
            (Type::Primitive(left), Type::Primitive(right)) => left == right,
            (Type::Enum(left), Type::Enum(right)) => Arc::ptr_eq(left, right),
            (Type::Reference(left), Type::Reference(right)) => Arc::ptr_eq(left, right),
            (Type::Array(left), Type::Array(right)) => left.is_same(right),
            _ => false,
        }
    }
}

impl fmt::Display for Type<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Primitive(element) => write!(f, "{element}"),
            Type::Enum(enum_type) => write!(f, "{} : {}", enum_type.name, enum_type.base),
            Type::Array(element) => write!(f, "{element}[]"),
            Type::Reference(reference) => write!(f, "{}", reference.name),
        }
    }
}

/// An enumeration and the integer type it is stored as
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumType<'a> {
    /// Name of the enum type
    pub name: QualifiedName<'a>,
    /// Element type of the `value__` field
    pub base: ElementType,
    /// The `TypeDef` row the enum was resolved from
    pub definition: CodedIndex,
}

/// A named type that is neither primitive nor an enum
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeReference<'a> {
    /// Name of the type
    pub name: QualifiedName<'a>,
    /// The `TypeDef` row if the type is defined in this image, otherwise the `TypeRef` row
    pub source: CodedIndex,
}

/// A decoded `MethodDefSig` or `MethodRefSig`
#[derive(Debug, Clone, PartialEq)]
pub struct MethodSignature<'a> {
    /// The method takes a `this` pointer
    pub has_this: bool,
    /// Number of generic parameters, 0 for non-generic methods
    pub generic_param_count: u32,
    /// Return type, `Primitive(Void)` for constructors
    pub return_type: Type<'a>,
    /// Parameter types in declaration order
    pub params: Vec<Type<'a>>,
}
