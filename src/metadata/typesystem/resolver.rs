//! Signature decoding and type resolution.
//!
//! [`TypeResolver`] turns the type encodings found in signature blobs into [`Type`] values.
//! Named types are resolved once and memoized, so every signature that mentions the same
//! type receives a clone of the same `Arc`.
//!
//! # Reference
//! - [ECMA-335 II.23.2](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf)

use std::{collections::HashMap, sync::Arc};

use dashmap::{mapref::entry::Entry, DashMap};

use crate::{
    file::parser::Parser,
    metadata::{
        tables::{CodedIndex, FieldAttributes, TableId},
        typesystem::{ElementType, EnumType, MethodSignature, QualifiedName, Type, TypeReference},
        view::MetadataView,
    },
    Result,
};

/// Nesting limit for array element types
const MAX_RECURSION_DEPTH: usize = 50;

/// Calling convention byte: instance method
const HAS_THIS: u8 = 0x20;
/// Calling convention byte: generic method, a generic parameter count follows
const GENERIC: u8 = 0x10;
/// Calling convention mask and its variable argument value
const CALL_CONV_MASK: u8 = 0x0F;
const VARARG: u8 = 0x05;
/// Leading byte of a field signature
const FIELD: u8 = 0x06;

/// Memoization key of a named type.
///
/// Nested types have no namespace and frequently share names with types nested elsewhere,
/// so they are keyed by the row they were resolved from instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum TypeKey<'a> {
    Named(QualifiedName<'a>),
    Nested(CodedIndex),
}

/// Resolves signature types against one [`MetadataView`].
///
/// The resolver is `Sync`; one instance can serve any number of worker threads.
pub struct TypeResolver<'a> {
    view: &'a MetadataView<'a>,
    type_defs: HashMap<QualifiedName<'a>, u32>,
    cache: DashMap<TypeKey<'a>, Type<'a>>,
}

impl<'a> TypeResolver<'a> {
    /// Create a resolver and index the names of all `TypeDef` rows.
    ///
    /// # Errors
    /// Returns [`crate::Error::Format`] if a `TypeDef` row or its name is malformed.
    pub fn new(view: &'a MetadataView<'a>) -> Result<Self> {
        let mut type_defs = HashMap::new();
        for index in 0..view.row_count(TableId::TypeDef) {
            let name = view.type_def_name(index)?;
            if !name.namespace.is_empty() {
                type_defs.entry(name).or_insert(index);
            }
        }

        Ok(TypeResolver {
            view,
            type_defs,
            cache: DashMap::new(),
        })
    }

    /// The view this resolver reads from
    #[must_use]
    pub fn view(&self) -> &'a MetadataView<'a> {
        self.view
    }

    /// Number of named types resolved so far
    #[must_use]
    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    /// The `TypeDef` row defining `name`, if this image defines it
    #[must_use]
    pub fn find_type_def(&self, name: &QualifiedName<'_>) -> Option<u32> {
        self.type_defs.get(name).copied()
    }

    /// Resolve a `TypeDef` or `TypeRef` row to a named type.
    ///
    /// A `TypeRef` to a type defined in this image resolves through that `TypeDef`. Types
    /// deriving from `System.Enum` become [`Type::Enum`], everything else
    /// [`Type::Reference`].
    ///
    /// # Errors
    /// Returns [`crate::Error::UnsupportedFeature`] for rows of other tables, such as
    /// `TypeSpec`, and [`crate::Error::Format`] for malformed rows or enums without a valid
    /// `value__` field.
    pub fn resolve(&self, index: CodedIndex) -> Result<Type<'a>> {
        let name = self.view.type_name(index)?;

        let source = match index.table {
            TableId::TypeRef if !name.namespace.is_empty() => self
                .find_type_def(&name)
                .map_or(index, |row| CodedIndex::new(TableId::TypeDef, row)),
            _ => index,
        };

        let key = if name.namespace.is_empty() {
            TypeKey::Nested(source)
        } else {
            TypeKey::Named(name)
        };

        if let Some(known) = self.cache.get(&key) {
            return Ok(known.clone());
        }

        let resolved = self.resolve_uncached(name, source)?;
        Ok(match self.cache.entry(key) {
            Entry::Occupied(entry) => entry.get().clone(),
            Entry::Vacant(entry) => entry.insert(resolved).clone(),
        })
    }

    fn resolve_uncached(&self, name: QualifiedName<'a>, source: CodedIndex) -> Result<Type<'a>> {
        if source.table == TableId::TypeDef {
            let row = self.view.type_def(source.row)?;
            let is_enum = match row.extends {
                Some(base) => self.view.type_name(base)?.is("System", "Enum"),
                None => false,
            };

            if is_enum {
                let base = self.enum_base(source.row)?;
                log::trace!("resolved enum {name} : {base}");
                return Ok(Type::Enum(Arc::new(EnumType {
                    name,
                    base,
                    definition: source,
                })));
            }
        }

        Ok(Type::Reference(Arc::new(TypeReference { name, source })))
    }

    /// Element type of the instance field `value__` of the enum defined at `type_def`
    fn enum_base(&self, type_def: u32) -> Result<ElementType> {
        for index in self.view.type_def_fields(type_def)? {
            let field = self.view.field(index)?;
            if field.flags & FieldAttributes::STATIC != 0
                || self.view.get_string(field.name)? != "value__"
            {
                continue;
            }

            let mut signature = self.view.get_blob(field.signature)?;
            let start = signature.offset();
            if signature.read_le::<u8>()? != FIELD {
                return Err(format_error!(at start, "Invalid field signature"));
            }

            skip_custom_modifiers(&mut signature)?;
            let offset = signature.offset();
            let base = ElementType::try_from(signature.read_le::<u8>()?)?;
            if !base.is_integer() && base != ElementType::Boolean && base != ElementType::Char {
                return Err(format_error!(
                    at offset,
                    "Enum base type {} is not an integer",
                    base
                ));
            }

            return Ok(base);
        }

        Err(format_error!(
            "Enum {} has no value__ field",
            self.view.type_def_name(type_def)?
        ))
    }

    /// Decode one type from a signature blob.
    ///
    /// Leading custom modifiers are skipped.
    ///
    /// # Errors
    /// Returns [`crate::Error::UnsupportedFeature`] for pointers, by-refs, generics,
    /// function pointers and multi-dimensional arrays, [`crate::Error::Format`] for unknown
    /// codes or truncated blobs.
    pub fn decode_type(&self, signature: &mut Parser<'_>) -> Result<Type<'a>> {
        self.decode_type_nested(signature, 0)
    }

    fn decode_type_nested(&self, signature: &mut Parser<'_>, depth: usize) -> Result<Type<'a>> {
        if depth >= MAX_RECURSION_DEPTH {
            return Err(format_error!(
                at signature.offset(),
                "Type nesting exceeds {} levels",
                MAX_RECURSION_DEPTH
            ));
        }

        skip_custom_modifiers(signature)?;

        let offset = signature.offset();
        let element = ElementType::try_from(signature.read_le::<u8>()?)
            .map_err(|_| format_error!(at offset, "Unknown element type in signature"))?;

        match element {
            primitive if primitive.is_primitive() => Ok(Type::Primitive(primitive)),
            ElementType::ValueType | ElementType::Class => match signature.read_compressed_token()? {
                Some(index) => self.resolve(index),
                None => Err(format_error!(at offset, "Null type reference in signature")),
            },
            ElementType::SzArray => Ok(Type::Array(Arc::new(
                self.decode_type_nested(signature, depth + 1)?,
            ))),
            ElementType::Ptr
            | ElementType::ByRef
            | ElementType::Array
            | ElementType::GenericInst
            | ElementType::Var
            | ElementType::MVar
            | ElementType::FnPtr
            | ElementType::TypedByRef
            | ElementType::Pinned
            | ElementType::Sentinel => Err(unsupported_error!(
                at offset,
                "{} in a signature",
                element
            )),
            _ => Err(format_error!(at offset, "Unexpected {} in a signature", element)),
        }
    }

    /// Decode a `MethodDefSig` or `MethodRefSig` and require the blob to be consumed.
    ///
    /// # Errors
    /// Returns [`crate::Error::UnsupportedFeature`] for variable argument signatures and
    /// [`crate::Error::Format`] for malformed or over-long blobs.
    pub fn decode_method_signature(&self, mut signature: Parser<'_>) -> Result<MethodSignature<'a>> {
        let start = signature.offset();
        let convention = signature.read_le::<u8>()?;
        if convention & CALL_CONV_MASK == VARARG {
            return Err(unsupported_error!(at start, "Variable argument signature"));
        }

        let generic_param_count = if convention & GENERIC != 0 {
            signature.read_compressed_uint()?
        } else {
            0
        };

        let param_count = signature.read_compressed_uint()?;
        if param_count as usize > signature.remaining() {
            return Err(format_error!(
                at start,
                "Signature declares {} parameters in {} bytes",
                param_count,
                signature.remaining()
            ));
        }

        let return_type = self.decode_type(&mut signature)?;

        let mut params = Vec::with_capacity(param_count as usize);
        for _ in 0..param_count {
            if signature.peek_byte()? == ElementType::Sentinel as u8 {
                return Err(unsupported_error!(
                    at signature.offset(),
                    "Variable argument signature"
                ));
            }
            params.push(self.decode_type(&mut signature)?);
        }

        if !signature.is_exhausted() {
            return Err(format_error!(
                at signature.offset(),
                "{} trailing bytes after method signature",
                signature.remaining()
            ));
        }

        Ok(MethodSignature {
            has_this: convention & HAS_THIS != 0,
            generic_param_count,
            return_type,
            params,
        })
    }

    /// The element type that values of `ty` are encoded with.
    ///
    /// # Errors
    /// Returns [`crate::Error::UnsupportedFeature`] for arrays and reference types.
    pub fn element_type_of(&self, ty: &Type<'a>) -> Result<ElementType> {
        match ty {
            Type::Primitive(element) => Ok(*element),
            Type::Enum(enum_type) => Ok(enum_type.base),
            Type::Array(_) => Err(unsupported_error!("Array type {} has no element type", ty)),
            Type::Reference(reference) => Err(unsupported_error!(
                "Type {} has no element type",
                reference.name
            )),
        }
    }
}

/// Skip any number of `CMOD_REQD`/`CMOD_OPT` prefixes
fn skip_custom_modifiers(signature: &mut Parser<'_>) -> Result<()> {
    while signature.has_more_data() {
        let next = signature.peek_byte()?;
        if next != ElementType::CModReqd as u8 && next != ElementType::CModOpt as u8 {
            break;
        }

        signature.skip(1)?;
        signature.read_compressed_token()?;
    }

    Ok(())
}
