//! Decoding of custom attribute rows into the per-category records.
//!
//! For every attribute attached to an entity the decoder resolves the constructor to the
//! attribute's qualified name, consults the category's catalog, decodes the value blob
//! against the constructor signature and hands the result to the matching extractor.
//! Any failure aborts the decode of that entity; there are no partial records.
//!
//! # Value blob layout
//!
//! ```text
//! prolog      u16 = 0x0001
//! fixed args  one encoded value per constructor parameter
//! num named   u16 = 0
//! ```
//!
//! # Reference
//! - [ECMA-335 II.23.3](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf)

use rayon::prelude::*;

use crate::{
    file::parser::Parser,
    metadata::{
        customattributes::{
            guid_from_value, Architecture, ArgumentData, ArgumentValue, AttributeRecord,
            CustomAttributeValue, FieldCustomAttributeData, LazyString,
            MethodCustomAttributeData, ParamCustomAttributeData, TypeCustomAttributeData,
        },
        tables::{CodedIndex, CustomAttributeRaw, MemberRefRaw, TableId},
        typesystem::{ElementType, QualifiedName, Type, TypeResolver},
        view::MetadataView,
    },
    Error, Result,
};

/// Prolog of every custom attribute value blob
const PROLOG: u16 = 0x0001;
/// Length byte of a null `SerString`
const NULL_STRING: u8 = 0xFF;

/// What an extractor sees of one attribute.
#[derive(Debug)]
pub struct ExtractionContext<'a> {
    entity: CodedIndex,
    attribute: QualifiedName<'a>,
    value: CustomAttributeValue<'a>,
}

impl<'a> ExtractionContext<'a> {
    /// The row the attribute is attached to
    #[must_use]
    pub fn entity(&self) -> CodedIndex {
        self.entity
    }

    /// Qualified name of the attribute type
    #[must_use]
    pub fn attribute(&self) -> QualifiedName<'a> {
        self.attribute
    }

    /// The decoded fixed arguments
    #[must_use]
    pub fn value(&self) -> &CustomAttributeValue<'a> {
        &self.value
    }

    /// The first fixed argument.
    ///
    /// # Errors
    /// Returns [`crate::Error::Format`] if the attribute has no arguments.
    pub fn first(&self) -> Result<&ArgumentData<'a>> {
        self.value
            .get(0)
            .ok_or_else(|| format_error!("{} has no arguments", self.attribute))
    }

    /// The single string argument of attributes such as `DocumentationAttribute`.
    ///
    /// Returns `None` for the null string.
    ///
    /// # Errors
    /// Returns [`crate::Error::Format`] unless the attribute has exactly one argument and
    /// that argument is a string.
    pub fn lazy_string(&self) -> Result<Option<LazyString<'a>>> {
        if self.value.len() != 1 {
            return Err(format_error!(
                "{} has {} arguments, expected a single string",
                self.attribute,
                self.value.len()
            ));
        }

        let argument = self.first()?;
        argument.as_string().ok_or_else(|| {
            format_error!(
                "{} argument is {}, not a string",
                self.attribute,
                argument.kind()
            )
        })
    }

    /// The first argument as decoded, non-null text.
    ///
    /// # Errors
    /// Returns [`crate::Error::Format`] if the argument is not a string, is null or is not
    /// valid UTF-8.
    pub fn string(&self) -> Result<&'a str> {
        let argument = self.first()?;
        match argument.as_string() {
            Some(Some(value)) => value.decode(),
            Some(None) => Err(format_error!("{} argument is null", self.attribute)),
            None => Err(format_error!(
                "{} argument is {}, not a string",
                self.attribute,
                argument.kind()
            )),
        }
    }

    /// The first argument as a sign-extended integer.
    ///
    /// # Errors
    /// Returns [`crate::Error::Format`] if the argument is not an integer.
    pub fn integer(&self) -> Result<i64> {
        let argument = self.first()?;
        argument.as_i64().ok_or_else(|| {
            format_error!(
                "{} argument is {}, not an integer",
                self.attribute,
                argument.kind()
            )
        })
    }

    /// The architecture set of `SupportedArchitectureAttribute`.
    ///
    /// Bits outside the known architectures are kept as they are.
    ///
    /// # Errors
    /// Returns [`crate::Error::Format`] if the argument is not an integer.
    pub fn architecture(&self) -> Result<Architecture> {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let bits = self.integer()? as u32;
        Ok(Architecture::from_bits_retain(bits))
    }

    /// The GUID packed into the eleven arguments of `GuidAttribute`.
    ///
    /// # Errors
    /// See [`guid_from_value`].
    pub fn guid(&self) -> Result<uguid::Guid> {
        guid_from_value(&self.value)
    }
}

/// One attribute as seen by [`CustomAttributeDecoder::attributes`]
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAttribute<'a> {
    /// 0-based `CustomAttribute` row
    pub row: u32,
    /// Qualified name of the attribute type
    pub name: QualifiedName<'a>,
    /// The decoded fixed arguments
    pub value: CustomAttributeValue<'a>,
}

/// Decodes the custom attributes of one [`MetadataView`].
///
/// The decoder owns a [`TypeResolver`], so enum types named in constructor signatures are
/// resolved once for the lifetime of the decoder. It is `Sync` and may be shared by worker
/// threads; see [`CustomAttributeDecoder::decode_all`].
///
/// # Examples
///
/// ```rust,no_run
/// use winmdscope::{metadata::customattributes::CustomAttributeDecoder, MetadataStore};
///
/// let store = MetadataStore::from_file("Windows.Win32.winmd".as_ref())?;
/// let decoder = CustomAttributeDecoder::new(store.view())?;
///
/// let method = decoder.method_def_attributes(0)?;
/// println!("{:?}", method.supported_architecture);
/// # Ok::<(), winmdscope::Error>(())
/// ```
pub struct CustomAttributeDecoder<'a> {
    view: &'a MetadataView<'a>,
    resolver: TypeResolver<'a>,
}

impl<'a> CustomAttributeDecoder<'a> {
    /// Create a decoder for `view`.
    ///
    /// # Errors
    /// See [`TypeResolver::new`].
    pub fn new(view: &'a MetadataView<'a>) -> Result<Self> {
        Ok(CustomAttributeDecoder {
            view,
            resolver: TypeResolver::new(view)?,
        })
    }

    /// The resolver used for constructor signatures
    #[must_use]
    pub fn resolver(&self) -> &TypeResolver<'a> {
        &self.resolver
    }

    /// Attributes of `TypeDef` row `index`.
    ///
    /// # Errors
    /// Returns [`crate::Error::UnknownAttribute`] for attributes outside the type catalog,
    /// otherwise an [`crate::Error::Decode`] wrapping the first failure.
    pub fn type_def_attributes(&self, index: u32) -> Result<TypeCustomAttributeData<'a>> {
        self.extract(index)
    }

    /// Attributes of `MethodDef` row `index`.
    ///
    /// # Errors
    /// See [`CustomAttributeDecoder::type_def_attributes`].
    pub fn method_def_attributes(&self, index: u32) -> Result<MethodCustomAttributeData<'a>> {
        self.extract(index)
    }

    /// Attributes of `Field` row `index`.
    ///
    /// # Errors
    /// See [`CustomAttributeDecoder::type_def_attributes`].
    pub fn field_attributes(&self, index: u32) -> Result<FieldCustomAttributeData<'a>> {
        self.extract(index)
    }

    /// Attributes of `Param` row `index`.
    ///
    /// # Errors
    /// See [`CustomAttributeDecoder::type_def_attributes`].
    pub fn param_attributes(&self, index: u32) -> Result<ParamCustomAttributeData<'a>> {
        self.extract(index)
    }

    /// Decode the records of every row of `R`'s table in parallel.
    ///
    /// The result is in row order. When several rows fail, which of their errors is returned
    /// is not specified.
    ///
    /// # Errors
    /// See [`CustomAttributeDecoder::type_def_attributes`].
    pub fn decode_all<R: AttributeRecord<'a>>(&self) -> Result<Vec<R>> {
        (0..self.view.row_count(R::TABLE))
            .into_par_iter()
            .map(|index| self.extract::<R>(index))
            .collect()
    }

    /// Decode the record of row `index` of `R`'s table.
    ///
    /// # Errors
    /// See [`CustomAttributeDecoder::type_def_attributes`].
    pub fn extract<R: AttributeRecord<'a>>(&self, index: u32) -> Result<R> {
        let rows = self.view.row_count(R::TABLE);
        if index >= rows {
            return Err(format_error!(
                "{:?} row {} out of {} rows",
                R::TABLE,
                index,
                rows
            ));
        }

        let entity = CodedIndex::new(R::TABLE, index);
        let attributes = self
            .view
            .get_custom_attributes(entity)
            .map_err(|error| error.in_entity(entity, None))?;

        let mut record = R::default();
        for attribute in attributes {
            let (name, constructor) = self
                .attribute_type(&attribute)
                .map_err(|error| error.in_entity(entity, None))?;

            if R::is_ignored(&name) {
                log::trace!("{entity}: skipping ignored {name}");
                continue;
            }

            let Some(extractor) = R::extractor(&name) else {
                return Err(Error::UnknownAttribute {
                    entity,
                    attribute: name.to_string(),
                });
            };

            let context = self
                .decode_value(&attribute, &constructor)
                .map(|value| ExtractionContext {
                    entity,
                    attribute: name,
                    value,
                })
                .map_err(|error| error.in_entity(entity, Some(name.to_string())))?;

            extractor(&context, &mut record)
                .map_err(|error| error.in_entity(entity, Some(name.to_string())))?;
        }

        Ok(record)
    }

    /// Every attribute attached to `parent`, named and decoded, without consulting a catalog.
    ///
    /// # Errors
    /// Returns [`crate::Error::Decode`] wrapping the first attribute that cannot be decoded.
    pub fn attributes(&self, parent: CodedIndex) -> Result<Vec<DecodedAttribute<'a>>> {
        let rows = self
            .view
            .get_custom_attributes(parent)
            .map_err(|error| error.in_entity(parent, None))?;

        rows.iter()
            .map(|attribute| -> Result<DecodedAttribute<'a>> {
                let (name, constructor) = self
                    .attribute_type(attribute)
                    .map_err(|error| error.in_entity(parent, None))?;
                let value = self
                    .decode_value(attribute, &constructor)
                    .map_err(|error| error.in_entity(parent, Some(name.to_string())))?;

                Ok(DecodedAttribute {
                    row: attribute.index,
                    name,
                    value,
                })
            })
            .collect()
    }

    /// The qualified name of the attribute type and its constructor.
    ///
    /// # Errors
    /// Returns [`crate::Error::UnsupportedFeature`] for constructors that are not
    /// `MemberRef` rows or whose parent is not a `TypeRef` or `TypeDef`.
    pub fn attribute_type(
        &self,
        attribute: &CustomAttributeRaw,
    ) -> Result<(QualifiedName<'a>, MemberRefRaw)> {
        if attribute.constructor.table != TableId::MemberRef {
            return Err(unsupported_error!(
                at attribute.offset,
                "Attribute constructor {} is not a MemberRef",
                attribute.constructor
            ));
        }

        let constructor = self.view.member_ref(attribute.constructor.row)?;
        let Some(class) = constructor.class else {
            return Err(format_error!(
                at constructor.offset,
                "Attribute constructor without a parent"
            ));
        };

        match class.table {
            TableId::TypeRef | TableId::TypeDef => Ok((self.view.type_name(class)?, constructor)),
            _ => Err(unsupported_error!(
                at constructor.offset,
                "Attribute constructor on {}",
                class
            )),
        }
    }

    /// Decode the value blob of `attribute` against the signature of `constructor`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Format`] for a wrong prolog, named arguments, trailing bytes
    /// or truncated values, and [`crate::Error::UnsupportedFeature`] for variable argument
    /// constructors and array or reference typed parameters.
    pub fn decode_value(
        &self,
        attribute: &CustomAttributeRaw,
        constructor: &MemberRefRaw,
    ) -> Result<CustomAttributeValue<'a>> {
        let signature = self
            .resolver
            .decode_method_signature(self.view.get_blob(constructor.signature)?)?;

        let mut blob = self.view.get_blob(attribute.value)?;
        let start = blob.offset();
        let prolog = blob.read_le::<u16>()?;
        if prolog != PROLOG {
            return Err(format_error!(at start, "Invalid prolog - {:#06x}", prolog));
        }

        let mut fixed_args = Vec::with_capacity(signature.params.len());
        for ty in signature.params {
            if let Type::Array(_) = ty {
                return Err(unsupported_error!(
                    at blob.offset(),
                    "Array-valued fixed argument {}",
                    ty
                ));
            }

            let element = self.resolver.element_type_of(&ty)?;
            let value = read_element(&mut blob, element)?;
            fixed_args.push(ArgumentValue {
                ty,
                name: None,
                value,
            });
        }

        let named_offset = blob.offset();
        let named = blob.read_le::<u16>()?;
        if named != 0 {
            return Err(format_error!(
                at named_offset,
                "{} named arguments, none expected",
                named
            ));
        }

        if !blob.is_exhausted() {
            return Err(format_error!(
                at blob.offset(),
                "{} trailing bytes after attribute value",
                blob.remaining()
            ));
        }

        Ok(CustomAttributeValue { fixed_args })
    }
}

/// Read one fixed argument encoded as `element`
fn read_element<'a>(blob: &mut Parser<'a>, element: ElementType) -> Result<ArgumentData<'a>> {
    let offset = blob.offset();
    Ok(match element {
        ElementType::Boolean => match blob.read_le::<u8>()? {
            0 => ArgumentData::Boolean(false),
            1 => ArgumentData::Boolean(true),
            other => return Err(format_error!(at offset, "Invalid boolean - {:#04x}", other)),
        },
        ElementType::Char => ArgumentData::Char(blob.read_le::<u16>()?),
        ElementType::I1 => ArgumentData::I1(blob.read_le::<i8>()?),
        ElementType::U1 => ArgumentData::U1(blob.read_le::<u8>()?),
        ElementType::I2 => ArgumentData::I2(blob.read_le::<i16>()?),
        ElementType::U2 => ArgumentData::U2(blob.read_le::<u16>()?),
        ElementType::I4 => ArgumentData::I4(blob.read_le::<i32>()?),
        ElementType::U4 => ArgumentData::U4(blob.read_le::<u32>()?),
        ElementType::I8 => ArgumentData::I8(blob.read_le::<i64>()?),
        ElementType::U8 => ArgumentData::U8(blob.read_le::<u64>()?),
        ElementType::R4 => ArgumentData::R4(blob.read_le::<f32>()?),
        ElementType::R8 => ArgumentData::R8(blob.read_le::<f64>()?),
        ElementType::String => {
            if blob.peek_byte()? == NULL_STRING {
                blob.skip(1)?;
                ArgumentData::String(None)
            } else {
                let len = blob.read_compressed_uint()? as usize;
                let start = blob.offset();
                blob.skip(len)?;
                ArgumentData::String(Some(LazyString::new(blob.buffer(), start, len)?))
            }
        }
        other => {
            return Err(unsupported_error!(
                at offset,
                "Fixed argument of type {}",
                other
            ))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        metadata::customattributes::METADATA_NAMESPACE,
        test::{
            ctor_signature, type_token, Class, Ctor, ImageBuilder, Owner, ValueBlob,
            ELEMENT_TYPE_BOOLEAN, ELEMENT_TYPE_CHAR, ELEMENT_TYPE_I1, ELEMENT_TYPE_I2,
            ELEMENT_TYPE_I4, ELEMENT_TYPE_I8, ELEMENT_TYPE_PTR, ELEMENT_TYPE_R4, ELEMENT_TYPE_R8,
            ELEMENT_TYPE_SENTINEL, ELEMENT_TYPE_STRING, ELEMENT_TYPE_SZARRAY, ELEMENT_TYPE_U1,
            ELEMENT_TYPE_U2, ELEMENT_TYPE_U4, ELEMENT_TYPE_U8, ELEMENT_TYPE_VALUETYPE,
        },
        ErrorKind,
    };

    const GUID_PARAMS: [&[u8]; 11] = [
        &[ELEMENT_TYPE_U4],
        &[ELEMENT_TYPE_U2],
        &[ELEMENT_TYPE_U2],
        &[ELEMENT_TYPE_U1],
        &[ELEMENT_TYPE_U1],
        &[ELEMENT_TYPE_U1],
        &[ELEMENT_TYPE_U1],
        &[ELEMENT_TYPE_U1],
        &[ELEMENT_TYPE_U1],
        &[ELEMENT_TYPE_U1],
        &[ELEMENT_TYPE_U1],
    ];

    fn guid_value() -> Vec<u8> {
        let mut blob = ValueBlob::new().u32(0x0000_0114).u16(0).u16(0).u8(0xC0);
        for _ in 0..6 {
            blob = blob.u8(0);
        }
        blob.u8(0x46).finish()
    }

    /// One type carrying `attribute` with a single string argument
    fn with_string_attribute(name: &str, value: &[u8]) -> Vec<u8> {
        let mut builder = ImageBuilder::new();
        let row = builder.type_def(0, "Windows.Win32.Test", "Target", None);
        let ctor = builder.metadata_ctor(name, &[&[ELEMENT_TYPE_STRING]]);
        builder.custom_attribute(Owner::TypeDef(row), ctor, value);
        builder.build()
    }

    #[test]
    fn type_record() {
        let mut builder = ImageBuilder::new();
        let row = builder.type_def(0x0101, "Windows.Win32.System.Com", "IUnknown", None);
        let guid = builder.metadata_ctor("GuidAttribute", &GUID_PARAMS);
        let flags = builder.attribute_ctor("System", "FlagsAttribute", &[]);
        let documentation = builder.metadata_ctor("DocumentationAttribute", &[&[ELEMENT_TYPE_STRING]]);
        let typedef = builder.metadata_ctor("NativeTypedefAttribute", &[]);
        let size = builder.metadata_ctor("StructSizeFieldAttribute", &[&[ELEMENT_TYPE_STRING]]);

        builder.custom_attribute(Owner::TypeDef(row), guid, &guid_value());
        builder.custom_attribute(Owner::TypeDef(row), flags, &ValueBlob::new().finish());
        builder.custom_attribute(
            Owner::TypeDef(row),
            documentation,
            &ValueBlob::new().string(Some("https://learn.microsoft.com/iunknown")).finish(),
        );
        builder.custom_attribute(Owner::TypeDef(row), typedef, &ValueBlob::new().finish());
        builder.custom_attribute(Owner::TypeDef(row), size, &ValueBlob::new().string(Some("cbSize")).finish());

        let data = builder.build();
        let view = MetadataView::parse(&data).unwrap();
        let decoder = CustomAttributeDecoder::new(&view).unwrap();
        let record = decoder.type_def_attributes(row).unwrap();

        assert_eq!(record.supported_architecture, Architecture::all());
        assert_eq!(
            record.guid.unwrap().to_string(),
            "00000114-0000-0000-c000-000000000046"
        );
        assert!(record.is_enum_flags);
        assert!(record.is_typedef);
        assert_eq!(record.struct_size_field, Some("cbSize"));

        let url = record.documentation_url.unwrap();
        assert_eq!(url.decode().unwrap(), "https://learn.microsoft.com/iunknown");
        assert_eq!(&data[url.offset()..url.offset() + url.len()], url.bytes());
    }

    #[test]
    fn empty_record() {
        let mut builder = ImageBuilder::new();
        let row = builder.type_def(0, "Windows.Win32.Test", "Plain", None);
        let data = builder.build();
        let view = MetadataView::parse(&data).unwrap();
        let decoder = CustomAttributeDecoder::new(&view).unwrap();

        assert_eq!(
            decoder.type_def_attributes(row).unwrap(),
            TypeCustomAttributeData::default()
        );
        assert_eq!(
            decoder.type_def_attributes(row + 1).unwrap_err().kind(),
            ErrorKind::Format
        );
    }

    #[test]
    fn null_documentation() {
        let data = with_string_attribute("DocumentationAttribute", &ValueBlob::new().string(None).finish());
        let view = MetadataView::parse(&data).unwrap();
        let decoder = CustomAttributeDecoder::new(&view).unwrap();

        assert_eq!(decoder.type_def_attributes(0).unwrap().documentation_url, None);
    }

    #[test]
    fn unknown_attribute() {
        let data = with_string_attribute("FancyNewAttribute", &ValueBlob::new().string(Some("x")).finish());
        let view = MetadataView::parse(&data).unwrap();
        let decoder = CustomAttributeDecoder::new(&view).unwrap();

        let error = decoder.type_def_attributes(0).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::UnknownAttribute);
        let Error::UnknownAttribute { entity, attribute } = error else {
            panic!("expected an unknown attribute, got {error}");
        };
        assert_eq!(entity, CodedIndex::new(TableId::TypeDef, 0));
        assert_eq!(attribute, format!("{METADATA_NAMESPACE}.FancyNewAttribute"));
    }

    #[test]
    fn ignored_attributes_are_not_decoded() {
        let mut builder = ImageBuilder::new();
        let row = builder.type_def(0, "Windows.Win32.Test", "Target", None);
        let agile = builder.metadata_ctor("AgileAttribute", &[]);
        // Garbage that would fail any decode
        builder.custom_attribute(Owner::TypeDef(row), agile, &[0x07, 0x07, 0x07]);

        let data = builder.build();
        let view = MetadataView::parse(&data).unwrap();
        let decoder = CustomAttributeDecoder::new(&view).unwrap();
        assert_eq!(
            decoder.type_def_attributes(row).unwrap(),
            TypeCustomAttributeData::default()
        );

        // The same attribute is unknown on fields
        let mut builder = ImageBuilder::new();
        builder.type_def(0, "Windows.Win32.Test", "Target", None);
        let field = builder.field(0x0006, "member", &[0x06, ELEMENT_TYPE_I4]);
        let agile = builder.metadata_ctor("AgileAttribute", &[]);
        builder.custom_attribute(Owner::Field(field), agile, &ValueBlob::new().finish());

        let data = builder.build();
        let view = MetadataView::parse(&data).unwrap();
        let decoder = CustomAttributeDecoder::new(&view).unwrap();
        assert_eq!(
            decoder.field_attributes(field).unwrap_err().kind(),
            ErrorKind::UnknownAttribute
        );
    }

    #[test]
    fn malformed_values() {
        let cases: [(Vec<u8>, usize); 4] = [
            // Wrong prolog
            ([0x02, 0x00, 0x01, 0x61, 0x00, 0x00].to_vec(), 0),
            // Named argument
            (ValueBlob::new().string(Some("a")).u16(1).into_bytes(), 4),
            // Trailing byte
            (ValueBlob::new().string(Some("a")).u16(0).u8(0).into_bytes(), 6),
            // Truncated string
            (ValueBlob::new().raw(&[0x05, 0x61]).into_bytes(), 3),
        ];

        for (value, relative) in cases {
            let data = with_string_attribute("DocumentationAttribute", &value);
            let view = MetadataView::parse(&data).unwrap();
            let decoder = CustomAttributeDecoder::new(&view).unwrap();

            let error = decoder.type_def_attributes(0).unwrap_err();
            assert_eq!(error.kind(), ErrorKind::Format, "{value:02x?}: {error}");
            assert!(error.to_string().contains("DocumentationAttribute on TypeDef[0]"));

            let blob = view.get_blob(view.custom_attribute(0).unwrap().value).unwrap();
            assert_eq!(error.offset(), Some(blob.offset() + relative), "{value:02x?}: {error}");
        }
    }

    #[test]
    fn unsupported_constructors() {
        let mut builder = ImageBuilder::new();
        let row = builder.type_def(0, "Windows.Win32.Test", "Target", None);
        let method = builder.method_def(0x1886, ".ctor", &ctor_signature(&[]));
        builder.custom_attribute(Owner::TypeDef(row), Ctor::MethodDef(method), &ValueBlob::new().finish());

        let data = builder.build();
        let view = MetadataView::parse(&data).unwrap();
        let decoder = CustomAttributeDecoder::new(&view).unwrap();
        let error = decoder.type_def_attributes(row).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::UnsupportedFeature);
        assert!(matches!(error, Error::Decode { attribute: None, .. }));

        let signatures: [Vec<u8>; 3] = [
            vec![0x25, 0x01, 0x01, ELEMENT_TYPE_I4],
            vec![0x20, 0x02, 0x01, ELEMENT_TYPE_I4, ELEMENT_TYPE_SENTINEL, ELEMENT_TYPE_I4],
            ctor_signature(&[&[ELEMENT_TYPE_SZARRAY, ELEMENT_TYPE_I4]]),
        ];

        for signature in signatures {
            let mut builder = ImageBuilder::new();
            builder.type_def(0, "Windows.Win32.Test", "Target", None);
            let class = builder.type_ref(METADATA_NAMESPACE, "ConstantAttribute");
            let ctor = builder.member_ref(Class::TypeRef(class), ".ctor", &signature);
            let field = builder.field(0x0056, "VALUE", &[0x06, ELEMENT_TYPE_I4]);
            builder.custom_attribute(Owner::Field(field), Ctor::MemberRef(ctor), &ValueBlob::new().u8(0).finish());

            let data = builder.build();
            let view = MetadataView::parse(&data).unwrap();
            let decoder = CustomAttributeDecoder::new(&view).unwrap();
            let error = decoder.field_attributes(field).unwrap_err();
            assert_eq!(error.kind(), ErrorKind::UnsupportedFeature, "{signature:02x?}: {error}");
            assert!(error.to_string().contains("ConstantAttribute on Field[0]"));
        }
    }

    #[test]
    fn pointer_parameter() {
        let mut builder = ImageBuilder::new();
        builder.type_def(0, "Windows.Win32.Test", "Target", None);
        let ctor = builder.metadata_ctor("ConstantAttribute", &[&[ELEMENT_TYPE_PTR, ELEMENT_TYPE_I4]]);
        let method = builder.method_def(0x0096, "Call", &[0x00, 0x00, 0x01]);
        builder.custom_attribute(Owner::MethodDef(method), ctor, &ValueBlob::new().u32(0).finish());

        let data = builder.build();
        let view = MetadataView::parse(&data).unwrap();
        let decoder = CustomAttributeDecoder::new(&view).unwrap();
        assert_eq!(
            decoder.method_def_attributes(method).unwrap_err().kind(),
            ErrorKind::UnsupportedFeature
        );
    }

    #[test]
    fn type_mismatch() {
        let mut builder = ImageBuilder::new();
        let row = builder.type_def(0, "Windows.Win32.Test", "Target", None);
        let documentation = builder.metadata_ctor("DocumentationAttribute", &[&[ELEMENT_TYPE_I4]]);
        builder.custom_attribute(Owner::TypeDef(row), documentation, &ValueBlob::new().i32(7).finish());

        let data = builder.build();
        let view = MetadataView::parse(&data).unwrap();
        let decoder = CustomAttributeDecoder::new(&view).unwrap();
        let error = decoder.type_def_attributes(row).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Format);
        assert!(error.to_string().contains("not a string"));
    }

    #[test]
    fn architecture_from_enum() {
        let mut builder = ImageBuilder::new();
        let architecture = builder.enum_type(METADATA_NAMESPACE, "Architecture", ELEMENT_TYPE_I4);
        let enum_ref = builder.type_ref(METADATA_NAMESPACE, "Architecture");
        builder.type_def(0, "Windows.Win32.Test", "Apis", None);
        let method = builder.method_def(0x0096, "GetTickCount64", &[0x00, 0x00, 0x0B]);
        let other = builder.method_def(0x0096, "Broken", &[0x00, 0x00, 0x0B]);

        let mut param = vec![ELEMENT_TYPE_VALUETYPE];
        param.extend(type_token(Class::TypeRef(enum_ref)));
        let ctor = builder.metadata_ctor("SupportedArchitectureAttribute", &[&param]);
        builder.custom_attribute(Owner::MethodDef(method), ctor, &ValueBlob::new().i32(0b011).finish());
        builder.custom_attribute(Owner::MethodDef(other), ctor, &ValueBlob::new().i32(0b1000).finish());

        let data = builder.build();
        let view = MetadataView::parse(&data).unwrap();
        let decoder = CustomAttributeDecoder::new(&view).unwrap();

        let record = decoder.method_def_attributes(method).unwrap();
        assert_eq!(record.supported_architecture, Architecture::X86 | Architecture::X64);
        assert_eq!(record.documentation_url, None);

        let value = decoder
            .attributes(CodedIndex::new(TableId::MethodDef, method))
            .unwrap()
            .remove(0)
            .value;
        let Type::Enum(enum_type) = &value.fixed_args[0].ty else {
            panic!("expected an enum parameter");
        };
        assert_eq!(enum_type.definition, CodedIndex::new(TableId::TypeDef, architecture));
        assert_eq!(value.get(0), Some(&ArgumentData::I4(3)));

        let record = decoder.method_def_attributes(other).unwrap();
        assert_eq!(record.supported_architecture.bits(), 0b1000);
        assert!(!record.supported_architecture.intersects(Architecture::all()));
    }

    #[test]
    fn fixed_width_primitives() {
        let params: [&[u8]; 8] = [
            &[ELEMENT_TYPE_BOOLEAN],
            &[ELEMENT_TYPE_CHAR],
            &[ELEMENT_TYPE_I1],
            &[ELEMENT_TYPE_I2],
            &[ELEMENT_TYPE_I8],
            &[ELEMENT_TYPE_U8],
            &[ELEMENT_TYPE_R4],
            &[ELEMENT_TYPE_R8],
        ];

        let value = ValueBlob::new()
            .u8(1)
            .u16(u16::from(b'A'))
            .raw(&[0xFF])
            .raw(&(-2i16).to_le_bytes())
            .i64(-5)
            .raw(&u64::MAX.to_le_bytes())
            .raw(&1.5f32.to_le_bytes())
            .f64(2.25)
            .finish();

        let mut builder = ImageBuilder::new();
        let row = builder.type_def(0, "Windows.Win32.Test", "Target", None);
        let ctor = builder.metadata_ctor("WideAttribute", &params);
        builder.custom_attribute(Owner::TypeDef(row), ctor, &value);

        let data = builder.build();
        let view = MetadataView::parse(&data).unwrap();
        let decoder = CustomAttributeDecoder::new(&view).unwrap();

        let attributes = decoder.attributes(CodedIndex::new(TableId::TypeDef, row)).unwrap();
        let decoded = &attributes[0].value;
        assert_eq!(decoded.len(), 8);
        assert_eq!(decoded.get(0), Some(&ArgumentData::Boolean(true)));
        assert_eq!(decoded.get(1), Some(&ArgumentData::Char(0x41)));
        assert_eq!(decoded.get(2), Some(&ArgumentData::I1(-1)));
        assert_eq!(decoded.get(3), Some(&ArgumentData::I2(-2)));
        assert_eq!(decoded.get(4), Some(&ArgumentData::I8(-5)));
        assert_eq!(decoded.get(5), Some(&ArgumentData::U8(u64::MAX)));
        assert_eq!(decoded.get(6), Some(&ArgumentData::R4(1.5)));
        assert_eq!(decoded.get(7), Some(&ArgumentData::R8(2.25)));
    }

    #[test]
    fn invalid_boolean() {
        let mut builder = ImageBuilder::new();
        let row = builder.type_def(0, "Windows.Win32.Test", "Target", None);
        let ctor = builder.metadata_ctor("FlagAttribute", &[&[ELEMENT_TYPE_BOOLEAN]]);
        builder.custom_attribute(Owner::TypeDef(row), ctor, &ValueBlob::new().u8(2).finish());

        let data = builder.build();
        let view = MetadataView::parse(&data).unwrap();
        let decoder = CustomAttributeDecoder::new(&view).unwrap();

        let error = decoder.attributes(CodedIndex::new(TableId::TypeDef, row)).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Format);

        let blob = view.get_blob(view.custom_attribute(0).unwrap().value).unwrap();
        assert_eq!(error.offset(), Some(blob.offset() + 2));
    }

    #[test]
    fn member_records() {
        let mut builder = ImageBuilder::new();
        builder.type_def(0, "Windows.Win32.Test", "Apis", None);
        let constant = builder.field(0x8056, "MAX_PATH", &[0x06, ELEMENT_TYPE_U4]);
        let flexible = builder.field(0x0006, "Data", &[0x06, ELEMENT_TYPE_SZARRAY, ELEMENT_TYPE_U1]);
        let method = builder.method_def(0x0096, "SetFlags", &[0x00, 0x01, 0x01, ELEMENT_TYPE_U4]);
        let param = builder.param(1, "flags");

        let constant_ctor = builder.metadata_ctor("ConstantAttribute", &[&[ELEMENT_TYPE_STRING]]);
        let encoding = builder.metadata_ctor("NativeEncodingAttribute", &[&[ELEMENT_TYPE_STRING]]);
        let flexible_ctor = builder.metadata_ctor("FlexibleArrayAttribute", &[]);
        let const_ctor = builder.metadata_ctor("ConstAttribute", &[]);
        let associated = builder.metadata_ctor("AssociatedEnumAttribute", &[&[ELEMENT_TYPE_STRING]]);
        let doc = builder.metadata_ctor("DocumentationAttribute", &[&[ELEMENT_TYPE_STRING]]);

        builder.custom_attribute(Owner::Field(constant), constant_ctor, &ValueBlob::new().string(Some("260")).finish());
        builder.custom_attribute(Owner::Field(flexible), encoding, &ValueBlob::new().string(Some("ansi")).finish());
        builder.custom_attribute(Owner::Field(flexible), flexible_ctor, &ValueBlob::new().finish());
        builder.custom_attribute(Owner::Field(flexible), const_ctor, &ValueBlob::new().finish());
        builder.custom_attribute(Owner::Param(param), associated, &ValueBlob::new().string(Some("SET_FLAGS")).finish());
        builder.custom_attribute(Owner::Param(param), doc, &ValueBlob::new().string(Some("ignored")).finish());

        let data = builder.build();
        let view = MetadataView::parse(&data).unwrap();
        let decoder = CustomAttributeDecoder::new(&view).unwrap();

        let field = decoder.field_attributes(constant).unwrap();
        let Some(ArgumentData::String(Some(text))) = field.constant else {
            panic!("expected a string constant, got {:?}", field.constant);
        };
        assert_eq!(text.decode().unwrap(), "260");
        assert!(!field.is_flexible_array);

        let field = decoder.field_attributes(flexible).unwrap();
        assert!(field.is_ansi_encoding);
        assert!(field.is_flexible_array);
        assert_eq!(field.constant, None);

        let record = decoder.param_attributes(param).unwrap();
        assert_eq!(record.associated_enum, Some("SET_FLAGS"));
        assert_eq!(decoder.method_def_attributes(method).unwrap(), MethodCustomAttributeData::default());
    }

    #[test]
    fn generic_enumeration() {
        let data = with_string_attribute("AnyAttribute", &ValueBlob::new().string(Some("value")).finish());
        let view = MetadataView::parse(&data).unwrap();
        let decoder = CustomAttributeDecoder::new(&view).unwrap();

        let attributes = decoder.attributes(CodedIndex::new(TableId::TypeDef, 0)).unwrap();
        assert_eq!(attributes.len(), 1);
        assert_eq!(attributes[0].row, 0);
        assert!(attributes[0].name.is(METADATA_NAMESPACE, "AnyAttribute"));
        assert_eq!(attributes[0].value.to_string(), "(\"value\")");
        assert!(decoder.attributes(CodedIndex::new(TableId::Field, 0)).unwrap().is_empty());
    }

    #[test]
    fn decode_all_in_parallel() {
        let mut builder = ImageBuilder::new();
        let ctor = builder.metadata_ctor("NativeTypedefAttribute", &[]);
        for index in 0..64 {
            let row = builder.type_def(0x0109, "Windows.Win32.Test", &format!("HANDLE{index}"), None);
            if index % 3 == 0 {
                builder.custom_attribute(Owner::TypeDef(row), ctor, &ValueBlob::new().finish());
            }
        }

        let data = builder.build();
        let view = MetadataView::parse(&data).unwrap();
        let decoder = CustomAttributeDecoder::new(&view).unwrap();

        let records = decoder.decode_all::<TypeCustomAttributeData>().unwrap();
        assert_eq!(records.len(), 64);
        for (index, record) in records.iter().enumerate() {
            assert_eq!(record.is_typedef, index % 3 == 0);
        }
    }
}
