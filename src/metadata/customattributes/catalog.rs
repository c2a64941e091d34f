//! The closed catalogs of attributes, one per entity category.
//!
//! For every category an attribute is either extracted into the category's record, ignored,
//! or unknown. Unknown attributes are an error, so adding an attribute to the metadata
//! means adding it here.

use crate::{
    metadata::{
        customattributes::{
            ExtractionContext, FieldCustomAttributeData, MethodCustomAttributeData,
            ParamCustomAttributeData, TypeCustomAttributeData,
        },
        tables::TableId,
        typesystem::QualifiedName,
    },
    Result,
};

/// Namespace of the Win32 metadata attributes
pub const METADATA_NAMESPACE: &str = "Windows.Win32.Foundation.Metadata";

const fn metadata(name: &'static str) -> QualifiedName<'static> {
    QualifiedName::new(METADATA_NAMESPACE, name)
}

const fn system(name: &'static str) -> QualifiedName<'static> {
    QualifiedName::new("System", name)
}

/// Writes what one attribute says into a record
pub type Extractor<'a, R> = fn(&ExtractionContext<'a>, &mut R) -> Result<()>;

/// A record that attributes of one category are extracted into.
pub trait AttributeRecord<'a>: Default + Send {
    /// The table whose rows carry this category's attributes
    const TABLE: TableId;

    /// Attributes that are skipped without decoding
    const IGNORED: &'static [QualifiedName<'static>];

    /// The extractor for `name`, or `None` if the category does not extract it
    fn extractor(name: &QualifiedName<'_>) -> Option<Extractor<'a, Self>>;

    /// Returns `true` if `name` is on the ignore list
    fn is_ignored(name: &QualifiedName<'_>) -> bool {
        Self::IGNORED.iter().any(|ignored| ignored == name)
    }
}

impl<'a> AttributeRecord<'a> for TypeCustomAttributeData<'a> {
    const TABLE: TableId = TableId::TypeDef;

    const IGNORED: &'static [QualifiedName<'static>] = &[
        system("AttributeUsageAttribute"),
        system("ObsoleteAttribute"),
        QualifiedName::new("System.Runtime.InteropServices", "ComVisibleAttribute"),
        QualifiedName::new("System.Runtime.InteropServices", "UnmanagedFunctionPointerAttribute"),
        metadata("AgileAttribute"),
        metadata("AlsoUsableForAttribute"),
        metadata("AnsiAttribute"),
        metadata("AssociatedConstantAttribute"),
        metadata("InvalidHandleValueAttribute"),
        metadata("MetadataTypedefAttribute"),
        metadata("RAIIFreeAttribute"),
        metadata("ScopedEnumAttribute"),
        metadata("SupportedOSPlatformAttribute"),
        metadata("UnicodeAttribute"),
    ];

    fn extractor(name: &QualifiedName<'_>) -> Option<Extractor<'a, Self>> {
        match (name.namespace, name.name) {
            (METADATA_NAMESPACE, "SupportedArchitectureAttribute") => {
                Some(|context: &ExtractionContext<'a>, data: &mut Self| {
                    data.supported_architecture = context.architecture()?;
                    Ok(())
                })
            }
            (METADATA_NAMESPACE, "DocumentationAttribute") => {
                Some(|context: &ExtractionContext<'a>, data: &mut Self| {
                    data.documentation_url = context.lazy_string()?;
                    Ok(())
                })
            }
            ("System", "FlagsAttribute") => Some(|_: &ExtractionContext<'a>, data: &mut Self| {
                data.is_enum_flags = true;
                Ok(())
            }),
            (METADATA_NAMESPACE, "GuidAttribute") => {
                Some(|context: &ExtractionContext<'a>, data: &mut Self| {
                    data.guid = Some(context.guid()?);
                    Ok(())
                })
            }
            (METADATA_NAMESPACE, "NativeTypedefAttribute") => {
                Some(|_: &ExtractionContext<'a>, data: &mut Self| {
                    data.is_typedef = true;
                    Ok(())
                })
            }
            (METADATA_NAMESPACE, "StructSizeFieldAttribute") => {
                Some(|context: &ExtractionContext<'a>, data: &mut Self| {
                    data.struct_size_field = Some(context.string()?);
                    Ok(())
                })
            }
            _ => None,
        }
    }
}

impl<'a> AttributeRecord<'a> for MethodCustomAttributeData<'a> {
    const TABLE: TableId = TableId::MethodDef;

    const IGNORED: &'static [QualifiedName<'static>] = &[
        system("ObsoleteAttribute"),
        metadata("AnsiAttribute"),
        metadata("CanReturnErrorsAsSuccessAttribute"),
        metadata("CanReturnMultipleSuccessValuesAttribute"),
        metadata("SupportedOSPlatformAttribute"),
        metadata("UnicodeAttribute"),
        QualifiedName::new("System.Diagnostics.CodeAnalysis", "DoesNotReturnAttribute"),
    ];

    fn extractor(name: &QualifiedName<'_>) -> Option<Extractor<'a, Self>> {
        match (name.namespace, name.name) {
            (METADATA_NAMESPACE, "SupportedArchitectureAttribute") => {
                Some(|context: &ExtractionContext<'a>, data: &mut Self| {
                    data.supported_architecture = context.architecture()?;
                    Ok(())
                })
            }
            (METADATA_NAMESPACE, "DocumentationAttribute") => {
                Some(|context: &ExtractionContext<'a>, data: &mut Self| {
                    data.documentation_url = context.lazy_string()?;
                    Ok(())
                })
            }
            (METADATA_NAMESPACE, "ConstantAttribute") => {
                Some(|context: &ExtractionContext<'a>, data: &mut Self| {
                    data.constant = Some(*context.first()?);
                    Ok(())
                })
            }
            _ => None,
        }
    }
}

impl<'a> AttributeRecord<'a> for FieldCustomAttributeData<'a> {
    const TABLE: TableId = TableId::Field;

    const IGNORED: &'static [QualifiedName<'static>] = &[metadata("ConstAttribute")];

    fn extractor(name: &QualifiedName<'_>) -> Option<Extractor<'a, Self>> {
        match (name.namespace, name.name) {
            (METADATA_NAMESPACE, "DocumentationAttribute") => {
                Some(|context: &ExtractionContext<'a>, data: &mut Self| {
                    data.documentation_url = context.lazy_string()?;
                    Ok(())
                })
            }
            (METADATA_NAMESPACE, "GuidAttribute") => {
                Some(|context: &ExtractionContext<'a>, data: &mut Self| {
                    data.guid = Some(context.guid()?);
                    Ok(())
                })
            }
            (METADATA_NAMESPACE, "NativeEncodingAttribute") => {
                Some(|_: &ExtractionContext<'a>, data: &mut Self| {
                    data.is_ansi_encoding = true;
                    Ok(())
                })
            }
            (METADATA_NAMESPACE, "FlexibleArrayAttribute") => {
                Some(|_: &ExtractionContext<'a>, data: &mut Self| {
                    data.is_flexible_array = true;
                    Ok(())
                })
            }
            (METADATA_NAMESPACE, "ConstantAttribute") => {
                Some(|context: &ExtractionContext<'a>, data: &mut Self| {
                    data.constant = Some(*context.first()?);
                    Ok(())
                })
            }
            _ => None,
        }
    }
}

impl<'a> AttributeRecord<'a> for ParamCustomAttributeData<'a> {
    const TABLE: TableId = TableId::Param;

    const IGNORED: &'static [QualifiedName<'static>] = &[
        metadata("ComOutPtrAttribute"),
        metadata("ConstAttribute"),
        metadata("DocumentationAttribute"),
        metadata("DoNotReleaseAttribute"),
        metadata("FreeWithAttribute"),
        metadata("IgnoreIfReturnAttribute"),
        metadata("MemorySizeAttribute"),
        metadata("NativeArrayInfoAttribute"),
        metadata("NotNullTerminatedAttribute"),
        metadata("NullNullTerminatedAttribute"),
        metadata("RAIIFreeAttribute"),
        metadata("ReservedAttribute"),
        metadata("RetainedAttribute"),
        metadata("RetValAttribute"),
    ];

    fn extractor(name: &QualifiedName<'_>) -> Option<Extractor<'a, Self>> {
        match (name.namespace, name.name) {
            (METADATA_NAMESPACE, "AssociatedEnumAttribute") => {
                Some(|context: &ExtractionContext<'a>, data: &mut Self| {
                    data.associated_enum = Some(context.string()?);
                    Ok(())
                })
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extracts<'a, R: AttributeRecord<'a>>(names: &[QualifiedName<'static>]) {
        for name in names {
            assert!(R::extractor(name).is_some(), "{name} is not extracted");
            assert!(!R::is_ignored(name), "{name} is also ignored");
        }
    }

    #[test]
    fn type_catalog() {
        extracts::<TypeCustomAttributeData>(&[
            metadata("SupportedArchitectureAttribute"),
            metadata("DocumentationAttribute"),
            system("FlagsAttribute"),
            metadata("GuidAttribute"),
            metadata("NativeTypedefAttribute"),
            metadata("StructSizeFieldAttribute"),
        ]);

        assert_eq!(TypeCustomAttributeData::IGNORED.len(), 14);
        assert!(TypeCustomAttributeData::is_ignored(&metadata("ScopedEnumAttribute")));
        assert!(TypeCustomAttributeData::extractor(&metadata("ConstantAttribute")).is_none());
        assert!(!TypeCustomAttributeData::is_ignored(&metadata("ConstantAttribute")));
    }

    #[test]
    fn method_catalog() {
        extracts::<MethodCustomAttributeData>(&[
            metadata("SupportedArchitectureAttribute"),
            metadata("DocumentationAttribute"),
            metadata("ConstantAttribute"),
        ]);

        assert_eq!(MethodCustomAttributeData::IGNORED.len(), 7);
        assert!(MethodCustomAttributeData::extractor(&system("FlagsAttribute")).is_none());
    }

    #[test]
    fn field_catalog() {
        extracts::<FieldCustomAttributeData>(&[
            metadata("DocumentationAttribute"),
            metadata("GuidAttribute"),
            metadata("NativeEncodingAttribute"),
            metadata("FlexibleArrayAttribute"),
            metadata("ConstantAttribute"),
        ]);

        assert!(FieldCustomAttributeData::is_ignored(&metadata("ConstAttribute")));
    }

    #[test]
    fn param_catalog() {
        extracts::<ParamCustomAttributeData>(&[metadata("AssociatedEnumAttribute")]);

        assert_eq!(ParamCustomAttributeData::IGNORED.len(), 14);
        assert!(ParamCustomAttributeData::is_ignored(&metadata("DocumentationAttribute")));
        assert!(ParamCustomAttributeData::extractor(&metadata("DocumentationAttribute")).is_none());
    }

    #[test]
    fn names_compare_by_content() {
        let namespace = METADATA_NAMESPACE.to_string();
        let name = "AgileAttribute".to_string();
        assert!(TypeCustomAttributeData::is_ignored(&QualifiedName::new(&namespace, &name)));
    }
}
