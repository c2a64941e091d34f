//! Column layouts of every table, ECMA-335 II.22.
//!
//! Typed row readers exist only for the tables the attribute decoder works with. All other
//! tables still have to be sized exactly, since a table's rows start where the previous
//! present table ends.

use crate::metadata::tables::{CodedIndexKind, TableId, TableInfo};

/// The storage class of one column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Column {
    /// Fixed 2-byte constant
    U16,
    /// Fixed 4-byte constant
    U32,
    /// Index into `#Strings`
    Str,
    /// Index into `#GUID`
    Guid,
    /// Index into `#Blob`
    Blob,
    /// Simple index into one table
    Index(TableId),
    /// Coded index of the given kind
    Coded(CodedIndexKind),
}

impl Column {
    /// Width of this column in bytes
    #[must_use]
    pub fn size(&self, info: &TableInfo) -> u8 {
        match self {
            Column::U16 => 2,
            Column::U32 => 4,
            Column::Str => info.str_bytes(),
            Column::Guid => info.guid_bytes(),
            Column::Blob => info.blob_bytes(),
            Column::Index(table) => info.table_index_bytes(*table),
            Column::Coded(kind) => info.coded_index_bytes(*kind),
        }
    }
}

/// The columns of `table`, in storage order.
#[must_use]
pub fn columns(table: TableId) -> &'static [Column] {
    use CodedIndexKind as K;
    use Column::{Blob, Coded, Guid, Index, Str, U16, U32};

    match table {
        TableId::Module => &[U16, Str, Guid, Guid, Guid],
        TableId::TypeRef => &[Coded(K::ResolutionScope), Str, Str],
        TableId::TypeDef => &[
            U32,
            Str,
            Str,
            Coded(K::TypeDefOrRef),
            Index(TableId::Field),
            Index(TableId::MethodDef),
        ],
        TableId::FieldPtr => &[Index(TableId::Field)],
        TableId::Field => &[U16, Str, Blob],
        TableId::MethodPtr => &[Index(TableId::MethodDef)],
        TableId::MethodDef => &[U32, U16, U16, Str, Blob, Index(TableId::Param)],
        TableId::ParamPtr => &[Index(TableId::Param)],
        TableId::Param => &[U16, U16, Str],
        TableId::InterfaceImpl => &[Index(TableId::TypeDef), Coded(K::TypeDefOrRef)],
        TableId::MemberRef => &[Coded(K::MemberRefParent), Str, Blob],
        TableId::Constant => &[U16, Coded(K::HasConstant), Blob],
        TableId::CustomAttribute => &[
            Coded(K::HasCustomAttribute),
            Coded(K::CustomAttributeType),
            Blob,
        ],
        TableId::FieldMarshal => &[Coded(K::HasFieldMarshal), Blob],
        TableId::DeclSecurity => &[U16, Coded(K::HasDeclSecurity), Blob],
        TableId::ClassLayout => &[U16, U32, Index(TableId::TypeDef)],
        TableId::FieldLayout => &[U32, Index(TableId::Field)],
        TableId::StandAloneSig => &[Blob],
        TableId::EventMap => &[Index(TableId::TypeDef), Index(TableId::Event)],
        TableId::EventPtr => &[Index(TableId::Event)],
        TableId::Event => &[U16, Str, Coded(K::TypeDefOrRef)],
        TableId::PropertyMap => &[Index(TableId::TypeDef), Index(TableId::Property)],
        TableId::PropertyPtr => &[Index(TableId::Property)],
        TableId::Property => &[U16, Str, Blob],
        TableId::MethodSemantics => &[U16, Index(TableId::MethodDef), Coded(K::HasSemantics)],
        TableId::MethodImpl => &[
            Index(TableId::TypeDef),
            Coded(K::MethodDefOrRef),
            Coded(K::MethodDefOrRef),
        ],
        TableId::ModuleRef => &[Str],
        TableId::TypeSpec => &[Blob],
        TableId::ImplMap => &[
            U16,
            Coded(K::MemberForwarded),
            Str,
            Index(TableId::ModuleRef),
        ],
        TableId::FieldRVA => &[U32, Index(TableId::Field)],
        TableId::EncLog => &[U32, U32],
        TableId::EncMap => &[U32],
        TableId::Assembly => &[U32, U16, U16, U16, U16, U32, Blob, Str, Str],
        TableId::AssemblyProcessor => &[U32],
        TableId::AssemblyOS => &[U32, U32, U32],
        TableId::AssemblyRef => &[U16, U16, U16, U16, U32, Blob, Str, Str, Blob],
        TableId::AssemblyRefProcessor => &[U32, Index(TableId::AssemblyRef)],
        TableId::AssemblyRefOS => &[U32, U32, U32, Index(TableId::AssemblyRef)],
        TableId::File => &[U32, Str, Blob],
        TableId::ExportedType => &[U32, U32, Str, Str, Coded(K::Implementation)],
        TableId::ManifestResource => &[U32, U32, Str, Coded(K::Implementation)],
        TableId::NestedClass => &[Index(TableId::TypeDef), Index(TableId::TypeDef)],
        TableId::GenericParam => &[U16, U16, Coded(K::TypeOrMethodDef), Str],
        TableId::MethodSpec => &[Coded(K::MethodDefOrRef), Blob],
        TableId::GenericParamConstraint => &[
            Index(TableId::GenericParam),
            Coded(K::TypeDefOrRef),
        ],
    }
}

/// Size of one row of `table` in bytes.
#[must_use]
pub fn row_size(table: TableId, info: &TableInfo) -> u32 {
    columns(table)
        .iter()
        .map(|column| u32::from(column.size(info)))
        .sum()
}
