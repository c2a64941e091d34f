use crate::{
    file::io::{read_le_at, read_le_at_dyn},
    metadata::tables::{CodedIndex, CodedIndexKind, RowReadable, TableId, TableInfo},
    Result,
};

/// A row of the `TypeDef` table, columns as stored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeDefRaw {
    /// 0-based row index
    pub index: u32,
    /// Absolute offset of the row
    pub offset: usize,
    /// `TypeAttributes` bitmask
    pub flags: u32,
    /// `#Strings` index of the name
    pub type_name: u32,
    /// `#Strings` index of the namespace
    pub type_namespace: u32,
    /// Base type, `TypeDefOrRef`; `None` for interfaces and `System.Object`
    pub extends: Option<CodedIndex>,
    /// 1-based index of the first field owned by this type
    pub field_list: u32,
    /// 1-based index of the first method owned by this type
    pub method_list: u32,
}

impl RowReadable for TypeDefRaw {
    const TABLE: TableId = TableId::TypeDef;

    #[rustfmt::skip]
    fn row_size(sizes: &TableInfo) -> u32 {
        u32::from(
            /* flags */             4 +
            /* type_name */         sizes.str_bytes() +
            /* type_namespace */    sizes.str_bytes() +
            /* extends */           sizes.coded_index_bytes(CodedIndexKind::TypeDefOrRef) +
            /* field_list */        sizes.table_index_bytes(TableId::Field) +
            /* method_list */       sizes.table_index_bytes(TableId::MethodDef)
        )
    }

    fn row_read(data: &[u8], offset: &mut usize, index: u32, sizes: &TableInfo) -> Result<Self> {
        Ok(TypeDefRaw {
            index,
            offset: *offset,
            flags: read_le_at::<u32>(data, offset)?,
            type_name: read_le_at_dyn(data, offset, sizes.is_large_str())?,
            type_namespace: read_le_at_dyn(data, offset, sizes.is_large_str())?,
            extends: CodedIndex::read(data, offset, sizes, CodedIndexKind::TypeDefOrRef)?,
            field_list: read_le_at_dyn(data, offset, sizes.is_large(TableId::Field))?,
            method_list: read_le_at_dyn(data, offset, sizes.is_large(TableId::MethodDef))?,
        })
    }
}
