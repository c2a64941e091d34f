use crate::{
    file::io::read_le_at_dyn,
    metadata::tables::{CodedIndex, CodedIndexKind, RowReadable, TableId, TableInfo},
    Result,
};

/// A row of the `TypeRef` table, columns as stored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeRefRaw {
    /// 0-based row index
    pub index: u32,
    /// Absolute offset of the row
    pub offset: usize,
    /// Where the type is defined, `ResolutionScope`
    pub resolution_scope: Option<CodedIndex>,
    /// `#Strings` index of the name
    pub type_name: u32,
    /// `#Strings` index of the namespace
    pub type_namespace: u32,
}

impl RowReadable for TypeRefRaw {
    const TABLE: TableId = TableId::TypeRef;

    #[rustfmt::skip]
    fn row_size(sizes: &TableInfo) -> u32 {
        u32::from(
            /* resolution_scope */  sizes.coded_index_bytes(CodedIndexKind::ResolutionScope) +
            /* type_name */         sizes.str_bytes() +
            /* type_namespace */    sizes.str_bytes()
        )
    }

    fn row_read(data: &[u8], offset: &mut usize, index: u32, sizes: &TableInfo) -> Result<Self> {
        Ok(TypeRefRaw {
            index,
            offset: *offset,
            resolution_scope: CodedIndex::read(
                data,
                offset,
                sizes,
                CodedIndexKind::ResolutionScope,
            )?,
            type_name: read_le_at_dyn(data, offset, sizes.is_large_str())?,
            type_namespace: read_le_at_dyn(data, offset, sizes.is_large_str())?,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::metadata::tables::MetadataTable;

    use super::*;

    #[test]
    fn crafted_short() {
        #[rustfmt::skip]
        let data = vec![
            0x0A, 0x00, // resolution_scope
            0x02, 0x02, // type_name
            0x03, 0x03, // type_namespace

            0x06, 0x00, // resolution_scope
            0x10, 0x00, // type_name
            0x20, 0x00, // type_namespace
        ];

        let sizes = Arc::new(TableInfo::new_test(
            &[(TableId::AssemblyRef, 3)],
            false,
            false,
            false,
        ));
        let table = MetadataTable::<TypeRefRaw>::new(&data, 0, 2, sizes).unwrap();

        let first = table.get(0).unwrap();
        assert_eq!(
            first.resolution_scope,
            Some(CodedIndex::new(TableId::AssemblyRef, 1))
        );
        assert_eq!(first.type_name, 0x0202);
        assert_eq!(first.type_namespace, 0x0303);

        let second = table.get(1).unwrap();
        assert_eq!(second.index, 1);
        assert_eq!(second.offset, 6);
        assert_eq!(
            second.resolution_scope,
            Some(CodedIndex::new(TableId::AssemblyRef, 0))
        );

        let rows: Vec<_> = table.iter().map(|row| row.unwrap().type_name).collect();
        assert_eq!(rows, [0x0202, 0x10]);
    }

    #[test]
    fn crafted_long() {
        #[rustfmt::skip]
        let data = vec![
            0x0B, 0x00, 0x00, 0x00, // resolution_scope
            0x02, 0x00, 0x00, 0x00, // type_name
            0x03, 0x00, 0x00, 0x00, // type_namespace
        ];

        let sizes = Arc::new(TableInfo::new_test(
            &[(TableId::TypeRef, u16::MAX as u32 + 2)],
            true,
            true,
            true,
        ));
        let table = MetadataTable::<TypeRefRaw>::new(&data, 0, 1, sizes).unwrap();

        let row = table.get(0).unwrap();
        assert_eq!(row.resolution_scope, Some(CodedIndex::new(TableId::TypeRef, 1)));
        assert_eq!(row.type_name, 2);
        assert_eq!(row.type_namespace, 3);
    }
}
