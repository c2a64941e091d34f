use crate::{
    file::io::read_le_at_dyn,
    metadata::tables::{CodedIndex, CodedIndexKind, RowReadable, TableId, TableInfo},
    Result,
};

/// A row of the `CustomAttribute` table, columns as stored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CustomAttributeRaw {
    /// 0-based row index
    pub index: u32,
    /// Absolute offset of the row
    pub offset: usize,
    /// The entity the attribute is attached to, `HasCustomAttribute`
    pub parent: CodedIndex,
    /// The attribute constructor, `CustomAttributeType`
    pub constructor: CodedIndex,
    /// `#Blob` index of the encoded arguments
    pub value: u32,
}

impl RowReadable for CustomAttributeRaw {
    const TABLE: TableId = TableId::CustomAttribute;

    #[rustfmt::skip]
    fn row_size(sizes: &TableInfo) -> u32 {
        u32::from(
            /* parent */        sizes.coded_index_bytes(CodedIndexKind::HasCustomAttribute) +
            /* constructor */   sizes.coded_index_bytes(CodedIndexKind::CustomAttributeType) +
            /* value */         sizes.blob_bytes()
        )
    }

    fn row_read(data: &[u8], offset: &mut usize, index: u32, sizes: &TableInfo) -> Result<Self> {
        let start = *offset;

        let Some(parent) =
            CodedIndex::read(data, offset, sizes, CodedIndexKind::HasCustomAttribute)?
        else {
            return Err(format_error!(at start, "CustomAttribute row {} has no parent", index));
        };

        let Some(constructor) =
            CodedIndex::read(data, offset, sizes, CodedIndexKind::CustomAttributeType)?
        else {
            return Err(format_error!(
                at start,
                "CustomAttribute row {} has no constructor",
                index
            ));
        };

        Ok(CustomAttributeRaw {
            index,
            offset: start,
            parent,
            constructor,
            value: read_le_at_dyn(data, offset, sizes.is_large_blob())?,
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
            0x23, 0x00, // parent, TypeDef 0
            0x0B, 0x00, // constructor, MemberRef 0
            0x10, 0x00, // value

            0x40, 0x00, // parent, MethodDef 1
            0x12, 0x00, // constructor, MethodDef 1
            0x20, 0x00, // value
        ];

        let sizes = Arc::new(TableInfo::new_test(
            &[(TableId::TypeDef, 1), (TableId::MethodDef, 2), (TableId::MemberRef, 1)],
            false,
            false,
            false,
        ));
        let table = MetadataTable::<CustomAttributeRaw>::new(&data, 0, 2, sizes).unwrap();

        let first = table.get(0).unwrap();
        assert_eq!(first.parent, CodedIndex::new(TableId::TypeDef, 0));
        assert_eq!(first.constructor, CodedIndex::new(TableId::MemberRef, 0));
        assert_eq!(first.value, 0x10);

        let second = table.get(1).unwrap();
        assert_eq!(second.parent, CodedIndex::new(TableId::MethodDef, 1));
        assert_eq!(second.constructor, CodedIndex::new(TableId::MethodDef, 1));
        assert_eq!(second.offset, 6);
    }

    #[test]
    fn crafted_invalid() {
        #[rustfmt::skip]
        let data = vec![
            0x03, 0x00, // parent, null
            0x0B, 0x00, // constructor
            0x10, 0x00, // value

            0x23, 0x00, // parent
            0x09, 0x00, // constructor, unused tag 1
            0x10, 0x00, // value
        ];

        let sizes = Arc::new(TableInfo::new_test(&[], false, false, false));
        let table = MetadataTable::<CustomAttributeRaw>::new(&data, 0, 2, sizes).unwrap();

        assert!(table.get(0).is_err());
        assert_eq!(table.get(1).unwrap_err().offset(), Some(8));
    }
}
