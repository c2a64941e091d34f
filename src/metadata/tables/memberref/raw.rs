use crate::{
    file::io::read_le_at_dyn,
    metadata::tables::{CodedIndex, CodedIndexKind, RowReadable, TableId, TableInfo},
    Result,
};

/// A row of the `MemberRef` table, columns as stored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemberRefRaw {
    /// 0-based row index
    pub index: u32,
    /// Absolute offset of the row
    pub offset: usize,
    /// The type declaring the member, `MemberRefParent`
    pub class: Option<CodedIndex>,
    /// `#Strings` index of the name
    pub name: u32,
    /// `#Blob` index of the method or field signature
    pub signature: u32,
}

impl RowReadable for MemberRefRaw {
    const TABLE: TableId = TableId::MemberRef;

    #[rustfmt::skip]
    fn row_size(sizes: &TableInfo) -> u32 {
        u32::from(
            /* class */     sizes.coded_index_bytes(CodedIndexKind::MemberRefParent) +
            /* name */      sizes.str_bytes() +
            /* signature */ sizes.blob_bytes()
        )
    }

    fn row_read(data: &[u8], offset: &mut usize, index: u32, sizes: &TableInfo) -> Result<Self> {
        Ok(MemberRefRaw {
            index,
            offset: *offset,
            class: CodedIndex::read(data, offset, sizes, CodedIndexKind::MemberRefParent)?,
            name: read_le_at_dyn(data, offset, sizes.is_large_str())?,
            signature: read_le_at_dyn(data, offset, sizes.is_large_blob())?,
        })
    }
}
