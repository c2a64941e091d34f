use crate::{
    file::io::{read_le_at, read_le_at_dyn},
    metadata::tables::{RowReadable, TableId, TableInfo},
    Result,
};

/// A row of the `Param` table, columns as stored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParamRaw {
    /// 0-based row index
    pub index: u32,
    /// Absolute offset of the row
    pub offset: usize,
    /// `ParamAttributes` bitmask
    pub flags: u16,
    /// Position in the signature, 0 for the return value
    pub sequence: u16,
    /// `#Strings` index of the name
    pub name: u32,
}

impl RowReadable for ParamRaw {
    const TABLE: TableId = TableId::Param;

    #[rustfmt::skip]
    fn row_size(sizes: &TableInfo) -> u32 {
        u32::from(
            /* flags */     2 +
            /* sequence */  2 +
            /* name */      sizes.str_bytes()
        )
    }

    fn row_read(data: &[u8], offset: &mut usize, index: u32, sizes: &TableInfo) -> Result<Self> {
        Ok(ParamRaw {
            index,
            offset: *offset,
            flags: read_le_at::<u16>(data, offset)?,
            sequence: read_le_at::<u16>(data, offset)?,
            name: read_le_at_dyn(data, offset, sizes.is_large_str())?,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::metadata::tables::MetadataTable;

    use super::*;

    #[test]
    fn crafted() {
        #[rustfmt::skip]
        let data = vec![
            0x01, 0x00, // flags
            0x00, 0x00, // sequence
            0x10, 0x00, // name

            0x02, 0x20, // flags
            0x01, 0x00, // sequence
            0x20, 0x00, // name
        ];

        let sizes = Arc::new(TableInfo::new_test(&[], false, false, false));
        let table = MetadataTable::<ParamRaw>::new(&data, 0, 2, sizes).unwrap();

        let rows: Vec<ParamRaw> = table.iter().map(|row| row.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].sequence, 0);
        assert_eq!(rows[0].name, 0x10);
        assert_eq!(rows[1].flags, 0x2002);
        assert_eq!(rows[1].sequence, 1);
        assert_eq!(rows[1].offset, 6);
    }
}
