//! The table stream (`#~`, or `#-` for unoptimized images).
//!
//! The stream starts with a header that lists which tables are present and how many rows
//! each has. The rows of all present tables follow back to back, in ascending table id
//! order, using the column widths that the row counts and the heap size flags imply.
//!
//! # Reference
//! - [ECMA-335 II.24.2.6](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf)

use std::sync::Arc;

use strum::{EnumCount, IntoEnumIterator};

use crate::{
    file::parser::Parser,
    metadata::tables::{schema, MetadataTable, RowReadable, TableId, TableInfo, TableInfoRef},
    Result,
};

/// `HeapSizes` flag: an extra 4-byte field follows the row counts
const EXTRA_DATA: u8 = 0x40;

/// The header of the table stream, and the location of every table.
#[derive(Debug)]
pub struct TablesHeader<'a> {
    /// Major version of the table schema, 2 for current producers
    pub major_version: u8,
    /// Minor version of the table schema
    pub minor_version: u8,
    /// `HeapSizes` flags
    pub heap_sizes: u8,
    /// Bit vector of present tables
    pub valid: u64,
    /// Bit vector of tables sorted by their key column
    pub sorted: u64,
    /// Row counts and column widths
    pub info: TableInfoRef,
    data: &'a [u8],
    table_offsets: [usize; TableId::COUNT],
}

impl<'a> TablesHeader<'a> {
    /// Parse the table stream occupying `len` bytes of `data` at absolute offset `start`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Format`] if the header is truncated, names a table id this
    /// decoder has no layout for, or the rows run past the end of the stream.
    pub fn from(data: &'a [u8], start: usize, len: usize) -> Result<TablesHeader<'a>> {
        let mut parser = Parser::with_window(data, start, len)?;

        let _reserved = parser.read_le::<u32>()?;
        let major_version = parser.read_le::<u8>()?;
        let minor_version = parser.read_le::<u8>()?;
        let heap_sizes = parser.read_le::<u8>()?;
        let _reserved = parser.read_le::<u8>()?;
        let valid = parser.read_le::<u64>()?;
        let sorted = parser.read_le::<u64>()?;

        let unknown = valid >> TableId::COUNT;
        if unknown != 0 {
            return Err(format_error!(
                at start + 8,
                "Unknown metadata table id - {:#04x}",
                TableId::COUNT as u32 + unknown.trailing_zeros()
            ));
        }

        let mut row_counts = Vec::with_capacity(valid.count_ones() as usize);
        for table in TableId::iter() {
            if valid & (1 << table as u64) != 0 {
                row_counts.push((table, parser.read_le::<u32>()?));
            }
        }

        if heap_sizes & EXTRA_DATA != 0 {
            parser.skip(4)?;
        }

        let info = Arc::new(TableInfo::new(&row_counts, heap_sizes));

        let mut table_offsets = [0_usize; TableId::COUNT];
        let mut current_offset = parser.offset();
        for table in TableId::iter() {
            table_offsets[table as usize] = current_offset;

            let size = u64::from(info.rows(table)) * u64::from(schema::row_size(table, &info));
            current_offset = usize::try_from(size)
                .ok()
                .and_then(|size| current_offset.checked_add(size))
                .filter(|end| *end <= start + len)
                .ok_or_else(|| {
                    format_error!(
                        at current_offset,
                        "{} table of {} rows exceeds the table stream",
                        table,
                        info.rows(table)
                    )
                })?;
        }

        log::debug!(
            "table stream {}.{} with {} tables, {} bytes of rows",
            major_version,
            minor_version,
            row_counts.len(),
            current_offset - parser.offset()
        );

        Ok(TablesHeader {
            major_version,
            minor_version,
            heap_sizes,
            valid,
            sorted,
            info,
            data,
            table_offsets,
        })
    }

    /// Number of present tables
    #[must_use]
    pub fn table_count(&self) -> u32 {
        self.valid.count_ones()
    }

    /// `true` if `table` is present
    #[must_use]
    pub fn has_table(&self, table: TableId) -> bool {
        self.valid & (1 << table as u64) != 0
    }

    /// `true` if `table` is flagged as sorted by its key column
    #[must_use]
    pub fn is_sorted(&self, table: TableId) -> bool {
        self.sorted & (1 << table as u64) != 0
    }

    /// Row count of `table`, 0 if absent
    #[must_use]
    pub fn row_count(&self, table: TableId) -> u32 {
        self.info.rows(table)
    }

    /// Absolute offset of the first row of `table`
    #[must_use]
    pub fn table_offset(&self, table: TableId) -> usize {
        self.table_offsets[table as usize]
    }

    /// Typed access to the rows of `T`'s table. An absent table has no rows.
    ///
    /// # Errors
    /// Returns [`crate::Error::Format`] if the table does not fit into the backing buffer.
    pub fn table<T: RowReadable>(&self) -> Result<MetadataTable<'a, T>> {
        MetadataTable::new(
            self.data,
            self.table_offset(T::TABLE),
            self.row_count(T::TABLE),
            self.info.clone(),
        )
    }

    /// Present tables and their row counts, in storage order
    pub fn summaries(&self) -> impl Iterator<Item = (TableId, u32)> + '_ {
        TableId::iter()
            .filter(|table| self.has_table(*table))
            .map(|table| (table, self.row_count(table)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::tables::{CodedIndex, TypeRefRaw};

    #[test]
    fn crafted() {
        #[rustfmt::skip]
        let data = [
            0xAA, 0xAA, // outside the stream
            0x00, 0x00, 0x00, 0x00, // reserved
            0x02, 0x00, // major, minor
            0x40, 0x01, // heap sizes, reserved
            0x03, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // valid: Module, TypeRef
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // sorted
            0x01, 0x00, 0x00, 0x00, // Module rows
            0x02, 0x00, 0x00, 0x00, // TypeRef rows
            0xEE, 0xEE, 0xEE, 0xEE, // extra data

            // Module
            0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00,
            // TypeRef
            0x01, 0x00, 0x10, 0x00, 0x20, 0x00,
            0x05, 0x00, 0x30, 0x00, 0x40, 0x00,
        ];

        let header = TablesHeader::from(&data, 2, data.len() - 2).unwrap();

        assert_eq!(header.major_version, 2);
        assert_eq!(header.table_count(), 2);
        assert!(header.has_table(TableId::TypeRef));
        assert!(!header.has_table(TableId::TypeDef));
        assert_eq!(header.row_count(TableId::TypeRef), 2);
        assert_eq!(header.row_count(TableId::TypeDef), 0);
        assert_eq!(header.table_offset(TableId::Module), 38);
        assert_eq!(header.table_offset(TableId::TypeRef), 48);

        let type_refs = header.table::<TypeRefRaw>().unwrap();
        let second = type_refs.get(1).unwrap();
        assert_eq!(second.resolution_scope, Some(CodedIndex::new(TableId::ModuleRef, 0)));
        assert_eq!(second.type_namespace, 0x40);

        let summaries: Vec<_> = header.summaries().collect();
        assert_eq!(summaries, [(TableId::Module, 1), (TableId::TypeRef, 2)]);
    }

    #[test]
    fn invalid() {
        #[rustfmt::skip]
        let mut data = [
            0x00, 0x00, 0x00, 0x00,
            0x02, 0x00,
            0x00, 0x01,
            0x00, 0x00, 0x00, 0x00, 0x00, 0x40, 0x00, 0x00, // valid: table 0x2E
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x01, 0x00, 0x00, 0x00,
            0x00, 0x00,
        ];

        let error = TablesHeader::from(&data, 0, data.len()).unwrap_err();
        assert!(error.to_string().contains("0x2e"));

        // One Module row needs 10 bytes
        data[13] = 0x00;
        data[8] = 0x01;
        assert!(TablesHeader::from(&data, 0, data.len()).is_err());
        assert!(TablesHeader::from(&data, 0, 20).is_err());
    }
}
