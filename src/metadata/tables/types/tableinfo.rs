use strum::{EnumCount, IntoEnumIterator};

use crate::metadata::tables::{CodedIndexKind, TableId};

/// Row count of one table and the bit width needed to address it.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub struct TableRowInfo {
    /// Number of rows
    pub rows: u32,
    /// Bits needed to store the largest 1-based row index, at least 1
    pub bits: u8,
    /// `true` if indices into this table are stored in 4 bytes
    pub is_large: bool,
}

impl TableRowInfo {
    /// Compute the index width of a table with `rows` rows.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn new(rows: u32) -> Self {
        let bits = if rows == 0 {
            1
        } else {
            (u32::BITS - rows.leading_zeros()) as u8
        };

        Self {
            rows,
            bits,
            is_large: rows > u32::from(u16::MAX),
        }
    }
}

/// Row counts and column widths of one table stream.
///
/// Column widths of simple indices, coded indices and heap indices all depend on the size
/// of their target; this is computed once when the table stream header is read.
#[derive(Clone, Debug)]
pub struct TableInfo {
    rows: [TableRowInfo; TableId::COUNT],
    coded_index_bits: [u8; CodedIndexKind::COUNT],
    is_large_index_str: bool,
    is_large_index_guid: bool,
    is_large_index_blob: bool,
}

impl TableInfo {
    /// Build the width information from the row counts and the `HeapSizes` flags.
    #[must_use]
    pub fn new(row_counts: &[(TableId, u32)], heap_sizes: u8) -> Self {
        let mut info = TableInfo {
            rows: [TableRowInfo::default(); TableId::COUNT],
            coded_index_bits: [0; CodedIndexKind::COUNT],
            is_large_index_str: heap_sizes & 0x01 != 0,
            is_large_index_guid: heap_sizes & 0x02 != 0,
            is_large_index_blob: heap_sizes & 0x04 != 0,
        };

        for (table, rows) in row_counts {
            info.rows[*table as usize] = TableRowInfo::new(*rows);
        }

        for kind in CodedIndexKind::iter() {
            info.coded_index_bits[kind as usize] = info.calculate_coded_index_bits(kind);
        }

        info
    }

    /// Table info with the given row counts and heap index widths
    #[cfg(test)]
    pub fn new_test(
        valid_tables: &[(TableId, u32)],
        large_str: bool,
        large_blob: bool,
        large_guid: bool,
    ) -> Self {
        let heap_sizes =
            u8::from(large_str) | (u8::from(large_guid) << 1) | (u8::from(large_blob) << 2);
        TableInfo::new(valid_tables, heap_sizes)
    }

    fn calculate_coded_index_bits(&self, kind: CodedIndexKind) -> u8 {
        let max_bits = kind
            .tables()
            .map(|table| self.rows[table as usize].bits)
            .max()
            .unwrap_or(1);

        #[allow(clippy::cast_possible_truncation)]
        let tag_bits = kind.tag_bits() as u8;
        max_bits + tag_bits
    }

    /// Row count of `table`
    #[must_use]
    pub fn rows(&self, table: TableId) -> u32 {
        self.rows[table as usize].rows
    }

    /// Row information of `table`
    #[must_use]
    pub fn get(&self, table: TableId) -> &TableRowInfo {
        &self.rows[table as usize]
    }

    /// `true` if simple indices into `table` are 4 bytes wide
    #[must_use]
    pub fn is_large(&self, table: TableId) -> bool {
        self.rows[table as usize].is_large
    }

    /// `true` if coded indices of `kind` are 4 bytes wide
    #[must_use]
    pub fn is_large_coded(&self, kind: CodedIndexKind) -> bool {
        self.coded_index_bits[kind as usize] > 16
    }

    /// `true` if `#Strings` indices are 4 bytes wide
    #[must_use]
    pub fn is_large_str(&self) -> bool {
        self.is_large_index_str
    }

    /// `true` if `#GUID` indices are 4 bytes wide
    #[must_use]
    pub fn is_large_guid(&self) -> bool {
        self.is_large_index_guid
    }

    /// `true` if `#Blob` indices are 4 bytes wide
    #[must_use]
    pub fn is_large_blob(&self) -> bool {
        self.is_large_index_blob
    }

    /// Width of a `#Strings` index in bytes
    #[must_use]
    pub fn str_bytes(&self) -> u8 {
        if self.is_large_index_str {
            4
        } else {
            2
        }
    }

    /// Width of a `#GUID` index in bytes
    #[must_use]
    pub fn guid_bytes(&self) -> u8 {
        if self.is_large_index_guid {
            4
        } else {
            2
        }
    }

    /// Width of a `#Blob` index in bytes
    #[must_use]
    pub fn blob_bytes(&self) -> u8 {
        if self.is_large_index_blob {
            4
        } else {
            2
        }
    }

    /// Width of a simple index into `table` in bytes
    #[must_use]
    pub fn table_index_bytes(&self, table: TableId) -> u8 {
        if self.is_large(table) {
            4
        } else {
            2
        }
    }

    /// Width of a coded index of `kind` in bytes
    #[must_use]
    pub fn coded_index_bytes(&self, kind: CodedIndexKind) -> u8 {
        if self.is_large_coded(kind) {
            4
        } else {
            2
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_info() {
        assert_eq!(TableRowInfo::new(0).bits, 1);
        assert_eq!(TableRowInfo::new(1).bits, 1);
        assert_eq!(TableRowInfo::new(0x3FFF).bits, 14);
        assert!(!TableRowInfo::new(0xFFFF).is_large);
        assert!(TableRowInfo::new(0x1_0000).is_large);
    }

    #[test]
    fn coded_index_widths() {
        // 2 tag bits leave 14 bits, enough for 0x3FFF rows
        let info = TableInfo::new_test(&[(TableId::TypeRef, 0x3FFF)], false, false, false);
        assert_eq!(info.coded_index_bytes(CodedIndexKind::TypeDefOrRef), 2);
        assert_eq!(info.coded_index_bytes(CodedIndexKind::ResolutionScope), 2);

        let info = TableInfo::new_test(&[(TableId::TypeRef, 0x4000)], false, false, false);
        assert_eq!(info.coded_index_bytes(CodedIndexKind::TypeDefOrRef), 4);
        assert_eq!(info.coded_index_bytes(CodedIndexKind::MethodDefOrRef), 2);

        // 5 tag bits leave 11 bits
        let info = TableInfo::new_test(&[(TableId::Param, 0x800)], false, false, false);
        assert_eq!(info.coded_index_bytes(CodedIndexKind::HasCustomAttribute), 4);
        assert_eq!(info.coded_index_bytes(CodedIndexKind::HasConstant), 2);
        assert_eq!(info.table_index_bytes(TableId::Param), 2);
    }

    #[test]
    fn heap_widths() {
        let info = TableInfo::new(&[], 0x05);
        assert_eq!(info.str_bytes(), 4);
        assert_eq!(info.guid_bytes(), 2);
        assert_eq!(info.blob_bytes(), 4);
    }
}
