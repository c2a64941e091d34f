//! Shared infrastructure of the metadata tables.
//!
//! - [`TableId`] - table numbers and iteration order
//! - [`TableInfo`] - row counts and the column widths derived from them
//! - [`CodedIndex`] / [`CodedIndexKind`] - tagged references into one of several tables
//! - [`schema`] - column layouts of every table
//! - [`MetadataTable`] - typed, lazily decoded view over the rows of one table

mod codedindex;
pub mod schema;
mod tableid;
mod tableinfo;

use std::{marker::PhantomData, sync::Arc};

use crate::Result;

pub use codedindex::{CodedIndex, CodedIndexKind};
pub use schema::Column;
pub use tableid::TableId;
pub use tableinfo::{TableInfo, TableRowInfo};

/// Shared handle to the column widths of a table stream
pub type TableInfoRef = Arc<TableInfo>;

/// Trait implemented by the raw row structures of the typed tables.
pub trait RowReadable: Sized + Send {
    /// The table this row type belongs to
    const TABLE: TableId;

    /// Size of one row in bytes, given the column widths in `sizes`
    fn row_size(sizes: &TableInfo) -> u32;

    /// Read one row at `offset` and advance `offset` past it.
    ///
    /// # Arguments
    /// * `data` - The backing buffer
    /// * `offset` - Absolute offset of the row
    /// * `index` - 0-based row index
    /// * `sizes` - Column widths
    ///
    /// # Errors
    /// Returns [`crate::Error::Format`] if the row is truncated or holds an invalid coded index.
    fn row_read(data: &[u8], offset: &mut usize, index: u32, sizes: &TableInfo) -> Result<Self>;
}

/// Typed access to the rows of one table.
///
/// Rows are decoded on every access, nothing is cached. Indices are 0-based.
pub struct MetadataTable<'a, T> {
    data: &'a [u8],
    start: usize,
    row_count: u32,
    row_size: u32,
    sizes: TableInfoRef,
    _phantom: PhantomData<T>,
}

impl<'a, T: RowReadable> MetadataTable<'a, T> {
    /// Create a table over `row_count` rows starting at absolute offset `start` of `data`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Format`] if the rows do not fit into `data`.
    pub fn new(data: &'a [u8], start: usize, row_count: u32, sizes: TableInfoRef) -> Result<Self> {
        let row_size = T::row_size(&sizes);
        let len = u64::from(row_count) * u64::from(row_size);

        match usize::try_from(len).ok().and_then(|len| start.checked_add(len)) {
            Some(end) if end <= data.len() => Ok(MetadataTable {
                data,
                start,
                row_count,
                row_size,
                sizes,
                _phantom: PhantomData,
            }),
            _ => Err(format_error!(
                at start,
                "{} table of {} rows exceeds the table stream",
                T::TABLE,
                row_count
            )),
        }
    }

    /// Size of the table in bytes
    #[must_use]
    pub fn size(&self) -> u64 {
        u64::from(self.row_count) * u64::from(self.row_size)
    }

    /// Size of one row in bytes
    #[must_use]
    pub fn row_size(&self) -> u32 {
        self.row_size
    }

    /// Number of rows
    #[must_use]
    pub fn row_count(&self) -> u32 {
        self.row_count
    }

    /// Read the row at the 0-based `index`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Format`] if `index` is out of range.
    pub fn get(&self, index: u32) -> Result<T> {
        if index >= self.row_count {
            return Err(format_error!(
                "{} row {} out of range ({} rows)",
                T::TABLE,
                index,
                self.row_count
            ));
        }

        let mut offset = self.start + index as usize * self.row_size as usize;
        T::row_read(self.data, &mut offset, index, &self.sizes)
    }

    /// Iterate over all rows in order
    #[must_use]
    pub fn iter(&self) -> TableIterator<'_, 'a, T> {
        TableIterator {
            table: self,
            current_row: 0,
        }
    }
}

impl<'t, 'a, T: RowReadable> IntoIterator for &'t MetadataTable<'a, T> {
    type Item = Result<T>;
    type IntoIter = TableIterator<'t, 'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the rows of a [`MetadataTable`]
pub struct TableIterator<'t, 'a, T> {
    table: &'t MetadataTable<'a, T>,
    current_row: u32,
}

impl<T: RowReadable> Iterator for TableIterator<'_, '_, T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_row >= self.table.row_count {
            return None;
        }

        let row = self.table.get(self.current_row);
        self.current_row += 1;
        Some(row)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.table.row_count - self.current_row) as usize;
        (remaining, Some(remaining))
    }
}

impl<T: RowReadable> ExactSizeIterator for TableIterator<'_, '_, T> {}
