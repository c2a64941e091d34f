//! Parsed metadata: the root, the heaps and the tables of one image.
//!
//! [`MetadataView`] borrows the input buffer and is immutable once built. Everything it
//! hands out (strings, blob cursors, rows) is a view into that same buffer, so one view can
//! be shared by any number of reader threads.
//!
//! # Examples
//!
//! ```rust,no_run
//! use winmdscope::metadata::{tables::TableId, view::MetadataView};
//!
//! let data = std::fs::read("Windows.Win32.winmd")?;
//! let view = MetadataView::parse(&data)?;
//!
//! for index in 0..view.row_count(TableId::TypeDef) {
//!     println!("{}", view.type_def_name(index)?);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::ops::Range;

use crate::{
    file::{locate_metadata, parser::Parser},
    metadata::{
        root::Root,
        streams::{Blob, Guid, Strings, TablesHeader, UserStrings},
        tables::{
            CodedIndex, CodedIndexKind, CustomAttributeRaw, FieldRaw, MemberRefRaw,
            MetadataTable, MethodDefRaw, ParamRaw, RowReadable, TableId, TypeDefRaw, TypeRefRaw,
        },
        typesystem::QualifiedName,
    },
    Result,
};

/// The heaps and tables of a metadata image, borrowed from the input buffer.
pub struct MetadataView<'a> {
    data: &'a [u8],
    root: Root,
    strings: Strings<'a>,
    blobs: Blob<'a>,
    guids: Guid<'a>,
    user_strings: Option<UserStrings<'a>>,
    tables: TablesHeader<'a>,
}

impl<'a> MetadataView<'a> {
    /// Parse a PE image or a bare metadata root.
    ///
    /// # Errors
    /// Returns [`crate::Error::Empty`] or [`crate::Error::NotSupported`] for unusable input,
    /// [`crate::Error::GoblinErr`] for a damaged PE image and [`crate::Error::Format`] for
    /// malformed metadata.
    pub fn parse(data: &'a [u8]) -> Result<MetadataView<'a>> {
        let (offset, len) = locate_metadata(data)?;
        Self::parse_at(data, offset, len)
    }

    /// Parse the metadata root occupying `len` bytes at absolute `offset` of `data`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Format`] if the root is malformed, a required stream is
    /// missing, or a heap or table does not fit.
    pub fn parse_at(data: &'a [u8], offset: usize, len: usize) -> Result<MetadataView<'a>> {
        let metadata = Parser::with_window(data, offset, len)?.read_bytes(len)?;
        let root = Root::read(metadata)?;

        let window = |name: &str| {
            root.stream(name)
                .map(|header| (offset + header.offset as usize, header.size as usize))
        };
        let required = |name: &str| {
            window(name).ok_or_else(|| format_error!(at offset, "Missing {} stream", name))
        };

        let (tables_start, tables_len) = match window("#~").or_else(|| window("#-")) {
            Some(tables) => tables,
            None => return Err(format_error!(at offset, "Missing #~ stream")),
        };

        let (start, size) = required("#Strings")?;
        let strings = Strings::from(&data[start..start + size], start)?;

        let (start, size) = required("#Blob")?;
        let blobs = Blob::from(data, start, size)?;

        let (start, size) = required("#GUID")?;
        let guids = Guid::from(&data[start..start + size], start)?;

        let user_strings = match window("#US") {
            Some((start, size)) => Some(UserStrings::from(data, start, size)?),
            None => None,
        };

        let tables = TablesHeader::from(data, tables_start, tables_len)?;
        for (table, rows) in tables.summaries() {
            log::trace!("{table}: {rows} rows");
        }

        Ok(MetadataView {
            data,
            root,
            strings,
            blobs,
            guids,
            user_strings,
            tables,
        })
    }

    /// The complete input buffer
    #[must_use]
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// The metadata root header and stream directory
    #[must_use]
    pub fn root(&self) -> &Root {
        &self.root
    }

    /// The table stream header
    #[must_use]
    pub fn tables(&self) -> &TablesHeader<'a> {
        &self.tables
    }

    /// The `#Strings` heap
    #[must_use]
    pub fn strings(&self) -> &Strings<'a> {
        &self.strings
    }

    /// The `#Blob` heap
    #[must_use]
    pub fn blobs(&self) -> &Blob<'a> {
        &self.blobs
    }

    /// The `#GUID` heap
    #[must_use]
    pub fn guids(&self) -> &Guid<'a> {
        &self.guids
    }

    /// The `#US` heap, if the image has one
    #[must_use]
    pub fn user_strings(&self) -> Option<&UserStrings<'a>> {
        self.user_strings.as_ref()
    }

    /// Get the string at byte `index` of `#Strings`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Format`] if the index is outside the heap.
    pub fn get_string(&self, index: u32) -> Result<&'a str> {
        self.strings.get(index as usize)
    }

    /// Get a cursor over the blob at byte `index` of `#Blob`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Format`] if the blob does not fit into the heap.
    pub fn get_blob(&self, index: u32) -> Result<Parser<'a>> {
        self.blobs.get(index as usize)
    }

    /// Get the GUID at the 1-based `index` of `#GUID`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Format`] if the index is 0 or past the heap.
    pub fn get_guid(&self, index: u32) -> Result<uguid::Guid> {
        self.guids.get(index as usize)
    }

    /// Decode the user string at byte `index` of `#US`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Format`] if the image has no `#US` heap or the entry is invalid.
    pub fn get_user_string(&self, index: u32) -> Result<String> {
        match &self.user_strings {
            Some(heap) => heap.get(index as usize),
            None => Err(format_error!("Missing #US stream")),
        }
    }

    /// Number of rows in `table`, 0 if absent
    #[must_use]
    pub fn row_count(&self, table: TableId) -> u32 {
        self.tables.row_count(table)
    }

    /// Typed access to the table holding `T` rows.
    ///
    /// # Errors
    /// Returns [`crate::Error::Format`] if the table does not fit into the buffer.
    pub fn table<T: RowReadable>(&self) -> Result<MetadataTable<'a, T>> {
        self.tables.table::<T>()
    }

    fn row<T: RowReadable>(&self, index: u32) -> Result<T> {
        self.tables.table::<T>()?.get(index)
    }

    /// Read the `TypeDef` row at 0-based `index`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Format`] if the row is out of range or malformed.
    pub fn type_def(&self, index: u32) -> Result<TypeDefRaw> {
        self.row(index)
    }

    /// Read the `TypeRef` row at 0-based `index`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Format`] if the row is out of range or malformed.
    pub fn type_ref(&self, index: u32) -> Result<TypeRefRaw> {
        self.row(index)
    }

    /// Read the `MethodDef` row at 0-based `index`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Format`] if the row is out of range or malformed.
    pub fn method_def(&self, index: u32) -> Result<MethodDefRaw> {
        self.row(index)
    }

    /// Read the `Field` row at 0-based `index`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Format`] if the row is out of range or malformed.
    pub fn field(&self, index: u32) -> Result<FieldRaw> {
        self.row(index)
    }

    /// Read the `Param` row at 0-based `index`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Format`] if the row is out of range or malformed.
    pub fn param(&self, index: u32) -> Result<ParamRaw> {
        self.row(index)
    }

    /// Read the `MemberRef` row at 0-based `index`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Format`] if the row is out of range or malformed.
    pub fn member_ref(&self, index: u32) -> Result<MemberRefRaw> {
        self.row(index)
    }

    /// Read the `CustomAttribute` row at 0-based `index`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Format`] if the row is out of range or malformed.
    pub fn custom_attribute(&self, index: u32) -> Result<CustomAttributeRaw> {
        self.row(index)
    }

    /// All `CustomAttribute` rows attached to `parent`, in table order.
    ///
    /// When the table is flagged as sorted the rows are found with a binary search on the
    /// encoded parent column, otherwise with a scan.
    ///
    /// # Errors
    /// Returns [`crate::Error::Format`] if `parent` cannot carry attributes or a row is
    /// malformed.
    pub fn get_custom_attributes(&self, parent: CodedIndex) -> Result<Vec<CustomAttributeRaw>> {
        let kind = CodedIndexKind::HasCustomAttribute;
        let key = kind.encode(parent)?;
        let table = self.tables.table::<CustomAttributeRaw>()?;

        if !self.tables.is_sorted(TableId::CustomAttribute) {
            let mut attributes = Vec::new();
            for row in &table {
                let row = row?;
                if row.parent == parent {
                    attributes.push(row);
                }
            }
            return Ok(attributes);
        }

        let mut low = 0;
        let mut high = table.row_count();
        while low < high {
            let middle = low + (high - low) / 2;
            if kind.encode(table.get(middle)?.parent)? < key {
                low = middle + 1;
            } else {
                high = middle;
            }
        }

        let mut attributes = Vec::new();
        for index in low..table.row_count() {
            let row = table.get(index)?;
            if row.parent != parent {
                break;
            }
            attributes.push(row);
        }

        Ok(attributes)
    }

    /// Resolve a run-length list column into a 0-based range of `target` rows.
    ///
    /// `owner_rows` rows of the owner table each open a run with `list(row)`; a run lasts
    /// until the next owner's run begins, the last one until the end of `target`.
    fn member_range(
        &self,
        owner: TableId,
        index: u32,
        target: TableId,
        list: impl Fn(u32) -> Result<u32>,
    ) -> Result<Range<u32>> {
        let owner_rows = self.row_count(owner);
        let target_rows = self.row_count(target);

        let start = list(index)?;
        let end = if index + 1 < owner_rows {
            list(index + 1)?
        } else {
            target_rows + 1
        };

        if start == 0 || start > end || end > target_rows + 1 {
            return Err(format_error!(
                "{} row {} has an invalid {} list {}..{} ({} rows)",
                owner,
                index,
                target,
                start,
                end,
                target_rows
            ));
        }

        Ok(start - 1..end - 1)
    }

    /// The 0-based `Field` rows owned by the `TypeDef` at `index`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Format`] if the list columns are inconsistent.
    pub fn type_def_fields(&self, index: u32) -> Result<Range<u32>> {
        self.member_range(TableId::TypeDef, index, TableId::Field, |row| {
            Ok(self.type_def(row)?.field_list)
        })
    }

    /// The 0-based `MethodDef` rows owned by the `TypeDef` at `index`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Format`] if the list columns are inconsistent.
    pub fn type_def_methods(&self, index: u32) -> Result<Range<u32>> {
        self.member_range(TableId::TypeDef, index, TableId::MethodDef, |row| {
            Ok(self.type_def(row)?.method_list)
        })
    }

    /// The 0-based `Param` rows owned by the `MethodDef` at `index`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Format`] if the list columns are inconsistent.
    pub fn method_def_params(&self, index: u32) -> Result<Range<u32>> {
        self.member_range(TableId::MethodDef, index, TableId::Param, |row| {
            Ok(self.method_def(row)?.param_list)
        })
    }

    /// The name of the `TypeDef` at `index`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Format`] if the row or its strings are invalid.
    pub fn type_def_name(&self, index: u32) -> Result<QualifiedName<'a>> {
        let row = self.type_def(index)?;
        Ok(QualifiedName::new(
            self.get_string(row.type_namespace)?,
            self.get_string(row.type_name)?,
        ))
    }

    /// The name of the `TypeRef` at `index`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Format`] if the row or its strings are invalid.
    pub fn type_ref_name(&self, index: u32) -> Result<QualifiedName<'a>> {
        let row = self.type_ref(index)?;
        Ok(QualifiedName::new(
            self.get_string(row.type_namespace)?,
            self.get_string(row.type_name)?,
        ))
    }

    /// The name of a `TypeDef` or `TypeRef` row.
    ///
    /// # Errors
    /// Returns [`crate::Error::UnsupportedFeature`] for rows of any other table.
    pub fn type_name(&self, index: CodedIndex) -> Result<QualifiedName<'a>> {
        match index.table {
            TableId::TypeDef => self.type_def_name(index.row),
            TableId::TypeRef => self.type_ref_name(index.row),
            _ => Err(unsupported_error!("{} does not name a type", index)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        test::{Class, ImageBuilder, Owner, ValueBlob},
        ErrorKind,
    };

    #[test]
    fn heaps() {
        let mut builder = ImageBuilder::new();
        let name = builder.string("Apis");
        let blob = builder.blob(&[0xDE, 0xAD]);
        let guid = builder.guid([
            0xDD, 0xCC, 0xBB, 0xAA, 0x22, 0x11, 0x44, 0x33,
            0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07,
        ]);
        let text = builder.user_string("Hi");
        let image = builder.build();

        let view = MetadataView::parse(&image).unwrap();
        assert_eq!(view.root().version, "v4.0.30319");
        assert_eq!(view.get_string(name).unwrap(), "Apis");
        assert_eq!(view.get_string(0).unwrap(), "");

        let mut cursor = view.get_blob(blob).unwrap();
        assert_eq!(cursor.read_bytes(2).unwrap(), &[0xDE, 0xAD]);
        assert!(cursor.is_exhausted());

        assert_eq!(
            view.get_guid(guid).unwrap().to_string(),
            "aabbccdd-1122-3344-0001-020304050607"
        );
        assert_eq!(view.get_user_string(text).unwrap(), "Hi");
        assert!(view.get_string(0x1000).is_err());
    }

    #[test]
    fn rows_and_names() {
        let mut builder = ImageBuilder::new();
        let object = builder.type_ref("System", "Object");
        let point = builder.type_def(0x0101, "Windows.Win32.Foundation", "POINT", Some(Class::TypeRef(object)));
        builder.field(0x0006, "x", &[0x06, 0x08]);
        builder.field(0x0006, "y", &[0x06, 0x08]);
        let apis = builder.type_def(0x0181, "Windows.Win32.Foundation", "Apis", None);
        let method = builder.method_def(0x0096, "GetLastError", &[0x00, 0x00, 0x09]);
        builder.method_def(0x0096, "SetLastError", &[0x00, 0x01, 0x01, 0x09]);
        builder.param(1, "dwErrCode");
        let image = builder.build();

        let view = MetadataView::parse(&image).unwrap();
        assert_eq!(view.row_count(TableId::TypeDef), 2);
        assert_eq!(view.row_count(TableId::Module), 1);
        assert_eq!(view.row_count(TableId::Event), 0);

        let row = view.type_def(point).unwrap();
        assert_eq!(row.extends, Some(CodedIndex::new(TableId::TypeRef, object)));
        assert_eq!(
            view.type_def_name(apis).unwrap(),
            QualifiedName::new("Windows.Win32.Foundation", "Apis")
        );
        assert_eq!(view.type_ref_name(object).unwrap().to_string(), "System.Object");
        assert_eq!(
            view.type_name(CodedIndex::new(TableId::TypeDef, point)).unwrap().name,
            "POINT"
        );
        assert_eq!(
            view.type_name(CodedIndex::new(TableId::Field, 0)).unwrap_err().kind(),
            ErrorKind::UnsupportedFeature
        );

        assert_eq!(view.type_def_fields(point).unwrap(), 0..2);
        assert_eq!(view.type_def_fields(apis).unwrap(), 2..2);
        assert_eq!(view.type_def_methods(point).unwrap(), 0..0);
        assert_eq!(view.type_def_methods(apis).unwrap(), 0..2);
        assert_eq!(view.method_def_params(method).unwrap(), 0..0);
        assert_eq!(view.method_def_params(method + 1).unwrap(), 0..1);

        assert_eq!(view.get_string(view.param(0).unwrap().name).unwrap(), "dwErrCode");
        assert!(view.type_def(2).is_err());
    }

    fn attributed(sorted: bool) -> Vec<u8> {
        let mut builder = ImageBuilder::new();
        if !sorted {
            builder.keep_attribute_order();
        }
        let first = builder.type_def(0, "NS", "First", None);
        let second = builder.type_def(0, "NS", "Second", None);
        let method = builder.method_def(0, "Run", &[0x00, 0x00, 0x01]);
        let ctor = builder.attribute_ctor("System", "FlagsAttribute", &[]);
        let value = ValueBlob::new().finish();

        builder.custom_attribute(Owner::TypeDef(second), ctor, &value);
        builder.custom_attribute(Owner::MethodDef(method), ctor, &value);
        builder.custom_attribute(Owner::TypeDef(first), ctor, &value);
        builder.custom_attribute(Owner::TypeDef(second), ctor, &value);
        builder.build()
    }

    #[test]
    fn custom_attribute_lookup() {
        for sorted in [true, false] {
            let image = attributed(sorted);
            let view = MetadataView::parse(&image).unwrap();
            assert_eq!(view.tables().is_sorted(TableId::CustomAttribute), sorted);

            let parent = CodedIndex::new(TableId::TypeDef, 1);
            let rows = view.get_custom_attributes(parent).unwrap();
            assert_eq!(rows.len(), 2);
            assert!(rows.iter().all(|row| row.parent == parent));
            assert!(rows[0].index < rows[1].index);

            let first = view
                .get_custom_attributes(CodedIndex::new(TableId::TypeDef, 0))
                .unwrap();
            assert_eq!(first.len(), 1);

            let method = view
                .get_custom_attributes(CodedIndex::new(TableId::MethodDef, 0))
                .unwrap();
            assert_eq!(method.len(), 1);

            let none = view
                .get_custom_attributes(CodedIndex::new(TableId::Field, 0))
                .unwrap();
            assert!(none.is_empty());
        }
    }

    #[test]
    fn missing_streams() {
        let image = ImageBuilder::new().omit_stream("#US").build();
        let view = MetadataView::parse(&image).unwrap();
        assert!(view.user_strings().is_none());
        assert_eq!(view.get_user_string(1).unwrap_err().kind(), ErrorKind::Format);

        for stream in ["#~", "#Strings", "#Blob", "#GUID"] {
            let image = ImageBuilder::new().omit_stream(stream).build();
            let error = MetadataView::parse(&image).err().unwrap();
            assert_eq!(error.kind(), ErrorKind::Format);
            assert!(error.to_string().contains(stream));
        }
    }

    #[test]
    fn pe_container() {
        let mut builder = ImageBuilder::new();
        builder.type_def(0, "NS", "Inside", None);

        let image = builder.build_pe();
        let view = MetadataView::parse(&image).unwrap();
        assert_eq!(view.type_def_name(0).unwrap().name, "Inside");
    }

    #[test]
    fn truncated() {
        let image = ImageBuilder::new().build();
        for len in [0, 8, 40, image.len() - 1] {
            assert!(MetadataView::parse(&image[..len]).is_err());
        }
    }
}
