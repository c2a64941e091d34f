use std::fmt;

use strum::{EnumCount, EnumIter};

use crate::{
    file::io::read_le_at_dyn,
    metadata::tables::{TableId, TableInfo},
    Result,
};

/// The coded index kinds of ECMA-335 II.24.2.6.
///
/// Each kind has one fixed ordering of the tables it may reference. The position of a table
/// in that ordering is the tag stored in the low bits of the encoded value.
#[derive(Debug, Hash, Eq, PartialEq, Clone, Copy, EnumIter, EnumCount)]
pub enum CodedIndexKind {
    /// `TypeDef`, `TypeRef`, `TypeSpec`
    TypeDefOrRef,
    /// `Field`, `Param`, `Property`
    HasConstant,
    /// Every table that may carry a custom attribute
    HasCustomAttribute,
    /// `Field`, `Param`
    HasFieldMarshal,
    /// `TypeDef`, `MethodDef`, `Assembly`
    HasDeclSecurity,
    /// `TypeDef`, `TypeRef`, `ModuleRef`, `MethodDef`, `TypeSpec`
    MemberRefParent,
    /// `Event`, `Property`
    HasSemantics,
    /// `MethodDef`, `MemberRef`
    MethodDefOrRef,
    /// `Field`, `MethodDef`
    MemberForwarded,
    /// `File`, `AssemblyRef`, `ExportedType`
    Implementation,
    /// The constructor of a custom attribute, `MethodDef` or `MemberRef` in slots 2 and 3
    CustomAttributeType,
    /// `Module`, `ModuleRef`, `AssemblyRef`, `TypeRef`
    ResolutionScope,
    /// `TypeDef`, `MethodDef`
    TypeOrMethodDef,
}

impl CodedIndexKind {
    /// The table ordering of this kind. `None` marks a tag value that is reserved.
    #[must_use]
    pub fn slots(&self) -> &'static [Option<TableId>] {
        match self {
            CodedIndexKind::TypeDefOrRef => &[
                Some(TableId::TypeDef),
                Some(TableId::TypeRef),
                Some(TableId::TypeSpec),
            ],
            CodedIndexKind::HasConstant => &[
                Some(TableId::Field),
                Some(TableId::Param),
                Some(TableId::Property),
            ],
            CodedIndexKind::HasCustomAttribute => &[
                Some(TableId::MethodDef),
                Some(TableId::Field),
                Some(TableId::TypeRef),
                Some(TableId::TypeDef),
                Some(TableId::Param),
                Some(TableId::InterfaceImpl),
                Some(TableId::MemberRef),
                Some(TableId::Module),
                // Listed as 'Permission' in the standard, no such table exists
                Some(TableId::DeclSecurity),
                Some(TableId::Property),
                Some(TableId::Event),
                Some(TableId::StandAloneSig),
                Some(TableId::ModuleRef),
                Some(TableId::TypeSpec),
                Some(TableId::Assembly),
                Some(TableId::AssemblyRef),
                Some(TableId::File),
                Some(TableId::ExportedType),
                Some(TableId::ManifestResource),
                Some(TableId::GenericParam),
                Some(TableId::GenericParamConstraint),
                Some(TableId::MethodSpec),
            ],
            CodedIndexKind::HasFieldMarshal => &[Some(TableId::Field), Some(TableId::Param)],
            CodedIndexKind::HasDeclSecurity => &[
                Some(TableId::TypeDef),
                Some(TableId::MethodDef),
                Some(TableId::Assembly),
            ],
            CodedIndexKind::MemberRefParent => &[
                Some(TableId::TypeDef),
                Some(TableId::TypeRef),
                Some(TableId::ModuleRef),
                Some(TableId::MethodDef),
                Some(TableId::TypeSpec),
            ],
            CodedIndexKind::HasSemantics => &[Some(TableId::Event), Some(TableId::Property)],
            CodedIndexKind::MethodDefOrRef => &[Some(TableId::MethodDef), Some(TableId::MemberRef)],
            CodedIndexKind::MemberForwarded => &[Some(TableId::Field), Some(TableId::MethodDef)],
            CodedIndexKind::Implementation => &[
                Some(TableId::File),
                Some(TableId::AssemblyRef),
                Some(TableId::ExportedType),
            ],
            CodedIndexKind::CustomAttributeType => &[
                None,
                None,
                Some(TableId::MethodDef),
                Some(TableId::MemberRef),
                None,
            ],
            CodedIndexKind::ResolutionScope => &[
                Some(TableId::Module),
                Some(TableId::ModuleRef),
                Some(TableId::AssemblyRef),
                Some(TableId::TypeRef),
            ],
            CodedIndexKind::TypeOrMethodDef => &[Some(TableId::TypeDef), Some(TableId::MethodDef)],
        }
    }

    /// The tables this kind can reference, in tag order.
    pub fn tables(&self) -> impl Iterator<Item = TableId> {
        self.slots().iter().flatten().copied()
    }

    /// Number of low bits that hold the tag, `ceil(log2(slots))`.
    #[must_use]
    pub fn tag_bits(&self) -> u32 {
        let slots = self.slots().len() as u32;
        u32::BITS - (slots - 1).leading_zeros()
    }

    /// Pack `index` into its encoded form.
    ///
    /// # Errors
    /// Returns [`crate::Error::Format`] if the table is not part of this kind, or the row does
    /// not fit next to the tag.
    pub fn encode(&self, index: CodedIndex) -> Result<u32> {
        let Some(tag) = self
            .slots()
            .iter()
            .position(|slot| *slot == Some(index.table))
        else {
            return Err(format_error!(
                "{} is not a valid {:?} target",
                index.table,
                self
            ));
        };

        let bits = self.tag_bits();
        match index.row.checked_add(1) {
            Some(row) if row >> (u32::BITS - bits) == 0 => Ok((row << bits) | tag as u32),
            _ => Err(format_error!("{} does not fit into a {:?}", index, self)),
        }
    }

    /// Unpack an encoded value. A row of 0 is the null reference and yields `None`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Format`] if the tag is outside this kind's ordering or names a
    /// reserved slot.
    pub fn decode(&self, value: u32) -> Result<Option<CodedIndex>> {
        let bits = self.tag_bits();
        let tag = value & ((1 << bits) - 1);

        let Some(table) = self.slots().get(tag as usize).copied().flatten() else {
            return Err(format_error!("Invalid {:?} tag {} in {:#x}", self, tag, value));
        };

        Ok(match value >> bits {
            0 => None,
            row => Some(CodedIndex::new(table, row - 1)),
        })
    }
}

/// A reference to one row of one table, as unpacked from a coded index.
///
/// `row` is 0-based. The null reference has no [`CodedIndex`]; it is represented as `None`
/// wherever a column may hold it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CodedIndex {
    /// The referenced table
    pub table: TableId,
    /// 0-based row within `table`
    pub row: u32,
}

impl CodedIndex {
    /// Create a reference to `row` (0-based) of `table`.
    #[must_use]
    pub const fn new(table: TableId, row: u32) -> CodedIndex {
        CodedIndex { table, row }
    }

    /// The metadata token of the referenced row, table id in the high byte and 1-based row
    /// in the low 24 bits.
    #[must_use]
    pub fn token(&self) -> u32 {
        (u32::from(self.table as u8) << 24) | (self.row + 1)
    }

    /// Read a coded index column of `kind` at `offset`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Format`] if the column is truncated or the tag is invalid.
    pub fn read(
        data: &[u8],
        offset: &mut usize,
        info: &TableInfo,
        kind: CodedIndexKind,
    ) -> Result<Option<CodedIndex>> {
        let start = *offset;
        let value = read_le_at_dyn(data, offset, info.is_large_coded(kind))?;
        kind.decode(value)
            .map_err(|_| format_error!(at start, "Invalid {:?} column value {:#x}", kind, value))
    }
}

impl fmt::Display for CodedIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.table, self.row)
    }
}
