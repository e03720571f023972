//! Field directory.
//!
//! A directory maps every field identifier of one module revision to its
//! table, byte offset, width and word count. Directories are built once per
//! revision and never mutated; the accessor code in [`crate::cache`] only
//! ever talks to them, so adding a revision means adding one directory.

use crate::error::{BackendError, BackendResult};
use crate::probe::Capacities;
use crate::revision::ModuleRevision;
use flow_hw_types::{Capability, FieldId, ModuleField, Subsystem, TableId, Version};
use std::collections::HashMap;

/// Computes a table's row count from probed capacities. `None` means the
/// counters multiply past `u32`.
pub type RowsFn = fn(&Capacities) -> Option<u32>;

/// Computes the rows per bank of a banked table.
pub type BankRowsFn = fn(&Capacities) -> u32;

/// Storage width and signedness of one field word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Width {
    U8,
    U16,
    U32,
    I8,
    I16,
    I32,
}

impl Width {
    /// Returns the number of bytes one word occupies.
    pub const fn bytes(self) -> usize {
        match self {
            Width::U8 | Width::I8 => 1,
            Width::U16 | Width::I16 => 2,
            Width::U32 | Width::I32 => 4,
        }
    }

    pub const fn bits(self) -> u32 {
        self.bytes() as u32 * 8
    }

    pub const fn is_signed(self) -> bool {
        matches!(self, Width::I8 | Width::I16 | Width::I32)
    }

    /// Writes `value` truncated to this width, little-endian.
    ///
    /// `out` must be exactly [`Width::bytes`] long.
    pub fn encode(self, value: u32, out: &mut [u8]) {
        out.copy_from_slice(&value.to_le_bytes()[..self.bytes()]);
    }

    /// Reads a word of this width. Signed widths are sign-extended to 32
    /// bits, so `decode(encode(v)) == v` for every value representable in
    /// the width.
    pub fn decode(self, bytes: &[u8]) -> u32 {
        let mut raw = [0u8; 4];
        raw[..self.bytes()].copy_from_slice(&bytes[..self.bytes()]);
        let value = u32::from_le_bytes(raw);
        if self.is_signed() {
            let shift = 32 - self.bits();
            (((value << shift) as i32) >> shift) as u32
        } else {
            value
        }
    }
}

/// Location of one field inside a table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDesc {
    pub id: FieldId,
    pub name: &'static str,
    pub table: TableId,
    /// Byte offset of word 0 within the entry.
    pub offset: usize,
    pub width: Width,
    /// Number of words; greater than one for mask and key arrays.
    pub words: u32,
}

impl FieldDesc {
    /// Returns the byte offset of `word` within the entry.
    pub fn word_offset(&self, word: u32) -> usize {
        self.offset + word as usize * self.width.bytes()
    }

    /// Returns the number of entry bytes the field covers.
    pub fn span(&self) -> usize {
        self.width.bytes() * self.words as usize
    }
}

/// Bulk operation named by a function selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionOp {
    /// Zero one row and re-apply the revision defaults.
    SetAllDefaults,
    /// Fill every byte of one row with the low byte of the value.
    PresetAll,
    /// Report whether two rows are bit-identical.
    Compare,
    /// Search for a row bit-identical to a candidate.
    Find,
    /// Copy another row onto this one.
    CopyFrom,
    /// Fill every row of one bank with the low byte of the value.
    BankReset,
}

impl FunctionOp {
    /// Returns true for selectors invoked through `get`.
    pub const fn is_query(self) -> bool {
        matches!(self, FunctionOp::Compare | FunctionOp::Find)
    }
}

/// What a field identifier resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldEntry {
    Field(FieldDesc),
    Function { table: TableId, op: FunctionOp },
}

/// Static description of one table of a revision.
#[derive(Debug, Clone)]
pub struct TableDesc {
    pub id: TableId,
    /// Size of one entry image in bytes, padding included.
    pub entry_size: usize,
    rows: RowsFn,
    bank_rows: Option<BankRowsFn>,
    fields: Vec<FieldDesc>,
}

impl TableDesc {
    /// Returns the number of rows for the probed capacities, or `None` if
    /// they overflow.
    pub fn rows(&self, caps: &Capacities) -> Option<u32> {
        (self.rows)(caps)
    }

    /// Returns the number of rows per bank, or `None` for unbanked tables.
    pub fn bank_rows(&self, caps: &Capacities) -> Option<u32> {
        self.bank_rows.map(|f| f(caps))
    }

    pub fn fields(&self) -> &[FieldDesc] {
        &self.fields
    }

    /// Returns the entry byte offsets not covered by any field.
    pub fn padding(&self) -> Vec<usize> {
        let mut covered = vec![false; self.entry_size];
        for field in &self.fields {
            for byte in &mut covered[field.offset..field.offset + field.span()] {
                *byte = true;
            }
        }
        covered
            .iter()
            .enumerate()
            .filter(|(_, c)| !**c)
            .map(|(i, _)| i)
            .collect()
    }
}

/// Complete directory of one module revision.
#[derive(Debug)]
pub struct RevisionLayout {
    revision: ModuleRevision,
    tables: Vec<TableDesc>,
    entries: HashMap<FieldId, FieldEntry>,
    defaults: Vec<(FieldDesc, u32)>,
    requires: Vec<Capability>,
}

impl RevisionLayout {
    pub(crate) fn builder(revision: ModuleRevision) -> LayoutBuilder {
        LayoutBuilder {
            revision,
            tables: Vec::new(),
            functions: Vec::new(),
            defaults: Vec::new(),
            requires: Vec::new(),
        }
    }

    pub fn revision(&self) -> ModuleRevision {
        self.revision
    }

    pub fn subsystem(&self) -> Subsystem {
        self.revision.subsystem()
    }

    pub fn version(&self) -> Version {
        self.revision.version()
    }

    /// Returns the tables in flush order.
    pub fn tables(&self) -> &[TableDesc] {
        &self.tables
    }

    pub fn table(&self, id: TableId) -> Option<&TableDesc> {
        self.tables.iter().find(|t| t.id == id)
    }

    /// Returns the position of a table in [`RevisionLayout::tables`].
    pub fn table_index(&self, id: TableId) -> Option<usize> {
        self.tables.iter().position(|t| t.id == id)
    }

    /// Capacity counters the probe must report (non-zero) for this revision.
    pub fn requires(&self) -> &[Capability] {
        &self.requires
    }

    /// Revision-specific default values, applied to every row and word
    /// after the image is zeroed.
    pub fn defaults(&self) -> &[(FieldDesc, u32)] {
        &self.defaults
    }

    /// Resolves a field identifier.
    pub fn resolve(&self, field: FieldId) -> BackendResult<FieldEntry> {
        self.entries
            .get(&field)
            .copied()
            .ok_or(BackendError::UnsupportedField {
                subsystem: self.subsystem(),
                field,
                version: self.version(),
            })
    }

    /// Returns every field and selector identifier defined by this revision.
    pub fn field_ids(&self) -> impl Iterator<Item = FieldId> + '_ {
        self.entries.keys().copied()
    }
}

/// Entry point for directory lookups by reported version.
pub struct FieldDirectory;

impl FieldDirectory {
    /// Resolves a field for the revision a device reports.
    ///
    /// # Errors
    ///
    /// `UnsupportedVersion` if the revision is not compiled in,
    /// `UnsupportedField` if the field is not defined for it.
    pub fn resolve(
        subsystem: Subsystem,
        version: Version,
        field: FieldId,
    ) -> BackendResult<FieldEntry> {
        ModuleRevision::select(subsystem, version)?
            .layout()
            .resolve(field)
    }
}

pub(crate) struct LayoutBuilder {
    revision: ModuleRevision,
    tables: Vec<TableDesc>,
    functions: Vec<(FieldId, TableId, FunctionOp)>,
    defaults: Vec<(FieldId, u32)>,
    requires: Vec<Capability>,
}

impl LayoutBuilder {
    pub fn requires(mut self, caps: &[Capability]) -> Self {
        self.requires.extend_from_slice(caps);
        self
    }

    pub fn table(
        self,
        id: TableId,
        rows: RowsFn,
        build: impl FnOnce(TableBuilder) -> TableBuilder,
    ) -> Self {
        self.push_table(id, rows, None, build)
    }

    pub fn banked_table(
        self,
        id: TableId,
        rows: RowsFn,
        bank_rows: BankRowsFn,
        build: impl FnOnce(TableBuilder) -> TableBuilder,
    ) -> Self {
        self.push_table(id, rows, Some(bank_rows), build)
    }

    fn push_table(
        mut self,
        id: TableId,
        rows: RowsFn,
        bank_rows: Option<BankRowsFn>,
        build: impl FnOnce(TableBuilder) -> TableBuilder,
    ) -> Self {
        debug_assert_eq!(id.subsystem(), self.revision.subsystem());
        let table = build(TableBuilder {
            id,
            offset: 0,
            fields: Vec::new(),
        });
        let entry_size = table.offset.div_ceil(4).max(1) * 4;
        self.tables.push(TableDesc {
            id,
            entry_size,
            rows,
            bank_rows,
            fields: table.fields,
        });
        self
    }

    pub fn function<F: ModuleField>(mut self, field: F, table: TableId, op: FunctionOp) -> Self {
        debug_assert!(field.is_function());
        self.functions.push((field.id(), table, op));
        self
    }

    pub fn with_default<F: ModuleField>(mut self, field: F, value: u32) -> Self {
        self.defaults.push((field.id(), value));
        self
    }

    pub fn build(self) -> RevisionLayout {
        let mut entries = HashMap::new();
        for table in &self.tables {
            for field in &table.fields {
                let prev = entries.insert(field.id, FieldEntry::Field(*field));
                debug_assert!(prev.is_none(), "{} defined twice", field.name);
            }
        }
        for (id, table, op) in &self.functions {
            entries.insert(*id, FieldEntry::Function { table: *table, op: *op });
        }

        let defaults = self
            .defaults
            .iter()
            .filter_map(|(id, value)| match entries.get(id) {
                Some(FieldEntry::Field(desc)) => Some((*desc, *value)),
                _ => None,
            })
            .collect();

        RevisionLayout {
            revision: self.revision,
            tables: self.tables,
            entries,
            defaults,
            requires: self.requires,
        }
    }
}

/// Lays out the fields of one table entry in declaration order, each word
/// naturally aligned.
pub(crate) struct TableBuilder {
    id: TableId,
    offset: usize,
    fields: Vec<FieldDesc>,
}

impl TableBuilder {
    pub fn field<F: ModuleField>(self, field: F, width: Width) -> Self {
        self.array(field, width, 1)
    }

    pub fn fields<F: ModuleField>(self, width: Width, fields: &[F]) -> Self {
        fields.iter().fold(self, |t, f| t.array(*f, width, 1))
    }

    pub fn array<F: ModuleField>(mut self, field: F, width: Width, words: u32) -> Self {
        debug_assert!(!field.is_function());
        let align = width.bytes();
        self.offset = self.offset.div_ceil(align) * align;
        self.fields.push(FieldDesc {
            id: field.id(),
            name: field.name(),
            table: self.id,
            offset: self.offset,
            width,
            words,
        });
        self.offset += align * words as usize;
        self
    }

    /// Skips reserved bytes.
    pub fn reserved(mut self, bytes: usize) -> Self {
        self.offset += bytes;
        self
    }
}
