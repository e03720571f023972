//! Versioned module layout.
//!
//! A [`ModuleLayout`] is the cached image of one subsystem's table set. All
//! tables live in one contiguous allocation; the active revision's
//! directory is the only thing that gives the bytes meaning.

use crate::directory::{RevisionLayout, TableDesc};
use crate::error::{BackendError, BackendResult};
use crate::probe::Capacities;
use crate::revision::ModuleRevision;
use flow_hw_types::TableId;
use std::ops::Range;

/// Largest image one subsystem may allocate.
pub const MAX_IMAGE_BYTES: usize = 1 << 30;

/// Placement of one table inside the layout image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableImage {
    id: TableId,
    entry_size: usize,
    rows: u32,
    bank_rows: Option<u32>,
    base: usize,
}

impl TableImage {
    pub fn id(&self) -> TableId {
        self.id
    }

    pub fn entry_size(&self) -> usize {
        self.entry_size
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Rows per bank for banked tables.
    pub fn bank_rows(&self) -> Option<u32> {
        self.bank_rows
    }

    /// Number of banks, or `None` for unbanked tables.
    pub fn banks(&self) -> Option<u32> {
        match self.bank_rows {
            Some(0) => Some(0),
            Some(n) => Some(self.rows / n),
            None => None,
        }
    }

    /// Total size in bytes.
    pub fn len(&self) -> usize {
        self.entry_size * self.rows as usize
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Byte range of `count` rows starting at `start`, relative to the
    /// layout image. The caller validates the bounds.
    pub(crate) fn span(&self, start: u32, count: u32) -> Range<usize> {
        let from = self.base + start as usize * self.entry_size;
        from..from + count as usize * self.entry_size
    }
}

/// Cached image of one subsystem, tagged with its revision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleLayout {
    revision: ModuleRevision,
    tables: Vec<TableImage>,
    data: Vec<u8>,
}

impl ModuleLayout {
    /// Allocates the image for the probed capacities, zero-filled with the
    /// revision defaults applied.
    ///
    /// # Errors
    ///
    /// `CapacityOverflow` when a table's row count overflows or the image
    /// would exceed [`MAX_IMAGE_BYTES`].
    pub fn allocate(revision: ModuleRevision, caps: &Capacities) -> BackendResult<Self> {
        let directory = revision.layout();
        let mut base: usize = 0;
        let mut tables = Vec::with_capacity(directory.tables().len());

        for desc in directory.tables() {
            let overflow = || BackendError::CapacityOverflow { table: desc.id };
            let rows = desc.rows(caps).ok_or_else(overflow)?;
            let image = TableImage {
                id: desc.id,
                entry_size: desc.entry_size,
                rows,
                bank_rows: desc.bank_rows(caps),
                base,
            };
            base = desc
                .entry_size
                .checked_mul(rows as usize)
                .and_then(|len| base.checked_add(len))
                .filter(|end| *end <= MAX_IMAGE_BYTES)
                .ok_or_else(overflow)?;
            tables.push(image);
        }

        let mut layout = Self {
            revision,
            tables,
            data: vec![0; base],
        };
        layout.apply_defaults(None);
        Ok(layout)
    }

    pub fn revision(&self) -> ModuleRevision {
        self.revision
    }

    pub fn directory(&self) -> &'static RevisionLayout {
        self.revision.layout()
    }

    pub fn tables(&self) -> &[TableImage] {
        &self.tables
    }

    pub fn table(&self, id: TableId) -> Option<&TableImage> {
        self.tables.iter().find(|t| t.id == id)
    }

    /// Returns the static description of a table.
    pub fn table_desc(&self, id: TableId) -> Option<&'static TableDesc> {
        self.directory().table(id)
    }

    /// Returns the whole image.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Returns the bytes of one table.
    pub fn table_bytes(&self, id: TableId) -> Option<&[u8]> {
        self.table(id).map(|t| &self.data[t.span(0, t.rows)])
    }

    /// Returns `count` rows starting at `start`, or `None` if the table is
    /// unknown or the range exceeds it.
    pub fn rows_bytes(&self, id: TableId, start: u32, count: u32) -> Option<&[u8]> {
        let table = self.table(id)?;
        if u64::from(start) + u64::from(count) > u64::from(table.rows) {
            return None;
        }
        Some(&self.data[table.span(start, count)])
    }

    pub(crate) fn rows_bytes_mut(
        &mut self,
        id: TableId,
        start: u32,
        count: u32,
    ) -> Option<&mut [u8]> {
        let table = self.table(id)?;
        if u64::from(start) + u64::from(count) > u64::from(table.rows) {
            return None;
        }
        let span = table.span(start, count);
        Some(&mut self.data[span])
    }

    /// Returns the image of one row.
    pub fn entry(&self, id: TableId, index: u32) -> Option<&[u8]> {
        self.rows_bytes(id, index, 1)
    }

    pub(crate) fn entry_mut(&mut self, id: TableId, index: u32) -> Option<&mut [u8]> {
        self.rows_bytes_mut(id, index, 1)
    }

    /// Zeroes the whole image and re-applies the revision defaults.
    pub fn reset(&mut self) {
        self.data.fill(0);
        self.apply_defaults(None);
    }

    /// Zeroes one row and re-applies the defaults that fall in it.
    pub(crate) fn reset_entry(&mut self, id: TableId, index: u32) {
        if let Some(entry) = self.entry_mut(id, index) {
            entry.fill(0);
            self.apply_defaults(Some((id, index)));
        }
    }

    /// Writes every default value to every word of its field. When `only`
    /// is set, just that row is touched.
    fn apply_defaults(&mut self, only: Option<(TableId, u32)>) {
        for (field, value) in self.directory().defaults() {
            let Some(table) = self.table(field.table).cloned() else {
                continue;
            };
            let rows = match only {
                Some((id, index)) if id == field.table => index..index + 1,
                Some(_) => continue,
                None => 0..table.rows,
            };
            for row in rows {
                let base = table.span(row, 1).start;
                for word in 0..field.words {
                    let at = base + field.word_offset(word);
                    field
                        .width
                        .encode(*value, &mut self.data[at..at + field.width.bytes()]);
                }
            }
        }
    }
}
