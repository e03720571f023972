//! Duplicate detection over cached entries.
//!
//! Resource managers use these to share one hardware row between several
//! logical rules. Equality is bit-exact over the whole entry image,
//! padding bytes included.

use crate::cache::ModuleCache;
use crate::error::{BackendError, BackendResult, Dimension};
use flow_hw_types::TableId;

impl ModuleCache {
    /// Returns the first row in `[start, start + count)`, other than
    /// `candidate`, whose image is identical to the candidate's.
    pub fn find_equal(
        &self,
        table: TableId,
        candidate: u32,
        start: u32,
        count: u32,
    ) -> BackendResult<Option<u32>> {
        let needle = self.entry(table, candidate)?;
        let rows = self.rows(table)?;
        let end = u64::from(start) + u64::from(count);
        let region = self
            .layout()
            .rows_bytes(table, start, count)
            .ok_or_else(|| BackendError::out_of_range(table, Dimension::Index, end, rows))?;

        Ok(region
            .chunks_exact(needle.len())
            .zip(start..)
            .find(|(entry, index)| *index != candidate && *entry == needle)
            .map(|(_, index)| index))
    }

    /// Returns true if rows `a` and `b` are distinct and bit-identical.
    pub fn compare(&self, table: TableId, a: u32, b: u32) -> BackendResult<bool> {
        let lhs = self.entry(table, a)?;
        let rhs = self.entry(table, b)?;
        Ok(a != b && lhs == rhs)
    }
}
