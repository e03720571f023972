//! Diagnostic dumps of cached state.

use crate::backend::Backend;
use crate::cache::ModuleCache;
use crate::error::BackendResult;
use crate::probe::DeviceProbe;
use flow_hw_types::Subsystem;
use std::fmt;

impl fmt::Display for ModuleCache {
    /// Writes the cache header, then each table with its non-zero rows as
    /// little-endian hex words.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} ver {}: {}",
            self.subsystem(),
            self.version(),
            self.capacities()
        )?;

        let layout = self.layout();
        for table in layout.tables() {
            writeln!(
                f,
                "  {}: {} x {} bytes",
                table.id(),
                table.rows(),
                table.entry_size()
            )?;
            let Some(bytes) = layout.table_bytes(table.id()) else {
                continue;
            };
            for (index, entry) in bytes.chunks_exact(table.entry_size()).enumerate() {
                if entry.iter().all(|b| *b == 0) {
                    continue;
                }
                write!(f, "    [{:4}]", index)?;
                for word in entry.chunks_exact(4) {
                    let word = u32::from_le_bytes([word[0], word[1], word[2], word[3]]);
                    write!(f, " {:08x}", word)?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

impl<D: DeviceProbe + ?Sized> Backend<'_, D> {
    /// Returns a text dump of one subsystem's cache.
    pub fn dump(&self, subsystem: Subsystem) -> BackendResult<String> {
        Ok(self.cache(subsystem)?.to_string())
    }

    /// Returns a text dump of every allocated cache.
    pub fn dump_all(&self) -> BackendResult<String> {
        let mut out = String::new();
        for subsystem in self.subsystems() {
            out.push_str(&self.cache(subsystem)?.to_string());
        }
        Ok(out)
    }
}
