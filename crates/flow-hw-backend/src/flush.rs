//! Flush operations table.
//!
//! A flush hands a read-only view of a cached table and a resolved row
//! range to a transport callback. Callbacks are registered per table; the
//! backend never interprets the bytes it hands over.

use crate::cache::{read_word, ModuleCache};
use crate::directory::{FieldEntry, TableDesc};
use crate::error::{BackendError, BackendResult, Dimension, TransportError};
use crate::layout::TableImage;
use crate::revision::ModuleRevision;
use flow_hw_types::{FieldId, FlushRange, ModuleField, Subsystem, TableId, Version};
use log::{debug, warn};
use std::collections::HashMap;
use std::fmt;

/// Flush callback for one table.
///
/// Receives the device, the cached table and the `(start, count)` row
/// range. Must be idempotent: the same range of the same cache always
/// produces the same device state.
pub type FlushFn<D> =
    Box<dyn Fn(&D, &TableView<'_>, u32, u32) -> Result<(), TransportError> + Send + Sync>;

/// Single generic writer for every table of a device.
pub trait FlushTransport {
    fn flush_table(&self, view: &TableView<'_>, start: u32, count: u32)
        -> Result<(), TransportError>;
}

/// Read-only view of one cached table, handed to flush callbacks.
#[derive(Clone, Copy)]
pub struct TableView<'a> {
    revision: ModuleRevision,
    desc: &'static TableDesc,
    image: &'a TableImage,
    data: &'a [u8],
}

impl<'a> TableView<'a> {
    pub(crate) fn new(cache: &'a ModuleCache, table: TableId) -> BackendResult<Self> {
        let image = cache.layout().table(table).ok_or(BackendError::NotPresent {
            subsystem: table.subsystem(),
        })?;
        let desc = cache
            .layout()
            .table_desc(table)
            .ok_or(BackendError::NotPresent {
                subsystem: table.subsystem(),
            })?;
        let data = cache.layout().table_bytes(table).unwrap_or_default();
        Ok(Self {
            revision: cache.revision(),
            desc,
            image,
            data,
        })
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

    pub fn table(&self) -> TableId {
        self.image.id()
    }

    pub fn entry_size(&self) -> usize {
        self.image.entry_size()
    }

    pub fn rows(&self) -> u32 {
        self.image.rows()
    }

    pub fn bank_rows(&self) -> Option<u32> {
        self.image.bank_rows()
    }

    /// Static description of the table, for field-by-field serializers.
    pub fn desc(&self) -> &'static TableDesc {
        self.desc
    }

    /// Returns the image of one row.
    pub fn entry(&self, index: u32) -> Option<&'a [u8]> {
        self.entries(index, 1)
    }

    /// Returns the images of `count` rows starting at `start`.
    pub fn entries(&self, start: u32, count: u32) -> Option<&'a [u8]> {
        if u64::from(start) + u64::from(count) > u64::from(self.rows()) {
            return None;
        }
        let size = self.entry_size();
        let from = start as usize * size;
        self.data.get(from..from + count as usize * size)
    }

    /// Reads one word of a field through the revision directory. Fields of
    /// another subsystem are `UnsupportedField`.
    pub fn get<F: ModuleField>(&self, field: F, index: u32, word_off: u32) -> BackendResult<u32> {
        if F::SUBSYSTEM != self.subsystem() {
            return Err(BackendError::UnsupportedField {
                subsystem: self.subsystem(),
                field: field.id(),
                version: self.version(),
            });
        }
        self.get_raw(field.id(), index, word_off)
    }

    pub fn get_raw(&self, field: FieldId, index: u32, word_off: u32) -> BackendResult<u32> {
        let desc = match self.revision.layout().resolve(field)? {
            FieldEntry::Field(desc) if desc.table == self.table() => desc,
            _ => {
                return Err(BackendError::UnsupportedField {
                    subsystem: self.subsystem(),
                    field,
                    version: self.version(),
                })
            }
        };
        let entry = self.entry(index).ok_or_else(|| {
            BackendError::out_of_range(self.table(), Dimension::Index, index, self.rows())
        })?;
        if word_off >= desc.words {
            return Err(BackendError::out_of_range(
                self.table(),
                Dimension::WordOffset,
                word_off,
                desc.words,
            ));
        }
        Ok(read_word(&desc, entry, word_off))
    }
}

impl fmt::Debug for TableView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableView")
            .field("revision", &self.revision)
            .field("table", &self.table())
            .field("entry_size", &self.entry_size())
            .field("rows", &self.rows())
            .finish()
    }
}

/// Flush callbacks keyed by table.
pub struct FlushOps<D: ?Sized> {
    handlers: HashMap<TableId, FlushFn<D>>,
}

impl<D: ?Sized> Default for FlushOps<D> {
    fn default() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }
}

impl<D: ?Sized> FlushOps<D> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the callback for one table, replacing any previous one.
    pub fn register<F>(&mut self, table: TableId, f: F) -> &mut Self
    where
        F: Fn(&D, &TableView<'_>, u32, u32) -> Result<(), TransportError> + Send + Sync + 'static,
    {
        self.handlers.insert(table, Box::new(f));
        self
    }

    /// Registers one callback for every table of a subsystem.
    pub fn register_subsystem<F>(&mut self, subsystem: Subsystem, f: F) -> &mut Self
    where
        F: Fn(&D, &TableView<'_>, u32, u32) -> Result<(), TransportError>
            + Clone
            + Send
            + Sync
            + 'static,
    {
        for table in subsystem.tables() {
            self.register(table, f.clone());
        }
        self
    }

    /// Returns true if a callback is registered for the table.
    pub fn contains(&self, table: TableId) -> bool {
        self.handlers.contains_key(&table)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Hands `[start, start + count)` of `view` to the table's callback.
    /// The range must already be validated.
    pub(crate) fn flush(
        &self,
        device: &D,
        view: &TableView<'_>,
        start: u32,
        count: u32,
        trace: bool,
    ) -> BackendResult<()> {
        let table = view.table();
        let handler = self
            .handlers
            .get(&table)
            .ok_or(BackendError::NoFlushHandler { table })?;

        if count == 0 {
            return Ok(());
        }
        if trace {
            debug!("{}: flush [{}, +{})", table, start, count);
        }

        handler(device, view, start, count).map_err(|source| {
            warn!(
                "{}: flush of [{}, +{}) failed: {}",
                table, start, count, source
            );
            BackendError::FlushFailed {
                table,
                start,
                count,
                source,
            }
        })
    }
}

impl<D: FlushTransport + ?Sized + 'static> FlushOps<D> {
    /// Routes every table to [`FlushTransport::flush_table`].
    pub fn for_transport() -> Self {
        let mut ops = Self::new();
        for table in TableId::ALL {
            ops.register(*table, |device: &D, view: &TableView<'_>, start, count| {
                device.flush_table(view, start, count)
            });
        }
        ops
    }
}

impl<D: ?Sized> fmt::Debug for FlushOps<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tables: Vec<_> = self.handlers.keys().collect();
        tables.sort();
        f.debug_struct("FlushOps").field("tables", &tables).finish()
    }
}

/// Resolves a flush range against a table's probed dimensions.
pub(crate) fn resolve_range(image: &TableImage, range: FlushRange) -> BackendResult<(u32, u32)> {
    let table = image.id();
    let rows = image.rows();

    let bank_base = |bank: u32| -> BackendResult<(u32, u32)> {
        let (Some(bank_rows), Some(banks)) = (image.bank_rows(), image.banks()) else {
            return Err(BackendError::out_of_range(table, Dimension::Bank, bank, 0));
        };
        if bank >= banks {
            return Err(BackendError::out_of_range(table, Dimension::Bank, bank, banks));
        }
        Ok((bank * bank_rows, bank_rows))
    };

    match range {
        FlushRange::All => Ok((0, rows)),
        FlushRange::AllBank { bank } => bank_base(bank),
        FlushRange::Records {
            bank,
            record,
            count,
        } => {
            let (base, bank_rows) = bank_base(bank)?;
            let end = u64::from(record) + u64::from(count);
            if end > u64::from(bank_rows) {
                return Err(BackendError::out_of_range(table, Dimension::Index, end, bank_rows));
            }
            Ok((base + record, count))
        }
        FlushRange::Range { start, count } => {
            let end = u64::from(start) + u64::from(count);
            if end > u64::from(rows) {
                return Err(BackendError::out_of_range(table, Dimension::Index, end, rows));
            }
            Ok((start, count))
        }
    }
}
