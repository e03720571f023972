//! Module cache: uniform field accessors over one revision-tagged layout.
//!
//! Every accessor is a pure memory operation. Nothing here touches the
//! device; programmed values reach hardware only through an explicit flush.

use crate::config::DebugMode;
use crate::directory::{FieldDesc, FieldEntry, FunctionOp, RevisionLayout};
use crate::error::{BackendError, BackendResult, Dimension};
use crate::layout::{ModuleLayout, TableImage};
use crate::probe::Capacities;
use crate::revision::ModuleRevision;
use flow_hw_types::{FieldId, Subsystem, TableId, Version, NOT_FOUND};
use log::debug;

/// Reads one word of a field from an entry image.
pub(crate) fn read_word(desc: &FieldDesc, entry: &[u8], word: u32) -> u32 {
    let at = desc.word_offset(word);
    desc.width.decode(&entry[at..at + desc.width.bytes()])
}

fn check_word(desc: &FieldDesc, word_off: u32) -> BackendResult<()> {
    if word_off >= desc.words {
        return Err(BackendError::out_of_range(
            desc.table,
            Dimension::WordOffset,
            word_off,
            desc.words,
        ));
    }
    Ok(())
}

/// Cache of one subsystem: the active layout plus its probed metadata.
#[derive(Debug, Clone)]
pub struct ModuleCache {
    layout: ModuleLayout,
    caps: Capacities,
    debug_mode: DebugMode,
}

impl ModuleCache {
    /// Allocates a cache for `revision`, sized from `caps`.
    pub fn new(revision: ModuleRevision, caps: Capacities) -> BackendResult<Self> {
        Ok(Self {
            layout: ModuleLayout::allocate(revision, &caps)?,
            caps,
            debug_mode: DebugMode::None,
        })
    }

    pub fn revision(&self) -> ModuleRevision {
        self.layout.revision()
    }

    pub fn subsystem(&self) -> Subsystem {
        self.revision().subsystem()
    }

    pub fn version(&self) -> Version {
        self.revision().version()
    }

    /// Capacities this cache was sized from.
    pub fn capacities(&self) -> &Capacities {
        &self.caps
    }

    pub fn layout(&self) -> &ModuleLayout {
        &self.layout
    }

    pub fn directory(&self) -> &'static RevisionLayout {
        self.revision().layout()
    }

    pub fn debug_mode(&self) -> DebugMode {
        self.debug_mode
    }

    pub(crate) fn set_debug_mode(&mut self, mode: DebugMode) {
        self.debug_mode = mode;
    }

    pub(crate) fn table(&self, table: TableId) -> BackendResult<&TableImage> {
        self.layout.table(table).ok_or(BackendError::NotPresent {
            subsystem: table.subsystem(),
        })
    }

    /// Returns the number of rows of a table.
    pub fn rows(&self, table: TableId) -> BackendResult<u32> {
        Ok(self.table(table)?.rows())
    }

    pub(crate) fn check_index(&self, table: TableId, index: u32) -> BackendResult<()> {
        let rows = self.rows(table)?;
        if index >= rows {
            return Err(BackendError::out_of_range(table, Dimension::Index, index, rows));
        }
        Ok(())
    }

    /// Returns the raw image of one row.
    pub fn entry(&self, table: TableId, index: u32) -> BackendResult<&[u8]> {
        self.check_index(table, index)?;
        self.layout
            .entry(table, index)
            .ok_or_else(|| BackendError::out_of_range(table, Dimension::Index, index, 0))
    }

    fn entry_mut(&mut self, table: TableId, index: u32) -> BackendResult<&mut [u8]> {
        self.check_index(table, index)?;
        self.layout
            .entry_mut(table, index)
            .ok_or_else(|| BackendError::out_of_range(table, Dimension::Index, index, 0))
    }

    fn unsupported(&self, field: FieldId) -> BackendError {
        BackendError::UnsupportedField {
            subsystem: self.subsystem(),
            field,
            version: self.version(),
        }
    }

    /// Reads one word of a field, or runs a query selector.
    ///
    /// For `Compare` selectors `index` and `word_off` are the two rows and
    /// the result is 1 when they are bit-identical. For `Find` selectors
    /// `index` is the candidate and `word_off` the first row searched; the
    /// result is the matching row or [`NOT_FOUND`].
    pub fn get(&self, field: FieldId, index: u32, word_off: u32) -> BackendResult<u32> {
        match self.directory().resolve(field)? {
            FieldEntry::Field(desc) => {
                let entry = self.entry(desc.table, index)?;
                check_word(&desc, word_off)?;
                Ok(read_word(&desc, entry, word_off))
            }
            FieldEntry::Function {
                table,
                op: FunctionOp::Compare,
            } => Ok(u32::from(self.compare(table, index, word_off)?)),
            FieldEntry::Function {
                table,
                op: FunctionOp::Find,
            } => {
                let rows = self.rows(table)?;
                if word_off >= rows {
                    return Err(BackendError::out_of_range(
                        table,
                        Dimension::Index,
                        word_off,
                        rows,
                    ));
                }
                Ok(self
                    .find_equal(table, index, word_off, rows - word_off)?
                    .unwrap_or(NOT_FOUND))
            }
            FieldEntry::Function { .. } => Err(self.unsupported(field)),
        }
    }

    /// Writes one word of a field, or runs a bulk selector.
    ///
    /// Values wider than the field are truncated. Selectors interpret
    /// `value` as the fill byte (`PresetAll`, `BankReset`) or the source
    /// row (`CopyFrom`); for `BankReset`, `index` is the bank number.
    pub fn set(
        &mut self,
        field: FieldId,
        index: u32,
        word_off: u32,
        value: u32,
    ) -> BackendResult<()> {
        match self.directory().resolve(field)? {
            FieldEntry::Field(desc) => {
                self.check_index(desc.table, index)?;
                check_word(&desc, word_off)?;
                let at = desc.word_offset(word_off);
                let entry = self.entry_mut(desc.table, index)?;
                desc.width.encode(value, &mut entry[at..at + desc.width.bytes()]);

                if self.debug_mode == DebugMode::Write {
                    debug!(
                        "{}[{}].{}[{}] = {:#x}",
                        desc.table, index, desc.name, word_off, value
                    );
                }
            }
            FieldEntry::Function { table, op } => {
                match op {
                    FunctionOp::SetAllDefaults => {
                        self.check_index(table, index)?;
                        self.layout.reset_entry(table, index);
                    }
                    FunctionOp::PresetAll => {
                        self.entry_mut(table, index)?.fill(value as u8);
                    }
                    FunctionOp::CopyFrom => {
                        self.check_index(table, index)?;
                        let src = self.entry(table, value)?.to_vec();
                        self.entry_mut(table, index)?.copy_from_slice(&src);
                    }
                    FunctionOp::BankReset => self.fill_bank(table, index, value as u8)?,
                    FunctionOp::Compare | FunctionOp::Find => {
                        return Err(self.unsupported(field));
                    }
                }

                if self.debug_mode == DebugMode::Write {
                    debug!("{}[{}] {:?} {:#x}", table, index, op, value);
                }
            }
        }
        Ok(())
    }

    fn fill_bank(&mut self, table: TableId, bank: u32, byte: u8) -> BackendResult<()> {
        let image = self.table(table)?;
        let (Some(bank_rows), Some(banks)) = (image.bank_rows(), image.banks()) else {
            return Err(BackendError::out_of_range(table, Dimension::Bank, bank, 0));
        };
        if bank >= banks {
            return Err(BackendError::out_of_range(table, Dimension::Bank, bank, banks));
        }
        if let Some(rows) = self.layout.rows_bytes_mut(table, bank * bank_rows, bank_rows) {
            rows.fill(byte);
        }
        Ok(())
    }

    /// Re-zeroes the whole cache and re-applies the revision defaults.
    pub fn reset(&mut self) {
        self.layout.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flow_hw_types::{Capability, CatField, FlmField, KmField, ModuleField, QslField};
    use pretty_assertions::assert_eq;

    fn cat_cache() -> ModuleCache {
        let caps = [
            (Capability::CatFuncs, 4),
            (Capability::FlowTypes, 2),
            (Capability::PmExt, 2),
            (Capability::Len, 2),
            (Capability::KccSize, 4),
            (Capability::Categories, 4),
        ]
        .into_iter()
        .collect();
        ModuleCache::new(ModuleRevision::CatV18, caps).unwrap()
    }

    fn km_cache() -> ModuleCache {
        let caps = [
            (Capability::KmCategories, 4),
            (Capability::KmCamBanks, 2),
            (Capability::KmCamRecords, 4),
            (Capability::KmTcamBanks, 2),
            (Capability::KmTcamBankWidth, 4),
        ]
        .into_iter()
        .collect();
        ModuleCache::new(ModuleRevision::KmV7, caps).unwrap()
    }

    #[test]
    fn test_set_get_unsigned() {
        let mut cache = cat_cache();
        cache.set(CatField::CfnEnable.id(), 2, 0, 1).unwrap();
        cache.set(CatField::CfnPmCmp.id(), 2, 1, 0xdead_beef).unwrap();
        assert_eq!(cache.get(CatField::CfnEnable.id(), 2, 0).unwrap(), 1);
        assert_eq!(cache.get(CatField::CfnPmCmp.id(), 2, 1).unwrap(), 0xdead_beef);
        assert_eq!(cache.get(CatField::CfnPmCmp.id(), 2, 0).unwrap(), 0);
        assert_eq!(cache.get(CatField::CfnEnable.id(), 1, 0).unwrap(), 0);
    }

    #[test]
    fn test_narrow_field_truncates() {
        let mut cache = cat_cache();
        cache.set(CatField::CotKm.id(), 0, 0, 0x1_23).unwrap();
        assert_eq!(cache.get(CatField::CotKm.id(), 0, 0).unwrap(), 0x23);
    }

    #[test]
    fn test_signed_field_sign_extends() {
        let mut cache = km_cache();
        let minus_two = (-2i32) as u32;
        cache.set(KmField::RcpQw0Ofs.id(), 3, 0, minus_two).unwrap();
        assert_eq!(cache.get(KmField::RcpQw0Ofs.id(), 3, 0).unwrap() as i32, -2);
    }

    #[test]
    fn test_index_and_word_range() {
        let mut cache = cat_cache();
        let err = cache.set(CatField::CfnEnable.id(), 4, 0, 1).unwrap_err();
        assert_eq!(err.code(), crate::error::INDEX_TOO_LARGE);

        let err = cache.get(CatField::CfnPmCmp.id(), 0, 2).unwrap_err();
        assert_eq!(err.code(), crate::error::WORD_OFF_TOO_LARGE);

        // Nothing was written by the failed calls.
        assert!(cache.layout().as_bytes().iter().all(|b| *b == 0));
    }

    #[test]
    fn test_unsupported_field() {
        let cache = cat_cache();
        let err = cache.get(CatField::CfnErrTtlExp.id(), 0, 0).unwrap_err();
        assert!(matches!(err, BackendError::UnsupportedField { .. }));
        assert_eq!(err.code(), crate::error::UNSUP_FIELD);
    }

    #[test]
    fn test_selector_direction() {
        let mut cache = cat_cache();
        assert!(matches!(
            cache.get(CatField::CfnPresetAll.id(), 0, 0),
            Err(BackendError::UnsupportedField { .. })
        ));
        assert!(matches!(
            cache.set(CatField::CfnFind.id(), 0, 0, 0),
            Err(BackendError::UnsupportedField { .. })
        ));
    }

    #[test]
    fn test_preset_copy_and_defaults() {
        let mut cache = cat_cache();
        cache.set(CatField::CfnPresetAll.id(), 1, 0, 0x1ff).unwrap();
        assert_eq!(cache.get(CatField::CfnEnable.id(), 1, 0).unwrap(), 0xffff_ffff);

        cache.set(CatField::CfnCopyFrom.id(), 3, 0, 1).unwrap();
        assert_eq!(
            cache.entry(TableId::CatCfn, 3).unwrap(),
            cache.entry(TableId::CatCfn, 1).unwrap()
        );

        cache.set(CatField::CfnSetAllDefaults.id(), 1, 0, 0).unwrap();
        assert!(cache.entry(TableId::CatCfn, 1).unwrap().iter().all(|b| *b == 0));

        assert!(cache.set(CatField::CfnCopyFrom.id(), 0, 0, 4).is_err());
    }

    #[test]
    fn test_compare_and_find_selectors() {
        let mut cache = cat_cache();
        for index in [0, 2] {
            cache.set(CatField::CotColor.id(), index, 0, 7).unwrap();
        }
        assert_eq!(cache.get(CatField::CotCompare.id(), 0, 2).unwrap(), 1);
        assert_eq!(cache.get(CatField::CotCompare.id(), 0, 1).unwrap(), 0);
        assert_eq!(cache.get(CatField::CotCompare.id(), 0, 0).unwrap(), 0);
        assert_eq!(cache.get(CatField::CotFind.id(), 2, 0).unwrap(), 0);
        assert_eq!(cache.get(CatField::CotFind.id(), 2, 1).unwrap(), NOT_FOUND);
        assert!(cache.get(CatField::CotFind.id(), 2, 4).is_err());
    }

    #[test]
    fn test_tcam_bank_reset() {
        let mut cache = km_cache();
        cache.set(KmField::TcamBankReset.id(), 1, 0, 0xff).unwrap();
        assert_eq!(cache.get(KmField::TcamT.id(), 1023, 2).unwrap(), 0);
        assert_eq!(cache.get(KmField::TcamT.id(), 1024, 0).unwrap(), 0xffff_ffff);
        assert_eq!(cache.get(KmField::TcamT.id(), 2047, 2).unwrap(), 0xffff_ffff);

        let err = cache.set(KmField::TcamBankReset.id(), 2, 0, 0).unwrap_err();
        assert!(matches!(
            err,
            BackendError::IndexOutOfRange {
                dimension: Dimension::Bank,
                ..
            }
        ));
    }

    #[test]
    fn test_function_defaults_per_row() {
        let caps = [(Capability::FlmCategories, 1)].into_iter().collect();
        let mut cache = ModuleCache::new(ModuleRevision::FlmV25, caps).unwrap();
        assert_eq!(cache.get(FlmField::ControlSplitSdramUsage.id(), 0, 0).unwrap(), 0x10);

        cache.set(FlmField::ControlPresetAll.id(), 0, 0, 0).unwrap();
        assert_eq!(cache.get(FlmField::ControlSplitSdramUsage.id(), 0, 0).unwrap(), 0);

        cache.reset();
        assert_eq!(cache.get(FlmField::ControlSplitSdramUsage.id(), 0, 0).unwrap(), 0x10);
    }

    #[test]
    fn test_wrong_subsystem_table() {
        let caps = [(Capability::QslCategories, 2)].into_iter().collect();
        let cache = ModuleCache::new(ModuleRevision::QslV7, caps).unwrap();
        assert!(cache.rows(TableId::CatCfn).is_err());
        assert_eq!(cache.get(QslField::UnmqEn.id(), 255, 0).unwrap(), 0);
    }
}
