//! Integration tests for the backend registry against a mock device.
//!
//! The mock device answers capability probes from a table and records every
//! flushed range together with the exact bytes handed to the transport.

use flow_hw_backend::{
    Backend, BackendConfig, BackendError, BackendState, Capacities, DebugMode, DeviceProbe,
    Dimension, FlushOps, FlushTransport, ModuleCache, ModuleRevision, TableView, TransportError,
    Width,
};
use flow_hw_types::{
    Capability, CatField, FlushRange, KmField, ModuleField, QslField, Subsystem, TableId, TpeField,
    Version, ALL_BANK_ENTRIES, ALL_ENTRIES,
};
use pretty_assertions::assert_eq;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// One range handed to the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlushRecord {
    pub table: TableId,
    pub start: u32,
    pub count: u32,
    pub payload: Vec<u8>,
}

/// Mock flow NIC.
///
/// Every subsystem is present at its compiled-in revision unless the test
/// overrides it.
pub struct MockDevice {
    absent: Vec<Subsystem>,
    versions: HashMap<Subsystem, Version>,
    caps: HashMap<Capability, u32>,
    flushes: Arc<Mutex<Vec<FlushRecord>>>,
    failing: Mutex<Option<TableId>>,
    debug_modes: Mutex<Vec<DebugMode>>,
}

impl MockDevice {
    pub fn new() -> Self {
        let versions = [
            (Subsystem::Cat, Version::new(18, 0)),
            (Subsystem::Km, Version::new(7, 0)),
            (Subsystem::Flm, Version::new(25, 0)),
            (Subsystem::Hsh, Version::new(5, 0)),
            (Subsystem::Qsl, Version::new(7, 0)),
            (Subsystem::SlcLr, Version::new(2, 0)),
            (Subsystem::Pdb, Version::new(9, 0)),
            (Subsystem::Tpe, Version::new(3, 0)),
        ];
        let caps = [
            (Capability::PhyPorts, 2),
            (Capability::RxPorts, 2),
            (Capability::Categories, 4),
            (Capability::Queues, 128),
            (Capability::CatFuncs, 64),
            (Capability::FlowTypes, 2),
            (Capability::PmExt, 2),
            (Capability::Len, 2),
            (Capability::KccSize, 4),
            (Capability::KccBanks, 1),
            (Capability::KmIfCount, 2),
            (Capability::KmCategories, 4),
            (Capability::KmCamBanks, 2),
            (Capability::KmCamRecordWords, 6),
            (Capability::KmCamRecords, 8),
            (Capability::KmTcamBanks, 1),
            (Capability::KmTcamBankWidth, 4),
            (Capability::FlmCategories, 4),
            (Capability::FlmSizeMb, 1),
            (Capability::FlmEntrySize, 64),
            (Capability::FlmVariant, 2),
            (Capability::FlmPrios, 4),
            (Capability::FlmPstProfiles, 2),
            (Capability::FlmScrubProfiles, 2),
            (Capability::FlmLoadApsMax, 1),
            (Capability::FlmRppClockPs, 3333),
            (Capability::HshCategories, 4),
            (Capability::HshToeplitz, 1),
            (Capability::QslCategories, 4),
            (Capability::QslQstEntries, 8),
            (Capability::PdbCategories, 4),
            (Capability::TpeCategories, 4),
            (Capability::TpeIfrCategories, 2),
            (Capability::TxCpyWriters, 2),
            (Capability::TxRplDepth, 8),
            (Capability::TxRplExtCategories, 2),
        ];

        Self {
            absent: Vec::new(),
            versions: versions.into_iter().collect(),
            caps: caps.into_iter().collect(),
            flushes: Arc::new(Mutex::new(Vec::new())),
            failing: Mutex::new(None),
            debug_modes: Mutex::new(Vec::new()),
        }
    }

    pub fn without(mut self, subsystem: Subsystem) -> Self {
        self.absent.push(subsystem);
        self
    }

    pub fn with_version(mut self, subsystem: Subsystem, version: Version) -> Self {
        self.versions.insert(subsystem, version);
        self
    }

    pub fn with_capacity(mut self, capability: Capability, count: u32) -> Self {
        self.caps.insert(capability, count);
        self
    }

    pub fn without_capacity(mut self, capability: Capability) -> Self {
        self.caps.remove(&capability);
        self
    }

    /// Makes every flush of `table` fail until cleared.
    pub fn fail_table(&self, table: Option<TableId>) {
        *self.failing.lock().unwrap() = table;
    }

    pub fn flushes(&self) -> Vec<FlushRecord> {
        self.flushes.lock().unwrap().clone()
    }

    /// Capacities as the backend would probe them, for building bare caches.
    pub fn capacities(&self) -> Capacities {
        self.caps.iter().map(|(c, n)| (*c, *n)).collect()
    }
}

impl DeviceProbe for MockDevice {
    fn is_present(&self, subsystem: Subsystem) -> bool {
        !self.absent.contains(&subsystem)
    }

    fn version(&self, subsystem: Subsystem) -> Version {
        self.versions
            .get(&subsystem)
            .copied()
            .unwrap_or(Version::new(0, 0))
    }

    fn capacity(&self, capability: Capability) -> Option<u32> {
        self.caps.get(&capability).copied()
    }

    fn set_debug_mode(&self, mode: DebugMode) -> Result<(), TransportError> {
        self.debug_modes.lock().unwrap().push(mode);
        Ok(())
    }
}

impl FlushTransport for MockDevice {
    fn flush_table(
        &self,
        view: &TableView<'_>,
        start: u32,
        count: u32,
    ) -> Result<(), TransportError> {
        if *self.failing.lock().unwrap() == Some(view.table()) {
            return Err(TransportError::with_status("mailbox timeout", -110));
        }
        let payload = view
            .entries(start, count)
            .ok_or_else(|| TransportError::new("range outside table"))?
            .to_vec();
        self.flushes.lock().unwrap().push(FlushRecord {
            table: view.table(),
            start,
            count,
            payload,
        });
        Ok(())
    }
}

fn ready(device: &MockDevice) -> Backend<'_, MockDevice> {
    init_logging();
    Backend::init(device, FlushOps::for_transport(), BackendConfig::default()).unwrap()
}

#[test]
fn test_four_category_scenario() {
    let device = MockDevice::new();
    let mut backend = ready(&device);
    assert_eq!(backend.cache(Subsystem::Cat).unwrap().rows(TableId::CatCot).unwrap(), 4);

    backend.set(CatField::CotColor, 2, 0, 0xabcd).unwrap();
    assert_eq!(backend.get(CatField::CotColor, 2, 0).unwrap(), 0xabcd);
    assert_eq!(backend.get(CatField::CotColor, 1, 0).unwrap(), 0);

    let err = backend.set(CatField::CotColor, 4, 0, 0xabcd).unwrap_err();
    assert!(matches!(
        err,
        BackendError::IndexOutOfRange {
            table: TableId::CatCot,
            dimension: Dimension::Index,
            value: 4,
            limit: 4,
        }
    ));
    assert!(backend.get(CatField::CotColor, 4, 0).is_err());
    assert!(backend.get(CatField::CotColor, 2, 1).is_err());
}

fn program_qst(backend: &mut Backend<'_, MockDevice>, index: u32) {
    backend.set(QslField::QstQueue, index, 0, 17).unwrap();
    backend.set(QslField::QstEn, index, 0, 1).unwrap();
    backend.set(QslField::QstTxPort, index, 0, 1).unwrap();
    backend.set(QslField::QstTci, index, 0, 0x123).unwrap();
}

#[test]
fn test_padding_bit_scenario() {
    let device = MockDevice::new();
    let mut backend = ready(&device);

    program_qst(&mut backend, 3);
    program_qst(&mut backend, 6);

    assert!(backend.compare(TableId::QslQst, 3, 6).unwrap());
    assert_eq!(backend.find_equal(TableId::QslQst, 6, 0, 8).unwrap(), Some(3));
    assert_eq!(backend.find_equal(TableId::QslQst, 3, 0, 8).unwrap(), Some(6));

    // Set bit 0 in every padding byte of row 6, then restore every field.
    backend.set(QslField::QstPresetAll, 6, 0, 0x01).unwrap();
    for field in [QslField::QstLre, QslField::QstVen] {
        backend.set(field, 6, 0, 0).unwrap();
    }
    program_qst(&mut backend, 6);

    for field in [
        QslField::QstQueue,
        QslField::QstEn,
        QslField::QstTxPort,
        QslField::QstLre,
        QslField::QstTci,
        QslField::QstVen,
    ] {
        assert_eq!(
            backend.get(field, 3, 0).unwrap(),
            backend.get(field, 6, 0).unwrap(),
            "{}",
            field
        );
    }
    assert!(!backend.compare(TableId::QslQst, 3, 6).unwrap());
    assert_eq!(backend.find_equal(TableId::QslQst, 6, 0, 8).unwrap(), None);
}

#[test]
fn test_round_trip_every_field() {
    let device = MockDevice::new();
    let caps = device.capacities();

    for revision in ModuleRevision::ALL {
        let mut cache = ModuleCache::new(revision, caps.clone()).unwrap();
        for table in revision.layout().tables() {
            let rows = cache.rows(table.id).unwrap();
            assert!(rows > 0, "{} has no rows", table.id);
            let index = rows - 1;

            for field in table.fields() {
                let values: Vec<u32> = if field.width.is_signed() {
                    let bits = field.width.bits();
                    let min = (-(1i64 << (bits - 1))) as i32;
                    let max = ((1i64 << (bits - 1)) - 1) as i32;
                    [min, -1, 0, 1, max].iter().map(|v| *v as u32).collect()
                } else {
                    let max = u32::MAX >> (32 - field.width.bits());
                    vec![0, 1, max / 2, max]
                };

                for word in 0..field.words {
                    for value in &values {
                        cache.set(field.id, index, word, *value).unwrap();
                        assert_eq!(
                            cache.get(field.id, index, word).unwrap(),
                            *value,
                            "{} {} word {}",
                            revision,
                            field.name,
                            word
                        );
                    }
                }
                assert!(cache.set(field.id, rows, 0, 0).is_err());
                assert!(cache.get(field.id, index, field.words).is_err());
            }
        }
    }
}

#[test]
fn test_write_isolation() {
    let device = MockDevice::new();
    let mut cache = ModuleCache::new(ModuleRevision::KmV7, device.capacities()).unwrap();

    let before = cache.layout().as_bytes().to_vec();
    cache.set(KmField::RcpMaskA.id(), 1, 5, 0xffff_ffff).unwrap();
    let after = cache.layout().as_bytes().to_vec();

    let rcp = cache.layout().table(TableId::KmRcp).unwrap();
    let desc = match cache.directory().resolve(KmField::RcpMaskA.id()).unwrap() {
        flow_hw_backend::FieldEntry::Field(desc) => desc,
        other => panic!("unexpected {:?}", other),
    };
    assert_eq!(desc.width, Width::U32);
    // KM RCP is the first table, so its image starts at offset zero.
    let at = rcp.entry_size() + desc.word_offset(5);

    let changed: Vec<usize> = before
        .iter()
        .zip(&after)
        .enumerate()
        .filter(|(_, (a, b))| a != b)
        .map(|(i, _)| i)
        .collect();
    assert_eq!(changed, (at..at + 4).collect::<Vec<_>>());
}

#[test]
fn test_flush_payload_is_idempotent() {
    let device = MockDevice::new();
    let mut backend = ready(&device);

    backend.set(TpeField::RplRplValue, 5, 3, 0x0102_0304).unwrap();
    backend.flush(TableId::TpeRplRpl, FlushRange::range(4, 2)).unwrap();
    backend.flush(TableId::TpeRplRpl, FlushRange::range(4, 2)).unwrap();

    let flushes = device.flushes();
    assert_eq!(flushes.len(), 2);
    assert_eq!(flushes[0], flushes[1]);
    assert_eq!(flushes[0].payload.len(), 2 * 16);
    assert_eq!(&flushes[0].payload[28..32], &[0x04, 0x03, 0x02, 0x01]);
}

#[test]
fn test_flush_sentinel_ranges() {
    let device = MockDevice::new();
    let backend = ready(&device);

    backend
        .flush(TableId::KmCam, FlushRange::from_raw(1, ALL_BANK_ENTRIES).unwrap())
        .unwrap();
    backend
        .flush(TableId::KmCam, FlushRange::from_raw(0, ALL_ENTRIES).unwrap())
        .unwrap();
    backend
        .flush(
            TableId::KmCam,
            FlushRange::Records {
                bank: 1,
                record: 2,
                count: 3,
            },
        )
        .unwrap();

    let ranges: Vec<(u32, u32)> = device.flushes().iter().map(|f| (f.start, f.count)).collect();
    assert_eq!(ranges, vec![(8, 8), (0, 16), (10, 3)]);
}

#[test]
fn test_flush_range_errors_skip_transport() {
    let device = MockDevice::new();
    let backend = ready(&device);

    assert!(matches!(
        backend.flush(TableId::CatCot, FlushRange::range(3, 2)),
        Err(BackendError::IndexOutOfRange { .. })
    ));
    assert!(matches!(
        backend.flush(TableId::KmCam, FlushRange::AllBank { bank: 2 }),
        Err(BackendError::IndexOutOfRange {
            dimension: Dimension::Bank,
            ..
        })
    ));
    backend.flush(TableId::CatCot, FlushRange::range(4, 0)).unwrap();
    assert!(device.flushes().is_empty());
}

#[test]
fn test_flush_failure_reports_range() {
    let device = MockDevice::new();
    let backend = ready(&device);

    device.fail_table(Some(TableId::HshRcp));
    let err = backend
        .flush(TableId::HshRcp, FlushRange::range(1, 2))
        .unwrap_err();
    assert!(err.is_retryable());
    assert!(matches!(
        err,
        BackendError::FlushFailed {
            table: TableId::HshRcp,
            start: 1,
            count: 2,
            ..
        }
    ));
    assert!(device.flushes().is_empty());

    device.fail_table(None);
    backend.flush(TableId::HshRcp, FlushRange::range(1, 2)).unwrap();
    assert_eq!(device.flushes().len(), 1);
}

#[test]
fn test_flush_module_covers_every_table() {
    let device = MockDevice::new();
    let backend = ready(&device);

    backend.flush_module(Subsystem::Flm).unwrap();
    let tables: Vec<TableId> = device.flushes().iter().map(|f| f.table).collect();
    let expected: Vec<TableId> = Subsystem::Flm.tables().collect();
    assert_eq!(tables, expected);

    // The FLM control defaults reach the transport.
    let control = &device.flushes()[0];
    assert_eq!(&control.payload[60..64], &[0x10, 0, 0, 0]);
}

#[test]
fn test_missing_flush_handler() {
    let device = MockDevice::new();
    let mut ops: FlushOps<MockDevice> = FlushOps::new();
    ops.register(TableId::CatCfn, |dev: &MockDevice, view: &TableView<'_>, s, c| {
        dev.flush_table(view, s, c)
    });
    let backend = Backend::init(&device, ops, BackendConfig::default()).unwrap();

    backend.flush(TableId::CatCfn, FlushRange::All).unwrap();
    assert!(matches!(
        backend.flush(TableId::CatKce, FlushRange::All),
        Err(BackendError::NoFlushHandler {
            table: TableId::CatKce
        })
    ));
}

#[test]
fn test_unsupported_version_fails_attach() {
    init_logging();
    let device = MockDevice::new().with_version(Subsystem::Cat, Version::new(20, 0));
    let err = Backend::init(&device, FlushOps::for_transport(), BackendConfig::default())
        .unwrap_err();
    assert!(matches!(
        err,
        BackendError::UnsupportedVersion {
            subsystem: Subsystem::Cat,
            ..
        }
    ));
    assert_eq!(err.code(), flow_hw_backend::error::UNSUP_VER);
}

#[test]
fn test_cat_v21_selected() {
    let device = MockDevice::new().with_version(Subsystem::Cat, Version::new(21, 0));
    let mut backend = ready(&device);
    assert_eq!(backend.revision(Subsystem::Cat), Some(ModuleRevision::CatV21));

    backend.set(CatField::KceEnableBm, 0, 1, 0x5).unwrap();
    backend.set(CatField::CfnErrTtlExp, 3, 0, 1).unwrap();
    assert_eq!(backend.get(CatField::KceEnableBm, 0, 1).unwrap(), 0x5);
}

#[test]
fn test_missing_subsystem() {
    init_logging();
    let device = MockDevice::new().without(Subsystem::Flm);
    let err = Backend::init(&device, FlushOps::for_transport(), BackendConfig::default())
        .unwrap_err();
    assert!(matches!(
        err,
        BackendError::NotPresent {
            subsystem: Subsystem::Flm
        }
    ));

    let config = BackendConfig {
        required_modules: vec![Subsystem::Cat, Subsystem::Km, Subsystem::Qsl],
        ..Default::default()
    };
    let backend = Backend::init(&device, FlushOps::for_transport(), config).unwrap();
    assert_eq!(backend.revision(Subsystem::Flm), None);
    assert!(matches!(
        backend.flush_module(Subsystem::Flm),
        Err(BackendError::NotPresent { .. })
    ));
    assert_eq!(backend.subsystems().count(), 7);
}

#[test]
fn test_insufficient_resource() {
    init_logging();
    for device in [
        MockDevice::new().with_capacity(Capability::KmCategories, 0),
        MockDevice::new().without_capacity(Capability::KmCategories),
    ] {
        let mut backend =
            Backend::new(&device, FlushOps::for_transport(), BackendConfig::default());
        let err = backend.attach().unwrap_err();
        assert!(matches!(
            err,
            BackendError::InsufficientResource {
                resource: Capability::KmCategories,
                ..
            }
        ));
        assert_eq!(backend.state(), BackendState::Uninitialized);
    }
}

#[test]
fn test_oversized_capacities_fail_alloc() {
    init_logging();
    let device = MockDevice::new()
        .with_capacity(Capability::KmCamBanks, 0x10000)
        .with_capacity(Capability::KmCamRecords, 0x10000);
    let mut backend = Backend::new(&device, FlushOps::for_transport(), BackendConfig::default());
    backend.attach().unwrap();

    let err = backend.alloc().unwrap_err();
    assert!(matches!(
        err,
        BackendError::CapacityOverflow {
            table: TableId::KmCam
        }
    ));
    assert_eq!(err.code(), flow_hw_backend::error::COUNT_ERROR);
    assert_eq!(backend.state(), BackendState::Attached);
    assert!(backend.cache(Subsystem::Cat).is_err());

    assert!(Backend::init(&device, FlushOps::for_transport(), BackendConfig::default()).is_err());
}

#[test]
fn test_released_backend_fails_fast() {
    let device = MockDevice::new();
    let mut backend = ready(&device);
    backend.free();

    assert!(matches!(
        backend.set(CatField::CfnEnable, 0, 0, 1),
        Err(BackendError::Released)
    ));
    assert!(matches!(
        backend.flush(TableId::CatCfn, FlushRange::All),
        Err(BackendError::Released)
    ));
    assert!(matches!(
        backend.find_equal(TableId::QslRcp, 0, 0, 1),
        Err(BackendError::Released)
    ));
    assert!(matches!(backend.attach(), Err(BackendError::Released)));
    assert!(device.flushes().is_empty());
}

#[test]
fn test_reset_restores_defaults_without_io() {
    let device = MockDevice::new();
    let mut backend = ready(&device);

    backend.set(KmField::CamW3, 9, 0, 0x77).unwrap();
    backend.set(KmField::TcamBankReset, 0, 0, 0xff).unwrap();
    backend.reset().unwrap();

    assert_eq!(backend.get(KmField::CamW3, 9, 0).unwrap(), 0);
    assert_eq!(backend.get(KmField::TcamT, 0, 0).unwrap(), 0);
    assert!(device.flushes().is_empty());
    assert_eq!(backend.state(), BackendState::Ready);
}

#[test]
fn test_debug_mode_and_dump() {
    init_logging();
    let device = MockDevice::new();
    let config = BackendConfig::from_toml_str("debug_mode = \"write\"").unwrap();
    let mut backend = Backend::init(&device, FlushOps::for_transport(), config).unwrap();
    assert_eq!(*device.debug_modes.lock().unwrap(), vec![DebugMode::Write]);

    backend.set(CatField::CotColor, 1, 0, 0xc0ffee).unwrap();
    backend.flush(TableId::CatCot, FlushRange::single(1)).unwrap();

    let dump = backend.dump(Subsystem::Cat).unwrap();
    assert!(dump.starts_with("CAT ver 18.0: "));
    assert!(dump.contains("  CAT COT: 4 x 8 bytes\n    [   1] 00c0ffee 00000000\n"));

    let all = backend.dump_all().unwrap();
    for subsystem in Subsystem::ALL {
        assert!(all.contains(&format!("{} ver ", subsystem)), "{}", subsystem);
    }
}

#[test]
fn test_nic_attributes() {
    let device = MockDevice::new();
    let backend = ready(&device);
    assert_eq!(backend.nic().num_phy_ports, 2);
    assert_eq!(backend.nic().max_queues, 128);
    assert!(backend.require(Capability::Queues, 128).is_ok());
    assert!(backend.require(Capability::KmCamRecords, 9).is_err());
}
