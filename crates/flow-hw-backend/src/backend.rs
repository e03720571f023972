//! Backend registry.
//!
//! One [`Backend`] exists per attached device. It owns a module cache per
//! present subsystem, the flush operations table and the probed capacity
//! metadata, and borrows the device handle for its whole lifetime.

use crate::cache::ModuleCache;
use crate::config::{BackendConfig, DebugMode};
use crate::error::{BackendError, BackendResult};
use crate::flush::{resolve_range, FlushOps, TableView};
use crate::probe::{Capacities, DeviceProbe, NicAttributes};
use crate::revision::ModuleRevision;
use flow_hw_types::{Capability, FlushRange, ModuleField, Subsystem, TableId};
use log::{debug, error, info, warn};
use std::collections::BTreeMap;
use std::fmt;

/// Lifecycle state of a [`Backend`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendState {
    /// Created; nothing probed yet.
    Uninitialized,
    /// Capabilities probed and revisions selected; no cache allocated.
    Attached,
    /// Every cache allocated; accessors and flushes are available.
    Ready,
    /// Caches freed. Terminal.
    Released,
}

impl fmt::Display for BackendState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BackendState::Uninitialized => "uninitialized",
            BackendState::Attached => "attached",
            BackendState::Ready => "ready",
            BackendState::Released => "released",
        };
        write!(f, "{}", s)
    }
}

/// Probe result for one present subsystem.
#[derive(Debug, Clone)]
struct Probed {
    revision: ModuleRevision,
    caps: Capacities,
}

/// Module caches, flush table and capability metadata of one device.
pub struct Backend<'dev, D: DeviceProbe + ?Sized> {
    device: &'dev D,
    ops: FlushOps<D>,
    config: BackendConfig,
    state: BackendState,
    nic: NicAttributes,
    probed: BTreeMap<Subsystem, Probed>,
    caches: BTreeMap<Subsystem, ModuleCache>,
}

impl<'dev, D: DeviceProbe + ?Sized> Backend<'dev, D> {
    /// Creates an uninitialized backend for a device.
    pub fn new(device: &'dev D, ops: FlushOps<D>, config: BackendConfig) -> Self {
        Self {
            device,
            ops,
            config,
            state: BackendState::Uninitialized,
            nic: NicAttributes::default(),
            probed: BTreeMap::new(),
            caches: BTreeMap::new(),
        }
    }

    /// Creates, attaches and allocates a backend in one step.
    pub fn init(
        device: &'dev D,
        ops: FlushOps<D>,
        config: BackendConfig,
    ) -> BackendResult<Self> {
        let mut backend = Self::new(device, ops, config);
        backend.attach()?;
        backend.alloc()?;
        Ok(backend)
    }

    pub fn state(&self) -> BackendState {
        self.state
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    pub fn device(&self) -> &'dev D {
        self.device
    }

    /// NIC-wide attributes probed at attach time.
    pub fn nic(&self) -> &NicAttributes {
        &self.nic
    }

    pub fn flush_ops(&self) -> &FlushOps<D> {
        &self.ops
    }

    fn expect_state(&self, expected: BackendState) -> BackendResult<()> {
        match self.state {
            BackendState::Released => Err(BackendError::Released),
            state if state == expected => Ok(()),
            state => Err(BackendError::InvalidState { state, expected }),
        }
    }

    /// Probes the device and selects a revision for every present subsystem.
    ///
    /// # Errors
    ///
    /// `NotPresent` when a required subsystem is missing,
    /// `UnsupportedVersion` when its revision is not compiled in, and
    /// `InsufficientResource` when a counter the revision needs is absent or
    /// zero. The backend stays uninitialized on failure.
    pub fn attach(&mut self) -> BackendResult<()> {
        self.expect_state(BackendState::Uninitialized)?;

        self.device
            .set_debug_mode(self.config.debug_mode)
            .map_err(|source| {
                error!("Failed to set device debug mode: {}", source);
                BackendError::Device { source }
            })?;

        let nic = NicAttributes::probe(self.device);
        let mut probed = BTreeMap::new();

        for subsystem in Subsystem::ALL {
            if !self.device.is_present(subsystem) {
                if self.config.is_required(subsystem) {
                    error!("NIC module {} not present", subsystem);
                    return Err(BackendError::NotPresent { subsystem });
                }
                info!("NIC module {} not present, skipping", subsystem);
                continue;
            }

            let version = self.device.version(subsystem);
            let revision = ModuleRevision::select(subsystem, version).map_err(|e| {
                error!("{}", e);
                e
            })?;
            let caps = self.probe_capacities(subsystem, revision)?;

            info!("NIC module {} ver {} attached: {}", subsystem, version, caps);
            probed.insert(subsystem, Probed { revision, caps });
        }

        self.nic = nic;
        self.probed = probed;
        self.state = BackendState::Attached;
        Ok(())
    }

    fn probe_capacities(
        &self,
        subsystem: Subsystem,
        revision: ModuleRevision,
    ) -> BackendResult<Capacities> {
        let mut caps: Capacities = Capability::ALL
            .iter()
            .filter(|c| c.subsystem() == Some(subsystem))
            .filter_map(|c| self.device.capacity(*c).map(|n| (*c, n)))
            .collect();

        for capability in revision.layout().requires() {
            match self.device.capacity(*capability) {
                Some(count) if count > 0 => caps.insert(*capability, count),
                _ => {
                    error!(
                        "NIC module {}: insufficient resource [ {} ]",
                        subsystem, capability
                    );
                    return Err(BackendError::InsufficientResource {
                        resource: *capability,
                        available: 0,
                        required: 1,
                    });
                }
            }
        }
        Ok(caps)
    }

    /// Allocates every module cache, zero-filled with revision defaults.
    ///
    /// Fails with `CapacityOverflow` when the probed capacities size a cache
    /// past its limit; the backend then stays attached with no cache.
    pub fn alloc(&mut self) -> BackendResult<()> {
        self.expect_state(BackendState::Attached)?;

        let debug_mode = self.config.debug_mode;
        self.caches = self
            .probed
            .iter()
            .map(|(subsystem, probed)| {
                let mut cache = ModuleCache::new(probed.revision, probed.caps.clone())
                    .map_err(|e| {
                        error!("NIC module {}: {}", subsystem, e);
                        e
                    })?;
                cache.set_debug_mode(debug_mode);
                Ok((*subsystem, cache))
            })
            .collect::<BackendResult<_>>()?;

        let bytes: usize = self.caches.values().map(|c| c.layout().as_bytes().len()).sum();
        info!(
            "Allocated {} module caches ({} bytes)",
            self.caches.len(),
            bytes
        );
        self.state = BackendState::Ready;
        Ok(())
    }

    /// Re-zeroes and re-defaults every cache. Hardware is not touched.
    pub fn reset(&mut self) -> BackendResult<()> {
        self.expect_state(BackendState::Ready)?;
        for cache in self.caches.values_mut() {
            cache.reset();
        }
        debug!("Reset {} module caches", self.caches.len());
        Ok(())
    }

    /// Releases every cache. Any later accessor fails with `Released`.
    pub fn free(&mut self) {
        if self.state == BackendState::Released {
            warn!("Backend already released");
            return;
        }
        self.caches.clear();
        self.probed.clear();
        self.state = BackendState::Released;
        info!("Backend released");
    }

    /// Returns the revision selected for a subsystem, if it is present.
    pub fn revision(&self, subsystem: Subsystem) -> Option<ModuleRevision> {
        self.probed.get(&subsystem).map(|p| p.revision)
    }

    /// Present subsystems, in attach order.
    pub fn subsystems(&self) -> impl Iterator<Item = Subsystem> + '_ {
        self.probed.keys().copied()
    }

    /// Returns a probed capacity counter, or zero if it was not reported.
    pub fn capacity(&self, capability: Capability) -> u32 {
        match capability {
            Capability::PhyPorts => self.nic.num_phy_ports,
            Capability::RxPorts => self.nic.num_rx_ports,
            Capability::Categories => self.nic.max_categories,
            Capability::Queues => self.nic.max_queues,
            _ => capability
                .subsystem()
                .and_then(|s| self.probed.get(&s))
                .map(|p| p.caps.get(capability))
                .unwrap_or(0),
        }
    }

    /// Checks that the device provides at least `needed` of a resource.
    pub fn require(&self, capability: Capability, needed: u32) -> BackendResult<()> {
        if self.state == BackendState::Released {
            return Err(BackendError::Released);
        }
        let available = self.capacity(capability);
        if available < needed {
            warn!(
                "Insufficient resource [ {} ]: required {}, available {}",
                capability, needed, available
            );
            return Err(BackendError::InsufficientResource {
                resource: capability,
                available,
                required: needed,
            });
        }
        Ok(())
    }

    /// Returns the cache of a present subsystem.
    pub fn cache(&self, subsystem: Subsystem) -> BackendResult<&ModuleCache> {
        self.expect_state(BackendState::Ready)?;
        self.caches
            .get(&subsystem)
            .ok_or(BackendError::NotPresent { subsystem })
    }

    pub fn cache_mut(&mut self, subsystem: Subsystem) -> BackendResult<&mut ModuleCache> {
        self.expect_state(BackendState::Ready)?;
        self.caches
            .get_mut(&subsystem)
            .ok_or(BackendError::NotPresent { subsystem })
    }

    /// Reads one word of a field, or runs a query selector.
    pub fn get<F: ModuleField>(&self, field: F, index: u32, word_off: u32) -> BackendResult<u32> {
        self.cache(F::SUBSYSTEM)?.get(field.id(), index, word_off)
    }

    /// Writes one word of a field, or runs a bulk selector. Memory only.
    pub fn set<F: ModuleField>(
        &mut self,
        field: F,
        index: u32,
        word_off: u32,
        value: u32,
    ) -> BackendResult<()> {
        self.cache_mut(F::SUBSYSTEM)?
            .set(field.id(), index, word_off, value)
    }

    /// Pushes a range of one cached table to the device.
    pub fn flush(&self, table: TableId, range: FlushRange) -> BackendResult<()> {
        let cache = self.cache(table.subsystem())?;
        let (start, count) = resolve_range(cache.table(table)?, range)?;
        let view = TableView::new(cache, table)?;
        let trace = cache.debug_mode() == DebugMode::Write;
        self.ops.flush(self.device, &view, start, count, trace)
    }

    /// Pushes every table of a subsystem, in layout order. Stops at the
    /// first failure.
    pub fn flush_module(&self, subsystem: Subsystem) -> BackendResult<()> {
        let cache = self.cache(subsystem)?;
        for table in cache.layout().tables() {
            self.flush(table.id(), FlushRange::All)?;
        }
        Ok(())
    }

    /// See [`ModuleCache::find_equal`].
    pub fn find_equal(
        &self,
        table: TableId,
        candidate: u32,
        start: u32,
        count: u32,
    ) -> BackendResult<Option<u32>> {
        self.cache(table.subsystem())?
            .find_equal(table, candidate, start, count)
    }

    /// See [`ModuleCache::compare`].
    pub fn compare(&self, table: TableId, a: u32, b: u32) -> BackendResult<bool> {
        self.cache(table.subsystem())?.compare(table, a, b)
    }
}

impl<D: DeviceProbe + ?Sized> fmt::Debug for Backend<'_, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Backend")
            .field("state", &self.state)
            .field("nic", &self.nic)
            .field("subsystems", &self.probed.keys().collect::<Vec<_>>())
            .field("ops", &self.ops)
            .finish()
    }
}
