//! Hardware module cache and flush layer for flow-offload NICs.
//!
//! The NIC's match/action pipeline is programmed through large tables of
//! per-subsystem configuration state. This crate keeps a byte-exact cached
//! image of every table, lets callers read and write individual fields
//! through one revision-independent API, and pushes dirty ranges to the
//! device only on an explicit flush.
//!
//! # Architecture
//!
//! - [`directory`]: per-revision field directories (table, offset, width)
//! - [`revision`]: the compiled-in module revisions
//! - [`layout`]: the revision-tagged image of one subsystem
//! - [`cache`]: field accessors and function selectors over one layout
//! - [`flush`]: the flush operations table and the [`TableView`] handed to
//!   transports
//! - [`backend`]: the per-device registry and its lifecycle
//! - [`config`], [`error`], [`probe`]: configuration, errors, device probing
//!
//! # Example
//!
//! ```ignore
//! use flow_hw_backend::{Backend, BackendConfig, FlushOps};
//! use flow_hw_types::{CatField, FlushRange, TableId};
//!
//! let mut backend = Backend::init(&device, FlushOps::for_transport(), BackendConfig::default())?;
//! backend.set(CatField::CfnEnable, 3, 0, 1)?;
//! backend.set(CatField::CfnPtcL4, 3, 0, 0x2)?;
//! backend.flush(TableId::CatCfn, FlushRange::single(3))?;
//! ```

pub mod backend;
pub mod cache;
pub mod config;
mod dedup;
pub mod directory;
mod dump;
pub mod error;
pub mod flush;
pub mod layout;
pub mod probe;
pub mod revision;

pub use backend::{Backend, BackendState};
pub use cache::ModuleCache;
pub use config::{BackendConfig, DebugMode};
pub use directory::{FieldDesc, FieldDirectory, FieldEntry, FunctionOp, RevisionLayout, Width};
pub use error::{BackendError, BackendResult, Dimension, TransportError};
pub use flush::{FlushFn, FlushOps, FlushTransport, TableView};
pub use layout::{ModuleLayout, TableImage};
pub use probe::{Capacities, DeviceProbe, NicAttributes};
pub use revision::ModuleRevision;
