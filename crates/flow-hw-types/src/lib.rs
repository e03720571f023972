//! Stable identifiers for flow hardware modules.
//!
//! This crate provides the vocabulary shared by the hardware module cache and
//! its callers. Everything here is stable across hardware revisions; the
//! revision-specific layout of each table lives in `flow-hw-backend`.
//!
//! - [`Version`]: packed `major.minor` module revision code
//! - [`Subsystem`]: one hardware module family (CAT, KM, FLM, ...)
//! - [`TableId`]: one table inside a subsystem
//! - [`Capability`]: capacity counters reported by the capability probe
//! - [`ModuleField`]: typed field identifiers ([`CatField`], [`KmField`], ...)
//! - [`FlushRange`]: flush range arguments, including the sentinel forms

mod field;
mod fields;
mod range;
mod subsystem;
mod version;

pub use field::{FieldId, ModuleField, FIELD_START_INDEX};
pub use fields::{
    CatField, FlmField, HshField, KmField, PdbField, QslField, SlcLrField, TpeField,
};
pub use range::{FlushRange, ALL_BANK_ENTRIES, ALL_ENTRIES, NOT_FOUND};
pub use subsystem::{Capability, Subsystem, TableId};
pub use version::Version;

/// Common error type for parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("invalid subsystem name: {0}")]
    InvalidSubsystem(String),

    #[error("invalid version string: {0}")]
    InvalidVersion(String),

    #[error("invalid flush count: {0}")]
    InvalidFlushCount(i32),
}
