//! Backend error types.
//!
//! Accessor errors (`UnsupportedField`, `IndexOutOfRange`) are programming
//! errors and are returned to the immediate caller without retry. Flush
//! failures carry the exact range that failed so the caller can re-issue it.

use crate::backend::BackendState;
use flow_hw_types::{Capability, FieldId, Subsystem, TableId, Version};
use std::fmt;
use thiserror::Error;

/// Legacy status code: index too large.
pub const INDEX_TOO_LARGE: i32 = -2;
/// Legacy status code: word offset too large.
pub const WORD_OFF_TOO_LARGE: i32 = -3;
/// Legacy status code: unsupported module version.
pub const UNSUP_VER: i32 = -4;
/// Legacy status code: insufficient resource count. Shares its value with
/// [`UNSUP_VER`].
pub const COUNT_ERROR: i32 = -4;
/// Legacy status code: unsupported field.
pub const UNSUP_FIELD: i32 = -5;

/// Which index argument was out of range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    /// Row index within a table.
    Index,
    /// Word offset within a multi-word field.
    WordOffset,
    /// Bank number within a banked table.
    Bank,
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Dimension::Index => "index",
            Dimension::WordOffset => "word offset",
            Dimension::Bank => "bank",
        };
        write!(f, "{}", s)
    }
}

/// Failure reported by the device transport.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransportError {
    /// Human readable reason.
    pub message: String,
    /// Raw status returned by the transport, if any.
    pub status: Option<i32>,
}

impl TransportError {
    /// Creates a transport error with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
        }
    }

    /// Creates a transport error from a raw status code.
    pub fn with_status(message: impl Into<String>, status: i32) -> Self {
        Self {
            message: message.into(),
            status: Some(status),
        }
    }
}

/// Error type for backend operations.
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    /// The device reports a module revision that is not compiled in.
    #[error("Unsupported NIC module: {subsystem} ver {version}")]
    UnsupportedVersion {
        subsystem: Subsystem,
        version: Version,
    },

    /// The field identifier is not defined for the active revision.
    #[error("Unsupported field {field} in NIC module {subsystem} ver {version}")]
    UnsupportedField {
        subsystem: Subsystem,
        field: FieldId,
        version: Version,
    },

    /// An index argument exceeds the probed dimensions of a table.
    #[error("{table}: {dimension} {value} too large (limit {limit})")]
    IndexOutOfRange {
        table: TableId,
        dimension: Dimension,
        value: u64,
        limit: u32,
    },

    /// The capability probe reports fewer resources than required.
    #[error("Insufficient resource [ {resource} ]: required {required}, available {available}")]
    InsufficientResource {
        resource: Capability,
        available: u32,
        required: u32,
    },

    /// The probed capacities size a table beyond what the cache can hold.
    #[error("{table}: probed capacities overflow the cache image")]
    CapacityOverflow { table: TableId },

    /// The transport could not apply a flushed range. The hardware state of
    /// the range is indeterminate.
    #[error("{table}: flush of [{start}, +{count}) failed: {source}")]
    FlushFailed {
        table: TableId,
        start: u32,
        count: u32,
        #[source]
        source: TransportError,
    },

    /// A required subsystem is not present on the device.
    #[error("NIC module {subsystem} not present")]
    NotPresent { subsystem: Subsystem },

    /// No flush callback is registered for the table.
    #[error("{table}: no flush handler registered")]
    NoFlushHandler { table: TableId },

    /// The backend is not in the state the operation requires.
    #[error("Backend is {state}, operation requires {expected}")]
    InvalidState {
        state: BackendState,
        expected: BackendState,
    },

    /// The backend has been freed.
    #[error("Backend has been released")]
    Released,

    /// Configuration could not be loaded or is invalid.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// The device rejected a control request outside of a flush.
    #[error("Device error: {source}")]
    Device {
        #[source]
        source: TransportError,
    },
}

impl BackendError {
    /// Creates an index out of range error.
    pub fn out_of_range(
        table: TableId,
        dimension: Dimension,
        value: impl Into<u64>,
        limit: u32,
    ) -> Self {
        BackendError::IndexOutOfRange {
            table,
            dimension,
            value: value.into(),
            limit,
        }
    }

    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        BackendError::Config {
            message: message.into(),
        }
    }

    /// Returns the legacy integer status code for this error.
    pub fn code(&self) -> i32 {
        match self {
            BackendError::IndexOutOfRange {
                dimension: Dimension::WordOffset,
                ..
            } => WORD_OFF_TOO_LARGE,
            BackendError::IndexOutOfRange { .. } => INDEX_TOO_LARGE,
            BackendError::UnsupportedVersion { .. } => UNSUP_VER,
            BackendError::InsufficientResource { .. } | BackendError::CapacityOverflow { .. } => {
                COUNT_ERROR
            }
            BackendError::UnsupportedField { .. } => UNSUP_FIELD,
            _ => -1,
        }
    }

    /// Returns true if re-issuing the identical operation may succeed.
    ///
    /// Only flushes qualify: they are idempotent, and a failure leaves the
    /// cache untouched.
    pub fn is_retryable(&self) -> bool {
        matches!(self, BackendError::FlushFailed { .. })
    }
}

/// Result type for backend operations.
pub type BackendResult<T> = Result<T, BackendError>;
