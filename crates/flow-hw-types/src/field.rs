//! Field identifiers.
//!
//! Every subsystem enumerates its configuration fields in one typed enum.
//! Identifiers below [`FIELD_START_INDEX`] are function selectors: they name
//! a bulk operation on a table (preset, compare, find, copy) rather than a
//! field, and are invoked through the same get/set accessors.

use crate::Subsystem;
use std::fmt;

/// First numeric value used for fields; everything below is a function
/// selector.
pub const FIELD_START_INDEX: u32 = 100;

/// Raw, subsystem-relative field identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId(u32);

impl FieldId {
    /// Creates a field identifier from its raw value.
    pub const fn from_raw(raw: u32) -> Self {
        FieldId(raw)
    }

    /// Returns the raw value.
    pub const fn as_u32(&self) -> u32 {
        self.0
    }

    /// Returns true if this identifier names a function selector.
    pub const fn is_function(&self) -> bool {
        self.0 < FIELD_START_INDEX
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Marker trait for typed field enums.
///
/// The associated subsystem lets the backend route an accessor call to the
/// right module cache at compile time, so a KM field can never be applied to
/// the CAT cache.
pub trait ModuleField: Copy + Eq + fmt::Debug + Send + Sync + 'static {
    /// The subsystem this field belongs to.
    const SUBSYSTEM: Subsystem;

    /// Returns the raw identifier.
    fn id(self) -> FieldId;

    /// Looks up the typed identifier for a raw value.
    fn from_id(id: FieldId) -> Option<Self>;

    /// Returns the identifier name for logging.
    fn name(self) -> &'static str;

    /// Returns true if this identifier names a function selector.
    fn is_function(self) -> bool {
        self.id().is_function()
    }
}

macro_rules! define_fields {
    (
        $(#[$meta:meta])*
        pub enum $name:ident for $subsystem:ident {
            functions { $f0:ident $(, $f:ident)* $(,)? }
            fields { $d0:ident $(, $d:ident)* $(,)? }
        }
    ) => {
        $(#[$meta])*
        #[repr(u32)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $f0 = 0,
            $($f,)*
            $d0 = $crate::FIELD_START_INDEX,
            $($d,)*
        }

        impl $name {
            /// Every identifier, function selectors first.
            pub const ALL: &'static [$name] = &[
                $name::$f0,
                $($name::$f,)*
                $name::$d0,
                $($name::$d,)*
            ];
        }

        impl $crate::ModuleField for $name {
            const SUBSYSTEM: $crate::Subsystem = $crate::Subsystem::$subsystem;

            fn id(self) -> $crate::FieldId {
                $crate::FieldId::from_raw(self as u32)
            }

            fn from_id(id: $crate::FieldId) -> Option<Self> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|f| $crate::ModuleField::id(*f) == id)
            }

            fn name(self) -> &'static str {
                match self {
                    $name::$f0 => stringify!($f0),
                    $($name::$f => stringify!($f),)*
                    $name::$d0 => stringify!($d0),
                    $($name::$d => stringify!($d),)*
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", $crate::ModuleField::name(*self))
            }
        }
    };
}

pub(crate) use define_fields;
