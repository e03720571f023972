//! Compiled-in module revisions.
//!
//! Each submodule describes the table layouts of the revisions one subsystem
//! supports. Layouts are built on first use and shared for the lifetime of
//! the process.

mod cat;
mod flm;
mod hsh;
mod km;
mod pdb;
mod qsl;
mod slc_lr;
mod tpe;

use crate::directory::RevisionLayout;
use crate::error::{BackendError, BackendResult};
use flow_hw_types::{Subsystem, Version};
use std::fmt;

/// One supported revision of one subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ModuleRevision {
    CatV18,
    CatV21,
    KmV7,
    FlmV25,
    HshV5,
    QslV7,
    SlcLrV2,
    PdbV9,
    TpeV3,
}

impl ModuleRevision {
    pub const ALL: [ModuleRevision; 9] = [
        ModuleRevision::CatV18,
        ModuleRevision::CatV21,
        ModuleRevision::KmV7,
        ModuleRevision::FlmV25,
        ModuleRevision::HshV5,
        ModuleRevision::QslV7,
        ModuleRevision::SlcLrV2,
        ModuleRevision::PdbV9,
        ModuleRevision::TpeV3,
    ];

    pub const fn subsystem(&self) -> Subsystem {
        match self {
            ModuleRevision::CatV18 | ModuleRevision::CatV21 => Subsystem::Cat,
            ModuleRevision::KmV7 => Subsystem::Km,
            ModuleRevision::FlmV25 => Subsystem::Flm,
            ModuleRevision::HshV5 => Subsystem::Hsh,
            ModuleRevision::QslV7 => Subsystem::Qsl,
            ModuleRevision::SlcLrV2 => Subsystem::SlcLr,
            ModuleRevision::PdbV9 => Subsystem::Pdb,
            ModuleRevision::TpeV3 => Subsystem::Tpe,
        }
    }

    /// Returns the major revision this layout implements.
    pub const fn version(&self) -> Version {
        let major = match self {
            ModuleRevision::CatV18 => 18,
            ModuleRevision::CatV21 => 21,
            ModuleRevision::KmV7 => 7,
            ModuleRevision::FlmV25 => 25,
            ModuleRevision::HshV5 => 5,
            ModuleRevision::QslV7 => 7,
            ModuleRevision::SlcLrV2 => 2,
            ModuleRevision::PdbV9 => 9,
            ModuleRevision::TpeV3 => 3,
        };
        Version::new(major, 0)
    }

    /// Selects the layout for a reported module version.
    ///
    /// Revisions are matched on the major number; minor revisions never
    /// change a table layout.
    pub fn select(subsystem: Subsystem, version: Version) -> BackendResult<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|r| r.subsystem() == subsystem && r.version().major() == version.major())
            .ok_or(BackendError::UnsupportedVersion { subsystem, version })
    }

    /// Returns the field directory of this revision.
    pub fn layout(&self) -> &'static RevisionLayout {
        match self {
            ModuleRevision::CatV18 => &cat::V18,
            ModuleRevision::CatV21 => &cat::V21,
            ModuleRevision::KmV7 => &km::V7,
            ModuleRevision::FlmV25 => &flm::V25,
            ModuleRevision::HshV5 => &hsh::V5,
            ModuleRevision::QslV7 => &qsl::V7,
            ModuleRevision::SlcLrV2 => &slc_lr::V2,
            ModuleRevision::PdbV9 => &pdb::V9,
            ModuleRevision::TpeV3 => &tpe::V3,
        }
    }
}

impl fmt::Display for ModuleRevision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} v{}", self.subsystem(), self.version().major())
    }
}
