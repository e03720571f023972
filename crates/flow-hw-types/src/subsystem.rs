//! Subsystems, tables, and capacity counters.

use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One hardware module family.
///
/// Each subsystem owns a set of tables whose layout depends on the module
/// revision reported by the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subsystem {
    /// Categorizer: packet classification functions.
    Cat,
    /// Key matcher: CAM/TCAM key recipes.
    Km,
    /// Flow learning manager.
    Flm,
    /// Hasher: RSS/load distribution recipes.
    Hsh,
    /// Queue selector.
    Qsl,
    /// Slicer (local retransmit).
    SlcLr,
    /// Packet descriptor builder.
    Pdb,
    /// TX packet editor.
    Tpe,
}

impl Subsystem {
    /// All subsystems in attach order.
    pub const ALL: [Subsystem; 8] = [
        Subsystem::Cat,
        Subsystem::Km,
        Subsystem::Flm,
        Subsystem::Hsh,
        Subsystem::Qsl,
        Subsystem::SlcLr,
        Subsystem::Pdb,
        Subsystem::Tpe,
    ];

    /// Returns the short module name.
    pub const fn name(&self) -> &'static str {
        match self {
            Subsystem::Cat => "CAT",
            Subsystem::Km => "KM",
            Subsystem::Flm => "FLM",
            Subsystem::Hsh => "HSH",
            Subsystem::Qsl => "QSL",
            Subsystem::SlcLr => "SLC LR",
            Subsystem::Pdb => "PDB",
            Subsystem::Tpe => "TPE",
        }
    }

    /// Returns the tables owned by this subsystem.
    pub fn tables(&self) -> impl Iterator<Item = TableId> + '_ {
        TableId::ALL
            .iter()
            .copied()
            .filter(move |t| t.subsystem() == *self)
    }
}

impl fmt::Display for Subsystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Subsystem {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "cat" => Ok(Subsystem::Cat),
            "km" => Ok(Subsystem::Km),
            "flm" => Ok(Subsystem::Flm),
            "hsh" => Ok(Subsystem::Hsh),
            "qsl" => Ok(Subsystem::Qsl),
            "slc_lr" => Ok(Subsystem::SlcLr),
            "pdb" => Ok(Subsystem::Pdb),
            "tpe" => Ok(Subsystem::Tpe),
            _ => Err(ParseError::InvalidSubsystem(s.to_string())),
        }
    }
}

macro_rules! define_tables {
    ($($variant:ident => ($subsystem:ident, $name:literal)),* $(,)?) => {
        /// One table inside a subsystem.
        ///
        /// Tables are the unit of flushing and deduplication: every field
        /// lives in exactly one table, and flush callbacks are registered
        /// per table.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum TableId {
            $($variant),*
        }

        impl TableId {
            /// Every table of every subsystem.
            pub const ALL: &'static [TableId] = &[$(TableId::$variant),*];

            /// Returns the subsystem owning this table.
            pub const fn subsystem(&self) -> Subsystem {
                match self {
                    $(TableId::$variant => Subsystem::$subsystem),*
                }
            }

            /// Returns the table name as used by the hardware documentation.
            pub const fn name(&self) -> &'static str {
                match self {
                    $(TableId::$variant => $name),*
                }
            }
        }
    };
}

define_tables! {
    CatCfn => (Cat, "CFN"),
    CatKce => (Cat, "KCE"),
    CatKcs => (Cat, "KCS"),
    CatFte => (Cat, "FTE"),
    CatCte => (Cat, "CTE"),
    CatCts => (Cat, "CTS"),
    CatCot => (Cat, "COT"),
    CatCct => (Cat, "CCT"),
    CatExo => (Cat, "EXO"),
    CatRck => (Cat, "RCK"),
    CatLen => (Cat, "LEN"),
    CatKcc => (Cat, "KCC"),
    KmRcp => (Km, "RCP"),
    KmCam => (Km, "CAM"),
    KmTcam => (Km, "TCAM"),
    KmTci => (Km, "TCI"),
    KmTcq => (Km, "TCQ"),
    FlmControl => (Flm, "CONTROL"),
    FlmStatus => (Flm, "STATUS"),
    FlmScan => (Flm, "SCAN"),
    FlmLoadBin => (Flm, "LOAD_BIN"),
    FlmPrio => (Flm, "PRIO"),
    FlmPst => (Flm, "PST"),
    FlmRcp => (Flm, "RCP"),
    FlmScrub => (Flm, "SCRUB"),
    HshRcp => (Hsh, "RCP"),
    QslRcp => (Qsl, "RCP"),
    QslQst => (Qsl, "QST"),
    QslQen => (Qsl, "QEN"),
    QslUnmq => (Qsl, "UNMQ"),
    SlcLrRcp => (SlcLr, "RCP"),
    PdbRcp => (Pdb, "RCP"),
    PdbConfig => (Pdb, "CONFIG"),
    TpeRppRcp => (Tpe, "RPP_RCP"),
    TpeRppIfrRcp => (Tpe, "RPP_IFR_RCP"),
    TpeIfrRcp => (Tpe, "IFR_RCP"),
    TpeInsRcp => (Tpe, "INS_RCP"),
    TpeRplRcp => (Tpe, "RPL_RCP"),
    TpeRplExt => (Tpe, "RPL_EXT"),
    TpeRplRpl => (Tpe, "RPL_RPL"),
    TpeCpyRcp => (Tpe, "CPY_RCP"),
    TpeHfuRcp => (Tpe, "HFU_RCP"),
    TpeCsuRcp => (Tpe, "CSU_RCP"),
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.subsystem().name(), self.name())
    }
}

macro_rules! define_capabilities {
    ($($variant:ident => ($name:literal, $subsystem:expr)),* $(,)?) => {
        /// Capacity counter reported by the capability probe.
        ///
        /// Counters are queried once at attach time and are read-only
        /// afterwards. NIC-wide attributes have no owning subsystem.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Capability {
            $($variant),*
        }

        impl Capability {
            /// Every capability counter.
            pub const ALL: &'static [Capability] = &[$(Capability::$variant),*];

            /// Returns the counter name.
            pub const fn name(&self) -> &'static str {
                match self {
                    $(Capability::$variant => $name),*
                }
            }

            /// Returns the subsystem this counter belongs to, or `None` for
            /// NIC-wide attributes.
            pub const fn subsystem(&self) -> Option<Subsystem> {
                match self {
                    $(Capability::$variant => $subsystem),*
                }
            }
        }
    };
}

define_capabilities! {
    PhyPorts => ("nb_phy_ports", None),
    RxPorts => ("nb_rx_ports", None),
    Categories => ("max_categories", None),
    Queues => ("max_queues", None),
    CatFuncs => ("nb_cat_funcs", Some(Subsystem::Cat)),
    FlowTypes => ("nb_flow_types", Some(Subsystem::Cat)),
    PmExt => ("nb_pm_ext", Some(Subsystem::Cat)),
    Len => ("nb_len", Some(Subsystem::Cat)),
    KccSize => ("kcc_size", Some(Subsystem::Cat)),
    KccBanks => ("kcc_banks", Some(Subsystem::Cat)),
    KmIfCount => ("km_if_count", Some(Subsystem::Cat)),
    KmCategories => ("nb_km_categories", Some(Subsystem::Km)),
    KmCamBanks => ("nb_cam_banks", Some(Subsystem::Km)),
    KmCamRecordWords => ("nb_cam_record_words", Some(Subsystem::Km)),
    KmCamRecords => ("nb_cam_records", Some(Subsystem::Km)),
    KmTcamBanks => ("nb_tcam_banks", Some(Subsystem::Km)),
    KmTcamBankWidth => ("nb_tcam_bank_width", Some(Subsystem::Km)),
    FlmCategories => ("nb_flm_categories", Some(Subsystem::Flm)),
    FlmSizeMb => ("nb_size_mb", Some(Subsystem::Flm)),
    FlmEntrySize => ("nb_entry_size", Some(Subsystem::Flm)),
    FlmVariant => ("nb_variant", Some(Subsystem::Flm)),
    FlmPrios => ("nb_prios", Some(Subsystem::Flm)),
    FlmPstProfiles => ("nb_pst_profiles", Some(Subsystem::Flm)),
    FlmScrubProfiles => ("nb_scrub_profiles", Some(Subsystem::Flm)),
    FlmLoadApsMax => ("nb_load_aps_max", Some(Subsystem::Flm)),
    FlmRppClockPs => ("nb_rpp_clock_in_ps", Some(Subsystem::Flm)),
    HshCategories => ("nb_hsh_rcp", Some(Subsystem::Hsh)),
    HshToeplitz => ("toeplitz", Some(Subsystem::Hsh)),
    QslCategories => ("nb_qsl_rcp_categories", Some(Subsystem::Qsl)),
    QslQstEntries => ("nb_qst_entries", Some(Subsystem::Qsl)),
    PdbCategories => ("nb_pdb_rcp_categories", Some(Subsystem::Pdb)),
    TpeCategories => ("nb_tpe_rcp_categories", Some(Subsystem::Tpe)),
    TpeIfrCategories => ("nb_ifr_categories", Some(Subsystem::Tpe)),
    TxCpyWriters => ("nb_cpy_writers", Some(Subsystem::Tpe)),
    TxRplDepth => ("nb_rpl_depth", Some(Subsystem::Tpe)),
    TxRplExtCategories => ("nb_rpl_ext_categories", Some(Subsystem::Tpe)),
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_subsystem_parse() {
        assert_eq!("cat".parse::<Subsystem>().unwrap(), Subsystem::Cat);
        assert_eq!("SLC-LR".parse::<Subsystem>().unwrap(), Subsystem::SlcLr);
        assert_eq!("slc_lr".parse::<Subsystem>().unwrap(), Subsystem::SlcLr);
        assert!("roa".parse::<Subsystem>().is_err());
    }

    #[test]
    fn test_every_subsystem_has_tables() {
        for subsystem in Subsystem::ALL {
            assert!(
                subsystem.tables().count() > 0,
                "{} has no tables",
                subsystem
            );
        }
        assert_eq!(Subsystem::Km.tables().count(), 5);
    }

    #[test]
    fn test_table_display() {
        assert_eq!(TableId::CatCfn.to_string(), "CAT CFN");
        assert_eq!(TableId::TpeRplRpl.subsystem(), Subsystem::Tpe);
    }

    #[test]
    fn test_capability_owner() {
        assert_eq!(Capability::Categories.subsystem(), None);
        assert_eq!(Capability::KmCamBanks.subsystem(), Some(Subsystem::Km));
        assert_eq!(Capability::CatFuncs.name(), "nb_cat_funcs");
    }
}
