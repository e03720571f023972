//! Flow learning manager layout, revision 25.

use crate::directory::{FunctionOp, RevisionLayout, Width};
use crate::revision::ModuleRevision;
use flow_hw_types::{Capability, FlmField, TableId};
use once_cell::sync::Lazy;

use FlmField::*;

pub(super) static V25: Lazy<RevisionLayout> = Lazy::new(build);

/// Reset value of the SDRAM split, in percent of the learn memory.
const SPLIT_SDRAM_USAGE_DEFAULT: u32 = 0x10;

fn build() -> RevisionLayout {
    RevisionLayout::builder(ModuleRevision::FlmV25)
        .requires(&[
            Capability::FlmCategories,
            Capability::FlmSizeMb,
            Capability::FlmEntrySize,
            Capability::FlmVariant,
            Capability::FlmPrios,
            Capability::FlmPstProfiles,
            Capability::FlmScrubProfiles,
            Capability::FlmLoadApsMax,
            Capability::FlmRppClockPs,
        ])
        .table(TableId::FlmControl, |_| Some(1), |t| {
            t.fields(
                Width::U32,
                &[
                    ControlEnable,
                    ControlInit,
                    ControlLds,
                    ControlLfs,
                    ControlLis,
                    ControlUds,
                    ControlUis,
                    ControlRds,
                    ControlRis,
                    ControlPds,
                    ControlPis,
                    ControlCrcwr,
                    ControlCrcrd,
                    ControlRbl,
                    ControlEab,
                    ControlSplitSdramUsage,
                ],
            )
        })
        .table(TableId::FlmStatus, |_| Some(1), |t| {
            t.fields(
                Width::U32,
                &[
                    StatusCalibSuccess,
                    StatusCalibFail,
                    StatusInitdone,
                    StatusIdle,
                    StatusCritical,
                    StatusPanic,
                    StatusCrcerr,
                    StatusEftBp,
                    StatusCacheBufCritical,
                ],
            )
        })
        .table(TableId::FlmScan, |_| Some(1), |t| t.field(ScanI, Width::U32))
        .table(TableId::FlmLoadBin, |_| Some(1), |t| t.field(LoadBin, Width::U32))
        .table(TableId::FlmPrio, |_| Some(1), |t| {
            t.fields(
                Width::U32,
                &[
                    PrioLimit0, PrioFt0, PrioLimit1, PrioFt1, PrioLimit2, PrioFt2, PrioLimit3,
                    PrioFt3,
                ],
            )
        })
        .table(
            TableId::FlmPst,
            |c| Some(c.get(Capability::FlmPstProfiles)),
            |t| t.fields(Width::U32, &[PstBp, PstPp, PstTp]),
        )
        .table(
            TableId::FlmRcp,
            |c| Some(c.get(Capability::FlmCategories)),
            |t| {
                t.field(RcpLookup, Width::U32)
                    .field(RcpQw0Dyn, Width::U32)
                    .field(RcpQw0Ofs, Width::I32)
                    .field(RcpQw0Sel, Width::U32)
                    .field(RcpQw4Dyn, Width::U32)
                    .field(RcpQw4Ofs, Width::I32)
                    .field(RcpSw8Dyn, Width::U32)
                    .field(RcpSw8Ofs, Width::I32)
                    .field(RcpSw8Sel, Width::U32)
                    .field(RcpSw9Dyn, Width::U32)
                    .field(RcpSw9Ofs, Width::I32)
                    .array(RcpMask, Width::U32, 10)
                    .fields(
                        Width::U32,
                        &[RcpKid, RcpOpn, RcpIpn, RcpBytDyn, RcpBytOfs, RcpTxplm],
                    )
                    .field(RcpAutoIpv4Mask, Width::U32)
            },
        )
        .table(
            TableId::FlmScrub,
            |c| Some(c.get(Capability::FlmScrubProfiles)),
            |t| {
                t.fields(Width::U32, &[ScrubT, ScrubR])
                    .fields(Width::U8, &[ScrubDel, ScrubInf])
            },
        )
        .function(ControlPresetAll, TableId::FlmControl, FunctionOp::PresetAll)
        .function(RcpPresetAll, TableId::FlmRcp, FunctionOp::PresetAll)
        .function(ScrubPresetAll, TableId::FlmScrub, FunctionOp::PresetAll)
        .with_default(ControlSplitSdramUsage, SPLIT_SDRAM_USAGE_DEFAULT)
        .build()
}
