//! Hasher layout, revision 5.

use crate::directory::{FunctionOp, RevisionLayout, Width};
use crate::revision::ModuleRevision;
use flow_hw_types::{Capability, HshField, TableId};
use once_cell::sync::Lazy;

use HshField::*;

pub(super) static V5: Lazy<RevisionLayout> = Lazy::new(build);

fn build() -> RevisionLayout {
    RevisionLayout::builder(ModuleRevision::HshV5)
        .requires(&[Capability::HshCategories, Capability::HshToeplitz])
        .table(
            TableId::HshRcp,
            |c| Some(c.get(Capability::HshCategories)),
            |t| {
                t.field(RcpLoadDistType, Width::U32)
                    .array(RcpMacPortMask, Width::U32, 4)
                    .field(RcpSort, Width::U32)
                    .field(RcpQw0Pe, Width::U32)
                    .field(RcpQw0Ofs, Width::I32)
                    .field(RcpQw4Pe, Width::U32)
                    .field(RcpQw4Ofs, Width::I32)
                    .field(RcpW8Pe, Width::U32)
                    .field(RcpW8Ofs, Width::I32)
                    .field(RcpW8Sort, Width::U32)
                    .field(RcpW9Pe, Width::U32)
                    .field(RcpW9Ofs, Width::I32)
                    .fields(Width::U32, &[RcpW9Sort, RcpW9P, RcpPMask])
                    .array(RcpWordMask, Width::U32, 10)
                    .fields(
                        Width::U32,
                        &[RcpSeed, RcpTnlP, RcpHshValid, RcpHshType, RcpToeplitz],
                    )
                    .array(RcpK, Width::U32, 10)
                    .field(RcpAutoIpv4Mask, Width::U32)
            },
        )
        .function(RcpPresetAll, TableId::HshRcp, FunctionOp::PresetAll)
        .function(RcpCompare, TableId::HshRcp, FunctionOp::Compare)
        .function(RcpFind, TableId::HshRcp, FunctionOp::Find)
        .build()
}
