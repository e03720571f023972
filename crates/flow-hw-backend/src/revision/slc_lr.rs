//! Slicer layout, revision 2.

use crate::directory::{FunctionOp, RevisionLayout, Width};
use crate::revision::ModuleRevision;
use flow_hw_types::{Capability, SlcLrField, TableId};
use once_cell::sync::Lazy;

use SlcLrField::*;

pub(super) static V2: Lazy<RevisionLayout> = Lazy::new(build);

fn build() -> RevisionLayout {
    RevisionLayout::builder(ModuleRevision::SlcLrV2)
        .requires(&[Capability::Categories])
        .table(
            TableId::SlcLrRcp,
            |c| Some(c.get(Capability::Categories)),
            |t| {
                t.fields(Width::U32, &[RcpHeadSlcEn, RcpHeadDyn])
                    .field(RcpHeadOfs, Width::I32)
                    .fields(Width::U32, &[RcpTailSlcEn, RcpTailDyn])
                    .field(RcpTailOfs, Width::I32)
                    .field(RcpPcap, Width::U32)
            },
        )
        .function(RcpPresetAll, TableId::SlcLrRcp, FunctionOp::PresetAll)
        .function(RcpCompare, TableId::SlcLrRcp, FunctionOp::Compare)
        .function(RcpFind, TableId::SlcLrRcp, FunctionOp::Find)
        .build()
}
