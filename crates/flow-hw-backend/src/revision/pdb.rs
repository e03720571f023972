//! Packet descriptor builder layout, revision 9.

use crate::directory::{FunctionOp, RevisionLayout, Width};
use crate::revision::ModuleRevision;
use flow_hw_types::{Capability, PdbField, TableId};
use once_cell::sync::Lazy;

use PdbField::*;

pub(super) static V9: Lazy<RevisionLayout> = Lazy::new(build);

fn build() -> RevisionLayout {
    RevisionLayout::builder(ModuleRevision::PdbV9)
        .requires(&[Capability::PdbCategories])
        .table(
            TableId::PdbRcp,
            |c| Some(c.get(Capability::PdbCategories)),
            |t| {
                t.fields(
                    Width::U32,
                    &[
                        RcpDescriptor,
                        RcpDescLen,
                        RcpTxPort,
                        RcpTxIgnore,
                        RcpTxNow,
                        RcpCrcOverwrite,
                        RcpAlign,
                    ],
                )
                .field(RcpOfs0Dyn, Width::U32)
                .field(RcpOfs0Rel, Width::I32)
                .field(RcpOfs1Dyn, Width::U32)
                .field(RcpOfs1Rel, Width::I32)
                .field(RcpOfs2Dyn, Width::U32)
                .field(RcpOfs2Rel, Width::I32)
                .fields(
                    Width::U32,
                    &[
                        RcpIpProtTnl,
                        RcpPpcHsh,
                        RcpDuplicateEn,
                        RcpDuplicateBit,
                        RcpPcapKeepFcs,
                    ],
                )
            },
        )
        .table(TableId::PdbConfig, |_| Some(1), |t| {
            t.fields(Width::U32, &[ConfigTsFormat, ConfigPortOfs])
        })
        .function(RcpPresetAll, TableId::PdbRcp, FunctionOp::PresetAll)
        .function(RcpCompare, TableId::PdbRcp, FunctionOp::Compare)
        .function(RcpFind, TableId::PdbRcp, FunctionOp::Find)
        .build()
}
