//! Queue selector layout, revision 7.

use crate::directory::{FunctionOp, RevisionLayout, Width};
use crate::revision::ModuleRevision;
use flow_hw_types::{Capability, QslField, TableId};
use once_cell::sync::Lazy;

use QslField::*;

pub(super) static V7: Lazy<RevisionLayout> = Lazy::new(build);

/// Unmatched-queue table size; fixed in hardware.
const UNMQ_ENTRIES: u32 = 256;

fn build() -> RevisionLayout {
    RevisionLayout::builder(ModuleRevision::QslV7)
        .requires(&[Capability::QslCategories, Capability::QslQstEntries])
        .table(
            TableId::QslRcp,
            |c| Some(c.get(Capability::QslCategories)),
            |t| {
                t.fields(Width::U8, &[RcpDiscard, RcpDrop])
                    .fields(Width::U16, &[RcpTblLo, RcpTblHi, RcpTblIdx, RcpTblMsk])
                    .fields(Width::U8, &[RcpLr, RcpTsa, RcpVli])
            },
        )
        .table(
            TableId::QslQst,
            |c| Some(c.get(Capability::QslQstEntries)),
            |t| {
                t.field(QstQueue, Width::U16)
                    .fields(Width::U8, &[QstEn, QstTxPort, QstLre])
                    .field(QstTci, Width::U16)
                    .field(QstVen, Width::U8)
            },
        )
        .table(
            TableId::QslQen,
            |c| Some(c.get(Capability::QslQstEntries) / 4),
            |t| t.field(QenEn, Width::U32),
        )
        .table(
            TableId::QslUnmq,
            |_| Some(UNMQ_ENTRIES),
            |t| t.field(UnmqDestQueue, Width::U32).field(UnmqEn, Width::U8),
        )
        .function(RcpPresetAll, TableId::QslRcp, FunctionOp::PresetAll)
        .function(RcpCompare, TableId::QslRcp, FunctionOp::Compare)
        .function(RcpFind, TableId::QslRcp, FunctionOp::Find)
        .function(QstPresetAll, TableId::QslQst, FunctionOp::PresetAll)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_qst_layout() {
        let qst = V7.table(TableId::QslQst).unwrap();
        let offsets: Vec<usize> = qst.fields().iter().map(|f| f.offset).collect();
        assert_eq!(offsets, vec![0, 2, 3, 4, 6, 8]);
        assert_eq!(qst.entry_size, 12);
        assert_eq!(qst.padding(), vec![5, 9, 10, 11]);
    }

    #[test]
    fn test_rcp_layout() {
        let rcp = V7.table(TableId::QslRcp).unwrap();
        assert_eq!(rcp.entry_size, 16);
        assert_eq!(rcp.padding(), vec![13, 14, 15]);
    }
}
