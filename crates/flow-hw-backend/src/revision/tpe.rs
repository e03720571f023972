//! TX packet editor layout, revision 3.
//!
//! TPE spans several hardware blocks (RPP, IFR, INS, RPL, CPY, HFU, CSU);
//! they share one revision number and are cached as one module.

use crate::directory::{FunctionOp, RevisionLayout, TableBuilder, Width};
use crate::revision::ModuleRevision;
use flow_hw_types::{Capability, TableId, TpeField};
use once_cell::sync::Lazy;

use TpeField::*;

pub(super) static V3: Lazy<RevisionLayout> = Lazy::new(build);

fn ifr(t: TableBuilder, fields: [TpeField; 5]) -> TableBuilder {
    let [ipv4_en, ipv4_df_drop, ipv6_en, ipv6_drop, mtu] = fields;
    t.fields(Width::U32, &[ipv4_en, ipv4_df_drop, ipv6_en, ipv6_drop])
        .field(mtu, Width::U16)
}

/// Appends one `wr`/`pos`/`add`/`sub` length update group.
fn hfu_len(t: TableBuilder, fields: &[TpeField]) -> TableBuilder {
    fields.iter().fold(t, |t, f| {
        let width = match *f {
            HfuRcpLenAPosOfs | HfuRcpLenAAddOfs | HfuRcpLenBPosOfs | HfuRcpLenBAddOfs
            | HfuRcpLenCPosOfs | HfuRcpLenCAddOfs | HfuRcpTtlPosOfs => Width::I32,
            _ => Width::U32,
        };
        t.field(*f, width)
    })
}

fn build() -> RevisionLayout {
    RevisionLayout::builder(ModuleRevision::TpeV3)
        .requires(&[
            Capability::TpeCategories,
            Capability::TpeIfrCategories,
            Capability::TxCpyWriters,
            Capability::TxRplDepth,
            Capability::TxRplExtCategories,
        ])
        .table(
            TableId::TpeRppRcp,
            |c| Some(c.get(Capability::TpeCategories)),
            |t| t.field(RppRcpExp, Width::U32),
        )
        .table(
            TableId::TpeRppIfrRcp,
            |c| Some(c.get(Capability::TpeIfrCategories)),
            |t| {
                ifr(
                    t,
                    [
                        RppIfrRcpIpv4En,
                        RppIfrRcpIpv4DfDrop,
                        RppIfrRcpIpv6En,
                        RppIfrRcpIpv6Drop,
                        RppIfrRcpMtu,
                    ],
                )
            },
        )
        .table(
            TableId::TpeIfrRcp,
            |c| Some(c.get(Capability::TpeIfrCategories)),
            |t| {
                ifr(
                    t,
                    [
                        IfrRcpIpv4En,
                        IfrRcpIpv4DfDrop,
                        IfrRcpIpv6En,
                        IfrRcpIpv6Drop,
                        IfrRcpMtu,
                    ],
                )
            },
        )
        .table(
            TableId::TpeInsRcp,
            |c| Some(c.get(Capability::TpeCategories)),
            |t| {
                t.field(InsRcpDyn, Width::U32)
                    .field(InsRcpOfs, Width::I32)
                    .field(InsRcpLen, Width::U32)
            },
        )
        .table(
            TableId::TpeRplRcp,
            |c| Some(c.get(Capability::TpeCategories)),
            |t| {
                t.field(RplRcpDyn, Width::U32)
                    .field(RplRcpOfs, Width::I32)
                    .fields(
                        Width::U32,
                        &[RplRcpLen, RplRcpRplPtr, RplRcpExtPrio, RplRcpEthTypeWr],
                    )
            },
        )
        .table(
            TableId::TpeRplExt,
            |c| Some(c.get(Capability::TxRplExtCategories)),
            |t| t.fields(Width::U32, &[RplExtRplPtr, RplExtMetaRplLen]),
        )
        .table(
            TableId::TpeRplRpl,
            |c| Some(c.get(Capability::TxRplDepth)),
            |t| t.array(RplRplValue, Width::U32, 4),
        )
        .table(
            TableId::TpeCpyRcp,
            |c| c.product(Capability::TxCpyWriters, Capability::TpeCategories),
            |t| {
                t.fields(Width::U32, &[CpyRcpReaderSelect, CpyRcpDyn])
                    .field(CpyRcpOfs, Width::I32)
                    .field(CpyRcpLen, Width::U32)
            },
        )
        .table(
            TableId::TpeHfuRcp,
            |c| Some(c.get(Capability::TpeCategories)),
            |t| {
                let t = hfu_len(
                    t,
                    &[
                        HfuRcpLenAWr,
                        HfuRcpLenAOuterL4Len,
                        HfuRcpLenAPosDyn,
                        HfuRcpLenAPosOfs,
                        HfuRcpLenAAddDyn,
                        HfuRcpLenAAddOfs,
                        HfuRcpLenASubDyn,
                    ],
                );
                let t = hfu_len(
                    t,
                    &[
                        HfuRcpLenBWr,
                        HfuRcpLenBPosDyn,
                        HfuRcpLenBPosOfs,
                        HfuRcpLenBAddDyn,
                        HfuRcpLenBAddOfs,
                        HfuRcpLenBSubDyn,
                    ],
                );
                let t = hfu_len(
                    t,
                    &[
                        HfuRcpLenCWr,
                        HfuRcpLenCPosDyn,
                        HfuRcpLenCPosOfs,
                        HfuRcpLenCAddDyn,
                        HfuRcpLenCAddOfs,
                        HfuRcpLenCSubDyn,
                    ],
                );
                hfu_len(t, &[HfuRcpTtlWr, HfuRcpTtlPosDyn, HfuRcpTtlPosOfs])
            },
        )
        .table(
            TableId::TpeCsuRcp,
            |c| Some(c.get(Capability::TpeCategories)),
            |t| {
                t.fields(
                    Width::U32,
                    &[
                        CsuRcpOuterL3Cmd,
                        CsuRcpOuterL4Cmd,
                        CsuRcpInnerL3Cmd,
                        CsuRcpInnerL4Cmd,
                    ],
                )
            },
        )
        .function(RppRcpPresetAll, TableId::TpeRppRcp, FunctionOp::PresetAll)
        .function(InsRcpPresetAll, TableId::TpeInsRcp, FunctionOp::PresetAll)
        .function(RplRcpPresetAll, TableId::TpeRplRcp, FunctionOp::PresetAll)
        .function(RplRcpCompare, TableId::TpeRplRcp, FunctionOp::Compare)
        .function(RplRcpFind, TableId::TpeRplRcp, FunctionOp::Find)
        .function(RplRplCompare, TableId::TpeRplRpl, FunctionOp::Compare)
        .function(RplRplFind, TableId::TpeRplRpl, FunctionOp::Find)
        .function(HfuRcpPresetAll, TableId::TpeHfuRcp, FunctionOp::PresetAll)
        .function(CsuRcpPresetAll, TableId::TpeCsuRcp, FunctionOp::PresetAll)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::FieldEntry;
    use flow_hw_types::ModuleField;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_ifr_mtu_is_16_bit() {
        let table = V3.table(TableId::TpeIfrRcp).unwrap();
        assert_eq!(table.entry_size, 20);
        match V3.resolve(IfrRcpMtu.id()).unwrap() {
            FieldEntry::Field(desc) => {
                assert_eq!(desc.width, Width::U16);
                assert_eq!(desc.offset, 16);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_hfu_offsets_are_signed() {
        let hfu = V3.table(TableId::TpeHfuRcp).unwrap();
        let signed: Vec<&str> = hfu
            .fields()
            .iter()
            .filter(|f| f.width.is_signed())
            .map(|f| f.name)
            .collect();
        assert_eq!(signed.len(), 7);
        assert!(signed.contains(&"HfuRcpTtlPosOfs"));
    }
}
