//! Categorizer layouts, revisions 18 and 21.
//!
//! Revision 21 adds the tunnel error checks to CFN and widens KCE, KCS and
//! FTE to one word per key matcher interface.

use crate::directory::{FunctionOp, RevisionLayout, TableBuilder, Width};
use crate::revision::ModuleRevision;
use flow_hw_types::{Capability, CatField, TableId};
use once_cell::sync::Lazy;

use CatField::*;

pub(super) static V18: Lazy<RevisionLayout> = Lazy::new(|| build(ModuleRevision::CatV18));
pub(super) static V21: Lazy<RevisionLayout> = Lazy::new(|| build(ModuleRevision::CatV21));

const CFN_PTC: &[CatField] = &[
    CfnEnable,
    CfnInv,
    CfnPtcInv,
    CfnPtcIsl,
    CfnPtcCfp,
    CfnPtcMac,
    CfnPtcL2,
    CfnPtcVntag,
    CfnPtcVlan,
    CfnPtcMpls,
    CfnPtcL3,
    CfnPtcFrag,
    CfnPtcIpProt,
    CfnPtcL4,
    CfnPtcTunnel,
    CfnPtcTnlL2,
    CfnPtcTnlVlan,
    CfnPtcTnlMpls,
    CfnPtcTnlL3,
    CfnPtcTnlFrag,
    CfnPtcTnlIpProt,
    CfnPtcTnlL4,
];

const CFN_ERR: &[CatField] = &[
    CfnErrInv,
    CfnErrCv,
    CfnErrFcs,
    CfnErrTrunc,
    CfnErrL3Cs,
    CfnErrL4Cs,
];

const CFN_ERR_TNL: &[CatField] = &[
    CfnErrTnlL3Cs,
    CfnErrTnlL4Cs,
    CfnErrTtlExp,
    CfnErrTnlTtlExp,
];

const CFN_PM: &[CatField] = &[
    CfnPmDct,
    CfnPmExtInv,
    CfnPmCmb,
    CfnPmAndInv,
    CfnPmOrInv,
    CfnPmInv,
    CfnLc,
    CfnLcInv,
    CfnKm0Or,
];

fn cfn(t: TableBuilder, v21: bool) -> TableBuilder {
    let t = t.fields(Width::U32, CFN_PTC).fields(Width::U32, CFN_ERR);
    let t = if v21 {
        t.fields(Width::U32, CFN_ERR_TNL)
    } else {
        t
    };
    let t = t
        .field(CfnMacPort, Width::U32)
        .array(CfnPmCmp, Width::U32, 2)
        .fields(Width::U32, CFN_PM);
    if v21 {
        t.field(CfnKm1Or, Width::U32)
    } else {
        t
    }
}

fn build(revision: ModuleRevision) -> RevisionLayout {
    let v21 = revision == ModuleRevision::CatV21;
    // One word per key matcher interface from revision 21 on.
    let km_words = if v21 { 2 } else { 1 };

    let mut requires = vec![
        Capability::CatFuncs,
        Capability::FlowTypes,
        Capability::PmExt,
        Capability::Len,
        Capability::KccSize,
        Capability::Categories,
    ];
    if v21 {
        requires.push(Capability::KmIfCount);
    }

    RevisionLayout::builder(revision)
        .requires(&requires)
        .table(TableId::CatCfn, |c| Some(c.get(Capability::CatFuncs)), |t| cfn(t, v21))
        .table(
            TableId::CatKce,
            |c| Some(c.get(Capability::CatFuncs) / 8),
            |t| t.array(KceEnableBm, Width::U32, km_words),
        )
        .table(
            TableId::CatKcs,
            |c| Some(c.get(Capability::CatFuncs)),
            |t| t.array(KcsCategory, Width::U32, km_words),
        )
        .table(
            TableId::CatFte,
            |c| (c.get(Capability::CatFuncs) / 8).checked_mul(c.get(Capability::FlowTypes)),
            |t| t.array(FteEnableBm, Width::U32, km_words),
        )
        .table(
            TableId::CatCte,
            |c| Some(c.get(Capability::CatFuncs)),
            |t| t.field(CteEnableBm, Width::U32),
        )
        .table(
            TableId::CatCts,
            |c| {
                c.get(Capability::CatFuncs)
                    .checked_mul(c.get(Capability::PmExt).div_ceil(2))
            },
            |t| t.fields(Width::U32, &[CtsCatA, CtsCatB]),
        )
        .table(
            TableId::CatCot,
            |c| Some(c.get(Capability::Categories)),
            |t| t.field(CotColor, Width::U32).field(CotKm, Width::U8),
        )
        .table(
            TableId::CatCct,
            |c| c.get(Capability::CatFuncs).checked_mul(4),
            |t| t.fields(Width::U32, &[CctColor, CctKm]),
        )
        .table(
            TableId::CatExo,
            |c| Some(c.get(Capability::PmExt)),
            |t| t.field(ExoDyn, Width::U32).field(ExoOfs, Width::I32),
        )
        .table(
            TableId::CatRck,
            |c| c.get(Capability::PmExt).checked_mul(64),
            |t| t.field(RckData, Width::U32),
        )
        .table(
            TableId::CatLen,
            |c| Some(c.get(Capability::Len)),
            |t| {
                t.fields(Width::U32, &[LenLower, LenUpper])
                    .fields(Width::U8, &[LenDyn1, LenDyn2, LenInv])
            },
        )
        .table(
            TableId::CatKcc,
            |c| Some(c.get(Capability::KccSize)),
            |t| {
                t.array(KccKey, Width::U32, 2)
                    .fields(Width::U32, &[KccCategory, KccId])
            },
        )
        .function(CfnSetAllDefaults, TableId::CatCfn, FunctionOp::SetAllDefaults)
        .function(CfnPresetAll, TableId::CatCfn, FunctionOp::PresetAll)
        .function(CfnCompare, TableId::CatCfn, FunctionOp::Compare)
        .function(CfnFind, TableId::CatCfn, FunctionOp::Find)
        .function(CfnCopyFrom, TableId::CatCfn, FunctionOp::CopyFrom)
        .function(CotPresetAll, TableId::CatCot, FunctionOp::PresetAll)
        .function(CotCompare, TableId::CatCot, FunctionOp::Compare)
        .function(CotFind, TableId::CatCot, FunctionOp::Find)
        .function(CotCopyFrom, TableId::CatCot, FunctionOp::CopyFrom)
        .build()
}
