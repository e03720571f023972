//! Key matcher layout, revision 7.

use crate::directory::{FunctionOp, RevisionLayout, TableBuilder, Width};
use crate::revision::ModuleRevision;
use flow_hw_types::{Capability, KmField, TableId};
use once_cell::sync::Lazy;

use KmField::*;

pub(super) static V7: Lazy<RevisionLayout> = Lazy::new(build);

/// TCAM rows per bank: four key bytes times 256 byte values.
const TCAM_BANK_ROWS: u32 = 4 * 256;

/// Appends a `dyn`/`ofs`/`sel` extractor group; offsets are signed.
fn extractor(t: TableBuilder, dyn_: KmField, ofs: KmField, sel: &[KmField]) -> TableBuilder {
    t.field(dyn_, Width::U32)
        .field(ofs, Width::I32)
        .fields(Width::U32, sel)
}

fn rcp(t: TableBuilder) -> TableBuilder {
    let t = extractor(t, RcpQw0Dyn, RcpQw0Ofs, &[RcpQw0SelA, RcpQw0SelB]);
    let t = extractor(t, RcpQw4Dyn, RcpQw4Ofs, &[RcpQw4SelA, RcpQw4SelB]);
    let t = extractor(t, RcpDw8Dyn, RcpDw8Ofs, &[RcpDw8SelA, RcpDw8SelB]);
    let t = extractor(t, RcpDw10Dyn, RcpDw10Ofs, &[RcpDw10SelA, RcpDw10SelB]);
    let t = t
        .fields(Width::U32, &[RcpSwxCch, RcpSwxSelA, RcpSwxSelB])
        .array(RcpMaskA, Width::U32, 12)
        .array(RcpMaskB, Width::U32, 6)
        .fields(
            Width::U32,
            &[
                RcpDual,
                RcpPaired,
                RcpElA,
                RcpElB,
                RcpInfoA,
                RcpInfoB,
                RcpFtmA,
                RcpFtmB,
                RcpBankA,
                RcpBankB,
                RcpKlA,
                RcpKlB,
                RcpKeywayA,
                RcpKeywayB,
                RcpSynergyMode,
            ],
        );
    let t = extractor(t, RcpDw0BDyn, RcpDw0BOfs, &[]);
    let t = extractor(t, RcpDw2BDyn, RcpDw2BOfs, &[]);
    let t = extractor(t, RcpSw4BDyn, RcpSw4BOfs, &[]);
    extractor(t, RcpSw5BDyn, RcpSw5BOfs, &[])
}

fn build() -> RevisionLayout {
    RevisionLayout::builder(ModuleRevision::KmV7)
        .requires(&[
            Capability::KmCategories,
            Capability::KmCamBanks,
            Capability::KmCamRecordWords,
            Capability::KmCamRecords,
            Capability::KmTcamBanks,
            Capability::KmTcamBankWidth,
        ])
        .table(TableId::KmRcp, |c| Some(c.get(Capability::KmCategories)), rcp)
        .banked_table(
            TableId::KmCam,
            |c| c.product(Capability::KmCamBanks, Capability::KmCamRecords),
            |c| c.get(Capability::KmCamRecords),
            |t| {
                t.fields(Width::U32, &[CamW0, CamW1, CamW2, CamW3, CamW4, CamW5])
                    .fields(Width::U8, &[CamFt0, CamFt1, CamFt2, CamFt3, CamFt4, CamFt5])
            },
        )
        .banked_table(
            TableId::KmTcam,
            |c| c.get(Capability::KmTcamBanks).checked_mul(TCAM_BANK_ROWS),
            |_| TCAM_BANK_ROWS,
            |t| t.array(TcamT, Width::U32, 3),
        )
        .banked_table(
            TableId::KmTci,
            |c| c.product(Capability::KmTcamBanks, Capability::KmTcamBankWidth),
            |c| c.get(Capability::KmTcamBankWidth),
            |t| t.field(TciColor, Width::U32).field(TciFt, Width::U8),
        )
        .banked_table(
            TableId::KmTcq,
            |c| c.product(Capability::KmTcamBanks, Capability::KmTcamBankWidth),
            |c| c.get(Capability::KmTcamBankWidth),
            |t| t.fields(Width::U32, &[TcqBankMask, TcqQual]),
        )
        .function(RcpPresetAll, TableId::KmRcp, FunctionOp::PresetAll)
        .function(CamPresetAll, TableId::KmCam, FunctionOp::PresetAll)
        .function(TcamBankReset, TableId::KmTcam, FunctionOp::BankReset)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::Capacities;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_banked_dimensions() {
        let caps: Capacities = [
            (Capability::KmCamBanks, 3),
            (Capability::KmCamRecords, 2048),
            (Capability::KmTcamBanks, 12),
            (Capability::KmTcamBankWidth, 72),
        ]
        .into_iter()
        .collect();

        let cam = V7.table(TableId::KmCam).unwrap();
        assert_eq!(cam.rows(&caps), Some(3 * 2048));
        assert_eq!(cam.bank_rows(&caps), Some(2048));
        assert_eq!(cam.entry_size, 32);
        assert_eq!(cam.padding(), vec![30, 31]);

        let tcam = V7.table(TableId::KmTcam).unwrap();
        assert_eq!(tcam.rows(&caps), Some(12 * 1024));
        assert_eq!(tcam.bank_rows(&caps), Some(1024));

        let rcp = V7.table(TableId::KmRcp).unwrap();
        assert_eq!(rcp.bank_rows(&caps), None);
        assert!(rcp.padding().is_empty());
    }

    #[test]
    fn test_overflowing_dimensions() {
        let caps: Capacities = [
            (Capability::KmCamBanks, 0x10000),
            (Capability::KmCamRecords, 0x10000),
            (Capability::KmTcamBanks, 0x40_0000),
        ]
        .into_iter()
        .collect();

        let cam = V7.table(TableId::KmCam).unwrap();
        assert_eq!(cam.rows(&caps), None);
        assert_eq!(cam.bank_rows(&caps), Some(0x10000));
        assert_eq!(V7.table(TableId::KmTcam).unwrap().rows(&caps), None);
    }
}
