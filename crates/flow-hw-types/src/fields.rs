//! Typed field identifiers, one enum per subsystem.
//!
//! The numeric values are part of the contract with the resource managers
//! above the cache: new identifiers are only ever appended.

use crate::field::define_fields;

define_fields! {
    /// Categorizer (CAT) identifiers.
    pub enum CatField for Cat {
        functions {
            CfnSetAllDefaults,
            CfnPresetAll,
            CfnCompare,
            CfnFind,
            CfnCopyFrom,
            CotPresetAll,
            CotCompare,
            CotFind,
            CotCopyFrom,
        }
        fields {
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
            CfnErrInv,
            CfnErrCv,
            CfnErrFcs,
            CfnErrTrunc,
            CfnErrL3Cs,
            CfnErrL4Cs,
            CfnMacPort,
            CfnPmCmp,
            CfnPmDct,
            CfnPmExtInv,
            CfnPmCmb,
            CfnPmAndInv,
            CfnPmOrInv,
            CfnPmInv,
            CfnLc,
            CfnLcInv,
            CfnKm0Or,
            CfnKm1Or,
            KceEnableBm,
            KcsCategory,
            FteEnableBm,
            CteEnableBm,
            CtsCatA,
            CtsCatB,
            CotColor,
            CotKm,
            CctColor,
            CctKm,
            KccKey,
            KccCategory,
            KccId,
            ExoDyn,
            ExoOfs,
            RckData,
            LenLower,
            LenUpper,
            LenDyn1,
            LenDyn2,
            LenInv,
            CfnErrTnlL3Cs,
            CfnErrTnlL4Cs,
            CfnErrTtlExp,
            CfnErrTnlTtlExp,
        }
    }
}

define_fields! {
    /// Key matcher (KM) identifiers.
    pub enum KmField for Km {
        functions {
            RcpPresetAll,
            CamPresetAll,
            TcamBankReset,
        }
        fields {
            RcpQw0Dyn,
            RcpQw0Ofs,
            RcpQw0SelA,
            RcpQw0SelB,
            RcpQw4Dyn,
            RcpQw4Ofs,
            RcpQw4SelA,
            RcpQw4SelB,
            RcpDw8Dyn,
            RcpDw8Ofs,
            RcpDw8SelA,
            RcpDw8SelB,
            RcpDw10Dyn,
            RcpDw10Ofs,
            RcpDw10SelA,
            RcpDw10SelB,
            RcpSwxCch,
            RcpSwxSelA,
            RcpSwxSelB,
            RcpMaskA,
            RcpMaskB,
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
            RcpDw0BDyn,
            RcpDw0BOfs,
            RcpDw2BDyn,
            RcpDw2BOfs,
            RcpSw4BDyn,
            RcpSw4BOfs,
            RcpSw5BDyn,
            RcpSw5BOfs,
            CamW0,
            CamW1,
            CamW2,
            CamW3,
            CamW4,
            CamW5,
            CamFt0,
            CamFt1,
            CamFt2,
            CamFt3,
            CamFt4,
            CamFt5,
            TcamT,
            TciColor,
            TciFt,
            TcqBankMask,
            TcqQual,
        }
    }
}

define_fields! {
    /// Flow learning manager (FLM) identifiers.
    pub enum FlmField for Flm {
        functions {
            ControlPresetAll,
            RcpPresetAll,
            ScrubPresetAll,
        }
        fields {
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
            StatusCalibSuccess,
            StatusCalibFail,
            StatusInitdone,
            StatusIdle,
            StatusCritical,
            StatusPanic,
            StatusCrcerr,
            StatusEftBp,
            StatusCacheBufCritical,
            ScanI,
            LoadBin,
            PrioLimit0,
            PrioFt0,
            PrioLimit1,
            PrioFt1,
            PrioLimit2,
            PrioFt2,
            PrioLimit3,
            PrioFt3,
            PstBp,
            PstPp,
            PstTp,
            RcpLookup,
            RcpQw0Dyn,
            RcpQw0Ofs,
            RcpQw0Sel,
            RcpQw4Dyn,
            RcpQw4Ofs,
            RcpSw8Dyn,
            RcpSw8Ofs,
            RcpSw8Sel,
            RcpSw9Dyn,
            RcpSw9Ofs,
            RcpMask,
            RcpKid,
            RcpOpn,
            RcpIpn,
            RcpBytDyn,
            RcpBytOfs,
            RcpTxplm,
            RcpAutoIpv4Mask,
            ScrubT,
            ScrubR,
            ScrubDel,
            ScrubInf,
        }
    }
}

define_fields! {
    /// Hasher (HSH) identifiers.
    pub enum HshField for Hsh {
        functions {
            RcpPresetAll,
            RcpCompare,
            RcpFind,
        }
        fields {
            RcpLoadDistType,
            RcpMacPortMask,
            RcpSort,
            RcpQw0Pe,
            RcpQw0Ofs,
            RcpQw4Pe,
            RcpQw4Ofs,
            RcpW8Pe,
            RcpW8Ofs,
            RcpW8Sort,
            RcpW9Pe,
            RcpW9Ofs,
            RcpW9Sort,
            RcpW9P,
            RcpPMask,
            RcpWordMask,
            RcpSeed,
            RcpTnlP,
            RcpHshValid,
            RcpHshType,
            RcpToeplitz,
            RcpK,
            RcpAutoIpv4Mask,
        }
    }
}

define_fields! {
    /// Queue selector (QSL) identifiers.
    pub enum QslField for Qsl {
        functions {
            RcpPresetAll,
            RcpCompare,
            RcpFind,
            QstPresetAll,
        }
        fields {
            RcpDiscard,
            RcpDrop,
            RcpTblLo,
            RcpTblHi,
            RcpTblIdx,
            RcpTblMsk,
            RcpLr,
            RcpTsa,
            RcpVli,
            QstQueue,
            QstEn,
            QstTxPort,
            QstLre,
            QstTci,
            QstVen,
            QenEn,
            UnmqDestQueue,
            UnmqEn,
        }
    }
}

define_fields! {
    /// Slicer (SLC LR) identifiers.
    pub enum SlcLrField for SlcLr {
        functions {
            RcpPresetAll,
            RcpCompare,
            RcpFind,
        }
        fields {
            RcpHeadSlcEn,
            RcpHeadDyn,
            RcpHeadOfs,
            RcpTailSlcEn,
            RcpTailDyn,
            RcpTailOfs,
            RcpPcap,
        }
    }
}

define_fields! {
    /// Packet descriptor builder (PDB) identifiers.
    pub enum PdbField for Pdb {
        functions {
            RcpPresetAll,
            RcpCompare,
            RcpFind,
        }
        fields {
            RcpDescriptor,
            RcpDescLen,
            RcpTxPort,
            RcpTxIgnore,
            RcpTxNow,
            RcpCrcOverwrite,
            RcpAlign,
            RcpOfs0Dyn,
            RcpOfs0Rel,
            RcpOfs1Dyn,
            RcpOfs1Rel,
            RcpOfs2Dyn,
            RcpOfs2Rel,
            RcpIpProtTnl,
            RcpPpcHsh,
            RcpDuplicateEn,
            RcpDuplicateBit,
            RcpPcapKeepFcs,
            ConfigTsFormat,
            ConfigPortOfs,
        }
    }
}

define_fields! {
    /// TX packet editor (TPE) identifiers.
    pub enum TpeField for Tpe {
        functions {
            RppRcpPresetAll,
            InsRcpPresetAll,
            RplRcpPresetAll,
            RplRcpCompare,
            RplRcpFind,
            RplRplCompare,
            RplRplFind,
            HfuRcpPresetAll,
            CsuRcpPresetAll,
        }
        fields {
            RppRcpExp,
            RppIfrRcpIpv4En,
            RppIfrRcpIpv4DfDrop,
            RppIfrRcpIpv6En,
            RppIfrRcpIpv6Drop,
            RppIfrRcpMtu,
            IfrRcpIpv4En,
            IfrRcpIpv4DfDrop,
            IfrRcpIpv6En,
            IfrRcpIpv6Drop,
            IfrRcpMtu,
            InsRcpDyn,
            InsRcpOfs,
            InsRcpLen,
            RplRcpDyn,
            RplRcpOfs,
            RplRcpLen,
            RplRcpRplPtr,
            RplRcpExtPrio,
            RplRcpEthTypeWr,
            RplExtRplPtr,
            RplExtMetaRplLen,
            RplRplValue,
            CpyRcpReaderSelect,
            CpyRcpDyn,
            CpyRcpOfs,
            CpyRcpLen,
            HfuRcpLenAWr,
            HfuRcpLenAOuterL4Len,
            HfuRcpLenAPosDyn,
            HfuRcpLenAPosOfs,
            HfuRcpLenAAddDyn,
            HfuRcpLenAAddOfs,
            HfuRcpLenASubDyn,
            HfuRcpLenBWr,
            HfuRcpLenBPosDyn,
            HfuRcpLenBPosOfs,
            HfuRcpLenBAddDyn,
            HfuRcpLenBAddOfs,
            HfuRcpLenBSubDyn,
            HfuRcpLenCWr,
            HfuRcpLenCPosDyn,
            HfuRcpLenCPosOfs,
            HfuRcpLenCAddDyn,
            HfuRcpLenCAddOfs,
            HfuRcpLenCSubDyn,
            HfuRcpTtlWr,
            HfuRcpTtlPosDyn,
            HfuRcpTtlPosOfs,
            CsuRcpOuterL3Cmd,
            CsuRcpOuterL4Cmd,
            CsuRcpInnerL3Cmd,
            CsuRcpInnerL4Cmd,
        }
    }
}
