//! # Jurisdiction Tax Configuration
//!
//! A [`JurisdictionConfig`] is the per-(operation nature, state) block of
//! tax regimes returned by the fiscal configuration service. Rates and
//! situation codes are opaque data here: the engine selects a row and
//! forwards its situation codes, it never interprets the rates.
//!
//! Rows are served with camelCase field names; every regime block is
//! optional because services omit taxes that do not apply (ISS on goods,
//! IPI outside manufacturing, ...).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::identity::OperationNatureId;
use crate::jurisdiction::JurisdictionCode;
use crate::nature::{Cfop, OperationNature};

/// The tax types a configuration row can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaxType {
    /// State VAT on goods circulation.
    Icms,
    /// ICMS collected in advance by substitution.
    IcmsSt,
    /// Federal excise on manufactured goods.
    Ipi,
    /// Federal social contribution (PIS).
    Pis,
    /// Federal social contribution (COFINS).
    Cofins,
    /// Municipal service tax.
    Iss,
}

impl TaxType {
    /// All tax types, in display order.
    pub const ALL: [TaxType; 6] = [
        TaxType::Icms,
        TaxType::IcmsSt,
        TaxType::Ipi,
        TaxType::Pis,
        TaxType::Cofins,
        TaxType::Iss,
    ];
}

impl std::fmt::Display for TaxType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Icms => write!(f, "ICMS"),
            Self::IcmsSt => write!(f, "ICMS-ST"),
            Self::Ipi => write!(f, "IPI"),
            Self::Pis => write!(f, "PIS"),
            Self::Cofins => write!(f, "COFINS"),
            Self::Iss => write!(f, "ISS"),
        }
    }
}

/// Regime parameters for one tax type.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxRegime {
    /// Situation code (CST/CSOSN) forwarded to the tax engine.
    #[serde(default)]
    pub situation_code: Option<String>,
    /// Nominal rate, in percent.
    #[serde(default)]
    pub rate: Decimal,
    /// Base reduction, in percent.
    #[serde(default)]
    pub base_reduction_percent: Decimal,
    /// Whether freight is part of the tax base.
    #[serde(default)]
    pub include_freight_in_base: bool,
    /// Whether the tax is withheld by the buyer.
    #[serde(default)]
    pub is_retained: bool,
    /// Withholding percentage when `is_retained`.
    #[serde(default)]
    pub retained_percent: Decimal,
}

/// Tax configuration for one (operation nature, jurisdiction) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JurisdictionConfig {
    /// Operation nature this row belongs to.
    pub operation_nature_id: OperationNatureId,
    /// State the row applies to.
    pub jurisdiction_code: JurisdictionCode,
    /// Disabled rows are only eligible as a last-resort fallback.
    #[serde(default)]
    pub enabled: bool,
    /// CFOP replacing the nature's default for this state.
    #[serde(default)]
    pub cfop_override: Option<Cfop>,
    /// ICMS regime.
    #[serde(default)]
    pub icms: Option<TaxRegime>,
    /// ICMS-ST regime.
    #[serde(default)]
    pub icms_st: Option<TaxRegime>,
    /// IPI regime.
    #[serde(default)]
    pub ipi: Option<TaxRegime>,
    /// PIS regime.
    #[serde(default)]
    pub pis: Option<TaxRegime>,
    /// COFINS regime.
    #[serde(default)]
    pub cofins: Option<TaxRegime>,
    /// ISS regime.
    #[serde(default)]
    pub iss: Option<TaxRegime>,
}

impl JurisdictionConfig {
    /// An enabled row with no regimes, for building configurations in code.
    pub fn new(operation_nature_id: OperationNatureId, jurisdiction_code: JurisdictionCode) -> Self {
        Self {
            operation_nature_id,
            jurisdiction_code,
            enabled: true,
            cfop_override: None,
            icms: None,
            icms_st: None,
            ipi: None,
            pis: None,
            cofins: None,
            iss: None,
        }
    }

    /// The regime block for a tax type, if configured.
    pub fn regime(&self, tax: TaxType) -> Option<&TaxRegime> {
        match tax {
            TaxType::Icms => self.icms.as_ref(),
            TaxType::IcmsSt => self.icms_st.as_ref(),
            TaxType::Ipi => self.ipi.as_ref(),
            TaxType::Pis => self.pis.as_ref(),
            TaxType::Cofins => self.cofins.as_ref(),
            TaxType::Iss => self.iss.as_ref(),
        }
    }

    /// Mutable access to a regime slot.
    pub fn regime_mut(&mut self, tax: TaxType) -> &mut Option<TaxRegime> {
        match tax {
            TaxType::Icms => &mut self.icms,
            TaxType::IcmsSt => &mut self.icms_st,
            TaxType::Ipi => &mut self.ipi,
            TaxType::Pis => &mut self.pis,
            TaxType::Cofins => &mut self.cofins,
            TaxType::Iss => &mut self.iss,
        }
    }

    /// The configured situation code for a tax type.
    pub fn situation_code(&self, tax: TaxType) -> Option<&str> {
        self.regime(tax).and_then(|r| r.situation_code.as_deref())
    }

    /// The CFOP to print on the document: the row's override when present,
    /// otherwise the nature's default.
    pub fn effective_cfop(&self, nature: &OperationNature) -> Cfop {
        self.cfop_override
            .clone()
            .unwrap_or_else(|| nature.default_cfop.clone())
    }
}
