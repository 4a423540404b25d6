//! # Fiscal Documents
//!
//! Quotes, sales orders, and invoices share one shape: a header, a list of
//! [`LineItem`]s, and derived [`Totals`]. The [`DocumentKind`] tag is the
//! only difference the engine sees.
//!
//! ## Totals Invariant
//!
//! ```text
//! productsTotal = Σ(quantity_i × unitPrice_i) − Σ discountAmount_i
//! grandTotal    = productsTotal + taxesTotal + otherExpenses
//!                 + (includeFreightInTotal ? freightAmount : 0)
//! ```
//!
//! `grandTotal` is always produced by [`Totals::compose`], whether the
//! other three figures come from the local line items or from the tax
//! engine. Negative quantities count as zero.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::identity::{ClientId, OperationNatureId};
use crate::jurisdiction::JurisdictionCode;
use crate::money::non_negative;

/// Which screen a document belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DocumentKind {
    /// Sales quote.
    Quote,
    /// Confirmed sales order.
    SalesOrder,
    /// Invoice (NF-e).
    Invoice,
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Quote => write!(f, "quote"),
            Self::SalesOrder => write!(f, "sales order"),
            Self::Invoice => write!(f, "invoice"),
        }
    }
}

/// Header fields that drive configuration resolution and calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentHeader {
    /// Operation nature of the document.
    pub operation_nature_id: OperationNatureId,
    /// Issuing company's state.
    pub origin_jurisdiction: JurisdictionCode,
    /// Client's state.
    pub destination_jurisdiction: JurisdictionCode,
    /// Client the document is addressed to.
    pub client_id: ClientId,
    /// Emission date; installment due dates count from here.
    pub emission_date: NaiveDate,
    /// Freight charged on the document.
    #[serde(default)]
    pub freight_amount: Decimal,
    /// Other accessory expenses.
    #[serde(default)]
    pub other_expenses: Decimal,
    /// Whether freight is added to the grand total.
    #[serde(default)]
    pub include_freight_in_total: bool,
}

/// Per-line situation code overrides. `None` means "use the configuration".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SituationOverrides {
    /// ICMS situation code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icms_situation: Option<String>,
    /// IPI situation code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipi_situation: Option<String>,
    /// PIS situation code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pis_situation: Option<String>,
    /// COFINS situation code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cofins_situation: Option<String>,
    /// Fiscal benefit code, when the state grants one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fiscal_benefit_code: Option<String>,
}

/// Base, rate, and value of one computed tax on one line.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxAmount {
    /// Calculation base.
    pub base: Decimal,
    /// Rate in percent; absent for ICMS-ST.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<Decimal>,
    /// Tax value.
    pub value: Decimal,
}

/// Computed taxes of a line. All `None` until the first calculation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineTaxes {
    /// ICMS.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icms: Option<TaxAmount>,
    /// ICMS-ST.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icms_st: Option<TaxAmount>,
    /// IPI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipi: Option<TaxAmount>,
    /// PIS.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pis: Option<TaxAmount>,
    /// COFINS.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cofins: Option<TaxAmount>,
}

impl LineTaxes {
    /// Whether no tax has been computed for the line.
    pub fn is_empty(&self) -> bool {
        self.components().next().is_none()
    }

    /// Sum of all computed tax values on the line.
    pub fn total(&self) -> Decimal {
        self.components().map(|t| t.value).sum()
    }

    fn components(&self) -> impl Iterator<Item = &TaxAmount> {
        [&self.icms, &self.icms_st, &self.ipi, &self.pis, &self.cofins]
            .into_iter()
            .flatten()
    }
}

/// One product line of a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Product code.
    pub code: String,
    /// Product description.
    pub name: String,
    /// Unit of measure.
    pub unit: String,
    /// Quantity; negative values count as zero.
    pub quantity: Decimal,
    /// Unit price.
    pub unit_price: Decimal,
    /// Line discount.
    #[serde(default)]
    pub discount_amount: Decimal,
    /// Situation overrides for this line.
    #[serde(default)]
    pub overrides: SituationOverrides,
    /// Taxes from the last successful calculation.
    #[serde(default)]
    pub taxes: LineTaxes,
}

impl LineItem {
    /// A line with no discount, overrides, or computed taxes.
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        unit: impl Into<String>,
        quantity: Decimal,
        unit_price: Decimal,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            unit: unit.into(),
            quantity,
            unit_price,
            discount_amount: Decimal::ZERO,
            overrides: SituationOverrides::default(),
            taxes: LineTaxes::default(),
        }
    }

    /// Quantity clamped at zero.
    pub fn effective_quantity(&self) -> Decimal {
        non_negative(self.quantity)
    }

    /// `quantity × unitPrice`, before discount.
    pub fn gross_amount(&self) -> Decimal {
        self.effective_quantity().saturating_mul(self.unit_price)
    }
}

/// Derived document totals.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    /// Products net of discounts.
    pub products_total: Decimal,
    /// Sum of line discounts.
    pub discounts_total: Decimal,
    /// Sum of taxes.
    pub taxes_total: Decimal,
    /// Amount due.
    pub grand_total: Decimal,
}

impl Totals {
    /// Build totals, deriving the grand total from the header.
    pub fn compose(
        products_total: Decimal,
        discounts_total: Decimal,
        taxes_total: Decimal,
        header: &DocumentHeader,
    ) -> Self {
        let freight = if header.include_freight_in_total {
            header.freight_amount
        } else {
            Decimal::ZERO
        };
        let grand_total = products_total
            .saturating_add(taxes_total)
            .saturating_add(header.other_expenses)
            .saturating_add(freight);
        Self {
            products_total,
            discounts_total,
            taxes_total,
            grand_total,
        }
    }
}

/// A quote, sales order, or invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FiscalDocument {
    /// Document variant.
    pub kind: DocumentKind,
    /// Header fields.
    pub header: DocumentHeader,
    /// Product lines.
    #[serde(default)]
    pub items: Vec<LineItem>,
    /// Derived totals.
    #[serde(default)]
    pub totals: Totals,
    /// Wall-clock time of the last successful tax calculation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calculated_at: Option<DateTime<Utc>>,
}

impl FiscalDocument {
    /// An empty document with zero totals.
    pub fn new(kind: DocumentKind, header: DocumentHeader) -> Self {
        let totals = Totals::compose(Decimal::ZERO, Decimal::ZERO, Decimal::ZERO, &header);
        Self {
            kind,
            header,
            items: Vec::new(),
            totals,
            calculated_at: None,
        }
    }

    /// Whether the document has at least one line.
    pub fn has_items(&self) -> bool {
        !self.items.is_empty()
    }

    /// Totals derived from the current lines and header, keeping the last
    /// known taxes total.
    pub fn derive_totals(&self) -> Totals {
        let gross: Decimal = self.items.iter().map(LineItem::gross_amount).sum();
        let discounts: Decimal = self.items.iter().map(|i| i.discount_amount).sum();
        Totals::compose(
            gross.saturating_sub(discounts),
            discounts,
            self.totals.taxes_total,
            &self.header,
        )
    }

    /// Recompute totals after a local edit (line, freight, expenses).
    pub fn refresh_totals(&mut self) {
        self.totals = self.derive_totals();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn header() -> DocumentHeader {
        DocumentHeader {
            operation_nature_id: OperationNatureId::new("venda").unwrap(),
            origin_jurisdiction: JurisdictionCode::new("SP").unwrap(),
            destination_jurisdiction: JurisdictionCode::new("RJ").unwrap(),
            client_id: ClientId::new("cli-1").unwrap(),
            emission_date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            freight_amount: dec!(50),
            other_expenses: dec!(10),
            include_freight_in_total: true,
        }
    }

    fn document() -> FiscalDocument {
        let mut doc = FiscalDocument::new(DocumentKind::SalesOrder, header());
        let mut a = LineItem::new("P1", "Parafuso", "UN", dec!(10), dec!(2.50));
        a.discount_amount = dec!(5);
        doc.items.push(a);
        doc.items.push(LineItem::new("P2", "Porca", "UN", dec!(4), dec!(1.25)));
        doc
    }

    #[test]
    fn derive_totals_follows_invariant() {
        let doc = document();
        let totals = doc.derive_totals();
        // 25.00 + 5.00 - 5.00
        assert_eq!(totals.products_total, dec!(25));
        assert_eq!(totals.discounts_total, dec!(5));
        assert_eq!(totals.taxes_total, dec!(0));
        assert_eq!(totals.grand_total, dec!(85));
    }

    #[test]
    fn freight_excluded_when_flag_off() {
        let mut doc = document();
        doc.header.include_freight_in_total = false;
        doc.refresh_totals();
        assert_eq!(doc.totals.grand_total, dec!(35));
    }

    #[test]
    fn refresh_keeps_taxes_total() {
        let mut doc = document();
        doc.totals.taxes_total = dec!(4.50);
        doc.refresh_totals();
        assert_eq!(doc.totals.taxes_total, dec!(4.50));
        assert_eq!(doc.totals.grand_total, dec!(89.50));
    }

    #[test]
    fn negative_quantity_counts_as_zero() {
        let mut doc = document();
        doc.items[1].quantity = dec!(-3);
        assert_eq!(doc.items[1].gross_amount(), Decimal::ZERO);
        assert_eq!(doc.derive_totals().products_total, dec!(20));
    }

    #[test]
    fn new_document_totals_include_header_amounts() {
        let doc = FiscalDocument::new(DocumentKind::Quote, header());
        assert!(!doc.has_items());
        assert_eq!(doc.totals.grand_total, dec!(60));
    }

    #[test]
    fn line_taxes_total_and_emptiness() {
        let mut taxes = LineTaxes::default();
        assert!(taxes.is_empty());
        taxes.icms = Some(TaxAmount { base: dec!(100), rate: Some(dec!(12)), value: dec!(12) });
        taxes.icms_st = Some(TaxAmount { base: dec!(140), rate: None, value: dec!(4.80) });
        assert!(!taxes.is_empty());
        assert_eq!(taxes.total(), dec!(16.80));
    }

    #[test]
    fn document_roundtrips_wire_names() {
        let json = serde_json::to_value(document()).unwrap();
        assert_eq!(json["kind"], "salesOrder");
        assert_eq!(json["header"]["includeFreightInTotal"], true);
        assert!(json["items"][0]["unitPrice"].is_number());
        assert!(json.get("calculatedAt").is_none());
    }
}
