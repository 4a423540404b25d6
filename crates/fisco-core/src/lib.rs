#![deny(missing_docs)]

//! # fisco-core: Foundational Types for the Fisco Engine
//!
//! This crate defines the types shared by every other crate in the
//! workspace. It has no internal crate dependencies, only `serde`,
//! `serde_json`, `thiserror`, `chrono`, and `rust_decimal` from the
//! external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** A [`JurisdictionCode`] is
//!    not a [`ClientId`], and a [`Cfop`] is validated at construction.
//!
//! 2. **Decimal money.** Every monetary amount is a [`rust_decimal::Decimal`].
//!    Rounding happens in exactly one place ([`money::round2`]) and only
//!    where a component requires it.
//!
//! 3. **Derived totals.** [`Totals`] are computed from the document's lines
//!    and header; callers never edit a total field directly.

pub mod document;
pub mod error;
pub mod identity;
pub mod jurisdiction;
pub mod money;
pub mod nature;
pub mod payment;
pub mod pricing;
pub mod regime;

// Re-export primary types at crate root for ergonomic imports.
pub use document::{
    DocumentHeader, DocumentKind, FiscalDocument, LineItem, LineTaxes, SituationOverrides,
    TaxAmount, Totals,
};
pub use error::ValidationError;
pub use identity::{ClientId, CompanyId, OperationNatureId, ProductId};
pub use jurisdiction::JurisdictionCode;
pub use nature::{Cfop, OperationNature};
pub use payment::{Installment, PaymentTermPolicy, ScheduleEntry};
pub use pricing::{AdjustmentKind, PriceAdjustmentRule, PricedItem};
pub use regime::{JurisdictionConfig, TaxRegime, TaxType};
