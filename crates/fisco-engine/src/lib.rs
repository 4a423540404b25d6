//! # fisco-engine: Fiscal Computation Engine
//!
//! Everything between a fiscal document and its taxes, totals, and payment
//! preview:
//!
//! - [`ConfigResolver`] picks the jurisdiction configuration for a
//!   document (destination, then origin, then first available).
//! - [`TaxOrchestrator`] builds the tax-engine request, bounds the call,
//!   and maps the response onto the document.
//! - [`CalculationSession`] sequences concurrent recomputes so the latest
//!   issued request wins.
//! - [`FiscalEngine`] wires the three together.
//! - [`installments::schedule`] and [`PriceRuleEngine`] are synchronous
//!   and have no upstream dependency.
//!
//! Upstream services are reached through the traits in [`source`], which
//! the `fisco-client` types implement.

pub mod engine;
pub mod error;
pub mod installments;
pub mod orchestrator;
pub mod pricing;
pub mod resolver;
pub mod session;
pub mod source;

pub use engine::{FiscalEngine, RecomputeOutcome};
pub use error::{EngineError, Severity};
pub use installments::{schedule, schedule_remainder, MAX_INSTALLMENTS};
pub use orchestrator::{
    build_request, CalculationResult, EngineSettings, TaxOrchestrator,
    DEFAULT_CALCULATION_TIMEOUT,
};
pub use pricing::{AppliedRule, PriceRuleEngine};
pub use resolver::{
    duplicated_jurisdictions, select_config, ConfigResolver, FallbackNotice, FallbackReason,
    Resolution,
};
pub use session::{CalculationSession, CalculationTicket, Completion};
pub use source::{JurisdictionConfigSource, PartnerDirectory, TaxEngine};
