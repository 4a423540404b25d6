//! # Monetary Arithmetic
//!
//! Two primitives shared by the installment scheduler and the price rule
//! engine: percentage-of-amount and two-place half-up rounding.
//!
//! Arithmetic saturates instead of panicking on overflow. Amounts near
//! `Decimal::MAX` are not meaningful money, but a saturated value is still
//! a value, and none of the computations here are allowed to abort.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places monetary amounts are rounded to.
pub const MONEY_DECIMAL_PLACES: u32 = 2;

/// Round to two decimal places, half-up (midpoint away from zero).
///
/// `0.005` rounds to `0.01`, `33.333...` rounds to `33.33`.
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// `amount * percent / 100`, unrounded.
pub fn percent_of(amount: Decimal, percent: Decimal) -> Decimal {
    amount.saturating_mul(percent) / Decimal::ONE_HUNDRED
}

/// Clamp negative values to zero.
pub fn non_negative(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}
