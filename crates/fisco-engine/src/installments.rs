//! # Installment Scheduling
//!
//! Splits a document total into dated installments according to a
//! [`PaymentTermPolicy`]. Pure and synchronous; the output is a preview
//! rebuilt on every call, never document state.
//!
//! Equal installments are each rounded independently, so their sum may
//! differ from the total by a few cents. That difference is not folded
//! into any installment; [`schedule_remainder`] reports it.

use chrono::{Days, NaiveDate};
use fisco_core::money::{percent_of, round2};
use fisco_core::{Installment, PaymentTermPolicy, ScheduleEntry};
use rust_decimal::Decimal;

/// Largest equal-installment count a policy may ask for. A policy above it
/// is treated as corrupt and schedules nothing.
pub const MAX_INSTALLMENTS: u32 = 360;

/// Build the installment schedule for `total` emitted on `emission_date`.
///
/// A non-positive total or a missing policy yields an empty schedule.
pub fn schedule(
    total: Decimal,
    emission_date: NaiveDate,
    policy: Option<&PaymentTermPolicy>,
) -> Vec<Installment> {
    let Some(policy) = policy else {
        return Vec::new();
    };
    if total <= Decimal::ZERO {
        return Vec::new();
    }

    match policy {
        PaymentTermPolicy::FixedTerm { days } => due_after(emission_date, u64::from(*days))
            .map(|due_date| Installment {
                sequence_number: 1,
                due_date,
                amount: total,
            })
            .into_iter()
            .collect(),

        PaymentTermPolicy::EqualInstallments {
            count,
            interval_days,
        } => {
            if *count == 0 {
                return Vec::new();
            }
            if *count > MAX_INSTALLMENTS {
                tracing::warn!(
                    count,
                    max = MAX_INSTALLMENTS,
                    "installment count exceeds limit; schedule is empty"
                );
                return Vec::new();
            }
            let amount = round2(total / Decimal::from(*count));
            (0..*count)
                .filter_map(|i| {
                    let offset = u64::from(i) * u64::from(*interval_days);
                    due_after(emission_date, offset).map(|due_date| Installment {
                        sequence_number: i + 1,
                        due_date,
                        amount,
                    })
                })
                .collect()
        }

        PaymentTermPolicy::CustomSchedule { entries } => entries
            .iter()
            .filter_map(|entry: &ScheduleEntry| {
                due_after(emission_date, u64::from(entry.day_offset)).map(|due_date| Installment {
                    sequence_number: entry.sequence,
                    due_date,
                    amount: round2(percent_of(total, entry.percent)),
                })
            })
            .collect(),
    }
}

/// `total` minus the sum of the scheduled amounts.
///
/// Positive when rounding left cents unallocated, negative when a custom
/// schedule allocates more than the total.
pub fn schedule_remainder(total: Decimal, installments: &[Installment]) -> Decimal {
    let allocated = installments
        .iter()
        .fold(Decimal::ZERO, |acc, i| acc.saturating_add(i.amount));
    total.saturating_sub(allocated)
}

fn due_after(emission_date: NaiveDate, days: u64) -> Option<NaiveDate> {
    let due = emission_date.checked_add_days(Days::new(days));
    if due.is_none() {
        tracing::warn!(%emission_date, days, "due date out of range; installment skipped");
    }
    due
}
