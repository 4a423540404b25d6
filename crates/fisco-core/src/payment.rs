//! # Payment Terms
//!
//! A [`PaymentTermPolicy`] is configured externally and read by the
//! installment scheduler. The wire form is internally tagged on `mode`:
//!
//! ```json
//! { "mode": "fixedTerm", "days": 28 }
//! { "mode": "equalInstallments", "count": 3, "intervalDays": 30 }
//! { "mode": "customSchedule", "entries": [{ "sequence": 1, "dayOffset": 0, "percent": 50 }] }
//! ```

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One declared row of a custom schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    /// Sequence number printed on the installment.
    pub sequence: u32,
    /// Days after emission.
    pub day_offset: u32,
    /// Share of the total, in percent.
    pub percent: Decimal,
}

/// How a document total is split into installments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum PaymentTermPolicy {
    /// One installment due `days` after emission.
    FixedTerm {
        /// Days after emission.
        days: u32,
    },
    /// `count` equal installments spaced `interval_days` apart, the first
    /// due on the emission date.
    #[serde(rename_all = "camelCase")]
    EqualInstallments {
        /// Number of installments.
        count: u32,
        /// Days between consecutive installments.
        interval_days: u32,
    },
    /// Explicit rows, emitted in declaration order.
    CustomSchedule {
        /// Declared rows.
        entries: Vec<ScheduleEntry>,
    },
}

/// One dated payment obligation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Installment {
    /// Sequence number (1-based for generated schedules).
    pub sequence_number: u32,
    /// Due date.
    pub due_date: NaiveDate,
    /// Amount due, rounded to cents.
    pub amount: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn policies_deserialize_from_tagged_json() {
        let fixed: PaymentTermPolicy =
            serde_json::from_str(r#"{"mode":"fixedTerm","days":28}"#).unwrap();
        assert_eq!(fixed, PaymentTermPolicy::FixedTerm { days: 28 });

        let equal: PaymentTermPolicy =
            serde_json::from_str(r#"{"mode":"equalInstallments","count":3,"intervalDays":30}"#)
                .unwrap();
        assert_eq!(
            equal,
            PaymentTermPolicy::EqualInstallments { count: 3, interval_days: 30 }
        );

        let custom: PaymentTermPolicy = serde_json::from_str(
            r#"{"mode":"customSchedule","entries":[{"sequence":2,"dayOffset":30,"percent":40}]}"#,
        )
        .unwrap();
        match custom {
            PaymentTermPolicy::CustomSchedule { entries } => {
                assert_eq!(entries[0].sequence, 2);
                assert_eq!(entries[0].day_offset, 30);
                assert_eq!(entries[0].percent, dec!(40));
            }
            other => panic!("unexpected policy {other:?}"),
        }
    }

    #[test]
    fn unknown_mode_is_rejected() {
        assert!(serde_json::from_str::<PaymentTermPolicy>(r#"{"mode":"barter"}"#).is_err());
    }

    #[test]
    fn installment_serializes_camel_case() {
        let inst = Installment {
            sequence_number: 1,
            due_date: NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
            amount: dec!(33.33),
        };
        let json = serde_json::to_value(&inst).unwrap();
        assert_eq!(json["sequenceNumber"], 1);
        assert_eq!(json["dueDate"], "2026-01-31");
    }
}
