//! # Schedule Subcommand
//!
//! Prints the installment preview for a total under a payment-term policy.
//! The policy comes from a JSON file, from the configuration service by
//! id, or from the `--fixed-days` / `--installments` shorthands. With no
//! policy, or an unknown id, the schedule is empty.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Args;
use fisco_core::{Installment, PaymentTermPolicy};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::{read_json, to_pretty_json};

/// Arguments for the `fisco schedule` subcommand.
#[derive(Args, Debug)]
pub struct ScheduleArgs {
    /// Document total to split.
    #[arg(long, allow_hyphen_values = true)]
    pub total: Decimal,

    /// Emission date (YYYY-MM-DD).
    #[arg(long)]
    pub emission: NaiveDate,

    /// JSON file holding a payment-term policy.
    #[arg(long, conflicts_with_all = ["payment_term", "fixed_days", "installments"])]
    pub policy: Option<PathBuf>,

    /// Payment-term id to fetch from the configuration service.
    #[arg(long, conflicts_with_all = ["fixed_days", "installments"])]
    pub payment_term: Option<String>,

    /// Single installment due this many days after emission.
    #[arg(long, conflicts_with = "installments")]
    pub fixed_days: Option<u32>,

    /// Number of equal installments.
    #[arg(long)]
    pub installments: Option<u32>,

    /// Days between equal installments.
    #[arg(long, default_value_t = 30)]
    pub interval_days: u32,
}

/// Installments plus the amount rounding left unallocated.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleReport {
    pub installments: Vec<Installment>,
    pub remainder: Decimal,
}

/// The policy selected by the arguments, if any.
pub fn policy_from_args(args: &ScheduleArgs) -> Result<Option<PaymentTermPolicy>> {
    if let Some(path) = &args.policy {
        return read_json(path).map(Some);
    }
    if let Some(id) = &args.payment_term {
        let (client, _) = crate::connect()?;
        let policy = crate::runtime()?
            .block_on(client.payment_terms().get_policy(id))
            .with_context(|| format!("failed to fetch payment term {id}"))?;
        if policy.is_none() {
            tracing::warn!(payment_term = %id, "payment term not found");
        }
        return Ok(policy);
    }
    if let Some(days) = args.fixed_days {
        return Ok(Some(PaymentTermPolicy::FixedTerm { days }));
    }
    Ok(args.installments.map(|count| PaymentTermPolicy::EqualInstallments {
        count,
        interval_days: args.interval_days,
    }))
}

/// Build the schedule report for the arguments.
pub fn build_report(args: &ScheduleArgs) -> Result<ScheduleReport> {
    let policy = policy_from_args(args)?;
    if policy.is_none() {
        tracing::info!("no payment term given; schedule is empty");
    }
    let installments = fisco_engine::schedule(args.total, args.emission, policy.as_ref());
    let remainder = if installments.is_empty() {
        Decimal::ZERO
    } else {
        fisco_engine::schedule_remainder(args.total, &installments)
    };
    Ok(ScheduleReport {
        installments,
        remainder,
    })
}

/// Execute the schedule subcommand.
pub fn run_schedule(args: &ScheduleArgs) -> Result<u8> {
    let report = build_report(args)?;
    println!("{}", to_pretty_json(&report)?);
    Ok(0)
}
