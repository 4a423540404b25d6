//! # Price Subcommand
//!
//! Applies one adjustment rule to every product in a JSON file of
//! `{ id, basePrice }` entries, or resets them to their base prices, and
//! prints the resulting `id → price` map.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use fisco_core::{PriceAdjustmentRule, PricedItem, ProductId};
use fisco_engine::PriceRuleEngine;
use rust_decimal::Decimal;

use crate::{read_json, to_pretty_json};

/// Arguments for the `fisco price` subcommand.
#[derive(Args, Debug)]
pub struct PriceArgs {
    /// JSON file with the selected products.
    #[arg(long)]
    pub items: PathBuf,

    /// Percentage adjustment (negative discounts).
    #[arg(long, allow_hyphen_values = true, conflicts_with_all = ["absolute", "reset"])]
    pub percent: Option<Decimal>,

    /// Absolute adjustment added to each base price.
    #[arg(long, allow_hyphen_values = true, conflicts_with = "reset")]
    pub absolute: Option<Decimal>,

    /// Print base prices instead of applying a rule.
    #[arg(long)]
    pub reset: bool,
}

/// The rule selected by the arguments; `None` for a reset.
pub fn rule_from_args(args: &PriceArgs) -> Result<Option<PriceAdjustmentRule>> {
    match (args.percent, args.absolute, args.reset) {
        (Some(v), None, false) => Ok(Some(PriceAdjustmentRule::percent(v))),
        (None, Some(v), false) => Ok(Some(PriceAdjustmentRule::absolute(v))),
        (None, None, true) => Ok(None),
        _ => bail!("exactly one of --percent, --absolute, or --reset is required"),
    }
}

/// Compute the price map for the arguments.
pub fn compute_prices(args: &PriceArgs) -> Result<BTreeMap<ProductId, Decimal>> {
    let rule = rule_from_args(args)?;
    let items: Vec<PricedItem> = read_json(&args.items)?;
    let mut engine = PriceRuleEngine::new();

    Ok(match rule {
        Some(rule) => {
            let prices = engine.apply_to_set(&items, &rule);
            tracing::debug!(products = engine.adjusted_items().count(), "rule applied");
            prices
        }
        None => engine.reset(&items),
    })
}

/// Execute the price subcommand.
pub fn run_price(args: &PriceArgs) -> Result<u8> {
    let prices = compute_prices(args)?;
    println!("{}", to_pretty_json(&prices)?);
    Ok(0)
}
