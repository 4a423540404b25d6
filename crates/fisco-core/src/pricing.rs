//! # Price Adjustment Rules
//!
//! A [`PriceAdjustmentRule`] moves a product's list price away from its
//! base price, either by a percentage or by an absolute amount. Results
//! are not rounded; presentation layers format them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::identity::ProductId;
use crate::money::percent_of;

/// How a rule's value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AdjustmentKind {
    /// `base × (1 + value / 100)`.
    Percent,
    /// `base + value`.
    Absolute,
}

/// An adjustment applied to a product's base price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceAdjustmentRule {
    /// Interpretation of `value`.
    pub kind: AdjustmentKind,
    /// Percentage points or currency amount; negative values discount.
    pub value: Decimal,
}

impl PriceAdjustmentRule {
    /// A percentage rule.
    pub fn percent(value: Decimal) -> Self {
        Self {
            kind: AdjustmentKind::Percent,
            value,
        }
    }

    /// An absolute rule.
    pub fn absolute(value: Decimal) -> Self {
        Self {
            kind: AdjustmentKind::Absolute,
            value,
        }
    }

    /// The adjusted price for `base_price`.
    pub fn apply(&self, base_price: Decimal) -> Decimal {
        match self.kind {
            AdjustmentKind::Percent => {
                base_price.saturating_add(percent_of(base_price, self.value))
            }
            AdjustmentKind::Absolute => base_price.saturating_add(self.value),
        }
    }
}

/// A product selected on the price-list screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricedItem {
    /// Product identifier.
    pub id: ProductId,
    /// Catalog base price.
    pub base_price: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn percent_rule() {
        assert_eq!(PriceAdjustmentRule::percent(dec!(10)).apply(dec!(200)), dec!(220));
        assert_eq!(PriceAdjustmentRule::percent(dec!(-25)).apply(dec!(80)), dec!(60));
    }

    #[test]
    fn absolute_rule() {
        assert_eq!(PriceAdjustmentRule::absolute(dec!(5.5)).apply(dec!(10)), dec!(15.5));
        assert_eq!(PriceAdjustmentRule::absolute(dec!(-12)).apply(dec!(10)), dec!(-2));
    }

    #[test]
    fn percent_rule_is_not_rounded() {
        let adjusted = PriceAdjustmentRule::percent(dec!(3.333)).apply(dec!(9.99));
        assert_eq!(adjusted, dec!(9.99) + dec!(9.99) * dec!(3.333) / dec!(100));
        assert!(adjusted.scale() > 2);
    }

    #[test]
    fn rule_wire_format() {
        let rule: PriceAdjustmentRule =
            serde_json::from_str(r#"{"kind":"percent","value":12.5}"#).unwrap();
        assert_eq!(rule, PriceAdjustmentRule::percent(dec!(12.5)));
    }
}
