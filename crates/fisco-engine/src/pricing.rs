//! # Price Rule Engine
//!
//! Applies [`PriceAdjustmentRule`]s to price-list selections and keeps a
//! per-product ledger of the rule each product currently carries, so a
//! later screen can show why a list price differs from its base price.
//! Applying again to a product replaces its ledger entry; resetting removes
//! it. Prices are never rounded here.

use std::collections::BTreeMap;

use fisco_core::{PriceAdjustmentRule, PricedItem, ProductId};
use rust_decimal::Decimal;

/// Ledger entry for one adjusted product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedRule {
    /// The rule in effect.
    pub rule: PriceAdjustmentRule,
    /// Base price the rule was applied to.
    pub base_price: Decimal,
    /// Resulting list price.
    pub adjusted_price: Decimal,
}

/// Price adjustment engine with its applied-rule ledger.
#[derive(Debug, Clone, Default)]
pub struct PriceRuleEngine {
    ledger: BTreeMap<ProductId, AppliedRule>,
}

impl PriceRuleEngine {
    /// An engine with an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adjusted price for a single base price. Does not touch the ledger.
    pub fn apply(base_price: Decimal, rule: &PriceAdjustmentRule) -> Decimal {
        rule.apply(base_price)
    }

    /// Apply `rule` to every item independently and record it per item.
    pub fn apply_to_set(
        &mut self,
        items: &[PricedItem],
        rule: &PriceAdjustmentRule,
    ) -> BTreeMap<ProductId, Decimal> {
        items
            .iter()
            .map(|item| {
                let adjusted_price = Self::apply(item.base_price, rule);
                self.ledger.insert(
                    item.id.clone(),
                    AppliedRule {
                        rule: *rule,
                        base_price: item.base_price,
                        adjusted_price,
                    },
                );
                (item.id.clone(), adjusted_price)
            })
            .collect()
    }

    /// Drop the ledger entries for `items` and return their base prices.
    pub fn reset(&mut self, items: &[PricedItem]) -> BTreeMap<ProductId, Decimal> {
        items
            .iter()
            .map(|item| {
                self.ledger.remove(&item.id);
                (item.id.clone(), item.base_price)
            })
            .collect()
    }

    /// The rule currently recorded for `id`.
    pub fn rule_for(&self, id: &ProductId) -> Option<&AppliedRule> {
        self.ledger.get(id)
    }

    /// All products carrying a rule, ordered by product id.
    pub fn adjusted_items(&self) -> impl Iterator<Item = (&ProductId, &AppliedRule)> {
        self.ledger.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn item(id: &str, base: Decimal) -> PricedItem {
        PricedItem {
            id: ProductId::new(id).unwrap(),
            base_price: base,
        }
    }

    fn pid(id: &str) -> ProductId {
        ProductId::new(id).unwrap()
    }

    #[test]
    fn apply_single_price() {
        let rule = PriceAdjustmentRule::percent(dec!(10));
        assert_eq!(PriceRuleEngine::apply(dec!(50), &rule), dec!(55));
        let rule = PriceAdjustmentRule::absolute(dec!(-2.5));
        assert_eq!(PriceRuleEngine::apply(dec!(50), &rule), dec!(47.5));
    }

    #[test]
    fn apply_to_set_records_each_item() {
        let mut engine = PriceRuleEngine::new();
        let items = [item("A", dec!(10)), item("B", dec!(20))];
        let rule = PriceAdjustmentRule::percent(dec!(15));

        let prices = engine.apply_to_set(&items, &rule);
        assert_eq!(prices[&pid("A")], dec!(11.5));
        assert_eq!(prices[&pid("B")], dec!(23));

        let recorded = engine.rule_for(&pid("B")).unwrap();
        assert_eq!(recorded.rule, rule);
        assert_eq!(recorded.base_price, dec!(20));
        assert_eq!(engine.adjusted_items().count(), 2);
    }

    #[test]
    fn reapply_replaces_previous_rule() {
        let mut engine = PriceRuleEngine::new();
        let items = [item("A", dec!(10))];
        engine.apply_to_set(&items, &PriceAdjustmentRule::percent(dec!(10)));
        let prices = engine.apply_to_set(&items, &PriceAdjustmentRule::absolute(dec!(1)));

        assert_eq!(prices[&pid("A")], dec!(11));
        assert_eq!(
            engine.rule_for(&pid("A")).unwrap().rule,
            PriceAdjustmentRule::absolute(dec!(1))
        );
    }

    #[test]
    fn reset_discards_only_given_items() {
        let mut engine = PriceRuleEngine::new();
        let items = [item("A", dec!(10)), item("B", dec!(20))];
        engine.apply_to_set(&items, &PriceAdjustmentRule::absolute(dec!(3)));

        let prices = engine.reset(&items[..1]);
        assert_eq!(prices.len(), 1);
        assert_eq!(prices[&pid("A")], dec!(10));
        assert!(engine.rule_for(&pid("A")).is_none());
        assert!(engine.rule_for(&pid("B")).is_some());
    }

    #[derive(Debug, Clone)]
    enum Op {
        Apply(Vec<usize>, PriceAdjustmentRule),
        Reset(Vec<usize>),
    }

    fn rule_strategy() -> impl Strategy<Value = PriceAdjustmentRule> {
        prop_oneof![
            (-100_00i64..500_00).prop_map(|v| PriceAdjustmentRule::percent(Decimal::new(v, 2))),
            (-1_000_00i64..1_000_00).prop_map(|v| PriceAdjustmentRule::absolute(Decimal::new(v, 2))),
        ]
    }

    fn op_strategy(n: usize) -> impl Strategy<Value = Op> {
        let picks = proptest::collection::vec(0..n, 0..=n);
        prop_oneof![
            (picks.clone(), rule_strategy()).prop_map(|(p, r)| Op::Apply(p, r)),
            picks.prop_map(Op::Reset),
        ]
    }

    proptest! {
        #[test]
        fn reset_restores_base_prices_after_any_interleaving(
            bases in proptest::collection::vec(0i64..1_000_000, 1..8),
            ops in proptest::collection::vec(op_strategy(8), 0..20),
        ) {
            let items: Vec<PricedItem> = bases
                .iter()
                .enumerate()
                .map(|(i, cents)| item(&format!("P{i}"), Decimal::new(*cents, 2)))
                .collect();
            let mut engine = PriceRuleEngine::new();

            for op in ops {
                let select = |picks: &[usize]| -> Vec<PricedItem> {
                    picks.iter().filter_map(|&i| items.get(i).cloned()).collect()
                };
                match op {
                    Op::Apply(picks, rule) => {
                        engine.apply_to_set(&select(&picks), &rule);
                    }
                    Op::Reset(picks) => {
                        engine.reset(&select(&picks));
                    }
                }
            }

            let restored = engine.reset(&items);
            for it in &items {
                prop_assert_eq!(restored[&it.id], it.base_price);
            }
            prop_assert_eq!(engine.adjusted_items().count(), 0);
        }
    }
}
