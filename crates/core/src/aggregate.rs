//! Pure folds from resolved order figures into running totals, keyed by a
//! caller-supplied grouping dimension.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::accounting::{resolve_order, round_money, OrderFigures};
use crate::domain::campaign::Campaign;
use crate::domain::customer::CustomerId;
use crate::domain::order::Order;

/// Running totals for one group.
///
/// Refund bookkeeping never double-counts: a fully refunded order adds its
/// original gross to `refund_amount`, a partially refunded order adds only
/// its partial amount, and an order is never both.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct GroupTotals {
    pub revenue: Decimal,
    pub profit: Decimal,
    pub refund_amount: Decimal,
    pub order_count: u64,
    pub partial_refund_orders: u64,
    pub full_refund_orders: u64,
    pub campaign_count: u64,
    #[serde(skip)]
    customers: HashSet<CustomerId>,
}

impl GroupTotals {
    pub fn record(&mut self, figures: &OrderFigures, customer: &CustomerId) {
        self.revenue = round_money(self.revenue + figures.revenue);
        self.profit = round_money(self.profit + figures.profit);

        if figures.is_full_refund {
            self.full_refund_orders += 1;
            self.refund_amount = round_money(self.refund_amount + figures.refund_contribution);
        } else if figures.has_partial_refund() {
            self.partial_refund_orders += 1;
            self.refund_amount = round_money(self.refund_amount + figures.refund_contribution);
        }

        if figures.counts_toward_volume {
            self.order_count += 1;
            self.customers.insert(customer.clone());
        }
    }

    /// Counts one campaign into the group, so groups exist (with zero order
    /// totals) even for campaigns that drew no orders in scope.
    pub fn record_campaign(&mut self) {
        self.campaign_count += 1;
    }

    /// Customers with at least one order counting toward volume. Customers
    /// whose only orders were fully refunded do not participate.
    pub fn unique_customers(&self) -> u64 {
        self.customers.len() as u64
    }

    pub fn customers(&self) -> &HashSet<CustomerId> {
        &self.customers
    }

    /// profit / revenue * 100, or 0 when revenue is not positive.
    pub fn profit_margin(&self) -> Decimal {
        if self.revenue <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        round_money(self.profit / self.revenue * Decimal::ONE_HUNDRED)
    }

    /// revenue / unique participating customers, or 0 when there are none.
    pub fn average_order_value(&self) -> Decimal {
        let customers = self.unique_customers();
        if customers == 0 {
            return Decimal::ZERO;
        }
        round_money(self.revenue / Decimal::from(customers))
    }

    /// Folds another group into this one; used when same-named campaigns
    /// merge into a single logical entity.
    pub fn absorb(&mut self, other: GroupTotals) {
        self.revenue = round_money(self.revenue + other.revenue);
        self.profit = round_money(self.profit + other.profit);
        self.refund_amount = round_money(self.refund_amount + other.refund_amount);
        self.order_count += other.order_count;
        self.partial_refund_orders += other.partial_refund_orders;
        self.full_refund_orders += other.full_refund_orders;
        self.campaign_count += other.campaign_count;
        self.customers.extend(other.customers);
    }
}

/// Accumulates group totals per key. A pure fold: no side effects beyond
/// the `tracing` diagnostics, and an empty stream yields an empty mapping.
#[derive(Clone, Debug, Default)]
pub struct Accumulator<K> {
    groups: HashMap<K, GroupTotals>,
    skipped_orders: u64,
}

impl<K: Eq + Hash + Clone> Accumulator<K> {
    pub fn new() -> Self {
        Self { groups: HashMap::new(), skipped_orders: 0 }
    }

    pub fn record(&mut self, key: K, figures: &OrderFigures, customer: &CustomerId) {
        self.groups.entry(key).or_default().record(figures, customer);
    }

    pub fn record_campaign(&mut self, key: K) {
        self.groups.entry(key).or_default().record_campaign();
    }

    /// Folds one campaign's filtered orders under `key`, joining each order
    /// to the campaign's unit table. Orders whose unit id no longer resolves
    /// are skipped with a diagnostic count, never a guessed value.
    pub fn fold_campaign_orders(&mut self, key: K, campaign: &Campaign, orders: &[Order]) {
        self.record_campaign(key.clone());
        self.fold_orders_by(campaign, orders, |_| key.clone());
    }

    /// Folds each order under its own key (customer id, region, ...) with
    /// the same unit join and skip policy as `fold_campaign_orders`, but
    /// without attributing the campaign to any group.
    pub fn fold_orders_by(
        &mut self,
        campaign: &Campaign,
        orders: &[Order],
        mut key_fn: impl FnMut(&Order) -> K,
    ) {
        for order in orders {
            match campaign.unit(&order.unit_id) {
                Some(unit) => {
                    let figures = resolve_order(order, unit);
                    self.record(key_fn(order), &figures, &order.customer_id);
                }
                None => {
                    self.skipped_orders += 1;
                    tracing::warn!(
                        order = %order.id.0,
                        campaign = %campaign.id.0,
                        unit = %order.unit_id.0,
                        "order references a unit missing from its campaign; contribution skipped"
                    );
                }
            }
        }
    }

    pub fn skipped_orders(&self) -> u64 {
        self.skipped_orders
    }

    pub fn get(&self, key: &K) -> Option<&GroupTotals> {
        self.groups.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn into_groups(self) -> HashMap<K, GroupTotals> {
        self.groups
    }
}
