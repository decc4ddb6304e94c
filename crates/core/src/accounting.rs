//! The single accounting rule applied to every settled order.
//!
//! Every report view resolves orders through this module, so the refund
//! policy cannot drift between entry points.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::domain::campaign::Unit;
use crate::domain::order::{Order, OrderStatus};

/// Rounds a currency amount to 2 decimal places. Applied at every point of
/// combination, not only at final totals, so rounding error stays bounded
/// across long accumulation chains.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// One order's signed contribution to the ledger totals.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OrderFigures {
    pub revenue: Decimal,
    pub profit: Decimal,
    pub refund_contribution: Decimal,
    pub counts_toward_volume: bool,
    pub is_full_refund: bool,
}

impl OrderFigures {
    /// True when this order carries a partial (not full) refund. Tracked
    /// separately from full refunds so refund amounts never double-count.
    pub fn has_partial_refund(&self) -> bool {
        !self.is_full_refund && self.refund_contribution > Decimal::ZERO
    }
}

/// Resolves one order against its campaign's unit price table.
///
/// Callers pre-filter to non-deleted orders with status in
/// {PAID, COMPLETED, REFUNDED}; a NOTPAID order yields a neutral
/// contribution rather than a panic.
pub fn resolve_order(order: &Order, unit: &Unit) -> OrderFigures {
    debug_assert!(order.status.is_settled(), "resolver invoked for unsettled order");

    let quantity = Decimal::from(order.quantity);
    let gross = round_money(unit.price * quantity);
    let cost = round_money(unit.cost_price * quantity);
    let partial = order.partial_refund_amount.max(Decimal::ZERO);

    match order.status {
        OrderStatus::Refunded => OrderFigures {
            revenue: Decimal::ZERO,
            // The sunk unit cost stays on the books when the sale is undone.
            profit: round_money(-cost),
            refund_contribution: gross,
            counts_toward_volume: false,
            is_full_refund: true,
        },
        OrderStatus::Paid | OrderStatus::Completed => OrderFigures {
            revenue: round_money(gross - partial),
            profit: round_money(gross - cost - partial),
            refund_contribution: if partial > Decimal::ZERO { partial } else { Decimal::ZERO },
            counts_toward_volume: true,
            is_full_refund: false,
        },
        OrderStatus::NotPaid => OrderFigures {
            revenue: Decimal::ZERO,
            profit: Decimal::ZERO,
            refund_contribution: Decimal::ZERO,
            counts_toward_volume: false,
            is_full_refund: false,
        },
    }
}
