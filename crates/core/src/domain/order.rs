use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::campaign::{CampaignId, UnitId};
use crate::domain::customer::{CustomerAddressId, CustomerId};
use crate::errors::DomainError;

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OrderId(pub String);

/// Ledger status names are the persistence layer's uppercase forms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    NotPaid,
    Paid,
    Completed,
    Refunded,
}

impl OrderStatus {
    /// True for the statuses that carry monetary meaning. Orders outside
    /// this set never reach the resolver.
    pub fn is_settled(self) -> bool {
        matches!(self, Self::Paid | Self::Completed | Self::Refunded)
    }
}

/// A customer's purchase of some quantity of one unit within one campaign.
///
/// Deletion is a soft flag orthogonal to status; deleted orders are
/// invisible to every aggregation component.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub campaign_id: CampaignId,
    pub unit_id: UnitId,
    pub customer_id: CustomerId,
    #[serde(default)]
    pub customer_address_id: Option<CustomerAddressId>,
    pub quantity: u32,
    pub status: OrderStatus,
    #[serde(default)]
    pub partial_refund_amount: Decimal,
    #[serde(default)]
    pub deleted: bool,
}

impl Order {
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        matches!(
            (self.status, next),
            (OrderStatus::NotPaid, OrderStatus::Paid)
                | (OrderStatus::Paid, OrderStatus::Completed)
                | (OrderStatus::Paid, OrderStatus::Refunded)
                | (OrderStatus::Completed, OrderStatus::Refunded)
        )
    }

    pub fn transition_to(&mut self, next: OrderStatus) -> Result<(), DomainError> {
        if self.can_transition_to(next) {
            self.status = next;
            return Ok(());
        }

        Err(DomainError::InvalidOrderTransition { from: self.status, to: next })
    }

    /// Records a partial refund without a state transition. Only meaningful
    /// while the order is paid or completed; a full refund supersedes it.
    pub fn set_partial_refund(&mut self, amount: Decimal) -> Result<(), DomainError> {
        if amount < Decimal::ZERO {
            return Err(DomainError::NegativePartialRefund { amount });
        }
        if !matches!(self.status, OrderStatus::Paid | OrderStatus::Completed) {
            return Err(DomainError::PartialRefundNotAllowed { status: self.status });
        }

        self.partial_refund_amount = amount;
        Ok(())
    }
}
