use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::order::{OrderId, OrderStatus};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid order transition from {from:?} to {to:?}")]
    InvalidOrderTransition { from: OrderStatus, to: OrderStatus },
    #[error("partial refund is not allowed while order is {status:?}")]
    PartialRefundNotAllowed { status: OrderStatus },
    #[error("partial refund amount must not be negative, got {amount}")]
    NegativePartialRefund { amount: Decimal },
    #[error("date window start {start} is after end {end}")]
    InvalidDateWindow { start: NaiveDate, end: NaiveDate },
}

/// Breach of the report input contract: the persistence collaborator must
/// hand over only non-deleted rows restricted to the requested status set.
/// Distinct from data-integrity gaps (unresolved unit ids), which are
/// skipped silently with a diagnostic count.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ContractViolation {
    #[error("soft-deleted campaign {0} passed to report builder")]
    DeletedCampaign(String),
    #[error("soft-deleted order {order:?} passed to report builder")]
    DeletedOrder { order: OrderId },
    #[error("order {order:?} has status {status:?} outside the requested scope")]
    StatusOutOfScope { order: OrderId, status: OrderStatus },
    #[error("order {order:?} belongs to campaign {actual}, found under campaign {expected}")]
    ForeignOrder { order: OrderId, expected: String, actual: String },
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ReportError {
    #[error(transparent)]
    Contract(#[from] ContractViolation),
    #[error(transparent)]
    Domain(#[from] DomainError),
}
