//! Per-customer consumption detail: spend, orders, refunds and the number
//! of distinct campaigns the customer participated in.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::accounting::round_money;
use crate::aggregate::Accumulator;
use crate::domain::campaign::CampaignId;
use crate::domain::customer::CustomerId;
use crate::domain::order::OrderStatus;
use crate::errors::ReportError;
use crate::report::source::{verify_row_contract, ReportSource, StatusScope};
use crate::report::{paginate, Page, PageRequest, SortDirection};
use crate::trend::DateWindow;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CustomerReportRow {
    pub customer_id: CustomerId,
    pub customer_name: Option<String>,
    pub order_count: u64,
    /// Distinct campaigns with at least one order counting toward volume.
    pub campaign_count: u64,
    pub revenue: Decimal,
    pub refund_amount: Decimal,
    pub partial_refund_orders: u64,
    pub full_refund_orders: u64,
    /// Spend per order for this customer, 0 when no orders count.
    pub average_order_spend: Decimal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerSortField {
    Name,
    Revenue,
    OrderCount,
    CampaignCount,
    RefundAmount,
}

#[derive(Clone, Copy, Debug)]
pub struct CustomerReportParams {
    pub window: Option<DateWindow>,
    pub sort: CustomerSortField,
    pub direction: SortDirection,
    pub page: PageRequest,
}

impl Default for CustomerReportParams {
    fn default() -> Self {
        Self {
            window: None,
            sort: CustomerSortField::Revenue,
            direction: SortDirection::Descending,
            page: PageRequest::default(),
        }
    }
}

pub fn customer_report<S: ReportSource>(
    source: &S,
    params: &CustomerReportParams,
) -> Result<Page<CustomerReportRow>, ReportError> {
    let rows = source.campaign_rows(params.window, StatusScope::Monetary);
    verify_row_contract(&rows, StatusScope::Monetary)?;
    tracing::debug!(campaigns = rows.len(), "building customer report");

    let mut accumulator: Accumulator<CustomerId> = Accumulator::new();
    let mut participation: HashMap<CustomerId, HashSet<CampaignId>> = HashMap::new();

    for row in &rows {
        accumulator.fold_orders_by(&row.campaign, &row.orders, |order| {
            order.customer_id.clone()
        });

        for order in &row.orders {
            // participation mirrors the resolver's volume rule: full
            // refunds and unresolvable units do not count
            if order.status != OrderStatus::Refunded
                && row.campaign.unit(&order.unit_id).is_some()
            {
                participation
                    .entry(order.customer_id.clone())
                    .or_default()
                    .insert(row.campaign.id.clone());
            }
        }
    }

    let mut report_rows: Vec<CustomerReportRow> = accumulator
        .into_groups()
        .into_iter()
        .map(|(customer_id, totals)| CustomerReportRow {
            customer_name: source.customer(&customer_id).map(|customer| customer.name.clone()),
            campaign_count: participation
                .get(&customer_id)
                .map(|campaigns| campaigns.len() as u64)
                .unwrap_or(0),
            order_count: totals.order_count,
            revenue: totals.revenue,
            refund_amount: totals.refund_amount,
            partial_refund_orders: totals.partial_refund_orders,
            full_refund_orders: totals.full_refund_orders,
            average_order_spend: if totals.order_count == 0 {
                Decimal::ZERO
            } else {
                round_money(totals.revenue / Decimal::from(totals.order_count))
            },
            customer_id,
        })
        .collect();

    report_rows.sort_by(|left, right| {
        params
            .direction
            .apply(compare(left, right, params.sort))
            .then_with(|| left.customer_id.cmp(&right.customer_id))
    });

    Ok(paginate(report_rows, params.page))
}

fn compare(
    left: &CustomerReportRow,
    right: &CustomerReportRow,
    field: CustomerSortField,
) -> Ordering {
    match field {
        CustomerSortField::Name => left.customer_name.cmp(&right.customer_name),
        CustomerSortField::Revenue => left.revenue.cmp(&right.revenue),
        CustomerSortField::OrderCount => left.order_count.cmp(&right.order_count),
        CustomerSortField::CampaignCount => left.campaign_count.cmp(&right.campaign_count),
        CustomerSortField::RefundAmount => left.refund_amount.cmp(&right.refund_amount),
    }
}
