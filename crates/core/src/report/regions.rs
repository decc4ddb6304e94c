//! Regional distribution: orders grouped by the delivery address region.

use std::cmp::Ordering;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::aggregate::Accumulator;
use crate::errors::ReportError;
use crate::report::source::{verify_row_contract, ReportSource, StatusScope};
use crate::report::{paginate, Page, PageRequest, SortDirection};
use crate::trend::DateWindow;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RegionRow {
    pub region: String,
    pub order_count: u64,
    pub unique_customers: u64,
    pub revenue: Decimal,
    pub refund_amount: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RegionReport {
    pub regions: Page<RegionRow>,
    /// Orders with no resolvable delivery address; they are left out of the
    /// region rows rather than guessed into one.
    pub unattributed_orders: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionSortField {
    Region,
    OrderCount,
    UniqueCustomers,
    Revenue,
}

#[derive(Clone, Copy, Debug)]
pub struct RegionReportParams {
    pub window: Option<DateWindow>,
    pub sort: RegionSortField,
    pub direction: SortDirection,
    pub page: PageRequest,
}

impl Default for RegionReportParams {
    fn default() -> Self {
        Self {
            window: None,
            sort: RegionSortField::OrderCount,
            direction: SortDirection::Descending,
            page: PageRequest::default(),
        }
    }
}

pub fn region_report<S: ReportSource>(
    source: &S,
    params: &RegionReportParams,
) -> Result<RegionReport, ReportError> {
    let rows = source.campaign_rows(params.window, StatusScope::Monetary);
    verify_row_contract(&rows, StatusScope::Monetary)?;
    tracing::debug!(campaigns = rows.len(), "building region report");

    let mut accumulator: Accumulator<Option<String>> = Accumulator::new();
    for row in &rows {
        accumulator.fold_orders_by(&row.campaign, &row.orders, |order| {
            order
                .customer_address_id
                .as_ref()
                .and_then(|address_id| source.customer_address(address_id))
                .map(|address| address.region.clone())
        });
    }

    let mut unattributed_orders = 0;
    let mut region_rows: Vec<RegionRow> = Vec::new();
    for (region, totals) in accumulator.into_groups() {
        match region {
            Some(region) => region_rows.push(RegionRow {
                region,
                order_count: totals.order_count,
                unique_customers: totals.unique_customers(),
                revenue: totals.revenue,
                refund_amount: totals.refund_amount,
            }),
            None => {
                unattributed_orders = totals.order_count + totals.full_refund_orders;
            }
        }
    }

    region_rows.sort_by(|left, right| {
        params
            .direction
            .apply(compare(left, right, params.sort))
            .then_with(|| left.region.cmp(&right.region))
    });

    Ok(RegionReport { regions: paginate(region_rows, params.page), unattributed_orders })
}

fn compare(left: &RegionRow, right: &RegionRow, field: RegionSortField) -> Ordering {
    match field {
        RegionSortField::Region => left.region.cmp(&right.region),
        RegionSortField::OrderCount => left.order_count.cmp(&right.order_count),
        RegionSortField::UniqueCustomers => left.unique_customers.cmp(&right.unique_customers),
        RegionSortField::Revenue => left.revenue.cmp(&right.revenue),
    }
}
