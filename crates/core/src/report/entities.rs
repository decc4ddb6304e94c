//! Per-product, per-product-type and per-supplier roll-ups. The three views
//! share one aggregation pipeline and differ only in grouping key and label
//! lookup.

use std::cmp::Ordering;
use std::hash::Hash;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::accounting::round_money;
use crate::aggregate::Accumulator;
use crate::domain::campaign::Campaign;
use crate::domain::product::{ProductId, ProductTypeId};
use crate::domain::supplier::SupplierId;
use crate::errors::ReportError;
use crate::report::source::{verify_row_contract, ReportSource, StatusScope};
use crate::report::{paginate, Page, PageRequest, SortDirection};
use crate::trend::DateWindow;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EntityReportRow<Id> {
    pub id: Id,
    /// Display label; None when the dimension entity is unknown to the
    /// collaborator (the raw id still identifies the group).
    pub name: Option<String>,
    pub campaign_count: u64,
    pub revenue: Decimal,
    pub profit: Decimal,
    pub profit_margin: Decimal,
    pub refund_amount: Decimal,
    pub order_count: u64,
    pub partial_refund_orders: u64,
    pub full_refund_orders: u64,
    pub unique_customers: u64,
    pub average_order_value: Decimal,
    pub average_campaign_revenue: Decimal,
}

pub type ProductReportRow = EntityReportRow<ProductId>;
pub type ProductTypeReportRow = EntityReportRow<ProductTypeId>;
pub type SupplierReportRow = EntityReportRow<SupplierId>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntitySortField {
    Name,
    CampaignCount,
    Revenue,
    Profit,
    ProfitMargin,
    RefundAmount,
    OrderCount,
    UniqueCustomers,
    AverageOrderValue,
}

#[derive(Clone, Copy, Debug)]
pub struct EntityReportParams {
    pub window: Option<DateWindow>,
    pub sort: EntitySortField,
    pub direction: SortDirection,
    pub page: PageRequest,
}

impl Default for EntityReportParams {
    fn default() -> Self {
        Self {
            window: None,
            sort: EntitySortField::Revenue,
            direction: SortDirection::Descending,
            page: PageRequest::default(),
        }
    }
}

pub fn product_report<S: ReportSource>(
    source: &S,
    params: &EntityReportParams,
) -> Result<Page<ProductReportRow>, ReportError> {
    entity_report(
        source,
        params,
        |campaign| Some(campaign.product_id.clone()),
        |source, id| source.product(id).map(|product| product.name.clone()),
    )
}

pub fn product_type_report<S: ReportSource>(
    source: &S,
    params: &EntityReportParams,
) -> Result<Page<ProductTypeReportRow>, ReportError> {
    entity_report(
        source,
        params,
        // campaigns whose product is unknown cannot be typed and are
        // omitted, the same data-gap posture as unresolved unit ids
        |campaign| {
            let product = source.product(&campaign.product_id);
            if product.is_none() {
                tracing::warn!(
                    campaign = %campaign.id.0,
                    product = %campaign.product_id.0,
                    "campaign references an unknown product; omitted from product-type roll-up"
                );
            }
            product.map(|product| product.product_type_id.clone())
        },
        |source, id| source.product_type(id).map(|product_type| product_type.name.clone()),
    )
}

pub fn supplier_report<S: ReportSource>(
    source: &S,
    params: &EntityReportParams,
) -> Result<Page<SupplierReportRow>, ReportError> {
    entity_report(
        source,
        params,
        |campaign| Some(campaign.supplier_id.clone()),
        |source, id| source.supplier(id).map(|supplier| supplier.name.clone()),
    )
}

fn entity_report<S, Id>(
    source: &S,
    params: &EntityReportParams,
    key_fn: impl Fn(&Campaign) -> Option<Id>,
    name_fn: impl Fn(&S, &Id) -> Option<String>,
) -> Result<Page<EntityReportRow<Id>>, ReportError>
where
    S: ReportSource,
    Id: Clone + Eq + Ord + Hash,
{
    let rows = source.campaign_rows(params.window, StatusScope::Monetary);
    verify_row_contract(&rows, StatusScope::Monetary)?;
    tracing::debug!(campaigns = rows.len(), "building dimension report");

    let mut accumulator: Accumulator<Id> = Accumulator::new();
    for row in &rows {
        if let Some(key) = key_fn(&row.campaign) {
            accumulator.fold_campaign_orders(key, &row.campaign, &row.orders);
        }
    }

    let mut report_rows: Vec<EntityReportRow<Id>> = accumulator
        .into_groups()
        .into_iter()
        .map(|(id, totals)| EntityReportRow {
            name: name_fn(source, &id),
            campaign_count: totals.campaign_count,
            revenue: totals.revenue,
            profit: totals.profit,
            profit_margin: totals.profit_margin(),
            refund_amount: totals.refund_amount,
            order_count: totals.order_count,
            partial_refund_orders: totals.partial_refund_orders,
            full_refund_orders: totals.full_refund_orders,
            unique_customers: totals.unique_customers(),
            average_order_value: totals.average_order_value(),
            average_campaign_revenue: if totals.campaign_count == 0 {
                Decimal::ZERO
            } else {
                round_money(totals.revenue / Decimal::from(totals.campaign_count))
            },
            id,
        })
        .collect();

    report_rows.sort_by(|left, right| {
        params
            .direction
            .apply(compare(left, right, params.sort))
            .then_with(|| left.id.cmp(&right.id))
    });

    Ok(paginate(report_rows, params.page))
}

fn compare<Id>(
    left: &EntityReportRow<Id>,
    right: &EntityReportRow<Id>,
    field: EntitySortField,
) -> Ordering {
    match field {
        EntitySortField::Name => left.name.cmp(&right.name),
        EntitySortField::CampaignCount => left.campaign_count.cmp(&right.campaign_count),
        EntitySortField::Revenue => left.revenue.cmp(&right.revenue),
        EntitySortField::Profit => left.profit.cmp(&right.profit),
        EntitySortField::ProfitMargin => left.profit_margin.cmp(&right.profit_margin),
        EntitySortField::RefundAmount => left.refund_amount.cmp(&right.refund_amount),
        EntitySortField::OrderCount => left.order_count.cmp(&right.order_count),
        EntitySortField::UniqueCustomers => left.unique_customers.cmp(&right.unique_customers),
        EntitySortField::AverageOrderValue => {
            left.average_order_value.cmp(&right.average_order_value)
        }
    }
}
