//! Per-campaign report, optionally merging same-named campaigns under the
//! same supplier into one logical entity.

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::aggregate::Accumulator;
use crate::domain::campaign::CampaignId;
use crate::domain::supplier::SupplierId;
use crate::errors::ReportError;
use crate::report::source::{verify_row_contract, ReportSource, StatusScope};
use crate::report::{paginate, Page, PageRequest, SortDirection};
use crate::trend::DateWindow;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CampaignReportRow {
    pub name: String,
    pub supplier_id: SupplierId,
    pub supplier_name: Option<String>,
    /// Campaigns folded into this row; one entry unless merging applied.
    pub campaign_ids: Vec<CampaignId>,
    pub campaign_count: u64,
    pub first_launch_date: Option<NaiveDate>,
    pub revenue: Decimal,
    pub profit: Decimal,
    pub profit_margin: Decimal,
    pub refund_amount: Decimal,
    pub order_count: u64,
    pub partial_refund_orders: u64,
    pub full_refund_orders: u64,
    pub unique_customers: u64,
    pub average_order_value: Decimal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignSortField {
    Name,
    LaunchDate,
    Revenue,
    Profit,
    ProfitMargin,
    RefundAmount,
    OrderCount,
    UniqueCustomers,
    AverageOrderValue,
}

#[derive(Clone, Copy, Debug)]
pub struct CampaignReportParams {
    pub window: Option<DateWindow>,
    /// Merge same-named campaigns (scoped to the same supplier) into one
    /// group; off means one group per campaign.
    pub merge: bool,
    pub sort: CampaignSortField,
    pub direction: SortDirection,
    pub page: PageRequest,
}

impl Default for CampaignReportParams {
    fn default() -> Self {
        Self {
            window: None,
            merge: false,
            sort: CampaignSortField::Revenue,
            direction: SortDirection::Descending,
            page: PageRequest::default(),
        }
    }
}

/// Grouping key: campaign name when merging, otherwise the campaign id,
/// always scoped to the supplier.
type GroupKey = (String, SupplierId);

#[derive(Clone, Debug)]
struct GroupMeta {
    name: String,
    supplier_id: SupplierId,
    campaign_ids: Vec<CampaignId>,
    first_launch_date: NaiveDate,
}

pub fn campaign_report<S: ReportSource>(
    source: &S,
    params: &CampaignReportParams,
) -> Result<Page<CampaignReportRow>, ReportError> {
    let rows = source.campaign_rows(params.window, StatusScope::Monetary);
    verify_row_contract(&rows, StatusScope::Monetary)?;
    tracing::debug!(campaigns = rows.len(), merge = params.merge, "building campaign report");

    let mut accumulator: Accumulator<GroupKey> = Accumulator::new();
    let mut meta: HashMap<GroupKey, GroupMeta> = HashMap::new();

    for row in &rows {
        let campaign = &row.campaign;
        let label =
            if params.merge { campaign.name.clone() } else { campaign.id.0.clone() };
        let key: GroupKey = (label, campaign.supplier_id.clone());

        accumulator.fold_campaign_orders(key.clone(), campaign, &row.orders);
        meta.entry(key)
            .and_modify(|entry| {
                entry.campaign_ids.push(campaign.id.clone());
                entry.first_launch_date = entry.first_launch_date.min(campaign.launch_date);
            })
            .or_insert_with(|| GroupMeta {
                name: campaign.name.clone(),
                supplier_id: campaign.supplier_id.clone(),
                campaign_ids: vec![campaign.id.clone()],
                first_launch_date: campaign.launch_date,
            });
    }

    let mut report_rows: Vec<CampaignReportRow> = accumulator
        .into_groups()
        .into_iter()
        .filter_map(|(key, totals)| {
            let meta = meta.remove(&key)?;
            Some(CampaignReportRow {
                supplier_name: source.supplier(&meta.supplier_id).map(|s| s.name.clone()),
                name: meta.name,
                supplier_id: meta.supplier_id,
                campaign_ids: meta.campaign_ids,
                campaign_count: totals.campaign_count,
                first_launch_date: Some(meta.first_launch_date),
                revenue: totals.revenue,
                profit: totals.profit,
                profit_margin: totals.profit_margin(),
                refund_amount: totals.refund_amount,
                order_count: totals.order_count,
                partial_refund_orders: totals.partial_refund_orders,
                full_refund_orders: totals.full_refund_orders,
                unique_customers: totals.unique_customers(),
                average_order_value: totals.average_order_value(),
            })
        })
        .collect();

    report_rows.sort_by(|left, right| {
        params
            .direction
            .apply(compare(left, right, params.sort))
            .then_with(|| left.name.cmp(&right.name))
            .then_with(|| left.supplier_id.cmp(&right.supplier_id))
    });

    Ok(paginate(report_rows, params.page))
}

fn compare(left: &CampaignReportRow, right: &CampaignReportRow, field: CampaignSortField) -> Ordering {
    match field {
        CampaignSortField::Name => left.name.cmp(&right.name),
        CampaignSortField::LaunchDate => left.first_launch_date.cmp(&right.first_launch_date),
        CampaignSortField::Revenue => left.revenue.cmp(&right.revenue),
        CampaignSortField::Profit => left.profit.cmp(&right.profit),
        CampaignSortField::ProfitMargin => left.profit_margin.cmp(&right.profit_margin),
        CampaignSortField::RefundAmount => left.refund_amount.cmp(&right.refund_amount),
        CampaignSortField::OrderCount => left.order_count.cmp(&right.order_count),
        CampaignSortField::UniqueCustomers => left.unique_customers.cmp(&right.unique_customers),
        CampaignSortField::AverageOrderValue => {
            left.average_order_value.cmp(&right.average_order_value)
        }
    }
}
