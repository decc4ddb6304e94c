//! The overview view: global totals, launch-day trend series, and the
//! purchase-frequency distribution in one record.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::accounting::round_money;
use crate::aggregate::Accumulator;
use crate::domain::customer::CustomerId;
use crate::errors::ReportError;
use crate::frequency::{
    frequency_distribution, multi_purchase_count, multi_purchase_ratio, FrequencyBand,
};
use crate::report::source::{verify_row_contract, ReportSource, StatusScope};
use crate::trend::{build_trend, DateWindow, TrendReport, TrendSources};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OverviewTotals {
    pub revenue: Decimal,
    pub profit: Decimal,
    pub profit_margin: Decimal,
    pub refund_amount: Decimal,
    pub order_count: u64,
    pub partial_refund_orders: u64,
    pub full_refund_orders: u64,
    pub unique_customers: u64,
    pub campaign_count: u64,
    pub average_order_value: Decimal,
    pub average_campaign_revenue: Decimal,
    pub average_campaign_profit: Decimal,
    pub average_campaign_orders: Decimal,
    pub multi_purchase_customers: u64,
    pub multi_purchase_ratio: Decimal,
    /// Orders dropped because their unit id no longer resolves against the
    /// campaign's unit table. Diagnostic only; no value is guessed for them.
    pub skipped_orders: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OverviewReport {
    pub totals: OverviewTotals,
    pub trend: TrendReport,
    pub purchase_frequency: Vec<FrequencyBand>,
}

pub fn overview<S: ReportSource>(
    source: &S,
    window: Option<DateWindow>,
) -> Result<OverviewReport, ReportError> {
    let rows = source.campaign_rows(window, StatusScope::Monetary);
    verify_row_contract(&rows, StatusScope::Monetary)?;
    tracing::debug!(campaigns = rows.len(), "building overview report");

    let mut global: Accumulator<()> = Accumulator::new();
    let mut by_day: Accumulator<NaiveDate> = Accumulator::new();
    let mut by_customer: Accumulator<CustomerId> = Accumulator::new();

    for row in &rows {
        global.fold_campaign_orders((), &row.campaign, &row.orders);
        by_day.fold_campaign_orders(row.campaign.launch_date, &row.campaign, &row.orders);
        by_customer.fold_orders_by(&row.campaign, &row.orders, |order| order.customer_id.clone());
    }

    let skipped_orders = global.skipped_orders();
    let totals = global.into_groups().remove(&()).unwrap_or_default();
    let campaign_count = rows.len() as u64;

    let purchase_counts = by_customer
        .into_groups()
        .into_iter()
        .filter(|(_, group)| group.order_count > 0)
        .map(|(customer, group)| (customer, group.order_count.min(u64::from(u32::MAX)) as u32))
        .collect();
    let multi_purchase_customers = multi_purchase_count(&purchase_counts);

    let trend = build_trend(&trend_sources(by_day), window);

    Ok(OverviewReport {
        totals: OverviewTotals {
            revenue: totals.revenue,
            profit: totals.profit,
            profit_margin: totals.profit_margin(),
            refund_amount: totals.refund_amount,
            order_count: totals.order_count,
            partial_refund_orders: totals.partial_refund_orders,
            full_refund_orders: totals.full_refund_orders,
            unique_customers: totals.unique_customers(),
            campaign_count,
            average_order_value: totals.average_order_value(),
            average_campaign_revenue: per_campaign(totals.revenue, campaign_count),
            average_campaign_profit: per_campaign(totals.profit, campaign_count),
            average_campaign_orders: per_campaign(Decimal::from(totals.order_count), campaign_count),
            multi_purchase_customers,
            multi_purchase_ratio: multi_purchase_ratio(
                multi_purchase_customers,
                totals.unique_customers(),
            ),
            skipped_orders,
        },
        trend,
        purchase_frequency: frequency_distribution(&purchase_counts, campaign_count),
    })
}

fn per_campaign(total: Decimal, campaign_count: u64) -> Decimal {
    if campaign_count == 0 {
        return Decimal::ZERO;
    }
    round_money(total / Decimal::from(campaign_count))
}

fn trend_sources(by_day: Accumulator<NaiveDate>) -> TrendSources {
    let mut sources = TrendSources::default();
    for (day, group) in by_day.into_groups() {
        sources.campaigns.insert(day, Decimal::from(group.campaign_count));
        sources.orders.insert(day, Decimal::from(group.order_count));
        sources.revenue.insert(day, group.revenue);
        sources.profit.insert(day, group.profit);
    }
    sources
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    use super::overview;
    use crate::domain::campaign::{Campaign, CampaignId, Unit, UnitId};
    use crate::domain::customer::CustomerId;
    use crate::domain::order::{Order, OrderId, OrderStatus};
    use crate::domain::product::ProductId;
    use crate::domain::supplier::SupplierId;
    use crate::report::source::{Dataset, MemorySource};
    use crate::trend::DateWindow;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    fn campaign(id: &str, launch: NaiveDate) -> Campaign {
        Campaign {
            id: CampaignId(id.to_string()),
            name: format!("campaign {id}"),
            launch_date: launch,
            supplier_id: SupplierId("sup-1".to_string()),
            product_id: ProductId("prod-1".to_string()),
            units: vec![Unit {
                id: UnitId("u1".to_string()),
                label: "box".to_string(),
                price: Decimal::new(1_000, 2),
                cost_price: Decimal::new(600, 2),
            }],
            deleted: false,
        }
    }

    fn order(
        id: &str,
        campaign_id: &str,
        customer: CustomerId,
        status: OrderStatus,
        partial_cents: i64,
    ) -> Order {
        Order {
            id: OrderId(id.to_string()),
            campaign_id: CampaignId(campaign_id.to_string()),
            unit_id: UnitId("u1".to_string()),
            customer_id: customer,
            customer_address_id: None,
            quantity: 2,
            status,
            partial_refund_amount: Decimal::new(partial_cents, 2),
            deleted: false,
        }
    }

    #[test]
    fn overview_combines_totals_trend_and_frequency() {
        let returning = CustomerId(Uuid::new_v4());
        let one_off = CustomerId(Uuid::new_v4());
        let launch = date(2025, 4, 7);

        let source = MemorySource::new(Dataset {
            campaigns: vec![campaign("gb-1", launch), campaign("gb-2", date(2025, 4, 9))],
            orders: vec![
                order("o1", "gb-1", returning.clone(), OrderStatus::Paid, 0),
                order("o2", "gb-1", one_off.clone(), OrderStatus::Paid, 400),
                order("o3", "gb-2", returning.clone(), OrderStatus::Completed, 0),
                order("o4", "gb-2", one_off, OrderStatus::Refunded, 0),
            ],
            ..Dataset::default()
        });

        let report = overview(&source, None).expect("overview builds");
        let totals = &report.totals;

        assert_eq!(totals.revenue, Decimal::new(5_600, 2));
        assert_eq!(totals.profit, Decimal::new(800, 2));
        assert_eq!(totals.refund_amount, Decimal::new(2_400, 2));
        assert_eq!(totals.order_count, 3);
        assert_eq!(totals.partial_refund_orders, 1);
        assert_eq!(totals.full_refund_orders, 1);
        assert_eq!(totals.unique_customers, 2);
        assert_eq!(totals.campaign_count, 2);
        assert_eq!(totals.profit_margin, Decimal::new(1_429, 2));
        assert_eq!(totals.average_order_value, Decimal::new(2_800, 2));
        assert_eq!(totals.average_campaign_revenue, Decimal::new(2_800, 2));
        assert_eq!(totals.average_campaign_orders, Decimal::new(150, 2));
        assert_eq!(totals.multi_purchase_customers, 1);
        assert_eq!(totals.multi_purchase_ratio, Decimal::new(5_000, 2));
        assert_eq!(totals.skipped_orders, 0);

        // trend keyed by launch day: two days of data, inferred window
        let window = report.trend.window.expect("window inferred");
        assert_eq!(window.start, launch);
        assert_eq!(window.end, date(2025, 4, 9));
        assert_eq!(report.trend.campaigns.series.len(), 3);

        // one returning customer (2 purchases), one single purchase in volume
        assert_eq!(report.purchase_frequency.len(), 2);
        assert_eq!(report.purchase_frequency[0].min_frequency, 1);
        assert_eq!(report.purchase_frequency[0].customers, 1);
        assert_eq!(report.purchase_frequency[1].min_frequency, 2);
        assert_eq!(report.purchase_frequency[1].customers, 1);
    }

    #[test]
    fn empty_range_produces_zeroed_report_without_division_errors() {
        let source = MemorySource::new(Dataset::default());
        let window = DateWindow::new(date(2025, 1, 1), date(2025, 1, 31)).expect("valid window");

        let report = overview(&source, Some(window)).expect("overview builds");
        let totals = &report.totals;

        assert_eq!(totals.revenue, Decimal::ZERO);
        assert_eq!(totals.profit_margin, Decimal::ZERO);
        assert_eq!(totals.average_order_value, Decimal::ZERO);
        assert_eq!(totals.average_campaign_revenue, Decimal::ZERO);
        assert_eq!(totals.multi_purchase_ratio, Decimal::ZERO);
        assert!(report.purchase_frequency.is_empty());
        // the explicit window still materializes a zero-filled daily series
        assert_eq!(report.trend.orders.series.len(), 31);
        assert!(report.trend.orders.series.iter().all(|point| point.value == Decimal::ZERO));
    }

    #[test]
    fn skipped_orders_surface_in_the_totals() {
        let customer = CustomerId(Uuid::new_v4());
        let mut stray = order("o1", "gb-1", customer, OrderStatus::Paid, 0);
        stray.unit_id = UnitId("u-gone".to_string());

        let source = MemorySource::new(Dataset {
            campaigns: vec![campaign("gb-1", date(2025, 4, 7))],
            orders: vec![stray],
            ..Dataset::default()
        });

        let report = overview(&source, None).expect("overview builds");
        assert_eq!(report.totals.skipped_orders, 1);
        assert_eq!(report.totals.revenue, Decimal::ZERO);
        assert_eq!(report.totals.order_count, 0);
    }
}
