//! The seam to the persistence collaborator.
//!
//! Filtering by soft-delete flag, launch-date window, and order status set
//! is the collaborator's responsibility; the report builders verify that
//! contract at the boundary and fail fast on a breach.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::campaign::{Campaign, CampaignId};
use crate::domain::customer::{Customer, CustomerAddress, CustomerAddressId, CustomerId};
use crate::domain::order::{Order, OrderStatus};
use crate::domain::product::{Product, ProductId, ProductType, ProductTypeId};
use crate::domain::supplier::{Supplier, SupplierId};
use crate::errors::ContractViolation;
use crate::trend::DateWindow;

/// Which status set a view aggregates over.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusScope {
    /// PAID, COMPLETED and REFUNDED: every order with monetary meaning.
    Monetary,
    /// PAID and COMPLETED only: views where participation is what counts.
    Participation,
}

impl StatusScope {
    pub fn includes(self, status: OrderStatus) -> bool {
        match self {
            Self::Monetary => status.is_settled(),
            Self::Participation => matches!(status, OrderStatus::Paid | OrderStatus::Completed),
        }
    }
}

/// One campaign with its pre-filtered orders, as handed over by the
/// persistence collaborator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignOrders {
    pub campaign: Campaign,
    pub orders: Vec<Order>,
}

pub trait ReportSource {
    /// Non-deleted campaigns whose launch date falls inside `window`
    /// (absent window means all time), each with its non-deleted orders
    /// restricted to `scope`.
    fn campaign_rows(&self, window: Option<DateWindow>, scope: StatusScope)
        -> Vec<CampaignOrders>;

    fn supplier(&self, id: &SupplierId) -> Option<&Supplier>;
    fn product(&self, id: &ProductId) -> Option<&Product>;
    fn product_type(&self, id: &ProductTypeId) -> Option<&ProductType>;
    fn customer(&self, id: &CustomerId) -> Option<&Customer>;
    fn customer_address(&self, id: &CustomerAddressId) -> Option<&CustomerAddress>;
}

/// Boundary assertion for the input filter contract. A violation is a bug
/// in the collaborator, not a data gap, so it surfaces as an error instead
/// of a silent skip.
pub fn verify_row_contract(
    rows: &[CampaignOrders],
    scope: StatusScope,
) -> Result<(), ContractViolation> {
    for row in rows {
        if row.campaign.deleted {
            return Err(ContractViolation::DeletedCampaign(row.campaign.id.0.clone()));
        }

        for order in &row.orders {
            if order.deleted {
                return Err(ContractViolation::DeletedOrder { order: order.id.clone() });
            }
            if !scope.includes(order.status) {
                return Err(ContractViolation::StatusOutOfScope {
                    order: order.id.clone(),
                    status: order.status,
                });
            }
            if order.campaign_id != row.campaign.id {
                return Err(ContractViolation::ForeignOrder {
                    order: order.id.clone(),
                    expected: row.campaign.id.0.clone(),
                    actual: order.campaign_id.0.clone(),
                });
            }
        }
    }

    Ok(())
}

/// A whole back-office extract, loadable from JSON. Stands in for the
/// persistence layer in the CLI and in tests.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub suppliers: Vec<Supplier>,
    #[serde(default)]
    pub product_types: Vec<ProductType>,
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub customers: Vec<Customer>,
    #[serde(default)]
    pub customer_addresses: Vec<CustomerAddress>,
    #[serde(default)]
    pub campaigns: Vec<Campaign>,
    #[serde(default)]
    pub orders: Vec<Order>,
}

/// In-memory `ReportSource` over a `Dataset`. Owns the collaborator-side
/// filtering so the engine's contract checks have something real to trust.
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    suppliers: HashMap<SupplierId, Supplier>,
    product_types: HashMap<ProductTypeId, ProductType>,
    products: HashMap<ProductId, Product>,
    customers: HashMap<CustomerId, Customer>,
    customer_addresses: HashMap<CustomerAddressId, CustomerAddress>,
    campaigns: Vec<Campaign>,
    orders_by_campaign: HashMap<CampaignId, Vec<Order>>,
}

impl MemorySource {
    pub fn new(dataset: Dataset) -> Self {
        let mut orders_by_campaign: HashMap<CampaignId, Vec<Order>> = HashMap::new();
        for order in dataset.orders {
            orders_by_campaign.entry(order.campaign_id.clone()).or_default().push(order);
        }

        Self {
            suppliers: dataset
                .suppliers
                .into_iter()
                .map(|supplier| (supplier.id.clone(), supplier))
                .collect(),
            product_types: dataset
                .product_types
                .into_iter()
                .map(|product_type| (product_type.id.clone(), product_type))
                .collect(),
            products: dataset
                .products
                .into_iter()
                .map(|product| (product.id.clone(), product))
                .collect(),
            customers: dataset
                .customers
                .into_iter()
                .map(|customer| (customer.id.clone(), customer))
                .collect(),
            customer_addresses: dataset
                .customer_addresses
                .into_iter()
                .map(|address| (address.id.clone(), address))
                .collect(),
            campaigns: dataset.campaigns,
            orders_by_campaign,
        }
    }
}

impl ReportSource for MemorySource {
    fn campaign_rows(
        &self,
        window: Option<DateWindow>,
        scope: StatusScope,
    ) -> Vec<CampaignOrders> {
        self.campaigns
            .iter()
            .filter(|campaign| !campaign.deleted)
            .filter(|campaign| window.map_or(true, |window| window.contains(campaign.launch_date)))
            .map(|campaign| CampaignOrders {
                campaign: campaign.clone(),
                orders: self
                    .orders_by_campaign
                    .get(&campaign.id)
                    .into_iter()
                    .flatten()
                    .filter(|order| !order.deleted && scope.includes(order.status))
                    .cloned()
                    .collect(),
            })
            .collect()
    }

    fn supplier(&self, id: &SupplierId) -> Option<&Supplier> {
        self.suppliers.get(id)
    }

    fn product(&self, id: &ProductId) -> Option<&Product> {
        self.products.get(id)
    }

    fn product_type(&self, id: &ProductTypeId) -> Option<&ProductType> {
        self.product_types.get(id)
    }

    fn customer(&self, id: &CustomerId) -> Option<&Customer> {
        self.customers.get(id)
    }

    fn customer_address(&self, id: &CustomerAddressId) -> Option<&CustomerAddress> {
        self.customer_addresses.get(id)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    use super::{verify_row_contract, CampaignOrders, Dataset, MemorySource, ReportSource, StatusScope};
    use crate::domain::campaign::{Campaign, CampaignId, Unit, UnitId};
    use crate::domain::customer::CustomerId;
    use crate::domain::order::{Order, OrderId, OrderStatus};
    use crate::domain::product::ProductId;
    use crate::domain::supplier::SupplierId;
    use crate::errors::ContractViolation;
    use crate::trend::DateWindow;

    fn campaign(id: &str, launch: NaiveDate) -> Campaign {
        Campaign {
            id: CampaignId(id.to_string()),
            name: "Winter Apples".to_string(),
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

    fn order(id: &str, campaign_id: &str, status: OrderStatus) -> Order {
        Order {
            id: OrderId(id.to_string()),
            campaign_id: CampaignId(campaign_id.to_string()),
            unit_id: UnitId("u1".to_string()),
            customer_id: CustomerId(Uuid::new_v4()),
            customer_address_id: None,
            quantity: 1,
            status,
            partial_refund_amount: Decimal::ZERO,
            deleted: false,
        }
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    #[test]
    fn memory_source_filters_deleted_rows_and_status_scope() {
        let mut deleted_campaign = campaign("gb-2", date(2025, 6, 1));
        deleted_campaign.deleted = true;
        let mut deleted_order = order("o3", "gb-1", OrderStatus::Paid);
        deleted_order.deleted = true;

        let source = MemorySource::new(Dataset {
            campaigns: vec![campaign("gb-1", date(2025, 6, 1)), deleted_campaign],
            orders: vec![
                order("o1", "gb-1", OrderStatus::Paid),
                order("o2", "gb-1", OrderStatus::Refunded),
                order("o4", "gb-1", OrderStatus::NotPaid),
                deleted_order,
            ],
            ..Dataset::default()
        });

        let monetary = source.campaign_rows(None, StatusScope::Monetary);
        assert_eq!(monetary.len(), 1);
        assert_eq!(monetary[0].orders.len(), 2);

        let participation = source.campaign_rows(None, StatusScope::Participation);
        assert_eq!(participation[0].orders.len(), 1);
        assert_eq!(participation[0].orders[0].id, OrderId("o1".to_string()));
    }

    #[test]
    fn memory_source_honors_the_launch_date_window() {
        let source = MemorySource::new(Dataset {
            campaigns: vec![
                campaign("gb-1", date(2025, 3, 1)),
                campaign("gb-2", date(2025, 8, 1)),
            ],
            ..Dataset::default()
        });

        let window = DateWindow::new(date(2025, 1, 1), date(2025, 6, 30)).expect("valid window");
        let rows = source.campaign_rows(Some(window), StatusScope::Monetary);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].campaign.id, CampaignId("gb-1".to_string()));
    }

    #[test]
    fn contract_check_rejects_out_of_scope_status() {
        let rows = vec![CampaignOrders {
            campaign: campaign("gb-1", date(2025, 6, 1)),
            orders: vec![order("o1", "gb-1", OrderStatus::Refunded)],
        }];

        verify_row_contract(&rows, StatusScope::Monetary).expect("refunded is monetary");
        let error = verify_row_contract(&rows, StatusScope::Participation)
            .expect_err("refunded is not participation");
        assert!(matches!(error, ContractViolation::StatusOutOfScope { .. }));
    }

    #[test]
    fn dataset_parses_the_ledger_wire_format() {
        let customer = Uuid::new_v4();
        let raw = format!(
            r#"{{
                "campaigns": [{{
                    "id": "gb-1",
                    "name": "Winter Apples",
                    "launch_date": "2025-11-03",
                    "supplier_id": "sup-1",
                    "product_id": "prod-1",
                    "units": [{{ "id": "u1", "label": "box", "price": "10.00", "cost_price": "6.00" }}]
                }}],
                "orders": [{{
                    "id": "o1",
                    "campaign_id": "gb-1",
                    "unit_id": "u1",
                    "customer_id": "{customer}",
                    "quantity": 2,
                    "status": "NOTPAID"
                }}]
            }}"#
        );

        let dataset: Dataset = serde_json::from_str(&raw).expect("dataset parses");
        assert_eq!(dataset.campaigns[0].units[0].price, Decimal::new(1_000, 2));
        assert_eq!(dataset.orders[0].status, OrderStatus::NotPaid);
        assert_eq!(dataset.orders[0].partial_refund_amount, Decimal::ZERO);
        assert!(!dataset.orders[0].deleted);
        assert!(dataset.orders[0].customer_address_id.is_none());
    }

    #[test]
    fn contract_check_rejects_foreign_orders() {
        let rows = vec![CampaignOrders {
            campaign: campaign("gb-1", date(2025, 6, 1)),
            orders: vec![order("o1", "gb-9", OrderStatus::Paid)],
        }];

        let error = verify_row_contract(&rows, StatusScope::Monetary).expect_err("foreign order");
        assert!(matches!(error, ContractViolation::ForeignOrder { .. }));
    }
}
