use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::product::ProductId;
use crate::domain::supplier::SupplierId;

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CampaignId(pub String);

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnitId(pub String);

/// A purchasable variant of a campaign with its own sale and cost price.
/// Immutable once an order references it by id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub label: String,
    pub price: Decimal,
    pub cost_price: Decimal,
}

/// A single group-buy offering. The launch date is the time dimension for
/// every trend series and window filter, not the order timestamps.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: CampaignId,
    pub name: String,
    pub launch_date: NaiveDate,
    pub supplier_id: SupplierId,
    pub product_id: ProductId,
    pub units: Vec<Unit>,
    #[serde(default)]
    pub deleted: bool,
}

impl Campaign {
    /// Looks up a unit by id in this campaign's price table. Orders whose
    /// unit id no longer resolves here contribute nothing to any total.
    pub fn unit(&self, id: &UnitId) -> Option<&Unit> {
        self.units.iter().find(|unit| &unit.id == id)
    }
}
