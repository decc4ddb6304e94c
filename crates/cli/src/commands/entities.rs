//! Shared driver for the product, product-type and supplier roll-ups.

use clap::{Args, ValueEnum};
use tally_core::{
    product_report, product_type_report, supplier_report, EntityReportParams, EntitySortField,
    MemorySource,
};

use super::{to_json, DirectionArg, PageArgs, WindowArgs};
use crate::config::AppConfig;

#[derive(Clone, Copy, Debug, Args)]
pub struct EntityArgs {
    #[command(flatten)]
    pub window: WindowArgs,
    #[arg(long, value_enum, default_value_t = EntitySortArg::Revenue)]
    pub sort: EntitySortArg,
    #[arg(long, value_enum, default_value_t)]
    pub direction: DirectionArg,
    #[command(flatten)]
    pub page: PageArgs,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum EntitySortArg {
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

impl From<EntitySortArg> for EntitySortField {
    fn from(value: EntitySortArg) -> Self {
        match value {
            EntitySortArg::Name => Self::Name,
            EntitySortArg::CampaignCount => Self::CampaignCount,
            EntitySortArg::Revenue => Self::Revenue,
            EntitySortArg::Profit => Self::Profit,
            EntitySortArg::ProfitMargin => Self::ProfitMargin,
            EntitySortArg::RefundAmount => Self::RefundAmount,
            EntitySortArg::OrderCount => Self::OrderCount,
            EntitySortArg::UniqueCustomers => Self::UniqueCustomers,
            EntitySortArg::AverageOrderValue => Self::AverageOrderValue,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityDimension {
    Product,
    ProductType,
    Supplier,
}

pub fn run(
    source: &MemorySource,
    config: &AppConfig,
    dimension: EntityDimension,
    args: &EntityArgs,
) -> anyhow::Result<String> {
    let params = EntityReportParams {
        window: args.window.window()?,
        sort: args.sort.into(),
        direction: args.direction.into(),
        page: args.page.request(config),
    };

    match dimension {
        EntityDimension::Product => to_json(&product_report(source, &params)?),
        EntityDimension::ProductType => to_json(&product_type_report(source, &params)?),
        EntityDimension::Supplier => to_json(&supplier_report(source, &params)?),
    }
}
