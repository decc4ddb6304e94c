use clap::{Args, ValueEnum};
use tally_core::{customer_report, CustomerReportParams, CustomerSortField, MemorySource};

use super::{to_json, DirectionArg, PageArgs, WindowArgs};
use crate::config::AppConfig;

#[derive(Clone, Copy, Debug, Args)]
pub struct CustomerArgs {
    #[command(flatten)]
    pub window: WindowArgs,
    #[arg(long, value_enum, default_value_t = CustomerSortArg::Revenue)]
    pub sort: CustomerSortArg,
    #[arg(long, value_enum, default_value_t)]
    pub direction: DirectionArg,
    #[command(flatten)]
    pub page: PageArgs,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum CustomerSortArg {
    Name,
    Revenue,
    OrderCount,
    CampaignCount,
    RefundAmount,
}

impl From<CustomerSortArg> for CustomerSortField {
    fn from(value: CustomerSortArg) -> Self {
        match value {
            CustomerSortArg::Name => Self::Name,
            CustomerSortArg::Revenue => Self::Revenue,
            CustomerSortArg::OrderCount => Self::OrderCount,
            CustomerSortArg::CampaignCount => Self::CampaignCount,
            CustomerSortArg::RefundAmount => Self::RefundAmount,
        }
    }
}

pub fn run(
    source: &MemorySource,
    config: &AppConfig,
    args: &CustomerArgs,
) -> anyhow::Result<String> {
    let params = CustomerReportParams {
        window: args.window.window()?,
        sort: args.sort.into(),
        direction: args.direction.into(),
        page: args.page.request(config),
    };

    let report = customer_report(source, &params)?;
    to_json(&report)
}
