use clap::{Args, ValueEnum};
use tally_core::{campaign_report, CampaignReportParams, CampaignSortField, MemorySource};

use super::{to_json, DirectionArg, PageArgs, WindowArgs};
use crate::config::AppConfig;

#[derive(Clone, Copy, Debug, Args)]
pub struct CampaignArgs {
    #[command(flatten)]
    pub window: WindowArgs,
    #[arg(long, help = "Merge same-named campaigns under the same supplier")]
    pub merge: bool,
    #[arg(long, value_enum, default_value_t = CampaignSortArg::Revenue)]
    pub sort: CampaignSortArg,
    #[arg(long, value_enum, default_value_t)]
    pub direction: DirectionArg,
    #[command(flatten)]
    pub page: PageArgs,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum CampaignSortArg {
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

impl From<CampaignSortArg> for CampaignSortField {
    fn from(value: CampaignSortArg) -> Self {
        match value {
            CampaignSortArg::Name => Self::Name,
            CampaignSortArg::LaunchDate => Self::LaunchDate,
            CampaignSortArg::Revenue => Self::Revenue,
            CampaignSortArg::Profit => Self::Profit,
            CampaignSortArg::ProfitMargin => Self::ProfitMargin,
            CampaignSortArg::RefundAmount => Self::RefundAmount,
            CampaignSortArg::OrderCount => Self::OrderCount,
            CampaignSortArg::UniqueCustomers => Self::UniqueCustomers,
            CampaignSortArg::AverageOrderValue => Self::AverageOrderValue,
        }
    }
}

pub fn run(
    source: &MemorySource,
    config: &AppConfig,
    args: &CampaignArgs,
) -> anyhow::Result<String> {
    let params = CampaignReportParams {
        window: args.window.window()?,
        merge: args.merge,
        sort: args.sort.into(),
        direction: args.direction.into(),
        page: args.page.request(config),
    };

    let report = campaign_report(source, &params)?;
    to_json(&report)
}
