use clap::{Args, ValueEnum};
use tally_core::{region_report, MemorySource, RegionReportParams, RegionSortField};

use super::{to_json, DirectionArg, PageArgs, WindowArgs};
use crate::config::AppConfig;

#[derive(Clone, Copy, Debug, Args)]
pub struct RegionArgs {
    #[command(flatten)]
    pub window: WindowArgs,
    #[arg(long, value_enum, default_value_t = RegionSortArg::OrderCount)]
    pub sort: RegionSortArg,
    #[arg(long, value_enum, default_value_t)]
    pub direction: DirectionArg,
    #[command(flatten)]
    pub page: PageArgs,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum RegionSortArg {
    Region,
    OrderCount,
    UniqueCustomers,
    Revenue,
}

impl From<RegionSortArg> for RegionSortField {
    fn from(value: RegionSortArg) -> Self {
        match value {
            RegionSortArg::Region => Self::Region,
            RegionSortArg::OrderCount => Self::OrderCount,
            RegionSortArg::UniqueCustomers => Self::UniqueCustomers,
            RegionSortArg::Revenue => Self::Revenue,
        }
    }
}

pub fn run(
    source: &MemorySource,
    config: &AppConfig,
    args: &RegionArgs,
) -> anyhow::Result<String> {
    let params = RegionReportParams {
        window: args.window.window()?,
        sort: args.sort.into(),
        direction: args.direction.into(),
        page: args.page.request(config),
    };

    let report = region_report(source, &params)?;
    to_json(&report)
}
