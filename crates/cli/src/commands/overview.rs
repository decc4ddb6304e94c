use clap::Args;
use tally_core::{overview, MemorySource};

use super::{to_json, WindowArgs};

#[derive(Clone, Copy, Debug, Args)]
pub struct OverviewArgs {
    #[command(flatten)]
    pub window: WindowArgs,
}

pub fn run(source: &MemorySource, args: &OverviewArgs) -> anyhow::Result<String> {
    let report = overview(source, args.window.window()?)?;
    to_json(&report)
}
