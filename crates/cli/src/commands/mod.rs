pub mod campaigns;
pub mod customers;
pub mod entities;
pub mod overview;
pub mod regions;

use anyhow::bail;
use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use tally_core::{DateWindow, PageRequest, SortDirection};

use crate::config::AppConfig;

/// Launch-date window shared by every report command. Both bounds or
/// neither: an absent window means all time, never an implicit default.
#[derive(Clone, Copy, Debug, Default, Args)]
pub struct WindowArgs {
    #[arg(long, help = "Window start (YYYY-MM-DD), requires --end")]
    pub start: Option<NaiveDate>,
    #[arg(long, help = "Window end (YYYY-MM-DD), inclusive, requires --start")]
    pub end: Option<NaiveDate>,
}

impl WindowArgs {
    pub fn window(&self) -> anyhow::Result<Option<DateWindow>> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => Ok(Some(DateWindow::new(start, end)?)),
            (None, None) => Ok(None),
            _ => bail!("--start and --end must be given together"),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Args)]
pub struct PageArgs {
    #[arg(long, default_value_t = 1, help = "1-based page number")]
    pub page: u32,
    #[arg(long, help = "Rows per page (defaults to report.page_size from config)")]
    pub page_size: Option<u32>,
}

impl PageArgs {
    pub fn request(&self, config: &AppConfig) -> PageRequest {
        PageRequest::new(self.page, self.page_size.unwrap_or(config.report.page_size))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum DirectionArg {
    Asc,
    #[default]
    Desc,
}

impl From<DirectionArg> for SortDirection {
    fn from(value: DirectionArg) -> Self {
        match value {
            DirectionArg::Asc => Self::Ascending,
            DirectionArg::Desc => Self::Descending,
        }
    }
}

pub(crate) fn to_json<T: serde::Serialize>(report: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}
