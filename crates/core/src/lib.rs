pub mod accounting;
pub mod aggregate;
pub mod domain;
pub mod errors;
pub mod frequency;
pub mod report;
pub mod trend;

pub use accounting::{resolve_order, round_money, OrderFigures};
pub use aggregate::{Accumulator, GroupTotals};
pub use domain::campaign::{Campaign, CampaignId, Unit, UnitId};
pub use domain::customer::{Customer, CustomerAddress, CustomerAddressId, CustomerId};
pub use domain::order::{Order, OrderId, OrderStatus};
pub use domain::product::{Product, ProductId, ProductType, ProductTypeId};
pub use domain::supplier::{Supplier, SupplierId};
pub use errors::{ContractViolation, DomainError, ReportError};
pub use frequency::{
    frequency_distribution, multi_purchase_count, multi_purchase_ratio, FrequencyBand,
};
pub use report::campaigns::{
    campaign_report, CampaignReportParams, CampaignReportRow, CampaignSortField,
};
pub use report::customers::{
    customer_report, CustomerReportParams, CustomerReportRow, CustomerSortField,
};
pub use report::entities::{
    product_report, product_type_report, supplier_report, EntityReportParams, EntityReportRow,
    EntitySortField, ProductReportRow, ProductTypeReportRow, SupplierReportRow,
};
pub use report::overview::{overview, OverviewReport, OverviewTotals};
pub use report::regions::{
    region_report, RegionReport, RegionReportParams, RegionRow, RegionSortField,
};
pub use report::source::{
    verify_row_contract, CampaignOrders, Dataset, MemorySource, ReportSource, StatusScope,
};
pub use report::{Page, PageRequest, SortDirection};
pub use trend::{
    bucket_days_for_span, build_trend, BucketPoint, DateWindow, MetricTrend, TrendPoint,
    TrendReport, TrendSources,
};
