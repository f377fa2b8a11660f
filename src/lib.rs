//! Sales performance dashboard: typed data loading, filtering and the
//! aggregation pipeline that feeds every chart.
//!
//! The egui front end lives in the binary; everything here is plain data
//! in, plain data out.

pub mod config;
pub mod data;
pub mod format;
pub mod pipeline;

pub use data::cache::DatasetCache;
pub use data::error::{DataLoadError, RowParseError};
pub use data::filter::{apply_filters, FilterColumn, FilterSet, FilteredView};
pub use data::loader::load_file;
pub use data::model::{Dataset, DimensionValue, SalesRecord};
pub use pipeline::{compute_kpis, compute_summary, DashboardData, Dimension, KpiSet, SummaryTable};
