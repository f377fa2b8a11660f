//! Aggregation pipeline: KPIs and the six per-dimension sales summaries,
//! all derived from one [`FilteredView`].

use std::collections::BTreeMap;
use std::fmt;

use crate::data::filter::FilteredView;
use crate::data::model::{Column, DimensionValue, SalesRecord};

// ---------------------------------------------------------------------------
// KPIs
// ---------------------------------------------------------------------------

/// Headline metrics for the current view.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct KpiSet {
    pub total_sales: f64,
    pub total_profit: f64,
    /// Mean discount; `None` when the view is empty.
    pub avg_discount: Option<f64>,
}

/// Sum sales and profit and average the discount over `view`.
pub fn compute_kpis(view: &FilteredView<'_>) -> KpiSet {
    let mut kpis = KpiSet::default();
    let mut discount_sum = 0.0;
    let mut n = 0usize;

    for rec in view.records() {
        kpis.total_sales += rec.sales;
        kpis.total_profit += rec.profit;
        discount_sum += rec.discount;
        n += 1;
    }

    kpis.avg_discount = (n > 0).then(|| discount_sum / n as f64);
    kpis
}

// ---------------------------------------------------------------------------
// Dimensions
// ---------------------------------------------------------------------------

/// Rendering hint for a summary; the pipeline itself ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    /// Trend line over an ordered axis.
    Line,
    Bar,
    /// Per-region intensity map.
    RegionMap,
    /// Proportion of the whole per key.
    Share,
}

/// One of the six analyses, each grouping sales by a single column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Dimension {
    SalesTrends,
    CategoryPerformance,
    GeographicAnalysis,
    ProductPerformance,
    DiscountAnalysis,
    ShippingAnalysis,
}

impl Dimension {
    /// Render order on the dashboard.
    pub const ALL: [Dimension; 6] = [
        Dimension::SalesTrends,
        Dimension::CategoryPerformance,
        Dimension::GeographicAnalysis,
        Dimension::ProductPerformance,
        Dimension::DiscountAnalysis,
        Dimension::ShippingAnalysis,
    ];

    /// The grouping column.
    pub fn column(self) -> Column {
        match self {
            Dimension::SalesTrends => Column::Year,
            Dimension::CategoryPerformance => Column::Category,
            Dimension::GeographicAnalysis => Column::Region,
            Dimension::ProductPerformance => Column::Product,
            Dimension::DiscountAnalysis => Column::Discount,
            Dimension::ShippingAnalysis => Column::ShippingMode,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Dimension::SalesTrends => "Sales-Trends",
            Dimension::CategoryPerformance => "Category-Performance",
            Dimension::GeographicAnalysis => "Geographic-Analysis",
            Dimension::ProductPerformance => "Product-Performance",
            Dimension::DiscountAnalysis => "Discount-Analysis",
            Dimension::ShippingAnalysis => "Shipping-Analysis",
        }
    }

    /// Chart title shown above the visualization.
    pub fn title(self) -> &'static str {
        match self {
            Dimension::SalesTrends => "Sales Trends Over Years",
            Dimension::CategoryPerformance => "Sales by Category",
            Dimension::GeographicAnalysis => "Sales by Region",
            Dimension::ProductPerformance => "Product Performance",
            Dimension::DiscountAnalysis => "Sales by Discount Rate",
            Dimension::ShippingAnalysis => "Sales by Shipping Mode",
        }
    }

    pub fn chart_kind(self) -> ChartKind {
        match self {
            Dimension::SalesTrends => ChartKind::Line,
            Dimension::GeographicAnalysis => ChartKind::RegionMap,
            Dimension::ProductPerformance => ChartKind::Share,
            Dimension::CategoryPerformance
            | Dimension::DiscountAnalysis
            | Dimension::ShippingAnalysis => ChartKind::Bar,
        }
    }

    /// Grouping key of `record` for this dimension.
    pub fn key(self, record: &SalesRecord) -> DimensionValue {
        match self {
            Dimension::SalesTrends => DimensionValue::Integer(record.year),
            Dimension::CategoryPerformance => DimensionValue::Text(record.category.clone()),
            Dimension::GeographicAnalysis => DimensionValue::Text(record.region.clone()),
            Dimension::ProductPerformance => DimensionValue::Text(record.product.clone()),
            Dimension::DiscountAnalysis => DimensionValue::float(record.discount),
            Dimension::ShippingAnalysis => DimensionValue::Text(record.shipping_mode.clone()),
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Summary tables
// ---------------------------------------------------------------------------

/// Total sales per distinct value of one dimension column.
/// Iteration is in ascending key order.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryTable {
    dimension: Dimension,
    rows: BTreeMap<DimensionValue, f64>,
}

impl SummaryTable {
    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    pub fn get(&self, key: &DimensionValue) -> Option<f64> {
        self.rows.get(key).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DimensionValue, f64)> + '_ {
        self.rows.iter().map(|(k, v)| (k, *v))
    }

    /// Rows ordered by sales, largest first; ties keep key order.
    pub fn sorted_by_value(&self) -> Vec<(&DimensionValue, f64)> {
        let mut rows: Vec<_> = self.iter().collect();
        rows.sort_by(|a, b| b.1.total_cmp(&a.1));
        rows
    }

    /// Sum over every key; equals the view's total sales.
    pub fn total(&self) -> f64 {
        self.rows.values().sum()
    }

    /// Largest single value, or `0.0` when empty.
    pub fn max_value(&self) -> f64 {
        self.rows.values().copied().fold(0.0, f64::max)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Group `view` by `dimension` and sum sales per group.
pub fn compute_summary(view: &FilteredView<'_>, dimension: Dimension) -> SummaryTable {
    let mut rows: BTreeMap<DimensionValue, f64> = BTreeMap::new();
    for rec in view.records() {
        *rows.entry(dimension.key(rec)).or_insert(0.0) += rec.sales;
    }
    SummaryTable { dimension, rows }
}

// ---------------------------------------------------------------------------
// One full pass
// ---------------------------------------------------------------------------

/// Everything the dashboard renders for one filter state.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardData {
    pub record_count: usize,
    pub kpis: KpiSet,
    /// One table per [`Dimension::ALL`] entry, in that order.
    pub summaries: Vec<SummaryTable>,
}

impl DashboardData {
    /// Run the KPI and summary computations over `view`.
    pub fn compute(view: &FilteredView<'_>) -> Self {
        if view.is_empty() {
            log::warn!("Current filters exclude every record; showing empty dashboard");
        }

        DashboardData {
            record_count: view.len(),
            kpis: compute_kpis(view),
            summaries: Dimension::ALL
                .iter()
                .map(|&d| compute_summary(view, d))
                .collect(),
        }
    }

    pub fn summary(&self, dimension: Dimension) -> Option<&SummaryTable> {
        self.summaries.iter().find(|s| s.dimension == dimension)
    }

    /// Filters matched nothing.
    pub fn is_empty_view(&self) -> bool {
        self.record_count == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{apply_filters, FilterSet};
    use crate::data::model::tests::{east_west, record};
    use crate::data::model::Dataset;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
    }

    fn sample() -> Dataset {
        Dataset::from_records(vec![
            record("East", "Consumer", 2020, 120.25, 12.0, 0.1, "Tech", "Laptop", "Air"),
            record("East", "Corporate", 2021, 80.5, -4.0, 0.0, "Office", "Paper", "Ground"),
            record("West", "Consumer", 2021, 300.0, 45.0, 0.2, "Tech", "Phone", "Air"),
            record("South", "Home", 2022, 19.99, 1.5, 0.1, "Office", "Pens", "Ground"),
            record("West", "Home", 2022, 42.0, 7.0, -0.0, "Furniture", "Chair", "Express"),
        ])
    }

    #[test]
    fn east_filter_scenario() {
        let ds = east_west();
        let filters = FilterSet {
            regions: ["East".to_string()].into_iter().collect(),
            ..FilterSet::default()
        };
        let view = apply_filters(&ds, &filters);
        assert_eq!(view.len(), 1);

        let kpis = compute_kpis(&view);
        assert_eq!(kpis.total_sales, 100.0);
        assert_eq!(kpis.total_profit, 10.0);
        assert!(close(kpis.avg_discount.unwrap(), 0.10));

        let by_category = compute_summary(&view, Dimension::CategoryPerformance);
        assert_eq!(by_category.len(), 1);
        assert_eq!(by_category.get(&DimensionValue::Text("Tech".into())), Some(100.0));
    }

    #[test]
    fn every_summary_sums_to_total_sales() {
        let ds = sample();
        for filters in [
            FilterSet::default(),
            FilterSet {
                years: [2021, 2022].into_iter().collect(),
                ..FilterSet::default()
            },
            FilterSet {
                segments: ["Home".to_string()].into_iter().collect(),
                ..FilterSet::default()
            },
        ] {
            let view = apply_filters(&ds, &filters);
            let kpis = compute_kpis(&view);
            for d in Dimension::ALL {
                let table = compute_summary(&view, d);
                assert!(
                    close(table.total(), kpis.total_sales),
                    "{d}: {} != {}",
                    table.total(),
                    kpis.total_sales
                );
            }
        }
    }

    #[test]
    fn empty_view_degrades_to_zero_and_none() {
        let ds = sample();
        let filters = FilterSet {
            regions: ["Atlantis".to_string()].into_iter().collect(),
            ..FilterSet::default()
        };
        let view = apply_filters(&ds, &filters);
        let data = DashboardData::compute(&view);

        assert!(data.is_empty_view());
        assert_eq!(
            data.kpis,
            KpiSet {
                total_sales: 0.0,
                total_profit: 0.0,
                avg_discount: None
            }
        );
        assert_eq!(data.summaries.len(), 6);
        assert!(data.summaries.iter().all(SummaryTable::is_empty));
    }

    #[test]
    fn discount_groups_by_rate_and_folds_negative_zero() {
        let ds = sample();
        let view = apply_filters(&ds, &FilterSet::default());
        let table = compute_summary(&view, Dimension::DiscountAnalysis);
        assert_eq!(table.len(), 3);
        assert!(close(table.get(&DimensionValue::Float(0.0)).unwrap(), 80.5 + 42.0));
        assert!(close(table.get(&DimensionValue::Float(0.1)).unwrap(), 120.25 + 19.99));
    }

    #[test]
    fn year_summary_is_ordered_by_year() {
        let ds = sample();
        let view = apply_filters(&ds, &FilterSet::default());
        let table = compute_summary(&view, Dimension::SalesTrends);
        let years: Vec<_> = table.iter().map(|(k, _)| k.to_string()).collect();
        assert_eq!(years, ["2020", "2021", "2022"]);
        assert!(close(table.get(&DimensionValue::Integer(2021)).unwrap(), 380.5));
    }

    #[test]
    fn sorted_by_value_puts_largest_first() {
        let ds = sample();
        let view = apply_filters(&ds, &FilterSet::default());
        let table = compute_summary(&view, Dimension::GeographicAnalysis);
        let order: Vec<_> = table
            .sorted_by_value()
            .into_iter()
            .map(|(k, _)| k.to_string())
            .collect();
        assert_eq!(order, ["West", "East", "South"]);
        assert!(close(table.max_value(), 342.0));
    }

    #[test]
    fn dashboard_summaries_follow_dimension_order() {
        let ds = sample();
        let data = DashboardData::compute(&apply_filters(&ds, &FilterSet::default()));
        let dims: Vec<_> = data.summaries.iter().map(SummaryTable::dimension).collect();
        assert_eq!(dims, Dimension::ALL);
        assert_eq!(data.record_count, 5);
        assert!(data.summary(Dimension::ShippingAnalysis).is_some());
    }

    #[test]
    fn chart_hints_match_dimensions() {
        assert_eq!(Dimension::SalesTrends.chart_kind(), ChartKind::Line);
        assert_eq!(Dimension::GeographicAnalysis.chart_kind(), ChartKind::RegionMap);
        assert_eq!(Dimension::ProductPerformance.chart_kind(), ChartKind::Share);
        assert_eq!(Dimension::ShippingAnalysis.chart_kind(), ChartKind::Bar);
        assert_eq!(Dimension::DiscountAnalysis.column().name(), "Discount");
    }
}
