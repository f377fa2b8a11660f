use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Column – the nine named columns every input file must carry
// ---------------------------------------------------------------------------

/// A required input column. The header name is matched exactly (after
/// trimming whitespace), column order in the file does not matter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    Region,
    Segment,
    Year,
    Sales,
    Profit,
    Discount,
    Category,
    Product,
    ShippingMode,
}

impl Column {
    pub const ALL: [Column; 9] = [
        Column::Region,
        Column::Segment,
        Column::Year,
        Column::Sales,
        Column::Profit,
        Column::Discount,
        Column::Category,
        Column::Product,
        Column::ShippingMode,
    ];

    /// Header name as it appears in the input file.
    pub fn name(self) -> &'static str {
        match self {
            Column::Region => "Region",
            Column::Segment => "Segment",
            Column::Year => "Year",
            Column::Sales => "Sales",
            Column::Profit => "Profit",
            Column::Discount => "Discount",
            Column::Category => "Category",
            Column::Product => "Product",
            Column::ShippingMode => "Shipping_Mode",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// SalesRecord – one row of the input table
// ---------------------------------------------------------------------------

/// A single sales row. Fields are validated once by the loader, so the
/// pipeline never re-checks them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    #[serde(rename = "Region")]
    pub region: String,
    #[serde(rename = "Segment")]
    pub segment: String,
    #[serde(rename = "Year")]
    pub year: i64,
    #[serde(rename = "Sales")]
    pub sales: f64,
    #[serde(rename = "Profit")]
    pub profit: f64,
    /// Fraction in `[0, 1]` by convention, not enforced.
    #[serde(rename = "Discount")]
    pub discount: f64,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Product")]
    pub product: String,
    #[serde(rename = "Shipping_Mode")]
    pub shipping_mode: String,
}

// ---------------------------------------------------------------------------
// DimensionValue – a grouping key in a summary table
// ---------------------------------------------------------------------------

/// The value of a grouping column. Text columns group by string, `Year` by
/// integer and `Discount` by its exact float value.
/// Used as a `BTreeMap` key downstream, so it must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum DimensionValue {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl DimensionValue {
    /// Float key with `-0.0` folded into `0.0` so both land in one group.
    pub fn float(v: f64) -> Self {
        DimensionValue::Float(if v == 0.0 { 0.0 } else { v })
    }

    /// Numeric view of the key, used for axis placement.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            DimensionValue::Integer(i) => Some(*i as f64),
            DimensionValue::Float(v) => Some(*v),
            DimensionValue::Text(_) => None,
        }
    }
}

// -- Manual Eq/Ord so we can put DimensionValue in BTreeMap --

impl Eq for DimensionValue {}

impl PartialOrd for DimensionValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DimensionValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use DimensionValue::*;
        fn discriminant(v: &DimensionValue) -> u8 {
            match v {
                Integer(_) => 0,
                Float(_) => 1,
                Text(_) => 2,
            }
        }
        match (self, other) {
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            _ => discriminant(self).cmp(&discriminant(other)),
        }
    }
}

impl std::hash::Hash for DimensionValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            DimensionValue::Text(s) => s.hash(state),
            DimensionValue::Integer(i) => i.hash(state),
            DimensionValue::Float(f) => f.to_bits().hash(state),
        }
    }
}

impl fmt::Display for DimensionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DimensionValue::Text(s) => write!(f, "{s}"),
            DimensionValue::Integer(i) => write!(f, "{i}"),
            DimensionValue::Float(v) => write!(f, "{v}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// Distinct values of the three filterable columns, sorted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOptions {
    pub regions: BTreeSet<String>,
    pub segments: BTreeSet<String>,
    pub years: BTreeSet<i64>,
}

/// The full parsed dataset. Immutable after construction; share it behind
/// an `Arc` rather than cloning.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<SalesRecord>,
    options: FilterOptions,
}

impl Dataset {
    /// Build the filter option sets from the loaded records.
    pub fn from_records(records: Vec<SalesRecord>) -> Self {
        let mut options = FilterOptions::default();
        for rec in &records {
            options.regions.insert(rec.region.clone());
            options.segments.insert(rec.segment.clone());
            options.years.insert(rec.year);
        }
        Dataset { records, options }
    }

    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    pub fn filter_options(&self) -> &FilterOptions {
        &self.options
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
