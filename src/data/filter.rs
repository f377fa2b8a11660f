use std::collections::BTreeSet;

use super::model::{Dataset, SalesRecord};

// ---------------------------------------------------------------------------
// Filter predicate: which values are accepted per filterable column
// ---------------------------------------------------------------------------

/// The three columns a user can filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterColumn {
    Region,
    Segment,
    Year,
}

impl FilterColumn {
    pub const ALL: [FilterColumn; 3] = [FilterColumn::Region, FilterColumn::Segment, FilterColumn::Year];

    /// Sidebar label for the column's multi-select.
    pub fn label(self) -> &'static str {
        match self {
            FilterColumn::Region => "Select Region",
            FilterColumn::Segment => "Select Segment",
            FilterColumn::Year => "Select Year",
        }
    }
}

/// Accepted values per column.
///
/// An empty set means "no filter" on that column (every value passes), the
/// same as an untouched multi-select. It never means "accept nothing".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    pub regions: BTreeSet<String>,
    pub segments: BTreeSet<String>,
    pub years: BTreeSet<i64>,
}

impl FilterSet {
    /// True when no column is constrained.
    pub fn is_unfiltered(&self) -> bool {
        self.regions.is_empty() && self.segments.is_empty() && self.years.is_empty()
    }

    /// Whether `record` passes every active predicate.
    pub fn accepts(&self, record: &SalesRecord) -> bool {
        (self.regions.is_empty() || self.regions.contains(&record.region))
            && (self.segments.is_empty() || self.segments.contains(&record.segment))
            && (self.years.is_empty() || self.years.contains(&record.year))
    }

    /// Number of accepted values for `column` (0 = unfiltered).
    pub fn selected_count(&self, column: FilterColumn) -> usize {
        match column {
            FilterColumn::Region => self.regions.len(),
            FilterColumn::Segment => self.segments.len(),
            FilterColumn::Year => self.years.len(),
        }
    }

    /// Drop the predicate on one column.
    pub fn clear(&mut self, column: FilterColumn) {
        match column {
            FilterColumn::Region => self.regions.clear(),
            FilterColumn::Segment => self.segments.clear(),
            FilterColumn::Year => self.years.clear(),
        }
    }

    /// Add `region` if absent, remove it otherwise.
    pub fn toggle_region(&mut self, region: &str) {
        if !self.regions.remove(region) {
            self.regions.insert(region.to_string());
        }
    }

    /// Add `segment` if absent, remove it otherwise.
    pub fn toggle_segment(&mut self, segment: &str) {
        if !self.segments.remove(segment) {
            self.segments.insert(segment.to_string());
        }
    }

    /// Add `year` if absent, remove it otherwise.
    pub fn toggle_year(&mut self, year: i64) {
        if !self.years.remove(&year) {
            self.years.insert(year);
        }
    }
}

// ---------------------------------------------------------------------------
// FilteredView – the records of a dataset that pass a FilterSet
// ---------------------------------------------------------------------------

/// Row indices into a borrowed [`Dataset`], in dataset order.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    dataset: &'a Dataset,
    indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    /// The unfiltered view over every record.
    pub fn all(dataset: &'a Dataset) -> Self {
        FilteredView {
            dataset,
            indices: (0..dataset.len()).collect(),
        }
    }

    /// Rebuild a view from indices previously produced by [`filtered_indices`].
    pub fn from_indices(dataset: &'a Dataset, indices: &[usize]) -> Self {
        FilteredView {
            dataset,
            indices: indices.iter().copied().filter(|&i| i < dataset.len()).collect(),
        }
    }

    /// Narrow this view further. Refining with the same filters that built
    /// the view returns an identical view.
    pub fn refine(&self, filters: &FilterSet) -> FilteredView<'a> {
        let records = self.dataset.records();
        FilteredView {
            dataset: self.dataset,
            indices: self
                .indices
                .iter()
                .copied()
                .filter(|&i| filters.accepts(&records[i]))
                .collect(),
        }
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn records(&self) -> impl Iterator<Item = &'a SalesRecord> + '_ {
        let records = self.dataset.records();
        self.indices.iter().map(move |&i| &records[i])
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

impl PartialEq for FilteredView<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.dataset, other.dataset) && self.indices == other.indices
    }
}

/// Return indices of records that pass all active filters.
///
/// A record passes a column filter when:
/// * The accepted set for that column is empty → passes (no constraint)
/// * The record's value for that column is in the accepted set → passes
pub fn filtered_indices(dataset: &Dataset, filters: &FilterSet) -> Vec<usize> {
    dataset
        .records()
        .iter()
        .enumerate()
        .filter(|(_, rec)| filters.accepts(rec))
        .map(|(i, _)| i)
        .collect()
}

/// Apply `filters` to the whole dataset.
pub fn apply_filters<'a>(dataset: &'a Dataset, filters: &FilterSet) -> FilteredView<'a> {
    FilteredView {
        dataset,
        indices: filtered_indices(dataset, filters),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::{east_west, record};

    fn regions(values: &[&str]) -> FilterSet {
        FilterSet {
            regions: values.iter().map(|s| s.to_string()).collect(),
            ..FilterSet::default()
        }
    }

    #[test]
    fn empty_filter_set_keeps_every_record() {
        let ds = east_west();
        let view = apply_filters(&ds, &FilterSet::default());
        assert_eq!(view, FilteredView::all(&ds));
        assert_eq!(view.len(), ds.len());
    }

    #[test]
    fn region_filter_selects_matching_rows() {
        let ds = east_west();
        let view = apply_filters(&ds, &regions(&["East"]));
        assert_eq!(view.indices(), &[0]);
        assert_eq!(view.records().next().unwrap().region, "East");
    }

    #[test]
    fn filtering_is_idempotent() {
        let ds = Dataset::from_records(vec![
            record("East", "Consumer", 2020, 1.0, 0.0, 0.0, "C", "P", "Air"),
            record("East", "Corporate", 2021, 2.0, 0.0, 0.0, "C", "P", "Air"),
            record("West", "Consumer", 2021, 3.0, 0.0, 0.0, "C", "P", "Air"),
            record("South", "Consumer", 2022, 4.0, 0.0, 0.0, "C", "P", "Air"),
        ]);
        let filters = FilterSet {
            regions: ["East", "West"].iter().map(|s| s.to_string()).collect(),
            years: [2021].into_iter().collect(),
            ..FilterSet::default()
        };
        let once = apply_filters(&ds, &filters);
        let twice = once.refine(&filters);
        assert_eq!(once, twice);
        assert_eq!(once.indices(), &[1, 2]);
    }

    #[test]
    fn predicates_combine_with_and() {
        let ds = east_west();
        let filters = FilterSet {
            regions: ["East".to_string()].into_iter().collect(),
            years: [2021].into_iter().collect(),
            ..FilterSet::default()
        };
        assert!(apply_filters(&ds, &filters).is_empty());
    }

    #[test]
    fn unknown_values_exclude_everything() {
        let ds = east_west();
        assert!(apply_filters(&ds, &regions(&["North"])).is_empty());
    }

    #[test]
    fn toggling_twice_restores_no_filter() {
        let mut filters = FilterSet::default();
        filters.toggle_segment("Consumer");
        assert_eq!(filters.selected_count(FilterColumn::Segment), 1);
        assert!(!filters.is_unfiltered());
        filters.toggle_segment("Consumer");
        assert!(filters.is_unfiltered());

        filters.toggle_year(2020);
        filters.toggle_region("East");
        filters.clear(FilterColumn::Year);
        assert!(filters.years.is_empty());
        assert_eq!(filters.regions.len(), 1);
    }

    #[test]
    fn from_indices_drops_out_of_range_rows() {
        let ds = east_west();
        let view = FilteredView::from_indices(&ds, &[1, 5]);
        assert_eq!(view.indices(), &[1]);
    }
}
