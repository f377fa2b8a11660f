/// Data layer: core types, loading, caching and filtering.
///
/// Architecture:
/// ```text
///  .csv / .tsv / .txt / .json / .parquet
///        │
///        ▼
///   ┌──────────┐      ┌──────────────┐
///   │  loader   │ ◄─── │ DatasetCache │  path → Arc<Dataset>, explicit clear
///   └──────────┘      └──────────────┘
///        │  header check, typed rows
///        ▼
///   ┌──────────┐
///   │ Dataset   │  Vec<SalesRecord>, filter options
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  Region / Segment / Year predicates → FilteredView
///   └──────────┘
/// ```

pub mod cache;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
