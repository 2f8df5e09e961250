/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  Vec<Record>, filter domain
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterState → Predicate → filtered subset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  summary  │  group-by means, ranking, histogram, boxplot
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ forecast  │  drift projection of yearly means
///   └──────────┘
/// ```

pub mod filter;
pub mod forecast;
pub mod loader;
pub mod model;
pub mod summary;
