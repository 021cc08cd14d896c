/// Data layer: core types, loading, filtering, aggregation, pagination.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse + normalize headers + coerce + exclude rows
///   └──────────┘
///        │            (cached per source signature by `cache`)
///        ▼
///   ┌──────────────┐
///   │ ProjectTable  │  Vec<ProjectRecord>, column index, unique values
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  search + membership predicates → filtered table
///   └──────────┘
///        │
///        ├──────────────────┐
///        ▼                  ▼
///   ┌──────────┐      ┌──────────┐
///   │ aggregate │      │   page    │
///   │ (chart)   │      │ (cards)   │
///   └──────────┘      └──────────┘
/// ```

pub mod aggregate;
pub mod cache;
pub mod filter;
pub mod loader;
pub mod model;
pub mod page;
