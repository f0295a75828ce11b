/// Data layer: catalog types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  URL / .csv / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  fetch + parse → Catalog
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Catalog  │  Vec<CatalogRow>, type / country / year indices
///   └──────────┘
///        │
///        ├──────────────┐
///        ▼              ▼
///   ┌──────────┐   ┌───────────┐
///   │  filter   │   │ aggregate  │  counts, top-N, pivot, durations
///   └──────────┘   └───────────┘
///        │              │
///        └──────┬───────┘
///               ▼
///        ┌────────────┐
///        │ dashboard   │  (catalog, selection) → DashboardResults
///        └────────────┘
/// ```

pub mod aggregate;
pub mod dashboard;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
