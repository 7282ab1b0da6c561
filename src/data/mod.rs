/// Data layer: row types, loading, aggregation, and windowing.
///
/// Architecture:
/// ```text
///  MassData.tsv / .csv / .json   (file or URL)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse text → MassDataset (raw rows, file order)
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate │  parse dates + masses → CumulativeSeries
///   └───────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  date window → visible point indices
///   └──────────┘
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
