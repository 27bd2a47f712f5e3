/// Data layer: core types, loading, preparation and filtering.
///
/// Architecture:
/// ```text
///  remote CSV ──fallback──► local .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  bytes → Vec<RawRow>   (UTF-8, then latin-1)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  prepare  │  clean fields, explode genres → PreparedDataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  year range, type, country → filtered rows
///   └──────────┘
/// ```

pub mod counts;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod prepare;

#[cfg(test)]
pub(crate) mod testing;
