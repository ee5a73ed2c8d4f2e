/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///  .csv / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → CharacterDataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────────────┐
///   │ CharacterDataset  │  Vec<Character>, category axes
///   └──────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  apply role/genre/search → ordered indices
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
