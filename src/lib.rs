//! Core pipelines behind the character-value charts: load a CSV/JSON
//! character dataset, filter it by role/genre/search, and derive the
//! similarity matrix, divergence table, and stacked count table a renderer
//! draws from. No rendering lives here; [`state::Session`] is the surface a
//! UI adapter (or the bundled CLI) drives.

pub mod analysis;
pub mod data;
pub mod state;
