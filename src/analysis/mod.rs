/// Analysis layer: the numeric pipelines behind the three views.
///
/// * `correlation` – pairwise Pearson similarity over rank vectors
/// * `aggregate`   – divergence and stacked count tables
///
/// Everything here is pure: a dataset plus an index subset in, a table out.
/// Nothing is cached; each call recomputes from scratch.

pub mod aggregate;
pub mod correlation;

use thiserror::Error;

/// A view could not be computed from the current selection.
///
/// These are per-query conditions, not failures: callers render an explicit
/// "no data" state instead of aborting.
#[derive(Debug, Error, PartialEq)]
pub enum AnalysisError {
    #[error("insufficient data for correlation: {0}")]
    InsufficientData(&'static str),

    #[error("no characters match the current selection")]
    EmptySelection,

    #[error("no character named '{0}' in the current selection")]
    UnknownCharacter(String),
}
