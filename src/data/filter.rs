use std::collections::BTreeSet;

use super::model::{CharacterDataset, Role};

// ---------------------------------------------------------------------------
// Filter parameters
// ---------------------------------------------------------------------------

/// Role predicate: everything, or one exact role.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RoleFilter {
    #[default]
    All,
    Only(Role),
}

/// Genre predicate. `Only` with an empty set is a valid state meaning
/// "nothing selected": it matches zero characters for every view, and the
/// view builders report it as an empty selection rather than producing
/// degenerate tables.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GenreSelection {
    #[default]
    All,
    Only(BTreeSet<String>),
}

impl GenreSelection {
    pub fn matches(&self, genre: &str) -> bool {
        match self {
            GenreSelection::All => true,
            GenreSelection::Only(set) => set.contains(genre),
        }
    }

    /// The selected genres, resolved against the dataset's genre axis.
    pub fn resolve<'a>(&'a self, all_genres: &'a [String]) -> Vec<&'a str> {
        match self {
            GenreSelection::All => all_genres.iter().map(String::as_str).collect(),
            GenreSelection::Only(set) => set.iter().map(String::as_str).collect(),
        }
    }
}

/// The current filter state, owned by the session and re-applied in full on
/// every change.
#[derive(Debug, Clone, Default)]
pub struct FilterParams {
    pub role: RoleFilter,
    pub genres: GenreSelection,
    /// Case-insensitive substring match against character names. Flags
    /// matches for highlighting; never excludes.
    pub search: String,
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Return indices of characters passing the role and genre filters, in
/// input order.
pub fn filtered_indices(dataset: &CharacterDataset, params: &FilterParams) -> Vec<usize> {
    dataset
        .characters
        .iter()
        .enumerate()
        .filter(|(_, ch)| {
            let role_ok = match &params.role {
                RoleFilter::All => true,
                RoleFilter::Only(role) => ch.role == *role,
            };
            role_ok && params.genres.matches(&ch.genre)
        })
        .map(|(i, _)| i)
        .collect()
}

/// Reorder a filtered subset for matrix display: stable sort by role rank
/// (protagonists, then antagonists, then others), preserving input order
/// within each group.
pub fn matrix_order(dataset: &CharacterDataset, indices: &[usize]) -> Vec<usize> {
    let mut ordered = indices.to_vec();
    ordered.sort_by_key(|&i| dataset.characters[i].role.display_rank());
    ordered
}

/// Per-index highlight flags for a search string: `true` when the character
/// name contains the search text, case-insensitively. An empty search
/// highlights nothing.
pub fn highlight_flags(dataset: &CharacterDataset, indices: &[usize], search: &str) -> Vec<bool> {
    let needle = search.trim().to_lowercase();
    if needle.is_empty() {
        return vec![false; indices.len()];
    }
    indices
        .iter()
        .map(|&i| dataset.characters[i].name.to_lowercase().contains(&needle))
        .collect()
}
