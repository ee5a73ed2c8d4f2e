use std::collections::BTreeSet;

use crate::analysis::aggregate::{
    divergence_table, movie_listing, stacked_counts, DivergenceRow, MovieEntry, StackedTable,
};
use crate::analysis::correlation::{pearson, similarity_matrix, SimilarityMatrix};
use crate::analysis::AnalysisError;
use crate::data::filter::{
    filtered_indices, highlight_flags, matrix_order, FilterParams, GenreSelection, RoleFilter,
};
use crate::data::model::CharacterDataset;

// ---------------------------------------------------------------------------
// Session – the one owned piece of mutable state
// ---------------------------------------------------------------------------

/// A loaded dataset plus the current filter parameters.
///
/// There is exactly one active filter at a time; every mutator refilters
/// synchronously and every view builder recomputes its table from the
/// current visible set, so no derived state survives a filter change.
/// A UI adapter drives this from its event callbacks.
pub struct Session {
    dataset: CharacterDataset,
    params: FilterParams,
    /// Indices of characters passing the current filters (cached).
    visible: Vec<usize>,
}

impl Session {
    /// Start with everything selected and no search.
    pub fn new(dataset: CharacterDataset) -> Self {
        let visible = (0..dataset.len()).collect();
        Session {
            dataset,
            params: FilterParams::default(),
            visible,
        }
    }

    pub fn dataset(&self) -> &CharacterDataset {
        &self.dataset
    }

    pub fn params(&self) -> &FilterParams {
        &self.params
    }

    /// Indices passing the current filters, in source order.
    pub fn visible(&self) -> &[usize] {
        &self.visible
    }

    // -- mutators -----------------------------------------------------------

    pub fn set_role(&mut self, role: RoleFilter) {
        self.params.role = role;
        self.refilter();
    }

    pub fn set_genres(&mut self, genres: GenreSelection) {
        self.params.genres = genres;
        self.refilter();
    }

    /// Toggle a single genre in the selection. Starting from "all", the
    /// first toggle deselects that genre from the full set.
    pub fn toggle_genre(&mut self, genre: &str) {
        let mut set: BTreeSet<String> = match &self.params.genres {
            GenreSelection::All => self.dataset.genres.iter().cloned().collect(),
            GenreSelection::Only(set) => set.clone(),
        };
        if !set.remove(genre) {
            set.insert(genre.to_string());
        }
        self.params.genres = GenreSelection::Only(set);
        self.refilter();
    }

    pub fn select_all_genres(&mut self) {
        self.params.genres = GenreSelection::All;
        self.refilter();
    }

    pub fn select_no_genres(&mut self) {
        self.params.genres = GenreSelection::Only(BTreeSet::new());
        self.refilter();
    }

    /// Search changes highlighting only, never the visible set.
    pub fn set_search(&mut self, text: impl Into<String>) {
        self.params.search = text.into();
    }

    fn refilter(&mut self) {
        self.visible = filtered_indices(&self.dataset, &self.params);
        log::debug!(
            "filter changed: {} of {} characters visible",
            self.visible.len(),
            self.dataset.len()
        );
    }

    // -- view builders ------------------------------------------------------

    /// Heatmap data: the similarity matrix in role order plus highlight
    /// flags aligned with its axes.
    pub fn similarity_view(&self) -> Result<SimilarityView, AnalysisError> {
        let ordered = matrix_order(&self.dataset, &self.visible);
        let matrix = similarity_matrix(&self.dataset, &ordered)?;
        let highlighted = highlight_flags(&self.dataset, &ordered, &self.params.search);
        Ok(SimilarityView { matrix, highlighted })
    }

    /// Diverging-bar data, sorted descending by divergence.
    pub fn divergence_view(&self) -> Result<Vec<DivergenceRow>, AnalysisError> {
        divergence_table(&self.dataset, &self.visible)
    }

    /// Stacked-bar data over the currently selected genres.
    pub fn stacked_view(&self) -> Result<StackedTable, AnalysisError> {
        let genres = self.params.genres.resolve(&self.dataset.genres);
        stacked_counts(&self.dataset, &self.visible, &genres)
    }

    /// Movies of the current subset with their characters.
    pub fn movie_view(&self) -> Vec<MovieEntry> {
        movie_listing(&self.dataset, &self.visible)
    }

    /// Detail comparison of two visible characters (the heatmap cell-click
    /// panel): their correlation and value lists aligned rank by rank.
    pub fn compare(&self, name_a: &str, name_b: &str) -> Result<PairComparison, AnalysisError> {
        let find = |name: &str| {
            self.visible
                .iter()
                .map(|&i| &self.dataset.characters[i])
                .find(|ch| ch.name == name)
                .ok_or_else(|| AnalysisError::UnknownCharacter(name.to_string()))
        };
        let a = find(name_a)?;
        let b = find(name_b)?;

        let correlation = pearson(&a.value_rank, &b.value_rank)?;
        let depth = a.value_list.len().max(b.value_list.len());
        let at = |list: &[String], i: usize| list.get(i).cloned().unwrap_or_default();
        let rows = (0..depth)
            .map(|i| (at(&a.value_list, i), at(&b.value_list, i)))
            .collect();

        Ok(PairComparison {
            name_a: a.name.clone(),
            name_b: b.name.clone(),
            correlation,
            rows,
        })
    }
}

/// Similarity matrix plus highlight flags, axis-aligned.
pub struct SimilarityView {
    pub matrix: SimilarityMatrix,
    pub highlighted: Vec<bool>,
}

/// Rank-by-rank comparison of two characters' value lists.
#[derive(Debug, Clone)]
pub struct PairComparison {
    pub name_a: String,
    pub name_b: String,
    pub correlation: f64,
    /// `(value of a, value of b)` per rank position, top first.
    pub rows: Vec<(String, String)>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::read_csv;
    use crate::data::model::Role;

    const SAMPLE: &str = "\
name,movie_name,genre,role,rating,value_list,value_rank,vec
Maximus,Gladiator,Action,protagonist,8.5,\"['honor', 'family', 'power']\",\"[1, 2, 3]\",0.1 0.2
Commodus,Gladiator,Action,antagonist,8.5,\"['power', 'family', 'honor']\",\"[3, 2, 1]\",0.3 0.4
Amelie,Amelie,Romance,protagonist,8.3,\"['love', 'family', 'honor']\",\"[1, 3, 2]\",0.5 0.6
";

    fn session() -> Session {
        Session::new(read_csv(SAMPLE.as_bytes()).unwrap())
    }

    #[test]
    fn filter_change_replaces_visible_set() {
        let mut s = session();
        assert_eq!(s.visible().len(), 3);

        s.set_role(RoleFilter::Only(Role::Antagonist));
        assert_eq!(s.visible(), &[1]);

        s.set_role(RoleFilter::All);
        s.toggle_genre("Action");
        assert_eq!(s.visible(), &[2]);

        s.select_all_genres();
        assert_eq!(s.visible().len(), 3);
    }

    #[test]
    fn deselecting_every_genre_empties_all_views() {
        let mut s = session();
        s.select_no_genres();
        assert!(s.visible().is_empty());
        assert_eq!(
            s.divergence_view().unwrap_err(),
            AnalysisError::EmptySelection
        );
        assert_eq!(
            s.similarity_view().map(|_| ()).unwrap_err(),
            AnalysisError::EmptySelection
        );
        assert_eq!(s.stacked_view().map(|_| ()).unwrap_err(), AnalysisError::EmptySelection);
    }

    #[test]
    fn similarity_axes_are_role_ordered_and_search_aligned() {
        let mut s = session();
        s.set_search("comm");
        let view = s.similarity_view().unwrap();

        // Protagonists first, antagonist last.
        assert_eq!(view.matrix.names, vec!["Maximus", "Amelie", "Commodus"]);
        assert_eq!(view.highlighted, vec![false, false, true]);
        assert_eq!(view.matrix.cells[0][0], 1.0);
    }

    #[test]
    fn search_does_not_shrink_the_visible_set() {
        let mut s = session();
        s.set_search("maximus");
        assert_eq!(s.visible().len(), 3);
    }

    #[test]
    fn compare_aligns_value_lists_by_rank() {
        let s = session();
        let cmp = s.compare("Maximus", "Commodus").unwrap();
        assert!((cmp.correlation + 1.0).abs() < 1e-12); // opposite rankings
        assert_eq!(cmp.rows[0], ("honor".to_string(), "power".to_string()));
        assert_eq!(cmp.rows.len(), 3);
    }

    #[test]
    fn compare_names_the_unknown_character() {
        let mut s = session();
        assert_eq!(
            s.compare("Maximus", "Nobody").map(|_| ()).unwrap_err(),
            AnalysisError::UnknownCharacter("Nobody".to_string())
        );

        // A filtered-out character is unknown too, not an empty selection.
        s.set_role(RoleFilter::Only(Role::Protagonist));
        assert_eq!(
            s.compare("Maximus", "Commodus").map(|_| ()).unwrap_err(),
            AnalysisError::UnknownCharacter("Commodus".to_string())
        );
    }
}
