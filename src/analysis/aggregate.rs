use super::AnalysisError;
use crate::data::model::{CharacterDataset, Role};

// ---------------------------------------------------------------------------
// Divergence table (diverging-bar view)
// ---------------------------------------------------------------------------

/// One row of the diverging-bar table: how much more often a value tops
/// antagonist rankings than protagonist rankings.
#[derive(Debug, Clone, PartialEq)]
pub struct DivergenceRow {
    pub value_name: String,
    /// `a_share - p_share`, in [-1, 1].
    pub divergence: f64,
    /// Share of protagonists whose top value this is (0 when there are no
    /// protagonists in the selection).
    pub p_share: f64,
    /// Same for antagonists.
    pub a_share: f64,
}

/// Count top values per role over the subset and normalise by role total.
///
/// Categories are the distinct top values of the subset, in first-appearance
/// order; rows come back sorted descending by divergence. A role with zero
/// total contributes 0 shares rather than NaN.
pub fn divergence_table(
    dataset: &CharacterDataset,
    indices: &[usize],
) -> Result<Vec<DivergenceRow>, AnalysisError> {
    if indices.is_empty() {
        return Err(AnalysisError::EmptySelection);
    }

    let mut categories: Vec<&str> = Vec::new();
    for &i in indices {
        if let Some(top) = dataset.characters[i].top_value() {
            if !categories.contains(&top) {
                categories.push(top);
            }
        }
    }

    let mut p_counts = vec![0usize; categories.len()];
    let mut a_counts = vec![0usize; categories.len()];
    for &i in indices {
        let ch = &dataset.characters[i];
        let Some(top) = ch.top_value() else { continue };
        let Some(slot) = categories.iter().position(|c| *c == top) else {
            continue;
        };
        match ch.role {
            Role::Protagonist => p_counts[slot] += 1,
            Role::Antagonist => a_counts[slot] += 1,
            Role::Other(_) => {}
        }
    }

    let p_total: usize = p_counts.iter().sum();
    let a_total: usize = a_counts.iter().sum();
    let share = |count: usize, total: usize| {
        if total > 0 {
            count as f64 / total as f64
        } else {
            0.0
        }
    };

    let mut rows: Vec<DivergenceRow> = categories
        .iter()
        .enumerate()
        .map(|(slot, value)| {
            let p = share(p_counts[slot], p_total);
            let a = share(a_counts[slot], a_total);
            DivergenceRow {
                value_name: value.to_string(),
                divergence: a - p,
                p_share: p,
                a_share: a,
            }
        })
        .collect();

    rows.sort_by(|x, y| y.divergence.total_cmp(&x.divergence));
    Ok(rows)
}

/// Serialise a divergence table in the export format, one row per line:
/// `family: 12.5% (p: 25.0%, a: 37.5%)`.
pub fn divergence_report(rows: &[DivergenceRow]) -> String {
    rows.iter()
        .map(|r| {
            format!(
                "{}: {:.1}% (p: {:.1}%, a: {:.1}%)",
                r.value_name,
                r.divergence * 100.0,
                r.p_share * 100.0,
                r.a_share * 100.0
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// ---------------------------------------------------------------------------
// Stacked count table (stacked-bar view)
// ---------------------------------------------------------------------------

/// Raw frequency of each top-value category per selected genre. Cumulative
/// stacking is left to the renderer.
#[derive(Debug, Clone)]
pub struct StackedTable {
    /// Category axis: the full dataset's top values, independent of the
    /// current filter, so the axis stays stable across selections.
    pub categories: Vec<String>,
    /// Selected genres, one stack layer each.
    pub genres: Vec<String>,
    /// `counts[category][genre]`.
    pub counts: Vec<Vec<usize>>,
}

impl StackedTable {
    pub fn get(&self, category: &str, genre: &str) -> Option<usize> {
        let c = self.categories.iter().position(|x| x == category)?;
        let g = self.genres.iter().position(|x| x == genre)?;
        Some(self.counts[c][g])
    }

    /// Stack height for a category: the sum over its genre layers.
    pub fn category_total(&self, category: &str) -> usize {
        self.categories
            .iter()
            .position(|x| x == category)
            .map(|c| self.counts[c].iter().sum())
            .unwrap_or(0)
    }
}

/// Tally top values of the subset per selected genre.
pub fn stacked_counts(
    dataset: &CharacterDataset,
    indices: &[usize],
    genres: &[&str],
) -> Result<StackedTable, AnalysisError> {
    if indices.is_empty() {
        return Err(AnalysisError::EmptySelection);
    }

    let categories = dataset.top_values.clone();
    let mut counts = vec![vec![0usize; genres.len()]; categories.len()];

    for &i in indices {
        let ch = &dataset.characters[i];
        let Some(top) = ch.top_value() else { continue };
        let Some(c) = categories.iter().position(|x| x == top) else {
            continue;
        };
        if let Some(g) = genres.iter().position(|x| *x == ch.genre) {
            counts[c][g] += 1;
        }
    }

    Ok(StackedTable {
        categories,
        genres: genres.iter().map(|g| g.to_string()).collect(),
        counts,
    })
}

// ---------------------------------------------------------------------------
// Movie listing (companion panel of the stacked view)
// ---------------------------------------------------------------------------

/// One movie of the filtered subset with its characters.
#[derive(Debug, Clone)]
pub struct MovieEntry {
    pub title: String,
    pub rating: f64,
    /// Characters of this movie in the subset: (name, role).
    pub characters: Vec<(String, Role)>,
}

/// Group the subset by movie, in first-appearance order. Rows without a
/// movie title are skipped; unnamed characters are not listed.
pub fn movie_listing(dataset: &CharacterDataset, indices: &[usize]) -> Vec<MovieEntry> {
    let mut entries: Vec<MovieEntry> = Vec::new();

    for &i in indices {
        let ch = &dataset.characters[i];
        if ch.movie_name.is_empty() {
            continue;
        }
        let entry = match entries.iter_mut().find(|e| e.title == ch.movie_name) {
            Some(e) => e,
            None => {
                entries.push(MovieEntry {
                    title: ch.movie_name.clone(),
                    rating: ch.rating,
                    characters: Vec::new(),
                });
                entries.last_mut().unwrap()
            }
        };
        if !ch.name.is_empty() {
            entry.characters.push((ch.name.clone(), ch.role.clone()));
        }
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Character;

    fn ch(name: &str, movie: &str, genre: &str, role: &str, top: &str) -> Character {
        Character {
            name: name.to_string(),
            movie_name: movie.to_string(),
            genre: genre.to_string(),
            role: Role::parse(role),
            rating: 8.0,
            value_list: vec![top.to_string(), "rest".to_string()],
            value_rank: vec![1.0, 2.0],
            vec: vec![],
        }
    }

    fn sample() -> CharacterDataset {
        CharacterDataset::from_characters(vec![
            ch("P1", "M1", "Action", "protagonist", "honor"),
            ch("P2", "M1", "Action", "protagonist", "honor"),
            ch("P3", "M2", "Drama", "protagonist", "love"),
            ch("A1", "M1", "Action", "antagonist", "power"),
            ch("A2", "M2", "Drama", "antagonist", "power"),
            ch("A3", "M2", "Drama", "antagonist", "love"),
            ch("S1", "M2", "Drama", "narrator", "love"),
        ])
    }

    fn all_indices(ds: &CharacterDataset) -> Vec<usize> {
        (0..ds.len()).collect()
    }

    #[test]
    fn shares_per_role_sum_to_one() {
        let ds = sample();
        let rows = divergence_table(&ds, &all_indices(&ds)).unwrap();

        let p_sum: f64 = rows.iter().map(|r| r.p_share).sum();
        let a_sum: f64 = rows.iter().map(|r| r.a_share).sum();
        assert!((p_sum - 1.0).abs() < 1e-12);
        assert!((a_sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn rows_are_sorted_descending_by_divergence() {
        let ds = sample();
        let rows = divergence_table(&ds, &all_indices(&ds)).unwrap();
        for pair in rows.windows(2) {
            assert!(pair[0].divergence >= pair[1].divergence);
        }
        // power: a=2/3, p=0 → strongest antagonist lean, first row.
        assert_eq!(rows[0].value_name, "power");
        assert!((rows[0].divergence - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn missing_role_group_yields_zero_shares_not_nan() {
        let ds = CharacterDataset::from_characters(vec![
            ch("P1", "M1", "Action", "protagonist", "honor"),
            ch("P2", "M1", "Action", "protagonist", "love"),
        ]);
        let rows = divergence_table(&ds, &[0, 1]).unwrap();
        for row in &rows {
            assert_eq!(row.a_share, 0.0);
            assert!(row.divergence.is_finite());
        }
        // All divergences are -p_share, so every row is ≤ 0.
        assert!(rows.iter().all(|r| r.divergence <= 0.0));
    }

    #[test]
    fn empty_selection_is_reported() {
        let ds = sample();
        assert_eq!(
            divergence_table(&ds, &[]).unwrap_err(),
            AnalysisError::EmptySelection
        );
        assert_eq!(
            stacked_counts(&ds, &[], &["Action"]).unwrap_err(),
            AnalysisError::EmptySelection
        );
    }

    #[test]
    fn report_format_matches_export_lines() {
        let rows = vec![
            DivergenceRow {
                value_name: "power".into(),
                divergence: 0.125,
                p_share: 0.25,
                a_share: 0.375,
            },
            DivergenceRow {
                value_name: "honor".into(),
                divergence: -0.5,
                p_share: 0.5,
                a_share: 0.0,
            },
        ];
        assert_eq!(
            divergence_report(&rows),
            "power: 12.5% (p: 25.0%, a: 37.5%)\nhonor: -50.0% (p: 50.0%, a: 0.0%)"
        );
    }

    #[test]
    fn stacked_counts_tally_per_category_and_genre() {
        let ds = sample();
        let table = stacked_counts(&ds, &all_indices(&ds), &["Action", "Drama"]).unwrap();

        // Category axis is the full dataset axis, in first-appearance order.
        assert_eq!(table.categories, vec!["honor", "love", "power"]);
        assert_eq!(table.get("honor", "Action"), Some(2));
        assert_eq!(table.get("honor", "Drama"), Some(0));
        assert_eq!(table.get("love", "Drama"), Some(3));
        assert_eq!(table.get("power", "Action"), Some(1));
        assert_eq!(table.category_total("power"), 2);
    }

    #[test]
    fn unselected_genres_are_not_counted() {
        let ds = sample();
        let table = stacked_counts(&ds, &all_indices(&ds), &["Drama"]).unwrap();
        assert_eq!(table.get("honor", "Drama"), Some(0));
        assert_eq!(table.get("honor", "Action"), None);
        assert_eq!(table.category_total("honor"), 0);
    }

    #[test]
    fn movie_listing_groups_in_first_appearance_order() {
        let ds = sample();
        let movies = movie_listing(&ds, &all_indices(&ds));
        assert_eq!(movies.len(), 2);
        assert_eq!(movies[0].title, "M1");
        assert_eq!(movies[0].characters.len(), 3);
        assert_eq!(movies[1].title, "M2");
        assert_eq!(
            movies[1].characters[0],
            ("P3".to_string(), Role::Protagonist)
        );
    }
}
