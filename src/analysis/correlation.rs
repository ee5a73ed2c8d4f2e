use super::AnalysisError;
use crate::data::model::{CharacterDataset, Role};

// ---------------------------------------------------------------------------
// Pearson correlation
// ---------------------------------------------------------------------------

/// Pearson correlation coefficient between two rank vectors, in [-1, 1].
///
/// Degenerate inputs (length mismatch, fewer than two points, zero variance
/// in either vector) are reported as [`AnalysisError::InsufficientData`]
/// instead of silently producing NaN.
pub fn pearson(x: &[f64], y: &[f64]) -> Result<f64, AnalysisError> {
    if x.len() != y.len() {
        return Err(AnalysisError::InsufficientData("vectors differ in length"));
    }
    if x.len() < 2 {
        return Err(AnalysisError::InsufficientData("fewer than two points"));
    }

    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut numerator = 0.0;
    let mut denom_x = 0.0;
    let mut denom_y = 0.0;
    for (&xi, &yi) in x.iter().zip(y) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        numerator += dx * dy;
        denom_x += dx * dx;
        denom_y += dy * dy;
    }

    if denom_x == 0.0 || denom_y == 0.0 {
        return Err(AnalysisError::InsufficientData("zero variance"));
    }
    Ok(numerator / (denom_x * denom_y).sqrt())
}

// ---------------------------------------------------------------------------
// Similarity matrix
// ---------------------------------------------------------------------------

/// Pairwise similarity between the selected characters, with the axis
/// labels the heatmap draws.
#[derive(Debug, Clone)]
pub struct SimilarityMatrix {
    /// Axis labels, in matrix order.
    pub names: Vec<String>,
    /// Role per axis entry (drives the axis label colour downstream).
    pub roles: Vec<Role>,
    /// `cells[i][j]` = correlation between character i and j. Diagonal is
    /// exactly 1; degenerate pairs are 0. Symmetric by construction.
    pub cells: Vec<Vec<f64>>,
}

impl SimilarityMatrix {
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Build the n×n similarity matrix over the given (matrix-ordered) subset.
///
/// `cell[i][i] = 1` by definition; every off-diagonal cell is the Pearson
/// correlation of the two characters' rank vectors, with degenerate pairs
/// mapped to 0 so the output never carries NaN.
pub fn similarity_matrix(
    dataset: &CharacterDataset,
    ordered: &[usize],
) -> Result<SimilarityMatrix, AnalysisError> {
    if ordered.is_empty() {
        return Err(AnalysisError::EmptySelection);
    }

    let names: Vec<String> = ordered
        .iter()
        .map(|&i| dataset.characters[i].name.clone())
        .collect();
    let roles: Vec<Role> = ordered
        .iter()
        .map(|&i| dataset.characters[i].role.clone())
        .collect();

    let cells: Vec<Vec<f64>> = ordered
        .iter()
        .enumerate()
        .map(|(i, &a)| {
            ordered
                .iter()
                .enumerate()
                .map(|(j, &b)| {
                    if i == j {
                        return 1.0;
                    }
                    let rank_a = &dataset.characters[a].value_rank;
                    let rank_b = &dataset.characters[b].value_rank;
                    pearson(rank_a, rank_b).unwrap_or_else(|err| {
                        log::warn!(
                            "similarity of '{}' vs '{}' is degenerate ({err}), using 0",
                            names[i],
                            names[j]
                        );
                        0.0
                    })
                })
                .collect()
        })
        .collect();

    log::debug!("similarity matrix recomputed for {} characters", names.len());
    Ok(SimilarityMatrix { names, roles, cells })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Character;

    fn with_ranks(name: &str, ranks: &[f64]) -> Character {
        Character {
            name: name.to_string(),
            movie_name: "M".to_string(),
            genre: "Drama".to_string(),
            role: Role::parse(if name < "M" { "protagonist" } else { "antagonist" }),
            rating: 7.0,
            value_list: ranks.iter().map(|r| format!("v{r}")).collect(),
            value_rank: ranks.to_vec(),
            vec: vec![],
        }
    }

    #[test]
    fn perfectly_linear_vectors_correlate_to_one() {
        assert_eq!(pearson(&[1.0, 2.0, 3.0], &[2.0, 3.0, 4.0]).unwrap(), 1.0);
    }

    #[test]
    fn self_correlation_is_one() {
        let v = [3.0, 1.0, 4.0, 1.5, 9.0];
        let r = pearson(&v, &v).unwrap();
        assert!((r - 1.0).abs() < 1e-12);
    }

    #[test]
    fn correlation_is_symmetric() {
        let a = [1.0, 2.0, 3.0, 4.0];
        let b = [2.0, 1.0, 4.0, 3.0];
        assert_eq!(pearson(&a, &b).unwrap(), pearson(&b, &a).unwrap());
    }

    #[test]
    fn opposite_rankings_correlate_to_minus_one() {
        let r = pearson(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]).unwrap();
        assert!((r + 1.0).abs() < 1e-12);
    }

    #[test]
    fn degenerate_inputs_are_errors_not_nan() {
        assert!(pearson(&[1.0, 2.0], &[1.0, 2.0, 3.0]).is_err());
        assert!(pearson(&[1.0], &[1.0]).is_err());
        // zero variance
        assert_eq!(
            pearson(&[2.0, 2.0, 2.0], &[1.0, 2.0, 3.0]),
            Err(AnalysisError::InsufficientData("zero variance"))
        );
    }

    #[test]
    fn matrix_diagonal_is_exactly_one() {
        let ds = CharacterDataset::from_characters(vec![
            with_ranks("A", &[1.0, 2.0, 3.0]),
            with_ranks("B", &[2.0, 3.0, 4.0]),
            with_ranks("Z", &[3.0, 1.0, 2.0]),
        ]);
        let m = similarity_matrix(&ds, &[0, 1, 2]).unwrap();
        for i in 0..m.len() {
            assert_eq!(m.cells[i][i], 1.0);
        }
        // symmetry and the known perfectly-linear pair
        assert_eq!(m.cells[0][1], 1.0);
        assert_eq!(m.cells[1][0], m.cells[0][1]);
        assert!(m.cells.iter().flatten().all(|c| c.is_finite()));
    }

    #[test]
    fn zero_variance_pair_yields_zero_cell() {
        let ds = CharacterDataset::from_characters(vec![
            with_ranks("A", &[2.0, 2.0, 2.0]),
            with_ranks("B", &[1.0, 2.0, 3.0]),
        ]);
        let m = similarity_matrix(&ds, &[0, 1]).unwrap();
        assert_eq!(m.cells[0][1], 0.0);
        assert_eq!(m.cells[0][0], 1.0);
    }

    #[test]
    fn empty_selection_is_reported() {
        let ds = CharacterDataset::from_characters(vec![]);
        assert_eq!(
            similarity_matrix(&ds, &[]).unwrap_err(),
            AnalysisError::EmptySelection
        );
    }
}
