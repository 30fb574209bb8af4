//! Ranking: orders a `ScoreResult` and keeps the top N.
//!
//! Tie-break: stable sort over catalog declaration order, so equal scores
//! always come out in the order the fields are declared.

use serde::Serialize;

use crate::recommendation::scoring::ScoreResult;
use crate::recommendation::RecommendationError;

/// How many fields are recommended when the caller does not say otherwise.
pub const DEFAULT_TOP_N: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedField {
    /// 1-based position.
    pub rank: usize,
    pub field: String,
    pub score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RankedRecommendation {
    pub fields: Vec<RankedField>,
}

impl RankedRecommendation {
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.field.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Sorts by descending score and truncates to `top_n`. No padding when fewer
/// fields exist.
pub fn rank(result: &ScoreResult, top_n: usize) -> Result<RankedRecommendation, RecommendationError> {
    if result.is_empty() {
        return Err(RecommendationError::EmptyCatalog);
    }

    let mut ordered: Vec<_> = result.iter().collect();
    // `sort_by` is stable: ties keep catalog order.
    ordered.sort_by(|a, b| b.score.total_cmp(&a.score));

    let fields = ordered
        .into_iter()
        .take(top_n)
        .enumerate()
        .map(|(i, s)| RankedField {
            rank: i + 1,
            field: s.field.clone(),
            score: s.score,
        })
        .collect();

    Ok(RankedRecommendation { fields })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommendation::catalog::FieldCatalog;
    use crate::recommendation::profile::{Interest, MathComfort, StudentProfile, Subject, SubjectScores};
    use crate::recommendation::scoring::{score, FieldScore};

    fn scores(pairs: &[(&str, f64)]) -> ScoreResult {
        ScoreResult::from_scores(
            pairs
                .iter()
                .map(|(field, score)| FieldScore {
                    field: field.to_string(),
                    score: *score,
                })
                .collect(),
        )
    }

    fn math_informatics(comfort: MathComfort) -> StudentProfile {
        StudentProfile::builder()
            .scores(
                SubjectScores::uniform(0)
                    .with(Subject::Mathematics, 10)
                    .with(Subject::Informatics, 10),
            )
            .math_comfort(comfort)
            .build()
            .unwrap()
    }

    #[test]
    fn test_math_informatics_profile_ranks_tied_pair_in_catalog_order() {
        let result = score(&FieldCatalog::builtin().unwrap(), &math_informatics(MathComfort::Medium));
        let ranked = rank(&result, DEFAULT_TOP_N).unwrap();

        assert_eq!(ranked.fields[0].field, "Teknik Informatika / Ilmu Komputer");
        assert_eq!(ranked.fields[1].field, "Data Science / AI");
        assert_eq!(ranked.fields[0].score, 60.0);
        assert_eq!(ranked.fields[1].score, 60.0);
        assert_eq!(ranked.fields[0].rank, 1);
        assert_eq!(ranked.fields[1].rank, 2);
    }

    #[test]
    fn test_low_comfort_keeps_pair_on_top() {
        let result = score(&FieldCatalog::builtin().unwrap(), &math_informatics(MathComfort::Low));
        let ranked = rank(&result, DEFAULT_TOP_N).unwrap();

        assert_eq!(
            &ranked.field_names()[..2],
            &["Teknik Informatika / Ilmu Komputer", "Data Science / AI"]
        );
        assert!((ranked.fields[0].score - 52.2).abs() < 1e-9);
        assert!((ranked.fields[1].score - 52.2).abs() < 1e-9);
    }

    #[test]
    fn test_top_five_is_bounded_ordered_and_from_catalog() {
        let catalog = FieldCatalog::builtin().unwrap();
        let profile = StudentProfile::builder()
            .interest(Interest::Health)
            .interest(Interest::Science)
            .score(Subject::Biology, 9)
            .score(Subject::Chemistry, 8)
            .build()
            .unwrap();
        let ranked = rank(&score(&catalog, &profile), DEFAULT_TOP_N).unwrap();

        assert_eq!(ranked.len(), 5);
        for pair in ranked.fields.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        assert!(ranked.fields.iter().all(|f| catalog.get(&f.field).is_some()));
        assert_eq!(ranked.fields[0].field, "Farmasi");
    }

    #[test]
    fn test_ties_keep_input_order() {
        let ranked = rank(&scores(&[("A", 1.0), ("B", 3.0), ("C", 1.0), ("D", 3.0)]), 4).unwrap();
        assert_eq!(ranked.field_names(), vec!["B", "D", "A", "C"]);
    }

    #[test]
    fn test_fewer_fields_than_top_n_returns_all() {
        let ranked = rank(&scores(&[("A", 2.0), ("B", 5.0)]), 5).unwrap();
        assert_eq!(ranked.field_names(), vec!["B", "A"]);
    }

    #[test]
    fn test_zero_top_n_returns_nothing() {
        let ranked = rank(&scores(&[("A", 2.0)]), 0).unwrap();
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_empty_result_is_empty_catalog_error() {
        let err = rank(&ScoreResult::default(), DEFAULT_TOP_N).unwrap_err();
        assert_eq!(err, RecommendationError::EmptyCatalog);
    }
}
