//! Scoring engine: weighted subject sum, interest bonus, math-comfort tuning.
//!
//! Algorithm, per field, in this exact order:
//! 1. base = Σ weight[s] × score[s] over the field's weight table
//! 2. × 1.08 for every (declared interest, bonus group listing the field) pair
//! 3. × 0.87 (Low) or × 1.06 (High) when the field is math-sensitive
//!
//! Bonuses compound: a field listed by two of the student's interests gets
//! 1.08². That may be intended (stronger signal, stronger boost) or an
//! oversight (one bonus per field was meant); it is kept as is, so changing it
//! is a catalog-policy decision, not a bug fix.
//!
//! A subject missing from the profile's score map contributes 0.

use serde::Serialize;
use tracing::debug;

use crate::recommendation::catalog::{FieldCatalog, FieldDefinition};
use crate::recommendation::profile::{MathComfort, StudentProfile, SubjectScores};

pub const INTEREST_BONUS_FACTOR: f64 = 1.08;
pub const LOW_MATH_COMFORT_FACTOR: f64 = 0.87;
pub const HIGH_MATH_COMFORT_FACTOR: f64 = 1.06;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldScore {
    pub field: String,
    pub score: f64,
}

/// Score of every catalog field, in catalog declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ScoreResult(Vec<FieldScore>);

impl ScoreResult {
    #[cfg(test)]
    pub fn from_scores(scores: Vec<FieldScore>) -> Self {
        Self(scores)
    }

    #[cfg(test)]
    pub fn get(&self, field: &str) -> Option<f64> {
        self.0.iter().find(|s| s.field == field).map(|s| s.score)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldScore> {
        self.0.iter()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Scores every field in `catalog` for `profile`. No field is ever dropped.
pub fn score(catalog: &FieldCatalog, profile: &StudentProfile) -> ScoreResult {
    let mut scores: Vec<FieldScore> = catalog
        .fields()
        .iter()
        .map(|field| FieldScore {
            field: field.id.clone(),
            score: base_score(field, profile.scores()),
        })
        .collect();

    for interest in profile.interests() {
        for target in catalog.bonus_targets(*interest) {
            match catalog.position(target) {
                Some(i) => scores[i].score *= INTEREST_BONUS_FACTOR,
                None => debug!("Bonus target '{target}' for {interest:?} is not in the catalog, skipping"),
            }
        }
    }

    if let Some(factor) = comfort_factor(profile.math_comfort()) {
        for (entry, field) in scores.iter_mut().zip(catalog.fields()) {
            if field.math_sensitive {
                entry.score *= factor;
            }
        }
    }

    ScoreResult(scores)
}

fn base_score(field: &FieldDefinition, scores: &SubjectScores) -> f64 {
    // Accumulated in f64: weights are unbounded and a u32 sum could overflow.
    field
        .weights
        .iter()
        .map(|(subject, weight)| f64::from(*weight) * f64::from(scores.get(*subject).unwrap_or(0)))
        .sum()
}

fn comfort_factor(comfort: MathComfort) -> Option<f64> {
    match comfort {
        MathComfort::Low => Some(LOW_MATH_COMFORT_FACTOR),
        MathComfort::Medium => None,
        MathComfort::High => Some(HIGH_MATH_COMFORT_FACTOR),
    }
}
