//! Rule-based recommendation engine.
//!
//! Profile → `scoring::score` (consults the `FieldCatalog`) → `ScoreResult`
//! → `ranking::rank` → top-N fields. Pure and synchronous: no I/O, no shared
//! mutable state, safe to call from any number of requests at once.

pub mod catalog;
pub mod handlers;
pub mod profile;
pub mod ranking;
pub mod scoring;

use serde::Serialize;
use thiserror::Error;

use crate::recommendation::catalog::FieldCatalog;
use crate::recommendation::profile::StudentProfile;
use crate::recommendation::ranking::{rank, RankedRecommendation};
use crate::recommendation::scoring::{score, ScoreResult};

#[derive(Debug, Error, PartialEq)]
pub enum RecommendationError {
    #[error("field catalog is empty")]
    EmptyCatalog,

    #[error("duplicate field in catalog: {0}")]
    DuplicateField(String),
}

/// Full engine output for one profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub scores: ScoreResult,
    pub ranking: RankedRecommendation,
}

/// Scores every catalog field and keeps the best `top_n`.
pub fn recommend(
    catalog: &FieldCatalog,
    profile: &StudentProfile,
    top_n: usize,
) -> Result<Recommendation, RecommendationError> {
    let scores = score(catalog, profile);
    let ranking = rank(&scores, top_n)?;
    Ok(Recommendation { scores, ranking })
}
