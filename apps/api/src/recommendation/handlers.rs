//! Axum route handlers for the Recommendation API.
//!
//! These routes never touch the LLM: scoring and ranking are pure.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::recommendation::catalog::FieldCatalog;
use crate::recommendation::profile::{Interest, ProfileForm, Subject};
use crate::recommendation::scoring::{
    HIGH_MATH_COMFORT_FACTOR, INTEREST_BONUS_FACTOR, LOW_MATH_COMFORT_FACTOR,
};
use crate::recommendation::{recommend, Recommendation};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct SubjectWeight {
    pub subject: Subject,
    pub label: &'static str,
    pub weight: u32,
}

#[derive(Debug, Serialize)]
pub struct CatalogField {
    pub id: String,
    pub weights: Vec<SubjectWeight>,
    /// Interests whose bonus applies to this field.
    pub interests: Vec<Interest>,
    pub math_sensitive: bool,
}

#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub fields: Vec<CatalogField>,
    pub interest_bonus_factor: f64,
    pub low_math_comfort_factor: f64,
    pub high_math_comfort_factor: f64,
}

impl CatalogResponse {
    fn from_catalog(catalog: &FieldCatalog) -> Self {
        let fields = catalog
            .fields()
            .iter()
            .map(|f| CatalogField {
                id: f.id.clone(),
                weights: f
                    .weights
                    .iter()
                    .map(|(subject, weight)| SubjectWeight {
                        subject: *subject,
                        label: subject.label(),
                        weight: *weight,
                    })
                    .collect(),
                interests: catalog.interests_for(&f.id),
                math_sensitive: f.math_sensitive,
            })
            .collect();

        Self {
            fields,
            interest_bonus_factor: INTEREST_BONUS_FACTOR,
            low_math_comfort_factor: LOW_MATH_COMFORT_FACTOR,
            high_math_comfort_factor: HIGH_MATH_COMFORT_FACTOR,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    #[serde(flatten)]
    pub profile: ProfileForm,
    /// Defaults to the configured `TOP_N`.
    pub top_n: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub summary: String,
    #[serde(flatten)]
    pub recommendation: Recommendation,
    pub ignored_interests: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/catalog
///
/// Returns every candidate field with its subject weights, bonus interests
/// and math sensitivity.
pub async fn handle_get_catalog(State(state): State<AppState>) -> Json<CatalogResponse> {
    Json(CatalogResponse::from_catalog(&state.catalog))
}

/// POST /api/v1/recommendations
///
/// Scores a profile and returns all field scores plus the top-N ranking.
pub async fn handle_recommend(
    State(state): State<AppState>,
    Json(request): Json<RecommendationRequest>,
) -> Result<Json<RecommendationResponse>, AppError> {
    let top_n = request.top_n.unwrap_or(state.config.top_n);
    if top_n == 0 {
        return Err(AppError::Validation("top_n must be at least 1".to_string()));
    }

    let parsed = request.profile.parse()?;
    let recommendation = recommend(&state.catalog, &parsed.profile, top_n)?;

    tracing::debug!(
        top = ?recommendation.ranking.field_names().first(),
        ignored = parsed.ignored_interests.len(),
        "Recommendation computed"
    );

    Ok(Json(RecommendationResponse {
        summary: parsed.profile.summary(),
        recommendation,
        ignored_interests: parsed.ignored_interests,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_response_lists_every_field_with_interests() {
        let catalog = FieldCatalog::builtin().unwrap();
        let response = CatalogResponse::from_catalog(&catalog);
        assert_eq!(response.fields.len(), catalog.len());

        let pharmacy = response.fields.iter().find(|f| f.id == "Farmasi").unwrap();
        assert!(pharmacy.interests.contains(&Interest::Health));
        assert!(pharmacy.weights.iter().any(|w| w.subject == Subject::Chemistry));
    }

    #[test]
    fn test_request_accepts_flat_form_with_top_n() {
        let request: RecommendationRequest = serde_json::from_str(
            r#"{"interests": ["Kesehatan", "Astronomi"], "scores": {"biology": 9}, "top_n": 3}"#,
        )
        .unwrap();
        assert_eq!(request.top_n, Some(3));
        assert_eq!(request.profile.interests, vec!["Kesehatan", "Astronomi"]);
        assert_eq!(request.profile.scores.get(&Subject::Biology), Some(&9));
    }
}
