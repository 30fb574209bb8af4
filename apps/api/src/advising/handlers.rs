//! Axum route handlers for the Sessions and Chat API.

use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::advising::document::{extract_text, DocumentMetadata};
use crate::advising::prompts::{QuickAction, QUICK_ACTIONS};
use crate::advising::retrieval::{Chunker, ContextIndex, DEFAULT_TOP_K, PROFILE_SOURCE};
use crate::advising::session::{ChatMessage, Session};
use crate::errors::AppError;
use crate::recommendation::profile::ProfileForm;
use crate::recommendation::{recommend, Recommendation};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: Uuid,
    pub summary: String,
    #[serde(flatten)]
    pub recommendation: Recommendation,
    pub ignored_interests: Vec<String>,
    pub document: Option<DocumentMetadata>,
    pub messages: Vec<ChatMessage>,
    /// Non-fatal problems: unreadable attachment, advisor failure.
    pub warnings: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub session_id: Option<Uuid>,
    pub question: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub session_id: Option<Uuid>,
    pub answer: String,
    /// `true` when the answer was grounded on retrieved session context.
    pub used_context: bool,
}

#[derive(Debug, Serialize)]
pub struct QuickActionsResponse {
    pub actions: &'static [QuickAction],
}

/// Parts collected from the session multipart form.
#[derive(Default)]
struct SessionUpload {
    profile: Option<String>,
    document: Option<(String, Bytes)>,
}

fn multipart_error(e: MultipartError) -> AppError {
    AppError::Validation(format!("invalid multipart body: {e}"))
}

async fn read_upload(mut multipart: Multipart) -> Result<SessionUpload, AppError> {
    let mut upload = SessionUpload::default();
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("profile") => upload.profile = Some(field.text().await.map_err(multipart_error)?),
            Some("document") => {
                let file_name = field.file_name().unwrap_or("dokumen").to_string();
                let data = field.bytes().await.map_err(multipart_error)?;
                if !data.is_empty() {
                    upload.document = Some((file_name, data));
                }
            }
            other => warn!("Ignoring unexpected multipart field {:?}", other),
        }
    }
    Ok(upload)
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions
///
/// Multipart form: `profile` (JSON profile form) and optional `document`
/// (PDF or TXT). Runs the recommendation engine, indexes the profile and the
/// document for retrieval, and asks the advisor for initial advice.
/// Document and advisor failures degrade into `warnings`.
pub async fn handle_create_session(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<CreateSessionResponse>), AppError> {
    let upload = read_upload(multipart).await?;
    let raw_profile = upload
        .profile
        .ok_or_else(|| AppError::Validation("missing `profile` form field".to_string()))?;

    let parsed = ProfileForm::from_json(&raw_profile)?.parse()?;
    let recommendation = recommend(&state.catalog, &parsed.profile, state.config.top_n)?;
    let summary = parsed.profile.summary();

    let mut warnings = Vec::new();
    let chunker = Chunker::default();
    let mut index = ContextIndex::new();
    index.add_document(PROFILE_SOURCE, &summary, &chunker);

    let mut document = None;
    if let Some((file_name, data)) = upload.document {
        match extract_text(&file_name, data).await {
            Ok(doc) => {
                index.add_document(&doc.metadata.source, &doc.text, &chunker);
                info!(
                    "Indexed document {} ({} words)",
                    doc.metadata.source, doc.metadata.word_count
                );
                document = Some(doc.metadata);
            }
            Err(e) => {
                warn!("Document {file_name} skipped: {e}");
                warnings.push(format!(
                    "{file_name}: {e}. Analysis continues without the attachment."
                ));
            }
        }
    }

    let mut session = Session::new(
        parsed.profile,
        recommendation,
        parsed.ignored_interests,
        document,
        index,
    );

    match &state.advisor {
        Some(advisor) => {
            let advice = advisor
                .initial_advice(&session.summary, &session.recommendation.ranking)
                .await;
            match advice {
                Ok(advice) => session.messages.push(ChatMessage::assistant(advice)),
                Err(e) => {
                    warn!("Initial advice failed: {e}");
                    warnings.push(format!("Initial advice could not be generated: {e}"));
                }
            }
        }
        None => warnings.push(
            "AI advisor is not configured; showing rule-based results only.".to_string(),
        ),
    }

    let response = CreateSessionResponse {
        session_id: session.id,
        summary: session.summary.clone(),
        recommendation: session.recommendation.clone(),
        ignored_interests: session.ignored_interests.clone(),
        document: session.document.clone(),
        messages: session.messages.clone(),
        warnings,
    };

    let id = state.sessions.insert(session).await;
    info!("Session {id} created");

    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Session>, AppError> {
    state
        .sessions
        .get(id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("session {id}")))
}

/// DELETE /api/v1/sessions/:id
///
/// Clears the session: profile, results, retrieval index and history.
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.sessions.remove(id).await {
        info!("Session {id} cleared");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("session {id}")))
    }
}

/// POST /api/v1/chat
///
/// With a session: answers from retrieved session context and appends both
/// messages to its history. Without one: answers with no profile on file.
pub async fn handle_chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let question = request.question.trim();
    if question.is_empty() {
        return Err(AppError::Validation("question cannot be empty".to_string()));
    }

    let Some(session_id) = request.session_id else {
        let answer = state.advisor()?.answer_without_profile(question).await?;
        return Ok(Json(ChatResponse {
            session_id: None,
            answer,
            used_context: false,
        }));
    };

    let context = state
        .sessions
        .context_for(session_id, question, DEFAULT_TOP_K)
        .await
        .ok_or_else(|| AppError::NotFound(format!("session {session_id}")))?;

    let answer = state.advisor()?.answer_with_context(question, &context).await?;

    let appended = state
        .sessions
        .append_messages(
            session_id,
            [ChatMessage::user(question), ChatMessage::assistant(answer.clone())],
        )
        .await;
    if !appended {
        return Err(AppError::NotFound(format!("session {session_id}")));
    }

    Ok(Json(ChatResponse {
        session_id: Some(session_id),
        answer,
        used_context: true,
    }))
}

/// GET /api/v1/quick-actions
pub async fn handle_quick_actions() -> Json<QuickActionsResponse> {
    Json(QuickActionsResponse {
        actions: &QUICK_ACTIONS,
    })
}
