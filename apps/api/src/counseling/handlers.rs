//! Axum route handlers for the counseling API.

use async_trait::async_trait;
use axum::{
    extract::{FromRequest, Multipart, Request, State},
    http::header::CONTENT_TYPE,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::counseling::assembler::{build_analysis_prompt, build_chat_prompt};
use crate::counseling::profile::{null_as_default, ConversationTurn, StudentProfile};
use crate::counseling::tool_loop::{run_tool_loop, LoopOutcome};
use crate::counseling::upload::{TranscriptUpload, TRANSCRIPT_FIELD};
use crate::errors::AppError;
use crate::llm_client::session::ChatSession;
use crate::llm_client::types::Part;
use crate::render;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Body of `POST /api/analyze`: a JSON profile, or a multipart form with the
/// same fields plus an optional `transcript` file.
#[derive(Debug)]
pub struct AnalyzeSubmission {
    pub profile: StudentProfile,
    pub transcript: Option<TranscriptUpload>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub advice: String,
    pub advice_html: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub student_profile: StudentProfile,
    #[serde(default, deserialize_with = "null_as_default")]
    pub conversation_history: Vec<ConversationTurn>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub question: String,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub answer: String,
    pub answer_html: String,
}

#[async_trait]
impl FromRequest<AppState> for AnalyzeSubmission {
    type Rejection = AppError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("multipart/form-data"));

        if !is_multipart {
            let Json(profile) = Json::<StudentProfile>::from_request(req, state)
                .await
                .map_err(|e| AppError::Validation(e.body_text()))?;
            return Ok(Self {
                profile,
                transcript: None,
            });
        }

        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| AppError::Upload(e.body_text()))?;

        let mut profile = StudentProfile::default();
        let mut transcript = None;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::Upload(e.body_text()))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            if name == TRANSCRIPT_FIELD {
                if let Some(upload) =
                    TranscriptUpload::receive(field, &state.config.upload_dir).await?
                {
                    transcript = Some(upload);
                }
            } else {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Upload(e.body_text()))?;
                profile.set_field(&name, value);
            }
        }

        Ok(Self {
            profile,
            transcript,
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/analyze
///
/// Assembles the counseling prompt, runs the tool loop and returns the advice.
/// An uploaded transcript is deleted once the model has answered or failed.
pub async fn handle_analyze(
    State(state): State<AppState>,
    submission: AnalyzeSubmission,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let AnalyzeSubmission {
        profile,
        transcript,
    } = submission;

    let span = info_span!("analyze", request_id = %Uuid::new_v4());
    async move {
        info!(
            student = %profile.full_name(),
            target = %profile.target_country,
            education = %profile.education,
            language = profile.language.as_deref().unwrap_or("en"),
            transcript_bytes = transcript.as_ref().map(TranscriptUpload::size),
            "New counseling request received"
        );

        let result = generate_advice(&state, &profile, transcript.as_ref()).await;
        if let Some(upload) = transcript {
            upload.discard();
        }
        let outcome = result?;

        if outcome.text.trim().is_empty() {
            warn!(
                "Model returned no advice text after {} round-trip(s)",
                outcome.round_trips
            );
        } else {
            info!("Response generated successfully");
        }

        Ok(Json(AnalyzeResponse {
            advice_html: render::render(&outcome.text),
            advice: outcome.text,
        }))
    }
    .instrument(span)
    .await
}

async fn generate_advice(
    state: &AppState,
    profile: &StudentProfile,
    transcript: Option<&TranscriptUpload>,
) -> Result<LoopOutcome, AppError> {
    let attachment = match transcript {
        Some(upload) => Some(upload.attachment().await?),
        None => None,
    };

    let today = chrono::Local::now().date_naive();
    let prompt = build_analysis_prompt(profile, attachment.as_ref(), today);

    run_tool_loop(state.llm.as_ref(), &state.scholarships, prompt)
        .await
        .map_err(|e| AppError::Advice(e.to_string()))
}

/// POST /api/chat
///
/// Answers a follow-up question in a single model round-trip. No tools.
pub async fn handle_chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    if request.question.trim().is_empty() {
        return Err(AppError::Validation("question cannot be empty".to_string()));
    }

    let span = info_span!("chat", request_id = %Uuid::new_v4());
    async move {
        info!(
            student = %request.student_profile.full_name(),
            question = %request.question,
            history_turns = request.conversation_history.len(),
            language = request.language.as_deref().unwrap_or("en"),
            "Follow-up question received"
        );

        let prompt = build_chat_prompt(
            &request.student_profile,
            &request.conversation_history,
            &request.question,
            request.language.as_deref(),
            state.config.chat_history_limit,
        );

        let response = ChatSession::new(state.llm.as_ref())
            .send(vec![Part::text(prompt)])
            .await
            .map_err(|e| AppError::Chat(e.to_string()))?;
        let answer = response.text();

        if answer.trim().is_empty() {
            warn!("Model returned an empty chat answer");
        } else {
            info!("Chat response generated successfully");
        }

        Ok(Json(ChatResponse {
            answer_html: render::render(&answer),
            answer,
        }))
    }
    .instrument(span)
    .await
}
