use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use tracing::{info, instrument, warn};

use lawdesk_core::api_types::{AnswerPayload, AskRequest};
use lawdesk_core::LawDeskError;

use crate::error::ApiError;
use crate::state::AppState;

/// POST /ask: answer a legal question. Always 200 with some answer unless
/// the question is missing or blank.
#[instrument(skip(state, payload))]
pub async fn ask_question(
    State(state): State<AppState>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> Result<Json<AnswerPayload>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!(error = %rejection, "malformed /ask body");
        LawDeskError::validation("Request body must be a JSON object with a 'question' field.")
    })?;

    let question = request.question.unwrap_or_default();
    let resolution = state.resolver.resolve_detailed(&question).await?;

    info!(
        source = ?resolution.source,
        answer_len = resolution.payload.answer.len(),
        "question answered"
    );

    Ok(Json(resolution.payload))
}
