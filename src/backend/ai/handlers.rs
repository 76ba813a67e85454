/**
 * Text Correction Handler
 *
 * POST /api/ai/correct sends the operator's draft to the generative-text
 * API and returns the corrected version.
 */

use axum::{extract::State, response::Json};

use crate::backend::ai::client::AiClient;
use crate::backend::error::BackendError;
use crate::backend::middleware::{ApiJson, AuthUser};
use crate::shared::{CorrectionRequest, CorrectionResponse};

/// Correct text handler
///
/// # Errors
///
/// * `400 Bad Request` - Empty or oversized text
/// * `502 Bad Gateway` - Upstream error or empty answer
/// * `503 Service Unavailable` - No API key configured
/// * `504 Gateway Timeout` - Upstream did not answer in time
pub async fn correct_text(
    State(client): State<Option<AiClient>>,
    AuthUser(auth): AuthUser,
    ApiJson(request): ApiJson<CorrectionRequest>,
) -> Result<Json<CorrectionResponse>, BackendError> {
    let client = client.ok_or_else(|| BackendError::unavailable("AI correction"))?;
    request.validate()?;

    tracing::debug!(
        "User {} requested correction of {} chars",
        auth.user_id,
        request.text.chars().count()
    );

    let corrected = client
        .correct(&request.text, request.instructions.as_deref())
        .await?;

    Ok(Json(CorrectionResponse {
        corrected,
        model: client.model().to_string(),
    }))
}
