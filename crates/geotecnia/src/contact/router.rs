use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::json;

use super::domain::ContactSubmission;
use super::notifier::ContactNotifier;
use super::service::{ContactIntakeService, IntakeError};
use super::store::ContactStore;
use super::verification::BotVerifier;

/// Router builder exposing the intake endpoint. Any verb other than POST on
/// the path answers 405 with the same JSON error shape the handler uses.
pub fn contact_router<V, S, N>(service: Arc<ContactIntakeService<V, S, N>>) -> Router
where
    V: BotVerifier + 'static,
    S: ContactStore + 'static,
    N: ContactNotifier + 'static,
{
    Router::new()
        .route(
            "/api/contact",
            post(submit_handler::<V, S, N>).fallback(method_not_allowed),
        )
        .with_state(service)
}

pub(crate) async fn submit_handler<V, S, N>(
    State(service): State<Arc<ContactIntakeService<V, S, N>>>,
    payload: Option<axum::Json<ContactSubmission>>,
) -> Response
where
    V: BotVerifier + 'static,
    S: ContactStore + 'static,
    N: ContactNotifier + 'static,
{
    // A body that does not parse as JSON is treated as an empty submission,
    // so the validator answers with its missing-fields message.
    let submission = payload
        .map(|axum::Json(body)| body)
        .unwrap_or_default();

    match service.submit(submission).await {
        Ok(_) => (StatusCode::OK, axum::Json(json!({ "ok": true }))).into_response(),
        Err(err @ (IntakeError::Validation(_) | IntakeError::Rejected { .. })) => {
            let payload = json!({
                "error": err.to_string(),
            });
            (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn method_not_allowed() -> Response {
    let payload = json!({
        "error": "Method not allowed",
    });
    (StatusCode::METHOD_NOT_ALLOWED, axum::Json(payload)).into_response()
}
