//! Axum handlers for `/ask`.

use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use super::AppState;
use crate::models::{AskParams, AskResponse};
use crate::Error;

/// GET /ask?q=...&model=...
pub(super) async fn ask_get(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<AskParams>, QueryRejection>,
) -> Response {
    match query {
        Ok(Query(params)) => ask(state, &headers, params).await,
        Err(rejection) => error_response(
            Error::InvalidInput(format!(
                "Invalid query string: {}",
                rejection.body_text()
            )),
            wants_plain_text(&headers),
        ),
    }
}

/// POST /ask with a JSON body; anything unreadable counts as an empty body.
pub(super) async fn ask_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let params = match serde_json::from_slice::<serde_json::Value>(&body) {
        Ok(value) => AskParams::from_json(&value),
        Err(e) => {
            if !body.is_empty() {
                warn!("Ignoring unreadable /ask body: {}", e);
            }
            AskParams::default()
        }
    };
    ask(state, &headers, params).await
}

async fn ask(state: AppState, headers: &HeaderMap, params: AskParams) -> Response {
    let plain_text = wants_plain_text(headers);
    let span = info_span!("ask", request_id = %Uuid::new_v4());

    async move {
        match state
            .proxy
            .answer(params.question(), params.model.as_deref())
            .await
        {
            Ok(answer) => {
                info!(model = %answer.model, chars = answer.text.chars().count(), "answered");
                if plain_text {
                    (StatusCode::OK, answer.text).into_response()
                } else {
                    Json(AskResponse::success(answer.text, answer.model)).into_response()
                }
            }
            Err(e) => error_response(e, plain_text),
        }
    }
    .instrument(span)
    .await
}

fn error_response(err: Error, plain_text: bool) -> Response {
    let status = err.status_code();

    if status.is_server_error() {
        error!(%status, "ask failed: {}", err);
    } else {
        warn!(%status, "ask rejected: {}", err);
    }

    let message = public_message(&err);

    if plain_text {
        (status, message).into_response()
    } else {
        (status, Json(AskResponse::failure(message))).into_response()
    }
}

/// Message shown to callers; upstream bodies stay in the server logs.
fn public_message(err: &Error) -> String {
    match err {
        Error::InvalidInput(reason) => reason.clone(),
        Error::UpstreamHttp { status, .. } => format!(
            "Error from API (upstream status {}). See server logs",
            status
        ),
        Error::UpstreamUnparseable => {
            "Error from API: empty or unreadable response. See server logs".to_string()
        }
        Error::Network(_) => "Error from API: upstream request failed. See server logs".to_string(),
        _ => "Internal server error. See server logs".to_string(),
    }
}

/// True when the caller asks for `text/plain` and not for JSON.
fn wants_plain_text(headers: &HeaderMap) -> bool {
    let accept = headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();

    accept.contains("text/plain") && !accept.contains("application/json")
}
