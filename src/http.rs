//! Plain HTTP/JSON surface: `GET /local` and `GET /health`.

use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::get;
use serde::Serialize;
use tower_http::trace::{DefaultMakeSpan, TraceLayer};

use crate::health::health_endpoint_handler;
use crate::service::TimeService;

/// Build the HTTP router over the shared time service.
pub fn router(time_service: TimeService) -> Router {
    let trace_layer =
        TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::new().include_headers(true));

    Router::new()
        .route("/local", get(local_time_endpoint_handler))
        .route("/health", get(health_endpoint_handler))
        .layer(trace_layer)
        .with_state(time_service)
}

/// `GET /local`: the current time as `{"localTime": "..."}` plus a newline.
#[tracing::instrument(level = "debug", skip_all)]
async fn local_time_endpoint_handler(
    State(time_service): State<TimeService>,
) -> Result<impl IntoResponse, StatusCode> {
    let body = json_line(&time_service.current())?;
    Ok(([(header::CONTENT_TYPE, "application/json")], body))
}

fn json_line<T: Serialize>(value: &T) -> Result<String, StatusCode> {
    let mut body = serde_json::to_string(value).map_err(|err| {
        tracing::error!("Failed to serialize response: {}", err);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    body.push('\n');
    Ok(body)
}
