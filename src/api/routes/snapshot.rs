//! Registry snapshot endpoint

use axum::{
    extract::State,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::{instrument, trace};

use crate::api::{error::ApiResult, state::ApiState};

/// ANY /requestAll
///
/// Every known identity and its metrics as one JSON object, with the
/// content length set to the exact body size.
#[instrument(skip_all)]
pub async fn request_all(State(state): State<ApiState>) -> ApiResult<Response> {
    let snapshot = state.registry.snapshot().await?;
    let body = serde_json::to_vec(&snapshot)?;

    trace!(
        "serving snapshot of {} identities ({} bytes)",
        snapshot.len(),
        body.len()
    );

    let headers = [
        (
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        ),
        (header::CONTENT_LENGTH, HeaderValue::from(body.len())),
    ];

    Ok((StatusCode::OK, headers, body).into_response())
}
