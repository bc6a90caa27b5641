//! Identity registration endpoint

use axum::{extract::State, http::StatusCode};
use tracing::{debug, instrument};

use crate::api::{error::ApiResult, form::FormValues, state::ApiState};

/// ANY /addIdentity
///
/// Register the identity in form field `name`. Registering an existing
/// identity resets its metrics.
///
/// A body that fails to parse counts as empty; only a missing `name` is
/// rejected.
#[instrument(skip_all)]
pub async fn add_identity(
    State(state): State<ApiState>,
    form: ApiResult<FormValues>,
) -> ApiResult<(StatusCode, &'static str)> {
    let name = form.unwrap_or_default().required("name")?;

    debug!("adding identity {name:?}");
    state.registry.add_identity(name).await?;

    Ok((StatusCode::OK, "200 OK"))
}
