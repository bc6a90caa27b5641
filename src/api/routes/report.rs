//! Metric report endpoint

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode, Uri},
};
use tracing::{instrument, trace, warn};

use crate::{
    ResourceInfo,
    api::{
        error::{ApiError, ApiResult},
        form::FormValues,
        state::ApiState,
    },
    util::{IDENTITY_HEADER, REPORT_PATH},
};

/// All five metric fields are required; empty values are fine
fn parse_info(form: &FormValues) -> ApiResult<ResourceInfo> {
    Ok(ResourceInfo {
        mem: form.required("mem")?,
        cpu: form.required("cpu")?,
        cpu_name: form.required("cpu_name")?,
        host: form.required("host")?,
        conn: form.required("conn")?,
    })
}

/// ANY /
///
/// Overwrite the metrics of the identity named by the `Rr-Identity` header.
///
/// An unknown identity still answers `200 OK`; the rejection is only logged
/// and counted by the registry.
#[instrument(skip_all, fields(path = %uri.path()))]
pub async fn report(
    State(state): State<ApiState>,
    uri: Uri,
    headers: HeaderMap,
    form: ApiResult<FormValues>,
) -> ApiResult<StatusCode> {
    let form = form?;

    if uri.path() != REPORT_PATH {
        return Err(ApiError::InvalidRequest(format!(
            "unknown path: {}",
            uri.path()
        )));
    }

    let identity = headers
        .get(IDENTITY_HEADER)
        .ok_or_else(|| ApiError::InvalidRequest(format!("missing header: {IDENTITY_HEADER}")))?
        .to_str()
        .map_err(|_| ApiError::InvalidRequest(format!("invalid header: {IDENTITY_HEADER}")))?
        .to_string();

    let info = parse_info(&form)?;

    if state.registry.update_info(identity.as_str(), info).await? {
        trace!("stored report of {identity}");
    } else {
        warn!("dropped report of unregistered identity {identity}");
    }

    Ok(StatusCode::OK)
}
