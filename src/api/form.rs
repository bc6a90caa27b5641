//! Form values read from both the request body and the query string
//!
//! A urlencoded body is only read for POST, PUT and PATCH. Body values come
//! before query values, and a lookup returns the first value of a key.

use axum::{
    Form,
    async_trait,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::{HeaderMap, Method, header},
};

use super::error::ApiError;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Ordered key/value pairs of a request's form
#[derive(Debug, Default)]
pub struct FormValues(Vec<(String, String)>);

impl FormValues {
    /// First value of `name`, if the key is present at all
    pub fn first(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Like [`first`](Self::first), but a missing key is a client error
    pub fn required(&self, name: &str) -> Result<String, ApiError> {
        self.first(name)
            .map(str::to_string)
            .ok_or_else(|| ApiError::InvalidRequest(format!("missing form field: {name}")))
    }
}

fn reads_body(method: &Method) -> bool {
    matches!(*method, Method::POST | Method::PUT | Method::PATCH)
}

fn is_form_body(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with(FORM_CONTENT_TYPE))
}

#[async_trait]
impl<S> FromRequest<S> for FormValues
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let (mut parts, body) = req.into_parts();

        let Query(query) = Query::<Vec<(String, String)>>::from_request_parts(&mut parts, state)
            .await
            .map_err(|rejection| ApiError::InvalidRequest(rejection.body_text()))?;

        // Other body types are ignored, not rejected
        let mut values = if reads_body(&parts.method) && is_form_body(&parts.headers) {
            let Form(values) =
                Form::<Vec<(String, String)>>::from_request(Request::from_parts(parts, body), state)
                    .await
                    .map_err(|rejection| ApiError::InvalidRequest(rejection.body_text()))?;
            values
        } else {
            Vec::new()
        };

        values.extend(query);

        Ok(Self(values))
    }
}
