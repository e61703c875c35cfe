//! Tolerant request decoding.
//!
//! The game server posts whatever its HTTP client can manage: a raw JSON
//! body, a form body, or a query string, the latter two carrying the JSON
//! document in a `data` field. The body is buffered once and each
//! [`Strategy`] in [`STRATEGIES`] is tried against the same buffer until one
//! succeeds.

use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{ApiError, DecodingError};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const DATA_PARAM: &str = "data";

/// A request with its body read into memory, replayable by every strategy.
#[derive(Debug, Clone, Default)]
pub struct BufferedRequest {
    pub content_type: Option<String>,
    pub query: Option<String>,
    pub body: Bytes,
}

impl BufferedRequest {
    fn has_form_body(&self) -> bool {
        match &self.content_type {
            Some(ct) => ct
                .split(';')
                .next()
                .is_some_and(|mime| mime.trim().eq_ignore_ascii_case(FORM_CONTENT_TYPE)),
            None => !self.body.is_empty(),
        }
    }

    /// First value of `name`, form body before query string.
    fn form_value(&self, name: &str) -> Option<String> {
        let body_pairs = self
            .has_form_body()
            .then(|| url::form_urlencoded::parse(&self.body))
            .into_iter()
            .flatten();
        let query = self.query.as_deref().unwrap_or_default();
        let query_pairs = url::form_urlencoded::parse(query.as_bytes());

        body_pairs
            .chain(query_pairs)
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }
}

impl<S> FromRequest<S> for BufferedRequest
where
    S: Send + Sync,
{
    type Rejection = DecodingError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let query = req.uri().query().map(str::to_owned);
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| DecodingError::Body(e.body_text()))?;

        Ok(Self {
            content_type,
            query,
            body,
        })
    }
}

/// One way of finding a `T` in a buffered request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// The whole body is the JSON document.
    JsonBody,
    /// A `data` form field (body or query string) holds the JSON document.
    FormData,
}

/// Decoding order; the first success wins.
pub const STRATEGIES: &[Strategy] = &[Strategy::JsonBody, Strategy::FormData];

impl Strategy {
    pub fn decode<T: DeserializeOwned>(self, req: &BufferedRequest) -> Result<T, DecodingError> {
        match self {
            Self::JsonBody => {
                if req.body.is_empty() {
                    return Err(DecodingError::EmptyBody);
                }
                Ok(serde_json::from_slice(&req.body)?)
            }
            Self::FormData => {
                let data = req
                    .form_value(DATA_PARAM)
                    .filter(|v| !v.is_empty())
                    .ok_or(DecodingError::NoDataParam)?;
                Ok(serde_json::from_str(&data)?)
            }
        }
    }
}

/// Try each strategy in order. On total failure the last strategy's error
/// is returned, since it is the most specific about what was missing.
pub fn decode<T: DeserializeOwned>(req: &BufferedRequest) -> Result<T, DecodingError> {
    let mut last_err = DecodingError::EmptyBody;
    for &strategy in STRATEGIES {
        match strategy.decode(req) {
            Ok(value) => {
                debug!(?strategy, "request decoded");
                return Ok(value);
            }
            Err(e) => {
                debug!(?strategy, error = %e, "decode strategy failed");
                last_err = e;
            }
        }
    }
    Err(last_err)
}

/// Extractor that accepts JSON, form, or query-string encodings of `T`.
#[derive(Debug, Clone)]
pub struct Normalized<T>(pub T);

impl<S, T> FromRequest<S> for Normalized<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let buffered = BufferedRequest::from_request(req, state).await?;
        Ok(Self(decode(&buffered)?))
    }
}
