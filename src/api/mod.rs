pub mod error;

pub use error::{ApiError, Payload};

use reqwest::{
    Method, Url,
    header::{ACCEPT, CONTENT_TYPE},
};

use std::{future::Future, time::Duration};

use crate::dto::{Note, NoteId, NotePayload, normalize_listing};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

const PRIMARY_PATH: &[&str] = &["notes"];
const FALLBACK_PATH: &[&str] = &["api", "notes"];
const JSON_MIME: &str = "application/json";

/// The four note operations the shell relies on
pub trait NotesBackend: Send + Sync + 'static {
    fn list_notes(&self) -> impl Future<Output = Result<Vec<Note>, ApiError>> + Send;

    /// `Ok(None)` when the service answered without a note object
    fn create_note(
        &self,
        payload: &NotePayload,
    ) -> impl Future<Output = Result<Option<Note>, ApiError>> + Send;

    /// `Ok(None)` when the service answered without a note object
    fn update_note(
        &self,
        id: &NoteId,
        payload: &NotePayload,
    ) -> impl Future<Output = Result<Option<Note>, ApiError>> + Send;

    fn delete_note(&self, id: &NoteId) -> impl Future<Output = Result<(), ApiError>> + Send;
}

/// HTTP client for a REST notes service.
///
/// Every operation hits `/notes` first and retries once under `/api/notes`
/// when the primary path answers 404.
#[derive(Debug, Clone)]
pub struct NotesApi {
    base: Url,
    client: reqwest::Client,
}

impl NotesApi {
    pub fn new(base: &str, timeout: Duration) -> Result<Self, ApiError> {
        let trimmed = base.trim().trim_end_matches('/');
        let base = Url::parse(trimmed).map_err(|e| ApiError::InvalidUrl {
            base: trimmed.to_string(),
            reason: e.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl {
                base: trimmed.to_string(),
                reason: "url cannot carry a path".to_string(),
            });
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| ApiError::Transport {
                url: trimmed.to_string(),
                source,
            })?;

        Ok(Self { base, client })
    }

    pub const fn base(&self) -> &Url {
        &self.base
    }

    /// Joins path segments onto the base url, percent-encoding each segment
    pub fn endpoint<S: AsRef<str>>(&self, segments: &[S]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn candidates(&self, id: Option<&NoteId>) -> (Url, Url) {
        let with_id = |prefix: &[&str]| {
            let mut segments: Vec<String> = prefix.iter().map(ToString::to_string).collect();
            if let Some(id) = id {
                segments.push(id.to_string());
            }
            self.endpoint(&segments)
        };

        (with_id(PRIMARY_PATH), with_id(FALLBACK_PATH))
    }

    async fn with_fallback(
        &self,
        method: Method,
        id: Option<&NoteId>,
        body: Option<&NotePayload>,
    ) -> Result<Payload, ApiError> {
        let (primary, fallback) = self.candidates(id);

        match self.fetch_json(method.clone(), primary.clone(), body).await {
            Err(e) if e.is_not_found() => {
                tracing::warn!(
                    "{} {} returned 404, trying fallback path {}",
                    method,
                    primary,
                    fallback
                );
                self.fetch_json(method, fallback, body).await
            }
            result => result,
        }
    }

    async fn fetch_json(
        &self,
        method: Method,
        url: Url,
        body: Option<&NotePayload>,
    ) -> Result<Payload, ApiError> {
        tracing::debug!("Sending {} request to {}", method, url);

        let mut request = self
            .client
            .request(method, url.clone())
            .header(ACCEPT, JSON_MIME);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| request_error(&url, e))?;

        let status = response.status();
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.contains(JSON_MIME));

        let payload = if is_json {
            let bytes = response.bytes().await.map_err(|e| request_error(&url, e))?;
            serde_json::from_slice(&bytes).map_or(Payload::Empty, Payload::Json)
        } else {
            let text = response.text().await.map_err(|e| request_error(&url, e))?;
            if text.is_empty() {
                Payload::Empty
            } else {
                Payload::Text(text)
            }
        };

        tracing::debug!("{} answered with status {}", url, status);

        if !status.is_success() {
            return Err(ApiError::from_status(status, payload));
        }

        Ok(payload)
    }
}

impl NotesBackend for NotesApi {
    async fn list_notes(&self) -> Result<Vec<Note>, ApiError> {
        let payload = self.with_fallback(Method::GET, None, None).await?;
        Ok(normalize_listing(payload.json()))
    }

    async fn create_note(&self, payload: &NotePayload) -> Result<Option<Note>, ApiError> {
        let answer = self
            .with_fallback(Method::POST, None, Some(payload))
            .await?;
        Ok(answer.json().and_then(Note::from_value))
    }

    async fn update_note(
        &self,
        id: &NoteId,
        payload: &NotePayload,
    ) -> Result<Option<Note>, ApiError> {
        let answer = self
            .with_fallback(Method::PUT, Some(id), Some(payload))
            .await?;
        Ok(answer.json().and_then(Note::from_value))
    }

    async fn delete_note(&self, id: &NoteId) -> Result<(), ApiError> {
        self.with_fallback(Method::DELETE, Some(id), None).await?;
        Ok(())
    }
}

fn request_error(url: &Url, source: reqwest::Error) -> ApiError {
    if source.is_timeout() {
        tracing::error!("Request to {} timed out", url);
        ApiError::Timeout {
            url: url.to_string(),
        }
    } else {
        tracing::error!("Request to {} failed: {}", url, source);
        ApiError::Transport {
            url: url.to_string(),
            source,
        }
    }
}
