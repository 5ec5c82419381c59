use reqwest::StatusCode;
use serde_json::Value;

/// Raw body of a service response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Json(Value),
    Text(String),
    Empty,
}

impl Payload {
    pub const fn json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }

    /// Human readable text carried by an error body: a `detail` or `message`
    /// string field, or the text body itself
    pub fn error_text(&self) -> Option<String> {
        match self {
            Self::Json(Value::Object(map)) => ["detail", "message"]
                .iter()
                .filter_map(|field| map.get(*field))
                .filter_map(Value::as_str)
                .find(|text| !text.is_empty())
                .map(str::to_owned),
            Self::Text(text) if !text.is_empty() => Some(text.clone()),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{message}")]
    Status {
        status: StatusCode,
        message: String,
        payload: Payload,
    },

    #[error("Request to {url} timed out")]
    Timeout { url: String },

    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Invalid API base url '{base}': {reason}")]
    InvalidUrl { base: String, reason: String },
}

impl ApiError {
    pub fn from_status(status: StatusCode, payload: Payload) -> Self {
        let message = payload
            .error_text()
            .unwrap_or_else(|| format!("Request failed ({})", status.as_u16()));

        Self::Status {
            status,
            message,
            payload,
        }
    }

    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }

    /// Text for the error banner
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}
