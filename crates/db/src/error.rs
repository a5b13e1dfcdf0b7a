//! Errors returned by the backend client.

/// Errors from the table and storage APIs.
///
/// [`BackendError::Api`] keeps the platform's raw message so it can be shown
/// to the user unchanged.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The platform rejected the call.
    #[error("{message}")]
    Api {
        /// HTTP status code (or the emulated one for the in-memory backend).
        status: u16,
        /// Platform error code, e.g. a PostgreSQL SQLSTATE such as `23503`.
        code: Option<String>,
        message: String,
    },

    /// A row could not be converted to or from its model.
    #[error("Failed to decode {table} row: {source}")]
    Codec {
        table: String,
        #[source]
        source: serde_json::Error,
    },

    /// A write expected to return a row returned none.
    #[error("No row returned from {table}")]
    EmptyResult { table: String },

    /// An update or delete was attempted without any filter.
    #[error("Refusing unfiltered write to {table}")]
    Unfiltered { table: String },
}

impl BackendError {
    /// Build an [`BackendError::Api`] from a non-2xx response body.
    ///
    /// Understands both PostgREST (`{"code", "message"}`) and storage
    /// (`{"statusCode", "error", "message"}`) error bodies and falls back to
    /// the raw text.
    pub fn from_response_body(status: u16, body: &str) -> Self {
        let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
        let field = |name: &str| -> Option<String> {
            parsed.as_ref().and_then(|v| match v.get(name)? {
                serde_json::Value::String(s) => Some(s.clone()),
                serde_json::Value::Null => None,
                other => Some(other.to_string()),
            })
        };

        let message = field("message")
            .or_else(|| field("msg"))
            .or_else(|| field("error"))
            .unwrap_or_else(|| {
                if body.trim().is_empty() {
                    format!("Request failed with status {status}")
                } else {
                    body.to_string()
                }
            });
        let code = field("code").or_else(|| field("error"));

        BackendError::Api {
            status,
            code,
            message,
        }
    }
}
