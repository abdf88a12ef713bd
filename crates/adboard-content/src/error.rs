use thiserror::Error;

/// Errors returned by the content generator.
#[derive(Debug, Error)]
pub enum ContentError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The model endpoint answered with a non-2xx status.
    #[error("model API returned {status}: {body}")]
    Api { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The response parsed but carried no `generated_text`.
    #[error("model response did not contain generated text")]
    EmptyResponse,

    #[error("invalid model endpoint '{url}': {reason}")]
    InvalidEndpoint { url: String, reason: String },

    #[error("{0}")]
    Validation(String),
}
