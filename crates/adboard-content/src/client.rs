//! HTTP client for a hosted text-generation inference endpoint.
//!
//! Speaks the Hugging Face inference wire format: the request carries the
//! prompt as `inputs` plus sampling `parameters`; the response is either a
//! JSON array of `{ "generated_text": ... }` objects, a single such object,
//! or a bare string.

use std::time::Duration;

use adboard_core::config::DEFAULT_MODEL_URL;
use adboard_core::AppConfig;
use reqwest::{Client, Url};
use serde::Serialize;

use crate::error::ContentError;
use crate::retry::retry_with_backoff;

/// Sampling parameters sent with every request.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationParameters {
    pub max_new_tokens: u32,
    pub temperature: f64,
    pub top_p: f64,
    pub do_sample: bool,
    pub return_full_text: bool,
    pub stop: Vec<String>,
    pub repetition_penalty: f64,
}

impl Default for GenerationParameters {
    fn default() -> Self {
        Self {
            max_new_tokens: 300,
            temperature: 0.9,
            top_p: 0.9,
            do_sample: true,
            return_full_text: false,
            stop: vec!["</s>".to_string(), "[/INST]".to_string()],
            repetition_penalty: 1.15,
        }
    }
}

#[derive(Serialize)]
struct GenerationRequest<'a> {
    inputs: &'a str,
    parameters: &'a GenerationParameters,
}

/// Client for the hosted instruct model.
///
/// Use [`HostedModelClient::new`] for the default endpoint or
/// [`HostedModelClient::with_base_url`] to point at a mock server in tests.
pub struct HostedModelClient {
    client: Client,
    endpoint: Url,
    api_token: Option<String>,
    parameters: GenerationParameters,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl HostedModelClient {
    /// Creates a client pointed at [`DEFAULT_MODEL_URL`].
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_token: Option<&str>, timeout_secs: u64) -> Result<Self, ContentError> {
        Self::with_base_url(api_token, timeout_secs, DEFAULT_MODEL_URL)
    }

    /// Creates a client posting to `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ContentError::InvalidEndpoint`] if
    /// `endpoint` is not a valid URL.
    pub fn with_base_url(
        api_token: Option<&str>,
        timeout_secs: u64,
        endpoint: &str,
    ) -> Result<Self, ContentError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("adboard/0.1 (content-generator)")
            .build()?;

        let endpoint = Url::parse(endpoint).map_err(|e| ContentError::InvalidEndpoint {
            url: endpoint.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            endpoint,
            api_token: api_token.map(str::to_owned),
            parameters: GenerationParameters::default(),
            max_retries: 0,
            backoff_base_ms: 0,
        })
    }

    /// Builds a client from the `ADBOARD_MODEL_*` settings.
    ///
    /// # Errors
    ///
    /// See [`HostedModelClient::with_base_url`].
    pub fn from_config(config: &AppConfig) -> Result<Self, ContentError> {
        Ok(Self::with_base_url(
            config.model_api_token.as_deref(),
            config.model_timeout_secs,
            &config.model_url,
        )?
        .with_retries(config.model_max_retries, config.model_retry_backoff_ms))
    }

    #[must_use]
    pub fn with_retries(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    #[must_use]
    pub fn with_parameters(mut self, parameters: GenerationParameters) -> Self {
        self.parameters = parameters;
        self
    }

    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Sends `prompt` to the model and returns the generated text, trimmed.
    ///
    /// Transient failures are retried according to [`Self::with_retries`].
    ///
    /// # Errors
    ///
    /// - [`ContentError::Api`] on a non-2xx status, carrying the body.
    /// - [`ContentError::Http`] on network failure.
    /// - [`ContentError::Deserialize`] if the body is not JSON.
    /// - [`ContentError::EmptyResponse`] if no generated text is present.
    pub async fn generate(&self, prompt: &str) -> Result<String, ContentError> {
        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            self.request_once(prompt)
        })
        .await
    }

    async fn request_once(&self, prompt: &str) -> Result<String, ContentError> {
        let body = GenerationRequest {
            inputs: prompt,
            parameters: &self.parameters,
        };
        let mut request = self.client.post(self.endpoint.clone()).json(&body);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            tracing::error!(status = status.as_u16(), body = %text, "model API error");
            return Err(ContentError::Api {
                status: status.as_u16(),
                body: text,
            });
        }

        let value: serde_json::Value =
            serde_json::from_str(&text).map_err(|e| ContentError::Deserialize {
                context: self.endpoint.to_string(),
                source: e,
            })?;
        extract_generated_text(&value).ok_or(ContentError::EmptyResponse)
    }
}

/// Pulls the generated text out of any of the accepted response shapes.
fn extract_generated_text(value: &serde_json::Value) -> Option<String> {
    let first = match value {
        serde_json::Value::Array(items) => items.first()?,
        other => other,
    };
    let text = match first {
        serde_json::Value::String(s) => s.as_str(),
        serde_json::Value::Object(map) => map.get("generated_text")?.as_str()?,
        _ => return None,
    };
    Some(text.trim().to_string())
}
