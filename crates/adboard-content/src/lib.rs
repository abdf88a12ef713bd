//! Social media post generation backed by a hosted instruct model.

pub mod client;
pub mod error;
pub mod polish;
pub mod prompt;
pub(crate) mod retry;

use adboard_core::Platform;
use serde::{Deserialize, Serialize};

pub use client::{GenerationParameters, HostedModelClient};
pub use error::ContentError;
pub use polish::polish;
pub use prompt::build_prompt;

/// What to write about, and for which channel.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentRequest {
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub platform: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedPost {
    pub content: String,
}

/// Builds the prompt, calls the model and polishes the result for the channel.
///
/// # Errors
///
/// - [`ContentError::Validation`] if `prompt` or `platform` is blank.
/// - Any error from [`HostedModelClient::generate`].
pub async fn generate_post(
    client: &HostedModelClient,
    request: &ContentRequest,
) -> Result<GeneratedPost, ContentError> {
    let product = request.prompt.trim();
    let platform = request.platform.trim();
    if product.is_empty() || platform.is_empty() {
        return Err(ContentError::Validation(
            "Missing required fields: prompt and platform".to_string(),
        ));
    }

    let prompt = build_prompt(platform, product);
    let raw = client.generate(&prompt).await?;
    let content = polish(Platform::from_slug(platform), &raw, &prompt);

    tracing::info!(platform, chars = content.chars().count(), "generated post");
    Ok(GeneratedPost { content })
}
