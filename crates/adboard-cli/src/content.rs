//! Content generation command handlers for the CLI.

use adboard_content::{generate_post, ContentRequest, HostedModelClient};
use adboard_core::AppConfig;
use clap::Subcommand;

/// Sub-commands available under `content`.
#[derive(Debug, Subcommand)]
pub enum ContentCommands {
    /// Generate a post for one platform
    Generate {
        /// Target platform (twitter, instagram, linkedin, facebook)
        #[arg(long)]
        platform: String,

        /// What the post should be about
        #[arg(long)]
        prompt: String,
    },
}

/// Calls the hosted model and prints the polished post.
///
/// # Errors
///
/// Returns an error if the client cannot be built or generation fails.
pub(crate) async fn run_generate(
    config: &AppConfig,
    platform: String,
    prompt: String,
) -> anyhow::Result<()> {
    if config.model_api_token.is_none() {
        tracing::warn!("ADBOARD_MODEL_API_TOKEN not set; model requests will be anonymous");
    }
    let client = HostedModelClient::from_config(config)?;
    let post = generate_post(&client, &ContentRequest { prompt, platform }).await?;
    println!("{}", post.content);
    Ok(())
}
