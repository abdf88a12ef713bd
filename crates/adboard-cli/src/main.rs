mod abtest;
mod content;
mod report;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::{abtest::AbtestCommands, content::ContentCommands, report::ReportCommands};

#[derive(Debug, Parser)]
#[command(name = "adboard-cli", version)]
#[command(about = "Campaign report analytics, post generation and A/B simulation")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Import, analyze and export campaign reports
    Report {
        #[command(subcommand)]
        command: ReportCommands,
    },
    /// Generate social media posts with the hosted model
    Content {
        #[command(subcommand)]
        command: ContentCommands,
    },
    /// Simulate A/B campaign variations
    Abtest {
        #[command(subcommand)]
        command: AbtestCommands,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = adboard_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::Report { command }) => match command {
            ReportCommands::Analyze {
                file,
                entries,
                json,
            } => report::run_analyze(&file, &entries, json)?,
            ReportCommands::Template { output } => report::run_template(output.as_deref())?,
            ReportCommands::Guide => report::run_guide(),
        },
        Some(Commands::Content { command }) => match command {
            ContentCommands::Generate { platform, prompt } => {
                content::run_generate(&config, platform, prompt).await?;
            }
        },
        Some(Commands::Abtest { command }) => match command {
            AbtestCommands::Simulate { input, seed, json } => {
                abtest::run_simulate(&input.into(), seed, json)?;
            }
        },
        None => {
            println!("adboard-cli: use --help to see available commands");
        }
    }

    Ok(())
}
