//! A/B simulation command handlers for the CLI.

use adboard_abtest::{simulate, AbTestInput, SimulationResult};
use clap::{Args, Subcommand};
use rand::{rngs::StdRng, SeedableRng};

/// Sub-commands available under `abtest`.
#[derive(Debug, Subcommand)]
pub enum AbtestCommands {
    /// Simulate a campaign and three variations of it
    Simulate {
        #[command(flatten)]
        input: CampaignArgs,

        /// Seed for a reproducible simulation
        #[arg(long)]
        seed: Option<u64>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Args)]
pub struct CampaignArgs {
    #[arg(long)]
    pub business_type: String,

    #[arg(long)]
    pub campaign_type: String,

    #[arg(long)]
    pub target_audience: String,

    #[arg(long)]
    pub channel: String,

    #[arg(long, default_value_t = 0)]
    pub clicks: u64,
}

impl From<CampaignArgs> for AbTestInput {
    fn from(args: CampaignArgs) -> Self {
        Self {
            business_type: args.business_type,
            campaign_type: args.campaign_type,
            target_audience: args.target_audience,
            channel: args.channel,
            clicks: args.clicks,
        }
    }
}

fn print_result(result: &SimulationResult) {
    let campaign = &result.campaign;
    println!(
        "{} {} / {} for {} on {}",
        campaign.campaign_id,
        campaign.business_type,
        campaign.campaign_type,
        campaign.target_audience,
        campaign.channel
    );
    println!(
        "  duration {}d, acquisition cost {}, roi {}, engagement {}",
        campaign.duration, campaign.acquisition_cost, campaign.roi, campaign.engagement_score
    );
    println!();
    for variation in &result.variations {
        println!(
            "  {:<18} {:<20} {}",
            variation.channel, variation.target_audience, variation.conversion_rate
        );
    }
    println!();
    println!(
        "best: {} / {} ({})",
        result.best_variation.channel,
        result.best_variation.target_audience,
        result.best_variation.conversion_rate
    );
}

/// # Errors
///
/// Returns an error if a required field is blank.
pub(crate) fn run_simulate(input: &AbTestInput, seed: Option<u64>, json: bool) -> anyhow::Result<()> {
    let result = match seed {
        Some(seed) => simulate(input, &mut StdRng::seed_from_u64(seed))?,
        None => simulate(input, &mut rand::rng())?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(&result);
    }
    Ok(())
}
