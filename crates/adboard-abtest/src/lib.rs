//! Randomized A/B campaign simulation.
//!
//! Produces a plausible campaign profile and three ranked variations for a
//! described campaign. Every draw goes through the caller's [`Rng`], so a
//! seeded generator gives a reproducible result.

use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const TARGET_AUDIENCES: [&str; 5] = ["Gen Z", "Millennials", "Women", "Men", "Seniors"];
pub const CHANNELS: [&str; 5] = ["YouTube", "Instagram", "Google Ads", "Facebook", "TikTok"];
pub const CAMPAIGN_TYPES: [&str; 5] = ["Display", "Search", "Social", "Influencer", "Email"];

/// Number of variations generated per simulation.
pub const VARIATION_COUNT: usize = 3;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AbTestError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbTestInput {
    pub business_type: String,
    pub campaign_type: String,
    pub target_audience: String,
    pub channel: String,
    #[serde(default)]
    pub clicks: u64,
}

impl AbTestInput {
    fn validate(&self) -> Result<(), AbTestError> {
        let fields = [
            ("business_type", &self.business_type),
            ("campaign_type", &self.campaign_type),
            ("target_audience", &self.target_audience),
            ("channel", &self.channel),
        ];
        match fields.iter().find(|(_, value)| value.trim().is_empty()) {
            Some((name, _)) => Err(AbTestError::MissingField(*name)),
            None => Ok(()),
        }
    }
}

/// The simulated profile of the campaign as described.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Campaign {
    pub campaign_id: String,
    pub business_type: String,
    pub campaign_type: String,
    pub target_audience: String,
    pub channel: String,
    pub clicks: u64,
    /// Days.
    pub duration: u32,
    pub acquisition_cost: u32,
    pub roi: Decimal,
    pub engagement_score: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Variation {
    pub campaign_type: String,
    pub channel: String,
    pub target_audience: String,
    /// Fraction in `[0.020, 0.170]`, three decimals.
    pub conversion_rate: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimulationResult {
    pub campaign: Campaign,
    /// Sorted by descending conversion rate.
    pub variations: Vec<Variation>,
    pub best_variation: Variation,
}

/// Simulates one campaign and ranks three random variations against it.
///
/// # Errors
///
/// Returns [`AbTestError::MissingField`] if any descriptive field is blank.
pub fn simulate<R: Rng>(
    input: &AbTestInput,
    rng: &mut R,
) -> Result<SimulationResult, AbTestError> {
    input.validate()?;

    let campaign = Campaign {
        campaign_id: format!("C{}", rng.random_range(100..=999)),
        business_type: input.business_type.trim().to_string(),
        campaign_type: input.campaign_type.trim().to_string(),
        target_audience: input.target_audience.trim().to_string(),
        channel: input.channel.trim().to_string(),
        clicks: input.clicks,
        duration: rng.random_range(5..=29),
        acquisition_cost: rng.random_range(50..=199),
        roi: Decimal::new(rng.random_range(100..=500), 2),
        engagement_score: rng.random_range(50..=99),
    };

    let mut variations: Vec<Variation> = (0..VARIATION_COUNT).map(|_| variation(rng)).collect();
    variations.sort_by(|a, b| b.conversion_rate.cmp(&a.conversion_rate));
    let best_variation = variations[0].clone();

    Ok(SimulationResult {
        campaign,
        variations,
        best_variation,
    })
}

fn variation<R: Rng>(rng: &mut R) -> Variation {
    Variation {
        campaign_type: pick(rng, &CAMPAIGN_TYPES),
        channel: pick(rng, &CHANNELS),
        target_audience: pick(rng, &TARGET_AUDIENCES),
        conversion_rate: Decimal::new(rng.random_range(20..=170), 3),
    }
}

fn pick<R: Rng>(rng: &mut R, options: &[&str]) -> String {
    options[rng.random_range(0..options.len())].to_string()
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn input() -> AbTestInput {
        AbTestInput {
            business_type: "Coffee shop".to_string(),
            campaign_type: "Social".to_string(),
            target_audience: "Millennials".to_string(),
            channel: "Instagram".to_string(),
            clicks: 1200,
        }
    }

    #[test]
    fn seeded_simulation_is_reproducible() {
        let a = simulate(&input(), &mut StdRng::seed_from_u64(7)).unwrap();
        let b = simulate(&input(), &mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn campaign_values_stay_in_range() {
        for seed in 0..50 {
            let result = simulate(&input(), &mut StdRng::seed_from_u64(seed)).unwrap();
            let c = &result.campaign;
            let id: u32 = c.campaign_id[1..].parse().unwrap();
            assert!(c.campaign_id.starts_with('C'));
            assert!((100..=999).contains(&id));
            assert!((5..=29).contains(&c.duration));
            assert!((50..=199).contains(&c.acquisition_cost));
            assert!(c.roi >= Decimal::ONE && c.roi <= Decimal::from(5));
            assert_eq!(c.roi.scale(), 2);
            assert!((50..=99).contains(&c.engagement_score));
            assert_eq!(c.clicks, 1200);
        }
    }

    #[test]
    fn variations_are_sorted_and_best_is_first() {
        for seed in 0..50 {
            let result = simulate(&input(), &mut StdRng::seed_from_u64(seed)).unwrap();
            assert_eq!(result.variations.len(), VARIATION_COUNT);
            assert!(result
                .variations
                .windows(2)
                .all(|w| w[0].conversion_rate >= w[1].conversion_rate));
            assert_eq!(result.best_variation, result.variations[0]);
            for v in &result.variations {
                assert!(v.conversion_rate >= Decimal::new(20, 3));
                assert!(v.conversion_rate <= Decimal::new(170, 3));
                assert!(CHANNELS.contains(&v.channel.as_str()));
                assert!(CAMPAIGN_TYPES.contains(&v.campaign_type.as_str()));
                assert!(TARGET_AUDIENCES.contains(&v.target_audience.as_str()));
            }
        }
    }

    #[test]
    fn blank_fields_are_rejected() {
        let mut bad = input();
        bad.channel = "  ".to_string();
        let err = simulate(&bad, &mut StdRng::seed_from_u64(1)).unwrap_err();
        assert_eq!(err, AbTestError::MissingField("channel"));
    }

    #[test]
    fn result_serializes_snake_case_fields() {
        let result = simulate(&input(), &mut StdRng::seed_from_u64(3)).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert!(json["campaign"]["campaign_id"].is_string());
        assert!(json["best_variation"]["conversion_rate"].is_string());
    }
}
