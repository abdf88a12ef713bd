//! Rule-based optimization tips over per-platform totals.

use std::collections::BTreeSet;

use adboard_core::Platform;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::format::fixed;
use crate::metrics::ratio;
use crate::types::{CampaignRecord, Impact, OptimizationTip};

/// Upper bound on the number of tips returned by [`recommend`].
pub const MAX_TIPS: usize = 4;

/// Accumulated performance of one platform across the record set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformTotals {
    pub platform: Platform,
    pub spend: Decimal,
    pub revenue: Decimal,
    pub conversions: u64,
    pub clicks: u64,
    pub impressions: u64,
    #[serde(skip)]
    pub dates: BTreeSet<NaiveDate>,
}

impl PlatformTotals {
    fn new(platform: Platform) -> Self {
        Self {
            platform,
            spend: Decimal::ZERO,
            revenue: Decimal::ZERO,
            conversions: 0,
            clicks: 0,
            impressions: 0,
            dates: BTreeSet::new(),
        }
    }

    fn add(&mut self, record: &CampaignRecord) {
        self.spend = self.spend.saturating_add(record.spend);
        self.revenue = self.revenue.saturating_add(record.revenue);
        self.conversions = self.conversions.saturating_add(record.conversions);
        self.clicks = self.clicks.saturating_add(record.clicks);
        self.impressions = self.impressions.saturating_add(record.impressions);
        self.dates.insert(record.date);
    }

    #[must_use]
    pub fn active_days(&self) -> usize {
        self.dates.len()
    }

    fn roi(&self) -> Option<Decimal> {
        ratio(self.revenue - self.spend, self.spend)
    }

    fn conversion_rate(&self) -> Option<Decimal> {
        ratio(Decimal::from(self.conversions), Decimal::from(self.clicks))
    }

    fn click_through_rate(&self) -> Option<Decimal> {
        ratio(Decimal::from(self.clicks), Decimal::from(self.impressions))
    }

    fn cost_per_acquisition(&self) -> Option<Decimal> {
        ratio(self.spend, Decimal::from(self.conversions))
    }

    fn daily_frequency(&self) -> Option<Decimal> {
        ratio(
            Decimal::from(self.impressions),
            Decimal::from(self.active_days()),
        )
    }

    fn revenue_per_click(&self) -> Option<Decimal> {
        ratio(self.revenue, Decimal::from(self.clicks))
    }

    fn conversion_value(&self) -> Option<Decimal> {
        ratio(self.revenue, Decimal::from(self.conversions))
    }
}

/// Groups records by platform, in order of first appearance.
#[must_use]
pub fn group_by_platform(records: &[CampaignRecord]) -> Vec<PlatformTotals> {
    let mut groups: Vec<PlatformTotals> = Vec::new();
    for record in records {
        let idx = match groups.iter().position(|g| g.platform == record.platform) {
            Some(idx) => idx,
            None => {
                groups.push(PlatformTotals::new(record.platform));
                groups.len() - 1
            }
        };
        groups[idx].add(record);
    }
    groups
}

/// Up to [`MAX_TIPS`] tips, in rule order.
#[must_use]
pub fn recommend(records: &[CampaignRecord]) -> Vec<OptimizationTip> {
    let mut tips = all_tips(records);
    tips.truncate(MAX_TIPS);
    tips
}

type Rule = fn(&[PlatformTotals]) -> Option<OptimizationTip>;

const RULES: [Rule; 8] = [
    budget_allocation,
    landing_pages,
    creative_optimization,
    acquisition_costs,
    ad_frequency,
    revenue_per_click,
    platform_mix,
    conversion_value,
];

/// Every tip the rule battery emits, before the cap.
pub(crate) fn all_tips(records: &[CampaignRecord]) -> Vec<OptimizationTip> {
    let groups = group_by_platform(records);
    if groups.is_empty() {
        return Vec::new();
    }
    RULES.iter().filter_map(|rule| rule(&groups)).collect()
}

fn tip(title: &str, description: String, impact: Impact) -> OptimizationTip {
    OptimizationTip {
        title: title.to_string(),
        description,
        impact,
    }
}

/// First group whose metric is defined and satisfies `matches`.
fn first_where(
    groups: &[PlatformTotals],
    metric: impl Fn(&PlatformTotals) -> Option<Decimal>,
    matches: impl Fn(Decimal) -> bool,
) -> Option<(Platform, Decimal)> {
    groups
        .iter()
        .filter_map(|g| metric(g).map(|value| (g.platform, value)))
        .find(|(_, value)| matches(*value))
}

fn percent_label(value: Decimal, dp: u32) -> String {
    fixed(value.saturating_mul(Decimal::ONE_HUNDRED), dp)
}

fn budget_allocation(groups: &[PlatformTotals]) -> Option<OptimizationTip> {
    // Ties go to the later group.
    let (platform, roi) = groups
        .iter()
        .filter_map(|g| g.roi().map(|roi| (g.platform, roi)))
        .reduce(|best, next| if next.1 >= best.1 { next } else { best })?;

    (roi > Decimal::new(5, 1)).then(|| {
        tip(
            "Increase Budget Allocation",
            format!(
                "{platform} shows strong ROI of {}%. Consider increasing budget allocation to maximize returns.",
                percent_label(roi, 1)
            ),
            Impact::High,
        )
    })
}

fn landing_pages(groups: &[PlatformTotals]) -> Option<OptimizationTip> {
    let (platform, rate) = first_where(groups, PlatformTotals::conversion_rate, |cr| {
        cr < Decimal::new(2, 2)
    })?;
    Some(tip(
        "Improve Landing Pages",
        format!(
            "{platform} has a low conversion rate of {}%. Consider A/B testing landing pages and optimizing call-to-actions.",
            percent_label(rate, 1)
        ),
        Impact::High,
    ))
}

fn creative_optimization(groups: &[PlatformTotals]) -> Option<OptimizationTip> {
    let (platform, ctr) = first_where(groups, PlatformTotals::click_through_rate, |ctr| {
        ctr < Decimal::new(1, 2)
    })?;
    Some(tip(
        "Creative Optimization",
        format!(
            "{platform} shows low engagement with {}% CTR. Test new ad creatives and messaging to improve click-through rates.",
            percent_label(ctr, 2)
        ),
        Impact::Medium,
    ))
}

fn acquisition_costs(groups: &[PlatformTotals]) -> Option<OptimizationTip> {
    let (platform, cpa) = first_where(groups, PlatformTotals::cost_per_acquisition, |cpa| {
        cpa > Decimal::ONE_HUNDRED
    })?;
    Some(tip(
        "Reduce Acquisition Costs",
        format!(
            "{platform} has a high CPA of ${}. Focus on targeting optimization and bid adjustments to reduce costs.",
            fixed(cpa, 2)
        ),
        Impact::Medium,
    ))
}

fn ad_frequency(groups: &[PlatformTotals]) -> Option<OptimizationTip> {
    let (platform, frequency) = first_where(groups, PlatformTotals::daily_frequency, |f| {
        f > Decimal::from(5000)
    })?;
    Some(tip(
        "Optimize Ad Frequency",
        format!(
            "{platform} shows high daily impression frequency ({}). Consider adjusting frequency caps to prevent ad fatigue.",
            fixed(frequency, 0)
        ),
        Impact::Medium,
    ))
}

fn revenue_per_click(groups: &[PlatformTotals]) -> Option<OptimizationTip> {
    let (platform, rpc) = first_where(groups, PlatformTotals::revenue_per_click, |rpc| {
        rpc < Decimal::ONE
    })?;
    Some(tip(
        "Improve Revenue per Click",
        format!(
            "{platform} has low revenue per click (${}). Review pricing strategy and conversion funnel optimization.",
            fixed(rpc, 2)
        ),
        Impact::High,
    ))
}

fn platform_mix(groups: &[PlatformTotals]) -> Option<OptimizationTip> {
    let total_spend = groups
        .iter()
        .fold(Decimal::ZERO, |acc, g| acc.saturating_add(g.spend));
    let (platform, share) = first_where(
        groups,
        |g| ratio(g.spend, total_spend),
        |share| share > Decimal::new(7, 1),
    )?;
    Some(tip(
        "Diversify Platform Mix",
        format!(
            "{platform} accounts for {}% of spend. Consider testing other platforms to reduce dependency.",
            percent_label(share, 1)
        ),
        Impact::Medium,
    ))
}

fn conversion_value(groups: &[PlatformTotals]) -> Option<OptimizationTip> {
    let (platform, value) = first_where(groups, PlatformTotals::conversion_value, |v| {
        v < Decimal::from(20)
    })?;
    Some(tip(
        "Increase Conversion Value",
        format!(
            "{platform} has low average conversion value (${}). Focus on attracting higher-value customers.",
            fixed(value, 2)
        ),
        Impact::High,
    ))
}
