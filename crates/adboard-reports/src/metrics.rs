//! Summary KPIs over a validated record set.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::format::{fixed, grouped, percent_or_na};
use crate::types::{CampaignRecord, MetricCard};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Raw totals behind the metric cards.
///
/// Ratios are `None` when their denominator is zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CampaignSummary {
    pub record_count: usize,
    pub total_spend: Decimal,
    pub total_revenue: Decimal,
    pub total_conversions: u64,
    pub total_clicks: u64,
    pub total_impressions: u64,
    /// Revenue of the first `record_count / 2` records, in input order.
    pub previous_revenue: Decimal,
    /// Revenue of the remaining records.
    pub current_revenue: Decimal,
    pub revenue_change: Option<Decimal>,
    pub roi_percent: Option<Decimal>,
    pub ctr_percent: Option<Decimal>,
}

/// `numerator / denominator`, or `None` for a zero denominator or overflow.
pub(crate) fn ratio(numerator: Decimal, denominator: Decimal) -> Option<Decimal> {
    numerator.checked_div(denominator)
}

pub(crate) fn percent(numerator: Decimal, denominator: Decimal) -> Option<Decimal> {
    ratio(numerator, denominator).and_then(|r| r.checked_mul(HUNDRED))
}

/// Totals and ratios over `records` in a single pass.
///
/// The period split for `revenue_change` is by position, not by date: the
/// first half of the slice is the previous period. Returns `None` for an
/// empty slice.
#[must_use]
pub fn summarize(records: &[CampaignRecord]) -> Option<CampaignSummary> {
    if records.is_empty() {
        return None;
    }

    let midpoint = records.len() / 2;
    let mut total_spend = Decimal::ZERO;
    let mut total_conversions = 0u64;
    let mut total_clicks = 0u64;
    let mut total_impressions = 0u64;
    let mut previous_revenue = Decimal::ZERO;
    let mut current_revenue = Decimal::ZERO;

    for (idx, record) in records.iter().enumerate() {
        total_spend = total_spend.saturating_add(record.spend);
        total_conversions = total_conversions.saturating_add(record.conversions);
        total_clicks = total_clicks.saturating_add(record.clicks);
        total_impressions = total_impressions.saturating_add(record.impressions);
        if idx < midpoint {
            previous_revenue = previous_revenue.saturating_add(record.revenue);
        } else {
            current_revenue = current_revenue.saturating_add(record.revenue);
        }
    }

    let total_revenue = previous_revenue.saturating_add(current_revenue);

    Some(CampaignSummary {
        record_count: records.len(),
        total_spend,
        total_revenue,
        total_conversions,
        total_clicks,
        total_impressions,
        previous_revenue,
        current_revenue,
        revenue_change: percent(current_revenue - previous_revenue, previous_revenue),
        roi_percent: percent(total_revenue - total_spend, total_spend),
        ctr_percent: percent(
            Decimal::from(total_clicks),
            Decimal::from(total_impressions),
        ),
    })
}

/// Display cards in fixed order: Total Revenue, ROI, Conversions, CTR.
///
/// Empty input yields no cards.
#[must_use]
pub fn aggregate(records: &[CampaignRecord]) -> Vec<MetricCard> {
    summarize(records).map(|s| cards(&s)).unwrap_or_default()
}

fn cards(summary: &CampaignSummary) -> Vec<MetricCard> {
    vec![
        MetricCard {
            title: "Total Revenue".to_string(),
            value: format!("${}", grouped(summary.total_revenue, 2)),
            change: summary.revenue_change.map(|c| c.round_dp(2)),
        },
        MetricCard {
            title: "ROI".to_string(),
            value: percent_or_na(summary.roi_percent),
            change: Some(Decimal::ZERO),
        },
        MetricCard {
            title: "Conversions".to_string(),
            value: grouped(Decimal::from(summary.total_conversions), 0),
            change: Some(Decimal::ZERO),
        },
        MetricCard {
            title: "CTR".to_string(),
            value: percent_or_na(summary.ctr_percent),
            change: Some(Decimal::ZERO),
        },
    ]
}

/// Revenue change formatted for display, e.g. `"-20.00%"`.
#[must_use]
pub fn change_label(card: &MetricCard) -> Option<String> {
    card.change
        .filter(|c| !c.is_zero())
        .map(|c| format!("{}%", fixed(c, 2)))
}
