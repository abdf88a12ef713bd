use serde::Serialize;

use crate::error::ImportError;
use crate::metrics::{aggregate, summarize, CampaignSummary};
use crate::parse::parse_csv;
use crate::recommend::{group_by_platform, recommend, PlatformTotals};
use crate::types::{CampaignRecord, MetricCard, OptimizationTip};
use crate::validate::import_rows;

/// Everything derived from one record set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Analysis {
    pub summary: Option<CampaignSummary>,
    pub cards: Vec<MetricCard>,
    pub tips: Vec<OptimizationTip>,
    pub platforms: Vec<PlatformTotals>,
}

/// Parses and validates a CSV document.
///
/// # Errors
///
/// [`ImportError::Parse`] for a structural failure, or
/// [`ImportError::Validation`] with every violation found. No partial result
/// is ever returned.
pub fn import_csv(text: &str) -> Result<Vec<CampaignRecord>, ImportError> {
    let rows = parse_csv(text)?;
    let records = import_rows(&rows).map_err(ImportError::Validation)?;
    tracing::info!(records = records.len(), "campaign import accepted");
    Ok(records)
}

#[must_use]
pub fn analyze(records: &[CampaignRecord]) -> Analysis {
    Analysis {
        summary: summarize(records),
        cards: aggregate(records),
        tips: recommend(records),
        platforms: group_by_platform(records),
    }
}
