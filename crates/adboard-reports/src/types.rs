use adboard_core::Platform;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// External date representation for campaign records (`DD-MM-YYYY`).
pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// One validated observation of advertising performance.
///
/// Invariants (enforced by [`crate::validate`]): `clicks <= impressions`,
/// `conversions <= clicks`, and all amounts are non-negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignRecord {
    #[serde(with = "dmy_date")]
    pub date: NaiveDate,
    pub platform: Platform,
    pub impressions: u64,
    pub clicks: u64,
    pub conversions: u64,
    pub spend: Decimal,
    pub revenue: Decimal,
}

/// A row as read from the CSV document, before any semantic checks.
///
/// `date` has already been normalized to `DD-MM-YYYY` when the input used
/// `YYYY-MM-DD`; it is otherwise passed through unchecked, as is `platform`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedRow {
    pub date: String,
    pub platform: String,
    pub impressions: Decimal,
    pub clicks: Decimal,
    pub conversions: Decimal,
    pub spend: Decimal,
    pub revenue: Decimal,
}

impl From<&CampaignRecord> for ParsedRow {
    fn from(record: &CampaignRecord) -> Self {
        Self {
            date: record.date.format(DATE_FORMAT).to_string(),
            platform: record.platform.to_string(),
            impressions: Decimal::from(record.impressions),
            clicks: Decimal::from(record.clicks),
            conversions: Decimal::from(record.conversions),
            spend: record.spend,
            revenue: record.revenue,
        }
    }
}

/// A single rule violation found while validating parsed rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// 1-based index into the parsed row set.
    pub row: usize,
    pub column: String,
    pub message: String,
}

impl ValidationError {
    pub(crate) fn new(row: usize, column: &str, message: impl Into<String>) -> Self {
        Self {
            row,
            column: column.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Row {}, {}: {}", self.row, self.column, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricCard {
    pub title: String,
    pub value: String,
    /// Signed percentage change; `None` when it cannot be computed.
    pub change: Option<Decimal>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    High,
    Medium,
    Low,
}

impl std::fmt::Display for Impact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Impact::High => write!(f, "high"),
            Impact::Medium => write!(f, "medium"),
            Impact::Low => write!(f, "low"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptimizationTip {
    pub title: String,
    pub description: String,
    pub impact: Impact,
}

/// Serde adapter for `DD-MM-YYYY` dates. Deserialization also accepts ISO
/// `YYYY-MM-DD`.
mod dmy_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::DATE_FORMAT;

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format(DATE_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(&raw, DATE_FORMAT)
            .or_else(|_| NaiveDate::parse_from_str(&raw, "%Y-%m-%d"))
            .map_err(|e| serde::de::Error::custom(format!("invalid date '{raw}': {e}")))
    }
}
