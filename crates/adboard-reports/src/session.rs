//! Stateful holder for the record set currently under analysis.

use crate::error::{ImportError, ManualEntryError};
use crate::metrics::{aggregate, summarize, CampaignSummary};
use crate::parse::normalize_date;
use crate::pipeline::{analyze, import_csv, Analysis};
use crate::recommend::recommend;
use crate::types::{CampaignRecord, MetricCard, OptimizationTip, ParsedRow};
use crate::validate::check_row;

/// The current record set plus the operations that replace or extend it.
///
/// A failed import or entry never modifies the held records.
#[derive(Debug, Clone, Default)]
pub struct ReportSession {
    records: Vec<CampaignRecord>,
}

impl ReportSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_records(records: Vec<CampaignRecord>) -> Self {
        Self { records }
    }

    #[must_use]
    pub fn records(&self) -> &[CampaignRecord] {
        &self.records
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Replaces the record set with the contents of `text`.
    ///
    /// # Errors
    ///
    /// Propagates [`import_csv`] failures; the held records are unchanged.
    pub fn import_csv(&mut self, text: &str) -> Result<usize, ImportError> {
        let records = import_csv(text)?;
        self.records = records;
        Ok(self.records.len())
    }

    /// Validates a single hand-entered row and appends it.
    ///
    /// The date may be given as `DD-MM-YYYY` or `YYYY-MM-DD`.
    ///
    /// # Errors
    ///
    /// - [`ManualEntryError::MissingRequiredFields`] if `date` or `platform`
    ///   is blank.
    /// - [`ManualEntryError::Invalid`] with every rule the row breaks.
    pub fn add_manual(&mut self, mut entry: ParsedRow) -> Result<(), ManualEntryError> {
        if entry.date.trim().is_empty() || entry.platform.trim().is_empty() {
            return Err(ManualEntryError::MissingRequiredFields);
        }
        entry.date = normalize_date(entry.date.trim());
        entry.platform = entry.platform.trim().to_string();

        let mut errors = Vec::new();
        let row_number = self.records.len() + 1;
        match check_row(row_number, &entry, &mut errors) {
            Some(record) => {
                tracing::debug!(
                    platform = %record.platform,
                    records = row_number,
                    "manual campaign entry added"
                );
                self.records.push(record);
                Ok(())
            }
            None => Err(ManualEntryError::Invalid(errors)),
        }
    }

    #[must_use]
    pub fn summary(&self) -> Option<CampaignSummary> {
        summarize(&self.records)
    }

    #[must_use]
    pub fn metrics(&self) -> Vec<MetricCard> {
        aggregate(&self.records)
    }

    #[must_use]
    pub fn tips(&self) -> Vec<OptimizationTip> {
        recommend(&self.records)
    }

    #[must_use]
    pub fn analysis(&self) -> Analysis {
        analyze(&self.records)
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    const SAMPLE: &str = "date,platform,impressions,clicks,conversions,spend,revenue\n\
                          01-01-2024,Facebook,10000,500,50,1000,2500\n\
                          01-01-2024,Instagram,8000,400,40,800,2000\n";

    fn entry(date: &str, platform: &str) -> ParsedRow {
        ParsedRow {
            date: date.to_string(),
            platform: platform.to_string(),
            impressions: Decimal::from(1000),
            clicks: Decimal::from(50),
            conversions: Decimal::from(5),
            spend: Decimal::from(100),
            revenue: Decimal::from(300),
        }
    }

    #[test]
    fn import_replaces_records() {
        let mut session = ReportSession::new();
        session.add_manual(entry("05-05-2024", "Twitter")).unwrap();
        let count = session.import_csv(SAMPLE).expect("sample imports");
        assert_eq!(count, 2);
        assert_eq!(session.records().len(), 2);
        assert_eq!(session.metrics().len(), 4);
    }

    #[test]
    fn failed_import_leaves_state_untouched() {
        let mut session = ReportSession::new();
        session.import_csv(SAMPLE).unwrap();
        let before = session.records().to_vec();

        let bad = SAMPLE.replace("8000,400", "8000,9000");
        assert!(session.import_csv(&bad).is_err());
        assert!(session.import_csv("not,a,campaign,file").is_err());
        assert_eq!(session.records(), before.as_slice());
    }

    #[test]
    fn manual_entry_requires_date_and_platform() {
        let mut session = ReportSession::new();
        let err = session.add_manual(entry("", "Facebook")).unwrap_err();
        assert!(matches!(err, ManualEntryError::MissingRequiredFields));
        assert_eq!(err.to_string(), "Please fill in all required fields");

        let err = session.add_manual(entry("01-01-2024", "  ")).unwrap_err();
        assert!(matches!(err, ManualEntryError::MissingRequiredFields));
        assert!(session.is_empty());
    }

    #[test]
    fn manual_entry_accepts_iso_dates_and_appends() {
        let mut session = ReportSession::new();
        session.import_csv(SAMPLE).unwrap();
        session.add_manual(entry("2024-01-02", "LinkedIn")).unwrap();
        assert_eq!(session.records().len(), 3);
        assert_eq!(
            session.records()[2].date.format("%d-%m-%Y").to_string(),
            "02-01-2024"
        );
    }

    #[test]
    fn manual_entry_runs_row_rules() {
        let mut session = ReportSession::new();
        let mut bad = entry("01-01-2024", "Facebook");
        bad.clicks = Decimal::from(5000);
        let err = session.add_manual(bad).unwrap_err();
        let ManualEntryError::Invalid(errors) = err else {
            panic!("expected rule violations");
        };
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Clicks cannot exceed impressions");
        assert!(session.is_empty());
    }

    #[test]
    fn clear_empties_session() {
        let mut session = ReportSession::new();
        session.import_csv(SAMPLE).unwrap();
        session.clear();
        assert!(session.is_empty());
        assert!(session.metrics().is_empty());
        assert!(session.tips().is_empty());
        assert!(session.summary().is_none());
    }
}
