//! CSV export, the downloadable template, and the column format guide.

use adboard_core::Platform;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::ReportError;
use crate::types::CampaignRecord;

/// File name offered for the downloadable template.
pub const TEMPLATE_FILE_NAME: &str = "campaign_data_template.csv";

/// Human-readable description of the accepted document layout.
pub const FORMAT_GUIDE: &str = "\
Campaign Data Format Guide
==========================

All data must be provided in CSV format with a header row naming the
following columns. Header names are matched case-insensitively; column order
is free and extra columns are ignored.

Required fields
---------------
date         Format: DD-MM-YYYY (YYYY-MM-DD is also accepted)
             Example: 01-01-2024
platform     Allowed values: Facebook, Instagram, LinkedIn, Twitter
             Example: Facebook
impressions  Type: whole number, zero or more
             Example: 10000
clicks       Type: whole number, zero or more
             Must be less than or equal to impressions
             Example: 500
conversions  Type: whole number, zero or more
             Must be less than or equal to clicks
             Example: 50
spend        Type: amount in dollars, zero or more
             Example: 1000
revenue      Type: amount in dollars, zero or more
             Example: 2500

Example CSV
-----------
date,platform,impressions,clicks,conversions,spend,revenue
01-01-2024,Facebook,10000,500,50,1000,2500
01-01-2024,Instagram,8000,400,40,800,2000

Important
---------
- Numbers must not include currency symbols or thousands separators.
- Platform names must match exactly as listed (case-sensitive).
- A document with any invalid row is rejected as a whole.
";

/// Serializes records as a CSV document in canonical column order.
///
/// # Errors
///
/// Returns [`ReportError`] if the CSV writer fails or produces invalid UTF-8.
pub fn to_csv(records: &[CampaignRecord]) -> Result<String, ReportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for record in records {
        writer.serialize(record)?;
    }
    if records.is_empty() {
        writer.write_record(crate::parse::REQUIRED_HEADERS)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(csv::IntoInnerError::into_error)?;
    Ok(String::from_utf8(bytes)?)
}

/// The two-row example shipped with the template.
#[must_use]
pub fn sample_records() -> Vec<CampaignRecord> {
    let date = NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid sample date");
    vec![
        CampaignRecord {
            date,
            platform: Platform::Facebook,
            impressions: 10_000,
            clicks: 500,
            conversions: 50,
            spend: Decimal::from(1000),
            revenue: Decimal::from(2500),
        },
        CampaignRecord {
            date,
            platform: Platform::Instagram,
            impressions: 8000,
            clicks: 400,
            conversions: 40,
            spend: Decimal::from(800),
            revenue: Decimal::from(2000),
        },
    ]
}

/// Contents of [`TEMPLATE_FILE_NAME`].
///
/// # Errors
///
/// See [`to_csv`].
pub fn template_csv() -> Result<String, ReportError> {
    to_csv(&sample_records())
}
