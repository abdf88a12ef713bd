//! Semantic validation of [`ParsedRow`]s.
//!
//! Unlike parsing, validation never stops early: every row is checked against
//! every rule and all violations are reported together. A batch with any
//! violation is rejected as a whole.

use std::sync::LazyLock;

use adboard_core::Platform;
use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::types::{CampaignRecord, ParsedRow, ValidationError, DATE_FORMAT};

static DMY_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(0[1-9]|[12][0-9]|3[01])-(0[1-9]|1[012])-\d{4}$").expect("valid dmy date regex")
});

/// Returns every violation across every row, in row order.
#[must_use]
pub fn validate_rows(rows: &[ParsedRow]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for (idx, row) in rows.iter().enumerate() {
        check_row(idx + 1, row, &mut errors);
    }
    errors
}

/// Validates the batch and converts it into typed records.
///
/// # Errors
///
/// Returns the complete violation list if any row breaks any rule; in that
/// case no record is produced.
pub fn import_rows(rows: &[ParsedRow]) -> Result<Vec<CampaignRecord>, Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut records = Vec::with_capacity(rows.len());
    for (idx, row) in rows.iter().enumerate() {
        if let Some(record) = check_row(idx + 1, row, &mut errors) {
            records.push(record);
        }
    }

    if errors.is_empty() {
        Ok(records)
    } else {
        tracing::debug!(
            rows = rows.len(),
            violations = errors.len(),
            "campaign batch failed validation"
        );
        Err(errors)
    }
}

/// Checks one row, appending its violations to `errors`.
///
/// Returns the typed record only when the row is clean.
pub(crate) fn check_row(
    row_number: usize,
    row: &ParsedRow,
    errors: &mut Vec<ValidationError>,
) -> Option<CampaignRecord> {
    let before = errors.len();

    let date = check_date(row_number, &row.date, errors);

    let platform = row.platform.parse::<Platform>().ok();
    if platform.is_none() {
        errors.push(ValidationError::new(
            row_number,
            "platform",
            format!("Invalid platform. Use one of: {}", Platform::accepted_names()),
        ));
    }

    let impressions = check_count(row_number, "impressions", row.impressions, errors);
    let clicks = check_count(row_number, "clicks", row.clicks, errors);
    let conversions = check_count(row_number, "conversions", row.conversions, errors);
    let spend = check_amount(row_number, "spend", row.spend, errors);
    let revenue = check_amount(row_number, "revenue", row.revenue, errors);

    if row.clicks > row.impressions {
        errors.push(ValidationError::new(
            row_number,
            "clicks",
            "Clicks cannot exceed impressions",
        ));
    }
    if row.conversions > row.clicks {
        errors.push(ValidationError::new(
            row_number,
            "conversions",
            "Conversions cannot exceed clicks",
        ));
    }

    if errors.len() > before {
        return None;
    }

    Some(CampaignRecord {
        date: date?,
        platform: platform?,
        impressions: impressions?,
        clicks: clicks?,
        conversions: conversions?,
        spend: spend?,
        revenue: revenue?,
    })
}

fn check_date(
    row_number: usize,
    value: &str,
    errors: &mut Vec<ValidationError>,
) -> Option<NaiveDate> {
    if !DMY_DATE.is_match(value) {
        errors.push(ValidationError::new(
            row_number,
            "date",
            "Invalid date format. Use DD-MM-YYYY",
        ));
        return None;
    }

    // The pattern admits day/month combinations that do not exist (31-02).
    match NaiveDate::parse_from_str(value, DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(_) => {
            errors.push(ValidationError::new(
                row_number,
                "date",
                "Invalid date. Please enter a valid date",
            ));
            None
        }
    }
}

fn check_count(
    row_number: usize,
    field: &str,
    value: Decimal,
    errors: &mut Vec<ValidationError>,
) -> Option<u64> {
    if value.is_sign_negative() && !value.is_zero() {
        errors.push(negative_value(row_number, field));
        return None;
    }
    if !value.fract().is_zero() {
        errors.push(ValidationError::new(
            row_number,
            field,
            format!("Invalid {field}. Must be a whole number"),
        ));
        return None;
    }
    let count = value.to_u64();
    if count.is_none() {
        errors.push(ValidationError::new(
            row_number,
            field,
            format!("Invalid {field}. Value is too large"),
        ));
    }
    count
}

fn check_amount(
    row_number: usize,
    field: &str,
    value: Decimal,
    errors: &mut Vec<ValidationError>,
) -> Option<Decimal> {
    if value.is_sign_negative() && !value.is_zero() {
        errors.push(negative_value(row_number, field));
        return None;
    }
    // Folds `-0` into `0`.
    Some(value.abs())
}

fn negative_value(row_number: usize, field: &str) -> ValidationError {
    ValidationError::new(
        row_number,
        field,
        format!("Invalid {field}. Must be a positive number"),
    )
}
