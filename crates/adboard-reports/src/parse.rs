//! CSV document → [`ParsedRow`]s.
//!
//! This stage is fail-fast: a missing header or a non-numeric value in a
//! numeric column aborts the whole parse. Semantic checks (date validity,
//! platform names, cross-field limits) are left to [`crate::validate`],
//! which instead collects every violation.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

use crate::error::ParseError;
use crate::types::ParsedRow;

/// Columns every campaign document must carry, in canonical order.
pub const REQUIRED_HEADERS: [&str; 7] = [
    "date",
    "platform",
    "impressions",
    "clicks",
    "conversions",
    "spend",
    "revenue",
];

static ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid iso date regex"));

/// Parses a CSV document whose first line is a header row.
///
/// Header names are matched case-insensitively after trimming; columns
/// outside [`REQUIRED_HEADERS`] are ignored. Blank lines are skipped.
///
/// # Errors
///
/// - [`ParseError::MissingHeaders`] naming every required column absent from
///   the header row.
/// - [`ParseError::InvalidNumber`] for the first numeric cell that does not
///   parse, naming its column and 1-based data row.
/// - [`ParseError::Csv`] if the underlying reader fails.
pub fn parse_csv(text: &str) -> Result<Vec<ParsedRow>, ParseError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_lowercase())
        .collect();
    let columns = ColumnIndex::resolve(&headers)?;

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        // A whitespace-only line trims down to a single empty field.
        if record.len() == 1 && record[0].is_empty() {
            continue;
        }
        let row_number = rows.len() + 1;
        rows.push(columns.read_row(&record, row_number)?);
    }

    tracing::debug!(rows = rows.len(), "parsed campaign document");
    Ok(rows)
}

/// Parses a single data line (no header) in canonical column order.
///
/// Used for rows entered by hand, e.g. `01-01-2024,Facebook,100,10,1,50,80`.
///
/// # Errors
///
/// Same as [`parse_csv`], plus [`ParseError::EmptyEntry`] for a blank line
/// and [`ParseError::MultipleEntries`] when the text holds more than one row.
pub fn parse_entry_line(line: &str) -> Result<ParsedRow, ParseError> {
    let document = format!("{}\n{}", REQUIRED_HEADERS.join(","), line.trim());
    let mut rows = parse_csv(&document)?;
    match rows.len() {
        0 => Err(ParseError::EmptyEntry),
        1 => Ok(rows.remove(0)),
        n => Err(ParseError::MultipleEntries(n)),
    }
}

/// Rewrites a `YYYY-MM-DD` date to `DD-MM-YYYY`; anything else passes through.
#[must_use]
pub fn normalize_date(value: &str) -> String {
    if ISO_DATE.is_match(value) {
        let mut parts = value.splitn(3, '-');
        if let (Some(year), Some(month), Some(day)) = (parts.next(), parts.next(), parts.next()) {
            return format!("{day}-{month}-{year}");
        }
    }
    value.to_string()
}

/// Position of each required column within the header row.
struct ColumnIndex {
    positions: [usize; 7],
}

impl ColumnIndex {
    fn resolve(headers: &[String]) -> Result<Self, ParseError> {
        let mut positions = [0usize; 7];
        let mut missing = Vec::new();
        for (slot, name) in REQUIRED_HEADERS.iter().enumerate() {
            // Later duplicates win.
            match headers.iter().rposition(|h| h == name) {
                Some(pos) => positions[slot] = pos,
                None => missing.push((*name).to_string()),
            }
        }
        if missing.is_empty() {
            Ok(Self { positions })
        } else {
            Err(ParseError::MissingHeaders(missing))
        }
    }

    fn cell<'r>(&self, record: &'r csv::StringRecord, slot: usize) -> &'r str {
        record.get(self.positions[slot]).unwrap_or("")
    }

    fn number(
        &self,
        record: &csv::StringRecord,
        slot: usize,
        row: usize,
    ) -> Result<Decimal, ParseError> {
        let raw = self.cell(record, slot);
        parse_number(raw).ok_or_else(|| ParseError::InvalidNumber {
            column: REQUIRED_HEADERS[slot].to_string(),
            row,
            value: raw.to_string(),
        })
    }

    fn read_row(&self, record: &csv::StringRecord, row: usize) -> Result<ParsedRow, ParseError> {
        Ok(ParsedRow {
            date: normalize_date(self.cell(record, 0)),
            platform: self.cell(record, 1).to_string(),
            impressions: self.number(record, 2, row)?,
            clicks: self.number(record, 3, row)?,
            conversions: self.number(record, 4, row)?,
            spend: self.number(record, 5, row)?,
            revenue: self.number(record, 6, row)?,
        })
    }
}

/// Accepts plain decimals (`12`, `-3.5`) and scientific notation (`1e3`).
fn parse_number(raw: &str) -> Option<Decimal> {
    if raw.is_empty() {
        return None;
    }
    Decimal::from_str(raw)
        .ok()
        .or_else(|| Decimal::from_scientific(raw).ok())
}
