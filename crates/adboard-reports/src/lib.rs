//! Campaign-report analytics for adboard.
//!
//! Turns an uploaded CSV document into validated [`CampaignRecord`]s, then
//! derives summary metric cards and rule-based optimization tips:
//!
//! ```text
//! raw text ─► parse ─► validate ─► aggregate ─► recommend
//! ```
//!
//! Every stage is a pure function over in-memory values. [`ReportSession`]
//! is the thin stateful wrapper that owns the current record set.

pub mod error;
pub mod export;
pub mod format;
pub mod metrics;
pub mod parse;
pub mod pipeline;
pub mod recommend;
pub mod session;
pub mod types;
pub mod validate;

pub use error::{ImportError, ManualEntryError, ParseError, ReportError};
pub use export::{sample_records, template_csv, to_csv, FORMAT_GUIDE, TEMPLATE_FILE_NAME};
pub use metrics::{aggregate, summarize, CampaignSummary};
pub use parse::{parse_csv, parse_entry_line, REQUIRED_HEADERS};
pub use pipeline::{analyze, import_csv, Analysis};
pub use recommend::{group_by_platform, recommend, PlatformTotals, MAX_TIPS};
pub use session::ReportSession;
pub use types::{CampaignRecord, Impact, MetricCard, OptimizationTip, ParsedRow, ValidationError};
pub use validate::{import_rows, validate_rows};
