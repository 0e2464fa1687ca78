//! Pure domain models for ledger records. No I/O happens here.

pub mod range;
pub mod record;

pub use range::DateRange;
pub use record::{format_amount, format_date, parse_date, Kind, Record, RecordDraft};

// Re-export common dependencies so consumers can rely on this module as a façade.
pub use chrono;
