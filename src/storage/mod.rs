pub mod csv_backend;
pub mod memory_backend;

use crate::{
    domain::Record,
    errors::{LedgerError, Result},
};

pub use csv_backend::CsvLedgerStorage;
pub use memory_backend::MemoryLedgerStorage;

/// One stored row exactly as persisted, before any parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerRow {
    /// 1-based line in the backing store; the header occupies line 1.
    pub line: u64,
    pub fields: Vec<String>,
    /// Original bytes of a row that is not valid UTF-8. `fields` then holds a
    /// lossy rendering and the row never parses.
    pub raw: Option<Vec<Vec<u8>>>,
}

impl LedgerRow {
    pub fn new(line: u64, fields: Vec<String>) -> Self {
        Self {
            line,
            fields,
            raw: None,
        }
    }

    /// Row whose bytes could not be decoded; rewrites emit `raw` unchanged.
    pub fn undecodable(line: u64, raw: Vec<Vec<u8>>) -> Self {
        Self {
            line,
            fields: raw
                .iter()
                .map(|field| String::from_utf8_lossy(field).into_owned())
                .collect(),
            raw: Some(raw),
        }
    }

    /// Parses the raw fields into a validated record.
    pub fn parse(&self) -> Result<Record> {
        if self.raw.is_some() {
            return Err(LedgerError::MalformedStore(format!(
                "line {} is not valid UTF-8",
                self.line
            )));
        }
        Record::from_fields(&self.fields)
    }
}

/// Abstraction over persistence backends holding the flat transaction log.
pub trait LedgerStorage: Send + Sync {
    /// Human readable location used in messages and logs.
    fn location(&self) -> String;

    /// Whether the store has been created by a first append.
    fn exists(&self) -> bool;

    /// Returns every data row in stored order, or `StoreNotFound` when the store
    /// has never been created.
    fn read_rows(&self) -> Result<Vec<LedgerRow>>;

    /// Appends one record, creating the store with its header when absent.
    fn append_row(&self, record: &Record) -> Result<()>;

    /// Replaces the stored rows with `rows`, keeping the header. Either the old or
    /// the new content is observable afterwards, never a partial write.
    fn rewrite(&self, rows: &[LedgerRow]) -> Result<()>;
}
