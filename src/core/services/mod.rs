pub mod summary_service;
pub mod transaction_service;

pub use summary_service::{
    AggregateQuery, CategoryTotals, DailyTotals, Dimension, SpendingBreakdown, SummaryService,
};
pub use transaction_service::{DeleteOutcome, MatchScope, RangeReport, TransactionService};

use tracing::warn;

use crate::domain::Record;
use crate::errors::Result;
use crate::storage::LedgerStorage;

pub type ServiceResult<T> = Result<T>;

/// Reads every row and keeps the ones that parse. Unparsable rows are logged and
/// skipped so that one bad line does not hide the rest of the ledger.
pub(crate) fn parsed_records(storage: &dyn LedgerStorage) -> ServiceResult<Vec<Record>> {
    let rows = storage.read_rows()?;
    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        match row.parse() {
            Ok(record) => records.push(record),
            Err(err) => warn!(
                location = %storage.location(),
                line = row.line,
                error = %err,
                "skipping unreadable ledger row"
            ),
        }
    }
    Ok(records)
}
