use thiserror::Error;

/// Error type that captures every failure the ledger store can report.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("No transactions recorded yet (`{0}` does not exist)")]
    StoreNotFound(String),
    #[error("No data: {0}")]
    NoData(String),
    #[error("Malformed ledger file: {0}")]
    MalformedStore(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, LedgerError>;

impl LedgerError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        LedgerError::Validation(message.into())
    }

    /// Returns `true` when the error stems from rejected user input.
    pub fn is_validation(&self) -> bool {
        matches!(self, LedgerError::Validation(_))
    }
}

impl From<csv::Error> for LedgerError {
    fn from(err: csv::Error) -> Self {
        if err.is_io_error() {
            match err.into_kind() {
                csv::ErrorKind::Io(io) => LedgerError::Io(io),
                other => LedgerError::MalformedStore(format!("{other:?}")),
            }
        } else {
            LedgerError::MalformedStore(err.to_string())
        }
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        LedgerError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_io_errors_map_to_io_variant() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = LedgerError::from(csv::Error::from(io));
        assert!(matches!(err, LedgerError::Io(_)), "unexpected: {err:?}");
    }

    #[test]
    fn store_not_found_mentions_location() {
        let err = LedgerError::StoreNotFound("expenses.csv".into());
        assert!(err.to_string().contains("expenses.csv"));
    }
}
