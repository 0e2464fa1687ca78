use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use tracing::debug;

use crate::core::services::{parsed_records, ServiceResult};
use crate::domain::{format_date, DateRange, Kind, Record};
use crate::errors::LedgerError;
use crate::storage::LedgerStorage;

/// Grouping key of an aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Category,
    Day,
}

/// Describes which records an aggregate sums and how it groups them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregateQuery {
    pub dimension: Dimension,
    pub kind: Kind,
    pub range: Option<DateRange>,
}

impl AggregateQuery {
    /// Debit totals per category over the whole ledger.
    pub fn spending_by_category() -> Self {
        Self {
            dimension: Dimension::Category,
            kind: Kind::Debit,
            range: None,
        }
    }

    /// Debit totals per day within `range`.
    pub fn spending_by_day(range: DateRange) -> Self {
        Self {
            dimension: Dimension::Day,
            kind: Kind::Debit,
            range: Some(range),
        }
    }

    pub fn with_kind(mut self, kind: Kind) -> Self {
        self.kind = kind;
        self
    }

    pub fn within(mut self, range: DateRange) -> Self {
        self.range = Some(range);
        self
    }

    fn matches(&self, record: &Record) -> bool {
        record.kind == self.kind
            && self
                .range
                .map(|range| range.contains(record.date))
                .unwrap_or(true)
    }

    fn no_data_message(&self) -> String {
        let subject = match self.kind {
            Kind::Debit => "spending",
            Kind::Credit => "income",
        };
        match (self.dimension, self.range) {
            (Dimension::Category, None) => format!("no {subject} data available to plot"),
            (_, Some(range)) => format!(
                "no {subject} data between {} and {}",
                format_date(range.start),
                format_date(range.end)
            ),
            (Dimension::Day, None) => format!("no {subject} data recorded"),
        }
    }
}

/// Category totals in the order categories were first encountered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryTotals {
    entries: Vec<(String, f64)>,
    index: HashMap<String, usize>,
}

impl CategoryTotals {
    pub fn add(&mut self, category: &str, amount: f64) {
        match self.index.get(category) {
            Some(&idx) => self.entries[idx].1 += amount,
            None => {
                self.index.insert(category.to_string(), self.entries.len());
                self.entries.push((category.to_string(), amount));
            }
        }
    }

    pub fn get(&self, category: &str) -> Option<f64> {
        self.index.get(category).map(|&idx| self.entries[idx].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.entries
            .iter()
            .map(|(category, total)| (category.as_str(), *total))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, total)| total).sum()
    }
}

/// Per-day totals, iterated in ascending date order.
pub type DailyTotals = BTreeMap<NaiveDate, f64>;

/// Result of an aggregate, shaped by its dimension.
#[derive(Debug, Clone, PartialEq)]
pub enum SpendingBreakdown {
    ByCategory(CategoryTotals),
    ByDay(DailyTotals),
}

impl SpendingBreakdown {
    pub fn len(&self) -> usize {
        match self {
            SpendingBreakdown::ByCategory(totals) => totals.len(),
            SpendingBreakdown::ByDay(totals) => totals.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Labelled values in display order, ready for a chart renderer.
    pub fn points(&self) -> Vec<(String, f64)> {
        match self {
            SpendingBreakdown::ByCategory(totals) => totals
                .iter()
                .map(|(category, total)| (category.to_string(), total))
                .collect(),
            SpendingBreakdown::ByDay(totals) => totals
                .iter()
                .map(|(date, total)| (format_date(*date), *total))
                .collect(),
        }
    }
}

/// Grouped sums over the transaction log.
pub struct SummaryService;

impl SummaryService {
    /// Sums amounts of the requested kind grouped by the query's dimension.
    /// An empty grouping is reported as [`LedgerError::NoData`].
    pub fn aggregate(
        storage: &dyn LedgerStorage,
        query: &AggregateQuery,
    ) -> ServiceResult<SpendingBreakdown> {
        let records = parsed_records(storage)?;
        let breakdown = match query.dimension {
            Dimension::Category => {
                SpendingBreakdown::ByCategory(Self::category_totals(&records, query))
            }
            Dimension::Day => SpendingBreakdown::ByDay(Self::daily_totals(&records, query)),
        };

        debug!(
            dimension = ?query.dimension,
            kind = %query.kind,
            groups = breakdown.len(),
            "aggregate computed"
        );
        if breakdown.is_empty() {
            return Err(LedgerError::NoData(query.no_data_message()));
        }
        Ok(breakdown)
    }

    pub fn spending_by_category(storage: &dyn LedgerStorage) -> ServiceResult<CategoryTotals> {
        let query = AggregateQuery::spending_by_category();
        let totals = Self::category_totals(&parsed_records(storage)?, &query);
        if totals.is_empty() {
            return Err(LedgerError::NoData(query.no_data_message()));
        }
        Ok(totals)
    }

    pub fn spending_by_day(
        storage: &dyn LedgerStorage,
        range: DateRange,
    ) -> ServiceResult<DailyTotals> {
        let query = AggregateQuery::spending_by_day(range);
        let totals = Self::daily_totals(&parsed_records(storage)?, &query);
        if totals.is_empty() {
            return Err(LedgerError::NoData(query.no_data_message()));
        }
        Ok(totals)
    }

    fn category_totals(records: &[Record], query: &AggregateQuery) -> CategoryTotals {
        let mut totals = CategoryTotals::default();
        for record in records.iter().filter(|record| query.matches(record)) {
            totals.add(&record.category, record.amount);
        }
        totals
    }

    fn daily_totals(records: &[Record], query: &AggregateQuery) -> DailyTotals {
        let mut totals = DailyTotals::new();
        for record in records.iter().filter(|record| query.matches(record)) {
            *totals.entry(record.date).or_insert(0.0) += record.amount;
        }
        totals
    }
}
