use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use expense_ledger::{
    core::{services::AggregateQuery, LedgerStore},
    domain::{format_date, DateRange, Kind, Record},
};
use tempfile::tempdir;

fn build_sample_ledger(store: &LedgerStore, count: usize) {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let categories = ["Groceries", "Rent", "Travel", "Utilities", "Dining"];
    for idx in 0..count {
        let kind = if idx % 10 == 0 { Kind::Credit } else { Kind::Debit };
        let record = Record::new(
            start + Duration::days((idx % 366) as i64),
            categories[idx % categories.len()],
            10.0 + (idx % 90) as f64,
            kind,
            format!("entry {idx}"),
        )
        .expect("valid record");
        store.append_record(&record).expect("append");
    }
}

fn bench_ledger_queries(c: &mut Criterion) {
    let dir = tempdir().expect("tempdir");
    let store = LedgerStore::open(dir.path().join("expenses.csv"));
    build_sample_ledger(&store, 5_000);

    let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2024, 5, 31).unwrap();
    c.bench_function("list_in_range_5k", |b| {
        b.iter(|| {
            store
                .list_in_range(black_box(&format_date(start)), black_box(&format_date(end)))
                .expect("list")
        })
    });

    c.bench_function("aggregate_by_category_5k", |b| {
        b.iter(|| {
            store
                .aggregate(black_box(&AggregateQuery::spending_by_category()))
                .expect("aggregate")
        })
    });

    let year = DateRange::calendar_year(2024).unwrap();
    c.bench_function("aggregate_by_day_5k", |b| {
        b.iter(|| {
            store
                .aggregate(black_box(&AggregateQuery::spending_by_day(year)))
                .expect("aggregate")
        })
    });
}

criterion_group!(benches, bench_ledger_queries);
criterion_main!(benches);
