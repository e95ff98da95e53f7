use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use studio_taskgen::domain::models::{
    BusinessRecord, EngineConfig, Lead, LeadStatus, Quotation, QuotationStatus,
};
use studio_taskgen::services::RuleCatalog;

const QUOTATION_STATUSES: [QuotationStatus; 5] = [
    QuotationStatus::Draft,
    QuotationStatus::Sent,
    QuotationStatus::Approved,
    QuotationStatus::Completed,
    QuotationStatus::Cancelled,
];

fn records(count: usize) -> Vec<BusinessRecord> {
    let now = Utc.with_ymd_and_hms(2024, 6, 15, 9, 0, 0).unwrap();
    (0..count)
        .map(|i| {
            let id = i as i64;
            let created = now - Duration::days(id % 45);
            if i % 3 == 0 {
                BusinessRecord::Lead(Lead::new(id, format!("Prospect {id}"), LeadStatus::New, created))
            } else {
                BusinessRecord::Quotation(Quotation::new(
                    id,
                    format!("Client {id}"),
                    (id % 20) as f64 * 10_000.0,
                    QUOTATION_STATUSES[i % QUOTATION_STATUSES.len()],
                    created,
                ))
            }
        })
        .collect()
}

fn bench_evaluate_all(c: &mut Criterion) {
    let catalog = RuleCatalog::from_config(&EngineConfig::default());
    let now = Utc.with_ymd_and_hms(2024, 6, 15, 9, 0, 0).unwrap();

    let mut group = c.benchmark_group("rule_catalog_evaluate_all");
    for size in [100usize, 1_000, 10_000] {
        let input = records(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &input, |b, input| {
            b.iter(|| catalog.evaluate_all(black_box(input), black_box(now)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_evaluate_all);
criterion_main!(benches);
