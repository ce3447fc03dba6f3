use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use table_explorer::processing::{
    filter_records, group_records, sort_records, FilterCriteria, GroupSpec, SortDirection, SortKey, SortSpec,
};
use table_explorer::types::{Field, Record, RecordId};

const CATEGORIES: [&str; 4] = ["Electronics", "Home", "Sports", "Garden"];
const WORDS: [&str; 6] = ["Lamp", "Speaker", "Mat", "Hub", "Chair", "Bottle"];

fn records(n: usize) -> Vec<Record> {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    (0..n)
        .map(|i| {
            let created = start + Duration::hours(i as i64);
            Record {
                id: RecordId::Int(i as i64),
                name: format!("{} {}", WORDS[i % WORDS.len()], i),
                category: CATEGORIES[i % CATEGORIES.len()].to_string(),
                subcategory: format!("sub-{}", i % 11),
                created_at: created,
                updated_at: created + Duration::days(3),
                price: (i % 500) as f64 + 0.99,
                sale_price: (i % 400) as f64,
            }
        })
        .collect()
}

fn bench_pipeline(c: &mut Criterion) {
    let data = records(10_000);
    let rows: Vec<&Record> = data.iter().collect();
    let criteria = FilterCriteria::default()
        .with_search_query("lmp")
        .with_categories(["Electronics", "Home"])
        .with_price_range(10.0, 400.0);
    let spec = SortSpec::from_keys([
        SortKey::new(Field::Category, SortDirection::Asc),
        SortKey::new(Field::Price, SortDirection::Desc),
    ]);
    let group = GroupSpec::by(Field::Category).unwrap_or_default();

    c.bench_function("filter_sort_group_10k", |b| {
        b.iter(|| {
            let mut out = filter_records(black_box(&rows), &criteria);
            sort_records(&mut out, &spec);
            black_box(group_records(&out, &group))
        })
    });

    c.bench_function("sort_only_10k", |b| {
        b.iter(|| {
            let mut out = rows.clone();
            sort_records(&mut out, &spec);
            black_box(out)
        })
    });
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
