// benches/history.rs
use criterion::{criterion_group, criterion_main, Criterion, black_box};

use scrapedesk::api::HistoryRecord;
use scrapedesk::config::consts::PREVIEW_CHARS;

fn sample_body(n: usize) -> Vec<u8> {
    let records: Vec<serde_json::Value> = (0..n)
        .map(|i| {
            serde_json::json!({
                "url": format!("https://site{i}.example.com/page"),
                "scrape_method": ["requests", "bs4", "selenium"][i % 3],
                "scraped_data": "Lorem ipsum dolor sit amet, consectetur adipiscing elit. ".repeat(40),
                "date": "2025-03-09 12:00:00",
            })
        })
        .collect();
    serde_json::to_vec(&records).expect("encode sample")
}

fn bench_history(c: &mut Criterion) {
    let body = sample_body(500);

    c.bench_function("history_decode_500", |b| {
        b.iter(|| {
            let recs: Vec<HistoryRecord> = serde_json::from_slice(black_box(&body)).expect("decode");
            black_box(recs.len())
        })
    });

    let recs: Vec<HistoryRecord> = serde_json::from_slice(&body).expect("decode");
    c.bench_function("history_preview_500", |b| {
        b.iter(|| {
            let cut = recs.iter().filter(|r| r.preview(black_box(PREVIEW_CHARS)).1).count();
            black_box(cut)
        })
    });
}

criterion_group!(benches, bench_history);
criterion_main!(benches);
