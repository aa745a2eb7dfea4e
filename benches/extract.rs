// benches/extract.rs
use std::collections::BTreeMap;

use criterion::{criterion_group, criterion_main, Criterion, black_box};

use lotto_scrape::dataset::{collect_tokens, Dataset, DatasetGame, DrawTier};
use lotto_scrape::specs::{dominican, powerball};

/// Results page with `n` game blocks and some text noise between them.
fn synthetic_page(n: usize) -> String {
    let mut s = String::from("<html><body><h1>Resultados</h1>");
    for i in 0..n {
        s.push_str(&format!(
            r#"<div class="game-block"><div class="company-title">Game {i}</div>
               <div class="session-date">05-01-2026</div>
               <div class="game-scores"><span class="score">{:02}</span><span class="score">{:02}</span>
               <span class="score">{:02}</span></div></div><p>Ad {i}: call 555 12 34</p>"#,
            i % 100, (i * 7) % 100, (i * 13) % 100,
        ));
    }
    s.push_str("<p>Quiniela Leidsa</p><p>07 21 88</p></body></html>");
    s
}

fn synthetic_dataset(n: usize) -> Dataset {
    let games = (0..n)
        .map(|i| DatasetGame {
            name: format!("Game {i}"),
            company: String::from("Bench"),
            tiers: vec![DrawTier::default(); 3],
            ..DatasetGame::default()
        })
        .collect();
    let mut categories = BTreeMap::new();
    categories.insert(String::from("bench"), games);
    Dataset { categories }
}

fn texas_page(rows: usize) -> String {
    let mut s = String::from("<html><body><table>");
    for i in 0..rows {
        s.push_str(&format!(
            "<tr><td>01/{:02}/2026</td><td>4 - 18 - 24 - 51 - 56</td><td>14</td><td>2</td><td>$86 Million</td><td>Roll</td></tr>",
            (i % 28) + 1
        ));
    }
    s.push_str("</table></body></html>");
    s
}

fn bench_extract(c: &mut Criterion) {
    let page = synthetic_page(60);
    let texas = texas_page(200);
    let dataset = synthetic_dataset(60);
    let meta = dominican::DominicanGame::quiniela_leidsa();
    let meta = lotto_scrape::specs::Extractor::meta(&meta).clone();

    c.bench_function("powerball_table", |b| {
        b.iter(|| {
            let r = powerball::parse_doc(black_box(&texas), powerball::SOURCE_URL);
            black_box(r.is_ok())
        })
    });

    c.bench_function("dominican_label_fallback", |b| {
        b.iter(|| {
            let r = dominican::parse_doc(black_box(&page), &meta, "Quiniela Leidsa", 3, dominican::SOURCE_URL);
            black_box(r.is_ok())
        })
    });

    c.bench_function("dataset_collect_tokens", |b| {
        b.iter(|| {
            let tokens = collect_tokens(black_box(&page), black_box(&dataset));
            black_box(tokens.len())
        })
    });
}

criterion_group!(benches, bench_extract);
criterion_main!(benches);
