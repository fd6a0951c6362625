use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use extract::TextExtractor;

fn page(paragraphs: usize) -> String {
    let mut html = String::from(
        "<html><head><title>t</title></head><body><nav><a href=/>Home</a></nav><div class=\"content\">",
    );
    for i in 0..paragraphs {
        html.push_str(&format!(
            "<p>Параграф номер {i}, в котором достаточно слов, запятых и текста для оценки.</p>"
        ));
    }
    html.push_str("</div><div class=\"sidebar\"><p>Реклама</p></div></body></html>");
    html
}

fn bench_extract(c: &mut Criterion) {
    let extractor = TextExtractor::default();
    let mut group = c.benchmark_group("extract");

    for size in [8, 64, 512].iter() {
        let html = page(*size);
        group.throughput(Throughput::Bytes(html.len() as u64));
        group.bench_function(format!("paragraphs_{size}"), |b| {
            b.iter(|| {
                let cleaned = extractor.clean(black_box(&html)).expect("clean");
                extractor.extract_paragraphs(&cleaned).count()
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_extract);
criterion_main!(benches);
