use criterion::{criterion_group, criterion_main, Criterion};
use indexcore::analysis::{AnalyzerFactory, DefaultAnalyzerFactory};
use indexcore::tokenizer::Tokenizer;
use indexcore::FieldName;

const TEXT: &str = "Grain traders said wheat futures were running higher on Thursday after \
    the Agriculture Department reported export sales well above expectations, while corn \
    and soybean markets held steady ahead of the weekend. ";

fn bench_tokenize(c: &mut Criterion) {
    let text = TEXT.repeat(200);
    let tokenizer = Tokenizer::default();
    let factory = DefaultAnalyzerFactory::default();

    c.bench_function("tokenize_content", |b| b.iter(|| tokenizer.consume(&text)));
    c.bench_function("analyze_content", |b| {
        b.iter(|| {
            let stream = tokenizer.consume(&text).ok()?;
            factory.analyzer_for(FieldName::Content).map(|a| a.process(stream))
        })
    });
}

criterion_group!(benches, bench_tokenize);
criterion_main!(benches);
