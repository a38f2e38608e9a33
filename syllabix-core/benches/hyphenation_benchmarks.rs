//! Throughput of word and text hyphenation

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::collections::BTreeMap;
use std::hint::black_box;
use syllabix_core::{LanguageProfile, RuleCompiler, TextScanner, WordHyphenator};

const RULES: &[&str] = &[
    "hy3ph", "he2n", "hena4", "hen5at", "1na", "n2at", "1tio", "2io", "o2n", ".ach4", "a1b",
    "1ble", "4ing", "e1ta", "t1te", "2er", "1ter", "in-te-ger", "ta-ble",
];

fn hyphenator() -> WordHyphenator {
    let profile = LanguageProfile::new(
        "abcdefghijklmnopqrstuvwxyz",
        "ABCDEFGHIJKLMNOPQRSTUVWXYZ",
        BTreeMap::new(),
        2,
        3,
        "utf-8",
        "bench",
    )
    .unwrap();
    let mut compiler = RuleCompiler::new();
    compiler.add_rules(RULES.iter().copied());
    WordHyphenator::new(profile, compiler.finish())
}

/// Generate test text of specified size
fn generate_text(size_kb: usize) -> String {
    let base_text = "The <em>hyphenation</em> of an integer table.\nNothing is escaped \\here. ";
    let target_size = size_kb * 1024;
    let repeat_count = target_size / base_text.len() + 1;
    base_text.repeat(repeat_count)
}

fn bench_word(c: &mut Criterion) {
    let hyphenator = hyphenator();
    c.bench_function("hyphenate_word", |b| {
        b.iter(|| hyphenator.hyphenate_word(black_box("hyphenation"), false, "\u{AD}"))
    });
}

fn bench_text(c: &mut Criterion) {
    let mut group = c.benchmark_group("hyphenate_text");
    let hyphenator = hyphenator();
    let scanner = TextScanner::new(&hyphenator);

    for size_kb in [10, 100, 1000] {
        let text = generate_text(size_kb);
        group.throughput(Throughput::Bytes(text.len() as u64));

        for preserve in [false, true] {
            let label = if preserve { "markup" } else { "plain" };
            group.bench_with_input(
                BenchmarkId::new(label, format!("{}KB", size_kb)),
                &text,
                |b, text| b.iter(|| scanner.hyphenate_text(black_box(text), "\u{AD}", preserve)),
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_word, bench_text);
criterion_main!(benches);
