//! Benchmark for oracle import, name lookup and XML save/load

use card_catalog::CardStore;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

/// Synthetic oracle text with `count` cards, mixing lands, creatures and spells
fn synthetic_oracle(count: usize) -> String {
    let mut text = String::new();
    for i in 0..count {
        match i % 3 {
            0 => text.push_str(&format!("Land {i}\nLand\n\n")),
            1 => text.push_str(&format!(
                "Creature {i}\n{}G\nCreature - Beast\n{}/{}\nTrample\n\n",
                i % 7,
                i % 5,
                i % 4
            )),
            _ => text.push_str(&format!(
                "Spell {i}\n1R\nInstant\nSpell {i} deals {} damage to any target.\n\n",
                i % 6
            )),
        }
    }
    text
}

fn bench_import(c: &mut Criterion) {
    let mut group = c.benchmark_group("oracle_import");

    for count in [100usize, 1_000, 5_000] {
        let text = synthetic_oracle(count);
        group.throughput(Throughput::Bytes(text.len() as u64));

        group.bench_with_input(BenchmarkId::from_parameter(count), &text, |b, text| {
            b.iter(|| {
                let mut store = CardStore::in_memory();
                let set = store.resolve_set("BEN");
                black_box(store.import_records(black_box(text), set))
            });
        });
    }

    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let mut store = CardStore::in_memory();
    let set = store.resolve_set("BEN");
    store.import_records(&synthetic_oracle(5_000), set);
    let names: Vec<String> = (0..5_000).step_by(37).map(|i| format!("Spell {i}")).collect();

    c.benchmark_group("lookup")
        .throughput(Throughput::Elements(names.len() as u64))
        .bench_function("find_hit_and_miss", |b| {
            b.iter(|| {
                for name in &names {
                    black_box(store.find(black_box(name)));
                }
            });
        });
}

fn bench_xml(c: &mut Criterion) {
    let mut store = CardStore::in_memory();
    let set = store.resolve_set("BEN");
    store.import_records(&synthetic_oracle(2_000), set);
    let xml = store.to_xml_string().unwrap();

    let mut group = c.benchmark_group("xml");
    group.throughput(Throughput::Bytes(xml.len() as u64));

    group.bench_function("save_2000_cards", |b| {
        b.iter(|| black_box(store.to_xml_string()).ok());
    });

    group.bench_function("load_2000_cards", |b| {
        b.iter(|| {
            let mut reloaded = CardStore::in_memory();
            black_box(reloaded.load_from_str(black_box(&xml))).ok();
        });
    });

    group.finish();
}

criterion_group!(benches, bench_import, bench_lookup, bench_xml);
criterion_main!(benches);
