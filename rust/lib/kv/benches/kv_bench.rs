use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tempfile::TempDir;

use brokerdesk_kv::{KVStore, MemoryKV, RedbStore};

/// A JSON array of `n` flat records, roughly the size of a client list.
fn collection_blob(n: usize) -> Vec<u8> {
    let mut out = String::from("[");
    for i in 0..n {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&format!(
            "{{\"id\":\"{:032x}\",\"name\":\"Client {}\",\"ownerId\":\"b{}\"}}",
            i,
            i,
            i % 7
        ));
    }
    out.push(']');
    out.into_bytes()
}

fn bench_redb_rewrite_collection(c: &mut Criterion) {
    let tmp = TempDir::new().unwrap();
    let store = RedbStore::open(&tmp.path().join("bench.redb")).unwrap();
    let blob = collection_blob(1000);

    c.bench_function("redb_rewrite_1000", |b| {
        b.iter(|| {
            store.set(black_box("desk:clients"), black_box(&blob)).unwrap();
        });
    });
}

fn bench_redb_load_collection(c: &mut Criterion) {
    let tmp = TempDir::new().unwrap();
    let store = RedbStore::open(&tmp.path().join("bench.redb")).unwrap();
    store.set("desk:clients", &collection_blob(1000)).unwrap();

    c.bench_function("redb_load_1000", |b| {
        b.iter(|| {
            let _ = store.get(black_box("desk:clients")).unwrap();
        });
    });
}

fn bench_memory_rewrite_collection(c: &mut Criterion) {
    let store = MemoryKV::new();
    let blob = collection_blob(1000);

    c.bench_function("memory_rewrite_1000", |b| {
        b.iter(|| {
            store.set(black_box("desk:clients"), black_box(&blob)).unwrap();
        });
    });
}

criterion_group!(
    benches,
    bench_redb_rewrite_collection,
    bench_redb_load_collection,
    bench_memory_rewrite_collection,
);
criterion_main!(benches);
