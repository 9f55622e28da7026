use bytes::Bytes;
use criterion::{Criterion, criterion_group, criterion_main};
use hashfs_core::HashedStore;
use hashfs_store_memory::MemoryStore;

fn seeded_store() -> MemoryStore {
    let store = MemoryStore::new();
    store.insert("small.js", Bytes::from(vec![1u8; 4 * 1024]));
    store.insert("large.wasm", Bytes::from(vec![2u8; 1024 * 1024]));
    store
}

fn bench_digest(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let rt_handle = &rt;

    let mut group = c.benchmark_group("hashed_store_digest");

    group.bench_function("digest_cold_1mb", |b| {
        b.iter(|| {
            let hashed = HashedStore::new(seeded_store());
            rt_handle.block_on(async move {
                let _ = hashed.digest("large.wasm").await.unwrap();
            });
        });
    });

    let hashed = HashedStore::new(seeded_store());
    rt.block_on(async {
        hashed.digest("large.wasm").await.unwrap();
    });
    group.bench_function("digest_cached_1mb", |b| {
        let hashed = hashed.clone();
        b.iter(|| {
            let hashed = hashed.clone();
            rt_handle.block_on(async move {
                let _ = hashed.digest("large.wasm").await.unwrap();
            });
        });
    });

    group.finish();
}

fn bench_open(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let rt_handle = &rt;
    let hashed = HashedStore::new(seeded_store());
    let name = rt
        .block_on(hashed.hashed_name("small.js"))
        .unwrap();

    let mut group = c.benchmark_group("hashed_store_open");

    group.bench_function("open_cached_4k", |b| {
        let hashed = hashed.clone();
        let name = name.clone();
        b.iter(|| {
            let hashed = hashed.clone();
            let name = name.clone();
            rt_handle.block_on(async move {
                let _ = hashed.open(&name).await.unwrap();
            });
        });
    });

    group.finish();
}

criterion_group!(benches, bench_digest, bench_open);
criterion_main!(benches);
