use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use decentdht_core::document::{self, SerializedDocument};
use decentdht_core::test_utils::{field_set, sized_record};
use decentdht_core::{Db, MemoryTransport, Record, StoreAdapter, TicketConfig};

const TABLE: &str = "usertable";

fn bench_document_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("document_encode");

    // YCSB-style records: N fields of 100 bytes
    for field_count in [1, 10, 50].iter() {
        let record = sized_record(*field_count, 100);
        group.throughput(Throughput::Elements(*field_count as u64));
        group.bench_with_input(BenchmarkId::new("fields", field_count), &record, |b, record| {
            b.iter(|| black_box(document::encode(record).unwrap()));
        });
    }

    group.finish();
}

fn bench_document_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("document_decode");

    for field_count in [1, 10, 50].iter() {
        let encoded: SerializedDocument =
            document::encode(&sized_record(*field_count, 100)).unwrap();
        group.throughput(Throughput::Elements(*field_count as u64));
        group.bench_with_input(BenchmarkId::new("all_fields", field_count), &encoded, |b, raw| {
            b.iter(|| black_box(document::decode(raw, None).unwrap()));
        });
    }

    // Projection down to two fields out of fifty
    let encoded = document::encode(&sized_record(50, 100)).unwrap();
    let fields = field_set(&["field0", "field49"]);
    group.bench_function("projection_2_of_50", |b| {
        b.iter(|| black_box(document::decode(&encoded, Some(&fields)).unwrap()));
    });

    group.finish();
}

fn bench_adapter_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("adapter_insert");
    let record = sized_record(10, 100);

    group.bench_function("direct", |b| {
        let mut adapter = StoreAdapter::direct(MemoryTransport::new());
        adapter.init().unwrap();
        let mut i = 0u64;
        b.iter(|| {
            i += 1;
            black_box(adapter.insert(TABLE, &format!("user{}", i % 1000), &record))
        });
    });

    for max_ops in [1u64, 100].iter() {
        group.bench_with_input(BenchmarkId::new("ticketed", max_ops), max_ops, |b, &n| {
            let config = TicketConfig::bounded(n).unwrap();
            let mut adapter = StoreAdapter::ticketed(MemoryTransport::new(), config);
            adapter.init().unwrap();
            let mut i = 0u64;
            b.iter(|| {
                i += 1;
                black_box(adapter.insert(TABLE, &format!("user{}", i % 1000), &record))
            });
        });
    }

    group.finish();
}

fn bench_adapter_read(c: &mut Criterion) {
    let mut group = c.benchmark_group("adapter_read");
    let transport = MemoryTransport::new();

    let mut writer = StoreAdapter::direct(transport.clone());
    writer.init().unwrap();
    for i in 0..1000 {
        writer.insert(TABLE, &format!("user{}", i), &sized_record(10, 100));
    }

    group.bench_function("direct", |b| {
        let mut adapter = StoreAdapter::direct(transport.clone());
        adapter.init().unwrap();
        let mut i = 0u64;
        b.iter(|| {
            i += 1;
            let mut out = Record::new();
            black_box(adapter.read(TABLE, &format!("user{}", i % 1000), None, &mut out))
        });
    });

    group.bench_function("ticketed_unbounded", |b| {
        let mut adapter = StoreAdapter::ticketed(transport.clone(), TicketConfig::Unbounded);
        adapter.init().unwrap();
        let mut i = 0u64;
        b.iter(|| {
            i += 1;
            let mut out = Record::new();
            black_box(adapter.read(TABLE, &format!("user{}", i % 1000), None, &mut out))
        });
    });

    group.finish();
}

fn bench_adapter_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("adapter_update");
    let record = sized_record(10, 100);

    // Delete + insert against a single replace
    group.bench_function("direct", |b| {
        let mut adapter = StoreAdapter::direct(MemoryTransport::new());
        adapter.init().unwrap();
        adapter.insert(TABLE, "user0", &record);
        b.iter(|| black_box(adapter.update(TABLE, "user0", &record)));
    });

    group.bench_function("ticketed", |b| {
        let mut adapter = StoreAdapter::ticketed(MemoryTransport::new(), TicketConfig::Unbounded);
        adapter.init().unwrap();
        adapter.insert(TABLE, "user0", &record);
        b.iter(|| black_box(adapter.update(TABLE, "user0", &record)));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_document_encode,
    bench_document_decode,
    bench_adapter_insert,
    bench_adapter_read,
    bench_adapter_update
);

criterion_main!(benches);
