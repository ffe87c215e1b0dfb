use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use sockhook_core::SocketRegistry;
use sockhook_core::Transport;
use sockhook_core::socket::{AF_INET, IPPROTO_TCP, SD_BOTH, SOCK_STREAM};

fn bench_open_close(c: &mut Criterion) {
    let registry = SocketRegistry::new();
    c.bench_function("registry/open_close", |b| {
        b.iter(|| {
            let handle = registry
                .create(black_box(AF_INET), black_box(SOCK_STREAM), IPPROTO_TCP)
                .unwrap();
            registry.close(black_box(handle)).unwrap();
        });
    });
}

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry/lookup_as");
    for open in [1_usize, 64, 4096] {
        let registry = SocketRegistry::new();
        let handles: Vec<_> = (0..open)
            .map(|_| registry.create(AF_INET, SOCK_STREAM, IPPROTO_TCP).unwrap())
            .collect();
        let target = handles[handles.len() / 2];
        group.bench_with_input(BenchmarkId::from_parameter(open), &target, |b, &target| {
            b.iter(|| black_box(registry.lookup_as(black_box(target), Transport::Stream)));
        });
    }
    group.finish();
}

fn bench_shutdown(c: &mut Criterion) {
    let registry = SocketRegistry::new();
    let handle = registry.create(AF_INET, SOCK_STREAM, IPPROTO_TCP).unwrap();
    c.bench_function("registry/shutdown_repeat", |b| {
        b.iter(|| registry.shutdown(black_box(handle), SD_BOTH).unwrap());
    });
}

criterion_group!(benches, bench_open_close, bench_lookup, bench_shutdown);
criterion_main!(benches);
