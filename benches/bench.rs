use criterion::{
    black_box,
    criterion_group,
    criterion_main,
    BenchmarkId,
    Criterion,
};

use mapalloc::Allocator;
use std::alloc::{GlobalAlloc, Layout, System};

const SIZES: [usize; 4] = [8, 4096, 1 << 20, 64 << 20];

fn allocate_release(c: &mut Criterion) {
    let alloc = Allocator::new();
    let mut group = c.benchmark_group("allocate+release");

    for size in SIZES {
        group.bench_with_input(BenchmarkId::new("mapalloc", size), &size, |b, &size| {
            b.iter(|| unsafe {
                let ptr = alloc.allocate(black_box(size)).unwrap();

                alloc.release(ptr.as_ptr());
            });
        });

        group.bench_with_input(BenchmarkId::new("system", size), &size, |b, &size| {
            let layout = Layout::from_size_align(size, 8).unwrap();

            b.iter(|| unsafe {
                let ptr = System.alloc(black_box(layout));

                System.dealloc(ptr, layout);
            });
        });
    }

    group.finish();
}

fn zero_allocate(c: &mut Criterion) {
    let alloc = Allocator::new();
    let mut group = c.benchmark_group("zero-allocate");

    for size in SIZES {
        group.bench_with_input(BenchmarkId::new("mapalloc", size), &size, |b, &size| {
            b.iter(|| unsafe {
                let ptr = alloc.zero_allocate(black_box(size / 8), 8).unwrap();

                alloc.release(ptr.as_ptr());
            });
        });

        group.bench_with_input(BenchmarkId::new("system", size), &size, |b, &size| {
            let layout = Layout::from_size_align(size, 8).unwrap();

            b.iter(|| unsafe {
                let ptr = System.alloc_zeroed(black_box(layout));

                System.dealloc(ptr, layout);
            });
        });
    }

    group.finish();
}

fn resize_chain(c: &mut Criterion) {
    let alloc = Allocator::new();

    c.bench_function("resize 1K -> 1M -> 1K", |b| {
        b.iter(|| unsafe {
            let ptr = alloc.allocate(1024).unwrap();
            let ptr = alloc.resize(ptr.as_ptr(), black_box(1 << 20)).unwrap().unwrap();
            let ptr = alloc.resize(ptr.as_ptr(), black_box(1024)).unwrap().unwrap();

            alloc.release(ptr.as_ptr());
        });
    });
}

criterion_group!(benches, allocate_release, zero_allocate, resize_chain);
criterion_main!(benches);
