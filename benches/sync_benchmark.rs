/*!
 * Reader/Writer Lock Benchmarks
 *
 * Uncontended fast paths and handoff cost under each fairness policy
 */

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use io_kernel::core::sync::{FairnessPolicy, LockConfig, ReaderWriterLock};
use std::sync::Arc;
use std::thread;

fn bench_uncontended(c: &mut Criterion) {
    let lock = ReaderWriterLock::new();

    c.bench_function("read_uncontended", |b| {
        b.iter(|| {
            lock.lock_read();
            lock.unlock_read();
        });
    });

    c.bench_function("write_uncontended", |b| {
        b.iter(|| {
            lock.lock_write();
            lock.unlock_write();
        });
    });

    c.bench_function("read_guard_uncontended", |b| {
        b.iter(|| black_box(lock.read()));
    });
}

fn bench_mixed_workload(c: &mut Criterion) {
    let mut group = c.benchmark_group("mixed_workload");

    for policy in [FairnessPolicy::ReaderPreferring, FairnessPolicy::WriterPreferring] {
        for threads in [2usize, 4, 8] {
            group.bench_with_input(
                BenchmarkId::new(format!("{:?}", policy), threads),
                &threads,
                |b, &threads| {
                    b.iter(|| {
                        let lock = Arc::new(ReaderWriterLock::with_config(LockConfig { policy }));
                        let handles: Vec<_> = (0..threads)
                            .map(|t| {
                                let lock = lock.clone();
                                thread::spawn(move || {
                                    for i in 0..100 {
                                        // One write in ten
                                        if (t + i) % 10 == 0 {
                                            drop(black_box(lock.write()));
                                        } else {
                                            drop(black_box(lock.read()));
                                        }
                                    }
                                })
                            })
                            .collect();

                        for handle in handles {
                            handle.join().unwrap();
                        }
                    });
                },
            );
        }
    }

    group.finish();
}

fn bench_writer_handoff(c: &mut Criterion) {
    c.bench_function("writer_handoff_ping_pong", |b| {
        b.iter(|| {
            let lock = Arc::new(ReaderWriterLock::new());
            let lock_clone = lock.clone();

            let handle = thread::spawn(move || {
                for _ in 0..100 {
                    let _w = lock_clone.write();
                }
            });
            for _ in 0..100 {
                let _w = lock.write();
            }
            handle.join().unwrap();
        });
    });
}

criterion_group!(
    benches,
    bench_uncontended,
    bench_mixed_workload,
    bench_writer_handoff
);

criterion_main!(benches);
