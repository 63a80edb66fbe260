//! Criterion benchmark untuk Builder dan Reader
//!
//! Run dengan: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use flatgraph::{
    root, verify, Builder, ByteOrder, DType, FlatArray, FlatArrayArgs, FrameIteration,
    FrameIterationArgs, UpdaterState, UpdaterStateArgs, VerifierOptions,
};

fn build_updater_state(b: &mut Builder, entries: usize) -> Vec<u8> {
    b.reset();
    let keys: Vec<String> = (0..entries).map(|i| format!("slot_{}", i)).collect();
    let arrays: Vec<_> = (0..entries)
        .map(|i| {
            let shape = b.create_vector::<i64>(&[4, 4]).unwrap();
            let buffer = b.create_byte_vector(&[i as u8; 64]).unwrap();
            FlatArray::create(
                b,
                &FlatArrayArgs {
                    shape: Some(shape),
                    buffer: Some(buffer),
                    dtype: DType::FLOAT,
                    byte_order: ByteOrder::LE,
                },
            )
            .unwrap()
        })
        .collect();
    let keys = b.create_vector_of_strings(&keys).unwrap();
    let values = b.create_vector_of_offsets(&arrays).unwrap();
    let name = b.create_string("W1").unwrap();
    let state = UpdaterState::create(
        b,
        &UpdaterStateArgs {
            param_name: Some(name),
            updater_state_keys: Some(keys),
            updater_state_values: Some(values),
        },
    )
    .unwrap();
    b.finish(state).unwrap().to_vec()
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    group.throughput(Throughput::Elements(1));

    // Builder di-reuse antar iterasi, alokasi dipertahankan
    group.bench_function("frame_iteration", |bench| {
        let mut b = Builder::new();
        let mut i = 0u16;
        bench.iter(|| {
            b.reset();
            let frame = b.create_string("while_loop_1").unwrap();
            let fi = FrameIteration::create(
                &mut b,
                &FrameIterationArgs {
                    frame: Some(frame),
                    iteration: black_box(i),
                },
            )
            .unwrap();
            black_box(b.finish(fi).unwrap().len());
            i = i.wrapping_add(1);
        });
    });

    for entries in [1usize, 16, 256].iter() {
        group.throughput(Throughput::Elements(*entries as u64));
        group.bench_function(format!("updater_state_{}", entries), |bench| {
            let mut b = Builder::new();
            bench.iter(|| black_box(build_updater_state(&mut b, *entries)));
        });
    }

    group.finish();
}

fn bench_read(c: &mut Criterion) {
    let mut group = c.benchmark_group("read");

    let mut b = Builder::new();
    let bytes = build_updater_state(&mut b, 256);
    group.throughput(Throughput::Bytes(bytes.len() as u64));

    group.bench_function("walk_updater_state", |bench| {
        bench.iter(|| {
            let state = root::<UpdaterState>(black_box(&bytes)).unwrap();
            let mut total = 0usize;
            for value in state.updater_state_values().unwrap() {
                total += value.unwrap().buffer_bytes().unwrap().len();
            }
            black_box(total)
        });
    });

    group.bench_function("verify_updater_state", |bench| {
        let opts = VerifierOptions::default();
        bench.iter(|| verify::<UpdaterState>(black_box(&bytes), &opts).unwrap());
    });

    group.finish();
}

criterion_group!(benches, bench_build, bench_read);
criterion_main!(benches);
