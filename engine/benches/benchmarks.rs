//! Performance benchmarks for namedraw-engine

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use namedraw_engine::{
    CarouselWindow, CommandBuffer, DrawConfig, DrawFilter, Drawer, Geometry, NameRecord,
    NameStore, Pacer, Remark, SelectionSequencer, Sex, SlotDrawer, Step,
};
use rand::{rngs::StdRng, SeedableRng};

fn pool(size: usize) -> Vec<NameRecord> {
    (0..size)
        .map(|i| {
            let sex = if i % 2 == 0 { Sex::Male } else { Sex::Female };
            let remark = match i % 3 {
                0 => Remark::English,
                1 => Remark::Japanese,
                _ => Remark::None,
            };
            NameRecord::new(format!("name_{}", i), sex, remark)
        })
        .collect()
}

fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter");

    for size in [100, 1000, 10000] {
        let records = pool(size);
        let filter = DrawFilter::any()
            .with_sex(Sex::Female)
            .with_remark(Remark::Japanese);
        group.bench_with_input(BenchmarkId::new("apply", size), &records, |b, records| {
            b.iter(|| filter.apply(black_box(records)))
        });
    }

    group.finish();
}

fn bench_sequencer(c: &mut Criterion) {
    let mut group = c.benchmark_group("sequencer");

    group.bench_function("advance_1000", |b| {
        let mut rng = StdRng::seed_from_u64(1);
        let mut seq = SelectionSequencer::new(pool(1000), &mut rng);
        b.iter(|| seq.advance(&mut rng).map(|r| r.name.len()))
    });

    group.bench_function("pacer_full_slowdown", |b| {
        let mut rng = StdRng::seed_from_u64(1);
        b.iter(|| {
            let mut pacer = Pacer::new(black_box(20), black_box(1000), &mut rng);
            let mut ticks = 0;
            while let namedraw_engine::Pace::Tick(_) = pacer.next(false, &mut rng) {
                ticks += 1;
            }
            ticks
        })
    });

    group.bench_function("slot_draw_to_settle", |b| {
        b.iter(|| {
            let mut store = NameStore::from_records(pool(200)).unwrap();
            let mut surface = CommandBuffer::new(Geometry::new(800.0, 200.0));
            let mut drawer = SlotDrawer::new(DrawConfig {
                seed: Some(9),
                ..DrawConfig::default()
            })
            .unwrap();
            drawer.start(&store, &mut surface).unwrap();
            loop {
                if let Step::Settled { record } = drawer.step(&mut store, &mut surface).unwrap() {
                    break record;
                }
            }
        })
    });

    group.finish();
}

fn bench_carousel(c: &mut Criterion) {
    let mut group = c.benchmark_group("carousel");

    for size in [10, 100, 1000] {
        group.bench_with_input(BenchmarkId::new("populate", size), &size, |b, &size| {
            let mut surface = CommandBuffer::new(Geometry::new(1000.0, 400.0));
            let mut window = CarouselWindow::new(0.25, 80);
            b.iter(|| {
                window.populate(pool(size), &mut surface).unwrap();
                surface.drain();
            })
        });
    }

    group.bench_function("drag_with_recycle", |b| {
        let mut surface = CommandBuffer::new(Geometry::new(1000.0, 400.0));
        let mut window = CarouselWindow::new(0.1, 80);
        window.populate(pool(500), &mut surface).unwrap();
        window.press(0.0);
        let mut pointer = 0.0;
        b.iter(|| {
            pointer -= 37.0;
            let recycled = window.motion(black_box(pointer), &mut surface).unwrap();
            surface.drain();
            recycled
        })
    });

    group.bench_function("rescale", |b| {
        let mut surface = CommandBuffer::new(Geometry::new(1000.0, 400.0));
        let mut window = CarouselWindow::new(0.1, 80);
        window.populate(pool(50), &mut surface).unwrap();
        b.iter(|| {
            window.rescale(&mut surface);
            surface.drain();
        })
    });

    group.finish();
}

fn bench_serialization(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialization");
    let records = pool(1000);
    let json = serde_json::to_string(&records).unwrap();

    group.bench_function("roster_serialize_1000", |b| {
        b.iter(|| serde_json::to_string(black_box(&records)).unwrap())
    });

    group.bench_function("roster_deserialize_1000", |b| {
        b.iter(|| serde_json::from_str::<Vec<NameRecord>>(black_box(&json)).unwrap())
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_filter,
    bench_sequencer,
    bench_carousel,
    bench_serialization,
);
criterion_main!(benches);
