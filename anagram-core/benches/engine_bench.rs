use criterion::{criterion_group, criterion_main, Criterion};

use anagram_core::{BoundaryMasks, EditEngine, Permutation, PixelBuffer, Side};

fn shuffled(side: u32) -> Permutation {
    let n = (side as i64) * (side as i64);
    let raw: Vec<i64> = (0..n).map(|i| (i * 7919) % n).collect();
    Permutation::from_indices(&raw).unwrap()
}

fn bench_brush_stroke(c: &mut Criterion) {
    let mut engine = EditEngine::default();
    engine.load_permutation(shuffled(512));
    engine.set_brush_radius(16);
    engine.set_brush_opacity(50);
    engine.set_brush_color([255, 0, 0, 255]);

    c.bench_function("stroke_64_stamps_r16_512", |b| {
        b.iter(|| {
            engine.begin_stroke().unwrap();
            for i in 0..64 {
                engine.apply_at(Side::A, 100 + i, 100 + i * 2).unwrap();
            }
            engine.end_stroke();
        });
    });
}

fn bench_outline(c: &mut Criterion) {
    let p = shuffled(512);
    c.bench_function("boundary_masks_512", |b| {
        b.iter(|| BoundaryMasks::compute(&p));
    });
}

fn bench_propagate(c: &mut Criterion) {
    let mut engine = EditEngine::default();
    engine.load_permutation(shuffled(512));
    let image = PixelBuffer::filled(512, 512, [10, 20, 30, 255]);

    c.bench_function("load_image_512", |b| {
        b.iter(|| engine.load_image(Side::A, image.clone()).unwrap());
    });
}

criterion_group!(benches, bench_brush_stroke, bench_outline, bench_propagate);
criterion_main!(benches);
