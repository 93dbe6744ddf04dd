use criterion::{criterion_group, criterion_main, Criterion};
use stegolab_core::analysis::AnalysisConfig;
use stegolab_core::PixelGrid;

pub fn steganalysis(c: &mut Criterion) {
    let image = PixelGrid::from_fn(512, 512, 3, |row, col, channel| {
        ((row * 3 + col * 5 + channel * 40) % 256) as u8
    })
    .expect("Image is not valid.");

    c.bench_function("Steganalysis", |b| b.iter(|| stegolab_core::analyze(&image)));

    let config = AnalysisConfig::default().with_visualizations(true);
    c.bench_function("Steganalysis with visualizations", |b| {
        b.iter(|| stegolab_core::analyze_with(&image, &config).expect("Analysis failed"))
    });
}

criterion_group!(benches, steganalysis);
criterion_main!(benches);
