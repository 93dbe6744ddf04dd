use criterion::{criterion_group, criterion_main, Criterion};
use stegolab_core::{BitsPerChannel, CodecOptions, PixelGrid};

fn carrier() -> PixelGrid {
    PixelGrid::from_fn(256, 256, 3, |row, col, channel| {
        ((row * 13 + col * 29 + channel * 71) % 251) as u8
    })
    .expect("Carrier is not valid.")
}

pub fn lsb_embedding(c: &mut Criterion) {
    let carrier = carrier();
    let secret_message = [0x5Au8; 4096];

    c.bench_function("LSB Embedding sequential", |b| {
        let options = CodecOptions::builder().sequential(true).build().unwrap();
        b.iter(|| {
            stegolab_core::embed(&carrier, &secret_message, &options)
                .expect("Cannot embed secret message")
        })
    });

    c.bench_function("LSB Embedding permuted 2 bits", |b| {
        let options = CodecOptions::builder()
            .password("SuperSecret42")
            .bits_per_channel(BitsPerChannel::Two)
            .build()
            .unwrap();
        b.iter(|| {
            stegolab_core::embed(&carrier, &secret_message, &options)
                .expect("Cannot embed secret message")
        })
    });
}

pub fn lsb_extraction(c: &mut Criterion) {
    let options = CodecOptions::builder().password("SuperSecret42").build().unwrap();
    let stego = stegolab_core::embed(&carrier(), &[0x5Au8; 4096], &options)
        .expect("Cannot embed secret message")
        .stego;

    c.bench_function("LSB Extraction permuted", |b| {
        b.iter(|| stegolab_core::extract(&stego, &options).expect("Cannot extract secret message"))
    });
}

criterion_group!(benches, lsb_embedding, lsb_extraction);
criterion_main!(benches);
