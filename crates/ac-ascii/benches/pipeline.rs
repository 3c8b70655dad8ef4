use ac_ascii::brightness::score_tiles;
use ac_ascii::matcher::CharBrightnessIndex;
use ac_ascii::partition::pad;
use ac_ascii::pipeline::ConversionPipeline;
use ac_core::charset::printable;
use ac_core::frame::{Image, Rgb};
use criterion::{Criterion, black_box, criterion_group, criterion_main};

fn sample_image() -> Image {
    Image::from_fn(1000, 750, |x, y| {
        Rgb::new((x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8)
    })
}

fn bench_score_tiles(c: &mut Criterion) {
    let img = sample_image();
    let padded = pad(&img).into_owned();

    c.bench_function("score_tiles_seq_128", |b| {
        b.iter(|| score_tiles(black_box(&padded), 128, false));
    });
    c.bench_function("score_tiles_par_128", |b| {
        b.iter(|| score_tiles(black_box(&padded), 128, true));
    });
}

fn bench_match(c: &mut Criterion) {
    let index = CharBrightnessIndex::new(printable());
    c.bench_function("match_brightness_1k", |b| {
        b.iter(|| {
            for i in 0..1000u32 {
                black_box(index.match_brightness(f64::from(i) / 1000.0).ok());
            }
        });
    });
}

fn bench_cached_convert(c: &mut Criterion) {
    let img = sample_image();
    let index = CharBrightnessIndex::new(printable());
    let mut pipeline = ConversionPipeline::new();
    let _ = pipeline.convert(&img, 128, &index);

    c.bench_function("convert_cached_128", |b| {
        b.iter(|| pipeline.convert(black_box(&img), 128, &index).ok());
    });
}

criterion_group!(benches, bench_score_tiles, bench_match, bench_cached_convert);
criterion_main!(benches);
