use criterion::{criterion_group, criterion_main, Criterion};
use peelmatch::lowlevel::{centered_y, scan_zones, RotationBank, ScanParams};
use peelmatch::{Bitmap, Decoder, GlyphLibrary, GlyphMap, LibraryConfig, ZoneLayout};
use std::hint::black_box;

/// Pseudo-random blocky glyph, ink lit, framed so every symbol differs.
fn make_glyph(seed: usize, width: usize, height: usize) -> Bitmap {
    let mut bmp = Bitmap::filled(width, height, false).unwrap();
    for y in 0..height {
        for x in 0..width {
            let border = x < 2 || y < 2 || x + 2 >= width;
            let value = ((x / 3 * 13) ^ (y / 3 * 7) ^ (seed * 31)) & 0x3;
            bmp.set(x, y, border || value == 0);
        }
    }
    bmp
}

fn make_library(symbols: &str) -> GlyphLibrary {
    let source: GlyphMap = symbols
        .chars()
        .enumerate()
        .map(|(i, s)| (s, make_glyph(i + 1, 24, 30)))
        .collect();
    GlyphLibrary::build(&source, &LibraryConfig::default()).unwrap()
}

fn make_captcha(library: &GlyphLibrary, width: usize, height: usize) -> Bitmap {
    let placements = [('B', 2, -22), ('4', 38, 19), ('X', 78, -16), ('M', 116, 25)];
    let mut canvas = Bitmap::filled(width, height, true).unwrap();
    for (symbol, x, angle) in placements {
        let tpl = library
            .get(symbol)
            .unwrap()
            .rotate_and_trim(angle as f64)
            .unwrap();
        let y = centered_y(height, tpl.height());
        for ty in 0..tpl.height() {
            for tx in 0..tpl.width() {
                if tpl.get(tx, ty) == Some(false) {
                    canvas.set(x + tx, y + ty, false);
                }
            }
        }
    }
    canvas
}

fn bench_decoder(c: &mut Criterion) {
    let library = make_library("0123456789ABCDEFGHKMNPQRSTUVWXYZ");
    let image = make_captcha(&library, 160, 48);

    let zones = ZoneLayout::default().build(image.width()).unwrap();
    let params = ScanParams::default();
    let warm = RotationBank::new(&library, zones.angles(params.angle_step_deg));
    scan_zones(&image, &warm, zones.zones(), params).unwrap();

    c.bench_function("scan_all_zones_warm_bank", |b| {
        b.iter(|| black_box(scan_zones(&image, &warm, zones.zones(), params).unwrap()));
    });

    c.bench_function("rotate_and_trim", |b| {
        let glyph = library.get('Q').unwrap();
        b.iter(|| black_box(glyph.rotate_and_trim(black_box(23.0)).unwrap()));
    });

    let decoder = Decoder::new(library.clone());
    c.bench_function("decode_sequential", |b| {
        b.iter(|| black_box(decoder.decode(&image).unwrap()));
    });

    #[cfg(feature = "rayon")]
    {
        let cfg = peelmatch::DecodeConfig {
            parallel: true,
            ..peelmatch::DecodeConfig::default()
        };
        let decoder_par = Decoder::new(library.clone()).with_config(cfg);
        c.bench_function("decode_parallel", |b| {
            b.iter(|| black_box(decoder_par.decode(&image).unwrap()));
        });
    }
}

criterion_group!(benches, bench_decoder);
criterion_main!(benches);
