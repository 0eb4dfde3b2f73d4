use criterion::{Criterion, black_box, criterion_group, criterion_main};
use glyph_crop::tools::render_marker;
use glyph_crop::{AnalyzerConfig, Candidate, CandidateFinder, Detector, MarkerAnalyzer, Point, Rotation};
use image::{GrayImage, Luma, imageops};

/// White frame with glyphs 0-3 near the corners
fn frame(width: u32, height: u32, cell: u32) -> GrayImage {
    let mut frame = GrayImage::from_pixel(width, height, Luma([240]));
    let side = 8 * cell;
    let spots = [
        (0u8, 20i64, 20i64),
        (1, width as i64 - side as i64 - 20, 20),
        (2, width as i64 - side as i64 - 20, height as i64 - side as i64 - 20),
        (3, 20, height as i64 - side as i64 - 20),
    ];
    for (id, x, y) in spots {
        if let Some(glyph) = render_marker(id, Rotation::Deg0, cell, 1) {
            imageops::overlay(&mut frame, &glyph, x, y);
        }
    }
    frame
}

fn bench_analyze_candidate(c: &mut Criterion) {
    let gray = render_marker(7, Rotation::Deg180, 16, 2).unwrap_or_default();
    let lo = 32.0;
    let hi = 32.0 + 96.0 - 1.0;
    let candidate = Candidate::from([
        Point::new(lo, lo),
        Point::new(lo, hi),
        Point::new(hi, hi),
        Point::new(hi, lo),
    ]);
    let analyzer = MarkerAnalyzer::new(AnalyzerConfig::default());

    c.bench_function("analyze_single_candidate", |b| {
        b.iter(|| analyzer.analyze(black_box(&gray), black_box(&candidate)))
    });
}

fn bench_find_candidates(c: &mut Criterion) {
    let gray = frame(640, 480, 10);
    let finder = CandidateFinder::default();
    c.bench_function("find_candidates_640x480", |b| {
        b.iter(|| finder.find(black_box(&gray)))
    });
}

fn bench_detect_frame(c: &mut Criterion) {
    let detector = Detector::default();
    for (width, height) in [(640, 480), (1920, 1080)] {
        let gray = frame(width, height, 12);
        c.bench_function(&format!("detect_{width}x{height}"), |b| {
            b.iter(|| detector.detect(black_box(&gray)))
        });
    }
}

criterion_group!(
    benches,
    bench_analyze_candidate,
    bench_find_candidates,
    bench_detect_frame
);
criterion_main!(benches);
