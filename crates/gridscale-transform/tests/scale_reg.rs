//! Scale regression test
//!
//! Output layout for simple fractional factors, identity copies, integer
//! translation and the sample-type by interpolator matrix.

use gridscale_core::{Raster, Rect, SampleType, TiledImage};
use gridscale_test::{RegParams, patterns};
use gridscale_transform::{Interpolation, ScaleEngine, ScaleOp, ScaleOptions, scale};

const TYPES: [SampleType; 6] = [
    SampleType::U8,
    SampleType::U16,
    SampleType::I16,
    SampleType::I32,
    SampleType::F32,
    SampleType::F64,
];

/// Copy of `src` moved by (dx, dy)
fn shifted(src: &Raster, dx: i32, dy: i32) -> Raster {
    let rect = src.rect().translate(dx, dy);
    let mut out = Raster::new(rect, src.bands(), src.sample_type())
        .unwrap()
        .to_mut();
    for y in src.y()..src.rect().bottom() {
        for x in src.x()..src.rect().right() {
            for band in 0..src.bands() {
                out.set_f64(x + dx, y + dy, band, src.get_f64(x, y, band).unwrap())
                    .unwrap();
            }
        }
    }
    out.into()
}

#[test_log::test]
fn scale_reg() {
    let mut rp = RegParams::new("scale");

    // --- Test 1: layout of simple fractions, nearest ---
    let cases = [
        (Rect::new(0, 0, 10, 10).unwrap(), 1.0 / 3.0, (0.0, 0.0), Rect::new(0, 0, 3, 3)),
        (Rect::new(0, 0, 10, 10).unwrap(), 2.5, (-3.0, 1.0), Rect::new(-3, 1, 25, 25)),
        (Rect::new(0, 0, 9, 9).unwrap(), 7.0 / 9.0, (0.0, 0.0), Rect::new(0, 0, 7, 7)),
        (Rect::new(5, 5, 9, 9).unwrap(), 7.0 / 9.0, (0.0, 0.0), Rect::new(4, 4, 7, 7)),
    ];
    for (src_rect, factor, (tx, ty), expected) in cases {
        let src = Raster::new(src_rect, 1, SampleType::U8).unwrap();
        let spec = ScaleOptions::new(factor, factor)
            .translate(tx, ty)
            .build()
            .unwrap();
        let op = ScaleOp::new(TiledImage::untiled(src), spec).unwrap();
        let bounds = op.dest_bounds();
        let expected = expected.unwrap();
        eprintln!("  {:?} x {} + ({}, {}) -> {:?}", src_rect, factor, tx, ty, bounds);
        rp.compare_values(expected.x as f64, bounds.x as f64, 0.0);
        rp.compare_values(expected.y as f64, bounds.y as f64, 0.0);
        rp.compare_values(expected.w as f64, bounds.w as f64, 0.0);
        rp.compare_values(expected.h as f64, bounds.h as f64, 0.0);
    }

    // --- Test 2: identity is a copy for every sample type ---
    let rect = Rect::new(0, 0, 23, 17).unwrap();
    for (seed, st) in TYPES.into_iter().enumerate() {
        let src = patterns::random(rect, 2, st, seed as u64).unwrap();
        let spec = ScaleOptions::new(1.0, 1.0).build().unwrap();
        let out = scale(&TiledImage::new(src.clone(), 8, 8).unwrap(), &spec).unwrap();
        rp.compare_rasters(&src, &out);
    }
    let src = patterns::random_bits(Rect::new(0, 0, 45, 7).unwrap(), 0.5, 3).unwrap();
    let spec = ScaleOptions::new(1.0, 1.0).build().unwrap();
    let out = scale(&TiledImage::untiled(src.clone()), &spec).unwrap();
    rp.compare_rasters(&src, &out);

    // --- Test 3: bilinear identity does not blend ---
    for st in [SampleType::U16, SampleType::F64] {
        let src = patterns::random(rect, 1, st, 11).unwrap();
        let spec = ScaleOptions::new(1.0, 1.0)
            .interpolation(Interpolation::bilinear())
            .build()
            .unwrap();
        let out = scale(&TiledImage::untiled(src.clone()), &spec).unwrap();
        rp.compare_values(22.0, out.width() as f64, 0.0);
        rp.compare_values(16.0, out.height() as f64, 0.0);
        rp.compare_rasters(&src.sub_raster(out.rect()).unwrap(), &out);
    }

    // --- Test 4: integer translation ---
    let src = patterns::gradient(Rect::new(0, 0, 10, 10).unwrap(), 3, SampleType::U8).unwrap();
    let spec = ScaleOptions::new(1.0, 1.0)
        .translate(3.0, -2.0)
        .build()
        .unwrap();
    let out = scale(&TiledImage::new(src.clone(), 4, 4).unwrap(), &spec).unwrap();
    rp.compare_rasters(&shifted(&src, 3, -2), &out);

    let spec = ScaleOptions::new(1.0, 1.0)
        .translate(3.0, -2.0)
        .interpolation(Interpolation::bilinear())
        .build()
        .unwrap();
    let out = scale(&TiledImage::new(src.clone(), 4, 4).unwrap(), &spec).unwrap();
    rp.compare_values(3.0, out.x() as f64, 0.0);
    rp.compare_values(-2.0, out.y() as f64, 0.0);
    let expected = shifted(&src, 3, -2).sub_raster(out.rect()).unwrap();
    rp.compare_rasters(&expected, &out);

    // --- Test 5: constant input stays constant for every type and kernel ---
    let rect = Rect::new(0, 0, 12, 9).unwrap();
    for st in TYPES {
        for interp in [
            Interpolation::Nearest,
            Interpolation::bilinear(),
            Interpolation::bicubic(),
            Interpolation::bicubic2(),
        ] {
            let src = Raster::new_filled(rect, st, &[100.0]).unwrap();
            let spec = ScaleOptions::new(1.5, 0.75)
                .interpolation(interp.clone())
                .build()
                .unwrap();
            let computable = ScaleEngine::new(&spec, st).mapper().forward_rect(&rect);
            let out = scale(&TiledImage::new(src, 5, 5).unwrap(), &spec).unwrap();
            let delta = if st.is_float() { 1e-9 } else { 0.0 };
            let mut bad = 0;
            for y in out.y()..out.rect().bottom() {
                for x in out.x()..out.rect().right() {
                    let expected = if computable.contains_point(x, y) { 100.0 } else { 0.0 };
                    if (out.get_f64(x, y, 0).unwrap() - expected).abs() > delta {
                        bad += 1;
                    }
                }
            }
            eprintln!("  {:?} {:?}: {} bad pixels", st, interp, bad);
            rp.compare_values(0.0, bad as f64, 0.0);
        }
    }

    assert!(rp.cleanup(), "scale regression test failed");
}
