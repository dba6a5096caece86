//! No-data regression test
//!
//! Source samples inside the no-data range never reach the destination:
//! pixels that would read one are set to the background value.

use gridscale_core::{NoDataRange, Raster, Rect, SampleType, TiledImage};
use gridscale_test::{RegParams, patterns};
use gridscale_transform::{Interpolation, RationalMapper, ScaleOptions, scale};

const BACKGROUND: f64 = 7.0;

fn is_nodata(v: f64) -> bool {
    (250.0..=255.0).contains(&v)
}

#[test_log::test]
fn nodata_reg() {
    let mut rp = RegParams::new("nodata");
    let rect = Rect::new(0, 0, 31, 19).unwrap();
    let src = patterns::random(rect, 1, SampleType::U8, 42).unwrap();
    let flagged = src.samples::<u8>().unwrap().iter().filter(|&&v| v >= 250).count();
    eprintln!("  {} of {} source pixels are no-data", flagged, rect.area());
    rp.compare_values(1.0, (flagged > 0) as u8 as f64, 0.0);

    // --- Test 1: nearest, [250, 255] maps to background, nothing else moves ---
    for (sx, sy) in [(1.0, 1.0), (2.0, 2.0), (0.5, 1.5), (7.0 / 3.0, 0.6)] {
        let spec = ScaleOptions::new(sx, sy)
            .nodata(NoDataRange::range(250.0, 255.0).unwrap())
            .background(vec![BACKGROUND])
            .build()
            .unwrap();
        let mapper = RationalMapper::new(&spec);
        let out = scale(&TiledImage::new(src.clone(), 8, 8).unwrap(), &spec).unwrap();
        let mut bad = 0;
        for y in out.y()..out.rect().bottom() {
            let src_y = mapper.y_axis().source_int(y as i64) as i32;
            for x in out.x()..out.rect().right() {
                let src_x = mapper.x_axis().source_int(x as i64) as i32;
                let v = src.get_f64(src_x, src_y, 0).unwrap();
                let expected = if is_nodata(v) { BACKGROUND } else { v };
                if out.get_f64(x, y, 0).unwrap() != expected {
                    bad += 1;
                }
            }
        }
        eprintln!("  nearest ({}, {}): {} bad pixels", sx, sy, bad);
        rp.compare_values(0.0, bad as f64, 0.0);
    }

    // --- Test 2: bilinear, one flagged tap is enough ---
    let spec = ScaleOptions::new(1.75, 1.25)
        .interpolation(Interpolation::bilinear())
        .nodata(NoDataRange::range(250.0, 255.0).unwrap())
        .background(vec![BACKGROUND])
        .build()
        .unwrap();
    let mapper = RationalMapper::new(&spec);
    let out = scale(&TiledImage::new(src.clone(), 8, 8).unwrap(), &spec).unwrap();
    let computable = mapper.forward_rect(&rect);
    let table = mapper.positions(&out.rect(), 8);
    let mut bad = 0;
    for (j, y) in (out.y()..out.rect().bottom()).enumerate() {
        for (i, x) in (out.x()..out.rect().right()).enumerate() {
            if !computable.contains_point(x, y) {
                continue;
            }
            let (sx, sy) = (table.x_int[i], table.y_int[j]);
            let taps = [(0, 0), (1, 0), (0, 1), (1, 1)]
                .map(|(dx, dy)| src.get_f64(sx + dx, sy + dy, 0).unwrap());
            let v = out.get_f64(x, y, 0).unwrap();
            let ok = if taps.iter().any(|&t| is_nodata(t)) {
                v == BACKGROUND
            } else {
                let lo = taps.iter().copied().fold(f64::INFINITY, f64::min);
                let hi = taps.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                (lo..=hi).contains(&v)
            };
            if !ok {
                bad += 1;
            }
        }
    }
    eprintln!("  bilinear: {} bad pixels", bad);
    rp.compare_values(0.0, bad as f64, 0.0);

    // --- Test 3: float sentinels ---
    let data: Vec<f32> = (0..20)
        .map(|i| match i % 5 {
            1 => f32::NAN,
            3 => f32::INFINITY,
            _ => i as f32,
        })
        .collect();
    let fsrc = Raster::from_vec(Rect::new(0, 0, 5, 4).unwrap(), 1, data.clone()).unwrap();
    for (range, hit) in [
        (NoDataRange::nan(), 1),
        (NoDataRange::positive_infinity(), 3),
    ] {
        let spec = ScaleOptions::new(1.0, 1.0)
            .nodata(range)
            .background(vec![-1.0])
            .build()
            .unwrap();
        let out = scale(&TiledImage::untiled(fsrc.clone()), &spec).unwrap();
        let expected: Vec<f32> = data
            .iter()
            .enumerate()
            .map(|(i, &v)| if i % 5 == hit { -1.0 } else { v })
            .collect();
        let expected = Raster::from_vec(fsrc.rect(), 1, expected).unwrap();
        rp.compare_rasters(&expected, &out);
    }

    assert!(rp.cleanup(), "nodata regression test failed");
}
