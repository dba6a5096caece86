//! Tiling regression test
//!
//! Computing an image in one pass, as a grid of independently requested
//! destination tiles, or from differently tiled sources gives identical
//! pixels everywhere, seams included.

use gridscale_core::{BorderExtender, NoDataRange, Raster, Rect, RectRoi, SampleType, TiledImage};
use gridscale_test::{RegParams, patterns};
use gridscale_transform::{Interpolation, ScaleOp, ScaleOptions, ScaleSpec};
use std::sync::Arc;

/// Whole image from an untiled source, as a single destination request
fn reference(src: &Raster, spec: &ScaleSpec) -> Raster {
    let op = ScaleOp::new(TiledImage::untiled(src.clone()), spec.clone()).unwrap();
    op.compute_rect(op.dest_bounds()).unwrap()
}

/// Compare every destination tile of a tiled run against `expected`
fn check_tiles(rp: &mut RegParams, expected: &Raster, op: &ScaleOp) {
    let (cols, rows) = op.tile_counts();
    for ty in 0..rows {
        for tx in 0..cols {
            let tile = op.compute_tile(tx, ty).unwrap();
            rp.compare_rasters(&expected.sub_raster(tile.rect()).unwrap(), &tile);
        }
    }
    rp.compare_rasters(expected, &op.compute_image().unwrap());
}

#[test_log::test]
fn tiling_reg() {
    let mut rp = RegParams::new("tiling");
    let rect = Rect::new(-4, 3, 41, 29).unwrap();
    let src = patterns::random(rect, 2, SampleType::U16, 23).unwrap();

    let interps = [
        Interpolation::Nearest,
        Interpolation::bilinear(),
        Interpolation::bicubic(),
    ];
    let factors = [(1.0, 1.0), (2.5, 0.75), (0.3, 1.7), (7.0 / 9.0, 4.0 / 3.0)];

    // --- Test 1: plain configurations ---
    for interp in &interps {
        for &(sx, sy) in &factors {
            let spec = ScaleOptions::new(sx, sy)
                .translate(1.25, -0.5)
                .interpolation(interp.clone())
                .background(vec![3.0, 4.0])
                .build()
                .unwrap();
            let expected = reference(&src, &spec);
            for (tw, th) in [(8, 8), (5, 13), (16, 3)] {
                let op = ScaleOp::new(TiledImage::new(src.clone(), tw, th).unwrap(), spec.clone())
                    .unwrap()
                    .with_tile_size(7, 6)
                    .unwrap();
                check_tiles(&mut rp, &expected, &op);
            }
        }
    }

    // --- Test 2: border extender ---
    for extender in [BorderExtender::Copy, BorderExtender::Constant(1000.0)] {
        for interp in &interps {
            let spec = ScaleOptions::new(1.8, 0.6)
                .interpolation(interp.clone())
                .border_extender(extender)
                .background(vec![3.0, 4.0])
                .build()
                .unwrap();
            let expected = reference(&src, &spec);
            let op = ScaleOp::new(TiledImage::new(src.clone(), 6, 6).unwrap(), spec.clone())
                .unwrap()
                .with_tile_size(9, 4)
                .unwrap();
            eprintln!("  {:?} {:?}: {:?}", extender, interp, op.dest_bounds());
            check_tiles(&mut rp, &expected, &op);
        }
    }

    // --- Test 3: ROI and no-data across seams ---
    let roi = Arc::new(RectRoi::new(Rect::new(2, 6, 25, 17).unwrap()));
    for accessor in [false, true] {
        for interp in &interps {
            let spec = ScaleOptions::new(1.3, 1.1)
                .interpolation(interp.clone())
                .roi(roi.clone())
                .use_roi_accessor(accessor)
                .nodata(NoDataRange::range(60000.0, 65535.0).unwrap())
                .background(vec![3.0, 4.0])
                .build()
                .unwrap();
            let expected = reference(&src, &spec);
            let op = ScaleOp::new(TiledImage::new(src.clone(), 4, 9).unwrap(), spec.clone())
                .unwrap()
                .with_tile_size(5, 5)
                .unwrap();
            check_tiles(&mut rp, &expected, &op);
        }
    }

    // --- Test 4: binary source ---
    let bits = patterns::random_bits(Rect::new(0, 0, 70, 21).unwrap(), 0.5, 29).unwrap();
    for interp in &interps {
        let spec = ScaleOptions::new(1.4, 0.9)
            .interpolation(interp.clone())
            .build()
            .unwrap();
        let expected = reference(&bits, &spec);
        let op = ScaleOp::new(TiledImage::new(bits.clone(), 32, 8).unwrap(), spec)
            .unwrap()
            .with_tile_size(20, 6)
            .unwrap();
        check_tiles(&mut rp, &expected, &op);
    }

    assert!(rp.cleanup(), "tiling regression test failed");
}
