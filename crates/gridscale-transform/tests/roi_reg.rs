//! ROI regression test
//!
//! A destination pixel whose source anchor falls outside the ROI bounds is
//! background; a pixel whose whole kernel lies inside the ROI is computed
//! as if there were no ROI. Accessor and iterator modes agree, and the
//! generic kernel ignores both ROI and no-data.

use gridscale_core::{MaskRoi, NoDataRange, Raster, Rect, RectRoi, Roi, SampleType, TiledImage};
use gridscale_test::{RegParams, patterns};
use gridscale_transform::{
    Interpolation, KernelTable, RationalMapper, ScaleOptions, ScaleSpec, scale,
};
use std::sync::Arc;

const BACKGROUND: f64 = 9.0;

fn spec(interp: &Interpolation, roi: Option<Arc<dyn Roi>>, accessor: bool) -> ScaleSpec {
    let mut options = ScaleOptions::new(1.6, 0.8)
        .translate(0.5, 0.0)
        .interpolation(interp.clone())
        .background(vec![BACKGROUND, BACKGROUND]);
    if let Some(roi) = roi {
        options = options.roi(roi).use_roi_accessor(accessor);
    }
    options.build().unwrap()
}

#[test_log::test]
fn roi_reg() {
    let mut rp = RegParams::new("roi");
    let rect = Rect::new(0, 0, 24, 20).unwrap();
    let src = patterns::random(rect, 2, SampleType::I16, 5).unwrap();
    let image = TiledImage::new(src, 7, 6).unwrap();
    let roi_rect = Rect::new(5, 4, 12, 9).unwrap();
    let roi: Arc<dyn Roi> = Arc::new(RectRoi::new(roi_rect));

    // --- Test 1: exclusion boundary for every ROI-aware kernel ---
    for interp in [
        Interpolation::Nearest,
        Interpolation::bilinear(),
        Interpolation::bicubic(),
    ] {
        let plain = scale(&image, &spec(&interp, None, false)).unwrap();
        let masked = scale(&image, &spec(&interp, Some(roi.clone()), false)).unwrap();
        rp.compare_values(plain.width() as f64, masked.width() as f64, 0.0);

        let mapper = RationalMapper::new(&spec(&interp, None, false));
        let computable = mapper.forward_rect(&rect);
        let table = mapper.positions(&masked.rect(), 8);
        let pad = interp.padding();
        let (mut outside, mut inside, mut bad) = (0, 0, 0);
        for (j, y) in (masked.y()..masked.rect().bottom()).enumerate() {
            for (i, x) in (masked.x()..masked.rect().right()).enumerate() {
                if !computable.contains_point(x, y) {
                    continue;
                }
                let (sx, sy) = (table.x_int[i], table.y_int[j]);
                let footprint =
                    Rect::from_edges(sx - pad.left, sy - pad.top, sx + pad.right + 1, sy + pad.bottom + 1);
                for band in 0..2 {
                    let v = masked.get_f64(x, y, band).unwrap();
                    if !roi_rect.contains_point(sx, sy) {
                        outside += 1;
                        bad += usize::from(v != BACKGROUND);
                    } else if roi_rect.contains_rect(&footprint) {
                        inside += 1;
                        bad += usize::from(v != plain.get_f64(x, y, band).unwrap());
                    }
                }
            }
        }
        eprintln!(
            "  {:?}: {} outside, {} inside, {} bad",
            interp, outside, inside, bad
        );
        rp.compare_values(1.0, (outside > 0 && inside > 0) as u8 as f64, 0.0);
        rp.compare_values(0.0, bad as f64, 0.0);
    }

    // --- Test 2: accessor and iterator modes agree ---
    let mask_data: Vec<u8> = (0..rect.area())
        .map(|i| {
            let (x, y) = (i % 24, i / 24);
            u8::from((x - 12).pow(2) + (y - 10).pow(2) < 60)
        })
        .collect();
    let mask = Raster::from_vec(rect, 1, mask_data).unwrap();
    let mask_roi: Arc<dyn Roi> = Arc::new(MaskRoi::new(mask).unwrap());
    for region in [roi.clone(), mask_roi] {
        for interp in [
            Interpolation::Nearest,
            Interpolation::bilinear(),
            Interpolation::bicubic2(),
        ] {
            let by_iter = scale(&image, &spec(&interp, Some(region.clone()), false)).unwrap();
            let by_mask = scale(&image, &spec(&interp, Some(region.clone()), true)).unwrap();
            rp.compare_rasters(&by_iter, &by_mask);
        }
    }

    // --- Test 3: the generic kernel ignores ROI and no-data ---
    let generic = Interpolation::Generic(Arc::new(KernelTable::bilinear(8).unwrap()));
    let plain = scale(&image, &spec(&generic, None, false)).unwrap();
    let restricted = ScaleOptions::new(1.6, 0.8)
        .translate(0.5, 0.0)
        .interpolation(generic.clone())
        .roi(roi.clone())
        .nodata(NoDataRange::range(-30000.0, 30000.0).unwrap())
        .background(vec![BACKGROUND, BACKGROUND])
        .build()
        .unwrap();
    let out = scale(&image, &restricted).unwrap();
    rp.compare_rasters(&plain, &out);

    assert!(rp.cleanup(), "roi regression test failed");
}
