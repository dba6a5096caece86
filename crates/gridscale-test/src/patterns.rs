//! Deterministic test rasters
//!
//! Every generator is a pure function of its arguments; random fills use a
//! seeded [`StdRng`], so failures reproduce exactly.

use crate::error::TestResult;
use gridscale_core::{Raster, Rect, SampleType};
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};

/// Smooth ramp: `3*dx + 5*dy + 11*band`, wrapped into `[0, 200)`
///
/// `dx`/`dy` are offsets from the raster origin. For 1-bit rasters the
/// value is reduced to its parity.
pub fn gradient(rect: Rect, bands: u32, sample_type: SampleType) -> TestResult<Raster> {
    fill_with(rect, bands, sample_type, |dx, dy, band| {
        let v = (3 * dx + 5 * dy + 11 * band as i64) % 200;
        if sample_type == SampleType::Bit1 {
            (v & 1) as f64
        } else {
            v as f64
        }
    })
}

/// Checkerboard of `cell x cell` squares alternating between `lo` and `hi`
pub fn checkerboard(
    rect: Rect,
    cell: i32,
    lo: f64,
    hi: f64,
    sample_type: SampleType,
) -> TestResult<Raster> {
    let cell = cell.max(1) as i64;
    fill_with(rect, 1, sample_type, |dx, dy, _| {
        if ((dx / cell) + (dy / cell)) % 2 == 0 {
            lo
        } else {
            hi
        }
    })
}

/// Uniform random samples within a range suited to the sample type
///
/// Integer types span their full range (I32 is limited to +/-1e6 to keep
/// interpolation sums readable); float types use `[-1000, 1000)`.
pub fn random(rect: Rect, bands: u32, sample_type: SampleType, seed: u64) -> TestResult<Raster> {
    let mut rng = StdRng::seed_from_u64(seed);
    fill_with(rect, bands, sample_type, |_, _, _| match sample_type {
        SampleType::Bit1 => f64::from(u8::from(rng.random_bool(0.5))),
        SampleType::U8 => f64::from(rng.random_range(0..=u8::MAX)),
        SampleType::U16 => f64::from(rng.random_range(0..=u16::MAX)),
        SampleType::I16 => f64::from(rng.random_range(i16::MIN..=i16::MAX)),
        SampleType::I32 => f64::from(rng.random_range(-1_000_000..=1_000_000i32)),
        SampleType::F32 | SampleType::F64 => rng.random_range(-1000.0..1000.0),
    })
}

/// Random 1-bit raster with the given probability of a set bit
pub fn random_bits(rect: Rect, density: f64, seed: u64) -> TestResult<Raster> {
    let mut rng = StdRng::seed_from_u64(seed);
    let bits: Vec<u8> = (0..rect.area().max(0))
        .map(|_| u8::from(rng.random_bool(density.clamp(0.0, 1.0))))
        .collect();
    Ok(Raster::from_bits(rect, &bits)?)
}

fn fill_with(
    rect: Rect,
    bands: u32,
    sample_type: SampleType,
    mut value: impl FnMut(i64, i64, u32) -> f64,
) -> TestResult<Raster> {
    let mut r = Raster::new(rect, bands, sample_type)?.to_mut();
    for y in rect.y..rect.bottom() {
        for x in rect.x..rect.right() {
            for band in 0..bands {
                let v = value((x - rect.x) as i64, (y - rect.y) as i64, band);
                r.set_f64(x, y, band, v)?;
            }
        }
    }
    Ok(r.into())
}
