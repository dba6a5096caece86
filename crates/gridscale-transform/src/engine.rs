//! Per-rectangle scale computation
//!
//! [`ScaleEngine::compute_rect`] fills one destination rectangle from a
//! source raster that covers its backward-mapped footprint. Configuration
//! is resolved into a single monomorphized inner loop:
//!
//! ```text
//! interpolator (4) x sample type (Bit1 + 6) x policy case (4)
//! ```
//!
//! The typed loop writes every band of every computable pixel; packed
//! binary data goes through [`crate::binary`].

use crate::binary;
use crate::interp::{Interpolate, Interpolator, KernelMask, Padding, Window};
use crate::mapper::{PositionTable, RationalMapper};
use crate::options::ScaleSpec;
use crate::policy::{PolicyCase, RoiProbe};
use crate::{TransformError, TransformResult};
use gridscale_core::{Raster, RasterMut, Rect, Sample, SampleType};
use log::trace;
use std::ops::Range;

/// Everything one pass over a destination rectangle needs
pub(crate) struct Pass<'a> {
    pub source: &'a Raster,
    pub rect: Rect,
    pub table: &'a PositionTable,
    /// Table columns whose kernel lies inside the source raster
    pub cols: Range<usize>,
    /// Table rows whose kernel lies inside the source raster
    pub rows: Range<usize>,
    pub probe: RoiProbe<'a>,
    pub pad: Padding,
    pub background: &'a [f64],
}

/// The scale engine for one configuration and sample type
#[derive(Debug, Clone)]
pub struct ScaleEngine {
    spec: ScaleSpec,
    mapper: RationalMapper,
    interp: Interpolator,
    sample_type: SampleType,
}

impl ScaleEngine {
    /// Create an engine for sources of `sample_type`
    pub fn new(spec: &ScaleSpec, sample_type: SampleType) -> Self {
        ScaleEngine {
            spec: spec.clone(),
            mapper: RationalMapper::new(spec),
            interp: Interpolator::new(spec.interpolation(), spec.nodata(), sample_type),
            sample_type,
        }
    }

    /// Coordinate mapper
    pub fn mapper(&self) -> &RationalMapper {
        &self.mapper
    }

    /// Active interpolator
    pub fn interpolator(&self) -> &Interpolator {
        &self.interp
    }

    /// Sample type this engine computes
    pub fn sample_type(&self) -> SampleType {
        self.sample_type
    }

    /// Policy case of the inner loop
    pub fn policy(&self) -> PolicyCase {
        self.spec.policy()
    }

    /// Compute `dest_rect` of `dest` from `source`
    ///
    /// Only pixels whose whole kernel footprint lies inside `source` are
    /// written; the caller pre-fills the rest. `roi_mask` is the
    /// rasterized ROI for accessor mode; without it the ROI is rasterized
    /// over the source extent on demand.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::UnsupportedSampleType`] if either raster
    /// does not hold this engine's sample type, and
    /// [`TransformError::UnsupportedBands`] if band counts or background
    /// values do not match.
    pub fn compute_rect(
        &self,
        source: &Raster,
        dest: &mut RasterMut,
        dest_rect: Rect,
        roi_mask: Option<&Raster>,
    ) -> TransformResult<()> {
        if source.sample_type() != self.sample_type || dest.sample_type() != self.sample_type {
            return Err(TransformError::UnsupportedSampleType(format!(
                "engine computes {:?}, got source {:?} and destination {:?}",
                self.sample_type,
                source.sample_type(),
                dest.sample_type()
            )));
        }
        if source.bands() != dest.bands() {
            return Err(TransformError::UnsupportedBands(format!(
                "source has {} bands, destination {}",
                source.bands(),
                dest.bands()
            )));
        }
        let background = self.spec.background_for(dest.bands())?;
        let Some(rect) = dest_rect.intersect(&dest.rect()) else {
            return Ok(());
        };

        let pad = self.interp.padding();
        let mut table = self.mapper.positions(&rect, self.interp.subsample_bits());
        let src = source.rect();
        let cols = valid_span(&table.x_int, src.x + pad.left, src.right() - pad.right);
        let rows = valid_span(&table.y_int, src.y + pad.top, src.bottom() - pad.bottom);
        trace!(
            "compute_rect dest {:?} source {:?} cols {:?} rows {:?}",
            rect, src, cols, rows
        );
        if cols.is_empty() || rows.is_empty() {
            return Ok(());
        }

        let policy = self.spec.policy();
        let owned_mask: Raster;
        let probe = match self.spec.roi() {
            Some(roi) if policy.has_roi() => {
                if self.spec.use_roi_accessor() {
                    let mask = match roi_mask {
                        Some(m) => m,
                        None => {
                            owned_mask = roi.rasterize(src)?;
                            &owned_mask
                        }
                    };
                    table.attach_roi(mask.rect());
                    RoiProbe::accessor(mask, roi.bounds())?
                } else {
                    RoiProbe::iterator(roi.as_ref())
                }
            }
            _ => RoiProbe::Disabled,
        };

        let pass = Pass {
            source,
            rect,
            table: &table,
            cols,
            rows,
            probe,
            pad,
            background: &background,
        };
        match &self.interp {
            Interpolator::Nearest(k) => self.dispatch_type(k, &pass, dest),
            Interpolator::Bilinear(k) => self.dispatch_type(k, &pass, dest),
            Interpolator::Bicubic(k) => self.dispatch_type(k, &pass, dest),
            Interpolator::Generic(k) => self.dispatch_type(k, &pass, dest),
        }
    }

    fn dispatch_type<K: Interpolate>(
        &self,
        k: &K,
        pass: &Pass<'_>,
        dest: &mut RasterMut,
    ) -> TransformResult<()> {
        let policy = self.spec.policy();
        match self.sample_type {
            SampleType::Bit1 => binary::compute(k, policy, pass, dest),
            SampleType::U8 => dispatch_policy::<u8, K>(k, policy, pass, dest),
            SampleType::U16 => dispatch_policy::<u16, K>(k, policy, pass, dest),
            SampleType::I16 => dispatch_policy::<i16, K>(k, policy, pass, dest),
            SampleType::I32 => dispatch_policy::<i32, K>(k, policy, pass, dest),
            SampleType::F32 => dispatch_policy::<f32, K>(k, policy, pass, dest),
            SampleType::F64 => dispatch_policy::<f64, K>(k, policy, pass, dest),
        }
    }
}

/// Index range of a sorted position array whose values lie in `[lo, hi)`
pub(crate) fn valid_span(positions: &[i32], lo: i32, hi: i32) -> Range<usize> {
    let start = positions.partition_point(|&p| p < lo);
    let end = positions.partition_point(|&p| p < hi).max(start);
    start..end
}

fn dispatch_policy<T: Sample, K: Interpolate>(
    k: &K,
    policy: PolicyCase,
    pass: &Pass<'_>,
    dest: &mut RasterMut,
) -> TransformResult<()> {
    match policy {
        PolicyCase::Plain => run::<T, K, false, false>(k, pass, dest),
        PolicyCase::Roi => run::<T, K, true, false>(k, pass, dest),
        PolicyCase::NoData => run::<T, K, false, true>(k, pass, dest),
        PolicyCase::RoiNoData => run::<T, K, true, true>(k, pass, dest),
    }
}

fn run<T: Sample, K: Interpolate, const ROI: bool, const NODATA: bool>(
    k: &K,
    pass: &Pass<'_>,
    dest: &mut RasterMut,
) -> TransformResult<()> {
    let src = pass.source.samples::<T>()?;
    let bands = pass.source.bands() as usize;
    let src_rect = pass.source.rect();
    let row_stride = src_rect.w as usize * bands;
    let dst_rect = dest.rect();
    let dst_stride = dst_rect.w as usize * bands;
    let background: Vec<T> = pass
        .background
        .iter()
        .map(|&v| T::from_f64_clamped(v))
        .collect();
    let table = pass.table;
    let out = dest.samples_mut::<T>()?;

    for j in pass.rows.clone() {
        let sy = table.y_int[j];
        let fy = table.y_frac[j];
        let ry = if ROI { table.roi_row(j) } else { 0 };
        let src_row = (sy - src_rect.y) as usize * row_stride;
        let dst_row = (pass.rect.y + j as i32 - dst_rect.y) as usize * dst_stride;
        for i in pass.cols.clone() {
            let sx = table.x_int[i];
            let fx = table.x_frac[i];
            let mask = if ROI {
                pass.probe.kernel_mask(sx, sy, table.roi_col(i), ry, pass.pad)
            } else {
                KernelMask::ALL
            };
            let anchor = src_row + (sx - src_rect.x) as usize * bands;
            let at = dst_row + (pass.rect.x + i as i32 - dst_rect.x) as usize * bands;
            if ROI && mask.is_empty() {
                out[at..at + bands].copy_from_slice(&background);
                continue;
            }
            for b in 0..bands {
                let win = Window::new(src, anchor + b, row_stride, bands);
                out[at + b] = k
                    .sample::<T, NODATA>(&win, fx, fy, mask)
                    .unwrap_or(background[b]);
            }
        }
    }
    Ok(())
}
