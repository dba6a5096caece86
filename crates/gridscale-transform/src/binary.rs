//! Packed 1-bit scale path
//!
//! Source and destination rows are arrays of 32-bit words, MSB first, each
//! row starting on a word boundary. Destination bits are written by
//! read-modify-write on the containing word, so the column loop of a row
//! must run in order.

use crate::engine::Pass;
use crate::interp::{BitWindow, Interpolate, KernelMask};
use crate::policy::PolicyCase;
use crate::TransformResult;
use gridscale_core::RasterMut;

pub(crate) fn compute<K: Interpolate>(
    k: &K,
    policy: PolicyCase,
    pass: &Pass<'_>,
    dest: &mut RasterMut,
) -> TransformResult<()> {
    match policy {
        PolicyCase::Plain => run::<K, false, false>(k, pass, dest),
        PolicyCase::Roi => run::<K, true, false>(k, pass, dest),
        PolicyCase::NoData => run::<K, false, true>(k, pass, dest),
        PolicyCase::RoiNoData => run::<K, true, true>(k, pass, dest),
    }
}

/// Set or clear bit `x` of a packed row
#[inline]
fn write_bit(line: &mut [u32], x: u32, bit: u32) {
    let word = &mut line[(x >> 5) as usize];
    let m = 0x8000_0000u32 >> (x & 31);
    if bit != 0 {
        *word |= m;
    } else {
        *word &= !m;
    }
}

fn run<K: Interpolate, const ROI: bool, const NODATA: bool>(
    k: &K,
    pass: &Pass<'_>,
    dest: &mut RasterMut,
) -> TransformResult<()> {
    let words = pass.source.words()?;
    let src_rect = pass.source.rect();
    let src_wpl = pass.source.wpl() as usize;
    let dst_rect = dest.rect();
    let dst_wpl = dest.wpl() as usize;
    let background = u32::from(pass.background[0] >= 0.5);
    let table = pass.table;
    let out = dest.words_mut()?;

    for j in pass.rows.clone() {
        let sy = table.y_int[j];
        let fy = table.y_frac[j];
        let ry = if ROI { table.roi_row(j) } else { 0 };
        let src_row = (sy - src_rect.y) as usize;
        let dy = (pass.rect.y + j as i32 - dst_rect.y) as usize;
        let line = &mut out[dy * dst_wpl..(dy + 1) * dst_wpl];
        for i in pass.cols.clone() {
            let sx = table.x_int[i];
            let fx = table.x_frac[i];
            let mask = if ROI {
                pass.probe.kernel_mask(sx, sy, table.roi_col(i), ry, pass.pad)
            } else {
                KernelMask::ALL
            };
            let x = (pass.rect.x + i as i32 - dst_rect.x) as u32;
            let win = BitWindow::new(words, src_wpl, src_row, (sx - src_rect.x) as u32);
            let bit = k
                .sample_binary::<NODATA>(&win, fx, fy, mask)
                .unwrap_or(background);
            write_bit(line, x, bit);
        }
    }
    Ok(())
}
