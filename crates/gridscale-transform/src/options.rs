//! Scale configuration
//!
//! [`ScaleOptions`] collects the caller's parameters; [`ScaleOptions::build`]
//! validates them once and produces an immutable [`ScaleSpec`] that every
//! tile computation shares.
//!
//! # Example
//!
//! ```
//! use gridscale_transform::{Interpolation, ScaleOptions};
//!
//! let spec = ScaleOptions::new(0.333333, 2.5)
//!     .translate(1.0, 0.0)
//!     .interpolation(Interpolation::bilinear())
//!     .build()
//!     .unwrap();
//! assert_eq!(spec.scale_x().to_string(), "1/3");
//! assert_eq!(spec.scale_y().to_string(), "5/2");
//! ```

use crate::interp::{KernelTable, Padding};
use crate::policy::PolicyCase;
use crate::{TransformError, TransformResult};
use gridscale_core::{BorderExtender, NoDataRange, Rational, Roi};
use log::{debug, warn};
use std::fmt;
use std::sync::Arc;

/// Tolerance used to snap scale factors and translations to fractions
pub const RATIONAL_TOLERANCE: f64 = 1e-6;

/// Default fixed-point precision of sub-pixel fractions
pub const DEFAULT_SUBSAMPLE_BITS: u32 = 8;

/// Default fixed-point precision of bicubic coefficients
pub const DEFAULT_PRECISION_BITS: u32 = 8;

/// Largest supported subsample precision
pub const MAX_SUBSAMPLE_BITS: u32 = 12;

/// Largest supported bicubic coefficient precision
pub const MAX_PRECISION_BITS: u32 = 12;

/// Parametrization of the cubic convolution kernel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CubicVariant {
    /// `a = -0.5`
    #[default]
    First,
    /// `a = -1.0`, sharper
    Second,
}

impl CubicVariant {
    /// The kernel parameter `a`
    pub fn parameter(self) -> f64 {
        match self {
            CubicVariant::First => -0.5,
            CubicVariant::Second => -1.0,
        }
    }
}

/// Interpolation method
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Interpolation {
    /// Nearest neighbor
    #[default]
    Nearest,
    /// 2x2 linear blend
    Bilinear { subsample_bits: u32 },
    /// 4x4 cubic convolution
    Bicubic {
        subsample_bits: u32,
        precision_bits: u32,
        variant: CubicVariant,
    },
    /// Caller-supplied kernel; ignores ROI and no-data
    Generic(Arc<KernelTable>),
}

impl Interpolation {
    /// Bilinear with default precision
    pub fn bilinear() -> Self {
        Interpolation::Bilinear {
            subsample_bits: DEFAULT_SUBSAMPLE_BITS,
        }
    }

    /// Bicubic with the first kernel parametrization
    pub fn bicubic() -> Self {
        Interpolation::Bicubic {
            subsample_bits: DEFAULT_SUBSAMPLE_BITS,
            precision_bits: DEFAULT_PRECISION_BITS,
            variant: CubicVariant::First,
        }
    }

    /// Bicubic with the second kernel parametrization
    pub fn bicubic2() -> Self {
        Interpolation::Bicubic {
            subsample_bits: DEFAULT_SUBSAMPLE_BITS,
            precision_bits: DEFAULT_PRECISION_BITS,
            variant: CubicVariant::Second,
        }
    }

    /// Source pixels read around the anchor
    pub fn padding(&self) -> Padding {
        match self {
            Interpolation::Nearest => Padding::default(),
            Interpolation::Bilinear { .. } => Padding {
                left: 0,
                right: 1,
                top: 0,
                bottom: 1,
            },
            Interpolation::Bicubic { .. } => Padding {
                left: 1,
                right: 2,
                top: 1,
                bottom: 2,
            },
            Interpolation::Generic(table) => table.padding(),
        }
    }

    /// Fixed-point precision of sub-pixel fractions
    pub fn subsample_bits(&self) -> u32 {
        match self {
            Interpolation::Nearest => 0,
            Interpolation::Bilinear { subsample_bits } => *subsample_bits,
            Interpolation::Bicubic { subsample_bits, .. } => *subsample_bits,
            Interpolation::Generic(table) => table.subsample_bits(),
        }
    }

    /// Whether this method samples at pixel centers
    pub fn is_nearest(&self) -> bool {
        matches!(self, Interpolation::Nearest)
    }

    /// Whether the method evaluates ROI and no-data
    pub fn honors_policy(&self) -> bool {
        !matches!(self, Interpolation::Generic(_))
    }

    fn validate(&self) -> TransformResult<()> {
        let bits = self.subsample_bits();
        if bits > MAX_SUBSAMPLE_BITS {
            return Err(TransformError::InvalidParameters(format!(
                "subsample bits {} exceed {}",
                bits, MAX_SUBSAMPLE_BITS
            )));
        }
        if let Interpolation::Bicubic { precision_bits, .. } = self
            && (*precision_bits == 0 || *precision_bits > MAX_PRECISION_BITS)
        {
            return Err(TransformError::InvalidParameters(format!(
                "precision bits must be in 1..={}, got {}",
                MAX_PRECISION_BITS, precision_bits
            )));
        }
        Ok(())
    }
}

/// Scale parameters as supplied by the caller
///
/// All fields are public; the builder methods are shorthands.
#[derive(Clone)]
pub struct ScaleOptions {
    /// Horizontal scale factor
    pub x_scale: f64,
    /// Vertical scale factor
    pub y_scale: f64,
    /// Horizontal translation in destination pixels
    pub x_trans: f64,
    /// Vertical translation in destination pixels
    pub y_trans: f64,
    /// Interpolation method
    pub interpolation: Interpolation,
    /// Optional region of interest in source coordinates
    pub roi: Option<Arc<dyn Roi>>,
    /// Test the ROI through a rasterized mask instead of point queries
    pub use_roi_accessor: bool,
    /// Source values treated as missing
    pub nodata: Option<NoDataRange>,
    /// Destination value(s) for excluded pixels; one value broadcasts
    pub background: Vec<f64>,
    /// Edge policy for source reads past the image bounds
    pub border_extender: Option<BorderExtender>,
}

impl fmt::Debug for ScaleOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScaleOptions")
            .field("x_scale", &self.x_scale)
            .field("y_scale", &self.y_scale)
            .field("x_trans", &self.x_trans)
            .field("y_trans", &self.y_trans)
            .field("interpolation", &self.interpolation)
            .field("roi", &self.roi.as_ref().map(|r| r.bounds()))
            .field("use_roi_accessor", &self.use_roi_accessor)
            .field("nodata", &self.nodata)
            .field("background", &self.background)
            .field("border_extender", &self.border_extender)
            .finish()
    }
}

impl Default for ScaleOptions {
    fn default() -> Self {
        Self {
            x_scale: 1.0,
            y_scale: 1.0,
            x_trans: 0.0,
            y_trans: 0.0,
            interpolation: Interpolation::Nearest,
            roi: None,
            use_roi_accessor: false,
            nodata: None,
            background: vec![0.0],
            border_extender: None,
        }
    }
}

impl ScaleOptions {
    /// Create options with scale factors
    pub fn new(x_scale: f64, y_scale: f64) -> Self {
        Self {
            x_scale,
            y_scale,
            ..Default::default()
        }
    }

    /// Set the translation
    pub fn translate(mut self, x_trans: f64, y_trans: f64) -> Self {
        self.x_trans = x_trans;
        self.y_trans = y_trans;
        self
    }

    /// Set the interpolation method
    pub fn interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    /// Set the region of interest
    pub fn roi(mut self, roi: Arc<dyn Roi>) -> Self {
        self.roi = Some(roi);
        self
    }

    /// Select accessor (mask raster) or iterator (point query) ROI tests
    pub fn use_roi_accessor(mut self, accessor: bool) -> Self {
        self.use_roi_accessor = accessor;
        self
    }

    /// Set the no-data range
    pub fn nodata(mut self, range: NoDataRange) -> Self {
        self.nodata = Some(range);
        self
    }

    /// Set the background value(s)
    pub fn background(mut self, values: Vec<f64>) -> Self {
        self.background = values;
        self
    }

    /// Set the border extender
    pub fn border_extender(mut self, extender: BorderExtender) -> Self {
        self.border_extender = Some(extender);
        self
    }

    /// Validate and freeze the configuration
    ///
    /// # Errors
    ///
    /// - [`TransformError::InvalidScaleFactor`] if a scale factor is not
    ///   finite and positive. A ROI does not relax this.
    /// - [`TransformError::InvalidParameters`] for non-finite translations,
    ///   an empty background, or out-of-range precision bits.
    pub fn build(self) -> TransformResult<ScaleSpec> {
        for (axis, s) in [("x", self.x_scale), ("y", self.y_scale)] {
            if !s.is_finite() || s <= 0.0 {
                return Err(TransformError::InvalidScaleFactor(format!(
                    "{} scale must be finite and positive, got {}",
                    axis, s
                )));
            }
        }
        if !self.x_trans.is_finite() || !self.y_trans.is_finite() {
            return Err(TransformError::InvalidParameters(format!(
                "translation must be finite, got ({}, {})",
                self.x_trans, self.y_trans
            )));
        }
        if self.background.is_empty() {
            return Err(TransformError::InvalidParameters(
                "at least one background value is required".into(),
            ));
        }
        self.interpolation.validate()?;

        let snap = |v: f64| Rational::approximate(v, RATIONAL_TOLERANCE);
        let scale_x = snap(self.x_scale)?;
        let scale_y = snap(self.y_scale)?;
        let (Some(inv_scale_x), Some(inv_scale_y)) = (scale_x.recip(), scale_y.recip()) else {
            return Err(TransformError::InvalidScaleFactor(format!(
                "scale ({}, {}) snaps to zero",
                self.x_scale, self.y_scale
            )));
        };
        let trans_x = snap(self.x_trans)?;
        let trans_y = snap(self.y_trans)?;
        debug!(
            "scale ({}, {}) -> ({}, {}), translation ({}, {}) -> ({}, {})",
            self.x_scale,
            self.y_scale,
            scale_x,
            scale_y,
            self.x_trans,
            self.y_trans,
            trans_x,
            trans_y
        );

        let honors = self.interpolation.honors_policy();
        if !honors && (self.roi.is_some() || self.nodata.is_some()) {
            warn!("generic kernel ignores ROI and no-data; scaling every pixel uniformly");
        }
        let policy = PolicyCase::resolve(self.roi.is_some(), self.nodata.is_some(), honors);

        Ok(ScaleSpec {
            scale_x,
            scale_y,
            inv_scale_x,
            inv_scale_y,
            trans_x,
            trans_y,
            interpolation: self.interpolation,
            roi: self.roi,
            use_roi_accessor: self.use_roi_accessor,
            nodata: self.nodata,
            background: self.background,
            border_extender: self.border_extender,
            policy,
        })
    }
}

/// Validated, immutable scale configuration
#[derive(Clone)]
pub struct ScaleSpec {
    scale_x: Rational,
    scale_y: Rational,
    inv_scale_x: Rational,
    inv_scale_y: Rational,
    trans_x: Rational,
    trans_y: Rational,
    interpolation: Interpolation,
    roi: Option<Arc<dyn Roi>>,
    use_roi_accessor: bool,
    nodata: Option<NoDataRange>,
    background: Vec<f64>,
    border_extender: Option<BorderExtender>,
    policy: PolicyCase,
}

impl fmt::Debug for ScaleSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScaleSpec")
            .field("scale", &(self.scale_x, self.scale_y))
            .field("trans", &(self.trans_x, self.trans_y))
            .field("interpolation", &self.interpolation)
            .field("roi", &self.roi.as_ref().map(|r| r.bounds()))
            .field("use_roi_accessor", &self.use_roi_accessor)
            .field("nodata", &self.nodata)
            .field("background", &self.background)
            .field("border_extender", &self.border_extender)
            .field("policy", &self.policy)
            .finish()
    }
}

impl ScaleSpec {
    /// Horizontal scale factor
    pub fn scale_x(&self) -> Rational {
        self.scale_x
    }

    /// Vertical scale factor
    pub fn scale_y(&self) -> Rational {
        self.scale_y
    }

    /// Horizontal translation
    pub fn trans_x(&self) -> Rational {
        self.trans_x
    }

    /// Vertical translation
    pub fn trans_y(&self) -> Rational {
        self.trans_y
    }

    /// Horizontal inverse scale, the source step per destination pixel
    pub fn inv_scale_x(&self) -> Rational {
        self.inv_scale_x
    }

    /// Vertical inverse scale, the source step per destination pixel
    pub fn inv_scale_y(&self) -> Rational {
        self.inv_scale_y
    }

    /// Interpolation method
    pub fn interpolation(&self) -> &Interpolation {
        &self.interpolation
    }

    /// Region of interest
    pub fn roi(&self) -> Option<&Arc<dyn Roi>> {
        self.roi.as_ref()
    }

    /// Whether ROI tests go through a rasterized mask
    pub fn use_roi_accessor(&self) -> bool {
        self.use_roi_accessor
    }

    /// No-data range
    pub fn nodata(&self) -> Option<&NoDataRange> {
        self.nodata.as_ref()
    }

    /// Background values as configured
    pub fn background(&self) -> &[f64] {
        &self.background
    }

    /// Border extender
    pub fn border_extender(&self) -> Option<&BorderExtender> {
        self.border_extender.as_ref()
    }

    /// Resolved per-pixel policy
    pub fn policy(&self) -> PolicyCase {
        self.policy
    }

    /// Background expanded to `bands` values
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::UnsupportedBands`] unless the background
    /// has one value or one per band.
    pub fn background_for(&self, bands: u32) -> TransformResult<Vec<f64>> {
        match self.background.len() {
            1 => Ok(vec![self.background[0]; bands as usize]),
            n if n == bands as usize => Ok(self.background.clone()),
            n => Err(TransformError::UnsupportedBands(format!(
                "{} background values for {} bands",
                n, bands
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridscale_core::{Rect, RectRoi};

    #[test]
    fn test_build_snaps_factors() {
        let spec = ScaleOptions::new(0.333333, 7.0 / 9.0)
            .translate(0.5, -2.0)
            .build()
            .unwrap();
        assert_eq!(spec.scale_x(), Rational::new(1, 3).unwrap());
        assert_eq!(spec.scale_y(), Rational::new(7, 9).unwrap());
        assert_eq!(spec.inv_scale_x(), Rational::from_integer(3));
        assert_eq!(spec.inv_scale_y(), Rational::new(9, 7).unwrap());
        assert_eq!(spec.trans_x(), Rational::HALF);
        assert_eq!(spec.trans_y(), Rational::from_integer(-2));
        assert_eq!(spec.policy(), PolicyCase::Plain);
    }

    #[test]
    fn test_build_rejects_bad_scale() {
        for s in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                ScaleOptions::new(s, 1.0).build(),
                Err(TransformError::InvalidScaleFactor(_))
            ));
        }
        // A ROI does not make a zero scale acceptable
        let roi = Arc::new(RectRoi::new(Rect::new_unchecked(0, 0, 4, 4)));
        assert!(ScaleOptions::new(1.0, 0.0).roi(roi).build().is_err());
    }

    #[test]
    fn test_build_rejects_bad_parameters() {
        assert!(ScaleOptions::new(1.0, 1.0).translate(f64::NAN, 0.0).build().is_err());
        assert!(ScaleOptions::new(1.0, 1.0).background(vec![]).build().is_err());
        let too_fine = Interpolation::Bilinear { subsample_bits: 13 };
        assert!(ScaleOptions::new(1.0, 1.0).interpolation(too_fine).build().is_err());
        let coarse = Interpolation::Bicubic {
            subsample_bits: 8,
            precision_bits: 0,
            variant: CubicVariant::First,
        };
        assert!(ScaleOptions::new(1.0, 1.0).interpolation(coarse).build().is_err());
    }

    #[test]
    fn test_policy_resolution() {
        let roi: Arc<dyn Roi> = Arc::new(RectRoi::new(Rect::new_unchecked(0, 0, 4, 4)));
        let nd = NoDataRange::single(0.0);
        let spec = ScaleOptions::new(2.0, 2.0)
            .interpolation(Interpolation::bilinear())
            .roi(roi.clone())
            .nodata(nd)
            .build()
            .unwrap();
        assert_eq!(spec.policy(), PolicyCase::RoiNoData);

        let table = Arc::new(KernelTable::bilinear(4).unwrap());
        let spec = ScaleOptions::new(2.0, 2.0)
            .interpolation(Interpolation::Generic(table))
            .roi(roi)
            .nodata(nd)
            .build()
            .unwrap();
        assert_eq!(spec.policy(), PolicyCase::Plain);
    }

    #[test]
    fn test_background_for_bands() {
        let spec = ScaleOptions::new(1.0, 1.0).background(vec![7.0]).build().unwrap();
        assert_eq!(spec.background_for(3).unwrap(), vec![7.0; 3]);
        let spec = ScaleOptions::new(1.0, 1.0)
            .background(vec![1.0, 2.0])
            .build()
            .unwrap();
        assert!(spec.background_for(3).is_err());
        assert_eq!(spec.background_for(2).unwrap(), vec![1.0, 2.0]);
    }
}
