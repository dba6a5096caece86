//! Regression test parameters and operations

use crate::error::{TestError, TestResult};
use gridscale_core::Raster;

/// Regression test mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegTestMode {
    /// Compare computed values with expected ones (default)
    #[default]
    Compare,
    /// Run and print, without failing on mismatches
    Display,
}

impl RegTestMode {
    /// Parse mode from the `REGTEST_MODE` environment variable
    pub fn from_env() -> Self {
        match std::env::var("REGTEST_MODE")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "display" => Self::Display,
            _ => Self::Compare,
        }
    }
}

/// Regression test parameters
///
/// Tracks a named regression run: the current comparison index, the mode
/// and every recorded failure.
pub struct RegParams {
    /// Name of the test (e.g., "scale")
    pub test_name: String,
    /// Current test index (incremented before each comparison)
    index: usize,
    /// Test mode
    pub mode: RegTestMode,
    /// Overall success status
    success: bool,
    /// Recorded failures
    failures: Vec<TestError>,
}

impl RegParams {
    /// Create new regression test parameters
    ///
    /// The mode is taken from the `REGTEST_MODE` environment variable.
    pub fn new(test_name: &str) -> Self {
        let mode = RegTestMode::from_env();

        eprintln!();
        eprintln!("////////////////////////////////////////////////");
        eprintln!("////////////////   {}_reg   ///////////////", test_name);
        eprintln!("////////////////////////////////////////////////");
        eprintln!("Mode: {:?}", mode);

        Self {
            test_name: test_name.to_string(),
            index: 0,
            mode,
            success: true,
            failures: Vec::new(),
        }
    }

    /// Get the current test index
    pub fn index(&self) -> usize {
        self.index
    }

    /// Check if in display mode
    pub fn display(&self) -> bool {
        self.mode == RegTestMode::Display
    }

    fn record(&mut self, failure: TestError) {
        eprintln!("Failure in {}_reg: {}", self.test_name, failure);
        self.failures.push(failure);
        if !self.display() {
            self.success = false;
        }
    }

    /// Compare two floating-point values
    ///
    /// Returns `true` if `|expected - actual| <= delta`.
    pub fn compare_values(&mut self, expected: f64, actual: f64, delta: f64) -> bool {
        self.index += 1;
        let diff = (expected - actual).abs();

        if diff > delta || diff.is_nan() {
            self.record(TestError::ValueMismatch {
                index: self.index,
                expected,
                actual,
                delta,
            });
            false
        } else {
            true
        }
    }

    /// Compare two rasters for exact equality of geometry and samples
    ///
    /// NaN samples compare equal to each other.
    pub fn compare_rasters(&mut self, expected: &Raster, actual: &Raster) -> bool {
        self.index += 1;
        match first_difference(expected, actual) {
            Ok(None) => true,
            Ok(Some(detail)) => {
                self.record(TestError::RasterMismatch {
                    index: self.index,
                    detail,
                });
                false
            }
            Err(e) => {
                self.record(e);
                false
            }
        }
    }

    /// Clean up and report results
    ///
    /// Returns `true` if all comparisons passed.
    pub fn cleanup(self) -> bool {
        if self.success {
            eprintln!("SUCCESS: {}_reg", self.test_name);
        } else {
            eprintln!("FAILURE: {}_reg", self.test_name);
            for failure in &self.failures {
                eprintln!("  {}", failure);
            }
        }
        eprintln!();

        self.success
    }

    /// Check if all comparisons have passed so far
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Get list of failures
    pub fn failures(&self) -> &[TestError] {
        &self.failures
    }
}

/// Describe the first difference between two rasters, if any
fn first_difference(a: &Raster, b: &Raster) -> TestResult<Option<String>> {
    if a.rect() != b.rect() || a.bands() != b.bands() || a.sample_type() != b.sample_type() {
        return Ok(Some(format!(
            "geometry mismatch: {:?}x{} {:?} vs {:?}x{} {:?}",
            a.rect(),
            a.bands(),
            a.sample_type(),
            b.rect(),
            b.bands(),
            b.sample_type()
        )));
    }
    let r = a.rect();
    for y in r.y..r.bottom() {
        for x in r.x..r.right() {
            for band in 0..a.bands() {
                let va = a.get_f64(x, y, band)?;
                let vb = b.get_f64(x, y, band)?;
                if va != vb && !(va.is_nan() && vb.is_nan()) {
                    return Ok(Some(format!(
                        "sample mismatch at ({}, {}) band {}: {} vs {}",
                        x, y, band, va, vb
                    )));
                }
            }
        }
    }
    Ok(None)
}
