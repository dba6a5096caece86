//! gridscale-test - Regression test framework for gridscale
//!
//! Provides a small regression harness and deterministic raster generators
//! for the integration tests of the workspace crates.
//!
//! - **Compare**: mismatches fail the run (default)
//! - **Display**: mismatches are printed but the run still succeeds
//!
//! # Usage
//!
//! ```ignore
//! use gridscale_test::RegParams;
//!
//! let mut rp = RegParams::new("scale");
//! rp.compare_values(4.0, out.width() as f64, 0.0);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_MODE`: Set to "compare" or "display"

mod error;
mod params;
pub mod patterns;

pub use error::{TestError, TestResult};
pub use params::{RegParams, RegTestMode};
