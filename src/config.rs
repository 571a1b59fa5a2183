//! Configuration types for PDF comparison.
//!
//! All comparison behaviour is controlled through [`CompareConfig`], built
//! via its [`CompareConfigBuilder`]. The config is constructed once (from CLI
//! flags or by a library caller) and then only ever borrowed: the aligner,
//! the differ and both comparators read from the same instance, so two
//! comparisons with different tolerances can run side by side in one process.

use crate::error::PdfDiffError;
use crate::progress::ProgressCallback;
use std::fmt;

/// Lowest accepted rasterisation resolution.
pub const MIN_DPI: u32 = 1;

/// Highest accepted rasterisation resolution.
pub const MAX_DPI: u32 = 2400;

/// Default rasterisation resolution.
pub const DEFAULT_DPI: u32 = 300;

/// Number of pixels painted blue at the left edge of a differing row.
pub const MARK_WIDTH: u32 = 10;

/// Configuration for a document comparison.
///
/// Built via [`CompareConfig::builder()`] or using
/// [`CompareConfig::default()`].
///
/// # Example
/// ```rust
/// use edgequake_pdfdiff::CompareConfig;
///
/// let config = CompareConfig::builder()
///     .dpi(150)
///     .channel_tolerance(8)
///     .mark_differences(true)
///     .build()
///     .unwrap();
/// assert_eq!(config.dpi, 150);
/// ```
#[derive(Clone)]
pub struct CompareConfig {
    /// Rasterisation DPI for every page of both documents. Range: 1–2400. Default: 300.
    ///
    /// Memory per page grows with the square of this value; a US Letter page
    /// at 300 DPI is roughly 2550 × 3300 pixels (about 34 MB of pixels).
    pub dpi: u32,

    /// Per-channel tolerance. Two pixels are equal when every R/G/B channel
    /// differs by at most this amount. Default: 0 (exact match).
    pub channel_tolerance: u8,

    /// Render unchanged regions as neutral gray and differences in color. Default: false.
    pub grayscale: bool,

    /// Paint a blue bar at the left edge of every row containing a difference. Default: false.
    pub mark_differences: bool,

    /// Leave pages without differences out of the diff PDF. Default: false.
    pub skip_identical: bool,

    /// Report every differing page. Forces a full scan of both documents. Default: false.
    pub verbose: bool,

    /// Optional progress callback invoked as pages are compared.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            dpi: DEFAULT_DPI,
            channel_tolerance: 0,
            grayscale: false,
            mark_differences: false,
            skip_identical: false,
            verbose: false,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for CompareConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompareConfig")
            .field("dpi", &self.dpi)
            .field("channel_tolerance", &self.channel_tolerance)
            .field("grayscale", &self.grayscale)
            .field("mark_differences", &self.mark_differences)
            .field("skip_identical", &self.skip_identical)
            .field("verbose", &self.verbose)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn ComparisonProgressCallback>"),
            )
            .finish()
    }
}

impl CompareConfig {
    /// Create a new builder for `CompareConfig`.
    pub fn builder() -> CompareConfigBuilder {
        CompareConfigBuilder {
            config: Self::default(),
        }
    }

    /// Scale factor that maps raster pixels back to PDF points (1/72 inch).
    pub fn points_per_pixel(&self) -> f32 {
        72.0 / self.dpi as f32
    }
}

/// Builder for [`CompareConfig`].
pub struct CompareConfigBuilder {
    config: CompareConfig,
}

impl fmt::Debug for CompareConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CompareConfigBuilder")
            .field(&self.config)
            .finish()
    }
}

impl CompareConfigBuilder {
    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi;
        self
    }

    pub fn channel_tolerance(mut self, tolerance: u8) -> Self {
        self.config.channel_tolerance = tolerance;
        self
    }

    pub fn grayscale(mut self, v: bool) -> Self {
        self.config.grayscale = v;
        self
    }

    pub fn mark_differences(mut self, v: bool) -> Self {
        self.config.mark_differences = v;
        self
    }

    pub fn skip_identical(mut self, v: bool) -> Self {
        self.config.skip_identical = v;
        self
    }

    pub fn verbose(mut self, v: bool) -> Self {
        self.config.verbose = v;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<CompareConfig, PdfDiffError> {
        let c = &self.config;
        if !(MIN_DPI..=MAX_DPI).contains(&c.dpi) {
            return Err(PdfDiffError::InvalidConfig(format!(
                "Invalid dpi: {}. Valid range is {MIN_DPI}-{MAX_DPI}",
                c.dpi
            )));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NoopProgressCallback;
    use std::sync::Arc;

    #[test]
    fn defaults_match_cli_defaults() {
        let c = CompareConfig::default();
        assert_eq!(c.dpi, 300);
        assert_eq!(c.channel_tolerance, 0);
        assert!(!c.grayscale && !c.mark_differences && !c.skip_identical && !c.verbose);
    }

    #[test]
    fn dpi_bounds_are_inclusive() {
        assert!(CompareConfig::builder().dpi(1).build().is_ok());
        assert!(CompareConfig::builder().dpi(2400).build().is_ok());
    }

    #[test]
    fn dpi_out_of_range_is_rejected() {
        for dpi in [0, 2401, 10_000] {
            let err = CompareConfig::builder().dpi(dpi).build().unwrap_err();
            assert_eq!(err.exit_code(), 2);
            assert!(err.to_string().contains("Invalid dpi"), "got: {err}");
        }
    }

    #[test]
    fn points_per_pixel_inverts_dpi() {
        let c = CompareConfig::builder().dpi(144).build().unwrap();
        assert!((c.points_per_pixel() - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn debug_hides_callback_internals() {
        let c = CompareConfig::builder()
            .progress_callback(Arc::new(NoopProgressCallback))
            .build()
            .unwrap();
        let dbg = format!("{c:?}");
        assert!(dbg.contains("<dyn ComparisonProgressCallback>"));
    }
}
