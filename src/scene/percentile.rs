use super::region::{PixelWindow, RegionOfInterest};
use crate::error::{Error, Result};
use crate::products::constants::DEFAULT_MAX_SAMPLES;
use crate::raster::{Grid, Raster};
use ndarray::s;
use rayon::slice::ParallelSliceMut;
use serde::Deserialize;
use tracing::{debug, warn};

/// A scale-derived stride never leaves fewer than this many samples along
/// either axis of the window.
const MIN_SAMPLES_PER_AXIS: usize = 10;

/// Sampling used to bound the cost of a percentile on large scenes.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SamplingParams {
    /// Sample spacing in the raster's own map units (degrees for geographic
    /// grids). `None` reads every pixel the sample cap allows.
    pub scale: Option<f64>,
    /// Upper bound on the samples entering one percentile.
    pub max_samples: u64,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            scale: None,
            max_samples: DEFAULT_MAX_SAMPLES,
        }
    }
}

impl SamplingParams {
    pub fn validate(&self) -> std::result::Result<(), String> {
        if let Some(scale) = self.scale
            && !(scale.is_finite() && scale > 0.0)
        {
            return Err(format!("sampling scale must be positive, got {}", scale));
        }
        if self.max_samples == 0 {
            return Err("max_samples must be at least 1".to_string());
        }
        Ok(())
    }

    /// Pixel step over `window`: at least what the sample cap requires, and
    /// coarser when `scale` asks for it, within `MIN_SAMPLES_PER_AXIS`.
    fn stride(&self, raster: &Raster, window: &PixelWindow) -> usize {
        let pixels = (window.rows * window.cols) as f64;
        let cap = self.max_samples as f64;
        let cap_stride = if pixels > cap {
            (pixels / cap).sqrt().ceil() as usize
        } else {
            1
        };

        let scale_stride = match (self.scale, raster.transform()) {
            (Some(scale), Some(gt)) if gt.cell_size() > 0.0 => {
                let wanted = (scale / gt.cell_size()).floor() as usize;
                let widest = (window.rows.min(window.cols) / MIN_SAMPLES_PER_AXIS).max(1);
                if wanted > widest {
                    warn!(
                        "Sampling scale {} spans {} pixels, limiting stride to {}",
                        scale, wanted, widest
                    );
                }
                wanted.clamp(1, widest)
            }
            _ => 1,
        };

        cap_stride.max(scale_stride)
    }
}

/// `p`-th percentile (0–100) of the valid samples of `raster` inside `region`.
///
/// Uses linear interpolation between the closest ranks. Returns `NaN` when
/// the region holds no valid sample.
pub fn percentile(
    raster: &Raster,
    p: f64,
    region: &RegionOfInterest,
    sampling: &SamplingParams,
) -> Result<f64> {
    if !(0.0..=100.0).contains(&p) {
        return Err(Error::InvalidParameter {
            name: "percentile",
            value: p.to_string(),
            reason: "must be within [0, 100]".to_string(),
        });
    }

    let window = region.resolve(raster)?;
    if window.is_empty() {
        warn!("Region of interest does not overlap the raster, percentile is no-data");
        return Ok(f64::NAN);
    }

    // Samples sit at the centre of each stride block so no single corner
    // cell decides the sample set.
    let stride = sampling.stride(raster, &window);
    let row_offset = ((stride - 1) / 2).min(window.rows - 1);
    let col_offset = ((stride - 1) / 2).min(window.cols - 1);
    let view = raster.data().slice(s![
        window.row + row_offset..window.row + window.rows;stride,
        window.col + col_offset..window.col + window.cols;stride
    ]);

    let mut samples: Vec<f64> = view.iter().copied().filter(|v| !v.is_nan()).collect();

    let cap = usize::try_from(sampling.max_samples).unwrap_or(usize::MAX);
    if samples.len() > cap {
        let step = samples.len().div_ceil(cap);
        samples = samples.into_iter().step_by(step).collect();
    }

    if samples.is_empty() {
        warn!("No valid samples in region of interest, percentile is no-data");
        return Ok(f64::NAN);
    }

    debug!(
        "Percentile {} over {} samples (stride {})",
        p,
        samples.len(),
        stride
    );

    samples.par_sort_unstable_by(f64::total_cmp);
    Ok(percentile_of_sorted(&samples, p))
}

/// Linear-interpolation percentile of an ascending, non-empty slice.
pub fn percentile_of_sorted(sorted: &[f64], p: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        n => {
            let rank = p / 100.0 * (n - 1) as f64;
            let lo = rank.floor() as usize;
            let hi = rank.ceil() as usize;
            let frac = rank - lo as f64;
            sorted[lo] + frac * (sorted[hi] - sorted[lo])
        }
    }
}
