//! Adaptive histogram for density charts
//!
//! Values that are all integral get one bin per integer between the minimum
//! and maximum. Anything else gets [`FLOAT_BIN_COUNT`] equal-width bins over
//! `[min, max]`, with the maximum itself counted in the last bin.

use super::errors::{AnalyticsError, AnalyticsResult};
use super::request::LabeledCount;

/// Bin count used for non-integral values
pub const FLOAT_BIN_COUNT: usize = 50;

/// Upper bound on integral-mode bins
pub const MAX_INTEGRAL_BINS: usize = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinMode {
    Integral,
    Float,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub mode: BinMode,
    pub min: f64,
    pub width: f64,
    pub counts: Vec<u64>,
}

impl Histogram {
    /// Bin `values`; `None` when there is nothing to bin
    pub fn build(values: &[f64]) -> AnalyticsResult<Option<Self>> {
        let Some(&first) = values.first() else {
            return Ok(None);
        };

        let mut min = first;
        let mut max = first;
        let mut integral = true;
        for &value in values {
            if !value.is_finite() {
                return Err(AnalyticsError::NonFiniteValue { value });
            }
            min = min.min(value);
            max = max.max(value);
            integral &= value.fract() == 0.0;
        }

        let (mode, width, bins) = if integral {
            let span = max - min + 1.0;
            if !(span >= 1.0 && span <= MAX_INTEGRAL_BINS as f64) {
                return Err(AnalyticsError::InvalidBinCount { min, max });
            }
            (BinMode::Integral, 1.0, span as usize)
        } else {
            let width = (max - min) / FLOAT_BIN_COUNT as f64;
            if !(width > 0.0 && width.is_finite()) {
                return Err(AnalyticsError::InvalidBinWidth { min, max, width });
            }
            (BinMode::Float, width, FLOAT_BIN_COUNT)
        };

        let mut counts = vec![0u64; bins];
        for &value in values {
            let raw = ((value - min) / width).floor() as i64;
            // only the maximum (or rounding right below it) lands on `bins`
            let index = if raw == bins as i64 { raw - 1 } else { raw };
            if index < 0 || index >= bins as i64 {
                return Err(AnalyticsError::InvalidBinIndex {
                    index: raw,
                    value,
                    bins,
                });
            }
            counts[index as usize] += 1;
        }

        Ok(Some(Self {
            mode,
            min,
            width,
            counts,
        }))
    }

    /// Representative point of bin `i`
    pub fn label(&self, i: usize) -> String {
        match self.mode {
            BinMode::Integral => format!("{}", self.min as i64 + i as i64),
            BinMode::Float => {
                let start = self.min + i as f64 * self.width;
                format!("{:.2}", start + self.width / 2.0)
            }
        }
    }

    pub fn into_series(self) -> Vec<LabeledCount> {
        (0..self.counts.len())
            .map(|i| LabeledCount::new(self.label(i), self.counts[i]))
            .collect()
    }
}

/// Density series for `values`; empty input yields an empty series
pub fn density_series(values: &[f64]) -> AnalyticsResult<Vec<LabeledCount>> {
    Ok(Histogram::build(values)?
        .map(Histogram::into_series)
        .unwrap_or_default())
}
