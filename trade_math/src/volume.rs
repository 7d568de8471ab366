//! Volume indicator implementations
//!
//! Contains implementations of:
//! - Volume Moving Average
//! - Volume ratio (current volume over its moving average)

use crate::moving_averages::SimpleMovingAverage;
use crate::{MathError, Result, Series};

/// Volume Moving Average (VMA) implementation
#[derive(Debug, Clone)]
pub struct VolumeMovingAverage {
    average: SimpleMovingAverage,
}

impl VolumeMovingAverage {
    /// Create a new Volume Moving Average with the specified period
    pub fn new(period: usize) -> Result<Self> {
        Ok(Self {
            average: SimpleMovingAverage::new(period)?,
        })
    }

    /// Update the VMA with a new volume value
    pub fn update(&mut self, volume: f64) -> Result<()> {
        if volume < 0.0 {
            return Err(MathError::InvalidInput(
                "Volume cannot be negative".to_string(),
            ));
        }

        self.average.update(volume);
        Ok(())
    }

    /// Get the current VMA value
    pub fn value(&self) -> Option<f64> {
        self.average.value()
    }

    /// Get the current period
    pub fn period(&self) -> usize {
        self.average.period()
    }

    /// Reset the VMA, clearing all values
    pub fn reset(&mut self) {
        self.average.reset();
    }
}

/// Volume moving average and the ratio of each volume to it
#[derive(Debug, Clone, PartialEq)]
pub struct VolumeProfile {
    pub average: Series,
    pub ratio: Series,
}

/// Rolling volume average and volume ratio over a volume series
pub fn volume_ratio(volumes: &[f64], period: usize) -> Result<VolumeProfile> {
    let mut indicator = VolumeMovingAverage::new(period)?;
    let mut profile = VolumeProfile {
        average: Vec::with_capacity(volumes.len()),
        ratio: Vec::with_capacity(volumes.len()),
    };

    for &volume in volumes {
        indicator.update(volume)?;
        let average = indicator.value();
        profile.average.push(average);
        profile.ratio.push(average.map(|avg| volume / avg));
    }

    Ok(profile)
}
