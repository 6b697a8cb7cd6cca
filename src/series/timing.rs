//! Timing schemes for time-series records
//!
//! A series is timed either by a fixed sampling rate or by an explicit
//! timestamp array. The enum makes the two schemes structurally exclusive;
//! supplying both is unrepresentable.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// How samples of a series are placed in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Timing {
    /// Fixed sampling frequency in hertz
    Rate(f64),
    /// Explicit per-sample timestamps in seconds, strictly increasing
    Timestamps(Vec<f64>),
}

impl Timing {
    /// Get the sampling rate, if this series is rate-timed.
    #[must_use]
    pub const fn rate(&self) -> Option<f64> {
        match self {
            Self::Rate(rate) => Some(*rate),
            Self::Timestamps(_) => None,
        }
    }

    /// Get the timestamp array, if this series is timestamp-timed.
    #[must_use]
    pub fn timestamps(&self) -> Option<&[f64]> {
        match self {
            Self::Rate(_) => None,
            Self::Timestamps(ts) => Some(ts),
        }
    }

    /// Check the base timing invariant.
    ///
    /// `name` is the owning instance's name, used for error reporting.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTiming`] for a negative or non-finite rate,
    /// an empty timestamp array, or timestamps that are not strictly
    /// increasing.
    pub fn validate(&self, name: &str) -> Result<()> {
        match self {
            Self::Rate(rate) => {
                if !rate.is_finite() || *rate < 0.0 {
                    return Err(Error::InvalidTiming {
                        name: name.to_string(),
                        reason: format!("sampling rate {rate} must be finite and non-negative"),
                    });
                }
            }
            Self::Timestamps(ts) => {
                if ts.is_empty() {
                    return Err(Error::InvalidTiming {
                        name: name.to_string(),
                        reason: "timestamp array is empty".to_string(),
                    });
                }
                if ts.windows(2).any(|w| w[1] <= w[0]) {
                    return Err(Error::InvalidTiming {
                        name: name.to_string(),
                        reason: "timestamps must be strictly increasing".to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}
