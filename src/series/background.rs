//! Background-subtracted FSCV series

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::schema::BACKGROUND_SUBTRACTED_SERIES;
use crate::series::{Link, ResponseSeries, Timing};

/// FSCV data with background subtraction applied.
///
/// A strict consumer of a [`ResponseSeries`]: the `response_series` link is
/// required and points at the raw data this series was derived from, never
/// the inverse. Column count must agree with the linked response, which is
/// checked when both live in a container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackgroundSubtractedSeries {
    name: String,
    description: String,
    data: Array2<f64>,
    #[serde(flatten)]
    timing: Timing,
    response_series: Link<ResponseSeries>,
}

impl BackgroundSubtractedSeries {
    /// Schema type name.
    pub const TYPE_NAME: &'static str = BACKGROUND_SUBTRACTED_SERIES;

    /// Create a builder. `name` must be unique within a container scope.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> BackgroundSubtractedSeriesBuilder {
        BackgroundSubtractedSeriesBuilder::new(name)
    }

    /// Instance name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Free-text description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The corrected currents, `[num_timepoints, num_electrodes]`.
    #[must_use]
    pub fn data(&self) -> &Array2<f64> {
        &self.data
    }

    /// Number of timepoints (first data dimension).
    #[must_use]
    pub fn num_timepoints(&self) -> usize {
        self.data.nrows()
    }

    /// Number of electrode columns (second data dimension).
    #[must_use]
    pub fn num_electrodes(&self) -> usize {
        self.data.ncols()
    }

    /// Timing scheme.
    #[must_use]
    pub const fn timing(&self) -> &Timing {
        &self.timing
    }

    /// Sampling rate in hertz, if rate-timed.
    #[must_use]
    pub const fn rate(&self) -> Option<f64> {
        self.timing.rate()
    }

    /// Schema-fixed unit of the data values.
    #[must_use]
    pub const fn unit(&self) -> &'static str {
        "amperes"
    }

    /// Link to the raw response series this data was derived from.
    #[must_use]
    pub const fn response_series(&self) -> &Link<ResponseSeries> {
        &self.response_series
    }
}

/// Builder for [`BackgroundSubtractedSeries`].
#[derive(Debug)]
pub struct BackgroundSubtractedSeriesBuilder {
    name: String,
    description: String,
    data: Option<Array2<f64>>,
    timing: Option<Timing>,
    response_series: Option<Link<ResponseSeries>>,
}

impl BackgroundSubtractedSeriesBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            data: None,
            timing: None,
            response_series: None,
        }
    }

    /// Set the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the 2-D corrected data.
    #[must_use]
    pub fn data(mut self, data: Array2<f64>) -> Self {
        self.data = Some(data);
        self
    }

    /// Time the series by a fixed sampling rate in hertz.
    #[must_use]
    pub fn rate(mut self, rate: f64) -> Self {
        self.timing = Some(Timing::Rate(rate));
        self
    }

    /// Time the series by explicit per-sample timestamps.
    #[must_use]
    pub fn timestamps(mut self, timestamps: Vec<f64>) -> Self {
        self.timing = Some(Timing::Timestamps(timestamps));
        self
    }

    /// Link the raw response series this data derives from.
    #[must_use]
    pub fn response_series(mut self, link: Link<ResponseSeries>) -> Self {
        self.response_series = Some(link);
        self
    }

    /// Validate and build the series.
    ///
    /// # Errors
    ///
    /// [`Error::MissingRequiredField`] when data, timing, or the required
    /// `response_series` link were not supplied; [`Error::InvalidTiming`] for
    /// an invalid timing scheme.
    pub fn build(self) -> Result<BackgroundSubtractedSeries> {
        let data = self.data.ok_or_else(|| missing("data"))?;
        let timing = self.timing.ok_or_else(|| missing("rate"))?;
        let response_series = self.response_series.ok_or_else(|| missing("response_series"))?;

        timing.validate(&self.name)?;

        Ok(BackgroundSubtractedSeries {
            name: self.name,
            description: self.description,
            data,
            timing,
            response_series,
        })
    }
}

fn missing(field: &str) -> Error {
    Error::MissingRequiredField {
        type_name: BackgroundSubtractedSeries::TYPE_NAME.to_string(),
        field: field.to_string(),
    }
}
