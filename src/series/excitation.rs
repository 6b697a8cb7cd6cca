//! Excitation waveform series

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::schema::EXCITATION_SERIES;
use crate::series::Timing;

/// The applied FSCV excitation waveform over time.
///
/// Data is a 1-D voltage trace `[num_timepoints]`. The unit is fixed to
/// volts by the schema and is not a constructor parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExcitationSeries {
    name: String,
    description: String,
    data: Array1<f64>,
    #[serde(flatten)]
    timing: Timing,
    scan_frequency: f64,
    sweep_rate: f64,
    waveform_shape: String,
}

impl ExcitationSeries {
    /// Schema type name.
    pub const TYPE_NAME: &'static str = EXCITATION_SERIES;

    /// Create a builder. `name` must be unique within a container scope.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> ExcitationSeriesBuilder {
        ExcitationSeriesBuilder::new(name)
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

    /// The applied ramp voltage values.
    #[must_use]
    pub fn data(&self) -> &Array1<f64> {
        &self.data
    }

    /// Number of timepoints.
    #[must_use]
    pub fn num_timepoints(&self) -> usize {
        self.data.len()
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
        "volts"
    }

    /// Frequency at which the waveform is applied, in hertz.
    #[must_use]
    pub const fn scan_frequency(&self) -> f64 {
        self.scan_frequency
    }

    /// Voltage sweep rate within a scan, in volts per second.
    #[must_use]
    pub const fn sweep_rate(&self) -> f64 {
        self.sweep_rate
    }

    /// Waveform shape, e.g. "Triangle", "N-shape", "Sawhorse".
    #[must_use]
    pub fn waveform_shape(&self) -> &str {
        &self.waveform_shape
    }
}

/// Builder for [`ExcitationSeries`].
#[derive(Debug)]
pub struct ExcitationSeriesBuilder {
    name: String,
    description: String,
    data: Option<Array1<f64>>,
    timing: Option<Timing>,
    scan_frequency: Option<f64>,
    sweep_rate: Option<f64>,
    waveform_shape: Option<String>,
}

impl ExcitationSeriesBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            data: None,
            timing: None,
            scan_frequency: None,
            sweep_rate: None,
            waveform_shape: None,
        }
    }

    /// Set the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the 1-D voltage trace.
    #[must_use]
    pub fn data(mut self, data: Array1<f64>) -> Self {
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

    /// Set the scan frequency in hertz.
    #[must_use]
    pub fn scan_frequency(mut self, scan_frequency: f64) -> Self {
        self.scan_frequency = Some(scan_frequency);
        self
    }

    /// Set the sweep rate in volts per second.
    #[must_use]
    pub fn sweep_rate(mut self, sweep_rate: f64) -> Self {
        self.sweep_rate = Some(sweep_rate);
        self
    }

    /// Set the waveform shape.
    #[must_use]
    pub fn waveform_shape(mut self, waveform_shape: impl Into<String>) -> Self {
        self.waveform_shape = Some(waveform_shape.into());
        self
    }

    /// Validate and build the series.
    ///
    /// # Errors
    ///
    /// [`Error::MissingRequiredField`] when data, timing, or any of the three
    /// required waveform attributes were not supplied;
    /// [`Error::InvalidTiming`] when the timing scheme is invalid.
    pub fn build(self) -> Result<ExcitationSeries> {
        let data = self.data.ok_or_else(|| missing("data"))?;
        let timing = self.timing.ok_or_else(|| missing("rate"))?;
        let scan_frequency = self.scan_frequency.ok_or_else(|| missing("scan_frequency"))?;
        let sweep_rate = self.sweep_rate.ok_or_else(|| missing("sweep_rate"))?;
        let waveform_shape = self.waveform_shape.ok_or_else(|| missing("waveform_shape"))?;

        timing.validate(&self.name)?;

        Ok(ExcitationSeries {
            name: self.name,
            description: self.description,
            data,
            timing,
            scan_frequency,
            sweep_rate,
            waveform_shape,
        })
    }
}

fn missing(field: &str) -> Error {
    Error::MissingRequiredField {
        type_name: ExcitationSeries::TYPE_NAME.to_string(),
        field: field.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array1;

    fn triangle_ramp(n: usize) -> Array1<f64> {
        Array1::linspace(-1.0, 1.0, n)
    }

    #[test]
    fn test_build_sets_all_attributes() {
        let series = ExcitationSeries::builder("exc")
            .description("triangular ramp")
            .data(triangle_ramp(100))
            .rate(2140.0)
            .scan_frequency(10.0)
            .sweep_rate(400.0)
            .waveform_shape("Triangle")
            .build()
            .expect("valid parameters");

        assert_eq!(series.name(), "exc");
        assert_eq!(series.unit(), "volts");
        assert_eq!(series.num_timepoints(), 100);
        assert_eq!(series.rate(), Some(2140.0));
        assert_eq!(series.scan_frequency(), 10.0);
        assert_eq!(series.sweep_rate(), 400.0);
        assert_eq!(series.waveform_shape(), "Triangle");
    }

    #[test]
    fn test_missing_waveform_shape_rejected() {
        let err = ExcitationSeries::builder("exc")
            .data(triangle_ramp(10))
            .rate(2140.0)
            .scan_frequency(10.0)
            .sweep_rate(400.0)
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::MissingRequiredField { field, .. } if field == "waveform_shape"));
    }

    #[test]
    fn test_negative_rate_rejected() {
        let err = ExcitationSeries::builder("exc")
            .data(triangle_ramp(10))
            .rate(-5.0)
            .scan_frequency(10.0)
            .sweep_rate(400.0)
            .waveform_shape("Triangle")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidTiming { .. }));
    }
}
