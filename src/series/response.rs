//! Raw FSCV response series

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::schema::RESPONSE_SERIES;
use crate::series::{ElectrodeRegion, ExcitationSeries, Link, Timing};

/// Raw FSCV current measurements recorded over time.
///
/// Data is 2-D `[num_timepoints, num_electrodes]`. When an electrode region
/// is attached, its row count must equal the second data dimension; the
/// builder rejects disagreement. The unit is fixed to amperes by the schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseSeries {
    name: String,
    description: String,
    data: Array2<f64>,
    #[serde(flatten)]
    timing: Timing,
    #[serde(skip_serializing_if = "Option::is_none")]
    electrodes: Option<ElectrodeRegion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    excitation_series: Option<Link<ExcitationSeries>>,
    // Absence means "no conversion defined", never an implicit factor of 1.0.
    #[serde(skip_serializing_if = "Option::is_none")]
    current_to_voltage_factor: Option<f64>,
}

impl ResponseSeries {
    /// Schema type name.
    pub const TYPE_NAME: &'static str = RESPONSE_SERIES;

    /// Create a builder. `name` must be unique within a container scope.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> ResponseSeriesBuilder {
        ResponseSeriesBuilder::new(name)
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

    /// The measured currents, `[num_timepoints, num_electrodes]`.
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

    /// The referenced electrode table region, if attached.
    #[must_use]
    pub const fn electrodes(&self) -> Option<&ElectrodeRegion> {
        self.electrodes.as_ref()
    }

    /// Link to the applied excitation waveform, if set.
    #[must_use]
    pub const fn excitation_series(&self) -> Option<&Link<ExcitationSeries>> {
        self.excitation_series.as_ref()
    }

    /// Factor converting measured current to voltage, if defined.
    #[must_use]
    pub const fn current_to_voltage_factor(&self) -> Option<f64> {
        self.current_to_voltage_factor
    }
}

/// Builder for [`ResponseSeries`].
#[derive(Debug)]
pub struct ResponseSeriesBuilder {
    name: String,
    description: String,
    data: Option<Array2<f64>>,
    timing: Option<Timing>,
    electrodes: Option<ElectrodeRegion>,
    excitation_series: Option<Link<ExcitationSeries>>,
    current_to_voltage_factor: Option<f64>,
}

impl ResponseSeriesBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            data: None,
            timing: None,
            electrodes: None,
            excitation_series: None,
            current_to_voltage_factor: None,
        }
    }

    /// Set the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the 2-D current data.
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

    /// Attach the electrode table region the columns come from.
    #[must_use]
    pub fn electrodes(mut self, region: ElectrodeRegion) -> Self {
        self.electrodes = Some(region);
        self
    }

    /// Link the excitation waveform applied during recording.
    #[must_use]
    pub fn excitation_series(mut self, link: Link<ExcitationSeries>) -> Self {
        self.excitation_series = Some(link);
        self
    }

    /// Set the current-to-voltage conversion factor.
    #[must_use]
    pub fn current_to_voltage_factor(mut self, factor: f64) -> Self {
        self.current_to_voltage_factor = Some(factor);
        self
    }

    /// Validate and build the series.
    ///
    /// # Errors
    ///
    /// [`Error::MissingRequiredField`] when data or timing were not supplied;
    /// [`Error::InvalidTiming`] for an invalid timing scheme;
    /// [`Error::ShapeMismatch`] when an attached electrode region's row count
    /// differs from the second data dimension.
    pub fn build(self) -> Result<ResponseSeries> {
        let data = self.data.ok_or_else(|| missing("data"))?;
        let timing = self.timing.ok_or_else(|| missing("rate"))?;

        timing.validate(&self.name)?;

        if let Some(region) = &self.electrodes {
            if region.len() != data.ncols() {
                return Err(Error::ShapeMismatch {
                    name: self.name,
                    columns: data.ncols(),
                    referenced: region.len(),
                });
            }
        }

        Ok(ResponseSeries {
            name: self.name,
            description: self.description,
            data,
            timing,
            electrodes: self.electrodes,
            excitation_series: self.excitation_series,
            current_to_voltage_factor: self.current_to_voltage_factor,
        })
    }
}

fn missing(field: &str) -> Error {
    Error::MissingRequiredField {
        type_name: ResponseSeries::TYPE_NAME.to_string(),
        field: field.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    #[test]
    fn test_build_with_matching_region() {
        let region = ElectrodeRegion::new(vec![0, 1, 2, 3], "FSCV electrodes");
        let series = ResponseSeries::builder("resp")
            .data(Array2::zeros((100, 4)))
            .rate(25_000.0)
            .electrodes(region)
            .current_to_voltage_factor(0.5)
            .build()
            .expect("valid parameters");

        assert_eq!(series.unit(), "amperes");
        assert_eq!(series.num_timepoints(), 100);
        assert_eq!(series.num_electrodes(), 4);
        assert_eq!(series.current_to_voltage_factor(), Some(0.5));
    }

    #[test]
    fn test_region_count_mismatch_rejected() {
        let region = ElectrodeRegion::new(vec![0, 1, 2, 3], "FSCV electrodes");
        let err = ResponseSeries::builder("resp")
            .data(Array2::zeros((100, 3)))
            .rate(25_000.0)
            .electrodes(region)
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { columns: 3, referenced: 4, .. }));
    }

    #[test]
    fn test_factor_absent_means_no_conversion() {
        let series = ResponseSeries::builder("resp")
            .data(Array2::zeros((10, 2)))
            .rate(2140.0)
            .build()
            .expect("valid parameters");
        assert_eq!(series.current_to_voltage_factor(), None);
    }

    #[test]
    fn test_missing_data_rejected() {
        let err = ResponseSeries::builder("resp").rate(2140.0).build().unwrap_err();
        assert!(matches!(err, Error::MissingRequiredField { field, .. } if field == "data"));
    }
}
