//! Mock instance generators
//!
//! Self-consistent sample instances satisfying every data-model invariant by
//! construction, used to exercise linkage validation and round-trip
//! serialization. Each generator attaches the instance to the supplied
//! container (wiring electrode rows and links as needed) and returns a clone
//! for direct assertions.

use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{TimeZone, Utc};
use ndarray::{Array1, Array2};
use rand::Rng;

use crate::container::Container;
use crate::error::Result;
use crate::series::{
    BackgroundSubtractedSeries, Electrode, ExcitationSeries, Link, ResponseSeries,
};

static NAME_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Generate a unique instance name with the given prefix.
#[must_use]
pub fn name_generator(prefix: &str) -> String {
    let n = NAME_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}{n}")
}

/// An empty container with a fixed session start time.
#[must_use]
pub fn mock_container() -> Container {
    let start = Utc
        .with_ymd_and_hms(2000, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_default();
    Container::new("A mock session for testing.", start)
}

/// Attach `n` electrode rows to the container's table, returning their indices.
pub fn mock_electrode_rows(container: &mut Container, n: usize) -> Vec<usize> {
    (0..n)
        .map(|i| container.electrodes_mut().add(Electrode::new(format!("site{i}"), "shank0")))
        .collect()
}

/// A 100-sample triangular ramp excitation series: scan frequency 10 Hz,
/// sweep rate 400 V/s, sampled at 2140 Hz. Attached to the stimulus area.
///
/// # Errors
///
/// Fails only if the generated name collides with an existing stimulus.
pub fn mock_excitation_series(container: &mut Container) -> Result<ExcitationSeries> {
    let series = ExcitationSeries::builder(name_generator("fscv_excitation_series"))
        .description("A mock FSCV excitation series to be used for testing.")
        .data(Array1::linspace(-1.0, 1.0, 100))
        .rate(2140.0)
        .scan_frequency(10.0)
        .sweep_rate(400.0)
        .waveform_shape("Triangle")
        .build()?;
    container.add_stimulus(series.clone())?;
    Ok(series)
}

/// A response series with random currents over `electrodes` columns and
/// `samples` timepoints, wired to fresh electrode table rows and to a mock
/// excitation series, with a current-to-voltage factor of 0.5. Attached to
/// the acquisition area.
///
/// # Errors
///
/// Fails if construction or attachment violates an invariant; generated
/// parameters are consistent, so this indicates a bug in the caller's
/// container state.
pub fn mock_response_series(
    container: &mut Container,
    electrodes: usize,
    samples: usize,
    rate: f64,
) -> Result<ResponseSeries> {
    let rows = mock_electrode_rows(container, electrodes);
    let region = container.electrodes().region(rows, "FSCV electrodes");
    let excitation = mock_excitation_series(container)?;

    let mut rng = rand::thread_rng();
    let data = Array2::from_shape_simple_fn((samples, electrodes), || rng.gen::<f64>());

    let series = ResponseSeries::builder(name_generator("fscv_response_series"))
        .description("A mock FSCV response series to be used for testing.")
        .data(data)
        .rate(rate)
        .electrodes(region)
        .excitation_series(Link::to(excitation.name()))
        .current_to_voltage_factor(0.5)
        .build()?;
    container.add_response(series.clone())?;
    Ok(series)
}

/// A background-subtracted series derived from a fresh mock response series
/// with the same column count. Attached to the acquisition area.
///
/// # Errors
///
/// Fails if construction or attachment violates an invariant.
pub fn mock_background_subtracted_series(
    container: &mut Container,
    electrodes: usize,
) -> Result<BackgroundSubtractedSeries> {
    let response = mock_response_series(container, electrodes, 100, 2140.0)?;
    mock_background_subtracted_from(container, &response)
}

/// A background-subtracted series linked to an existing response series.
///
/// # Errors
///
/// Fails if the response is not attached to this container.
pub fn mock_background_subtracted_from(
    container: &mut Container,
    response: &ResponseSeries,
) -> Result<BackgroundSubtractedSeries> {
    let mut rng = rand::thread_rng();
    let data = Array2::from_shape_simple_fn((100, response.num_electrodes()), || rng.gen::<f64>());

    let series = BackgroundSubtractedSeries::builder(name_generator("fscv_background_subtracted_series"))
        .description("A mock FSCV background-subtracted series to be used for testing.")
        .data(data)
        .rate(2140.0)
        .response_series(Link::to(response.name()))
        .build()?;
    container.add_background(series.clone())?;
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_unique() {
        let a = name_generator("fscv_excitation_series");
        let b = name_generator("fscv_excitation_series");
        assert_ne!(a, b);
    }

    #[test]
    fn test_mocks_satisfy_invariants() {
        let mut container = mock_container();
        let response = mock_response_series(&mut container, 4, 100, 2140.0).expect("consistent mock");
        mock_background_subtracted_from(&mut container, &response).expect("consistent mock");
        container.validate().expect("mock graph is fully wired");
    }

    #[test]
    fn test_mock_response_wires_electrodes_and_link() {
        let mut container = mock_container();
        let response = mock_response_series(&mut container, 4, 100, 2140.0).expect("consistent mock");

        assert_eq!(response.num_electrodes(), 4);
        assert_eq!(response.electrodes().map(crate::series::ElectrodeRegion::len), Some(4));
        let excitation = container
            .excitation_of(&response)
            .expect("link resolves")
            .expect("link set");
        assert_eq!(excitation.unit(), "volts");
    }
}
