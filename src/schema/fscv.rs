//! The canonical FSCV namespace declaration
//!
//! Declares the three record types as extensions of the base time-series
//! type: the applied excitation waveform, the raw electrochemical response,
//! and the background-subtracted response derived from it.

use crate::error::Result;
use crate::schema::namespace::Namespace;
use crate::schema::spec::{AttributeSpec, DatasetSpec, Dtype, LinkSpec, TypeSpec};

/// Namespace name shared by the artifact files and the registry.
pub const NAMESPACE_NAME: &str = "fscv";

/// Namespace version.
pub const NAMESPACE_VERSION: &str = "0.1.0";

/// Type name of the excitation waveform series.
pub const EXCITATION_SERIES: &str = "ExcitationSeries";

/// Type name of the raw response series.
pub const RESPONSE_SERIES: &str = "ResponseSeries";

/// Type name of the background-subtracted series.
pub const BACKGROUND_SUBTRACTED_SERIES: &str = "BackgroundSubtractedSeries";

/// Build the FSCV namespace from its declarations.
///
/// # Errors
///
/// Declarations are static, so this only fails if they are edited into an
/// inconsistent state (duplicate type name or shape/dims disagreement).
pub fn fscv_namespace() -> Result<Namespace> {
    let excitation = TypeSpec::new(
        EXCITATION_SERIES,
        "TimeSeries",
        "An extension of TimeSeries to store the applied FSCV excitation waveform over time.",
    )
    .with_dataset(
        DatasetSpec::new(
            "data",
            Dtype::Float64,
            &["num_timepoints"],
            "The applied ramp voltage values. A 1-D array representing the voltage over time.",
        )
        .with_attribute(AttributeSpec::fixed(
            "unit",
            "volts",
            "Unit of the data values, should be 'volts'.",
        )),
    )
    .with_attribute(AttributeSpec::required(
        "scan_frequency",
        Dtype::Float64,
        "The frequency at which the excitation waveform (e.g. triangular ramp) is applied, in hertz.",
    ))
    .with_attribute(AttributeSpec::required(
        "sweep_rate",
        Dtype::Float64,
        "The voltage sweep rate during a single scan, in volts per second.",
    ))
    .with_attribute(AttributeSpec::required(
        "waveform_shape",
        Dtype::Text,
        "The shape of the waveform, e.g., 'Triangle', 'N-shape', 'Sawhorse'.",
    ));

    let response = TypeSpec::new(
        RESPONSE_SERIES,
        "TimeSeries",
        "An extension of TimeSeries to store the raw FSCV current measurements recorded over \
         time, linked to electrodes and excitation waveform.",
    )
    .with_dataset(
        DatasetSpec::new(
            "data",
            Dtype::Float64,
            &["num_timepoints", "num_electrodes"],
            "The data values. A 2-D array where the first dimension represents time points and \
             the second dimension represents measured current from the electrodes.",
        )
        .with_attribute(AttributeSpec::fixed(
            "unit",
            "amperes",
            "Unit of the data values, should be 'amperes'.",
        )),
    )
    .with_dataset(
        DatasetSpec::new(
            "electrodes",
            Dtype::Float64,
            &["num_electrodes"],
            "A reference to the electrodes table region this data comes from.",
        )
        .optional(),
    )
    .with_attribute(AttributeSpec::optional(
        "current_to_voltage_factor",
        Dtype::Float64,
        "The factor used to multiply each data value to convert measured current to voltage.",
    ))
    .with_link(
        LinkSpec::new(
            "excitation_series",
            EXCITATION_SERIES,
            "Link to the excitation waveform applied during FSCV.",
        )
        .optional(),
    );

    let background_subtracted = TypeSpec::new(
        BACKGROUND_SUBTRACTED_SERIES,
        "TimeSeries",
        "An extension of TimeSeries to store FSCV data with background subtraction applied.",
    )
    .with_dataset(
        DatasetSpec::new(
            "data",
            Dtype::Float64,
            &["num_timepoints", "num_electrodes"],
            "The corrected data values after background subtraction. A 2-D array where the \
             first dimension represents time points and the second dimension represents \
             measured current from the electrodes.",
        )
        .with_attribute(AttributeSpec::fixed(
            "unit",
            "amperes",
            "Unit of the data values, should be 'amperes'.",
        )),
    )
    .with_link(LinkSpec::new(
        "response_series",
        RESPONSE_SERIES,
        "The link to the raw FSCV data.",
    ));

    let ns = Namespace::builder(NAMESPACE_NAME, NAMESPACE_VERSION)
        .doc(
            "Data types for Fast-Scan Cyclic Voltammetry (FSCV), a neurochemical recording \
             technique. Supports storing the applied triangular ramp waveform, measured \
             electrochemical current, and derived cyclic voltammograms used to study dopamine \
             and other neuromodulator dynamics.",
        )
        .author("Ben Dichter", "ben.dichter@catalystneuro.com")
        .author("Szonja Weigl", "szonja.weigl@catalystneuro.com")
        .add_type(response)?
        .add_type(excitation)?
        .add_type(background_subtracted)?
        .build();
    Ok(ns)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespace_declares_three_types() {
        let ns = fscv_namespace().expect("static declarations are consistent");
        assert_eq!(ns.name(), NAMESPACE_NAME);
        assert_eq!(ns.version(), NAMESPACE_VERSION);
        assert_eq!(ns.types().len(), 3);
        assert!(ns.type_spec(EXCITATION_SERIES).is_some());
        assert!(ns.type_spec(RESPONSE_SERIES).is_some());
        assert!(ns.type_spec(BACKGROUND_SUBTRACTED_SERIES).is_some());
    }

    #[test]
    fn test_units_are_schema_fixed() {
        let ns = fscv_namespace().expect("static declarations are consistent");

        let volts = ns
            .type_spec(EXCITATION_SERIES)
            .and_then(|t| t.dataset("data"))
            .and_then(|d| d.attributes.iter().find(|a| a.name == "unit"))
            .and_then(|a| a.value.as_deref());
        assert_eq!(volts, Some("volts"));

        for name in [RESPONSE_SERIES, BACKGROUND_SUBTRACTED_SERIES] {
            let amperes = ns
                .type_spec(name)
                .and_then(|t| t.dataset("data"))
                .and_then(|d| d.attributes.iter().find(|a| a.name == "unit"))
                .and_then(|a| a.value.as_deref());
            assert_eq!(amperes, Some("amperes"), "{name} unit");
        }
    }

    #[test]
    fn test_links_target_correct_types() {
        let ns = fscv_namespace().expect("static declarations are consistent");

        let response = ns.type_spec(RESPONSE_SERIES).expect("declared");
        assert_eq!(
            response.link("excitation_series").map(|l| l.target_type.as_str()),
            Some(EXCITATION_SERIES)
        );

        let background = ns.type_spec(BACKGROUND_SUBTRACTED_SERIES).expect("declared");
        assert_eq!(
            background.link("response_series").map(|l| l.target_type.as_str()),
            Some(RESPONSE_SERIES)
        );
    }

    #[test]
    fn test_response_data_is_two_dimensional() {
        let ns = fscv_namespace().expect("static declarations are consistent");
        let data = ns
            .type_spec(RESPONSE_SERIES)
            .and_then(|t| t.dataset("data"))
            .expect("declared");
        assert_eq!(data.rank(), 2);
        assert_eq!(data.dims, vec!["num_timepoints", "num_electrodes"]);
    }
}
