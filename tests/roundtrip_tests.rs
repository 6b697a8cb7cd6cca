//! Round-trip serialization tests
//!
//! Writes a fully wired container to disk, reads it back, and checks that
//! every attribute, payload, and link compares equal, with links resolving
//! to the reloaded instances, not the originals.

use fscv_store::binding::TypeRegistry;
use fscv_store::schema::fscv_namespace;
use fscv_store::series::{ElectrodeRegion, ExcitationSeries, Link, ResponseSeries};
use fscv_store::testing::{
    mock_background_subtracted_from, mock_container, mock_electrode_rows, mock_response_series,
};
use fscv_store::{io, Error};
use ndarray::{Array1, Array2};
use tempfile::tempdir;

fn registry() -> TypeRegistry {
    let ns = fscv_namespace().expect("static declarations are consistent");
    TypeRegistry::from_namespace(&ns).expect("no conflicts")
}

#[test]
fn test_roundtrip_preserves_everything() {
    let mut container = mock_container();
    let response = mock_response_series(&mut container, 4, 100, 2140.0).expect("consistent mock");
    let background = mock_background_subtracted_from(&mut container, &response).expect("consistent mock");

    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("session.fscv.json");
    io::write_container(&container, &path).expect("write");

    let reloaded = io::read_container(&path, &registry()).expect("read");
    assert_eq!(container, reloaded);

    // Field-level checks on the reloaded instances.
    let response2 = reloaded.response(response.name()).expect("reloaded response");
    assert_eq!(response2.data(), response.data());
    assert_eq!(response2.rate(), response.rate());
    assert_eq!(response2.unit(), "amperes");
    assert_eq!(response2.current_to_voltage_factor(), Some(0.5));
    assert_eq!(response2.electrodes(), response.electrodes());

    let background2 = reloaded.background(background.name()).expect("reloaded background");
    assert_eq!(background2.data(), background.data());
    assert_eq!(background2.response_series(), background.response_series());

    // Links resolve against the reloaded graph: same values, distinct objects.
    let excitation2 = reloaded
        .excitation_of(response2)
        .expect("link resolves")
        .expect("link set");
    let excitation = container
        .excitation_of(&response)
        .expect("link resolves")
        .expect("link set");
    assert_eq!(excitation2, excitation);
    assert!(!std::ptr::eq(excitation2, excitation));

    let raw2 = reloaded.response_of(background2).expect("link resolves");
    assert_eq!(raw2, response2);
    assert!(!std::ptr::eq(raw2, &response));
}

#[test]
fn test_roundtrip_of_empty_container() {
    let container = mock_container();
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("empty.fscv.json");

    io::write_container(&container, &path).expect("write");
    let reloaded = io::read_container(&path, &registry()).expect("read");
    assert_eq!(container, reloaded);
    assert!(reloaded.electrodes().is_empty());
}

#[test]
fn test_shared_name_across_areas_roundtrips() {
    // Stimulus and acquisition are separate name scopes: an excitation
    // series and a response series may share a name, and the shared name
    // must survive a round trip with the link still resolving into the
    // stimulus area.
    let mut container = mock_container();
    let rows = mock_electrode_rows(&mut container, 2);

    let excitation = ExcitationSeries::builder("dup")
        .data(Array1::linspace(-1.0, 1.0, 100))
        .rate(2140.0)
        .scan_frequency(10.0)
        .sweep_rate(400.0)
        .waveform_shape("Triangle")
        .build()
        .expect("valid parameters");
    container.add_stimulus(excitation).expect("attach stimulus");

    let response = ResponseSeries::builder("dup")
        .data(Array2::zeros((100, 2)))
        .rate(2140.0)
        .electrodes(ElectrodeRegion::new(rows, "FSCV electrodes"))
        .excitation_series(Link::to("dup"))
        .build()
        .expect("valid parameters");
    container.add_response(response).expect("attach response");
    container.validate().expect("scopes are independent");

    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("session.fscv.json");
    io::write_container(&container, &path).expect("write");

    let reloaded = io::read_container(&path, &registry()).expect("read");
    assert_eq!(container, reloaded);

    let response2 = reloaded.response("dup").expect("reloaded response");
    let excitation2 = reloaded
        .excitation_of(response2)
        .expect("link resolves into the stimulus area")
        .expect("link set");
    assert_eq!(excitation2.unit(), "volts");
    assert_eq!(excitation2.name(), "dup");
}

#[test]
fn test_write_failure_is_reported() {
    let container = mock_container();
    let dir = tempdir().expect("tempdir");

    // Target directory does not exist; the failure must surface, not vanish.
    let err = io::write_container(&container, dir.path().join("absent").join("f.json")).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn test_tampered_unit_fails_on_read() {
    let mut container = mock_container();
    mock_response_series(&mut container, 4, 100, 2140.0).expect("consistent mock");

    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("session.fscv.json");
    io::write_container(&container, &path).expect("write");

    // Flip the fixed unit on disk; the read path must refuse it.
    let text = std::fs::read_to_string(&path)
        .expect("readable")
        .replace("\"amperes\"", "\"milliamperes\"");
    std::fs::write(&path, text).expect("writable");

    let err = io::read_container(&path, &registry()).unwrap_err();
    assert!(matches!(err, Error::FixedValueOverride { field, .. } if field == "unit"));
}

#[test]
fn test_dangling_link_fails_on_read() {
    let mut container = mock_container();
    let response = mock_response_series(&mut container, 4, 100, 2140.0).expect("consistent mock");
    mock_background_subtracted_from(&mut container, &response).expect("consistent mock");

    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("session.fscv.json");
    io::write_container(&container, &path).expect("write");

    // Rename the link target on disk so the persisted reference dangles.
    let text = std::fs::read_to_string(&path)
        .expect("readable")
        .replace(
            &format!("\"response_series\": \"{}\"", response.name()),
            "\"response_series\": \"missing_response\"",
        );
    std::fs::write(&path, text).expect("writable");

    let err = io::read_container(&path, &registry()).unwrap_err();
    assert!(matches!(err, Error::UnresolvedLink { target, .. } if target == "missing_response"));
}

#[test]
fn test_missing_required_attribute_fails_on_read() {
    let mut container = mock_container();
    mock_response_series(&mut container, 2, 50, 2140.0).expect("consistent mock");

    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("session.fscv.json");
    io::write_container(&container, &path).expect("write");

    let text = std::fs::read_to_string(&path)
        .expect("readable")
        .replace("\"waveform_shape\": \"Triangle\"", "\"waveform_shape_removed\": \"Triangle\"");
    std::fs::write(&path, text).expect("writable");

    let err = io::read_container(&path, &registry()).unwrap_err();
    assert!(matches!(err, Error::MissingRequiredField { field, .. } if field == "waveform_shape"));
}

#[test]
fn test_unreadable_file_is_fatal() {
    let dir = tempdir().expect("tempdir");
    let err = io::read_container(dir.path().join("absent.fscv.json"), &registry()).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}
