//! Round-trip container serialization
//!
//! Persists a [`Container`] to a hierarchical JSON document and reconstructs
//! an equivalent container from it. Writing performs no validation. Reading
//! is a two-phase load:
//!
//! 1. Parse the document and validate every tagged group against the
//!    caller's [`TypeRegistry`], including link target-type checks against
//!    the file's own tag table.
//! 2. Materialize typed instances, attach them in dependency order
//!    (stimulus, then responses, then background), and re-run
//!    [`Container::validate`] so persisted links are re-resolved against the
//!    reloaded object graph.
//!
//! The file handle is held only for the duration of the call.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use crate::binding::TypeRegistry;
use crate::container::Container;
use crate::error::{Error, Result};
use crate::schema::{BACKGROUND_SUBTRACTED_SERIES, EXCITATION_SERIES, RESPONSE_SERIES};
use crate::series::{BackgroundSubtractedSeries, ElectrodeTable, ExcitationSeries, ResponseSeries};

/// Key tagging each persisted group with its schema type.
const TYPE_TAG: &str = "neurodata_type";

/// Types allowed in the stimulus area.
const STIMULUS_TYPES: &[&str] = &[EXCITATION_SERIES];

/// Types allowed in the acquisition area.
const ACQUISITION_TYPES: &[&str] = &[RESPONSE_SERIES, BACKGROUND_SUBTRACTED_SERIES];

/// On-disk document layout. Group maps are ordered by name so identical
/// containers serialize to identical bytes.
#[derive(Serialize, Deserialize)]
struct FileDoc {
    session_description: String,
    session_start_time: DateTime<Utc>,
    electrodes: ElectrodeTable,
    stimulus: BTreeMap<String, Value>,
    acquisition: BTreeMap<String, Value>,
}

/// Write a container to `path`, replacing any existing file.
///
/// # Errors
///
/// Returns an error if the file cannot be created or serialization fails.
pub fn write_container(container: &Container, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();

    let mut stimulus = BTreeMap::new();
    for series in container.iter_stimulus() {
        stimulus.insert(
            series.name().to_string(),
            tagged_group(series, EXCITATION_SERIES, series.unit())?,
        );
    }

    let mut acquisition = BTreeMap::new();
    for series in container.iter_responses() {
        acquisition.insert(
            series.name().to_string(),
            tagged_group(series, RESPONSE_SERIES, series.unit())?,
        );
    }
    for series in container.iter_background() {
        acquisition.insert(
            series.name().to_string(),
            tagged_group(series, BACKGROUND_SUBTRACTED_SERIES, series.unit())?,
        );
    }

    let doc = FileDoc {
        session_description: container.session_description().to_string(),
        session_start_time: container.session_start_time(),
        electrodes: container.electrodes().clone(),
        stimulus,
        acquisition,
    };

    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, &doc)?;
    // Flush explicitly so a late write failure surfaces instead of being
    // swallowed by Drop.
    writer.flush()?;
    info!(path = %path.display(), "wrote container");
    Ok(())
}

/// Read a container back from `path`, validating against `registry`.
///
/// # Errors
///
/// I/O and parse failures, any binding-layer violation (missing required
/// field, fixed-value override, dtype or rank disagreement), and any
/// linkage violation ([`Error::UnresolvedLink`], [`Error::ShapeMismatch`])
/// found when the reloaded graph is re-validated.
pub fn read_container(path: impl AsRef<Path>, registry: &TypeRegistry) -> Result<Container> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let doc: FileDoc = serde_json::from_reader(BufReader::new(file))?;

    // Phase 1: per-area tag tables plus per-group binding validation.
    // Stimulus and acquisition are separate name scopes; a stimulus and an
    // acquisition series may legally share a name.
    let mut stimulus_tags: BTreeMap<String, String> = BTreeMap::new();
    for (name, group) in &doc.stimulus {
        stimulus_tags.insert(name.clone(), tag_of(name, group)?);
    }
    let mut acquisition_tags: BTreeMap<String, String> = BTreeMap::new();
    for (name, group) in &doc.acquisition {
        acquisition_tags.insert(name.clone(), tag_of(name, group)?);
    }

    // A link target is resolved in the area its target type lives in.
    let tags_for_target = |target_type: &str| {
        if target_type == EXCITATION_SERIES {
            &stimulus_tags
        } else {
            &acquisition_tags
        }
    };

    let areas = [
        (&doc.stimulus, &stimulus_tags, STIMULUS_TYPES),
        (&doc.acquisition, &acquisition_tags, ACQUISITION_TYPES),
    ];
    for (groups, tags, allowed) in areas {
        for (name, group) in groups {
            let tag = &tags[name];
            let binding = registry.binding(tag).ok_or_else(|| Error::TypeMismatch {
                type_name: tag.clone(),
                field: TYPE_TAG.to_string(),
                expected: "a type declared in the namespace".to_string(),
                actual: tag.clone(),
            })?;
            if !allowed.contains(&tag.as_str()) {
                return Err(Error::TypeMismatch {
                    type_name: name.clone(),
                    field: TYPE_TAG.to_string(),
                    expected: allowed.join(" or "),
                    actual: tag.clone(),
                });
            }
            let map = as_object(name, group)?;
            binding.validate(name, map)?;
            for link in &binding.spec().links {
                if let Some(target) = map.get(&link.name).and_then(Value::as_str) {
                    let resolved = tags_for_target(&link.target_type).get(target);
                    binding.validate_link(name, &link.name, target, resolved.map(String::as_str))?;
                }
            }
        }
    }

    // Phase 2: materialize and re-attach in dependency order.
    let mut container = Container::new(doc.session_description, doc.session_start_time);
    *container.electrodes_mut() = doc.electrodes;

    for (name, group) in &doc.stimulus {
        let series: ExcitationSeries = typed_group(name, group)?;
        container.add_stimulus(series)?;
    }
    for (name, group) in &doc.acquisition {
        if acquisition_tags[name] == RESPONSE_SERIES {
            let series: ResponseSeries = typed_group(name, group)?;
            container.add_response(series)?;
        }
    }
    for (name, group) in &doc.acquisition {
        if acquisition_tags[name] == BACKGROUND_SUBTRACTED_SERIES {
            let series: BackgroundSubtractedSeries = typed_group(name, group)?;
            container.add_background(series)?;
        }
    }

    container.validate()?;
    info!(path = %path.display(), "read container");
    Ok(container)
}

/// Serialize a series and tag it with its type and schema-fixed unit.
fn tagged_group<T: Serialize>(series: &T, tag: &str, unit: &str) -> Result<Value> {
    use serde::ser::Error as _;

    let mut value = serde_json::to_value(series)?;
    let Some(map) = value.as_object_mut() else {
        return Err(Error::Serde(serde_json::Error::custom("series must serialize to an object")));
    };
    map.insert(TYPE_TAG.to_string(), Value::String(tag.to_string()));
    map.insert("unit".to_string(), Value::String(unit.to_string()));
    Ok(value)
}

fn tag_of(name: &str, group: &Value) -> Result<String> {
    as_object(name, group)?
        .get(TYPE_TAG)
        .and_then(Value::as_str)
        .map(ToString::to_string)
        .ok_or_else(|| Error::MissingRequiredField {
            type_name: name.to_string(),
            field: TYPE_TAG.to_string(),
        })
}

fn as_object<'a>(name: &str, group: &'a Value) -> Result<&'a Map<String, Value>> {
    group.as_object().ok_or_else(|| Error::TypeMismatch {
        type_name: name.to_string(),
        field: "group".to_string(),
        expected: "object".to_string(),
        actual: "non-object".to_string(),
    })
}

/// Deserialize a typed series from its group, dropping the tag and unit keys
/// the writer added (units are schema-fixed, not struct fields).
fn typed_group<T: DeserializeOwned>(name: &str, group: &Value) -> Result<T> {
    let mut map = as_object(name, group)?.clone();
    map.remove(TYPE_TAG);
    map.remove("unit");
    Ok(serde_json::from_value(Value::Object(map))?)
}
