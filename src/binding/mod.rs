//! Type Binding Layer
//!
//! Consumes a [`Namespace`](crate::schema::Namespace) and produces one
//! [`TypeBinding`] per declared type. A binding validates a raw, not yet
//! materialized instance group (a parsed JSON map) against its spec: required
//! attributes present, fixed-value attributes not overridden, dtypes correct,
//! dataset ranks as declared, link targets of the right type.
//!
//! The registry is caller-owned. Nothing here touches global state, so
//! independent namespaces and tests can hold their own registries side by
//! side.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::schema::{AttributeSpec, Dtype, Namespace, TypeSpec};

/// A validated lookup table of type bindings built from one namespace.
#[derive(Debug)]
pub struct TypeRegistry {
    bindings: HashMap<String, TypeBinding>,
}

impl TypeRegistry {
    /// Build a registry from a namespace.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SchemaConflict`] if the namespace carries two types
    /// with the same name. A namespace built in-process cannot trip this, but
    /// a loaded artifact may have been edited on disk.
    pub fn from_namespace(namespace: &Namespace) -> Result<Self> {
        let mut bindings = HashMap::new();
        for spec in namespace.types() {
            let binding = TypeBinding::new(spec.clone());
            if bindings.insert(spec.name.clone(), binding).is_some() {
                return Err(Error::SchemaConflict(spec.name.clone()));
            }
        }
        Ok(Self { bindings })
    }

    /// Get the binding for a type, if the namespace declares it.
    #[must_use]
    pub fn binding(&self, type_name: &str) -> Option<&TypeBinding> {
        self.bindings.get(type_name)
    }

    /// Number of bound types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Validator for instances of one declared type.
#[derive(Debug)]
pub struct TypeBinding {
    spec: TypeSpec,
    // Type-level attributes plus attributes declared on datasets (e.g. the
    // fixed `unit` on `data`), which share the instance group's flat keyspace.
    attributes: Vec<AttributeSpec>,
}

impl TypeBinding {
    fn new(spec: TypeSpec) -> Self {
        let mut attributes = spec.attributes.clone();
        for dataset in &spec.datasets {
            attributes.extend(dataset.attributes.iter().cloned());
        }
        Self { spec, attributes }
    }

    /// The spec this binding enforces.
    #[must_use]
    pub fn spec(&self) -> &TypeSpec {
        &self.spec
    }

    /// Validate a raw instance group against the spec.
    ///
    /// `name` is the instance name, used only for error reporting.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingRequiredField`] for an absent required attribute,
    ///   dataset, or link
    /// - [`Error::FixedValueOverride`] for a fixed-value attribute carrying a
    ///   different value
    /// - [`Error::TypeMismatch`] for an attribute of the wrong dtype or a
    ///   link that is not a name string
    /// - [`Error::InvalidShape`] for a dataset whose stored rank disagrees
    ///   with the declared dims
    pub fn validate(&self, name: &str, group: &Map<String, Value>) -> Result<()> {
        for attr in &self.attributes {
            match group.get(&attr.name) {
                None => {
                    if attr.required {
                        return Err(self.missing(&attr.name));
                    }
                }
                Some(value) => {
                    self.check_dtype(&attr.name, attr.dtype, value)?;
                    if let Some(fixed) = &attr.value {
                        let actual = value.as_str().unwrap_or_default();
                        if actual != fixed {
                            return Err(Error::FixedValueOverride {
                                type_name: self.spec.name.clone(),
                                field: attr.name.clone(),
                                expected: fixed.clone(),
                                actual: actual.to_string(),
                            });
                        }
                    }
                }
            }
        }

        for dataset in &self.spec.datasets {
            match group.get(&dataset.name) {
                None => {
                    if dataset.required {
                        return Err(self.missing(&dataset.name));
                    }
                }
                // Array payloads carry their shape in a `dim` field; region
                // references do not and are rank-checked at link resolution.
                Some(Value::Object(payload)) => {
                    if let Some(dim) = payload.get("dim").and_then(Value::as_array) {
                        if dim.len() != dataset.rank() {
                            return Err(Error::InvalidShape {
                                dataset: dataset.name.clone(),
                                rank: dim.len(),
                                dims: dataset.rank(),
                            });
                        }
                    }
                }
                Some(other) => {
                    return Err(self.mismatch(&dataset.name, "array group", type_name_of(other)));
                }
            }
        }

        for link in &self.spec.links {
            match group.get(&link.name) {
                None => {
                    if link.required {
                        return Err(self.missing(&link.name));
                    }
                }
                Some(Value::String(_)) => {}
                Some(other) => {
                    return Err(self.mismatch(&link.name, "target name", type_name_of(other)));
                }
            }
        }

        tracing::debug!(type_name = %self.spec.name, instance = name, "validated instance group");
        Ok(())
    }

    /// Type-check one link target during two-phase load.
    ///
    /// `resolved_type` is the tag of the instance the target name resolved
    /// to, or `None` if the name is unknown in the container.
    ///
    /// # Errors
    ///
    /// [`Error::UnresolvedLink`] when the target does not exist,
    /// [`Error::TypeMismatch`] when it exists with the wrong type.
    pub fn validate_link(
        &self,
        name: &str,
        link_name: &str,
        target: &str,
        resolved_type: Option<&str>,
    ) -> Result<()> {
        let Some(link) = self.spec.link(link_name) else {
            return Err(self.missing(link_name));
        };
        match resolved_type {
            None => Err(Error::UnresolvedLink {
                name: name.to_string(),
                link: link_name.to_string(),
                target_type: link.target_type.clone(),
                target: target.to_string(),
            }),
            Some(actual) if actual != link.target_type => Err(Error::TypeMismatch {
                type_name: self.spec.name.clone(),
                field: link_name.to_string(),
                expected: link.target_type.clone(),
                actual: actual.to_string(),
            }),
            Some(_) => Ok(()),
        }
    }

    fn check_dtype(&self, field: &str, dtype: Dtype, value: &Value) -> Result<()> {
        let ok = match dtype {
            Dtype::Float64 => value.is_number(),
            Dtype::Text => value.is_string(),
        };
        if ok {
            Ok(())
        } else {
            Err(self.mismatch(field, dtype.as_str(), type_name_of(value)))
        }
    }

    fn missing(&self, field: &str) -> Error {
        Error::MissingRequiredField {
            type_name: self.spec.name.clone(),
            field: field.to_string(),
        }
    }

    fn mismatch(&self, field: &str, expected: &str, actual: &str) -> Error {
        Error::TypeMismatch {
            type_name: self.spec.name.clone(),
            field: field.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}

fn type_name_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{fscv_namespace, EXCITATION_SERIES, RESPONSE_SERIES};
    use serde_json::json;

    fn registry() -> TypeRegistry {
        let ns = fscv_namespace().expect("static declarations are consistent");
        TypeRegistry::from_namespace(&ns).expect("no conflicts")
    }

    fn excitation_group() -> Map<String, Value> {
        json!({
            "data": { "v": 1, "dim": [100], "data": [0.0] },
            "unit": "volts",
            "scan_frequency": 10.0,
            "sweep_rate": 400.0,
            "waveform_shape": "Triangle",
            "rate": 2140.0,
        })
        .as_object()
        .cloned()
        .expect("object literal")
    }

    #[test]
    fn test_registry_binds_all_types() {
        let registry = registry();
        assert_eq!(registry.len(), 3);
        assert!(registry.binding(EXCITATION_SERIES).is_some());
        assert!(registry.binding("NoSuchSeries").is_none());
    }

    #[test]
    fn test_valid_group_passes() {
        let registry = registry();
        let binding = registry.binding(EXCITATION_SERIES).expect("bound");
        binding.validate("exc", &excitation_group()).expect("valid group");
    }

    #[test]
    fn test_missing_required_attribute() {
        let registry = registry();
        let binding = registry.binding(EXCITATION_SERIES).expect("bound");
        let mut group = excitation_group();
        group.remove("sweep_rate");

        let err = binding.validate("exc", &group).unwrap_err();
        assert!(matches!(err, Error::MissingRequiredField { field, .. } if field == "sweep_rate"));
    }

    #[test]
    fn test_fixed_unit_cannot_be_overridden() {
        let registry = registry();
        let binding = registry.binding(EXCITATION_SERIES).expect("bound");
        let mut group = excitation_group();
        group.insert("unit".into(), json!("millivolts"));

        let err = binding.validate("exc", &group).unwrap_err();
        assert!(matches!(err, Error::FixedValueOverride { field, .. } if field == "unit"));
    }

    #[test]
    fn test_wrong_attribute_dtype() {
        let registry = registry();
        let binding = registry.binding(EXCITATION_SERIES).expect("bound");
        let mut group = excitation_group();
        group.insert("scan_frequency".into(), json!("fast"));

        let err = binding.validate("exc", &group).unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { field, .. } if field == "scan_frequency"));
    }

    #[test]
    fn test_rank_disagreement_rejected() {
        let registry = registry();
        let binding = registry.binding(EXCITATION_SERIES).expect("bound");
        let mut group = excitation_group();
        group.insert("data".into(), json!({ "v": 1, "dim": [100, 4], "data": [0.0] }));

        let err = binding.validate("exc", &group).unwrap_err();
        assert!(matches!(err, Error::InvalidShape { rank: 2, dims: 1, .. }));
    }

    #[test]
    fn test_link_target_type_checked() {
        let registry = registry();
        let binding = registry.binding(RESPONSE_SERIES).expect("bound");

        binding
            .validate_link("resp", "excitation_series", "exc", Some(EXCITATION_SERIES))
            .expect("correct target type");

        let err = binding
            .validate_link("resp", "excitation_series", "exc", Some(RESPONSE_SERIES))
            .unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { .. }));

        let err = binding
            .validate_link("resp", "excitation_series", "gone", None)
            .unwrap_err();
        assert!(matches!(err, Error::UnresolvedLink { target, .. } if target == "gone"));
    }
}
