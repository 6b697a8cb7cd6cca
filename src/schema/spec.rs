//! Declarative type specifications
//!
//! These structs are the machine-readable form of a record-type declaration:
//! which attributes an instance must carry, what shape its datasets take, and
//! which other types it may link to. They carry no behavior beyond
//! construction helpers; enforcement lives in the binding layer.

use serde::{Deserialize, Serialize};

/// Scalar data types a field may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dtype {
    /// 64-bit float
    Float64,
    /// UTF-8 text
    Text,
}

impl Dtype {
    /// Human-readable name used in error messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Float64 => "float64",
            Self::Text => "text",
        }
    }
}

/// Specification of a scalar attribute on a type or dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeSpec {
    /// Attribute name
    pub name: String,
    /// What the attribute records
    pub doc: String,
    /// Scalar dtype
    pub dtype: Dtype,
    /// Whether an instance must carry this attribute
    pub required: bool,
    /// Schema-fixed value; instances cannot override it when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl AttributeSpec {
    /// A required attribute with no fixed value.
    #[must_use]
    pub fn required(name: impl Into<String>, dtype: Dtype, doc: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: doc.into(),
            dtype,
            required: true,
            value: None,
        }
    }

    /// An optional attribute.
    #[must_use]
    pub fn optional(name: impl Into<String>, dtype: Dtype, doc: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: doc.into(),
            dtype,
            required: false,
            value: None,
        }
    }

    /// A required attribute whose value is fixed by the schema.
    #[must_use]
    pub fn fixed(name: impl Into<String>, value: impl Into<String>, doc: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: doc.into(),
            dtype: Dtype::Text,
            required: true,
            value: Some(value.into()),
        }
    }
}

/// Specification of an array-valued dataset on a type.
///
/// `shape` gives one entry per axis; `None` leaves that axis length
/// unconstrained. `dims` labels each axis and must have the same length as
/// `shape` (the namespace builder rejects mismatches).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSpec {
    /// Dataset name
    pub name: String,
    /// What the dataset holds
    pub doc: String,
    /// Element dtype
    pub dtype: Dtype,
    /// Per-axis length constraints, `None` = any length
    pub shape: Vec<Option<usize>>,
    /// Per-axis labels, e.g. `["num_timepoints", "num_electrodes"]`
    pub dims: Vec<String>,
    /// Whether an instance must carry this dataset
    #[serde(default = "default_true")]
    pub required: bool,
    /// Attributes attached to the dataset itself (e.g. `unit`)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<AttributeSpec>,
}

fn default_true() -> bool {
    true
}

impl DatasetSpec {
    /// Create a dataset spec with unconstrained axis lengths.
    #[must_use]
    pub fn new(name: impl Into<String>, dtype: Dtype, dims: &[&str], doc: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: doc.into(),
            dtype,
            shape: vec![None; dims.len()],
            dims: dims.iter().map(|d| (*d).to_string()).collect(),
            required: true,
            attributes: Vec::new(),
        }
    }

    /// Mark the dataset as optional.
    #[must_use]
    pub const fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Attach an attribute to this dataset.
    #[must_use]
    pub fn with_attribute(mut self, attribute: AttributeSpec) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Declared rank of the dataset.
    #[must_use]
    pub fn rank(&self) -> usize {
        self.shape.len()
    }
}

/// Specification of a typed, non-owning link to another instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkSpec {
    /// Link field name
    pub name: String,
    /// Name of the type the link must resolve to
    pub target_type: String,
    /// What the link expresses
    pub doc: String,
    /// Whether an instance must carry this link
    #[serde(default = "default_true")]
    pub required: bool,
}

impl LinkSpec {
    /// Create a required link spec.
    #[must_use]
    pub fn new(name: impl Into<String>, target_type: impl Into<String>, doc: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target_type: target_type.into(),
            doc: doc.into(),
            required: true,
        }
    }

    /// Mark the link as optional.
    #[must_use]
    pub const fn optional(mut self) -> Self {
        self.required = false;
        self
    }
}

/// A complete record-type definition: a named specialization of a parent
/// time-series type with its own datasets, attributes, and links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeSpec {
    /// Type name, unique within a namespace
    pub name: String,
    /// Parent type this one extends
    pub parent: String,
    /// What instances of this type record
    pub doc: String,
    /// Array-valued datasets
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub datasets: Vec<DatasetSpec>,
    /// Scalar attributes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<AttributeSpec>,
    /// Typed links to other instances
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<LinkSpec>,
}

impl TypeSpec {
    /// Create an empty type spec extending `parent`.
    #[must_use]
    pub fn new(name: impl Into<String>, parent: impl Into<String>, doc: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: parent.into(),
            doc: doc.into(),
            datasets: Vec::new(),
            attributes: Vec::new(),
            links: Vec::new(),
        }
    }

    /// Add a dataset spec.
    #[must_use]
    pub fn with_dataset(mut self, dataset: DatasetSpec) -> Self {
        self.datasets.push(dataset);
        self
    }

    /// Add an attribute spec.
    #[must_use]
    pub fn with_attribute(mut self, attribute: AttributeSpec) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Add a link spec.
    #[must_use]
    pub fn with_link(mut self, link: LinkSpec) -> Self {
        self.links.push(link);
        self
    }

    /// Look up a dataset spec by name.
    #[must_use]
    pub fn dataset(&self, name: &str) -> Option<&DatasetSpec> {
        self.datasets.iter().find(|d| d.name == name)
    }

    /// Look up an attribute spec by name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&AttributeSpec> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Look up a link spec by name.
    #[must_use]
    pub fn link(&self, name: &str) -> Option<&LinkSpec> {
        self.links.iter().find(|l| l.name == name)
    }
}
