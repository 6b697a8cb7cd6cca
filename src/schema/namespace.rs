//! Versioned namespace artifact
//!
//! A namespace bundles an ordered set of type definitions with name, version,
//! and authorship metadata. It is exported to a well-known directory as two
//! JSON documents: `<name>.namespace.json` (metadata plus a type-name index)
//! and `<name>.extensions.json` (the full type specs). Export is
//! deterministic, so re-running it over identical declarations rewrites
//! identical bytes.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::schema::spec::TypeSpec;

/// A named, versioned collection of record-type definitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Namespace {
    name: String,
    version: String,
    doc: String,
    author: Vec<String>,
    contact: Vec<String>,
    types: Vec<TypeSpec>,
}

impl Namespace {
    /// Create a builder for a namespace with the given name and version.
    #[must_use]
    pub fn builder(name: impl Into<String>, version: impl Into<String>) -> NamespaceBuilder {
        NamespaceBuilder::new(name, version)
    }

    /// Get the namespace name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the namespace version.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Get the namespace doc string.
    #[must_use]
    pub fn doc(&self) -> &str {
        &self.doc
    }

    /// Get the author list.
    #[must_use]
    pub fn author(&self) -> &[String] {
        &self.author
    }

    /// Get the contact list.
    #[must_use]
    pub fn contact(&self) -> &[String] {
        &self.contact
    }

    /// Get the ordered type definitions.
    #[must_use]
    pub fn types(&self) -> &[TypeSpec] {
        &self.types
    }

    /// Look up a type definition by name.
    #[must_use]
    pub fn type_spec(&self, name: &str) -> Option<&TypeSpec> {
        self.types.iter().find(|t| t.name == name)
    }

    /// Write the namespace artifact to `dir`, creating it if needed.
    ///
    /// Two files are written: the namespace index and the extensions document.
    /// Output depends only on the declarations, so the operation is idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or a file cannot
    /// be written.
    pub fn export(&self, dir: impl AsRef<Path>) -> Result<()> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let index = NamespaceIndex {
            name: self.name.clone(),
            version: self.version.clone(),
            doc: self.doc.clone(),
            author: self.author.clone(),
            contact: self.contact.clone(),
            types: self.types.iter().map(|t| t.name.clone()).collect(),
        };

        let namespace_path = self.namespace_path(dir);
        fs::write(&namespace_path, serde_json::to_string_pretty(&index)?)?;
        debug!(path = %namespace_path.display(), "wrote namespace index");

        let extensions_path = self.extensions_path(dir);
        fs::write(&extensions_path, serde_json::to_string_pretty(&self.types)?)?;
        debug!(path = %extensions_path.display(), "wrote extension specs");

        info!(
            namespace = %self.name,
            version = %self.version,
            types = self.types.len(),
            "exported namespace artifact"
        );
        Ok(())
    }

    /// Load a namespace artifact previously written by [`Namespace::export`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::NamespaceNotFound`] if either artifact file is absent,
    /// or a serialization error if the files cannot be parsed.
    pub fn load(dir: impl AsRef<Path>, name: &str) -> Result<Self> {
        let dir = dir.as_ref();
        let namespace_path = dir.join(format!("{name}.namespace.json"));
        let extensions_path = dir.join(format!("{name}.extensions.json"));
        if !namespace_path.exists() || !extensions_path.exists() {
            return Err(Error::NamespaceNotFound(namespace_path.display().to_string()));
        }

        let index: NamespaceIndex = serde_json::from_str(&fs::read_to_string(&namespace_path)?)?;
        let types: Vec<TypeSpec> = serde_json::from_str(&fs::read_to_string(&extensions_path)?)?;
        debug!(namespace = %index.name, types = types.len(), "loaded namespace artifact");

        Ok(Self {
            name: index.name,
            version: index.version,
            doc: index.doc,
            author: index.author,
            contact: index.contact,
            types,
        })
    }

    fn namespace_path(&self, dir: &Path) -> PathBuf {
        dir.join(format!("{}.namespace.json", self.name))
    }

    fn extensions_path(&self, dir: &Path) -> PathBuf {
        dir.join(format!("{}.extensions.json", self.name))
    }
}

/// The on-disk namespace index document.
#[derive(Debug, Serialize, Deserialize)]
struct NamespaceIndex {
    name: String,
    version: String,
    doc: String,
    author: Vec<String>,
    contact: Vec<String>,
    types: Vec<String>,
}

/// Builder for [`Namespace`].
///
/// `add_type` validates each declaration as it is added, so a builder that
/// finishes without error describes a well-formed namespace.
#[derive(Debug)]
pub struct NamespaceBuilder {
    name: String,
    version: String,
    doc: String,
    author: Vec<String>,
    contact: Vec<String>,
    types: Vec<TypeSpec>,
    seen: HashSet<String>,
}

impl NamespaceBuilder {
    /// Create a new builder.
    #[must_use]
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            doc: String::new(),
            author: Vec::new(),
            contact: Vec::new(),
            types: Vec::new(),
            seen: HashSet::new(),
        }
    }

    /// Set the namespace doc string.
    #[must_use]
    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = doc.into();
        self
    }

    /// Add an author and their contact address.
    #[must_use]
    pub fn author(mut self, name: impl Into<String>, contact: impl Into<String>) -> Self {
        self.author.push(name.into());
        self.contact.push(contact.into());
        self
    }

    /// Add a type definition.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SchemaConflict`] if a type with the same name was
    /// already added, or [`Error::InvalidShape`] if any dataset declares a
    /// shape rank inconsistent with its dimension labels.
    pub fn add_type(mut self, spec: TypeSpec) -> Result<Self> {
        if !self.seen.insert(spec.name.clone()) {
            return Err(Error::SchemaConflict(spec.name));
        }
        for dataset in &spec.datasets {
            if dataset.shape.len() != dataset.dims.len() {
                return Err(Error::InvalidShape {
                    dataset: dataset.name.clone(),
                    rank: dataset.shape.len(),
                    dims: dataset.dims.len(),
                });
            }
        }
        self.types.push(spec);
        Ok(self)
    }

    /// Finish the namespace.
    #[must_use]
    pub fn build(self) -> Namespace {
        Namespace {
            name: self.name,
            version: self.version,
            doc: self.doc,
            author: self.author,
            contact: self.contact,
            types: self.types,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::spec::{DatasetSpec, Dtype};

    fn minimal_type(name: &str) -> TypeSpec {
        TypeSpec::new(name, "TimeSeries", "test type")
    }

    #[test]
    fn test_builder_collects_types_in_order() {
        let ns = Namespace::builder("fscv", "0.1.0")
            .author("Ben Dichter", "ben.dichter@catalystneuro.com")
            .add_type(minimal_type("A"))
            .and_then(|b| b.add_type(minimal_type("B")))
            .expect("valid declarations")
            .build();

        assert_eq!(ns.name(), "fscv");
        assert_eq!(ns.types().len(), 2);
        assert_eq!(ns.types()[0].name, "A");
        assert_eq!(ns.types()[1].name, "B");
    }

    #[test]
    fn test_duplicate_type_name_is_schema_conflict() {
        let err = Namespace::builder("fscv", "0.1.0")
            .add_type(minimal_type("A"))
            .and_then(|b| b.add_type(minimal_type("A")))
            .unwrap_err();
        assert!(matches!(err, Error::SchemaConflict(name) if name == "A"));
    }

    #[test]
    fn test_shape_dims_disagreement_is_invalid_shape() {
        let mut bad = DatasetSpec::new("data", Dtype::Float64, &["num_timepoints"], "1-D");
        bad.shape = vec![None, None]; // rank 2, one label

        let err = Namespace::builder("fscv", "0.1.0")
            .add_type(minimal_type("A").with_dataset(bad))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidShape { rank: 2, dims: 1, .. }));
    }
}
