//! Error types for fscv-store
//!
//! Every failure is surfaced to the immediate caller; schema generation and
//! instance construction are deterministic, so nothing here is retried.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// fscv-store error types
#[derive(Error, Debug)]
pub enum Error {
    /// Two type definitions share the same name within a namespace
    #[error("schema conflict: type '{0}' is declared more than once")]
    SchemaConflict(String),

    /// A dataset spec declares a shape whose rank disagrees with its dims
    #[error("invalid shape for dataset '{dataset}': shape has rank {rank} but {dims} dimension labels were given")]
    InvalidShape {
        /// Dataset name
        dataset: String,
        /// Declared shape rank
        rank: usize,
        /// Number of dimension labels
        dims: usize,
    },

    /// A required attribute was not supplied at construction or is absent on read
    #[error("missing required field '{field}' on {type_name}")]
    MissingRequiredField {
        /// Type the field belongs to
        type_name: String,
        /// Field name
        field: String,
    },

    /// A field or link target has the wrong type
    #[error("type mismatch for '{field}' on {type_name}: expected {expected}, got {actual}")]
    TypeMismatch {
        /// Type the field belongs to
        type_name: String,
        /// Field or link name
        field: String,
        /// Expected dtype or target type
        expected: String,
        /// Actual dtype or target type
        actual: String,
    },

    /// A fixed-value attribute (e.g. `unit`) carries a different value
    #[error("fixed-value attribute '{field}' on {type_name} cannot be overridden: expected {expected:?}, got {actual:?}")]
    FixedValueOverride {
        /// Type the attribute belongs to
        type_name: String,
        /// Attribute name
        field: String,
        /// Schema-fixed value
        expected: String,
        /// Value actually supplied
        actual: String,
    },

    /// Data dimensions disagree with the electrode references carried
    #[error("shape mismatch on '{name}': data has {columns} electrode columns but {referenced} electrodes are referenced")]
    ShapeMismatch {
        /// Instance name
        name: String,
        /// Second dimension of the data payload
        columns: usize,
        /// Number of referenced electrode rows or linked columns
        referenced: usize,
    },

    /// A link names a target that cannot be found in the container
    #[error("unresolved link '{link}' on '{name}': no {target_type} named '{target}' in this container")]
    UnresolvedLink {
        /// Instance carrying the link
        name: String,
        /// Link field name
        link: String,
        /// Expected target type
        target_type: String,
        /// Target name that failed to resolve
        target: String,
    },

    /// Sampling rate is negative/non-finite, or timestamps are not strictly increasing
    #[error("invalid timing on '{name}': {reason}")]
    InvalidTiming {
        /// Instance name
        name: String,
        /// What was wrong
        reason: String,
    },

    /// Two instances with the same name were attached to the same container scope
    #[error("duplicate name '{0}' in container scope '{1}'")]
    DuplicateName(String, String),

    /// The namespace artifact is absent or unreadable at load time
    #[error("namespace artifact not found: {0}")]
    NamespaceNotFound(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
