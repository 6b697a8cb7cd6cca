//! Schema Definition Engine
//!
//! Declarative record-type specifications, the versioned namespace artifact
//! that bundles them, and the canonical FSCV namespace declaration.
//!
//! ## Schema Overview
//!
//! ```text
//! ExcitationSeries          1-D [num_timepoints]                 unit: volts
//!        ▲
//!        │ excitation_series (link)
//! ResponseSeries            2-D [num_timepoints, num_electrodes] unit: amperes
//!        ▲
//!        │ response_series (link)
//! BackgroundSubtractedSeries 2-D [num_timepoints, num_electrodes] unit: amperes
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use fscv_store::schema::fscv_namespace;
//!
//! let ns = fscv_namespace()?;
//! assert_eq!(ns.types().len(), 3);
//! # Ok::<(), fscv_store::Error>(())
//! ```

mod fscv;
mod namespace;
mod spec;

pub use fscv::{
    fscv_namespace, BACKGROUND_SUBTRACTED_SERIES, EXCITATION_SERIES, NAMESPACE_NAME,
    NAMESPACE_VERSION, RESPONSE_SERIES,
};
pub use namespace::{Namespace, NamespaceBuilder};
pub use spec::{AttributeSpec, DatasetSpec, Dtype, LinkSpec, TypeSpec};
