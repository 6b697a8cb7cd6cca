//! # fscv-store: schema-driven FSCV data model
//!
//! Three linked record types for Fast-Scan Cyclic Voltammetry recordings:
//! the applied excitation waveform, the raw electrochemical response, and
//! the background-subtracted response. The types are declared in a versioned
//! namespace, validated by a caller-owned type registry, held in a session
//! container, and persisted through a round-trip serializer that re-resolves
//! every link on read.
//!
//! ## Example
//!
//! ```rust,no_run
//! use fscv_store::binding::TypeRegistry;
//! use fscv_store::schema::fscv_namespace;
//! use fscv_store::testing::{mock_container, mock_response_series};
//! use fscv_store::{io, Result};
//!
//! fn main() -> Result<()> {
//!     let namespace = fscv_namespace()?;
//!     let registry = TypeRegistry::from_namespace(&namespace)?;
//!
//!     let mut container = mock_container();
//!     mock_response_series(&mut container, 4, 100, 2140.0)?;
//!
//!     io::write_container(&container, "session.fscv.json")?;
//!     let reloaded = io::read_container("session.fscv.json", &registry)?;
//!     assert_eq!(container, reloaded);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod binding;
pub mod container;
pub mod error;
pub mod io;
pub mod schema;
pub mod series;
pub mod testing;

pub use error::{Error, Result};
