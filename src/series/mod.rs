//! The three FSCV record types and their shared building blocks
//!
//! Each series is a specialization of a generic time-series record: ordered
//! samples, a timing scheme, a schema-fixed physical unit, a free-text
//! description, and a name unique within its container scope. Instances are
//! immutable after attachment to a persisted container; an update means
//! constructing a new instance.

mod background;
mod electrodes;
mod excitation;
mod link;
mod response;
mod timing;

pub use background::{BackgroundSubtractedSeries, BackgroundSubtractedSeriesBuilder};
pub use electrodes::{Electrode, ElectrodeRegion, ElectrodeTable};
pub use excitation::{ExcitationSeries, ExcitationSeriesBuilder};
pub use link::Link;
pub use response::{ResponseSeries, ResponseSeriesBuilder};
pub use timing::Timing;
