//! Instrument catalog - the fixed set of assessments the app administers.
//!
//! The catalog is static: adding an instrument is a code change, not a
//! runtime operation. Lifecycle operations validate incoming type codes
//! against it before touching storage, and snapshot evidence cites its
//! score maxima.

mod assessment_type;
mod severity;

pub use assessment_type::AssessmentType;
pub use severity::{DimensionLevel, SeverityBand};
