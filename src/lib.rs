//! Reading, writing, and splitting of GPX 1.1 documents, the XML exchange
//! format for GPS waypoints, routes, and tracks defined by
//! <http://www.topografix.com/gpx/1/1/>.
//!
//! [`parser::parse_gpx`] decodes a document into the [`model`] tree,
//! [`writer::write_gpx`] encodes it back, and [`splitter`] partitions one
//! document into a waypoints-only document plus one document per track.
//! Decoding and re-encoding a well-formed document preserves every field's
//! presence, value, and sequence order; only whitespace is normalized.

pub mod error;
pub mod model;
pub mod parser;
pub mod splitter;
pub mod writer;

pub use error::GpxError;
pub use model::Gpx;
