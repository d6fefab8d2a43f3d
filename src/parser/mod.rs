//! XML parsing for the bulletin feed and its detail documents.
//!
//! - `feed`: Atom entry list
//! - `areas`: intensity/area groupings
//! - `bulletins`: one parser per bulletin family

pub mod areas;
pub mod bulletins;
pub mod document;
pub mod feed;

pub use bulletins::parse_bulletin;
pub use feed::parse_entries;
