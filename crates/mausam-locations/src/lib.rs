//! Location lookup for Mausam
//!
//! Holds the in-memory region/place index loaded from JSON and the
//! [`LocationSource`] seam the suggestion engine queries, with a local
//! implementation over the index and a remote one over HTTP.

pub mod client;
pub mod index;
pub mod source;
pub mod types;

pub use client::HttpLocationSource;
pub use index::{LocationIndex, DEFAULT_LIMIT};
pub use source::LocationSource;
pub use types::*;
