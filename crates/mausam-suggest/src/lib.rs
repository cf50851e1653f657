//! Suggestion engine for the state/city lookup fields.
//!
//! Turns bursts of keystrokes into one authoritative, cached answer per
//! field. Each field runs the same state machine
//! (`Idle -> Debouncing -> Fetching -> Applied | Failed`) with its own query
//! tokens; a response is only rendered if it belongs to the newest query
//! issued for its field.

pub mod cache;
pub mod debounce;
pub mod engine;
pub mod highlight;
pub mod session;
pub mod types;

pub use cache::{CacheKey, SuggestionCache};
pub use debounce::Debouncer;
pub use engine::SuggestionEngine;
pub use highlight::match_span;
pub use session::FieldSession;
pub use types::*;
