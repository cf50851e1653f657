use std::ops::Range;

use crate::highlight::match_span;

/// The two lookup fields. The city field depends on the state field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    State,
    City,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::State => "state",
            Self::City => "city",
        }
    }
}

/// Monotonic per-field sequence number assigned when a query is issued
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct QueryToken(pub u64);

impl QueryToken {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// A lookup as sent to the location source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub kind: Field,
    pub region: String,
    pub text: String,
}

impl Query {
    pub fn states(text: impl Into<String>) -> Self {
        Self {
            kind: Field::State,
            region: String::new(),
            text: text.into(),
        }
    }

    pub fn cities(region: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            kind: Field::City,
            region: region.into(),
            text: text.into(),
        }
    }

    /// A city query without a region can never match anything
    pub fn is_valid(&self) -> bool {
        !self.text.is_empty() && (self.kind == Field::State || !self.region.is_empty())
    }
}

/// A suggestion plus the byte range of the typed text inside it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub text: String,
    pub highlight: Option<Range<usize>>,
}

impl Suggestion {
    pub fn new(text: String, query: &str) -> Self {
        let highlight = match_span(&text, query);
        Self { text, highlight }
    }

    /// Split into (before, matched, after) for rendering
    pub fn parts(&self) -> (&str, &str, &str) {
        match &self.highlight {
            Some(span) => (
                &self.text[..span.start],
                &self.text[span.clone()],
                &self.text[span.end..],
            ),
            None => (self.text.as_str(), "", ""),
        }
    }
}

/// Why a list shows no suggestions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyReason {
    NoMatches,
    StateRequired,
}

/// Failures absorbed by the engine. They render like an empty list.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SuggestError {
    #[error("Lookup timed out")]
    Timeout,
    #[error("Lookup failed: {0}")]
    Transport(String),
}

/// What a result list currently shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuggestionState {
    Loading,
    Empty(EmptyReason),
    Results(Vec<Suggestion>),
    Failed(SuggestError),
}

impl SuggestionState {
    /// Status line for states that have no items
    pub fn message(&self) -> Option<&'static str> {
        match self {
            Self::Loading => Some("Searching..."),
            Self::Empty(EmptyReason::StateRequired) => Some("Select a state first"),
            Self::Empty(EmptyReason::NoMatches) | Self::Failed(_) => Some("No results found"),
            Self::Results(_) => None,
        }
    }

    pub fn items(&self) -> &[Suggestion] {
        match self {
            Self::Results(items) => items,
            _ => &[],
        }
    }
}

/// Lifecycle of the newest query on a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryPhase {
    #[default]
    Idle,
    Debouncing,
    Fetching,
    Applied,
    Failed,
}

/// Navigation keys understood by the result lists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowDown,
    ArrowUp,
    Enter,
    Escape,
}

/// Snapshot of one field for the renderer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldView {
    pub text: String,
    pub enabled: bool,
    /// `None` while the result list is hidden
    pub list: Option<SuggestionState>,
    pub selected: Option<usize>,
    pub phase: QueryPhase,
}

impl FieldView {
    pub fn is_list_visible(&self) -> bool {
        self.list.is_some()
    }

    pub fn items(&self) -> &[Suggestion] {
        self.list.as_ref().map(SuggestionState::items).unwrap_or(&[])
    }
}

/// Actions the engine asks the embedding UI to perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// A state was picked from the list
    StateSelected(String),
    /// Move keyboard focus to the city field
    FocusCity,
    /// Both fields are filled in; load weather for this city
    FetchWeather { state: String, city: String },
    /// A weather request was attempted without a state and a city
    SubmitRejected,
}
