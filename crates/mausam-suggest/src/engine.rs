//! The suggestion engine proper.
//!
//! Keystrokes re-arm a per-field debounce timer. When it fires the field
//! issues a new [`QueryToken`], consults the cache and otherwise fetches from
//! the [`LocationSource`] under a hard timeout. The fetch itself runs as its
//! own task: if the caller gives up on it, a later genuine answer still lands
//! in the cache but is never rendered.

use std::sync::Arc;

use mausam_core::SuggestConfig;
use mausam_locations::LocationSource;
use tokio::sync::mpsc;

use crate::cache::{CacheKey, SuggestionCache};
use crate::session::{FieldSession, Navigation};
use crate::types::{
    EmptyReason, EngineEvent, Field, FieldView, Key, Query, QueryPhase, QueryToken,
    SuggestError, Suggestion, SuggestionState,
};

struct Inner<S> {
    source: S,
    config: SuggestConfig,
    cache: SuggestionCache,
    state: FieldSession,
    city: FieldSession,
    events: mpsc::UnboundedSender<EngineEvent>,
}

impl<S: LocationSource> Inner<S> {
    fn session(&self, field: Field) -> &FieldSession {
        match field {
            Field::State => &self.state,
            Field::City => &self.city,
        }
    }

    fn emit(&self, event: EngineEvent) {
        // The UI may have gone away; nothing left to notify then
        let _ = self.events.send(event);
    }

    /// Ask the source and cache any genuine answer, empty ones included.
    async fn fetch(&self, query: Query) -> Result<Vec<String>, SuggestError> {
        let result = match query.kind {
            Field::State => self.source.find_regions(&query.text).await,
            Field::City => self.source.find_places(&query.region, &query.text).await,
        };

        match result {
            Ok(mut items) => {
                items.truncate(self.config.max_results);
                self.cache.insert(CacheKey::for_query(&query), items.clone());
                Ok(items)
            }
            Err(e) => {
                tracing::warn!("{} lookup for {:?} failed: {}", query.kind.as_str(), query.text, e);
                Err(SuggestError::Transport(e.to_string()))
            }
        }
    }
}

/// Drives the state and city lookup fields.
///
/// Cheap to clone; clones share the same fields, cache and event channel.
pub struct SuggestionEngine<S> {
    inner: Arc<Inner<S>>,
}

impl<S> Clone for SuggestionEngine<S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<S: LocationSource> SuggestionEngine<S> {
    /// Create an engine and the channel it reports UI actions on.
    pub fn new(source: S, config: SuggestConfig) -> (Self, mpsc::UnboundedReceiver<EngineEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let debounce = config.debounce();
        let inner = Inner {
            source,
            config,
            cache: SuggestionCache::new(config.max_results),
            state: FieldSession::new(Field::State, debounce, true),
            city: FieldSession::new(Field::City, debounce, false),
            events: tx,
        };
        (Self { inner: Arc::new(inner) }, rx)
    }

    pub fn view(&self, field: Field) -> FieldView {
        self.inner.session(field).view()
    }

    pub fn session(&self, field: Field) -> &FieldSession {
        self.inner.session(field)
    }

    pub fn cache(&self) -> &SuggestionCache {
        &self.inner.cache
    }

    /// A keystroke changed the text of `field`.
    pub fn input(&self, field: Field, text: impl Into<String>) {
        let session = self.inner.session(field);
        session.set_text(text.into());

        let engine = self.clone();
        session
            .debouncer()
            .schedule(async move { engine.run_query(field).await });
    }

    /// Issue the query for whatever `field` holds now and resolve it.
    async fn run_query(&self, field: Field) {
        let inner = &self.inner;
        let session = inner.session(field);
        let (token, text) = session.issue();

        if text.is_empty() {
            session.settle_idle(token);
            if field == Field::State {
                inner.city.set_enabled(false);
            }
            return;
        }

        let query = match field {
            Field::State => {
                // A new state invalidates whatever the city field holds
                inner.city.reset(false);
                Query::states(text)
            }
            Field::City => Query::cities(inner.state.text().trim(), text),
        };

        if !query.is_valid() {
            session.show(
                token,
                SuggestionState::Empty(EmptyReason::StateRequired),
                QueryPhase::Applied,
            );
            return;
        }

        let key = CacheKey::for_query(&query);
        if let Some(items) = inner.cache.get(&key) {
            tracing::debug!("Suggestion cache hit for {}", key.as_str());
            self.resolve(field, token, &query, Ok(items));
            return;
        }

        session.show(token, SuggestionState::Loading, QueryPhase::Fetching);

        let fetch = {
            let inner = inner.clone();
            let query = query.clone();
            tokio::spawn(async move { inner.fetch(query).await })
        };

        let outcome = match tokio::time::timeout(inner.config.fetch_timeout(), fetch).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => Err(SuggestError::Transport(join_error.to_string())),
            Err(_) => {
                tracing::warn!(
                    "{} lookup for {:?} timed out after {:?}",
                    field.as_str(),
                    query.text,
                    inner.config.fetch_timeout()
                );
                Err(SuggestError::Timeout)
            }
        };

        self.resolve(field, token, &query, outcome);
    }

    /// Render an outcome unless a newer query has been issued since `token`.
    fn resolve(
        &self,
        field: Field,
        token: QueryToken,
        query: &Query,
        outcome: Result<Vec<String>, SuggestError>,
    ) {
        let (list, phase) = match outcome {
            Ok(items) if items.is_empty() => {
                (SuggestionState::Empty(EmptyReason::NoMatches), QueryPhase::Applied)
            }
            Ok(items) => {
                let items = items
                    .into_iter()
                    .map(|text| Suggestion::new(text, &query.text))
                    .collect();
                (SuggestionState::Results(items), QueryPhase::Applied)
            }
            Err(e) => (SuggestionState::Failed(e), QueryPhase::Failed),
        };

        if !self.inner.session(field).show(token, list, phase) {
            tracing::debug!(
                "Discarding stale {} suggestions for {:?} (token {})",
                field.as_str(),
                query.text,
                token.0
            );
        }
    }

    /// Handle a navigation key pressed in `field`.
    pub fn key(&self, field: Field, key: Key) {
        if key == Key::Escape {
            self.close_all();
            return;
        }

        match self.inner.session(field).navigate(key) {
            Navigation::Nothing => {}
            Navigation::Commit(index) => {
                self.select(field, index);
            }
            Navigation::Submit => {
                self.submit();
            }
        }
    }

    /// Commit the item at `index` of the list shown under `field`.
    ///
    /// Returns false if there is no such item.
    pub fn select(&self, field: Field, index: usize) -> bool {
        let inner = &self.inner;
        let Some(choice) = inner.session(field).item(index) else {
            return false;
        };

        match field {
            Field::State => {
                inner.state.commit(choice.clone());
                inner.city.reset(true);
                inner.emit(EngineEvent::StateSelected(choice));
                inner.emit(EngineEvent::FocusCity);
            }
            Field::City => {
                inner.city.commit(choice);
                self.submit();
            }
        }
        true
    }

    /// Request weather for the current state and city.
    ///
    /// Emits [`EngineEvent::SubmitRejected`] and returns false when either
    /// field is empty.
    pub fn submit(&self) -> bool {
        let inner = &self.inner;
        let state = inner.state.text().trim().to_string();
        let city = inner.city.text().trim().to_string();

        if state.is_empty() || city.is_empty() {
            tracing::warn!("Weather requested without both a state and a city");
            inner.emit(EngineEvent::SubmitRejected);
            return false;
        }

        self.close_all();
        inner.emit(EngineEvent::FetchWeather { state, city });
        true
    }

    /// Close both result lists without committing anything.
    pub fn close_all(&self) {
        self.inner.state.close();
        self.inner.city.close();
    }
}
