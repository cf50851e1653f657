//! Per-field state owned by the engine.

use std::time::Duration;

use parking_lot::Mutex;

use crate::debounce::Debouncer;
use crate::types::{Field, FieldView, Key, QueryPhase, QueryToken, SuggestionState};

#[derive(Debug)]
struct FieldState {
    text: String,
    enabled: bool,
    list: Option<SuggestionState>,
    selected: Option<usize>,
    phase: QueryPhase,
    last_issued: QueryToken,
    stale_discards: u64,
}

/// What a navigation key resolved to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Navigation {
    Nothing,
    Commit(usize),
    Submit,
}

/// One input field: its text, its result list, its query tokens and its
/// debounce timer. Fields never share tokens.
#[derive(Debug)]
pub struct FieldSession {
    field: Field,
    state: Mutex<FieldState>,
    debouncer: Debouncer,
}

impl FieldSession {
    pub fn new(field: Field, debounce: Duration, enabled: bool) -> Self {
        Self {
            field,
            state: Mutex::new(FieldState {
                text: String::new(),
                enabled,
                list: None,
                selected: None,
                phase: QueryPhase::Idle,
                last_issued: QueryToken::default(),
                stale_discards: 0,
            }),
            debouncer: Debouncer::new(debounce),
        }
    }

    pub fn view(&self) -> FieldView {
        let st = self.state.lock();
        FieldView {
            text: st.text.clone(),
            enabled: st.enabled,
            list: st.list.clone(),
            selected: st.selected,
            phase: st.phase,
        }
    }

    pub fn text(&self) -> String {
        self.state.lock().text.clone()
    }

    pub fn last_issued(&self) -> QueryToken {
        self.state.lock().last_issued
    }

    /// Responses dropped because a newer query had been issued
    pub fn stale_discards(&self) -> u64 {
        self.state.lock().stale_discards
    }

    pub(crate) fn debouncer(&self) -> &Debouncer {
        &self.debouncer
    }

    pub(crate) fn set_text(&self, text: String) {
        let mut st = self.state.lock();
        st.text = text;
        st.phase = QueryPhase::Debouncing;
    }

    pub(crate) fn set_enabled(&self, enabled: bool) {
        self.state.lock().enabled = enabled;
    }

    /// Start a new query: bump the token and capture the trimmed text.
    pub(crate) fn issue(&self) -> (QueryToken, String) {
        let mut st = self.state.lock();
        st.last_issued = st.last_issued.next();
        st.selected = None;
        (st.last_issued, st.text.trim().to_string())
    }

    /// Apply `list` if `token` is still the newest query on this field.
    pub(crate) fn show(&self, token: QueryToken, list: SuggestionState, phase: QueryPhase) -> bool {
        let mut st = self.state.lock();
        if st.last_issued != token {
            st.stale_discards += 1;
            return false;
        }
        st.list = Some(list);
        st.selected = None;
        st.phase = phase;
        true
    }

    /// Hide the list for query `token` and go back to idle.
    pub(crate) fn settle_idle(&self, token: QueryToken) {
        let mut st = self.state.lock();
        if st.last_issued == token {
            st.list = None;
            st.selected = None;
            st.phase = QueryPhase::Idle;
        }
    }

    /// Close the list and make any in-flight or pending query for it moot.
    pub(crate) fn close(&self) {
        self.debouncer.cancel();
        let mut st = self.state.lock();
        st.last_issued = st.last_issued.next();
        st.list = None;
        st.selected = None;
        if matches!(st.phase, QueryPhase::Debouncing | QueryPhase::Fetching) {
            st.phase = QueryPhase::Idle;
        }
    }

    /// Replace the text with a committed choice and close the list.
    pub(crate) fn commit(&self, text: String) {
        self.close();
        let mut st = self.state.lock();
        st.text = text;
        st.phase = QueryPhase::Idle;
    }

    /// Clear the text, close the list and set the enabled flag.
    pub(crate) fn reset(&self, enabled: bool) {
        self.close();
        let mut st = self.state.lock();
        st.text.clear();
        st.enabled = enabled;
        st.phase = QueryPhase::Idle;
    }

    pub(crate) fn item(&self, index: usize) -> Option<String> {
        let st = self.state.lock();
        st.list
            .as_ref()
            .and_then(|list| list.items().get(index))
            .map(|s| s.text.clone())
    }

    /// Move the selection or resolve Enter. Escape is handled by the engine.
    pub(crate) fn navigate(&self, key: Key) -> Navigation {
        let mut st = self.state.lock();
        let count = st.list.as_ref().map(|l| l.items().len()).unwrap_or(0);

        if count == 0 {
            st.selected = None;
            return Navigation::Nothing;
        }

        match key {
            Key::ArrowDown => {
                st.selected = Some(match st.selected {
                    Some(i) if i + 1 < count => i + 1,
                    _ => 0,
                });
                Navigation::Nothing
            }
            Key::ArrowUp => {
                st.selected = Some(match st.selected {
                    Some(i) if i > 0 && i <= count => i - 1,
                    _ => count - 1,
                });
                Navigation::Nothing
            }
            Key::Enter => match st.selected.take() {
                Some(i) if i < count => Navigation::Commit(i),
                _ if count == 1 => Navigation::Commit(0),
                _ if self.field == Field::City && !st.text.trim().is_empty() => {
                    Navigation::Submit
                }
                _ => Navigation::Nothing,
            },
            Key::Escape => Navigation::Nothing,
        }
    }
}
