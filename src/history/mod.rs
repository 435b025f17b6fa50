//! # Exchange history
//!
//! Keeps the most recent request/response exchanges of a run so the report
//! can show what actually went over the wire.

use std::collections::VecDeque;

use serde::Serialize;

use crate::http::method::HttpMethod;

/// Maximum number of exchanges to retain.
const MAX_HISTORY_ENTRIES: usize = 100;

/// A single exchange: the request line and its outcome.
#[derive(Debug, Clone, Serialize)]
pub struct ExchangeEntry {
    pub timestamp: u64,
    pub method: HttpMethod,
    pub url: String,
    pub status: Option<u16>,
    pub content_type: Option<String>,
    pub duration_ms: Option<u128>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct History {
    entries: VecDeque<ExchangeEntry>,
}

impl History {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::new(),
        }
    }

    /// Append an entry, evicting the oldest one once the limit is reached.
    pub fn push(&mut self, entry: ExchangeEntry) {
        if self.entries.len() >= MAX_HISTORY_ENTRIES {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> &VecDeque<ExchangeEntry> {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Hand the recorded entries over, leaving the history empty.
    pub fn drain(&mut self) -> Vec<ExchangeEntry> {
        self.entries.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_entry(url: &str) -> ExchangeEntry {
        ExchangeEntry {
            timestamp: 0,
            method: HttpMethod::Get,
            url: url.to_string(),
            status: Some(200),
            content_type: Some("application/json".to_string()),
            duration_ms: Some(1),
            error: None,
        }
    }

    #[test]
    fn push_keeps_order() {
        let mut history = History::new();
        history.push(make_entry("/pet"));
        history.push(make_entry("/pet/1"));

        assert_eq!(history.len(), 2);
        assert_eq!(history.entries()[0].url, "/pet");
        assert_eq!(history.entries()[1].url, "/pet/1");
    }

    #[test]
    fn evicts_oldest_beyond_limit() {
        let mut history = History::new();
        for i in 0..MAX_HISTORY_ENTRIES + 5 {
            history.push(make_entry(&format!("/pet/{i}")));
        }

        assert_eq!(history.len(), MAX_HISTORY_ENTRIES);
        assert_eq!(history.entries()[0].url, "/pet/5");
    }

    #[test]
    fn drain_empties_history() {
        let mut history = History::new();
        history.push(make_entry("/pet"));

        let drained = history.drain();
        assert_eq!(drained.len(), 1);
        assert!(history.is_empty());
    }
}
