//! Conversation context: recent exchanges, the current topic and the
//! capitalized names mentioned along the way.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, VecDeque};
use std::sync::OnceLock;

/// Exchanges kept in history
pub const HISTORY_LIMIT: usize = 20;

/// Exchanges included in the prompt summary
pub const SUMMARY_EXCHANGES: usize = 3;

/// Response characters kept per summary line
const SUMMARY_RESPONSE_CHARS: usize = 150;

/// Topic categories, checked in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intent {
    Files,
    System,
    Email,
    Weather,
    Code,
    General,
}

const TOPIC_KEYWORDS: &[(Intent, &[&str])] = &[
    (
        Intent::Files,
        &["súbor", "zložk", "priečin", "pdf", "dokument"],
    ),
    (
        Intent::System,
        &["systém", "batéri", "pamäť", "cpu", "proces", "disk", "sieť"],
    ),
    (Intent::Email, &["email", "e-mail", "gmail", "pošt", "správ"]),
    (
        Intent::Weather,
        &["počasie", "teplot", "predpoveď", "dážď", "vlhkosť"],
    ),
    (
        Intent::Code,
        &["kód", "program", "python", "rust", "funkci", "chyba v"],
    ),
];

impl Intent {
    /// First topic with a keyword contained in `text`.
    pub fn classify(text: &str) -> Intent {
        let lower = text.to_lowercase();
        TOPIC_KEYWORDS
            .iter()
            .find(|(_, words)| words.iter().any(|w| lower.contains(w)))
            .map(|(intent, _)| *intent)
            .unwrap_or(Intent::General)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Intent::Files => "súbory",
            Intent::System => "systém",
            Intent::Email => "email",
            Intent::Weather => "počasie",
            Intent::Code => "kód",
            Intent::General => "všeobecné",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exchange {
    pub user: String,
    pub response: String,
    pub timestamp: DateTime<Utc>,
    pub intent: Intent,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversationContext {
    history: VecDeque<Exchange>,
    current_topic: Option<Intent>,
    entities: BTreeSet<String>,
}

impl ConversationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an exchange, dropping the oldest beyond [`HISTORY_LIMIT`].
    pub fn record(&mut self, user: impl Into<String>, response: impl Into<String>) -> Intent {
        let user = user.into();
        let intent = Intent::classify(&user);
        if intent != Intent::General {
            self.current_topic = Some(intent);
        }
        self.entities.extend(extract_entities(&user));

        self.history.push_back(Exchange {
            user,
            response: response.into(),
            timestamp: Utc::now(),
            intent,
        });
        while self.history.len() > HISTORY_LIMIT {
            self.history.pop_front();
        }
        intent
    }

    pub fn history(&self) -> impl Iterator<Item = &Exchange> {
        self.history.iter()
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn current_topic(&self) -> Option<Intent> {
        self.current_topic
    }

    pub fn entities(&self) -> &BTreeSet<String> {
        &self.entities
    }

    /// The last few exchanges as prompt text; empty when there is no history.
    pub fn summary(&self) -> String {
        let skip = self.history.len().saturating_sub(SUMMARY_EXCHANGES);
        let mut out = String::new();
        for ex in self.history.iter().skip(skip) {
            out.push_str(&format!(
                "Používateľ: {}\nAsistent: {}\n",
                ex.user,
                truncate_chars(&ex.response, SUMMARY_RESPONSE_CHARS)
            ));
        }
        if let Some(topic) = self.current_topic {
            if !out.is_empty() {
                out.push_str(&format!("Aktuálna téma: {}\n", topic.label()));
            }
        }
        out
    }

    pub fn clear(&mut self) {
        self.history.clear();
        self.current_topic = None;
        self.entities.clear();
    }
}

fn entity_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b\p{Lu}[\p{L}\p{N}]+").expect("valid entity regex"))
}

/// Capitalized words of two or more characters.
pub fn extract_entities(text: &str) -> Vec<String> {
    entity_regex()
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

fn truncate_chars(text: &str, max: usize) -> String {
    let single_line = text.replace('\n', " ");
    if single_line.chars().count() <= max {
        single_line
    } else {
        let cut: String = single_line.chars().take(max).collect();
        format!("{}…", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_is_capped_in_order() {
        let mut ctx = ConversationContext::new();
        for i in 0..25 {
            ctx.record(format!("príkaz {}", i), format!("odpoveď {}", i));
        }

        assert_eq!(ctx.len(), HISTORY_LIMIT);
        let users: Vec<_> = ctx.history().map(|e| e.user.clone()).collect();
        let expected: Vec<_> = (5..25).map(|i| format!("príkaz {}", i)).collect();
        assert_eq!(users, expected);
    }

    #[test]
    fn test_classify_first_topic_wins() {
        assert_eq!(Intent::classify("Aké je POČASIE?"), Intent::Weather);
        // "súbor" (files) is listed before "kód" (code)
        assert_eq!(Intent::classify("analyzuj kód v súbore"), Intent::Files);
        assert_eq!(Intent::classify("ahoj"), Intent::General);
    }

    #[test]
    fn test_topic_survives_general_exchange() {
        let mut ctx = ConversationContext::new();
        ctx.record("stav batérie", "80%");
        ctx.record("ďakujem", "Nemáš za čo");
        assert_eq!(ctx.current_topic(), Some(Intent::System));
    }

    #[test]
    fn test_entities_are_capitalized_words() {
        let mut ctx = ConversationContext::new();
        ctx.record("počasie v Košiciach a Žiline", "…");
        ctx.record("Pošli to Jane", "…");

        let entities: Vec<_> = ctx.entities().iter().cloned().collect();
        assert!(entities.contains(&"Košiciach".to_string()));
        assert!(entities.contains(&"Žiline".to_string()));
        assert!(entities.contains(&"Jane".to_string()));
        assert!(!entities.contains(&"v".to_string()));
    }

    #[test]
    fn test_entities_outlive_history() {
        let mut ctx = ConversationContext::new();
        ctx.record("Bratislava", "ok");
        for i in 0..HISTORY_LIMIT {
            ctx.record(format!("x{}", i), "ok");
        }
        assert!(ctx.entities().contains("Bratislava"));
    }

    #[test]
    fn test_summary_uses_last_three() {
        let mut ctx = ConversationContext::new();
        assert!(ctx.summary().is_empty());

        for i in 0..5 {
            ctx.record(format!("otázka {}", i), format!("odpoveď {}", i));
        }
        let summary = ctx.summary();
        assert!(!summary.contains("otázka 1"));
        assert!(summary.contains("otázka 2"));
        assert!(summary.contains("otázka 4"));
        assert_eq!(summary.matches("Používateľ:").count(), 3);
    }

    #[test]
    fn test_summary_truncates_long_responses() {
        let mut ctx = ConversationContext::new();
        ctx.record("ahoj", "a".repeat(400));
        let line = ctx
            .summary()
            .lines()
            .find(|l| l.starts_with("Asistent:"))
            .unwrap()
            .to_string();
        assert!(line.ends_with('…'));
        assert!(line.chars().count() < 200);
    }
}
