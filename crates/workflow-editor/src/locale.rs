//! Translated strings for editor-generated text
//!
//! The store produces a few user-visible strings on its own: the suffix of
//! cloned conditions and the default names of nodes created from
//! materials. [`Locales`] resolves them for the active language, falling
//! back to `en-US`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Language used when no other is configured and for missing keys
pub const FALLBACK_LANG: &str = "en-US";

/// Well-known message keys
pub mod keys {
    /// Suffix appended to the name of a cloned condition
    pub const OF_COPY: &str = "ofCopy";
    /// Base name for generated condition nodes
    pub const CONDITION: &str = "condition";
    /// Name given to conditions with no rule attached
    pub const OTHER_CONDITIONS: &str = "otherConditions";
}

/// Messages of one language, keyed by message key
pub type LocaleTable = HashMap<String, String>;

/// Messages of several languages, keyed by language tag
///
/// Serializes as `{ "en-US": { "ofCopy": " (copy)" }, ... }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocaleBundle(pub HashMap<String, LocaleTable>);

impl LocaleBundle {
    /// Add or replace a single message
    pub fn insert(&mut self, lang: &str, key: &str, message: &str) {
        self.0
            .entry(lang.to_string())
            .or_default()
            .insert(key.to_string(), message.to_string());
    }
}

fn table(entries: &[(&str, &str)]) -> LocaleTable {
    entries
        .iter()
        .map(|(key, message)| (key.to_string(), message.to_string()))
        .collect()
}

/// Built-in messages for `en-US` and `zh-CN`
pub fn default_locales() -> LocaleBundle {
    let mut bundle = HashMap::new();
    bundle.insert(
        "en-US".to_string(),
        table(&[
            ("ofCopy", " (copy)"),
            ("start", "Initiator"),
            ("approver", "Approver"),
            ("notifier", "Notifier"),
            ("audit", "Handler"),
            ("route", "Route"),
            ("condition", "Condition"),
            ("otherConditions", "Other conditions"),
            ("addNode", "Add node"),
            ("addCondition", "Add condition"),
        ]),
    );
    bundle.insert(
        "zh-CN".to_string(),
        table(&[
            ("ofCopy", "-副本"),
            ("start", "发起人"),
            ("approver", "审批人"),
            ("notifier", "抄送人"),
            ("audit", "办理人"),
            ("route", "条件分支"),
            ("condition", "条件"),
            ("otherConditions", "其他情况"),
            ("addNode", "添加节点"),
            ("addCondition", "添加条件"),
        ]),
    );
    LocaleBundle(bundle)
}

/// Locale manager: active language plus message tables
#[derive(Debug, Clone)]
pub struct Locales {
    lang: String,
    tables: HashMap<String, LocaleTable>,
}

impl Locales {
    /// Create a manager for `lang` seeded with the built-in messages
    pub fn new(lang: impl Into<String>) -> Self {
        Self {
            lang: lang.into(),
            tables: default_locales().0,
        }
    }

    /// Active language tag
    pub fn lang(&self) -> &str {
        &self.lang
    }

    /// Switch the active language
    pub fn set_lang(&mut self, lang: impl Into<String>) {
        self.lang = lang.into();
    }

    /// Merge caller messages over the current ones
    ///
    /// Messages in `bundle` override existing messages with the same
    /// language and key; everything else is kept.
    pub fn register_locales(&mut self, bundle: LocaleBundle) {
        for (lang, messages) in bundle.0 {
            self.tables.entry(lang).or_default().extend(messages);
        }
    }

    /// Translate a message key
    ///
    /// Looks in the active language, then in [`FALLBACK_LANG`].
    pub fn t(&self, key: &str) -> Option<&str> {
        self.lookup(&self.lang, key)
            .or_else(|| self.lookup(FALLBACK_LANG, key))
    }

    /// Translate a message key, returning the key itself when missing
    pub fn t_or_key<'a>(&'a self, key: &'a str) -> &'a str {
        self.t(key).unwrap_or(key)
    }

    /// List the languages that have messages
    pub fn languages(&self) -> Vec<&str> {
        let mut langs: Vec<&str> = self.tables.keys().map(|s| s.as_str()).collect();
        langs.sort_unstable();
        langs
    }

    fn lookup(&self, lang: &str, key: &str) -> Option<&str> {
        self.tables
            .get(lang)
            .and_then(|messages| messages.get(key))
            .map(|s| s.as_str())
    }
}

impl Default for Locales {
    fn default() -> Self {
        Self::new(FALLBACK_LANG)
    }
}
