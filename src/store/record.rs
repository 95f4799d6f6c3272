//! Translation records, localized values and translation metadata.

use serde::{
    Deserialize,
    Serialize,
};

use crate::locale::Locale;
use crate::store::fit;

/// One localized string bound to a single [`Locale`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Value {
    /// Locale this text is written in.
    locale: Locale,
    /// Localized text payload.
    text: String,
}

impl Value {
    /// Creates a new localized value.
    #[must_use]
    pub fn new(locale: Locale, text: impl Into<String>) -> Self {
        Self { locale, text: text.into() }
    }

    /// Returns the locale of this value.
    #[must_use]
    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    /// Returns the localized text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// A named, locale-partitioned translation unit.
///
/// A record's key is local to the dictionary that owns it; the dictionary
/// prefix chain turns it into a fully-qualified key. The same key may be
/// carried by several records when translations for it are spread across
/// locale-partitioned records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Non-prefixed key, local to the owning dictionary.
    key: String,
    /// Localized values, in insertion order.
    #[serde(default)]
    values: Vec<Value>,
}

impl Record {
    /// Creates a new record with the given local key and values.
    #[must_use]
    pub fn new(key: impl Into<String>, values: Vec<Value>) -> Self {
        Self { key: key.into(), values }
    }

    /// Returns the local (non-prefixed) key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns all values of this record, in insertion order.
    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Appends another localized value.
    pub fn add_value(&mut self, value: Value) {
        self.values.push(value);
    }

    /// Returns the value that fits the requested locale best.
    ///
    /// Candidates are ranked with the locale-fit comparator; on equal fit
    /// the earliest-inserted value wins. Returns `None` only for a record
    /// without any values.
    #[must_use]
    pub fn value(&self, locale: &Locale) -> Option<&Value> {
        let mut best: Option<(&Value, fit::LocaleFit)> = None;
        for value in &self.values {
            let value_fit = fit::locale_fit(value.locale(), locale);
            if best.is_none_or(|(_, best_fit)| value_fit > best_fit) {
                best = Some((value, value_fit));
            }
        }
        best.map(|(value, _)| value)
    }

    /// Appends the locale of every value into `locales`, in value order.
    pub(crate) fn collect_locales(&self, locales: &mut Vec<Locale>) {
        for value in &self.values {
            locales.push(value.locale().clone());
        }
    }

    /// Checks whether any value covers the given language code.
    #[must_use]
    pub fn has_language(&self, language: &str) -> bool {
        self.values.iter().any(|value| value.locale().language() == language)
    }
}

/// Metadata describing one available translation of a dictionary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationInfo {
    /// Locale the translation targets.
    locale: Locale,
    /// Human-readable translation name.
    name: String,
    /// Origin of the translation (author, project, ...).
    source: String,
}

impl TranslationInfo {
    /// Creates new translation metadata.
    #[must_use]
    pub fn new(locale: Locale, name: impl Into<String>, source: impl Into<String>) -> Self {
        Self { locale, name: name.into(), source: source.into() }
    }

    /// Returns the locale the translation targets.
    #[must_use]
    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    /// Returns the human-readable translation name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the origin of the translation.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }
}
