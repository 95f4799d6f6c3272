//! Locale identification and normalization.

use std::fmt;
use std::str::FromStr;

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

/// Error returned when a locale string cannot be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocaleParseError {
    /// The input contained no language segment.
    #[error("locale string has no language segment: {0:?}")]
    MissingLanguage(String),
}

/// A language/country/variant tuple identifying a translation target.
///
/// The string form joins non-empty segments with `_`: `en`, `en_US`,
/// `sr_RS_latin`. Parsing also accepts `-` as separator (`en-US`), the
/// language is normalized to lowercase and the country to uppercase.
///
/// # Examples
/// ```
/// use i18n_dictionary::Locale;
///
/// let locale: Locale = "en-us".parse().unwrap();
/// assert_eq!(locale.to_string(), "en_US");
/// assert_eq!(locale.language(), "en");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Locale {
    /// Lowercase language code (e.g. "en").
    language: String,
    /// Uppercase country code (e.g. "US"), if any.
    country: Option<String>,
    /// Free-form variant (e.g. "latin"), if any.
    variant: Option<String>,
}

/// Normalize a locale code for comparison (lowercase and replace - with _).
pub(crate) fn normalize_code(code: &str) -> String {
    code.to_lowercase().replace('-', "_")
}

impl Locale {
    /// Creates a country-neutral locale for the given language code.
    #[must_use]
    pub fn new(language: &str) -> Self {
        Self { language: language.to_lowercase(), country: None, variant: None }
    }

    /// Creates a locale for the given language and country codes.
    #[must_use]
    pub fn with_country(language: &str, country: &str) -> Self {
        Self {
            language: language.to_lowercase(),
            country: Some(country.to_uppercase()),
            variant: None,
        }
    }

    /// Creates a locale for the given language, country and variant.
    #[must_use]
    pub fn with_variant(language: &str, country: &str, variant: &str) -> Self {
        Self {
            language: language.to_lowercase(),
            country: Some(country.to_uppercase()),
            variant: Some(variant.to_string()),
        }
    }

    /// Returns the lowercase language code.
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Returns the uppercase country code, if any.
    #[must_use]
    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    /// Returns the variant, if any.
    #[must_use]
    pub fn variant(&self) -> Option<&str> {
        self.variant.as_deref()
    }

    /// Checks whether both locales share the same language code.
    #[must_use]
    pub fn matches_language(&self, other: &Self) -> bool {
        self.language == other.language
    }
}

impl FromStr for Locale {
    type Err = LocaleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize_code(s.trim());
        let mut segments = normalized.split('_').filter(|segment| !segment.is_empty());

        let Some(language) = segments.next() else {
            return Err(LocaleParseError::MissingLanguage(s.to_string()));
        };
        let country = segments.next().map(str::to_uppercase);
        // Remaining segments all belong to the variant ("sr_RS_latin_x" -> "latin_x")
        let variant: Vec<&str> = segments.collect();
        let variant = if variant.is_empty() { None } else { Some(variant.join("_")) };

        Ok(Self { language: language.to_string(), country, variant })
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.language)?;
        if let Some(country) = &self.country {
            write!(f, "_{country}")?;
        }
        if let Some(variant) = &self.variant {
            write!(f, "_{variant}")?;
        }
        Ok(())
    }
}

impl TryFrom<String> for Locale {
    type Error = LocaleParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> Self {
        locale.to_string()
    }
}
