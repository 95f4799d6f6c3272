//! Locale-fit ranking used to resolve the best translation candidate.

use crate::locale::Locale;
use crate::store::record::{
    Record,
    TranslationInfo,
};

/// How well a candidate locale fits a requested locale.
///
/// Variants are ordered from worst to best fit, so candidates can be ranked
/// with the derived `Ord`. A request for `en_US` prefers an exact `en_US`
/// candidate, then a country-neutral `en` one, then `en_GB`, and only then
/// gives up on the language. Ties are always broken by insertion order
/// (earliest candidate wins), which callers get by replacing the running
/// best only on a strictly greater fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LocaleFit {
    /// Language codes differ.
    None,
    /// Same language, but the candidate targets a different country.
    OtherCountry,
    /// Same language, candidate is country-neutral.
    Language,
    /// Language and country match, variants differ.
    Country,
    /// Language, country and variant all match.
    Exact,
}

/// Ranks how well `candidate` fits the requested `target` locale.
#[must_use]
pub fn locale_fit(candidate: &Locale, target: &Locale) -> LocaleFit {
    if candidate.language() != target.language() {
        LocaleFit::None
    } else if candidate.country() == target.country() {
        if candidate.variant() == target.variant() { LocaleFit::Exact } else { LocaleFit::Country }
    } else if candidate.country().is_none() {
        LocaleFit::Language
    } else {
        LocaleFit::OtherCountry
    }
}

/// Ranks a record by its best-fitting value for the requested locale.
#[must_use]
pub fn record_fit(record: &Record, target: &Locale) -> LocaleFit {
    record
        .values()
        .iter()
        .map(|value| locale_fit(value.locale(), target))
        .max()
        .unwrap_or(LocaleFit::None)
}

/// Ranks translation metadata against the requested locale.
#[must_use]
pub fn translation_fit(info: &TranslationInfo, target: &Locale) -> LocaleFit {
    locale_fit(info.locale(), target)
}
