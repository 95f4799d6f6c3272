//! 辞書ツリーの一括読み込みとロケール解決に関する統合テスト

#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]
#![allow(missing_docs)]

use std::collections::HashSet;

use i18n_dictionary::{
    Dictionary,
    DictionaryArena,
    Locale,
    Record,
    Value,
    input,
};
use pretty_assertions::assert_eq;

/// Application-shaped document: a prefixed root, two nested dictionaries,
/// locale-partitioned records and explicit translation metadata.
const DOCUMENT: &str = r#"{
  "name": "Application",
  "prefix": "app",
  "records": [
    {
      "key": "title",
      "values": [
        { "locale": "en", "text": "Settings" },
        { "locale": "de", "text": "Einstellungen" }
      ]
    }
  ],
  "dictionaries": [
    {
      "prefix": "menu",
      "records": [
        { "key": "open", "values": [{ "locale": "en_US", "text": "Open (US)" }] },
        { "key": "open", "values": [{ "locale": "en", "text": "Open" }] },
        { "key": "open", "values": [{ "locale": "de", "text": "Öffnen" }] },
        {
          "key": "exit",
          "values": [
            { "locale": "en", "text": "Exit" },
            { "locale": "de", "text": "Beenden" }
          ]
        }
      ]
    },
    {
      "prefix": "dialogs",
      "records": [
        { "key": "confirm", "values": [{ "locale": "en", "text": "Confirm" }] },
        { "key": "confirm", "values": [{ "locale": "de", "text": "Bestätigen" }] }
      ]
    }
  ],
  "translations": [
    { "locale": "en", "name": "English", "source": "team" },
    { "locale": "de", "name": "Deutsch", "source": "team" }
  ]
}"#;

fn load() -> (DictionaryArena, Dictionary) {
    let arena = DictionaryArena::new();
    let dictionary = input::load_str(&arena, DOCUMENT).unwrap();
    (arena, dictionary)
}

fn text(dictionary: &Dictionary, key: &str, locale: &Locale) -> Option<String> {
    let record = dictionary.record(key, locale)?;
    let value = record.value(locale)?;
    Some(value.text().to_string())
}

#[test]
fn test_bulk_loaded_tree_resolves_across_levels() {
    let (_arena, root) = load();

    assert_eq!(text(&root, "app.title", &Locale::new("de")), Some("Einstellungen".to_string()));
    assert_eq!(text(&root, "app.menu.exit", &Locale::new("en")), Some("Exit".to_string()));
    assert_eq!(
        text(&root, "app.dialogs.confirm", &Locale::new("de")),
        Some("Bestätigen".to_string())
    );

    // Keys without the prefix chain resolve to nothing
    assert_eq!(text(&root, "menu.exit", &Locale::new("en")), None);
    assert_eq!(text(&root, "app.menu.missing", &Locale::new("en")), None);
}

#[test]
fn test_locale_fallback_across_partitioned_records() {
    let (_arena, root) = load();

    // Exact match wins
    assert_eq!(
        text(&root, "app.menu.open", &Locale::with_country("en", "US")),
        Some("Open (US)".to_string())
    );
    // en_GB has no exact record; the country-neutral "en" one wins over "en_US"
    assert_eq!(
        text(&root, "app.menu.open", &Locale::with_country("en", "GB")),
        Some("Open".to_string())
    );
    assert_eq!(text(&root, "app.menu.open", &Locale::new("de")), Some("Öffnen".to_string()));
}

#[test]
fn test_keys_are_fully_qualified() {
    let (_arena, root) = load();

    let expected: HashSet<String> =
        ["app.title", "app.menu.open", "app.menu.exit", "app.dialogs.confirm"]
            .iter()
            .map(ToString::to_string)
            .collect();

    assert_eq!(root.keys(), expected);
}

#[test]
fn test_supported_locales_reflect_partial_coverage() {
    let (arena, root) = load();

    // Every key covers "en" and "de"
    let supported: HashSet<String> =
        root.supported_locales().iter().map(ToString::to_string).collect();
    assert!(supported.contains("en"));
    assert!(supported.contains("en_US"));
    assert!(supported.contains("de"));

    // A key covered only in English narrows the supported set down
    let extras = Dictionary::with_prefix(&arena, "extras");
    extras.add_record(Record::new("beta", vec![Value::new(Locale::new("en"), "Beta")]));
    root.add_child(&extras).unwrap();

    let narrowed: HashSet<String> =
        root.supported_locales().iter().map(ToString::to_string).collect();
    assert!(narrowed.contains("en"));
    assert!(!narrowed.contains("de"));
}

#[test]
fn test_translation_metadata_resolution() {
    let (_arena, root) = load();

    let info = root.translation(&Locale::with_country("de", "DE")).unwrap();
    assert_eq!(info.name(), "Deutsch");
    assert_eq!(info.source(), "team");

    // Unknown language falls back to the best of the existing candidates
    assert!(root.translation(&Locale::new("fr")).is_some());
}

#[test]
fn test_runtime_mutation_invalidates_resolutions() {
    let (_arena, root) = load();

    assert!(root.record("app.menu.exit", &Locale::new("en")).is_some());

    let menu = root
        .children()
        .into_iter()
        .find(|child| child.prefix() == Some("menu".to_string()))
        .unwrap();
    assert!(root.remove_child(&menu));

    // The cached resolution through the detached child is gone
    assert_eq!(text(&root, "app.menu.exit", &Locale::new("en")), None);
    // Unrelated subtrees are untouched
    assert_eq!(text(&root, "app.dialogs.confirm", &Locale::new("en")), Some("Confirm".to_string()));
    // The detached dictionary keeps resolving standalone
    assert_eq!(text(&menu, "menu.exit", &Locale::new("en")), Some("Exit".to_string()));
}

#[test]
fn test_concurrent_lookups_and_mutations() {
    let (_arena, root) = load();

    let mut handles = Vec::new();
    for _ in 0..4 {
        let dictionary = root.clone();
        handles.push(std::thread::spawn(move || {
            for _ in 0..200 {
                let _ = dictionary.record("app.menu.open", &Locale::with_country("en", "GB"));
                let _ = dictionary.all_locales();
                let _ = dictionary.supported_locales();
            }
        }));
    }
    let mutator = root.clone();
    handles.push(std::thread::spawn(move || {
        for round in 0..100 {
            let record =
                Record::new("scratch", vec![Value::new(Locale::new("en"), format!("v{round}"))]);
            mutator.add_record(record);
            mutator.remove_record("scratch");
        }
    }));

    for handle in handles {
        handle.join().unwrap();
    }

    assert!(root.record("app.scratch", &Locale::new("en")).is_none());
    assert_eq!(
        text(&root, "app.menu.open", &Locale::with_country("en", "GB")),
        Some("Open".to_string())
    );
}
