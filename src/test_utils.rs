//! テスト用ユーティリティ関数
//!
//! 複数のテストモジュールで使用される共通のヘルパー関数を提供します。
#![cfg(test)]
#![allow(clippy::unwrap_used)]

use crate::locale::Locale;
use crate::store::record::{
    Record,
    Value,
};

/// ロケール文字列をパースする（例: "en", "en_US"）
pub(crate) fn locale(code: &str) -> Locale {
    code.parse().unwrap()
}

/// (ロケール文字列, テキスト) のペアから Record を作成する
///
/// # Arguments
/// * `key` - ローカルキー
/// * `values` - (ロケール文字列, テキスト) のペア
///
/// # Returns
/// 作成された Record
pub(crate) fn record(key: &str, values: &[(&str, &str)]) -> Record {
    let values = values
        .iter()
        .map(|(value_locale, text)| Value::new(locale(value_locale), *text))
        .collect();
    Record::new(key, values)
}
