//! 重複レコードの除去
//!
//! 正規化した名前が同じレコードは最初の1件だけを残す。

use crate::normalize::normalize;
use crate::types::Record;
use std::collections::HashSet;

/// 正規化名ごとに最初のレコードを残す（順序は保持）
///
/// 名前が空のレコードは常に除外する。
pub fn dedupe(records: &[Record]) -> Vec<Record> {
    let mut seen: HashSet<String> = HashSet::new();

    records
        .iter()
        .filter(|record| {
            let key = normalize(&record.name);
            !key.is_empty() && seen.insert(key)
        })
        .cloned()
        .collect()
}
