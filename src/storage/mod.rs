//! 候補・ベースライン・比較結果の保存
//!
//! ## 構成
//! - `RecordStore`: 保存先の共通インターフェース
//! - `JsonStore`: データディレクトリ内のJSONファイル
//! - `MemoryStore`: プロセス内のみ
//!
//! どちらも中身は `StoreData` で、重複判定や集計はここにまとめる。

mod json;
mod memory;

pub use json::JsonStore;
pub use memory::MemoryStore;

use crate::config::{Config, StorageBackend};
use crate::error::Result;
use becas_common::{ComparisonRecord, Record};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// 統計に含める直近セッション数
pub const RECENT_SESSIONS: usize = 10;

/// 取り込みセッションの結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Success,
    Partial,
    Error,
}

/// 取り込みセッションのログ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionLog {
    pub source: String,
    /// 取得件数（重複除去後）
    pub found: usize,
    /// 新規に保存した件数
    pub inserted: usize,
    pub errors: usize,
    pub elapsed_secs: f64,
    pub status: SessionStatus,
    #[serde(default)]
    pub details: String,
    /// RFC 3339
    pub executed_at: String,
}

impl SessionLog {
    pub fn new(source: &str, status: SessionStatus) -> Self {
        Self {
            source: source.to_string(),
            found: 0,
            inserted: 0,
            errors: 0,
            elapsed_secs: 0.0,
            status,
            details: String::new(),
            executed_at: chrono::Local::now().to_rfc3339(),
        }
    }
}

/// 保存内容の統計
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StoreStats {
    pub total_candidates: usize,
    pub total_baseline: usize,
    pub total_comparisons: usize,
    pub by_source: BTreeMap<String, usize>,
    /// 新しい順
    pub recent_sessions: Vec<SessionLog>,
}

/// 保存先の共通インターフェース
pub trait RecordStore {
    /// 候補を保存し、新規に追加した件数を返す
    ///
    /// 取得元ラベルを `source` で上書きし、(名前, 機関) が既に保存済みのものは飛ばす。
    fn store_candidates(&mut self, source: &str, records: &[Record]) -> Result<usize>;

    fn all_candidates(&self) -> Vec<Record>;

    /// 取得元ラベルで絞り込んだ候補（大文字小文字は区別しない）
    fn candidates_by_source(&self, source: &str) -> Vec<Record>;

    /// ベースラインを丸ごと入れ替える
    fn replace_baseline(&mut self, records: &[Record]) -> Result<()>;

    fn baseline(&self) -> Vec<Record>;

    /// 比較結果を丸ごと入れ替える
    fn replace_comparisons(&mut self, comparisons: &[ComparisonRecord]) -> Result<()>;

    fn comparisons(&self) -> Vec<ComparisonRecord>;

    fn log_session(&mut self, log: SessionLog) -> Result<()>;

    fn stats(&self) -> StoreStats;
}

/// 設定に従って保存先を開く
pub fn open_store(config: &Config) -> Result<Box<dyn RecordStore>> {
    match config.storage {
        StorageBackend::Json => Ok(Box::new(JsonStore::open(&config.data_dir)?)),
        StorageBackend::Memory => Ok(Box::new(MemoryStore::new())),
    }
}

/// 保存データ本体
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct StoreData {
    /// バージョン（互換性チェック用）
    pub version: u32,
    pub candidates: Vec<Record>,
    pub baseline: Vec<Record>,
    pub comparisons: Vec<ComparisonRecord>,
    pub sessions: Vec<SessionLog>,
}

impl StoreData {
    pub const CURRENT_VERSION: u32 = 1;

    pub fn insert_candidates(&mut self, source: &str, records: &[Record]) -> usize {
        let mut seen: HashSet<(String, String)> = self
            .candidates
            .iter()
            .map(|r| (r.name.clone(), r.institution.clone()))
            .collect();

        let now = chrono::Local::now().to_rfc3339();
        let mut inserted = 0;
        for record in records {
            if !seen.insert((record.name.clone(), record.institution.clone())) {
                continue;
            }
            let mut record = record.clone();
            record.source_label = source.to_string();
            if record.scrape_timestamp.is_empty() {
                record.scrape_timestamp = now.clone();
            }
            self.candidates.push(record);
            inserted += 1;
        }
        inserted
    }

    pub fn by_source(&self, source: &str) -> Vec<Record> {
        self.candidates
            .iter()
            .filter(|r| r.source_label.eq_ignore_ascii_case(source))
            .cloned()
            .collect()
    }

    pub fn stats(&self) -> StoreStats {
        let mut by_source = BTreeMap::new();
        for record in &self.candidates {
            *by_source.entry(record.source_label.clone()).or_insert(0) += 1;
        }

        StoreStats {
            total_candidates: self.candidates.len(),
            total_baseline: self.baseline.len(),
            total_comparisons: self.comparisons.len(),
            by_source,
            recent_sessions: self.sessions.iter().rev().take(RECENT_SESSIONS).cloned().collect(),
        }
    }
}

impl Default for StoreData {
    fn default() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            candidates: Vec::new(),
            baseline: Vec::new(),
            comparisons: Vec::new(),
            sessions: Vec::new(),
        }
    }
}
