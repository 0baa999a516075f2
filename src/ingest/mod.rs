//! 候補の取り込み
//!
//! ## 処理フロー
//! 1. 取得元（候補JSONファイル・組み込みカタログ）ごとにtokioタスクを起動
//! 2. 各タスクでレコードを検証し、名前の重複を除去
//! 3. 結果と失敗を `StatusHandle` に記録
//! 4. 呼び出し側が指定した順で結果を返す（保存は呼び出し側がまとめて行う）

pub mod catalog;
pub mod status;

pub use catalog::Catalog;
pub use status::{ScrapeStatus, StatusHandle, StatusSnapshot};

use crate::error::{BecasError, Result};
use crate::loader::parse_candidates;
use becas_common::{dedupe, validate_record, Record};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// 取得元
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    /// スクレイパーが出力した候補JSON
    File { label: String, path: PathBuf },
    /// 組み込みカタログ
    Catalog(Catalog),
}

impl Source {
    pub fn label(&self) -> String {
        match self {
            Source::File { label, .. } => label.clone(),
            Source::Catalog(catalog) => catalog.label().to_string(),
        }
    }

    async fn fetch(&self) -> Result<Vec<Record>> {
        match self {
            Source::File { path, .. } => {
                if !path.exists() {
                    return Err(BecasError::FileNotFound(path.display().to_string()));
                }
                let content = tokio::fs::read_to_string(path).await?;
                parse_candidates(&content)
            }
            Source::Catalog(catalog) => Ok(catalog.records()),
        }
    }
}

/// 取得元1件分の結果
#[derive(Debug, Clone)]
pub struct SourceOutcome {
    pub label: String,
    /// 検証・重複除去後のレコード
    pub records: Vec<Record>,
    /// 検証で落としたレコード数
    pub rejected: usize,
    pub error: Option<String>,
    pub elapsed: Duration,
}

impl SourceOutcome {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// 全取得元を並行に取り込む
///
/// 失敗した取得元は `error` に記録され、他の取得元は続行する。
pub async fn run_sources(sources: Vec<Source>, status: &StatusHandle) -> Vec<SourceOutcome> {
    status.start(sources.len());

    let handles: Vec<_> = sources
        .into_iter()
        .map(|source| {
            let status = status.clone();
            let label = source.label();
            (label, tokio::spawn(async move { run_source(source, status).await }))
        })
        .collect();

    let mut outcomes = Vec::with_capacity(handles.len());
    for (label, handle) in handles {
        match handle.await {
            Ok(outcome) => outcomes.push(outcome),
            Err(e) => {
                warn!(source = %label, error = %e, "取り込みタスクが異常終了しました");
                status.add_error(&label, e.to_string());
                outcomes.push(SourceOutcome {
                    label,
                    records: Vec::new(),
                    rejected: 0,
                    error: Some(e.to_string()),
                    elapsed: Duration::ZERO,
                });
            }
        }
    }

    status.finish();
    outcomes
}

async fn run_source(source: Source, status: StatusHandle) -> SourceOutcome {
    let label = source.label();
    let started = Instant::now();
    status.begin_source(&label);

    match source.fetch().await {
        Ok(records) => {
            let fetched = records.len();
            let valid: Vec<Record> = records
                .iter()
                .filter_map(|r| match validate_record(r) {
                    Ok(v) => Some(v),
                    Err(e) => {
                        debug!(source = %label, name = %r.name, error = %e, "検証エラーのため除外");
                        None
                    }
                })
                .collect();
            let rejected = fetched - valid.len();
            let unique = dedupe(&valid);

            debug!(source = %label, fetched, rejected, unique = unique.len(), "取り込み完了");
            status.add_results(&label, unique.len());

            SourceOutcome {
                label,
                records: unique,
                rejected,
                error: None,
                elapsed: started.elapsed(),
            }
        }
        Err(e) => {
            warn!(source = %label, error = %e, "取り込みに失敗しました");
            status.add_error(&label, e.to_string());

            SourceOutcome {
                label,
                records: Vec::new(),
                rejected: 0,
                error: Some(e.to_string()),
                elapsed: started.elapsed(),
            }
        }
    }
}
