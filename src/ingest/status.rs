//! 取り込みの進捗状態
//!
//! 各取り込みタスクは `StatusHandle` の複製を持ち、同じ `ScrapeStatus` を更新する。

use chrono::{DateTime, Local};
use indicatif::ProgressBar;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// 取得元ごとのエラー
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceError {
    pub source: String,
    pub message: String,
    /// RFC 3339
    pub timestamp: String,
}

/// 取得件数の集計
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScrapeResults {
    pub total_scraped: usize,
    pub by_source: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Default)]
pub struct ScrapeStatus {
    pub is_running: bool,
    pub current_source: String,
    /// 0〜100
    pub progress: u8,
    pub total_sources: usize,
    pub completed_sources: usize,
    pub started_at: Option<DateTime<Local>>,
    pub errors: Vec<SourceError>,
    pub results: ScrapeResults,
}

/// ある時点の状態（経過時間付き）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusSnapshot {
    pub is_running: bool,
    pub current_source: String,
    pub progress: u8,
    pub total_sources: usize,
    pub completed_sources: usize,
    pub started_at: Option<String>,
    pub elapsed_secs: Option<f64>,
    pub errors: Vec<SourceError>,
    pub results: ScrapeResults,
}

impl ScrapeStatus {
    fn complete_one(&mut self) {
        self.completed_sources += 1;
        if self.total_sources > 0 {
            let pct = self.completed_sources * 100 / self.total_sources;
            self.progress = pct.min(100) as u8;
        }
    }
}

/// 共有状態へのハンドル
#[derive(Clone, Default)]
pub struct StatusHandle {
    inner: Arc<Mutex<ScrapeStatus>>,
    progress_bar: Option<ProgressBar>,
}

impl StatusHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// 進捗バーを連動させる
    pub fn with_progress(progress_bar: ProgressBar) -> Self {
        Self {
            inner: Arc::default(),
            progress_bar: Some(progress_bar),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ScrapeStatus> {
        // タスクがパニックしても状態は読めるようにする
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// 取り込み開始（前回の状態は捨てる）
    pub fn start(&self, total_sources: usize) {
        *self.lock() = ScrapeStatus {
            is_running: true,
            total_sources,
            started_at: Some(Local::now()),
            ..ScrapeStatus::default()
        };
        if let Some(pb) = &self.progress_bar {
            pb.set_length(total_sources as u64);
            pb.set_position(0);
        }
    }

    pub fn begin_source(&self, source: &str) {
        self.lock().current_source = source.to_string();
        if let Some(pb) = &self.progress_bar {
            pb.set_message(source.to_string());
        }
    }

    pub fn add_results(&self, source: &str, count: usize) {
        {
            let mut status = self.lock();
            *status.results.by_source.entry(source.to_string()).or_insert(0) += count;
            status.results.total_scraped += count;
            status.complete_one();
        }
        self.tick();
    }

    pub fn add_error(&self, source: &str, message: impl Into<String>) {
        {
            let mut status = self.lock();
            status.errors.push(SourceError {
                source: source.to_string(),
                message: message.into(),
                timestamp: Local::now().to_rfc3339(),
            });
            status.complete_one();
        }
        self.tick();
    }

    pub fn finish(&self) {
        let mut status = self.lock();
        status.is_running = false;
        status.current_source.clear();
        status.progress = 100;
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        let status = self.lock().clone();
        let elapsed_secs = status
            .started_at
            .map(|t| (Local::now() - t).num_milliseconds() as f64 / 1000.0);

        StatusSnapshot {
            is_running: status.is_running,
            current_source: status.current_source,
            progress: status.progress,
            total_sources: status.total_sources,
            completed_sources: status.completed_sources,
            started_at: status.started_at.map(|t| t.to_rfc3339()),
            elapsed_secs,
            errors: status.errors,
            results: status.results,
        }
    }

    fn tick(&self) {
        if let Some(pb) = &self.progress_bar {
            pb.inc(1);
        }
    }
}
