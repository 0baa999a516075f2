//! JSONファイルによる保存先
//!
//! データディレクトリ直下の `becas-store.json` に全件を保持し、
//! 変更のたびに書き直す。

use super::{RecordStore, SessionLog, StoreData, StoreStats};
use crate::error::{BecasError, Result};
use becas_common::{ComparisonRecord, Record};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const STORE_FILE_NAME: &str = "becas-store.json";

#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    data: StoreData,
}

impl JsonStore {
    /// データディレクトリの保存ファイルを開く（なければ空で作る）
    ///
    /// 項目が欠けていても既定値で補う。壊れたファイルやバージョン違いは
    /// 上書きせずにエラーにする。
    pub fn open(data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)?;
        let path = data_dir.join(STORE_FILE_NAME);

        if !path.exists() {
            debug!(path = %path.display(), "保存ファイルがないため新規作成します");
            return Ok(Self {
                path,
                data: StoreData::default(),
            });
        }

        let reader = BufReader::new(File::open(&path)?);
        let data: StoreData = serde_json::from_reader(reader).map_err(|e| {
            warn!(path = %path.display(), error = %e, "保存ファイルを読み込めません");
            BecasError::Storage(format!("{}: {}", path.display(), e))
        })?;

        if data.version != StoreData::CURRENT_VERSION {
            return Err(BecasError::Storage(format!(
                "保存ファイルのバージョンが違います: {} (対応: {})",
                data.version,
                StoreData::CURRENT_VERSION
            )));
        }

        debug!(
            path = %path.display(),
            candidates = data.candidates.len(),
            baseline = data.baseline.len(),
            "保存ファイルを読み込みました"
        );
        Ok(Self { path, data })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<()> {
        let writer = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer_pretty(writer, &self.data)?;
        Ok(())
    }
}

impl RecordStore for JsonStore {
    fn store_candidates(&mut self, source: &str, records: &[Record]) -> Result<usize> {
        let inserted = self.data.insert_candidates(source, records);
        if inserted > 0 {
            self.save()?;
        }
        Ok(inserted)
    }

    fn all_candidates(&self) -> Vec<Record> {
        self.data.candidates.clone()
    }

    fn candidates_by_source(&self, source: &str) -> Vec<Record> {
        self.data.by_source(source)
    }

    fn replace_baseline(&mut self, records: &[Record]) -> Result<()> {
        self.data.baseline = records.to_vec();
        self.save()
    }

    fn baseline(&self) -> Vec<Record> {
        self.data.baseline.clone()
    }

    fn replace_comparisons(&mut self, comparisons: &[ComparisonRecord]) -> Result<()> {
        self.data.comparisons = comparisons.to_vec();
        self.save()
    }

    fn comparisons(&self) -> Vec<ComparisonRecord> {
        self.data.comparisons.clone()
    }

    fn log_session(&mut self, log: SessionLog) -> Result<()> {
        self.data.sessions.push(log);
        self.save()
    }

    fn stats(&self) -> StoreStats {
        self.data.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_open_empty_dir() {
        let dir = tempdir().unwrap();
        let store = JsonStore::open(dir.path()).unwrap();
        assert_eq!(store.stats().total_candidates, 0);
        // 変更するまでファイルは作らない
        assert!(!store.path().exists());
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(STORE_FILE_NAME),
            r#"{"version": 1, "baseline": [{"nombre_beca": "Beca 18"}]}"#,
        )
        .unwrap();

        let store = JsonStore::open(dir.path()).unwrap();
        assert_eq!(store.baseline().len(), 1);
        assert!(store.all_candidates().is_empty());
    }

    #[test]
    fn test_corrupted_file_is_error() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(STORE_FILE_NAME), "{ not json").unwrap();
        assert!(matches!(JsonStore::open(dir.path()), Err(BecasError::Storage(_))));
    }

    #[test]
    fn test_version_mismatch_is_error() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(STORE_FILE_NAME), r#"{"version": 99}"#).unwrap();
        assert!(matches!(JsonStore::open(dir.path()), Err(BecasError::Storage(_))));
    }
}
