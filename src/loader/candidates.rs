//! 候補JSONの読み込み
//!
//! 受け付ける形:
//! - レコードの配列
//! - `data` または `becas` に配列を持つオブジェクト（APIレスポンスの保存形式）

use crate::error::{BecasError, Result};
use crate::storage::RecordStore;
use becas_common::{dedupe, Record};
use serde_json::Value;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// JSON文字列から候補レコードを取り出す
pub fn parse_candidates(content: &str) -> Result<Vec<Record>> {
    let value: Value = serde_json::from_str(content)?;

    let array = match value {
        Value::Array(_) => value,
        Value::Object(mut map) => map
            .remove("data")
            .or_else(|| map.remove("becas"))
            .ok_or_else(|| BecasError::InvalidCandidates("data/becas 配列がありません".into()))?,
        _ => {
            return Err(BecasError::InvalidCandidates("配列またはオブジェクトではありません".into()));
        }
    };

    if !array.is_array() {
        return Err(BecasError::InvalidCandidates("data/becas が配列ではありません".into()));
    }

    let records: Vec<Record> = serde_json::from_value(array)?;
    Ok(records)
}

/// 候補JSONファイルを読み込む
pub fn load_candidate_file(path: &Path) -> Result<Vec<Record>> {
    if !path.exists() {
        return Err(BecasError::FileNotFound(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path)?;
    parse_candidates(&content)
}

/// 候補JSONファイル、またはフォルダ内の候補JSONをまとめて読み込む
///
/// 取得元ラベルが空のレコードにはファイル名由来のラベルを付ける。
pub fn load_candidates(path: &Path) -> Result<Vec<Record>> {
    let mut records = Vec::new();
    for file in candidate_files(path)? {
        let label = source_label_for(&file);
        for mut record in load_candidate_file(&file)? {
            if record.source_label.trim().is_empty() {
                record.source_label = label.clone();
            }
            records.push(record);
        }
    }
    Ok(records)
}

/// 突合に使う候補を集める
///
/// パス指定時はファイルから、なければ保存先から読む。取得元ラベルで絞り込み、
/// どちらの経路でも正規化名の重複を除いてから返す。
pub fn select_candidates(store: &dyn RecordStore, path: Option<&Path>, source: Option<&str>) -> Result<Vec<Record>> {
    let records = match path {
        Some(path) => load_candidates(path)?
            .into_iter()
            .filter(|r| source.map_or(true, |s| r.source_label.eq_ignore_ascii_case(s)))
            .collect(),
        None => match source {
            Some(source) => store.candidates_by_source(source),
            None => store.all_candidates(),
        },
    };
    Ok(dedupe(&records))
}

/// 引数のパスを候補ファイル一覧に展開する
///
/// ファイルはそのまま、フォルダは直下の `*.json` をファイル名順で返す。
pub fn candidate_files(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.exists() {
        return Err(BecasError::FolderNotFound(path.display().to_string()));
    }

    let mut files: Vec<PathBuf> = WalkDir::new(path)
        .max_depth(1)  // 直下のみ
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| p.is_file())
        .filter(|p| {
            p.extension()
                .map(|ext| ext.eq_ignore_ascii_case("json"))
                .unwrap_or(false)
        })
        .collect();

    files.sort();
    Ok(files)
}

/// ファイル名から取得元ラベルを作る（例: pronabec.json → PRONABEC）
pub fn source_label_for(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_uppercase())
        .unwrap_or_else(|| "DESCONOCIDO".to_string())
}
