//! 保存先の統合テスト
//!
//! JsonStoreとMemoryStoreが同じ振る舞いをすることを確認

use becas_common::{comparison_records, reconcile, MatchKind, Record, Thresholds};
use becas_recon::config::{Config, StorageBackend};
use becas_recon::storage::{open_store, JsonStore, MemoryStore, RecordStore, SessionLog, SessionStatus};
use tempfile::tempdir;

fn exercise(store: &mut dyn RecordStore) {
    let pronabec = vec![Record::new("Beca 18", "PRONABEC"), Record::new("Beca Perú", "PRONABEC")];
    assert_eq!(store.store_candidates("PRONABEC", &pronabec).unwrap(), 2);
    // 同じ(名前, 機関)は保存しない
    assert_eq!(store.store_candidates("PRONABEC", &pronabec).unwrap(), 0);
    assert_eq!(
        store.store_candidates("BCP", &[Record::new("Beca BCP", "Banco de Crédito del Perú (BCP)")]).unwrap(),
        1
    );

    assert_eq!(store.all_candidates().len(), 3);
    assert_eq!(store.candidates_by_source("pronabec").len(), 2);

    let baseline = vec![Record::new("Beca 18", "PRONABEC"), Record::new("Beca Permanencia", "PRONABEC")];
    store.replace_baseline(&baseline).unwrap();
    store.replace_baseline(&baseline).unwrap();
    assert_eq!(store.baseline(), baseline);

    let result = reconcile(&store.all_candidates(), &store.baseline(), &Thresholds::default());
    store.replace_comparisons(&comparison_records(&result)).unwrap();
    let comparisons = store.comparisons();
    assert_eq!(comparisons[0].candidate_name, "Beca 18");
    assert_eq!(comparisons[0].candidate_source, "PRONABEC");
    assert_eq!(comparisons[0].match_kind, MatchKind::Exact);

    store.log_session(SessionLog::new("PRONABEC", SessionStatus::Success)).unwrap();
    store.log_session(SessionLog::new("BCP", SessionStatus::Error)).unwrap();

    let stats = store.stats();
    assert_eq!(stats.total_candidates, 3);
    assert_eq!(stats.total_baseline, 2);
    assert_eq!(stats.total_comparisons, comparisons.len());
    assert_eq!(stats.by_source.get("PRONABEC"), Some(&2));
    assert_eq!(stats.by_source.get("BCP"), Some(&1));
    assert_eq!(stats.recent_sessions[0].source, "BCP");
}

#[test]
fn test_memory_store() {
    let mut store = MemoryStore::new();
    exercise(&mut store);
}

#[test]
fn test_json_store() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut store = JsonStore::open(dir.path()).unwrap();
    exercise(&mut store);
}

/// 開き直しても内容が残る
#[test]
fn test_json_store_persists() {
    let dir = tempdir().expect("Failed to create temp dir");
    {
        let mut store = JsonStore::open(dir.path()).unwrap();
        exercise(&mut store);
    }

    let store = JsonStore::open(dir.path()).unwrap();
    let stats = store.stats();
    assert_eq!(stats.total_candidates, 3);
    assert_eq!(stats.total_baseline, 2);
    assert_eq!(stats.recent_sessions.len(), 2);
    assert!(store.all_candidates().iter().all(|r| !r.scrape_timestamp.is_empty()));
}

#[test]
fn test_open_store_by_config() {
    let dir = tempdir().expect("Failed to create temp dir");
    let config = Config {
        storage: StorageBackend::Json,
        data_dir: dir.path().join("data"),
        ..Config::default()
    };

    let mut store = open_store(&config).unwrap();
    store.store_candidates("UPC", &[Record::new("Beca Talento UPC", "UPC")]).unwrap();
    assert!(dir.path().join("data").join("becas-store.json").exists());

    let reopened = open_store(&config).unwrap();
    assert_eq!(reopened.all_candidates().len(), 1);
}
