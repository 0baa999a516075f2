//! 取り込みの統合テスト
//!
//! 候補JSONとカタログを並行に取り込み、保存先へ書き込むまで

use becas_recon::ingest::{run_sources, Catalog, Source, StatusHandle};
use becas_recon::storage::{MemoryStore, RecordStore};
use tempfile::tempdir;

#[tokio::test]
async fn test_files_and_catalogs() {
    let dir = tempdir().expect("Failed to create temp dir");
    let bcp = dir.path().join("bcp.json");
    std::fs::write(
        &bcp,
        r#"{"source": "BCP", "data": [
            {"nombre_beca": "Beca BCP", "institucion": "BCP"},
            {"nombre_beca": "beca bcp", "institucion": "BCP"},
            {"nombre_beca": "BECA BCP", "institucion": "BCP"},
            {"nombre_beca": "Sin institución"}
        ]}"#,
    )
    .unwrap();
    let broken = dir.path().join("upc.json");
    std::fs::write(&broken, "{ broken").unwrap();

    let sources = vec![
        Source::File { label: "BCP".into(), path: bcp },
        Source::File { label: "UPC".into(), path: broken },
        Source::Catalog(Catalog::Pronabec),
    ];

    let status = StatusHandle::new();
    let outcomes = run_sources(sources, &status).await;
    assert_eq!(outcomes.len(), 3);

    // 検証エラー1件を除き、名前の重複は最初の1件だけ残る
    assert_eq!(outcomes[0].label, "BCP");
    assert_eq!(outcomes[0].records.len(), 1);
    assert_eq!(outcomes[0].records[0].name, "Beca BCP");
    assert_eq!(outcomes[0].rejected, 1);

    // 壊れたファイルは他の取得元を止めない
    assert!(outcomes[1].error.is_some());
    assert_eq!(outcomes[2].records.len(), 3);

    let snap = status.snapshot();
    assert_eq!(snap.total_sources, 3);
    assert_eq!(snap.completed_sources, 3);
    assert_eq!(snap.results.total_scraped, 4);
    assert_eq!(snap.errors.len(), 1);
    assert_eq!(snap.errors[0].source, "UPC");

    let mut store = MemoryStore::new();
    for outcome in outcomes.iter().filter(|o| o.is_ok()) {
        store.store_candidates(&outcome.label, &outcome.records).unwrap();
    }
    let stats = store.stats();
    assert_eq!(stats.total_candidates, 4);
    assert_eq!(stats.by_source.get("PRONABEC"), Some(&3));
}

/// 同じカタログを2回取り込んでも保存は1回分
#[tokio::test]
async fn test_repeated_catalog_ingest() {
    let mut store = MemoryStore::new();

    for _ in 0..2 {
        let status = StatusHandle::new();
        let outcomes = run_sources(vec![Source::Catalog(Catalog::Universidades)], &status).await;
        for outcome in &outcomes {
            store.store_candidates(&outcome.label, &outcome.records).unwrap();
        }
    }

    assert_eq!(store.all_candidates().len(), 4);
    assert_eq!(store.candidates_by_source("UNIVERSIDADES").len(), 4);
}
