//! 突合結果のサマリー

use crate::types::ReconciliationResult;
use serde::{Deserialize, Serialize};

/// 件数の合計
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub candidates: usize,
    pub baseline: usize,
}

/// 分類ごとの件数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassCounts {
    pub exact: usize,
    pub partial: usize,
    pub new: usize,
    pub missing: usize,
}

/// 呼び出し側に返すサマリー
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub totals: Totals,
    pub counts: ClassCounts,
    /// (完全一致 + 部分一致) / ベースライン件数 * 100
    pub coverage_percent: f64,
}

impl Report {
    /// サマリーシート用の (項目, 値) 一覧
    pub fn rows(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("Total Scrapeadas", self.totals.candidates as f64),
            ("Total Excel", self.totals.baseline as f64),
            ("Coincidencias Exactas", self.counts.exact as f64),
            ("Coincidencias Parciales", self.counts.partial as f64),
            ("Nuevas Encontradas", self.counts.new as f64),
            ("Faltantes", self.counts.missing as f64),
            ("Porcentaje Cobertura", self.coverage_percent),
        ]
    }
}

/// 突合結果を集計する
pub fn summarize(result: &ReconciliationResult) -> Report {
    let counts = ClassCounts {
        exact: result.exact_matches.len(),
        partial: result.partial_matches.len(),
        new: result.new_records.len(),
        missing: result.missing_records.len(),
    };

    let matched = (counts.exact + counts.partial) as f64;
    let coverage_percent = matched / result.total_baseline.max(1) as f64 * 100.0;

    Report {
        totals: Totals {
            candidates: result.total_candidates,
            baseline: result.total_baseline,
        },
        counts,
        coverage_percent,
    }
}
