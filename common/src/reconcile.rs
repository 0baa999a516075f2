//! 候補レコードとベースラインの突合
//!
//! ## 処理フロー
//! 1. 候補ごとに全ベースラインとのスコアを計算し、最高スコアの相手を選ぶ
//! 2. 閾値で完全一致／部分一致／新規に分類
//! 3. どの候補とも部分一致閾値に届かないベースラインを欠落として抽出
//!
//! 入力は読み取り専用。結果は常に新しく確保した構造体で返す。

use crate::error::{Error, Result};
use crate::normalize::normalize;
use crate::similarity::{looks_same_entity, score_keys};
use crate::types::{ComparisonRecord, MatchCandidate, MatchKind, ReconciliationResult, Record};
use serde::{Deserialize, Serialize};

/// 分類の閾値
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub partial: f64,
    pub exact: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            partial: 0.6,
            exact: 0.9,
        }
    }
}

impl Thresholds {
    /// `0 <= partial <= exact <= 1` を満たす閾値を作る
    pub fn new(partial: f64, exact: f64) -> Result<Self> {
        let thresholds = Self { partial, exact };
        thresholds.validate()?;
        Ok(thresholds)
    }

    pub fn validate(&self) -> Result<()> {
        let in_range = (0.0..=1.0).contains(&self.partial) && (0.0..=1.0).contains(&self.exact);
        if !in_range || self.partial > self.exact {
            return Err(Error::InvalidThresholds {
                partial: self.partial,
                exact: self.exact,
            });
        }
        Ok(())
    }

    /// スコアを分類する
    pub fn classify(&self, score: f64) -> MatchKind {
        if score >= self.exact {
            MatchKind::Exact
        } else if score >= self.partial {
            MatchKind::Partial
        } else {
            MatchKind::None
        }
    }
}

/// 候補とベースラインを突合する
///
/// # Arguments
/// * `candidates` - 新しく取得したレコード
/// * `baseline` - 既知のレコード（Excel由来）
/// * `thresholds` - 分類の閾値
///
/// # Returns
/// 完全一致・部分一致・新規・欠落に振り分けた結果。
/// 各候補はちょうど1つのリストに入る。
pub fn reconcile(candidates: &[Record], baseline: &[Record], thresholds: &Thresholds) -> ReconciliationResult {
    let candidate_keys: Vec<String> = candidates.iter().map(|r| normalize(&r.name)).collect();
    let baseline_keys: Vec<String> = baseline.iter().map(|r| normalize(&r.name)).collect();

    let mut result = ReconciliationResult {
        total_candidates: candidates.len(),
        total_baseline: baseline.len(),
        ..Default::default()
    };

    for (candidate, candidate_key) in candidates.iter().zip(&candidate_keys) {
        match best_match(candidate_key, &baseline_keys) {
            Some((index, score)) => {
                let match_kind = thresholds.classify(score);
                let pairing = MatchCandidate {
                    candidate: candidate.clone(),
                    baseline: baseline[index].clone(),
                    score,
                    match_kind,
                };
                match match_kind {
                    MatchKind::Exact => result.exact_matches.push(pairing),
                    MatchKind::Partial => result.partial_matches.push(pairing),
                    MatchKind::None => result.new_records.push(candidate.clone()),
                }
            }
            None => result.new_records.push(candidate.clone()),
        }
    }

    for (record, baseline_key) in baseline.iter().zip(&baseline_keys) {
        let found = candidate_keys
            .iter()
            .any(|candidate_key| score_keys(baseline_key, candidate_key) >= thresholds.partial);
        if !found {
            result.missing_records.push(record.clone());
        }
    }

    result
}

/// 最高スコアのベースライン位置とスコア
///
/// 同点なら先に現れたものを採用する。スコア0しかない場合は None。
fn best_match(candidate_key: &str, baseline_keys: &[String]) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;

    for (index, baseline_key) in baseline_keys.iter().enumerate() {
        let score = score_keys(candidate_key, baseline_key);
        let better = match best {
            Some((_, best_score)) => score > best_score,
            None => score > 0.0,
        };
        if better {
            best = Some((index, score));
        }
    }

    best
}

/// ストレージに渡す比較タプル（完全一致→部分一致の順）
pub fn comparison_records(result: &ReconciliationResult) -> Vec<ComparisonRecord> {
    result
        .exact_matches
        .iter()
        .chain(&result.partial_matches)
        .map(ComparisonRecord::from)
        .collect()
}

/// 機関を絞ったゆるい突合の結果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CrossCheckResult {
    pub total_candidates: usize,
    /// 機関で絞り込んだ後のベースライン件数
    pub total_baseline: usize,
    pub matches: Vec<CrossMatch>,
    pub new_found: Vec<Record>,
    pub missing: Vec<Record>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossMatch {
    pub candidate_name: String,
    pub baseline_name: String,
}

/// 機関を絞ったゆるい突合（数値スコアではなく同一判定を使う）
///
/// # Arguments
/// * `candidates` - 取得したレコード
/// * `baseline` - 既知のレコード
/// * `institution_key` - ベースラインの機関名に含まれるべき文字列（大文字小文字無視）
pub fn cross_check(candidates: &[Record], baseline: &[Record], institution_key: &str) -> CrossCheckResult {
    let key = institution_key.to_lowercase();
    let scoped: Vec<&Record> = baseline
        .iter()
        .filter(|r| r.institution.to_lowercase().contains(&key))
        .collect();

    let mut result = CrossCheckResult {
        total_candidates: candidates.len(),
        total_baseline: scoped.len(),
        ..Default::default()
    };

    for candidate in candidates {
        match scoped.iter().find(|b| looks_same_entity(&candidate.name, &b.name)) {
            Some(found) => result.matches.push(CrossMatch {
                candidate_name: candidate.name.clone(),
                baseline_name: found.name.clone(),
            }),
            None => result.new_found.push(candidate.clone()),
        }
    }

    for known in &scoped {
        if !candidates.iter().any(|c| looks_same_entity(&known.name, &c.name)) {
            result.missing.push((*known).clone());
        }
    }

    result
}
