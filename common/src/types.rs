//! 奨学金レコードと突合結果の型定義
//!
//! CLIとストレージで共有される型:
//! - Record: スクレイピング／Excelから得た1件の奨学金
//! - MatchCandidate: 候補レコードと最良ベースラインの組
//! - ReconciliationResult: 突合の最終出力
//! - ComparisonRecord: ストレージに保存する比較タプル

use serde::{Deserialize, Deserializer, Serialize};

/// 奨学金レコード
///
/// キーは英語名のほか、スクレイパーが出力するスペイン語キーも受け付ける。
/// 数値・真偽値は文字列化し、null／欠損は空文字列になる。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Record {
    #[serde(alias = "nombre_beca", deserialize_with = "lenient_string")]
    pub name: String,

    #[serde(alias = "institucion", deserialize_with = "lenient_string")]
    pub institution: String,

    #[serde(alias = "descripcion", deserialize_with = "lenient_string")]
    pub description: String,

    #[serde(alias = "promedio_minimo", deserialize_with = "lenient_string")]
    pub minimum_average: String,

    #[serde(alias = "condicion_socioeconomica", deserialize_with = "lenient_string")]
    pub socioeconomic_condition: String,

    #[serde(alias = "cobertura", deserialize_with = "lenient_string")]
    pub coverage: String,

    #[serde(alias = "requisitos", deserialize_with = "lenient_string")]
    pub requirements: String,

    #[serde(alias = "proceso", deserialize_with = "lenient_string")]
    pub process: String,

    #[serde(alias = "url_fuente", deserialize_with = "lenient_string")]
    pub source_url: String,

    #[serde(alias = "fecha_scraping", deserialize_with = "lenient_string")]
    pub scrape_timestamp: String,

    #[serde(alias = "fuente", deserialize_with = "lenient_string")]
    pub source_label: String,

    #[serde(alias = "tipo_scraping", deserialize_with = "lenient_string")]
    pub scrape_method: String,
}

impl Record {
    pub fn new(name: impl Into<String>, institution: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            institution: institution.into(),
            ..Default::default()
        }
    }

    /// 取得元ラベルを設定したコピーを返す
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source_label = source.into();
        self
    }
}

fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde_json::Value;

    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    })
}

/// 一致の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    Exact,
    Partial,
    None,
}

impl std::fmt::Display for MatchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchKind::Exact => write!(f, "exact"),
            MatchKind::Partial => write!(f, "partial"),
            MatchKind::None => write!(f, "none"),
        }
    }
}

/// 候補レコードと最良スコアのベースラインの組
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchCandidate {
    pub candidate: Record,
    pub baseline: Record,
    pub score: f64,
    pub match_kind: MatchKind,
}

/// 突合結果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationResult {
    pub total_candidates: usize,
    pub total_baseline: usize,
    pub exact_matches: Vec<MatchCandidate>,
    pub partial_matches: Vec<MatchCandidate>,
    /// どのベースラインとも一致しなかった候補
    pub new_records: Vec<Record>,
    /// どの候補とも一致しなかったベースライン
    pub missing_records: Vec<Record>,
}

/// ストレージに保存する比較タプル
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRecord {
    pub candidate_name: String,
    pub candidate_institution: String,
    pub candidate_source: String,
    pub baseline_name: String,
    pub baseline_source: String,
    pub score: f64,
    pub match_kind: MatchKind,
    pub note: String,
}

impl From<&MatchCandidate> for ComparisonRecord {
    fn from(m: &MatchCandidate) -> Self {
        Self {
            candidate_name: m.candidate.name.clone(),
            candidate_institution: m.candidate.institution.clone(),
            candidate_source: m.candidate.source_label.clone(),
            baseline_name: m.baseline.name.clone(),
            baseline_source: m.baseline.source_label.clone(),
            score: m.score,
            match_kind: m.match_kind,
            note: format!("match found with score {:.2}", m.score),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_default() {
        let record = Record::default();
        assert_eq!(record.name, "");
        assert_eq!(record.scrape_method, "");
    }

    #[test]
    fn test_record_deserialize_spanish_keys() {
        let json = r#"{
            "nombre_beca": "Beca 18",
            "institucion": "PRONABEC",
            "promedio_minimo": 14,
            "fuente": "PRONABEC - Datos Oficiales",
            "id": 7
        }"#;
        let record: Record = serde_json::from_str(json).unwrap();
        assert_eq!(record.name, "Beca 18");
        assert_eq!(record.institution, "PRONABEC");
        assert_eq!(record.minimum_average, "14");
        assert_eq!(record.source_label, "PRONABEC - Datos Oficiales");
        assert_eq!(record.description, "");
    }

    #[test]
    fn test_record_deserialize_null_and_missing() {
        let json = r#"{"name": null, "institution": "BCP", "coverage": true}"#;
        let record: Record = serde_json::from_str(json).unwrap();
        assert_eq!(record.name, "");
        assert_eq!(record.coverage, "true");
        assert_eq!(record.requirements, "");
    }

    #[test]
    fn test_match_kind_serialize() {
        assert_eq!(serde_json::to_string(&MatchKind::Partial).unwrap(), "\"partial\"");
        assert_eq!(MatchKind::Exact.to_string(), "exact");
    }

    #[test]
    fn test_comparison_record_from_match() {
        let m = MatchCandidate {
            candidate: Record::new("Beca 18", "PRONABEC").with_source("PRONABEC"),
            baseline: Record::new("Beca 18", "PRONABEC").with_source("Excel"),
            score: 0.876,
            match_kind: MatchKind::Partial,
        };
        let record = ComparisonRecord::from(&m);
        assert_eq!(record.candidate_source, "PRONABEC");
        assert_eq!(record.baseline_source, "Excel");
        assert_eq!(record.note, "match found with score 0.88");
    }
}
