//! レコードの検証とデータ品質レポート
//!
//! - 必須項目（名前・機関）のチェック
//! - 任意項目の前後空白除去と文字数制限
//! - 最低平均点の数値化（20点満点）
//! - 社会経済条件の分類

use crate::error::{Error, Result};
use crate::types::Record;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// ペルーの成績は20点満点
const GRADE_SCALE: f64 = 20.0;

/// 分数表記として扱う分母の上限（これを超えると年などとみなす）
const MAX_DENOMINATOR: f64 = 100.0;

/// 必須項目を確認し、各項目を整形したレコードを返す
///
/// # Errors
/// 名前または機関が空白のみの場合 `Error::MissingField`
pub fn validate_record(record: &Record) -> Result<Record> {
    let name = record.name.trim();
    if name.is_empty() {
        return Err(Error::MissingField("name"));
    }
    let institution = record.institution.trim();
    if institution.is_empty() {
        return Err(Error::MissingField("institution"));
    }

    Ok(Record {
        name: name.to_string(),
        institution: institution.to_string(),
        description: limit(&record.description, 500),
        minimum_average: limit(&record.minimum_average, 10),
        socioeconomic_condition: limit(&record.socioeconomic_condition, 200),
        coverage: limit(&record.coverage, 200),
        requirements: limit(&record.requirements, 500),
        process: limit(&record.process, 300),
        source_url: limit(&record.source_url, 500),
        scrape_timestamp: record.scrape_timestamp.trim().to_string(),
        source_label: limit(&record.source_label, 100),
        scrape_method: limit(&record.scrape_method, 50),
    })
}

/// 前後の空白を除き、最大文字数で切り詰める
fn limit(value: &str, max_chars: usize) -> String {
    value.trim().chars().take(max_chars).collect()
}

/// 最低平均点の記述を20点満点の数値にする
///
/// "15 de 20" や "3/4" のような分数表記を先に試し、なければ最初の数値を使う。
/// 分母が100を超える場合（"14 de 2023" など）は分数とみなさない。
/// 0〜20の範囲外は None。
pub fn parse_minimum_average(text: &str) -> Option<f64> {
    lazy_static::lazy_static! {
        // 分数表記: "15 de 20", "15/20", "15 sobre 20"
        static ref FRACTION_RE: Regex =
            Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(?:de|/|sobre)\s*(\d+(?:\.\d+)?)").unwrap();
        static ref NUMBER_RE: Regex = Regex::new(r"(\d+(?:\.\d+)?)").unwrap();
    }

    let in_range = |v: f64| (0.0..=GRADE_SCALE).contains(&v);

    if let Some(caps) = FRACTION_RE.captures(text) {
        let numerator: f64 = caps[1].parse().ok()?;
        let denominator: f64 = caps[2].parse().ok()?;
        if denominator > 0.0 && denominator <= MAX_DENOMINATOR {
            let value = numerator / denominator * GRADE_SCALE;
            if in_range(value) {
                return Some(value);
            }
        }
    }

    let caps = NUMBER_RE.captures(text)?;
    let value: f64 = caps[1].parse().ok()?;
    in_range(value).then_some(value)
}

/// 社会経済条件の区分
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SocioeconomicCategory {
    ExtremePoverty,
    Poverty,
    Vulnerable,
    LimitedIncome,
    MiddleClass,
    Evaluation,
    Unspecified,
}

impl std::fmt::Display for SocioeconomicCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SocioeconomicCategory::ExtremePoverty => write!(f, "Pobreza extrema"),
            SocioeconomicCategory::Poverty => write!(f, "Pobreza"),
            SocioeconomicCategory::Vulnerable => write!(f, "Vulnerabilidad económica"),
            SocioeconomicCategory::LimitedIncome => write!(f, "Ingresos limitados"),
            SocioeconomicCategory::MiddleClass => write!(f, "Clase media"),
            SocioeconomicCategory::Evaluation => write!(f, "Evaluación socioeconómica"),
            SocioeconomicCategory::Unspecified => write!(f, "No especificado"),
        }
    }
}

/// キーワードで社会経済条件を分類する（先に一致したものを優先）
pub fn categorize_socioeconomic(text: &str) -> SocioeconomicCategory {
    const RULES: &[(&[&str], SocioeconomicCategory)] = &[
        (&["extrema", "extreme"], SocioeconomicCategory::ExtremePoverty),
        (&["pobreza", "poverty"], SocioeconomicCategory::Poverty),
        (&["vulnerable", "vulnerabilidad"], SocioeconomicCategory::Vulnerable),
        (&["limitad", "limited", "bajo"], SocioeconomicCategory::LimitedIncome),
        (&["medio", "middle"], SocioeconomicCategory::MiddleClass),
    ];

    let lower = text.trim().to_lowercase();
    if lower.is_empty() {
        return SocioeconomicCategory::Unspecified;
    }

    RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(_, category)| *category)
        .unwrap_or(SocioeconomicCategory::Evaluation)
}

/// 検証に失敗したレコード
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvalidRecord {
    pub name: String,
    pub reason: String,
}

/// データ品質レポート
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    pub total: usize,
    pub valid: usize,
    pub invalid: Vec<InvalidRecord>,
    /// 最低平均点を数値として読めたレコード数
    pub with_average: usize,
    /// 社会経済条件の区分ごとの件数
    pub categories: BTreeMap<String, usize>,
}

/// レコード群の品質を評価する
pub fn assess(records: &[Record]) -> QualityReport {
    let mut report = QualityReport {
        total: records.len(),
        ..Default::default()
    };

    for record in records {
        match validate_record(record) {
            Ok(valid) => {
                report.valid += 1;
                if parse_minimum_average(&valid.minimum_average).is_some() {
                    report.with_average += 1;
                }
                let category = categorize_socioeconomic(&valid.socioeconomic_condition);
                *report.categories.entry(category.to_string()).or_insert(0) += 1;
            }
            Err(e) => report.invalid.push(InvalidRecord {
                name: record.name.clone(),
                reason: e.to_string(),
            }),
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_record_trims_and_limits() {
        let record = Record {
            name: "  Beca 18 ".to_string(),
            institution: "PRONABEC\n".to_string(),
            minimum_average: "14 de promedio general".to_string(),
            description: "x".repeat(600),
            ..Default::default()
        };

        let valid = validate_record(&record).unwrap();
        assert_eq!(valid.name, "Beca 18");
        assert_eq!(valid.institution, "PRONABEC");
        assert_eq!(valid.minimum_average, "14 de prom");
        assert_eq!(valid.description.chars().count(), 500);
    }

    #[test]
    fn test_validate_record_limits_by_chars() {
        let record = Record {
            name: "Beca".to_string(),
            institution: "UPC".to_string(),
            scrape_method: "é".repeat(60),
            ..Default::default()
        };
        let valid = validate_record(&record).unwrap();
        assert_eq!(valid.scrape_method.chars().count(), 50);
    }

    #[test]
    fn test_validate_record_missing_fields() {
        let missing_name = Record::new("   ", "PRONABEC");
        assert!(matches!(validate_record(&missing_name), Err(Error::MissingField("name"))));

        let missing_institution = Record::new("Beca 18", "");
        assert!(matches!(
            validate_record(&missing_institution),
            Err(Error::MissingField("institution"))
        ));
    }

    #[test]
    fn test_parse_minimum_average() {
        assert_eq!(parse_minimum_average("14"), Some(14.0));
        assert_eq!(parse_minimum_average("Promedio mínimo 15.5"), Some(15.5));
        assert_eq!(parse_minimum_average("14-15"), Some(14.0));
        assert_eq!(parse_minimum_average("15 de 20"), Some(15.0));
        assert_eq!(parse_minimum_average("3/4"), Some(15.0));
        assert_eq!(parse_minimum_average("85 sobre 100"), Some(17.0));
        assert_eq!(parse_minimum_average("Variable según programa"), None);
        assert_eq!(parse_minimum_average("85"), None);
        assert_eq!(parse_minimum_average(""), None);
    }

    #[test]
    fn test_parse_minimum_average_year_is_not_denominator() {
        assert_eq!(parse_minimum_average("14 de 2023"), Some(14.0));
        assert_eq!(parse_minimum_average("Promedio 13 de 2024 en adelante"), Some(13.0));
    }

    #[test]
    fn test_categorize_socioeconomic() {
        use SocioeconomicCategory::*;
        assert_eq!(categorize_socioeconomic("Pobreza extrema o pobreza"), ExtremePoverty);
        assert_eq!(categorize_socioeconomic("Situación de pobreza"), Poverty);
        assert_eq!(categorize_socioeconomic("Vulnerabilidad económica"), Vulnerable);
        assert_eq!(categorize_socioeconomic("Situación económica limitada"), LimitedIncome);
        assert_eq!(categorize_socioeconomic("Clase media"), MiddleClass);
        assert_eq!(categorize_socioeconomic("Mérito académico"), Evaluation);
        assert_eq!(categorize_socioeconomic("  "), Unspecified);
        assert_eq!(Poverty.to_string(), "Pobreza");
    }

    #[test]
    fn test_assess() {
        let records = vec![
            Record {
                minimum_average: "14".to_string(),
                socioeconomic_condition: "Pobreza extrema".to_string(),
                ..Record::new("Beca 18", "PRONABEC")
            },
            Record {
                minimum_average: "Variable".to_string(),
                ..Record::new("Beca Talento UPC", "UPC")
            },
            Record::new("", "BCP"),
        ];

        let report = assess(&records);
        assert_eq!(report.total, 3);
        assert_eq!(report.valid, 2);
        assert_eq!(report.with_average, 1);
        assert_eq!(report.invalid.len(), 1);
        assert!(report.invalid[0].reason.contains("name"));
        assert_eq!(report.categories.get("Pobreza extrema"), Some(&1));
        assert_eq!(report.categories.get("No especificado"), Some(&1));
    }
}
