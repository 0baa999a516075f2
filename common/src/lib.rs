//! Becas Common Library
//!
//! 奨学金レコードの正規化・類似度判定・突合エンジン（I/Oなし）

pub mod types;
pub mod error;
pub mod normalize;
pub mod similarity;
pub mod dedupe;
pub mod reconcile;
pub mod report;
pub mod validate;
#[cfg(feature = "excel")]
pub mod export;

pub use types::{ComparisonRecord, MatchCandidate, MatchKind, ReconciliationResult, Record};
pub use error::{Error, Result};
pub use normalize::{normalize, strip_punctuation, title_case};
pub use similarity::{looks_same_entity, ratio, score};
pub use dedupe::dedupe;
pub use reconcile::{comparison_records, cross_check, reconcile, CrossCheckResult, Thresholds};
pub use report::{summarize, Report};
pub use validate::{assess, validate_record, QualityReport, SocioeconomicCategory};
