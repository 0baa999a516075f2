//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid thresholds: partial={partial}, exact={exact} (0 <= partial <= exact <= 1)")]
    InvalidThresholds { partial: f64, exact: f64 },

    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_thresholds() {
        let error = Error::InvalidThresholds { partial: 0.95, exact: 0.9 };
        let display = error.to_string();
        assert!(display.contains("partial=0.95"));
        assert!(display.contains("exact=0.9"));
    }

    #[test]
    fn test_error_display_missing_field() {
        let error = Error::MissingField("institution");
        assert_eq!(error.to_string(), "Missing required field: institution");
    }

    #[test]
    fn test_errors_come_from_engine_checks() {
        // 閾値検証とレコード検証以外の経路はない
        let errors = [
            crate::Thresholds::new(0.9, 0.6).unwrap_err(),
            crate::validate_record(&crate::Record::new("Beca 18", "")).unwrap_err(),
        ];
        for error in &errors {
            match error {
                Error::InvalidThresholds { .. } => assert!(error.to_string().starts_with("Invalid thresholds")),
                Error::MissingField(field) => assert_eq!(*field, "institution"),
            }
        }
    }
}
