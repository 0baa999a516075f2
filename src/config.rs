use crate::error::{BecasError, Result};
use becas_common::Thresholds;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// ストレージの種類
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// データディレクトリ内のJSONファイル
    #[default]
    Json,
    /// プロセス内のみ（テスト・一時実行用）
    Memory,
}

impl std::str::FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" | "file" => Ok(StorageBackend::Json),
            "memory" | "mem" => Ok(StorageBackend::Memory),
            _ => Err(format!("Unknown storage: {}. Use json or memory", s)),
        }
    }
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackend::Json => write!(f, "json"),
            StorageBackend::Memory => write!(f, "memory"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub storage: StorageBackend,
    pub data_dir: PathBuf,
    /// 既定のベースラインExcel
    pub baseline_path: Option<PathBuf>,
    pub thresholds: Thresholds,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage: StorageBackend::Json,
            data_dir: default_data_dir(),
            baseline_path: None,
            thresholds: Thresholds::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            config.thresholds.validate()?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| BecasError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("becas-recon").join("config.json"))
    }

    /// CLIで指定された閾値で上書きした閾値
    pub fn thresholds_with(&self, partial: Option<f64>, exact: Option<f64>) -> Result<Thresholds> {
        let thresholds = Thresholds::new(
            partial.unwrap_or(self.thresholds.partial),
            exact.unwrap_or(self.thresholds.exact),
        )?;
        Ok(thresholds)
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("becas-recon"))
        .unwrap_or_else(|| PathBuf::from(".becas-recon"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.storage, StorageBackend::Json);
        assert_eq!(config.thresholds, Thresholds::default());
        assert!(config.baseline_path.is_none());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"storage": "memory"}"#).unwrap();
        assert_eq!(config.storage, StorageBackend::Memory);
        assert_eq!(config.thresholds.exact, 0.9);
    }

    #[test]
    fn test_thresholds_override() {
        let config = Config::default();
        let t = config.thresholds_with(Some(0.5), None).unwrap();
        assert_eq!(t.partial, 0.5);
        assert_eq!(t.exact, 0.9);
        assert!(config.thresholds_with(Some(0.95), None).is_err());
    }

    #[test]
    fn test_storage_backend_from_str() {
        assert_eq!("JSON".parse::<StorageBackend>().unwrap(), StorageBackend::Json);
        assert_eq!("mem".parse::<StorageBackend>().unwrap(), StorageBackend::Memory);
        assert!("sqlite".parse::<StorageBackend>().is_err());
    }
}
