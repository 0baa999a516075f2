use thiserror::Error;

#[derive(Error, Debug)]
pub enum BecasError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("Excel読み込みエラー: {0}")]
    Spreadsheet(String),

    #[error("Excelの形式が不正: {0}")]
    InvalidSpreadsheet(String),

    #[error("候補ファイルの形式が不正: {0}")]
    InvalidCandidates(String),

    #[error("ストレージエラー: {0}")]
    Storage(String),

    #[error("Excel生成エラー: {0}")]
    ExcelGeneration(String),

    #[error("不明なカタログ: {0} (pronabec/universidades/bcp)")]
    UnknownCatalog(String),

    #[error("JSON解析エラー: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] becas_common::Error),
}

impl From<calamine::Error> for BecasError {
    fn from(e: calamine::Error) -> Self {
        BecasError::Spreadsheet(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, BecasError>;
