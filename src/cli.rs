use clap::{Parser, Subcommand};
use crate::config::StorageBackend;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "becas-recon")]
#[command(about = "奨学金データの取り込み・重複除去・ベースライン突合ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 候補JSON・組み込みカタログを取り込んで保存
    Ingest {
        /// 候補JSONファイルまたはフォルダ
        inputs: Vec<PathBuf>,

        /// 取得元ラベル（ファイル1つのときのみ。省略時はファイル名）
        #[arg(short, long)]
        label: Option<String>,

        /// 組み込みカタログ (pronabec/universidades/bcp)、複数指定可
        #[arg(short, long)]
        catalog: Vec<String>,

        /// 組み込みカタログをすべて取り込む
        #[arg(long)]
        all_catalogs: bool,
    },

    /// ベースラインExcelを読み込んで保存
    LoadBaseline {
        /// Excelファイル（省略時は設定のbaseline_path）
        path: Option<PathBuf>,
    },

    /// 候補とベースラインを突合
    Compare {
        /// ベースラインExcel（省略時は設定、なければ保存済みベースライン）
        #[arg(short, long)]
        baseline: Option<PathBuf>,

        /// 候補JSONファイル/フォルダ（省略時は保存済み候補）
        #[arg(long)]
        candidates: Option<PathBuf>,

        /// 取得元ラベルで候補を絞り込む
        #[arg(short, long)]
        source: Option<String>,

        /// 出力ファイル/ディレクトリ
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 出力形式 (json/excel/both)
        #[arg(short, long, default_value = "json")]
        format: ExportFormat,

        /// 出力ファイル名（出力先がフォルダのとき）
        #[arg(short, long, default_value = "comparacion_becas")]
        title: String,

        /// 部分一致の閾値（0.0-1.0）
        #[arg(long)]
        partial: Option<f64>,

        /// 完全一致の閾値（0.0-1.0）
        #[arg(long)]
        exact: Option<f64>,

        /// 一致の内訳を表示
        #[arg(long)]
        show_matches: bool,
    },

    /// 機関を絞った簡易突合
    CrossCheck {
        /// ベースラインの機関名に含まれる文字列（例: BCP）
        #[arg(short, long, required = true)]
        institution: String,

        /// ベースラインExcel（省略時は設定、なければ保存済みベースライン）
        #[arg(short, long)]
        baseline: Option<PathBuf>,

        /// 候補JSONファイル/フォルダ（省略時は保存済み候補）
        #[arg(long)]
        candidates: Option<PathBuf>,

        /// 取得元ラベルで候補を絞り込む
        #[arg(short, long)]
        source: Option<String>,
    },

    /// 候補JSONの重複を除去
    Dedupe {
        /// 候補JSONファイルまたはフォルダ
        #[arg(required = true)]
        input: PathBuf,

        /// 出力JSONファイル（省略時は件数のみ表示）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// レコードを検証しデータ品質を表示
    Validate {
        /// 候補JSONファイル/フォルダ（省略時は保存済み候補）
        input: Option<PathBuf>,

        /// 品質レポートJSONの出力先
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 保存データの統計を表示
    Stats {
        /// JSONで出力
        #[arg(long)]
        json: bool,
    },

    /// 設定を表示/編集
    Config {
        /// 設定を表示
        #[arg(long)]
        show: bool,

        /// ストレージ (json/memory)
        #[arg(long)]
        set_storage: Option<StorageBackend>,

        /// データディレクトリ
        #[arg(long)]
        set_data_dir: Option<PathBuf>,

        /// 既定のベースラインExcel
        #[arg(long)]
        set_baseline: Option<PathBuf>,

        /// 部分一致の閾値
        #[arg(long)]
        set_partial: Option<f64>,

        /// 完全一致の閾値
        #[arg(long)]
        set_exact: Option<f64>,
    },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Json,
    Excel,
    Both,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "excel" | "xlsx" => Ok(ExportFormat::Excel),
            "both" => Ok(ExportFormat::Both),
            _ => Err(format!("Unknown format: {}. Use json, excel, or both", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_format_from_str() {
        assert_eq!("JSON".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("xlsx".parse::<ExportFormat>().unwrap(), ExportFormat::Excel);
        assert_eq!("both".parse::<ExportFormat>().unwrap(), ExportFormat::Both);
        assert!("pdf".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_parse_compare_args() {
        let cli = Cli::parse_from([
            "becas-recon", "compare", "--baseline", "Becas_Peru.xlsx", "--source", "BCP",
            "--format", "both", "--partial", "0.5", "-v",
        ]);
        assert!(cli.verbose);
        match cli.command {
            Commands::Compare { baseline, source, format, partial, exact, .. } => {
                assert_eq!(baseline, Some(PathBuf::from("Becas_Peru.xlsx")));
                assert_eq!(source.as_deref(), Some("BCP"));
                assert_eq!(format, ExportFormat::Both);
                assert_eq!(partial, Some(0.5));
                assert_eq!(exact, None);
            }
            _ => panic!("compare以外に解析された"),
        }
    }

    #[test]
    fn test_parse_ingest_catalogs() {
        let cli = Cli::parse_from(["becas-recon", "ingest", "-c", "bcp", "-c", "pronabec", "out/"]);
        match cli.command {
            Commands::Ingest { inputs, catalog, all_catalogs, .. } => {
                assert_eq!(inputs, vec![PathBuf::from("out/")]);
                assert_eq!(catalog, vec!["bcp", "pronabec"]);
                assert!(!all_catalogs);
            }
            _ => panic!("ingest以外に解析された"),
        }
    }
}
