//! 入力データの読み込み
//!
//! - spreadsheet: ベースラインExcel（calamine）
//! - candidates: スクレイパーが出力した候補JSON

pub mod spreadsheet;
pub mod candidates;

pub use spreadsheet::{load_baseline, load_baseline_with, ColumnMapping, Field};
pub use candidates::{
    candidate_files, load_candidate_file, load_candidates, parse_candidates, select_candidates, source_label_for,
};
