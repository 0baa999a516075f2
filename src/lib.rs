//! becas-recon
//!
//! 奨学金データの取り込み・保存・ベースライン突合。
//! 突合エンジン本体は `becas_common` にある。

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod ingest;
pub mod loader;
pub mod storage;
