//! 比較結果の出力（JSON / Excel）

use crate::cli::ExportFormat;
use crate::error::{BecasError, Result};
use becas_common::export::excel_core::generate_comparison_buffer;
use becas_common::{ReconciliationResult, Report};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// JSON出力の形
#[derive(Serialize)]
struct ComparisonExport<'a> {
    report: &'a Report,
    result: &'a ReconciliationResult,
}

fn output_path_for_format(output: &Path, title: &str, extension: &str) -> PathBuf {
    if output.is_dir() || output.extension().is_none() {
        output.join(format!("{}.{}", title, extension))
    } else {
        output.with_extension(extension)
    }
}

/// 比較結果をJSONで書き出す
pub fn write_json(result: &ReconciliationResult, report: &Report, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let content = serde_json::to_string_pretty(&ComparisonExport { report, result })?;
    std::fs::write(path, content)?;
    Ok(())
}

/// 比較結果をExcelブックで書き出す
pub fn write_excel(result: &ReconciliationResult, report: &Report, path: &Path) -> Result<()> {
    let buffer = generate_comparison_buffer(result, report).map_err(BecasError::ExcelGeneration)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, buffer)?;
    Ok(())
}

/// 形式を指定して書き出し、出力したパスを返す
///
/// `output` がフォルダ（または拡張子なし）の場合は `title` をファイル名にする。
pub fn export_comparison(
    result: &ReconciliationResult,
    report: &Report,
    format: ExportFormat,
    output: &Path,
    title: &str,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    if matches!(format, ExportFormat::Json | ExportFormat::Both) {
        let path = output_path_for_format(output, title, "json");
        write_json(result, report, &path)?;
        written.push(path);
    }
    if matches!(format, ExportFormat::Excel | ExportFormat::Both) {
        let path = output_path_for_format(output, title, "xlsx");
        write_excel(result, report, &path)?;
        written.push(path);
    }

    Ok(written)
}
