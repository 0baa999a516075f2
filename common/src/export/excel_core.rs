//! 突合結果のExcel生成（共通ライブラリ）
//!
//! シート構成:
//! - Resumen: 集計値
//! - Coincidencias_Exactas / Coincidencias_Parciales: 一致ペア
//! - Nuevas_Becas / Becas_Faltantes: 片側のみのレコード
//!
//! 件数0の分類シートは作らない。

use crate::report::Report;
use crate::types::{MatchCandidate, ReconciliationResult, Record};
use rust_xlsxwriter::*;

pub const SUMMARY_SHEET: &str = "Resumen";
pub const EXACT_SHEET: &str = "Coincidencias_Exactas";
pub const PARTIAL_SHEET: &str = "Coincidencias_Parciales";
pub const NEW_SHEET: &str = "Nuevas_Becas";
pub const MISSING_SHEET: &str = "Becas_Faltantes";

const MATCH_HEADERS: &[&str] = &[
    "Nombre Scrapeado",
    "Institución",
    "Nombre Excel",
    "Score",
    "Fuente Scrapeada",
    "Fuente Excel",
];

const RECORD_HEADERS: &[&str] = &["Nombre Beca", "Institución", "Fuente", "URL"];

/// 突合結果をExcelバッファに生成
///
/// # Arguments
/// * `result` - 突合結果
/// * `report` - `summarize` で作ったサマリー
pub fn generate_comparison_buffer(result: &ReconciliationResult, report: &Report) -> Result<Vec<u8>, String> {
    let mut workbook = Workbook::new();

    let header_format = Format::new()
        .set_bold()
        .set_font_color(Color::RGB(0x333333))
        .set_background_color(Color::RGB(0xF5F5F5))
        .set_border(FormatBorder::Thin)
        .set_border_color(Color::RGB(0xAAAAAA));

    let score_format = Format::new().set_num_format("0.00");

    let summary = workbook.add_worksheet();
    summary.set_name(SUMMARY_SHEET)
        .map_err(|e| format!("シート名設定エラー: {}", e))?;
    write_headers(summary, &["Métrica", "Valor"], &header_format)?;
    summary.set_column_width(0, 28.0)
        .map_err(|e| format!("列幅設定エラー: {}", e))?;

    for (i, (label, value)) in report.rows().into_iter().enumerate() {
        let row = i as u32 + 1;
        summary.write_string(row, 0, label)
            .map_err(|e| format!("項目書き込みエラー: {}", e))?;
        summary.write_number_with_format(row, 1, value, &score_format)
            .map_err(|e| format!("値書き込みエラー: {}", e))?;
    }

    if !result.exact_matches.is_empty() {
        write_match_sheet(&mut workbook, EXACT_SHEET, &result.exact_matches, &header_format, &score_format)?;
    }
    if !result.partial_matches.is_empty() {
        write_match_sheet(&mut workbook, PARTIAL_SHEET, &result.partial_matches, &header_format, &score_format)?;
    }
    if !result.new_records.is_empty() {
        write_record_sheet(&mut workbook, NEW_SHEET, &result.new_records, &header_format)?;
    }
    if !result.missing_records.is_empty() {
        write_record_sheet(&mut workbook, MISSING_SHEET, &result.missing_records, &header_format)?;
    }

    workbook.save_to_buffer()
        .map_err(|e| format!("Excel保存エラー: {}", e))
}

fn write_headers(sheet: &mut Worksheet, headers: &[&str], format: &Format) -> Result<(), String> {
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, format)
            .map_err(|e| format!("ヘッダー書き込みエラー: {}", e))?;
        sheet.set_column_width(col as u16, 32.0)
            .map_err(|e| format!("列幅設定エラー: {}", e))?;
    }
    Ok(())
}

fn write_match_sheet(
    workbook: &mut Workbook,
    name: &str,
    matches: &[MatchCandidate],
    header_format: &Format,
    score_format: &Format,
) -> Result<(), String> {
    let sheet = workbook.add_worksheet();
    sheet.set_name(name)
        .map_err(|e| format!("シート名設定エラー: {}", e))?;
    write_headers(sheet, MATCH_HEADERS, header_format)?;

    for (i, m) in matches.iter().enumerate() {
        let row = i as u32 + 1;
        let cells = [
            m.candidate.name.as_str(),
            m.candidate.institution.as_str(),
            m.baseline.name.as_str(),
        ];
        for (col, value) in cells.iter().enumerate() {
            sheet.write_string(row, col as u16, *value)
                .map_err(|e| format!("セル書き込みエラー: {}", e))?;
        }
        sheet.write_number_with_format(row, 3, m.score, score_format)
            .map_err(|e| format!("スコア書き込みエラー: {}", e))?;
        sheet.write_string(row, 4, m.candidate.source_label.as_str())
            .map_err(|e| format!("セル書き込みエラー: {}", e))?;
        sheet.write_string(row, 5, m.baseline.source_label.as_str())
            .map_err(|e| format!("セル書き込みエラー: {}", e))?;
    }

    Ok(())
}

fn write_record_sheet(
    workbook: &mut Workbook,
    name: &str,
    records: &[Record],
    header_format: &Format,
) -> Result<(), String> {
    let sheet = workbook.add_worksheet();
    sheet.set_name(name)
        .map_err(|e| format!("シート名設定エラー: {}", e))?;
    write_headers(sheet, RECORD_HEADERS, header_format)?;

    for (i, record) in records.iter().enumerate() {
        let row = i as u32 + 1;
        let cells = [
            record.name.as_str(),
            record.institution.as_str(),
            record.source_label.as_str(),
            record.source_url.as_str(),
        ];
        for (col, value) in cells.iter().enumerate() {
            sheet.write_string(row, col as u16, *value)
                .map_err(|e| format!("セル書き込みエラー: {}", e))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::{reconcile, Thresholds};
    use crate::report::summarize;

    #[test]
    fn test_generate_comparison_buffer() {
        let candidates = vec![Record::new("Beca 18", "PRONABEC"), Record::new("Beca Nueva XYZ", "XYZ")];
        let baseline = vec![Record::new("Beca 18", "PRONABEC"), Record::new("Crédito Educativo", "PRONABEC")];
        let result = reconcile(&candidates, &baseline, &Thresholds::default());
        let report = summarize(&result);

        let buffer = generate_comparison_buffer(&result, &report).unwrap();
        // xlsx は zip 形式
        assert!(buffer.starts_with(b"PK"));
    }

    #[test]
    fn test_generate_comparison_buffer_empty_result() {
        let result = ReconciliationResult::default();
        let report = summarize(&result);
        let buffer = generate_comparison_buffer(&result, &report).unwrap();
        assert!(!buffer.is_empty());
    }
}
