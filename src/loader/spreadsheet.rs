//! ベースラインExcelの読み込み
//!
//! 最初のシートの1行目を見出しとして扱い、見出し名を正規化してから
//! Recordの項目に対応付ける。名前が空の行は読み飛ばす。

use crate::error::{BecasError, Result};
use becas_common::{normalize, Record};
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;
use tracing::{debug, info};

/// 見出しの対応先
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Institution,
    Description,
    MinimumAverage,
    SocioeconomicCondition,
    Coverage,
    Requirements,
    Process,
    SourceUrl,
    SourceLabel,
}

impl Field {
    fn slot<'a>(&self, record: &'a mut Record) -> &'a mut String {
        match self {
            Field::Name => &mut record.name,
            Field::Institution => &mut record.institution,
            Field::Description => &mut record.description,
            Field::MinimumAverage => &mut record.minimum_average,
            Field::SocioeconomicCondition => &mut record.socioeconomic_condition,
            Field::Coverage => &mut record.coverage,
            Field::Requirements => &mut record.requirements,
            Field::Process => &mut record.process,
            Field::SourceUrl => &mut record.source_url,
            Field::SourceLabel => &mut record.source_label,
        }
    }
}

/// 見出し名 → 項目の対応表
#[derive(Debug, Clone)]
pub struct ColumnMapping {
    /// (正規化済み見出し, 項目)
    aliases: Vec<(String, Field)>,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        let table: &[(&str, Field)] = &[
            ("Nombre Beca", Field::Name),
            ("Nombre de la Beca", Field::Name),
            ("Name Scholarship", Field::Name),
            ("Scholarship Name", Field::Name),
            ("Name", Field::Name),
            ("Institución o Programa", Field::Institution),
            ("Institucion o Programa", Field::Institution),
            ("Institución", Field::Institution),
            ("Institution or Program", Field::Institution),
            ("Institution", Field::Institution),
            ("Descripción", Field::Description),
            ("Description", Field::Description),
            ("Promedio Académico Mínimo", Field::MinimumAverage),
            ("Promedio Mínimo", Field::MinimumAverage),
            ("Minimum Average", Field::MinimumAverage),
            ("Condición Socioeconómica", Field::SocioeconomicCondition),
            ("Socioeconomic Condition", Field::SocioeconomicCondition),
            ("Beneficios / Cobertura", Field::Coverage),
            ("Beneficios", Field::Coverage),
            ("Cobertura", Field::Coverage),
            ("Coverage", Field::Coverage),
            ("Requisitos Principales", Field::Requirements),
            ("Requisitos", Field::Requirements),
            ("Documentación", Field::Requirements),
            ("Requirements", Field::Requirements),
            ("Duración del Proceso", Field::Process),
            ("Proceso", Field::Process),
            ("Process", Field::Process),
            ("URL", Field::SourceUrl),
            ("Source URL", Field::SourceUrl),
            ("Observaciones / Fuente", Field::SourceLabel),
            ("Fuente", Field::SourceLabel),
            ("Source", Field::SourceLabel),
        ];

        Self {
            aliases: table.iter().map(|(h, f)| (normalize(h), *f)).collect(),
        }
    }
}

impl ColumnMapping {
    /// 見出しの別名を追加（既存の対応より優先）
    pub fn with_alias(mut self, header: &str, field: Field) -> Self {
        self.aliases.insert(0, (normalize(header), field));
        self
    }

    pub fn resolve(&self, header: &str) -> Option<Field> {
        let key = normalize(header);
        self.aliases
            .iter()
            .find(|(alias, _)| *alias == key)
            .map(|(_, field)| *field)
    }
}

/// ベースラインExcelを既定の見出し対応で読み込む
pub fn load_baseline(path: &Path) -> Result<Vec<Record>> {
    load_baseline_with(path, &ColumnMapping::default())
}

/// ベースラインExcelを読み込む（xlsx/xls/xlsb/ods）
///
/// # Errors
/// - ファイルがない: `FileNotFound`
/// - シートがない・名前列がない: `InvalidSpreadsheet`
pub fn load_baseline_with(path: &Path, mapping: &ColumnMapping) -> Result<Vec<Record>> {
    if !path.exists() {
        return Err(BecasError::FileNotFound(path.display().to_string()));
    }

    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| BecasError::InvalidSpreadsheet(format!("シートがありません: {}", path.display())))??;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok(Vec::new());
    };

    let columns: Vec<Option<Field>> = header_row
        .iter()
        .map(|cell| mapping.resolve(&cell_to_string(cell)))
        .collect();
    debug!(?columns, "見出しの対応付け");

    if !columns.contains(&Some(Field::Name)) {
        return Err(BecasError::InvalidSpreadsheet(format!(
            "奨学金名の列が見つかりません: {}",
            path.display()
        )));
    }

    let mut records = Vec::new();
    for row in rows {
        let mut record = Record::default();
        for (cell, field) in row.iter().zip(&columns) {
            let Some(field) = field else { continue };
            let slot = field.slot(&mut record);
            // 同じ項目に複数列が対応する場合は左の列を優先
            if slot.is_empty() {
                *slot = cell_to_string(cell);
            }
        }

        if record.name.trim().is_empty() {
            continue;
        }
        records.push(record);
    }

    info!(path = %path.display(), count = records.len(), "ベースラインを読み込みました");
    Ok(records)
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_spanish_and_english_headers() {
        let mapping = ColumnMapping::default();
        assert_eq!(mapping.resolve("Nombre Beca"), Some(Field::Name));
        assert_eq!(mapping.resolve("  nombre   beca "), Some(Field::Name));
        assert_eq!(mapping.resolve("Name Scholarship"), Some(Field::Name));
        assert_eq!(mapping.resolve("Institución o Programa"), Some(Field::Institution));
        assert_eq!(mapping.resolve("Institution or Program"), Some(Field::Institution));
        assert_eq!(mapping.resolve("Beneficios / Cobertura"), Some(Field::Coverage));
        assert_eq!(mapping.resolve("N°"), None);
    }

    #[test]
    fn test_with_alias_takes_priority() {
        let mapping = ColumnMapping::default().with_alias("Fuente", Field::SourceUrl);
        assert_eq!(mapping.resolve("fuente"), Some(Field::SourceUrl));
    }

    #[test]
    fn test_cell_to_string() {
        assert_eq!(cell_to_string(&Data::Float(18.0)), "18");
        assert_eq!(cell_to_string(&Data::Float(14.5)), "14.5");
        assert_eq!(cell_to_string(&Data::String("  Beca 18 ".into())), "Beca 18");
        assert_eq!(cell_to_string(&Data::Empty), "");
    }

    #[test]
    fn test_load_baseline_missing_file() {
        let result = load_baseline(Path::new("/nonexistent/Becas_Peru.xlsx"));
        assert!(matches!(result, Err(BecasError::FileNotFound(_))));
    }
}
