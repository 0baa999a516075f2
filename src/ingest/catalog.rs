//! 公式情報として登録済みの奨学金カタログ

use crate::error::BecasError;
use becas_common::Record;

/// 組み込みカタログ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Catalog {
    Pronabec,
    Universidades,
    Bcp,
}

struct Entry {
    name: &'static str,
    institution: &'static str,
    description: &'static str,
    minimum_average: &'static str,
    socioeconomic_condition: &'static str,
    coverage: &'static str,
    requirements: &'static str,
    process: &'static str,
    source_url: &'static str,
    source: &'static str,
}

const PRONABEC: &[Entry] = &[
    Entry {
        name: "Beca 18",
        institution: "PRONABEC",
        description: "Beca integral para estudios de pregrado dirigida a estudiantes de alto rendimiento académico en situación de pobreza y pobreza extrema.",
        minimum_average: "14",
        socioeconomic_condition: "Pobreza extrema o pobreza",
        coverage: "Financiamiento completo",
        requirements: "",
        process: "",
        source_url: "https://www.pronabec.gob.pe/beca18/",
        source: "PRONABEC",
    },
    Entry {
        name: "Beca Perú",
        institution: "PRONABEC",
        description: "Programa de becas para estudios de posgrado en el extranjero dirigido a profesionales peruanos.",
        minimum_average: "14-15",
        socioeconomic_condition: "Ingreso limitado per cápita",
        coverage: "Matrícula, pensión, manutención, seguro",
        requirements: "",
        process: "",
        source_url: "https://www.pronabec.gob.pe/becaperu/",
        source: "PRONABEC",
    },
    Entry {
        name: "Beca Permanencia",
        institution: "PRONABEC",
        description: "Apoyo económico para estudiantes universitarios en situación de vulnerabilidad económica.",
        minimum_average: "Variable",
        socioeconomic_condition: "Vulnerabilidad económica",
        coverage: "Apoyo económico continuo",
        requirements: "",
        process: "",
        source_url: "https://www.pronabec.gob.pe/becapermanencia/",
        source: "PRONABEC",
    },
];

const UNIVERSIDADES: &[Entry] = &[
    Entry {
        name: "Beca de Excelencia Académica PUCP",
        institution: "Pontificia Universidad Católica del Perú",
        description: "Beca para estudiantes con alto rendimiento académico que cubre hasta el 100% de la pensión.",
        minimum_average: "16",
        socioeconomic_condition: "Evaluación socioeconómica",
        coverage: "Hasta 100% de pensión",
        requirements: "",
        process: "",
        source_url: "https://www.pucp.edu.pe/admision/becas/",
        source: "PUCP",
    },
    Entry {
        name: "Beca Talento UPC",
        institution: "Universidad Peruana de Ciencias Aplicadas",
        description: "Programa de becas para estudiantes destacados en diversas áreas.",
        minimum_average: "15",
        socioeconomic_condition: "Evaluación integral",
        coverage: "Descuento en pensión",
        requirements: "",
        process: "",
        source_url: "https://www.upc.edu.pe/admision/becas/",
        source: "UPC",
    },
    Entry {
        name: "Beca Socioeconómica UNMSM",
        institution: "Universidad Nacional Mayor de San Marcos",
        description: "Apoyo económico para estudiantes en situación de vulnerabilidad socioeconómica.",
        minimum_average: "14",
        socioeconomic_condition: "Vulnerabilidad socioeconómica",
        coverage: "Apoyo económico",
        requirements: "",
        process: "",
        source_url: "https://unmsm.edu.pe/estudiantes/becas",
        source: "UNMSM",
    },
    Entry {
        name: "Beca de Ingreso UNI",
        institution: "Universidad Nacional de Ingeniería",
        description: "Beca para estudiantes destacados en el examen de admisión.",
        minimum_average: "15",
        socioeconomic_condition: "Mérito académico",
        coverage: "Exoneración de pagos",
        requirements: "",
        process: "",
        source_url: "https://www.uni.edu.pe/estudiantes/becas",
        source: "UNI",
    },
];

const BCP: &[Entry] = &[
    Entry {
        name: "Beca BCP",
        institution: "Banco de Crédito del Perú (BCP)",
        description: "Programa de becas del BCP para estudiantes destacados con necesidades económicas.",
        minimum_average: "15",
        socioeconomic_condition: "Situación económica limitada",
        coverage: "Financiamiento de estudios",
        requirements: "Excelencia académica, situación socioeconómica, entrevista personal",
        process: "Convocatoria anual, evaluación académica y socioeconómica",
        source_url: "https://www.viabcp.com/responsabilidad-social/educacion/becas",
        source: "BCP",
    },
    Entry {
        name: "Programa de Responsabilidad Social BCP - Educación",
        institution: "Banco de Crédito del Perú (BCP)",
        description: "Iniciativa de responsabilidad social del BCP enfocada en el apoyo educativo a jóvenes talentosos.",
        minimum_average: "14-15",
        socioeconomic_condition: "Evaluación socioeconómica",
        coverage: "Apoyo integral para estudios",
        requirements: "Rendimiento académico destacado, necesidad económica comprobada",
        process: "Postulación, evaluación, selección, seguimiento",
        source_url: "https://www.viabcp.com/responsabilidad-social/educacion",
        source: "BCP",
    },
    Entry {
        name: "Apoyo Educativo BCP",
        institution: "Banco de Crédito del Perú (BCP)",
        description: "Programa de apoyo educativo del BCP para estudiantes universitarios y de educación superior.",
        minimum_average: "Variable según programa",
        socioeconomic_condition: "Evaluación integral",
        coverage: "Financiamiento parcial o total",
        requirements: "Mérito académico, evaluación socioeconómica, compromiso social",
        process: "Convocatoria periódica, evaluación multidimensional",
        source_url: "https://www.viabcp.com/educacion",
        source: "BCP",
    },
];

impl Catalog {
    pub const ALL: [Catalog; 3] = [Catalog::Pronabec, Catalog::Universidades, Catalog::Bcp];

    /// 保存時の取得元ラベル
    pub fn label(&self) -> &'static str {
        match self {
            Catalog::Pronabec => "PRONABEC",
            Catalog::Universidades => "UNIVERSIDADES",
            Catalog::Bcp => "BCP",
        }
    }

    fn entries(&self) -> &'static [Entry] {
        match self {
            Catalog::Pronabec => PRONABEC,
            Catalog::Universidades => UNIVERSIDADES,
            Catalog::Bcp => BCP,
        }
    }

    /// カタログのレコード（取得日時は現在時刻）
    pub fn records(&self) -> Vec<Record> {
        let now = chrono::Local::now().to_rfc3339();
        self.entries()
            .iter()
            .map(|e| Record {
                name: e.name.to_string(),
                institution: e.institution.to_string(),
                description: e.description.to_string(),
                minimum_average: e.minimum_average.to_string(),
                socioeconomic_condition: e.socioeconomic_condition.to_string(),
                coverage: e.coverage.to_string(),
                requirements: e.requirements.to_string(),
                process: e.process.to_string(),
                source_url: e.source_url.to_string(),
                scrape_timestamp: now.clone(),
                source_label: format!("{} - Datos Oficiales", e.source),
                scrape_method: "manual".to_string(),
            })
            .collect()
    }
}

impl std::str::FromStr for Catalog {
    type Err = BecasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pronabec" => Ok(Catalog::Pronabec),
            "universidades" | "universities" => Ok(Catalog::Universidades),
            "bcp" => Ok(Catalog::Bcp),
            _ => Err(BecasError::UnknownCatalog(s.to_string())),
        }
    }
}
