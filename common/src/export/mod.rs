//! Comparison workbook builder.

#[cfg(feature = "excel")]
pub mod excel_core;
