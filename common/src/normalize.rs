//! テキスト正規化
//!
//! - 比較キー用の正規化（小文字化・空白統一）
//! - 表示用のタイトルケース化（既知の略語は大文字に戻す）
//! - 記号除去（ゆるい同一判定用）

/// タイトルケース化の後で置き換える略語（部分一致で置換）
const ACRONYMS: &[(&str, &str)] = &[
    ("Bcp", "BCP"),
    ("Pronabec", "PRONABEC"),
    ("Pucp", "PUCP"),
    ("Uni", "UNI"),
    ("Upc", "UPC"),
];

/// 比較キーに正規化する
///
/// 小文字化し、改行・タブを含む連続空白を1つのスペースにまとめ、前後を除去する。
pub fn normalize(text: &str) -> String {
    clean_text(&text.to_lowercase())
}

/// 連続空白の統一と前後の空白除去のみを行う
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 奨学金名を表示用に整形する
///
/// 英字の連続ごとに先頭を大文字・残りを小文字にしてから、
/// 略語表の文字列を文字列全体に対して置き換える。
/// 部分一致なので "Universidad" は "UNIversidad" になる。
pub fn title_case(text: &str) -> String {
    let cleaned = clean_text(text);
    let mut out = String::with_capacity(cleaned.len());
    let mut at_word_start = true;

    for c in cleaned.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }

    ACRONYMS
        .iter()
        .fold(out, |name, (from, to)| name.replace(from, to))
}

/// 英数字と空白以外を取り除いた小文字文字列
pub fn strip_punctuation(text: &str) -> String {
    let kept: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .collect();
    clean_text(&kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("Beca 18"), "beca 18");
        assert_eq!(normalize("  Beca\t\tde\nExcelencia   PUCP "), "beca de excelencia pucp");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize(" \n\t "), "");
    }

    #[test]
    fn test_normalize_keeps_accents() {
        assert_eq!(normalize("Beca Socioeconómica UNMSM"), "beca socioeconómica unmsm");
    }

    #[test]
    fn test_title_case_acronyms() {
        assert_eq!(title_case("beca bcp"), "Beca BCP");
        assert_eq!(title_case("BECA 18 pronabec"), "Beca 18 PRONABEC");
        assert_eq!(title_case("beca de excelencia académica pucp"), "Beca De Excelencia Académica PUCP");
        assert_eq!(title_case("programa pronabec-beca"), "Programa PRONABEC-Beca");
    }

    #[test]
    fn test_title_case_replaces_inside_words() {
        assert_eq!(title_case("universidad nacional"), "UNIversidad Nacional");
        assert_eq!(title_case("beca upcino"), "Beca UPCino");
        assert_eq!(title_case("  universidad   nacional uni "), "UNIversidad Nacional UNI");
        assert_eq!(title_case("beca upc (upcino)"), "Beca UPC (UPCino)");
        // 置換対象は大文字始まりの形だけ
        assert_eq!(title_case("comunidad"), "Comunidad");
    }

    #[test]
    fn test_strip_punctuation() {
        assert_eq!(strip_punctuation("Beca BCP - Educación!"), "beca bcp educacin");
        assert_eq!(strip_punctuation("¿Beca 18?"), "beca 18");
        assert_eq!(strip_punctuation("---"), "");
    }
}
