//! 奨学金名の類似度
//!
//! ## スコア
//! 1. 両方の名前を正規化
//! 2. 一致ブロック方式の類似率 `2*M/T`（M: 一致ブロック長の合計、T: 両文字列長の合計）
//! 3. 共通単語ボーナス `(共通語数 / 多い方の語数) * 0.3`
//! 4. 合計を1.0で打ち切り
//!
//! どちらかが空文字列のときは常に0.0（空同士でも完全一致扱いにしない）。

use crate::normalize::{normalize, strip_punctuation};
use std::collections::{HashMap, HashSet};

/// 共通単語ボーナスの重み
const WORD_BONUS_WEIGHT: f64 = 0.3;

/// この長さ以上の比較対象では、出現頻度が1%を超える文字を索引から外す
const AUTOJUNK_MIN_LEN: usize = 200;

/// ゆるい同一判定で共通語に含まれている必要があるキーワード
const ENTITY_KEYWORDS: &[&str] = &["beca", "scholarship"];

/// 2つの名前の類似度（0.0〜1.0）
pub fn score(a: &str, b: &str) -> f64 {
    score_keys(&normalize(a), &normalize(b))
}

/// 正規化済みキー同士の類似度
///
/// 突合では1レコードにつき1回だけ正規化し、この関数で総当たりする。
pub fn score_keys(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    // 一致ブロックの探索は引数の順序で結果が変わりうるため、順序を固定して対称性を保つ
    let (first, second) = if a <= b { (a, b) } else { (b, a) };
    let base = ratio(first, second);

    (base + word_bonus(a, b)).clamp(0.0, 1.0)
}

/// 一致ブロック方式の類似率
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let matched = BlockMatcher::new(&a, &b).matched_len();
    2.0 * matched as f64 / (a.len() + b.len()) as f64
}

/// 共通単語ボーナス
pub fn word_bonus(a: &str, b: &str) -> f64 {
    let words_a: HashSet<&str> = a.split_whitespace().collect();
    let words_b: HashSet<&str> = b.split_whitespace().collect();

    let larger = words_a.len().max(words_b.len());
    if words_a.is_empty() || words_b.is_empty() {
        return 0.0;
    }

    let common = words_a.intersection(&words_b).count();
    common as f64 / larger as f64 * WORD_BONUS_WEIGHT
}

/// 同じ奨学金を指していそうか（数値スコアとは独立した判定）
///
/// 記号を除いた小文字文字列で、次のいずれかを満たせば真:
/// - 完全一致
/// - 一方が他方を含む
/// - 共通語が2語以上あり、その中に "beca" か "scholarship" がある
pub fn looks_same_entity(a: &str, b: &str) -> bool {
    let a = strip_punctuation(a);
    let b = strip_punctuation(b);

    if a.is_empty() || b.is_empty() {
        return false;
    }

    if a == b || a.contains(&b) || b.contains(&a) {
        return true;
    }

    let words_a: HashSet<&str> = a.split_whitespace().collect();
    let words_b: HashSet<&str> = b.split_whitespace().collect();
    let common: HashSet<&str> = words_a.intersection(&words_b).copied().collect();

    common.len() >= 2 && ENTITY_KEYWORDS.iter().any(|k| common.contains(k))
}

/// 最長一致ブロックを再帰的に探す
struct BlockMatcher<'a> {
    a: &'a [char],
    b: &'a [char],
    /// b の文字 → 出現位置（昇順）
    b2j: HashMap<char, Vec<usize>>,
}

impl<'a> BlockMatcher<'a> {
    fn new(a: &'a [char], b: &'a [char]) -> Self {
        let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, &c) in b.iter().enumerate() {
            b2j.entry(c).or_default().push(j);
        }

        if b.len() >= AUTOJUNK_MIN_LEN {
            let limit = b.len() / 100 + 1;
            b2j.retain(|_, positions| positions.len() <= limit);
        }

        Self { a, b, b2j }
    }

    /// a[alo..ahi] と b[blo..bhi] の最長一致 (i, j, size)
    ///
    /// 同じ長さなら a で最も早く、次に b で最も早く始まるものを返す。
    fn longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> (usize, usize, usize) {
        let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);
        let mut j2len: HashMap<usize, usize> = HashMap::new();

        for i in alo..ahi {
            let mut next_j2len: HashMap<usize, usize> = HashMap::new();
            if let Some(positions) = self.b2j.get(&self.a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let prev = if j > 0 { j2len.get(&(j - 1)).copied().unwrap_or(0) } else { 0 };
                    let k = prev + 1;
                    next_j2len.insert(j, k);
                    if k > best_size {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_size = k;
                    }
                }
            }
            j2len = next_j2len;
        }

        // 索引から外した高頻度文字も、隣接していれば一致に含める
        while best_i > alo && best_j > blo && self.a[best_i - 1] == self.b[best_j - 1] {
            best_i -= 1;
            best_j -= 1;
            best_size += 1;
        }
        while best_i + best_size < ahi
            && best_j + best_size < bhi
            && self.a[best_i + best_size] == self.b[best_j + best_size]
        {
            best_size += 1;
        }

        (best_i, best_j, best_size)
    }

    /// 一致ブロック長の合計
    fn matched_len(&self) -> usize {
        let mut total = 0;
        let mut queue = vec![(0, self.a.len(), 0, self.b.len())];

        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let (i, j, k) = self.longest_match(alo, ahi, blo, bhi);
            if k == 0 {
                continue;
            }
            total += k;
            if alo < i && blo < j {
                queue.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                queue.push((i + k, ahi, j + k, bhi));
            }
        }

        total
    }
}
