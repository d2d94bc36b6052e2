//! 外部分析引擎边界
//!
//! 分析引擎运行在独立进程中，这里只负责它使用的走法编码和评分格式：
//! - 走法：`<列><行><列><行>`，列为 `a`-`i`（从左到右），行为 `1`-`10`（从下往上）
//! - 评分：以兵为单位的小数，或 `mate <N>`
//!
//! 引擎的输出是不可信输入，走法在使用前必须经过 `BoardState::select_candidate` 重新验证。

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{BOARD_HEIGHT, BOARD_WIDTH};
use crate::error::{Result, RulesError};
use crate::piece::Square;

/// 外部编码的走法（只保证坐标在棋盘内，不保证合法）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExternalMove {
    pub from: Square,
    pub to: Square,
}

impl ExternalMove {
    pub fn new(from: Square, to: Square) -> Self {
        Self { from, to }
    }

    /// 解析走法串，如 `h3e3`、`b10c8`
    pub fn parse(text: &str) -> Result<Self> {
        if !(4..=6).contains(&text.len()) || !text.is_ascii() {
            return Err(RulesError::external(text, "expected 4 to 6 ascii characters"));
        }

        let bytes = text.as_bytes();
        let mut cursor = 0;
        let from = Self::read_square(text, bytes, &mut cursor)?;
        let to = Self::read_square(text, bytes, &mut cursor)?;

        if cursor != bytes.len() {
            return Err(RulesError::external(text, "trailing characters"));
        }

        Ok(Self { from, to })
    }

    /// 解析单个格子名，如 `h3`、`b10`
    pub fn parse_square(text: &str) -> Result<Square> {
        let bytes = text.as_bytes();
        let mut cursor = 0;
        let square = Self::read_square(text, bytes, &mut cursor)?;
        if cursor != bytes.len() {
            return Err(RulesError::external(text, "trailing characters"));
        }
        Ok(square)
    }

    /// 格子名
    pub fn square_name(sq: Square) -> String {
        format!("{}{}", (b'a' + sq.file) as char, BOARD_HEIGHT - sq.rank as usize)
    }

    fn read_square(text: &str, bytes: &[u8], cursor: &mut usize) -> Result<Square> {
        let file_byte = *bytes
            .get(*cursor)
            .ok_or_else(|| RulesError::external(text, "missing file"))?;
        if !(b'a'..b'a' + BOARD_WIDTH as u8).contains(&file_byte) {
            return Err(RulesError::external(text, format!("file '{}' out of range", file_byte as char)));
        }
        *cursor += 1;

        let digits_start = *cursor;
        while *cursor < bytes.len() && bytes[*cursor].is_ascii_digit() && *cursor - digits_start < 2 {
            *cursor += 1;
        }
        let digits = &text[digits_start..*cursor];
        if digits.is_empty() || digits.starts_with('0') {
            return Err(RulesError::external(text, "missing or invalid rank"));
        }

        let rank_number: usize = digits
            .parse()
            .map_err(|_| RulesError::external(text, "invalid rank"))?;
        if !(1..=BOARD_HEIGHT).contains(&rank_number) {
            return Err(RulesError::external(text, format!("rank {} out of range", rank_number)));
        }

        Ok(Square::new_unchecked(
            file_byte - b'a',
            (BOARD_HEIGHT - rank_number) as u8,
        ))
    }

}

impl fmt::Display for ExternalMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Self::square_name(self.from), Self::square_name(self.to))
    }
}

/// 引擎评分
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Score {
    /// 以百分之一兵为单位
    Centipawns(i32),
    /// N 步杀（负数表示被杀）
    Mate(i32),
}

impl Score {
    /// 解析 `0.35`、`-1.20` 或 `mate 3`
    pub fn parse(text: &str) -> Option<Score> {
        let text = text.trim();
        if let Some(rest) = text.strip_prefix("mate") {
            return rest.trim().parse().ok().map(Score::Mate);
        }
        let pawns: f64 = text.parse().ok()?;
        if !pawns.is_finite() {
            return None;
        }
        Some(Score::Centipawns((pawns * 100.0).round() as i32))
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Score::Centipawns(cp) => write!(f, "{:.2}", *cp as f64 / 100.0),
            Score::Mate(n) => write!(f, "mate {}", n),
        }
    }
}

/// 引擎给出的候选走法（原始串，尚未验证）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub mv: String,
    pub score: Score,
}

impl Candidate {
    pub fn new(mv: impl Into<String>, score: Score) -> Self {
        Self { mv: mv.into(), score }
    }
}

/// 从一行 `info ... multipv N score cp X ... pv <move> ...` 中提取候选
///
/// 没有 `pv` 的行返回 None；没有 `multipv` 视为第 1 条；没有评分视为 0。
pub fn parse_info_line(line: &str) -> Option<(usize, Candidate)> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.first() != Some(&"info") {
        return None;
    }

    let mut multipv = 1;
    let mut score = Score::Centipawns(0);
    let mut pv = None;

    let mut i = 1;
    while i < tokens.len() {
        match tokens[i] {
            "multipv" => {
                multipv = tokens.get(i + 1)?.parse().ok()?;
                i += 2;
            }
            "score" => {
                let value: i32 = tokens.get(i + 2)?.parse().ok()?;
                score = match *tokens.get(i + 1)? {
                    "cp" => Score::Centipawns(value),
                    "mate" => Score::Mate(value),
                    _ => return None,
                };
                i += 3;
            }
            "pv" => {
                pv = tokens.get(i + 1).map(|mv| mv.to_string());
                break;
            }
            _ => i += 1,
        }
    }

    pv.map(|mv| (multipv, Candidate::new(mv, score)))
}

/// 汇总多行分析输出，每个 multipv 序号保留最后一行，按序号从好到差排列
pub fn collect_candidates<'a>(lines: impl IntoIterator<Item = &'a str>) -> Vec<Candidate> {
    let mut by_rank = BTreeMap::new();
    for line in lines {
        if let Some((multipv, candidate)) = parse_info_line(line) {
            by_rank.insert(multipv, candidate);
        }
    }
    by_rank.into_values().collect()
}
