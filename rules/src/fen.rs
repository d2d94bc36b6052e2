//! 局面串（FEN）解析和生成
//!
//! 格式：
//! `<行0>/<行1>/…/<行9> <走子方> - - 0 1`
//!
//! 行从棋盘上方（黑方底线）到下方（红方底线），每行从左到右。
//! 大写为红方，小写为黑方，数字表示连续空格数。走子方 `w` 为红，`b` 为黑。
//!
//! 示例：
//! `rnbakabnr/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C1/9/RNBAKABNR w - - 0 1`

use crate::constants::{BOARD_HEIGHT, BOARD_WIDTH, CODEC_TRAILER, ROW_SEPARATOR};
use crate::error::{Result, RulesError};
use crate::piece::{Piece, Side, Square};
use crate::position::Position;

/// 初始局面
pub const INITIAL_FEN: &str = "rnbakabnr/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C1/9/RNBAKABNR w - - 0 1";

/// FEN 格式处理
pub struct Fen;

impl Fen {
    /// 解析局面串
    ///
    /// 走子方之后的字段（回合计数占位）被忽略。
    pub fn parse(fen: &str) -> Result<Position> {
        let mut parts = fen.split_whitespace();

        let board_str = parts
            .next()
            .ok_or_else(|| RulesError::malformed("empty position string"))?;
        let mut position = Self::parse_board(board_str)?;

        let side_str = parts
            .next()
            .ok_or_else(|| RulesError::malformed("missing side to move"))?;
        let mut chars = side_str.chars();
        position.side_to_move = match (chars.next(), chars.next()) {
            (Some(c), None) => Side::from_codec_char(c)
                .ok_or_else(|| RulesError::malformed(format!("invalid side to move: {}", side_str)))?,
            _ => return Err(RulesError::malformed(format!("invalid side to move: {}", side_str))),
        };

        Ok(position)
    }

    /// 解析棋盘部分
    fn parse_board(board_str: &str) -> Result<Position> {
        let mut position = Position::empty();
        let rows: Vec<&str> = board_str.split(ROW_SEPARATOR).collect();

        if rows.len() != BOARD_HEIGHT {
            return Err(RulesError::malformed(format!(
                "expected {} rows, got {}",
                BOARD_HEIGHT,
                rows.len()
            )));
        }

        for (rank, row) in rows.iter().enumerate() {
            let mut file = 0usize;

            for c in row.chars() {
                if let Some(run) = c.to_digit(10) {
                    // "11" 与 "2" 等价，逐位累加
                    if run == 0 {
                        return Err(RulesError::malformed(format!("row {} has a zero-length run", rank)));
                    }
                    file += run as usize;
                } else if let Some(piece) = Piece::from_codec_char(c) {
                    if file < BOARD_WIDTH {
                        position.set(Square::new_unchecked(file as u8, rank as u8), Some(piece));
                    }
                    file += 1;
                } else {
                    return Err(RulesError::malformed(format!("invalid piece character: {}", c)));
                }

                if file > BOARD_WIDTH {
                    return Err(RulesError::malformed(format!("row {} has too many columns", rank)));
                }
            }

            if file != BOARD_WIDTH {
                return Err(RulesError::malformed(format!(
                    "row {} has {} columns, expected {}",
                    rank, file, BOARD_WIDTH
                )));
            }
        }

        Ok(position)
    }

    /// 将局面转换为局面串
    pub fn to_string(position: &Position) -> String {
        format!(
            "{} {} {}",
            Self::board_to_string(position),
            position.side_to_move.to_codec_char(),
            CODEC_TRAILER
        )
    }

    /// 将棋盘转换为局面串的棋盘部分（空格总是用单个数字表示）
    pub fn board_to_string(position: &Position) -> String {
        let mut rows = Vec::with_capacity(BOARD_HEIGHT);

        for rank in 0..BOARD_HEIGHT as u8 {
            let mut row = String::new();
            let mut empty_count = 0;

            for file in 0..BOARD_WIDTH as u8 {
                if let Some(piece) = position.get(Square::new_unchecked(file, rank)) {
                    if empty_count > 0 {
                        row.push_str(&empty_count.to_string());
                        empty_count = 0;
                    }
                    row.push(piece.to_codec_char());
                } else {
                    empty_count += 1;
                }
            }

            if empty_count > 0 {
                row.push_str(&empty_count.to_string());
            }

            rows.push(row);
        }

        rows.join(&ROW_SEPARATOR.to_string())
    }

    /// 解析初始局面
    pub fn initial() -> Position {
        Self::parse(INITIAL_FEN).expect("Initial FEN should be valid")
    }
}
