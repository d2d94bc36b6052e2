//! 纵线记谱法
//!
//! 列号从走子方自己的右手边数起：红方在下，从右往左为 9→1 的反向，
//! 即最右列为 1；黑方在上，从左往右（黑方视角的右手边）为 1→9。
//!
//! 英文格式：`<字母><起始列><动作><目标>`
//! - 动作：`+` 前进、`-` 后退、`=` 平移
//! - 目标：平移时为目标列，进退时为走过的行数
//!
//! 中文格式：`<棋子><起始列><进/退/平><目标>`
//! - 红方用中文数字，黑方用阿拉伯数字
//! - 斜走的棋子（马、象、士）进退时目标为落点列

use crate::constants::BOARD_HEIGHT;
use crate::piece::{Piece, Side, Square};
use crate::position::Position;

/// 中文数字
const CHINESE_NUMBERS: [char; 9] = ['一', '二', '三', '四', '五', '六', '七', '八', '九'];

/// 走法方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
    Lateral,
}

/// 纵线记谱法
pub struct Notation;

impl Notation {
    /// 英文纵线记谱，必须在走子之前调用（读取起点上的棋子）
    pub fn to_wxf(position: &Position, from: Square, to: Square) -> Option<String> {
        let piece = Self::mover(position, from, to)?;
        let side = piece.side;

        let from_file = Self::file_number(from.file, side);
        let (action, target) = match Self::direction(from, to, side) {
            Direction::Lateral => ('=', Self::file_number(to.file, side)),
            Direction::Forward => ('+', from.rank.abs_diff(to.rank)),
            Direction::Backward => ('-', from.rank.abs_diff(to.rank)),
        };

        Some(format!("{}{}{}{}", piece.kind.letter(), from_file, action, target))
    }

    /// 中文纵线记谱，必须在走子之前调用
    pub fn to_chinese(position: &Position, from: Square, to: Square) -> Option<String> {
        let piece = Self::mover(position, from, to)?;
        let (action, target) = Self::chinese_action_and_target(from, to, piece.side);

        Some(format!(
            "{}{}{}{}",
            piece.display_char(),
            Self::chinese_digit(Self::file_number(from.file, piece.side), piece.side),
            action,
            target
        ))
    }

    /// 中文纵线记谱，同列有多个相同棋子时用前/中/后区分
    pub fn to_chinese_with_disambiguation(position: &Position, from: Square, to: Square) -> Option<String> {
        let piece = Self::mover(position, from, to)?;
        let side = piece.side;

        let mut same_file: Vec<Square> = (0..BOARD_HEIGHT as u8)
            .map(|rank| Square::new_unchecked(from.file, rank))
            .filter(|&sq| position.get(sq) == Some(piece))
            .collect();

        if same_file.len() <= 1 {
            return Self::to_chinese(position, from, to);
        }

        // 从后往前排序（红方行号大的在后，黑方行号小的在后）
        match side {
            Side::Red => same_file.sort_by_key(|sq| std::cmp::Reverse(sq.rank)),
            Side::Black => same_file.sort_by_key(|sq| sq.rank),
        }

        let index = same_file.iter().position(|&sq| sq == from)?;
        let marker = match index {
            0 => '後',
            i if i == same_file.len() - 1 => '前',
            _ => '中',
        };
        let (action, target) = Self::chinese_action_and_target(from, to, side);

        Some(format!("{}{}{}{}", marker, piece.display_char(), action, target))
    }

    /// 起点上的棋子，终点不在棋盘内时返回 None
    fn mover(position: &Position, from: Square, to: Square) -> Option<Piece> {
        if !to.is_valid() {
            return None;
        }
        position.get(from)
    }

    /// 从走子方右手边数起的列号（1-9）
    fn file_number(file: u8, side: Side) -> u8 {
        match side {
            Side::Red => 9 - file,
            Side::Black => file + 1,
        }
    }

    fn direction(from: Square, to: Square, side: Side) -> Direction {
        if from.rank == to.rank {
            return Direction::Lateral;
        }
        let toward_enemy = match side {
            Side::Red => to.rank < from.rank,
            Side::Black => to.rank > from.rank,
        };
        if toward_enemy {
            Direction::Forward
        } else {
            Direction::Backward
        }
    }

    fn chinese_digit(n: u8, side: Side) -> char {
        match side {
            Side::Red => CHINESE_NUMBERS[(n - 1) as usize],
            Side::Black => char::from(b'0' + n),
        }
    }

    fn chinese_action_and_target(from: Square, to: Square, side: Side) -> (char, char) {
        let target_file = Self::chinese_digit(Self::file_number(to.file, side), side);
        let steps = Self::chinese_digit(from.rank.abs_diff(to.rank).max(1), side);

        match Self::direction(from, to, side) {
            Direction::Lateral => ('平', target_file),
            Direction::Forward if from.file == to.file => ('進', steps),
            Direction::Backward if from.file == to.file => ('退', steps),
            Direction::Forward => ('進', target_file),
            Direction::Backward => ('退', target_file),
        }
    }
}
