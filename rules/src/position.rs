//! 局面（棋子分布 + 走子方）

use serde::{Deserialize, Serialize};

use crate::constants::SQUARE_COUNT;
use crate::error::RulesError;
use crate::piece::{Piece, PieceKind, Side, Square};

/// 底线棋子排列（从左到右）
const BACK_RANK: [PieceKind; 9] = [
    PieceKind::Chariot,
    PieceKind::Horse,
    PieceKind::Elephant,
    PieceKind::Advisor,
    PieceKind::King,
    PieceKind::Advisor,
    PieceKind::Elephant,
    PieceKind::Horse,
    PieceKind::Chariot,
];

/// 局面
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPosition")]
pub struct Position {
    /// 9x10 棋盘，索引为 rank * 9 + file，使用 Vec 以支持 serde
    squares: Vec<Option<Piece>>,
    /// 当前走子方
    pub side_to_move: Side,
}

impl Position {
    /// 创建空局面（红方先走）
    pub fn empty() -> Self {
        Self {
            squares: vec![None; SQUARE_COUNT],
            side_to_move: Side::Red,
        }
    }

    /// 创建初始局面
    pub fn initial() -> Self {
        let mut position = Self::empty();

        // 黑方在上（行 0），红方在下（行 9）
        for (file, kind) in BACK_RANK.iter().enumerate() {
            let file = file as u8;
            position.set(Square::new_unchecked(file, 0), Some(Piece::new(*kind, Side::Black)));
            position.set(Square::new_unchecked(file, 9), Some(Piece::new(*kind, Side::Red)));
        }

        // 炮
        for file in [1, 7] {
            position.set(Square::new_unchecked(file, 2), Some(Piece::new(PieceKind::Cannon, Side::Black)));
            position.set(Square::new_unchecked(file, 7), Some(Piece::new(PieceKind::Cannon, Side::Red)));
        }

        // 兵/卒
        for file in (0..9).step_by(2) {
            position.set(Square::new_unchecked(file, 3), Some(Piece::new(PieceKind::Soldier, Side::Black)));
            position.set(Square::new_unchecked(file, 6), Some(Piece::new(PieceKind::Soldier, Side::Red)));
        }

        position
    }

    /// 获取指定格子的棋子
    pub fn get(&self, sq: Square) -> Option<Piece> {
        if sq.is_valid() {
            self.squares[sq.to_index()]
        } else {
            None
        }
    }

    /// 设置指定格子的棋子
    pub fn set(&mut self, sq: Square, piece: Option<Piece>) {
        if sq.is_valid() {
            self.squares[sq.to_index()] = piece;
        }
    }

    /// 格子是否为空
    pub fn is_empty(&self, sq: Square) -> bool {
        self.get(sq).is_none()
    }

    /// 移动棋子（不检查规则），返回被吃的棋子
    pub fn move_piece(&mut self, from: Square, to: Square) -> Option<Piece> {
        let piece = self.get(from);
        let captured = self.get(to);
        self.set(from, None);
        self.set(to, piece);
        captured
    }

    /// 临时走一步，在走后的局面上执行 `f`，然后无条件还原
    pub fn with_move<R>(&mut self, from: Square, to: Square, f: impl FnOnce(&Position) -> R) -> R {
        let captured = self.move_piece(from, to);
        let result = f(self);
        self.move_piece(to, from);
        self.set(to, captured);
        result
    }

    /// 查找指定阵营的将/帅位置
    pub fn find_king(&self, side: Side) -> Option<Square> {
        let king = Piece::new(PieceKind::King, side);
        Square::all().find(|&sq| self.get(sq) == Some(king))
    }

    /// 获取指定阵营的所有棋子位置
    pub fn pieces(&self, side: Side) -> Vec<(Square, Piece)> {
        self.all_pieces()
            .into_iter()
            .filter(|(_, piece)| piece.side == side)
            .collect()
    }

    /// 获取所有棋子
    pub fn all_pieces(&self) -> Vec<(Square, Piece)> {
        Square::all()
            .filter_map(|sq| self.get(sq).map(|piece| (sq, piece)))
            .collect()
    }

    /// 统计某种棋子的数量
    pub fn count(&self, piece: Piece) -> usize {
        self.squares.iter().filter(|p| **p == Some(piece)).count()
    }

    /// 检查两个将是否面对面（同列且中间无子）
    pub fn kings_facing(&self) -> bool {
        let (Some(red), Some(black)) = (self.find_king(Side::Red), self.find_king(Side::Black)) else {
            return false;
        };

        if red.file != black.file {
            return false;
        }

        let (top, bottom) = if red.rank < black.rank {
            (red.rank, black.rank)
        } else {
            (black.rank, red.rank)
        };

        ((top + 1)..bottom).all(|rank| self.is_empty(Square::new_unchecked(red.file, rank)))
    }
}

/// 反序列化的中间形式，格子数在转换时检查
#[derive(Deserialize)]
struct RawPosition {
    squares: Vec<Option<Piece>>,
    side_to_move: Side,
}

impl TryFrom<RawPosition> for Position {
    type Error = RulesError;

    fn try_from(raw: RawPosition) -> Result<Self, Self::Error> {
        if raw.squares.len() != SQUARE_COUNT {
            return Err(RulesError::malformed(format!(
                "expected {} squares, got {}",
                SQUARE_COUNT,
                raw.squares.len()
            )));
        }
        Ok(Self {
            squares: raw.squares,
            side_to_move: raw.side_to_move,
        })
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::initial()
    }
}
