//! 攻击判定、合法走法过滤、将军/将死判定
//!
//! 全部是局面的纯函数，每次调用都从头计算，不缓存任何状态。

use crate::moves::{Move, MoveGenerator};
use crate::piece::{Side, Square};
use crate::position::Position;

/// 规则判定
pub struct Rules;

impl Rules {
    /// 检查格子是否被指定阵营攻击
    ///
    /// 只使用伪合法走法，不做送将过滤，否则会与合法性判定互相递归。
    pub fn is_attacked(position: &Position, target: Square, by: Side) -> bool {
        position
            .pieces(by)
            .into_iter()
            .any(|(from, _)| MoveGenerator::destinations(position, from).contains(&target))
    }

    /// 指定格子上棋子的合法走法
    pub fn legal_moves(position: &Position, from: Square) -> Vec<Move> {
        let Some(piece) = position.get(from) else {
            return Vec::new();
        };

        let mut scratch = position.clone();
        MoveGenerator::piece_moves(position, from)
            .into_iter()
            .filter(|mv| !Self::leaves_king_exposed(&mut scratch, mv.from, mv.to, piece.side))
            .collect()
    }

    /// 指定格子上棋子的合法目标格
    pub fn legal_destinations(position: &Position, from: Square) -> Vec<Square> {
        Self::legal_moves(position, from).into_iter().map(|mv| mv.to).collect()
    }

    /// 指定阵营的所有合法走法
    pub fn legal_moves_for_side(position: &Position, side: Side) -> Vec<Move> {
        position
            .pieces(side)
            .into_iter()
            .flat_map(|(from, _)| Self::legal_moves(position, from))
            .collect()
    }

    /// 检查单个走法是否合法（起点必须有子，目标必须是伪合法目标）
    pub fn is_legal(position: &Position, from: Square, to: Square) -> bool {
        let Some(piece) = position.get(from) else {
            return false;
        };
        if !MoveGenerator::destinations(position, from).contains(&to) {
            return false;
        }
        let mut scratch = position.clone();
        !Self::leaves_king_exposed(&mut scratch, from, to, piece.side)
    }

    /// 模拟走子后判断是否违规：先查将帅照面，再查本方是否被将
    ///
    /// 模拟结束后局面无条件还原。
    fn leaves_king_exposed(scratch: &mut Position, from: Square, to: Square, mover: Side) -> bool {
        scratch.with_move(from, to, |after| {
            if after.kings_facing() {
                return true;
            }
            match after.find_king(mover) {
                Some(king) => Self::is_attacked(after, king, mover.opponent()),
                None => false,
            }
        })
    }

    /// 检查指定阵营是否被将军，没有将视为不被将军
    pub fn in_check(position: &Position, side: Side) -> bool {
        match position.find_king(side) {
            Some(king) => Self::is_attacked(position, king, side.opponent()),
            None => false,
        }
    }

    /// 检查指定阵营是否被将死：被将军且所有棋子都没有合法走法
    pub fn in_checkmate(position: &Position, side: Side) -> bool {
        Self::in_check(position, side) && !Self::has_legal_move(position, side)
    }

    /// 检查指定阵营是否被困毙：未被将军但无子可动
    pub fn is_stalemate(position: &Position, side: Side) -> bool {
        !Self::in_check(position, side) && !Self::has_legal_move(position, side)
    }

    fn has_legal_move(position: &Position, side: Side) -> bool {
        position
            .pieces(side)
            .into_iter()
            .any(|(from, _)| !Self::legal_moves(position, from).is_empty())
    }
}
