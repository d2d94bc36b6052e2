//! 摆棋验证
//!
//! 用于手动编辑的局面：数量上限、九宫限制、双方将帅必须存在。
//! 将帅照面不在这里检查，只在走子时由合法性过滤拒绝。

use tracing::warn;

use crate::error::SetupViolation;
use crate::piece::{Piece, PieceKind, Side, Square};
use crate::position::Position;

/// 摆棋验证器
pub struct Setup;

impl Setup {
    /// 检查能否在指定格子放置棋子
    pub fn can_place(position: &Position, square: Square, piece: Piece) -> Result<(), SetupViolation> {
        if !square.is_valid() {
            return Err(SetupViolation::OffBoard { square });
        }

        if piece.kind.is_palace_bound() && !square.is_in_palace(piece.side) {
            return Err(SetupViolation::OutsidePalace { piece, square });
        }

        if piece.kind == PieceKind::King && position.find_king(piece.side).is_some() {
            return Err(SetupViolation::KingAlreadyPlaced { side: piece.side });
        }

        let limit = piece.kind.ceiling();
        if position.count(piece) >= limit {
            return Err(SetupViolation::CeilingExceeded {
                kind: piece.kind,
                side: piece.side,
                limit,
            });
        }

        if !position.is_empty(square) {
            return Err(SetupViolation::SquareOccupied { square });
        }

        Ok(())
    }

    /// 放置棋子（先经过 `can_place` 检查）
    pub fn place_piece(position: &mut Position, square: Square, piece: Piece) -> Result<(), SetupViolation> {
        if let Err(violation) = Self::can_place(position, square, piece) {
            warn!("Rejected placement of {} at {}: {}", piece, square, violation);
            return Err(violation);
        }
        position.set(square, Some(piece));
        Ok(())
    }

    /// 移除棋子，将/帅不能移除
    pub fn remove_piece(position: &mut Position, square: Square) -> Result<Piece, SetupViolation> {
        if !square.is_valid() {
            return Err(SetupViolation::OffBoard { square });
        }
        match position.get(square) {
            None => Err(SetupViolation::EmptySquare { square }),
            Some(piece) if piece.kind == PieceKind::King => Err(SetupViolation::CannotRemoveKing { square }),
            Some(piece) => {
                position.set(square, None);
                Ok(piece)
            }
        }
    }

    /// 验证整个局面：双方将帅都在、数量不超限、将帅和士都在九宫内
    pub fn validate_position(position: &Position) -> Result<(), SetupViolation> {
        for side in [Side::Red, Side::Black] {
            if position.find_king(side).is_none() {
                return Err(SetupViolation::KingMissing { side });
            }
        }

        for side in [Side::Red, Side::Black] {
            for kind in PieceKind::ALL {
                let limit = kind.ceiling();
                if position.count(Piece::new(kind, side)) > limit {
                    return Err(SetupViolation::CeilingExceeded { kind, side, limit });
                }
            }
        }

        for (square, piece) in position.all_pieces() {
            if piece.kind.is_palace_bound() && !square.is_in_palace(piece.side) {
                return Err(SetupViolation::OutsidePalace { piece, square });
            }
        }

        Ok(())
    }
}
