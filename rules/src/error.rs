//! 错误类型定义

use thiserror::Error;

use crate::piece::{Piece, PieceKind, Side, Square};

/// 摆棋（局面编辑）违规原因
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SetupViolation {
    /// 格子不在棋盘内
    #[error("square {square} is off the board")]
    OffBoard { square: Square },

    /// 缺少将/帅
    #[error("{side} king is missing")]
    KingMissing { side: Side },

    /// 同方已经有将/帅
    #[error("{side} king is already on the board")]
    KingAlreadyPlaced { side: Side },

    /// 超出数量上限
    #[error("too many {kind:?} for {side} (max: {limit})")]
    CeilingExceeded {
        kind: PieceKind,
        side: Side,
        limit: usize,
    },

    /// 将/帅或士离开九宫
    #[error("{piece} must stay inside the palace, got {square}")]
    OutsidePalace { piece: Piece, square: Square },

    /// 格子已有棋子
    #[error("square {square} is occupied")]
    SquareOccupied { square: Square },

    /// 格子上没有棋子
    #[error("no piece at {square}")]
    EmptySquare { square: Square },

    /// 不能移除将/帅
    #[error("the king at {square} cannot be removed")]
    CannotRemoveKing { square: Square },
}

/// 规则引擎错误
///
/// 全部是可恢复的局部错误，作为值返回给调用方。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RulesError {
    /// 棋盘串无法解析
    #[error("Malformed position: {reason}")]
    MalformedPosition { reason: String },

    /// 目标格不在合法走法中，局面未改动
    #[error("Illegal move from {from} to {to}: {reason}")]
    IllegalMove {
        from: Square,
        to: Square,
        reason: String,
    },

    /// 分析引擎返回的走法不可用
    #[error("Invalid external move '{mv}': {reason}")]
    InvalidExternalMove { mv: String, reason: String },

    /// 摆棋违规
    #[error("Setup violation: {0}")]
    Setup(#[from] SetupViolation),

    /// 没有可以悔的棋
    #[error("Nothing to undo")]
    UndoUnavailable,
}

impl RulesError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        RulesError::MalformedPosition {
            reason: reason.into(),
        }
    }

    pub(crate) fn illegal(from: Square, to: Square, reason: impl Into<String>) -> Self {
        RulesError::IllegalMove {
            from,
            to,
            reason: reason.into(),
        }
    }

    pub(crate) fn external(mv: impl Into<String>, reason: impl Into<String>) -> Self {
        RulesError::InvalidExternalMove {
            mv: mv.into(),
            reason: reason.into(),
        }
    }
}

/// 规则操作结果类型
pub type Result<T> = std::result::Result<T, RulesError>;
