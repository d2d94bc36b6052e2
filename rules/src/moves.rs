//! 伪合法走法生成（不考虑送将）

use serde::{Deserialize, Serialize};

use crate::piece::{Piece, PieceKind, Side, Square};
use crate::position::Position;

/// 正交方向
const ORTHOGONAL: [(i8, i8); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

/// 斜向方向
const DIAGONAL: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// 马的 8 个方向和对应的马腿偏移
const HORSE_JUMPS: [((i8, i8), (i8, i8)); 8] = [
    ((1, 2), (0, 1)),
    ((-1, 2), (0, 1)),
    ((1, -2), (0, -1)),
    ((-1, -2), (0, -1)),
    ((2, 1), (1, 0)),
    ((2, -1), (1, 0)),
    ((-2, 1), (-1, 0)),
    ((-2, -1), (-1, 0)),
];

/// 走法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// 起始格
    pub from: Square,
    /// 目标格
    pub to: Square,
    /// 被吃的棋子（如果有）
    pub captured: Option<Piece>,
}

impl Move {
    /// 创建新走法
    pub fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            captured: None,
        }
    }

    /// 创建带吃子的走法
    pub fn with_capture(from: Square, to: Square, captured: Piece) -> Self {
        Self {
            from,
            to,
            captured: Some(captured),
        }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

/// 伪合法走法生成器
pub struct MoveGenerator;

impl MoveGenerator {
    /// 指定格子上棋子的伪合法目标格，空格返回空集
    pub fn destinations(position: &Position, from: Square) -> Vec<Square> {
        Self::piece_moves(position, from).into_iter().map(|mv| mv.to).collect()
    }

    /// 指定格子上棋子的伪合法走法
    pub fn piece_moves(position: &Position, from: Square) -> Vec<Move> {
        let mut moves = Vec::new();
        if let Some(piece) = position.get(from) {
            Self::generate_piece_moves(position, from, piece, &mut moves);
        }
        moves
    }

    /// 指定阵营的所有伪合法走法
    pub fn side_moves(position: &Position, side: Side) -> Vec<Move> {
        let mut moves = Vec::with_capacity(64);
        for (sq, piece) in position.pieces(side) {
            Self::generate_piece_moves(position, sq, piece, &mut moves);
        }
        moves
    }

    fn generate_piece_moves(position: &Position, from: Square, piece: Piece, moves: &mut Vec<Move>) {
        match piece.kind {
            PieceKind::King => Self::generate_king_moves(position, from, piece.side, moves),
            PieceKind::Advisor => Self::generate_advisor_moves(position, from, piece.side, moves),
            PieceKind::Elephant => Self::generate_elephant_moves(position, from, piece.side, moves),
            PieceKind::Horse => Self::generate_horse_moves(position, from, piece.side, moves),
            PieceKind::Chariot => Self::generate_chariot_moves(position, from, piece.side, moves),
            PieceKind::Cannon => Self::generate_cannon_moves(position, from, piece.side, moves),
            PieceKind::Soldier => Self::generate_soldier_moves(position, from, piece.side, moves),
        }
    }

    /// 将/帅：九宫内直走一步
    fn generate_king_moves(position: &Position, from: Square, side: Side, moves: &mut Vec<Move>) {
        for (df, dr) in ORTHOGONAL {
            if let Some(to) = from.offset(df, dr) {
                if to.is_in_palace(side) {
                    Self::try_add_move(position, from, to, side, moves);
                }
            }
        }
    }

    /// 士：九宫内斜走一步
    fn generate_advisor_moves(position: &Position, from: Square, side: Side, moves: &mut Vec<Move>) {
        for (df, dr) in DIAGONAL {
            if let Some(to) = from.offset(df, dr) {
                if to.is_in_palace(side) {
                    Self::try_add_move(position, from, to, side, moves);
                }
            }
        }
    }

    /// 象：走田字，象眼被堵不能走，不能过河
    fn generate_elephant_moves(position: &Position, from: Square, side: Side, moves: &mut Vec<Move>) {
        for (df, dr) in DIAGONAL {
            let Some(to) = from.offset(df * 2, dr * 2) else {
                continue;
            };
            if !to.is_own_half(side) {
                continue;
            }

            // 象眼
            let Some(eye) = from.offset(df, dr) else {
                continue;
            };
            if !position.is_empty(eye) {
                continue;
            }

            Self::try_add_move(position, from, to, side, moves);
        }
    }

    /// 马：走日字，马腿被堵不能走
    fn generate_horse_moves(position: &Position, from: Square, side: Side, moves: &mut Vec<Move>) {
        for ((df, dr), (lf, lr)) in HORSE_JUMPS {
            // 马腿是否被堵，与目标格无关
            match from.offset(lf, lr) {
                Some(leg) if position.is_empty(leg) => {}
                _ => continue,
            }

            if let Some(to) = from.offset(df, dr) {
                Self::try_add_move(position, from, to, side, moves);
            }
        }
    }

    /// 车：直线滑行，遇子停止
    fn generate_chariot_moves(position: &Position, from: Square, side: Side, moves: &mut Vec<Move>) {
        for (df, dr) in ORTHOGONAL {
            let mut current = from;
            while let Some(to) = current.offset(df, dr) {
                if let Some(target) = position.get(to) {
                    if target.side != side {
                        moves.push(Move::with_capture(from, to, target));
                    }
                    break;
                }
                moves.push(Move::new(from, to));
                current = to;
            }
        }
    }

    /// 炮：不吃子时同车，吃子必须隔一个炮架
    fn generate_cannon_moves(position: &Position, from: Square, side: Side, moves: &mut Vec<Move>) {
        for (df, dr) in ORTHOGONAL {
            let mut current = from;
            let mut screened = false;

            while let Some(to) = current.offset(df, dr) {
                match (position.get(to), screened) {
                    (None, false) => moves.push(Move::new(from, to)),
                    (None, true) => {}
                    (Some(_), false) => screened = true,
                    (Some(target), true) => {
                        // 炮架之后的第一个子，是敌子才能吃
                        if target.side != side {
                            moves.push(Move::with_capture(from, to, target));
                        }
                        break;
                    }
                }
                current = to;
            }
        }
    }

    /// 兵/卒：向前一步，过河后可以左右，永不后退
    fn generate_soldier_moves(position: &Position, from: Square, side: Side, moves: &mut Vec<Move>) {
        if let Some(to) = from.offset(0, side.forward()) {
            Self::try_add_move(position, from, to, side, moves);
        }

        if !from.is_own_half(side) {
            for df in [-1i8, 1i8] {
                if let Some(to) = from.offset(df, 0) {
                    Self::try_add_move(position, from, to, side, moves);
                }
            }
        }
    }

    /// 尝试添加走法：空格直接走，敌子可吃，己方子阻挡
    fn try_add_move(position: &Position, from: Square, to: Square, side: Side, moves: &mut Vec<Move>) {
        match position.get(to) {
            Some(target) if target.side != side => moves.push(Move::with_capture(from, to, target)),
            Some(_) => {}
            None => moves.push(Move::new(from, to)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fen::Fen;

    fn place(position: &mut Position, file: u8, rank: u8, kind: PieceKind, side: Side) {
        position.set(Square::new_unchecked(file, rank), Some(Piece::new(kind, side)));
    }

    fn sq(file: u8, rank: u8) -> Square {
        Square::new_unchecked(file, rank)
    }

    #[test]
    fn test_empty_square_has_no_moves() {
        let position = Position::initial();
        assert!(MoveGenerator::destinations(&position, sq(4, 4)).is_empty());
    }

    #[test]
    fn test_initial_pseudo_legal_count() {
        // 初始局面红方伪合法走法 44 个：
        // 炮 2*12，马 2*2，车 2*2，兵 5，相 2*2，仕 2*1，帅 1
        let position = Position::initial();
        let moves = MoveGenerator::side_moves(&position, Side::Red);
        assert_eq!(moves.len(), 44);
    }

    #[test]
    fn test_king_moves() {
        let mut position = Position::empty();
        place(&mut position, 4, 8, PieceKind::King, Side::Red);
        assert_eq!(MoveGenerator::destinations(&position, sq(4, 8)).len(), 4);

        // 角落只有两个方向
        let mut position = Position::empty();
        place(&mut position, 3, 9, PieceKind::King, Side::Red);
        let mut dests = MoveGenerator::destinations(&position, sq(3, 9));
        dests.sort();
        assert_eq!(dests, vec![sq(3, 8), sq(4, 9)]);
    }

    #[test]
    fn test_advisor_moves() {
        let mut position = Position::empty();
        place(&mut position, 4, 1, PieceKind::Advisor, Side::Black);
        assert_eq!(MoveGenerator::destinations(&position, sq(4, 1)).len(), 4);

        let mut position = Position::empty();
        place(&mut position, 3, 0, PieceKind::Advisor, Side::Black);
        assert_eq!(MoveGenerator::destinations(&position, sq(3, 0)), vec![sq(4, 1)]);
    }

    #[test]
    fn test_elephant_moves() {
        let mut position = Position::empty();
        place(&mut position, 2, 9, PieceKind::Elephant, Side::Red);
        let mut dests = MoveGenerator::destinations(&position, sq(2, 9));
        dests.sort();
        assert_eq!(dests, vec![sq(0, 7), sq(4, 7)]);
    }

    #[test]
    fn test_elephant_blocked_eye() {
        let mut position = Position::empty();
        place(&mut position, 2, 9, PieceKind::Elephant, Side::Red);
        place(&mut position, 3, 8, PieceKind::Soldier, Side::Black);
        assert_eq!(MoveGenerator::destinations(&position, sq(2, 9)), vec![sq(0, 7)]);
    }

    #[test]
    fn test_elephant_cannot_cross_river() {
        let mut position = Position::empty();
        place(&mut position, 4, 5, PieceKind::Elephant, Side::Red);
        let dests = MoveGenerator::destinations(&position, sq(4, 5));
        assert_eq!(dests.len(), 2);
        assert!(dests.iter().all(|to| to.rank >= 5));

        let mut position = Position::empty();
        place(&mut position, 2, 4, PieceKind::Elephant, Side::Black);
        let dests = MoveGenerator::destinations(&position, sq(2, 4));
        assert!(dests.iter().all(|to| to.rank <= 4));
        assert_eq!(dests.len(), 2);
    }

    #[test]
    fn test_horse_moves() {
        let mut position = Position::empty();
        place(&mut position, 4, 4, PieceKind::Horse, Side::Red);
        assert_eq!(MoveGenerator::destinations(&position, sq(4, 4)).len(), 8);
    }

    #[test]
    fn test_horse_leg_block() {
        let mut position = Position::empty();
        place(&mut position, 4, 4, PieceKind::Horse, Side::Red);
        place(&mut position, 4, 5, PieceKind::Soldier, Side::Black);
        // 一条马腿挡住两个方向
        assert_eq!(MoveGenerator::destinations(&position, sq(4, 4)).len(), 6);
    }

    #[test]
    fn test_horse_leg_block_at_start() {
        // 初始局面 (1, 9) 的马被 (2, 9) 的相蹩住向右的两步
        let position = Position::initial();
        let blocked = MoveGenerator::destinations(&position, sq(1, 9));

        let mut open = position.clone();
        open.set(sq(2, 9), None);
        let unblocked = MoveGenerator::destinations(&open, sq(1, 9));

        assert!(blocked.len() < unblocked.len());
        assert!(unblocked.contains(&sq(3, 8)));
        assert!(!blocked.contains(&sq(3, 8)));
    }

    #[test]
    fn test_horse_leg_blocks_even_capture() {
        let mut position = Position::empty();
        place(&mut position, 4, 4, PieceKind::Horse, Side::Red);
        place(&mut position, 4, 3, PieceKind::Soldier, Side::Red);
        place(&mut position, 5, 2, PieceKind::Chariot, Side::Black);
        assert!(!MoveGenerator::destinations(&position, sq(4, 4)).contains(&sq(5, 2)));
    }

    #[test]
    fn test_chariot_moves() {
        let mut position = Position::empty();
        place(&mut position, 4, 4, PieceKind::Chariot, Side::Red);
        // 4+4+4+5 = 17
        assert_eq!(MoveGenerator::destinations(&position, sq(4, 4)).len(), 17);
    }

    #[test]
    fn test_chariot_blocked_and_capture() {
        let mut position = Position::empty();
        place(&mut position, 4, 4, PieceKind::Chariot, Side::Red);
        place(&mut position, 4, 6, PieceKind::Soldier, Side::Red);
        place(&mut position, 4, 2, PieceKind::Soldier, Side::Black);

        let moves = MoveGenerator::piece_moves(&position, sq(4, 4));
        // 向下 1 格，向上 2 格（含吃子），左右 4+4
        assert_eq!(moves.len(), 11);

        let capture = moves.iter().find(|m| m.to == sq(4, 2)).unwrap();
        assert_eq!(capture.captured, Some(Piece::new(PieceKind::Soldier, Side::Black)));
        assert!(moves.iter().all(|m| m.to != sq(4, 6) && m.to != sq(4, 1)));
    }

    #[test]
    fn test_cannon_moves_empty_board() {
        let mut position = Position::empty();
        place(&mut position, 4, 4, PieceKind::Cannon, Side::Red);
        assert_eq!(MoveGenerator::destinations(&position, sq(4, 4)).len(), 17);
    }

    #[test]
    fn test_cannon_capture_over_screen() {
        let mut position = Position::empty();
        place(&mut position, 4, 6, PieceKind::Cannon, Side::Red);
        place(&mut position, 4, 4, PieceKind::Soldier, Side::Red);
        place(&mut position, 4, 3, PieceKind::Soldier, Side::Black);

        let moves = MoveGenerator::piece_moves(&position, sq(4, 6));
        assert!(moves.iter().any(|m| m.to == sq(4, 3) && m.captured.is_some()));
        // 炮架本身不能走
        assert!(moves.iter().all(|m| m.to != sq(4, 4)));
    }

    #[test]
    fn test_cannon_needs_screen() {
        // 前方没有炮架，敌子不能被吃
        let mut position = Position::empty();
        place(&mut position, 4, 6, PieceKind::Cannon, Side::Red);
        place(&mut position, 4, 2, PieceKind::Soldier, Side::Black);
        place(&mut position, 4, 0, PieceKind::Chariot, Side::Black);

        let dests = MoveGenerator::destinations(&position, sq(4, 6));
        assert!(!dests.contains(&sq(4, 2)));
        // (4, 2) 作为炮架，(4, 0) 才能吃
        assert!(dests.contains(&sq(4, 0)));
    }

    #[test]
    fn test_cannon_only_first_piece_after_screen() {
        let mut position = Position::empty();
        place(&mut position, 0, 9, PieceKind::Cannon, Side::Red);
        place(&mut position, 0, 7, PieceKind::Soldier, Side::Black);
        place(&mut position, 0, 5, PieceKind::Soldier, Side::Red);
        place(&mut position, 0, 3, PieceKind::Chariot, Side::Black);

        // 炮架后第一个子是己方，射线结束
        let dests = MoveGenerator::destinations(&position, sq(0, 9));
        assert!(!dests.contains(&sq(0, 5)));
        assert!(!dests.contains(&sq(0, 3)));
        assert!(dests.contains(&sq(0, 8)));
    }

    #[test]
    fn test_soldier_before_river() {
        let mut position = Position::empty();
        place(&mut position, 4, 6, PieceKind::Soldier, Side::Red);
        assert_eq!(MoveGenerator::destinations(&position, sq(4, 6)), vec![sq(4, 5)]);
    }

    #[test]
    fn test_soldier_after_river() {
        let mut position = Position::empty();
        place(&mut position, 4, 4, PieceKind::Soldier, Side::Red);
        let mut dests = MoveGenerator::destinations(&position, sq(4, 4));
        dests.sort();
        assert_eq!(dests, vec![sq(3, 4), sq(4, 3), sq(5, 4)]);
    }

    #[test]
    fn test_black_soldier() {
        let mut position = Position::empty();
        place(&mut position, 4, 5, PieceKind::Soldier, Side::Black);
        let dests = MoveGenerator::destinations(&position, sq(4, 5));
        assert_eq!(dests.len(), 3);
        assert!(dests.contains(&sq(4, 6)));
        assert!(dests.iter().all(|to| to.rank >= 5));
    }

    #[test]
    fn test_soldier_on_last_rank() {
        // 到底线后只能横走
        let mut position = Position::empty();
        place(&mut position, 0, 0, PieceKind::Soldier, Side::Red);
        assert_eq!(MoveGenerator::destinations(&position, sq(0, 0)), vec![sq(1, 0)]);
    }

    #[test]
    fn test_side_moves_from_fen() {
        let position = Fen::parse("4k4/9/9/9/9/9/9/9/4r4/4K4 w - - 0 1").unwrap();
        let black = MoveGenerator::side_moves(&position, Side::Black);
        assert!(black.iter().any(|m| m.to == sq(4, 9) && m.captured.is_some()));
    }
}
