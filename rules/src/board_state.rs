//! 对局状态：局面 + 走子历史
//!
//! 所有修改（走子、悔棋、载入局面）都通过 `&mut BoardState` 进行，
//! 调用方负责保证同一时刻只有一个写者。

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Result, RulesError};
use crate::external::{Candidate, ExternalMove, Score};
use crate::fen::Fen;
use crate::moves::Move;
use crate::notation::Notation;
use crate::piece::{Side, Square};
use crate::position::Position;
use crate::rules::Rules;

/// 单方将帅状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KingStatus {
    Safe,
    InCheck,
    Checkmated,
}

/// 双方将帅状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStatus {
    pub red: KingStatus,
    pub black: KingStatus,
}

impl GameStatus {
    pub fn of(&self, side: Side) -> KingStatus {
        match side {
            Side::Red => self.red,
            Side::Black => self.black,
        }
    }
}

/// 完整的对局状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardState {
    position: Position,
    /// 已走的棋（含被吃的子，用于悔棋）
    history: Vec<Move>,
    /// 每步走之前的局面串
    snapshots: Vec<String>,
    /// 每步的英文记谱
    notations: Vec<String>,
}

impl BoardState {
    /// 从指定局面开始，历史为空
    pub fn new(position: Position) -> Self {
        Self {
            position,
            history: Vec::new(),
            snapshots: Vec::new(),
            notations: Vec::new(),
        }
    }

    /// 标准开局
    pub fn initial() -> Self {
        Self::new(Position::initial())
    }

    /// 从局面串创建
    pub fn from_fen(fen: &str) -> Result<Self> {
        Ok(Self::new(Fen::parse(fen)?))
    }

    /// 载入新局面并清空历史；解析失败时原状态不变
    pub fn set_position(&mut self, fen: &str) -> Result<()> {
        let position = Fen::parse(fen)?;
        debug!("Loaded position {}", fen);
        *self = Self::new(position);
        Ok(())
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn side_to_move(&self) -> Side {
        self.position.side_to_move
    }

    pub fn history(&self) -> &[Move] {
        &self.history
    }

    pub fn notations(&self) -> &[String] {
        &self.notations
    }

    pub fn snapshots(&self) -> &[String] {
        &self.snapshots
    }

    /// 当前局面串
    pub fn fen(&self) -> String {
        Fen::to_string(&self.position)
    }

    /// 指定格子上棋子的合法走法
    pub fn legal_moves(&self, from: Square) -> Vec<Move> {
        Rules::legal_moves(&self.position, from)
    }

    /// 走子方的全部合法走法
    pub fn legal_moves_for_side_to_move(&self) -> Vec<Move> {
        Rules::legal_moves_for_side(&self.position, self.side_to_move())
    }

    /// 走一步棋
    ///
    /// 起点必须是走子方的棋子，目标必须在合法走法中；否则返回
    /// `IllegalMove`，局面不变。
    pub fn apply_move(&mut self, from: Square, to: Square) -> Result<Move> {
        let side = self.side_to_move();
        let piece = self
            .position
            .get(from)
            .ok_or_else(|| RulesError::illegal(from, to, "no piece at origin"))?;

        if piece.side != side {
            return Err(RulesError::illegal(from, to, format!("it is {}'s turn", side)));
        }
        if !Rules::legal_destinations(&self.position, from).contains(&to) {
            return Err(RulesError::illegal(from, to, "not a legal destination"));
        }

        // 记谱和快照都要在走子之前取
        let notation = Notation::to_wxf(&self.position, from, to)
            .ok_or_else(|| RulesError::illegal(from, to, "no piece at origin"))?;
        self.snapshots.push(self.fen());

        let captured = self.position.move_piece(from, to);
        self.position.side_to_move = side.opponent();

        let mv = Move { from, to, captured };
        debug!("{} played {} ({})", side, mv, notation);

        self.history.push(mv);
        self.notations.push(notation);
        Ok(mv)
    }

    /// 悔一步棋
    pub fn undo(&mut self) -> Result<Move> {
        let mv = self.history.pop().ok_or(RulesError::UndoUnavailable)?;

        let piece = self.position.get(mv.to);
        self.position.set(mv.from, piece);
        self.position.set(mv.to, mv.captured);
        self.position.side_to_move = self.position.side_to_move.opponent();

        self.notations.pop();
        self.snapshots.pop();

        debug!("Undid {}", mv);
        Ok(mv)
    }

    /// 双方将帅状态，每次调用重新计算
    pub fn status(&self) -> GameStatus {
        GameStatus {
            red: self.king_status(Side::Red),
            black: self.king_status(Side::Black),
        }
    }

    fn king_status(&self, side: Side) -> KingStatus {
        if Rules::in_checkmate(&self.position, side) {
            KingStatus::Checkmated
        } else if Rules::in_check(&self.position, side) {
            KingStatus::InCheck
        } else {
            KingStatus::Safe
        }
    }

    /// 当前局面在之前出现过的次数
    pub fn repetitions(&self) -> usize {
        let current = self.fen();
        self.snapshots.iter().filter(|s| **s == current).count()
    }

    /// 验证外部引擎给出的走法，不修改局面
    pub fn validate_external(&self, text: &str) -> Result<ExternalMove> {
        let result = self.check_external(text);
        if let Err(err) = &result {
            warn!("Rejected external move: {}", err);
        }
        result
    }

    fn check_external(&self, text: &str) -> Result<ExternalMove> {
        let mv = ExternalMove::parse(text)?;
        let side = self.side_to_move();

        match self.position.get(mv.from) {
            Some(piece) if piece.side == side => {}
            Some(_) => return Err(RulesError::external(text, format!("origin is not a {} piece", side))),
            None => return Err(RulesError::external(text, "no piece at origin")),
        }

        if !Rules::is_legal(&self.position, mv.from, mv.to) {
            return Err(RulesError::external(text, "not a legal move in this position"));
        }

        Ok(mv)
    }

    /// 验证后走外部引擎给出的走法
    pub fn apply_external(&mut self, text: &str) -> Result<Move> {
        let mv = self.validate_external(text)?;
        self.apply_move(mv.from, mv.to)
    }

    /// 按从好到差的顺序，返回第一个通过验证的候选
    ///
    /// 全部不可用时返回 `InvalidExternalMove`，调用方应视为“没有可用走法”。
    pub fn select_candidate(&self, candidates: &[Candidate]) -> Result<(ExternalMove, Score)> {
        candidates
            .iter()
            .find_map(|c| self.validate_external(&c.mv).ok().map(|mv| (mv, c.score)))
            .ok_or_else(|| {
                let tried: Vec<&str> = candidates.iter().map(|c| c.mv.as_str()).collect();
                RulesError::external(tried.join(","), "no usable move")
            })
    }
}

impl Default for BoardState {
    fn default() -> Self {
        Self::initial()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fen::INITIAL_FEN;
    use crate::piece::{Piece, PieceKind};

    fn sq(file: u8, rank: u8) -> Square {
        Square::new_unchecked(file, rank)
    }

    #[test]
    fn test_apply_move() {
        let mut state = BoardState::initial();

        // 炮二平五
        let mv = state.apply_move(sq(7, 7), sq(4, 7)).unwrap();
        assert_eq!(mv.captured, None);
        assert_eq!(state.side_to_move(), Side::Black);
        assert_eq!(state.notations(), ["C2=5"]);
        assert_eq!(state.snapshots(), [INITIAL_FEN]);
        assert_eq!(
            state.position().get(sq(4, 7)),
            Some(Piece::new(PieceKind::Cannon, Side::Red))
        );
    }

    #[test]
    fn test_illegal_move_leaves_state_unchanged() {
        let mut state = BoardState::initial();
        let before = state.clone();

        // 马腿被堵
        assert!(matches!(
            state.apply_move(sq(1, 9), sq(3, 8)).err(),
            Some(RulesError::IllegalMove { .. })
        ));
        // 空格
        assert!(state.apply_move(sq(4, 5), sq(4, 4)).is_err());
        // 不是走子方
        assert!(state.apply_move(sq(1, 2), sq(4, 2)).is_err());

        assert_eq!(state, before);
    }

    #[test]
    fn test_capture_and_undo() {
        let mut state = BoardState::initial();
        state.apply_move(sq(7, 7), sq(4, 7)).unwrap();
        state.apply_move(sq(1, 2), sq(4, 2)).unwrap();

        // 红炮打中卒
        let mv = state.apply_move(sq(4, 7), sq(4, 3)).unwrap();
        assert_eq!(mv.captured, Some(Piece::new(PieceKind::Soldier, Side::Black)));
        assert_eq!(state.notations().last().unwrap(), "C5+4");

        let undone = state.undo().unwrap();
        assert_eq!(undone, mv);
        assert_eq!(
            state.position().get(sq(4, 3)),
            Some(Piece::new(PieceKind::Soldier, Side::Black))
        );
        assert_eq!(state.side_to_move(), Side::Red);
        assert_eq!(state.notations().len(), 2);

        state.undo().unwrap();
        state.undo().unwrap();
        assert_eq!(state.fen(), INITIAL_FEN);
        assert_eq!(state, BoardState::initial());
    }

    #[test]
    fn test_undo_empty() {
        let mut state = BoardState::initial();
        assert_eq!(state.undo(), Err(RulesError::UndoUnavailable));
        assert_eq!(state, BoardState::initial());
    }

    #[test]
    fn test_set_position_clears_history() {
        let mut state = BoardState::initial();
        state.apply_move(sq(7, 7), sq(4, 7)).unwrap();

        let fen = "4k4/9/9/9/9/9/9/9/3rr4/3K5 w - - 0 1";
        state.set_position(fen).unwrap();
        assert!(state.history().is_empty());
        assert!(state.notations().is_empty());
        assert_eq!(state.fen(), fen);

        // 解析失败时保持原状
        assert!(state.set_position("not a position").is_err());
        assert_eq!(state.fen(), fen);
    }

    #[test]
    fn test_status() {
        let state = BoardState::initial();
        let status = state.status();
        assert_eq!(status.red, KingStatus::Safe);
        assert_eq!(status.black, KingStatus::Safe);

        let state = BoardState::from_fen("4k4/9/9/9/9/9/9/9/3rr4/3K5 w - - 0 1").unwrap();
        assert_eq!(state.status().of(Side::Red), KingStatus::Checkmated);
        assert_eq!(state.status().of(Side::Black), KingStatus::Safe);

        let state = BoardState::from_fen("3k5/9/9/9/9/9/9/9/4r4/4K4 w - - 0 1").unwrap();
        assert_eq!(state.status().red, KingStatus::InCheck);
    }

    #[test]
    fn test_repetitions() {
        let mut state = BoardState::initial();
        assert_eq!(state.repetitions(), 0);

        // 双方马出再回，局面重复
        for _ in 0..2 {
            state.apply_move(sq(7, 9), sq(6, 7)).unwrap();
            state.apply_move(sq(7, 0), sq(6, 2)).unwrap();
            state.apply_move(sq(6, 7), sq(7, 9)).unwrap();
            state.apply_move(sq(6, 2), sq(7, 0)).unwrap();
        }
        assert_eq!(state.fen(), INITIAL_FEN);
        assert_eq!(state.repetitions(), 2);
    }

    #[test]
    fn test_apply_external() {
        let mut state = BoardState::initial();
        let mv = state.apply_external("h3e3").unwrap();
        assert_eq!((mv.from, mv.to), (sq(7, 7), sq(4, 7)));

        // 黑方走子时不能走红子
        assert!(matches!(
            state.apply_external("b3e3"),
            Err(RulesError::InvalidExternalMove { .. })
        ));
        // 伪合法但不在棋子走法中
        assert!(state.apply_external("b10b5").is_err());
        // 空格
        assert!(state.apply_external("e5e4").is_err());
        assert_eq!(state.history().len(), 1);
    }

    #[test]
    fn test_select_candidate_skips_invalid() {
        let state = BoardState::initial();
        let candidates = vec![
            Candidate::new("zz99", Score::Centipawns(80)),
            Candidate::new("b10c8", Score::Centipawns(60)),
            Candidate::new("h3e3", Score::Centipawns(35)),
            Candidate::new("b3e3", Score::Centipawns(30)),
        ];

        let (mv, score) = state.select_candidate(&candidates).unwrap();
        assert_eq!(mv.to_string(), "h3e3");
        assert_eq!(score, Score::Centipawns(35));
    }

    #[test]
    fn test_select_candidate_none_usable() {
        let state = BoardState::initial();
        let candidates = vec![Candidate::new("a1a9", Score::Mate(2))];
        assert!(matches!(
            state.select_candidate(&candidates),
            Err(RulesError::InvalidExternalMove { .. })
        ));
        assert!(state.select_candidate(&[]).is_err());
    }
}
