//! 棋谱记录格式
//!
//! JSON 棋谱：初始局面串 + 每步的外部编码走法和记谱。
//! 载入时逐步重新验证，不信任文件内容。

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::board_state::BoardState;
use crate::error::Result;
use crate::external::ExternalMove;

/// 棋谱版本
pub const RECORD_VERSION: &str = "1.0";

/// 对局元数据
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameMetadata {
    /// 红方玩家名
    pub red_player: String,
    /// 黑方玩家名
    pub black_player: String,
    /// 对局日期
    pub date: String,
}

/// 一步棋的记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedMove {
    /// 外部编码，如 `h3e3`
    #[serde(rename = "move")]
    pub mv: String,
    /// 英文纵线记谱，如 `C2=5`
    pub notation: String,
}

/// 完整的棋谱记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    /// 版本号
    pub version: String,
    /// 元数据
    pub metadata: GameMetadata,
    /// 初始局面串
    pub initial_fen: String,
    /// 走法列表
    pub moves: Vec<RecordedMove>,
}

impl GameRecord {
    /// 创建空棋谱（标准开局）
    pub fn new(red_player: impl Into<String>, black_player: impl Into<String>) -> Self {
        Self {
            version: RECORD_VERSION.to_string(),
            metadata: GameMetadata {
                red_player: red_player.into(),
                black_player: black_player.into(),
                date: Utc::now().format("%Y-%m-%d").to_string(),
            },
            initial_fen: crate::fen::INITIAL_FEN.to_string(),
            moves: Vec::new(),
        }
    }

    /// 从对局状态生成棋谱
    ///
    /// 初始局面取第一步之前的快照；没有走过棋时取当前局面。
    pub fn from_board_state(state: &BoardState, red_player: impl Into<String>, black_player: impl Into<String>) -> Self {
        let mut record = Self::new(red_player, black_player);
        record.initial_fen = state.snapshots().first().cloned().unwrap_or_else(|| state.fen());
        record.moves = state
            .history()
            .iter()
            .zip(state.notations())
            .map(|(mv, notation)| RecordedMove {
                mv: ExternalMove::new(mv.from, mv.to).to_string(),
                notation: notation.clone(),
            })
            .collect();
        record
    }

    /// 重放棋谱，每一步都重新验证
    pub fn replay(&self) -> Result<BoardState> {
        let mut state = BoardState::from_fen(&self.initial_fen)?;
        for recorded in &self.moves {
            let mv = ExternalMove::parse(&recorded.mv)?;
            state.apply_move(mv.from, mv.to)?;
        }
        Ok(state)
    }

    /// 转换为 JSON 字符串
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// 从 JSON 字符串解析
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// 按回合排列的走法文本，如 `1. C2=5  N8+2`
    pub fn to_move_list(&self) -> String {
        let mut output = String::new();
        for (i, pair) in self.moves.chunks(2).enumerate() {
            output.push_str(&format!("{}. {}", i + 1, pair[0].notation));
            if let Some(reply) = pair.get(1) {
                output.push_str(&format!("  {}", reply.notation));
            }
            output.push('\n');
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RulesError;
    use crate::fen::INITIAL_FEN;

    fn played() -> BoardState {
        let mut state = BoardState::initial();
        for mv in ["h3e3", "h10g8", "h1g3"] {
            state.apply_external(mv).unwrap();
        }
        state
    }

    #[test]
    fn test_from_board_state() {
        let record = GameRecord::from_board_state(&played(), "玩家1", "玩家2");

        assert_eq!(record.initial_fen, INITIAL_FEN);
        assert_eq!(record.metadata.red_player, "玩家1");
        let moves: Vec<&str> = record.moves.iter().map(|m| m.mv.as_str()).collect();
        assert_eq!(moves, ["h3e3", "h10g8", "h1g3"]);
        let notations: Vec<&str> = record.moves.iter().map(|m| m.notation.as_str()).collect();
        assert_eq!(notations, ["C2=5", "N8+2", "N2+2"]);
    }

    #[test]
    fn test_json_and_replay() {
        let state = played();
        let record = GameRecord::from_board_state(&state, "红", "黑");

        let json = record.to_json().unwrap();
        assert!(json.contains("\"move\": \"h10g8\""));

        let parsed = GameRecord::from_json(&json).unwrap();
        assert_eq!(parsed, record);

        let replayed = parsed.replay().unwrap();
        assert_eq!(replayed.fen(), state.fen());
        assert_eq!(replayed.notations(), state.notations());
    }

    #[test]
    fn test_replay_rejects_illegal_move() {
        let mut record = GameRecord::from_board_state(&played(), "红", "黑");
        record.moves.push(RecordedMove {
            mv: "a1a9".to_string(),
            notation: "R9+8".to_string(),
        });
        assert!(matches!(record.replay(), Err(RulesError::IllegalMove { .. })));

        record.moves.pop();
        record.moves[0].mv = "bogus".to_string();
        assert!(matches!(record.replay(), Err(RulesError::InvalidExternalMove { .. })));
    }

    #[test]
    fn test_move_list() {
        let record = GameRecord::from_board_state(&played(), "红", "黑");
        assert_eq!(record.to_move_list(), "1. C2=5  N8+2\n2. N2+2\n");
    }

    #[test]
    fn test_empty_state_uses_current_position() {
        let fen = "4k4/9/9/9/9/9/9/9/3rr4/3K5 w - - 0 1";
        let state = BoardState::from_fen(fen).unwrap();
        let record = GameRecord::from_board_state(&state, "红", "黑");
        assert_eq!(record.initial_fen, fen);
        assert!(record.moves.is_empty());
        assert_eq!(record.to_move_list(), "");
    }
}
