//! 中国象棋规则引擎
//!
//! 包含:
//! - 棋子、格子、局面等核心数据结构
//! - 局面串（FEN）编解码
//! - 伪合法走法生成、攻击判定、合法走法过滤
//! - 将军/将死/困毙判定
//! - 纵线记谱（英文和中文）
//! - 摆棋验证
//! - 走子历史和悔棋
//! - 外部分析引擎的走法/评分格式
//! - 棋谱格式 (JSON)

mod board_state;
mod constants;
mod error;
mod external;
mod fen;
mod moves;
mod notation;
mod piece;
mod position;
mod record;
mod rules;
mod setup;

pub use board_state::{BoardState, GameStatus, KingStatus};
pub use constants::*;
pub use error::{Result, RulesError, SetupViolation};
pub use external::{collect_candidates, parse_info_line, Candidate, ExternalMove, Score};
pub use fen::{Fen, INITIAL_FEN};
pub use moves::{Move, MoveGenerator};
pub use notation::Notation;
pub use piece::{Piece, PieceKind, Side, Square};
pub use position::Position;
pub use record::{GameMetadata, GameRecord, RecordedMove, RECORD_VERSION};
pub use rules::Rules;
pub use setup::Setup;
