//! 棋子与格子定义

use serde::{Deserialize, Serialize};

use crate::constants::{
    BLACK_PALACE_RANKS, BOARD_HEIGHT, BOARD_WIDTH, PALACE_FILES, RED_PALACE_RANKS,
    RIVER_BLACK_EDGE, RIVER_RED_EDGE,
};

/// 棋子种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    /// 将/帅
    King,
    /// 士/仕
    Advisor,
    /// 象/相
    Elephant,
    /// 马/傌
    Horse,
    /// 车/俥
    Chariot,
    /// 炮/砲
    Cannon,
    /// 兵/卒
    Soldier,
}

impl PieceKind {
    /// 所有棋子种类
    pub const ALL: [PieceKind; 7] = [
        PieceKind::King,
        PieceKind::Advisor,
        PieceKind::Elephant,
        PieceKind::Horse,
        PieceKind::Chariot,
        PieceKind::Cannon,
        PieceKind::Soldier,
    ];

    /// 每方该种棋子的数量上限
    pub fn ceiling(&self) -> usize {
        match self {
            PieceKind::King => 1,
            PieceKind::Soldier => 5,
            _ => 2,
        }
    }

    /// 记谱用的英文字母
    pub fn letter(&self) -> char {
        match self {
            PieceKind::King => 'K',
            PieceKind::Advisor => 'A',
            PieceKind::Elephant => 'B',
            PieceKind::Horse => 'N',
            PieceKind::Chariot => 'R',
            PieceKind::Cannon => 'C',
            PieceKind::Soldier => 'P',
        }
    }

    /// 是否被限制在九宫内
    pub fn is_palace_bound(&self) -> bool {
        matches!(self, PieceKind::King | PieceKind::Advisor)
    }
}

/// 阵营
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// 红方（先手，在下方）
    Red,
    /// 黑方（后手，在上方）
    Black,
}

impl Side {
    /// 获取对方阵营
    pub fn opponent(&self) -> Side {
        match self {
            Side::Red => Side::Black,
            Side::Black => Side::Red,
        }
    }

    /// 前进方向的行增量（红方向上，黑方向下）
    pub fn forward(&self) -> i8 {
        match self {
            Side::Red => -1,
            Side::Black => 1,
        }
    }

    /// 棋盘串中的走子方标记
    pub fn to_codec_char(&self) -> char {
        match self {
            Side::Red => 'w',
            Side::Black => 'b',
        }
    }

    /// 从走子方标记解析
    pub fn from_codec_char(c: char) -> Option<Side> {
        match c {
            'w' => Some(Side::Red),
            'b' => Some(Side::Black),
            _ => None,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Red => write!(f, "red"),
            Side::Black => write!(f, "black"),
        }
    }
}

/// 棋子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub side: Side,
}

impl Piece {
    /// 创建新棋子
    pub const fn new(kind: PieceKind, side: Side) -> Self {
        Self { kind, side }
    }

    /// 获取棋子显示的汉字
    pub fn display_char(&self) -> char {
        match (self.kind, self.side) {
            (PieceKind::King, Side::Red) => '帥',
            (PieceKind::King, Side::Black) => '將',
            (PieceKind::Advisor, Side::Red) => '仕',
            (PieceKind::Advisor, Side::Black) => '士',
            (PieceKind::Elephant, Side::Red) => '相',
            (PieceKind::Elephant, Side::Black) => '象',
            (PieceKind::Horse, Side::Red) => '傌',
            (PieceKind::Horse, Side::Black) => '馬',
            (PieceKind::Chariot, Side::Red) => '俥',
            (PieceKind::Chariot, Side::Black) => '車',
            (PieceKind::Cannon, Side::Red) => '炮',
            (PieceKind::Cannon, Side::Black) => '砲',
            (PieceKind::Soldier, Side::Red) => '兵',
            (PieceKind::Soldier, Side::Black) => '卒',
        }
    }

    /// 获取编码字符（红方大写，黑方小写）
    pub fn to_codec_char(&self) -> char {
        let c = match self.kind {
            PieceKind::King => 'k',
            PieceKind::Advisor => 'a',
            PieceKind::Elephant => 'b',
            PieceKind::Horse => 'n',
            PieceKind::Chariot => 'r',
            PieceKind::Cannon => 'c',
            PieceKind::Soldier => 'p',
        };
        match self.side {
            Side::Red => c.to_ascii_uppercase(),
            Side::Black => c,
        }
    }

    /// 从编码字符解析
    pub fn from_codec_char(c: char) -> Option<Piece> {
        let side = if c.is_ascii_uppercase() {
            Side::Red
        } else {
            Side::Black
        };
        let kind = match c.to_ascii_lowercase() {
            'k' => PieceKind::King,
            'a' => PieceKind::Advisor,
            'b' => PieceKind::Elephant,
            'n' => PieceKind::Horse,
            'r' => PieceKind::Chariot,
            'c' => PieceKind::Cannon,
            'p' => PieceKind::Soldier,
            _ => return None,
        };
        Some(Piece { kind, side })
    }
}

impl std::fmt::Display for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_codec_char())
    }
}

/// 棋盘格子
///
/// 列从左到右（黑方视角）为 0-8，行从上到下为 0-9。
/// 黑方在上（行 0-4），红方在下（行 5-9）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Square {
    /// 列 (0-8)
    pub file: u8,
    /// 行 (0-9)
    pub rank: u8,
}

impl Square {
    /// 创建新格子
    pub fn new(file: u8, rank: u8) -> Option<Self> {
        if (file as usize) < BOARD_WIDTH && (rank as usize) < BOARD_HEIGHT {
            Some(Self { file, rank })
        } else {
            None
        }
    }

    /// 创建新格子（不检查边界，内部和测试使用）
    pub const fn new_unchecked(file: u8, rank: u8) -> Self {
        Self { file, rank }
    }

    /// 检查格子是否在棋盘内
    pub fn is_valid(&self) -> bool {
        (self.file as usize) < BOARD_WIDTH && (self.rank as usize) < BOARD_HEIGHT
    }

    /// 是否在指定阵营的半场（未过河）
    pub fn is_own_half(&self, side: Side) -> bool {
        match side {
            Side::Red => self.rank >= RIVER_RED_EDGE,
            Side::Black => self.rank <= RIVER_BLACK_EDGE,
        }
    }

    /// 检查格子是否在指定阵营的九宫内
    pub fn is_in_palace(&self, side: Side) -> bool {
        let ranks = match side {
            Side::Red => RED_PALACE_RANKS,
            Side::Black => BLACK_PALACE_RANKS,
        };
        PALACE_FILES.contains(&self.file) && ranks.contains(&self.rank)
    }

    /// 获取偏移后的格子，越界返回 None
    pub fn offset(&self, df: i8, dr: i8) -> Option<Square> {
        let file = self.file as i8 + df;
        let rank = self.rank as i8 + dr;
        if file >= 0 && (file as usize) < BOARD_WIDTH && rank >= 0 && (rank as usize) < BOARD_HEIGHT {
            Some(Square {
                file: file as u8,
                rank: rank as u8,
            })
        } else {
            None
        }
    }

    /// 转换为数组索引
    pub fn to_index(&self) -> usize {
        self.rank as usize * BOARD_WIDTH + self.file as usize
    }

    /// 从数组索引转换
    pub fn from_index(index: usize) -> Option<Self> {
        if index < BOARD_WIDTH * BOARD_HEIGHT {
            Some(Square {
                file: (index % BOARD_WIDTH) as u8,
                rank: (index / BOARD_WIDTH) as u8,
            })
        } else {
            None
        }
    }

    /// 遍历全部 90 个格子（从上到下，从左到右）
    pub fn all() -> impl Iterator<Item = Square> {
        (0..BOARD_WIDTH * BOARD_HEIGHT).filter_map(Square::from_index)
    }
}

impl std::fmt::Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.file, self.rank)
    }
}
