//! 规则常量定义

/// 棋盘宽度（列数）
pub const BOARD_WIDTH: usize = 9;

/// 棋盘高度（行数）
pub const BOARD_HEIGHT: usize = 10;

/// 格子总数
pub const SQUARE_COUNT: usize = BOARD_WIDTH * BOARD_HEIGHT;

/// 九宫列范围（两方相同）
pub const PALACE_FILES: std::ops::RangeInclusive<u8> = 3..=5;

/// 红方九宫行范围（下方）
pub const RED_PALACE_RANKS: std::ops::RangeInclusive<u8> = 7..=9;

/// 黑方九宫行范围（上方）
pub const BLACK_PALACE_RANKS: std::ops::RangeInclusive<u8> = 0..=2;

/// 黑方半场最后一行，红方半场从下一行开始
pub const RIVER_BLACK_EDGE: u8 = 4;

/// 红方半场第一行
pub const RIVER_RED_EDGE: u8 = 5;

/// 棋盘串的行分隔符
pub const ROW_SEPARATOR: char = '/';

/// 编码时附加在走子方之后的固定占位字段
pub const CODEC_TRAILER: &str = "- - 0 1";
