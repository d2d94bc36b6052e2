//! 子命令实现
//!
//! 每个命令返回要打印的文本，main 只负责输出。

use std::path::Path;

use anyhow::{bail, Context, Result};
use xiangqi_rules::{
    collect_candidates, BoardState, ExternalMove, Fen, GameRecord, KingStatus, Move, Notation, Position, Rules,
    Setup, Side,
};

use crate::config::NotationStyle;

/// 按配置的风格给走法记谱（必须传入走子前的局面）
fn notate(position: &Position, mv: &Move, style: NotationStyle) -> String {
    let text = match style {
        NotationStyle::Wxf => Notation::to_wxf(position, mv.from, mv.to),
        NotationStyle::Chinese => Notation::to_chinese_with_disambiguation(position, mv.from, mv.to),
    };
    text.unwrap_or_default()
}

fn describe_move(position: &Position, mv: &Move, style: NotationStyle) -> String {
    let mut line = format!(
        "{}  {}",
        ExternalMove::new(mv.from, mv.to),
        notate(position, mv, style)
    );
    if let Some(captured) = mv.captured {
        line.push_str(&format!("  x{}", captured));
    }
    line
}

/// 列出某个格子（或走子方全部棋子）的合法走法
pub fn list_moves(state: &BoardState, square: Option<&str>, style: NotationStyle) -> Result<String> {
    let moves = match square {
        Some(name) => {
            let sq = ExternalMove::parse_square(name)?;
            if state.position().is_empty(sq) {
                bail!("no piece at {}", name);
            }
            state.legal_moves(sq)
        }
        None => state.legal_moves_for_side_to_move(),
    };

    let mut output = String::new();
    for mv in &moves {
        output.push_str(&format!("{}\n", describe_move(state.position(), mv, style)));
    }
    output.push_str(&format!("{} legal move(s)\n", moves.len()));
    Ok(output)
}

/// 依次走外部编码的走法，任何一步非法都会中止
pub fn play(state: &mut BoardState, moves: &[String]) -> Result<()> {
    for (i, text) in moves.iter().enumerate() {
        state
            .apply_external(text)
            .with_context(|| format!("move {} ({}) rejected", i + 1, text))?;
    }
    Ok(())
}

/// 按风格生成整局记谱
fn notation_log(state: &BoardState, style: NotationStyle) -> Result<Vec<String>> {
    if style == NotationStyle::Wxf {
        return Ok(state.notations().to_vec());
    }
    state
        .snapshots()
        .iter()
        .zip(state.history())
        .map(|(snapshot, mv)| Ok(notate(&Fen::parse(snapshot)?, mv, style)))
        .collect()
}

fn status_label(status: KingStatus) -> &'static str {
    match status {
        KingStatus::Safe => "safe",
        KingStatus::InCheck => "in check",
        KingStatus::Checkmated => "checkmated",
    }
}

/// 当前局面摘要：局面串、记谱、双方状态、重复次数
pub fn describe(state: &BoardState, style: NotationStyle) -> Result<String> {
    let mut output = String::new();
    output.push_str(&format!("fen: {}\n", state.fen()));

    let log = notation_log(state, style)?;
    for (i, pair) in log.chunks(2).enumerate() {
        output.push_str(&format!("{}. {}\n", i + 1, pair.join("  ")));
    }

    let status = state.status();
    for side in [Side::Red, Side::Black] {
        output.push_str(&format!("{}: {}\n", side, status_label(status.of(side))));
    }
    let side = state.side_to_move();
    if state.position().find_king(side).is_some() && Rules::is_stalemate(state.position(), side) {
        output.push_str(&format!("{} is stalemated\n", side));
    }

    let repetitions = state.repetitions();
    if repetitions > 0 {
        output.push_str(&format!("position repeated {} time(s)\n", repetitions));
    }
    Ok(output)
}

/// 验证摆好的局面
pub fn validate(fen: &str) -> Result<String> {
    let position = Fen::parse(fen)?;
    Setup::validate_position(&position)?;

    let mut output = String::from("position is valid\n");
    if position.kings_facing() {
        tracing::warn!("Kings are facing each other in {}", fen);
        output.push_str("note: kings are facing each other\n");
    }
    Ok(output)
}

/// 从分析输出中挑出第一个可用的候选
pub fn pick(state: &BoardState, analysis: &str) -> Result<String> {
    let candidates = collect_candidates(analysis.lines());
    if candidates.is_empty() {
        bail!("no candidate lines found in analysis output");
    }
    let (mv, score) = state.select_candidate(&candidates)?;
    Ok(format!("{} {}\n", mv, score))
}

/// 保存棋谱
pub fn save_record(state: &BoardState, path: &Path) -> Result<()> {
    let record = GameRecord::from_board_state(state, "red", "black");
    let json = record.to_json().context("failed to serialize game record")?;
    std::fs::write(path, json).with_context(|| format!("failed to write record {:?}", path))?;
    tracing::info!("Saved {} move(s) to {:?}", record.moves.len(), path);
    Ok(())
}

/// 载入并重放棋谱
pub fn load_record(path: &Path) -> Result<BoardState> {
    let json = std::fs::read_to_string(path).with_context(|| format!("failed to read record {:?}", path))?;
    let record = GameRecord::from_json(&json).with_context(|| format!("invalid record {:?}", path))?;
    Ok(record.replay()?)
}
