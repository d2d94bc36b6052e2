//! 中国象棋规则引擎命令行工具

mod commands;
mod config;

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use xiangqi_rules::BoardState;

use config::{CliConfig, NotationStyle, DEFAULT_LOG_FILTER};

#[derive(Parser, Debug)]
#[command(name = "xiangqi", author, version, about = "Xiangqi rules engine command line", long_about = None)]
struct Cli {
    /// 配置文件路径
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// 起始局面（默认取配置中的 start_fen）
    #[arg(long, global = true)]
    fen: Option<String>,

    /// 记谱风格
    #[arg(long, global = true, value_enum)]
    notation: Option<NotationStyle>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 列出合法走法（不给格子时列出走子方全部走法）
    Moves {
        /// 格子名，如 h3
        square: Option<String>,
    },
    /// 依次走若干步，输出局面摘要
    Play {
        /// 外部编码走法，如 h3e3 h10g8
        moves: Vec<String>,
        /// 保存棋谱到文件
        #[arg(long)]
        record: Option<PathBuf>,
    },
    /// 重放棋谱文件
    Replay {
        path: PathBuf,
    },
    /// 验证摆好的局面
    Validate,
    /// 从分析输出中挑出第一个可用走法
    Pick {
        /// 分析输出文件，省略时读标准输入
        input: Option<PathBuf>,
    },
    /// 写出当前配置
    InitConfig,
}

fn init_logging(config: &CliConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (config, source) = CliConfig::load(cli.config.as_deref());
    init_logging(&config);
    source.log();

    let style = cli.notation.unwrap_or(config.notation);
    let fen = cli.fen.as_deref().unwrap_or(&config.start_fen);
    debug!("Starting from {}", fen);

    match cli.command {
        Command::Moves { square } => {
            let state = BoardState::from_fen(fen)?;
            print!("{}", commands::list_moves(&state, square.as_deref(), style)?);
        }
        Command::Play { moves, record } => {
            let mut state = BoardState::from_fen(fen)?;
            commands::play(&mut state, &moves)?;
            print!("{}", commands::describe(&state, style)?);
            if let Some(path) = record {
                commands::save_record(&state, &path)?;
            }
        }
        Command::Replay { path } => {
            let state = commands::load_record(&path)?;
            print!("{}", commands::describe(&state, style)?);
        }
        Command::Validate => {
            print!("{}", commands::validate(fen)?);
        }
        Command::Pick { input } => {
            let analysis = match input {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read analysis output {:?}", path))?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buf)
                        .context("failed to read analysis output from stdin")?;
                    buf
                }
            };
            let state = BoardState::from_fen(fen)?;
            print!("{}", commands::pick(&state, &analysis)?);
        }
        Command::InitConfig => {
            let path = cli
                .config
                .or_else(CliConfig::default_path)
                .context("no config directory available")?;
            config.save_to(&path)?;
            println!("{}", path.display());
        }
    }

    Ok(())
}
