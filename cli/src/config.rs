//! 命令行配置
//!
//! JSON 文件，默认位于 `<config_dir>/xiangqi/config.json`。
//! 日志要等配置读完才能初始化，所以加载结果先记在 `ConfigSource` 里，稍后再输出。

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use xiangqi_rules::INITIAL_FEN;

/// 默认日志过滤
pub const DEFAULT_LOG_FILTER: &str = "xiangqi=info";

/// 记谱风格
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum NotationStyle {
    /// 英文，如 `C2=5`
    #[default]
    Wxf,
    /// 中文，如 `炮二平五`
    Chinese,
}

/// 命令行配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// 未指定 `--fen` 时使用的局面
    pub start_fen: String,
    /// 记谱风格
    pub notation: NotationStyle,
    /// 日志过滤（RUST_LOG 优先）
    pub log_filter: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            start_fen: INITIAL_FEN.to_string(),
            notation: NotationStyle::default(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

/// 配置从哪里来
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// 成功读取
    File(PathBuf),
    /// 文件不存在
    Missing(PathBuf),
    /// 读取或解析失败
    Invalid { path: PathBuf, reason: String },
    /// 找不到配置目录
    NoConfigDir,
}

impl ConfigSource {
    /// 输出加载结果（在日志初始化之后调用）
    pub fn log(&self) {
        match self {
            ConfigSource::File(path) => tracing::info!("Loaded config from {:?}", path),
            ConfigSource::Missing(path) => tracing::info!("No config at {:?}, using defaults", path),
            ConfigSource::Invalid { path, reason } => {
                tracing::warn!("Invalid config {:?}: {}, using defaults", path, reason)
            }
            ConfigSource::NoConfigDir => tracing::warn!("No config directory available, using defaults"),
        }
    }
}

impl CliConfig {
    /// 默认配置文件路径
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut path| {
            path.push("xiangqi");
            path.push("config.json");
            path
        })
    }

    /// 加载配置，`path` 为空时使用默认路径；任何失败都回落到默认值
    pub fn load(path: Option<&Path>) -> (Self, ConfigSource) {
        match path.map(Path::to_path_buf).or_else(Self::default_path) {
            Some(path) => Self::load_from(&path),
            None => (Self::default(), ConfigSource::NoConfigDir),
        }
    }

    /// 从指定文件加载
    pub fn load_from(path: &Path) -> (Self, ConfigSource) {
        if !path.exists() {
            return (Self::default(), ConfigSource::Missing(path.to_path_buf()));
        }

        let parsed = std::fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|content| serde_json::from_str(&content).map_err(|e| e.to_string()));

        match parsed {
            Ok(config) => (config, ConfigSource::File(path.to_path_buf())),
            Err(reason) => (
                Self::default(),
                ConfigSource::Invalid {
                    path: path.to_path_buf(),
                    reason,
                },
            ),
        }
    }

    /// 保存到指定文件，自动创建目录
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create config directory {:?}", parent))?;
        }

        let content = serde_json::to_string_pretty(self).context("failed to serialize config")?;
        std::fs::write(path, content).with_context(|| format!("failed to write config {:?}", path))?;

        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
