use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{CoreError, Result};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub service: ServiceConfig,
    #[serde(default)]
    pub channel: ChannelConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
    pub name: String,
    pub version: String,
}

/// RPC 信道传输参数
///
/// 对应信道管理器为每个节点构建连接时使用的固定选项。
/// 超时为 `None` 表示一直等待，与原有的 -1 语义一致。
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChannelConfig {
    /// 连接等待超时（秒），None 表示一直等待
    pub connect_timeout_secs: Option<u64>,
    /// RPC 请求等待超时（秒），None 表示一直等待
    pub timeout_secs: Option<u64>,
    /// 请求重试次数
    #[serde(default = "default_max_retry")]
    pub max_retry: usize,
}

fn default_max_retry() -> usize {
    3
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: None,
            timeout_secs: None,
            max_retry: default_max_retry(),
        }
    }
}

impl ChannelConfig {
    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_secs.map(Duration::from_secs)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// 日志配置
///
/// `release_mode` 为 false 时输出到标准输出（调试模式，等级最低），
/// 为 true 时输出到 `file` 指定的文件，等级由 `level` 决定。
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LogConfig {
    #[serde(default)]
    pub release_mode: bool,
    #[serde(default = "default_log_file")]
    pub file: String,
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_file() -> String {
    "logs/server.log".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            release_mode: false,
            file: default_log_file(),
            level: default_log_level(),
        }
    }
}

impl Config {
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config =
            toml::from_str(&content).map_err(|e| CoreError::config(e.to_string()))?;
        Ok(config)
    }
}
