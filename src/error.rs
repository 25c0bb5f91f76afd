//! ChatIM Server Core 错误处理模块
//!
//! 提供统一的错误类型和便捷构造方法。
//! 信道选择的"无可用节点"不属于错误，通过 `Option` 返回给调用方处理。

use thiserror::Error;

/// ChatIM 核心库统一错误类型
#[derive(Error, Debug)]
pub enum CoreError {
    /// 信道初始化错误（地址非法、端点构建失败）
    #[error("信道初始化错误 [{service}-{host}]: {reason}")]
    ChannelInit {
        service: String,
        host: String,
        reason: String,
    },

    /// 配置错误
    #[error("配置错误: {0}")]
    Config(String),

    /// 日志器初始化错误
    #[error("日志器初始化错误: {0}")]
    Logger(String),

    /// IO 错误
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// 创建信道初始化错误
    pub fn channel_init(
        service: impl Into<String>,
        host: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CoreError::ChannelInit {
            service: service.into(),
            host: host.into(),
            reason: reason.into(),
        }
    }

    /// 创建配置错误
    pub fn config(msg: impl Into<String>) -> Self {
        CoreError::Config(msg.into())
    }

    /// 创建日志器初始化错误
    pub fn logger(msg: impl Into<String>) -> Self {
        CoreError::Logger(msg.into())
    }
}

/// 核心库默认使用的结果类型
pub type Result<T> = std::result::Result<T, CoreError>;
