//! 日志器初始化模块
//!
//! 调试模式下输出到标准输出，等级为最低（trace）；
//! 发布模式下输出到指定文件，等级由配置而定。
//! `RUST_LOG` 环境变量可覆盖配置中的等级。

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::LogConfig;
use crate::error::{CoreError, Result};

/// 初始化全局日志器
///
/// 发布模式下返回文件写入器的后台守卫，调用方需要持有它直到进程退出，
/// 否则缓冲中的日志会丢失。调试模式下返回 `None`。
pub fn init_logger(config: &LogConfig) -> Result<Option<WorkerGuard>> {
    if !config.release_mode {
        // 调试模式：标准输出，等级最低
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("trace"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_thread_ids(true)
            .try_init()
            .map_err(|e| CoreError::logger(e.to_string()))?;
        return Ok(None);
    }

    // 发布模式：文件输出，等级由配置而定
    let path = Path::new(&config.file);
    let directory = path.parent().unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .ok_or_else(|| CoreError::logger(format!("无效的日志文件路径: {}", config.file)))?;

    let appender = tracing_appender::rolling::never(directory, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.clone()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_thread_ids(true)
        .with_ansi(false)
        .with_writer(writer)
        .try_init()
        .map_err(|e| CoreError::logger(e.to_string()))?;

    Ok(Some(guard))
}
