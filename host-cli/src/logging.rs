//! # Logging 模块
//!
//! 使用 `tracing` + `tracing-subscriber` 初始化日志。
//!
//! 日志级别优先级：
//! 1. `--log-level` 命令行参数
//! 2. `ANIMATOR_LOG` 环境变量（取值与 `--log-level` 相同，忽略大小写）
//! 3. 默认 `warn`
//!
//! 日志输出到 stderr，stdout 只保留渲染帧。

use clap::ValueEnum;
use tracing::Level;
use tracing_subscriber::fmt;

/// 日志级别环境变量
pub const LOG_ENV: &str = "ANIMATOR_LOG";

/// 日志级别
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    #[default]
    #[value(alias = "warning")]
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// 解析环境变量取值，无法识别时返回 `None`
    pub fn from_env_value(value: &str) -> Option<Self> {
        <Self as ValueEnum>::from_str(value.trim(), true).ok()
    }
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

/// 按优先级确定最终级别
fn resolve_level(cli_level: Option<LogLevel>, env_value: Option<&str>) -> LogLevel {
    cli_level
        .or_else(|| env_value.and_then(LogLevel::from_env_value))
        .unwrap_or_default()
}

/// 初始化全局日志订阅者（只能调用一次）
pub fn init_logging(cli_level: Option<LogLevel>) {
    let env_value = std::env::var(LOG_ENV).ok();
    let level = resolve_level(cli_level, env_value.as_deref());

    fmt()
        .with_max_level(Level::from(level))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_value_parsing() {
        assert_eq!(LogLevel::from_env_value(" Debug "), Some(LogLevel::Debug));
        assert_eq!(LogLevel::from_env_value("warning"), Some(LogLevel::Warn));
        assert_eq!(LogLevel::from_env_value("loud"), None);
    }

    #[test]
    fn test_cli_level_wins_over_env() {
        assert_eq!(resolve_level(Some(LogLevel::Trace), Some("info")), LogLevel::Trace);
        assert_eq!(resolve_level(None, Some("info")), LogLevel::Info);
        assert_eq!(resolve_level(None, Some("loud")), LogLevel::Warn);
        assert_eq!(resolve_level(None, None), LogLevel::Warn);
    }
}
