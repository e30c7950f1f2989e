//! # Error 模块
//!
//! 定义 turn-animator 中使用的错误类型。
//!
//! 动画调度本身没有可恢复的错误：缺少载荷的变更在分类阶段被静默丢弃，
//! 过期定时器在结构上被屏蔽。这里的错误只覆盖配置与批次解码。

use thiserror::Error;

/// 配置错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// 序列化失败
    #[error("配置序列化失败: {0}")]
    SerializationFailed(String),

    /// IO 错误
    #[error("配置 IO 错误: {0}")]
    Io(String),

    /// 验证失败
    #[error("配置验证失败: {0}")]
    ValidationFailed(String),
}

/// 批次解码错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BatchError {
    /// JSON 格式无效
    #[error("回合变更 JSON 无效: {message}")]
    InvalidJson { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ConfigError::ValidationFailed("hold_ms".to_string());
        assert_eq!(err.to_string(), "配置验证失败: hold_ms");

        let err = BatchError::InvalidJson {
            message: "EOF".to_string(),
        };
        assert_eq!(err.to_string(), "回合变更 JSON 无效: EOF");
    }
}
