//! # Config 模块
//!
//! 动画器配置。
//!
//! ## 配置优先级
//!
//! 1. 命令行参数（最高，由宿主覆盖）
//! 2. 配置文件 (animator.json)
//! 3. 默认值（最低）

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::ConfigError;
use crate::input::{InputKey, SkipBindings};
use crate::playback::PlaybackTimings;

/// 单个时长的上限（毫秒）
const MAX_DURATION_MS: u64 = 60_000;

/// 动画器配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimatorConfig {
    /// 出现 / 消失过渡时长（毫秒）
    #[serde(default = "default_transition_ms")]
    pub transition_ms: u64,

    /// Visible 停留时长（毫秒）
    #[serde(default = "default_hold_ms")]
    pub hold_ms: u64,

    /// 点击遮罩层是否跳过全部动画
    #[serde(default = "default_skip_on_click")]
    pub skip_on_click: bool,

    /// 触发跳过的按键
    #[serde(default = "default_skip_keys")]
    pub skip_keys: Vec<InputKey>,
}

fn default_transition_ms() -> u64 {
    600
}

fn default_hold_ms() -> u64 {
    2000
}

fn default_skip_on_click() -> bool {
    true
}

fn default_skip_keys() -> Vec<InputKey> {
    vec![InputKey::Enter, InputKey::Space]
}

impl Default for AnimatorConfig {
    fn default() -> Self {
        Self {
            transition_ms: default_transition_ms(),
            hold_ms: default_hold_ms(),
            skip_on_click: default_skip_on_click(),
            skip_keys: default_skip_keys(),
        }
    }
}

impl AnimatorConfig {
    /// 加载配置文件
    ///
    /// 如果文件不存在或解析失败，返回默认配置并记录警告。
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            warn!(path = %path.display(), "配置文件不存在，使用默认配置");
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(config) => {
                    info!(path = %path.display(), "配置文件加载成功");
                    config
                }
                Err(e) => {
                    warn!(error = %e, "配置文件解析失败，使用默认配置");
                    Self::default()
                }
            },
            Err(e) => {
                warn!(error = %e, "配置文件读取失败，使用默认配置");
                Self::default()
            }
        }
    }

    /// 保存配置到文件
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializationFailed(e.to_string()))?;

        fs::write(path, json).map_err(|e| ConfigError::Io(e.to_string()))?;

        Ok(())
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.transition_ms == 0 || self.transition_ms > MAX_DURATION_MS {
            return Err(ConfigError::ValidationFailed(format!(
                "transition_ms 必须在 1 - {MAX_DURATION_MS} 之间"
            )));
        }

        if self.hold_ms == 0 || self.hold_ms > MAX_DURATION_MS {
            return Err(ConfigError::ValidationFailed(format!(
                "hold_ms 必须在 1 - {MAX_DURATION_MS} 之间"
            )));
        }

        if self.skip_keys.contains(&InputKey::Other) {
            return Err(ConfigError::ValidationFailed(
                "skip_keys 不能包含 other".to_string(),
            ));
        }

        Ok(())
    }

    /// 播放时长
    pub fn timings(&self) -> PlaybackTimings {
        PlaybackTimings::new(
            Duration::from_millis(self.transition_ms),
            Duration::from_millis(self.hold_ms),
        )
    }

    /// 跳过输入绑定
    pub fn skip_bindings(&self) -> SkipBindings {
        SkipBindings {
            click: self.skip_on_click,
            keys: self.skip_keys.clone(),
        }
    }
}
