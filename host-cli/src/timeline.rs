//! # Timeline 模块
//!
//! Headless 回放用的时间线格式。
//!
//! ```json
//! {
//!   "steps": [
//!     { "turn": { "turn": 1, "itemChanges": [ ... ] } },
//!     { "wait": 1500 },
//!     { "input": "click" },
//!     "resubmit",
//!     { "busy": true },
//!     "settle"
//!   ]
//! }
//! ```
//!
//! 也可以直接给出单个回合批次（`{ "turn": 4, "itemChanges": [ ... ] }`），
//! 等价于 `[turn, settle]`。

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use turn_animator::{AnimatorInput, TurnChanges};

/// 时间线中的一步
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// 提交一个新的批次引用
    Turn(TurnChanges),
    /// 重新提交上一个批次引用（同一引用）
    Resubmit,
    /// 提交空批次
    ClearTurn,
    /// 宿主忙碌状态
    Busy(bool),
    /// 推进虚拟时间（毫秒）
    Wait(u64),
    /// 用户输入
    Input(AnimatorInput),
    /// 直接调用 skip_all
    Skip,
    /// 推进时间直到没有未到期的定时器
    Settle,
}

/// 回放时间线
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Timeline {
    /// 解析时间线 JSON，或单个回合批次 JSON
    pub fn parse(json: &str) -> anyhow::Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json).context("时间线 JSON 无效")?;
        if value.get("steps").is_some() {
            let timeline = serde_json::from_value(value).context("时间线 JSON 无效")?;
            return Ok(timeline);
        }
        if value.get("itemChanges").is_none() {
            anyhow::bail!("时间线 JSON 无效: 缺少 steps 或 itemChanges");
        }
        let batch = TurnChanges::from_json(json)?;
        Ok(Self::single_batch(batch))
    }

    /// 只播放一个批次的时间线
    pub fn single_batch(batch: TurnChanges) -> Self {
        Self {
            steps: vec![Step::Turn(batch), Step::Settle],
        }
    }

    /// 从文件加载时间线
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("读取时间线失败: {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("解析时间线失败: {}", path.display()))
    }

    /// 时间线中显式等待的总时长（毫秒）
    pub fn total_wait_ms(&self) -> u64 {
        self.steps
            .iter()
            .map(|step| match step {
                Step::Wait(ms) => *ms,
                _ => 0,
            })
            .sum()
    }
}
