//! # Turn Animator
//!
//! 叙事冒险游戏前端的回合变更动画调度器。
//!
//! ## 架构概述
//!
//! `turn-animator` 是纯逻辑核心，不依赖任何渲染引擎。
//! 宿主（游戏状态引擎）提交回合变更批次和忙碌信号，动画器把批次中的
//! 物品变更逐条播放为定时的视觉过渡：
//!
//! ```text
//! TurnChanges ──classify──► AnimationQueue ──► Playback ──► RenderFrame
//!                 (loss, gain, transform)    idle → appearing → visible → disappearing
//! ```
//!
//! ## 核心类型
//!
//! - [`ItemChangeAnimator`]：面向宿主的驱动器
//! - [`Playback`]：纯转换函数实现的播放状态机
//! - [`Scheduler`]：定时器抽象，[`ManualScheduler`] 为虚拟时钟实现
//! - [`RenderAdapter`]：渲染适配接口
//!
//! ## 使用示例
//!
//! ```ignore
//! let mut animator = ItemChangeAnimator::with_config(ManualScheduler::new(), &config);
//! animator.set_turn_changes(Some(BatchRef::new(changes)));
//!
//! loop {
//!     animator.advance(frame_time);
//!     animator.render_to(&mut renderer);
//! }
//! ```
//!
//! ## 模块结构
//!
//! - [`item`]：物品模型与等价性
//! - [`change`]：回合变更批次
//! - [`classifier`]：变更分类与排序
//! - [`queue`]：动画队列
//! - [`playback`]：播放状态机
//! - [`scheduler`]：定时器
//! - [`animator`]：驱动器与跳过控制
//! - [`input`]：用户输入
//! - [`render`]：渲染适配接口
//! - [`config`]：配置
//! - [`error`]：错误类型定义

pub mod animator;
pub mod change;
pub mod classifier;
pub mod config;
pub mod error;
pub mod input;
pub mod item;
pub mod playback;
pub mod queue;
pub mod render;
pub mod scheduler;

// 重导出核心类型
pub use animator::{AnimatorEvent, AnimatorStats, ItemChangeAnimator};
pub use change::{BatchRef, ChangeKind, ItemChange, TurnChanges};
pub use classifier::{ClassifySummary, classify, classify_with_summary};
pub use config::AnimatorConfig;
pub use error::{BatchError, ConfigError};
pub use input::{AnimatorInput, InputKey, SkipBindings};
pub use item::{Item, KnownUse};
pub use playback::{
    Disappear, Effect, Glow, Playback, PlaybackEvent, PlaybackState, PlaybackTimings, VisualFlags,
};
pub use queue::{AnimationQueue, AnimationQueueEntry, EntryPayload};
pub use render::{RenderAdapter, RenderFrame};
pub use scheduler::{ManualScheduler, Scheduler, TimerHandle};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_api_accessible() {
        let _change = ItemChange::gain(Item::new("Map", "knowledge", ""));
        let _input = AnimatorInput::Click;
        let _state = PlaybackState::Idle;
        let _animator =
            ItemChangeAnimator::new(ManualScheduler::new(), PlaybackTimings::default());
    }
}
