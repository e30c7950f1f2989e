//! # Machine 模块
//!
//! 播放状态机的纯转换函数：
//!
//! ```text
//! step(playback, event) -> (playback, Vec<Effect>)
//! ```
//!
//! 状态机本身不持有定时器，只通过 `Effect` 告诉驱动方该做什么。
//! 任何会进入新状态的转换都先输出 `CancelTimer`，再输出 `ArmTimer`。

use std::time::Duration;

use tracing::debug;

use super::state::{Disappear, Glow, PlaybackState, PlaybackTimings, VisualFlags};
use crate::queue::AnimationQueueEntry;

/// 状态机输入事件
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackEvent {
    /// 开始播放一个条目（仅 Idle 时有效）
    Begin(AnimationQueueEntry),
    /// 当前状态的定时器到期
    TimerElapsed,
    /// 立即中断（宿主忙碌 / 跳过）
    Interrupt,
}

/// 状态机输出的副作用
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// 取消当前定时器
    CancelTimer,
    /// 启动新定时器
    ArmTimer(Duration),
    /// 条目自然播放完成
    Finished(AnimationQueueEntry),
    /// 条目在播放中被中断
    Dropped(AnimationQueueEntry),
}

/// 播放状态机
///
/// 不变量：`state` 为 Idle 当且仅当 `current` 为 `None`，且 Idle 时没有任何视觉标记。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Playback {
    state: PlaybackState,
    current: Option<AnimationQueueEntry>,
    flags: VisualFlags,
}

impl Playback {
    /// 创建空闲状态机
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// 当前条目
    pub fn current(&self) -> Option<&AnimationQueueEntry> {
        self.current.as_ref()
    }

    pub fn flags(&self) -> VisualFlags {
        self.flags
    }

    pub fn is_idle(&self) -> bool {
        self.state.is_idle()
    }

    /// 纯转换函数
    pub fn step(self, event: PlaybackEvent, timings: &PlaybackTimings) -> (Playback, Vec<Effect>) {
        match (self.state, event) {
            (PlaybackState::Idle, PlaybackEvent::Begin(entry)) => {
                let next = Playback {
                    state: PlaybackState::Appearing,
                    current: Some(entry),
                    flags: VisualFlags {
                        visible: true,
                        glow: None,
                        disappear: None,
                    },
                };
                (
                    next,
                    vec![Effect::CancelTimer, Effect::ArmTimer(timings.transition)],
                )
            }
            (_, PlaybackEvent::Begin(entry)) => {
                debug!(state = %self.state, entry = %entry.label(), "忽略非空闲状态下的 Begin");
                (self, Vec::new())
            }

            (PlaybackState::Idle, PlaybackEvent::TimerElapsed) => (self, Vec::new()),
            (PlaybackState::Appearing, PlaybackEvent::TimerElapsed) => {
                let glow = self.current.as_ref().map(|entry| Glow::for_kind(entry.kind));
                let next = Playback {
                    state: PlaybackState::Visible,
                    current: self.current,
                    flags: VisualFlags {
                        visible: true,
                        glow,
                        disappear: None,
                    },
                };
                (next, vec![Effect::CancelTimer, Effect::ArmTimer(timings.hold)])
            }
            (PlaybackState::Visible, PlaybackEvent::TimerElapsed) => {
                let disappear = self
                    .current
                    .as_ref()
                    .map(|entry| Disappear::for_kind(entry.kind));
                let next = Playback {
                    state: PlaybackState::Disappearing,
                    current: self.current,
                    flags: VisualFlags {
                        visible: false,
                        glow: None,
                        disappear,
                    },
                };
                (
                    next,
                    vec![Effect::CancelTimer, Effect::ArmTimer(timings.transition)],
                )
            }
            (PlaybackState::Disappearing, PlaybackEvent::TimerElapsed) => {
                let mut effects = vec![Effect::CancelTimer];
                effects.extend(self.current.map(Effect::Finished));
                (Playback::new(), effects)
            }

            (_, PlaybackEvent::Interrupt) => {
                let mut effects = vec![Effect::CancelTimer];
                effects.extend(self.current.map(Effect::Dropped));
                (Playback::new(), effects)
            }
        }
    }
}
