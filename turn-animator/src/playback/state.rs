//! # State 模块
//!
//! 播放状态、视觉标记与时长常量。

use std::fmt;
use std::time::Duration;

use crate::change::ChangeKind;

/// 默认过渡时长（出现 / 消失）
pub const DEFAULT_TRANSITION: Duration = Duration::from_millis(600);

/// 默认停留时长
pub const DEFAULT_HOLD: Duration = Duration::from_millis(2000);

/// 播放状态
///
/// ```text
/// Idle ──Begin──► Appearing ──T_transition──► Visible ──T_hold──► Disappearing
///  ▲                                                                   │
///  └──────────────────────────T_transition─────────────────────────────┘
/// ```
///
/// 任意状态收到 Interrupt 都立即回到 Idle。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Idle,
    Appearing,
    Visible,
    Disappearing,
}

impl PlaybackState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlaybackState::Idle => "idle",
            PlaybackState::Appearing => "appearing",
            PlaybackState::Visible => "visible",
            PlaybackState::Disappearing => "disappearing",
        };
        f.write_str(name)
    }
}

/// 高亮颜色（仅在 Visible 状态生效）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glow {
    /// gain
    Green,
    /// loss
    Red,
    /// transform，作用于新物品
    Neutral,
}

impl Glow {
    pub fn for_kind(kind: ChangeKind) -> Self {
        match kind {
            ChangeKind::Gain => Glow::Green,
            ChangeKind::Loss => Glow::Red,
            ChangeKind::Transform => Glow::Neutral,
        }
    }
}

/// 消失方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disappear {
    /// loss：放大后消失
    GrowAway,
    /// gain / transform：缩小后消失
    ShrinkAway,
}

impl Disappear {
    pub fn for_kind(kind: ChangeKind) -> Self {
        match kind {
            ChangeKind::Loss => Disappear::GrowAway,
            ChangeKind::Gain | ChangeKind::Transform => Disappear::ShrinkAway,
        }
    }
}

/// 渲染层读取的视觉标记
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VisualFlags {
    /// 卡片是否可见
    pub visible: bool,
    /// 高亮颜色
    pub glow: Option<Glow>,
    /// 消失方向
    pub disappear: Option<Disappear>,
}

impl VisualFlags {
    /// 是否没有任何标记
    pub fn is_clear(&self) -> bool {
        *self == Self::default()
    }
}

/// 播放时长
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackTimings {
    /// 出现 / 消失过渡时长
    pub transition: Duration,
    /// Visible 停留时长
    pub hold: Duration,
}

impl PlaybackTimings {
    pub fn new(transition: Duration, hold: Duration) -> Self {
        Self { transition, hold }
    }

    /// 单个条目完整播放所需时长
    pub fn entry_duration(&self) -> Duration {
        self.transition + self.hold + self.transition
    }
}

impl Default for PlaybackTimings {
    fn default() -> Self {
        Self {
            transition: DEFAULT_TRANSITION,
            hold: DEFAULT_HOLD,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_per_kind() {
        assert_eq!(Glow::for_kind(ChangeKind::Gain), Glow::Green);
        assert_eq!(Glow::for_kind(ChangeKind::Loss), Glow::Red);
        assert_eq!(Glow::for_kind(ChangeKind::Transform), Glow::Neutral);

        assert_eq!(Disappear::for_kind(ChangeKind::Loss), Disappear::GrowAway);
        assert_eq!(Disappear::for_kind(ChangeKind::Gain), Disappear::ShrinkAway);
        assert_eq!(
            Disappear::for_kind(ChangeKind::Transform),
            Disappear::ShrinkAway
        );
    }

    #[test]
    fn test_default_timings() {
        let timings = PlaybackTimings::default();
        assert_eq!(timings.entry_duration(), Duration::from_millis(3200));
    }
}
