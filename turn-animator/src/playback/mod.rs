//! # Playback 模块
//!
//! 逐条播放动画队列条目的状态机。
//!
//! ## 模块结构
//!
//! - [`state`]：播放状态、视觉标记与时长
//! - [`machine`]：纯转换函数 `(state, event) -> (state, effects)`

pub mod machine;
pub mod state;

pub use machine::{Effect, Playback, PlaybackEvent};
pub use state::{
    DEFAULT_HOLD, DEFAULT_TRANSITION, Disappear, Glow, PlaybackState, PlaybackTimings, VisualFlags,
};
