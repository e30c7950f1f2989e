//! # Render 模块
//!
//! 渲染适配接口。具体卡片如何绘制由宿主决定，动画器只提供每一帧的只读快照。

use crate::playback::{PlaybackState, VisualFlags};
use crate::queue::AnimationQueueEntry;

/// 一帧的只读快照
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderFrame<'a> {
    /// 当前播放状态
    pub state: PlaybackState,
    /// 当前条目
    pub entry: Option<&'a AnimationQueueEntry>,
    /// 视觉标记
    pub flags: VisualFlags,
    /// 队列中尚未播放的条目数
    pub pending: usize,
}

impl RenderFrame<'_> {
    /// 是否需要绘制遮罩层
    pub fn shows_overlay(&self) -> bool {
        self.entry.is_some()
    }
}

/// 渲染适配器
///
/// 除了通过宿主触发 `skip_all()` 外，渲染层不会反向影响状态机。
pub trait RenderAdapter {
    fn render(&mut self, frame: &RenderFrame<'_>);
}
