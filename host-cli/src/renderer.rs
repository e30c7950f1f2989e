//! # Renderer 模块
//!
//! 文本渲染适配器：每当帧内容变化时输出一行。

use std::time::Duration;

use turn_animator::{Disappear, Glow, RenderAdapter, RenderFrame};

/// 文本渲染器
#[derive(Debug, Default)]
pub struct TextRenderer {
    /// 当前虚拟时间，由会话在渲染前设置
    now: Duration,
    /// 上一帧的内容（不含时间戳）
    last: Option<String>,
    /// 尚未取走的输出行
    lines: Vec<String>,
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_time(&mut self, now: Duration) {
        self.now = now;
    }

    /// 取出累积的输出行
    pub fn take_lines(&mut self) -> Vec<String> {
        std::mem::take(&mut self.lines)
    }
}

impl RenderAdapter for TextRenderer {
    fn render(&mut self, frame: &RenderFrame<'_>) {
        let body = describe(frame);
        if self.last.as_deref() == Some(body.as_str()) {
            return;
        }
        self.lines
            .push(format!("[{:>6}ms] {}", self.now.as_millis(), body));
        self.last = Some(body);
    }
}

fn describe(frame: &RenderFrame<'_>) -> String {
    let Some(entry) = frame.entry else {
        return "idle".to_string();
    };

    let mut text = format!("{:<12} {}", frame.state.to_string(), entry.label());
    if let (Some(old), Some(new)) = (entry.old_item(), entry.new_item()) {
        text.push_str(&format!(" ({:?} -> {:?})", old.description, new.description));
    }
    match frame.flags.glow {
        Some(Glow::Green) => text.push_str(" glow=green"),
        Some(Glow::Red) => text.push_str(" glow=red"),
        Some(Glow::Neutral) => text.push_str(" glow=neutral"),
        None => {}
    }
    match frame.flags.disappear {
        Some(Disappear::GrowAway) => text.push_str(" exit=grow"),
        Some(Disappear::ShrinkAway) => text.push_str(" exit=shrink"),
        None => {}
    }
    if frame.pending > 0 {
        text.push_str(&format!(" +{} queued", frame.pending));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use turn_animator::{AnimationQueueEntry, Item, PlaybackState, VisualFlags};

    #[test]
    fn test_repeated_frames_are_collapsed() {
        let entry = AnimationQueueEntry::loss(Item::new("Rope", "equipment", ""));
        let frame = RenderFrame {
            state: PlaybackState::Visible,
            entry: Some(&entry),
            flags: VisualFlags {
                visible: true,
                glow: Some(Glow::Red),
                disappear: None,
            },
            pending: 2,
        };

        let mut renderer = TextRenderer::new();
        renderer.render(&frame);
        renderer.set_time(Duration::from_millis(100));
        renderer.render(&frame);

        let lines = renderer.take_lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(
            lines[0],
            "[     0ms] visible      loss:Rope glow=red +2 queued"
        );
    }

    #[test]
    fn test_idle_frame() {
        let frame = RenderFrame {
            state: PlaybackState::Idle,
            entry: None,
            flags: VisualFlags::default(),
            pending: 0,
        };
        let mut renderer = TextRenderer::new();
        renderer.render(&frame);
        assert_eq!(renderer.take_lines(), vec!["[     0ms] idle"]);
    }
}
