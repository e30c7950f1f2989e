//! # Session 模块
//!
//! 把时间线逐步喂给动画器，并按固定帧长推进虚拟时钟。

use std::thread;
use std::time::Duration;

use tracing::{debug, info};
use turn_animator::{
    AnimatorConfig, AnimatorEvent, AnimatorStats, BatchRef, ItemChangeAnimator, ManualScheduler,
    Scheduler,
};

use crate::renderer::TextRenderer;
use crate::timeline::{Step, Timeline};

/// Settle 步骤的最长虚拟时间，防止时间线配置错误时无限推进
const SETTLE_LIMIT: Duration = Duration::from_secs(600);

/// 会话选项
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// 每帧推进的虚拟时间
    pub frame: Duration,
    /// 是否按真实时间节奏回放
    pub realtime: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            frame: Duration::from_millis(16),
            realtime: false,
        }
    }
}

/// 回放结果
#[derive(Debug, Clone)]
pub struct SessionReport {
    /// 所有渲染输出行
    pub frames: Vec<String>,
    /// 所有动画器事件
    pub events: Vec<AnimatorEvent>,
    /// 动画器统计
    pub stats: AnimatorStats,
    /// 消耗的虚拟时间
    pub elapsed: Duration,
}

/// 回放会话
pub struct Session {
    animator: ItemChangeAnimator<ManualScheduler>,
    renderer: TextRenderer,
    options: SessionOptions,
    /// 最近一次通过 Turn 步骤提交的批次
    last_batch: Option<BatchRef>,
    frames: Vec<String>,
    events: Vec<AnimatorEvent>,
}

impl Session {
    pub fn new(config: &AnimatorConfig, options: SessionOptions) -> Self {
        Self {
            animator: ItemChangeAnimator::with_config(ManualScheduler::new(), config),
            renderer: TextRenderer::new(),
            options,
            last_batch: None,
            frames: Vec::new(),
            events: Vec::new(),
        }
    }

    /// 回放整个时间线
    pub fn run(mut self, timeline: &Timeline) -> SessionReport {
        self.render();
        for (index, step) in timeline.steps.iter().enumerate() {
            debug!(index, ?step, "执行时间线步骤");
            self.apply(step);
            self.render();
        }

        SessionReport {
            frames: self.frames,
            events: self.events,
            stats: self.animator.stats(),
            elapsed: self.animator.scheduler().now(),
        }
    }

    fn apply(&mut self, step: &Step) {
        match step {
            Step::Turn(changes) => {
                let batch = BatchRef::new(changes.clone());
                self.last_batch = Some(batch.clone());
                self.animator.set_turn_changes(Some(batch));
            }
            Step::Resubmit => self.animator.set_turn_changes(self.last_batch.clone()),
            Step::ClearTurn => self.animator.set_turn_changes(None),
            Step::Busy(busy) => self.animator.set_busy(*busy),
            Step::Input(input) => {
                let consumed = self.animator.handle_input(*input);
                debug!(?input, consumed, "用户输入");
            }
            Step::Skip => self.animator.skip_all(),
            Step::Wait(ms) => self.wait(Duration::from_millis(*ms)),
            Step::Settle => self.settle(),
        }
        self.collect_events();
    }

    fn wait(&mut self, total: Duration) {
        let mut remaining = total;
        while !remaining.is_zero() {
            let dt = remaining.min(self.options.frame);
            self.tick(dt);
            remaining -= dt;
        }
    }

    fn settle(&mut self) {
        let mut spent = Duration::ZERO;
        while self.animator.has_pending_timer() && spent < SETTLE_LIMIT {
            self.tick(self.options.frame);
            spent += self.options.frame;
        }
    }

    fn tick(&mut self, dt: Duration) {
        self.animator.advance(dt);
        self.collect_events();
        self.render();
        if self.options.realtime {
            thread::sleep(dt);
        }
    }

    fn render(&mut self) {
        self.renderer.set_time(self.animator.scheduler().now());
        self.animator.render_to(&mut self.renderer);
        self.frames.extend(self.renderer.take_lines());
    }

    fn collect_events(&mut self) {
        for event in self.animator.drain_events() {
            info!(%event, "动画事件");
            self.events.push(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use turn_animator::{AnimatorInput, Item, ItemChange, TurnChanges};

    fn fast_config() -> AnimatorConfig {
        AnimatorConfig {
            transition_ms: 100,
            hold_ms: 200,
            ..AnimatorConfig::default()
        }
    }

    fn options() -> SessionOptions {
        SessionOptions {
            frame: Duration::from_millis(50),
            realtime: false,
        }
    }

    fn turn(n: u64) -> Step {
        Step::Turn(TurnChanges::new(
            n,
            vec![ItemChange::gain(Item::new("Coin", "junk", ""))],
        ))
    }

    #[test]
    fn test_settle_plays_everything() {
        let timeline = Timeline {
            steps: vec![turn(1), Step::Settle],
        };
        let report = Session::new(&fast_config(), options()).run(&timeline);

        assert_eq!(report.stats.entries_completed, 1);
        assert_eq!(report.elapsed, Duration::from_millis(400));
        assert_eq!(report.frames.first().map(String::as_str), Some("[     0ms] idle"));
        assert_eq!(report.frames.last().map(String::as_str), Some("[   400ms] idle"));
    }

    #[test]
    fn test_resubmit_does_not_replay() {
        let timeline = Timeline {
            steps: vec![turn(1), Step::Settle, Step::Resubmit, Step::Settle],
        };
        let report = Session::new(&fast_config(), options()).run(&timeline);

        assert_eq!(report.stats.entries_completed, 1);
        assert_eq!(report.stats.batches_completed, 1);
    }

    #[test]
    fn test_click_skips() {
        let timeline = Timeline {
            steps: vec![
                turn(1),
                Step::Wait(150),
                Step::Input(AnimatorInput::Click),
                Step::Settle,
            ],
        };
        let report = Session::new(&fast_config(), options()).run(&timeline);

        assert_eq!(report.stats.batches_skipped, 1);
        assert_eq!(report.stats.entries_completed, 0);
        assert_eq!(report.elapsed, Duration::from_millis(150));
    }
}
