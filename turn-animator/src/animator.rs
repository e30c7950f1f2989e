//! # Animator 模块
//!
//! 物品变更动画器：把回合变更批次逐条播放为定时的视觉过渡。
//!
//! ## 驱动模型
//!
//! ```text
//! Host                               Animator
//!   │── set_turn_changes / set_busy ──►│  分类 → 队列 → 状态机
//!   │── on_timer(handle) ─────────────►│  推进一个状态
//!   │── skip_all / handle_input ──────►│  立即回到 Idle
//!   │◄── frame() / drain_events() ─────│
//! ```
//!
//! ## 规则
//!
//! - 宿主忙碌时立即中断：清空队列、丢弃当前条目、清除视觉标记，
//!   被中断的批次不记为已处理
//! - 只在完全空闲时接受新批次；播放期间到达的批次被推迟，
//!   空闲后只考虑**最新**的批次
//! - 批次播放完毕（或被跳过）后记为已处理，同一引用不会再次播放

use std::time::Duration;

use tracing::{debug, info};

use crate::change::{BatchRef, ChangeKind};
use crate::classifier::classify_with_summary;
use crate::config::AnimatorConfig;
use crate::input::{AnimatorInput, SkipBindings};
use crate::playback::{Effect, Playback, PlaybackEvent, PlaybackState, PlaybackTimings, VisualFlags};
use crate::queue::{AnimationQueue, AnimationQueueEntry};
use crate::render::{RenderAdapter, RenderFrame};
use crate::scheduler::{ManualScheduler, Scheduler, TimerHandle};

/// 动画器向宿主报告的事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnimatorEvent {
    /// 批次开始播放
    BatchStarted { turn: u64, entries: usize },
    /// 条目开始播放
    EntryStarted { kind: ChangeKind, name: String },
    /// 条目自然播放完成
    EntryCompleted { kind: ChangeKind, name: String },
    /// 批次处理完毕
    BatchCompleted { turn: u64, played: usize },
    /// 宿主忙碌导致批次被中断
    Interrupted { turn: u64, dropped: usize },
    /// 用户跳过了批次剩余动画
    Skipped { turn: u64, dropped: usize },
}

impl std::fmt::Display for AnimatorEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnimatorEvent::BatchStarted { turn, entries } => {
                write!(f, "batch_started turn={turn} entries={entries}")
            }
            AnimatorEvent::EntryStarted { kind, name } => write!(f, "entry_started {kind}:{name}"),
            AnimatorEvent::EntryCompleted { kind, name } => {
                write!(f, "entry_completed {kind}:{name}")
            }
            AnimatorEvent::BatchCompleted { turn, played } => {
                write!(f, "batch_completed turn={turn} played={played}")
            }
            AnimatorEvent::Interrupted { turn, dropped } => {
                write!(f, "interrupted turn={turn} dropped={dropped}")
            }
            AnimatorEvent::Skipped { turn, dropped } => {
                write!(f, "skipped turn={turn} dropped={dropped}")
            }
        }
    }
}

/// 累计统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnimatorStats {
    /// 完整播放的条目数
    pub entries_completed: usize,
    /// 被中断或跳过而未完成的条目数（含未出队的）
    pub entries_dropped: usize,
    /// 处理完毕的批次数（含空批次和被跳过的批次）
    pub batches_completed: usize,
    /// 被跳过的批次数
    pub batches_skipped: usize,
    /// 被宿主忙碌中断的批次数
    pub batches_interrupted: usize,
}

/// 物品变更动画器
pub struct ItemChangeAnimator<S: Scheduler> {
    scheduler: S,
    timings: PlaybackTimings,
    bindings: SkipBindings,
    playback: Playback,
    queue: AnimationQueue,
    /// 唯一的未到期定时器
    timer: Option<TimerHandle>,
    busy: bool,
    /// 宿主提供的最新批次
    latest: Option<BatchRef>,
    /// 正在播放的批次
    active: Option<BatchRef>,
    /// 最近一个处理完毕的批次
    processed: Option<BatchRef>,
    /// 当前批次已完整播放的条目数
    played: usize,
    events: Vec<AnimatorEvent>,
    stats: AnimatorStats,
}

impl<S: Scheduler> ItemChangeAnimator<S> {
    /// 使用指定时长创建动画器
    pub fn new(scheduler: S, timings: PlaybackTimings) -> Self {
        Self {
            scheduler,
            timings,
            bindings: SkipBindings::default(),
            playback: Playback::new(),
            queue: AnimationQueue::new(),
            timer: None,
            busy: false,
            latest: None,
            active: None,
            processed: None,
            played: 0,
            events: Vec::new(),
            stats: AnimatorStats::default(),
        }
    }

    /// 根据配置创建动画器
    pub fn with_config(scheduler: S, config: &AnimatorConfig) -> Self {
        let mut animator = Self::new(scheduler, config.timings());
        animator.bindings = config.skip_bindings();
        animator
    }

    // ========== 宿主输入 ==========

    /// 宿主提供最新的回合变更批次
    ///
    /// 同一引用重复提交是空操作。播放期间提交的批次会被推迟到空闲后再考虑。
    pub fn set_turn_changes(&mut self, batch: Option<BatchRef>) {
        if self.latest == batch {
            return;
        }
        self.latest = batch;
        self.reconsider();
    }

    /// 宿主忙碌状态变化
    pub fn set_busy(&mut self, busy: bool) {
        if self.busy == busy {
            return;
        }
        self.busy = busy;
        if busy {
            self.preempt();
        } else {
            self.reconsider();
        }
    }

    /// 定时器到期通知
    ///
    /// 与当前定时器不匹配的句柄视为过期，直接忽略。
    pub fn on_timer(&mut self, handle: TimerHandle) {
        if self.timer != Some(handle) {
            debug!(handle = handle.0, "忽略过期定时器");
            return;
        }
        self.timer = None;

        if self.busy {
            self.preempt();
            return;
        }

        self.dispatch(PlaybackEvent::TimerElapsed);
        if self.playback.is_idle() {
            self.advance_queue();
        }
    }

    /// 跳过全部剩余动画
    ///
    /// 宿主忙碌时为空操作。当前批次记为已处理。
    pub fn skip_all(&mut self) {
        if self.busy {
            return;
        }

        let mut dropped = self.queue.clear();
        self.stats.entries_dropped += dropped;
        if !self.playback.is_idle() {
            dropped += 1;
        }
        self.dispatch(PlaybackEvent::Interrupt);

        if let Some(batch) = self.active.take() {
            info!(turn = batch.turn(), dropped, "跳过剩余动画");
            self.events.push(AnimatorEvent::Skipped {
                turn: batch.turn(),
                dropped,
            });
            self.stats.batches_skipped += 1;
            self.stats.batches_completed += 1;
            self.processed = Some(batch);
        }

        self.reconsider();
    }

    /// 处理用户输入，返回输入是否被消费
    ///
    /// 只有遮罩层显示时，绑定的点击 / 按键才会触发跳过。
    pub fn handle_input(&mut self, input: AnimatorInput) -> bool {
        if !self.is_overlay_active() || !self.bindings.matches(input) {
            return false;
        }
        self.skip_all();
        true
    }

    // ========== 只读状态 ==========

    pub fn state(&self) -> PlaybackState {
        self.playback.state()
    }

    /// 当前播放的条目
    pub fn current_entry(&self) -> Option<&AnimationQueueEntry> {
        self.playback.current()
    }

    pub fn flags(&self) -> VisualFlags {
        self.playback.flags()
    }

    /// 队列中尚未播放的条目数
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// 是否需要显示遮罩层
    pub fn is_overlay_active(&self) -> bool {
        self.playback.current().is_some()
    }

    /// 批次是否已处理完毕
    pub fn is_processed(&self, batch: &BatchRef) -> bool {
        self.processed.as_ref() == Some(batch)
    }

    /// 是否存在未到期的定时器
    pub fn has_pending_timer(&self) -> bool {
        self.timer.is_some()
    }

    pub fn stats(&self) -> AnimatorStats {
        self.stats
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// 当前帧快照
    pub fn frame(&self) -> RenderFrame<'_> {
        RenderFrame {
            state: self.playback.state(),
            entry: self.playback.current(),
            flags: self.playback.flags(),
            pending: self.queue.len(),
        }
    }

    /// 把当前帧交给渲染适配器
    pub fn render_to(&self, adapter: &mut impl RenderAdapter) {
        adapter.render(&self.frame());
    }

    /// 取出累积的事件
    pub fn drain_events(&mut self) -> Vec<AnimatorEvent> {
        std::mem::take(&mut self.events)
    }

    // ========== 内部实现 ==========

    /// 把事件交给纯状态机，并执行它输出的副作用
    fn dispatch(&mut self, event: PlaybackEvent) {
        let playback = std::mem::take(&mut self.playback);
        let (next, effects) = playback.step(event, &self.timings);
        self.playback = next;

        for effect in effects {
            match effect {
                Effect::CancelTimer => self.cancel_timer(),
                Effect::ArmTimer(delay) => {
                    self.cancel_timer();
                    self.timer = Some(self.scheduler.schedule(delay));
                }
                Effect::Finished(entry) => {
                    debug!(entry = %entry.label(), "条目播放完成");
                    self.played += 1;
                    self.stats.entries_completed += 1;
                    self.events.push(AnimatorEvent::EntryCompleted {
                        kind: entry.kind,
                        name: entry.display_item().name.clone(),
                    });
                }
                Effect::Dropped(entry) => {
                    debug!(entry = %entry.label(), "条目被中断");
                    self.stats.entries_dropped += 1;
                }
            }
        }

        debug!(state = %self.playback.state(), "播放状态");
    }

    fn cancel_timer(&mut self) {
        if let Some(handle) = self.timer.take() {
            self.scheduler.cancel(handle);
        }
    }

    /// 宿主忙碌：丢弃一切正在进行和排队中的动画
    fn preempt(&mut self) {
        let mut dropped = self.queue.clear();
        self.stats.entries_dropped += dropped;
        if !self.playback.is_idle() {
            dropped += 1;
        }
        self.dispatch(PlaybackEvent::Interrupt);

        if let Some(batch) = self.active.take() {
            info!(turn = batch.turn(), dropped, "宿主忙碌，中断动画");
            self.events.push(AnimatorEvent::Interrupted {
                turn: batch.turn(),
                dropped,
            });
            self.stats.batches_interrupted += 1;
        }
        self.played = 0;
    }

    /// Idle 状态的进入动作：取出下一个条目，或在队列耗尽时收尾
    fn advance_queue(&mut self) {
        if self.busy || !self.playback.is_idle() {
            return;
        }

        match self.queue.pop_front() {
            Some(entry) => {
                debug!(entry = %entry.label(), remaining = self.queue.len(), "开始播放条目");
                self.events.push(AnimatorEvent::EntryStarted {
                    kind: entry.kind,
                    name: entry.display_item().name.clone(),
                });
                self.dispatch(PlaybackEvent::Begin(entry));
            }
            None => self.reconsider(),
        }
    }

    /// 空闲时重新考虑最新批次
    fn reconsider(&mut self) {
        if self.busy || !self.playback.is_idle() || !self.queue.is_empty() {
            return;
        }

        if let Some(batch) = self.active.take() {
            info!(turn = batch.turn(), played = self.played, "批次播放完毕");
            self.events.push(AnimatorEvent::BatchCompleted {
                turn: batch.turn(),
                played: self.played,
            });
            self.stats.batches_completed += 1;
            self.processed = Some(batch);
        }
        self.played = 0;

        let Some(latest) = self.latest.clone() else {
            return;
        };
        if self.processed.as_ref() == Some(&latest) {
            return;
        }

        let (entries, summary) = classify_with_summary(Some(latest.changes()), self.busy);
        debug!(
            turn = latest.turn(),
            kept = summary.kept(),
            malformed = summary.dropped_malformed,
            equivalent = summary.dropped_equivalent,
            "批次分类完成"
        );

        if entries.is_empty() {
            self.events.push(AnimatorEvent::BatchCompleted {
                turn: latest.turn(),
                played: 0,
            });
            self.stats.batches_completed += 1;
            self.processed = Some(latest);
            return;
        }

        info!(turn = latest.turn(), entries = entries.len(), "批次开始播放");
        self.events.push(AnimatorEvent::BatchStarted {
            turn: latest.turn(),
            entries: entries.len(),
        });
        self.active = Some(latest);
        self.queue.replace(entries);
        self.advance_queue();
    }
}

impl ItemChangeAnimator<ManualScheduler> {
    /// 推进虚拟时钟并依次触发所有到期的定时器
    ///
    /// 在 `dt` 内由已到期定时器新登记、且同样在 `dt` 内到期的定时器也会被触发。
    pub fn advance(&mut self, dt: Duration) {
        let target = self.scheduler.now() + dt;
        while let Some(handle) = self.scheduler.pop_due(target) {
            self.on_timer(handle);
        }
        self.scheduler.advance_to(target);
    }

    /// 持续推进直到没有定时器，返回消耗的虚拟时间
    pub fn run_until_idle(&mut self) -> Duration {
        let start = self.scheduler.now();
        while let Some(deadline) = self.scheduler.next_deadline() {
            let dt = deadline.saturating_sub(self.scheduler.now());
            self.advance(dt);
        }
        self.scheduler.now() - start
    }
}

impl<S: Scheduler> std::fmt::Debug for ItemChangeAnimator<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItemChangeAnimator")
            .field("state", &self.playback.state())
            .field("current", &self.playback.current().map(|e| e.label()))
            .field("queue", &self.queue.len())
            .field("busy", &self.busy)
            .field("timer", &self.timer)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::change::{ItemChange, TurnChanges};
    use crate::input::InputKey;
    use crate::item::Item;
    use crate::playback::Glow;

    const T: Duration = Duration::from_millis(600);
    const HOLD: Duration = Duration::from_millis(2000);

    fn animator() -> ItemChangeAnimator<ManualScheduler> {
        ItemChangeAnimator::new(ManualScheduler::new(), PlaybackTimings::new(T, HOLD))
    }

    fn item(name: &str) -> Item {
        Item::new(name, "equipment", format!("{name} description"))
    }

    fn batch(turn: u64, changes: Vec<ItemChange>) -> BatchRef {
        BatchRef::new(TurnChanges::new(turn, changes))
    }

    fn assert_cleared(animator: &ItemChangeAnimator<ManualScheduler>) {
        assert_eq!(animator.state(), PlaybackState::Idle);
        assert!(animator.current_entry().is_none());
        assert_eq!(animator.queue_len(), 0);
        assert!(animator.flags().is_clear());
        assert!(!animator.has_pending_timer());
        assert_eq!(animator.scheduler().pending_count(), 0);
    }

    #[test]
    fn test_batch_starts_immediately() {
        let mut animator = animator();
        animator.set_turn_changes(Some(batch(1, vec![ItemChange::gain(item("A"))])));

        assert_eq!(animator.state(), PlaybackState::Appearing);
        assert!(animator.flags().visible);
        assert_eq!(animator.scheduler().pending_count(), 1);
    }

    #[test]
    fn test_states_follow_timers() {
        let mut animator = animator();
        animator.set_turn_changes(Some(batch(1, vec![ItemChange::gain(item("A"))])));

        animator.advance(T - Duration::from_millis(1));
        assert_eq!(animator.state(), PlaybackState::Appearing);
        animator.advance(Duration::from_millis(1));
        assert_eq!(animator.state(), PlaybackState::Visible);
        assert_eq!(animator.flags().glow, Some(Glow::Green));
        animator.advance(HOLD);
        assert_eq!(animator.state(), PlaybackState::Disappearing);
        animator.advance(T);
        assert_cleared(&animator);
    }

    #[test]
    fn test_stale_timer_is_ignored() {
        let mut animator = animator();
        animator.set_turn_changes(Some(batch(1, vec![ItemChange::gain(item("A"))])));
        animator.advance(T);
        assert_eq!(animator.state(), PlaybackState::Visible);

        // 第一个定时器的句柄已经失效
        animator.on_timer(TimerHandle(1));
        assert_eq!(animator.state(), PlaybackState::Visible);
    }

    #[test]
    fn test_busy_during_playback_abandons_batch() {
        let mut animator = animator();
        let b = batch(
            1,
            vec![ItemChange::gain(item("A")), ItemChange::gain(item("B"))],
        );
        animator.set_turn_changes(Some(b.clone()));
        animator.advance(T);

        animator.set_busy(true);
        assert_cleared(&animator);
        assert!(!animator.is_processed(&b));
        assert_eq!(animator.stats().entries_dropped, 2);

        // 忙碌期间不接受任何批次
        animator.set_turn_changes(Some(batch(2, vec![ItemChange::gain(item("C"))])));
        assert_cleared(&animator);
    }

    #[test]
    fn test_batch_arriving_mid_animation_is_deferred() {
        let mut animator = animator();
        let first = batch(1, vec![ItemChange::gain(item("A"))]);
        let second = batch(2, vec![ItemChange::loss(item("B"))]);
        let third = batch(3, vec![ItemChange::loss(item("C"))]);

        animator.set_turn_changes(Some(first.clone()));
        animator.advance(T);
        animator.set_turn_changes(Some(second.clone()));
        animator.set_turn_changes(Some(third.clone()));
        assert_eq!(animator.current_entry().unwrap().label(), "gain:A");

        animator.advance(HOLD + T);
        assert!(animator.is_processed(&first));
        assert_eq!(animator.current_entry().unwrap().label(), "loss:C");

        animator.run_until_idle();
        assert!(animator.is_processed(&third));
        assert!(!animator.is_processed(&second));
        assert_eq!(animator.stats().entries_completed, 2);
    }

    #[test]
    fn test_input_only_skips_while_overlay_is_shown() {
        let mut animator = animator();
        assert!(!animator.handle_input(AnimatorInput::Click));

        let b = batch(1, vec![ItemChange::gain(item("A"))]);
        animator.set_turn_changes(Some(b.clone()));
        assert!(!animator.handle_input(AnimatorInput::Key(InputKey::Escape)));
        assert!(animator.is_overlay_active());

        assert!(animator.handle_input(AnimatorInput::Key(InputKey::Enter)));
        assert_cleared(&animator);
        assert!(animator.is_processed(&b));
    }

    #[test]
    fn test_skip_is_noop_while_busy() {
        let mut animator = animator();
        animator.set_busy(true);
        animator.skip_all();
        assert!(animator.drain_events().is_empty());
        assert_eq!(animator.stats(), AnimatorStats::default());
    }

    #[test]
    fn test_frame_reflects_state() {
        let mut animator = animator();
        animator.set_turn_changes(Some(batch(
            1,
            vec![ItemChange::gain(item("A")), ItemChange::loss(item("B"))],
        )));

        let frame = animator.frame();
        assert!(frame.shows_overlay());
        assert_eq!(frame.state, PlaybackState::Appearing);
        assert_eq!(frame.entry.unwrap().label(), "loss:B");
        assert_eq!(frame.pending, 1);
    }
}
