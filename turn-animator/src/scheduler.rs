//! # Scheduler 模块
//!
//! 定时器抽象。动画器同一时刻最多持有一个未到期的定时器。
//!
//! ## 设计说明
//!
//! - `Scheduler` 只负责登记 / 取消定时器，到期后由宿主调用
//!   `ItemChangeAnimator::on_timer(handle)` 通知动画器
//! - `ManualScheduler` 是虚拟时钟，供测试与 headless 宿主使用，行为完全确定

use std::time::Duration;

/// 定时器句柄
///
/// 单调递增，不会复用；动画器据此识别过期定时器。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerHandle(pub u64);

/// 定时器调度接口
pub trait Scheduler {
    /// 登记一个在 `delay` 后到期的定时器
    fn schedule(&mut self, delay: Duration) -> TimerHandle;

    /// 取消定时器（已到期或已取消的句柄直接忽略）
    fn cancel(&mut self, handle: TimerHandle);

    /// 当前时间（自调度器创建起）
    fn now(&self) -> Duration;
}

#[derive(Debug, Clone, Copy)]
struct PendingTimer {
    handle: TimerHandle,
    deadline: Duration,
}

/// 虚拟时钟调度器
#[derive(Debug, Default)]
pub struct ManualScheduler {
    now: Duration,
    next_id: u64,
    pending: Vec<PendingTimer>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// 未到期定时器数量
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// 最早到期时间
    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending.iter().map(|t| t.deadline).min()
    }

    /// 取出一个在 `until` 之前（含）到期的最早定时器，并把时钟推进到它的到期时间
    pub fn pop_due(&mut self, until: Duration) -> Option<TimerHandle> {
        let index = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, t)| t.deadline <= until)
            .min_by_key(|(_, t)| (t.deadline, t.handle))
            .map(|(i, _)| i)?;
        let timer = self.pending.remove(index);
        self.now = self.now.max(timer.deadline);
        Some(timer.handle)
    }

    /// 把时钟推进到 `target`（不会回退）
    pub fn advance_to(&mut self, target: Duration) {
        self.now = self.now.max(target);
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, delay: Duration) -> TimerHandle {
        self.next_id += 1;
        let handle = TimerHandle(self.next_id);
        self.pending.push(PendingTimer {
            handle,
            deadline: self.now + delay,
        });
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.pending.retain(|t| t.handle != handle);
    }

    fn now(&self) -> Duration {
        self.now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pop_due_in_deadline_order() {
        let mut scheduler = ManualScheduler::new();
        let late = scheduler.schedule(Duration::from_millis(500));
        let early = scheduler.schedule(Duration::from_millis(100));

        assert_eq!(scheduler.next_deadline(), Some(Duration::from_millis(100)));
        assert_eq!(scheduler.pop_due(Duration::from_millis(50)), None);
        assert_eq!(scheduler.pop_due(Duration::from_secs(1)), Some(early));
        assert_eq!(scheduler.now(), Duration::from_millis(100));
        assert_eq!(scheduler.pop_due(Duration::from_secs(1)), Some(late));
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn test_cancelled_timer_never_fires() {
        let mut scheduler = ManualScheduler::new();
        let handle = scheduler.schedule(Duration::from_millis(10));
        scheduler.cancel(handle);

        assert_eq!(scheduler.pop_due(Duration::from_secs(1)), None);
    }

    #[test]
    fn test_schedule_is_relative_to_now() {
        let mut scheduler = ManualScheduler::new();
        scheduler.advance_to(Duration::from_millis(300));
        scheduler.schedule(Duration::from_millis(200));

        assert_eq!(scheduler.next_deadline(), Some(Duration::from_millis(500)));
        scheduler.advance_to(Duration::from_millis(100));
        assert_eq!(scheduler.now(), Duration::from_millis(300));
    }
}
