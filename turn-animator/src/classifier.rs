//! # Classifier 模块
//!
//! 把一个回合变更批次转换为有序的动画队列条目。
//!
//! ## 规则
//!
//! - 宿主忙碌或没有批次时，输出为空
//! - gain / loss 需要 `item` 载荷，transform 需要新旧两个载荷，缺失即丢弃
//! - 新旧物品等价的 transform 被丢弃（没有可见变化）
//! - 输出顺序：全部 loss，然后全部 gain，然后全部 transform，组内保持输入顺序

use tracing::debug;

use crate::change::{ChangeKind, ItemChange, TurnChanges};
use crate::queue::AnimationQueueEntry;

/// 分类统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassifySummary {
    /// 保留的 loss 条目数
    pub losses: usize,
    /// 保留的 gain 条目数
    pub gains: usize,
    /// 保留的 transform 条目数
    pub transforms: usize,
    /// 因缺少载荷被丢弃的变更数
    pub dropped_malformed: usize,
    /// 因新旧等价被丢弃的 transform 数
    pub dropped_equivalent: usize,
}

impl ClassifySummary {
    /// 保留的条目总数
    pub fn kept(&self) -> usize {
        self.losses + self.gains + self.transforms
    }
}

/// 对批次进行分类，返回有序条目
pub fn classify(batch: Option<&TurnChanges>, busy: bool) -> Vec<AnimationQueueEntry> {
    classify_with_summary(batch, busy).0
}

/// 对批次进行分类，同时返回统计信息
pub fn classify_with_summary(
    batch: Option<&TurnChanges>,
    busy: bool,
) -> (Vec<AnimationQueueEntry>, ClassifySummary) {
    let mut summary = ClassifySummary::default();

    let Some(batch) = batch else {
        return (Vec::new(), summary);
    };
    if busy {
        return (Vec::new(), summary);
    }

    let mut losses = Vec::new();
    let mut gains = Vec::new();
    let mut transforms = Vec::new();

    for (index, change) in batch.item_changes.iter().enumerate() {
        match to_entry(change) {
            Classified::Keep(entry) => match entry.kind {
                ChangeKind::Loss => losses.push(entry),
                ChangeKind::Gain => gains.push(entry),
                ChangeKind::Transform => transforms.push(entry),
            },
            Classified::Malformed => {
                debug!(turn = batch.turn, index, kind = %change.kind, "丢弃缺少载荷的变更");
                summary.dropped_malformed += 1;
            }
            Classified::Equivalent => {
                debug!(turn = batch.turn, index, "丢弃无可见变化的 transform");
                summary.dropped_equivalent += 1;
            }
        }
    }

    summary.losses = losses.len();
    summary.gains = gains.len();
    summary.transforms = transforms.len();

    let mut entries = losses;
    entries.append(&mut gains);
    entries.append(&mut transforms);
    (entries, summary)
}

enum Classified {
    Keep(AnimationQueueEntry),
    Malformed,
    Equivalent,
}

fn to_entry(change: &ItemChange) -> Classified {
    match change.kind {
        ChangeKind::Gain => match &change.item {
            Some(item) => Classified::Keep(AnimationQueueEntry::gain(item.clone())),
            None => Classified::Malformed,
        },
        ChangeKind::Loss => match &change.item {
            Some(item) => Classified::Keep(AnimationQueueEntry::loss(item.clone())),
            None => Classified::Malformed,
        },
        ChangeKind::Transform => match (&change.old_item, &change.new_item) {
            (Some(old), Some(new)) if old.is_equivalent(new) => Classified::Equivalent,
            (Some(old), Some(new)) => {
                Classified::Keep(AnimationQueueEntry::transform(old.clone(), new.clone()))
            }
            _ => Classified::Malformed,
        },
    }
}
