//! # Queue 模块
//!
//! 动画队列：分类器一次性整体写入，播放状态机只从队首取出。
//!
//! 队列不支持任意位置插入或重排，顺序由分类器在写入前确定。

use std::collections::VecDeque;

use crate::change::ChangeKind;
use crate::item::Item;

/// 队列条目的载荷
#[derive(Debug, Clone, PartialEq)]
pub enum EntryPayload {
    /// gain / loss：单个物品
    Single(Item),
    /// transform：旧物品与新物品
    Pair { old: Item, new: Item },
}

/// 动画队列条目
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationQueueEntry {
    /// 条目类型
    pub kind: ChangeKind,
    /// 载荷
    pub payload: EntryPayload,
}

impl AnimationQueueEntry {
    /// 获得物品条目
    pub fn gain(item: Item) -> Self {
        Self {
            kind: ChangeKind::Gain,
            payload: EntryPayload::Single(item),
        }
    }

    /// 失去物品条目
    pub fn loss(item: Item) -> Self {
        Self {
            kind: ChangeKind::Loss,
            payload: EntryPayload::Single(item),
        }
    }

    /// 物品变化条目
    pub fn transform(old: Item, new: Item) -> Self {
        Self {
            kind: ChangeKind::Transform,
            payload: EntryPayload::Pair { old, new },
        }
    }

    /// gain / loss 的物品
    pub fn item(&self) -> Option<&Item> {
        match &self.payload {
            EntryPayload::Single(item) => Some(item),
            EntryPayload::Pair { .. } => None,
        }
    }

    /// transform 的旧物品
    pub fn old_item(&self) -> Option<&Item> {
        match &self.payload {
            EntryPayload::Pair { old, .. } => Some(old),
            EntryPayload::Single(_) => None,
        }
    }

    /// transform 的新物品
    pub fn new_item(&self) -> Option<&Item> {
        match &self.payload {
            EntryPayload::Pair { new, .. } => Some(new),
            EntryPayload::Single(_) => None,
        }
    }

    /// 卡片上展示的物品（transform 展示新物品）
    pub fn display_item(&self) -> &Item {
        match &self.payload {
            EntryPayload::Single(item) => item,
            EntryPayload::Pair { new, .. } => new,
        }
    }

    /// 简短标签，如 `loss:Rope`、`transform:Torch`
    pub fn label(&self) -> String {
        format!("{}:{}", self.kind, self.display_item().name)
    }
}

/// 动画队列
#[derive(Debug, Default)]
pub struct AnimationQueue {
    entries: VecDeque<AnimationQueueEntry>,
}

impl AnimationQueue {
    /// 创建空队列
    pub fn new() -> Self {
        Self::default()
    }

    /// 用新的条目整体替换队列内容
    pub fn replace(&mut self, entries: Vec<AnimationQueueEntry>) {
        self.entries = entries.into();
    }

    /// 取出队首条目
    pub fn pop_front(&mut self) -> Option<AnimationQueueEntry> {
        self.entries.pop_front()
    }

    /// 清空队列，返回被丢弃的条目数
    pub fn clear(&mut self) -> usize {
        let dropped = self.entries.len();
        self.entries.clear();
        dropped
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AnimationQueueEntry> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_is_fifo() {
        let mut queue = AnimationQueue::new();
        queue.replace(vec![
            AnimationQueueEntry::loss(Item::new("A", "junk", "")),
            AnimationQueueEntry::gain(Item::new("B", "key", "")),
        ]);

        assert_eq!(queue.len(), 2);
        assert_eq!(queue.pop_front().unwrap().label(), "loss:A");
        assert_eq!(queue.pop_front().unwrap().label(), "gain:B");
        assert!(queue.pop_front().is_none());
    }

    #[test]
    fn test_replace_discards_previous_entries() {
        let mut queue = AnimationQueue::new();
        queue.replace(vec![AnimationQueueEntry::gain(Item::new("Old", "key", ""))]);
        queue.replace(vec![AnimationQueueEntry::gain(Item::new("New", "key", ""))]);

        let labels: Vec<String> = queue.iter().map(|e| e.label()).collect();
        assert_eq!(labels, vec!["gain:New"]);
        assert_eq!(queue.clear(), 1);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_transform_payload_accessors() {
        let entry = AnimationQueueEntry::transform(
            Item::new("Torch", "equipment", "unlit"),
            Item::new("Torch", "equipment", "lit"),
        );

        assert!(entry.item().is_none());
        assert_eq!(entry.old_item().unwrap().description, "unlit");
        assert_eq!(entry.new_item().unwrap().description, "lit");
        assert_eq!(entry.display_item().description, "lit");
    }
}
