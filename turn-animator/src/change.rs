//! # Change 模块
//!
//! 定义宿主（游戏状态引擎）交给动画器的回合变更批次。
//!
//! ## 设计说明
//!
//! - `ItemChange` 的载荷字段都是可选的，缺失载荷的变更在分类阶段被丢弃
//! - 批次身份按**引用**比较（`BatchRef`），与内容无关

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::BatchError;
use crate::item::Item;

/// 变更类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    /// 获得物品
    Gain,
    /// 失去物品
    Loss,
    /// 物品变化（旧物品 → 新物品）
    #[serde(alias = "update")]
    Transform,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeKind::Gain => write!(f, "gain"),
            ChangeKind::Loss => write!(f, "loss"),
            ChangeKind::Transform => write!(f, "transform"),
        }
    }
}

/// 单条物品变更
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemChange {
    /// 变更类型
    #[serde(rename = "type")]
    pub kind: ChangeKind,
    /// gain / loss 的物品
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<Item>,
    /// transform 的旧物品
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_item: Option<Item>,
    /// transform 的新物品
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_item: Option<Item>,
}

impl ItemChange {
    /// 创建获得物品变更
    pub fn gain(item: Item) -> Self {
        Self {
            kind: ChangeKind::Gain,
            item: Some(item),
            old_item: None,
            new_item: None,
        }
    }

    /// 创建失去物品变更
    pub fn loss(item: Item) -> Self {
        Self {
            kind: ChangeKind::Loss,
            item: Some(item),
            old_item: None,
            new_item: None,
        }
    }

    /// 创建物品变化变更
    pub fn transform(old_item: Item, new_item: Item) -> Self {
        Self {
            kind: ChangeKind::Transform,
            item: None,
            old_item: Some(old_item),
            new_item: Some(new_item),
        }
    }
}

/// 一个回合的变更批次
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnChanges {
    /// 回合序号（仅用于日志，不参与身份判断）
    #[serde(default)]
    pub turn: u64,
    /// 物品变更列表（保持输入顺序）
    #[serde(default)]
    pub item_changes: Vec<ItemChange>,
}

impl TurnChanges {
    /// 创建批次
    pub fn new(turn: u64, item_changes: Vec<ItemChange>) -> Self {
        Self { turn, item_changes }
    }

    /// 从 JSON 解码批次
    pub fn from_json(json: &str) -> Result<Self, BatchError> {
        serde_json::from_str(json).map_err(|e| BatchError::InvalidJson {
            message: e.to_string(),
        })
    }
}

/// 批次引用
///
/// 按指针身份比较：同一个 `BatchRef` 的克隆彼此相等，
/// 内容相同但分别创建的两个批次不相等。
#[derive(Debug, Clone)]
pub struct BatchRef(Rc<TurnChanges>);

impl BatchRef {
    /// 包装一个新批次
    pub fn new(changes: TurnChanges) -> Self {
        Self(Rc::new(changes))
    }

    /// 回合序号
    pub fn turn(&self) -> u64 {
        self.0.turn
    }

    /// 批次内容
    pub fn changes(&self) -> &TurnChanges {
        &self.0
    }
}

impl PartialEq for BatchRef {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for BatchRef {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_ref_identity() {
        let a = BatchRef::new(TurnChanges::new(1, Vec::new()));
        let b = BatchRef::new(TurnChanges::new(1, Vec::new()));

        assert_eq!(a, a.clone());
        assert_ne!(a, b);
        assert_eq!(a.changes(), b.changes());
    }

    #[test]
    fn test_decode_turn_changes() {
        let json = r#"{
            "turn": 7,
            "itemChanges": [
                { "type": "gain", "item": { "name": "Map", "type": "knowledge" } },
                { "type": "update",
                  "oldItem": { "name": "Torch", "type": "equipment" },
                  "newItem": { "name": "Torch", "type": "equipment", "isActive": true } },
                { "type": "loss" }
            ]
        }"#;
        let batch = TurnChanges::from_json(json).unwrap();

        assert_eq!(batch.turn, 7);
        assert_eq!(batch.item_changes.len(), 3);
        assert_eq!(batch.item_changes[1].kind, ChangeKind::Transform);
        assert!(batch.item_changes[2].item.is_none());
    }

    #[test]
    fn test_decode_invalid_json() {
        let err = TurnChanges::from_json("{ not json").unwrap_err();
        assert!(matches!(err, BatchError::InvalidJson { .. }));
    }
}
