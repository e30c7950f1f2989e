//! # Item 模块
//!
//! 物品数据模型与等价性判断。
//!
//! 等价性用于过滤"没有可见变化"的 transform 变更：
//! 两个物品在名称、类型、描述、激活描述、激活标记、垃圾标记以及
//! 已知用法**集合**（忽略数组顺序）全部相同时视为等价。

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// 物品的已知用法
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnownUse {
    /// 动作名称（如 "Light the torch"）
    pub action_name: String,
    /// 用法描述
    #[serde(default)]
    pub description: Option<String>,
    /// 对叙事的提示效果
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_effect: Option<String>,
    /// 仅在物品激活时可用
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applies_when_active: Option<bool>,
    /// 仅在物品未激活时可用
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applies_when_inactive: Option<bool>,
}

impl KnownUse {
    /// 创建只有名称的用法
    pub fn new(action_name: impl Into<String>) -> Self {
        Self {
            action_name: action_name.into(),
            description: None,
            prompt_effect: None,
            applies_when_active: None,
            applies_when_inactive: None,
        }
    }

    /// 附加描述
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// 物品
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// 物品名称
    pub name: String,
    /// 物品类型（如 "equipment"、"single-use"）
    #[serde(rename = "type")]
    pub item_type: String,
    /// 描述文本
    #[serde(default)]
    pub description: String,
    /// 激活状态下的描述
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_description: Option<String>,
    /// 是否处于激活状态
    #[serde(default)]
    pub is_active: bool,
    /// 是否为垃圾物品
    #[serde(default)]
    pub is_junk: bool,
    /// 已知用法
    #[serde(default)]
    pub known_uses: Vec<KnownUse>,
    /// 展示用标签（不参与等价性判断）
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl Item {
    /// 创建物品
    pub fn new(
        name: impl Into<String>,
        item_type: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            item_type: item_type.into(),
            description: description.into(),
            active_description: None,
            is_active: false,
            is_junk: false,
            known_uses: Vec::new(),
            tags: Vec::new(),
        }
    }

    /// 附加一个已知用法
    pub fn with_known_use(mut self, known_use: KnownUse) -> Self {
        self.known_uses.push(known_use);
        self
    }

    /// 判断两个物品在视觉上是否等价
    ///
    /// 已知用法按集合比较，数组顺序和重复项不影响结果。`tags` 不参与比较。
    pub fn is_equivalent(&self, other: &Item) -> bool {
        self.name == other.name
            && self.item_type == other.item_type
            && self.description == other.description
            && self.active_description == other.active_description
            && self.is_active == other.is_active
            && self.is_junk == other.is_junk
            && same_known_uses(&self.known_uses, &other.known_uses)
    }
}

fn same_known_uses(a: &[KnownUse], b: &[KnownUse]) -> bool {
    let a: BTreeSet<&KnownUse> = a.iter().collect();
    let b: BTreeSet<&KnownUse> = b.iter().collect();
    a == b
}
