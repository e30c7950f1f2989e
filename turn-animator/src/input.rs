//! # Input 模块
//!
//! 定义宿主向动画器传递的用户输入。
//!
//! 动画器不直接处理鼠标 / 键盘事件，只处理语义化的输入：
//! 点击遮罩层或按下绑定的按键会触发 `skip_all()`。

use serde::{Deserialize, Serialize};

/// 动画器关心的按键
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKey {
    Enter,
    Space,
    Escape,
    /// 其他任意按键
    Other,
}

/// 宿主向动画器传递的输入
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimatorInput {
    /// 点击遮罩层
    Click,
    /// 按键
    Key(InputKey),
}

/// 跳过操作的输入绑定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkipBindings {
    /// 点击是否触发跳过
    pub click: bool,
    /// 触发跳过的按键
    pub keys: Vec<InputKey>,
}

impl SkipBindings {
    /// 输入是否应触发跳过
    pub fn matches(&self, input: AnimatorInput) -> bool {
        match input {
            AnimatorInput::Click => self.click,
            AnimatorInput::Key(key) => self.keys.contains(&key),
        }
    }
}

impl Default for SkipBindings {
    fn default() -> Self {
        Self {
            click: true,
            keys: vec![InputKey::Enter, InputKey::Space],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings() {
        let bindings = SkipBindings::default();

        assert!(bindings.matches(AnimatorInput::Click));
        assert!(bindings.matches(AnimatorInput::Key(InputKey::Enter)));
        assert!(bindings.matches(AnimatorInput::Key(InputKey::Space)));
        assert!(!bindings.matches(AnimatorInput::Key(InputKey::Escape)));
        assert!(!bindings.matches(AnimatorInput::Key(InputKey::Other)));
    }

    #[test]
    fn test_input_serialization() {
        let input = AnimatorInput::Key(InputKey::Space);
        let json = serde_json::to_string(&input).unwrap();
        assert_eq!(json, r#"{"key":"space"}"#);
        let decoded: AnimatorInput = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, input);
    }
}
