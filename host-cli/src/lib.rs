//! # Host CLI
//!
//! 物品变更动画器的 headless 宿主。
//!
//! 宿主负责：
//! - 读取回放时间线（回合批次、忙碌信号、等待、用户输入）
//! - 驱动虚拟时钟
//! - 把每一帧渲染为文本
//!
//! 宿主不包含调度逻辑，所有状态转换都在 `turn-animator` 中完成。

pub mod logging;
pub mod renderer;
pub mod session;
pub mod timeline;

pub use renderer::TextRenderer;
pub use session::{Session, SessionOptions, SessionReport};
pub use timeline::{Step, Timeline};
