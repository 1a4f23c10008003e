//! 控制面板共享库
//!
//! 游戏模板规范化引擎与 JSON 列编码工具，供 controller 的迁移和回填任务使用。

pub mod template;
pub mod utils;
