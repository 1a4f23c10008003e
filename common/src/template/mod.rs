//! 游戏模板规范化
//!
//! 从松散的模板描述（端口、环境变量、Steam app id、game key 的系统后缀）派生：
//! 端口画像、需求信息，以及 Windows/Linux 变体的合并分组标记。
//! 这里全部是同步纯函数，不做任何 I/O。

pub mod catalog;
pub mod dedup;
pub mod env_vars;
pub mod merge_group;
pub mod port_profile;
pub mod requirements;
mod types;

pub use dedup::{missing_game_keys, plan_dedup};
pub use env_vars::{ensure_env_defaults, parse_env_entries};
pub use merge_group::{
    apply_merge_groups, assign_merge_groups, base_game_key, clear_merge_groups, resolve_os,
};
pub use port_profile::{build_port_profile, build_port_profile_from_json, map_port};
pub use requirements::build_requirements;
pub use types::*;
