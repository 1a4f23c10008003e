//! 模板规范化共用的固定查找表
//!
//! 所有阶段（派生字段回填、合并分组、命令行重算）都只引用这里的常量。

/// 端口名称 → 规范端口角色
pub const PORT_ROLES: &[(&str, &str)] = &[
    ("game", "game"),
    ("query", "query"),
    ("rcon", "rcon"),
    ("tv", "tv"),
    ("voice", "voice"),
    ("filetransfer", "filetransfer"),
];

/// 未指定协议时的默认端口协议
pub const DEFAULT_PORT_PROTOCOL: &str = "udp";

/// CS 系列服务器必须提供的 GSLT 令牌
pub const STEAM_GSLT_SECRET: &str = "STEAM_GSLT";

/// 需要 Steam 游戏服务器登录令牌的 CS 系列模板
pub const CS_FAMILY_GAME_KEYS: &[&str] = &[
    "cs2",
    "csgo_legacy",
    "cs2_windows",
    "csgo_legacy_windows",
];

/// 不经过 Steam 分发的 Minecraft 模板
pub const MINECRAFT_NO_STEAM_GAME_KEYS: &[&str] = &[
    "minecraft_vanilla",
    "minecraft_paper",
    "minecraft_vanilla_all",
    "minecraft_paper_all",
];

pub const WINDOWS_KEY_SUFFIX: &str = "_windows";
pub const LINUX_KEY_SUFFIX: &str = "_linux";

/// steam_app_id 为空时使用的分组占位键
pub const NULL_STEAM_APP_ID_KEY: &str = "null";

/// 查找规范端口角色（输入应已转为小写）
pub fn canonical_port_role(lower_name: &str) -> Option<&'static str> {
    PORT_ROLES
        .iter()
        .find(|(name, _)| *name == lower_name)
        .map(|(_, role)| *role)
}

pub fn is_cs_family(game_key: &str) -> bool {
    CS_FAMILY_GAME_KEYS.contains(&game_key)
}

pub fn is_minecraft_no_steam(game_key: &str) -> bool {
    MINECRAFT_NO_STEAM_GAME_KEYS.contains(&game_key)
}
