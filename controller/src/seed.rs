//! 内置游戏模板种子数据

use serde_json::{json, Value};

/// 一条待插入的模板种子
#[derive(Debug, Clone)]
pub struct SeedTemplate {
    pub game_key: &'static str,
    pub name: &'static str,
    pub steam_app_id: Option<i64>,
    pub required_ports: Value,
    pub env_vars: Value,
    pub supported_os: &'static [&'static str],
}

fn env(keys: &[(&str, &str)]) -> Value {
    Value::Array(
        keys.iter()
            .map(|(key, value)| json!({ "key": key, "value": value }))
            .collect(),
    )
}

fn cs_ports() -> Value {
    json!([
        { "name": "game", "protocol": "udp" },
        { "name": "rcon", "protocol": "tcp" },
        { "name": "tv", "protocol": "udp", "required": false }
    ])
}

fn minecraft_ports() -> Value {
    json!([
        { "name": "game", "protocol": "tcp" },
        { "name": "query", "protocol": "udp", "required": false },
        { "name": "rcon", "protocol": "tcp", "required": false }
    ])
}

fn valheim_ports() -> Value {
    json!([{ "name": "game", "protocol": "udp", "count": 3, "contiguous": true }])
}

/// 首次部署时写入的模板目录（每个游戏 + 系统一条）
pub fn builtin_templates() -> Vec<SeedTemplate> {
    vec![
        SeedTemplate {
            game_key: "cs2",
            name: "Counter-Strike 2",
            steam_app_id: Some(730),
            required_ports: cs_ports(),
            env_vars: env(&[("SERVER_NAME", "CS2 Server"), ("RCON_PASSWORD", ""), ("GAME_MODE", "competitive")]),
            supported_os: &["linux"],
        },
        SeedTemplate {
            game_key: "cs2_windows",
            name: "Counter-Strike 2 (Windows)",
            steam_app_id: Some(730),
            required_ports: cs_ports(),
            env_vars: env(&[("SERVER_NAME", "CS2 Server"), ("RCON_PASSWORD", ""), ("GAME_MODE", "competitive")]),
            supported_os: &["windows"],
        },
        SeedTemplate {
            game_key: "csgo_legacy",
            name: "CS:GO Legacy",
            steam_app_id: Some(740),
            required_ports: cs_ports(),
            env_vars: env(&[("SERVER_NAME", "CS:GO Server"), ("RCON_PASSWORD", "")]),
            supported_os: &["linux"],
        },
        SeedTemplate {
            game_key: "csgo_legacy_windows",
            name: "CS:GO Legacy (Windows)",
            steam_app_id: Some(740),
            required_ports: cs_ports(),
            env_vars: env(&[("SERVER_NAME", "CS:GO Server"), ("RCON_PASSWORD", "")]),
            supported_os: &["windows"],
        },
        SeedTemplate {
            game_key: "satisfactory",
            name: "Satisfactory",
            steam_app_id: Some(1690800),
            required_ports: json!([
                { "name": "game", "protocol": "udp" },
                { "name": "query", "protocol": "udp" },
                { "name": "Beacon", "protocol": "udp" }
            ]),
            env_vars: env(&[("MAX_PLAYERS", "4"), ("AUTOSAVE_NUM", "5")]),
            supported_os: &["linux"],
        },
        SeedTemplate {
            game_key: "valheim",
            name: "Valheim",
            steam_app_id: Some(896660),
            required_ports: valheim_ports(),
            env_vars: env(&[("SERVER_NAME", "Valheim"), ("WORLD_NAME", "Dedicated"), ("SERVER_PASSWORD", "")]),
            supported_os: &["linux"],
        },
        SeedTemplate {
            game_key: "valheim_windows",
            name: "Valheim (Windows)",
            steam_app_id: Some(896660),
            required_ports: valheim_ports(),
            env_vars: env(&[("SERVER_NAME", "Valheim"), ("WORLD_NAME", "Dedicated"), ("SERVER_PASSWORD", "")]),
            supported_os: &["windows"],
        },
        SeedTemplate {
            game_key: "rust",
            name: "Rust",
            steam_app_id: Some(258550),
            required_ports: json!([
                { "name": "game", "protocol": "udp" },
                { "name": "query", "protocol": "udp" },
                { "name": "rcon", "protocol": "tcp" }
            ]),
            env_vars: env(&[("SERVER_NAME", "Rust Server"), ("RCON_PASSWORD", ""), ("WORLD_SIZE", "3500")]),
            supported_os: &["linux"],
        },
        SeedTemplate {
            game_key: "minecraft_vanilla",
            name: "Minecraft Java (Vanilla)",
            steam_app_id: None,
            required_ports: minecraft_ports(),
            env_vars: env(&[("EULA", "true"), ("MC_VERSION", "latest")]),
            supported_os: &["linux"],
        },
        SeedTemplate {
            game_key: "minecraft_paper",
            name: "Minecraft Java (Paper)",
            steam_app_id: None,
            required_ports: minecraft_ports(),
            env_vars: env(&[("EULA", "true"), ("MC_VERSION", "latest")]),
            supported_os: &["linux"],
        },
        SeedTemplate {
            game_key: "minecraft_vanilla_all",
            name: "Minecraft Java (Vanilla, all versions)",
            steam_app_id: None,
            required_ports: minecraft_ports(),
            env_vars: env(&[("EULA", "true"), ("MC_VERSION", "")]),
            supported_os: &["linux", "windows"],
        },
        SeedTemplate {
            game_key: "minecraft_paper_all",
            name: "Minecraft Java (Paper, all versions)",
            steam_app_id: None,
            required_ports: minecraft_ports(),
            env_vars: env(&[("EULA", "true"), ("MC_VERSION", "")]),
            supported_os: &["linux", "windows"],
        },
        SeedTemplate {
            game_key: "terraria_linux",
            name: "Terraria",
            steam_app_id: None,
            required_ports: json!([{ "name": "game", "protocol": "tcp" }]),
            env_vars: env(&[("WORLD_NAME", "world")]),
            supported_os: &[],
        },
        SeedTemplate {
            game_key: "terraria_windows",
            name: "Terraria (Windows)",
            steam_app_id: None,
            required_ports: json!([{ "name": "game", "protocol": "tcp" }]),
            env_vars: env(&[("WORLD_NAME", "world")]),
            supported_os: &[],
        },
    ]
}

/// 一组模板需要保证存在的环境变量默认值
#[derive(Debug, Clone, Copy)]
pub struct EnvDefaultRule {
    pub game_keys: &'static [&'static str],
    pub defaults: &'static [(&'static str, &'static str)],
}

/// 需要保证存在 MAX_PLAYERS 的模板及默认人数
pub const MAX_PLAYERS_RULES: &[EnvDefaultRule] = &[
    EnvDefaultRule {
        game_keys: &[
            "minecraft_vanilla",
            "minecraft_paper",
            "minecraft_vanilla_all",
            "minecraft_paper_all",
        ],
        defaults: &[("MAX_PLAYERS", "20")],
    },
    EnvDefaultRule {
        game_keys: &["valheim", "valheim_windows"],
        defaults: &[("MAX_PLAYERS", "10")],
    },
    EnvDefaultRule {
        game_keys: &["terraria_linux", "terraria_windows"],
        defaults: &[("MAX_PLAYERS", "8")],
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_builtin_keys_unique() {
        let templates = builtin_templates();
        let keys: HashSet<&str> = templates.iter().map(|t| t.game_key).collect();
        assert_eq!(keys.len(), templates.len());
    }

    #[test]
    fn test_max_players_targets_are_seeded() {
        let keys: HashSet<&str> = builtin_templates().iter().map(|t| t.game_key).collect();
        for rule in MAX_PLAYERS_RULES {
            for key in rule.game_keys {
                assert!(keys.contains(key), "{} 未在种子数据中", key);
            }
        }
    }
}
