//! 模板需求构建

use std::collections::HashSet;

use super::catalog::{is_cs_family, is_minecraft_no_steam, STEAM_GSLT_SECRET};
use super::types::{EnvVar, Requirements, SteamInstallMode};

/// 环境变量键：去首尾空白、过滤空键、保持首次出现顺序去重
pub fn collect_required_vars(env_vars: &[EnvVar]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut keys = Vec::new();

    for var in env_vars {
        let key = var.key.trim();
        if key.is_empty() {
            continue;
        }
        if seen.insert(key.to_string()) {
            keys.push(key.to_string());
        }
    }

    keys
}

pub fn required_secrets(game_key: &str) -> Vec<String> {
    if is_cs_family(game_key) {
        vec![STEAM_GSLT_SECRET.to_string()]
    } else {
        Vec::new()
    }
}

/// Minecraft 免 Steam 模板一律为 none，其余有 app id 即匿名安装
pub fn steam_install_mode(game_key: &str, steam_app_id: Option<i64>) -> SteamInstallMode {
    if is_minecraft_no_steam(game_key) {
        return SteamInstallMode::None;
    }
    match steam_app_id {
        Some(_) => SteamInstallMode::Anonymous,
        None => SteamInstallMode::None,
    }
}

/// 构建模板需求（merged_group 不设置）
pub fn build_requirements(
    game_key: &str,
    steam_app_id: Option<i64>,
    env_vars: &[EnvVar],
) -> Requirements {
    let required_vars = collect_required_vars(env_vars);
    let required_secrets = required_secrets(game_key);

    Requirements {
        customer_allowed_vars: required_vars.clone(),
        customer_allowed_secrets: required_secrets.clone(),
        required_vars,
        required_secrets,
        steam_install_mode: steam_install_mode(game_key, steam_app_id),
        merged_group: None,
    }
}
