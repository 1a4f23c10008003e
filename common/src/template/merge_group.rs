//! 操作系统变体分组与合并标记
//!
//! 同一个游戏的 Windows / Linux 模板在存储上各占一行，这里按
//! `(steam_app_id, 基础 game key)` 分组，组内跨越至少两种系统时，
//! 给每个成员打上 `merged_group` 标记，前端据此合并展示并提供系统选择。

use std::collections::{HashMap, HashSet};

use super::catalog::{LINUX_KEY_SUFFIX, NULL_STEAM_APP_ID_KEY, WINDOWS_KEY_SUFFIX};
use super::requirements::build_requirements;
use super::types::{GameTemplate, TargetOs};

/// 去掉末尾的 `_windows` / `_linux` 后缀（只去一次）
pub fn base_game_key(game_key: &str) -> &str {
    game_key
        .strip_suffix(WINDOWS_KEY_SUFFIX)
        .or_else(|| game_key.strip_suffix(LINUX_KEY_SUFFIX))
        .unwrap_or(game_key)
}

/// 解析模板的操作系统
///
/// supported_os 中可识别的值去重后恰好一种时以它为准（无法识别的值忽略），
/// 否则看 game key 后缀，都无法判断时返回 `None`（不参与分组）。
pub fn resolve_os(game_key: &str, supported_os: &[String]) -> Option<TargetOs> {
    let mut recognized = supported_os.iter().filter_map(|os| TargetOs::parse(os));
    if let Some(first) = recognized.next() {
        if recognized.all(|os| os == first) {
            return Some(first);
        }
    }

    if game_key.ends_with(WINDOWS_KEY_SUFFIX) {
        Some(TargetOs::Windows)
    } else if game_key.ends_with(LINUX_KEY_SUFFIX) {
        Some(TargetOs::Linux)
    } else {
        None
    }
}

/// 分组键，steam_app_id 为空时使用 "null" 占位
pub fn merge_group_key(steam_app_id: Option<i64>, base_key: &str) -> (String, String) {
    let app = steam_app_id
        .map(|id| id.to_string())
        .unwrap_or_else(|| NULL_STEAM_APP_ID_KEY.to_string());
    (app, base_key.to_string())
}

#[derive(Default)]
struct Group {
    members: Vec<usize>,
    os: HashSet<TargetOs>,
}

/// 纯重算：返回与输入一一对应的合并标记
pub fn assign_merge_groups(templates: &[GameTemplate]) -> Vec<Option<String>> {
    let mut groups: HashMap<(String, String), Group> = HashMap::new();

    for (idx, template) in templates.iter().enumerate() {
        let Some(os) = resolve_os(&template.game_key, &template.supported_os) else {
            continue;
        };
        let base = base_game_key(&template.game_key);
        let group = groups
            .entry(merge_group_key(template.steam_app_id, base))
            .or_default();
        group.members.push(idx);
        group.os.insert(os);
    }

    let mut tags = vec![None; templates.len()];
    for ((_, base), group) in groups {
        if group.members.len() < 2 || group.os.len() < 2 {
            continue;
        }
        for idx in group.members {
            tags[idx] = Some(base.clone());
        }
    }

    tags
}

/// 将重算结果写回每个模板的 requirements，返回被标记的模板数
///
/// 不满足条件的模板上遗留的旧标记会被清除；尚无 requirements 的模板先派生。
pub fn apply_merge_groups(templates: &mut [GameTemplate]) -> usize {
    let tags = assign_merge_groups(templates);
    let mut tagged = 0;

    for (template, tag) in templates.iter_mut().zip(tags) {
        if tag.is_some() {
            tagged += 1;
        }
        if template.requirements.is_none() {
            template.requirements = Some(build_requirements(
                &template.game_key,
                template.steam_app_id,
                &template.env_vars,
            ));
        }
        if let Some(requirements) = template.requirements.as_mut() {
            requirements.merged_group = tag;
        }
    }

    tagged
}

/// 撤销合并标记，返回被移除标记的模板数
pub fn clear_merge_groups(templates: &mut [GameTemplate]) -> usize {
    let mut cleared = 0;
    for template in templates.iter_mut() {
        if let Some(requirements) = template.requirements.as_mut() {
            if requirements.merged_group.take().is_some() {
                cleared += 1;
            }
        }
    }
    cleared
}
