//! 模板去重与幂等插入的纯计算部分

use std::collections::{BTreeMap, HashSet};

/// 计算需要删除的重复行
///
/// 按 game_key 分组，每组只保留 id 最小的一行，其余 id 升序返回。
pub fn plan_dedup<K: AsRef<str>>(rows: &[(i64, K)]) -> Vec<i64> {
    let mut groups: BTreeMap<&str, Vec<i64>> = BTreeMap::new();
    for (id, key) in rows {
        groups.entry(key.as_ref()).or_default().push(*id);
    }

    let mut doomed: Vec<i64> = groups
        .into_values()
        .filter(|ids| ids.len() > 1)
        .flat_map(|mut ids| {
            ids.sort_unstable();
            ids.into_iter().skip(1)
        })
        .collect();

    doomed.sort_unstable();
    doomed
}

/// 返回尚未存在的 game key（候选内部重复的只保留首次出现）
pub fn missing_game_keys<'a, E, C>(existing: E, candidates: C) -> Vec<&'a str>
where
    E: IntoIterator,
    E::Item: AsRef<str>,
    C: IntoIterator<Item = &'a str>,
{
    let mut seen: HashSet<String> = existing
        .into_iter()
        .map(|key| key.as_ref().to_string())
        .collect();

    candidates
        .into_iter()
        .filter(|key| seen.insert((*key).to_string()))
        .collect()
}
