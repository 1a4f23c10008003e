//! 环境变量默认值合并
//!
//! 直接在原始 JSON 数组上操作：无法识别的元素（非对象、key 不是字符串）
//! 保持原位不动，写回时不会丢失运营人员的编辑。

use serde_json::{json, Value};

/// 解析 env_vars 列的原始数组，列内容不是 JSON 数组时返回 `None`
pub fn parse_env_entries(text: &str) -> Option<Vec<Value>> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Array(items)) => Some(items),
        _ => None,
    }
}

fn entry_key(entry: &Value) -> Option<&str> {
    entry.get("key").and_then(Value::as_str)
}

/// 确保模板上存在给定的环境变量
///
/// 已存在的键（大小写敏感精确匹配）保持原值不动；缺失的键按传入顺序以
/// `{key, value}` 追加到末尾。返回新追加的条目数。
pub fn ensure_env_defaults(entries: &mut Vec<Value>, defaults: &[(&str, &str)]) -> usize {
    let mut appended = 0;

    for (key, value) in defaults {
        if entries.iter().any(|entry| entry_key(entry) == Some(*key)) {
            continue;
        }
        entries.push(json!({ "key": key, "value": value }));
        appended += 1;
    }

    appended
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_existing_value_wins() {
        let mut vars = vec![
            json!({"key": "MAX_PLAYERS", "value": "64"}),
            json!({"key": "SERVER_NAME", "value": "x"}),
        ];

        let appended = ensure_env_defaults(&mut vars, &[("MAX_PLAYERS", "20")]);

        assert_eq!(appended, 0);
        assert_eq!(vars.len(), 2);
        assert_eq!(vars[0]["value"], json!("64"));
    }

    #[test]
    fn test_missing_keys_appended_in_order() {
        let mut vars = vec![json!({"key": "SERVER_NAME", "value": "x"})];

        let appended = ensure_env_defaults(
            &mut vars,
            &[("MAX_PLAYERS", "20"), ("SERVER_NAME", "ignored"), ("DIFFICULTY", "normal")],
        );

        assert_eq!(appended, 2);
        let keys: Vec<&str> = vars.iter().filter_map(entry_key).collect();
        assert_eq!(keys, vec!["SERVER_NAME", "MAX_PLAYERS", "DIFFICULTY"]);
        assert_eq!(vars[0]["value"], json!("x"));
    }

    #[test]
    fn test_case_sensitive_match() {
        let mut vars = vec![json!({"key": "max_players", "value": "8"})];
        assert_eq!(ensure_env_defaults(&mut vars, &[("MAX_PLAYERS", "20")]), 1);
        assert_eq!(vars.len(), 2);
    }

    #[test]
    fn test_repeat_merge_is_idempotent() {
        let mut vars = Vec::new();
        let defaults = [("MAX_PLAYERS", "20"), ("MAX_PLAYERS", "30")];

        assert_eq!(ensure_env_defaults(&mut vars, &defaults), 1);
        assert_eq!(ensure_env_defaults(&mut vars, &defaults), 0);
        assert_eq!(vars, vec![json!({"key": "MAX_PLAYERS", "value": "20"})]);
    }

    #[test]
    fn test_unrecognized_entries_kept_in_place() {
        let mut vars = parse_env_entries(
            r#"[{"key":"SERVER_NAME","value":"x"},"legacy",{"key":7,"value":"y"},{"key":"A","note":"n"}]"#,
        )
        .unwrap();
        let original = vars.clone();

        assert_eq!(ensure_env_defaults(&mut vars, &[("MAX_PLAYERS", "10"), ("A", "1")]), 1);

        assert_eq!(vars.len(), 5);
        assert_eq!(vars[..4], original[..]);
        assert_eq!(vars[4], json!({"key": "MAX_PLAYERS", "value": "10"}));
    }

    #[test]
    fn test_parse_env_entries_rejects_non_arrays() {
        assert_eq!(parse_env_entries("[]"), Some(Vec::new()));
        assert_eq!(parse_env_entries(r#"{"key":"A"}"#), None);
        assert_eq!(parse_env_entries("not json"), None);
        assert_eq!(parse_env_entries(""), None);
    }
}
