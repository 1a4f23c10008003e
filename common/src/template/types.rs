//! 游戏模板类型定义
//!
//! 模板的原始数据来自松散类型的 JSON 列。这里是唯一的解析边界：
//! 形状不对的元素在此丢弃，缺省字段在此补默认值，之后的逻辑只处理强类型结构。

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 原始端口描述 `{name, protocol, count?, required?, contiguous?}`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct PortDescriptor {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contiguous: Option<bool>,
}

impl PortDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = Some(protocol.into());
        self
    }

    pub fn count(mut self, count: i64) -> Self {
        self.count = Some(count);
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    pub fn contiguous(mut self, contiguous: bool) -> Self {
        self.contiguous = Some(contiguous);
        self
    }

    /// 从单个 JSON 元素解析端口描述
    ///
    /// 非对象元素、缺少字符串 `name` 的对象返回 `None`（调用方直接跳过）。
    /// `null` 值视同字段缺失。
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let name = obj.get("name")?.as_str()?.to_string();

        let protocol = obj
            .get("protocol")
            .and_then(Value::as_str)
            .map(str::to_string);

        Some(Self {
            name,
            protocol,
            count: obj.get("count").and_then(coerce_int),
            required: obj.get("required").and_then(coerce_bool),
            contiguous: obj.get("contiguous").and_then(coerce_bool),
        })
    }

    /// 解析端口描述数组，非数组输入返回空列表
    pub fn parse_list(value: &Value) -> Vec<Self> {
        match value.as_array() {
            Some(items) => items.iter().filter_map(Self::from_value).collect(),
            None => Vec::new(),
        }
    }

    /// 解析 JSON 文本形式的端口描述数组，文本本身无法解析时返回空列表
    pub fn parse_list_str(text: &str) -> Vec<Self> {
        serde_json::from_str::<Value>(text)
            .map(|value| Self::parse_list(&value))
            .unwrap_or_default()
    }
}

/// 宽松整数转换：数字、数字字符串、布尔值
fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Null => None,
        Value::Bool(b) => Some(i64::from(*b)),
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
                .or(Some(0))
        }
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// 宽松布尔转换（空串、"0"、0、空数组为假）
fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Null => None,
        Value::Bool(b) => Some(*b),
        Value::Number(n) => Some(n.as_f64().map(|f| f != 0.0).unwrap_or(true)),
        Value::String(s) => Some(!(s.is_empty() || s == "0")),
        Value::Array(items) => Some(!items.is_empty()),
        Value::Object(_) => Some(true),
    }
}

/// 规范化后的端口条目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortProfileEntry {
    pub role: String,
    pub protocol: String,
    /// 至少为 1，原始值为正数时原样保留
    pub count: u64,
    pub required: bool,
    pub contiguous: bool,
}

/// 环境变量条目
///
/// 除 `key`/`value` 外的字段原样保留在 `extra` 中，写回时不会丢失。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvVar {
    pub key: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub value: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EnvVar {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: Value::String(value.into()),
            extra: Map::new(),
        }
    }

    /// 只有键、没有值的条目
    pub fn key_only(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: Value::Null,
            extra: Map::new(),
        }
    }

    pub fn from_value(value: &Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        serde_json::from_value(value.clone()).ok()
    }

    pub fn parse_list(value: &Value) -> Vec<Self> {
        match value.as_array() {
            Some(items) => items.iter().filter_map(Self::from_value).collect(),
            None => Vec::new(),
        }
    }

    pub fn parse_list_str(text: &str) -> Vec<Self> {
        serde_json::from_str::<Value>(text)
            .map(|value| Self::parse_list(&value))
            .unwrap_or_default()
    }
}

/// Steam 安装方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SteamInstallMode {
    /// 不通过 Steam 安装
    #[default]
    None,
    /// 通过 SteamCMD 匿名登录安装
    Anonymous,
}

impl std::fmt::Display for SteamInstallMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SteamInstallMode::None => write!(f, "none"),
            SteamInstallMode::Anonymous => write!(f, "anonymous"),
        }
    }
}

/// 模板的派生需求信息
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Requirements {
    pub required_vars: Vec<String>,
    pub required_secrets: Vec<String>,
    pub steam_install_mode: SteamInstallMode,
    pub customer_allowed_vars: Vec<String>,
    pub customer_allowed_secrets: Vec<String>,
    /// Windows/Linux 变体合并分组（值为基础 game key）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merged_group: Option<String>,
}

impl Requirements {
    /// 解析已存储的 requirements 列，非对象或格式错误时返回 `None`
    pub fn parse_str(text: &str) -> Option<Self> {
        let value: Value = serde_json::from_str(text).ok()?;
        if !value.is_object() {
            return None;
        }
        serde_json::from_value(value).ok()
    }
}

/// 模板运行的操作系统
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetOs {
    Linux,
    Windows,
}

impl TargetOs {
    /// 大小写不敏感地识别 "linux" / "windows"
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.eq_ignore_ascii_case("linux") {
            Some(TargetOs::Linux)
        } else if raw.eq_ignore_ascii_case("windows") {
            Some(TargetOs::Windows)
        } else {
            None
        }
    }
}

impl std::fmt::Display for TargetOs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetOs::Linux => write!(f, "linux"),
            TargetOs::Windows => write!(f, "windows"),
        }
    }
}

/// 解析 supported_os 列：字符串数组，单个字符串也接受
pub fn parse_supported_os(text: &str) -> Vec<String> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        Ok(Value::String(s)) if !s.is_empty() => vec![s],
        _ => Vec::new(),
    }
}

/// 游戏模板（每个游戏 + 操作系统组合一条）
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GameTemplate {
    pub id: Option<i64>,
    pub game_key: String,
    pub steam_app_id: Option<i64>,
    pub required_ports: Vec<PortDescriptor>,
    pub env_vars: Vec<EnvVar>,
    pub supported_os: Vec<String>,
    pub port_profile: Vec<PortProfileEntry>,
    pub requirements: Option<Requirements>,
}

impl GameTemplate {
    pub fn new(game_key: impl Into<String>) -> Self {
        Self {
            game_key: game_key.into(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_steam_app_id(mut self, steam_app_id: Option<i64>) -> Self {
        self.steam_app_id = steam_app_id;
        self
    }

    pub fn with_ports(mut self, ports: Vec<PortDescriptor>) -> Self {
        self.required_ports = ports;
        self
    }

    pub fn with_env_vars(mut self, env_vars: Vec<EnvVar>) -> Self {
        self.env_vars = env_vars;
        self
    }

    pub fn with_supported_os<I, S>(mut self, os: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.supported_os = os.into_iter().map(Into::into).collect();
        self
    }

    /// 从数据库行的原始列构造模板，所有 JSON 列都经过同一解析边界
    pub fn from_columns(
        id: i64,
        game_key: &str,
        steam_app_id: Option<i64>,
        required_ports: &str,
        env_vars: &str,
        supported_os: &str,
        requirements: Option<&str>,
    ) -> Self {
        Self {
            id: Some(id),
            game_key: game_key.to_string(),
            steam_app_id,
            required_ports: PortDescriptor::parse_list_str(required_ports),
            env_vars: EnvVar::parse_list_str(env_vars),
            supported_os: parse_supported_os(supported_os),
            port_profile: Vec::new(),
            requirements: requirements.and_then(Requirements::parse_str),
        }
    }

    /// 重新计算 port_profile 与 requirements
    ///
    /// 已有的 merged_group 保留，由合并分组阶段统一重算。
    pub fn rederive(&mut self) {
        let merged_group = self
            .requirements
            .as_ref()
            .and_then(|r| r.merged_group.clone());

        self.port_profile = super::port_profile::build_port_profile(&self.required_ports);
        let mut requirements = super::requirements::build_requirements(
            &self.game_key,
            self.steam_app_id,
            &self.env_vars,
        );
        requirements.merged_group = merged_group;
        self.requirements = Some(requirements);
    }

    pub fn merged_group(&self) -> Option<&str> {
        self.requirements
            .as_ref()
            .and_then(|r| r.merged_group.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_port_descriptor_skips_malformed() {
        let raw = json!([
            {"name": "game", "protocol": "udp"},
            "garbage",
            42,
            {"protocol": "tcp"},
            {"name": null},
            {"name": "rcon", "protocol": "tcp", "count": "2", "required": 0}
        ]);

        let ports = PortDescriptor::parse_list(&raw);
        assert_eq!(ports.len(), 2);
        assert_eq!(ports[0].name, "game");
        assert_eq!(ports[1].count, Some(2));
        assert_eq!(ports[1].required, Some(false));
    }

    #[test]
    fn test_null_fields_treated_as_absent() {
        let port = PortDescriptor::from_value(&json!({
            "name": "query",
            "protocol": null,
            "count": null,
            "required": null,
            "contiguous": null
        }))
        .unwrap();

        assert_eq!(port, PortDescriptor::new("query"));
    }

    #[test]
    fn test_loose_scalars() {
        let port = PortDescriptor::from_value(&json!({
            "name": "game",
            "count": 3.7,
            "required": "",
            "contiguous": "yes"
        }))
        .unwrap();

        assert_eq!(port.count, Some(3));
        assert_eq!(port.required, Some(false));
        assert_eq!(port.contiguous, Some(true));

        let port = PortDescriptor::from_value(&json!({"name": "game", "count": "abc"})).unwrap();
        assert_eq!(port.count, Some(0));
    }

    #[test]
    fn test_invalid_json_text_yields_empty() {
        assert!(PortDescriptor::parse_list_str("not json").is_empty());
        assert!(PortDescriptor::parse_list_str("{\"name\":\"game\"}").is_empty());
        assert!(EnvVar::parse_list_str("").is_empty());
    }

    #[test]
    fn test_env_var_keeps_extra_fields() {
        let raw = json!([
            {"key": "SERVER_NAME", "value": "My Server", "editable": true},
            {"key": "RCON_PASSWORD"},
            ["not", "an", "object"],
            {"value": "orphan"}
        ]);

        let vars = EnvVar::parse_list(&raw);
        assert_eq!(vars.len(), 2);
        assert_eq!(vars[0].extra.get("editable"), Some(&json!(true)));
        assert!(vars[1].value.is_null());

        let encoded = serde_json::to_value(&vars).unwrap();
        assert_eq!(
            encoded,
            json!([
                {"key": "SERVER_NAME", "value": "My Server", "editable": true},
                {"key": "RCON_PASSWORD"}
            ])
        );
    }

    #[test]
    fn test_requirements_wire_format() {
        let requirements = Requirements {
            required_vars: vec!["SERVER_NAME".into()],
            required_secrets: vec![],
            steam_install_mode: SteamInstallMode::Anonymous,
            customer_allowed_vars: vec!["SERVER_NAME".into()],
            customer_allowed_secrets: vec![],
            merged_group: None,
        };

        let value = serde_json::to_value(&requirements).unwrap();
        assert_eq!(value["steam_install_mode"], "anonymous");
        assert!(value.get("merged_group").is_none());

        assert_eq!(Requirements::parse_str("[]"), None);
        assert_eq!(Requirements::parse_str("{}"), Some(Requirements::default()));
    }

    #[test]
    fn test_parse_supported_os() {
        assert_eq!(parse_supported_os("[\"linux\", 1, \"windows\"]"), vec!["linux", "windows"]);
        assert_eq!(parse_supported_os("\"Windows\""), vec!["Windows"]);
        assert!(parse_supported_os("null").is_empty());
        assert_eq!(TargetOs::parse("LINUX"), Some(TargetOs::Linux));
        assert_eq!(TargetOs::parse("macos"), None);
    }
}
