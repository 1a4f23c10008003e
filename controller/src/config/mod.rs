//! Controller 配置模块

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Controller 配置
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    /// SQLite 数据库路径
    #[serde(default = "default_db_path")]
    pub db_path: String,

    /// 完整数据库地址 (可选，优先于 db_path)
    #[serde(default)]
    pub database_url: Option<String>,

    /// 日志过滤规则（RUST_LOG 未设置时使用）
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_db_path() -> String {
    "./data/gamepanel.db".to_string()
}

fn default_log_filter() -> String {
    "info,sqlx::query=warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            database_url: None,
            log_filter: default_log_filter(),
        }
    }
}

impl Config {
    /// 获取数据库地址（优先命令行参数，其次环境变量 DATABASE_URL，再次配置文件，最后 db_path）
    pub fn resolve_database_url(&self, cli_override: Option<&str>) -> String {
        if let Some(url) = cli_override.filter(|url| !url.is_empty()) {
            return url.to_string();
        }

        if let Ok(url) = std::env::var("DATABASE_URL") {
            if !url.is_empty() {
                return url;
            }
        }

        self.resolve_configured_url()
    }

    fn resolve_configured_url(&self) -> String {
        if let Some(ref url) = self.database_url {
            if !url.is_empty() {
                return url.clone();
            }
        }
        format!("sqlite://{}?mode=rwc", self.db_path)
    }
}

/// 加载配置
///
/// 指定路径时必须存在且可解析；未指定时依次尝试默认位置，都没有则使用默认配置。
pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<Config> {
    if let Some(path) = explicit {
        return read_config(path);
    }

    let config_paths = ["controller.toml", "../controller.toml"];

    for path_str in &config_paths {
        let path = Path::new(path_str);
        if path.exists() {
            return read_config(path);
        }
    }

    Ok(Config::default())
}

fn read_config(path: &Path) -> anyhow::Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("无法读取配置文件: {}", path.display()))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("解析配置文件失败: {}", path.display()))?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_fields_missing() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.db_path, "./data/gamepanel.db");
        assert_eq!(config.log_filter, "info,sqlx::query=warn");
        assert!(config.database_url.is_none());
    }

    #[test]
    fn test_configured_url() {
        let config: Config = toml::from_str("db_path = \"/var/lib/panel/panel.db\"").unwrap();
        assert_eq!(config.resolve_configured_url(), "sqlite:///var/lib/panel/panel.db?mode=rwc");

        let config: Config = toml::from_str(
            "db_path = \"ignored.db\"\ndatabase_url = \"postgres://panel@localhost/panel\"",
        )
        .unwrap();
        assert_eq!(config.resolve_configured_url(), "postgres://panel@localhost/panel");
    }

    #[test]
    fn test_cli_override_wins() {
        let config = Config::default();
        assert_eq!(
            config.resolve_database_url(Some("sqlite::memory:")),
            "sqlite::memory:"
        );
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        assert!(load_config(Some(Path::new("/nonexistent/controller.toml"))).is_err());
    }
}
