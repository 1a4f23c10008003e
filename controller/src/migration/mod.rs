use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::prelude::*;
use std::fs::create_dir_all;
use std::path;
use std::time::Duration;

mod m20250301_000001_create_game_template;
mod m20250301_000002_seed_game_templates;
mod m20250310_000001_add_template_derived_fields;
mod m20250312_000001_dedupe_template_game_key;
mod m20250315_000001_ensure_max_players_env;
mod m20250320_000001_tag_template_merge_groups;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_game_template::Migration),
            Box::new(m20250301_000002_seed_game_templates::Migration),
            Box::new(m20250310_000001_add_template_derived_fields::Migration),
            Box::new(m20250312_000001_dedupe_template_game_key::Migration),
            Box::new(m20250315_000001_ensure_max_players_env::Migration),
            Box::new(m20250320_000001_tag_template_merge_groups::Migration),
        ]
    }
}

/// 连接数据库，SQLite 文件所在目录不存在时自动创建
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    if let Some(file) = sqlite_file_path(database_url) {
        if let Some(parent) = path::Path::new(file).parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                create_dir_all(parent).map_err(|e| {
                    DbErr::Custom(format!("无法创建数据目录 {}: {}", parent.display(), e))
                })?;
            }
        }
    }

    let mut options = ConnectOptions::new(database_url);
    options
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);

    Database::connect(options).await
}

/// 从 `sqlite://path?mode=rwc` 形式的地址中取出文件路径，内存库返回 `None`
fn sqlite_file_path(database_url: &str) -> Option<&str> {
    let rest = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))?;
    let file = rest.split('?').next().unwrap_or(rest);
    if file.is_empty() || file == ":memory:" {
        None
    } else {
        Some(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlite_file_path() {
        assert_eq!(sqlite_file_path("sqlite://data/panel.db?mode=rwc"), Some("data/panel.db"));
        assert_eq!(sqlite_file_path("sqlite:./a.db"), Some("./a.db"));
        assert_eq!(sqlite_file_path("sqlite::memory:"), None);
        assert_eq!(sqlite_file_path("postgres://localhost/panel"), None);
    }

    #[tokio::test]
    async fn test_migration_status_after_up() {
        let db = crate::testing::memory_db().await;
        Migrator::up(&db, None).await.unwrap();

        assert!(Migrator::get_pending_migrations(&db).await.unwrap().is_empty());
        assert_eq!(Migrator::get_applied_migrations(&db).await.unwrap().len(), 6);
    }
}
