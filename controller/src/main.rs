mod backfill;
mod config;
mod entity;
mod migration;
mod seed;
#[cfg(test)]
mod testing;

use anyhow::Result;
use clap::{Parser, Subcommand};
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};
use sea_orm_migration::{MigratorTrait, SchemaManager};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::entity::{game_template, GameTemplate};
use crate::migration::Migrator;

#[derive(Parser)]
#[command(name = "controller", version, about = "游戏服务器面板 - 数据库迁移与模板回填工具")]
struct Cli {
    /// 配置文件路径（默认查找 controller.toml）
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// 数据库地址，覆盖配置文件和 DATABASE_URL
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 执行待运行的迁移
    Up {
        /// 最多执行的迁移数量（默认全部）
        #[arg(long)]
        steps: Option<u32>,
    },
    /// 回滚迁移
    Down {
        /// 回滚的迁移数量
        #[arg(long, default_value = "1")]
        steps: u32,
    },
    /// 查看迁移状态
    Status,
    /// 删除所有表并重新执行全部迁移
    Fresh,
    /// 重新计算所有模板的派生字段和合并分组
    Backfill,
    /// 删除重复的 game_key 并确保唯一索引存在
    Dedupe,
    /// 移除所有模板的合并分组标记
    Untag,
    /// 列出所有模板
    List,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = config::load_config(cli.config.as_deref())?;

    // 初始化 tracing 日志系统
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer())
        .init();

    let database_url = config.resolve_database_url(cli.database_url.as_deref());
    let db = migration::connect(&database_url).await?;
    info!("🔗 已连接数据库");

    match cli.command {
        Commands::Up { steps } => {
            Migrator::up(&db, steps).await?;
            info!("✅ 迁移执行完成");
        }
        Commands::Down { steps } => {
            Migrator::down(&db, Some(steps)).await?;
            info!("✅ 已回滚 {} 个迁移", steps);
        }
        Commands::Status => {
            Migrator::status(&db).await?;
        }
        Commands::Fresh => {
            Migrator::fresh(&db).await?;
            info!("✅ 数据库已重建");
        }
        Commands::Backfill => {
            run_backfill(&db).await?;
        }
        Commands::Dedupe => {
            let manager = SchemaManager::new(&db);
            let report = backfill::dedupe_game_keys(&manager).await?;
            info!("去重结果: {}", report);
        }
        Commands::Untag => {
            let manager = SchemaManager::new(&db);
            let report = backfill::untag_merge_groups(&manager).await?;
            info!("移除合并分组结果: {}", report);
        }
        Commands::List => {
            for line in list_templates(&db).await? {
                println!("{}", line);
            }
        }
    }

    Ok(())
}

/// 派生字段与合并分组的完整重算
async fn run_backfill(db: &DatabaseConnection) -> Result<()> {
    let manager = SchemaManager::new(db);

    let derived = backfill::derive_template_fields(&manager).await?;
    info!("派生字段: {}", derived);

    let merged = backfill::tag_merge_groups(&manager).await?;
    info!("合并分组: {}", merged);

    Ok(())
}

async fn list_templates(db: &DatabaseConnection) -> Result<Vec<String>> {
    let models = GameTemplate::find()
        .order_by_asc(game_template::Column::GameKey)
        .all(db)
        .await?;

    Ok(models.iter().map(format_template_line).collect())
}

fn format_template_line(model: &game_template::Model) -> String {
    let template = model.to_template();
    let roles: Vec<&str> = template.port_profile.iter().map(|e| e.role.as_str()).collect();
    let (install, group) = match template.requirements.as_ref() {
        Some(req) => (
            req.steam_install_mode.to_string(),
            req.merged_group.clone().unwrap_or_else(|| "-".to_string()),
        ),
        None => ("-".to_string(), "-".to_string()),
    };

    format!(
        "{:<24} steam={:<8} install={:<9} group={:<14} ports=[{}]",
        template.game_key,
        template
            .steam_app_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string()),
        install,
        group,
        roles.join(",")
    )
}
