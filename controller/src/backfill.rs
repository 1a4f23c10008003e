//! 游戏模板批量回填任务
//!
//! 每个任务一次性读取相关行，在内存中计算后逐行写回，可重复执行。
//! 表或所需列不存在时整个任务跳过，兼容部分执行过的迁移状态。
//! 语句之间没有跨行事务，中途失败时已写入的行保持原样。

use std::fmt;

use common::template::{self, GameTemplate};
use common::utils::{encode_json_array, encode_json_object};
use sea_orm::{ConnectionTrait, DbErr, FromQueryResult};
use sea_orm_migration::prelude::*;
use tracing::{debug, info, warn};

use crate::seed::SeedTemplate;

pub const TABLE_NAME: &str = "game_template";
pub const UNIQUE_GAME_KEY_INDEX: &str = "idx_game_template_game_key_unique";

/// SQLite 单条语句的参数上限较低，批量删除时分块
const DELETE_CHUNK: usize = 500;

#[derive(DeriveIden)]
enum TemplateTable {
    #[sea_orm(iden = "game_template")]
    Table,
    Id,
    GameKey,
    Name,
    SteamAppId,
    RequiredPorts,
    EnvVars,
    SupportedOs,
    PortProfile,
    Requirements,
    UpdatedAt,
}

/// 单次任务的执行结果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassReport {
    /// 读取的行数
    pub scanned: usize,
    /// 写入（插入/更新/删除）的行数
    pub changed: usize,
    /// 表结构不满足条件，任务未执行
    pub skipped: bool,
}

impl PassReport {
    fn skipped() -> Self {
        Self {
            skipped: true,
            ..Self::default()
        }
    }
}

impl fmt::Display for PassReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.skipped {
            write!(f, "skipped")
        } else {
            write!(f, "scanned={} changed={}", self.scanned, self.changed)
        }
    }
}

#[derive(Debug, FromQueryResult)]
struct TemplateRow {
    id: i64,
    game_key: String,
    steam_app_id: Option<i64>,
    required_ports: Option<String>,
    env_vars: Option<String>,
    supported_os: Option<String>,
    requirements: Option<String>,
}

impl TemplateRow {
    fn into_template(self) -> GameTemplate {
        GameTemplate::from_columns(
            self.id,
            &self.game_key,
            self.steam_app_id,
            self.required_ports.as_deref().unwrap_or("[]"),
            self.env_vars.as_deref().unwrap_or("[]"),
            self.supported_os.as_deref().unwrap_or("[]"),
            self.requirements.as_deref(),
        )
    }
}

#[derive(Debug, FromQueryResult)]
struct KeyRow {
    id: i64,
    game_key: String,
}

#[derive(Debug, FromQueryResult)]
struct EnvRow {
    id: i64,
    game_key: String,
    env_vars: Option<String>,
}

/// 检查 game_template 表及指定列是否存在
async fn has_columns(manager: &SchemaManager<'_>, columns: &[&str]) -> Result<bool, DbErr> {
    if !manager.has_table(TABLE_NAME).await? {
        return Ok(false);
    }
    for column in columns {
        if !manager.has_column(TABLE_NAME, *column).await? {
            return Ok(false);
        }
    }
    Ok(true)
}

async fn load_templates<C: ConnectionTrait>(db: &C) -> Result<Vec<GameTemplate>, DbErr> {
    let select = Query::select()
        .columns([
            TemplateTable::Id,
            TemplateTable::GameKey,
            TemplateTable::SteamAppId,
            TemplateTable::RequiredPorts,
            TemplateTable::EnvVars,
            TemplateTable::SupportedOs,
            TemplateTable::Requirements,
        ])
        .from(TemplateTable::Table)
        .order_by(TemplateTable::Id, Order::Asc)
        .to_owned();

    let rows = TemplateRow::find_by_statement(db.get_database_backend().build(&select))
        .all(db)
        .await?;

    Ok(rows.into_iter().map(TemplateRow::into_template).collect())
}

async fn load_keys<C: ConnectionTrait>(db: &C) -> Result<Vec<KeyRow>, DbErr> {
    let select = Query::select()
        .columns([TemplateTable::Id, TemplateTable::GameKey])
        .from(TemplateTable::Table)
        .order_by(TemplateTable::Id, Order::Asc)
        .to_owned();

    KeyRow::find_by_statement(db.get_database_backend().build(&select))
        .all(db)
        .await
}

async fn write_derived<C: ConnectionTrait>(db: &C, template: &GameTemplate) -> Result<(), DbErr> {
    let Some(id) = template.id else {
        return Ok(());
    };

    let update = Query::update()
        .table(TemplateTable::Table)
        .value(TemplateTable::PortProfile, encode_json_array(&template.port_profile))
        .value(TemplateTable::Requirements, encode_json_object(&template.requirements))
        .value(TemplateTable::UpdatedAt, Expr::current_timestamp())
        .and_where(Expr::col(TemplateTable::Id).eq(id))
        .to_owned();

    db.execute(db.get_database_backend().build(&update)).await?;
    Ok(())
}

async fn write_requirements<C: ConnectionTrait>(db: &C, template: &GameTemplate) -> Result<(), DbErr> {
    let Some(id) = template.id else {
        return Ok(());
    };

    let update = Query::update()
        .table(TemplateTable::Table)
        .value(TemplateTable::Requirements, encode_json_object(&template.requirements))
        .value(TemplateTable::UpdatedAt, Expr::current_timestamp())
        .and_where(Expr::col(TemplateTable::Id).eq(id))
        .to_owned();

    db.execute(db.get_database_backend().build(&update)).await?;
    Ok(())
}

/// 重新计算所有模板的 port_profile 与 requirements
///
/// 已有的 merged_group 保留，合并分组由 [`tag_merge_groups`] 负责。
pub async fn derive_template_fields(manager: &SchemaManager<'_>) -> Result<PassReport, DbErr> {
    if !has_columns(manager, &["port_profile", "requirements"]).await? {
        warn!("game_template 表或派生列不存在，跳过派生字段回填");
        return Ok(PassReport::skipped());
    }

    let db = manager.get_connection();
    let mut templates = load_templates(db).await?;

    for template in templates.iter_mut() {
        template.rederive();
        debug!(
            "模板 {} 派生完成: {} 个端口角色",
            template.game_key,
            template.port_profile.len()
        );
        write_derived(db, template).await?;
    }

    let report = PassReport {
        scanned: templates.len(),
        changed: templates.len(),
        skipped: false,
    };
    info!("✅ 模板派生字段回填完成: {}", report);
    Ok(report)
}

/// 在全部模板上重算 Windows/Linux 合并分组标记
///
/// 只写回标记实际发生变化（或 requirements 原本缺失/无法解析）的行。
pub async fn tag_merge_groups(manager: &SchemaManager<'_>) -> Result<PassReport, DbErr> {
    if !has_columns(manager, &["requirements"]).await? {
        warn!("game_template 表或 requirements 列不存在，跳过合并分组");
        return Ok(PassReport::skipped());
    }

    let db = manager.get_connection();
    let mut templates = load_templates(db).await?;

    let before: Vec<(bool, Option<String>)> = templates
        .iter()
        .map(|t| (t.requirements.is_some(), t.merged_group().map(str::to_string)))
        .collect();

    let tagged = template::apply_merge_groups(&mut templates);

    let mut changed = 0;
    for (template, (had_requirements, old_group)) in templates.iter().zip(before) {
        if had_requirements && template.merged_group() == old_group.as_deref() {
            continue;
        }
        debug!(
            "模板 {} 合并分组: {:?} -> {:?}",
            template.game_key,
            old_group,
            template.merged_group()
        );
        write_requirements(db, template).await?;
        changed += 1;
    }

    let report = PassReport {
        scanned: templates.len(),
        changed,
        skipped: false,
    };
    info!("✅ 合并分组完成: {} 个模板带标记, {}", tagged, report);
    Ok(report)
}

/// 移除所有模板上的合并分组标记
pub async fn untag_merge_groups(manager: &SchemaManager<'_>) -> Result<PassReport, DbErr> {
    if !has_columns(manager, &["requirements"]).await? {
        warn!("game_template 表或 requirements 列不存在，跳过移除合并分组");
        return Ok(PassReport::skipped());
    }

    let db = manager.get_connection();
    let mut templates = load_templates(db).await?;

    let tagged: Vec<usize> = templates
        .iter()
        .enumerate()
        .filter(|(_, t)| t.merged_group().is_some())
        .map(|(idx, _)| idx)
        .collect();

    let cleared = template::clear_merge_groups(&mut templates);
    for idx in tagged {
        write_requirements(db, &templates[idx]).await?;
    }

    let report = PassReport {
        scanned: templates.len(),
        changed: cleared,
        skipped: false,
    };
    info!("✅ 合并分组标记已移除: {}", report);
    Ok(report)
}

/// 确保指定模板上存在给定的环境变量，已有值不覆盖
pub async fn ensure_env_var_defaults(
    manager: &SchemaManager<'_>,
    game_keys: &[&str],
    defaults: &[(&str, &str)],
) -> Result<PassReport, DbErr> {
    if !has_columns(manager, &["env_vars"]).await? {
        warn!("game_template 表或 env_vars 列不存在，跳过环境变量补全");
        return Ok(PassReport::skipped());
    }
    if game_keys.is_empty() || defaults.is_empty() {
        return Ok(PassReport::default());
    }

    let db = manager.get_connection();
    let backend = db.get_database_backend();

    let select = Query::select()
        .columns([TemplateTable::Id, TemplateTable::GameKey, TemplateTable::EnvVars])
        .from(TemplateTable::Table)
        .and_where(Expr::col(TemplateTable::GameKey).is_in(game_keys.iter().copied()))
        .order_by(TemplateTable::Id, Order::Asc)
        .to_owned();

    let rows = EnvRow::find_by_statement(backend.build(&select)).all(db).await?;

    let mut changed = 0;
    for row in &rows {
        let raw = row.env_vars.as_deref().unwrap_or("[]");
        let Some(mut env_vars) = template::parse_env_entries(raw) else {
            warn!("模板 {} 的 env_vars 不是 JSON 数组，跳过环境变量补全", row.game_key);
            continue;
        };
        let appended = template::ensure_env_defaults(&mut env_vars, defaults);
        if appended == 0 {
            continue;
        }

        let update = Query::update()
            .table(TemplateTable::Table)
            .value(TemplateTable::EnvVars, encode_json_array(&env_vars))
            .value(TemplateTable::UpdatedAt, Expr::current_timestamp())
            .and_where(Expr::col(TemplateTable::Id).eq(row.id))
            .to_owned();
        db.execute(backend.build(&update)).await?;

        debug!("模板 {} 补全 {} 个环境变量", row.game_key, appended);
        changed += 1;
    }

    let report = PassReport {
        scanned: rows.len(),
        changed,
        skipped: false,
    };
    info!("✅ 环境变量补全完成: {}", report);
    Ok(report)
}

/// 按 game_key 幂等插入模板，已存在的 key 不会重复插入
pub async fn insert_templates_if_absent(
    manager: &SchemaManager<'_>,
    seeds: &[SeedTemplate],
) -> Result<PassReport, DbErr> {
    if !manager.has_table(TABLE_NAME).await? {
        warn!("game_template 表不存在，跳过模板种子数据");
        return Ok(PassReport::skipped());
    }

    let db = manager.get_connection();
    let existing = load_keys(db).await?;
    let missing = template::missing_game_keys(
        existing.iter().map(|row| row.game_key.as_str()),
        seeds.iter().map(|seed| seed.game_key),
    );

    for key in &missing {
        let Some(seed) = seeds.iter().find(|seed| seed.game_key == *key) else {
            continue;
        };

        let insert = Query::insert()
            .into_table(TemplateTable::Table)
            .columns([
                TemplateTable::GameKey,
                TemplateTable::Name,
                TemplateTable::SteamAppId,
                TemplateTable::RequiredPorts,
                TemplateTable::EnvVars,
                TemplateTable::SupportedOs,
            ])
            .values_panic([
                seed.game_key.into(),
                seed.name.into(),
                seed.steam_app_id.into(),
                encode_json_array(&seed.required_ports).into(),
                encode_json_array(&seed.env_vars).into(),
                encode_json_array(seed.supported_os).into(),
            ])
            .to_owned();
        db.execute(db.get_database_backend().build(&insert)).await?;
        debug!("插入模板 {}", seed.game_key);
    }

    let report = PassReport {
        scanned: existing.len(),
        changed: missing.len(),
        skipped: false,
    };
    info!("✅ 模板种子数据写入完成: {}", report);
    Ok(report)
}

/// 删除指定 game_key 的模板
pub async fn delete_templates_by_key(
    manager: &SchemaManager<'_>,
    game_keys: &[&str],
) -> Result<PassReport, DbErr> {
    if !manager.has_table(TABLE_NAME).await? {
        warn!("game_template 表不存在，跳过删除模板");
        return Ok(PassReport::skipped());
    }
    if game_keys.is_empty() {
        return Ok(PassReport::default());
    }

    let db = manager.get_connection();
    let delete = Query::delete()
        .from_table(TemplateTable::Table)
        .and_where(Expr::col(TemplateTable::GameKey).is_in(game_keys.iter().copied()))
        .to_owned();
    let result = db.execute(db.get_database_backend().build(&delete)).await?;

    let report = PassReport {
        scanned: game_keys.len(),
        changed: result.rows_affected() as usize,
        skipped: false,
    };
    info!("✅ 模板删除完成: {}", report);
    Ok(report)
}

/// 去除重复的 game_key（保留 id 最小的一行），然后建立唯一索引
pub async fn dedupe_game_keys(manager: &SchemaManager<'_>) -> Result<PassReport, DbErr> {
    if !manager.has_table(TABLE_NAME).await? {
        warn!("game_template 表不存在，跳过去重");
        return Ok(PassReport::skipped());
    }

    let db = manager.get_connection();
    let rows = load_keys(db).await?;
    let pairs: Vec<(i64, &str)> = rows.iter().map(|row| (row.id, row.game_key.as_str())).collect();
    let doomed = template::plan_dedup(&pairs);

    for chunk in doomed.chunks(DELETE_CHUNK) {
        let delete = Query::delete()
            .from_table(TemplateTable::Table)
            .and_where(Expr::col(TemplateTable::Id).is_in(chunk.iter().copied()))
            .to_owned();
        db.execute(db.get_database_backend().build(&delete)).await?;
    }
    if !doomed.is_empty() {
        warn!("已删除 {} 条重复模板: {:?}", doomed.len(), doomed);
    }

    manager
        .create_index(
            Index::create()
                .name(UNIQUE_GAME_KEY_INDEX)
                .table(TemplateTable::Table)
                .col(TemplateTable::GameKey)
                .unique()
                .if_not_exists()
                .to_owned(),
        )
        .await?;

    let report = PassReport {
        scanned: rows.len(),
        changed: doomed.len(),
        skipped: false,
    };
    info!("✅ 模板去重完成: {}", report);
    Ok(report)
}
