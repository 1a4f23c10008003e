use sea_orm_migration::prelude::*;

use crate::backfill;
use crate::seed::builtin_templates;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 插入内置模板，已存在的 game_key 跳过
        backfill::insert_templates_if_absent(manager, &builtin_templates()).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let templates = builtin_templates();
        let keys: Vec<&str> = templates.iter().map(|t| t.game_key).collect();
        backfill::delete_templates_by_key(manager, &keys).await?;
        Ok(())
    }
}
