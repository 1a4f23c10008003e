use sea_orm_migration::prelude::*;

use crate::backfill::{self, UNIQUE_GAME_KEY_INDEX};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 删除重复 game_key（保留 id 最小的一行）并建立唯一索引
        backfill::dedupe_game_keys(manager).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 被删除的重复行无法恢复，只撤销唯一索引
        manager
            .drop_index(
                Index::drop()
                    .name(UNIQUE_GAME_KEY_INDEX)
                    .table(GameTemplate::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum GameTemplate {
    Table,
}
