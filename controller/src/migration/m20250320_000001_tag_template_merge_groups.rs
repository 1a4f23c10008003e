use sea_orm_migration::prelude::*;

use crate::backfill;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 为 Windows/Linux 变体打上 merged_group 标记
        backfill::tag_merge_groups(manager).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        backfill::untag_merge_groups(manager).await?;
        Ok(())
    }
}
