use sea_orm_migration::prelude::*;

use crate::backfill;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 为 game_template 表添加派生字段
        manager
            .alter_table(
                Table::alter()
                    .table(GameTemplate::Table)
                    .add_column(ColumnDef::new(GameTemplate::PortProfile).text().null())
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(GameTemplate::Table)
                    .add_column(ColumnDef::new(GameTemplate::Requirements).text().null())
                    .to_owned(),
            )
            .await?;

        // 数据迁移：根据端口、环境变量和 Steam app id 回填派生字段
        backfill::derive_template_fields(manager).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(GameTemplate::Table)
                    .drop_column(GameTemplate::Requirements)
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(GameTemplate::Table)
                    .drop_column(GameTemplate::PortProfile)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum GameTemplate {
    Table,
    PortProfile,
    Requirements,
}
