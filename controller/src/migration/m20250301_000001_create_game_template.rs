use sea_orm_migration::prelude::*;
use sea_orm_migration::schema::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建 game_template 表（每个游戏 + 操作系统一条）
        manager
            .create_table(
                Table::create()
                    .table(GameTemplate::Table)
                    .if_not_exists()
                    .col(big_integer(GameTemplate::Id).auto_increment().primary_key())
                    .col(string(GameTemplate::GameKey))
                    .col(string(GameTemplate::Name))
                    .col(big_integer_null(GameTemplate::SteamAppId))
                    .col(text(GameTemplate::RequiredPorts).default("[]"))
                    .col(text(GameTemplate::EnvVars).default("[]"))
                    .col(text(GameTemplate::SupportedOs).default("[]"))
                    .col(timestamp(GameTemplate::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp(GameTemplate::UpdatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        // 普通索引，唯一约束在去重之后再建立
        manager
            .create_index(
                Index::create()
                    .name("idx_game_template_game_key")
                    .table(GameTemplate::Table)
                    .col(GameTemplate::GameKey)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GameTemplate::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum GameTemplate {
    Table,
    Id,
    GameKey,
    Name,
    SteamAppId,
    RequiredPorts,
    EnvVars,
    SupportedOs,
    CreatedAt,
    UpdatedAt,
}
