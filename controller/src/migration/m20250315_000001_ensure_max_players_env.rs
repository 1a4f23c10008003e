use sea_orm_migration::prelude::*;

use crate::backfill;
use crate::seed::MAX_PLAYERS_RULES;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut changed = 0;
        for rule in MAX_PLAYERS_RULES {
            let report =
                backfill::ensure_env_var_defaults(manager, rule.game_keys, rule.defaults).await?;
            changed += report.changed;
        }

        // 环境变量变化后 required_vars 需要重新派生
        if changed > 0 {
            backfill::derive_template_fields(manager).await?;
        }

        Ok(())
    }

    async fn down(&self, _manager: &SchemaManager) -> Result<(), DbErr> {
        Ok(())
    }
}
