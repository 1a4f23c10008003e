use common::template::{GameTemplate as Template, PortProfileEntry};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "game_template")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[serde(rename = "gameKey")]
    #[sea_orm(unique)]
    pub game_key: String,
    pub name: String,
    #[serde(rename = "steamAppId")]
    pub steam_app_id: Option<i64>,
    /// 原始端口描述（JSON 数组）
    #[serde(rename = "requiredPorts")]
    #[sea_orm(column_type = "Text")]
    pub required_ports: String,
    /// 环境变量（JSON 数组）
    #[serde(rename = "envVars")]
    #[sea_orm(column_type = "Text")]
    pub env_vars: String,
    /// 支持的操作系统（JSON 数组）
    #[serde(rename = "supportedOs")]
    #[sea_orm(column_type = "Text")]
    pub supported_os: String,
    /// 派生：端口画像
    #[serde(rename = "portProfile")]
    #[sea_orm(column_type = "Text", nullable)]
    pub port_profile: Option<String>,
    /// 派生：需求信息（含 merged_group）
    #[sea_orm(column_type = "Text", nullable)]
    pub requirements: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// 转换为规范化引擎使用的强类型模板
    pub fn to_template(&self) -> Template {
        let mut template = Template::from_columns(
            self.id,
            &self.game_key,
            self.steam_app_id,
            &self.required_ports,
            &self.env_vars,
            &self.supported_os,
            self.requirements.as_deref(),
        );
        template.port_profile = self
            .port_profile
            .as_deref()
            .and_then(|text| serde_json::from_str::<Vec<PortProfileEntry>>(text).ok())
            .unwrap_or_default();
        template
    }
}
