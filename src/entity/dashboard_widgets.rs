//! 首页组件实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "dashboard_widgets")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub widget_type: String,
    pub chart_type: Option<String>,
    pub description: String,
    pub configuration: String,
    pub refresh_interval: i32,
    pub width: i32,
    pub height: i32,
    pub is_active: bool,
    pub display_order: i32,
    /// JSON 数组，旧数据可能是逗号分隔
    pub user_types: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_widget(self) -> crate::models::reports::entities::DashboardWidget {
        use crate::models::reports::entities::{
            ChartType, DashboardWidget, WidgetType, parse_user_types,
        };
        use chrono::{DateTime, Utc};

        DashboardWidget {
            id: self.id,
            name: self.name,
            widget_type: self
                .widget_type
                .parse::<WidgetType>()
                .unwrap_or(WidgetType::QuickLinks),
            chart_type: self.chart_type.and_then(|c| c.parse::<ChartType>().ok()),
            description: self.description,
            configuration: serde_json::from_str(&self.configuration).unwrap_or_default(),
            refresh_interval: self.refresh_interval,
            width: self.width,
            height: self.height,
            is_active: self.is_active,
            display_order: self.display_order,
            user_types: parse_user_types(&self.user_types),
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}
