//! Notification entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Notification types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "camelCase")]
pub enum NotificationType {
    /// Someone commented on your post
    #[sea_orm(string_value = "comment")]
    Comment,
    /// Someone replied to your comment
    #[sea_orm(string_value = "reply")]
    Reply,
    #[sea_orm(string_value = "system")]
    System,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "notification")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// The user receiving the notification
    #[sea_orm(indexed)]
    pub user_id: i32,

    /// The user who triggered the notification
    #[sea_orm(nullable)]
    pub actor_id: Option<i32>,

    pub notification_type: NotificationType,

    pub message: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub content: Option<String>,

    /// Client-side link to the subject (e.g. `/posts/3#comment-9`)
    #[sea_orm(nullable)]
    pub link: Option<String>,

    #[sea_orm(default_value = false)]
    pub is_read: bool,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub expires_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl ActiveModelBehavior for ActiveModel {}
