//! Reaction entity (like/dislike votes on any reactable row).

use std::str::FromStr;

use agora_common::AppError;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::entity_ref::{EntityKind, EntityRef};

/// A single vote.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(8))")]
#[serde(rename_all = "lowercase")]
pub enum Vote {
    #[sea_orm(string_value = "like")]
    Like,
    #[sea_orm(string_value = "dislike")]
    Dislike,
}

impl FromStr for Vote {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "like" => Ok(Self::Like),
            "dislike" => Ok(Self::Dislike),
            other => Err(AppError::Validation(format!(
                "Invalid vote '{other}', expected 'like' or 'dislike'"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reaction")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// The user who voted
    pub user_id: i32,

    /// Kind of the target row
    pub entity_type: EntityKind,

    /// Id of the target row within its kind
    pub entity_id: i32,

    pub vote: Vote,

    pub created_at: DateTimeWithTimeZone,
}

impl Model {
    /// The row this reaction targets.
    #[must_use]
    pub const fn entity(&self) -> EntityRef {
        EntityRef::new(self.entity_type, self.entity_id)
    }
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

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
