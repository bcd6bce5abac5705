//! Hashtag entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "hashtag")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Lowercase, without the leading `#`
    #[sea_orm(unique)]
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::post_hashtag::Entity")]
    PostHashtag,
}

impl Related<super::post_hashtag::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PostHashtag.def()
    }
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        super::post_hashtag::Relation::Post.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::post_hashtag::Relation::Hashtag.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
