//! Polymorphic references to reactable rows.
//!
//! An [`EntityRef`] names any row that can receive a reaction: a post, an article,
//! a community or a comment. It is a lookup key only and owns nothing.

use std::fmt;
use std::str::FromStr;

use agora_common::AppError;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Kinds of rows that can be reacted to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    #[sea_orm(string_value = "post")]
    Post,
    #[sea_orm(string_value = "article")]
    Article,
    #[sea_orm(string_value = "community")]
    Community,
    #[sea_orm(string_value = "comment")]
    Comment,
}

impl EntityKind {
    /// Wire name of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Post => "post",
            Self::Article => "article",
            Self::Community => "community",
            Self::Comment => "comment",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "post" => Ok(Self::Post),
            "article" => Ok(Self::Article),
            "community" => Ok(Self::Community),
            "comment" => Ok(Self::Comment),
            other => Err(AppError::Validation(format!("Unknown entity type: {other}"))),
        }
    }
}

/// A `(kind, id)` pair identifying one reactable row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityRef {
    pub kind: EntityKind,
    pub id: i32,
}

impl EntityRef {
    #[must_use]
    pub const fn new(kind: EntityKind, id: i32) -> Self {
        Self { kind, id }
    }

    #[must_use]
    pub const fn post(id: i32) -> Self {
        Self::new(EntityKind::Post, id)
    }

    #[must_use]
    pub const fn comment(id: i32) -> Self {
        Self::new(EntityKind::Comment, id)
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}
