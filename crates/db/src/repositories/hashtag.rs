//! Hashtag repository.

use std::collections::HashMap;
use std::sync::Arc;

use crate::entities::{Hashtag, PostHashtag, hashtag, post_hashtag};
use crate::map_write_err;
use agora_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};

/// Ordering for hashtag listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HashtagSort {
    /// Most used first, ties by name.
    #[default]
    Popular,
    /// Newest tag first.
    Recent,
    /// By name.
    Alphabetical,
}

impl std::str::FromStr for HashtagSort {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "popular" => Ok(Self::Popular),
            "recent" => Ok(Self::Recent),
            "alphabetical" => Ok(Self::Alphabetical),
            other => Err(AppError::Validation(format!(
                "Unknown sort '{other}', expected 'popular', 'recent' or 'alphabetical'"
            ))),
        }
    }
}

/// A hashtag together with the number of posts using it.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct HashtagCount {
    pub id: i32,
    pub name: String,
    pub count: i64,
}

/// Hashtag repository for database operations.
#[derive(Clone)]
pub struct HashtagRepository {
    db: Arc<DatabaseConnection>,
}

impl HashtagRepository {
    /// Create a new hashtag repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a hashtag by name.
    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<hashtag::Model>> {
        let name_lower = name.to_lowercase();
        Hashtag::find()
            .filter(hashtag::Column::Name.eq(&name_lower))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get or create a hashtag.
    pub async fn get_or_create(&self, name: &str) -> AppResult<hashtag::Model> {
        let name_lower = name.to_lowercase();

        if let Some(tag) = self.find_by_name(&name_lower).await? {
            return Ok(tag);
        }

        let model = hashtag::ActiveModel {
            name: Set(name_lower.clone()),
            ..Default::default()
        };

        match model.insert(self.db.as_ref()).await.map_err(map_write_err) {
            Ok(tag) => Ok(tag),
            // Another request created it in between
            Err(AppError::Conflict(_)) => self
                .find_by_name(&name_lower)
                .await?
                .ok_or_else(|| AppError::Internal(format!("hashtag '{name_lower}' vanished"))),
            Err(e) => Err(e),
        }
    }

    /// Replace the set of hashtags linked to a post.
    pub async fn set_post_hashtags(&self, post_id: i32, hashtag_ids: &[i32]) -> AppResult<()> {
        PostHashtag::delete_many()
            .filter(post_hashtag::Column::PostId.eq(post_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if hashtag_ids.is_empty() {
            return Ok(());
        }

        let links = hashtag_ids.iter().map(|&hashtag_id| post_hashtag::ActiveModel {
            post_id: Set(post_id),
            hashtag_id: Set(hashtag_id),
        });

        PostHashtag::insert_many(links)
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(map_write_err)?;

        Ok(())
    }

    /// Hashtag names for each of the given posts, alphabetically.
    pub async fn names_for_posts(&self, post_ids: &[i32]) -> AppResult<HashMap<i32, Vec<String>>> {
        if post_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(i32, String)> = PostHashtag::find()
            .select_only()
            .column(post_hashtag::Column::PostId)
            .column(hashtag::Column::Name)
            .join(JoinType::InnerJoin, post_hashtag::Relation::Hashtag.def())
            .filter(post_hashtag::Column::PostId.is_in(post_ids.iter().copied()))
            .order_by_asc(hashtag::Column::Name)
            .into_tuple()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut names: HashMap<i32, Vec<String>> = HashMap::new();
        for (post_id, name) in rows {
            names.entry(post_id).or_default().push(name);
        }
        Ok(names)
    }

    /// List hashtags with their post counts.
    ///
    /// `search` is matched as a case-insensitive substring. Returns the page and the
    /// total number of matching hashtags.
    pub async fn list_with_counts(
        &self,
        sort: HashtagSort,
        search: Option<&str>,
        page: u64,
        per_page: u64,
    ) -> AppResult<(Vec<HashtagCount>, u64)> {
        let mut query = Hashtag::find()
            .select_only()
            .column(hashtag::Column::Id)
            .column(hashtag::Column::Name)
            .column_as(post_hashtag::Column::PostId.count(), "count")
            .join(JoinType::LeftJoin, hashtag::Relation::PostHashtag.def())
            .group_by(hashtag::Column::Id)
            .group_by(hashtag::Column::Name);

        if let Some(term) = search.map(str::trim).filter(|t| !t.is_empty()) {
            query = query.filter(hashtag::Column::Name.contains(term.to_lowercase()));
        }

        query = match sort {
            HashtagSort::Popular => query
                .order_by_desc(post_hashtag::Column::PostId.count())
                .order_by_asc(hashtag::Column::Name),
            HashtagSort::Recent => query.order_by_desc(hashtag::Column::Id),
            HashtagSort::Alphabetical => query.order_by_asc(hashtag::Column::Name),
        };

        let paginator = query
            .into_model::<HashtagCount>()
            .paginate(self.db.as_ref(), per_page);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        let items = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok((items, total))
    }
}
