//! Create hashtag and post_hashtag tables migration.

use sea_orm_migration::prelude::*;

use super::m20250101_000002_create_post_table::Post;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Hashtag::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Hashtag::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Hashtag::Name)
                            .string_len(50)
                            .not_null()
                            .unique_key(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PostHashtag::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PostHashtag::PostId).integer().not_null())
                    .col(ColumnDef::new(PostHashtag::HashtagId).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(PostHashtag::PostId)
                            .col(PostHashtag::HashtagId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_post_hashtag_post")
                            .from(PostHashtag::Table, PostHashtag::PostId)
                            .to(Post::Table, Post::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_post_hashtag_hashtag")
                            .from(PostHashtag::Table, PostHashtag::HashtagId)
                            .to(Hashtag::Table, Hashtag::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: hashtag_id (for usage counts and tag lookups)
        manager
            .create_index(
                Index::create()
                    .name("idx_post_hashtag_hashtag")
                    .table(PostHashtag::Table)
                    .col(PostHashtag::HashtagId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PostHashtag::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Hashtag::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Hashtag {
    Table,
    Id,
    Name,
}

#[derive(Iden)]
enum PostHashtag {
    Table,
    PostId,
    HashtagId,
}
